//! Runtime resolver types bound onto the executable schema.
//!
//! Resolvers work with plain JSON values: the parent object and the
//! argument map (keyed by out names) come in, a JSON result goes out.
//! The schema builder wraps them into the execution engine's resolver
//! calling convention, applying enum and scalar coercion around them.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::stream::BoxStream;
use serde_json::{Map, Value as JsonValue};

/// A JSON object map, as used for resolver arguments.
pub type JsonMap = Map<String, JsonValue>;

/// The result type of a field resolution.
pub type FieldResult = Result<JsonValue, async_graphql::Error>;

/// A stream of resolved JSON values, produced by subscription resolvers.
pub type JsonStream = BoxStream<'static, FieldResult>;

/// The inputs a resolver receives for one field resolution.
#[derive(Clone, Debug, Default)]
pub struct ResolverRequest {
    /// The parent value the field is resolved on; `Null` at the roots.
    pub parent: JsonValue,
    /// Field arguments keyed by their out names. Arguments the query did
    /// not supply are present with a `Null` value.
    pub args: JsonMap,
}

impl ResolverRequest {
    /// Looks up an argument by out name, treating missing as `Null`.
    pub fn arg(&self, name: &str) -> &JsonValue {
        self.args.get(name).unwrap_or(&JsonValue::Null)
    }
}

/// A field resolver: maps a [`ResolverRequest`] to a JSON value.
#[derive(Clone)]
pub struct Resolver {
    inner: Arc<dyn Fn(ResolverRequest) -> BoxFuture<'static, FieldResult> + Send + Sync>,
}

impl Resolver {
    /// Creates a resolver from an async function.
    pub fn new<F, Fut>(resolver: F) -> Self
    where
        F: Fn(ResolverRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = FieldResult> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |request| Box::pin(resolver(request))),
        }
    }

    /// Creates a resolver from a synchronous function.
    pub fn from_fn<F>(resolver: F) -> Self
    where
        F: Fn(ResolverRequest) -> FieldResult + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(move |request| {
                let result = resolver(request);
                Box::pin(async move { result })
            }),
        }
    }

    /// Invokes the resolver.
    pub fn call(&self, request: ResolverRequest) -> BoxFuture<'static, FieldResult> {
        (self.inner)(request)
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Resolver")
    }
}

/// A subscription source: maps a [`ResolverRequest`] to a stream of
/// JSON values.
#[derive(Clone)]
pub struct SubscriptionResolver {
    inner: Arc<
        dyn Fn(ResolverRequest) -> BoxFuture<'static, Result<JsonStream, async_graphql::Error>>
            + Send
            + Sync,
    >,
}

impl SubscriptionResolver {
    /// Creates a subscription resolver from an async function returning
    /// a stream.
    pub fn new<F, Fut>(resolver: F) -> Self
    where
        F: Fn(ResolverRequest) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<JsonStream, async_graphql::Error>> + Send + 'static,
    {
        Self {
            inner: Arc::new(move |request| Box::pin(resolver(request))),
        }
    }

    /// Invokes the resolver, producing the event stream.
    pub fn call(
        &self,
        request: ResolverRequest,
    ) -> BoxFuture<'static, Result<JsonStream, async_graphql::Error>> {
        (self.inner)(request)
    }
}

impl fmt::Debug for SubscriptionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SubscriptionResolver")
    }
}

/// Resolves the concrete object type name for a value returned through
/// a union or interface field.
#[derive(Clone)]
pub struct TypeResolver {
    inner: Arc<dyn Fn(&JsonValue) -> Option<String> + Send + Sync>,
}

impl TypeResolver {
    /// Creates a type resolver from a function inspecting the value.
    pub fn new<F>(resolver: F) -> Self
    where
        F: Fn(&JsonValue) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(resolver),
        }
    }

    /// Resolves the concrete type name for a value.
    pub fn resolve(&self, value: &JsonValue) -> Option<String> {
        (self.inner)(value)
    }
}

impl fmt::Debug for TypeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TypeResolver")
    }
}

/// Wraps field resolvers of fields whose schema text carries the
/// directive this visitor is registered for.
pub trait SchemaDirectiveVisitor: Send + Sync {
    /// Returns the resolver to use for the decorated field. The default
    /// implementation leaves the resolver untouched.
    fn visit_field(
        &self,
        args: &JsonMap,
        type_name: &str,
        field_name: &str,
        resolver: Resolver,
    ) -> Resolver {
        let _ = (args, type_name, field_name);
        resolver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sync_resolver_resolves() {
        let resolver = Resolver::from_fn(|request| Ok(request.parent["name"].clone()));
        let request = ResolverRequest {
            parent: json!({"name": "Alice"}),
            args: JsonMap::new(),
        };
        let result = futures_util::future::FutureExt::now_or_never(resolver.call(request))
            .expect("sync resolver is immediately ready")
            .unwrap();
        assert_eq!(result, json!("Alice"));
    }

    #[test]
    fn missing_args_read_as_null() {
        let request = ResolverRequest::default();
        assert_eq!(request.arg("query"), &JsonValue::Null);
    }
}
