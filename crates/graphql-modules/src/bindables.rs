//! Untyped runtime bindings.
//!
//! A bindable contributes runtime behavior to a type declared elsewhere
//! (usually by a free-form schema text fragment) without declaring the
//! type itself. Bindables pass through composition unchanged and are
//! applied in the same step that binds compiled models.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::resolver::{Resolver, SubscriptionResolver, TypeResolver};
use crate::scalar::ScalarFn;

/// Runtime bindings for an object type: resolvers, aliases and
/// argument out names keyed by wire names.
#[derive(Clone)]
pub struct ObjectBindable {
    pub(crate) name: String,
    pub(crate) resolvers: HashMap<String, Resolver>,
    pub(crate) aliases: HashMap<String, String>,
    pub(crate) out_names: HashMap<String, HashMap<String, String>>,
    pub(crate) subscriptions: HashMap<String, SubscriptionResolver>,
}

impl ObjectBindable {
    /// Bindings for the object type with the given GraphQL name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolvers: HashMap::new(),
            aliases: HashMap::new(),
            out_names: HashMap::new(),
            subscriptions: HashMap::new(),
        }
    }

    /// Binds a field resolver.
    pub fn resolver(mut self, field: impl Into<String>, resolver: Resolver) -> Self {
        self.resolvers.insert(field.into(), resolver);
        self
    }

    /// Aliases a field to a property of the parent value.
    pub fn alias(mut self, field: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.insert(field.into(), target.into());
        self
    }

    /// Maps an argument's wire name to the out name its resolver sees.
    pub fn out_name(
        mut self,
        field: impl Into<String>,
        argument: impl Into<String>,
        out_name: impl Into<String>,
    ) -> Self {
        self.out_names
            .entry(field.into())
            .or_default()
            .insert(argument.into(), out_name.into());
        self
    }

    /// Binds a subscription source to a field.
    pub fn subscription(
        mut self,
        field: impl Into<String>,
        resolver: SubscriptionResolver,
    ) -> Self {
        self.subscriptions.insert(field.into(), resolver);
        self
    }
}

/// Runtime bindings for a scalar type.
#[derive(Clone)]
pub struct ScalarBindable {
    pub(crate) name: String,
    pub(crate) serialize: Option<ScalarFn>,
    pub(crate) parse_value: Option<ScalarFn>,
}

impl ScalarBindable {
    /// Bindings for the scalar type with the given GraphQL name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serialize: None,
            parse_value: None,
        }
    }

    /// Sets the outgoing serialization function.
    pub fn serialize<F>(mut self, serialize: F) -> Self
    where
        F: Fn(JsonValue) -> crate::resolver::FieldResult + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(serialize));
        self
    }

    /// Sets the incoming value parser.
    pub fn parse_value<F>(mut self, parse_value: F) -> Self
    where
        F: Fn(JsonValue) -> crate::resolver::FieldResult + Send + Sync + 'static,
    {
        self.parse_value = Some(Arc::new(parse_value));
        self
    }
}

/// Runtime bindings for an enum type: member name to internal value.
#[derive(Clone)]
pub struct EnumBindable {
    pub(crate) name: String,
    pub(crate) members: Vec<(String, JsonValue)>,
}

impl EnumBindable {
    /// Bindings for the enum type with the given GraphQL name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// Maps a member name to an internal value.
    pub fn member(mut self, name: impl Into<String>, value: JsonValue) -> Self {
        self.members.push((name.into(), value));
        self
    }
}

/// Runtime bindings for a union or interface type.
#[derive(Clone)]
pub struct AbstractTypeBindable {
    pub(crate) name: String,
    pub(crate) type_resolver: Option<TypeResolver>,
    pub(crate) resolvers: HashMap<String, Resolver>,
}

impl AbstractTypeBindable {
    /// Bindings for the abstract type with the given GraphQL name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_resolver: None,
            resolvers: HashMap::new(),
        }
    }

    /// Sets the resolver mapping runtime values to concrete type names.
    pub fn type_resolver(mut self, resolver: TypeResolver) -> Self {
        self.type_resolver = Some(resolver);
        self
    }

    /// Binds a fallback field resolver applied to implementing types.
    pub fn resolver(mut self, field: impl Into<String>, resolver: Resolver) -> Self {
        self.resolvers.insert(field.into(), resolver);
        self
    }
}

/// An untyped runtime binding of any kind.
#[derive(Clone)]
pub enum Bindable {
    Object(ObjectBindable),
    Scalar(ScalarBindable),
    Enum(EnumBindable),
    Abstract(AbstractTypeBindable),
}

impl From<ObjectBindable> for Bindable {
    fn from(bindable: ObjectBindable) -> Self {
        Self::Object(bindable)
    }
}

impl From<ScalarBindable> for Bindable {
    fn from(bindable: ScalarBindable) -> Self {
        Self::Scalar(bindable)
    }
}

impl From<EnumBindable> for Bindable {
    fn from(bindable: EnumBindable) -> Self {
        Self::Enum(bindable)
    }
}

impl From<AbstractTypeBindable> for Bindable {
    fn from(bindable: AbstractTypeBindable) -> Self {
        Self::Abstract(bindable)
    }
}
