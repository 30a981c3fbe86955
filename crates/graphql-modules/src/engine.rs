//! Executable schema construction.
//!
//! Translates the final, sorted schema document into the execution
//! engine's dynamic type registrations and wires the collected runtime
//! bindings in: every object field gets a resolver (bound or default),
//! incoming arguments are coerced through enum value maps, scalar
//! parsers and input out names, and outgoing values through the reverse
//! conversions. The engine's own structural validation runs in
//! `finish()` and is surfaced verbatim.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::{
    Enum as DynEnum, EnumItem, Field as DynField, FieldFuture, FieldValue, InputObject, InputValue,
    Interface as DynInterface, InterfaceField, Object as DynObject, ResolverContext, Scalar,
    Schema, Subscription as DynSubscription, SubscriptionField, SubscriptionFieldFuture, TypeRef,
    ValueAccessor,
};
use async_graphql::{Name, Value};
use async_graphql_parser::types::{
    BaseType, ConstDirective, FieldDefinition, InputValueDefinition, ObjectType as AstObjectType,
    ServiceDocument, Type, TypeDefinition, TypeKind, TypeSystemDefinition,
};
use futures_util::StreamExt;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use crate::bindings::{ScalarRuntime, SchemaBindings};
use crate::error::SchemaError;
use crate::name::convert_graphql_name;
use crate::resolver::{JsonMap, Resolver, ResolverRequest, SubscriptionResolver, TypeResolver};
use crate::roots::ROOT_NAMES;
use crate::value::{const_value_to_json, json_to_const_value};

/// Builds the executable schema from the assembled document and the
/// collected runtime bindings.
pub(crate) fn build_schema(
    document: &ServiceDocument,
    bindings: &SchemaBindings,
) -> Result<Schema, SchemaError> {
    let index = Arc::new(CoercionIndex::build(document, bindings));
    let roots = RootNames::of(document);
    debug!(query = %roots.query, "building executable schema");

    let mut builder = Schema::build(
        roots.query.as_str(),
        roots.mutation.as_deref(),
        roots.subscription.as_deref(),
    );

    for definition in &document.definitions {
        let definition = match definition {
            TypeSystemDefinition::Type(definition) => &definition.node,
            TypeSystemDefinition::Directive(directive) => {
                // The dynamic engine has no directive-definition API;
                // directives act through bound visitors instead.
                trace!(name = %directive.node.name.node, "skipping directive registration");
                continue;
            }
            TypeSystemDefinition::Schema(_) => continue,
        };

        let name = definition.name.node.as_str();
        match &definition.kind {
            TypeKind::Scalar => {
                let mut scalar = Scalar::new(name);
                if let Some(description) = &definition.description {
                    scalar = scalar.description(description.node.clone());
                }
                builder = builder.register(scalar);
            }
            TypeKind::Object(object) => {
                if roots.subscription.as_deref() == Some(name) {
                    builder = builder.register(build_subscription(
                        definition, object, bindings, &index,
                    ));
                } else {
                    builder = builder.register(build_object(definition, object, bindings, &index));
                }
            }
            TypeKind::Interface(interface) => {
                let mut dyn_interface = DynInterface::new(name);
                if let Some(description) = &definition.description {
                    dyn_interface = dyn_interface.description(description.node.clone());
                }
                for field in &interface.fields {
                    dyn_interface = dyn_interface.field(build_interface_field(&field.node));
                }
                builder = builder.register(dyn_interface);
            }
            TypeKind::Union(union) => {
                let mut dyn_union = async_graphql::dynamic::Union::new(name);
                if let Some(description) = &definition.description {
                    dyn_union = dyn_union.description(description.node.clone());
                }
                for member in &union.members {
                    dyn_union = dyn_union.possible_type(member.node.as_str());
                }
                builder = builder.register(dyn_union);
            }
            TypeKind::Enum(node) => {
                let mut dyn_enum = DynEnum::new(name);
                if let Some(description) = &definition.description {
                    dyn_enum = dyn_enum.description(description.node.clone());
                }
                for value in &node.values {
                    let mut item = EnumItem::new(value.node.value.node.as_str());
                    if let Some(description) = &value.node.description {
                        item = item.description(description.node.clone());
                    }
                    dyn_enum = dyn_enum.item(item);
                }
                builder = builder.register(dyn_enum);
            }
            TypeKind::InputObject(input) => {
                let mut dyn_input = InputObject::new(name);
                if let Some(description) = &definition.description {
                    dyn_input = dyn_input.description(description.node.clone());
                }
                for field in &input.fields {
                    dyn_input = dyn_input.field(build_input_value(&field.node));
                }
                builder = builder.register(dyn_input);
            }
        }
    }

    builder
        .finish()
        .map_err(|err| SchemaError::Validation(err.to_string()))
}

/// The schema's root operation type names.
struct RootNames {
    query: String,
    mutation: Option<String>,
    subscription: Option<String>,
}

impl RootNames {
    fn of(document: &ServiceDocument) -> Self {
        let mut object_names = Vec::new();
        for definition in &document.definitions {
            if let TypeSystemDefinition::Type(definition) = definition {
                if matches!(definition.node.kind, TypeKind::Object(_)) {
                    object_names.push(definition.node.name.node.to_string());
                }
            }
        }

        for definition in &document.definitions {
            if let TypeSystemDefinition::Schema(schema) = definition {
                return Self {
                    query: schema
                        .node
                        .query
                        .as_ref()
                        .map(|name| name.node.to_string())
                        .unwrap_or_else(|| ROOT_NAMES[0].to_string()),
                    mutation: schema.node.mutation.as_ref().map(|name| name.node.to_string()),
                    subscription: schema
                        .node
                        .subscription
                        .as_ref()
                        .map(|name| name.node.to_string()),
                };
            }
        }

        let default_root = |name: &str| {
            object_names
                .iter()
                .any(|object| object == name)
                .then(|| name.to_string())
        };
        Self {
            query: ROOT_NAMES[0].to_string(),
            mutation: default_root(ROOT_NAMES[1]),
            subscription: default_root(ROOT_NAMES[2]),
        }
    }
}

fn build_object(
    definition: &TypeDefinition,
    object: &AstObjectType,
    bindings: &SchemaBindings,
    index: &Arc<CoercionIndex>,
) -> DynObject {
    let type_name = definition.name.node.as_str();
    let mut dyn_object = DynObject::new(type_name);
    if let Some(description) = &definition.description {
        dyn_object = dyn_object.description(description.node.clone());
    }
    for interface in &object.implements {
        dyn_object = dyn_object.implement(interface.node.as_str());
    }

    let implements: Vec<String> = object
        .implements
        .iter()
        .map(|name| name.node.to_string())
        .collect();
    for field in &object.fields {
        dyn_object = dyn_object.field(build_field(
            type_name, &field.node, &implements, bindings, index,
        ));
    }
    dyn_object
}

fn build_field(
    type_name: &str,
    field: &FieldDefinition,
    implements: &[String],
    bindings: &SchemaBindings,
    index: &Arc<CoercionIndex>,
) -> DynField {
    let field_name = field.name.node.to_string();
    let resolver = effective_resolver(type_name, &field_name, field, implements, bindings, index);
    let plans = Arc::new(argument_plans(type_name, &field_name, field, bindings, index));
    let shape = Arc::new(TypeShape::of(&field.ty.node));
    let index = index.clone();

    let mut dyn_field = DynField::new(field_name.as_str(), type_ref(&field.ty.node), move |ctx| {
        let resolver = resolver.clone();
        let plans = plans.clone();
        let shape = shape.clone();
        let index = index.clone();
        FieldFuture::new(async move {
            let request = build_request(&ctx, &plans, &index)?;
            let result = resolver.call(request).await?;
            output_field_value(&index, result, &shape)
        })
    });

    if let Some(description) = &field.description {
        dyn_field = dyn_field.description(description.node.clone());
    }
    for argument in &field.arguments {
        dyn_field = dyn_field.argument(build_input_value(&argument.node));
    }
    dyn_field
}

/// Picks the resolver bound for a field: the type's own binding first,
/// then a fallback from an implemented interface, then the default
/// property lookup (honoring aliases and name case conversion). Bound
/// directive visitors wrap the result.
fn effective_resolver(
    type_name: &str,
    field_name: &str,
    field: &FieldDefinition,
    implements: &[String],
    bindings: &SchemaBindings,
    index: &CoercionIndex,
) -> Resolver {
    let runtime = bindings.objects.get(type_name);

    let mut resolver = runtime
        .and_then(|runtime| runtime.resolvers.get(field_name).cloned())
        .or_else(|| {
            implements.iter().find_map(|interface| {
                bindings
                    .abstracts
                    .get(interface)
                    .and_then(|runtime| runtime.resolvers.get(field_name).cloned())
            })
        })
        .unwrap_or_else(|| {
            let key = runtime
                .and_then(|runtime| runtime.aliases.get(field_name).cloned())
                .unwrap_or_else(|| {
                    if index.convert_names_case {
                        convert_graphql_name(field_name)
                    } else {
                        field_name.to_string()
                    }
                });
            default_resolver(key)
        });

    for directive in &field.directives {
        if let Some(visitor) = bindings.visitors.get(directive.node.name.node.as_str()) {
            let args = directive_args(&directive.node);
            resolver = visitor.visit_field(&args, type_name, field_name, resolver);
        }
    }

    resolver
}

/// The default resolver reads the keyed property off the parent JSON
/// object, resolving to null when absent.
fn default_resolver(key: String) -> Resolver {
    Resolver::from_fn(move |request| {
        Ok(request.parent.get(&key).cloned().unwrap_or(JsonValue::Null))
    })
}

fn directive_args(directive: &ConstDirective) -> JsonMap {
    directive
        .arguments
        .iter()
        .map(|(name, value)| (name.node.to_string(), const_value_to_json(&value.node)))
        .collect()
}

/// How one declared argument maps onto the resolver's argument map.
struct ArgumentPlan {
    wire: String,
    out: String,
    shape: TypeShape,
}

fn argument_plans(
    type_name: &str,
    field_name: &str,
    field: &FieldDefinition,
    bindings: &SchemaBindings,
    index: &CoercionIndex,
) -> Vec<ArgumentPlan> {
    let out_names = bindings
        .objects
        .get(type_name)
        .and_then(|runtime| runtime.out_names.get(field_name));

    field
        .arguments
        .iter()
        .map(|argument| {
            let wire = argument.node.name.node.to_string();
            let out = out_names
                .and_then(|map| map.get(&wire).cloned())
                .unwrap_or_else(|| {
                    if index.convert_names_case {
                        convert_graphql_name(&wire)
                    } else {
                        wire.clone()
                    }
                });
            ArgumentPlan {
                wire,
                out,
                shape: TypeShape::of(&argument.node.ty.node),
            }
        })
        .collect()
}

/// Builds the resolver request from the engine context: parent value as
/// JSON plus the declared arguments keyed by out name, coerced through
/// enum, scalar and input conversions.
fn build_request(
    ctx: &ResolverContext<'_>,
    plans: &[ArgumentPlan],
    index: &CoercionIndex,
) -> Result<ResolverRequest, async_graphql::Error> {
    let parent = match ctx.parent_value.as_value() {
        Some(value) => const_value_to_json(value),
        None => JsonValue::Null,
    };

    let mut args = JsonMap::new();
    for plan in plans {
        let value = match ctx.args.get(&plan.wire) {
            Some(accessor) => coerce_input(index, accessor_to_json(&accessor), &plan.shape)?,
            None => JsonValue::Null,
        };
        args.insert(plan.out.clone(), value);
    }

    Ok(ResolverRequest { parent, args })
}

fn build_input_value(value: &InputValueDefinition) -> InputValue {
    let mut input = InputValue::new(value.name.node.as_str(), type_ref(&value.ty.node));
    if let Some(description) = &value.description {
        input = input.description(description.node.clone());
    }
    if let Some(default) = &value.default_value {
        input = input.default_value(default.node.clone());
    }
    input
}

fn build_interface_field(field: &FieldDefinition) -> InterfaceField {
    let mut interface_field = InterfaceField::new(field.name.node.as_str(), type_ref(&field.ty.node));
    if let Some(description) = &field.description {
        interface_field = interface_field.description(description.node.clone());
    }
    for argument in &field.arguments {
        interface_field = interface_field.argument(build_input_value(&argument.node));
    }
    interface_field
}

fn build_subscription(
    definition: &TypeDefinition,
    object: &AstObjectType,
    bindings: &SchemaBindings,
    index: &Arc<CoercionIndex>,
) -> DynSubscription {
    let type_name = definition.name.node.as_str();
    let mut subscription = DynSubscription::new(type_name);
    if let Some(description) = &definition.description {
        subscription = subscription.description(description.node.clone());
    }

    for field in &object.fields {
        subscription = subscription.field(build_subscription_field(
            type_name, &field.node, bindings, index,
        ));
    }
    subscription
}

fn build_subscription_field(
    type_name: &str,
    field: &FieldDefinition,
    bindings: &SchemaBindings,
    index: &Arc<CoercionIndex>,
) -> SubscriptionField {
    let field_name = field.name.node.to_string();
    let source: Option<SubscriptionResolver> = bindings
        .objects
        .get(type_name)
        .and_then(|runtime| runtime.subscriptions.get(&field_name).cloned());
    let plans = Arc::new(argument_plans(type_name, &field_name, field, bindings, index));
    let shape = Arc::new(TypeShape::of(&field.ty.node));
    let index = index.clone();
    let error_name = field_name.clone();

    let mut subscription_field = SubscriptionField::new(
        field_name.as_str(),
        type_ref(&field.ty.node),
        move |ctx| {
            let source = source.clone();
            let plans = plans.clone();
            let shape = shape.clone();
            let index = index.clone();
            let error_name = error_name.clone();
            SubscriptionFieldFuture::new(async move {
                let Some(source) = source else {
                    return Err(async_graphql::Error::new(format!(
                        "No subscription source is bound for field '{error_name}'"
                    )));
                };

                let request = build_request(&ctx, &plans, &index)?;
                let stream = source.call(request).await?;
                let stream = stream.map(move |item| {
                    item.and_then(|json| output_engine_value(&index, json, &shape))
                });
                Ok(stream.boxed())
            })
        },
    );

    if let Some(description) = &field.description {
        subscription_field = subscription_field.description(description.node.clone());
    }
    for argument in &field.arguments {
        subscription_field = subscription_field.argument(build_input_value(&argument.node));
    }
    subscription_field
}

/// Converts a parsed AST type to the engine's type reference.
fn type_ref(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::Named(name.to_string().into()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    };
    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}

/// A type's shape for value coercion: the named base plus list nesting.
/// Nullability is irrelevant here, null passes through every conversion.
#[derive(Clone, Debug)]
enum TypeShape {
    Named(String),
    List(Box<TypeShape>),
}

impl TypeShape {
    fn of(ty: &Type) -> Self {
        match &ty.base {
            BaseType::Named(name) => Self::Named(name.to_string()),
            BaseType::List(inner) => Self::List(Box::new(Self::of(inner))),
        }
    }
}

/// Per-type conversion tables consulted while coercing values in and
/// out of resolvers.
pub(crate) struct CoercionIndex {
    enums: HashMap<String, Vec<(String, JsonValue)>>,
    scalars: HashMap<String, ScalarRuntime>,
    inputs: HashMap<String, InputIndex>,
    abstracts: HashMap<String, Option<TypeResolver>>,
    convert_names_case: bool,
}

struct InputIndex {
    out_names: HashMap<String, String>,
    fields: HashMap<String, TypeShape>,
}

impl CoercionIndex {
    fn build(document: &ServiceDocument, bindings: &SchemaBindings) -> Self {
        let mut enums = HashMap::new();
        let mut inputs = HashMap::new();
        let mut abstracts = HashMap::new();

        for definition in &document.definitions {
            let TypeSystemDefinition::Type(definition) = definition else {
                continue;
            };
            let name = definition.node.name.node.to_string();

            match &definition.node.kind {
                TypeKind::Enum(node) => {
                    // Identity mapping for every declared member, with
                    // bound member values layered on top.
                    let mut members: Vec<(String, JsonValue)> = node
                        .values
                        .iter()
                        .map(|value| {
                            let member = value.node.value.node.to_string();
                            (member.clone(), JsonValue::String(member))
                        })
                        .collect();
                    if let Some(bound) = bindings.enums.get(&name) {
                        for (member, value) in bound {
                            if let Some(entry) =
                                members.iter_mut().find(|(name, _)| name == member)
                            {
                                entry.1 = value.clone();
                            }
                        }
                    }
                    enums.insert(name, members);
                }
                TypeKind::InputObject(input) => {
                    let bound = bindings.inputs.get(&name);
                    let mut out_names = HashMap::new();
                    let mut fields = HashMap::new();
                    for field in &input.fields {
                        let wire = field.node.name.node.to_string();
                        let out = bound
                            .and_then(|map| map.get(&wire).cloned())
                            .unwrap_or_else(|| {
                                if bindings.convert_names_case {
                                    convert_graphql_name(&wire)
                                } else {
                                    wire.clone()
                                }
                            });
                        out_names.insert(wire.clone(), out);
                        fields.insert(wire, TypeShape::of(&field.node.ty.node));
                    }
                    inputs.insert(name, InputIndex { out_names, fields });
                }
                TypeKind::Union(_) | TypeKind::Interface(_) => {
                    let type_resolver = bindings
                        .abstracts
                        .get(&name)
                        .and_then(|runtime| runtime.type_resolver.clone());
                    abstracts.insert(name, type_resolver);
                }
                _ => {}
            }
        }

        Self {
            enums,
            scalars: bindings.scalars.clone(),
            inputs,
            abstracts,
            convert_names_case: bindings.convert_names_case,
        }
    }
}

/// Converts an argument accessor to untyped JSON.
fn accessor_to_json(value: &ValueAccessor<'_>) -> JsonValue {
    if value.is_null() {
        return JsonValue::Null;
    }
    if let Ok(boolean) = value.boolean() {
        return JsonValue::Bool(boolean);
    }
    if let Ok(int) = value.i64() {
        return JsonValue::from(int);
    }
    if let Ok(int) = value.u64() {
        return JsonValue::from(int);
    }
    if let Ok(float) = value.f64() {
        return JsonValue::from(float);
    }
    if let Ok(string) = value.string() {
        return JsonValue::String(string.to_string());
    }
    if let Ok(name) = value.enum_name() {
        return JsonValue::String(name.to_string());
    }
    if let Ok(list) = value.list() {
        return JsonValue::Array(list.iter().map(|item| accessor_to_json(&item)).collect());
    }
    if let Ok(object) = value.object() {
        return JsonValue::Object(
            object
                .iter()
                .map(|(key, item)| (key.to_string(), accessor_to_json(&item)))
                .collect(),
        );
    }
    JsonValue::Null
}

/// Coerces an incoming wire value to the internal representation the
/// resolver sees.
fn coerce_input(
    index: &CoercionIndex,
    value: JsonValue,
    shape: &TypeShape,
) -> Result<JsonValue, async_graphql::Error> {
    if value.is_null() {
        return Ok(value);
    }

    match shape {
        TypeShape::List(inner) => match value {
            JsonValue::Array(items) => {
                let mut coerced = Vec::with_capacity(items.len());
                for item in items {
                    coerced.push(coerce_input(index, item, inner)?);
                }
                Ok(JsonValue::Array(coerced))
            }
            // Input coercion wraps a single value into a list.
            single => Ok(JsonValue::Array(vec![coerce_input(index, single, inner)?])),
        },
        TypeShape::Named(name) => {
            if let Some(members) = index.enums.get(name) {
                if let JsonValue::String(member) = &value {
                    if let Some((_, internal)) =
                        members.iter().find(|(name, _)| name == member)
                    {
                        return Ok(internal.clone());
                    }
                }
                return Ok(value);
            }
            if let Some(scalar) = index.scalars.get(name) {
                return (scalar.parse_value)(value);
            }
            if let Some(input) = index.inputs.get(name) {
                if let JsonValue::Object(fields) = value {
                    let mut coerced = JsonMap::new();
                    for (wire, item) in fields {
                        let out = input
                            .out_names
                            .get(&wire)
                            .cloned()
                            .unwrap_or_else(|| wire.clone());
                        let item = match input.fields.get(&wire) {
                            Some(shape) => coerce_input(index, item, shape)?,
                            None => item,
                        };
                        coerced.insert(out, item);
                    }
                    return Ok(JsonValue::Object(coerced));
                }
                return Ok(value);
            }
            Ok(value)
        }
    }
}

/// Converts a resolver's JSON result to the engine value for the field,
/// applying enum reverse maps, scalar serialization and abstract-type
/// resolution.
fn output_field_value(
    index: &CoercionIndex,
    value: JsonValue,
    shape: &TypeShape,
) -> Result<Option<FieldValue<'static>>, async_graphql::Error> {
    if value.is_null() {
        return Ok(None);
    }

    match shape {
        TypeShape::List(inner) => {
            let items = match value {
                JsonValue::Array(items) => items,
                single => vec![single],
            };
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(
                    output_field_value(index, item, inner)?.unwrap_or(FieldValue::NULL),
                );
            }
            Ok(Some(FieldValue::list(values)))
        }
        TypeShape::Named(name) => {
            if let Some(members) = index.enums.get(name) {
                let member = members
                    .iter()
                    .find(|(_, internal)| internal == &value)
                    .map(|(member, _)| member.clone())
                    .or_else(|| match &value {
                        JsonValue::String(member) => Some(member.clone()),
                        _ => None,
                    })
                    .ok_or_else(|| {
                        async_graphql::Error::new(format!(
                            "Value '{value}' has no member in enum '{name}'"
                        ))
                    })?;
                return Ok(Some(FieldValue::value(Value::Enum(Name::new(member)))));
            }
            if let Some(scalar) = index.scalars.get(name) {
                let wire = (scalar.serialize)(value)?;
                return Ok(Some(FieldValue::value(to_engine_value(wire)?)));
            }
            if let Some(type_resolver) = index.abstracts.get(name) {
                let concrete = type_resolver
                    .as_ref()
                    .and_then(|resolver| resolver.resolve(&value))
                    .or_else(|| {
                        value
                            .get("__typename")
                            .and_then(JsonValue::as_str)
                            .map(str::to_string)
                    })
                    .ok_or_else(|| {
                        async_graphql::Error::new(format!(
                            "Can't resolve the concrete type of a '{name}' value; bind a type resolver or include a '__typename' property"
                        ))
                    })?;
                let value = to_engine_value(value)?;
                return Ok(Some(FieldValue::value(value).with_type(concrete)));
            }
            Ok(Some(FieldValue::value(to_engine_value(value)?)))
        }
    }
}

/// Converts a resolver's JSON result to a plain engine value, for
/// subscription streams (which carry values, not field values). Enum
/// and scalar conversions still apply; abstract-typed results pass
/// through untagged.
fn output_engine_value(
    index: &CoercionIndex,
    value: JsonValue,
    shape: &TypeShape,
) -> Result<Value, async_graphql::Error> {
    if value.is_null() {
        return Ok(Value::Null);
    }

    match shape {
        TypeShape::List(inner) => {
            let items = match value {
                JsonValue::Array(items) => items,
                single => vec![single],
            };
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(output_engine_value(index, item, inner)?);
            }
            Ok(Value::List(values))
        }
        TypeShape::Named(name) => {
            if let Some(members) = index.enums.get(name) {
                if let Some((member, _)) =
                    members.iter().find(|(_, internal)| internal == &value)
                {
                    return Ok(Value::Enum(Name::new(member)));
                }
            }
            if let Some(scalar) = index.scalars.get(name) {
                return to_engine_value((scalar.serialize)(value)?);
            }
            to_engine_value(value)
        }
    }
}

fn to_engine_value(value: JsonValue) -> Result<Value, async_graphql::Error> {
    json_to_const_value(&value).map_err(|err| async_graphql::Error::new(err.to_string()))
}
