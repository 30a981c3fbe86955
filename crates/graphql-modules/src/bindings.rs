//! Aggregated runtime bindings handed to the engine builder.
//!
//! Collects every model's and bindable's runtime behavior into per-type
//! lookup tables the schema builder consults while registering dynamic
//! types. Bindables are applied after models, so an untyped binding can
//! override a declaration's behavior for the same type name.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::bindables::Bindable;
use crate::model::GraphQLModel;
use crate::resolver::{Resolver, SchemaDirectiveVisitor, SubscriptionResolver, TypeResolver};
use crate::scalar::ScalarFn;

/// Runtime bindings for one object type.
#[derive(Clone, Default)]
pub(crate) struct ObjectRuntime {
    pub resolvers: HashMap<String, Resolver>,
    pub aliases: HashMap<String, String>,
    pub out_names: HashMap<String, HashMap<String, String>>,
    pub subscriptions: HashMap<String, SubscriptionResolver>,
}

/// Runtime bindings for one union or interface type.
#[derive(Clone, Default)]
pub(crate) struct AbstractRuntime {
    pub type_resolver: Option<TypeResolver>,
    pub resolvers: HashMap<String, Resolver>,
}

/// Runtime bindings for one scalar type. Literals reach the engine as
/// values, so only `serialize` and `parse_value` act at runtime.
#[derive(Clone)]
pub(crate) struct ScalarRuntime {
    pub serialize: ScalarFn,
    pub parse_value: ScalarFn,
}

/// Everything the engine builder needs to wire runtime behavior onto
/// the schema it constructs.
#[derive(Default)]
pub(crate) struct SchemaBindings {
    pub objects: HashMap<String, ObjectRuntime>,
    pub abstracts: HashMap<String, AbstractRuntime>,
    pub inputs: HashMap<String, HashMap<String, String>>,
    pub enums: HashMap<String, Vec<(String, JsonValue)>>,
    pub scalars: HashMap<String, ScalarRuntime>,
    pub visitors: HashMap<String, Arc<dyn SchemaDirectiveVisitor>>,
    pub convert_names_case: bool,
}

impl SchemaBindings {
    /// Folds a compiled model's runtime behavior in.
    pub(crate) fn add_model(&mut self, model: &GraphQLModel) {
        match model {
            GraphQLModel::Object(model) => {
                let entry = self.objects.entry(model.name.clone()).or_default();
                entry.resolvers.extend(model.resolvers.clone());
                entry.aliases.extend(model.aliases.clone());
                entry.out_names.extend(model.out_names.clone());
                entry.subscriptions.extend(model.subscriptions.clone());
            }
            GraphQLModel::Interface(model) => {
                let entry = self.abstracts.entry(model.name.clone()).or_default();
                entry.resolvers.extend(model.resolvers.clone());
                if model.type_resolver.is_some() {
                    entry.type_resolver = model.type_resolver.clone();
                }
            }
            GraphQLModel::Union(model) => {
                let entry = self.abstracts.entry(model.name.clone()).or_default();
                if model.type_resolver.is_some() {
                    entry.type_resolver = model.type_resolver.clone();
                }
            }
            GraphQLModel::Input(model) => {
                self.inputs
                    .entry(model.name.clone())
                    .or_default()
                    .extend(model.out_names.clone());
            }
            GraphQLModel::Enum(model) => {
                self.enums
                    .entry(model.name.clone())
                    .or_default()
                    .extend(model.members.clone());
            }
            GraphQLModel::Scalar(model) => {
                self.scalars.insert(
                    model.name.clone(),
                    ScalarRuntime {
                        serialize: model.serialize.clone(),
                        parse_value: model.parse_value.clone(),
                    },
                );
            }
            GraphQLModel::Directive(model) => {
                if let Some(visitor) = &model.visitor {
                    self.visitors.insert(model.name.clone(), visitor.clone());
                }
            }
        }
    }

    /// Folds an untyped binding in.
    pub(crate) fn add_bindable(&mut self, bindable: &Bindable) {
        match bindable {
            Bindable::Object(bindable) => {
                let entry = self.objects.entry(bindable.name.clone()).or_default();
                entry.resolvers.extend(bindable.resolvers.clone());
                entry.aliases.extend(bindable.aliases.clone());
                for (field, out_names) in &bindable.out_names {
                    entry
                        .out_names
                        .entry(field.clone())
                        .or_default()
                        .extend(out_names.clone());
                }
                entry.subscriptions.extend(bindable.subscriptions.clone());
            }
            Bindable::Scalar(bindable) => {
                let identity: ScalarFn = Arc::new(|value| Ok(value));
                self.scalars.insert(
                    bindable.name.clone(),
                    ScalarRuntime {
                        serialize: bindable.serialize.clone().unwrap_or_else(|| identity.clone()),
                        parse_value: bindable.parse_value.clone().unwrap_or(identity),
                    },
                );
            }
            Bindable::Enum(bindable) => {
                self.enums
                    .entry(bindable.name.clone())
                    .or_default()
                    .extend(bindable.members.clone());
            }
            Bindable::Abstract(bindable) => {
                let entry = self.abstracts.entry(bindable.name.clone()).or_default();
                entry.resolvers.extend(bindable.resolvers.clone());
                if bindable.type_resolver.is_some() {
                    entry.type_resolver = bindable.type_resolver.clone();
                }
            }
        }
    }
}
