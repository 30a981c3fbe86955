//! Field, argument and resolver declarations for object-like types.
//!
//! Objects and interfaces share this machinery: fields are declared
//! explicitly (no reflection), resolvers either ride on the field or are
//! attached afterwards by field identifier, and both paths merge into
//! one validated field list at `define()` time.

use std::collections::{HashMap, HashSet};

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{FieldDefinition, InputValueDefinition};
use serde_json::Value as JsonValue;

use crate::ast::{description_node, name_node, node};
use crate::declaration::TypeSpec;
use crate::error::{SchemaError, join_names};
use crate::name::convert_name_to_graphql;
use crate::registry::TypeRegistry;
use crate::resolver::Resolver;
use crate::value::json_to_const_value;

/// A declared field of an object or interface type.
#[derive(Clone)]
pub struct Field {
    pub(crate) ident: String,
    pub(crate) graphql_name: Option<String>,
    pub(crate) ty: Option<TypeSpec>,
    pub(crate) description: Option<String>,
    pub(crate) resolver: Option<Resolver>,
    pub(crate) args: Vec<Argument>,
}

impl Field {
    /// Declares a field with an identifier and a GraphQL type. The wire
    /// name is the camelCase conversion of the identifier unless
    /// overridden with [`Field::graphql_name`].
    pub fn new(ident: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            ident: ident.into(),
            graphql_name: None,
            ty: Some(ty),
            description: None,
            resolver: None,
            args: Vec::new(),
        }
    }

    /// Declares a field whose type comes from an attached resolver.
    pub fn untyped(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            graphql_name: None,
            ty: None,
            description: None,
            resolver: None,
            args: Vec::new(),
        }
    }

    /// Overrides the GraphQL field name.
    pub fn graphql_name(mut self, name: impl Into<String>) -> Self {
        self.graphql_name = Some(name.into());
        self
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches a resolver to this field.
    pub fn resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Declares a field argument.
    pub fn argument(mut self, argument: Argument) -> Self {
        self.args.push(argument);
        self
    }
}

/// A declared field argument.
///
/// The identifier doubles as the out name: the wire name is its
/// camelCase conversion (unless overridden), and incoming values are
/// handed to the resolver keyed by the identifier.
#[derive(Clone)]
pub struct Argument {
    pub(crate) ident: String,
    pub(crate) graphql_name: Option<String>,
    pub(crate) ty: Option<TypeSpec>,
    pub(crate) description: Option<String>,
    pub(crate) default_value: Option<JsonValue>,
}

impl Argument {
    /// Declares an argument with an identifier and a GraphQL type.
    pub fn new(ident: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            ident: ident.into(),
            graphql_name: None,
            ty: Some(ty),
            description: None,
            default_value: None,
        }
    }

    /// Declares argument options without a type, for amending arguments
    /// that schema text already declares.
    pub fn options(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            graphql_name: None,
            ty: None,
            description: None,
            default_value: None,
        }
    }

    /// Overrides the GraphQL argument name.
    pub fn graphql_name(mut self, name: impl Into<String>) -> Self {
        self.graphql_name = Some(name.into());
        self
    }

    /// Sets the argument description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the argument default value.
    pub fn default_value(mut self, value: JsonValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub(crate) fn wire_name(&self) -> String {
        self.graphql_name
            .clone()
            .unwrap_or_else(|| convert_name_to_graphql(&self.ident))
    }
}

/// A resolver attached to a field declared elsewhere on the same type,
/// optionally supplying the field's type, description and argument
/// options.
#[derive(Clone)]
pub struct FieldResolver {
    pub(crate) field: String,
    pub(crate) resolver: Resolver,
    pub(crate) ty: Option<TypeSpec>,
    pub(crate) description: Option<String>,
    pub(crate) args: Vec<Argument>,
}

impl FieldResolver {
    /// Attaches a resolver to the field with the given identifier.
    pub fn new(field: impl Into<String>, resolver: Resolver) -> Self {
        Self {
            field: field.into(),
            resolver,
            ty: None,
            description: None,
            args: Vec::new(),
        }
    }

    /// Supplies the field's GraphQL type.
    pub fn of_type(mut self, ty: TypeSpec) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Sets the field description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares or amends a field argument.
    pub fn argument(mut self, argument: Argument) -> Self {
        self.args.push(argument);
        self
    }
}

/// One fully merged and validated field, ready for compilation.
pub(crate) struct FieldData {
    pub ident: String,
    pub name: String,
    pub ty: TypeSpec,
    pub description: Option<String>,
    pub resolver: Option<Resolver>,
    pub args: Vec<Argument>,
}

/// Merges declared fields with attached resolvers and validates the
/// combination, producing the final field list in declaration order.
pub(crate) fn build_fields(
    ident: &str,
    fields: &[Field],
    resolvers: &[FieldResolver],
) -> Result<Vec<FieldData>, SchemaError> {
    let field_idents: Vec<&str> = fields.iter().map(|f| f.ident.as_str()).collect();

    let mut attached: HashMap<&str, &FieldResolver> = HashMap::new();
    for resolver in resolvers {
        if !field_idents.contains(&resolver.field.as_str()) {
            return Err(SchemaError::UndefinedResolverField {
                ident: ident.to_string(),
                field: resolver.field.clone(),
                fields: join_names(&field_idents),
            });
        }
        if attached.insert(resolver.field.as_str(), resolver).is_some() {
            return Err(SchemaError::DuplicateResolver {
                ident: ident.to_string(),
                field: resolver.field.clone(),
            });
        }
    }

    let mut data = Vec::with_capacity(fields.len());
    let mut names = HashSet::new();

    for field in fields {
        let attached = attached.get(field.ident.as_str());

        if let Some(resolver) = attached {
            if field.resolver.is_some() {
                return Err(SchemaError::DuplicateResolver {
                    ident: ident.to_string(),
                    field: field.ident.clone(),
                });
            }
            if field.description.is_some() && resolver.description.is_some() {
                return Err(SchemaError::DuplicateFieldDescription {
                    ident: ident.to_string(),
                    field: field.ident.clone(),
                });
            }
            if !field.args.is_empty() && !resolver.args.is_empty() {
                return Err(SchemaError::DuplicateFieldArguments {
                    ident: ident.to_string(),
                    field: field.ident.clone(),
                });
            }
        }

        let ty = field
            .ty
            .clone()
            .or_else(|| attached.and_then(|r| r.ty.clone()))
            .ok_or_else(|| SchemaError::MissingFieldType {
                ident: ident.to_string(),
                field: field.ident.clone(),
            })?;

        let name = field
            .graphql_name
            .clone()
            .unwrap_or_else(|| convert_name_to_graphql(&field.ident));
        if !names.insert(name.clone()) {
            return Err(SchemaError::DuplicateFieldName {
                ident: ident.to_string(),
                name,
            });
        }

        let args = if field.args.is_empty() {
            attached.map(|r| r.args.clone()).unwrap_or_default()
        } else {
            field.args.clone()
        };
        for arg in &args {
            if arg.ty.is_none() {
                return Err(SchemaError::MissingArgumentType {
                    ident: ident.to_string(),
                    field: field.ident.clone(),
                    argument: arg.ident.clone(),
                });
            }
        }

        data.push(FieldData {
            ident: field.ident.clone(),
            name,
            ty,
            description: field
                .description
                .clone()
                .or_else(|| attached.and_then(|r| r.description.clone())),
            resolver: field
                .resolver
                .clone()
                .or_else(|| attached.map(|r| r.resolver.clone())),
            args,
        });
    }

    Ok(data)
}

/// Validates aliases against the final field list: an alias must target
/// a declared field without a custom resolver.
pub(crate) fn validate_aliases(
    ident: &str,
    aliases: &[(String, String)],
    field_idents: &[&str],
    resolved_fields: &HashSet<String>,
) -> Result<(), SchemaError> {
    for (alias, _) in aliases {
        if !field_idents.contains(&alias.as_str()) {
            return Err(SchemaError::UndefinedAlias {
                ident: ident.to_string(),
                alias: alias.clone(),
                fields: join_names(field_idents),
            });
        }
        if resolved_fields.contains(alias) {
            return Err(SchemaError::AliasedResolverField {
                ident: ident.to_string(),
                field: alias.clone(),
            });
        }
    }
    Ok(())
}

/// Builds the AST field nodes, resolver map and argument out-name maps
/// for a validated field list.
pub(crate) struct CompiledFields {
    pub nodes: Vec<Positioned<FieldDefinition>>,
    pub resolvers: HashMap<String, Resolver>,
    pub out_names: HashMap<String, HashMap<String, String>>,
}

pub(crate) fn compile_fields(
    ident: &str,
    data: &[FieldData],
    registry: &TypeRegistry,
) -> Result<CompiledFields, SchemaError> {
    let mut nodes = Vec::with_capacity(data.len());
    let mut resolvers = HashMap::new();
    let mut out_names: HashMap<String, HashMap<String, String>> = HashMap::new();

    for field in data {
        let mut arguments = Vec::with_capacity(field.args.len());
        for arg in &field.args {
            arguments.push(node(compile_argument(ident, field, arg, registry)?));
        }

        nodes.push(node(FieldDefinition {
            description: description_node(field.description.as_deref()),
            name: name_node(&field.name),
            arguments,
            ty: node(field.ty.to_ast(registry)?),
            directives: Vec::new(),
        }));

        if let Some(resolver) = &field.resolver {
            resolvers.insert(field.name.clone(), resolver.clone());
        }
        if !field.args.is_empty() {
            let map = field
                .args
                .iter()
                .map(|arg| (arg.wire_name(), arg.ident.clone()))
                .collect();
            out_names.insert(field.name.clone(), map);
        }
    }

    Ok(CompiledFields {
        nodes,
        resolvers,
        out_names,
    })
}

fn compile_argument(
    ident: &str,
    field: &FieldData,
    arg: &Argument,
    registry: &TypeRegistry,
) -> Result<InputValueDefinition, SchemaError> {
    let ty = arg.ty.as_ref().ok_or_else(|| SchemaError::MissingArgumentType {
        ident: ident.to_string(),
        field: field.ident.clone(),
        argument: arg.ident.clone(),
    })?;

    let default_value = match &arg.default_value {
        Some(value) => Some(node(json_to_const_value(value).map_err(|_| {
            SchemaError::UnrepresentableDefault {
                ident: ident.to_string(),
                field: arg.ident.clone(),
            }
        })?)),
        None => None,
    };

    Ok(InputValueDefinition {
        description: description_node(arg.description.as_deref()),
        name: name_node(&arg.wire_name()),
        ty: node(ty.to_ast(registry)?),
        default_value,
        directives: Vec::new(),
    })
}

/// Validation for the schema-text mode shared by objects and interfaces:
/// schema text is authoritative for field declaration, resolvers and
/// argument options may only amend what it already declares.
pub(crate) fn validate_schema_mode_fields(
    ident: &str,
    definition_fields: &[Positioned<FieldDefinition>],
    fields: &[Field],
    resolvers: &[FieldResolver],
    aliases: &[(String, String)],
) -> Result<(), SchemaError> {
    if definition_fields.is_empty() {
        return Err(SchemaError::NoFields {
            ident: ident.to_string(),
        });
    }
    if !fields.is_empty() {
        return Err(SchemaError::FieldsWithSchema {
            ident: ident.to_string(),
        });
    }

    let field_names: Vec<&str> = definition_fields
        .iter()
        .map(|f| f.node.name.node.as_str())
        .collect();

    let mut resolved: HashSet<String> = HashSet::new();
    for resolver in resolvers {
        let definition = definition_fields
            .iter()
            .map(|f| &f.node)
            .find(|f| f.name.node.as_str() == resolver.field)
            .ok_or_else(|| SchemaError::UndefinedResolverField {
                ident: ident.to_string(),
                field: resolver.field.clone(),
                fields: join_names(&field_names),
            })?;

        if !resolved.insert(resolver.field.clone()) {
            return Err(SchemaError::DuplicateResolver {
                ident: ident.to_string(),
                field: resolver.field.clone(),
            });
        }

        if resolver.description.is_some() && definition.description.is_some() {
            return Err(SchemaError::DuplicateFieldDescription {
                ident: ident.to_string(),
                field: resolver.field.clone(),
            });
        }

        for arg in &resolver.args {
            let declared = definition
                .arguments
                .iter()
                .find(|a| a.node.name.node.as_str() == arg.ident)
                .ok_or_else(|| SchemaError::UndefinedArgument {
                    ident: ident.to_string(),
                    field: resolver.field.clone(),
                    argument: arg.ident.clone(),
                })?;

            if arg.graphql_name.is_some() {
                return Err(SchemaError::ArgumentOptionWithSchema {
                    ident: ident.to_string(),
                    field: resolver.field.clone(),
                    argument: arg.ident.clone(),
                    option: "name".to_string(),
                });
            }
            if arg.ty.is_some() {
                return Err(SchemaError::ArgumentOptionWithSchema {
                    ident: ident.to_string(),
                    field: resolver.field.clone(),
                    argument: arg.ident.clone(),
                    option: "type".to_string(),
                });
            }
            if arg.description.is_some() && declared.node.description.is_some() {
                return Err(SchemaError::ArgumentDescriptionConflict {
                    ident: ident.to_string(),
                    field: resolver.field.clone(),
                    argument: arg.ident.clone(),
                });
            }
        }
    }

    validate_aliases(ident, aliases, &field_names, &resolved)
}

/// Rebuilds schema-text fields with programmatic descriptions merged into
/// the slots schema text left empty.
pub(crate) fn merge_schema_mode_fields(
    definition_fields: Vec<Positioned<FieldDefinition>>,
    resolvers: &[FieldResolver],
) -> Vec<Positioned<FieldDefinition>> {
    definition_fields
        .into_iter()
        .map(|mut field| {
            let attached = resolvers
                .iter()
                .find(|r| r.field == field.node.name.node.as_str());

            if let Some(resolver) = attached {
                if field.node.description.is_none() {
                    field.node.description = description_node(resolver.description.as_deref());
                }
                for arg in &mut field.node.arguments {
                    if arg.node.description.is_none() {
                        let options = resolver
                            .args
                            .iter()
                            .find(|a| a.ident == arg.node.name.node.as_str());
                        if let Some(options) = options {
                            arg.node.description = description_node(options.description.as_deref());
                        }
                    }
                }
            }

            field
        })
        .collect()
}
