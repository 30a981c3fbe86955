//! Input type declarations.

use std::collections::{HashMap, HashSet};

use async_graphql_parser::types::{InputObjectType, TypeDefinition, TypeKind};
use serde_json::Value as JsonValue;

use crate::ast::{DefinitionKind, description_node, name_node, node};
use crate::declaration::{DeclaredType, TypeDeclaration, TypeHeader, TypeSpec, parse_header_schema};
use crate::error::SchemaError;
use crate::name::{convert_graphql_name, convert_name_to_graphql};
use crate::registry::TypeRegistry;
use crate::value::json_to_const_value;

/// A declared field of an input type.
///
/// The identifier doubles as the out name: incoming wire values are
/// handed to resolvers keyed by it.
#[derive(Clone)]
pub struct InputField {
    ident: String,
    graphql_name: Option<String>,
    ty: TypeSpec,
    description: Option<String>,
    default_value: Option<JsonValue>,
}

impl InputField {
    /// Declares an input field with an identifier and a GraphQL type.
    pub fn new(ident: impl Into<String>, ty: TypeSpec) -> Self {
        Self {
            ident: ident.into(),
            graphql_name: None,
            ty,
            description: None,
            default_value: None,
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

    /// Sets the field default value.
    pub fn default_value(mut self, value: JsonValue) -> Self {
        self.default_value = Some(value);
        self
    }

    fn wire_name(&self) -> String {
        self.graphql_name
            .clone()
            .unwrap_or_else(|| convert_name_to_graphql(&self.ident))
    }
}

/// Builder for a GraphQL input type declaration.
///
/// ```
/// use graphql_modules::{InputField, InputType, TypeSpec};
///
/// let input = InputType::new("SearchInput")
///     .field(InputField::new("query", TypeSpec::String.nullable()))
///     .field(InputField::new("min_age", TypeSpec::Int.nullable()))
///     .define()
///     .unwrap();
/// assert_eq!(input.graphql_name(), Some("SearchInput"));
/// ```
#[derive(Clone)]
pub struct InputType {
    header: TypeHeader,
    fields: Vec<InputField>,
    out_names: Vec<(String, String)>,
}

impl InputType {
    /// Starts an input type declaration with the given identifier.
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            header: TypeHeader::new(ident),
            fields: Vec::new(),
            out_names: Vec::new(),
        }
    }

    /// Overrides the derived GraphQL type name.
    pub fn graphql_name(mut self, name: impl Into<String>) -> Self {
        self.header.graphql_name = Some(name.into());
        self
    }

    /// Declares the whole type as schema text.
    pub fn schema(mut self, sdl: impl Into<String>) -> Self {
        self.header.schema = Some(sdl.into());
        self
    }

    /// Sets the type description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.header.description = Some(description.into());
        self
    }

    /// Marks this declaration as an abstract building block.
    pub fn abstract_type(mut self) -> Self {
        self.header.abstract_ = true;
        self
    }

    /// Adds a declaration this type requires.
    pub fn requires(mut self, declaration: &DeclaredType) -> Self {
        self.header.requires.push(declaration.clone());
        self
    }

    /// Declares an input field.
    pub fn field(mut self, field: InputField) -> Self {
        self.fields.push(field);
        self
    }

    /// Maps a schema-text field to an out name. Only valid together
    /// with schema text; programmatic fields already carry their out
    /// name as the identifier.
    pub fn out_name(mut self, field: impl Into<String>, out_name: impl Into<String>) -> Self {
        self.out_names.push((field.into(), out_name.into()));
        self
    }

    /// Validates the declaration and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for name/description conflicts,
    /// out names without schema text or for undefined fields, duplicate
    /// field or out names, and default values without a GraphQL
    /// representation.
    pub fn define(self) -> Result<DeclaredType, SchemaError> {
        if self.header.abstract_ {
            return Ok(DeclaredType::new(TypeDeclaration::Input(self), None));
        }

        let definition = parse_header_schema(&self.header, DefinitionKind::InputObject)?;
        let name = self
            .header
            .resolve_name(definition.as_ref().map(|d| d.name.node.as_str()))?;

        match &definition {
            Some(definition) => {
                self.header.validate_description(definition)?;
                let fields = match &definition.kind {
                    TypeKind::InputObject(input) => &input.fields,
                    _ => unreachable!("parse checked the definition kind"),
                };
                if fields.is_empty() {
                    return Err(SchemaError::NoFields {
                        ident: self.header.ident.clone(),
                    });
                }
                if !self.fields.is_empty() {
                    return Err(SchemaError::FieldsWithSchema {
                        ident: self.header.ident.clone(),
                    });
                }

                let field_names: Vec<&str> =
                    fields.iter().map(|f| f.node.name.node.as_str()).collect();
                let mut used = HashSet::new();
                for (field, out_name) in &self.out_names {
                    if !field_names.contains(&field.as_str()) {
                        return Err(SchemaError::UndefinedOutName {
                            ident: self.header.ident.clone(),
                            field: field.clone(),
                        });
                    }
                    if !used.insert(out_name.clone()) {
                        return Err(SchemaError::DuplicateOutName {
                            ident: self.header.ident.clone(),
                            out_name: out_name.clone(),
                        });
                    }
                }
            }
            None => {
                if !self.out_names.is_empty() {
                    return Err(SchemaError::OutNamesWithoutSchema {
                        ident: self.header.ident.clone(),
                    });
                }

                let mut names = HashSet::new();
                for field in &self.fields {
                    if !names.insert(field.wire_name()) {
                        return Err(SchemaError::DuplicateFieldName {
                            ident: self.header.ident.clone(),
                            name: field.wire_name(),
                        });
                    }
                    if let Some(default) = &field.default_value {
                        json_to_const_value(default).map_err(|_| {
                            SchemaError::UnrepresentableDefault {
                                ident: self.header.ident.clone(),
                                field: field.ident.clone(),
                            }
                        })?;
                    }
                }
                if self.fields.is_empty() {
                    return Err(SchemaError::NoFields {
                        ident: self.header.ident.clone(),
                    });
                }
            }
        }

        Ok(DeclaredType::new(TypeDeclaration::Input(self), Some(name)))
    }

    pub(crate) fn header(&self) -> &TypeHeader {
        &self.header
    }

    pub(crate) fn dependencies(
        &self,
        registry: &TypeRegistry,
    ) -> Result<Vec<DeclaredType>, SchemaError> {
        let mut dependencies = Vec::new();
        for field in &self.fields {
            dependencies.extend(field.ty.referenced(registry)?);
        }
        Ok(dependencies)
    }

    pub(crate) fn compile(
        &self,
        name: String,
        registry: &TypeRegistry,
    ) -> Result<InputModel, SchemaError> {
        if let Some(schema) = &self.header.schema {
            let mut definition = crate::ast::parse_type_definition(
                &self.header.ident,
                schema,
                DefinitionKind::InputObject,
            )?;
            if definition.description.is_none() {
                definition.description = description_node(self.header.description.as_deref());
            }

            // Explicit out names first; remaining schema fields get the
            // snake_case conversion of their wire name.
            let mut out_names: HashMap<String, String> = self.out_names.iter().cloned().collect();
            if let TypeKind::InputObject(input) = &definition.kind {
                for field in &input.fields {
                    let wire = field.node.name.node.as_str();
                    out_names
                        .entry(wire.to_string())
                        .or_insert_with(|| convert_graphql_name(wire));
                }
            }

            return Ok(InputModel {
                name,
                ast: definition,
                out_names,
            });
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut out_names = HashMap::new();
        for field in &self.fields {
            let default_value = match &field.default_value {
                Some(value) => Some(node(json_to_const_value(value).map_err(|_| {
                    SchemaError::UnrepresentableDefault {
                        ident: self.header.ident.clone(),
                        field: field.ident.clone(),
                    }
                })?)),
                None => None,
            };

            fields.push(node(async_graphql_parser::types::InputValueDefinition {
                description: description_node(field.description.as_deref()),
                name: name_node(&field.wire_name()),
                ty: node(field.ty.to_ast(registry)?),
                default_value,
                directives: Vec::new(),
            }));
            out_names.insert(field.wire_name(), field.ident.clone());
        }

        Ok(InputModel {
            name: name.clone(),
            ast: TypeDefinition {
                extend: false,
                description: description_node(self.header.description.as_deref()),
                name: name_node(&name),
                directives: Vec::new(),
                kind: TypeKind::InputObject(InputObjectType { fields }),
            },
            out_names,
        })
    }
}

/// Compiled input model.
pub(crate) struct InputModel {
    pub name: String,
    pub ast: TypeDefinition,
    pub out_names: HashMap<String, String>,
}
