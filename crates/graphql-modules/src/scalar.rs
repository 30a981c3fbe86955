//! Scalar type declarations.

use std::sync::Arc;

use async_graphql::Value;
use async_graphql_parser::types::{TypeDefinition, TypeKind};
use serde_json::Value as JsonValue;

use crate::ast::{DefinitionKind, description_node, name_node};
use crate::declaration::{DeclaredType, TypeDeclaration, TypeHeader, parse_header_schema};
use crate::error::SchemaError;
use crate::resolver::FieldResult;
use crate::value::const_value_to_json;

/// A pluggable scalar conversion: outgoing serialization or incoming
/// value parsing.
pub type ScalarFn = Arc<dyn Fn(JsonValue) -> FieldResult + Send + Sync>;

/// A pluggable literal parser: query-literal value to internal value.
pub type LiteralFn = Arc<dyn Fn(&Value) -> FieldResult + Send + Sync>;

/// Builder for a GraphQL scalar type declaration.
///
/// A scalar carries three pluggable conversions: `serialize` (outgoing
/// value to wire value), `parse_value` (wire value to internal value)
/// and `parse_literal` (query literal to internal value). All three
/// default to identity-like behavior; `parse_literal` defaults to
/// `parse_value` applied to the literal's untyped value.
///
/// ```
/// use graphql_modules::ScalarType;
///
/// let datetime = ScalarType::new("DateTimeScalar")
///     .serialize(|value| Ok(value))
///     .define()
///     .unwrap();
/// assert_eq!(datetime.graphql_name(), Some("DateTime"));
/// ```
#[derive(Clone)]
pub struct ScalarType {
    header: TypeHeader,
    serialize: Option<ScalarFn>,
    parse_value: Option<ScalarFn>,
    parse_literal: Option<LiteralFn>,
}

impl ScalarType {
    /// Starts a scalar type declaration with the given identifier.
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            header: TypeHeader::new(ident),
            serialize: None,
            parse_value: None,
            parse_literal: None,
        }
    }

    /// Overrides the derived GraphQL type name.
    pub fn graphql_name(mut self, name: impl Into<String>) -> Self {
        self.header.graphql_name = Some(name.into());
        self
    }

    /// Declares the scalar as schema text.
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

    /// Adds a declaration this scalar requires.
    pub fn requires(mut self, declaration: &DeclaredType) -> Self {
        self.header.requires.push(declaration.clone());
        self
    }

    /// Sets the outgoing serialization function.
    pub fn serialize<F>(mut self, serialize: F) -> Self
    where
        F: Fn(JsonValue) -> FieldResult + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(serialize));
        self
    }

    /// Sets the incoming value parser.
    pub fn parse_value<F>(mut self, parse_value: F) -> Self
    where
        F: Fn(JsonValue) -> FieldResult + Send + Sync + 'static,
    {
        self.parse_value = Some(Arc::new(parse_value));
        self
    }

    /// Sets the literal parser, overriding the default of `parse_value`
    /// applied to the literal's untyped value.
    pub fn parse_literal<F>(mut self, parse_literal: F) -> Self
    where
        F: Fn(&Value) -> FieldResult + Send + Sync + 'static,
    {
        self.parse_literal = Some(Arc::new(parse_literal));
        self
    }

    /// Validates the declaration and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid schema text or
    /// name/description conflicts.
    pub fn define(self) -> Result<DeclaredType, SchemaError> {
        if self.header.abstract_ {
            return Ok(DeclaredType::new(TypeDeclaration::Scalar(self), None));
        }

        let definition = parse_header_schema(&self.header, DefinitionKind::Scalar)?;
        let name = self
            .header
            .resolve_name(definition.as_ref().map(|d| d.name.node.as_str()))?;
        if let Some(definition) = &definition {
            self.header.validate_description(definition)?;
        }

        Ok(DeclaredType::new(TypeDeclaration::Scalar(self), Some(name)))
    }

    pub(crate) fn header(&self) -> &TypeHeader {
        &self.header
    }

    pub(crate) fn compile(&self, name: String) -> Result<ScalarModel, SchemaError> {
        let ast = match &self.header.schema {
            Some(schema) => {
                let mut definition = crate::ast::parse_type_definition(
                    &self.header.ident,
                    schema,
                    DefinitionKind::Scalar,
                )?;
                if definition.description.is_none() {
                    definition.description = description_node(self.header.description.as_deref());
                }
                definition
            }
            None => TypeDefinition {
                extend: false,
                description: description_node(self.header.description.as_deref()),
                name: name_node(&name),
                directives: Vec::new(),
                kind: TypeKind::Scalar,
            },
        };

        let serialize = self.serialize.clone().unwrap_or_else(identity_fn);
        let parse_value = self.parse_value.clone().unwrap_or_else(identity_fn);
        let parse_literal = match &self.parse_literal {
            Some(parse_literal) => parse_literal.clone(),
            None => {
                let parse_value = parse_value.clone();
                Arc::new(move |literal: &Value| parse_value(const_value_to_json(literal)))
            }
        };

        Ok(ScalarModel {
            name,
            ast,
            serialize,
            parse_value,
            parse_literal,
        })
    }
}

fn identity_fn() -> ScalarFn {
    Arc::new(|value| Ok(value))
}

/// Compiled scalar model.
pub(crate) struct ScalarModel {
    pub name: String,
    pub ast: TypeDefinition,
    pub serialize: ScalarFn,
    pub parse_value: ScalarFn,
    pub parse_literal: LiteralFn,
}
