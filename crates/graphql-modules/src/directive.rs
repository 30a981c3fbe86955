//! Schema directive declarations.

use std::sync::Arc;

use async_graphql_parser::types::DirectiveDefinition;

use crate::ast::parse_directive_definition;
use crate::declaration::{DeclaredType, TypeDeclaration, TypeHeader};
use crate::error::SchemaError;
use crate::resolver::SchemaDirectiveVisitor;

/// Builder for a GraphQL schema directive declaration.
///
/// Directives must be declared as schema text. The optional visitor
/// wraps the resolvers of fields whose definition carries the
/// directive.
#[derive(Clone)]
pub struct DirectiveType {
    header: TypeHeader,
    visitor: Option<Arc<dyn SchemaDirectiveVisitor>>,
}

impl DirectiveType {
    /// Starts a directive declaration with the given identifier.
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            header: TypeHeader::new(ident),
            visitor: None,
        }
    }

    /// Declares the directive as schema text; required.
    pub fn schema(mut self, sdl: impl Into<String>) -> Self {
        self.header.schema = Some(sdl.into());
        self
    }

    /// Marks this declaration as an abstract building block.
    pub fn abstract_type(mut self) -> Self {
        self.header.abstract_ = true;
        self
    }

    /// Sets the visitor wrapping decorated field resolvers.
    pub fn visitor(mut self, visitor: Arc<dyn SchemaDirectiveVisitor>) -> Self {
        self.visitor = Some(visitor);
        self
    }

    /// Validates the declaration and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when schema text is missing or
    /// does not hold a single directive definition.
    pub fn define(self) -> Result<DeclaredType, SchemaError> {
        if self.header.abstract_ {
            return Ok(DeclaredType::new(TypeDeclaration::Directive(self), None));
        }

        let schema = self
            .header
            .schema
            .as_deref()
            .ok_or_else(|| SchemaError::MissingDirectiveSchema {
                ident: self.header.ident.clone(),
            })?;
        let definition = parse_directive_definition(&self.header.ident, schema)?;
        let name = self
            .header
            .resolve_name(Some(definition.name.node.as_str()))?;

        Ok(DeclaredType::new(
            TypeDeclaration::Directive(self),
            Some(name),
        ))
    }

    pub(crate) fn header(&self) -> &TypeHeader {
        &self.header
    }

    pub(crate) fn compile(&self) -> Result<DirectiveModel, SchemaError> {
        let schema = self
            .header
            .schema
            .as_deref()
            .ok_or_else(|| SchemaError::MissingDirectiveSchema {
                ident: self.header.ident.clone(),
            })?;
        let ast = parse_directive_definition(&self.header.ident, schema)?;

        Ok(DirectiveModel {
            name: ast.name.node.to_string(),
            ast,
            visitor: self.visitor.clone(),
        })
    }
}

/// Compiled directive model.
pub(crate) struct DirectiveModel {
    pub name: String,
    pub ast: DirectiveDefinition,
    pub visitor: Option<Arc<dyn SchemaDirectiveVisitor>>,
}
