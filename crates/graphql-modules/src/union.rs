//! Union type declarations.

use async_graphql_parser::types::{TypeDefinition, TypeKind, UnionType as AstUnionType};

use crate::ast::{DefinitionKind, description_node, name_node};
use crate::declaration::{DeclaredType, TypeDeclaration, TypeHeader, parse_header_schema};
use crate::error::SchemaError;
use crate::resolver::TypeResolver;

/// Builder for a GraphQL union type declaration.
///
/// Members are other object declarations; in schema-text mode the
/// members come from the text and referenced declarations are listed
/// with `requires`. The optional type resolver maps a runtime value to
/// its concrete member type name; without one, the value's `__typename`
/// property is consulted.
#[derive(Clone)]
pub struct UnionType {
    header: TypeHeader,
    members: Vec<DeclaredType>,
    type_resolver: Option<TypeResolver>,
}

impl UnionType {
    /// Starts a union type declaration with the given identifier.
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            header: TypeHeader::new(ident),
            members: Vec::new(),
            type_resolver: None,
        }
    }

    /// Overrides the derived GraphQL type name.
    pub fn graphql_name(mut self, name: impl Into<String>) -> Self {
        self.header.graphql_name = Some(name.into());
        self
    }

    /// Declares the union as schema text.
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

    /// Adds a declaration this union requires.
    pub fn requires(mut self, declaration: &DeclaredType) -> Self {
        self.header.requires.push(declaration.clone());
        self
    }

    /// Adds a member type.
    pub fn member(mut self, member: &DeclaredType) -> Self {
        self.members.push(member.clone());
        self
    }

    /// Sets the resolver mapping runtime values to member type names.
    pub fn type_resolver(mut self, resolver: TypeResolver) -> Self {
        self.type_resolver = Some(resolver);
        self
    }

    /// Validates the declaration and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid schema text,
    /// name/description conflicts or a programmatic union without
    /// members.
    pub fn define(self) -> Result<DeclaredType, SchemaError> {
        if self.header.abstract_ {
            return Ok(DeclaredType::new(TypeDeclaration::Union(self), None));
        }

        let definition = parse_header_schema(&self.header, DefinitionKind::Union)?;
        let name = self
            .header
            .resolve_name(definition.as_ref().map(|d| d.name.node.as_str()))?;

        match &definition {
            Some(definition) => {
                self.header.validate_description(definition)?;
            }
            None => {
                if self.members.is_empty() {
                    return Err(SchemaError::NoUnionMembers {
                        ident: self.header.ident.clone(),
                    });
                }
            }
        }

        Ok(DeclaredType::new(TypeDeclaration::Union(self), Some(name)))
    }

    pub(crate) fn header(&self) -> &TypeHeader {
        &self.header
    }

    pub(crate) fn dependencies(&self) -> Vec<DeclaredType> {
        self.members.to_vec()
    }

    pub(crate) fn compile(&self, name: String) -> Result<UnionModel, SchemaError> {
        let ast = match &self.header.schema {
            Some(schema) => {
                let mut definition = crate::ast::parse_type_definition(
                    &self.header.ident,
                    schema,
                    DefinitionKind::Union,
                )?;
                if definition.description.is_none() {
                    definition.description = description_node(self.header.description.as_deref());
                }
                definition
            }
            None => {
                let mut members = Vec::with_capacity(self.members.len());
                for member in &self.members {
                    members.push(name_node(member.require_name()?));
                }
                TypeDefinition {
                    extend: false,
                    description: description_node(self.header.description.as_deref()),
                    name: name_node(&name),
                    directives: Vec::new(),
                    kind: TypeKind::Union(AstUnionType { members }),
                }
            }
        };

        Ok(UnionModel {
            name,
            ast,
            type_resolver: self.type_resolver.clone(),
        })
    }
}

/// Compiled union model.
pub(crate) struct UnionModel {
    pub name: String,
    pub ast: TypeDefinition,
    pub type_resolver: Option<TypeResolver>,
}
