//! Interface type declarations.

use std::collections::HashMap;

use async_graphql_parser::types::{InterfaceType as AstInterfaceType, TypeDefinition, TypeKind};

use crate::ast::{DefinitionKind, description_node, name_node};
use crate::declaration::{DeclaredType, TypeDeclaration, TypeHeader, parse_header_schema};
use crate::error::SchemaError;
use crate::field::{
    Field, FieldResolver, build_fields, compile_fields, merge_schema_mode_fields,
    validate_schema_mode_fields,
};
use crate::registry::TypeRegistry;
use crate::resolver::{Resolver, TypeResolver};

/// Builder for a GraphQL interface type declaration.
///
/// Fields work exactly like object fields. Resolvers attached to an
/// interface act as fallbacks for implementing types that don't bind
/// their own. The optional type resolver maps a runtime value to the
/// concrete object type name; without one, the value's `__typename`
/// property is consulted.
#[derive(Clone)]
pub struct InterfaceType {
    header: TypeHeader,
    fields: Vec<Field>,
    resolvers: Vec<FieldResolver>,
    type_resolver: Option<TypeResolver>,
}

impl InterfaceType {
    /// Starts an interface type declaration with the given identifier.
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            header: TypeHeader::new(ident),
            fields: Vec::new(),
            resolvers: Vec::new(),
            type_resolver: None,
        }
    }

    /// Overrides the derived GraphQL type name.
    pub fn graphql_name(mut self, name: impl Into<String>) -> Self {
        self.header.graphql_name = Some(name.into());
        self
    }

    /// Declares the whole interface as schema text.
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

    /// Adds a declaration this interface requires.
    pub fn requires(mut self, declaration: &DeclaredType) -> Self {
        self.header.requires.push(declaration.clone());
        self
    }

    /// Declares a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Attaches a fallback resolver to a declared field.
    pub fn resolver(mut self, resolver: FieldResolver) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Sets the resolver mapping runtime values to concrete type names.
    pub fn type_resolver(mut self, resolver: TypeResolver) -> Self {
        self.type_resolver = Some(resolver);
        self
    }

    /// Validates the declaration and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error under the same conditions as
    /// [`ObjectType::define`](crate::ObjectType::define).
    pub fn define(self) -> Result<DeclaredType, SchemaError> {
        if self.header.abstract_ {
            return Ok(DeclaredType::new(TypeDeclaration::Interface(self), None));
        }

        let definition = parse_header_schema(&self.header, DefinitionKind::Interface)?;
        let name = self
            .header
            .resolve_name(definition.as_ref().map(|d| d.name.node.as_str()))?;

        match &definition {
            Some(definition) => {
                self.header.validate_description(definition)?;
                let fields = match &definition.kind {
                    TypeKind::Interface(interface) => &interface.fields,
                    _ => unreachable!("parse checked the definition kind"),
                };
                validate_schema_mode_fields(
                    &self.header.ident,
                    fields,
                    &self.fields,
                    &self.resolvers,
                    &[],
                )?;
            }
            None => {
                build_fields(&self.header.ident, &self.fields, &self.resolvers)?;
            }
        }

        Ok(DeclaredType::new(
            TypeDeclaration::Interface(self),
            Some(name),
        ))
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
            if let Some(ty) = &field.ty {
                dependencies.extend(ty.referenced(registry)?);
            }
            for arg in &field.args {
                if let Some(ty) = &arg.ty {
                    dependencies.extend(ty.referenced(registry)?);
                }
            }
        }
        for resolver in &self.resolvers {
            if let Some(ty) = &resolver.ty {
                dependencies.extend(ty.referenced(registry)?);
            }
            for arg in &resolver.args {
                if let Some(ty) = &arg.ty {
                    dependencies.extend(ty.referenced(registry)?);
                }
            }
        }
        Ok(dependencies)
    }

    pub(crate) fn compile(
        &self,
        name: String,
        registry: &TypeRegistry,
    ) -> Result<InterfaceModel, SchemaError> {
        if let Some(schema) = &self.header.schema {
            let mut definition = crate::ast::parse_type_definition(
                &self.header.ident,
                schema,
                DefinitionKind::Interface,
            )?;

            if definition.description.is_none() {
                definition.description = description_node(self.header.description.as_deref());
            }
            if let TypeKind::Interface(interface) = &mut definition.kind {
                let fields = std::mem::take(&mut interface.fields);
                interface.fields = merge_schema_mode_fields(fields, &self.resolvers);
            }

            let resolvers = self
                .resolvers
                .iter()
                .map(|r| (r.field.clone(), r.resolver.clone()))
                .collect();

            return Ok(InterfaceModel {
                name,
                ast: definition,
                resolvers,
                type_resolver: self.type_resolver.clone(),
            });
        }

        let data = build_fields(&self.header.ident, &self.fields, &self.resolvers)?;
        let compiled = compile_fields(&self.header.ident, &data, registry)?;

        Ok(InterfaceModel {
            name: name.clone(),
            ast: TypeDefinition {
                extend: false,
                description: description_node(self.header.description.as_deref()),
                name: name_node(&name),
                directives: Vec::new(),
                kind: TypeKind::Interface(AstInterfaceType {
                    implements: Vec::new(),
                    fields: compiled.nodes,
                }),
            },
            resolvers: compiled.resolvers,
            type_resolver: self.type_resolver.clone(),
        })
    }
}

/// Compiled interface model.
pub(crate) struct InterfaceModel {
    pub name: String,
    pub ast: TypeDefinition,
    pub resolvers: HashMap<String, Resolver>,
    pub type_resolver: Option<TypeResolver>,
}
