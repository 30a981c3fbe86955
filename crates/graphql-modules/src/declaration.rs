//! The declaration model shared by every GraphQL type kind.
//!
//! A declaration is a plain value built through one of the kind builders
//! (`ObjectType`, `InputType`, `EnumType`, `ScalarType`, `InterfaceType`,
//! `UnionType`, `DirectiveType`) and finalized with `define()`, which
//! runs all declaration-time validation and hands back a cheap-clone
//! [`DeclaredType`] handle. Handles are compared by identity: passing the
//! same declaration twice, or reaching it through two reference chains,
//! contributes it once.

use std::fmt;
use std::sync::Arc;

use async_graphql::Name;
use async_graphql_parser::types::{BaseType, Type, TypeDefinition};

use crate::ast::{self, DefinitionKind};
use crate::directive::DirectiveType;
use crate::enum_type::EnumType;
use crate::error::SchemaError;
use crate::input::InputType;
use crate::interface::InterfaceType;
use crate::model::GraphQLModel;
use crate::name::derive_type_name;
use crate::object::ObjectType;
use crate::registry::{DeferredType, TypeRegistry};
use crate::scalar::ScalarType;
use crate::union::UnionType;

/// Options common to every declaration kind.
#[derive(Clone, Default)]
pub(crate) struct TypeHeader {
    pub ident: String,
    pub graphql_name: Option<String>,
    pub schema: Option<String>,
    pub description: Option<String>,
    pub requires: Vec<DeclaredType>,
    pub abstract_: bool,
}

impl TypeHeader {
    pub(crate) fn new(ident: impl Into<String>) -> Self {
        Self {
            ident: ident.into(),
            ..Self::default()
        }
    }

    /// Resolves the concrete GraphQL name: explicit override first, then
    /// the name parsed from schema text, then suffix-stripping of the
    /// identifier. An override that disagrees with the schema text name
    /// is fatal.
    pub(crate) fn resolve_name(&self, schema_name: Option<&str>) -> Result<String, SchemaError> {
        if let Some(name) = &self.graphql_name {
            if let Some(schema_name) = schema_name {
                if name != schema_name {
                    return Err(SchemaError::NameMismatch {
                        ident: self.ident.clone(),
                        name: name.clone(),
                        schema_name: schema_name.to_string(),
                    });
                }
            }
            return Ok(name.clone());
        }

        if let Some(schema_name) = schema_name {
            return Ok(schema_name.to_string());
        }

        Ok(derive_type_name(&self.ident))
    }

    /// Rejects a description given both as an option and in schema text.
    pub(crate) fn validate_description(
        &self,
        definition: &TypeDefinition,
    ) -> Result<(), SchemaError> {
        if self.description.is_some() && definition.description.is_some() {
            return Err(SchemaError::DescriptionConflict {
                ident: self.ident.clone(),
            });
        }
        Ok(())
    }
}

/// A validated declaration of one GraphQL type kind.
pub(crate) enum TypeDeclaration {
    Object(ObjectType),
    Input(InputType),
    Enum(EnumType),
    Scalar(ScalarType),
    Interface(InterfaceType),
    Union(UnionType),
    Directive(DirectiveType),
}

impl TypeDeclaration {
    pub(crate) fn header(&self) -> &TypeHeader {
        match self {
            Self::Object(decl) => decl.header(),
            Self::Input(decl) => decl.header(),
            Self::Enum(decl) => decl.header(),
            Self::Scalar(decl) => decl.header(),
            Self::Interface(decl) => decl.header(),
            Self::Union(decl) => decl.header(),
            Self::Directive(decl) => decl.header(),
        }
    }

    fn kind_label(&self) -> &'static str {
        match self {
            Self::Object(_) => DefinitionKind::Object.label(),
            Self::Input(_) => DefinitionKind::InputObject.label(),
            Self::Enum(_) => DefinitionKind::Enum.label(),
            Self::Scalar(_) => DefinitionKind::Scalar.label(),
            Self::Interface(_) => DefinitionKind::Interface.label(),
            Self::Union(_) => DefinitionKind::Union.label(),
            Self::Directive(_) => DefinitionKind::Directive.label(),
        }
    }
}

struct DeclarationInner {
    graphql_name: Option<String>,
    declaration: TypeDeclaration,
}

/// A handle to a defined declaration.
///
/// Clones share the declaration; identity comparison deduplicates it
/// during dependency discovery.
#[derive(Clone)]
pub struct DeclaredType {
    inner: Arc<DeclarationInner>,
}

impl DeclaredType {
    pub(crate) fn new(
        declaration: TypeDeclaration,
        graphql_name: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(DeclarationInner {
                graphql_name,
                declaration,
            }),
        }
    }

    /// The declaration identifier, as used in error messages.
    pub fn ident(&self) -> &str {
        &self.inner.declaration.header().ident
    }

    /// The resolved GraphQL name; `None` for abstract declarations.
    pub fn graphql_name(&self) -> Option<&str> {
        self.inner.graphql_name.as_deref()
    }

    /// Whether this declaration is an abstract building block.
    pub fn is_abstract(&self) -> bool {
        self.inner.declaration.header().abstract_
    }

    pub(crate) fn declaration(&self) -> &TypeDeclaration {
        &self.inner.declaration
    }

    pub(crate) fn identity(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    /// The GraphQL name, failing for abstract declarations that must not
    /// be referenced from concrete schema parts.
    pub(crate) fn require_name(&self) -> Result<&str, SchemaError> {
        self.graphql_name().ok_or_else(|| SchemaError::AbstractType {
            ident: self.ident().to_string(),
        })
    }

    /// Declarations this one references (field types, argument types,
    /// requirement lists, union members, implemented interfaces).
    pub(crate) fn dependencies(
        &self,
        registry: &TypeRegistry,
    ) -> Result<Vec<DeclaredType>, SchemaError> {
        let mut dependencies = match &self.inner.declaration {
            TypeDeclaration::Object(decl) => decl.dependencies(registry)?,
            TypeDeclaration::Input(decl) => decl.dependencies(registry)?,
            TypeDeclaration::Interface(decl) => decl.dependencies(registry)?,
            TypeDeclaration::Union(decl) => decl.dependencies(),
            TypeDeclaration::Enum(_)
            | TypeDeclaration::Scalar(_)
            | TypeDeclaration::Directive(_) => Vec::new(),
        };
        dependencies.extend(self.inner.declaration.header().requires.iter().cloned());
        Ok(dependencies)
    }

    /// Compiles this declaration into its immutable model.
    pub(crate) fn compile(&self, registry: &TypeRegistry) -> Result<GraphQLModel, SchemaError> {
        let name = self.require_name()?.to_string();
        match &self.inner.declaration {
            TypeDeclaration::Object(decl) => decl.compile(name, registry).map(GraphQLModel::Object),
            TypeDeclaration::Input(decl) => decl.compile(name, registry).map(GraphQLModel::Input),
            TypeDeclaration::Enum(decl) => decl.compile(name).map(GraphQLModel::Enum),
            TypeDeclaration::Scalar(decl) => decl.compile(name).map(GraphQLModel::Scalar),
            TypeDeclaration::Interface(decl) => {
                decl.compile(name, registry).map(GraphQLModel::Interface)
            }
            TypeDeclaration::Union(decl) => decl.compile(name).map(GraphQLModel::Union),
            TypeDeclaration::Directive(decl) => decl.compile().map(GraphQLModel::Directive),
        }
    }
}

impl fmt::Debug for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredType")
            .field("ident", &self.ident())
            .field("kind", &self.inner.declaration.kind_label())
            .field("graphql_name", &self.graphql_name())
            .finish()
    }
}

impl PartialEq for DeclaredType {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for DeclaredType {}

/// A field, argument or input-field type: explicit tags instead of
/// reflected type hints. Bare specs are non-null; wrap with
/// [`TypeSpec::nullable`] to allow null.
#[derive(Clone, Debug)]
pub enum TypeSpec {
    /// The built-in `ID` scalar.
    Id,
    /// The built-in `String` scalar.
    String,
    /// The built-in `Int` scalar.
    Int,
    /// The built-in `Float` scalar.
    Float,
    /// The built-in `Boolean` scalar.
    Boolean,
    /// A reference to another declaration.
    Type(DeclaredType),
    /// A reference resolved through the type registry at build time.
    Deferred(DeferredType),
    /// A list of the inner spec.
    List(Box<TypeSpec>),
    /// The nullable form of the inner spec.
    Nullable(Box<TypeSpec>),
}

impl TypeSpec {
    /// References another declaration.
    pub fn of(declaration: &DeclaredType) -> Self {
        Self::Type(declaration.clone())
    }

    /// References a declaration through the type registry.
    pub fn deferred(deferred: DeferredType) -> Self {
        Self::Deferred(deferred)
    }

    /// A list of the given spec.
    pub fn list(inner: TypeSpec) -> Self {
        Self::List(Box::new(inner))
    }

    /// The nullable form of this spec.
    pub fn nullable(self) -> Self {
        Self::Nullable(Box::new(self))
    }

    /// The declaration this spec references, if any.
    pub(crate) fn referenced(
        &self,
        registry: &TypeRegistry,
    ) -> Result<Option<DeclaredType>, SchemaError> {
        match self {
            Self::Type(declaration) => Ok(Some(declaration.clone())),
            Self::Deferred(deferred) => registry.resolve(deferred).map(Some),
            Self::List(inner) | Self::Nullable(inner) => inner.referenced(registry),
            _ => Ok(None),
        }
    }

    /// Converts the spec to a schema AST type node.
    pub(crate) fn to_ast(&self, registry: &TypeRegistry) -> Result<Type, SchemaError> {
        let named = |name: &str| Type {
            base: BaseType::Named(Name::new(name)),
            nullable: false,
        };

        match self {
            Self::Id => Ok(named("ID")),
            Self::String => Ok(named("String")),
            Self::Int => Ok(named("Int")),
            Self::Float => Ok(named("Float")),
            Self::Boolean => Ok(named("Boolean")),
            Self::Type(declaration) => Ok(named(declaration.require_name()?)),
            Self::Deferred(deferred) => {
                let declaration = registry.resolve(deferred)?;
                let name = declaration.require_name()?.to_string();
                Ok(named(&name))
            }
            Self::List(inner) => Ok(Type {
                base: BaseType::List(Box::new(inner.to_ast(registry)?)),
                nullable: false,
            }),
            Self::Nullable(inner) => {
                let mut ty = inner.to_ast(registry)?;
                ty.nullable = true;
                Ok(ty)
            }
        }
    }
}

/// Parses a declaration's schema text during `define()`, returning the
/// definition for name resolution and validation.
pub(crate) fn parse_header_schema(
    header: &TypeHeader,
    expected: DefinitionKind,
) -> Result<Option<TypeDefinition>, SchemaError> {
    match &header.schema {
        Some(schema) => {
            let definition = ast::parse_type_definition(&header.ident, schema, expected)?;
            Ok(Some(definition))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_spec_renders_nullability_wrappers() {
        let registry = TypeRegistry::new();

        let ty = TypeSpec::String.to_ast(&registry).unwrap();
        assert_eq!(ty.to_string(), "String!");

        let ty = TypeSpec::String.nullable().to_ast(&registry).unwrap();
        assert_eq!(ty.to_string(), "String");

        let ty = TypeSpec::list(TypeSpec::Int).to_ast(&registry).unwrap();
        assert_eq!(ty.to_string(), "[Int!]!");

        let ty = TypeSpec::list(TypeSpec::Int.nullable())
            .nullable()
            .to_ast(&registry)
            .unwrap();
        assert_eq!(ty.to_string(), "[Int]");
    }
}
