//! Object type declarations.

use std::collections::{HashMap, HashSet};

use async_graphql_parser::types::{ObjectType as AstObjectType, TypeDefinition, TypeKind};

use crate::ast::{DefinitionKind, description_node, name_node};
use crate::declaration::{DeclaredType, TypeDeclaration, TypeHeader, parse_header_schema};
use crate::error::SchemaError;
use crate::field::{
    Field, FieldResolver, build_fields, compile_fields, merge_schema_mode_fields,
    validate_aliases, validate_schema_mode_fields,
};
use crate::registry::TypeRegistry;
use crate::resolver::{Resolver, SubscriptionResolver};

/// Builder for a GraphQL object type declaration.
///
/// Fields are declared explicitly, or the whole type is given as schema
/// text with resolvers attached by field name:
///
/// ```
/// use graphql_modules::{Field, ObjectType, Resolver, TypeSpec};
///
/// let query = ObjectType::new("QueryType")
///     .field(Field::new("message", TypeSpec::String).resolver(
///         Resolver::from_fn(|_| Ok("Hello GraphQL!".into())),
///     ))
///     .define()
///     .unwrap();
/// assert_eq!(query.graphql_name(), Some("Query"));
/// ```
#[derive(Clone)]
pub struct ObjectType {
    header: TypeHeader,
    fields: Vec<Field>,
    resolvers: Vec<FieldResolver>,
    aliases: Vec<(String, String)>,
    implements: Vec<DeclaredType>,
    subscriptions: Vec<(String, SubscriptionResolver)>,
}

impl ObjectType {
    /// Starts an object type declaration with the given identifier.
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            header: TypeHeader::new(ident),
            fields: Vec::new(),
            resolvers: Vec::new(),
            aliases: Vec::new(),
            implements: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    /// Overrides the derived GraphQL type name.
    pub fn graphql_name(mut self, name: impl Into<String>) -> Self {
        self.header.graphql_name = Some(name.into());
        self
    }

    /// Declares the whole type as schema text. Fields then come from the
    /// text; resolvers and argument descriptions may amend them.
    pub fn schema(mut self, sdl: impl Into<String>) -> Self {
        self.header.schema = Some(sdl.into());
        self
    }

    /// Sets the type description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.header.description = Some(description.into());
        self
    }

    /// Marks this declaration as an abstract building block that must
    /// not reach schema construction.
    pub fn abstract_type(mut self) -> Self {
        self.header.abstract_ = true;
        self
    }

    /// Adds a declaration this type requires (a dependency the schema
    /// text references but field specs cannot express).
    pub fn requires(mut self, declaration: &DeclaredType) -> Self {
        self.header.requires.push(declaration.clone());
        self
    }

    /// Declares a field.
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Attaches a resolver to a declared field.
    pub fn resolver(mut self, resolver: FieldResolver) -> Self {
        self.resolvers.push(resolver);
        self
    }

    /// Aliases a field to a differently named property of the parent
    /// value. Only valid for fields without a custom resolver.
    pub fn alias(mut self, field: impl Into<String>, target: impl Into<String>) -> Self {
        self.aliases.push((field.into(), target.into()));
        self
    }

    /// Declares that this type implements an interface.
    pub fn implement(mut self, interface: &DeclaredType) -> Self {
        self.implements.push(interface.clone());
        self
    }

    /// Attaches a subscription source to a field; meaningful on the
    /// `Subscription` root type.
    pub fn subscription(
        mut self,
        field: impl Into<String>,
        resolver: SubscriptionResolver,
    ) -> Self {
        self.subscriptions.push((field.into(), resolver));
        self
    }

    /// Validates the declaration and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for name/description conflicts,
    /// missing field types, duplicate names, resolvers or aliases that
    /// reference undefined fields, and invalid schema text.
    pub fn define(self) -> Result<DeclaredType, SchemaError> {
        if self.header.abstract_ {
            return Ok(DeclaredType::new(TypeDeclaration::Object(self), None));
        }

        let definition = parse_header_schema(&self.header, DefinitionKind::Object)?;
        let name = self
            .header
            .resolve_name(definition.as_ref().map(|d| d.name.node.as_str()))?;

        match &definition {
            Some(definition) => {
                self.header.validate_description(definition)?;
                let fields = match &definition.kind {
                    TypeKind::Object(object) => &object.fields,
                    _ => unreachable!("parse checked the definition kind"),
                };
                validate_schema_mode_fields(
                    &self.header.ident,
                    fields,
                    &self.fields,
                    &self.resolvers,
                    &self.aliases,
                )?;
            }
            None => {
                let data = build_fields(&self.header.ident, &self.fields, &self.resolvers)?;
                let idents: Vec<&str> = data.iter().map(|f| f.ident.as_str()).collect();
                let resolved: HashSet<String> = data
                    .iter()
                    .filter(|f| f.resolver.is_some())
                    .map(|f| f.ident.clone())
                    .collect();
                validate_aliases(&self.header.ident, &self.aliases, &idents, &resolved)?;
            }
        }

        Ok(DeclaredType::new(TypeDeclaration::Object(self), Some(name)))
    }

    pub(crate) fn header(&self) -> &TypeHeader {
        &self.header
    }

    pub(crate) fn dependencies(
        &self,
        registry: &TypeRegistry,
    ) -> Result<Vec<DeclaredType>, SchemaError> {
        let mut dependencies: Vec<DeclaredType> = self.implements.to_vec();

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
    ) -> Result<ObjectModel, SchemaError> {
        let subscriptions: HashMap<String, SubscriptionResolver> =
            self.subscriptions.iter().cloned().collect();

        if let Some(schema) = &self.header.schema {
            let mut definition =
                crate::ast::parse_type_definition(&self.header.ident, schema, DefinitionKind::Object)?;

            if definition.description.is_none() {
                definition.description = description_node(self.header.description.as_deref());
            }
            if let TypeKind::Object(object) = &mut definition.kind {
                let fields = std::mem::take(&mut object.fields);
                object.fields = merge_schema_mode_fields(fields, &self.resolvers);
            }

            let resolvers = self
                .resolvers
                .iter()
                .map(|r| (r.field.clone(), r.resolver.clone()))
                .collect();

            return Ok(ObjectModel {
                name,
                ast: definition,
                resolvers,
                aliases: self.aliases.iter().cloned().collect(),
                out_names: HashMap::new(),
                subscriptions,
            });
        }

        let data = build_fields(&self.header.ident, &self.fields, &self.resolvers)?;
        let compiled = compile_fields(&self.header.ident, &data, registry)?;

        // Programmatic aliases are declared by field identifier; the
        // runtime bindings are keyed by wire name.
        let mut aliases = HashMap::new();
        for (field, target) in &self.aliases {
            let wire = data
                .iter()
                .find(|f| &f.ident == field)
                .map(|f| f.name.clone())
                .unwrap_or_else(|| field.clone());
            aliases.insert(wire, target.clone());
        }

        let mut implements = Vec::with_capacity(self.implements.len());
        for interface in &self.implements {
            implements.push(name_node(interface.require_name()?));
        }

        Ok(ObjectModel {
            name: name.clone(),
            ast: TypeDefinition {
                extend: false,
                description: description_node(self.header.description.as_deref()),
                name: name_node(&name),
                directives: Vec::new(),
                kind: TypeKind::Object(AstObjectType {
                    implements,
                    fields: compiled.nodes,
                }),
            },
            resolvers: compiled.resolvers,
            aliases,
            out_names: compiled.out_names,
            subscriptions,
        })
    }
}

/// Compiled object model: the AST fragment plus runtime bindings.
pub(crate) struct ObjectModel {
    pub name: String,
    pub ast: TypeDefinition,
    pub resolvers: HashMap<String, Resolver>,
    pub aliases: HashMap<String, String>,
    pub out_names: HashMap<String, HashMap<String, String>>,
    pub subscriptions: HashMap<String, SubscriptionResolver>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::TypeSpec;

    #[test]
    fn derives_graphql_name_from_identifier() {
        let declared = ObjectType::new("UserType")
            .field(Field::new("id", TypeSpec::Id))
            .define()
            .unwrap();
        assert_eq!(declared.graphql_name(), Some("User"));
    }

    #[test]
    fn schema_text_supplies_the_name() {
        let declared = ObjectType::new("UserType")
            .schema("type Account { id: ID! }")
            .define()
            .unwrap();
        assert_eq!(declared.graphql_name(), Some("Account"));
    }

    #[test]
    fn name_override_must_match_schema_text() {
        let err = ObjectType::new("UserType")
            .graphql_name("User")
            .schema("type Account { id: ID! }")
            .define()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'UserType' sets both an explicit GraphQL name and schema text, but their names don't match ('User' != 'Account')"
        );
    }

    #[test]
    fn abstract_declarations_skip_validation() {
        let declared = ObjectType::new("BaseType").abstract_type().define().unwrap();
        assert!(declared.is_abstract());
        assert_eq!(declared.graphql_name(), None);
    }
}
