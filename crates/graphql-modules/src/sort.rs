//! Deterministic schema document ordering.
//!
//! Hands the execution engine (and the SDL printer) a document whose
//! top-level definitions follow a fixed order: directive definitions
//! first (sorted by name), then scalars (sorted by name), then the
//! `Query`, `Mutation` and `Subscription` branches (each root followed
//! by a depth-first walk of its field types, argument types and, for
//! object and interface targets, their interfaces), and finally any
//! remaining definitions in their original relative order. Identical
//! inputs produce byte-identical printed output regardless of
//! registration order.

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    BaseType, FieldDefinition, ServiceDocument, Type, TypeDefinition, TypeKind,
    TypeSystemDefinition,
};

use crate::roots::ROOT_NAMES;

/// Reorders a schema document's definitions deterministically.
pub fn sort_schema_document(document: ServiceDocument) -> ServiceDocument {
    let mut schemas = Vec::new();
    let mut directives = Vec::new();
    let mut scalars = Vec::new();
    let mut types: Vec<Option<Positioned<TypeDefinition>>> = Vec::new();

    for definition in document.definitions {
        match definition {
            TypeSystemDefinition::Schema(schema) => schemas.push(schema),
            TypeSystemDefinition::Directive(directive) => directives.push(directive),
            TypeSystemDefinition::Type(definition) => {
                if matches!(definition.node.kind, TypeKind::Scalar) {
                    scalars.push(definition);
                } else {
                    types.push(Some(definition));
                }
            }
        }
    }

    directives.sort_by(|a, b| a.node.name.node.as_str().cmp(b.node.name.node.as_str()));
    scalars.sort_by(|a, b| a.node.name.node.as_str().cmp(b.node.name.node.as_str()));

    let mut sorted: Vec<Positioned<TypeDefinition>> = Vec::with_capacity(types.len());
    for root in ROOT_NAMES {
        sort_branch(root, &mut types, &mut sorted);
    }
    let remaining = types.into_iter().flatten();

    let mut definitions = Vec::new();
    definitions.extend(schemas.into_iter().map(TypeSystemDefinition::Schema));
    definitions.extend(directives.into_iter().map(TypeSystemDefinition::Directive));
    definitions.extend(scalars.into_iter().map(TypeSystemDefinition::Type));
    definitions.extend(sorted.into_iter().map(TypeSystemDefinition::Type));
    definitions.extend(remaining.map(TypeSystemDefinition::Type));

    ServiceDocument { definitions }
}

/// Takes the named definition out of the pending pool.
fn take(
    name: &str,
    pending: &mut Vec<Option<Positioned<TypeDefinition>>>,
) -> Option<Positioned<TypeDefinition>> {
    pending
        .iter_mut()
        .find(|slot| {
            slot.as_ref()
                .is_some_and(|definition| definition.node.name.node.as_str() == name)
        })
        .and_then(Option::take)
}

/// Emits the named type followed by its dependencies, depth first.
fn sort_branch(
    name: &str,
    pending: &mut Vec<Option<Positioned<TypeDefinition>>>,
    sorted: &mut Vec<Positioned<TypeDefinition>>,
) {
    let Some(definition) = take(name, pending) else {
        return;
    };

    sorted.push(definition.clone());
    sort_object_dependencies(&definition.node, pending, sorted);
}

/// Emits an object-like type's interfaces and the types reachable from
/// its fields and field arguments.
fn sort_object_dependencies(
    definition: &TypeDefinition,
    pending: &mut Vec<Option<Positioned<TypeDefinition>>>,
    sorted: &mut Vec<Positioned<TypeDefinition>>,
) {
    let (implements, fields) = match &definition.kind {
        TypeKind::Object(object) => (&object.implements, &object.fields),
        TypeKind::Interface(interface) => (&interface.implements, &interface.fields),
        _ => return,
    };

    for interface in implements {
        if let Some(interface_definition) = take(interface.node.as_str(), pending) {
            sorted.push(interface_definition.clone());
            sort_object_dependencies(&interface_definition.node, pending, sorted);
        }
    }

    for field in fields {
        sort_field_dependencies(&field.node, pending, sorted);
    }
}

fn sort_field_dependencies(
    field: &FieldDefinition,
    pending: &mut Vec<Option<Positioned<TypeDefinition>>>,
    sorted: &mut Vec<Positioned<TypeDefinition>>,
) {
    for argument in &field.arguments {
        sort_branch(unwrap_type_name(&argument.node.ty.node), pending, sorted);
    }
    sort_branch(unwrap_type_name(&field.ty.node), pending, sorted);
}

/// The named type at the bottom of list and non-null wrappers.
fn unwrap_type_name(ty: &Type) -> &str {
    match &ty.base {
        BaseType::Named(name) => name.as_str(),
        BaseType::List(inner) => unwrap_type_name(inner),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{definition_name, parse_fragment};

    fn sorted_names(sdl: &str) -> Vec<String> {
        let document = ServiceDocument {
            definitions: parse_fragment(sdl).unwrap(),
        };
        sort_schema_document(document)
            .definitions
            .iter()
            .map(|definition| definition_name(definition).unwrap_or("schema").to_string())
            .collect()
    }

    #[test]
    fn directives_and_scalars_come_first_sorted() {
        let names = sorted_names(
            r"
            scalar Money
            directive @tag on FIELD_DEFINITION
            scalar Date
            directive @auth on FIELD_DEFINITION
            type Query { value: Int }
            ",
        );
        assert_eq!(names, ["auth", "tag", "Date", "Money", "Query"]);
    }

    #[test]
    fn roots_are_followed_by_their_dependencies_depth_first() {
        let names = sorted_names(
            r"
            type Group { users: [User!]! }
            type Mutation { register(input: RegisterInput!): User }
            input RegisterInput { name: String! }
            type User { group: Group }
            type Query { user(filter: UserFilter): User }
            input UserFilter { name: String }
            ",
        );
        assert_eq!(
            names,
            ["Query", "UserFilter", "User", "Group", "Mutation", "RegisterInput"]
        );
    }

    #[test]
    fn interfaces_are_emitted_before_field_dependencies() {
        let names = sorted_names(
            r"
            type Admin implements Person { name: String }
            interface Person { name: String }
            type Query { admin: Admin }
            ",
        );
        assert_eq!(names, ["Query", "Admin", "Person"]);
    }

    #[test]
    fn unreferenced_definitions_keep_their_relative_order() {
        let names = sorted_names(
            r"
            type Zebra { id: ID }
            type Aardvark { id: ID }
            type Query { value: Int }
            ",
        );
        assert_eq!(names, ["Query", "Zebra", "Aardvark"]);
    }

    #[test]
    fn sorting_is_deterministic_across_input_orderings() {
        let forward = sorted_names(
            "type Query { user: User } type User { id: ID } scalar Date",
        );
        let backward = sorted_names(
            "scalar Date type User { id: ID } type Query { user: User }",
        );
        assert_eq!(forward, backward);
    }
}
