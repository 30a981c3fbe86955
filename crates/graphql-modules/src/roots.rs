//! Merging of partial root type definitions.
//!
//! Multiple declarations and schema text fragments may each contribute a
//! slice of `Query`, `Mutation` or `Subscription`. With merging enabled
//! they are combined into one definition per root name; a field supplied
//! by two fragments is a fatal collision naming both sources. Merged
//! fields are emitted in lexicographic order so the output is stable
//! regardless of registration order.

use std::collections::BTreeMap;

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    ConstDirective, FieldDefinition, ObjectType as AstObjectType, TypeDefinition, TypeKind,
    TypeSystemDefinition,
};

use crate::ast::{definition_label, node};
use crate::error::SchemaError;

/// The GraphQL root operation type names, in their canonical order.
pub const ROOT_NAMES: [&str; 3] = ["Query", "Mutation", "Subscription"];

/// A definition labeled with the declaration or fragment it came from,
/// so merge errors can name their sources.
pub(crate) type LabeledDefinition = (String, TypeSystemDefinition);

/// Merges all definitions sharing a root name into one definition per
/// root. Non-root definitions pass through in order; merged roots are
/// appended in `Query`, `Mutation`, `Subscription` order.
pub(crate) fn merge_root_definitions(
    definitions: Vec<LabeledDefinition>,
) -> Result<Vec<LabeledDefinition>, SchemaError> {
    let mut merged: Vec<LabeledDefinition> = Vec::with_capacity(definitions.len());
    let mut roots: BTreeMap<&str, Vec<(String, Positioned<TypeDefinition>)>> = BTreeMap::new();

    for (source, definition) in definitions {
        if let TypeSystemDefinition::Schema(_) = &definition {
            return Err(SchemaError::UnsupportedDefinition {
                found: definition_label(&definition).to_string(),
            });
        }

        let root = match &definition {
            TypeSystemDefinition::Type(type_definition) => ROOT_NAMES
                .iter()
                .copied()
                .find(|root| *root == type_definition.node.name.node.as_str()),
            _ => None,
        };

        match (root, definition) {
            (Some(root), TypeSystemDefinition::Type(type_definition)) => {
                roots.entry(root).or_default().push((source, type_definition));
            }
            (_, definition) => merged.push((source, definition)),
        }
    }

    for root in ROOT_NAMES {
        let Some(fragments) = roots.remove(root) else {
            continue;
        };

        if fragments.len() == 1 {
            let (source, definition) = fragments.into_iter().next().expect("checked length");
            merged.push((source, TypeSystemDefinition::Type(definition)));
        } else {
            let definition = merge_fragments(root, fragments)?;
            merged.push((
                root.to_string(),
                TypeSystemDefinition::Type(node(definition)),
            ));
        }
    }

    Ok(merged)
}

/// Merges the fragments of one root type: interface and directive lists
/// concatenate in fragment order, fields must be globally unique and
/// come out sorted by name, and at most one fragment may describe the
/// type.
fn merge_fragments(
    root: &str,
    fragments: Vec<(String, Positioned<TypeDefinition>)>,
) -> Result<TypeDefinition, SchemaError> {
    let mut description: Option<Positioned<String>> = None;
    let mut implements: Vec<Positioned<async_graphql::Name>> = Vec::new();
    let mut directives: Vec<Positioned<ConstDirective>> = Vec::new();
    let mut fields: BTreeMap<String, (String, Positioned<FieldDefinition>)> = BTreeMap::new();

    let name = fragments
        .first()
        .map(|(_, definition)| definition.node.name.clone())
        .expect("at least two fragments to merge");

    for (source, definition) in fragments {
        let definition = definition.node;
        let object = match definition.kind {
            TypeKind::Object(object) => object,
            _ => {
                return Err(SchemaError::InvalidRootDefinition {
                    root: root.to_string(),
                    source_name: source,
                });
            }
        };

        if definition.description.is_some() {
            if description.is_some() {
                return Err(SchemaError::MultipleRootDescriptions {
                    root: root.to_string(),
                });
            }
            description = definition.description;
        }

        implements.extend(object.implements);
        directives.extend(definition.directives);

        for field in object.fields {
            let field_name = field.node.name.node.to_string();
            if let Some((first_source, _)) = fields.get(&field_name) {
                return Err(SchemaError::DuplicateRootField {
                    root: root.to_string(),
                    field: field_name,
                    first_source: first_source.clone(),
                    second_source: source.clone(),
                });
            }
            fields.insert(field_name, (source.clone(), field));
        }
    }

    Ok(TypeDefinition {
        extend: false,
        description,
        name,
        directives,
        kind: TypeKind::Object(AstObjectType {
            implements,
            fields: fields.into_values().map(|(_, field)| field).collect(),
        }),
    })
}
