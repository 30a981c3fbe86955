//! Dependency discovery over declared types.
//!
//! Starting from the explicit root declarations, computes the
//! deduplicated, order-preserving transitive closure of everything they
//! reference through field types, argument types, requirement lists,
//! union members and implemented interfaces. Deferred references are
//! resolved through the registry along the way; identity-based
//! deduplication breaks cycles, including self-referential types.

use std::collections::{HashSet, VecDeque};

use tracing::trace;

use crate::declaration::DeclaredType;
use crate::error::SchemaError;
use crate::registry::TypeRegistry;

/// Breadth-first expansion of the root declarations into the full set
/// of declarations the schema needs, in first-visit order.
pub(crate) fn collect_declarations(
    roots: &[DeclaredType],
    registry: &TypeRegistry,
) -> Result<Vec<DeclaredType>, SchemaError> {
    let mut visited: HashSet<usize> = HashSet::new();
    let mut collected: Vec<DeclaredType> = Vec::new();
    let mut queue: VecDeque<DeclaredType> = roots.iter().cloned().collect();

    while let Some(declaration) = queue.pop_front() {
        if !visited.insert(declaration.identity()) {
            continue;
        }

        trace!(ident = declaration.ident(), "visiting declaration");
        for dependency in declaration.dependencies(registry)? {
            if !visited.contains(&dependency.identity()) {
                queue.push_back(dependency);
            }
        }
        collected.push(declaration);
    }

    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::TypeSpec;
    use crate::field::Field;
    use crate::object::ObjectType;
    use crate::registry::{DeferredType, TypeRegistry};

    #[test]
    fn collects_field_and_argument_references_once() {
        let user = ObjectType::new("UserType")
            .field(Field::new("id", TypeSpec::Id))
            .define()
            .unwrap();
        let query = ObjectType::new("QueryType")
            .field(Field::new("user", TypeSpec::of(&user)))
            .field(Field::new("users", TypeSpec::list(TypeSpec::of(&user))))
            .define()
            .unwrap();

        let registry = TypeRegistry::new();
        let collected = collect_declarations(&[query.clone()], &registry).unwrap();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].ident(), "QueryType");
        assert_eq!(collected[1].ident(), "UserType");
    }

    #[test]
    fn terminates_on_cycles_through_deferred_references() {
        let mut registry = TypeRegistry::new();

        // Category references itself, and Post and Category reference
        // each other, all through the registry.
        let category = ObjectType::new("CategoryType")
            .field(Field::new(
                "parent",
                TypeSpec::deferred(DeferredType::new("catalog", "CategoryType")).nullable(),
            ))
            .field(Field::new(
                "posts",
                TypeSpec::list(TypeSpec::deferred(DeferredType::new("catalog", "PostType"))),
            ))
            .define()
            .unwrap();
        let post = ObjectType::new("PostType")
            .field(Field::new(
                "category",
                TypeSpec::deferred(DeferredType::new("catalog", "CategoryType")),
            ))
            .define()
            .unwrap();
        registry.register("catalog.CategoryType", &category);
        registry.register("catalog.PostType", &post);

        let collected = collect_declarations(&[category.clone()], &registry).unwrap();
        assert_eq!(collected.len(), 2);
    }

    #[test]
    fn missing_deferred_targets_fail() {
        let registry = TypeRegistry::new();
        let query = ObjectType::new("QueryType")
            .field(Field::new(
                "user",
                TypeSpec::deferred(DeferredType::new("users", "UserType")),
            ))
            .define()
            .unwrap();

        let err = collect_declarations(&[query], &registry).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Deferred type 'users.UserType' is not registered in the type registry"
        );
    }
}
