//! Deferred type references and the registry resolving them.
//!
//! Cyclic and not-yet-defined type references can't be expressed as
//! direct declaration handles, so they go through a two-phase registry:
//! declarations are registered under stable dotted string keys, and
//! [`DeferredType`] references are resolved by key lookup when the
//! schema is built. A missing key fails the build.

use std::collections::HashMap;

use crate::declaration::DeclaredType;
use crate::error::SchemaError;

/// A reference to a declaration registered under a dotted key, resolved
/// at schema build time.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeferredType {
    key: String,
}

impl DeferredType {
    /// References `name` registered under the absolute dotted `path`.
    pub fn new(path: &str, name: &str) -> Self {
        if path.is_empty() {
            return Self { key: name.to_string() };
        }
        Self {
            key: format!("{path}.{name}"),
        }
    }

    /// References `name` through a path relative to `package`.
    ///
    /// One leading dot resolves against the package itself, each
    /// additional dot walks one package level up: `.types` inside
    /// `pkg.sub` resolves to `pkg.sub.types`, `..types` to `pkg.types`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDeferredPath`] when the dots walk
    /// above the top-level package.
    pub fn relative(path: &str, name: &str, package: &str) -> Result<Self, SchemaError> {
        let absolute = resolve_module_path(path, package)?;
        Ok(Self::new(&absolute, name))
    }

    /// The registry key this reference resolves through.
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Resolves a possibly-relative dotted module path against a package.
fn resolve_module_path(path: &str, package: &str) -> Result<String, SchemaError> {
    if !path.starts_with('.') {
        return Ok(path.to_string());
    }

    let dots = path.chars().take_while(|c| *c == '.').count();
    let rest = &path[dots..];

    let mut segments: Vec<&str> = package.split('.').filter(|s| !s.is_empty()).collect();
    let up = dots - 1;
    if up > segments.len() {
        return Err(SchemaError::InvalidDeferredPath {
            path: path.to_string(),
        });
    }
    segments.truncate(segments.len() - up);

    if !rest.is_empty() {
        segments.push(rest);
    }
    Ok(segments.join("."))
}

/// Registry of declarations addressable by deferred references.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    entries: HashMap<String, DeclaredType>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a declaration under a dotted key.
    ///
    /// Registering the same key twice replaces the earlier entry; the
    /// latest registration wins, like rebinding a module attribute.
    pub fn register(&mut self, key: impl Into<String>, declaration: &DeclaredType) {
        self.entries.insert(key.into(), declaration.clone());
    }

    /// Looks a declaration up by key.
    pub fn get(&self, key: &str) -> Option<&DeclaredType> {
        self.entries.get(key)
    }

    /// Resolves a deferred reference, failing on a missing key.
    pub fn resolve(&self, deferred: &DeferredType) -> Result<DeclaredType, SchemaError> {
        self.entries
            .get(deferred.key())
            .cloned()
            .ok_or_else(|| SchemaError::MissingDeferredTarget {
                key: deferred.key().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_pass_through() {
        let deferred = DeferredType::new("users.types", "User");
        assert_eq!(deferred.key(), "users.types.User");
    }

    #[test]
    fn single_dot_resolves_against_the_package() {
        let deferred = DeferredType::relative(".types", "User", "pkg.sub").unwrap();
        assert_eq!(deferred.key(), "pkg.sub.types.User");
    }

    #[test]
    fn extra_dots_walk_package_levels_up() {
        let deferred = DeferredType::relative("..types", "User", "pkg.sub").unwrap();
        assert_eq!(deferred.key(), "pkg.types.User");

        let deferred = DeferredType::relative("...types", "User", "pkg.sub").unwrap();
        assert_eq!(deferred.key(), "types.User");
    }

    #[test]
    fn walking_above_the_top_level_package_fails() {
        let err = DeferredType::relative("....types", "User", "pkg.sub").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Relative path '....types' points above the top-level package"
        );
    }
}
