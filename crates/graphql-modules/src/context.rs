//! The per-build compilation context.
//!
//! One `make_executable_schema` call owns one context; it is never
//! shared across builds. It threads the type registry through
//! compilation and caches each declaration's model by identity.

use std::collections::HashMap;
use std::sync::Arc;

use crate::declaration::DeclaredType;
use crate::error::SchemaError;
use crate::model::GraphQLModel;
use crate::registry::TypeRegistry;

pub(crate) struct BuildContext<'a> {
    pub registry: &'a TypeRegistry,
    models: HashMap<usize, Arc<GraphQLModel>>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            models: HashMap::new(),
        }
    }

    /// Returns the declaration's model, compiling it on first access.
    pub(crate) fn model(
        &mut self,
        declaration: &DeclaredType,
    ) -> Result<Arc<GraphQLModel>, SchemaError> {
        if let Some(model) = self.models.get(&declaration.identity()) {
            return Ok(model.clone());
        }

        let model = Arc::new(declaration.compile(self.registry)?);
        self.models.insert(declaration.identity(), model.clone());
        Ok(model)
    }
}
