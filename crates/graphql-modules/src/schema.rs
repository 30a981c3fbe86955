//! The executable schema builder.
//!
//! `make_executable_schema` is the crate's public entry point: it takes
//! a mixed list of declarations, free-form schema text fragments and
//! untyped bindings, discovers every referenced declaration, compiles
//! them, merges partial root types, sorts the resulting document and
//! hands it to the execution engine together with the runtime bindings.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::Schema;
use async_graphql_parser::types::{ServiceDocument, TypeSystemDefinition};
use tracing::debug;

use crate::ast::parse_fragment;
use crate::bindables::Bindable;
use crate::bindings::SchemaBindings;
use crate::context::BuildContext;
use crate::declaration::DeclaredType;
use crate::dependencies::collect_declarations;
use crate::engine;
use crate::error::SchemaError;
use crate::registry::TypeRegistry;
use crate::resolver::SchemaDirectiveVisitor;
use crate::roots::{LabeledDefinition, ROOT_NAMES, merge_root_definitions};
use crate::sort::sort_schema_document;

/// One input to [`make_executable_schema`]: a declaration, a free-form
/// schema text fragment, an untyped binding, or a nested list of these.
pub enum SchemaItem {
    /// Free-form schema definition text.
    TypeDefs(String),
    /// A defined declaration.
    Type(DeclaredType),
    /// An untyped runtime binding.
    Bindable(Bindable),
    /// A nested group of items, flattened during assembly.
    List(Vec<SchemaItem>),
}

impl From<&str> for SchemaItem {
    fn from(sdl: &str) -> Self {
        Self::TypeDefs(sdl.to_string())
    }
}

impl From<String> for SchemaItem {
    fn from(sdl: String) -> Self {
        Self::TypeDefs(sdl)
    }
}

impl From<DeclaredType> for SchemaItem {
    fn from(declaration: DeclaredType) -> Self {
        Self::Type(declaration)
    }
}

impl From<&DeclaredType> for SchemaItem {
    fn from(declaration: &DeclaredType) -> Self {
        Self::Type(declaration.clone())
    }
}

impl From<Bindable> for SchemaItem {
    fn from(bindable: Bindable) -> Self {
        Self::Bindable(bindable)
    }
}

impl From<Vec<SchemaItem>> for SchemaItem {
    fn from(items: Vec<SchemaItem>) -> Self {
        Self::List(items)
    }
}

/// Options for [`make_executable_schema_with_options`].
pub struct SchemaOptions {
    /// Merge multiple partial definitions of `Query`, `Mutation` and
    /// `Subscription` into one type each. Enabled by default; disabled,
    /// a second definition of a root name is a duplicate-type error.
    pub merge_roots: bool,
    /// Derive snake_case out names for schema-text arguments, input
    /// fields and default resolvers without explicit mappings.
    pub convert_names_case: bool,
    /// Directive visitors by directive name, in addition to those bound
    /// on directive declarations.
    pub directives: HashMap<String, Arc<dyn SchemaDirectiveVisitor>>,
    /// The registry deferred references resolve through.
    pub registry: TypeRegistry,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            merge_roots: true,
            convert_names_case: false,
            directives: HashMap::new(),
            registry: TypeRegistry::new(),
        }
    }
}

impl SchemaOptions {
    /// The default option set: root merging on, name conversion off.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Builds an executable schema from declarations, schema text fragments
/// and untyped bindings, with default options.
///
/// # Errors
///
/// Returns a composition error for abstract declarations, duplicate
/// type names, root merge conflicts, unresolved deferred references or
/// an empty input list, and surfaces the execution engine's structural
/// validation errors verbatim.
///
/// # Example
///
/// ```
/// use graphql_modules::{Field, ObjectType, Resolver, TypeSpec, make_executable_schema};
///
/// let query = ObjectType::new("QueryType")
///     .field(Field::new("message", TypeSpec::String).resolver(
///         Resolver::from_fn(|_| Ok("Hello GraphQL!".into())),
///     ))
///     .define()
///     .unwrap();
///
/// let schema = make_executable_schema([query.into()]).unwrap();
/// ```
pub fn make_executable_schema<I>(types: I) -> Result<Schema, SchemaError>
where
    I: IntoIterator<Item = SchemaItem>,
{
    make_executable_schema_with_options(types, SchemaOptions::new())
}

/// Builds an executable schema with explicit [`SchemaOptions`].
pub fn make_executable_schema_with_options<I>(
    types: I,
    options: SchemaOptions,
) -> Result<Schema, SchemaError>
where
    I: IntoIterator<Item = SchemaItem>,
{
    let mut type_defs: Vec<String> = Vec::new();
    let mut declarations: Vec<DeclaredType> = Vec::new();
    let mut bindables: Vec<Bindable> = Vec::new();
    flatten_items(types, &mut type_defs, &mut declarations, &mut bindables);

    if type_defs.is_empty() && declarations.is_empty() {
        return Err(SchemaError::NoTypesProvided);
    }

    debug!(
        declarations = declarations.len(),
        fragments = type_defs.len(),
        bindables = bindables.len(),
        "assembling schema"
    );

    let declarations = collect_declarations(&declarations, &options.registry)?;
    assert_not_abstract(&declarations)?;
    assert_unique_names(&declarations, options.merge_roots)?;

    let mut context = BuildContext::new(&options.registry);
    let mut bindings = SchemaBindings {
        convert_names_case: options.convert_names_case,
        ..SchemaBindings::default()
    };
    bindings.visitors.extend(options.directives.clone());

    let mut definitions: Vec<LabeledDefinition> = Vec::new();
    for declaration in &declarations {
        let model = context.model(declaration)?;
        bindings.add_model(&model);
        definitions.push((declaration.ident().to_string(), model.definition()));
    }
    for fragment in &type_defs {
        for definition in parse_fragment(fragment)? {
            reject_unsupported(&definition)?;
            definitions.push(("type_defs".to_string(), definition));
        }
    }
    for bindable in &bindables {
        bindings.add_bindable(bindable);
    }

    if options.merge_roots {
        definitions = merge_root_definitions(definitions)?;
    }

    let document = ServiceDocument {
        definitions: definitions
            .into_iter()
            .map(|(_, definition)| definition)
            .collect(),
    };
    let document = sort_schema_document(document);

    debug!(definitions = document.definitions.len(), "document assembled");
    engine::build_schema(&document, &bindings)
}

fn flatten_items<I>(
    items: I,
    type_defs: &mut Vec<String>,
    declarations: &mut Vec<DeclaredType>,
    bindables: &mut Vec<Bindable>,
) where
    I: IntoIterator<Item = SchemaItem>,
{
    for item in items {
        match item {
            SchemaItem::TypeDefs(sdl) => type_defs.push(sdl),
            SchemaItem::Type(declaration) => declarations.push(declaration),
            SchemaItem::Bindable(bindable) => bindables.push(bindable),
            SchemaItem::List(nested) => {
                flatten_items(nested, type_defs, declarations, bindables);
            }
        }
    }
}

/// Rejects an abstract declaration that survived into the concrete
/// type list.
fn assert_not_abstract(declarations: &[DeclaredType]) -> Result<(), SchemaError> {
    for declaration in declarations {
        if declaration.is_abstract() {
            return Err(SchemaError::AbstractType {
                ident: declaration.ident().to_string(),
            });
        }
    }
    Ok(())
}

/// Rejects two declarations resolving to the same GraphQL name. With
/// root merging enabled the three root names are exempt; everything
/// else is always a duplicate.
fn assert_unique_names(
    declarations: &[DeclaredType],
    merge_roots: bool,
) -> Result<(), SchemaError> {
    let mut seen: HashMap<&str, &DeclaredType> = HashMap::new();
    for declaration in declarations {
        let Some(name) = declaration.graphql_name() else {
            continue;
        };
        if merge_roots && ROOT_NAMES.contains(&name) {
            continue;
        }
        if let Some(first) = seen.get(name) {
            return Err(SchemaError::DuplicateTypeName {
                first: first.ident().to_string(),
                second: declaration.ident().to_string(),
                name: name.to_string(),
            });
        }
        seen.insert(name, declaration);
    }
    Ok(())
}

/// Rejects definitions the composition pipeline cannot express.
fn reject_unsupported(definition: &TypeSystemDefinition) -> Result<(), SchemaError> {
    if let TypeSystemDefinition::Type(type_definition) = definition {
        if type_definition.node.extend {
            return Err(SchemaError::ExtensionNotSupported {
                ident: type_definition.node.name.node.to_string(),
            });
        }
    }
    Ok(())
}
