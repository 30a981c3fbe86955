//! Error types for schema assembly.
//!
//! Every failure in this crate is fatal and synchronous: a schema build
//! either fully succeeds or returns the first error encountered. Messages
//! name the offending declaration and field so callers can match on them
//! in tests.

use thiserror::Error;

/// Errors raised while declaring types or assembling an executable schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Embedded schema text failed to parse.
    #[error("'{ident}' declares invalid schema text: {message}")]
    Syntax { ident: String, message: String },

    /// A free-form schema text fragment failed to parse.
    #[error("Failed to parse schema text: {0}")]
    FragmentSyntax(String),

    /// Embedded schema text holds more than one definition.
    #[error(
        "'{ident}' declares schema text with more than one GraphQL definition (found: {found})"
    )]
    MultipleDefinitions { ident: String, found: String },

    /// Embedded schema text defines a different kind of type than the
    /// declaration it belongs to.
    #[error("'{ident}' declares schema text with an invalid GraphQL type ('{found}' != '{expected}')")]
    InvalidDefinitionKind {
        ident: String,
        expected: String,
        found: String,
    },

    /// Explicit GraphQL name and the name parsed from schema text disagree.
    #[error(
        "'{ident}' sets both an explicit GraphQL name and schema text, but their names don't match ('{name}' != '{schema_name}')"
    )]
    NameMismatch {
        ident: String,
        name: String,
        schema_name: String,
    },

    /// A description was given both as an option and inside schema text.
    #[error("'{ident}' defines a description in both its options and its schema text")]
    DescriptionConflict { ident: String },

    /// Schema text declares an object or input type without fields.
    #[error("'{ident}' declares schema text for a type without any fields")]
    NoFields { ident: String },

    /// Schema text declares a type extension, which cannot be expressed
    /// through the dynamic execution engine.
    #[error("'{ident}' declares schema text with a type extension; type extensions are not supported")]
    ExtensionNotSupported { ident: String },

    /// A field was declared without a GraphQL type.
    #[error("'{ident}' defines field '{field}' without a GraphQL type")]
    MissingFieldType { ident: String, field: String },

    /// Two fields of one declaration resolve to the same GraphQL name.
    #[error("'{ident}' defines multiple fields with GraphQL name '{name}'")]
    DuplicateFieldName { ident: String, name: String },

    /// Explicit fields were combined with schema text.
    #[error("'{ident}' defines explicit fields; this is not supported together with schema text")]
    FieldsWithSchema { ident: String },

    /// A resolver targets a field the declaration does not define.
    #[error(
        "'{ident}' defines a resolver for an undefined field '{field}' (valid fields: '{fields}')"
    )]
    UndefinedResolverField {
        ident: String,
        field: String,
        fields: String,
    },

    /// Two resolvers target the same field.
    #[error("'{ident}' defines multiple resolvers for field '{field}'")]
    DuplicateResolver { ident: String, field: String },

    /// A field received descriptions from more than one source.
    #[error("'{ident}' defines multiple descriptions for field '{field}'")]
    DuplicateFieldDescription { ident: String, field: String },

    /// A field received argument options from more than one source.
    #[error("'{ident}' defines multiple argument option sets for field '{field}'")]
    DuplicateFieldArguments { ident: String, field: String },

    /// An alias targets a field the declaration does not define.
    #[error("'{ident}' defines an alias for an undefined field '{alias}' (valid fields: '{fields}')")]
    UndefinedAlias {
        ident: String,
        alias: String,
        fields: String,
    },

    /// An alias targets a field that already has a custom resolver.
    #[error("'{ident}' defines an alias for field '{field}' that already has a custom resolver")]
    AliasedResolverField { ident: String, field: String },

    /// An argument was declared without a GraphQL type.
    #[error("'{ident}' defines argument '{argument}' of field '{field}' without a GraphQL type")]
    MissingArgumentType {
        ident: String,
        field: String,
        argument: String,
    },

    /// Argument options name an argument the field does not declare.
    #[error(
        "'{ident}' defines options for argument '{argument}' of field '{field}' that doesn't exist"
    )]
    UndefinedArgument {
        ident: String,
        field: String,
        argument: String,
    },

    /// An argument option only valid without schema text was used with it.
    #[error(
        "'{ident}' defines the '{option}' option for argument '{argument}' of field '{field}'; this is not supported together with schema text"
    )]
    ArgumentOptionWithSchema {
        ident: String,
        field: String,
        argument: String,
        option: String,
    },

    /// An argument received descriptions from more than one source.
    #[error(
        "'{ident}' defines duplicate descriptions for argument '{argument}' of field '{field}'"
    )]
    ArgumentDescriptionConflict {
        ident: String,
        field: String,
        argument: String,
    },

    /// An out name targets a field the schema text does not define.
    #[error("'{ident}' defines an out name for field '{field}' which is not defined in its schema text")]
    UndefinedOutName { ident: String, field: String },

    /// Two fields map to the same out name.
    #[error("'{ident}' maps multiple fields to the out name '{out_name}'")]
    DuplicateOutName { ident: String, out_name: String },

    /// Out names are only meaningful when fields come from schema text.
    #[error("'{ident}' defines out names; this is only supported together with schema text")]
    OutNamesWithoutSchema { ident: String },

    /// An enum declaration has neither members nor schema text.
    #[error(
        "'{ident}' defines no enum members; provide a members mapping, a members list or full schema text"
    )]
    MissingMembers { ident: String },

    /// A members list cannot be checked against schema text.
    #[error("'{ident}' defines its members as a list; this is not supported together with schema text")]
    MemberListWithSchema { ident: String },

    /// The members mapping does not cover every member named in schema text.
    #[error(
        "'{ident}' is missing values for enum members defined in its schema text (missing members: '{missing}')"
    )]
    MissingMemberValues { ident: String, missing: String },

    /// Member descriptions reference members that do not exist.
    #[error(
        "'{ident}' defines descriptions for undefined enum members (undefined members: '{undefined}')"
    )]
    UndefinedMemberDescriptions { ident: String, undefined: String },

    /// A member is described both in the mapping and in schema text.
    #[error(
        "'{ident}' defines descriptions for enum members that already have a description in its schema text (members: '{members}')"
    )]
    DuplicateMemberDescription { ident: String, members: String },

    /// A union declaration without member types.
    #[error("'{ident}' declares a union without any member types")]
    NoUnionMembers { ident: String },

    /// A directive declaration without schema text.
    #[error("'{ident}' declares a directive without schema text")]
    MissingDirectiveSchema { ident: String },

    /// A default value has no GraphQL representation.
    #[error("Value '{value}' can't be represented as a GraphQL value")]
    UnrepresentableValue { value: String },

    /// A field default value has no GraphQL representation.
    #[error(
        "'{ident}' defines a default value for field '{field}' that can't be represented in a GraphQL schema"
    )]
    UnrepresentableDefault { ident: String, field: String },

    /// An abstract declaration reached schema construction.
    #[error("Type '{ident}' is an abstract type and can't be used for schema creation")]
    AbstractType { ident: String },

    /// Two unrelated declarations resolve to the same GraphQL name.
    #[error("Types '{second}' and '{first}' both define GraphQL type with name '{name}'")]
    DuplicateTypeName {
        first: String,
        second: String,
        name: String,
    },

    /// Two root fragments supply the same field.
    #[error(
        "Multiple {root} types are defining same field '{field}': {first_source}, {second_source}"
    )]
    DuplicateRootField {
        root: String,
        field: String,
        first_source: String,
        second_source: String,
    },

    /// More than one root fragment carries a type description.
    #[error("Multiple {root} types are defining descriptions")]
    MultipleRootDescriptions { root: String },

    /// A root fragment is not an object type definition.
    #[error("'{source_name}' defines root type '{root}' with a non-object definition; only object types can be merged")]
    InvalidRootDefinition { root: String, source_name: String },

    /// A definition that cannot take part in root merging.
    #[error("Only type definitions can be merged; found unsupported definition: {found}")]
    UnsupportedDefinition { found: String },

    /// A deferred reference has no registry entry at build time.
    #[error("Deferred type '{key}' is not registered in the type registry")]
    MissingDeferredTarget { key: String },

    /// A relative deferred path walks above the top-level package.
    #[error("Relative path '{path}' points above the top-level package")]
    InvalidDeferredPath { path: String },

    /// The schema builder was called with nothing to build from.
    #[error("'make_executable_schema' was called without any GraphQL types")]
    NoTypesProvided,

    /// Structural validation failure reported by the execution engine,
    /// surfaced verbatim.
    #[error("{0}")]
    Validation(String),
}

/// Joins names for error messages: `a`, `b` -> `a', 'b`.
///
/// Rendered inside single quotes by the error formats above, producing
/// `'a', 'b'`.
pub(crate) fn join_names<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sorted: Vec<String> = names.into_iter().map(|n| n.as_ref().to_string()).collect();
    sorted.sort();
    sorted.join("', '")
}
