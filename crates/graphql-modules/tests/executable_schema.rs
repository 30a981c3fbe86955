//! Integration tests for schema composition.
//!
//! These cover the composition pipeline up to the built schema object:
//! root merging, duplicate detection, deferred references and input
//! validation. Query execution against the built schema is covered in
//! `execution.rs`.

use graphql_modules::{
    Field, InputField, InputType, ObjectType, Resolver, SchemaError, SchemaItem, SchemaOptions,
    TypeRegistry, TypeSpec, make_executable_schema, make_executable_schema_with_options,
};
use graphql_modules::registry::DeferredType;

fn message_resolver() -> Resolver {
    Resolver::from_fn(|_| Ok("ok".into()))
}

#[test]
fn builds_a_schema_from_a_single_declaration() {
    let query = ObjectType::new("QueryType")
        .field(Field::new("message", TypeSpec::String).resolver(message_resolver()))
        .define()
        .unwrap();

    let schema = make_executable_schema([query.into()]).unwrap();
    assert!(schema.sdl().contains("message"));
}

#[test]
fn builds_a_schema_from_text_fragments_and_bindings() {
    let schema = make_executable_schema([
        "type Query { message: String }".into(),
        SchemaItem::Bindable(
            graphql_modules::ObjectBindable::new("Query")
                .resolver("message", message_resolver())
                .into(),
        ),
    ])
    .unwrap();
    assert!(schema.sdl().contains("message"));
}

#[test]
fn merges_two_root_declarations_into_one_query_type() {
    let first = ObjectType::new("FirstRoot")
        .schema("type Query { name: String surname: String }")
        .define()
        .unwrap();
    let second = ObjectType::new("SecondRoot")
        .schema("type Query { message: String }")
        .define()
        .unwrap();

    let schema = make_executable_schema([first.into(), second.into()]).unwrap();

    // Merged fields come out sorted by name regardless of which
    // declaration contributed them.
    let sdl = schema.sdl();
    let message = sdl.find("message").unwrap();
    let name = sdl.find("name").unwrap();
    let surname = sdl.find("surname").unwrap();
    assert!(message < name && name < surname, "unexpected order in: {sdl}");
}

#[test]
fn root_field_collisions_name_both_declarations() {
    let first = ObjectType::new("FirstRoot")
        .schema("type Query { message: String }")
        .define()
        .unwrap();
    let second = ObjectType::new("SecondRoot")
        .schema("type Query { message: String }")
        .define()
        .unwrap();

    let err = make_executable_schema([first.into(), second.into()]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Multiple Query types are defining same field 'message': FirstRoot, SecondRoot"
    );
}

#[test]
fn disabling_merge_makes_two_roots_a_duplicate_type() {
    let first = ObjectType::new("FirstRoot")
        .schema("type Query { name: String surname: String }")
        .define()
        .unwrap();
    let second = ObjectType::new("SecondRoot")
        .schema("type Query { message: String }")
        .define()
        .unwrap();

    let options = SchemaOptions {
        merge_roots: false,
        ..SchemaOptions::new()
    };
    let err =
        make_executable_schema_with_options([first.into(), second.into()], options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Types 'SecondRoot' and 'FirstRoot' both define GraphQL type with name 'Query'"
    );
}

#[test]
fn duplicate_non_root_type_names_are_rejected() {
    let first = ObjectType::new("UserType")
        .field(Field::new("id", TypeSpec::Id))
        .define()
        .unwrap();
    let second = ObjectType::new("AccountType")
        .graphql_name("User")
        .field(Field::new("id", TypeSpec::Id))
        .define()
        .unwrap();
    let query = ObjectType::new("QueryType")
        .field(Field::new("user", TypeSpec::of(&first).nullable()))
        .field(Field::new("account", TypeSpec::of(&second).nullable()))
        .define()
        .unwrap();

    let err = make_executable_schema([query.into()]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Types 'AccountType' and 'UserType' both define GraphQL type with name 'User'"
    );
}

#[test]
fn passing_the_same_declaration_twice_is_not_a_duplicate() {
    let user = ObjectType::new("UserType")
        .field(Field::new("id", TypeSpec::Id))
        .define()
        .unwrap();
    let query = ObjectType::new("QueryType")
        .field(Field::new("user", TypeSpec::of(&user).nullable()))
        .define()
        .unwrap();

    let items = vec![
        SchemaItem::from(&query),
        SchemaItem::from(&user),
        SchemaItem::List(vec![SchemaItem::from(&user)]),
    ];
    make_executable_schema(items).unwrap();
}

#[test]
fn abstract_declarations_cannot_reach_schema_creation() {
    let base = ObjectType::new("BaseType").abstract_type().define().unwrap();

    let err = make_executable_schema([base.into()]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Type 'BaseType' is an abstract type and can't be used for schema creation"
    );
}

#[test]
fn zero_usable_inputs_fail_before_engine_construction() {
    let err = make_executable_schema(Vec::<SchemaItem>::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "'make_executable_schema' was called without any GraphQL types"
    );
}

#[test]
fn deferred_references_resolve_through_the_registry() {
    let mut registry = TypeRegistry::new();

    let category = ObjectType::new("CategoryType")
        .field(Field::new("name", TypeSpec::String))
        .field(Field::new(
            "parent",
            TypeSpec::deferred(DeferredType::new("catalog.types", "CategoryType")).nullable(),
        ))
        .define()
        .unwrap();
    registry.register("catalog.types.CategoryType", &category);

    let query = ObjectType::new("QueryType")
        .field(Field::new("category", TypeSpec::of(&category).nullable()))
        .define()
        .unwrap();

    let options = SchemaOptions {
        registry,
        ..SchemaOptions::new()
    };
    let schema = make_executable_schema_with_options([query.into()], options).unwrap();
    assert!(schema.sdl().contains("Category"));
}

#[test]
fn missing_deferred_targets_fail_the_build() {
    let query = ObjectType::new("QueryType")
        .field(Field::new(
            "user",
            TypeSpec::deferred(DeferredType::new("users.types", "UserType")).nullable(),
        ))
        .define()
        .unwrap();

    let err = make_executable_schema([query.into()]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Deferred type 'users.types.UserType' is not registered in the type registry"
    );
}

#[test]
fn engine_validation_errors_surface_verbatim_wrapped() {
    // The fragment references a type nobody defines; the execution
    // engine reports it during structural validation.
    let err = make_executable_schema(["type Query { user: User }".into()]).unwrap_err();
    assert!(matches!(err, SchemaError::Validation(_)), "got: {err}");
}

#[test]
fn type_extensions_in_fragments_are_rejected() {
    let err = make_executable_schema([
        "type Query { message: String }".into(),
        "extend type Query { more: String }".into(),
    ])
    .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'Query' declares schema text with a type extension; type extensions are not supported"
    );
}

#[test]
fn input_types_flow_through_dependency_discovery() {
    let filters = InputType::new("UserFiltersInput")
        .field(InputField::new("min_age", TypeSpec::Int.nullable()))
        .define()
        .unwrap();
    let query = ObjectType::new("QueryType")
        .field(
            Field::new("users", TypeSpec::list(TypeSpec::String))
                .argument(graphql_modules::Argument::new(
                    "filters",
                    TypeSpec::of(&filters).nullable(),
                ))
                .resolver(Resolver::from_fn(|_| Ok(serde_json::json!([])))),
        )
        .define()
        .unwrap();

    let schema = make_executable_schema([query.into()]).unwrap();
    assert!(schema.sdl().contains("UserFiltersInput"));
}
