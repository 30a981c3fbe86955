//! Declaration-time validation of object types.
//!
//! Error messages are part of the contract and matched exactly.

use graphql_modules::{
    Argument, Field, FieldResolver, ObjectType, Resolver, TypeSpec,
};
use serde_json::json;

fn noop() -> Resolver {
    Resolver::from_fn(|_| Ok(json!(null)))
}

#[test]
fn fields_need_a_type_from_somewhere() {
    let err = ObjectType::new("QueryType")
        .field(Field::untyped("message"))
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines field 'message' without a GraphQL type"
    );
}

#[test]
fn an_attached_resolver_can_supply_the_field_type() {
    let declared = ObjectType::new("QueryType")
        .field(Field::untyped("message"))
        .resolver(FieldResolver::new("message", noop()).of_type(TypeSpec::String.nullable()))
        .define()
        .unwrap();
    assert_eq!(declared.graphql_name(), Some("Query"));
}

#[test]
fn duplicate_final_field_names_are_rejected() {
    let err = ObjectType::new("QueryType")
        .field(Field::new("user_name", TypeSpec::String))
        .field(Field::new("userName", TypeSpec::String))
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines multiple fields with GraphQL name 'userName'"
    );
}

#[test]
fn resolvers_must_target_declared_fields() {
    let err = ObjectType::new("QueryType")
        .field(Field::new("message", TypeSpec::String))
        .resolver(FieldResolver::new("missing", noop()))
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines a resolver for an undefined field 'missing' (valid fields: 'message')"
    );
}

#[test]
fn two_resolvers_for_one_field_are_rejected() {
    let err = ObjectType::new("QueryType")
        .field(Field::new("message", TypeSpec::String))
        .resolver(FieldResolver::new("message", noop()))
        .resolver(FieldResolver::new("message", noop()))
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines multiple resolvers for field 'message'"
    );
}

#[test]
fn a_field_resolver_and_an_attached_resolver_conflict() {
    let err = ObjectType::new("QueryType")
        .field(Field::new("message", TypeSpec::String).resolver(noop()))
        .resolver(FieldResolver::new("message", noop()))
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines multiple resolvers for field 'message'"
    );
}

#[test]
fn descriptions_from_two_sources_conflict() {
    let err = ObjectType::new("QueryType")
        .field(Field::new("message", TypeSpec::String).description("From the field."))
        .resolver(FieldResolver::new("message", noop()).description("From the resolver."))
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines multiple descriptions for field 'message'"
    );
}

#[test]
fn argument_sets_from_two_sources_conflict() {
    let err = ObjectType::new("QueryType")
        .field(
            Field::new("message", TypeSpec::String)
                .argument(Argument::new("limit", TypeSpec::Int)),
        )
        .resolver(
            FieldResolver::new("message", noop()).argument(Argument::new("limit", TypeSpec::Int)),
        )
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines multiple argument option sets for field 'message'"
    );
}

#[test]
fn aliases_must_target_declared_fields() {
    let err = ObjectType::new("UserType")
        .field(Field::new("name", TypeSpec::String))
        .alias("email", "contact_email")
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'UserType' defines an alias for an undefined field 'email' (valid fields: 'name')"
    );
}

#[test]
fn aliases_conflict_with_custom_resolvers() {
    let err = ObjectType::new("UserType")
        .field(Field::new("name", TypeSpec::String).resolver(noop()))
        .alias("name", "full_name")
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'UserType' defines an alias for field 'name' that already has a custom resolver"
    );
}

#[test]
fn schema_text_rejects_declared_fields() {
    let err = ObjectType::new("QueryType")
        .schema("type Query { message: String }")
        .field(Field::new("other", TypeSpec::String))
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines explicit fields; this is not supported together with schema text"
    );
}

#[test]
fn schema_text_resolvers_must_target_schema_fields() {
    let err = ObjectType::new("QueryType")
        .schema("type Query { message: String }")
        .resolver(FieldResolver::new("other", noop()))
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines a resolver for an undefined field 'other' (valid fields: 'message')"
    );
}

#[test]
fn schema_text_rejects_argument_name_overrides() {
    let err = ObjectType::new("QueryType")
        .schema("type Query { users(limit: Int): String }")
        .resolver(
            FieldResolver::new("users", noop())
                .argument(Argument::options("limit").graphql_name("max")),
        )
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines the 'name' option for argument 'limit' of field 'users'; this is not supported together with schema text"
    );
}

#[test]
fn schema_text_rejects_argument_type_overrides() {
    let err = ObjectType::new("QueryType")
        .schema("type Query { users(limit: Int): String }")
        .resolver(
            FieldResolver::new("users", noop())
                .argument(Argument::new("limit", TypeSpec::Int)),
        )
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines the 'type' option for argument 'limit' of field 'users'; this is not supported together with schema text"
    );
}

#[test]
fn schema_text_argument_options_must_exist() {
    let err = ObjectType::new("QueryType")
        .schema("type Query { users(limit: Int): String }")
        .resolver(
            FieldResolver::new("users", noop())
                .argument(Argument::options("offset").description("Where to start.")),
        )
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines options for argument 'offset' of field 'users' that doesn't exist"
    );
}

#[test]
fn schema_text_descriptions_conflict_with_options() {
    let err = ObjectType::new("QueryType")
        .schema("\"The root.\" type Query { message: String }")
        .description("Also the root.")
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' defines a description in both its options and its schema text"
    );
}

#[test]
fn schema_text_without_fields_is_rejected() {
    let err = ObjectType::new("QueryType")
        .schema("type Query")
        .define()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "'QueryType' declares schema text for a type without any fields"
    );
}
