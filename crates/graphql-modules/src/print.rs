//! Schema document printing.
//!
//! Renders a schema document to SDL text. Together with
//! [`sort_schema_document`](crate::sort::sort_schema_document) this
//! yields byte-stable output for identical inputs, suitable for
//! snapshot tests and content-hash caching.

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    ConstDirective, DirectiveDefinition, EnumValueDefinition, FieldDefinition,
    InputValueDefinition, SchemaDefinition, ServiceDocument, TypeDefinition, TypeKind,
    TypeSystemDefinition,
};

/// Prints a schema document as SDL.
pub fn print_document(document: &ServiceDocument) -> String {
    let mut blocks = Vec::with_capacity(document.definitions.len());
    for definition in &document.definitions {
        blocks.push(match definition {
            TypeSystemDefinition::Schema(schema) => print_schema_definition(&schema.node),
            TypeSystemDefinition::Directive(directive) => {
                print_directive_definition(&directive.node)
            }
            TypeSystemDefinition::Type(definition) => print_type_definition(&definition.node),
        });
    }
    let mut printed = blocks.join("\n\n");
    printed.push('\n');
    printed
}

fn print_schema_definition(schema: &SchemaDefinition) -> String {
    let mut out = String::from("schema");
    out.push_str(&print_directives(&schema.directives));
    out.push_str(" {\n");
    if let Some(query) = &schema.query {
        out.push_str(&format!("  query: {}\n", query.node));
    }
    if let Some(mutation) = &schema.mutation {
        out.push_str(&format!("  mutation: {}\n", mutation.node));
    }
    if let Some(subscription) = &schema.subscription {
        out.push_str(&format!("  subscription: {}\n", subscription.node));
    }
    out.push('}');
    out
}

fn print_directive_definition(directive: &DirectiveDefinition) -> String {
    let mut out = String::new();
    out.push_str(&print_description(directive.description.as_ref(), ""));
    out.push_str(&format!("directive @{}", directive.name.node));
    out.push_str(&print_arguments_definition(&directive.arguments));
    if directive.is_repeatable {
        out.push_str(" repeatable");
    }
    let locations = directive
        .locations
        .iter()
        .map(|location| location_name(&format!("{:?}", location.node)))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(&format!(" on {locations}"));
    out
}

/// Converts a location's debug name (`FieldDefinition`) to its SDL
/// spelling (`FIELD_DEFINITION`).
fn location_name(debug_name: &str) -> String {
    let mut out = String::with_capacity(debug_name.len() + 4);
    for (i, c) in debug_name.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_uppercase());
    }
    out
}

fn print_type_definition(definition: &TypeDefinition) -> String {
    let name = definition.name.node.as_str();
    let mut out = String::new();
    out.push_str(&print_description(definition.description.as_ref(), ""));

    match &definition.kind {
        TypeKind::Scalar => {
            out.push_str(&format!("scalar {name}"));
            out.push_str(&print_directives(&definition.directives));
        }
        TypeKind::Object(object) => {
            out.push_str(&format!("type {name}"));
            out.push_str(&print_implements(&object.implements));
            out.push_str(&print_directives(&definition.directives));
            out.push_str(&print_fields(&object.fields));
        }
        TypeKind::Interface(interface) => {
            out.push_str(&format!("interface {name}"));
            out.push_str(&print_implements(&interface.implements));
            out.push_str(&print_directives(&definition.directives));
            out.push_str(&print_fields(&interface.fields));
        }
        TypeKind::Union(union) => {
            out.push_str(&format!("union {name}"));
            out.push_str(&print_directives(&definition.directives));
            let members = union
                .members
                .iter()
                .map(|member| member.node.as_str())
                .collect::<Vec<_>>()
                .join(" | ");
            out.push_str(&format!(" = {members}"));
        }
        TypeKind::Enum(node) => {
            out.push_str(&format!("enum {name}"));
            out.push_str(&print_directives(&definition.directives));
            out.push_str(" {\n");
            for value in &node.values {
                out.push_str(&print_enum_value(&value.node));
            }
            out.push('}');
        }
        TypeKind::InputObject(input) => {
            out.push_str(&format!("input {name}"));
            out.push_str(&print_directives(&definition.directives));
            out.push_str(" {\n");
            for field in &input.fields {
                out.push_str(&print_description(field.node.description.as_ref(), "  "));
                out.push_str(&format!("  {}\n", print_input_value(&field.node)));
            }
            out.push('}');
        }
    }

    out
}

fn print_implements(implements: &[Positioned<async_graphql::Name>]) -> String {
    if implements.is_empty() {
        return String::new();
    }
    let names = implements
        .iter()
        .map(|name| name.node.as_str())
        .collect::<Vec<_>>()
        .join(" & ");
    format!(" implements {names}")
}

fn print_fields(fields: &[Positioned<FieldDefinition>]) -> String {
    let mut out = String::from(" {\n");
    for field in fields {
        let field = &field.node;
        out.push_str(&print_description(field.description.as_ref(), "  "));
        out.push_str(&format!("  {}", field.name.node));
        out.push_str(&print_arguments_definition(&field.arguments));
        out.push_str(&format!(": {}", field.ty.node));
        out.push_str(&print_directives(&field.directives));
        out.push('\n');
    }
    out.push('}');
    out
}

fn print_enum_value(value: &EnumValueDefinition) -> String {
    let mut out = String::new();
    out.push_str(&print_description(value.description.as_ref(), "  "));
    out.push_str(&format!("  {}", value.value.node));
    out.push_str(&print_directives(&value.directives));
    out.push('\n');
    out
}

fn print_arguments_definition(arguments: &[Positioned<InputValueDefinition>]) -> String {
    if arguments.is_empty() {
        return String::new();
    }

    // Argument descriptions force the multiline form; plain argument
    // lists stay on one line.
    if arguments.iter().any(|arg| arg.node.description.is_some()) {
        let mut out = String::from("(\n");
        for argument in arguments {
            out.push_str(&print_description(argument.node.description.as_ref(), "    "));
            out.push_str(&format!("    {}\n", print_input_value(&argument.node)));
        }
        out.push_str("  )");
        return out;
    }

    let rendered = arguments
        .iter()
        .map(|argument| print_input_value(&argument.node))
        .collect::<Vec<_>>()
        .join(", ");
    format!("({rendered})")
}

fn print_input_value(value: &InputValueDefinition) -> String {
    let mut out = format!("{}: {}", value.name.node, value.ty.node);
    if let Some(default) = &value.default_value {
        out.push_str(&format!(" = {}", default.node));
    }
    out.push_str(&print_directives(&value.directives));
    out
}

fn print_directives(directives: &[Positioned<ConstDirective>]) -> String {
    let mut out = String::new();
    for directive in directives {
        out.push_str(&format!(" @{}", directive.node.name.node));
        if !directive.node.arguments.is_empty() {
            let arguments = directive
                .node
                .arguments
                .iter()
                .map(|(name, value)| format!("{}: {}", name.node, value.node))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("({arguments})"));
        }
    }
    out
}

fn print_description(description: Option<&Positioned<String>>, indent: &str) -> String {
    let Some(description) = description else {
        return String::new();
    };
    let text = description.node.replace("\"\"\"", "\\\"\"\"");

    if text.contains('\n') {
        let body = text
            .lines()
            .map(|line| format!("{indent}{line}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{indent}\"\"\"\n{body}\n{indent}\"\"\"\n")
    } else {
        format!("{indent}\"\"\"{text}\"\"\"\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::parse_fragment;
    use crate::sort::sort_schema_document;

    fn print(sdl: &str) -> String {
        print_document(&ServiceDocument {
            definitions: parse_fragment(sdl).unwrap(),
        })
    }

    #[test]
    fn prints_objects_with_arguments_and_defaults() {
        let printed = print("type Query { user(id: ID!, active: Boolean = true): String }");
        assert_eq!(
            printed,
            "type Query {\n  user(id: ID!, active: Boolean = true): String\n}\n"
        );
    }

    #[test]
    fn prints_descriptions_as_block_strings() {
        let printed = print("\"Lorem ipsum.\" type Query { \"Field.\" value: Int }");
        assert_eq!(
            printed,
            "\"\"\"Lorem ipsum.\"\"\"\ntype Query {\n  \"\"\"Field.\"\"\"\n  value: Int\n}\n"
        );
    }

    #[test]
    fn prints_directive_locations() {
        let printed = print("directive @auth(role: String) on FIELD_DEFINITION | OBJECT");
        assert_eq!(
            printed,
            "directive @auth(role: String) on FIELD_DEFINITION | OBJECT\n"
        );
    }

    #[test]
    fn printing_sorted_documents_is_deterministic() {
        let sdl_a = "type User { id: ID } scalar Date type Query { user: User }";
        let sdl_b = "type Query { user: User } type User { id: ID } scalar Date";

        let print_sorted = |sdl: &str| {
            print_document(&sort_schema_document(ServiceDocument {
                definitions: parse_fragment(sdl).unwrap(),
            }))
        };
        assert_eq!(print_sorted(sdl_a), print_sorted(sdl_b));
    }

    #[test]
    fn printing_is_stable_under_reparse() {
        let printed = print(
            "enum Level { \"Basic.\" GUEST MEMBER } union Actor = User | Bot type User { id: ID } type Bot { id: ID } type Query { actor: Actor level: Level }",
        );
        assert_eq!(print(&printed), printed);
    }
}
