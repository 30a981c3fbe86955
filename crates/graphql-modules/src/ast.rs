//! Helpers over the `async_graphql_parser` schema AST.
//!
//! Declarations with embedded schema text are parsed here; the rest of
//! the crate builds AST nodes programmatically through the small
//! constructors below. Parser positions carry no meaning for
//! programmatically built nodes and default to zero.

use async_graphql::Name;
use async_graphql_parser::types::{
    DirectiveDefinition, ServiceDocument, TypeDefinition, TypeKind, TypeSystemDefinition,
};
use async_graphql_parser::{Pos, Positioned, parse_schema};

use crate::error::SchemaError;

/// Wraps a node with a default position.
pub(crate) fn node<T>(value: T) -> Positioned<T> {
    Positioned::new(value, Pos::default())
}

/// Builds a positioned name node.
pub(crate) fn name_node(value: &str) -> Positioned<Name> {
    node(Name::new(value))
}

/// Builds a description node from an optional string, dedenting and
/// trimming it the way block strings are written in source.
pub(crate) fn description_node(description: Option<&str>) -> Option<Positioned<String>> {
    description.map(|text| node(dedent(text).trim().to_string()))
}

/// Strips the common leading indentation from every non-empty line.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    if indent == 0 {
        return text.to_string();
    }

    text.lines()
        .map(|line| if line.len() >= indent { &line[indent..] } else { line.trim_start() })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The syntactic kinds a declaration's schema text may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DefinitionKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    Directive,
}

impl DefinitionKind {
    pub(crate) fn of(kind: &TypeKind) -> Self {
        match kind {
            TypeKind::Scalar => Self::Scalar,
            TypeKind::Object(_) => Self::Object,
            TypeKind::Interface(_) => Self::Interface,
            TypeKind::Union(_) => Self::Union,
            TypeKind::Enum(_) => Self::Enum,
            TypeKind::InputObject(_) => Self::InputObject,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Object => "type",
            Self::Interface => "interface",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::InputObject => "input",
            Self::Directive => "directive",
        }
    }
}

/// Parses free-form schema text into its definitions.
pub(crate) fn parse_fragment(sdl: &str) -> Result<Vec<TypeSystemDefinition>, SchemaError> {
    let document: ServiceDocument =
        parse_schema(sdl).map_err(|err| SchemaError::FragmentSyntax(err.to_string()))?;
    Ok(document.definitions)
}

/// Parses a declaration's schema text, asserting it holds exactly one
/// type definition of the expected kind.
pub(crate) fn parse_type_definition(
    ident: &str,
    sdl: &str,
    expected: DefinitionKind,
) -> Result<TypeDefinition, SchemaError> {
    let definitions = parse_declaration_schema(ident, sdl)?;

    match into_single(ident, definitions)? {
        TypeSystemDefinition::Type(definition) => {
            let definition = definition.node;
            if definition.extend {
                return Err(SchemaError::ExtensionNotSupported {
                    ident: ident.to_string(),
                });
            }
            let found = DefinitionKind::of(&definition.kind);
            if found != expected {
                return Err(SchemaError::InvalidDefinitionKind {
                    ident: ident.to_string(),
                    expected: expected.label().to_string(),
                    found: found.label().to_string(),
                });
            }
            Ok(definition)
        }
        other => Err(SchemaError::InvalidDefinitionKind {
            ident: ident.to_string(),
            expected: expected.label().to_string(),
            found: definition_label(&other).to_string(),
        }),
    }
}

/// Parses a directive declaration's schema text.
pub(crate) fn parse_directive_definition(
    ident: &str,
    sdl: &str,
) -> Result<DirectiveDefinition, SchemaError> {
    let definitions = parse_declaration_schema(ident, sdl)?;

    match into_single(ident, definitions)? {
        TypeSystemDefinition::Directive(definition) => Ok(definition.node),
        other => Err(SchemaError::InvalidDefinitionKind {
            ident: ident.to_string(),
            expected: DefinitionKind::Directive.label().to_string(),
            found: definition_label(&other).to_string(),
        }),
    }
}

fn parse_declaration_schema(
    ident: &str,
    sdl: &str,
) -> Result<Vec<TypeSystemDefinition>, SchemaError> {
    let document: ServiceDocument = parse_schema(sdl).map_err(|err| SchemaError::Syntax {
        ident: ident.to_string(),
        message: err.to_string(),
    })?;
    Ok(document.definitions)
}

fn into_single(
    ident: &str,
    definitions: Vec<TypeSystemDefinition>,
) -> Result<TypeSystemDefinition, SchemaError> {
    if definitions.len() != 1 {
        let found = definitions
            .iter()
            .map(definition_label)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(SchemaError::MultipleDefinitions {
            ident: ident.to_string(),
            found,
        });
    }

    Ok(definitions.into_iter().next().expect("checked length"))
}

/// A short label describing a definition, for error messages.
pub(crate) fn definition_label(definition: &TypeSystemDefinition) -> &'static str {
    match definition {
        TypeSystemDefinition::Schema(_) => "schema",
        TypeSystemDefinition::Directive(_) => "directive",
        TypeSystemDefinition::Type(definition) => {
            if definition.node.extend {
                "type extension"
            } else {
                DefinitionKind::of(&definition.node.kind).label()
            }
        }
    }
}

/// The name of a type system definition, when it has one.
pub(crate) fn definition_name(definition: &TypeSystemDefinition) -> Option<&str> {
    match definition {
        TypeSystemDefinition::Type(definition) => Some(definition.node.name.node.as_str()),
        TypeSystemDefinition::Directive(definition) => Some(definition.node.name.node.as_str()),
        TypeSystemDefinition::Schema(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_type_definition() {
        let definition = parse_type_definition(
            "UserType",
            "type User { id: ID! }",
            DefinitionKind::Object,
        )
        .unwrap();
        assert_eq!(definition.name.node.as_str(), "User");
    }

    #[test]
    fn rejects_multiple_definitions() {
        let err = parse_type_definition(
            "UserType",
            "type User { id: ID! } type Group { id: ID! }",
            DefinitionKind::Object,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'UserType' declares schema text with more than one GraphQL definition (found: type, type)"
        );
    }

    #[test]
    fn rejects_wrong_definition_kind() {
        let err = parse_type_definition(
            "UserType",
            "input User { id: ID! }",
            DefinitionKind::Object,
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'UserType' declares schema text with an invalid GraphQL type ('input' != 'type')"
        );
    }

    #[test]
    fn rejects_type_extensions() {
        let err = parse_type_definition(
            "UserType",
            "extend type User { id: ID! }",
            DefinitionKind::Object,
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::ExtensionNotSupported { .. }));
    }

    #[test]
    fn rejects_invalid_syntax() {
        let err =
            parse_type_definition("UserType", "type User {", DefinitionKind::Object).unwrap_err();
        assert!(matches!(err, SchemaError::Syntax { .. }));
    }

    #[test]
    fn dedents_descriptions() {
        let description = description_node(Some(
            "
            Lorem ipsum dolor
            sit amet.
            ",
        ))
        .unwrap();
        assert_eq!(description.node, "Lorem ipsum dolor\nsit amet.");
    }
}
