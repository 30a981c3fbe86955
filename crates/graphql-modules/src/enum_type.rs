//! Enum type declarations.

use std::collections::{HashMap, HashSet};

use async_graphql_parser::types::{
    EnumType as AstEnumType, EnumValueDefinition, TypeDefinition, TypeKind,
};
use serde_json::Value as JsonValue;

use crate::ast::{DefinitionKind, description_node, name_node, node};
use crate::declaration::{DeclaredType, TypeDeclaration, TypeHeader, parse_header_schema};
use crate::error::{SchemaError, join_names};

/// The member source of an enum declaration: a name-to-value mapping or
/// a plain list of names.
#[derive(Clone)]
pub enum EnumMembers {
    /// Member names mapped to the internal values resolvers see.
    Map(Vec<(String, JsonValue)>),
    /// Member names standing for themselves.
    List(Vec<String>),
}

/// Builder for a GraphQL enum type declaration.
///
/// ```
/// use graphql_modules::EnumType;
/// use serde_json::json;
///
/// let level = EnumType::new("UserLevelEnum")
///     .members_map([("GUEST", json!(0)), ("MEMBER", json!(1)), ("ADMIN", json!(2))])
///     .define()
///     .unwrap();
/// assert_eq!(level.graphql_name(), Some("UserLevelEnum"));
/// ```
#[derive(Clone)]
pub struct EnumType {
    header: TypeHeader,
    members: Option<EnumMembers>,
    member_descriptions: Vec<(String, String)>,
}

impl EnumType {
    /// Starts an enum type declaration with the given identifier.
    pub fn new(ident: impl Into<String>) -> Self {
        Self {
            header: TypeHeader::new(ident),
            members: None,
            member_descriptions: Vec::new(),
        }
    }

    /// Overrides the derived GraphQL type name.
    pub fn graphql_name(mut self, name: impl Into<String>) -> Self {
        self.header.graphql_name = Some(name.into());
        self
    }

    /// Declares the whole enum as schema text.
    pub fn schema(mut self, sdl: impl Into<String>) -> Self {
        self.header.schema = Some(sdl.into());
        self
    }

    /// Sets the type description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.header.description = Some(description.into());
        self
    }

    /// Marks this declaration as an abstract building block.
    pub fn abstract_type(mut self) -> Self {
        self.header.abstract_ = true;
        self
    }

    /// Adds a declaration this enum requires.
    pub fn requires(mut self, declaration: &DeclaredType) -> Self {
        self.header.requires.push(declaration.clone());
        self
    }

    /// Declares members as a name-to-value mapping, in iteration order.
    pub fn members_map<I, K>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = (K, JsonValue)>,
        K: Into<String>,
    {
        self.members = Some(EnumMembers::Map(
            members.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ));
        self
    }

    /// Declares members as a list of names standing for themselves.
    pub fn members_list<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members = Some(EnumMembers::List(
            members.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Describes one member.
    pub fn member_description(
        mut self,
        member: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.member_descriptions.push((member.into(), description.into()));
        self
    }

    /// Validates the declaration and returns its handle.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when members are missing, a member
    /// list is combined with schema text, the mapping does not cover the
    /// schema-text members, or member descriptions are duplicated or
    /// reference undefined members.
    pub fn define(self) -> Result<DeclaredType, SchemaError> {
        if self.header.abstract_ {
            return Ok(DeclaredType::new(TypeDeclaration::Enum(self), None));
        }

        let definition = parse_header_schema(&self.header, DefinitionKind::Enum)?;
        let name = self
            .header
            .resolve_name(definition.as_ref().map(|d| d.name.node.as_str()))?;

        match &definition {
            Some(definition) => {
                self.header.validate_description(definition)?;
                let values = match &definition.kind {
                    TypeKind::Enum(values) => &values.values,
                    _ => unreachable!("parse checked the definition kind"),
                };
                if values.is_empty() {
                    return Err(SchemaError::MissingMembers {
                        ident: self.header.ident.clone(),
                    });
                }

                let schema_members: HashSet<&str> = values
                    .iter()
                    .map(|v| v.node.value.node.as_str())
                    .collect();

                match &self.members {
                    Some(EnumMembers::List(_)) => {
                        return Err(SchemaError::MemberListWithSchema {
                            ident: self.header.ident.clone(),
                        });
                    }
                    Some(EnumMembers::Map(map)) => {
                        let mapped: HashSet<&str> =
                            map.iter().map(|(k, _)| k.as_str()).collect();
                        let missing: Vec<&&str> = schema_members.difference(&mapped).collect();
                        if !missing.is_empty() {
                            return Err(SchemaError::MissingMemberValues {
                                ident: self.header.ident.clone(),
                                missing: join_names(missing.iter().map(|m| **m)),
                            });
                        }
                    }
                    None => {}
                }

                self.validate_member_descriptions(&schema_members)?;

                let duplicated: Vec<&str> = values
                    .iter()
                    .filter(|value| value.node.description.is_some())
                    .map(|value| value.node.value.node.as_str())
                    .filter(|member| {
                        self.member_descriptions.iter().any(|(m, _)| m == member)
                    })
                    .collect();
                if !duplicated.is_empty() {
                    return Err(SchemaError::DuplicateMemberDescription {
                        ident: self.header.ident.clone(),
                        members: join_names(duplicated),
                    });
                }
            }
            None => {
                let members = match &self.members {
                    None => {
                        return Err(SchemaError::MissingMembers {
                            ident: self.header.ident.clone(),
                        });
                    }
                    Some(EnumMembers::Map(map)) if map.is_empty() => {
                        return Err(SchemaError::MissingMembers {
                            ident: self.header.ident.clone(),
                        });
                    }
                    Some(EnumMembers::List(list)) if list.is_empty() => {
                        return Err(SchemaError::MissingMembers {
                            ident: self.header.ident.clone(),
                        });
                    }
                    Some(members) => members,
                };

                let names: HashSet<&str> = match members {
                    EnumMembers::Map(map) => map.iter().map(|(k, _)| k.as_str()).collect(),
                    EnumMembers::List(list) => list.iter().map(String::as_str).collect(),
                };
                self.validate_member_descriptions(&names)?;
            }
        }

        Ok(DeclaredType::new(TypeDeclaration::Enum(self), Some(name)))
    }

    fn validate_member_descriptions(&self, members: &HashSet<&str>) -> Result<(), SchemaError> {
        let undefined: Vec<&str> = self
            .member_descriptions
            .iter()
            .map(|(member, _)| member.as_str())
            .filter(|member| !members.contains(member))
            .collect();
        if !undefined.is_empty() {
            return Err(SchemaError::UndefinedMemberDescriptions {
                ident: self.header.ident.clone(),
                undefined: join_names(undefined),
            });
        }
        Ok(())
    }

    pub(crate) fn header(&self) -> &TypeHeader {
        &self.header
    }

    pub(crate) fn compile(&self, name: String) -> Result<EnumModel, SchemaError> {
        let descriptions: HashMap<&str, &str> = self
            .member_descriptions
            .iter()
            .map(|(member, description)| (member.as_str(), description.as_str()))
            .collect();

        if let Some(schema) = &self.header.schema {
            let mut definition =
                crate::ast::parse_type_definition(&self.header.ident, schema, DefinitionKind::Enum)?;
            if definition.description.is_none() {
                definition.description = description_node(self.header.description.as_deref());
            }

            let mut members = Vec::new();
            if let TypeKind::Enum(ast_enum) = &mut definition.kind {
                for value in &mut ast_enum.values {
                    let member = value.node.value.node.to_string();
                    if value.node.description.is_none() {
                        value.node.description =
                            description_node(descriptions.get(member.as_str()).copied());
                    }

                    let mapped = match &self.members {
                        Some(EnumMembers::Map(map)) => map
                            .iter()
                            .find(|(k, _)| *k == member)
                            .map(|(_, v)| v.clone())
                            .unwrap_or_else(|| JsonValue::String(member.clone())),
                        _ => JsonValue::String(member.clone()),
                    };
                    members.push((member, mapped));
                }
            }

            return Ok(EnumModel {
                name,
                ast: definition,
                members,
            });
        }

        let members: Vec<(String, JsonValue)> = match &self.members {
            Some(EnumMembers::Map(map)) => map.clone(),
            Some(EnumMembers::List(list)) => list
                .iter()
                .map(|member| (member.clone(), JsonValue::String(member.clone())))
                .collect(),
            None => Vec::new(),
        };

        let values = members
            .iter()
            .map(|(member, _)| {
                node(EnumValueDefinition {
                    description: description_node(descriptions.get(member.as_str()).copied()),
                    value: name_node(member),
                    directives: Vec::new(),
                })
            })
            .collect();

        Ok(EnumModel {
            name: name.clone(),
            ast: TypeDefinition {
                extend: false,
                description: description_node(self.header.description.as_deref()),
                name: name_node(&name),
                directives: Vec::new(),
                kind: TypeKind::Enum(AstEnumType { values }),
            },
            members,
        })
    }
}

/// Compiled enum model.
pub(crate) struct EnumModel {
    pub name: String,
    pub ast: TypeDefinition,
    pub members: Vec<(String, JsonValue)>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn members_are_required_without_schema_text() {
        let err = EnumType::new("UserLevelEnum").define().unwrap_err();
        assert_eq!(
            err.to_string(),
            "'UserLevelEnum' defines no enum members; provide a members mapping, a members list or full schema text"
        );
    }

    #[test]
    fn member_lists_conflict_with_schema_text() {
        let err = EnumType::new("UserLevelEnum")
            .schema("enum UserLevel { GUEST MEMBER }")
            .members_list(["GUEST", "MEMBER"])
            .define()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'UserLevelEnum' defines its members as a list; this is not supported together with schema text"
        );
    }

    #[test]
    fn mapping_must_cover_schema_members() {
        let err = EnumType::new("UserLevelEnum")
            .schema("enum UserLevel { GUEST MEMBER ADMIN }")
            .members_map([("GUEST", json!(0))])
            .define()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'UserLevelEnum' is missing values for enum members defined in its schema text (missing members: 'ADMIN', 'MEMBER')"
        );
    }

    #[test]
    fn member_descriptions_must_target_members() {
        let err = EnumType::new("UserLevelEnum")
            .members_list(["GUEST", "MEMBER"])
            .member_description("ADMIN", "Administrators.")
            .define()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'UserLevelEnum' defines descriptions for undefined enum members (undefined members: 'ADMIN')"
        );
    }

    #[test]
    fn schema_and_mapping_descriptions_conflict() {
        let err = EnumType::new("UserLevelEnum")
            .schema("enum UserLevel { \"Guests.\" GUEST MEMBER }")
            .members_map([("GUEST", json!(0)), ("MEMBER", json!(1))])
            .member_description("GUEST", "Also guests.")
            .define()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "'UserLevelEnum' defines descriptions for enum members that already have a description in its schema text (members: 'GUEST')"
        );
    }
}
