//! Compiled declaration models.
//!
//! A model is the immutable build-time artifact of one declaration: its
//! schema AST fragment plus whatever runtime behavior the execution
//! engine needs bound. Models are created once per declaration per
//! build, cached in the [`BuildContext`](crate::context::BuildContext)
//! and discarded once the schema object exists.

use async_graphql_parser::types::TypeSystemDefinition;

use crate::ast::node;
use crate::directive::DirectiveModel;
use crate::enum_type::EnumModel;
use crate::input::InputModel;
use crate::interface::InterfaceModel;
use crate::object::ObjectModel;
use crate::scalar::ScalarModel;
use crate::union::UnionModel;

/// A compiled declaration of any kind.
pub(crate) enum GraphQLModel {
    Object(ObjectModel),
    Input(InputModel),
    Enum(EnumModel),
    Scalar(ScalarModel),
    Interface(InterfaceModel),
    Union(UnionModel),
    Directive(DirectiveModel),
}

impl GraphQLModel {
    /// The GraphQL name of the modeled type.
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::Object(model) => &model.name,
            Self::Input(model) => &model.name,
            Self::Enum(model) => &model.name,
            Self::Scalar(model) => &model.name,
            Self::Interface(model) => &model.name,
            Self::Union(model) => &model.name,
            Self::Directive(model) => &model.name,
        }
    }

    /// The model's contribution to the schema document.
    pub(crate) fn definition(&self) -> TypeSystemDefinition {
        match self {
            Self::Object(model) => TypeSystemDefinition::Type(node(model.ast.clone())),
            Self::Input(model) => TypeSystemDefinition::Type(node(model.ast.clone())),
            Self::Enum(model) => TypeSystemDefinition::Type(node(model.ast.clone())),
            Self::Scalar(model) => TypeSystemDefinition::Type(node(model.ast.clone())),
            Self::Interface(model) => TypeSystemDefinition::Type(node(model.ast.clone())),
            Self::Union(model) => TypeSystemDefinition::Type(node(model.ast.clone())),
            Self::Directive(model) => TypeSystemDefinition::Directive(node(model.ast.clone())),
        }
    }
}
