//! # graphql-modules
//!
//! Modular GraphQL schema assembly for [async-graphql] dynamic schemas.
//!
//! Types are declared as plain values through builder APIs (optionally
//! with embedded SDL text) and combined into one coherent, validated,
//! executable schema:
//!
//! - declarations for every GraphQL kind: objects, inputs, enums,
//!   scalars, interfaces, unions and directives;
//! - dependency discovery across field types, argument types and
//!   requirement lists, including deferred references resolved through
//!   a two-phase type registry;
//! - merging of partial `Query`/`Mutation`/`Subscription` definitions
//!   with field collision detection;
//! - deterministic document ordering and SDL printing for byte-stable
//!   output;
//! - resolver, scalar, enum and directive-visitor binding onto the
//!   executable schema.
//!
//! The execution engine itself (query parsing, validation, execution)
//! is async-graphql's dynamic schema; this crate only assembles and
//! binds it.
//!
//! ## Example
//!
//! ```
//! use graphql_modules::{Field, ObjectType, Resolver, TypeSpec, make_executable_schema};
//!
//! let query = ObjectType::new("QueryType")
//!     .field(Field::new("message", TypeSpec::String).resolver(
//!         Resolver::from_fn(|_| Ok("Hello GraphQL!".into())),
//!     ))
//!     .define()
//!     .unwrap();
//!
//! let schema = make_executable_schema([query.into()]).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`error`] - the build error taxonomy
//! - [`name`] - GraphQL name derivation and case conversion
//! - [`value`] - JSON / GraphQL const value conversion
//! - [`registry`] - deferred references and the type registry
//! - [`sort`] / [`print`] - deterministic document ordering and SDL
//!   output
//! - [`schema`] - the `make_executable_schema` entry point
//!
//! [async-graphql]: https://docs.rs/async-graphql

mod ast;
mod bindables;
mod bindings;
mod context;
mod declaration;
mod dependencies;
mod directive;
mod engine;
mod enum_type;
pub mod error;
mod field;
mod input;
mod interface;
mod model;
pub mod name;
mod object;
pub mod print;
pub mod registry;
mod resolver;
mod roots;
mod scalar;
pub mod schema;
pub mod sort;
mod union;
pub mod value;

pub use bindables::{AbstractTypeBindable, Bindable, EnumBindable, ObjectBindable, ScalarBindable};
pub use declaration::{DeclaredType, TypeSpec};
pub use directive::DirectiveType;
pub use enum_type::{EnumMembers, EnumType};
pub use error::SchemaError;
pub use field::{Argument, Field, FieldResolver};
pub use input::{InputField, InputType};
pub use interface::InterfaceType;
pub use object::ObjectType;
pub use print::print_document;
pub use registry::{DeferredType, TypeRegistry};
pub use roots::ROOT_NAMES;
pub use resolver::{
    FieldResult, JsonMap, JsonStream, Resolver, ResolverRequest, SchemaDirectiveVisitor,
    SubscriptionResolver, TypeResolver,
};
pub use scalar::{LiteralFn, ScalarFn, ScalarType};
pub use schema::{
    SchemaItem, SchemaOptions, make_executable_schema, make_executable_schema_with_options,
};
pub use sort::sort_schema_document;
pub use union::UnionType;
pub use value::{const_value_to_json, json_to_const_value};

// The executable schema type and its value/error types, re-exported so
// callers don't need a direct engine dependency.
pub use async_graphql::dynamic::Schema;
pub use async_graphql::{Error as FieldError, Request, Value as GraphQLValue};

/// Result type for schema assembly operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
