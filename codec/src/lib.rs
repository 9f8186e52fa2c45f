//! A bidirectional JSON:API 1.0 codec driven by a declarative contract
//! model: annotate your domain types with `#[derive(JsonApiResource)]`,
//! register them in a [`ContractResolver`], then hand entities to a
//! [`Serializer`] or a [`Deserializer`].
//!
//! ```ignore
//! use jsonapi_codec::{ContractResolver, Serializer, contract::{new_handle, Handle}};
//!
//! let resolver = jsonapi_codec::jsonapi_resolver!(Post, User, Comment);
//! let serializer = Serializer::new(&resolver);
//! let document = serializer.serialize_entity(Some(&post_handle))?;
//! ```

// `#[derive(JsonApiResource)]` and `jsonapi_resolver!` expand to paths rooted
// at `::jsonapi_codec`, including in this crate's own `demos` module. Without
// this, those paths only resolve for external crates that depend on us.
extern crate self as jsonapi_codec;

pub mod contract;
pub mod demos;
pub mod deserializer;
pub mod errors;
pub mod identity;
pub mod naming;
pub mod resolver;
pub mod scalar;
pub mod serializer;

pub use contract::{Contract, FieldOptions, Handle, JsonApiResource, RelationshipKind};
pub use deserializer::Deserializer;
pub use errors::{CodecError, CodecResult};
pub use identity::ResourceIdentity;
pub use resolver::ContractResolver;
pub use serializer::{Serializer, UriTemplateBinder};

// Re-exported so generated `#[derive(JsonApiResource)]` code can refer to
// `::jsonapi_codec::Value` without requiring serde_json as a direct
// dependency of the crate the derive is used in.
pub use serde_json::Value;

pub use jsonapi_codec_macros::{JsonApiResource, jsonapi_resolver};
