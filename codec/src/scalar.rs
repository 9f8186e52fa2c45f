//! The scalar JSON codec boundary: the two operations the spec treats as an
//! external black box, realized here as thin wrappers over `serde_json`.
//! `#[derive(JsonApiResource)]`-generated accessors call these two
//! functions; nothing else in the crate depends on `serde_json`'s
//! `Serialize`/`Deserialize` traits directly.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::CodecResult;

pub fn serialize_value<T: Serialize>(value: &T) -> CodecResult<Value> {
    Ok(serde_json::to_value(value)?)
}

pub fn deserialize_value<T: DeserializeOwned>(value: Value) -> CodecResult<T> {
    Ok(serde_json::from_value(value)?)
}
