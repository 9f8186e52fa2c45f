//! Compile-fail test: the derive only supports structs with named fields.

use jsonapi_codec::JsonApiResource;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "widgets")]
struct Widget(String);

fn main() {}
