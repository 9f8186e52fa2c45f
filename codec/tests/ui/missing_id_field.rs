//! Compile-fail test: no field marked `#[jsonapi(id)]`.

use jsonapi_codec::JsonApiResource;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "widgets")]
struct Widget {
    name: String,
}

fn main() {}
