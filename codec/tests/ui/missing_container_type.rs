//! Compile-fail test: missing `#[jsonapi(type = "...")]` on the struct.

use jsonapi_codec::JsonApiResource;

#[derive(Default, JsonApiResource)]
struct Widget {
    #[jsonapi(id)]
    id: String,
}

fn main() {}
