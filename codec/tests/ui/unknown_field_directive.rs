//! Compile-fail test: unrecognized `#[jsonapi(...)]` field directive.

use jsonapi_codec::JsonApiResource;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "widgets")]
struct Widget {
    #[jsonapi(id)]
    id: String,
    #[jsonapi(indexed)]
    name: String,
}

fn main() {}
