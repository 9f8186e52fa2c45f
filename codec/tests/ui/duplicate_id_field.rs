//! Compile-fail test: more than one field marked `#[jsonapi(id)]`.

use jsonapi_codec::JsonApiResource;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "widgets")]
struct Widget {
    #[jsonapi(id)]
    id: String,
    #[jsonapi(id)]
    other_id: String,
}

fn main() {}
