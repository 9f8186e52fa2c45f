//! Compile-fail test: `has_many` on a field that isn't `Vec<Rc<RefCell<T>>>`.

use jsonapi_codec::JsonApiResource;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "authors")]
struct Author {
    #[jsonapi(id)]
    id: String,
}

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "books")]
struct Book {
    #[jsonapi(id)]
    id: String,
    #[jsonapi(has_many(target = "Author"))]
    authors: Vec<String>,
}

fn main() {}
