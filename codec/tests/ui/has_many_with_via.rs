//! Compile-fail test: `has_many` cannot take `via` (it's meaningless for a
//! many-valued relationship).

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
    #[jsonapi(has_many(target = "Author", via = "author_ids"))]
    authors: Vec<std::rc::Rc<std::cell::RefCell<Author>>>,
}

fn main() {}
