//! Compile-fail test: `belongs_to` field is neither `Option<Rc<RefCell<T>>>`
//! nor accompanied by a `via` naming the foreign-key field.

use jsonapi_codec::JsonApiResource;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "publishers")]
struct Publisher {
    #[jsonapi(id)]
    id: String,
}

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "books")]
struct Book {
    #[jsonapi(id)]
    id: String,
    #[jsonapi(belongs_to(target = "Publisher"))]
    publisher_id: String,
}

fn main() {}
