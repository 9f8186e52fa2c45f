//! Demo 2 -- a belongs-to/has-many pair, with compound-document `included`.

use std::cell::RefCell;
use std::rc::Rc;

use crate::JsonApiResource;
use crate::contract::to_handle;
use crate::deserializer::Deserializer;
use crate::errors::CodecResult;
use crate::jsonapi_resolver;
use crate::serializer::Serializer;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "people")]
struct Person {
    #[jsonapi(id)]
    id: String,
    name: String,
    #[jsonapi(has_many(target = "Post"))]
    posts: Vec<Rc<RefCell<Post>>>,
}

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "posts")]
struct Post {
    #[jsonapi(id)]
    id: String,
    title: String,
    #[jsonapi(belongs_to(target = "Person"))]
    author: Option<Rc<RefCell<Person>>>,
}

/// Demo 2 -- a has-many parent whose children belong-to it back; the
/// serialized document carries the children once, under `included`.
pub fn run() -> CodecResult<()> {
    let resolver = jsonapi_resolver!(Person, Post);
    let serializer = Serializer::new(&resolver);
    let deserializer = Deserializer::new(&resolver);

    let author = Rc::new(RefCell::new(Person {
        id: "1".to_string(),
        name: "Ada".to_string(),
        posts: Vec::new(),
    }));
    let post_one = Rc::new(RefCell::new(Post {
        id: "10".to_string(),
        title: "First post".to_string(),
        author: Some(author.clone()),
    }));
    let post_two = Rc::new(RefCell::new(Post {
        id: "11".to_string(),
        title: "Second post".to_string(),
        author: Some(author.clone()),
    }));
    author.borrow_mut().posts.push(post_one.clone());
    author.borrow_mut().posts.push(post_two.clone());

    let handle = to_handle(author);
    let document = serializer.serialize_entity(Some(&handle))?;

    assert_eq!(document["data"]["relationships"]["posts"]["data"].as_array().unwrap().len(), 2);
    let included = document["included"].as_array().expect("two posts should be included");
    assert_eq!(included.len(), 2);

    let roundtripped = deserializer.deserialize_entity(&document)?;
    let cell = roundtripped
        .downcast_ref::<RefCell<Person>>()
        .expect("resolver only produced Person handles for this identity");
    assert_eq!(cell.borrow().posts.len(), 2);
    assert_eq!(cell.borrow().posts[0].borrow().title, "First post");

    Ok(())
}
