//! Demo 1 -- a resource with only scalar attributes, no relationships.

use crate::JsonApiResource;
use crate::contract::new_handle;
use crate::deserializer::Deserializer;
use crate::errors::CodecResult;
use crate::jsonapi_resolver;
use crate::serializer::Serializer;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "articles")]
struct Article {
    #[jsonapi(id)]
    id: String,
    title: String,
    #[jsonapi(attribute(skip_serializing))]
    draft_notes: String,
}

/// Demo 1 -- round-trip a flat resource through serialize and deserialize.
pub fn run() -> CodecResult<()> {
    let resolver = jsonapi_resolver!(Article);
    let serializer = Serializer::new(&resolver);
    let deserializer = Deserializer::new(&resolver);

    let handle = new_handle(Article {
        id: "1".to_string(),
        title: "Hello, JSON:API".to_string(),
        draft_notes: "not for publication".to_string(),
    });

    let document = serializer.serialize_entity(Some(&handle))?;
    assert_eq!(document["data"]["type"], "articles");
    assert_eq!(document["data"]["id"], "1");
    assert_eq!(document["data"]["attributes"]["title"], "Hello, JSON:API");
    assert!(
        document["data"]["attributes"].get("draft-notes").is_none(),
        "skip_serializing field must not appear in attributes"
    );

    let roundtripped = deserializer.deserialize_entity(&document)?;
    let cell = roundtripped
        .downcast_ref::<std::cell::RefCell<Article>>()
        .expect("resolver only produced Article handles");
    assert_eq!(cell.borrow().title, "Hello, JSON:API");

    Ok(())
}
