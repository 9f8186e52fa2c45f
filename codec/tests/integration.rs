//! Black-box scenarios that don't fit naturally as demos: dangling
//! relationship references and diamond-shaped sharing.

use std::cell::RefCell;
use std::rc::Rc;

use jsonapi_codec::contract::{new_handle, to_handle};
use jsonapi_codec::{Deserializer, JsonApiResource, Serializer, jsonapi_resolver};
use serde_json::json;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "widgets")]
struct Widget {
    #[jsonapi(id)]
    id: String,
    #[jsonapi(belongs_to(target = "Gadget"))]
    gadget: Option<Rc<RefCell<Gadget>>>,
}

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "gadgets")]
struct Gadget {
    #[jsonapi(id)]
    id: String,
    #[jsonapi(has_many(target = "Widget"))]
    widgets: Vec<Rc<RefCell<Widget>>>,
}

#[test]
fn unresolved_relationship_reference_is_left_unset_not_an_error() {
    let resolver = jsonapi_resolver!(Widget, Gadget);
    let deserializer = Deserializer::new(&resolver);

    let document = json!({
        "data": {
            "type": "widgets",
            "id": "1",
            "relationships": {
                "gadget": {
                    "data": { "type": "gadgets", "id": "missing" }
                }
            }
        }
    });

    let handle = deserializer.deserialize_entity(&document).expect("shape is valid");
    let cell = handle.downcast_ref::<RefCell<Widget>>().unwrap();
    assert!(cell.borrow().gadget.is_none(), "dangling linkage must resolve to unset, not an error");
}

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "comments")]
struct Comment {
    #[jsonapi(id)]
    id: String,
    body: String,
    // No `widget: Option<Rc<RefCell<Widget>>>` field exists here -- the
    // relationship is carried entirely by this scalar foreign key, read and
    // written through `get_foreign_key`/`set_foreign_key` rather than a
    // resolved handle.
    #[jsonapi(belongs_to(target = "Widget", via = "widget_id"))]
    widget_id: String,
}

#[test]
fn foreign_key_only_belongs_to_serializes_linkage_from_the_fk_field() {
    let resolver = jsonapi_resolver!(Widget, Gadget, Comment);
    let serializer = Serializer::new(&resolver);

    let comment = new_handle(Comment {
        id: "1".to_string(),
        body: "nice gadget".to_string(),
        widget_id: "w1".to_string(),
    });

    let document = serializer.serialize_entity(Some(&comment)).expect("serializes");
    assert_eq!(document["data"]["relationships"]["widget_id"]["data"]["type"], "widgets");
    assert_eq!(document["data"]["relationships"]["widget_id"]["data"]["id"], "w1");
    assert!(
        document["data"]["attributes"].get("widget_id").is_none(),
        "the fk-only relationship must not also surface as a plain attribute"
    );
    assert!(document["included"].is_null(), "no Widget handle was ever constructed to include");
}

#[test]
fn foreign_key_only_belongs_to_deserializes_linkage_into_the_fk_field() {
    let resolver = jsonapi_resolver!(Widget, Gadget, Comment);
    let deserializer = Deserializer::new(&resolver);

    let document = json!({
        "data": {
            "type": "comments",
            "id": "1",
            "attributes": { "body": "nice gadget" },
            "relationships": {
                "widget_id": {
                    "data": { "type": "widgets", "id": "w1" }
                }
            }
        }
    });

    let handle = deserializer.deserialize_entity(&document).expect("shape is valid");
    let cell = handle.downcast_ref::<RefCell<Comment>>().unwrap();
    assert_eq!(cell.borrow().widget_id, "w1");
}

#[test]
fn diamond_shaped_graph_includes_shared_resource_once() {
    let resolver = jsonapi_resolver!(Widget, Gadget);
    let serializer = Serializer::new(&resolver);

    let gadget = Rc::new(RefCell::new(Gadget {
        id: "g1".to_string(),
        widgets: Vec::new(),
    }));
    let widget_a = Rc::new(RefCell::new(Widget {
        id: "w1".to_string(),
        gadget: Some(gadget.clone()),
    }));
    let widget_b = Rc::new(RefCell::new(Widget {
        id: "w2".to_string(),
        gadget: Some(gadget.clone()),
    }));
    gadget.borrow_mut().widgets.push(widget_a.clone());
    gadget.borrow_mut().widgets.push(widget_b.clone());

    let entities = vec![to_handle(widget_a), to_handle(widget_b)];
    let document = serializer.serialize_many(&entities).expect("serializes");

    let included = document["included"].as_array().expect("gadget is included");
    assert_eq!(included.len(), 1, "the shared gadget must appear exactly once");
    assert_eq!(included[0]["id"], "g1");
}
