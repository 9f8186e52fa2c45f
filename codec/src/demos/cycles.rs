//! Demo 3 -- a cyclic graph (`Team` has-many `Member`, `Member` belongs-to
//! `Team`) materializes with the round-trip identity law intact: every
//! member's `team` is the *same* allocation as the root, not a copy.

use std::cell::RefCell;
use std::rc::Rc;

use crate::JsonApiResource;
use crate::contract::to_handle;
use crate::deserializer::Deserializer;
use crate::errors::CodecResult;
use crate::jsonapi_resolver;
use crate::serializer::Serializer;

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "teams")]
struct Team {
    #[jsonapi(id)]
    id: String,
    name: String,
    #[jsonapi(has_many(target = "Member"))]
    members: Vec<Rc<RefCell<Member>>>,
}

#[derive(Default, JsonApiResource)]
#[jsonapi(type = "members")]
struct Member {
    #[jsonapi(id)]
    id: String,
    name: String,
    #[jsonapi(belongs_to(target = "Team"))]
    team: Option<Rc<RefCell<Team>>>,
}

/// Demo 3 -- round-trip a cyclic graph and confirm shared identity survives.
pub fn run() -> CodecResult<()> {
    let resolver = jsonapi_resolver!(Team, Member);
    let serializer = Serializer::new(&resolver);
    let deserializer = Deserializer::new(&resolver);

    let team = Rc::new(RefCell::new(Team {
        id: "1".to_string(),
        name: "Platform".to_string(),
        members: Vec::new(),
    }));
    let member = Rc::new(RefCell::new(Member {
        id: "2".to_string(),
        name: "Grace".to_string(),
        team: Some(team.clone()),
    }));
    team.borrow_mut().members.push(member.clone());

    let handle = to_handle(team);
    let document = serializer.serialize_entity(Some(&handle))?;
    assert_eq!(document["included"].as_array().unwrap().len(), 1, "the one member, included once");

    let team_handle = deserializer.deserialize_entity(&document)?;
    let team_rc = team_handle
        .clone()
        .downcast::<RefCell<Team>>()
        .expect("resolver only produced Team handles for this identity");

    let member_rc = team_rc.borrow().members[0].clone();
    let member_team_rc = member_rc.borrow().team.clone().expect("materialized member must have a team");

    assert!(
        Rc::ptr_eq(&team_rc, &member_team_rc),
        "materialized team must be the same allocation on both sides of the cycle"
    );

    Ok(())
}
