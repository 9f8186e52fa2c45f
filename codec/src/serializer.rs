//! The graph walk that emits a JSON:API document from in-memory entities,
//! enforcing resource-identity deduplication so a cyclic or diamond-shaped
//! graph serializes as a finite document.

use std::collections::HashSet;

use serde_json::{Map, Value, json};

use crate::contract::{Contract, Handle, RelationshipKind};
use crate::errors::{CodecError, CodecResult};
use crate::identity::ResourceIdentity;
use crate::naming::camel_to_dashed;
use crate::resolver::ContractResolver;

/// Binds a URI template to an entity, producing the `links.related` value
/// for a relationship. An external collaborator the core only consumes.
pub trait UriTemplateBinder {
    fn bind(&self, template: &str, entity: &Handle) -> String;
}

/// Graph walk over one document's worth of entities.
///
/// Owns a private visited-set scoped to a single call to
/// [`serialize_entity`](Serializer::serialize_entity) or
/// [`serialize_many`](Serializer::serialize_many).
pub struct Serializer<'a> {
    resolver: &'a ContractResolver,
    binder: Option<&'a dyn UriTemplateBinder>,
}

impl<'a> Serializer<'a> {
    pub fn new(resolver: &'a ContractResolver) -> Self {
        Self { resolver, binder: None }
    }

    pub fn with_uri_binder(resolver: &'a ContractResolver, binder: &'a dyn UriTemplateBinder) -> Self {
        Self { resolver, binder: Some(binder) }
    }

    /// Envelope with a singular `data` member.
    pub fn serialize_entity(&self, entity: Option<&Handle>) -> CodecResult<Value> {
        let entity = entity.ok_or_else(|| CodecError::InvalidArgument("entity must not be null".into()))?;

        let mut visited = HashSet::new();
        let mut included = Vec::new();
        let data = self.emit_primary(entity, &mut visited)?;
        self.walk_includes(entity, &mut visited, &mut included)?;

        let mut envelope = Map::new();
        envelope.insert("jsonapi".into(), json!({"version": "1.0"}));
        envelope.insert("data".into(), data);
        if !included.is_empty() {
            envelope.insert("included".into(), Value::Array(included));
        }
        Ok(Value::Object(envelope))
    }

    /// Envelope with an array `data` member.
    pub fn serialize_many(&self, entities: &[Handle]) -> CodecResult<Value> {
        let mut visited = HashSet::new();
        let mut included = Vec::new();

        let mut data = Vec::with_capacity(entities.len());
        for entity in entities {
            data.push(self.emit_primary(entity, &mut visited)?);
        }
        for entity in entities {
            self.walk_includes(entity, &mut visited, &mut included)?;
        }

        let mut envelope = Map::new();
        envelope.insert("data".into(), Value::Array(data));
        if !included.is_empty() {
            envelope.insert("included".into(), Value::Array(included));
        }
        Ok(Value::Object(envelope))
    }

    /// Builds a primary entity's own resource object and records its
    /// identity as visited, so the included-walk never duplicates it.
    fn emit_primary(&self, entity: &Handle, visited: &mut HashSet<ResourceIdentity>) -> CodecResult<Value> {
        let object = self.resource_object(entity)?;
        if let Some(identity) = ResourceIdentity::from_resource_object(&object) {
            visited.insert(identity);
        }
        Ok(object)
    }

    /// Depth-first walk of `entity`'s relationships, appending newly
    /// encountered related resources to `included` in first-encounter
    /// order and recursing into their own relationships.
    fn walk_includes(
        &self,
        entity: &Handle,
        visited: &mut HashSet<ResourceIdentity>,
        included: &mut Vec<Value>,
    ) -> CodecResult<()> {
        let contract = self.resolver.resolve_type(entity.type_id())?;
        for relationship in &contract.relationships {
            let Some(get_related) = relationship.get_related.as_ref() else {
                continue;
            };
            if !relationship.options.contains(crate::contract::FieldOptions::CAN_SERIALIZE) {
                continue;
            }
            let related = get_related(entity);
            if relationship.kind == RelationshipKind::BelongsTo && related.len() > 1 {
                return Err(CodecError::ShapeMismatch(format!(
                    "belongs-to relationship `{}` resolved to more than one related object",
                    relationship.name
                )));
            }
            for related_entity in related {
                let related_object = self.resource_object(&related_entity)?;
                let Some(identity) = ResourceIdentity::from_resource_object(&related_object) else {
                    continue;
                };
                if visited.contains(&identity) {
                    tracing::trace!(resource_type = %identity.resource_type, id = %identity.id, "already visited, skipping include");
                    continue;
                }
                visited.insert(identity);
                included.push(related_object);
                self.walk_includes(&related_entity, visited, included)?;
            }
        }
        Ok(())
    }

    /// Builds just this entity's own resource object: `type`, `id`,
    /// `attributes`, `relationships` (linkage data only — no recursion).
    fn resource_object(&self, entity: &Handle) -> CodecResult<Value> {
        let contract = self.resolver.resolve_type(entity.type_id())?;

        let mut object = Map::new();
        object.insert("type".into(), Value::String(contract.name.to_string()));

        if let Some(id_field) = contract.id_field() {
            if id_field.should_serialize() {
                let get = id_field.get.as_ref().expect("should_serialize implies get is Some");
                let id_value = get(entity)?;
                if !id_value.is_null() {
                    object.insert("id".into(), id_value);
                }
            }
        }

        let attributes = self.attributes_object(contract, entity)?;
        if !attributes.is_empty() {
            object.insert("attributes".into(), Value::Object(attributes));
        }

        let relationships = self.relationships_object(contract, entity)?;
        if !relationships.is_empty() {
            object.insert("relationships".into(), Value::Object(relationships));
        }

        Ok(Value::Object(object))
    }

    fn attributes_object(&self, contract: &Contract, entity: &Handle) -> CodecResult<Map<String, Value>> {
        let mut attributes = Map::new();
        for field in &contract.fields {
            if field.is_id() {
                continue;
            }
            if !field.should_serialize() {
                continue;
            }
            if contract.is_relationship_backed(field.name) {
                continue;
            }
            let get = field.get.as_ref().expect("should_serialize implies get is Some");
            let value = get(entity)?;
            if value.is_null() {
                continue;
            }
            attributes.insert(camel_to_dashed(field.name), value);
        }
        Ok(attributes)
    }

    fn relationships_object(&self, contract: &Contract, entity: &Handle) -> CodecResult<Map<String, Value>> {
        let mut relationships = Map::new();
        for relationship in &contract.relationships {
            let mut rel_obj = Map::new();

            if let (Some(template), Some(binder)) = (relationship.uri_template, self.binder) {
                rel_obj.insert("links".into(), json!({"related": binder.bind(template, entity)}));
            }

            if relationship.options.contains(crate::contract::FieldOptions::CAN_SERIALIZE) {
                self.insert_relationship_data(relationship, entity, &mut rel_obj)?;
            }

            if !rel_obj.is_empty() {
                relationships.insert(camel_to_dashed(relationship.name), Value::Object(rel_obj));
            }
        }
        Ok(relationships)
    }

    fn insert_relationship_data(
        &self,
        relationship: &crate::contract::Relationship,
        entity: &Handle,
        rel_obj: &mut Map<String, Value>,
    ) -> CodecResult<()> {
        match relationship.kind {
            RelationshipKind::BelongsTo => {
                if let Some(get_related) = relationship.get_related.as_ref() {
                    let related = get_related(entity);
                    match related.len() {
                        0 => {} // null current value: omit `data` entirely
                        1 => {
                            let linkage = self.linkage_for(&related[0])?;
                            rel_obj.insert("data".into(), linkage);
                        }
                        _ => {
                            return Err(CodecError::ShapeMismatch(format!(
                                "belongs-to relationship `{}` resolved to more than one related object",
                                relationship.name
                            )));
                        }
                    }
                } else if let Some(get_fk) = relationship.get_foreign_key.as_ref() {
                    let fk_value = get_fk(entity)?;
                    if !fk_value.is_null() {
                        let related_contract = self.resolver.try_resolve_type(relationship.related_type).ok_or_else(
                            || CodecError::UnknownRuntimeType(relationship.related_type_name.to_string()),
                        )?;
                        rel_obj.insert(
                            "data".into(),
                            json!({"type": related_contract.name, "id": fk_value}),
                        );
                    }
                }
            }
            RelationshipKind::HasMany => {
                // via_field is ignored for many-valued relationships (§4.3).
                if let Some(get_related) = relationship.get_related.as_ref() {
                    let related = get_related(entity);
                    let mut linkages = Vec::with_capacity(related.len());
                    for item in &related {
                        linkages.push(self.linkage_for(item)?);
                    }
                    rel_obj.insert("data".into(), Value::Array(linkages));
                }
            }
        }
        Ok(())
    }

    /// Builds a `{type, id}` linkage object, recovering the peer's contract
    /// from its own erased type.
    fn linkage_for(&self, related_entity: &Handle) -> CodecResult<Value> {
        let related_contract = self.resolver.resolve_type(related_entity.type_id())?;
        let id_field = related_contract.id_field().ok_or_else(|| {
            CodecError::ShapeMismatch(format!(
                "related resource `{}` has no id field to build a linkage from",
                related_contract.name
            ))
        })?;
        let get = id_field
            .get
            .as_ref()
            .ok_or_else(|| CodecError::ShapeMismatch(format!("id field of `{}` is not readable", related_contract.name)))?;
        let id_value = get(related_entity)?;
        Ok(json!({"type": related_contract.name, "id": id_value}))
    }
}
