//! Reconstructs a type-erased entity graph from a JSON:API document,
//! preserving reference identity: two resource objects sharing a
//! `(type, id)` pair materialize into the same [`Handle`] exactly once.
//!
//! Materialization order is: insert an empty instance into the identity
//! cache *before* populating its fields. This is what lets a cyclic
//! relationship graph (`A` references `B` references `A`) resolve without
//! infinite recursion — the second encounter of `A`'s identity hits the
//! cache and returns the (still-being-populated, but already identity-
//! correct) handle instead of recursing again.

use std::collections::HashMap;

use serde_json::Value;

use crate::contract::{Contract, Handle, RelationshipKind};
use crate::errors::{CodecError, CodecResult};
use crate::identity::ResourceIdentity;
use crate::naming::matches_field;
use crate::resolver::ContractResolver;

/// Materializes one or many entities out of a single document.
///
/// Like [`crate::serializer::Serializer`], scoped to one call: the identity
/// cache and the `included`/`data` index live only for the duration of one
/// [`deserialize_entity`](Deserializer::deserialize_entity) or
/// [`deserialize_many`](Deserializer::deserialize_many) call.
pub struct Deserializer<'a> {
    resolver: &'a ContractResolver,
}

impl<'a> Deserializer<'a> {
    pub fn new(resolver: &'a ContractResolver) -> Self {
        Self { resolver }
    }

    /// Materializes a document whose `data` is a single resource object.
    pub fn deserialize_entity(&self, envelope: &Value) -> CodecResult<Handle> {
        let data = envelope
            .get("data")
            .ok_or_else(|| CodecError::ShapeMismatch("envelope has no `data` member".into()))?;
        if !data.is_object() {
            return Err(CodecError::ShapeMismatch(
                "data must be a single resource object for deserialize_entity".into(),
            ));
        }
        let mut ctx = MaterializeContext::new(self.resolver, envelope);
        ctx.materialize(data)
    }

    /// Materializes a document whose `data` is an array of resource objects.
    pub fn deserialize_many(&self, envelope: &Value) -> CodecResult<Vec<Handle>> {
        let data = envelope
            .get("data")
            .ok_or_else(|| CodecError::ShapeMismatch("envelope has no `data` member".into()))?;
        let items = data.as_array().ok_or_else(|| {
            CodecError::ShapeMismatch("data must be an array of resource objects for deserialize_many".into())
        })?;
        let mut ctx = MaterializeContext::new(self.resolver, envelope);
        items.iter().map(|item| ctx.materialize(item)).collect()
    }
}

struct MaterializeContext<'a> {
    resolver: &'a ContractResolver,
    cache: HashMap<ResourceIdentity, Handle>,
    by_identity: HashMap<ResourceIdentity, &'a Value>,
}

impl<'a> MaterializeContext<'a> {
    fn new(resolver: &'a ContractResolver, envelope: &'a Value) -> Self {
        let mut by_identity = HashMap::new();

        if let Some(included) = envelope.get("included").and_then(Value::as_array) {
            for object in included {
                if let Some(identity) = ResourceIdentity::from_resource_object(object) {
                    by_identity.insert(identity, object);
                }
            }
        }
        match envelope.get("data") {
            Some(Value::Array(items)) => {
                for object in items {
                    if let Some(identity) = ResourceIdentity::from_resource_object(object) {
                        by_identity.entry(identity).or_insert(object);
                    }
                }
            }
            Some(object @ Value::Object(_)) => {
                if let Some(identity) = ResourceIdentity::from_resource_object(object) {
                    by_identity.entry(identity).or_insert(object);
                }
            }
            _ => {}
        }

        Self { resolver, cache: HashMap::new(), by_identity }
    }

    /// Resolution policy for a `{type, id}` linkage (§4.3): cache hit, then
    /// an object of that identity in `included`/`data`, else unresolved —
    /// which is not an error, just a relationship left unset.
    fn resolve_linkage(&mut self, linkage: &Value) -> CodecResult<Option<Handle>> {
        let Some(identity) = ResourceIdentity::from_resource_object(linkage) else {
            return Ok(None);
        };
        if let Some(cached) = self.cache.get(&identity) {
            return Ok(Some(cached.clone()));
        }
        let Some(object) = self.by_identity.get(&identity).copied() else {
            return Ok(None);
        };
        self.materialize(object).map(Some)
    }

    fn materialize(&mut self, object: &Value) -> CodecResult<Handle> {
        let identity = ResourceIdentity::from_resource_object(object);
        if let Some(identity) = &identity {
            if let Some(cached) = self.cache.get(identity) {
                return Ok(cached.clone());
            }
        }

        let type_name = object
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| CodecError::ShapeMismatch("resource object missing `type`".into()))?;
        let resolver = self.resolver;
        let contract = resolver.resolve_wire_name(type_name)?;
        let handle = (contract.create_instance)();

        // Inserted before fields are populated: the cycle-breaking step.
        if let Some(identity) = identity {
            self.cache.insert(identity, handle.clone());
        }

        self.populate_attributes(contract, object, &handle)?;
        self.populate_relationships(contract, object, &handle)?;

        Ok(handle)
    }

    fn populate_attributes(&mut self, contract: &Contract, object: &Value, handle: &Handle) -> CodecResult<()> {
        if let Some(id_field) = contract.id_field() {
            if id_field.should_deserialize() {
                if let Some(id_value) = object.get("id") {
                    let set = id_field.set.as_ref().expect("should_deserialize implies set is Some");
                    set(handle, id_value.clone())?;
                }
            }
        }

        let Some(attributes) = object.get("attributes").and_then(Value::as_object) else {
            return Ok(());
        };
        for field in &contract.fields {
            if field.is_id() || !field.should_deserialize() || contract.is_relationship_backed(field.name) {
                continue;
            }
            let found = attributes.iter().find(|(wire_name, _)| matches_field(wire_name, field.name));
            if let Some((_, value)) = found {
                let set = field.set.as_ref().expect("should_deserialize implies set is Some");
                set(handle, value.clone())?;
            }
        }
        Ok(())
    }

    fn populate_relationships(&mut self, contract: &Contract, object: &Value, handle: &Handle) -> CodecResult<()> {
        let Some(relationships) = object.get("relationships").and_then(Value::as_object) else {
            return Ok(());
        };

        for relationship in &contract.relationships {
            if !relationship.should_deserialize() {
                continue;
            }
            let rel_obj = relationships
                .iter()
                .find(|(wire_name, _)| matches_field(wire_name, relationship.name))
                .map(|(_, value)| value);
            let Some(rel_obj) = rel_obj else { continue };
            let Some(data) = rel_obj.get("data") else { continue };

            match relationship.kind {
                RelationshipKind::BelongsTo => {
                    if data.is_null() {
                        if let Some(set_related) = relationship.set_related.as_ref() {
                            set_related(handle, vec![])?;
                        } else if let Some(set_fk) = relationship.set_foreign_key.as_ref() {
                            set_fk(handle, Value::Null)?;
                        }
                        continue;
                    }
                    if !data.is_object() {
                        return Err(CodecError::ShapeMismatch(format!(
                            "belongs-to relationship `{}` data must be a single linkage object",
                            relationship.name
                        )));
                    }
                    if let Some(set_related) = relationship.set_related.as_ref() {
                        let resolved = self.resolve_linkage(data)?;
                        set_related(handle, resolved.into_iter().collect())?;
                    } else if let Some(set_fk) = relationship.set_foreign_key.as_ref() {
                        if let Some(id_value) = data.get("id") {
                            set_fk(handle, id_value.clone())?;
                        }
                    }
                }
                RelationshipKind::HasMany => {
                    let items = data.as_array().ok_or_else(|| {
                        CodecError::ShapeMismatch(format!(
                            "has-many relationship `{}` data must be an array of linkage objects",
                            relationship.name
                        ))
                    })?;
                    if let Some(set_related) = relationship.set_related.as_ref() {
                        let mut resolved = Vec::with_capacity(items.len());
                        for item in items {
                            if let Some(related_handle) = self.resolve_linkage(item)? {
                                resolved.push(related_handle);
                            }
                        }
                        set_related(handle, resolved)?;
                    }
                }
            }
        }
        Ok(())
    }
}
