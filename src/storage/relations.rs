//! Relations stored as references
//!
//! A relation field is persisted as `{"id": "<uuid>"}`, never as a copy of
//! the related record. Reading a record resolves every reference against
//! the related kind's current row, recursively, so a dotted path such as
//! `"supplier.name"` always sees the latest state of the supplier. A
//! reference whose row is gone, or that leads back to a record already on
//! the current chain, reads as null.

use crate::core::entity::EntityKind;
use crate::core::error::StoreError;
use serde_json::{Map, Value};
use std::collections::HashMap;
use uuid::Uuid;

/// Access to the current documents of related records
pub trait Related {
    fn related(&self, kind: &'static EntityKind, id: Uuid) -> Option<&Value>;
}

/// Documents loaded ahead of resolution, keyed by kind name and id
pub type Loaded = HashMap<(&'static str, Uuid), Value>;

impl Related for Loaded {
    fn related(&self, kind: &'static EntityKind, id: Uuid) -> Option<&Value> {
        self.get(&(kind.name, id))
    }
}

fn id_of(doc: &Value) -> Option<Uuid> {
    doc.get("id")?.as_str()?.parse().ok()
}

/// Replace embedded related records by references to them.
///
/// A related record without an id was never persisted and cannot be
/// referenced, which is an integrity error.
pub fn to_stored(mut doc: Value, kind: &'static EntityKind) -> Result<Value, StoreError> {
    let Some(fields) = doc.as_object_mut() else {
        return Ok(doc);
    };

    for field in kind.fields {
        let Some(target) = field.ty.relation() else {
            continue;
        };
        let Some(value) = fields.get_mut(field.name) else {
            continue;
        };
        if value.is_null() {
            continue;
        }

        let id = id_of(value).ok_or_else(|| StoreError::Integrity {
            message: format!(
                "{}.{} refers to a {} that has not been persisted",
                kind.name, field.name, target.name
            ),
        })?;
        let mut reference = Map::new();
        reference.insert("id".to_string(), Value::String(id.to_string()));
        *value = Value::Object(reference);
    }

    Ok(doc)
}

/// The records a stored document refers to directly
pub fn references(doc: &Value, kind: &'static EntityKind) -> Vec<(&'static EntityKind, Uuid)> {
    kind.fields
        .iter()
        .filter_map(|field| {
            let target = field.ty.relation()?;
            let id = id_of(doc.get(field.name)?)?;
            Some((target, id))
        })
        .collect()
}

/// Replace references by the current related records, recursively
pub fn resolve(doc: &Value, kind: &'static EntityKind, source: &impl Related) -> Value {
    let mut chain = Vec::new();
    resolve_chain(doc, kind, source, &mut chain)
}

fn resolve_chain(
    doc: &Value,
    kind: &'static EntityKind,
    source: &impl Related,
    chain: &mut Vec<Uuid>,
) -> Value {
    let Some(mut fields) = doc.as_object().cloned() else {
        return doc.clone();
    };

    let own_id = id_of(doc);
    chain.extend(own_id);

    for field in kind.fields {
        let Some(target) = field.ty.relation() else {
            continue;
        };
        let related = match fields.get(field.name).and_then(id_of) {
            Some(id) if !chain.contains(&id) => source.related(target, id),
            _ => None,
        };
        let value = match related {
            Some(related) => resolve_chain(related, target, source, chain),
            None => Value::Null,
        };
        fields.insert(field.name.to_string(), value);
    }

    if own_id.is_some() {
        chain.pop();
    }
    Value::Object(fields)
}
