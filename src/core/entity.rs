//! Entity traits and schema descriptors
//!
//! An [`EntityKind`] describes the shape of a persisted record: its name,
//! table, identifier field and the fields a filter may reference. Relations
//! point at other kinds so that dotted paths such as `"product.name"` can be
//! resolved one hop at a time.

use crate::core::field::ScalarType;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use uuid::Uuid;

/// Type of a schema field
#[derive(Clone, Copy)]
pub enum FieldType {
    /// A plain value column
    Scalar(ScalarType),

    /// A single-valued reference to another entity kind.
    ///
    /// The target is resolved through a function so that kinds can refer to
    /// themselves (e.g. a category's parent).
    Relation(fn() -> &'static EntityKind),
}

impl FieldType {
    /// The scalar type, if this is a value field
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            FieldType::Scalar(ty) => Some(*ty),
            FieldType::Relation(_) => None,
        }
    }

    /// The target kind, if this is a relation
    pub fn relation(&self) -> Option<&'static EntityKind> {
        match self {
            FieldType::Scalar(_) => None,
            FieldType::Relation(target) => Some(target()),
        }
    }
}

impl fmt::Debug for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(ty) => write!(f, "Scalar({:?})", ty),
            FieldType::Relation(target) => write!(f, "Relation({})", target().name),
        }
    }
}

impl PartialEq for FieldType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldType::Scalar(a), FieldType::Scalar(b)) => a == b,
            (FieldType::Relation(a), FieldType::Relation(b)) => a().name == b().name,
            _ => false,
        }
    }
}

/// A named field of an entity kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

impl Field {
    pub const fn scalar(name: &'static str, ty: ScalarType) -> Self {
        Self {
            name,
            ty: FieldType::Scalar(ty),
        }
    }

    pub const fn relation(name: &'static str, target: fn() -> &'static EntityKind) -> Self {
        Self {
            name,
            ty: FieldType::Relation(target),
        }
    }
}

/// Runtime descriptor of a persisted record type
#[derive(Debug)]
pub struct EntityKind {
    /// Singular entity name (e.g., "user", "product")
    pub name: &'static str,

    /// Table or collection the records live in (e.g., "users")
    pub table: &'static str,

    /// Name of the identifier field
    pub id_field: &'static str,

    /// Fields that filters and orderings may reference
    pub fields: &'static [Field],
}

impl EntityKind {
    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl PartialEq for EntityKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for EntityKind {}

/// Base trait for all persistable records.
///
/// Records are plain serde types; stores persist them as documents or rows.
/// The identifier is optional until the store generates one on insert.
pub trait Entity: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The schema descriptor of this entity type
    fn kind() -> &'static EntityKind;

    /// Get the identifier, `None` when the record was never persisted
    fn id(&self) -> Option<Uuid>;

    /// Set the identifier (used by stores when generating keys)
    fn set_id(&mut self, id: Uuid);
}
