//! Field-path resolution
//!
//! A dotted path such as `"order.user.email"` is resolved from the query
//! [`Root`] one segment at a time: every hop but the last must go through a
//! relation field, and each segment must exist in the schema of the kind it
//! is looked up in. The result is a [`Path`] carrying the resolved segments
//! and the type of the field it ends on.

use crate::core::entity::{Entity, EntityKind, FieldType};
use crate::core::error::{DaoError, DaoResult};
use crate::core::field::ScalarType;
use std::fmt;

/// The root of a query: the entity kind being selected, counted or deleted
#[derive(Debug, Clone, Copy)]
pub struct Root {
    kind: &'static EntityKind,
}

impl Root {
    pub fn new(kind: &'static EntityKind) -> Self {
        Self { kind }
    }

    /// Root for an entity type
    pub fn of<T: Entity>() -> Self {
        Self::new(T::kind())
    }

    pub fn kind(&self) -> &'static EntityKind {
        self.kind
    }

    /// Resolve a dotted path, one hop per segment
    pub fn get(&self, path: &str) -> DaoResult<Path> {
        if path.is_empty() {
            return Err(DaoError::invalid_path(path, "path has no segments"));
        }

        let mut segments = path.split('.');
        // split always yields at least one item
        let first = segments.next().unwrap_or_default();
        let mut resolved = Path::step(self.kind, &Path::empty(), first)?;
        for segment in segments {
            resolved = resolved.get(segment)?;
        }
        Ok(resolved)
    }
}

/// A resolved field path
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    segments: Vec<&'static str>,
    owners: Vec<&'static EntityKind>,
    ty: FieldType,
}

impl Path {
    fn empty() -> Self {
        Self {
            segments: Vec::new(),
            owners: Vec::new(),
            ty: FieldType::Scalar(ScalarType::String),
        }
    }

    /// Follow one more segment from this path
    pub fn get(&self, segment: &str) -> DaoResult<Path> {
        match self.ty.relation() {
            Some(kind) => Path::step(kind, self, segment),
            None => Err(DaoError::invalid_path(
                join(&self.segments, Some(segment)),
                format!("'{}' is not a relation", self),
            )),
        }
    }

    fn step(kind: &'static EntityKind, parent: &Path, segment: &str) -> DaoResult<Path> {
        let parent_segments = &parent.segments;
        if segment.is_empty() {
            return Err(DaoError::invalid_path(
                join(parent_segments, Some(segment)),
                "empty path segment",
            ));
        }

        let field = kind.field(segment).ok_or_else(|| {
            DaoError::invalid_path(
                join(parent_segments, Some(segment)),
                format!("'{}' has no field '{}'", kind.name, segment),
            )
        })?;

        let mut segments = parent.segments.clone();
        segments.push(field.name);
        let mut owners = parent.owners.clone();
        owners.push(kind);
        Ok(Path {
            segments,
            owners,
            ty: field.ty,
        })
    }

    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    /// The kind each segment was looked up in, root kind first
    pub fn owners(&self) -> &[&'static EntityKind] {
        &self.owners
    }

    pub fn field_type(&self) -> FieldType {
        self.ty
    }

    /// The scalar type the path ends on, `None` if it ends on a relation
    pub fn scalar_type(&self) -> Option<ScalarType> {
        self.ty.scalar()
    }

    /// Require the path to end on a value field
    pub(crate) fn expect_scalar(&self) -> DaoResult<ScalarType> {
        self.scalar_type().ok_or_else(|| {
            DaoError::invalid_path(self.to_string(), "path ends on a relation, not a value")
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

fn join(parent: &[&str], last: Option<&str>) -> String {
    let mut all: Vec<&str> = parent.to_vec();
    all.extend(last);
    all.join(".")
}
