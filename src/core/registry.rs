//! Registry of persistable entity kinds
//!
//! A store only manages the kinds registered with it. Constructing a
//! repository for any other kind fails fast.

use crate::core::entity::{Entity, EntityKind};
use indexmap::IndexMap;

/// Registry for all persistable entity kinds of a store
#[derive(Debug, Default, Clone)]
pub struct EntityRegistry {
    kinds: IndexMap<&'static str, &'static EntityKind>,
}

impl EntityRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            kinds: IndexMap::new(),
        }
    }

    /// Register an entity kind
    ///
    /// The kind name is used as the key; registering twice is harmless.
    pub fn register(&mut self, kind: &'static EntityKind) {
        self.kinds.insert(kind.name, kind);
    }

    /// Builder-style registration of an entity type
    pub fn with<T: Entity>(mut self) -> Self {
        self.register(T::kind());
        self
    }

    /// Whether the kind is registered as persistable
    pub fn contains(&self, kind: &EntityKind) -> bool {
        self.kinds
            .get(kind.name)
            .is_some_and(|registered| registered.table == kind.table)
    }

    /// Get a registered kind by name
    pub fn get(&self, name: &str) -> Option<&'static EntityKind> {
        self.kinds.get(name).copied()
    }

    /// Get all registered kind names, in registration order
    pub fn entity_types(&self) -> Vec<&'static str> {
        self.kinds.keys().copied().collect()
    }
}
