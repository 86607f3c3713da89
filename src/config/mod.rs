//! Configuration loading and management

use crate::core::filter::DEFAULT_LIMIT;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// What a repository does with a bulk delete that has no criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkDeletePolicy {
    /// Log a warning and delete nothing
    #[default]
    Skip,

    /// Fail with `DaoError::UnconditionalDelete`
    Reject,
}

/// Configuration for one entity kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityConfig {
    /// Entity kind name (e.g., "user", "product")
    pub name: String,

    /// Row cap for unfiltered queries on this kind
    #[serde(default)]
    pub default_limit: Option<usize>,
}

/// Complete configuration for the repository layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaoConfig {
    /// Row cap applied when no filter is given
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Handling of criteria-less bulk deletes
    #[serde(default)]
    pub bulk_delete: BulkDeletePolicy,

    /// Kinds repositories may be built for; empty allows every registered kind
    #[serde(default)]
    pub entities: Vec<EntityConfig>,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            bulk_delete: BulkDeletePolicy::default(),
            entities: Vec::new(),
        }
    }
}

impl DaoConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Whether a repository may be built for the kind
    ///
    /// If no entities are listed, every kind is allowed (permissive mode)
    pub fn allows(&self, kind: &str) -> bool {
        self.entities.is_empty() || self.entities.iter().any(|e| e.name == kind)
    }

    /// The row cap for unfiltered queries on a kind
    pub fn default_limit_for(&self, kind: &str) -> usize {
        self.entities
            .iter()
            .find(|e| e.name == kind)
            .and_then(|e| e.default_limit)
            .unwrap_or(self.default_limit)
    }
}
