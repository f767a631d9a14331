//! Deployed-resource state snapshots
//!
//! GridFlow keeps no state files of its own: the apply mechanism owns the
//! persistent record of what exists. These types only carry the snapshot a
//! provider reads back from the engine when planning.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of the resources a provider currently has deployed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderState {
    /// Resources indexed by their engine-side identifier
    pub resources: HashMap<String, ResourceState>,
}

impl ProviderState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&ResourceState> {
        self.resources.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, state: ResourceState) {
        self.resources.insert(id.into(), state);
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// State of a single deployed resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    /// Engine-side identifier
    pub id: String,

    /// Resource type (e.g., "vpc", "subnet")
    pub resource_type: String,

    pub status: ResourceStatus,

    /// Provider-specific attributes (physical IDs, endpoints, ...)
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl ResourceState {
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: resource_type.into(),
            status: ResourceStatus::Unknown,
            attributes: HashMap::new(),
        }
    }

    pub fn with_status(mut self, status: ResourceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Lifecycle status as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    Creating,
    Available,
    Updating,
    Deleting,
    Failed,
    Unknown,
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceStatus::Creating => write!(f, "creating"),
            ResourceStatus::Available => write!(f, "available"),
            ResourceStatus::Updating => write!(f, "updating"),
            ResourceStatus::Deleting => write!(f, "deleting"),
            ResourceStatus::Failed => write!(f, "failed"),
            ResourceStatus::Unknown => write!(f, "unknown"),
        }
    }
}
