//! Cloud provider trait definition

use crate::action::{ApplyResult, Plan};
use crate::error::Result;
use crate::state::ProviderState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Cloud provider abstraction
///
/// A provider accepts a declared [`ResourceSet`], reports how it differs from
/// what is currently deployed, and hands the set to the backing apply
/// mechanism. The provider never plans dependency ordering itself; that
/// belongs to the engine behind it.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Provider name (e.g., "aws")
    fn name(&self) -> &str;

    /// Display name for UI output
    fn display_name(&self) -> &str;

    /// Check that the provider is configured and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Snapshot of the resources currently deployed for this provider.
    /// Queried live from the engine; nothing is persisted locally.
    async fn current_state(&self) -> Result<ProviderState>;

    /// Compare a declared resource set against the current state
    async fn plan(&self, desired: &ResourceSet) -> Result<Plan>;

    /// Hand the planned changes to the apply mechanism.
    /// Failures are surfaced verbatim and never retried.
    async fn apply(&self, plan: &Plan) -> Result<ApplyResult>;

    /// Tear down everything this provider manages
    async fn destroy(&self) -> Result<ApplyResult>;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    pub authenticated: bool,

    /// Account/user information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Declared set of resources, in declaration order.
///
/// Order is preserved so that composing the same topology twice yields an
/// identical set, and so plans print in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSet {
    resources: Vec<ResourceConfig>,
}

impl ResourceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource. A resource with the same type and id replaces the
    /// earlier declaration in place.
    pub fn add(&mut self, resource: ResourceConfig) {
        if let Some(existing) = self
            .resources
            .iter_mut()
            .find(|r| r.resource_type == resource.resource_type && r.id == resource.id)
        {
            *existing = resource;
        } else {
            self.resources.push(resource);
        }
    }

    pub fn get(&self, resource_type: &str, id: &str) -> Option<&ResourceConfig> {
        self.resources
            .iter()
            .find(|r| r.resource_type == resource_type && r.id == id)
    }

    pub fn by_type(&self, resource_type: &str) -> Vec<&ResourceConfig> {
        self.resources
            .iter()
            .filter(|r| r.resource_type == resource_type)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceConfig> {
        self.resources.iter()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Configuration for one declared resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Resource type (e.g., "vpc", "subnet", "load-balancer")
    pub resource_type: String,

    /// Resource identifier
    pub id: String,

    /// Provider name
    pub provider: String,

    /// Resource-specific configuration
    pub config: serde_json::Value,
}

impl ResourceConfig {
    pub fn new(
        resource_type: impl Into<String>,
        id: impl Into<String>,
        provider: impl Into<String>,
        config: serde_json::Value,
    ) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: id.into(),
            provider: provider.into(),
            config,
        }
    }

    /// Full resource key (type:id)
    pub fn key(&self) -> String {
        format!("{}:{}", self.resource_type, self.id)
    }

    /// Get a configuration value as a specific type
    pub fn get_config<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.config
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resource_set_preserves_insertion_order() {
        let mut set = ResourceSet::new();
        set.add(ResourceConfig::new("vpc", "main", "aws", json!({})));
        set.add(ResourceConfig::new("subnet", "public-1", "aws", json!({})));
        set.add(ResourceConfig::new("subnet", "public-2", "aws", json!({})));

        let keys: Vec<String> = set.iter().map(|r| r.key()).collect();
        assert_eq!(keys, vec!["vpc:main", "subnet:public-1", "subnet:public-2"]);
    }

    #[test]
    fn test_resource_set_replaces_duplicate_in_place() {
        let mut set = ResourceSet::new();
        set.add(ResourceConfig::new("vpc", "main", "aws", json!({"cidr": "10.0.0.0/16"})));
        set.add(ResourceConfig::new("subnet", "public-1", "aws", json!({})));
        set.add(ResourceConfig::new("vpc", "main", "aws", json!({"cidr": "10.1.0.0/16"})));

        assert_eq!(set.len(), 2);
        let vpc = set.get("vpc", "main").unwrap();
        assert_eq!(vpc.get_config::<String>("cidr").unwrap(), "10.1.0.0/16");
        // 置き換えても宣言順は変わらない
        assert_eq!(set.iter().next().unwrap().resource_type, "vpc");
    }

    #[test]
    fn test_by_type_filters() {
        let mut set = ResourceSet::new();
        set.add(ResourceConfig::new("vpc", "main", "aws", json!({})));
        set.add(ResourceConfig::new("subnet", "a", "aws", json!({})));
        set.add(ResourceConfig::new("subnet", "b", "aws", json!({})));

        assert_eq!(set.by_type("subnet").len(), 2);
        assert_eq!(set.by_type("dns-record").len(), 0);
    }
}
