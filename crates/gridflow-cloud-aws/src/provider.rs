//! AWS provider implementation
//!
//! Drives CloudFormation through the aws CLI. One provider instance manages
//! one stack: the synthesized template is handed over as a whole and the
//! engine owns dependency ordering, diffing and rollback. Failures come back
//! verbatim and are never retried here.

use crate::awscli::AwsCli;
use crate::error::AwsError;
use crate::model::TopologyRequest;
use crate::template;
use async_trait::async_trait;
use gridflow_cloud::{
    Action, ActionType, ApplyResult, AuthStatus, CloudError, CloudProvider, Plan, ProviderState,
    ResourceSet, ResourceState, ResourceStatus,
};
use std::time::Instant;

/// AWS provider. Manages the single stack a topology request describes.
pub struct AwsProvider {
    cli: AwsCli,
    stack_name: String,
    template: serde_json::Value,
    tags: Vec<(String, String)>,
}

impl AwsProvider {
    /// Build a provider for one composed topology
    pub fn for_topology(topology: &TopologyRequest, region: Option<String>) -> Self {
        Self {
            cli: AwsCli::new(region),
            stack_name: topology.stack_name.clone(),
            template: template::synthesize(topology),
            tags: topology.tags(),
        }
    }

    pub fn stack_name(&self) -> &str {
        &self.stack_name
    }

    fn template_path(&self) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("gridflow-{}.template.json", self.stack_name))
    }
}

#[async_trait]
impl CloudProvider for AwsProvider {
    fn name(&self) -> &str {
        "aws"
    }

    fn display_name(&self) -> &str {
        "AWS CloudFormation"
    }

    async fn check_auth(&self) -> gridflow_cloud::Result<AuthStatus> {
        match self.cli.caller_identity().await {
            Ok(identity) => Ok(AuthStatus::ok(format!(
                "{} ({})",
                identity.account, identity.arn
            ))),
            Err(AwsError::AwsCliNotFound) => {
                Ok(AuthStatus::failed("aws CLI がインストールされていません"))
            }
            Err(AwsError::AuthenticationFailed(msg)) => Ok(AuthStatus::failed(msg)),
            Err(e) => Ok(AuthStatus::failed(e.to_string())),
        }
    }

    async fn current_state(&self) -> gridflow_cloud::Result<ProviderState> {
        let mut state = ProviderState::new();

        let Some(stack) = self.cli.describe_stack(&self.stack_name).await? else {
            tracing::debug!(stack = %self.stack_name, "Stack does not exist yet");
            return Ok(state);
        };

        tracing::debug!(stack = %self.stack_name, status = %stack.stack_status, "Stack found");

        for resource in self.cli.list_stack_resources(&self.stack_name).await? {
            let mut entry = ResourceState::new(
                resource.logical_resource_id.clone(),
                resource.resource_type.clone(),
            )
            .with_status(resource_status_from_cfn(&resource.resource_status));

            if let Some(physical_id) = &resource.physical_resource_id {
                entry = entry.with_attribute("physical_id", serde_json::json!(physical_id));
            }

            state.insert(resource.logical_resource_id, entry);
        }

        Ok(state)
    }

    async fn plan(&self, desired: &ResourceSet) -> gridflow_cloud::Result<Plan> {
        let current = self.current_state().await?;
        let actions = diff_actions(desired, &current);

        let plan = Plan::new(actions);
        tracing::info!(stack = %self.stack_name, "{}", plan.summary());
        Ok(plan)
    }

    async fn apply(&self, plan: &Plan) -> gridflow_cloud::Result<ApplyResult> {
        let started = Instant::now();
        let mut result = ApplyResult::new();

        let path = self.template_path();
        let body =
            serde_json::to_vec_pretty(&self.template).map_err(CloudError::Json)?;
        tokio::fs::write(&path, body).await.map_err(CloudError::Io)?;

        tracing::info!(stack = %self.stack_name, template = %path.display(), "Deploying stack");

        let deployed = self.cli.deploy(&self.stack_name, &path, &self.tags).await;
        let _ = tokio::fs::remove_file(&path).await;

        match deployed {
            Ok(()) => {
                for action in &plan.actions {
                    result.add_success(&action.id, "applied");
                }
            }
            Err(e) => {
                // Surfaced verbatim; the engine already rolled back
                let message = CloudError::ApplyFailed(e.to_string()).to_string();
                tracing::error!(stack = %self.stack_name, "{message}");
                for action in &plan.actions {
                    result.add_failure(&action.id, &message);
                }
            }
        }

        result.duration_ms = started.elapsed().as_millis() as u64;
        Ok(result)
    }

    async fn destroy(&self) -> gridflow_cloud::Result<ApplyResult> {
        let started = Instant::now();
        let mut result = ApplyResult::new();
        let action_id = format!("delete-stack:{}", self.stack_name);

        if self.cli.describe_stack(&self.stack_name).await?.is_none() {
            tracing::info!(stack = %self.stack_name, "Nothing to destroy");
            return Ok(result);
        }

        match self.cli.delete_stack(&self.stack_name).await {
            Ok(()) => match self.cli.wait_stack_deleted(&self.stack_name).await {
                Ok(()) => result.add_success(&action_id, "stack deleted"),
                Err(e) => result.add_failure(&action_id, e.to_string()),
            },
            Err(e) => result.add_failure(&action_id, e.to_string()),
        }

        result.duration_ms = started.elapsed().as_millis() as u64;
        Ok(result)
    }
}

/// Map a CloudFormation resource status string to the provider-neutral one
fn resource_status_from_cfn(status: &str) -> ResourceStatus {
    if status.contains("ROLLBACK") || status.contains("FAILED") {
        return ResourceStatus::Failed;
    }
    match status {
        "CREATE_COMPLETE" | "UPDATE_COMPLETE" | "IMPORT_COMPLETE" => ResourceStatus::Available,
        "CREATE_IN_PROGRESS" => ResourceStatus::Creating,
        "UPDATE_IN_PROGRESS" => ResourceStatus::Updating,
        "DELETE_IN_PROGRESS" => ResourceStatus::Deleting,
        _ => ResourceStatus::Unknown,
    }
}

/// Compare the declared set against the deployed snapshot.
///
/// Presentation-level only: an already-deployed resource shows as no-op and
/// a failed one as update. The real diff is the engine's change set,
/// computed at apply time.
fn diff_actions(desired: &ResourceSet, current: &ProviderState) -> Vec<Action> {
    desired
        .iter()
        .map(|resource| {
            let logical_id = resource
                .get_config::<String>("logical_id")
                .unwrap_or_else(|| resource.id.clone());

            let (action_type, description) = match current.get(&logical_id) {
                None => (
                    ActionType::Create,
                    format!("{} {} を作成", resource.resource_type, resource.id),
                ),
                Some(state) if state.status == ResourceStatus::Failed => (
                    ActionType::Update,
                    format!("{} {} を再適用", resource.resource_type, resource.id),
                ),
                Some(_) => (
                    ActionType::NoOp,
                    format!("{} {} は既に存在します", resource.resource_type, resource.id),
                ),
            };

            Action {
                id: format!("{}-{}", action_type, resource.key()),
                action_type,
                resource_type: resource.resource_type.clone(),
                resource_id: resource.id.clone(),
                description,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridflow_cloud::ResourceConfig;
    use serde_json::json;

    fn desired_set() -> ResourceSet {
        let mut set = ResourceSet::new();
        set.add(ResourceConfig::new(
            "vpc",
            "lab81-proj-vpc",
            "aws",
            json!({ "logical_id": "Vpc" }),
        ));
        set.add(ResourceConfig::new(
            "subnet",
            "public-1",
            "aws",
            json!({ "logical_id": "PublicSubnet1" }),
        ));
        set
    }

    #[test]
    fn test_diff_against_empty_state_creates_everything() {
        let actions = diff_actions(&desired_set(), &ProviderState::new());

        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|a| a.action_type == ActionType::Create));
        assert_eq!(actions[0].id, "create-vpc:lab81-proj-vpc");
    }

    #[test]
    fn test_diff_marks_deployed_resources_as_noop() {
        let mut current = ProviderState::new();
        current.insert(
            "Vpc",
            ResourceState::new("Vpc", "AWS::EC2::VPC").with_status(ResourceStatus::Available),
        );

        let actions = diff_actions(&desired_set(), &current);

        assert_eq!(actions[0].action_type, ActionType::NoOp);
        assert_eq!(actions[1].action_type, ActionType::Create);
    }

    #[test]
    fn test_diff_marks_failed_resources_for_update() {
        let mut current = ProviderState::new();
        current.insert(
            "Vpc",
            ResourceState::new("Vpc", "AWS::EC2::VPC").with_status(ResourceStatus::Failed),
        );

        let actions = diff_actions(&desired_set(), &current);
        assert_eq!(actions[0].action_type, ActionType::Update);
    }

    #[test]
    fn test_cfn_status_mapping() {
        assert_eq!(
            resource_status_from_cfn("CREATE_COMPLETE"),
            ResourceStatus::Available
        );
        assert_eq!(
            resource_status_from_cfn("UPDATE_ROLLBACK_COMPLETE"),
            ResourceStatus::Failed
        );
        assert_eq!(
            resource_status_from_cfn("CREATE_FAILED"),
            ResourceStatus::Failed
        );
        assert_eq!(
            resource_status_from_cfn("DELETE_IN_PROGRESS"),
            ResourceStatus::Deleting
        );
        assert_eq!(
            resource_status_from_cfn("REVIEW_IN_PROGRESS"),
            ResourceStatus::Unknown
        );
    }
}
