//! aws CLI wrapper
//!
//! Wraps the aws CLI for identity checks and CloudFormation stack
//! operations. Persistent state lives entirely in CloudFormation; this
//! wrapper shells out, parses the JSON output, and nothing more.

use crate::error::{AwsError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// aws CLI wrapper
pub struct AwsCli {
    region: Option<String>,
}

impl AwsCli {
    pub fn new(region: Option<String>) -> Self {
        Self { region }
    }

    /// Check the aws CLI is installed and credentials resolve
    pub async fn caller_identity(&self) -> Result<CallerIdentity> {
        let which = Command::new("which").arg("aws").output().await?;
        if !which.status.success() {
            return Err(AwsError::AwsCliNotFound);
        }

        let output = self
            .run_command(&["sts", "get-caller-identity", "--output", "json"])
            .await
            .map_err(|e| match e {
                AwsError::CommandFailed(msg) => AwsError::AuthenticationFailed(msg),
                other => other,
            })?;

        let identity: CallerIdentity = serde_json::from_str(&output)?;
        Ok(identity)
    }

    /// Run an aws command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new("aws");
        if let Some(region) = &self.region {
            cmd.arg("--region").arg(region);
        }
        cmd.args(args);
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: aws {}", args.join(" "));

        let output = cmd.output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AwsError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Describe a stack. Returns None when the stack does not exist.
    pub async fn describe_stack(&self, stack_name: &str) -> Result<Option<StackInfo>> {
        let result = self
            .run_command(&[
                "cloudformation",
                "describe-stacks",
                "--stack-name",
                stack_name,
                "--output",
                "json",
            ])
            .await;

        match result {
            Ok(output) => {
                let described: DescribeStacks = serde_json::from_str(&output)?;
                Ok(described.stacks.into_iter().next())
            }
            Err(AwsError::CommandFailed(msg)) if msg.contains("does not exist") => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// List the logical resources of a stack
    pub async fn list_stack_resources(&self, stack_name: &str) -> Result<Vec<StackResource>> {
        let output = self
            .run_command(&[
                "cloudformation",
                "list-stack-resources",
                "--stack-name",
                stack_name,
                "--output",
                "json",
            ])
            .await?;

        let listed: ListStackResources = serde_json::from_str(&output)?;
        Ok(listed.resource_summaries)
    }

    /// Deploy a template, creating or updating the stack.
    ///
    /// `deploy` drives the whole change-set lifecycle on the engine side and
    /// blocks until the stack settles. `--no-fail-on-empty-changeset` keeps
    /// a no-op deploy from being reported as an error.
    pub async fn deploy(
        &self,
        stack_name: &str,
        template_path: &Path,
        tags: &[(String, String)],
    ) -> Result<()> {
        let template_file = template_path.display().to_string();
        let mut args: Vec<String> = [
            "cloudformation",
            "deploy",
            "--stack-name",
            stack_name,
            "--template-file",
            template_file.as_str(),
            "--capabilities",
            "CAPABILITY_IAM",
            "--no-fail-on-empty-changeset",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        if !tags.is_empty() {
            args.push("--tags".to_string());
            for (key, value) in tags {
                args.push(format!("{key}={value}"));
            }
        }

        let arg_refs: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
        self.run_command(&arg_refs).await?;
        Ok(())
    }

    /// Delete a stack
    pub async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.run_command(&[
            "cloudformation",
            "delete-stack",
            "--stack-name",
            stack_name,
        ])
        .await?;
        Ok(())
    }

    /// Block until a stack deletion completes
    pub async fn wait_stack_deleted(&self, stack_name: &str) -> Result<()> {
        self.run_command(&[
            "cloudformation",
            "wait",
            "stack-delete-complete",
            "--stack-name",
            stack_name,
        ])
        .await?;
        Ok(())
    }
}

/// Identity from `aws sts get-caller-identity`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    #[serde(rename = "Account")]
    pub account: String,
    #[serde(rename = "Arn")]
    pub arn: String,
    #[serde(rename = "UserId")]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct DescribeStacks {
    #[serde(rename = "Stacks")]
    stacks: Vec<StackInfo>,
}

/// Stack summary from `describe-stacks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackInfo {
    #[serde(rename = "StackId")]
    pub stack_id: String,
    #[serde(rename = "StackName")]
    pub stack_name: String,
    #[serde(rename = "StackStatus")]
    pub stack_status: String,
}

#[derive(Debug, Deserialize)]
struct ListStackResources {
    #[serde(rename = "StackResourceSummaries")]
    resource_summaries: Vec<StackResource>,
}

/// One logical resource from `list-stack-resources`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackResource {
    #[serde(rename = "LogicalResourceId")]
    pub logical_resource_id: String,
    #[serde(rename = "PhysicalResourceId", default)]
    pub physical_resource_id: Option<String>,
    #[serde(rename = "ResourceType")]
    pub resource_type: String,
    #[serde(rename = "ResourceStatus")]
    pub resource_status: String,
}

impl StackResource {
    pub fn is_settled(&self) -> bool {
        matches!(
            self.resource_status.as_str(),
            "CREATE_COMPLETE" | "UPDATE_COMPLETE"
        )
    }
}
