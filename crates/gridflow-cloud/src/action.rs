//! Planned actions and apply results

use serde::{Deserialize, Serialize};

/// A planned change for one declared resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Unique identifier for the action (e.g., "create-vpc:lab81-proj-vpc")
    pub id: String,

    /// Type of change to perform
    pub action_type: ActionType,

    /// Resource type (e.g., "vpc", "subnet", "dns-record")
    pub resource_type: String,

    /// Resource identifier
    pub resource_id: String,

    /// Human-readable description of the change
    pub description: String,
}

/// Type of change to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource
    Create,
    /// Update an existing resource
    Update,
    /// Delete a resource
    Delete,
    /// No changes needed
    NoOp,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "create"),
            ActionType::Update => write!(f, "update"),
            ActionType::Delete => write!(f, "delete"),
            ActionType::NoOp => write!(f, "no-op"),
        }
    }
}

/// Ordered list of planned actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub actions: Vec<Action>,

    /// Whether the plan contains anything other than no-ops
    pub has_changes: bool,
}

impl Plan {
    pub fn new(actions: Vec<Action>) -> Self {
        let has_changes = actions.iter().any(|a| a.action_type != ActionType::NoOp);
        Self {
            actions,
            has_changes,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn actions_by_type(&self, action_type: ActionType) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|a| a.action_type == action_type)
            .collect()
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            create: self.actions_by_type(ActionType::Create).len(),
            update: self.actions_by_type(ActionType::Update).len(),
            delete: self.actions_by_type(ActionType::Delete).len(),
            no_change: self.actions_by_type(ActionType::NoOp).len(),
        }
    }
}

/// Counts of planned actions per type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
    pub no_change: usize,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to create, {} to update, {} to delete, {} unchanged",
            self.create, self.update, self.delete, self.no_change
        )
    }
}

/// Result of applying a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResult {
    pub succeeded: Vec<ActionResult>,
    pub failed: Vec<ActionResult>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, action_id: impl Into<String>, message: impl Into<String>) {
        self.succeeded.push(ActionResult {
            action_id: action_id.into(),
            message: message.into(),
            error: None,
        });
    }

    pub fn add_failure(&mut self, action_id: impl Into<String>, error: impl Into<String>) {
        self.failed.push(ActionResult {
            action_id: action_id.into(),
            message: String::new(),
            error: Some(error.into()),
        });
    }
}

/// Outcome of a single action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub action_id: String,
    pub message: String,
    pub error: Option<String>,
}

impl ActionResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(id: &str, action_type: ActionType) -> Action {
        Action {
            id: id.to_string(),
            action_type,
            resource_type: "vpc".to_string(),
            resource_id: id.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_plan_summary_counts() {
        let plan = Plan::new(vec![
            action("a", ActionType::Create),
            action("b", ActionType::Create),
            action("c", ActionType::NoOp),
            action("d", ActionType::Update),
        ]);

        let summary = plan.summary();
        assert_eq!(summary.create, 2);
        assert_eq!(summary.update, 1);
        assert_eq!(summary.delete, 0);
        assert_eq!(summary.no_change, 1);
        assert!(plan.has_changes);
    }

    #[test]
    fn test_noop_only_plan_has_no_changes() {
        let plan = Plan::new(vec![action("a", ActionType::NoOp)]);
        assert!(!plan.has_changes);

        let empty = Plan::empty();
        assert!(!empty.has_changes);
        assert!(empty.actions.is_empty());
    }

    #[test]
    fn test_apply_result_success_tracking() {
        let mut result = ApplyResult::new();
        result.add_success("create-vpc", "stack deployed");
        assert!(result.is_success());

        result.add_failure("create-record", "zone not found");
        assert!(!result.is_success());
        assert!(!result.failed[0].is_success());
    }
}
