//! GridFlow Cloud Infrastructure
//!
//! Provider abstraction for GridFlow: a declared [`ResourceSet`] goes in,
//! a [`Plan`] describes what would change, and [`CloudProvider::apply`]
//! hands the request to the provider's backing apply mechanism (which owns
//! planning, dependency resolution and persistent state).
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 grid CLI                      │
//! │          (validate / synth / deploy)          │
//! └──────────────────┬───────────────────────────┘
//!                    │ ResourceSet
//! ┌──────────────────▼───────────────────────────┐
//! │              gridflow-cloud                   │
//! │        trait CloudProvider { ... }            │
//! └──────────────────┬───────────────────────────┘
//!                    │
//! ┌──────────────────▼───────────────────────────┐
//! │            aws provider (CLI)                 │
//! │        → CloudFormation deploy               │
//! └──────────────────────────────────────────────┘
//! ```

pub mod action;
pub mod error;
pub mod provider;
pub mod state;

// Re-exports
pub use action::{Action, ActionResult, ActionType, ApplyResult, Plan, PlanSummary};
pub use error::{CloudError, Result};
pub use provider::{AuthStatus, CloudProvider, ResourceConfig, ResourceSet};
pub use state::{ProviderState, ResourceState, ResourceStatus};
