//! AWS network topology provider for GridFlow
//!
//! This crate turns a resolved parameter record into a declarative network
//! topology and hands it to CloudFormation, which owns planning, dependency
//! resolution and state.
//!
//! # Pipeline
//!
//! 1. [`topology::compose`] builds the typed [`TopologyRequest`] (subnet
//!    tiers, security group, instance role, fleet, load balancer, listener,
//!    DNS alias) without touching the network
//! 2. [`template::synthesize`] lowers the request into the CloudFormation
//!    JSON document
//! 3. [`AwsProvider`] submits the document through the aws CLI
//!
//! # Requirements
//!
//! - The `aws` CLI must be installed and configured
//! - The hosted zone and the ACM certificate must already exist; they are
//!   referenced, never created, and only the engine validates them
//!
//! # Example
//!
//! ```ignore
//! use gridflow_cloud::CloudProvider;
//! use gridflow_cloud_aws::{AwsProvider, topology};
//!
//! let request = topology::compose(&params)?;
//! let provider = AwsProvider::for_topology(&request, params.region.clone());
//!
//! let plan = provider.plan(&request.to_resource_set()).await?;
//! let result = provider.apply(&plan).await?;
//! ```

pub mod awscli;
pub mod cidr;
pub mod error;
pub mod model;
pub mod provider;
pub mod template;
pub mod topology;
pub mod user_data;

pub use awscli::{AwsCli, CallerIdentity, StackInfo, StackResource};
pub use cidr::{CidrBlock, SubnetAllocator};
pub use error::{AwsError, Result};
pub use model::{
    DnsAliasSpec, FleetSpec, IngressRule, IngressSource, InstanceRoleSpec, ListenerSpec,
    LoadBalancerSpec, NetworkSpec, SecurityGroupSpec, SubnetSpec, SubnetTier, TargetGroupSpec,
    TopologyRequest,
};
pub use provider::AwsProvider;
pub use template::synthesize;
pub use topology::compose;
