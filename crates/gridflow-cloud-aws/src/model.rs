//! Typed topology model
//!
//! The declarative description of everything the stack provisions: network,
//! subnet tiers, security posture, compute fleet, load distribution and DNS
//! alias. A [`TopologyRequest`] is built once per run by the composer, is
//! immutable afterwards, and compares structurally (`PartialEq`) so equal
//! inputs can be verified to produce equal requests.

use crate::cidr::CidrBlock;
use gridflow_cloud::{ResourceConfig, ResourceSet};
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const PROVIDER_NAME: &str = "aws";

/// Subnet tier, replicated once per availability zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubnetTier {
    /// Routable from the internet (ingress and egress)
    Public,
    /// Outbound internet through a NAT gateway, no inbound
    PrivateWithEgress,
    /// No internet route in either direction
    PrivateIsolated,
}

impl SubnetTier {
    /// Short group name used in subnet names
    pub fn group_name(&self) -> &'static str {
        match self {
            SubnetTier::Public => "public",
            SubnetTier::PrivateWithEgress => "compute",
            SubnetTier::PrivateIsolated => "data",
        }
    }

    /// Prefix used for template logical IDs
    pub fn logical_prefix(&self) -> &'static str {
        match self {
            SubnetTier::Public => "Public",
            SubnetTier::PrivateWithEgress => "Compute",
            SubnetTier::PrivateIsolated => "Data",
        }
    }

    pub fn all() -> [SubnetTier; 3] {
        [
            SubnetTier::Public,
            SubnetTier::PrivateWithEgress,
            SubnetTier::PrivateIsolated,
        ]
    }
}

/// One subnet (a tier in a single availability zone)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubnetSpec {
    /// e.g. "public-1"
    pub name: String,
    pub tier: SubnetTier,
    /// Zero-based index into the region's availability zones
    pub az_index: u32,
    pub cidr: CidrBlock,
}

impl SubnetSpec {
    pub fn logical_id(&self) -> String {
        format!("{}Subnet{}", self.tier.logical_prefix(), self.az_index + 1)
    }
}

/// The VPC and its subnet layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    pub cidr: CidrBlock,
    pub max_availability_zones: u32,
    pub nat_gateways: u32,
    pub subnets: Vec<SubnetSpec>,
}

impl NetworkSpec {
    pub fn subnets_in_tier(&self, tier: SubnetTier) -> Vec<&SubnetSpec> {
        self.subnets.iter().filter(|s| s.tier == tier).collect()
    }

    pub fn public_subnets(&self) -> Vec<&SubnetSpec> {
        self.subnets_in_tier(SubnetTier::Public)
    }
}

/// Source of an ingress rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IngressSource {
    /// 0.0.0.0/0
    AnyIpv4,
    /// Members of the same security group
    OwnGroup,
}

/// One inbound TCP rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngressRule {
    pub description: String,
    pub port: u16,
    pub source: IngressSource,
}

/// Security group shared by the fleet and the load balancer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityGroupSpec {
    pub name: String,
    pub description: String,
    pub ingress: Vec<IngressRule>,
}

/// IAM role assumed by fleet instances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceRoleSpec {
    /// e.g. "ec2.amazonaws.com"
    pub service_principal: String,
    /// Managed policy ARNs granted to the role
    pub managed_policy_arns: Vec<String>,
}

/// The auto-scaling compute fleet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSpec {
    pub instance_type: String,
    /// SSM parameter path resolving to the machine image
    pub machine_image_ssm: String,
    pub min_capacity: u32,
    pub desired_capacity: u32,
    pub max_capacity: u32,
    /// Tier the fleet launches into
    pub subnet_tier: SubnetTier,
    pub associate_public_ip: bool,
    /// Bootstrap script run at first boot
    pub user_data: String,
}

/// Application load balancer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadBalancerSpec {
    pub internet_facing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheckSpec {
    pub path: String,
    pub interval_secs: u32,
}

/// Target group the fleet registers into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetGroupSpec {
    pub port: u16,
    pub protocol: String,
    pub target_type: String,
    pub health_check: HealthCheckSpec,
}

/// Fixed response returned when no forwarding rule matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedResponseSpec {
    pub status_code: u16,
    pub content_type: String,
    pub message_body: String,
}

/// HTTPS listener: fixed-response default plus a forwarding rule to the
/// fleet's target group. Both are always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenerSpec {
    pub port: u16,
    /// Pre-existing ACM certificate (not validated locally)
    pub certificate_arn: String,
    pub default_action: FixedResponseSpec,
    /// Path pattern guarding the forwarding rule
    pub forward_path_pattern: String,
}

/// Alias record in an externally-owned hosted zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsAliasSpec {
    /// Hosted zone ID (the zone is not created by this system)
    pub zone_id: String,
    pub zone_name: String,
    pub record_name: String,
}

/// Fully-resolved topology request, ready for the apply mechanism
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyRequest {
    pub stack_name: String,
    pub project: String,
    pub environment: String,
    pub network: NetworkSpec,
    pub security_group: SecurityGroupSpec,
    pub instance_role: InstanceRoleSpec,
    pub fleet: FleetSpec,
    pub load_balancer: LoadBalancerSpec,
    pub target_group: TargetGroupSpec,
    pub listener: ListenerSpec,
    pub dns_alias: DnsAliasSpec,
}

impl TopologyRequest {
    /// Stack-level tags passed to the apply mechanism
    pub fn tags(&self) -> Vec<(String, String)> {
        vec![
            ("Project".to_string(), self.project.clone()),
            ("Environment".to_string(), self.environment.clone()),
        ]
    }

    /// Lower the request into the provider-facing resource set.
    ///
    /// One entry per declared resource, in declaration order, each carrying
    /// the logical ID the template synthesis uses for the same resource.
    pub fn to_resource_set(&self) -> ResourceSet {
        let mut set = ResourceSet::new();

        set.add(ResourceConfig::new(
            "vpc",
            &self.network.name,
            PROVIDER_NAME,
            json!({
                "logical_id": "Vpc",
                "cidr": self.network.cidr,
                "max_availability_zones": self.network.max_availability_zones,
                "nat_gateways": self.network.nat_gateways,
            }),
        ));

        for subnet in &self.network.subnets {
            set.add(ResourceConfig::new(
                "subnet",
                &subnet.name,
                PROVIDER_NAME,
                json!({
                    "logical_id": subnet.logical_id(),
                    "tier": subnet.tier,
                    "cidr": subnet.cidr,
                    "az_index": subnet.az_index,
                }),
            ));
        }

        set.add(ResourceConfig::new(
            "security-group",
            &self.security_group.name,
            PROVIDER_NAME,
            json!({
                "logical_id": "WebSecurityGroup",
                "ingress_ports": self.security_group.ingress.iter().map(|r| r.port).collect::<Vec<_>>(),
            }),
        ));

        set.add(ResourceConfig::new(
            "iam-role",
            "instance-role",
            PROVIDER_NAME,
            json!({
                "logical_id": "InstanceRole",
                "service_principal": self.instance_role.service_principal,
            }),
        ));

        set.add(ResourceConfig::new(
            "fleet",
            "web-fleet",
            PROVIDER_NAME,
            json!({
                "logical_id": "Fleet",
                "instance_type": self.fleet.instance_type,
                "min": self.fleet.min_capacity,
                "desired": self.fleet.desired_capacity,
                "max": self.fleet.max_capacity,
            }),
        ));

        set.add(ResourceConfig::new(
            "load-balancer",
            "web-alb",
            PROVIDER_NAME,
            json!({
                "logical_id": "LoadBalancer",
                "internet_facing": self.load_balancer.internet_facing,
            }),
        ));

        set.add(ResourceConfig::new(
            "target-group",
            "web-fleet-tg",
            PROVIDER_NAME,
            json!({
                "logical_id": "TargetGroup",
                "port": self.target_group.port,
                "protocol": self.target_group.protocol,
            }),
        ));

        set.add(ResourceConfig::new(
            "listener",
            "https",
            PROVIDER_NAME,
            json!({
                "logical_id": "HttpsListener",
                "port": self.listener.port,
            }),
        ));

        set.add(ResourceConfig::new(
            "dns-record",
            &self.dns_alias.record_name,
            PROVIDER_NAME,
            json!({
                "logical_id": "AliasRecord",
                "zone_id": self.dns_alias.zone_id,
            }),
        ));

        set
    }
}
