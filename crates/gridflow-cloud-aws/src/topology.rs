//! Topology composer
//!
//! Turns a resolved parameter record into a [`TopologyRequest`] through a
//! fixed construction pipeline: subnet layout → network → security group →
//! instance role → fleet → load balancer → target group → listener → DNS
//! alias. Every step is a pure function of the steps before it, so the same
//! input always composes the same request. No cloud API is touched here.

use crate::cidr::{CidrBlock, SubnetAllocator};
use crate::error::Result;
use crate::model::{
    DnsAliasSpec, FixedResponseSpec, FleetSpec, HealthCheckSpec, IngressRule, IngressSource,
    InstanceRoleSpec, ListenerSpec, LoadBalancerSpec, NetworkSpec, SecurityGroupSpec, SubnetSpec,
    SubnetTier, TargetGroupSpec, TopologyRequest,
};
use crate::user_data;
use gridflow_core::ResolvedParams;
use std::net::Ipv4Addr;

/// Instance sizing for the web fleet
const INSTANCE_TYPE: &str = "t2.micro";
const FLEET_MIN_CAPACITY: u32 = 1;
const FLEET_DESIRED_CAPACITY: u32 = 2;
const FLEET_MAX_CAPACITY: u32 = 2;

/// SSM parameter resolving to the latest Amazon Linux 2023 image
const MACHINE_IMAGE_SSM: &str =
    "/aws/service/ami-amazon-linux-latest/al2023-ami-kernel-default-x86_64";

const EC2_SERVICE_PRINCIPAL: &str = "ec2.amazonaws.com";
const SSM_CORE_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AmazonSSMManagedInstanceCore";

const HTTP_PORT: u16 = 80;
const HTTPS_PORT: u16 = 443;
const HEALTH_CHECK_PATH: &str = "/";
const HEALTH_CHECK_INTERVAL_SECS: u32 = 60;
const FORWARD_PATH_PATTERN: &str = "/*";

/// Address space the subnet tiers are carved out of
fn network_cidr() -> CidrBlock {
    CidrBlock::new(Ipv4Addr::new(10, 0, 0, 0), 16)
}

/// Compose the full topology request from a resolved parameter record.
///
/// Deterministic: structurally equal inputs yield structurally equal
/// requests. The only failure modes are layout arithmetic (a subnet mask
/// wider than the network range, or the range running out of room).
pub fn compose(params: &ResolvedParams) -> Result<TopologyRequest> {
    let subnets = subnet_layout(params)?;
    let network = network(params, subnets);
    let security_group = security_group(&network);
    let instance_role = instance_role();
    let fleet = fleet();
    let load_balancer = load_balancer();
    let target_group = target_group();
    let listener = listener(&params.certificate_arn);
    let dns_alias = dns_alias(params);

    Ok(TopologyRequest {
        stack_name: params.stack_name(),
        project: params.project.clone(),
        environment: params.environment_name.clone(),
        network,
        security_group,
        instance_role,
        fleet,
        load_balancer,
        target_group,
        listener,
        dns_alias,
    })
}

/// Step 1: carve the three tiers out of the address space, tier-major
/// (all AZs of one tier before the next tier starts)
fn subnet_layout(params: &ResolvedParams) -> Result<Vec<SubnetSpec>> {
    let mut allocator = SubnetAllocator::new(network_cidr());

    let tiers = [
        (SubnetTier::Public, params.public_subnet_cidr_mask),
        (
            SubnetTier::PrivateWithEgress,
            params.private_compute_subnet_cidr_mask,
        ),
        (
            SubnetTier::PrivateIsolated,
            params.private_data_subnet_cidr_mask,
        ),
    ];

    let mut subnets = Vec::new();
    for (tier, mask) in tiers {
        for az_index in 0..params.max_availability_zones {
            let cidr = allocator.next_block(mask)?;
            subnets.push(SubnetSpec {
                name: format!("{}-{}", tier.group_name(), az_index + 1),
                tier,
                az_index,
                cidr,
            });
        }
    }

    Ok(subnets)
}

/// Step 2: the network wraps the layout
fn network(params: &ResolvedParams, subnets: Vec<SubnetSpec>) -> NetworkSpec {
    NetworkSpec {
        name: params.network_name.clone(),
        cidr: network_cidr(),
        max_availability_zones: params.max_availability_zones,
        nat_gateways: params.nat_gateway_count,
        subnets,
    }
}

/// Step 3: one shared security group for the fleet and the load balancer.
/// No SSH rule; management access goes through SSM.
fn security_group(network: &NetworkSpec) -> SecurityGroupSpec {
    SecurityGroupSpec {
        name: format!("{}-web-sg", network.name),
        description: "HTTP/HTTPS access".to_string(),
        ingress: vec![
            IngressRule {
                description: "Allow HTTP access".to_string(),
                port: HTTP_PORT,
                source: IngressSource::AnyIpv4,
            },
            IngressRule {
                description: "Allow HTTPS access".to_string(),
                port: HTTPS_PORT,
                source: IngressSource::AnyIpv4,
            },
            IngressRule {
                description: "Allow HTTP from the load balancer".to_string(),
                port: HTTP_PORT,
                source: IngressSource::OwnGroup,
            },
        ],
    }
}

/// Step 4: fixed trust policy, management capability only
fn instance_role() -> InstanceRoleSpec {
    InstanceRoleSpec {
        service_principal: EC2_SERVICE_PRINCIPAL.to_string(),
        managed_policy_arns: vec![SSM_CORE_POLICY_ARN.to_string()],
    }
}

/// Step 5: the web fleet, fixed sizing, launched into the public tier
fn fleet() -> FleetSpec {
    FleetSpec {
        instance_type: INSTANCE_TYPE.to_string(),
        machine_image_ssm: MACHINE_IMAGE_SSM.to_string(),
        min_capacity: FLEET_MIN_CAPACITY,
        desired_capacity: FLEET_DESIRED_CAPACITY,
        max_capacity: FLEET_MAX_CAPACITY,
        subnet_tier: SubnetTier::Public,
        associate_public_ip: true,
        user_data: user_data::WEB_SERVER_BOOTSTRAP.to_string(),
    }
}

/// Step 6
fn load_balancer() -> LoadBalancerSpec {
    LoadBalancerSpec {
        internet_facing: true,
    }
}

/// Step 7
fn target_group() -> TargetGroupSpec {
    TargetGroupSpec {
        port: HTTP_PORT,
        protocol: "HTTP".to_string(),
        target_type: "instance".to_string(),
        health_check: HealthCheckSpec {
            path: HEALTH_CHECK_PATH.to_string(),
            interval_secs: HEALTH_CHECK_INTERVAL_SECS,
        },
    }
}

/// Step 8: fixed-response default plus the guarded forwarding rule
fn listener(certificate_arn: &str) -> ListenerSpec {
    ListenerSpec {
        port: HTTPS_PORT,
        certificate_arn: certificate_arn.to_string(),
        default_action: FixedResponseSpec {
            status_code: 200,
            content_type: "text/plain".to_string(),
            message_body: "Hello from the load balancer!".to_string(),
        },
        forward_path_pattern: FORWARD_PATH_PATTERN.to_string(),
    }
}

/// Step 9: alias in the externally-owned zone
fn dns_alias(params: &ResolvedParams) -> DnsAliasSpec {
    DnsAliasSpec {
        zone_id: params.hosted_zone_id.clone(),
        zone_name: params.hosted_zone_name.clone(),
        record_name: params.record_name.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridflow_core::{GridParams, resolve};

    fn development_params() -> ResolvedParams {
        resolve(GridParams {
            environment_name: Some("Development".to_string()),
            account: Some("976921358976".to_string()),
            region: Some("us-east-1".to_string()),
            bucket_name: Some(String::new()),
            certificate_arn: Some(
                "arn:aws:acm:us-east-1:976921358976:certificate/abc".to_string(),
            ),
            hosted_zone_id: Some("Z04123456789ABCDEFGHI".to_string()),
            hosted_zone_name: Some("kenkenaws.pro".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_composition_is_deterministic() {
        let params = development_params();

        let first = compose(&params).unwrap();
        let second = compose(&params).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_default_subnet_layout() {
        let topology = compose(&development_params()).unwrap();

        let cidrs: Vec<String> = topology
            .network
            .subnets
            .iter()
            .map(|s| s.cidr.to_string())
            .collect();
        assert_eq!(
            cidrs,
            vec![
                "10.0.0.0/24",
                "10.0.1.0/24",
                "10.0.2.0/24",
                "10.0.3.0/24",
                "10.0.4.0/24",
                "10.0.5.0/24",
            ]
        );
    }

    #[test]
    fn test_three_tiers_per_availability_zone() {
        let mut params = development_params();
        params.max_availability_zones = 3;
        params.public_subnet_cidr_mask = 26;
        params.private_compute_subnet_cidr_mask = 27;
        params.private_data_subnet_cidr_mask = 28;

        let topology = compose(&params).unwrap();

        assert_eq!(topology.network.subnets.len(), 9);
        for tier in SubnetTier::all() {
            let in_tier = topology.network.subnets_in_tier(tier);
            assert_eq!(in_tier.len(), 3, "tier {:?}", tier);
            for (expected_az, subnet) in in_tier.iter().enumerate() {
                assert_eq!(subnet.az_index, expected_az as u32);
            }
        }
    }

    #[test]
    fn test_security_posture() {
        let topology = compose(&development_params()).unwrap();
        let sg = &topology.security_group;

        let any_ports: Vec<u16> = sg
            .ingress
            .iter()
            .filter(|r| r.source == IngressSource::AnyIpv4)
            .map(|r| r.port)
            .collect();
        assert_eq!(any_ports, vec![80, 443]);

        // SSHは開けない
        assert!(sg.ingress.iter().all(|r| r.port != 22));
    }

    #[test]
    fn test_listener_default_and_forward_always_present() {
        let topology = compose(&development_params()).unwrap();

        assert_eq!(topology.listener.port, 443);
        assert_eq!(topology.listener.default_action.status_code, 200);
        assert_eq!(
            topology.listener.default_action.message_body,
            "Hello from the load balancer!"
        );
        assert_eq!(topology.listener.forward_path_pattern, "/*");
        assert_eq!(topology.target_group.health_check.path, "/");
        assert_eq!(topology.target_group.health_check.interval_secs, 60);
    }

    #[test]
    fn test_development_end_to_end_shape() {
        let topology = compose(&development_params()).unwrap();

        assert_eq!(topology.stack_name, "Development-lab81-proj-vpc");
        assert_eq!(topology.network.max_availability_zones, 2);
        assert_eq!(topology.network.nat_gateways, 1);
        assert_eq!(topology.network.subnets.len(), 6);

        assert_eq!(topology.fleet.min_capacity, 1);
        assert_eq!(topology.fleet.desired_capacity, 2);
        assert_eq!(topology.fleet.max_capacity, 2);
        assert_eq!(topology.fleet.subnet_tier, SubnetTier::Public);

        assert!(topology.load_balancer.internet_facing);
        assert_eq!(topology.target_group.port, 80);
        assert_eq!(topology.dns_alias.record_name, "kenkenaws.pro");
        assert_eq!(topology.dns_alias.zone_id, "Z04123456789ABCDEFGHI");
    }

    #[test]
    fn test_resource_set_lowering() {
        let topology = compose(&development_params()).unwrap();
        let set = topology.to_resource_set();

        // vpc + 6 subnets + sg + role + fleet + alb + tg + listener + record
        assert_eq!(set.len(), 14);

        let first = set.iter().next().unwrap();
        assert_eq!(first.resource_type, "vpc");
        assert_eq!(
            first.get_config::<String>("logical_id").unwrap(),
            "Vpc"
        );

        assert_eq!(set.by_type("subnet").len(), 6);
        assert!(set.get("dns-record", "kenkenaws.pro").is_some());
        assert!(set.get("listener", "https").is_some());
    }

    #[test]
    fn test_mask_wider_than_network_fails_composition() {
        let mut params = development_params();
        params.public_subnet_cidr_mask = 8;

        assert!(compose(&params).is_err());
    }

    #[test]
    fn test_bucket_name_is_not_consumed() {
        let mut params = development_params();
        params.bucket_name = "reserved-bucket".to_string();

        let with_bucket = compose(&params).unwrap();
        params.bucket_name = String::new();
        let without_bucket = compose(&params).unwrap();

        assert_eq!(with_bucket, without_bucket);
    }
}
