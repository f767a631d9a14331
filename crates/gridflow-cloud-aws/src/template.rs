//! CloudFormation template synthesis
//!
//! Lowers a [`TopologyRequest`] into the JSON template the apply mechanism
//! executes. Logical IDs are stable and maps serialize in sorted key order,
//! so the same request always yields the same document. Dependency
//! resolution between the emitted resources is the engine's job; this module
//! only wires references.

use crate::model::{IngressSource, SubnetTier, TopologyRequest};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value, json};

const VPC_ID: &str = "Vpc";
const IGW_ID: &str = "InternetGateway";
const IGW_ATTACHMENT_ID: &str = "VpcGatewayAttachment";
const SECURITY_GROUP_ID: &str = "WebSecurityGroup";
const INSTANCE_ROLE_ID: &str = "InstanceRole";
const INSTANCE_PROFILE_ID: &str = "InstanceProfile";
const LAUNCH_TEMPLATE_ID: &str = "LaunchTemplate";
const FLEET_ID: &str = "Fleet";
const LOAD_BALANCER_ID: &str = "LoadBalancer";
const TARGET_GROUP_ID: &str = "TargetGroup";
const LISTENER_ID: &str = "HttpsListener";
const FORWARD_RULE_ID: &str = "FleetForwardRule";
const ALIAS_RECORD_ID: &str = "AliasRecord";

/// Synthesize the CloudFormation document for a topology request
pub fn synthesize(topology: &TopologyRequest) -> Value {
    let mut resources = Map::new();

    add_network(&mut resources, topology);
    add_security_group(&mut resources, topology);
    add_instance_role(&mut resources, topology);
    add_fleet(&mut resources, topology);
    add_load_distribution(&mut resources, topology);
    add_dns_alias(&mut resources, topology);

    json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Description": format!(
            "{} network topology for the {} environment",
            topology.project, topology.environment
        ),
        "Resources": Value::Object(resources),
        "Outputs": {
            "VpcId": { "Value": reference(VPC_ID) },
            "LoadBalancerDnsName": { "Value": get_att(LOAD_BALANCER_ID, "DNSName") },
            "AliasRecordName": { "Value": topology.dns_alias.record_name },
        },
    })
}

fn reference(logical_id: &str) -> Value {
    json!({ "Ref": logical_id })
}

fn get_att(logical_id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [logical_id, attribute] })
}

fn name_tag(name: impl Into<String>) -> Value {
    let name = name.into();
    json!([{ "Key": "Name", "Value": name }])
}

fn nat_gateway_id(index: usize) -> String {
    format!("NatGateway{}", index + 1)
}

/// VPC, internet gateway, subnets with their route tables and NAT gateways
fn add_network(resources: &mut Map<String, Value>, topology: &TopologyRequest) {
    let network = &topology.network;

    resources.insert(
        VPC_ID.to_string(),
        json!({
            "Type": "AWS::EC2::VPC",
            "Properties": {
                "CidrBlock": network.cidr.to_string(),
                "EnableDnsSupport": true,
                "EnableDnsHostnames": true,
                "Tags": name_tag(&network.name),
            },
        }),
    );

    resources.insert(
        IGW_ID.to_string(),
        json!({
            "Type": "AWS::EC2::InternetGateway",
            "Properties": { "Tags": name_tag(&network.name) },
        }),
    );

    resources.insert(
        IGW_ATTACHMENT_ID.to_string(),
        json!({
            "Type": "AWS::EC2::VPCGatewayAttachment",
            "Properties": {
                "VpcId": reference(VPC_ID),
                "InternetGatewayId": reference(IGW_ID),
            },
        }),
    );

    let public_subnets = network.public_subnets();
    let nat_count = network.nat_gateways as usize;

    // NAT gateways live in the public tier, spread round-robin
    if !public_subnets.is_empty() {
        for i in 0..nat_count {
            let eip_id = format!("{}Eip", nat_gateway_id(i));
            resources.insert(
                eip_id.clone(),
                json!({
                    "Type": "AWS::EC2::EIP",
                    "Properties": { "Domain": "vpc" },
                }),
            );
            resources.insert(
                nat_gateway_id(i),
                json!({
                    "Type": "AWS::EC2::NatGateway",
                    "Properties": {
                        "SubnetId": reference(&public_subnets[i % public_subnets.len()].logical_id()),
                        "AllocationId": get_att(&eip_id, "AllocationId"),
                    },
                }),
            );
        }
    }

    for subnet in &network.subnets {
        let logical_id = subnet.logical_id();
        let route_table_id = format!("{logical_id}RouteTable");

        resources.insert(
            logical_id.clone(),
            json!({
                "Type": "AWS::EC2::Subnet",
                "Properties": {
                    "VpcId": reference(VPC_ID),
                    "CidrBlock": subnet.cidr.to_string(),
                    "AvailabilityZone": { "Fn::Select": [subnet.az_index, { "Fn::GetAZs": "" }] },
                    "MapPublicIpOnLaunch": subnet.tier == SubnetTier::Public,
                    "Tags": name_tag(format!("{}/{}", network.name, subnet.name)),
                },
            }),
        );

        resources.insert(
            route_table_id.clone(),
            json!({
                "Type": "AWS::EC2::RouteTable",
                "Properties": {
                    "VpcId": reference(VPC_ID),
                    "Tags": name_tag(format!("{}/{}", network.name, subnet.name)),
                },
            }),
        );

        resources.insert(
            format!("{logical_id}RouteTableAssociation"),
            json!({
                "Type": "AWS::EC2::SubnetRouteTableAssociation",
                "Properties": {
                    "SubnetId": reference(&logical_id),
                    "RouteTableId": reference(&route_table_id),
                },
            }),
        );

        match subnet.tier {
            SubnetTier::Public => {
                resources.insert(
                    format!("{logical_id}DefaultRoute"),
                    json!({
                        "Type": "AWS::EC2::Route",
                        "DependsOn": IGW_ATTACHMENT_ID,
                        "Properties": {
                            "RouteTableId": reference(&route_table_id),
                            "DestinationCidrBlock": "0.0.0.0/0",
                            "GatewayId": reference(IGW_ID),
                        },
                    }),
                );
            }
            SubnetTier::PrivateWithEgress if nat_count > 0 => {
                let nat = nat_gateway_id(subnet.az_index as usize % nat_count);
                resources.insert(
                    format!("{logical_id}DefaultRoute"),
                    json!({
                        "Type": "AWS::EC2::Route",
                        "Properties": {
                            "RouteTableId": reference(&route_table_id),
                            "DestinationCidrBlock": "0.0.0.0/0",
                            "NatGatewayId": reference(&nat),
                        },
                    }),
                );
            }
            // Isolated subnets route only inside the VPC
            _ => {}
        }
    }
}

fn add_security_group(resources: &mut Map<String, Value>, topology: &TopologyRequest) {
    let sg = &topology.security_group;

    let ingress: Vec<Value> = sg
        .ingress
        .iter()
        .filter(|rule| rule.source == IngressSource::AnyIpv4)
        .map(|rule| {
            json!({
                "IpProtocol": "tcp",
                "FromPort": rule.port,
                "ToPort": rule.port,
                "CidrIp": "0.0.0.0/0",
                "Description": rule.description,
            })
        })
        .collect();

    resources.insert(
        SECURITY_GROUP_ID.to_string(),
        json!({
            "Type": "AWS::EC2::SecurityGroup",
            "Properties": {
                "GroupName": sg.name,
                "GroupDescription": sg.description,
                "VpcId": reference(VPC_ID),
                "SecurityGroupIngress": ingress,
                "Tags": name_tag(&sg.name),
            },
        }),
    );

    // Group-to-itself rules go in as separate resources; inlining them would
    // make the group definition reference itself.
    for rule in sg.ingress.iter().filter(|r| r.source == IngressSource::OwnGroup) {
        resources.insert(
            format!("{SECURITY_GROUP_ID}SelfIngress{}", rule.port),
            json!({
                "Type": "AWS::EC2::SecurityGroupIngress",
                "Properties": {
                    "GroupId": get_att(SECURITY_GROUP_ID, "GroupId"),
                    "SourceSecurityGroupId": get_att(SECURITY_GROUP_ID, "GroupId"),
                    "IpProtocol": "tcp",
                    "FromPort": rule.port,
                    "ToPort": rule.port,
                    "Description": rule.description,
                },
            }),
        );
    }
}

fn add_instance_role(resources: &mut Map<String, Value>, topology: &TopologyRequest) {
    let role = &topology.instance_role;

    resources.insert(
        INSTANCE_ROLE_ID.to_string(),
        json!({
            "Type": "AWS::IAM::Role",
            "Properties": {
                "AssumeRolePolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": [{
                        "Effect": "Allow",
                        "Principal": { "Service": role.service_principal },
                        "Action": "sts:AssumeRole",
                    }],
                },
                "ManagedPolicyArns": role.managed_policy_arns,
            },
        }),
    );

    resources.insert(
        INSTANCE_PROFILE_ID.to_string(),
        json!({
            "Type": "AWS::IAM::InstanceProfile",
            "Properties": { "Roles": [reference(INSTANCE_ROLE_ID)] },
        }),
    );
}

fn add_fleet(resources: &mut Map<String, Value>, topology: &TopologyRequest) {
    let fleet = &topology.fleet;

    resources.insert(
        LAUNCH_TEMPLATE_ID.to_string(),
        json!({
            "Type": "AWS::EC2::LaunchTemplate",
            "Properties": {
                "LaunchTemplateData": {
                    "ImageId": format!("{{{{resolve:ssm:{}}}}}", fleet.machine_image_ssm),
                    "InstanceType": fleet.instance_type,
                    "IamInstanceProfile": { "Arn": get_att(INSTANCE_PROFILE_ID, "Arn") },
                    "UserData": BASE64.encode(&fleet.user_data),
                    "NetworkInterfaces": [{
                        "DeviceIndex": 0,
                        "AssociatePublicIpAddress": fleet.associate_public_ip,
                        "Groups": [get_att(SECURITY_GROUP_ID, "GroupId")],
                    }],
                },
            },
        }),
    );

    let fleet_subnets: Vec<Value> = topology
        .network
        .subnets_in_tier(fleet.subnet_tier)
        .iter()
        .map(|s| reference(&s.logical_id()))
        .collect();

    resources.insert(
        FLEET_ID.to_string(),
        json!({
            "Type": "AWS::AutoScaling::AutoScalingGroup",
            "Properties": {
                // Auto Scaling sizes are strings in CloudFormation
                "MinSize": fleet.min_capacity.to_string(),
                "MaxSize": fleet.max_capacity.to_string(),
                "DesiredCapacity": fleet.desired_capacity.to_string(),
                "LaunchTemplate": {
                    "LaunchTemplateId": reference(LAUNCH_TEMPLATE_ID),
                    "Version": get_att(LAUNCH_TEMPLATE_ID, "LatestVersionNumber"),
                },
                "VPCZoneIdentifier": fleet_subnets,
                "TargetGroupARNs": [reference(TARGET_GROUP_ID)],
                "Tags": [{
                    "Key": "Name",
                    "Value": format!("{}-fleet", topology.network.name),
                    "PropagateAtLaunch": true,
                }],
            },
        }),
    );
}

fn add_load_distribution(resources: &mut Map<String, Value>, topology: &TopologyRequest) {
    let public_subnets: Vec<Value> = topology
        .network
        .public_subnets()
        .iter()
        .map(|s| reference(&s.logical_id()))
        .collect();

    let scheme = if topology.load_balancer.internet_facing {
        "internet-facing"
    } else {
        "internal"
    };

    resources.insert(
        LOAD_BALANCER_ID.to_string(),
        json!({
            "Type": "AWS::ElasticLoadBalancingV2::LoadBalancer",
            "Properties": {
                "Type": "application",
                "Scheme": scheme,
                "SecurityGroups": [get_att(SECURITY_GROUP_ID, "GroupId")],
                "Subnets": public_subnets,
            },
        }),
    );

    let tg = &topology.target_group;
    resources.insert(
        TARGET_GROUP_ID.to_string(),
        json!({
            "Type": "AWS::ElasticLoadBalancingV2::TargetGroup",
            "Properties": {
                "Port": tg.port,
                "Protocol": tg.protocol,
                "TargetType": tg.target_type,
                "VpcId": reference(VPC_ID),
                "HealthCheckPath": tg.health_check.path,
                "HealthCheckIntervalSeconds": tg.health_check.interval_secs,
            },
        }),
    );

    let listener = &topology.listener;
    resources.insert(
        LISTENER_ID.to_string(),
        json!({
            "Type": "AWS::ElasticLoadBalancingV2::Listener",
            "Properties": {
                "LoadBalancerArn": reference(LOAD_BALANCER_ID),
                "Port": listener.port,
                "Protocol": "HTTPS",
                "Certificates": [{ "CertificateArn": listener.certificate_arn }],
                "DefaultActions": [{
                    "Type": "fixed-response",
                    "FixedResponseConfig": {
                        "StatusCode": listener.default_action.status_code.to_string(),
                        "ContentType": listener.default_action.content_type,
                        "MessageBody": listener.default_action.message_body,
                    },
                }],
            },
        }),
    );

    resources.insert(
        FORWARD_RULE_ID.to_string(),
        json!({
            "Type": "AWS::ElasticLoadBalancingV2::ListenerRule",
            "Properties": {
                "ListenerArn": reference(LISTENER_ID),
                "Priority": 1,
                "Conditions": [{
                    "Field": "path-pattern",
                    "PathPatternConfig": { "Values": [listener.forward_path_pattern] },
                }],
                "Actions": [{
                    "Type": "forward",
                    "TargetGroupArn": reference(TARGET_GROUP_ID),
                }],
            },
        }),
    );
}

fn add_dns_alias(resources: &mut Map<String, Value>, topology: &TopologyRequest) {
    let dns = &topology.dns_alias;

    resources.insert(
        ALIAS_RECORD_ID.to_string(),
        json!({
            "Type": "AWS::Route53::RecordSet",
            "Properties": {
                "HostedZoneId": dns.zone_id,
                "Name": format!("{}.", dns.record_name),
                "Type": "A",
                "AliasTarget": {
                    "DNSName": get_att(LOAD_BALANCER_ID, "DNSName"),
                    "HostedZoneId": get_att(LOAD_BALANCER_ID, "CanonicalHostedZoneID"),
                },
            },
        }),
    );
}
