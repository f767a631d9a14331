use super::*;

#[test]
fn test_parse_minimal_config() {
    let kdl = r#"
        environment "Development"
    "#;

    let params = parse_kdl_string(kdl).unwrap();
    assert_eq!(params.environment_name, Some("Development".to_string()));
    assert_eq!(params.account, None);
    assert_eq!(params.network_name, None);
}

#[test]
fn test_parse_environment_with_identity() {
    let kdl = r#"
        environment "Development" {
            account "976921358976"
            region "us-east-1"
        }
    "#;

    let params = parse_kdl_string(kdl).unwrap();
    assert_eq!(params.environment_name, Some("Development".to_string()));
    assert_eq!(params.account, Some("976921358976".to_string()));
    assert_eq!(params.region, Some("us-east-1".to_string()));
}

#[test]
fn test_parse_network_block() {
    let kdl = r#"
        environment "Staging"
        network {
            name "lab81-proj-vpc"
            max-azs 3
            nat-gateways 2
            public-subnet-mask 24
            compute-subnet-mask 25
            data-subnet-mask 26
        }
    "#;

    let params = parse_kdl_string(kdl).unwrap();
    assert_eq!(params.network_name, Some("lab81-proj-vpc".to_string()));
    assert_eq!(params.max_availability_zones, Some(3));
    assert_eq!(params.nat_gateway_count, Some(2));
    assert_eq!(params.public_subnet_cidr_mask, Some(24));
    assert_eq!(params.private_compute_subnet_cidr_mask, Some(25));
    assert_eq!(params.private_data_subnet_cidr_mask, Some(26));
}

#[test]
fn test_parse_dns_and_tls() {
    let kdl = r#"
        environment "Development"
        dns {
            zone-id "Z04123456789ABCDEFGHI"
            zone-name "kenkenaws.pro"
            record-name "www.kenkenaws.pro"
        }
        tls {
            certificate-arn "arn:aws:acm:us-east-1:976921358976:certificate/abc"
        }
    "#;

    let params = parse_kdl_string(kdl).unwrap();
    assert_eq!(
        params.hosted_zone_id,
        Some("Z04123456789ABCDEFGHI".to_string())
    );
    assert_eq!(params.hosted_zone_name, Some("kenkenaws.pro".to_string()));
    assert_eq!(params.record_name, Some("www.kenkenaws.pro".to_string()));
    assert_eq!(
        params.certificate_arn,
        Some("arn:aws:acm:us-east-1:976921358976:certificate/abc".to_string())
    );
}

#[test]
fn test_parse_storage_block() {
    let kdl = r#"
        environment "Development"
        storage {
            bucket-name "my-artifacts"
        }
    "#;

    let params = parse_kdl_string(kdl).unwrap();
    assert_eq!(params.bucket_name, Some("my-artifacts".to_string()));
}

#[test]
fn test_unknown_nodes_are_ignored() {
    let kdl = r#"
        environment "Development"
        observability {
            metrics #true
        }
    "#;

    let params = parse_kdl_string(kdl).unwrap();
    assert_eq!(params.environment_name, Some("Development".to_string()));
}

#[test]
fn test_invalid_kdl_is_an_error() {
    let kdl = r#"
        environment "Development" {
    "#;

    assert!(parse_kdl_string(kdl).is_err());
}

#[test]
fn test_out_of_range_mask_is_dropped() {
    // u8に収まらない値は未指定扱い（検証はリゾルバ以降の責務）
    let kdl = r#"
        environment "Development"
        network {
            public-subnet-mask 300
        }
    "#;

    let params = parse_kdl_string(kdl).unwrap();
    assert_eq!(params.public_subnet_cidr_mask, None);
}

#[test]
fn test_parse_kdl_file_missing_path() {
    let result = parse_kdl_file("/nonexistent/gridflow.kdl");
    assert!(result.is_err());
}
