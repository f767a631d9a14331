//! KDLパーサー
//!
//! gridflow.kdl の設定ファイルをパースして [`GridParams`] を生成します。

#[cfg(test)]
mod tests;

use crate::error::Result;
use crate::model::GridParams;
use kdl::{KdlDocument, KdlNode};
use std::fs;
use std::path::Path;

/// KDLファイルをパースしてGridParamsを生成
pub fn parse_kdl_file<P: AsRef<Path>>(path: P) -> Result<GridParams> {
    let content = fs::read_to_string(path.as_ref())?;
    parse_kdl_string(&content)
}

/// KDL文字列をパース
pub fn parse_kdl_string(content: &str) -> Result<GridParams> {
    let doc: KdlDocument = content.parse()?;

    let mut params = GridParams::default();

    for node in doc.nodes() {
        match node.name().value() {
            "project" => {
                params.project = first_string(node);
            }
            "environment" => {
                // environment "Development" { account "..."; region "..." }
                params.environment_name = first_string(node);
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        match child.name().value() {
                            "account" => params.account = first_string(child),
                            "region" => params.region = first_string(child),
                            _ => {}
                        }
                    }
                }
            }
            "network" => parse_network(node, &mut params),
            "dns" => parse_dns(node, &mut params),
            "tls" => {
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        if child.name().value() == "certificate-arn" {
                            params.certificate_arn = first_string(child);
                        }
                    }
                }
            }
            "storage" => {
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        if child.name().value() == "bucket-name" {
                            params.bucket_name = first_string(child);
                        }
                    }
                }
            }
            // 未知のノードは無視（前方互換のため）
            other => {
                tracing::debug!("未知のノードをスキップ: {}", other);
            }
        }
    }

    Ok(params)
}

/// network ノードをパース
fn parse_network(node: &KdlNode, params: &mut GridParams) {
    let Some(children) = node.children() else {
        return;
    };

    for child in children.nodes() {
        match child.name().value() {
            "name" => params.network_name = first_string(child),
            "max-azs" => params.max_availability_zones = first_u32(child),
            "nat-gateways" => params.nat_gateway_count = first_u32(child),
            "public-subnet-mask" => params.public_subnet_cidr_mask = first_u8(child),
            "compute-subnet-mask" => {
                params.private_compute_subnet_cidr_mask = first_u8(child);
            }
            "data-subnet-mask" => params.private_data_subnet_cidr_mask = first_u8(child),
            _ => {}
        }
    }
}

/// dns ノードをパース
fn parse_dns(node: &KdlNode, params: &mut GridParams) {
    let Some(children) = node.children() else {
        return;
    };

    for child in children.nodes() {
        match child.name().value() {
            "zone-id" => params.hosted_zone_id = first_string(child),
            "zone-name" => params.hosted_zone_name = first_string(child),
            "record-name" => params.record_name = first_string(child),
            _ => {}
        }
    }
}

fn first_string(node: &KdlNode) -> Option<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn first_u32(node: &KdlNode) -> Option<u32> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_integer())
        .and_then(|v| u32::try_from(v).ok())
}

fn first_u8(node: &KdlNode) -> Option<u8> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_integer())
        .and_then(|v| u8::try_from(v).ok())
}
