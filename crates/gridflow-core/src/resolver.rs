//! パラメータリゾルバ
//!
//! 部分的な設定レコードにデフォルト値を適用し、完全な設定レコードを生成する。
//! 純粋関数であり、環境変数や外部サービスには一切触れない。

use crate::error::{GridError, Result};
use crate::model::{GridParams, ResolvedParams};

/// デフォルトのプロジェクト名
pub const DEFAULT_PROJECT: &str = "gridflow";

/// デフォルトのVPC名
pub const DEFAULT_NETWORK_NAME: &str = "lab81-proj-vpc";

/// デフォルトのアベイラビリティゾーン数
pub const DEFAULT_MAX_AVAILABILITY_ZONES: u32 = 2;

/// デフォルトのNATゲートウェイ数
pub const DEFAULT_NAT_GATEWAY_COUNT: u32 = 1;

/// 全サブネット層共通のデフォルトCIDRマスク
pub const DEFAULT_SUBNET_CIDR_MASK: u8 = 24;

/// 設定レコードを解決する
///
/// 省略されたフィールドには文書化されたリテラル値を適用する。
/// `environment_name` が無い場合、および外部参照フィールド
/// （certificate_arn / hosted_zone_id / hosted_zone_name）が
/// 無いか空文字列の場合は即座にエラーを返す。
/// それ以外の検証（CIDRマスクの範囲、アカウントIDの形式など）は行わない。
pub fn resolve(params: GridParams) -> Result<ResolvedParams> {
    let environment_name = params
        .environment_name
        .ok_or(GridError::MissingRequiredField("environment_name"))?;

    let certificate_arn = required_reference(params.certificate_arn, "certificate_arn")?;
    let hosted_zone_id = required_reference(params.hosted_zone_id, "hosted_zone_id")?;
    let hosted_zone_name = required_reference(params.hosted_zone_name, "hosted_zone_name")?;

    // レコード名省略時はゾーンapexをロードバランサに向ける
    let record_name = params.record_name.unwrap_or_else(|| hosted_zone_name.clone());

    Ok(ResolvedParams {
        project: params.project.unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
        environment_name,
        account: params.account,
        region: params.region,
        network_name: params
            .network_name
            .unwrap_or_else(|| DEFAULT_NETWORK_NAME.to_string()),
        max_availability_zones: params
            .max_availability_zones
            .unwrap_or(DEFAULT_MAX_AVAILABILITY_ZONES),
        nat_gateway_count: params.nat_gateway_count.unwrap_or(DEFAULT_NAT_GATEWAY_COUNT),
        public_subnet_cidr_mask: params
            .public_subnet_cidr_mask
            .unwrap_or(DEFAULT_SUBNET_CIDR_MASK),
        private_compute_subnet_cidr_mask: params
            .private_compute_subnet_cidr_mask
            .unwrap_or(DEFAULT_SUBNET_CIDR_MASK),
        private_data_subnet_cidr_mask: params
            .private_data_subnet_cidr_mask
            .unwrap_or(DEFAULT_SUBNET_CIDR_MASK),
        bucket_name: params.bucket_name.unwrap_or_default(),
        certificate_arn,
        hosted_zone_id,
        hosted_zone_name,
        record_name,
    })
}

/// 外部参照フィールドは存在と非空の両方を要求する
fn required_reference(value: Option<String>, field: &'static str) -> Result<String> {
    let value = value.ok_or(GridError::MissingRequiredField(field))?;
    if value.trim().is_empty() {
        return Err(GridError::EmptyField(field));
    }
    Ok(value)
}
