//! パラメータモデル
//!
//! gridflow.kdl から読み込む部分的な設定レコードと、
//! デフォルト適用後の完全な設定レコードの定義

use serde::{Deserialize, Serialize};

/// 部分的な設定レコード
///
/// gridflow.kdl のパース結果。ほとんどのフィールドは省略可能で、
/// [`crate::resolver::resolve`] がデフォルト値を適用する。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// プロジェクト名（スタックのタグに使用）
    pub project: Option<String>,

    /// 環境名（Development, Staging など）。唯一の必須フィールド
    pub environment_name: Option<String>,

    /// AWSアカウントID。省略時はCLI側で環境変数から補完される
    pub account: Option<String>,

    /// AWSリージョン。省略時はCLI側で環境変数から補完される
    pub region: Option<String>,

    /// VPC名
    pub network_name: Option<String>,

    /// 使用するアベイラビリティゾーン数
    pub max_availability_zones: Option<u32>,

    /// NATゲートウェイ数
    pub nat_gateway_count: Option<u32>,

    /// パブリックサブネットのCIDRマスク
    pub public_subnet_cidr_mask: Option<u8>,

    /// コンピュート用プライベートサブネットのCIDRマスク
    pub private_compute_subnet_cidr_mask: Option<u8>,

    /// データ用隔離サブネットのCIDRマスク
    pub private_data_subnet_cidr_mask: Option<u8>,

    /// ストレージスタック用の予約フィールド（現在のトポロジでは未使用）
    pub bucket_name: Option<String>,

    /// HTTPSリスナーに割り当てる既存のACM証明書ARN
    pub certificate_arn: Option<String>,

    /// 外部管理のRoute 53ホストゾーンID
    pub hosted_zone_id: Option<String>,

    /// ホストゾーンのドメイン名
    pub hosted_zone_name: Option<String>,

    /// エイリアスレコード名。省略時はゾーン名（apex）を使用
    pub record_name: Option<String>,
}

/// 完全に解決された設定レコード
///
/// デフォルト適用後の値。account / region を除き Option は残らない。
/// account / region のフォールバックは呼び出し側（CLI境界）の責務。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParams {
    pub project: String,
    pub environment_name: String,
    pub account: Option<String>,
    pub region: Option<String>,
    pub network_name: String,
    pub max_availability_zones: u32,
    pub nat_gateway_count: u32,
    pub public_subnet_cidr_mask: u8,
    pub private_compute_subnet_cidr_mask: u8,
    pub private_data_subnet_cidr_mask: u8,
    /// 予約フィールド。トポロジ構成では消費しない
    pub bucket_name: String,
    pub certificate_arn: String,
    pub hosted_zone_id: String,
    pub hosted_zone_name: String,
    pub record_name: String,
}

impl ResolvedParams {
    /// CloudFormationスタック名（{環境名}-{VPC名}）
    pub fn stack_name(&self) -> String {
        format!("{}-{}", self.environment_name, self.network_name)
    }
}
