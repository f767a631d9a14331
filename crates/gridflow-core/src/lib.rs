//! GridFlow Core
//!
//! ネットワークトポロジ宣言のための設定レコードモデルとパラメータリゾルバ。
//!
//! 処理の流れ:
//! 1. gridflow.kdl をパースして部分的な [`GridParams`] を得る
//! 2. [`resolver::resolve`] がデフォルト値を適用し [`ResolvedParams`] を生成
//! 3. 解決済みレコードをトポロジコンポーザ（gridflow-cloud-aws）に渡す

pub mod error;
pub mod loader;
pub mod model;
pub mod parser;
pub mod resolver;

pub use error::{GridError, Result};
pub use loader::{load_params, load_resolved};
pub use model::{GridParams, ResolvedParams};
pub use parser::{parse_kdl_file, parse_kdl_string};
pub use resolver::{
    DEFAULT_MAX_AVAILABILITY_ZONES, DEFAULT_NAT_GATEWAY_COUNT, DEFAULT_NETWORK_NAME,
    DEFAULT_PROJECT, DEFAULT_SUBNET_CIDR_MASK, resolve,
};
