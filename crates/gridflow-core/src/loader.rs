//! 設定ローダー
//!
//! ファイル読み込みとパース、解決を統合

use crate::error::Result;
use crate::model::{GridParams, ResolvedParams};
use crate::parser::parse_kdl_string;
use crate::resolver::resolve;
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

/// 設定ファイルを読み込んでパース
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_params<P: AsRef<Path>>(path: P) -> Result<GridParams> {
    debug!("設定ファイルを読み込み中");
    let content = fs::read_to_string(path.as_ref())?;
    parse_kdl_string(&content)
}

/// 設定ファイルを読み込み、デフォルトを適用して完全な設定を返す
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_resolved<P: AsRef<Path>>(path: P) -> Result<ResolvedParams> {
    let params = load_params(path)?;
    let resolved = resolve(params)?;
    debug!(
        stack = %resolved.stack_name(),
        azs = resolved.max_availability_zones,
        "パラメータ解決完了"
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_resolved_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("gridflow.kdl");
        fs::write(
            &path,
            r#"
            environment "Development" {
                account "976921358976"
                region "us-east-1"
            }
            dns {
                zone-id "Z04123456789ABCDEFGHI"
                zone-name "kenkenaws.pro"
            }
            tls {
                certificate-arn "arn:aws:acm:us-east-1:976921358976:certificate/abc"
            }
            "#,
        )
        .unwrap();

        let resolved = load_resolved(&path).unwrap();
        assert_eq!(resolved.environment_name, "Development");
        assert_eq!(resolved.network_name, "lab81-proj-vpc");
        assert_eq!(resolved.stack_name(), "Development-lab81-proj-vpc");
    }

    #[test]
    fn test_load_resolved_missing_required_field() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("gridflow.kdl");
        fs::write(&path, r#"network { name "vpc" }"#).unwrap();

        let err = load_resolved(&path).unwrap_err();
        assert!(err.to_string().contains("environment_name"));
    }
}
