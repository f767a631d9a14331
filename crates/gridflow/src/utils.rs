use gridflow_core::ResolvedParams;
use std::path::PathBuf;

/// 設定ファイルを見つけて読み込み、解決済みパラメータを返す
pub fn load_resolved_params() -> anyhow::Result<(PathBuf, ResolvedParams)> {
    let path = gridflow_config::find_grid_file()?;
    let resolved = gridflow_core::load_resolved(&path)?;
    Ok((path, resolved))
}

/// account / region の省略値を環境変数から補完する
///
/// リゾルバは環境に触れないので、外側の境界であるCLIがここで埋める。
pub fn apply_ambient_identity(params: &mut ResolvedParams) {
    if params.account.is_none() {
        params.account = std::env::var("GRIDFLOW_DEFAULT_ACCOUNT")
            .or_else(|_| std::env::var("AWS_ACCOUNT_ID"))
            .ok();
        tracing::debug!(account = ?params.account, "アカウントを環境変数から補完");
    }
    if params.region.is_none() {
        params.region = std::env::var("GRIDFLOW_DEFAULT_REGION")
            .or_else(|_| std::env::var("AWS_REGION"))
            .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
            .ok();
        tracing::debug!(region = ?params.region, "リージョンを環境変数から補完");
    }
}

/// 表示用: 未設定のOption<String>を「(未設定)」にする
pub fn display_or_unset(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("(未設定)")
}
