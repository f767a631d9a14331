pub mod error;

pub use error::*;

use std::path::PathBuf;

/// GridFlowのグローバル設定ディレクトリを取得（なければ作成）
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("gridflow");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// プロジェクトのgridflow.kdlファイルを探す
///
/// 検索順序:
/// 1. 環境変数 GRIDFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: gridflow.local.kdl → gridflow.kdl
/// 3. ~/.config/gridflow/gridflow.kdl (グローバル設定)
///
/// gridflow.local.kdl はコミットしないローカルオーバーライド用。
/// アカウントIDや証明書ARNなど環境ごとの値をここに置く想定。
pub fn find_grid_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var("GRIDFLOW_CONFIG_PATH") {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;
    for filename in ["gridflow.local.kdl", "gridflow.kdl"] {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("gridflow").join("gridflow.kdl");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::GridFileNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_get_config_dir() {
        let config_dir = get_config_dir().unwrap();
        assert!(config_dir.ends_with("gridflow"));
        assert!(config_dir.exists());
    }

    #[test]
    #[serial]
    fn test_find_grid_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("gridflow.kdl"), "// test").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let found = find_grid_file().unwrap();
        assert!(found.ends_with("gridflow.kdl"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_local_override_takes_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("gridflow.kdl"), "// shared").unwrap();
        fs::write(temp_dir.path().join("gridflow.local.kdl"), "// local").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let found = find_grid_file().unwrap();
        assert!(found.ends_with("gridflow.local.kdl"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_env_var_overrides_search() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("custom.kdl");
        fs::write(&config_path, "// custom").unwrap();

        unsafe {
            std::env::set_var("GRIDFLOW_CONFIG_PATH", config_path.to_str().unwrap());
        }

        let found = find_grid_file().unwrap();
        assert_eq!(found, config_path);

        unsafe {
            std::env::remove_var("GRIDFLOW_CONFIG_PATH");
        }
    }

    #[test]
    #[serial]
    fn test_find_grid_file_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();

        let result = find_grid_file();
        assert!(matches!(result, Err(ConfigError::GridFileNotFound)));

        std::env::set_current_dir(original_dir).unwrap();
    }
}
