use colored::Colorize;
use std::path::PathBuf;

use crate::utils;

pub async fn handle(output: Option<PathBuf>) -> anyhow::Result<()> {
    let (_, resolved) = utils::load_resolved_params()?;

    let topology = gridflow_cloud_aws::compose(&resolved)?;
    let template = gridflow_cloud_aws::synthesize(&topology);
    let body = serde_json::to_string_pretty(&template)?;

    match output {
        Some(file) => {
            std::fs::write(&file, &body)?;
            eprintln!(
                "テンプレートを書き出しました: {}",
                file.display().to_string().cyan()
            );
        }
        // テンプレート本体のみをstdoutへ（ログはstderr）
        None => println!("{body}"),
    }

    Ok(())
}
