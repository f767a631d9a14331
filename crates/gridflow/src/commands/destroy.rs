use colored::Colorize;
use gridflow_cloud::CloudProvider;
use gridflow_cloud_aws::AwsProvider;

use crate::utils;

pub async fn handle(yes: bool) -> anyhow::Result<()> {
    println!("{}", "スタックを削除します...".blue().bold());

    let (_, mut resolved) = utils::load_resolved_params()?;
    utils::apply_ambient_identity(&mut resolved);

    let topology = gridflow_cloud_aws::compose(&resolved)?;
    println!("スタック: {}", topology.stack_name.cyan());

    if !yes {
        println!();
        println!(
            "{}",
            "警告: スタックと配下の全リソースを削除します。".yellow()
        );
        println!("実行するには --yes オプションを指定してください");
        return Ok(());
    }

    let provider = AwsProvider::for_topology(&topology, resolved.region.clone());

    println!();
    println!("{}", "削除中... (CloudFormationの完了を待ちます)".blue());
    let result = provider.destroy().await?;

    if !result.is_success() {
        eprintln!("{}", "✗ 削除失敗".red().bold());
        if let Some(first) = result.failed.first() {
            if let Some(error) = &first.error {
                eprintln!("  {}", error);
            }
        }
        std::process::exit(1);
    }

    if result.succeeded.is_empty() {
        println!("スタックは存在しません。削除は不要でした");
    } else {
        println!(
            "{}",
            format!("✓ 削除完了 ({} ms)", result.duration_ms).green().bold()
        );
    }

    Ok(())
}
