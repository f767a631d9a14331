use colored::Colorize;

use crate::utils;

pub async fn handle() -> anyhow::Result<()> {
    println!("{}", "設定を検証中...".blue());

    let path = match gridflow_config::find_grid_file() {
        Ok(path) => path,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 設定ファイルが見つかりません".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };
    println!("設定ファイル: {}", path.display().to_string().cyan());

    match gridflow_core::load_resolved(&path) {
        Ok(resolved) => {
            println!("{}", "✓ 設定ファイルは正常です！".green().bold());
            println!();
            println!("サマリー:");
            println!("  環境: {}", resolved.environment_name.cyan());
            println!("  スタック: {}", resolved.stack_name().cyan());
            println!(
                "  アカウント: {} / リージョン: {}",
                utils::display_or_unset(&resolved.account).cyan(),
                utils::display_or_unset(&resolved.region).cyan()
            );
            println!(
                "  ネットワーク: {} (AZ x{}, NAT x{})",
                resolved.network_name.cyan(),
                resolved.max_availability_zones,
                resolved.nat_gateway_count
            );
            println!(
                "  サブネットマスク: public /{} compute /{} data /{}",
                resolved.public_subnet_cidr_mask,
                resolved.private_compute_subnet_cidr_mask,
                resolved.private_data_subnet_cidr_mask
            );
            println!(
                "  DNS: {} (zone: {})",
                resolved.record_name.cyan(),
                resolved.hosted_zone_name
            );
            if !resolved.bucket_name.is_empty() {
                println!("  バケット: {} (予約: 未使用)", resolved.bucket_name);
            }
        }
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 設定エラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
