use colored::Colorize;
use gridflow_cloud::{ActionType, CloudProvider};
use gridflow_cloud_aws::AwsProvider;

use crate::utils;

pub async fn handle(yes: bool) -> anyhow::Result<()> {
    println!("{}", "デプロイを開始します...".blue().bold());

    // 解決はいかなる外部呼び出しよりも先。ここで失敗したらAWSには触れない
    let (path, mut resolved) = utils::load_resolved_params()?;
    println!("設定ファイル: {}", path.display().to_string().cyan());

    utils::apply_ambient_identity(&mut resolved);

    println!("環境: {}", resolved.environment_name.cyan());
    println!("スタック: {}", resolved.stack_name().cyan());
    println!(
        "アカウント: {} / リージョン: {}",
        utils::display_or_unset(&resolved.account).cyan(),
        utils::display_or_unset(&resolved.region).cyan()
    );

    let topology = gridflow_cloud_aws::compose(&resolved)?;
    let resource_set = topology.to_resource_set();

    println!();
    println!(
        "{}",
        format!("宣言リソース ({} 個):", resource_set.len()).bold()
    );
    for resource in resource_set.iter() {
        println!("  • {}", resource.key().cyan());
    }

    // 確認（--yesが指定されていない場合）
    if !yes {
        println!();
        println!(
            "{}",
            "警告: CloudFormationスタックを作成・更新します。".yellow()
        );
        println!("実行するには --yes オプションを指定してください");
        return Ok(());
    }

    let provider = AwsProvider::for_topology(&topology, resolved.region.clone());

    // 認証確認
    println!();
    println!("{}", "AWSに接続中...".blue());
    let auth = provider.check_auth().await?;
    if !auth.authenticated {
        anyhow::bail!(
            "AWS認証に失敗しました: {}",
            auth.error.unwrap_or_else(|| "不明なエラー".to_string())
        );
    }
    println!(
        "認証OK: {}",
        auth.account_info.unwrap_or_default().cyan()
    );

    // プラン表示
    let plan = provider.plan(&resource_set).await?;
    println!();
    println!("{}", format!("プラン: {}", plan.summary()).bold());
    for action in &plan.actions {
        let marker = match action.action_type {
            ActionType::Create => "+".green(),
            ActionType::Update => "~".yellow(),
            ActionType::Delete => "-".red(),
            ActionType::NoOp => "·".normal(),
        };
        println!("  {} {}", marker, action.description);
    }

    // 適用
    println!();
    println!(
        "{}",
        "適用中... (CloudFormationの完了を待ちます)".blue()
    );
    let result = provider.apply(&plan).await?;

    if result.is_success() {
        println!(
            "{}",
            format!(
                "✓ デプロイ完了 ({} 件, {} ms)",
                result.succeeded.len(),
                result.duration_ms
            )
            .green()
            .bold()
        );
    } else {
        eprintln!();
        eprintln!("{}", "✗ デプロイ失敗".red().bold());
        if let Some(first) = result.failed.first() {
            if let Some(error) = &first.error {
                eprintln!("  {}", error);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}
