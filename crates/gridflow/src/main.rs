mod commands;
mod utils;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "grid")]
#[command(about = "宣言して、流す。ネットワーク構築は、設定ファイルになった。", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 設定を検証して解決結果を表示
    Validate,
    /// CloudFormationテンプレートを合成して出力
    Synth {
        /// 出力先ファイル（省略時は標準出力）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// トポロジを合成してデプロイ
    Deploy {
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// スタックを削除
    Destroy {
        /// 確認なしで実行
        #[arg(short, long)]
        yes: bool,
    },
    /// バージョン表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrへ。synthのテンプレート出力とは混ざらない
    tracing_subscriber::fmt::init();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("gridflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    match cli.command {
        Commands::Validate => commands::validate::handle().await?,
        Commands::Synth { output } => commands::synth::handle(output).await?,
        Commands::Deploy { yes } => commands::deploy::handle(yes).await?,
        Commands::Destroy { yes } => commands::destroy::handle(yes).await?,
        Commands::Version => unreachable!("Version is handled above"),
    }

    Ok(())
}
