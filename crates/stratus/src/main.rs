mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stratus")]
#[command(about = "1 つの定義ファイルから AWS 環境を丸ごと立ち上げる", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// AWS 接続オプション
#[derive(clap::Args, Debug, Clone)]
struct AwsArgs {
    /// AWS リージョン (AWS_REGION 環境変数)
    #[arg(long, env = "AWS_REGION")]
    region: Option<String>,
    /// AWS プロファイル (AWS_PROFILE 環境変数)
    #[arg(long, env = "AWS_PROFILE")]
    profile: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// 環境を構築 (既存リソースは再利用)
    Up {
        /// 環境定義ファイル (省略時は stratus.yaml などを自動検出)
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[command(flatten)]
        aws: AwsArgs,
        /// 結果を JSON で出力
        #[arg(long)]
        json: bool,
        /// Created タグを付けない
        #[arg(long)]
        no_created_tag: bool,
    },
    /// 環境定義ファイルを検証
    Validate {
        /// 環境定義ファイル (省略時は stratus.yaml などを自動検出)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// API Gateway のカスタムドメインを管理
    #[command(subcommand)]
    Domain(DomainCommands),
    /// API Gateway の REST API を管理
    #[command(subcommand)]
    Api(ApiCommands),
    /// バージョン情報を表示
    Version,
}

#[derive(Subcommand)]
enum DomainCommands {
    /// カスタムドメインとベースパスマッピングを作成・更新
    Upsert {
        /// ドメイン名 (api.example.com)
        #[arg(long)]
        domain: String,
        /// リージョナル証明書の ARN
        #[arg(long)]
        certificate_arn: String,
        /// REST API の ID
        #[arg(long)]
        api_id: String,
        /// ベースパス (省略時はルート)
        #[arg(long, default_value = "")]
        base_path: String,
        /// ステージ名
        #[arg(long)]
        stage: String,
        #[command(flatten)]
        aws: AwsArgs,
    },
    /// カスタムドメインの CNAME を Route 53 に登録
    Cname {
        /// ドメイン名 (api.example.com)
        #[arg(long)]
        domain: String,
        #[command(flatten)]
        aws: AwsArgs,
    },
}

#[derive(Subcommand)]
enum ApiCommands {
    /// OpenAPI 定義をインポート (同名の API があれば上書き)
    Import {
        /// OpenAPI 定義ファイル (YAML または JSON)
        #[arg(short, long)]
        file: PathBuf,
        #[command(flatten)]
        aws: AwsArgs,
    },
    /// REST API の呼び出し URL を表示
    Url {
        /// REST API 名
        #[arg(long)]
        name: String,
        /// ステージ名
        #[arg(long)]
        stage: String,
        #[command(flatten)]
        aws: AwsArgs,
    },
    /// REST API にマッピングされたカスタムドメインを表示
    Domain {
        /// REST API 名
        #[arg(long)]
        name: String,
        #[command(flatten)]
        aws: AwsArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout は結果出力 (--json) に使うので、ログは stderr へ
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Up {
            config,
            aws,
            json,
            no_created_tag,
        } => {
            commands::up::handle(
                config,
                aws.region.as_deref(),
                aws.profile.as_deref(),
                json,
                !no_created_tag,
            )
            .await?;
        }
        Commands::Validate { config } => {
            commands::validate::handle(config)?;
        }
        Commands::Domain(DomainCommands::Upsert {
            domain,
            certificate_arn,
            api_id,
            base_path,
            stage,
            aws,
        }) => {
            let params = stratus_config::CustomDomainParams {
                domain_name: domain,
                regional_certificate_arn: certificate_arn,
                api_gateway_id: api_id,
                base_path,
                stage,
            };
            commands::domain::upsert(&params, aws.region.as_deref(), aws.profile.as_deref())
                .await?;
        }
        Commands::Domain(DomainCommands::Cname { domain, aws }) => {
            commands::domain::cname(&domain, aws.region.as_deref(), aws.profile.as_deref())
                .await?;
        }
        Commands::Api(ApiCommands::Import { file, aws }) => {
            commands::api::import(&file, aws.region.as_deref(), aws.profile.as_deref()).await?;
        }
        Commands::Api(ApiCommands::Url { name, stage, aws }) => {
            commands::api::url(&name, &stage, aws.region.as_deref(), aws.profile.as_deref())
                .await?;
        }
        Commands::Api(ApiCommands::Domain { name, aws }) => {
            commands::api::domain(&name, aws.region.as_deref(), aws.profile.as_deref()).await?;
        }
        Commands::Version => {
            println!("stratus {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
