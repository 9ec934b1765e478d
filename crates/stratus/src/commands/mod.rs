pub mod api;
pub mod domain;
pub mod up;
pub mod validate;

use colored::Colorize;
use std::path::PathBuf;
use stratus_cloud::Gateways;
use stratus_cloud_aws::AwsContext;

/// --config 指定があればそれを、なければ自動検出したパスを返す
pub fn resolve_config_path(config: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match config {
        Some(path) => Ok(path),
        None => Ok(stratus_config::find_environment_file()?),
    }
}

/// AWS 設定を読み込んで全ゲートウェイを組み立てる
///
/// --json 出力時は stdout を汚さないよう quiet を立てる
pub async fn connect(
    region: Option<&str>,
    profile: Option<&str>,
    quiet: bool,
) -> anyhow::Result<Gateways> {
    let context = AwsContext::new(region, profile).await;
    if context.region().is_empty() {
        anyhow::bail!("AWS リージョンが未設定です。--region または AWS_REGION を指定してください");
    }
    if !quiet {
        println!("リージョン: {}", context.region().cyan());
    }
    Ok(stratus_cloud_aws::gateways(&context))
}
