use colored::Colorize;
use std::path::Path;
use stratus_cloud::Lookup;
use stratus_deploy::EnvironmentOrchestrator;

/// OpenAPI 定義をインポートし、同名の API があれば上書きする
pub async fn import(path: &Path, region: Option<&str>, profile: Option<&str>) -> anyhow::Result<()> {
    // 接続前に定義を検証する
    let definition = stratus_config::load_api_definition(path)?;
    let gateways = super::connect(region, profile, false).await?;

    println!("API 定義: {} ({})", definition.title.cyan(), path.display());

    let outcome = EnvironmentOrchestrator::new(&gateways)
        .create_or_overwrite_api(&definition)
        .await?;

    let verb = if outcome.created { "作成" } else { "上書き" };
    println!("{}", format!("✓ REST API を{}しました", verb).green().bold());
    println!("  ID: {}", outcome.id.cyan());
    Ok(())
}

pub async fn url(
    name: &str,
    stage: &str,
    region: Option<&str>,
    profile: Option<&str>,
) -> anyhow::Result<()> {
    let gateways = super::connect(region, profile, true).await?;

    match EnvironmentOrchestrator::new(&gateways)
        .lookup_api_gateway_url(name, stage)
        .await?
    {
        Lookup::Found(url) => println!("{}", url),
        Lookup::NotFound => anyhow::bail!("REST API が見つかりません: {}", name),
    }
    Ok(())
}

pub async fn domain(name: &str, region: Option<&str>, profile: Option<&str>) -> anyhow::Result<()> {
    let gateways = super::connect(region, profile, true).await?;

    match EnvironmentOrchestrator::new(&gateways)
        .lookup_api_gateway_domain_name(name)
        .await?
    {
        Lookup::Found(domain) => println!("{}", domain),
        Lookup::NotFound => {
            anyhow::bail!("{} にマッピングされたカスタムドメインがありません", name)
        }
    }
    Ok(())
}
