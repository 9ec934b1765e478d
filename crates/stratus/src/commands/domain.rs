use colored::Colorize;
use stratus_config::CustomDomainParams;
use stratus_deploy::EnvironmentOrchestrator;

pub async fn upsert(
    params: &CustomDomainParams,
    region: Option<&str>,
    profile: Option<&str>,
) -> anyhow::Result<()> {
    let gateways = super::connect(region, profile, false).await?;

    println!(
        "カスタムドメイン: {} → {} ({})",
        params.domain_name.cyan(),
        params.api_gateway_id,
        params.stage
    );

    EnvironmentOrchestrator::new(&gateways)
        .upsert_custom_domain_name(params)
        .await?;

    println!("{}", "✓ カスタムドメインを更新しました".green().bold());
    Ok(())
}

pub async fn cname(domain: &str, region: Option<&str>, profile: Option<&str>) -> anyhow::Result<()> {
    let gateways = super::connect(region, profile, false).await?;

    let change = EnvironmentOrchestrator::new(&gateways)
        .associate_custom_domain_with_cname(domain)
        .await?;

    match change {
        Some(change_id) => {
            println!("{}", "✓ CNAME を登録しました".green().bold());
            println!("  変更 ID: {}", change_id.cyan());
        }
        None => {
            println!(
                "{} {} のカスタムドメインが見つからないため、DNS は変更しませんでした",
                "⚠".yellow(),
                domain.cyan()
            );
        }
    }
    Ok(())
}
