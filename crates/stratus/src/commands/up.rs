use colored::Colorize;
use std::path::PathBuf;
use stratus_deploy::{EnvironmentOrchestrator, ProvisioningResult};

pub async fn handle(
    config: Option<PathBuf>,
    region: Option<&str>,
    profile: Option<&str>,
    json: bool,
    created_tag: bool,
) -> anyhow::Result<()> {
    let path = super::resolve_config_path(config)?;
    let env = stratus_config::load_environment(&path)?;

    if !json {
        println!("環境: {}", env.environment.cyan());
        println!("設定ファイル: {}", path.display().to_string().cyan());
    }

    let gateways = super::connect(region, profile, json).await?;
    let orchestrator = EnvironmentOrchestrator::new(&gateways).with_created_tag(created_tag);

    if !json {
        println!();
        println!("{}", "環境を構築中...".blue());
    }

    let result = match orchestrator.provision_environment(&env).await {
        Ok(result) => result,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 構築に失敗しました".red().bold());
            eprintln!("  {}", e);
            eprintln!();
            eprintln!("作成済みのリソースは残っています。必要に応じて手動で削除してください");
            std::process::exit(1);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_summary(&result);
    Ok(())
}

fn print_summary(result: &ProvisioningResult) {
    let mark = |created: bool| {
        if created {
            "作成".green()
        } else {
            "既存".yellow()
        }
    };

    println!();
    println!("{}", "✓ 環境の構築が完了しました".green().bold());
    println!();
    println!("  VPC: {} [{}]", result.vpc_id.cyan(), mark(result.vpc_created));
    for (name, id) in &result.subnets {
        println!("    - {}: {}", name, id.cyan());
    }
    println!("  セキュリティグループ: {}", result.security_group_id.cyan());
    println!("  クラスタ: {}", result.cluster_arn.cyan());
    println!("  起動設定: {}", result.launch_configuration_name.cyan());
    if let Some(retired) = &result.auto_scale_group.retired_launch_configuration {
        println!("    (旧起動設定 {} を削除)", retired);
    }
    println!(
        "  Auto Scaling グループ: {} [{}]",
        result.auto_scale_group.name.cyan(),
        mark(result.auto_scale_group.created)
    );
    println!("  ターゲットグループ: {}", result.target_group_arn.cyan());
    println!("  ロードバランサー: {}", result.load_balancer_arn.cyan());
    for arn in &result.listener_arns {
        println!("    - リスナー: {}", arn.cyan());
    }
    if let Some(arn) = result.service_arn() {
        println!("  サービス: {}", arn.cyan());
    }
    if let Some(change_id) = &result.dns_change_id {
        println!("  DNS 変更: {}", change_id.cyan());
    }
    if let Some(bucket) = &result.bucket {
        println!("  S3 バケット: {} [{}]", bucket.name.cyan(), mark(bucket.created));
    }
}
