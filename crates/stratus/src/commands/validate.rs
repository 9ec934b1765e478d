use colored::Colorize;
use std::path::PathBuf;

pub fn handle(config: Option<PathBuf>) -> anyhow::Result<()> {
    println!("{}", "設定を検証中...".blue());

    let path = super::resolve_config_path(config)?;
    println!("設定ファイル: {}", path.display().to_string().cyan());

    let env = match stratus_config::load_environment(&path) {
        Ok(env) => env,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ 設定エラー".red().bold());
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", "✓ 設定ファイルは正常です！".green().bold());
    println!();
    println!("サマリー:");
    println!("  環境: {}", env.environment.cyan());
    println!("  クラスタ: {}", env.cluster_name().cyan());
    println!("  VPC: {} ({})", env.vpc.name.cyan(), env.vpc.cidr_block);
    println!("  サブネット: {}個", env.vpc.subnets.len());
    for subnet in &env.vpc.subnets {
        println!(
            "    - {} ({}, {}, ACL: {})",
            subnet.name.cyan(),
            subnet.cidr_block,
            subnet.availability_zone,
            subnet.network_acl_name
        );
    }
    println!("  ネットワーク ACL: {}個", env.vpc.network_acls.len());
    println!(
        "  ターゲットグループ: {} ({} {})",
        env.target_group.name.cyan(),
        env.target_group.protocol,
        env.target_group.port
    );
    println!(
        "  Auto Scaling グループ: {} (min {} / max {} / desired {})",
        env.auto_scale_group.name.cyan(),
        env.auto_scale_group.min_size,
        env.auto_scale_group.max_size,
        env.auto_scale_group.desired_size
    );
    println!(
        "  ロードバランサー: {} ({})",
        env.load_balancer.name.cyan(),
        env.load_balancer.scheme
    );
    println!("  リスナー: {}個", env.listeners().len());
    for listener in env.listeners() {
        println!(
            "    - {} {} → {}",
            listener.protocol,
            listener.port,
            listener.target_group_name.cyan()
        );
    }
    if let Some(service) = &env.service {
        println!(
            "  サービス: {} ({})",
            service.service_name.cyan(),
            service.task_name
        );
    }
    if let Some(dns) = &env.dns {
        println!("  DNS: {} → {}", dns.domain_name.cyan(), dns.load_balancer_name);
    }

    Ok(())
}
