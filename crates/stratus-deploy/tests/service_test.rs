mod common;

use common::{FakeCloud, sample_service};
use stratus_deploy::ServiceProvisioner;

fn provisioner(fake: &FakeCloud) -> ServiceProvisioner {
    let gateways = fake.gateways();
    ServiceProvisioner::new(
        gateways.load_balancing,
        gateways.cluster,
        gateways.application_scaling,
        gateways.alarms,
    )
}

fn with_target_group() -> FakeCloud {
    let fake = FakeCloud::new();
    fake.with(|i| i.target_groups.insert("web-tg".into(), "arn:tg".into()));
    fake
}

/// サービス → スケーラブルターゲット → ポリシー(out, in) → アラーム(out, in) の順
#[tokio::test]
async fn test_service_call_order() {
    let fake = with_target_group();

    provisioner(&fake)
        .ensure_service(&sample_service())
        .await
        .unwrap();

    assert_eq!(
        fake.ops(),
        vec![
            "find_target_group_arn",
            "find_service_arn",
            "create_service",
            "register_scalable_target",
            "put_scaling_policy",
            "put_scaling_policy",
            "put_metric_alarm",
            "put_metric_alarm",
        ]
    );
    let policies = fake.with(|i| i.scaling_policies.clone());
    assert_eq!(policies[0].policy_name, "web-scale-out");
    assert_eq!(policies[1].policy_name, "web-scale-in");
}

/// サービス作成パラメータにターゲットグループ ARN が入る
#[tokio::test]
async fn test_service_request() {
    let fake = with_target_group();

    provisioner(&fake)
        .ensure_service(&sample_service())
        .await
        .unwrap();

    let request = fake.with(|i| i.service_requests[0].clone());
    assert_eq!(request.cluster_name, "staging");
    assert_eq!(request.service_name, "web");
    assert_eq!(request.task_name, "web-task:3");
    assert_eq!(request.desired_count, 2);
    assert_eq!(request.container_name, "web");
    assert_eq!(request.container_port, 8080);
    assert_eq!(request.target_group_arn, "arn:tg");
}

/// スケーラブルターゲットは設定値をそのまま登録する
#[tokio::test]
async fn test_scalable_target_verbatim() {
    let fake = with_target_group();
    let config = sample_service();

    provisioner(&fake).ensure_service(&config).await.unwrap();

    let targets = fake.with(|i| i.scalable_targets.clone());
    assert_eq!(targets, vec![config.register_scalable_target_params.clone()]);
}

/// 各アラームの AlarmActions に対応するポリシー ARN が追加される
#[tokio::test]
async fn test_alarms_linked_to_policies() {
    let fake = with_target_group();

    let outcome = provisioner(&fake)
        .ensure_service(&sample_service())
        .await
        .unwrap();

    assert_eq!(outcome.scale_out_policy_arn, "arn:policy/web-scale-out");
    assert_eq!(outcome.scale_in_policy_arn, "arn:policy/web-scale-in");

    let alarms = fake.with(|i| i.alarms.clone());
    assert_eq!(alarms[0].alarm_name, "web-cpu-high");
    assert_eq!(
        alarms[0].alarm_actions,
        vec!["arn:sns:ops", "arn:policy/web-scale-out"]
    );
    assert_eq!(alarms[1].alarm_name, "web-cpu-low");
    assert_eq!(alarms[1].alarm_actions, vec!["arn:policy/web-scale-in"]);
}

/// 既存サービスは更新になる
#[tokio::test]
async fn test_existing_service_is_updated() {
    let fake = with_target_group();
    fake.with(|i| {
        i.services
            .insert(("staging".into(), "web".into()), "arn:service/web".into())
    });

    let outcome = provisioner(&fake)
        .ensure_service(&sample_service())
        .await
        .unwrap();

    assert_eq!(outcome.service_arn, "arn:service/web");
    assert_eq!(fake.count("update_service"), 1);
    assert_eq!(fake.count("create_service"), 0);
}

/// ターゲットグループが無ければ何も作らない
#[tokio::test]
async fn test_service_requires_target_group() {
    let fake = FakeCloud::new();

    let err = provisioner(&fake)
        .ensure_service(&sample_service())
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(fake.ops(), vec!["find_target_group_arn"]);
}

/// ポリシー作成に失敗したらアラームは作らない
#[tokio::test]
async fn test_policy_failure_stops_before_alarms() {
    let fake = with_target_group();
    fake.fail("put_scaling_policy");

    provisioner(&fake)
        .ensure_service(&sample_service())
        .await
        .unwrap_err();

    assert_eq!(fake.count("put_scaling_policy"), 1);
    assert_eq!(fake.count("put_metric_alarm"), 0);
}
