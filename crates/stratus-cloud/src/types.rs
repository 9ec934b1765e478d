//! Request and parameter types exchanged with gateways
//!
//! Types that are also written by hand in environment files use camelCase
//! keys. Types that are passed through to AWS untouched (health checks,
//! scaling policies, alarms) keep the AWS PascalCase field names.

use crate::tags::Tag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque identifier or ARN returned by a create-or-find call
pub type ResourceId = String;

// ============ Network ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRange {
    pub from: i32,
    pub to: i32,
}

impl Default for PortRange {
    fn default() -> Self {
        Self { from: 0, to: 0 }
    }
}

/// Network ACL entry. `egress = true` is outbound, `protocol = "-1"` is all protocols.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAclRule {
    pub cidr_block: String,
    pub egress: bool,
    pub protocol: String,
    pub rule_action: String,
    pub rule_number: i32,
    #[serde(default)]
    pub port_range: PortRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressRule {
    pub protocol: String,
    pub from_port: i32,
    pub to_port: i32,
    pub cidr_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetRequest {
    pub vpc_id: ResourceId,
    pub cidr_block: String,
    pub availability_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityGroupRequest {
    pub name: String,
    pub description: String,
    pub vpc_id: ResourceId,
    pub ingress_rules: Vec<IngressRule>,
    pub tags: Vec<Tag>,
}

// ============ Auto Scaling ============

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfigurationRequest {
    pub name: String,
    pub image_id: String,
    pub instance_type: String,
    pub security_group_id: ResourceId,
    pub ecs_cluster_name: String,
    pub key_name: Option<String>,
    pub iam_instance_profile: Option<String>,
    pub user_data: Option<String>,
    pub associate_public_ip_address: Option<bool>,
}

/// Timestamp suffix of generated launch configuration names (UTC)
pub const LAUNCH_CONFIGURATION_SUFFIX_FORMAT: &str = "%Y%m%d%H%M%S";

const LAUNCH_CONFIGURATION_SUFFIX_LEN: usize = 14;

/// Whether `name` is `prefix` followed by a generated timestamp suffix.
///
/// With prefix `web-`, `web-20261019120000` matches while a sibling group's
/// `web-api-20261019120000` does not.
pub fn is_generated_launch_configuration(name: &str, prefix: &str) -> bool {
    name.strip_prefix(prefix).is_some_and(|suffix| {
        suffix.len() == LAUNCH_CONFIGURATION_SUFFIX_LEN
            && suffix.bytes().all(|b| b.is_ascii_digit())
    })
}

/// A freshly created launch configuration and the one it supersedes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfigurationOutcome {
    pub name: String,
    pub previous_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoScalingGroupRequest {
    pub name: String,
    pub launch_configuration_name: String,
    pub min_size: i32,
    pub max_size: i32,
    pub desired_capacity: i32,
    pub target_group_arns: Vec<ResourceId>,
    /// Comma-joined subnet ids
    pub vpc_subnets: String,
    pub tags: Vec<Tag>,
}

// ============ Load Balancing ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Matcher {
    pub http_code: String,
}

/// Optional health check overrides for a target group.
///
/// Only the fields that are set are sent to AWS.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthCheckSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_interval_seconds: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_timeout_seconds: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthy_threshold_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unhealthy_threshold_count: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matcher: Option<Matcher>,
}

pub const DEFAULT_HEALTH_CHECK_PATH: &str = "/health";

impl HealthCheckSettings {
    /// `{HealthCheckPath: "/health"}` with `overrides` laid on top.
    pub fn with_defaults(overrides: &HealthCheckSettings) -> Self {
        let mut merged = overrides.clone();
        if merged.health_check_path.is_none() {
            merged.health_check_path = Some(DEFAULT_HEALTH_CHECK_PATH.to_string());
        }
        merged
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetGroupRequest {
    pub name: String,
    pub port: i32,
    pub protocol: String,
    pub vpc_id: ResourceId,
    pub health_check: HealthCheckSettings,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadBalancerRequest {
    pub name: String,
    pub subnet_ids: Vec<ResourceId>,
    pub scheme: String,
    pub security_group_ids: Vec<ResourceId>,
    pub tags: Vec<Tag>,
}

/// DNS information of a load balancer, used for alias records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoadBalancerDns {
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    pub canonical_hosted_zone_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Certificate {
    pub certificate_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerRequest {
    pub load_balancer_arn: ResourceId,
    pub target_group_arn: ResourceId,
    pub protocol: String,
    pub port: i32,
    pub certificates: Vec<Certificate>,
}

// ============ ECS ============

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    pub cluster_name: String,
    pub service_name: String,
    pub task_name: String,
    pub desired_count: i32,
    pub container_name: String,
    pub container_port: i32,
    pub target_group_arn: ResourceId,
}

// ============ Application Auto Scaling ============
//
// The scaling and alarm params are passed to AWS as written in the
// environment file. Every request field the gateways forward is modelled;
// keys outside that set are rejected at load time rather than dropped.

/// `RegisterScalableTarget` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ScalableTargetParams {
    pub service_namespace: String,
    pub resource_id: String,
    pub scalable_dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_capacity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_capacity: Option<i32>,
    #[serde(rename = "RoleARN", default, skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_state: Option<SuspendedState>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct SuspendedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_scaling_in_suspended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_scaling_out_suspended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_scaling_suspended: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct StepAdjustment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_interval_lower_bound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_interval_upper_bound: Option<f64>,
    pub scaling_adjustment: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct StepScalingPolicyConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment_type: Option<String>,
    #[serde(default)]
    pub step_adjustments: Vec<StepAdjustment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_adjustment_magnitude: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_aggregation_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct PredefinedMetricSpecification {
    pub predefined_metric_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_label: Option<String>,
}

/// Single-metric form only; metric math queries are not accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CustomizedMetricSpecification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct TargetTrackingScalingPolicyConfiguration {
    pub target_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined_metric_specification: Option<PredefinedMetricSpecification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customized_metric_specification: Option<CustomizedMetricSpecification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_out_cooldown: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_in_cooldown: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_scale_in: Option<bool>,
}

/// `PutScalingPolicy` request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct ScalingPolicyParams {
    pub policy_name: String,
    pub service_namespace: String,
    pub resource_id: String,
    pub scalable_dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_scaling_policy_configuration: Option<StepScalingPolicyConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tracking_scaling_policy_configuration:
        Option<TargetTrackingScalingPolicyConfiguration>,
}

// ============ CloudWatch ============

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Dimension {
    pub name: String,
    pub value: String,
}

/// `PutMetricAlarm` request, single-metric form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct MetricAlarmParams {
    pub alarm_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alarm_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions_enabled: Option<bool>,
    #[serde(rename = "OKActions", default, skip_serializing_if = "Vec::is_empty")]
    pub ok_actions: Vec<String>,
    #[serde(default)]
    pub alarm_actions: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insufficient_data_actions: Vec<String>,
    pub metric_name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_statistic: Option<String>,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    pub period: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub evaluation_periods: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datapoints_to_alarm: Option<i32>,
    pub threshold: f64,
    pub comparison_operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treat_missing_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluate_low_sample_count_percentile: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl MetricAlarmParams {
    /// Copy of these params with `policy_arn` appended to `AlarmActions`.
    pub fn with_alarm_action(&self, policy_arn: impl Into<String>) -> Self {
        let mut params = self.clone();
        params.alarm_actions.push(policy_arn.into());
        params
    }
}

// ============ Route 53 ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordType {
    A,
    #[serde(rename = "AAAA")]
    Aaaa,
    #[serde(rename = "CNAME")]
    Cname,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordTarget {
    Alias {
        dns_name: String,
        hosted_zone_id: String,
        evaluate_target_health: bool,
    },
    Value {
        value: String,
        ttl: i64,
    },
}

/// UPSERT of a single record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordChange {
    pub name: String,
    pub record_type: RecordType,
    pub target: RecordTarget,
}

// ============ API Gateway ============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EndpointType {
    Regional,
    Edge,
}

impl EndpointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::Regional => "REGIONAL",
            EndpointType::Edge => "EDGE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomDomainRequest {
    pub domain_name: String,
    pub regional_certificate_arn: String,
    pub endpoint_type: EndpointType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePathMappingRequest {
    pub domain_name: String,
    pub api_gateway_id: String,
    pub base_path: String,
    pub stage: String,
}

/// OpenAPI (Swagger) definition imported as a REST API.
///
/// `title` is the definition's `info.title` and doubles as the API name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDefinition {
    pub title: String,
    /// JSON body sent as-is to `ImportRestApi` / `PutRestApi`
    pub body: String,
}

/// Invoke URL of a deployed REST API stage
pub fn invoke_url(rest_api_id: &str, region: &str, stage: &str) -> String {
    format!("https://{rest_api_id}.execute-api.{region}.amazonaws.com/{stage}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_check_default_path_applied() {
        let merged = HealthCheckSettings::with_defaults(&HealthCheckSettings::default());
        assert_eq!(merged.health_check_path.as_deref(), Some("/health"));
    }

    #[test]
    fn test_health_check_override_path_wins() {
        let overrides = HealthCheckSettings {
            health_check_path: Some("/status".to_string()),
            ..Default::default()
        };
        let merged = HealthCheckSettings::with_defaults(&overrides);
        assert_eq!(merged.health_check_path.as_deref(), Some("/status"));
    }

    #[test]
    fn test_health_check_absent_fields_are_not_serialized() {
        let json = serde_json::to_value(HealthCheckSettings {
            healthy_threshold_count: Some(3),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"HealthyThresholdCount": 3}));
    }

    #[test]
    fn test_invoke_url() {
        assert_eq!(
            invoke_url("a1b2c3", "us-west-2", "prod"),
            "https://a1b2c3.execute-api.us-west-2.amazonaws.com/prod"
        );
    }

    #[test]
    fn test_generated_launch_configuration_match() {
        assert!(is_generated_launch_configuration("web-20261019120000", "web-"));
        assert!(!is_generated_launch_configuration("web-api-20261019120000", "web-"));
        assert!(!is_generated_launch_configuration("web-2026101912", "web-"));
        assert!(!is_generated_launch_configuration("web-2026101912000x", "web-"));
        assert!(!is_generated_launch_configuration("webapp-20261019120000", "web-"));
    }

    #[test]
    fn test_scalable_target_role_arn_key() {
        let params: ScalableTargetParams = serde_json::from_value(serde_json::json!({
            "ServiceNamespace": "ecs",
            "ResourceId": "service/main/web",
            "ScalableDimension": "ecs:service:DesiredCount",
            "MinCapacity": 1,
            "MaxCapacity": 4,
            "RoleARN": "arn:aws:iam::1:role/scaling"
        }))
        .unwrap();
        assert_eq!(params.role_arn.as_deref(), Some("arn:aws:iam::1:role/scaling"));
    }

    fn alarm(extra: serde_json::Value) -> MetricAlarmParams {
        let mut value = serde_json::json!({
            "AlarmName": "cpu-high",
            "MetricName": "CPUUtilization",
            "Namespace": "AWS/ECS",
            "Statistic": "Average",
            "Period": 60,
            "EvaluationPeriods": 2,
            "Threshold": 75.0,
            "ComparisonOperator": "GreaterThanThreshold"
        });
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_with_alarm_action_appends() {
        let params = alarm(serde_json::json!({}));
        let linked = params.with_alarm_action("arn:policy");
        assert_eq!(linked.alarm_actions, vec!["arn:policy".to_string()]);
        assert!(params.alarm_actions.is_empty());
    }

    #[test]
    fn test_alarm_params_keep_every_field() {
        let input = serde_json::json!({
            "AlarmName": "cpu-high",
            "AlarmDescription": "scale out",
            "ActionsEnabled": true,
            "OKActions": ["arn:sns:ok"],
            "AlarmActions": ["arn:sns:alarm"],
            "InsufficientDataActions": ["arn:sns:data"],
            "MetricName": "CPUUtilization",
            "Namespace": "AWS/ECS",
            "ExtendedStatistic": "p99",
            "Dimensions": [{"Name": "ClusterName", "Value": "main"}],
            "Period": 60,
            "Unit": "Percent",
            "EvaluationPeriods": 3,
            "DatapointsToAlarm": 2,
            "Threshold": 75.0,
            "ComparisonOperator": "GreaterThanThreshold",
            "TreatMissingData": "notBreaching",
            "EvaluateLowSampleCountPercentile": "ignore",
            "Tags": [{"Key": "team", "Value": "web"}]
        });
        let params: MetricAlarmParams = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(params.ok_actions, vec!["arn:sns:ok".to_string()]);
        assert_eq!(params.datapoints_to_alarm, Some(2));
        assert_eq!(serde_json::to_value(&params).unwrap(), input);
    }

    #[test]
    fn test_alarm_params_reject_unknown_keys() {
        let err = serde_json::from_value::<MetricAlarmParams>(serde_json::json!({
            "AlarmName": "cpu-high",
            "MetricName": "CPUUtilization",
            "Namespace": "AWS/ECS",
            "Period": 60,
            "EvaluationPeriods": 2,
            "Threshold": 75.0,
            "ComparisonOperator": "GreaterThanThreshold",
            "Metrics": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Metrics"));
    }

    #[test]
    fn test_target_tracking_policy_survives_round_trip() {
        let input = serde_json::json!({
            "PolicyName": "cpu-track",
            "ServiceNamespace": "ecs",
            "ResourceId": "service/main/web",
            "ScalableDimension": "ecs:service:DesiredCount",
            "PolicyType": "TargetTrackingScaling",
            "TargetTrackingScalingPolicyConfiguration": {
                "TargetValue": 60.0,
                "PredefinedMetricSpecification": {
                    "PredefinedMetricType": "ECSServiceAverageCPUUtilization"
                },
                "ScaleOutCooldown": 60,
                "ScaleInCooldown": 120,
                "DisableScaleIn": false
            }
        });
        let params: ScalingPolicyParams = serde_json::from_value(input.clone()).unwrap();
        let tracking = params
            .target_tracking_scaling_policy_configuration
            .as_ref()
            .unwrap();
        assert_eq!(tracking.target_value, 60.0);
        assert_eq!(serde_json::to_value(&params).unwrap(), input);
    }

    #[test]
    fn test_scalable_target_suspended_state_and_tags() {
        let input = serde_json::json!({
            "ServiceNamespace": "ecs",
            "ResourceId": "service/main/web",
            "ScalableDimension": "ecs:service:DesiredCount",
            "SuspendedState": {"DynamicScalingInSuspended": true},
            "Tags": {"team": "web"}
        });
        let params: ScalableTargetParams = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(
            params.suspended_state.as_ref().unwrap().dynamic_scaling_in_suspended,
            Some(true)
        );
        assert_eq!(serde_json::to_value(&params).unwrap(), input);
    }
}
