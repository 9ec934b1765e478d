//! 環境定義モデル
//!
//! 設定ファイルのキーは camelCase。AWS にそのまま渡すパラメータ
//! (スケーリングポリシー、アラーム、ヘルスチェック) は PascalCase のまま
//! `stratus_cloud::types` の型で受け取る。

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use stratus_cloud::types::{
    HealthCheckSettings, IngressRule, MetricAlarmParams, NetworkAclRule, ScalableTargetParams,
    ScalingPolicyParams,
};

/// 単一オブジェクトと配列のどちらでも書ける値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => std::slice::from_ref(item),
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(items: Vec<T>) -> Self {
        OneOrMany::Many(items)
    }
}

/// 1 環境分の定義
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentConfig {
    /// 環境名 (`Environment` タグにも使われる)
    pub environment: String,
    /// ECS クラスタ名。省略時は環境名
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
    pub vpc: NetworkConfig,
    pub security_group: SecurityGroupConfig,
    pub launch_config: LaunchConfigurationConfig,
    pub target_group: TargetGroupConfig,
    pub auto_scale_group: AutoScaleGroupConfig,
    pub load_balancer: LoadBalancerConfig,
    #[serde(default)]
    pub listener: OneOrMany<ListenerConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<DnsConfig>,
    /// 環境で使う S3 バケット。無ければ作成する
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3_bucket: Option<S3BucketConfig>,
}

impl EnvironmentConfig {
    pub fn cluster_name(&self) -> &str {
        self.cluster_name.as_deref().unwrap_or(&self.environment)
    }

    pub fn listeners(&self) -> &[ListenerConfig] {
        self.listener.as_slice()
    }

    /// リモート呼び出し前に検出できる不整合をチェック
    pub fn validate(&self) -> Result<()> {
        if self.environment.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "environment が空です".to_string(),
            ));
        }
        self.vpc.validate()?;
        if self.listener.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "listener が 1 件も定義されていません".to_string(),
            ));
        }
        if let Some(bucket) = &self.s3_bucket {
            bucket.validate()?;
        }
        Ok(())
    }
}

/// VPC とその配下のサブネット・Network ACL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub name: String,
    pub cidr_block: String,
    #[serde(default)]
    pub subnets: Vec<SubnetConfig>,
    #[serde(default)]
    pub network_acls: Vec<NetworkAclConfig>,
}

impl NetworkConfig {
    /// ACL 名の重複と、未定義 ACL を参照するサブネットを拒否する
    pub fn validate(&self) -> Result<()> {
        let mut names = HashSet::new();
        for acl in &self.network_acls {
            if !names.insert(acl.name.as_str()) {
                return Err(ConfigError::DuplicateNetworkAcl(acl.name.clone()));
            }
        }
        for subnet in &self.subnets {
            if !names.contains(subnet.network_acl_name.as_str()) {
                return Err(ConfigError::UnknownNetworkAcl {
                    subnet: subnet.name.clone(),
                    acl: subnet.network_acl_name.clone(),
                });
            }
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetConfig {
    pub name: String,
    pub availability_zone: String,
    pub cidr_block: String,
    #[serde(default = "default_true")]
    pub map_public_ip_on_launch: bool,
    pub network_acl_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkAclConfig {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<NetworkAclRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupConfig {
    pub name: String,
    pub description: String,
    pub vpc_name: String,
    #[serde(default)]
    pub ingress_rules: Vec<IngressRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchConfigurationConfig {
    pub name: String,
    pub vpc_name: String,
    pub security_group_name: String,
    pub image_id: String,
    pub instance_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iam_instance_profile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associate_public_ip_address: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetGroupConfig {
    pub name: String,
    pub vpc_name: String,
    pub port: i32,
    pub protocol: String,
    #[serde(default)]
    pub health_check_setting_overrides: HealthCheckSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScaleGroupConfig {
    pub name: String,
    pub vpc_name: String,
    pub vpc_subnets: Vec<String>,
    pub target_group_name: String,
    pub min_size: i32,
    pub max_size: i32,
    pub desired_size: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadBalancerConfig {
    pub name: String,
    pub vpc_name: String,
    pub vpc_subnets: Vec<String>,
    pub security_group_name: String,
    #[serde(default = "default_scheme")]
    pub scheme: String,
}

fn default_scheme() -> String {
    "internet-facing".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListenerConfig {
    pub load_balancer_name: String,
    pub target_group_name: String,
    pub protocol: String,
    pub port: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_arn: Option<String>,
}

/// ECS サービスとオートスケーリング一式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    pub cluster_name: String,
    pub service_name: String,
    pub task_name: String,
    pub desired_count: i32,
    pub container_name: String,
    pub container_port: i32,
    pub target_group_name: String,
    pub register_scalable_target_params: ScalableTargetParams,
    pub service_scale_out_policy_params: ScalingPolicyParams,
    pub service_scale_in_policy_params: ScalingPolicyParams,
    pub put_alarm_scale_out_params: MetricAlarmParams,
    pub put_alarm_scale_in_params: MetricAlarmParams,
}

/// ロードバランサーへのエイリアスレコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsConfig {
    pub domain_name: String,
    pub load_balancer_name: String,
}

/// S3 バケット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3BucketConfig {
    pub name: String,
}

impl S3BucketConfig {
    /// 3〜63 文字の小文字英数字・ハイフン・ドット、先頭と末尾は英数字
    pub fn validate(&self) -> Result<()> {
        let name = self.name.as_str();
        let allowed = name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.');
        let edges = matches!(
            (name.as_bytes().first(), name.as_bytes().last()),
            (Some(first), Some(last)) if first.is_ascii_alphanumeric() && last.is_ascii_alphanumeric()
        );
        if (3..=63).contains(&name.len()) && allowed && edges {
            Ok(())
        } else {
            Err(ConfigError::InvalidBucketName(self.name.clone()))
        }
    }
}

/// API Gateway カスタムドメイン
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomDomainParams {
    pub domain_name: String,
    pub regional_certificate_arn: String,
    pub api_gateway_id: String,
    #[serde(default)]
    pub base_path: String,
    pub stage: String,
}
