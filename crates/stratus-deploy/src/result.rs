use crate::compute::AutoScaleGroupOutcome;
use crate::service::ServiceOutcome;
use crate::storage::BucketOutcome;
use serde::Serialize;
use std::collections::BTreeMap;
use stratus_cloud::ResourceId;

/// Everything one `provision_environment` run created or found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisioningResult {
    pub environment: String,
    pub vpc_id: ResourceId,
    pub vpc_created: bool,
    /// Configuration order. Empty when the VPC already existed.
    pub subnet_ids: Vec<ResourceId>,
    pub subnets: BTreeMap<String, ResourceId>,
    pub network_acls: BTreeMap<String, ResourceId>,
    pub security_group_id: ResourceId,
    pub cluster_arn: ResourceId,
    pub launch_configuration_name: String,
    pub previous_launch_configuration_name: Option<String>,
    pub target_group_arn: ResourceId,
    pub auto_scale_group: AutoScaleGroupOutcome,
    pub load_balancer_arn: ResourceId,
    /// Same order as the configured listeners
    pub listener_arns: Vec<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_change_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<BucketOutcome>,
}

impl ProvisioningResult {
    pub fn service_arn(&self) -> Option<&str> {
        self.service.as_ref().map(|s| s.service_arn.as_str())
    }
}

/// A REST API imported from, or overwritten with, an OpenAPI definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestApiOutcome {
    pub id: ResourceId,
    pub name: String,
    pub created: bool,
}
