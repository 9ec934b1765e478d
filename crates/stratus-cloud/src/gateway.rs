//! Gateway contracts, one per AWS resource family
//!
//! Provisioners only talk to these traits. Lookups return
//! [`Lookup::NotFound`] when the named resource does not exist; every other
//! failure is an `Err`.

use crate::error::Result;
use crate::lookup::Lookup;
use crate::tags::Tag;
use crate::types::*;
use async_trait::async_trait;
use std::sync::Arc;

/// VPC, subnet, network ACL, internet gateway, route table and security group (EC2)
#[async_trait]
pub trait NetworkGateway: Send + Sync {
    async fn find_vpc_id(&self, name: &str) -> Result<Lookup<ResourceId>>;

    async fn create_vpc(&self, cidr_block: &str) -> Result<ResourceId>;

    /// Block until the VPC reports `available`
    async fn wait_for_vpc(&self, vpc_id: &str) -> Result<()>;

    async fn tag_resource(&self, resource_id: &str, tags: &[Tag]) -> Result<()>;

    async fn enable_dns_hostnames(&self, vpc_id: &str) -> Result<()>;

    async fn enable_dns_support(&self, vpc_id: &str) -> Result<()>;

    async fn create_network_acl(&self, vpc_id: &str) -> Result<ResourceId>;

    async fn create_network_acl_entry(&self, acl_id: &str, rule: &NetworkAclRule) -> Result<()>;

    async fn create_subnet(&self, request: &SubnetRequest) -> Result<ResourceId>;

    async fn set_map_public_ip_on_launch(&self, subnet_id: &str, enabled: bool) -> Result<()>;

    async fn find_subnet_id(&self, vpc_id: &str, name: &str) -> Result<Lookup<ResourceId>>;

    /// Current network ACL association of a subnet
    async fn find_network_acl_association(&self, subnet_id: &str)
    -> Result<Lookup<ResourceId>>;

    /// Returns the new association id
    async fn replace_network_acl_association(
        &self,
        association_id: &str,
        acl_id: &str,
    ) -> Result<ResourceId>;

    async fn create_internet_gateway(&self) -> Result<ResourceId>;

    async fn attach_internet_gateway(&self, internet_gateway_id: &str, vpc_id: &str) -> Result<()>;

    async fn create_route_table(&self, vpc_id: &str) -> Result<ResourceId>;

    async fn create_route(
        &self,
        route_table_id: &str,
        destination_cidr_block: &str,
        gateway_id: &str,
    ) -> Result<()>;

    async fn associate_route_table(&self, route_table_id: &str, subnet_id: &str)
    -> Result<ResourceId>;

    async fn find_security_group_id(&self, vpc_id: &str, name: &str)
    -> Result<Lookup<ResourceId>>;

    /// Create the group, authorize its ingress rules and tag it
    async fn create_security_group(&self, request: &SecurityGroupRequest) -> Result<ResourceId>;
}

/// Target groups, application load balancers and listeners (ELBv2)
#[async_trait]
pub trait LoadBalancingGateway: Send + Sync {
    async fn find_target_group_arn(&self, name: &str) -> Result<Lookup<ResourceId>>;

    async fn create_target_group(&self, request: &TargetGroupRequest) -> Result<ResourceId>;

    async fn find_load_balancer_arn(&self, name: &str) -> Result<Lookup<ResourceId>>;

    async fn create_load_balancer(&self, request: &LoadBalancerRequest) -> Result<ResourceId>;

    async fn find_load_balancer_dns(&self, name: &str) -> Result<Lookup<LoadBalancerDns>>;

    async fn find_listener_arn(
        &self,
        load_balancer_arn: &str,
        protocol: &str,
        port: i32,
    ) -> Result<Lookup<ResourceId>>;

    async fn create_listener(&self, request: &ListenerRequest) -> Result<ResourceId>;
}

/// Launch configurations and auto-scaling groups (EC2 Auto Scaling)
#[async_trait]
pub trait AutoScalingGateway: Send + Sync {
    /// Most recently created launch configuration named `prefix` plus a
    /// generated timestamp suffix
    async fn find_latest_launch_configuration(&self, prefix: &str) -> Result<Lookup<String>>;

    async fn create_launch_configuration(&self, request: &LaunchConfigurationRequest)
    -> Result<()>;

    async fn delete_launch_configuration(&self, name: &str) -> Result<()>;

    async fn find_auto_scaling_group(&self, name: &str) -> Result<Lookup<String>>;

    async fn create_auto_scaling_group(&self, request: &AutoScalingGroupRequest) -> Result<()>;

    /// Point an existing group at a new launch configuration and roll its instances
    async fn update_auto_scaling_group(&self, request: &AutoScalingGroupRequest) -> Result<()>;
}

/// Clusters and services (ECS)
#[async_trait]
pub trait ClusterGateway: Send + Sync {
    /// Returns the cluster ARN, creating the cluster when absent
    async fn create_cluster(&self, name: &str) -> Result<ResourceId>;

    async fn find_service_arn(&self, cluster: &str, service: &str) -> Result<Lookup<ResourceId>>;

    async fn create_service(&self, request: &ServiceRequest) -> Result<ResourceId>;

    async fn update_service(&self, request: &ServiceRequest) -> Result<ResourceId>;
}

/// Scalable targets and scaling policies (Application Auto Scaling)
#[async_trait]
pub trait ApplicationScalingGateway: Send + Sync {
    async fn register_scalable_target(&self, params: &ScalableTargetParams) -> Result<()>;

    /// Returns the policy ARN
    async fn put_scaling_policy(&self, params: &ScalingPolicyParams) -> Result<ResourceId>;
}

/// Metric alarms (CloudWatch)
#[async_trait]
pub trait MetricAlarmGateway: Send + Sync {
    async fn put_metric_alarm(&self, params: &MetricAlarmParams) -> Result<()>;
}

/// Hosted zones and record sets (Route 53)
#[async_trait]
pub trait DnsGateway: Send + Sync {
    /// Id of the hosted zone named `zone_name` (`example.com`)
    async fn find_hosted_zone_id(&self, zone_name: &str) -> Result<Lookup<String>>;

    /// UPSERT every change in one batch, returns the change id
    async fn upsert_records(&self, hosted_zone_id: &str, changes: &[RecordChange])
    -> Result<String>;

    /// Block until the change reports `INSYNC`
    async fn wait_for_change(&self, change_id: &str) -> Result<()>;
}

/// Custom domain names and base path mappings (API Gateway)
#[async_trait]
pub trait ApiGatewayGateway: Send + Sync {
    async fn upsert_custom_domain_name(&self, request: &CustomDomainRequest) -> Result<()>;

    async fn upsert_base_path_mapping(&self, request: &BasePathMappingRequest) -> Result<()>;

    /// Regional domain name API Gateway serves `domain_name` from
    async fn find_custom_domain_target(&self, domain_name: &str) -> Result<Lookup<String>>;

    /// Id of the REST API named `name`
    async fn find_rest_api_id(&self, name: &str) -> Result<Lookup<ResourceId>>;

    /// First custom domain with a base path mapping onto `rest_api_id`
    async fn find_domain_name_for_api(&self, rest_api_id: &str) -> Result<Lookup<String>>;

    /// Create a REST API from an OpenAPI definition, returns its id
    async fn import_rest_api(&self, definition: &ApiDefinition) -> Result<ResourceId>;

    /// Replace the whole definition of an existing REST API
    async fn overwrite_rest_api(&self, rest_api_id: &str, definition: &ApiDefinition)
    -> Result<()>;

    fn invoke_url(&self, rest_api_id: &str, stage: &str) -> String;
}

/// Buckets (S3)
#[async_trait]
pub trait ObjectStorageGateway: Send + Sync {
    async fn bucket_exists(&self, name: &str) -> Result<bool>;

    /// Create `name` in the gateway's region
    async fn create_bucket(&self, name: &str) -> Result<()>;

    async fn tag_bucket(&self, name: &str, tags: &[Tag]) -> Result<()>;
}

/// One handle per resource family, shared by every provisioner
#[derive(Clone)]
pub struct Gateways {
    pub network: Arc<dyn NetworkGateway>,
    pub load_balancing: Arc<dyn LoadBalancingGateway>,
    pub auto_scaling: Arc<dyn AutoScalingGateway>,
    pub cluster: Arc<dyn ClusterGateway>,
    pub application_scaling: Arc<dyn ApplicationScalingGateway>,
    pub alarms: Arc<dyn MetricAlarmGateway>,
    pub dns: Arc<dyn DnsGateway>,
    pub api_gateway: Arc<dyn ApiGatewayGateway>,
    pub storage: Arc<dyn ObjectStorageGateway>,
}

impl std::fmt::Debug for Gateways {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateways").finish_non_exhaustive()
    }
}
