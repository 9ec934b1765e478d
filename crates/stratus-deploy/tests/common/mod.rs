//! In-memory gateways that record every call
//!
//! Resources created through the fake become visible to later lookups by
//! their `Name` tag, so a whole environment can be provisioned end to end.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use stratus_cloud::tags::TAG_NAME;
use stratus_cloud::*;
use stratus_config::{EnvironmentConfig, ServiceConfig};

/// One recorded gateway call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub op: &'static str,
    pub detail: String,
}

#[derive(Default)]
pub struct Inner {
    next_id: usize,
    pub calls: Vec<Call>,

    // Inventory visible to lookups
    pub vpcs: HashMap<String, String>,
    pub subnets: HashMap<String, String>,
    pub security_groups: HashMap<String, String>,
    pub target_groups: HashMap<String, String>,
    pub load_balancers: HashMap<String, (String, LoadBalancerDns)>,
    pub listeners: HashMap<(String, String, i32), String>,
    pub launch_configurations: Vec<String>,
    pub auto_scaling_groups: HashSet<String>,
    pub services: HashMap<(String, String), String>,
    pub hosted_zones: HashMap<String, String>,
    pub custom_domain_targets: HashMap<String, String>,
    pub subnets_without_acl_association: HashSet<String>,
    pub buckets: HashSet<String>,
    pub rest_apis: HashMap<String, String>,
    // REST API id → custom domain mapped onto it
    pub api_domains: HashMap<String, String>,

    // Ops whose lookups fail with a "not found" error instead of Ok(NotFound)
    pub not_found_errors: HashSet<&'static str>,
    // Ops that fail with a remote error
    pub failing: HashSet<&'static str>,

    // Captured requests
    pub tags: Vec<(String, Vec<Tag>)>,
    pub subnet_requests: Vec<SubnetRequest>,
    pub acl_entries: Vec<(String, NetworkAclRule)>,
    pub map_public_ip: Vec<(String, bool)>,
    pub acl_replacements: Vec<(String, String)>,
    pub routes: Vec<(String, String, String)>,
    pub route_table_associations: Vec<(String, String)>,
    pub security_group_requests: Vec<SecurityGroupRequest>,
    pub target_group_requests: Vec<TargetGroupRequest>,
    pub load_balancer_requests: Vec<LoadBalancerRequest>,
    pub listener_requests: Vec<ListenerRequest>,
    pub launch_configuration_requests: Vec<LaunchConfigurationRequest>,
    pub deleted_launch_configurations: Vec<String>,
    pub auto_scaling_group_requests: Vec<AutoScalingGroupRequest>,
    pub service_requests: Vec<ServiceRequest>,
    pub scalable_targets: Vec<ScalableTargetParams>,
    pub scaling_policies: Vec<ScalingPolicyParams>,
    pub alarms: Vec<MetricAlarmParams>,
    pub record_batches: Vec<(String, Vec<RecordChange>)>,
    pub waited_changes: Vec<String>,
    pub custom_domains: Vec<CustomDomainRequest>,
    pub base_path_mappings: Vec<BasePathMappingRequest>,
    pub bucket_tags: Vec<(String, Vec<Tag>)>,
    pub imported_apis: Vec<ApiDefinition>,
    pub overwritten_apis: Vec<(String, ApiDefinition)>,
}

#[derive(Clone, Default)]
pub struct FakeCloud {
    inner: Arc<Mutex<Inner>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gateways(&self) -> Gateways {
        let fake = Arc::new(self.clone());
        Gateways {
            network: fake.clone(),
            load_balancing: fake.clone(),
            auto_scaling: fake.clone(),
            cluster: fake.clone(),
            application_scaling: fake.clone(),
            alarms: fake.clone(),
            dns: fake.clone(),
            api_gateway: fake.clone(),
            storage: fake,
        }
    }

    /// Inspect or seed the fake's state
    pub fn with<T>(&self, f: impl FnOnce(&mut Inner) -> T) -> T {
        let mut inner = self.inner.lock().unwrap();
        f(&mut inner)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.with(|inner| inner.calls.clone())
    }

    pub fn ops(&self) -> Vec<&'static str> {
        self.with(|inner| inner.calls.iter().map(|c| c.op).collect())
    }

    pub fn count(&self, op: &str) -> usize {
        self.with(|inner| inner.calls.iter().filter(|c| c.op == op).count())
    }

    /// Index of the first call to `op`
    pub fn first(&self, op: &str) -> usize {
        self.ops()
            .iter()
            .position(|o| *o == op)
            .unwrap_or_else(|| panic!("{} was never called", op))
    }

    /// Index of the last call to `op`
    pub fn last(&self, op: &str) -> usize {
        self.ops()
            .iter()
            .rposition(|o| *o == op)
            .unwrap_or_else(|| panic!("{} was never called", op))
    }

    pub fn fail_with_not_found(&self, op: &'static str) {
        self.with(|inner| inner.not_found_errors.insert(op));
    }

    pub fn fail(&self, op: &'static str) {
        self.with(|inner| inner.failing.insert(op));
    }

    fn enter(&self, op: &'static str, detail: impl Into<String>) -> Result<()> {
        self.with(|inner| {
            inner.calls.push(Call {
                op,
                detail: detail.into(),
            });
            if inner.failing.contains(op) {
                return Err(CloudError::remote(op, Some("InternalFailure".into()), "injected"));
            }
            if inner.not_found_errors.contains(op) {
                return Err(CloudError::not_found("Resource", op));
            }
            Ok(())
        })
    }

    fn next_id(&self, prefix: &str) -> String {
        self.with(|inner| {
            inner.next_id += 1;
            format!("{}-{}", prefix, inner.next_id)
        })
    }
}

#[async_trait]
impl NetworkGateway for FakeCloud {
    async fn find_vpc_id(&self, name: &str) -> Result<Lookup<ResourceId>> {
        self.enter("find_vpc_id", name)?;
        Ok(self.with(|i| Lookup::from_option(i.vpcs.get(name).cloned())))
    }

    async fn create_vpc(&self, cidr_block: &str) -> Result<ResourceId> {
        self.enter("create_vpc", cidr_block)?;
        Ok(self.next_id("vpc"))
    }

    async fn wait_for_vpc(&self, vpc_id: &str) -> Result<()> {
        self.enter("wait_for_vpc", vpc_id)
    }

    async fn tag_resource(&self, resource_id: &str, tags: &[Tag]) -> Result<()> {
        self.enter("tag_resource", resource_id)?;
        self.with(|i| {
            if let Some(name) = tags.iter().find(|t| t.key == TAG_NAME) {
                if resource_id.starts_with("vpc-") {
                    i.vpcs.insert(name.value.clone(), resource_id.to_string());
                } else if resource_id.starts_with("subnet-") {
                    i.subnets.insert(name.value.clone(), resource_id.to_string());
                }
            }
            i.tags.push((resource_id.to_string(), tags.to_vec()));
        });
        Ok(())
    }

    async fn enable_dns_hostnames(&self, vpc_id: &str) -> Result<()> {
        self.enter("enable_dns_hostnames", vpc_id)
    }

    async fn enable_dns_support(&self, vpc_id: &str) -> Result<()> {
        self.enter("enable_dns_support", vpc_id)
    }

    async fn create_network_acl(&self, vpc_id: &str) -> Result<ResourceId> {
        self.enter("create_network_acl", vpc_id)?;
        Ok(self.next_id("acl"))
    }

    async fn create_network_acl_entry(&self, acl_id: &str, rule: &NetworkAclRule) -> Result<()> {
        self.enter("create_network_acl_entry", acl_id)?;
        self.with(|i| i.acl_entries.push((acl_id.to_string(), rule.clone())));
        Ok(())
    }

    async fn create_subnet(&self, request: &SubnetRequest) -> Result<ResourceId> {
        self.enter("create_subnet", request.cidr_block.clone())?;
        self.with(|i| i.subnet_requests.push(request.clone()));
        Ok(self.next_id("subnet"))
    }

    async fn set_map_public_ip_on_launch(&self, subnet_id: &str, enabled: bool) -> Result<()> {
        self.enter("set_map_public_ip_on_launch", subnet_id)?;
        self.with(|i| i.map_public_ip.push((subnet_id.to_string(), enabled)));
        Ok(())
    }

    async fn find_subnet_id(&self, _vpc_id: &str, name: &str) -> Result<Lookup<ResourceId>> {
        self.enter("find_subnet_id", name)?;
        Ok(self.with(|i| Lookup::from_option(i.subnets.get(name).cloned())))
    }

    async fn find_network_acl_association(
        &self,
        subnet_id: &str,
    ) -> Result<Lookup<ResourceId>> {
        self.enter("find_network_acl_association", subnet_id)?;
        Ok(self.with(|i| {
            if i.subnets_without_acl_association.contains(subnet_id) {
                Lookup::NotFound
            } else {
                Lookup::Found(format!("aclassoc-{}", subnet_id))
            }
        }))
    }

    async fn replace_network_acl_association(
        &self,
        association_id: &str,
        acl_id: &str,
    ) -> Result<ResourceId> {
        self.enter("replace_network_acl_association", association_id)?;
        self.with(|i| {
            i.acl_replacements
                .push((association_id.to_string(), acl_id.to_string()))
        });
        Ok(self.next_id("aclassoc"))
    }

    async fn create_internet_gateway(&self) -> Result<ResourceId> {
        self.enter("create_internet_gateway", "")?;
        Ok(self.next_id("igw"))
    }

    async fn attach_internet_gateway(&self, internet_gateway_id: &str, vpc_id: &str) -> Result<()> {
        self.enter(
            "attach_internet_gateway",
            format!("{} -> {}", internet_gateway_id, vpc_id),
        )
    }

    async fn create_route_table(&self, vpc_id: &str) -> Result<ResourceId> {
        self.enter("create_route_table", vpc_id)?;
        Ok(self.next_id("rtb"))
    }

    async fn create_route(
        &self,
        route_table_id: &str,
        destination_cidr_block: &str,
        gateway_id: &str,
    ) -> Result<()> {
        self.enter("create_route", route_table_id)?;
        self.with(|i| {
            i.routes.push((
                route_table_id.to_string(),
                destination_cidr_block.to_string(),
                gateway_id.to_string(),
            ))
        });
        Ok(())
    }

    async fn associate_route_table(
        &self,
        route_table_id: &str,
        subnet_id: &str,
    ) -> Result<ResourceId> {
        self.enter("associate_route_table", subnet_id)?;
        self.with(|i| {
            i.route_table_associations
                .push((route_table_id.to_string(), subnet_id.to_string()))
        });
        Ok(self.next_id("rtbassoc"))
    }

    async fn find_security_group_id(
        &self,
        _vpc_id: &str,
        name: &str,
    ) -> Result<Lookup<ResourceId>> {
        self.enter("find_security_group_id", name)?;
        Ok(self.with(|i| Lookup::from_option(i.security_groups.get(name).cloned())))
    }

    async fn create_security_group(&self, request: &SecurityGroupRequest) -> Result<ResourceId> {
        self.enter("create_security_group", request.name.clone())?;
        let id = self.next_id("sg");
        self.with(|i| {
            i.security_groups.insert(request.name.clone(), id.clone());
            i.security_group_requests.push(request.clone());
        });
        Ok(id)
    }
}

#[async_trait]
impl LoadBalancingGateway for FakeCloud {
    async fn find_target_group_arn(&self, name: &str) -> Result<Lookup<ResourceId>> {
        self.enter("find_target_group_arn", name)?;
        Ok(self.with(|i| Lookup::from_option(i.target_groups.get(name).cloned())))
    }

    async fn create_target_group(&self, request: &TargetGroupRequest) -> Result<ResourceId> {
        self.enter("create_target_group", request.name.clone())?;
        let arn = format!("arn:targetgroup/{}", request.name);
        self.with(|i| {
            i.target_groups.insert(request.name.clone(), arn.clone());
            i.target_group_requests.push(request.clone());
        });
        Ok(arn)
    }

    async fn find_load_balancer_arn(&self, name: &str) -> Result<Lookup<ResourceId>> {
        self.enter("find_load_balancer_arn", name)?;
        Ok(self.with(|i| Lookup::from_option(i.load_balancers.get(name).map(|(arn, _)| arn.clone()))))
    }

    async fn create_load_balancer(&self, request: &LoadBalancerRequest) -> Result<ResourceId> {
        self.enter("create_load_balancer", request.name.clone())?;
        let arn = format!("arn:loadbalancer/{}", request.name);
        let dns = LoadBalancerDns {
            dns_name: format!("{}.elb.amazonaws.com", request.name),
            canonical_hosted_zone_id: "ZELB".to_string(),
        };
        self.with(|i| {
            i.load_balancers
                .insert(request.name.clone(), (arn.clone(), dns));
            i.load_balancer_requests.push(request.clone());
        });
        Ok(arn)
    }

    async fn find_load_balancer_dns(&self, name: &str) -> Result<Lookup<LoadBalancerDns>> {
        self.enter("find_load_balancer_dns", name)?;
        Ok(self.with(|i| Lookup::from_option(i.load_balancers.get(name).map(|(_, dns)| dns.clone()))))
    }

    async fn find_listener_arn(
        &self,
        load_balancer_arn: &str,
        protocol: &str,
        port: i32,
    ) -> Result<Lookup<ResourceId>> {
        self.enter(
            "find_listener_arn",
            format!("{} {} {}", load_balancer_arn, protocol, port),
        )?;
        let key = (load_balancer_arn.to_string(), protocol.to_string(), port);
        Ok(self.with(|i| Lookup::from_option(i.listeners.get(&key).cloned())))
    }

    async fn create_listener(&self, request: &ListenerRequest) -> Result<ResourceId> {
        self.enter("create_listener", format!("{} {}", request.protocol, request.port))?;
        let arn = format!("arn:listener/{}/{}", request.protocol, request.port);
        self.with(|i| {
            i.listeners.insert(
                (
                    request.load_balancer_arn.clone(),
                    request.protocol.clone(),
                    request.port,
                ),
                arn.clone(),
            );
            i.listener_requests.push(request.clone());
        });
        Ok(arn)
    }
}

#[async_trait]
impl AutoScalingGateway for FakeCloud {
    async fn find_latest_launch_configuration(&self, prefix: &str) -> Result<Lookup<String>> {
        self.enter("find_latest_launch_configuration", prefix)?;
        Ok(self.with(|i| {
            Lookup::from_option(
                i.launch_configurations
                    .iter()
                    .filter(|name| is_generated_launch_configuration(name, prefix))
                    .max()
                    .cloned(),
            )
        }))
    }

    async fn create_launch_configuration(
        &self,
        request: &LaunchConfigurationRequest,
    ) -> Result<()> {
        self.enter("create_launch_configuration", request.name.clone())?;
        self.with(|i| {
            i.launch_configurations.push(request.name.clone());
            i.launch_configuration_requests.push(request.clone());
        });
        Ok(())
    }

    async fn delete_launch_configuration(&self, name: &str) -> Result<()> {
        self.enter("delete_launch_configuration", name)?;
        self.with(|i| {
            i.launch_configurations.retain(|existing| existing != name);
            i.deleted_launch_configurations.push(name.to_string());
        });
        Ok(())
    }

    async fn find_auto_scaling_group(&self, name: &str) -> Result<Lookup<String>> {
        self.enter("find_auto_scaling_group", name)?;
        Ok(self.with(|i| {
            Lookup::from_option(i.auto_scaling_groups.get(name).cloned())
        }))
    }

    async fn create_auto_scaling_group(&self, request: &AutoScalingGroupRequest) -> Result<()> {
        self.enter("create_auto_scaling_group", request.name.clone())?;
        self.with(|i| {
            i.auto_scaling_groups.insert(request.name.clone());
            i.auto_scaling_group_requests.push(request.clone());
        });
        Ok(())
    }

    async fn update_auto_scaling_group(&self, request: &AutoScalingGroupRequest) -> Result<()> {
        self.enter("update_auto_scaling_group", request.name.clone())?;
        self.with(|i| i.auto_scaling_group_requests.push(request.clone()));
        Ok(())
    }
}

#[async_trait]
impl ClusterGateway for FakeCloud {
    async fn create_cluster(&self, name: &str) -> Result<ResourceId> {
        self.enter("create_cluster", name)?;
        Ok(format!("arn:cluster/{}", name))
    }

    async fn find_service_arn(&self, cluster: &str, service: &str) -> Result<Lookup<ResourceId>> {
        self.enter("find_service_arn", service)?;
        let key = (cluster.to_string(), service.to_string());
        Ok(self.with(|i| Lookup::from_option(i.services.get(&key).cloned())))
    }

    async fn create_service(&self, request: &ServiceRequest) -> Result<ResourceId> {
        self.enter("create_service", request.service_name.clone())?;
        let arn = format!("arn:service/{}", request.service_name);
        self.with(|i| {
            i.services.insert(
                (request.cluster_name.clone(), request.service_name.clone()),
                arn.clone(),
            );
            i.service_requests.push(request.clone());
        });
        Ok(arn)
    }

    async fn update_service(&self, request: &ServiceRequest) -> Result<ResourceId> {
        self.enter("update_service", request.service_name.clone())?;
        self.with(|i| i.service_requests.push(request.clone()));
        Ok(format!("arn:service/{}", request.service_name))
    }
}

#[async_trait]
impl ApplicationScalingGateway for FakeCloud {
    async fn register_scalable_target(&self, params: &ScalableTargetParams) -> Result<()> {
        self.enter("register_scalable_target", params.resource_id.clone())?;
        self.with(|i| i.scalable_targets.push(params.clone()));
        Ok(())
    }

    async fn put_scaling_policy(&self, params: &ScalingPolicyParams) -> Result<ResourceId> {
        self.enter("put_scaling_policy", params.policy_name.clone())?;
        self.with(|i| i.scaling_policies.push(params.clone()));
        Ok(format!("arn:policy/{}", params.policy_name))
    }
}

#[async_trait]
impl MetricAlarmGateway for FakeCloud {
    async fn put_metric_alarm(&self, params: &MetricAlarmParams) -> Result<()> {
        self.enter("put_metric_alarm", params.alarm_name.clone())?;
        self.with(|i| i.alarms.push(params.clone()));
        Ok(())
    }
}

#[async_trait]
impl DnsGateway for FakeCloud {
    async fn find_hosted_zone_id(&self, zone_name: &str) -> Result<Lookup<String>> {
        self.enter("find_hosted_zone_id", zone_name)?;
        Ok(self.with(|i| Lookup::from_option(i.hosted_zones.get(zone_name).cloned())))
    }

    async fn upsert_records(
        &self,
        hosted_zone_id: &str,
        changes: &[RecordChange],
    ) -> Result<String> {
        self.enter("upsert_records", hosted_zone_id)?;
        let change_id = self.next_id("change");
        self.with(|i| {
            i.record_batches
                .push((hosted_zone_id.to_string(), changes.to_vec()))
        });
        Ok(change_id)
    }

    async fn wait_for_change(&self, change_id: &str) -> Result<()> {
        self.enter("wait_for_change", change_id)?;
        self.with(|i| i.waited_changes.push(change_id.to_string()));
        Ok(())
    }
}

#[async_trait]
impl ApiGatewayGateway for FakeCloud {
    async fn upsert_custom_domain_name(&self, request: &CustomDomainRequest) -> Result<()> {
        self.enter("upsert_custom_domain_name", request.domain_name.clone())?;
        self.with(|i| i.custom_domains.push(request.clone()));
        Ok(())
    }

    async fn upsert_base_path_mapping(&self, request: &BasePathMappingRequest) -> Result<()> {
        self.enter("upsert_base_path_mapping", request.domain_name.clone())?;
        self.with(|i| i.base_path_mappings.push(request.clone()));
        Ok(())
    }

    async fn find_custom_domain_target(&self, domain_name: &str) -> Result<Lookup<String>> {
        self.enter("find_custom_domain_target", domain_name)?;
        Ok(self.with(|i| Lookup::from_option(i.custom_domain_targets.get(domain_name).cloned())))
    }

    async fn find_rest_api_id(&self, name: &str) -> Result<Lookup<ResourceId>> {
        self.enter("find_rest_api_id", name)?;
        Ok(self.with(|i| Lookup::from_option(i.rest_apis.get(name).cloned())))
    }

    async fn find_domain_name_for_api(&self, rest_api_id: &str) -> Result<Lookup<String>> {
        self.enter("find_domain_name_for_api", rest_api_id)?;
        Ok(self.with(|i| Lookup::from_option(i.api_domains.get(rest_api_id).cloned())))
    }

    async fn import_rest_api(&self, definition: &ApiDefinition) -> Result<ResourceId> {
        self.enter("import_rest_api", definition.title.clone())?;
        let id = self.next_id("api");
        self.with(|i| {
            i.rest_apis.insert(definition.title.clone(), id.clone());
            i.imported_apis.push(definition.clone());
        });
        Ok(id)
    }

    async fn overwrite_rest_api(&self, rest_api_id: &str, definition: &ApiDefinition) -> Result<()> {
        self.enter("overwrite_rest_api", rest_api_id)?;
        self.with(|i| {
            i.overwritten_apis
                .push((rest_api_id.to_string(), definition.clone()))
        });
        Ok(())
    }

    fn invoke_url(&self, rest_api_id: &str, stage: &str) -> String {
        stratus_cloud::invoke_url(rest_api_id, "us-west-2", stage)
    }
}

#[async_trait]
impl ObjectStorageGateway for FakeCloud {
    async fn bucket_exists(&self, name: &str) -> Result<bool> {
        self.enter("bucket_exists", name)?;
        Ok(self.with(|i| i.buckets.contains(name)))
    }

    async fn create_bucket(&self, name: &str) -> Result<()> {
        self.enter("create_bucket", name)?;
        self.with(|i| i.buckets.insert(name.to_string()));
        Ok(())
    }

    async fn tag_bucket(&self, name: &str, tags: &[Tag]) -> Result<()> {
        self.enter("tag_bucket", name)?;
        self.with(|i| i.bucket_tags.push((name.to_string(), tags.to_vec())));
        Ok(())
    }
}

// ============ Fixtures ============

pub fn sample_environment() -> EnvironmentConfig {
    serde_json::from_value(json!({
        "environment": "staging",
        "vpc": {
            "name": "staging-vpc",
            "cidrBlock": "10.0.0.0/16",
            "subnets": [
                {"name": "public-a", "availabilityZone": "us-west-2a",
                 "cidrBlock": "10.0.0.0/24", "networkAclName": "public"},
                {"name": "public-b", "availabilityZone": "us-west-2b",
                 "cidrBlock": "10.0.1.0/24", "networkAclName": "public"},
                {"name": "private-a", "availabilityZone": "us-west-2a",
                 "cidrBlock": "10.0.2.0/24", "mapPublicIpOnLaunch": false,
                 "networkAclName": "private"}
            ],
            "networkAcls": [
                {"name": "public", "rules": [
                    {"cidrBlock": "0.0.0.0/0", "egress": false, "protocol": "-1",
                     "ruleAction": "allow", "ruleNumber": 100},
                    {"cidrBlock": "0.0.0.0/0", "egress": true, "protocol": "-1",
                     "ruleAction": "allow", "ruleNumber": 100}
                ]},
                {"name": "private", "rules": [
                    {"cidrBlock": "10.0.0.0/16", "egress": false, "protocol": "6",
                     "ruleAction": "allow", "ruleNumber": 100,
                     "portRange": {"from": 443, "to": 443}}
                ]}
            ]
        },
        "securityGroup": {
            "name": "web-sg",
            "description": "web tier",
            "vpcName": "staging-vpc",
            "ingressRules": [
                {"protocol": "tcp", "fromPort": 80, "toPort": 80, "cidrIp": "0.0.0.0/0"}
            ]
        },
        "launchConfig": {
            "name": "web-lc",
            "vpcName": "staging-vpc",
            "securityGroupName": "web-sg",
            "imageId": "ami-123",
            "instanceType": "t3.small"
        },
        "targetGroup": {
            "name": "web-tg",
            "vpcName": "staging-vpc",
            "port": 80,
            "protocol": "HTTP"
        },
        "autoScaleGroup": {
            "name": "web-asg",
            "vpcName": "staging-vpc",
            "vpcSubnets": ["public-a", "public-b"],
            "targetGroupName": "web-tg",
            "minSize": 1,
            "maxSize": 4,
            "desiredSize": 2
        },
        "loadBalancer": {
            "name": "web-lb",
            "vpcName": "staging-vpc",
            "vpcSubnets": ["public-a", "public-b"],
            "securityGroupName": "web-sg",
            "scheme": "internet-facing"
        },
        "listener": {
            "loadBalancerName": "web-lb",
            "targetGroupName": "web-tg",
            "protocol": "HTTP",
            "port": 80
        }
    }))
    .unwrap()
}

pub fn sample_service() -> ServiceConfig {
    let step = json!({
        "AdjustmentType": "ChangeInCapacity",
        "StepAdjustments": [{"MetricIntervalLowerBound": 0.0, "ScalingAdjustment": 1}],
        "Cooldown": 60
    });
    serde_json::from_value(json!({
        "clusterName": "staging",
        "serviceName": "web",
        "taskName": "web-task:3",
        "desiredCount": 2,
        "containerName": "web",
        "containerPort": 8080,
        "targetGroupName": "web-tg",
        "registerScalableTargetParams": {
            "ServiceNamespace": "ecs",
            "ResourceId": "service/staging/web",
            "ScalableDimension": "ecs:service:DesiredCount",
            "MinCapacity": 1,
            "MaxCapacity": 6
        },
        "serviceScaleOutPolicyParams": {
            "PolicyName": "web-scale-out",
            "ServiceNamespace": "ecs",
            "ResourceId": "service/staging/web",
            "ScalableDimension": "ecs:service:DesiredCount",
            "PolicyType": "StepScaling",
            "StepScalingPolicyConfiguration": step
        },
        "serviceScaleInPolicyParams": {
            "PolicyName": "web-scale-in",
            "ServiceNamespace": "ecs",
            "ResourceId": "service/staging/web",
            "ScalableDimension": "ecs:service:DesiredCount",
            "PolicyType": "StepScaling"
        },
        "putAlarmScaleOutParams": {
            "AlarmName": "web-cpu-high",
            "AlarmActions": ["arn:sns:ops"],
            "MetricName": "CPUUtilization",
            "Namespace": "AWS/ECS",
            "Period": 60,
            "EvaluationPeriods": 2,
            "Threshold": 75.0,
            "ComparisonOperator": "GreaterThanThreshold"
        },
        "putAlarmScaleInParams": {
            "AlarmName": "web-cpu-low",
            "MetricName": "CPUUtilization",
            "Namespace": "AWS/ECS",
            "Period": 60,
            "EvaluationPeriods": 5,
            "Threshold": 20.0,
            "ComparisonOperator": "LessThanThreshold"
        }
    }))
    .unwrap()
}
