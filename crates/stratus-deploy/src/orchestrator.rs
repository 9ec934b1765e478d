//! Environment sequencing
//!
//! ```text
//! network
//!   ├─ security group → launch configuration
//!   ├─ cluster                                  (concurrent)
//!   └─ S3 bucket (optional)
//! target group → auto-scaling group → load balancer → listeners
//!   → service (optional) → DNS (optional)
//! ```
//!
//! Stages run strictly in order and the first failure aborts the run.
//! Nothing is rolled back: resources created before the failure stay in
//! place and the next run picks them up by name.

use crate::compute::ComputeProvisioner;
use crate::dns::DnsAssociator;
use crate::network::NetworkProvisioner;
use crate::result::{ProvisioningResult, RestApiOutcome};
use crate::service::ServiceProvisioner;
use crate::storage::StorageProvisioner;
use std::sync::Arc;
use stratus_cloud::{
    ApiDefinition, ApiGatewayGateway, BasePathMappingRequest, CloudError, ClusterGateway,
    CustomDomainRequest, EndpointType, Gateways, LoadBalancingGateway, Lookup, ResourceId, Result,
};
use stratus_config::{CustomDomainParams, EnvironmentConfig};
use tracing::{debug, info, instrument, warn};

pub struct EnvironmentOrchestrator {
    network: NetworkProvisioner,
    compute: ComputeProvisioner,
    service: ServiceProvisioner,
    dns: DnsAssociator,
    storage: StorageProvisioner,
    cluster: Arc<dyn ClusterGateway>,
    load_balancing: Arc<dyn LoadBalancingGateway>,
    api_gateway: Arc<dyn ApiGatewayGateway>,
}

impl EnvironmentOrchestrator {
    pub fn new(gateways: &Gateways) -> Self {
        Self {
            network: NetworkProvisioner::new(gateways.network.clone()),
            compute: ComputeProvisioner::new(
                gateways.network.clone(),
                gateways.load_balancing.clone(),
                gateways.auto_scaling.clone(),
            ),
            service: ServiceProvisioner::new(
                gateways.load_balancing.clone(),
                gateways.cluster.clone(),
                gateways.application_scaling.clone(),
                gateways.alarms.clone(),
            ),
            dns: DnsAssociator::new(gateways.dns.clone()),
            storage: StorageProvisioner::new(gateways.storage.clone()),
            cluster: gateways.cluster.clone(),
            load_balancing: gateways.load_balancing.clone(),
            api_gateway: gateways.api_gateway.clone(),
        }
    }

    /// Toggle the `Created` timestamp tag on every resource this run creates
    pub fn with_created_tag(mut self, enabled: bool) -> Self {
        self.network = self.network.with_created_tag(enabled);
        self.compute = self.compute.with_created_tag(enabled);
        self.storage = self.storage.with_created_tag(enabled);
        self
    }

    pub fn network(&self) -> &NetworkProvisioner {
        &self.network
    }

    pub fn compute(&self) -> &ComputeProvisioner {
        &self.compute
    }

    pub fn service(&self) -> &ServiceProvisioner {
        &self.service
    }

    pub fn dns(&self) -> &DnsAssociator {
        &self.dns
    }

    pub fn storage(&self) -> &StorageProvisioner {
        &self.storage
    }

    #[instrument(skip(self, config), fields(environment = %config.environment))]
    pub async fn provision_environment(
        &self,
        config: &EnvironmentConfig,
    ) -> Result<ProvisioningResult> {
        config
            .validate()
            .map_err(|e| CloudError::Validation(e.to_string()))?;

        let environment = config.environment.as_str();
        let cluster_name = config.cluster_name();
        info!(cluster = %cluster_name, "Provisioning environment");

        let topology = self.network.provision_network(environment, &config.vpc).await?;

        let security_group_then_launch_configuration = async {
            let security_group_id = self
                .compute
                .ensure_security_group(environment, &config.security_group)
                .await?;
            let launch_configuration = self
                .compute
                .ensure_launch_configuration(&config.launch_config, cluster_name)
                .await?;
            Ok::<_, CloudError>((security_group_id, launch_configuration))
        };
        let bucket = async {
            match &config.s3_bucket {
                Some(bucket) => self.storage.ensure_bucket(environment, bucket).await.map(Some),
                None => Ok(None),
            }
        };
        let ((security_group_id, launch_configuration), cluster_arn, bucket) = tokio::try_join!(
            security_group_then_launch_configuration,
            self.cluster.create_cluster(cluster_name),
            bucket,
        )?;
        info!(cluster_arn = %cluster_arn, "Cluster ready");

        let target_group_arn = self
            .compute
            .ensure_target_group(environment, &config.target_group)
            .await?;

        let auto_scale_group = self
            .compute
            .ensure_auto_scale_group(
                environment,
                &config.auto_scale_group,
                &launch_configuration.name,
                launch_configuration.previous_name.as_deref(),
            )
            .await?;

        let load_balancer_arn = self
            .compute
            .ensure_application_load_balancer(environment, &config.load_balancer)
            .await?;

        let listener_arns = self.compute.ensure_listeners(config.listeners()).await?;

        let service = match &config.service {
            Some(service) => Some(self.service.ensure_service(service).await?),
            None => None,
        };

        let dns_change_id = match &config.dns {
            Some(dns) => {
                let target = self
                    .load_balancing
                    .find_load_balancer_dns(&dns.load_balancer_name)
                    .await?
                    .require("Load balancer", &dns.load_balancer_name)?;
                Some(
                    self.dns
                        .associate_load_balancer(&dns.domain_name, &target)
                        .await?,
                )
            }
            None => None,
        };

        info!(vpc_id = %topology.vpc_id, load_balancer_arn = %load_balancer_arn, "Environment provisioned");
        Ok(ProvisioningResult {
            environment: environment.to_string(),
            vpc_id: topology.vpc_id,
            vpc_created: topology.created,
            subnet_ids: topology.subnet_ids,
            subnets: topology.subnets,
            network_acls: topology.network_acls,
            security_group_id,
            cluster_arn,
            launch_configuration_name: launch_configuration.name,
            previous_launch_configuration_name: launch_configuration.previous_name,
            target_group_arn,
            auto_scale_group,
            load_balancer_arn,
            listener_arns,
            service,
            dns_change_id,
            bucket,
        })
    }

    /// Upsert an API Gateway regional custom domain, then its base path mapping
    #[instrument(skip(self, params), fields(domain = %params.domain_name))]
    pub async fn upsert_custom_domain_name(&self, params: &CustomDomainParams) -> Result<()> {
        self.api_gateway
            .upsert_custom_domain_name(&CustomDomainRequest {
                domain_name: params.domain_name.clone(),
                regional_certificate_arn: params.regional_certificate_arn.clone(),
                endpoint_type: EndpointType::Regional,
            })
            .await?;
        self.api_gateway
            .upsert_base_path_mapping(&BasePathMappingRequest {
                domain_name: params.domain_name.clone(),
                api_gateway_id: params.api_gateway_id.clone(),
                base_path: params.base_path.clone(),
                stage: params.stage.clone(),
            })
            .await?;
        info!(api_gateway_id = %params.api_gateway_id, stage = %params.stage, "Custom domain mapped");
        Ok(())
    }

    /// Point `domain_name` at the regional endpoint API Gateway serves it from.
    ///
    /// Returns `None` without touching DNS when the custom domain has no
    /// target yet.
    #[instrument(skip(self))]
    pub async fn associate_custom_domain_with_cname(
        &self,
        domain_name: &str,
    ) -> Result<Option<String>> {
        let cname = match Lookup::from_result(
            self.api_gateway.find_custom_domain_target(domain_name).await,
        )? {
            Lookup::Found(cname) if !cname.is_empty() => cname,
            _ => {
                warn!("Custom domain has no regional target, skipping DNS association");
                return Ok(None);
            }
        };
        let change_id = self.dns.associate_cname(domain_name, &cname).await?;
        Ok(Some(change_id))
    }

    /// Id of the REST API named `name`
    #[instrument(skip(self))]
    pub async fn lookup_api_gateway_by_name(&self, name: &str) -> Result<Lookup<ResourceId>> {
        Lookup::from_result(self.api_gateway.find_rest_api_id(name).await)
    }

    /// Invoke URL of `stage` on the REST API named `name`
    #[instrument(skip(self))]
    pub async fn lookup_api_gateway_url(&self, name: &str, stage: &str) -> Result<Lookup<String>> {
        Ok(match self.lookup_api_gateway_by_name(name).await? {
            Lookup::Found(id) => Lookup::Found(self.api_gateway.invoke_url(&id, stage)),
            Lookup::NotFound => {
                debug!("REST API not found, no URL");
                Lookup::NotFound
            }
        })
    }

    /// Custom domain mapped onto the REST API named `name`
    #[instrument(skip(self))]
    pub async fn lookup_api_gateway_domain_name(&self, name: &str) -> Result<Lookup<String>> {
        match self.lookup_api_gateway_by_name(name).await? {
            Lookup::Found(id) => {
                Lookup::from_result(self.api_gateway.find_domain_name_for_api(&id).await)
            }
            Lookup::NotFound => Ok(Lookup::NotFound),
        }
    }

    /// Import an OpenAPI definition, overwriting the REST API with the same
    /// title when there is one.
    #[instrument(skip(self, definition), fields(api = %definition.title))]
    pub async fn create_or_overwrite_api(
        &self,
        definition: &ApiDefinition,
    ) -> Result<RestApiOutcome> {
        let (id, created) = match self.lookup_api_gateway_by_name(&definition.title).await? {
            Lookup::Found(id) => {
                self.api_gateway.overwrite_rest_api(&id, definition).await?;
                (id, false)
            }
            Lookup::NotFound => (self.api_gateway.import_rest_api(definition).await?, true),
        };
        info!(rest_api_id = %id, created, "API definition deployed");
        Ok(RestApiOutcome {
            id,
            name: definition.title.clone(),
            created,
        })
    }
}
