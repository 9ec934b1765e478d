//! ECS clusters and services

use crate::context::AwsContext;
use crate::error::{SdkResultExt, missing};
use async_trait::async_trait;
use aws_sdk_ecs::types::LoadBalancer;
use stratus_cloud::{ClusterGateway, Lookup, ResourceId, Result, ServiceRequest};
use tracing::{debug, info};

/// Services in this state are gone and may be recreated under the same name
const INACTIVE: &str = "INACTIVE";

/// [`ClusterGateway`] backed by the ECS API
#[derive(Debug, Clone)]
pub struct EcsGateway {
    client: aws_sdk_ecs::Client,
}

impl EcsGateway {
    pub fn new(client: aws_sdk_ecs::Client) -> Self {
        Self { client }
    }

    pub fn from_context(context: &AwsContext) -> Self {
        Self::new(context.ecs_client())
    }

    async fn describe_service_arn(&self, cluster: &str, service: &str) -> Result<Lookup<ResourceId>> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .services(service)
            .send()
            .await
            .map_sdk_err("DescribeServices")?;

        Ok(Lookup::from_option(
            output
                .services()
                .iter()
                .find(|s| s.status() != Some(INACTIVE))
                .and_then(|s| s.service_arn())
                .map(str::to_string),
        ))
    }
}

#[async_trait]
impl ClusterGateway for EcsGateway {
    async fn create_cluster(&self, name: &str) -> Result<ResourceId> {
        // CreateCluster returns the existing cluster when the name is taken
        let output = self
            .client
            .create_cluster()
            .cluster_name(name)
            .send()
            .await
            .map_sdk_err("CreateCluster")?;

        let arn = output
            .cluster()
            .and_then(|c| c.cluster_arn())
            .ok_or_else(|| missing("CreateCluster", "ClusterArn"))?;
        info!(cluster = %name, arn = %arn, "Cluster ready");
        Ok(arn.to_string())
    }

    async fn find_service_arn(&self, cluster: &str, service: &str) -> Result<Lookup<ResourceId>> {
        debug!(cluster = %cluster, service = %service, "Looking up service");
        Lookup::from_result(self.describe_service_arn(cluster, service).await)
    }

    async fn create_service(&self, request: &ServiceRequest) -> Result<ResourceId> {
        let output = self
            .client
            .create_service()
            .cluster(&request.cluster_name)
            .service_name(&request.service_name)
            .task_definition(&request.task_name)
            .desired_count(request.desired_count)
            .load_balancers(
                LoadBalancer::builder()
                    .target_group_arn(&request.target_group_arn)
                    .container_name(&request.container_name)
                    .container_port(request.container_port)
                    .build(),
            )
            .send()
            .await
            .map_sdk_err("CreateService")?;

        let arn = output
            .service()
            .and_then(|s| s.service_arn())
            .ok_or_else(|| missing("CreateService", "ServiceArn"))?;
        info!(service = %request.service_name, arn = %arn, "Created service");
        Ok(arn.to_string())
    }

    async fn update_service(&self, request: &ServiceRequest) -> Result<ResourceId> {
        let output = self
            .client
            .update_service()
            .cluster(&request.cluster_name)
            .service(&request.service_name)
            .task_definition(&request.task_name)
            .desired_count(request.desired_count)
            .send()
            .await
            .map_sdk_err("UpdateService")?;

        let arn = output
            .service()
            .and_then(|s| s.service_arn())
            .ok_or_else(|| missing("UpdateService", "ServiceArn"))?;
        info!(
            service = %request.service_name,
            task = %request.task_name,
            "Updated service"
        );
        Ok(arn.to_string())
    }
}
