//! ECS service provisioning with step-scaling policies and their alarms

use serde::Serialize;
use std::sync::Arc;
use stratus_cloud::{
    ApplicationScalingGateway, ClusterGateway, LoadBalancingGateway, Lookup, MetricAlarmGateway,
    ResourceId, Result, ServiceRequest,
};
use stratus_config::ServiceConfig;
use tracing::{info, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOutcome {
    pub service_arn: ResourceId,
    pub scale_out_policy_arn: ResourceId,
    pub scale_in_policy_arn: ResourceId,
}

pub struct ServiceProvisioner {
    load_balancing: Arc<dyn LoadBalancingGateway>,
    cluster: Arc<dyn ClusterGateway>,
    application_scaling: Arc<dyn ApplicationScalingGateway>,
    alarms: Arc<dyn MetricAlarmGateway>,
}

impl ServiceProvisioner {
    pub fn new(
        load_balancing: Arc<dyn LoadBalancingGateway>,
        cluster: Arc<dyn ClusterGateway>,
        application_scaling: Arc<dyn ApplicationScalingGateway>,
        alarms: Arc<dyn MetricAlarmGateway>,
    ) -> Self {
        Self {
            load_balancing,
            cluster,
            application_scaling,
            alarms,
        }
    }

    /// Create or update the service, then wire up scaling.
    ///
    /// Policies are put scale-out first, then scale-in. Each alarm is put
    /// with the ARN of its policy appended to `AlarmActions`.
    #[instrument(skip(self, config), fields(cluster = %config.cluster_name, service = %config.service_name))]
    pub async fn ensure_service(&self, config: &ServiceConfig) -> Result<ServiceOutcome> {
        let target_group_arn =
            Lookup::from_result(self.load_balancing.find_target_group_arn(&config.target_group_name).await)?
                .require("Target group", &config.target_group_name)?;

        let request = ServiceRequest {
            cluster_name: config.cluster_name.clone(),
            service_name: config.service_name.clone(),
            task_name: config.task_name.clone(),
            desired_count: config.desired_count,
            container_name: config.container_name.clone(),
            container_port: config.container_port,
            target_group_arn,
        };

        let service_arn = match Lookup::from_result(
            self.cluster
                .find_service_arn(&config.cluster_name, &config.service_name)
                .await,
        )? {
            Lookup::Found(_) => {
                info!(task = %config.task_name, "Updating service");
                self.cluster.update_service(&request).await?
            }
            Lookup::NotFound => {
                info!(task = %config.task_name, "Creating service");
                self.cluster.create_service(&request).await?
            }
        };

        self.application_scaling
            .register_scalable_target(&config.register_scalable_target_params)
            .await?;

        let scale_out_policy_arn = self
            .application_scaling
            .put_scaling_policy(&config.service_scale_out_policy_params)
            .await?;
        let scale_in_policy_arn = self
            .application_scaling
            .put_scaling_policy(&config.service_scale_in_policy_params)
            .await?;

        self.alarms
            .put_metric_alarm(
                &config
                    .put_alarm_scale_out_params
                    .with_alarm_action(scale_out_policy_arn.as_str()),
            )
            .await?;
        self.alarms
            .put_metric_alarm(
                &config
                    .put_alarm_scale_in_params
                    .with_alarm_action(scale_in_policy_arn.as_str()),
            )
            .await?;

        info!(service_arn = %service_arn, "Service and scaling policies in place");
        Ok(ServiceOutcome {
            service_arn,
            scale_out_policy_arn,
            scale_in_policy_arn,
        })
    }
}
