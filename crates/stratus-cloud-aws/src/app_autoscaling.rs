//! Application Auto Scaling: scalable targets and scaling policies

use crate::context::AwsContext;
use crate::error::{SdkResultExt, build_error};
use async_trait::async_trait;
use aws_sdk_applicationautoscaling::types::{
    self as sdk, AdjustmentType, MetricAggregationType, MetricStatistic, MetricType, PolicyType,
    ScalableDimension, ServiceNamespace,
};
use stratus_cloud::{
    ApplicationScalingGateway, CustomizedMetricSpecification, ResourceId, Result,
    ScalableTargetParams, ScalingPolicyParams, StepScalingPolicyConfiguration, SuspendedState,
    TargetTrackingScalingPolicyConfiguration,
};
use tracing::info;

/// [`ApplicationScalingGateway`] backed by the Application Auto Scaling API
#[derive(Debug, Clone)]
pub struct ApplicationAutoScalingGateway {
    client: aws_sdk_applicationautoscaling::Client,
}

impl ApplicationAutoScalingGateway {
    pub fn new(client: aws_sdk_applicationautoscaling::Client) -> Self {
        Self { client }
    }

    pub fn from_context(context: &AwsContext) -> Self {
        Self::new(context.application_autoscaling_client())
    }
}

fn suspended_state(state: &SuspendedState) -> sdk::SuspendedState {
    sdk::SuspendedState::builder()
        .set_dynamic_scaling_in_suspended(state.dynamic_scaling_in_suspended)
        .set_dynamic_scaling_out_suspended(state.dynamic_scaling_out_suspended)
        .set_scheduled_scaling_suspended(state.scheduled_scaling_suspended)
        .build()
}

fn step_configuration(
    config: &StepScalingPolicyConfiguration,
) -> Result<sdk::StepScalingPolicyConfiguration> {
    let adjustments = config
        .step_adjustments
        .iter()
        .map(|step| {
            sdk::StepAdjustment::builder()
                .set_metric_interval_lower_bound(step.metric_interval_lower_bound)
                .set_metric_interval_upper_bound(step.metric_interval_upper_bound)
                .scaling_adjustment(step.scaling_adjustment)
                .build()
                .map_err(build_error("StepAdjustment"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(sdk::StepScalingPolicyConfiguration::builder()
        .set_adjustment_type(config.adjustment_type.as_deref().map(AdjustmentType::from))
        .set_step_adjustments(Some(adjustments))
        .set_min_adjustment_magnitude(config.min_adjustment_magnitude)
        .set_cooldown(config.cooldown)
        .set_metric_aggregation_type(
            config
                .metric_aggregation_type
                .as_deref()
                .map(MetricAggregationType::from),
        )
        .build())
}

fn customized_metric(
    metric: &CustomizedMetricSpecification,
) -> Result<sdk::CustomizedMetricSpecification> {
    let dimensions = metric
        .dimensions
        .iter()
        .map(|d| {
            sdk::MetricDimension::builder()
                .name(&d.name)
                .value(&d.value)
                .build()
                .map_err(build_error("MetricDimension"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(sdk::CustomizedMetricSpecification::builder()
        .set_metric_name(metric.metric_name.clone())
        .set_namespace(metric.namespace.clone())
        .set_dimensions((!dimensions.is_empty()).then_some(dimensions))
        .set_statistic(metric.statistic.as_deref().map(MetricStatistic::from))
        .set_unit(metric.unit.clone())
        .build())
}

fn target_tracking_configuration(
    config: &TargetTrackingScalingPolicyConfiguration,
) -> Result<sdk::TargetTrackingScalingPolicyConfiguration> {
    let predefined = config
        .predefined_metric_specification
        .as_ref()
        .map(|metric| {
            sdk::PredefinedMetricSpecification::builder()
                .predefined_metric_type(MetricType::from(metric.predefined_metric_type.as_str()))
                .set_resource_label(metric.resource_label.clone())
                .build()
                .map_err(build_error("PredefinedMetricSpecification"))
        })
        .transpose()?;
    let customized = config
        .customized_metric_specification
        .as_ref()
        .map(customized_metric)
        .transpose()?;

    sdk::TargetTrackingScalingPolicyConfiguration::builder()
        .target_value(config.target_value)
        .set_predefined_metric_specification(predefined)
        .set_customized_metric_specification(customized)
        .set_scale_out_cooldown(config.scale_out_cooldown)
        .set_scale_in_cooldown(config.scale_in_cooldown)
        .set_disable_scale_in(config.disable_scale_in)
        .build()
        .map_err(build_error("TargetTrackingScalingPolicyConfiguration"))
}

#[async_trait]
impl ApplicationScalingGateway for ApplicationAutoScalingGateway {
    async fn register_scalable_target(&self, params: &ScalableTargetParams) -> Result<()> {
        let tags = (!params.tags.is_empty()).then(|| {
            params
                .tags
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        });

        self.client
            .register_scalable_target()
            .service_namespace(ServiceNamespace::from(params.service_namespace.as_str()))
            .resource_id(&params.resource_id)
            .scalable_dimension(ScalableDimension::from(params.scalable_dimension.as_str()))
            .set_min_capacity(params.min_capacity)
            .set_max_capacity(params.max_capacity)
            .set_role_arn(params.role_arn.clone())
            .set_suspended_state(params.suspended_state.as_ref().map(suspended_state))
            .set_tags(tags)
            .send()
            .await
            .map_sdk_err("RegisterScalableTarget")?;

        info!(resource_id = %params.resource_id, "Registered scalable target");
        Ok(())
    }

    async fn put_scaling_policy(&self, params: &ScalingPolicyParams) -> Result<ResourceId> {
        let step = params
            .step_scaling_policy_configuration
            .as_ref()
            .map(step_configuration)
            .transpose()?;
        let tracking = params
            .target_tracking_scaling_policy_configuration
            .as_ref()
            .map(target_tracking_configuration)
            .transpose()?;

        let output = self
            .client
            .put_scaling_policy()
            .policy_name(&params.policy_name)
            .service_namespace(ServiceNamespace::from(params.service_namespace.as_str()))
            .resource_id(&params.resource_id)
            .scalable_dimension(ScalableDimension::from(params.scalable_dimension.as_str()))
            .set_policy_type(params.policy_type.as_deref().map(PolicyType::from))
            .set_step_scaling_policy_configuration(step)
            .set_target_tracking_scaling_policy_configuration(tracking)
            .send()
            .await
            .map_sdk_err("PutScalingPolicy")?;

        let arn = output.policy_arn().to_string();
        info!(policy = %params.policy_name, arn = %arn, "Put scaling policy");
        Ok(arn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_cloud::{Dimension, PredefinedMetricSpecification};

    #[test]
    fn test_target_tracking_configuration_carries_every_field() {
        let config = TargetTrackingScalingPolicyConfiguration {
            target_value: 60.0,
            predefined_metric_specification: Some(PredefinedMetricSpecification {
                predefined_metric_type: "ECSServiceAverageCPUUtilization".to_string(),
                resource_label: None,
            }),
            customized_metric_specification: None,
            scale_out_cooldown: Some(30),
            scale_in_cooldown: Some(90),
            disable_scale_in: Some(true),
        };

        let built = target_tracking_configuration(&config).unwrap();
        assert_eq!(built.target_value(), 60.0);
        assert_eq!(built.scale_out_cooldown(), Some(30));
        assert_eq!(built.scale_in_cooldown(), Some(90));
        assert_eq!(built.disable_scale_in(), Some(true));
        assert!(built.predefined_metric_specification().is_some());
    }

    #[test]
    fn test_customized_metric_dimensions() {
        let metric = CustomizedMetricSpecification {
            metric_name: Some("RequestCount".to_string()),
            namespace: Some("AWS/ApplicationELB".to_string()),
            dimensions: vec![Dimension {
                name: "LoadBalancer".to_string(),
                value: "app/web-lb/1".to_string(),
            }],
            statistic: Some("Sum".to_string()),
            unit: Some("Count".to_string()),
        };

        let built = customized_metric(&metric).unwrap();
        assert_eq!(built.metric_name(), Some("RequestCount"));
        assert_eq!(built.dimensions().len(), 1);
        assert_eq!(built.unit(), Some("Count"));
    }
}
