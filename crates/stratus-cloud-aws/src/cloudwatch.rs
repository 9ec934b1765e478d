//! CloudWatch metric alarms

use crate::context::AwsContext;
use crate::error::{SdkResultExt, build_error};
use async_trait::async_trait;
use aws_sdk_cloudwatch::types::{ComparisonOperator, Dimension, StandardUnit, Statistic, Tag};
use stratus_cloud::{MetricAlarmGateway, MetricAlarmParams, Result};
use tracing::info;

/// [`MetricAlarmGateway`] backed by the CloudWatch API
#[derive(Debug, Clone)]
pub struct CloudWatchGateway {
    client: aws_sdk_cloudwatch::Client,
}

impl CloudWatchGateway {
    pub fn new(client: aws_sdk_cloudwatch::Client) -> Self {
        Self { client }
    }

    pub fn from_context(context: &AwsContext) -> Self {
        Self::new(context.cloudwatch_client())
    }
}

fn non_empty(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}

#[async_trait]
impl MetricAlarmGateway for CloudWatchGateway {
    async fn put_metric_alarm(&self, params: &MetricAlarmParams) -> Result<()> {
        let dimensions = params
            .dimensions
            .iter()
            .map(|d| {
                Dimension::builder()
                    .name(&d.name)
                    .value(&d.value)
                    .build()
                    .map_err(build_error("Dimension"))
            })
            .collect::<Result<Vec<_>>>()?;
        let tags = params
            .tags
            .iter()
            .map(|t| {
                Tag::builder()
                    .key(&t.key)
                    .value(&t.value)
                    .build()
                    .map_err(build_error("Tag"))
            })
            .collect::<Result<Vec<_>>>()?;

        self.client
            .put_metric_alarm()
            .alarm_name(&params.alarm_name)
            .set_alarm_description(params.alarm_description.clone())
            .set_actions_enabled(params.actions_enabled)
            .set_ok_actions(non_empty(&params.ok_actions))
            .set_alarm_actions(Some(params.alarm_actions.clone()))
            .set_insufficient_data_actions(non_empty(&params.insufficient_data_actions))
            .metric_name(&params.metric_name)
            .namespace(&params.namespace)
            .set_statistic(params.statistic.as_deref().map(Statistic::from))
            .set_extended_statistic(params.extended_statistic.clone())
            .set_dimensions(Some(dimensions))
            .period(params.period)
            .set_unit(params.unit.as_deref().map(StandardUnit::from))
            .evaluation_periods(params.evaluation_periods)
            .set_datapoints_to_alarm(params.datapoints_to_alarm)
            .threshold(params.threshold)
            .comparison_operator(ComparisonOperator::from(params.comparison_operator.as_str()))
            .set_treat_missing_data(params.treat_missing_data.clone())
            .set_evaluate_low_sample_count_percentile(
                params.evaluate_low_sample_count_percentile.clone(),
            )
            .set_tags((!tags.is_empty()).then_some(tags))
            .send()
            .await
            .map_sdk_err("PutMetricAlarm")?;

        info!(
            alarm = %params.alarm_name,
            actions = params.alarm_actions.len(),
            "Put metric alarm"
        );
        Ok(())
    }
}
