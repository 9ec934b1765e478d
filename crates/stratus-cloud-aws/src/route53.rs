//! Route 53 hosted zones and record sets

use crate::context::AwsContext;
use crate::error::{SdkResultExt, build_error, missing, wait_error};
use async_trait::async_trait;
use aws_sdk_route53::client::Waiters;
use aws_sdk_route53::types::{
    AliasTarget, Change, ChangeAction, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use std::time::Duration;
use stratus_cloud::dns::is_zone_for;
use stratus_cloud::{DnsGateway, Lookup, RecordChange, RecordTarget, RecordType, Result};
use tracing::{debug, info};

/// [`DnsGateway`] backed by the Route 53 API
#[derive(Debug, Clone)]
pub struct Route53Gateway {
    client: aws_sdk_route53::Client,
    wait_timeout: Duration,
}

impl Route53Gateway {
    pub fn new(client: aws_sdk_route53::Client, wait_timeout: Duration) -> Self {
        Self {
            client,
            wait_timeout,
        }
    }

    pub fn from_context(context: &AwsContext) -> Self {
        Self::new(context.route53_client(), context.wait_timeout())
    }
}

fn rr_type(record_type: RecordType) -> RrType {
    match record_type {
        RecordType::A => RrType::A,
        RecordType::Aaaa => RrType::Aaaa,
        RecordType::Cname => RrType::Cname,
    }
}

fn upsert(change: &RecordChange) -> Result<Change> {
    let record_set = ResourceRecordSet::builder()
        .name(&change.name)
        .r#type(rr_type(change.record_type));

    let record_set = match &change.target {
        RecordTarget::Alias {
            dns_name,
            hosted_zone_id,
            evaluate_target_health,
        } => record_set.alias_target(
            AliasTarget::builder()
                .dns_name(dns_name)
                .hosted_zone_id(hosted_zone_id)
                .evaluate_target_health(*evaluate_target_health)
                .build()
                .map_err(build_error("AliasTarget"))?,
        ),
        RecordTarget::Value { value, ttl } => record_set.ttl(*ttl).resource_records(
            ResourceRecord::builder()
                .value(value)
                .build()
                .map_err(build_error("ResourceRecord"))?,
        ),
    };

    Change::builder()
        .action(ChangeAction::Upsert)
        .resource_record_set(record_set.build().map_err(build_error("ResourceRecordSet"))?)
        .build()
        .map_err(build_error("Change"))
}

#[async_trait]
impl DnsGateway for Route53Gateway {
    async fn find_hosted_zone_id(&self, zone_name: &str) -> Result<Lookup<String>> {
        debug!(zone = %zone_name, "Looking up hosted zone");
        let output = self
            .client
            .list_hosted_zones_by_name()
            .dns_name(zone_name)
            .send()
            .await
            .map_sdk_err("ListHostedZonesByName")?;

        Ok(Lookup::from_option(
            output
                .hosted_zones()
                .iter()
                .find(|zone| is_zone_for(zone_name, zone.name()))
                .map(|zone| zone.id().to_string()),
        ))
    }

    async fn upsert_records(
        &self,
        hosted_zone_id: &str,
        changes: &[RecordChange],
    ) -> Result<String> {
        let changes = changes.iter().map(upsert).collect::<Result<Vec<_>>>()?;
        let batch = ChangeBatch::builder()
            .set_changes(Some(changes))
            .build()
            .map_err(build_error("ChangeBatch"))?;

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(hosted_zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_sdk_err("ChangeResourceRecordSets")?;

        let change_id = output
            .change_info()
            .map(|info| info.id().to_string())
            .ok_or_else(|| missing("ChangeResourceRecordSets", "ChangeInfo"))?;
        info!(hosted_zone_id = %hosted_zone_id, change_id = %change_id, "Submitted record changes");
        Ok(change_id)
    }

    async fn wait_for_change(&self, change_id: &str) -> Result<()> {
        debug!(change_id = %change_id, "Waiting for change to propagate");
        self.client
            .wait_until_resource_record_sets_changed()
            .id(change_id)
            .wait(self.wait_timeout)
            .await
            .map_err(wait_error(format!("Route 53 change {change_id} did not reach INSYNC")))?;
        Ok(())
    }
}
