//! Route 53 record association

use std::sync::Arc;
use stratus_cloud::dns::hosted_zone_name;
use stratus_cloud::{DnsGateway, LoadBalancerDns, RecordChange, RecordTarget, RecordType, Result};
use tracing::{debug, info, instrument};

/// TTL of CNAME records pointing at API Gateway domains
pub const CNAME_TTL_SECONDS: i64 = 300;

pub struct DnsAssociator {
    dns: Arc<dyn DnsGateway>,
}

impl DnsAssociator {
    pub fn new(dns: Arc<dyn DnsGateway>) -> Self {
        Self { dns }
    }

    async fn resolve_hosted_zone_id(&self, domain_name: &str) -> Result<String> {
        let zone_name = hosted_zone_name(domain_name)?;
        debug!(zone = %zone_name, "Looking up hosted zone");
        self.dns
            .find_hosted_zone_id(&zone_name)
            .await?
            .require("Hosted zone", &zone_name)
    }

    /// Upsert A and AAAA alias records for `domain_name` pointing at a load
    /// balancer and wait for the change to propagate. Returns the change id.
    #[instrument(skip(self, target), fields(target = %target.dns_name))]
    pub async fn associate_load_balancer(
        &self,
        domain_name: &str,
        target: &LoadBalancerDns,
    ) -> Result<String> {
        let hosted_zone_id = self.resolve_hosted_zone_id(domain_name).await?;
        let changes: Vec<RecordChange> = [RecordType::A, RecordType::Aaaa]
            .into_iter()
            .map(|record_type| RecordChange {
                name: domain_name.to_string(),
                record_type,
                target: RecordTarget::Alias {
                    dns_name: target.dns_name.clone(),
                    hosted_zone_id: target.canonical_hosted_zone_id.clone(),
                    evaluate_target_health: false,
                },
            })
            .collect();

        let change_id = self.dns.upsert_records(&hosted_zone_id, &changes).await?;
        info!(hosted_zone_id = %hosted_zone_id, change_id = %change_id, "Alias records submitted");
        self.dns.wait_for_change(&change_id).await?;
        info!(change_id = %change_id, "Alias records in sync");
        Ok(change_id)
    }

    /// Upsert a CNAME record and wait for it to propagate
    #[instrument(skip(self))]
    pub async fn associate_cname(&self, domain_name: &str, cname: &str) -> Result<String> {
        let hosted_zone_id = self.resolve_hosted_zone_id(domain_name).await?;
        let change = RecordChange {
            name: domain_name.to_string(),
            record_type: RecordType::Cname,
            target: RecordTarget::Value {
                value: cname.to_string(),
                ttl: CNAME_TTL_SECONDS,
            },
        };

        let change_id = self
            .dns
            .upsert_records(&hosted_zone_id, std::slice::from_ref(&change))
            .await?;
        self.dns.wait_for_change(&change_id).await?;
        info!(change_id = %change_id, "CNAME record in sync");
        Ok(change_id)
    }
}
