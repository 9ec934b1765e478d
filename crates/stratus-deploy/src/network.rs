//! VPC provisioning
//!
//! Creates a VPC with its network ACLs, subnets, internet gateway and route
//! table. Provisioning is idempotent at the VPC level only: an existing VPC
//! with the same name short-circuits the whole stage.

use futures_util::future::try_join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use stratus_cloud::tags::{base_tags, with_created};
use stratus_cloud::{
    CloudError, Lookup, NetworkGateway, ResourceId, Result, SubnetRequest, Tag,
};
use stratus_config::{NetworkAclConfig, NetworkConfig, SubnetConfig};
use tracing::{debug, info, instrument, warn};

/// Route every subnet sends to the internet gateway
const DEFAULT_ROUTE_CIDR: &str = "0.0.0.0/0";

/// Identifiers produced by [`NetworkProvisioner::provision_network`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkTopology {
    pub vpc_id: ResourceId,
    /// `false` when the VPC already existed and nothing else was touched
    pub created: bool,
    /// Subnet ids in configuration order
    pub subnet_ids: Vec<ResourceId>,
    pub subnets: BTreeMap<String, ResourceId>,
    pub network_acls: BTreeMap<String, ResourceId>,
    pub internet_gateway_id: Option<ResourceId>,
    pub route_table_id: Option<ResourceId>,
}

impl NetworkTopology {
    fn existing(vpc_id: ResourceId) -> Self {
        Self {
            vpc_id,
            created: false,
            ..Default::default()
        }
    }
}

pub struct NetworkProvisioner {
    network: Arc<dyn NetworkGateway>,
    tag_created: bool,
}

impl NetworkProvisioner {
    pub fn new(network: Arc<dyn NetworkGateway>) -> Self {
        Self {
            network,
            tag_created: true,
        }
    }

    /// Toggle the `Created` timestamp tag on new resources
    pub fn with_created_tag(mut self, enabled: bool) -> Self {
        self.tag_created = enabled;
        self
    }

    fn tags(&self, name: &str, environment: &str) -> Vec<Tag> {
        with_created(base_tags(name, environment), self.tag_created)
    }

    #[instrument(skip(self, config), fields(vpc = %config.name))]
    pub async fn provision_network(
        &self,
        environment: &str,
        config: &NetworkConfig,
    ) -> Result<NetworkTopology> {
        config
            .validate()
            .map_err(|e| CloudError::Validation(e.to_string()))?;

        if let Lookup::Found(vpc_id) = self.network.find_vpc_id(&config.name).await? {
            warn!(vpc_id = %vpc_id, "VPC already exists, taking no action");
            return Ok(NetworkTopology::existing(vpc_id));
        }

        let vpc_id = self.create_vpc(environment, config).await?;

        info!(vpc_id = %vpc_id, count = config.network_acls.len(), "Creating network ACLs");
        let acl_ids = try_join_all(
            config
                .network_acls
                .iter()
                .map(|acl| self.create_network_acl(environment, &vpc_id, acl)),
        )
        .await?;
        let network_acls: BTreeMap<String, ResourceId> = config
            .network_acls
            .iter()
            .map(|acl| acl.name.clone())
            .zip(acl_ids)
            .collect();

        info!(vpc_id = %vpc_id, count = config.subnets.len(), "Creating subnets");
        let subnet_ids = try_join_all(
            config
                .subnets
                .iter()
                .map(|subnet| self.create_subnet(environment, &vpc_id, subnet)),
        )
        .await?;
        let subnets: BTreeMap<String, ResourceId> = config
            .subnets
            .iter()
            .map(|subnet| subnet.name.clone())
            .zip(subnet_ids.iter().cloned())
            .collect();

        info!(vpc_id = %vpc_id, "Associating subnets with network ACLs");
        try_join_all(config.subnets.iter().zip(&subnet_ids).map(|(subnet, subnet_id)| {
            self.replace_network_acl(subnet_id, network_acls.get(&subnet.network_acl_name), subnet)
        }))
        .await?;

        let internet_gateway_id = self
            .create_internet_gateway(environment, &vpc_id, &config.name)
            .await?;

        let route_table_id = self
            .create_route_table(environment, &vpc_id, &config.name, &internet_gateway_id, &subnet_ids)
            .await?;

        info!(vpc_id = %vpc_id, subnets = subnet_ids.len(), "VPC provisioned");
        Ok(NetworkTopology {
            vpc_id,
            created: true,
            subnet_ids,
            subnets,
            network_acls,
            internet_gateway_id: Some(internet_gateway_id),
            route_table_id: Some(route_table_id),
        })
    }

    async fn create_vpc(&self, environment: &str, config: &NetworkConfig) -> Result<ResourceId> {
        info!(cidr_block = %config.cidr_block, "Creating VPC");
        let vpc_id = self.network.create_vpc(&config.cidr_block).await?;
        self.network.wait_for_vpc(&vpc_id).await?;
        self.network
            .tag_resource(&vpc_id, &self.tags(&config.name, environment))
            .await?;
        tokio::try_join!(
            self.network.enable_dns_hostnames(&vpc_id),
            self.network.enable_dns_support(&vpc_id),
        )?;
        info!(vpc_id = %vpc_id, "VPC created");
        Ok(vpc_id)
    }

    async fn create_network_acl(
        &self,
        environment: &str,
        vpc_id: &str,
        config: &NetworkAclConfig,
    ) -> Result<ResourceId> {
        let acl_id = self.network.create_network_acl(vpc_id).await?;
        self.network
            .tag_resource(&acl_id, &self.tags(&config.name, environment))
            .await?;
        try_join_all(
            config
                .rules
                .iter()
                .map(|rule| self.network.create_network_acl_entry(&acl_id, rule)),
        )
        .await?;
        debug!(acl = %config.name, acl_id = %acl_id, rules = config.rules.len(), "Network ACL created");
        Ok(acl_id)
    }

    async fn create_subnet(
        &self,
        environment: &str,
        vpc_id: &str,
        config: &SubnetConfig,
    ) -> Result<ResourceId> {
        let subnet_id = self
            .network
            .create_subnet(&SubnetRequest {
                vpc_id: vpc_id.to_string(),
                cidr_block: config.cidr_block.clone(),
                availability_zone: config.availability_zone.clone(),
            })
            .await?;
        self.network
            .tag_resource(&subnet_id, &self.tags(&config.name, environment))
            .await?;
        self.network
            .set_map_public_ip_on_launch(&subnet_id, config.map_public_ip_on_launch)
            .await?;
        debug!(subnet = %config.name, subnet_id = %subnet_id, "Subnet created");
        Ok(subnet_id)
    }

    async fn replace_network_acl(
        &self,
        subnet_id: &str,
        acl_id: Option<&ResourceId>,
        subnet: &SubnetConfig,
    ) -> Result<ResourceId> {
        let acl_id = acl_id.ok_or_else(|| {
            CloudError::Validation(format!(
                "Subnet {} references unknown network ACL {}",
                subnet.name, subnet.network_acl_name
            ))
        })?;
        let association_id = match self.network.find_network_acl_association(subnet_id).await? {
            Lookup::Found(id) => id,
            Lookup::NotFound => {
                return Err(CloudError::empty(format!(
                    "network ACL association for subnet {}",
                    subnet_id
                )));
            }
        };
        self.network
            .replace_network_acl_association(&association_id, acl_id)
            .await
    }

    async fn create_internet_gateway(
        &self,
        environment: &str,
        vpc_id: &str,
        vpc_name: &str,
    ) -> Result<ResourceId> {
        let name = format!("{} - Internet Gateway", vpc_name);
        let internet_gateway_id = self.network.create_internet_gateway().await?;
        self.network
            .tag_resource(&internet_gateway_id, &self.tags(&name, environment))
            .await?;
        self.network
            .attach_internet_gateway(&internet_gateway_id, vpc_id)
            .await?;
        info!(internet_gateway_id = %internet_gateway_id, "Internet gateway attached");
        Ok(internet_gateway_id)
    }

    async fn create_route_table(
        &self,
        environment: &str,
        vpc_id: &str,
        vpc_name: &str,
        internet_gateway_id: &str,
        subnet_ids: &[ResourceId],
    ) -> Result<ResourceId> {
        let name = format!("{} - Route Table", vpc_name);
        let route_table_id = self.network.create_route_table(vpc_id).await?;
        self.network
            .tag_resource(&route_table_id, &self.tags(&name, environment))
            .await?;
        self.network
            .create_route(&route_table_id, DEFAULT_ROUTE_CIDR, internet_gateway_id)
            .await?;
        try_join_all(
            subnet_ids
                .iter()
                .map(|subnet_id| self.network.associate_route_table(&route_table_id, subnet_id)),
        )
        .await?;
        info!(route_table_id = %route_table_id, subnets = subnet_ids.len(), "Route table associated");
        Ok(route_table_id)
    }
}
