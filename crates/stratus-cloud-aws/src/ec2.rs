//! EC2 networking: VPC, network ACLs, subnets, internet gateway, route table
//! and security groups

use crate::context::AwsContext;
use crate::error::{SdkResultExt, missing, wait_error};
use async_trait::async_trait;
use aws_sdk_ec2::client::Waiters;
use aws_sdk_ec2::types::{
    AttributeBooleanValue, Filter, IpPermission, IpRange, PortRange, ResourceType, RuleAction,
    TagSpecification,
};
use std::time::Duration;
use stratus_cloud::{
    Lookup, NetworkAclRule, NetworkGateway, ResourceId, Result, SecurityGroupRequest,
    SubnetRequest, Tag,
};
use tracing::{debug, info};

/// [`NetworkGateway`] backed by the EC2 API
#[derive(Debug, Clone)]
pub struct Ec2NetworkGateway {
    client: aws_sdk_ec2::Client,
    wait_timeout: Duration,
}

impl Ec2NetworkGateway {
    pub fn new(client: aws_sdk_ec2::Client, wait_timeout: Duration) -> Self {
        Self {
            client,
            wait_timeout,
        }
    }

    pub fn from_context(context: &AwsContext) -> Self {
        Self::new(context.ec2_client(), context.wait_timeout())
    }
}

fn filter(name: &str, value: &str) -> Filter {
    Filter::builder().name(name).values(value).build()
}

fn ec2_tags(tags: &[Tag]) -> Vec<aws_sdk_ec2::types::Tag> {
    tags.iter()
        .map(|t| {
            aws_sdk_ec2::types::Tag::builder()
                .key(&t.key)
                .value(&t.value)
                .build()
        })
        .collect()
}

fn enabled(value: bool) -> AttributeBooleanValue {
    AttributeBooleanValue::builder().value(value).build()
}

#[async_trait]
impl NetworkGateway for Ec2NetworkGateway {
    async fn find_vpc_id(&self, name: &str) -> Result<Lookup<ResourceId>> {
        debug!(vpc_name = %name, "Looking up VPC by name");
        let output = self
            .client
            .describe_vpcs()
            .filters(filter("tag:Name", name))
            .send()
            .await
            .map_sdk_err("DescribeVpcs")?;

        Ok(Lookup::from_option(
            output
                .vpcs()
                .first()
                .and_then(|v| v.vpc_id())
                .map(str::to_string),
        ))
    }

    async fn create_vpc(&self, cidr_block: &str) -> Result<ResourceId> {
        let output = self
            .client
            .create_vpc()
            .cidr_block(cidr_block)
            .send()
            .await
            .map_sdk_err("CreateVpc")?;

        let vpc_id = output
            .vpc()
            .and_then(|v| v.vpc_id())
            .ok_or_else(|| missing("CreateVpc", "VpcId"))?;
        info!(vpc_id = %vpc_id, cidr_block = %cidr_block, "Created VPC");
        Ok(vpc_id.to_string())
    }

    async fn wait_for_vpc(&self, vpc_id: &str) -> Result<()> {
        debug!(vpc_id = %vpc_id, "Waiting for VPC to become available");
        self.client
            .wait_until_vpc_available()
            .vpc_ids(vpc_id)
            .wait(self.wait_timeout)
            .await
            .map_err(wait_error(format!("VPC {vpc_id} did not become available")))?;
        Ok(())
    }

    async fn tag_resource(&self, resource_id: &str, tags: &[Tag]) -> Result<()> {
        self.client
            .create_tags()
            .resources(resource_id)
            .set_tags(Some(ec2_tags(tags)))
            .send()
            .await
            .map_sdk_err("CreateTags")?;
        Ok(())
    }

    async fn enable_dns_hostnames(&self, vpc_id: &str) -> Result<()> {
        self.client
            .modify_vpc_attribute()
            .vpc_id(vpc_id)
            .enable_dns_hostnames(enabled(true))
            .send()
            .await
            .map_sdk_err("ModifyVpcAttribute")?;
        Ok(())
    }

    async fn enable_dns_support(&self, vpc_id: &str) -> Result<()> {
        self.client
            .modify_vpc_attribute()
            .vpc_id(vpc_id)
            .enable_dns_support(enabled(true))
            .send()
            .await
            .map_sdk_err("ModifyVpcAttribute")?;
        Ok(())
    }

    async fn create_network_acl(&self, vpc_id: &str) -> Result<ResourceId> {
        let output = self
            .client
            .create_network_acl()
            .vpc_id(vpc_id)
            .send()
            .await
            .map_sdk_err("CreateNetworkAcl")?;

        output
            .network_acl()
            .and_then(|acl| acl.network_acl_id())
            .map(str::to_string)
            .ok_or_else(|| missing("CreateNetworkAcl", "NetworkAclId"))
    }

    async fn create_network_acl_entry(&self, acl_id: &str, rule: &NetworkAclRule) -> Result<()> {
        self.client
            .create_network_acl_entry()
            .network_acl_id(acl_id)
            .cidr_block(&rule.cidr_block)
            .egress(rule.egress)
            .protocol(&rule.protocol)
            .rule_action(RuleAction::from(rule.rule_action.as_str()))
            .rule_number(rule.rule_number)
            .port_range(
                PortRange::builder()
                    .from(rule.port_range.from)
                    .to(rule.port_range.to)
                    .build(),
            )
            .send()
            .await
            .map_sdk_err("CreateNetworkAclEntry")?;
        Ok(())
    }

    async fn create_subnet(&self, request: &SubnetRequest) -> Result<ResourceId> {
        let output = self
            .client
            .create_subnet()
            .vpc_id(&request.vpc_id)
            .cidr_block(&request.cidr_block)
            .availability_zone(&request.availability_zone)
            .send()
            .await
            .map_sdk_err("CreateSubnet")?;

        let subnet_id = output
            .subnet()
            .and_then(|s| s.subnet_id())
            .ok_or_else(|| missing("CreateSubnet", "SubnetId"))?;
        info!(
            subnet_id = %subnet_id,
            cidr_block = %request.cidr_block,
            availability_zone = %request.availability_zone,
            "Created subnet"
        );
        Ok(subnet_id.to_string())
    }

    async fn set_map_public_ip_on_launch(&self, subnet_id: &str, value: bool) -> Result<()> {
        self.client
            .modify_subnet_attribute()
            .subnet_id(subnet_id)
            .map_public_ip_on_launch(enabled(value))
            .send()
            .await
            .map_sdk_err("ModifySubnetAttribute")?;
        Ok(())
    }

    async fn find_subnet_id(&self, vpc_id: &str, name: &str) -> Result<Lookup<ResourceId>> {
        debug!(vpc_id = %vpc_id, subnet_name = %name, "Looking up subnet by name");
        let output = self
            .client
            .describe_subnets()
            .filters(filter("tag:Name", name))
            .filters(filter("vpc-id", vpc_id))
            .send()
            .await
            .map_sdk_err("DescribeSubnets")?;

        Ok(Lookup::from_option(
            output
                .subnets()
                .first()
                .and_then(|s| s.subnet_id())
                .map(str::to_string),
        ))
    }

    async fn find_network_acl_association(
        &self,
        subnet_id: &str,
    ) -> Result<Lookup<ResourceId>> {
        let output = self
            .client
            .describe_network_acls()
            .filters(filter("association.subnet-id", subnet_id))
            .send()
            .await
            .map_sdk_err("DescribeNetworkAcls")?;

        let association_id = output
            .network_acls()
            .iter()
            .flat_map(|acl| acl.associations())
            .find(|a| a.subnet_id() == Some(subnet_id))
            .and_then(|a| a.network_acl_association_id())
            .map(str::to_string);
        Ok(Lookup::from_option(association_id))
    }

    async fn replace_network_acl_association(
        &self,
        association_id: &str,
        acl_id: &str,
    ) -> Result<ResourceId> {
        let output = self
            .client
            .replace_network_acl_association()
            .association_id(association_id)
            .network_acl_id(acl_id)
            .send()
            .await
            .map_sdk_err("ReplaceNetworkAclAssociation")?;

        output
            .new_association_id()
            .map(str::to_string)
            .ok_or_else(|| missing("ReplaceNetworkAclAssociation", "NewAssociationId"))
    }

    async fn create_internet_gateway(&self) -> Result<ResourceId> {
        let output = self
            .client
            .create_internet_gateway()
            .send()
            .await
            .map_sdk_err("CreateInternetGateway")?;

        output
            .internet_gateway()
            .and_then(|g| g.internet_gateway_id())
            .map(str::to_string)
            .ok_or_else(|| missing("CreateInternetGateway", "InternetGatewayId"))
    }

    async fn attach_internet_gateway(&self, internet_gateway_id: &str, vpc_id: &str) -> Result<()> {
        self.client
            .attach_internet_gateway()
            .internet_gateway_id(internet_gateway_id)
            .vpc_id(vpc_id)
            .send()
            .await
            .map_sdk_err("AttachInternetGateway")?;
        Ok(())
    }

    async fn create_route_table(&self, vpc_id: &str) -> Result<ResourceId> {
        let output = self
            .client
            .create_route_table()
            .vpc_id(vpc_id)
            .send()
            .await
            .map_sdk_err("CreateRouteTable")?;

        output
            .route_table()
            .and_then(|r| r.route_table_id())
            .map(str::to_string)
            .ok_or_else(|| missing("CreateRouteTable", "RouteTableId"))
    }

    async fn create_route(
        &self,
        route_table_id: &str,
        destination_cidr_block: &str,
        gateway_id: &str,
    ) -> Result<()> {
        self.client
            .create_route()
            .route_table_id(route_table_id)
            .destination_cidr_block(destination_cidr_block)
            .gateway_id(gateway_id)
            .send()
            .await
            .map_sdk_err("CreateRoute")?;
        Ok(())
    }

    async fn associate_route_table(
        &self,
        route_table_id: &str,
        subnet_id: &str,
    ) -> Result<ResourceId> {
        let output = self
            .client
            .associate_route_table()
            .route_table_id(route_table_id)
            .subnet_id(subnet_id)
            .send()
            .await
            .map_sdk_err("AssociateRouteTable")?;

        output
            .association_id()
            .map(str::to_string)
            .ok_or_else(|| missing("AssociateRouteTable", "AssociationId"))
    }

    async fn find_security_group_id(
        &self,
        vpc_id: &str,
        name: &str,
    ) -> Result<Lookup<ResourceId>> {
        debug!(vpc_id = %vpc_id, group_name = %name, "Looking up security group");
        let output = self
            .client
            .describe_security_groups()
            .filters(filter("group-name", name))
            .filters(filter("vpc-id", vpc_id))
            .send()
            .await
            .map_sdk_err("DescribeSecurityGroups")?;

        Ok(Lookup::from_option(
            output
                .security_groups()
                .first()
                .and_then(|g| g.group_id())
                .map(str::to_string),
        ))
    }

    async fn create_security_group(&self, request: &SecurityGroupRequest) -> Result<ResourceId> {
        let output = self
            .client
            .create_security_group()
            .group_name(&request.name)
            .description(&request.description)
            .vpc_id(&request.vpc_id)
            .tag_specifications(
                TagSpecification::builder()
                    .resource_type(ResourceType::SecurityGroup)
                    .set_tags(Some(ec2_tags(&request.tags)))
                    .build(),
            )
            .send()
            .await
            .map_sdk_err("CreateSecurityGroup")?;

        let group_id = output
            .group_id()
            .ok_or_else(|| missing("CreateSecurityGroup", "GroupId"))?
            .to_string();
        info!(group_id = %group_id, group_name = %request.name, "Created security group");

        if request.ingress_rules.is_empty() {
            return Ok(group_id);
        }

        let permissions = request
            .ingress_rules
            .iter()
            .map(|rule| {
                IpPermission::builder()
                    .ip_protocol(&rule.protocol)
                    .from_port(rule.from_port)
                    .to_port(rule.to_port)
                    .ip_ranges(
                        IpRange::builder()
                            .cidr_ip(&rule.cidr_ip)
                            .set_description(rule.description.clone())
                            .build(),
                    )
                    .build()
            })
            .collect();

        match self
            .client
            .authorize_security_group_ingress()
            .group_id(&group_id)
            .set_ip_permissions(Some(permissions))
            .send()
            .await
            .map_sdk_err("AuthorizeSecurityGroupIngress")
        {
            Ok(_) => {}
            Err(e) if e.is_already_exists() => {
                debug!(group_id = %group_id, "Ingress rules already present");
            }
            Err(e) => return Err(e),
        }

        Ok(group_id)
    }
}
