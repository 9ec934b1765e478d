//! ELBv2: target groups, application load balancers and listeners

use crate::context::AwsContext;
use crate::error::{SdkResultExt, build_error, missing};
use async_trait::async_trait;
use aws_sdk_elasticloadbalancingv2::types::{
    Action, ActionTypeEnum, Certificate, LoadBalancerSchemeEnum, LoadBalancerTypeEnum, Matcher,
    ProtocolEnum,
};
use stratus_cloud::{
    ListenerRequest, LoadBalancerDns, LoadBalancerRequest, LoadBalancingGateway, Lookup,
    ResourceId, Result, Tag, TargetGroupRequest,
};
use tracing::{debug, info};

/// [`LoadBalancingGateway`] backed by the ELBv2 API
#[derive(Debug, Clone)]
pub struct ElbGateway {
    client: aws_sdk_elasticloadbalancingv2::Client,
}

impl ElbGateway {
    pub fn new(client: aws_sdk_elasticloadbalancingv2::Client) -> Self {
        Self { client }
    }

    pub fn from_context(context: &AwsContext) -> Self {
        Self::new(context.elbv2_client())
    }
}

fn elb_tags(tags: &[Tag]) -> Result<Vec<aws_sdk_elasticloadbalancingv2::types::Tag>> {
    tags.iter()
        .map(|t| {
            aws_sdk_elasticloadbalancingv2::types::Tag::builder()
                .key(&t.key)
                .value(&t.value)
                .build()
                .map_err(build_error("Tag"))
        })
        .collect()
}

#[async_trait]
impl LoadBalancingGateway for ElbGateway {
    async fn find_target_group_arn(&self, name: &str) -> Result<Lookup<ResourceId>> {
        debug!(target_group = %name, "Looking up target group");
        Lookup::from_result(self.describe_target_group_arn(name).await)
    }

    async fn create_target_group(&self, request: &TargetGroupRequest) -> Result<ResourceId> {
        let health = &request.health_check;
        let output = self
            .client
            .create_target_group()
            .name(&request.name)
            .port(request.port)
            .protocol(ProtocolEnum::from(request.protocol.as_str()))
            .vpc_id(&request.vpc_id)
            .set_health_check_interval_seconds(health.health_check_interval_seconds)
            .set_health_check_path(health.health_check_path.clone())
            .set_health_check_port(health.health_check_port.clone())
            .set_health_check_protocol(
                health
                    .health_check_protocol
                    .as_deref()
                    .map(ProtocolEnum::from),
            )
            .set_health_check_timeout_seconds(health.health_check_timeout_seconds)
            .set_healthy_threshold_count(health.healthy_threshold_count)
            .set_unhealthy_threshold_count(health.unhealthy_threshold_count)
            .set_matcher(
                health
                    .matcher
                    .as_ref()
                    .map(|m| Matcher::builder().http_code(&m.http_code).build()),
            )
            .set_tags(Some(elb_tags(&request.tags)?))
            .send()
            .await
            .map_sdk_err("CreateTargetGroup")?;

        let arn = output
            .target_groups()
            .first()
            .and_then(|tg| tg.target_group_arn())
            .ok_or_else(|| missing("CreateTargetGroup", "TargetGroupArn"))?;
        info!(target_group = %request.name, arn = %arn, "Created target group");
        Ok(arn.to_string())
    }

    async fn find_load_balancer_arn(&self, name: &str) -> Result<Lookup<ResourceId>> {
        let lookup = self.find_load_balancer(name).await?;
        Ok(match lookup {
            Lookup::Found(lb) => Lookup::from_option(lb.load_balancer_arn().map(str::to_string)),
            Lookup::NotFound => Lookup::NotFound,
        })
    }

    async fn create_load_balancer(&self, request: &LoadBalancerRequest) -> Result<ResourceId> {
        let output = self
            .client
            .create_load_balancer()
            .name(&request.name)
            .r#type(LoadBalancerTypeEnum::Application)
            .scheme(LoadBalancerSchemeEnum::from(request.scheme.as_str()))
            .set_subnets(Some(request.subnet_ids.clone()))
            .set_security_groups(Some(request.security_group_ids.clone()))
            .set_tags(Some(elb_tags(&request.tags)?))
            .send()
            .await
            .map_sdk_err("CreateLoadBalancer")?;

        let arn = output
            .load_balancers()
            .first()
            .and_then(|lb| lb.load_balancer_arn())
            .ok_or_else(|| missing("CreateLoadBalancer", "LoadBalancerArn"))?;
        info!(load_balancer = %request.name, arn = %arn, "Created load balancer");
        Ok(arn.to_string())
    }

    async fn find_load_balancer_dns(&self, name: &str) -> Result<Lookup<LoadBalancerDns>> {
        let lookup = self.find_load_balancer(name).await?;
        Ok(match lookup {
            Lookup::Found(lb) => match (lb.dns_name(), lb.canonical_hosted_zone_id()) {
                (Some(dns_name), Some(zone_id)) => Lookup::Found(LoadBalancerDns {
                    dns_name: dns_name.to_string(),
                    canonical_hosted_zone_id: zone_id.to_string(),
                }),
                _ => Lookup::NotFound,
            },
            Lookup::NotFound => Lookup::NotFound,
        })
    }

    async fn find_listener_arn(
        &self,
        load_balancer_arn: &str,
        protocol: &str,
        port: i32,
    ) -> Result<Lookup<ResourceId>> {
        Lookup::from_result(
            self.describe_listener_arn(load_balancer_arn, protocol, port)
                .await,
        )
    }

    async fn create_listener(&self, request: &ListenerRequest) -> Result<ResourceId> {
        let forward = Action::builder()
            .r#type(ActionTypeEnum::Forward)
            .target_group_arn(&request.target_group_arn)
            .build()
            .map_err(build_error("Action"))?;

        let certificates = (!request.certificates.is_empty()).then(|| {
            request
                .certificates
                .iter()
                .map(|c| {
                    Certificate::builder()
                        .certificate_arn(&c.certificate_arn)
                        .build()
                })
                .collect()
        });

        let output = self
            .client
            .create_listener()
            .load_balancer_arn(&request.load_balancer_arn)
            .protocol(ProtocolEnum::from(request.protocol.as_str()))
            .port(request.port)
            .default_actions(forward)
            .set_certificates(certificates)
            .send()
            .await
            .map_sdk_err("CreateListener")?;

        let arn = output
            .listeners()
            .first()
            .and_then(|l| l.listener_arn())
            .ok_or_else(|| missing("CreateListener", "ListenerArn"))?;
        info!(
            protocol = %request.protocol,
            port = request.port,
            arn = %arn,
            "Created listener"
        );
        Ok(arn.to_string())
    }
}

impl ElbGateway {
    async fn find_load_balancer(
        &self,
        name: &str,
    ) -> Result<Lookup<aws_sdk_elasticloadbalancingv2::types::LoadBalancer>> {
        debug!(load_balancer = %name, "Looking up load balancer");
        let output = self
            .client
            .describe_load_balancers()
            .names(name)
            .send()
            .await
            .map_sdk_err("DescribeLoadBalancers");

        Lookup::from_result(
            output.map(|o| Lookup::from_option(o.load_balancers().first().cloned())),
        )
    }

    async fn describe_target_group_arn(&self, name: &str) -> Result<Lookup<ResourceId>> {
        let output = self
            .client
            .describe_target_groups()
            .names(name)
            .send()
            .await
            .map_sdk_err("DescribeTargetGroups")?;

        Ok(Lookup::from_option(
            output
                .target_groups()
                .first()
                .and_then(|tg| tg.target_group_arn())
                .map(str::to_string),
        ))
    }

    async fn describe_listener_arn(
        &self,
        load_balancer_arn: &str,
        protocol: &str,
        port: i32,
    ) -> Result<Lookup<ResourceId>> {
        let protocol = ProtocolEnum::from(protocol);
        let output = self
            .client
            .describe_listeners()
            .load_balancer_arn(load_balancer_arn)
            .send()
            .await
            .map_sdk_err("DescribeListeners")?;

        Ok(Lookup::from_option(
            output
                .listeners()
                .iter()
                .find(|l| l.protocol() == Some(&protocol) && l.port() == Some(port))
                .and_then(|l| l.listener_arn())
                .map(str::to_string),
        ))
    }
}
