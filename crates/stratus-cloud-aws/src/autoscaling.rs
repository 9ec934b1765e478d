//! EC2 Auto Scaling: launch configurations and auto-scaling groups

use crate::context::AwsContext;
use crate::error::{SdkResultExt, build_error};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use stratus_cloud::{
    AutoScalingGateway, AutoScalingGroupRequest, LaunchConfigurationRequest, Lookup, Result, Tag,
    is_generated_launch_configuration,
};
use tracing::{debug, info};

const RESOURCE_TYPE_GROUP: &str = "auto-scaling-group";

/// [`AutoScalingGateway`] backed by the EC2 Auto Scaling API
#[derive(Debug, Clone)]
pub struct AutoScalingClientGateway {
    client: aws_sdk_autoscaling::Client,
}

impl AutoScalingClientGateway {
    pub fn new(client: aws_sdk_autoscaling::Client) -> Self {
        Self { client }
    }

    pub fn from_context(context: &AwsContext) -> Self {
        Self::new(context.autoscaling_client())
    }
}

/// Boot script registering the instance with the ECS cluster
pub fn ecs_user_data(cluster_name: &str) -> String {
    format!("#!/bin/bash\necho ECS_CLUSTER={cluster_name} >> /etc/ecs/ecs.config")
}

/// Launch configurations take base64-encoded user data
pub fn encode_user_data(script: &str) -> String {
    STANDARD.encode(script.as_bytes())
}

fn group_tags(group_name: &str, tags: &[Tag]) -> Result<Vec<aws_sdk_autoscaling::types::Tag>> {
    tags.iter()
        .map(|t| {
            aws_sdk_autoscaling::types::Tag::builder()
                .key(&t.key)
                .value(&t.value)
                .resource_id(group_name)
                .resource_type(RESOURCE_TYPE_GROUP)
                .propagate_at_launch(true)
                .build()
                .map_err(build_error("Tag"))
        })
        .collect()
}

#[async_trait]
impl AutoScalingGateway for AutoScalingClientGateway {
    async fn find_latest_launch_configuration(&self, prefix: &str) -> Result<Lookup<String>> {
        let mut latest: Option<(i64, String)> = None;
        let mut next_token = None;

        loop {
            let output = self
                .client
                .describe_launch_configurations()
                .set_next_token(next_token)
                .send()
                .await
                .map_sdk_err("DescribeLaunchConfigurations")?;

            for lc in output.launch_configurations() {
                let name = lc.launch_configuration_name();
                if !is_generated_launch_configuration(name, prefix) {
                    continue;
                }
                let created = lc.created_time().secs();
                let newer = match &latest {
                    Some((secs, latest_name)) => (created, name) > (*secs, latest_name.as_str()),
                    None => true,
                };
                if newer {
                    latest = Some((created, name.to_string()));
                }
            }

            next_token = output.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        debug!(prefix = %prefix, latest = ?latest, "Latest launch configuration");
        Ok(Lookup::from_option(latest.map(|(_, name)| name)))
    }

    async fn create_launch_configuration(
        &self,
        request: &LaunchConfigurationRequest,
    ) -> Result<()> {
        let script = request
            .user_data
            .clone()
            .unwrap_or_else(|| ecs_user_data(&request.ecs_cluster_name));

        self.client
            .create_launch_configuration()
            .launch_configuration_name(&request.name)
            .image_id(&request.image_id)
            .instance_type(&request.instance_type)
            .security_groups(&request.security_group_id)
            .set_key_name(request.key_name.clone())
            .set_iam_instance_profile(request.iam_instance_profile.clone())
            .set_associate_public_ip_address(request.associate_public_ip_address)
            .user_data(encode_user_data(&script))
            .send()
            .await
            .map_sdk_err("CreateLaunchConfiguration")?;

        info!(launch_configuration = %request.name, "Created launch configuration");
        Ok(())
    }

    async fn delete_launch_configuration(&self, name: &str) -> Result<()> {
        self.client
            .delete_launch_configuration()
            .launch_configuration_name(name)
            .send()
            .await
            .map_sdk_err("DeleteLaunchConfiguration")?;

        info!(launch_configuration = %name, "Deleted launch configuration");
        Ok(())
    }

    async fn find_auto_scaling_group(&self, name: &str) -> Result<Lookup<String>> {
        let output = self
            .client
            .describe_auto_scaling_groups()
            .auto_scaling_group_names(name)
            .send()
            .await
            .map_sdk_err("DescribeAutoScalingGroups")?;

        Ok(Lookup::from_option(
            output
                .auto_scaling_groups()
                .first()
                .map(|g| g.auto_scaling_group_name().to_string()),
        ))
    }

    async fn create_auto_scaling_group(&self, request: &AutoScalingGroupRequest) -> Result<()> {
        self.client
            .create_auto_scaling_group()
            .auto_scaling_group_name(&request.name)
            .launch_configuration_name(&request.launch_configuration_name)
            .min_size(request.min_size)
            .max_size(request.max_size)
            .desired_capacity(request.desired_capacity)
            .set_target_group_arns(Some(request.target_group_arns.clone()))
            .vpc_zone_identifier(&request.vpc_subnets)
            .set_tags(Some(group_tags(&request.name, &request.tags)?))
            .send()
            .await
            .map_sdk_err("CreateAutoScalingGroup")?;

        info!(auto_scaling_group = %request.name, "Created auto-scaling group");
        Ok(())
    }

    async fn update_auto_scaling_group(&self, request: &AutoScalingGroupRequest) -> Result<()> {
        self.client
            .update_auto_scaling_group()
            .auto_scaling_group_name(&request.name)
            .launch_configuration_name(&request.launch_configuration_name)
            .min_size(request.min_size)
            .max_size(request.max_size)
            .desired_capacity(request.desired_capacity)
            .vpc_zone_identifier(&request.vpc_subnets)
            .send()
            .await
            .map_sdk_err("UpdateAutoScalingGroup")?;

        // Newly declared target groups are attached, existing ones are kept
        if !request.target_group_arns.is_empty() {
            self.client
                .attach_load_balancer_target_groups()
                .auto_scaling_group_name(&request.name)
                .set_target_group_arns(Some(request.target_group_arns.clone()))
                .send()
                .await
                .map_sdk_err("AttachLoadBalancerTargetGroups")?;
        }

        info!(
            auto_scaling_group = %request.name,
            launch_configuration = %request.launch_configuration_name,
            "Updated auto-scaling group"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecs_user_data() {
        assert_eq!(
            ecs_user_data("staging"),
            "#!/bin/bash\necho ECS_CLUSTER=staging >> /etc/ecs/ecs.config"
        );
    }

    #[test]
    fn test_user_data_is_base64() {
        assert_eq!(encode_user_data("echo hi"), "ZWNobyBoaQ==");
    }
}
