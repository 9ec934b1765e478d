//! Compute provisioning
//!
//! Security group, launch configuration, target group, auto-scaling group,
//! application load balancer and listeners. Every operation resolves the
//! identifiers it depends on by name first, then creates what is missing.

use chrono::Utc;
use futures_util::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use stratus_cloud::tags::{base_tags, with_created};
use stratus_cloud::{
    AutoScalingGateway, AutoScalingGroupRequest, Certificate, CloudError, HealthCheckSettings,
    LAUNCH_CONFIGURATION_SUFFIX_FORMAT, LaunchConfigurationOutcome, LaunchConfigurationRequest,
    ListenerRequest, LoadBalancerRequest, LoadBalancingGateway, Lookup, NetworkGateway,
    ResourceId, Result, SecurityGroupRequest, Tag, TargetGroupRequest,
};
use stratus_config::{
    AutoScaleGroupConfig, LaunchConfigurationConfig, ListenerConfig, LoadBalancerConfig,
    SecurityGroupConfig, TargetGroupConfig,
};
use tracing::{debug, info, instrument, warn};

/// Outcome of [`ComputeProvisioner::ensure_auto_scale_group`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScaleGroupOutcome {
    pub name: String,
    pub created: bool,
    pub retired_launch_configuration: Option<String>,
}

pub struct ComputeProvisioner {
    network: Arc<dyn NetworkGateway>,
    load_balancing: Arc<dyn LoadBalancingGateway>,
    auto_scaling: Arc<dyn AutoScalingGateway>,
    tag_created: bool,
}

impl ComputeProvisioner {
    pub fn new(
        network: Arc<dyn NetworkGateway>,
        load_balancing: Arc<dyn LoadBalancingGateway>,
        auto_scaling: Arc<dyn AutoScalingGateway>,
    ) -> Self {
        Self {
            network,
            load_balancing,
            auto_scaling,
            tag_created: true,
        }
    }

    pub fn with_created_tag(mut self, enabled: bool) -> Self {
        self.tag_created = enabled;
        self
    }

    fn tags(&self, name: &str, environment: &str) -> Vec<Tag> {
        with_created(base_tags(name, environment), self.tag_created)
    }

    // ============ Name resolution ============

    async fn resolve_vpc_id(&self, vpc_name: &str) -> Result<ResourceId> {
        self.network
            .find_vpc_id(vpc_name)
            .await?
            .require("VPC", vpc_name)
    }

    /// Subnet ids in the order the names were given
    async fn resolve_subnet_ids(&self, vpc_id: &str, names: &[String]) -> Result<Vec<ResourceId>> {
        try_join_all(names.iter().map(|name| async move {
            self.network
                .find_subnet_id(vpc_id, name)
                .await?
                .require("Subnet", name)
        }))
        .await
    }

    async fn resolve_security_group_id(&self, vpc_id: &str, name: &str) -> Result<ResourceId> {
        self.network
            .find_security_group_id(vpc_id, name)
            .await?
            .require("Security group", name)
    }

    async fn resolve_target_group_arn(&self, name: &str) -> Result<ResourceId> {
        Lookup::from_result(self.load_balancing.find_target_group_arn(name).await)?
            .require("Target group", name)
    }

    async fn resolve_load_balancer_arn(&self, name: &str) -> Result<ResourceId> {
        Lookup::from_result(self.load_balancing.find_load_balancer_arn(name).await)?
            .require("Load balancer", name)
    }

    // ============ Security group ============

    #[instrument(skip(self, config), fields(security_group = %config.name))]
    pub async fn ensure_security_group(
        &self,
        environment: &str,
        config: &SecurityGroupConfig,
    ) -> Result<ResourceId> {
        let vpc_id = self.resolve_vpc_id(&config.vpc_name).await?;

        if let Lookup::Found(id) = self
            .network
            .find_security_group_id(&vpc_id, &config.name)
            .await?
        {
            info!(security_group_id = %id, "Security group already exists");
            return Ok(id);
        }

        let id = self
            .network
            .create_security_group(&SecurityGroupRequest {
                name: config.name.clone(),
                description: config.description.clone(),
                vpc_id,
                ingress_rules: config.ingress_rules.clone(),
                tags: self.tags(&config.name, environment),
            })
            .await?;
        info!(security_group_id = %id, rules = config.ingress_rules.len(), "Security group created");
        Ok(id)
    }

    // ============ Launch configuration ============

    /// Always creates a new launch configuration named `<name>-<timestamp>`
    /// and reports the one it supersedes.
    #[instrument(skip(self, config), fields(launch_configuration = %config.name))]
    pub async fn ensure_launch_configuration(
        &self,
        config: &LaunchConfigurationConfig,
        ecs_cluster_name: &str,
    ) -> Result<LaunchConfigurationOutcome> {
        let vpc_id = self.resolve_vpc_id(&config.vpc_name).await?;
        let security_group_id = self
            .resolve_security_group_id(&vpc_id, &config.security_group_name)
            .await?;

        let prefix = format!("{}-", config.name);
        let previous_name = self
            .auto_scaling
            .find_latest_launch_configuration(&prefix)
            .await?
            .found();
        let name = format!(
            "{}{}",
            prefix,
            Utc::now().format(LAUNCH_CONFIGURATION_SUFFIX_FORMAT)
        );

        self.auto_scaling
            .create_launch_configuration(&LaunchConfigurationRequest {
                name: name.clone(),
                image_id: config.image_id.clone(),
                instance_type: config.instance_type.clone(),
                security_group_id,
                ecs_cluster_name: ecs_cluster_name.to_string(),
                key_name: config.key_name.clone(),
                iam_instance_profile: config.iam_instance_profile.clone(),
                user_data: config.user_data.clone(),
                associate_public_ip_address: config.associate_public_ip_address,
            })
            .await?;

        // Same-second reruns produce the same name; never retire what we just made.
        let previous_name = previous_name.filter(|previous| previous != &name);
        info!(name = %name, previous = ?previous_name, "Launch configuration created");
        Ok(LaunchConfigurationOutcome {
            name,
            previous_name,
        })
    }

    // ============ Target group ============

    #[instrument(skip(self, config), fields(target_group = %config.name))]
    pub async fn ensure_target_group(
        &self,
        environment: &str,
        config: &TargetGroupConfig,
    ) -> Result<ResourceId> {
        if config.protocol != "HTTP" && config.protocol != "HTTPS" {
            return Err(CloudError::Validation(format!(
                "Invalid protocol parameter value.  Value must be HTTP or HTTPs.  [Value: {}]",
                config.protocol
            )));
        }

        let vpc_id = self.resolve_vpc_id(&config.vpc_name).await?;

        match Lookup::from_result(self.load_balancing.find_target_group_arn(&config.name).await)? {
            Lookup::Found(arn) => {
                info!(target_group_arn = %arn, "Target group already exists");
                return Ok(arn);
            }
            Lookup::NotFound => debug!("Target group not found, creating"),
        }

        let arn = self
            .load_balancing
            .create_target_group(&TargetGroupRequest {
                name: config.name.clone(),
                port: config.port,
                protocol: config.protocol.clone(),
                vpc_id,
                health_check: HealthCheckSettings::with_defaults(
                    &config.health_check_setting_overrides,
                ),
                tags: self.tags(&config.name, environment),
            })
            .await?;
        info!(target_group_arn = %arn, "Target group created");
        Ok(arn)
    }

    // ============ Auto-scaling group ============

    /// Create the group, or roll an existing one onto `launch_configuration_name`.
    /// The superseded launch configuration is deleted afterwards.
    #[instrument(skip(self, config), fields(auto_scale_group = %config.name))]
    pub async fn ensure_auto_scale_group(
        &self,
        environment: &str,
        config: &AutoScaleGroupConfig,
        launch_configuration_name: &str,
        launch_configuration_to_retire: Option<&str>,
    ) -> Result<AutoScaleGroupOutcome> {
        let vpc_id = self.resolve_vpc_id(&config.vpc_name).await?;
        let (subnet_ids, target_group_arn) = tokio::try_join!(
            self.resolve_subnet_ids(&vpc_id, &config.vpc_subnets),
            self.resolve_target_group_arn(&config.target_group_name),
        )?;

        let request = AutoScalingGroupRequest {
            name: config.name.clone(),
            launch_configuration_name: launch_configuration_name.to_string(),
            min_size: config.min_size,
            max_size: config.max_size,
            desired_capacity: config.desired_size,
            target_group_arns: vec![target_group_arn],
            vpc_subnets: subnet_ids.join(","),
            tags: self.tags(&config.name, environment),
        };

        let created = match self.auto_scaling.find_auto_scaling_group(&config.name).await? {
            Lookup::Found(_) => {
                info!(launch_configuration = %launch_configuration_name, "Updating auto-scaling group");
                self.auto_scaling.update_auto_scaling_group(&request).await?;
                false
            }
            Lookup::NotFound => {
                info!(launch_configuration = %launch_configuration_name, "Creating auto-scaling group");
                self.auto_scaling.create_auto_scaling_group(&request).await?;
                true
            }
        };

        let retired = match launch_configuration_to_retire {
            Some(old) if old != launch_configuration_name => {
                self.auto_scaling.delete_launch_configuration(old).await?;
                info!(launch_configuration = %old, "Superseded launch configuration deleted");
                Some(old.to_string())
            }
            _ => None,
        };

        Ok(AutoScaleGroupOutcome {
            name: config.name.clone(),
            created,
            retired_launch_configuration: retired,
        })
    }

    // ============ Load balancer ============

    #[instrument(skip(self, config), fields(load_balancer = %config.name))]
    pub async fn ensure_application_load_balancer(
        &self,
        environment: &str,
        config: &LoadBalancerConfig,
    ) -> Result<ResourceId> {
        let vpc_id = self.resolve_vpc_id(&config.vpc_name).await?;
        let (subnet_ids, security_group_id) = tokio::try_join!(
            self.resolve_subnet_ids(&vpc_id, &config.vpc_subnets),
            self.resolve_security_group_id(&vpc_id, &config.security_group_name),
        )?;

        match Lookup::from_result(self.load_balancing.find_load_balancer_arn(&config.name).await)? {
            Lookup::Found(arn) => {
                info!(load_balancer_arn = %arn, "Load balancer already exists");
                return Ok(arn);
            }
            Lookup::NotFound => debug!("Load balancer not found, creating"),
        }

        let arn = self
            .load_balancing
            .create_load_balancer(&LoadBalancerRequest {
                name: config.name.clone(),
                subnet_ids,
                scheme: config.scheme.clone(),
                security_group_ids: vec![security_group_id],
                tags: self.tags(&config.name, environment),
            })
            .await?;
        info!(load_balancer_arn = %arn, "Load balancer created");
        Ok(arn)
    }

    // ============ Listeners ============

    /// Listener ARNs in the order the listeners were given
    #[instrument(skip(self, listeners), fields(count = listeners.len()))]
    pub async fn ensure_listeners(&self, listeners: &[ListenerConfig]) -> Result<Vec<ResourceId>> {
        let mut arns = Vec::with_capacity(listeners.len());
        for listener in listeners {
            arns.push(self.ensure_listener(listener).await?);
        }
        Ok(arns)
    }

    async fn ensure_listener(&self, config: &ListenerConfig) -> Result<ResourceId> {
        let load_balancer_arn = self.resolve_load_balancer_arn(&config.load_balancer_name).await?;
        let target_group_arn = self.resolve_target_group_arn(&config.target_group_name).await?;

        if let Lookup::Found(arn) = Lookup::from_result(
            self.load_balancing
                .find_listener_arn(&load_balancer_arn, &config.protocol, config.port)
                .await,
        )? {
            info!(listener_arn = %arn, port = config.port, "Listener already exists");
            return Ok(arn);
        }

        let certificates = match config.certificate_arn.as_deref() {
            Some(arn) if !arn.is_empty() => vec![Certificate {
                certificate_arn: arn.to_string(),
            }],
            _ => {
                if config.protocol == "HTTPS" {
                    warn!(port = config.port, "HTTPS listener without certificate");
                }
                Vec::new()
            }
        };

        let arn = self
            .load_balancing
            .create_listener(&ListenerRequest {
                load_balancer_arn,
                target_group_arn,
                protocol: config.protocol.clone(),
                port: config.port,
                certificates,
            })
            .await?;
        info!(listener_arn = %arn, protocol = %config.protocol, port = config.port, "Listener created");
        Ok(arn)
    }
}
