//! AWS gateways for Stratus
//!
//! This crate implements every `stratus-cloud` gateway trait on top of the
//! AWS SDK for Rust. All clients share one [`AwsContext`].
//!
//! # Requirements
//!
//! - AWS credentials resolvable by the default provider chain
//!   (environment, `~/.aws/config` profiles, instance metadata)
//! - A region, either configured or passed explicitly
//!
//! # Example
//!
//! ```ignore
//! use stratus_cloud_aws::{AwsContext, gateways};
//!
//! let context = AwsContext::new(Some("us-west-2"), None).await;
//! let gateways = gateways(&context);
//! let vpc = gateways.network.find_vpc_id("staging-vpc").await?;
//! ```

pub mod apigateway;
pub mod app_autoscaling;
pub mod autoscaling;
pub mod cloudwatch;
pub mod context;
pub mod ec2;
pub mod ecs;
pub mod elb;
pub mod error;
pub mod route53;
pub mod s3;

use std::sync::Arc;
use stratus_cloud::Gateways;

pub use apigateway::RestApiGateway;
pub use app_autoscaling::ApplicationAutoScalingGateway;
pub use autoscaling::AutoScalingClientGateway;
pub use cloudwatch::CloudWatchGateway;
pub use context::AwsContext;
pub use ec2::Ec2NetworkGateway;
pub use ecs::EcsGateway;
pub use elb::ElbGateway;
pub use error::classify_aws_error;
pub use route53::Route53Gateway;
pub use s3::S3Gateway;

/// Build one SDK-backed gateway per resource family.
pub fn gateways(context: &AwsContext) -> Gateways {
    Gateways {
        network: Arc::new(Ec2NetworkGateway::from_context(context)),
        load_balancing: Arc::new(ElbGateway::from_context(context)),
        auto_scaling: Arc::new(AutoScalingClientGateway::from_context(context)),
        cluster: Arc::new(EcsGateway::from_context(context)),
        application_scaling: Arc::new(ApplicationAutoScalingGateway::from_context(context)),
        alarms: Arc::new(CloudWatchGateway::from_context(context)),
        dns: Arc::new(Route53Gateway::from_context(context)),
        api_gateway: Arc::new(RestApiGateway::from_context(context)),
        storage: Arc::new(S3Gateway::from_context(context)),
    }
}
