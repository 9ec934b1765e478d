//! Stratus Cloud Contracts
//!
//! This crate defines the seams between the environment provisioners and AWS:
//! one gateway trait per resource family, the request types they accept, and
//! the error type every layer shares.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  Stratus CLI                     │
//! │             (stratus up / domain)                │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               stratus-deploy                     │
//! │   Network → Compute → Service → DNS sequencing   │
//! └─────────────────┬───────────────────────────────┘
//!                   │  Gateways { Arc<dyn …> }
//! ┌─────────────────▼───────────────────────────────┐
//! │               stratus-cloud                      │
//! │  NetworkGateway  LoadBalancingGateway  DnsGateway│
//! │  AutoScalingGateway  ClusterGateway  …           │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │             stratus-cloud-aws                    │
//! │     (aws-sdk-ec2, elbv2, ecs, route53, …)        │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod dns;
pub mod error;
pub mod gateway;
pub mod lookup;
pub mod tags;
pub mod types;

// Re-exports
pub use error::{CloudError, Result};
pub use gateway::{
    ApiGatewayGateway, ApplicationScalingGateway, AutoScalingGateway, ClusterGateway, DnsGateway,
    Gateways, LoadBalancingGateway, MetricAlarmGateway, NetworkGateway, ObjectStorageGateway,
};
pub use lookup::Lookup;
pub use tags::Tag;
pub use types::*;
