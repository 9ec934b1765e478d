//! Stratus environment provisioning
//!
//! Sequences the creation of one AWS application environment (network,
//! compute, ECS service, DNS, S3) on top of the gateway traits in
//! `stratus-cloud`. All gateways are injected, so the same code runs against
//! AWS or an in-memory fake.
//!
//! ```no_run
//! # async fn run(gateways: stratus_cloud::Gateways, config: stratus_config::EnvironmentConfig)
//! # -> stratus_cloud::Result<()> {
//! use stratus_deploy::EnvironmentOrchestrator;
//!
//! let result = EnvironmentOrchestrator::new(&gateways)
//!     .provision_environment(&config)
//!     .await?;
//! println!("{}", result.load_balancer_arn);
//! # Ok(())
//! # }
//! ```

pub mod compute;
pub mod dns;
pub mod network;
pub mod orchestrator;
pub mod result;
pub mod service;
pub mod storage;

pub use compute::{AutoScaleGroupOutcome, ComputeProvisioner};
pub use dns::DnsAssociator;
pub use network::{NetworkProvisioner, NetworkTopology};
pub use orchestrator::EnvironmentOrchestrator;
pub use result::{ProvisioningResult, RestApiOutcome};
pub use service::{ServiceOutcome, ServiceProvisioner};
pub use storage::{BucketOutcome, StorageProvisioner};
