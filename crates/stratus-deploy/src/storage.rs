//! S3 bucket provisioning

use serde::Serialize;
use std::sync::Arc;
use stratus_cloud::tags::{base_tags, with_created};
use stratus_cloud::{CloudError, ObjectStorageGateway, Result, Tag};
use stratus_config::S3BucketConfig;
use tracing::{info, instrument};

/// Outcome of [`StorageProvisioner::ensure_bucket`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketOutcome {
    pub name: String,
    pub created: bool,
}

pub struct StorageProvisioner {
    storage: Arc<dyn ObjectStorageGateway>,
    tag_created: bool,
}

impl StorageProvisioner {
    pub fn new(storage: Arc<dyn ObjectStorageGateway>) -> Self {
        Self {
            storage,
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

    /// Create the bucket unless it already exists. Existing buckets are
    /// left untouched, tags included.
    #[instrument(skip(self, config), fields(bucket = %config.name))]
    pub async fn ensure_bucket(
        &self,
        environment: &str,
        config: &S3BucketConfig,
    ) -> Result<BucketOutcome> {
        config
            .validate()
            .map_err(|e| CloudError::Validation(e.to_string()))?;

        if self.storage.bucket_exists(&config.name).await? {
            info!("Bucket already exists");
            return Ok(BucketOutcome {
                name: config.name.clone(),
                created: false,
            });
        }

        self.storage.create_bucket(&config.name).await?;
        self.storage
            .tag_bucket(&config.name, &self.tags(&config.name, environment))
            .await?;
        info!("Bucket created");
        Ok(BucketOutcome {
            name: config.name.clone(),
            created: true,
        })
    }
}
