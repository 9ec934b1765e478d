//! S3 buckets

use crate::context::AwsContext;
use crate::error::{SdkResultExt, build_error};
use async_trait::async_trait;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration, Tagging};
use stratus_cloud::{Lookup, ObjectStorageGateway, Result, Tag};
use tracing::{debug, info};

/// us-east-1 rejects an explicit location constraint
const DEFAULT_BUCKET_REGION: &str = "us-east-1";

/// [`ObjectStorageGateway`] backed by the S3 API
#[derive(Debug, Clone)]
pub struct S3Gateway {
    client: aws_sdk_s3::Client,
    region: String,
}

impl S3Gateway {
    pub fn new(client: aws_sdk_s3::Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    pub fn from_context(context: &AwsContext) -> Self {
        Self::new(context.s3_client(), context.region())
    }
}

fn location_constraint(region: &str) -> Option<CreateBucketConfiguration> {
    if region.is_empty() || region == DEFAULT_BUCKET_REGION {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

#[async_trait]
impl ObjectStorageGateway for S3Gateway {
    async fn bucket_exists(&self, name: &str) -> Result<bool> {
        let lookup = self
            .client
            .head_bucket()
            .bucket(name)
            .send()
            .await
            .map_sdk_err("HeadBucket")
            .map(|_| Lookup::Found(()));
        let exists = Lookup::from_result(lookup)?.is_found();
        debug!(bucket = %name, exists, "Looked up bucket");
        Ok(exists)
    }

    async fn create_bucket(&self, name: &str) -> Result<()> {
        match self
            .client
            .create_bucket()
            .bucket(name)
            .set_create_bucket_configuration(location_constraint(&self.region))
            .send()
            .await
            .map_sdk_err("CreateBucket")
        {
            Ok(_) => {
                info!(bucket = %name, region = %self.region, "Created bucket");
                Ok(())
            }
            Err(e) if e.is_already_exists() => {
                debug!(bucket = %name, "Bucket already owned by this account");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn tag_bucket(&self, name: &str, tags: &[Tag]) -> Result<()> {
        let tag_set = tags
            .iter()
            .map(|t| {
                aws_sdk_s3::types::Tag::builder()
                    .key(&t.key)
                    .value(&t.value)
                    .build()
                    .map_err(build_error("Tag"))
            })
            .collect::<Result<Vec<_>>>()?;
        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(build_error("Tagging"))?;

        self.client
            .put_bucket_tagging()
            .bucket(name)
            .tagging(tagging)
            .send()
            .await
            .map_sdk_err("PutBucketTagging")?;

        debug!(bucket = %name, tags = tags.len(), "Tagged bucket");
        Ok(())
    }
}
