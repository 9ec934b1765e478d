//! AWS SDK error classification
//!
//! SDK failures are classified by their error code (`ProvideErrorMetadata`)
//! into [`CloudError`] variants, so a missing target group or cluster becomes
//! `CloudError::NotFound` and lookups can fold it into `Lookup::NotFound`.

use aws_sdk_ec2::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use stratus_cloud::{CloudError, Result};

/// AWS error codes meaning "the named resource does not exist"
const NOT_FOUND_CODES: &[&str] = &[
    "TargetGroupNotFound",
    "LoadBalancerNotFound",
    "ListenerNotFound",
    "NotFoundException",
    "ClusterNotFoundException",
    "ServiceNotFoundException",
    "InvalidVpcID.NotFound",
    "InvalidSubnetID.NotFound",
    "InvalidGroup.NotFound",
    "NoSuchHostedZone",
    "NoSuchBucket",
    // HeadBucket answers a bare 404
    "NotFound",
];

/// AWS error codes meaning "a resource with that name already exists"
const ALREADY_EXISTS_CODES: &[&str] = &[
    "DuplicateTargetGroupName",
    "DuplicateLoadBalancerName",
    "DuplicateListener",
    "AlreadyExists",
    "InvalidGroup.Duplicate",
    "InvalidPermission.Duplicate",
    "ConflictException",
    "BucketAlreadyOwnedByYou",
];

/// Classify an AWS error code and message.
pub fn classify_aws_error(operation: &str, code: Option<&str>, message: Option<&str>) -> CloudError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if NOT_FOUND_CODES.contains(&c) => CloudError::not_found("Resource", message),
        Some(c) if ALREADY_EXISTS_CODES.contains(&c) => CloudError::AlreadyExists(message),
        _ => CloudError::remote(operation, code.map(str::to_string), message),
    }
}

/// Classify an SDK error from any AWS service client.
pub fn from_sdk<E, R>(operation: &str, err: SdkError<E, R>) -> CloudError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
    classify_aws_error(operation, code.as_deref(), Some(&message))
}

/// `.map_sdk_err("CreateVpc")?` on SDK send results
pub(crate) trait SdkResultExt<T> {
    fn map_sdk_err(self, operation: &str) -> Result<T>;
}

impl<T, E, R> SdkResultExt<T> for std::result::Result<T, SdkError<E, R>>
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn map_sdk_err(self, operation: &str) -> Result<T> {
        self.map_err(|err| from_sdk(operation, err))
    }
}

/// Map a failed request-type `build()` call
pub(crate) fn build_error<E: std::fmt::Display>(what: &'static str) -> impl FnOnce(E) -> CloudError {
    move |err| CloudError::InvalidConfig(format!("{what}: {err}"))
}

/// Map a waiter that gave up or failed
pub(crate) fn wait_error<E: std::error::Error>(what: String) -> impl FnOnce(E) -> CloudError {
    move |err| CloudError::Timeout(format!("{what}: {}", DisplayErrorContext(&err)))
}

/// A remote call answered without the identifier we asked for
pub(crate) fn missing(operation: &str, field: &str) -> CloudError {
    CloudError::empty(format!("{operation} returned no {field}"))
}
