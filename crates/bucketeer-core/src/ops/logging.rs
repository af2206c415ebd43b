//! Server-access-logging setup.

use bucketeer_model::{AccountId, BucketLoggingStatus, LoggingEnabled, PolicyDocument};
use tracing::info;

use crate::error::{Error, Result};
use crate::policy::logging_delivery_policy;
use crate::provider::ObjectStore;

/// Put the log-delivery bucket policy on a logging bucket.
///
/// Builds the policy with [`logging_delivery_policy`] and writes it. At
/// least one source account is required — an unconditioned grant would let
/// any account deliver logs here.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] when `source_accounts` is empty,
/// otherwise the provider's error unchanged.
pub async fn grant_logging_permissions(
    store: &impl ObjectStore,
    logging_bucket: &str,
    source_accounts: &[AccountId],
    source_bucket_prefix: Option<&str>,
) -> Result<PolicyDocument> {
    if source_accounts.is_empty() {
        return Err(Error::InvalidArgument {
            message: "at least one source account is required".to_owned(),
        });
    }

    let policy = logging_delivery_policy(logging_bucket, source_accounts, source_bucket_prefix);
    store.put_bucket_policy(logging_bucket, &policy).await?;
    info!(bucket = %logging_bucket, "log delivery policy applied");
    Ok(policy)
}

/// Turn on server access logging for a bucket.
///
/// Logs of `source_bucket` are delivered into `target_bucket` under
/// `target_prefix`, which defaults to the source bucket's name and always
/// gets a trailing `/` so different source buckets stay separated inside
/// the logging bucket. Returns the delivery target as configured.
///
/// # Errors
///
/// Returns the provider's error unchanged.
pub async fn enable_access_logging(
    store: &impl ObjectStore,
    source_bucket: &str,
    target_bucket: &str,
    target_prefix: Option<&str>,
) -> Result<LoggingEnabled> {
    let mut prefix = target_prefix.unwrap_or(source_bucket).to_owned();
    if !prefix.ends_with('/') {
        prefix.push('/');
    }

    let enabled = LoggingEnabled {
        target_bucket: target_bucket.to_owned(),
        target_prefix: prefix,
    };
    store
        .put_bucket_logging(
            source_bucket,
            &BucketLoggingStatus {
                logging_enabled: Some(enabled.clone()),
            },
        )
        .await?;
    info!(
        source = %source_bucket,
        target = %enabled.target_bucket,
        prefix = %enabled.target_prefix,
        "access logging enabled"
    );
    Ok(enabled)
}

/// Turn off server access logging for a bucket.
///
/// An empty logging status disables delivery; already-delivered log objects
/// stay where they are.
///
/// # Errors
///
/// Returns the provider's error unchanged.
pub async fn disable_access_logging(store: &impl ObjectStore, source_bucket: &str) -> Result<()> {
    store
        .put_bucket_logging(source_bucket, &BucketLoggingStatus::default())
        .await?;
    info!(source = %source_bucket, "access logging disabled");
    Ok(())
}

/// Where a bucket's access logs are currently delivered, if logging is on.
///
/// Useful for locating delivered logs after [`disable_access_logging`].
///
/// # Errors
///
/// Returns the provider's error unchanged.
pub async fn access_logging(
    store: &impl ObjectStore,
    source_bucket: &str,
) -> Result<Option<LoggingEnabled>> {
    store.get_bucket_logging(source_bucket).await
}
