//! The SDK-backed [`ObjectStore`] implementation.

use anyhow::Context;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_s3::types as sdk;
use aws_smithy_types_convert::date_time::DateTimeExt;
use bucketeer_core::tags::{TagSet, tagging_header};
use bucketeer_core::{Error, ObjectStore, Result};
use bucketeer_model::{
    BucketLoggingStatus, BucketSummary, LifecycleRule, LoggingEnabled, ObjectIdentifier,
    ObjectSummary, ObjectVersion, PolicyDocument, Region, StorageClass, Tag,
};
use bytes::Bytes;
use tracing::debug;

use crate::convert::{
    from_sdk_lifecycle_rule, from_sdk_logging_enabled, from_sdk_tag, storage_class_for_put,
    to_sdk_lifecycle_rule, to_sdk_logging_enabled, to_sdk_object_identifier, to_sdk_tag,
};

/// An [`ObjectStore`] backed by a connected `aws-sdk-s3` client.
///
/// The handle is cheap to clone and safe to reuse across a loop of
/// per-object calls; the SDK owns connection pooling, retries, and
/// timeouts.
#[derive(Debug, Clone)]
pub struct AwsStore {
    client: Client,
}

impl AwsStore {
    /// Wrap an already-configured client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The underlying SDK client, for calls outside the helper surface.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Connect using the default credential and region chain (environment,
/// profile, instance metadata).
pub async fn connect() -> AwsStore {
    let config = aws_config::defaults(BehaviorVersion::latest()).load().await;
    AwsStore::new(Client::new(&config))
}

/// Connect with an explicit region, otherwise like [`connect`].
pub async fn connect_with_region(region: &str) -> AwsStore {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_owned()))
        .load()
        .await;
    AwsStore::new(Client::new(&config))
}

/// Map an SDK error onto the helper error taxonomy by service error code.
///
/// Codes the helpers react to become their dedicated variants; everything
/// else stays a pass-through [`Error::Service`], or [`Error::Internal`]
/// when the failure never reached the service (connect, timeout).
fn map_sdk_error<E>(err: SdkError<E>, bucket: &str, key: Option<&str>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let Some(code) = err.code().map(ToOwned::to_owned) else {
        return Error::Internal(anyhow::Error::new(err).context("request never reached the service"));
    };
    let message = err.message().unwrap_or_default().to_owned();

    match code.as_str() {
        "NoSuchTagSet" => Error::NoSuchTagSet,
        "NoSuchLifecycleConfiguration" => Error::NoSuchLifecycleConfiguration,
        "NoSuchBucketPolicy" => Error::NoSuchBucketPolicy,
        "NoSuchBucket" => Error::NoSuchBucket {
            bucket: bucket.to_owned(),
        },
        "NoSuchKey" => Error::NoSuchKey {
            key: key.unwrap_or_default().to_owned(),
        },
        "BucketAlreadyExists" => Error::BucketAlreadyExists {
            bucket: bucket.to_owned(),
        },
        "InvalidTag" => Error::InvalidTag { message },
        "AccessDenied" => Error::AccessDenied,
        _ => Error::Service { code, message },
    }
}

#[async_trait]
impl ObjectStore for AwsStore {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>> {
        let resp = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|err| map_sdk_error(err, "", None))?;

        Ok(resp
            .buckets()
            .iter()
            .filter_map(|bucket| {
                let name = bucket.name()?.to_owned();
                let creation_date = bucket.creation_date().and_then(|d| d.to_chrono_utc().ok())?;
                Some(BucketSummary {
                    name,
                    creation_date,
                })
            })
            .collect())
    }

    async fn create_bucket(&self, bucket: &str, region: Option<Region>) -> Result<()> {
        let configuration = region.map(|region| {
            sdk::CreateBucketConfiguration::builder()
                .location_constraint(sdk::BucketLocationConstraint::from(region.as_str()))
                .build()
        });

        self.client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(configuration)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        debug!(bucket = %bucket, "create_bucket completed");
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectSummary>> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_prefix(prefix.map(ToOwned::to_owned))
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|err| map_sdk_error(err, bucket, None))?;

            objects.extend(resp.contents().iter().filter_map(|object| {
                Some(ObjectSummary {
                    key: object.key()?.to_owned(),
                    last_modified: object.last_modified().and_then(|d| d.to_chrono_utc().ok()),
                })
            }));

            if resp.is_truncated().unwrap_or(false) {
                continuation = resp.next_continuation_token().map(ToOwned::to_owned);
            }
            if continuation.is_none() {
                break;
            }
        }

        Ok(objects)
    }

    async fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectVersion>> {
        let mut versions = Vec::new();
        let mut key_marker: Option<String> = None;
        let mut version_id_marker: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_object_versions()
                .bucket(bucket)
                .set_key_marker(key_marker.take())
                .set_version_id_marker(version_id_marker.take())
                .send()
                .await
                .map_err(|err| map_sdk_error(err, bucket, None))?;

            versions.extend(resp.versions().iter().filter_map(|version| {
                Some(ObjectVersion {
                    key: version.key()?.to_owned(),
                    version_id: version.version_id()?.to_owned(),
                    last_modified: version.last_modified().and_then(|d| d.to_chrono_utc().ok()),
                })
            }));
            // Delete markers are versions too; removing a key completely
            // means removing its markers as well.
            versions.extend(resp.delete_markers().iter().filter_map(|marker| {
                Some(ObjectVersion {
                    key: marker.key()?.to_owned(),
                    version_id: marker.version_id()?.to_owned(),
                    last_modified: marker.last_modified().and_then(|d| d.to_chrono_utc().ok()),
                })
            }));

            if resp.is_truncated().unwrap_or(false) {
                key_marker = resp.next_key_marker().map(ToOwned::to_owned);
                version_id_marker = resp.next_version_id_marker().map(ToOwned::to_owned);
            }
            if key_marker.is_none() && version_id_marker.is_none() {
                break;
            }
        }

        Ok(versions)
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        storage_class: StorageClass,
        tags: Option<&TagSet>,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body.into())
            .acl(sdk::ObjectCannedAcl::Private)
            .storage_class(storage_class_for_put(storage_class))
            .set_tagging(tags.map(tagging_header))
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, Some(key)))?;
        debug!(bucket = %bucket, key = %key, "put_object completed");
        Ok(())
    }

    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Vec<Tag>> {
        let resp = self
            .client
            .get_bucket_tagging()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        Ok(resp.tag_set().iter().map(from_sdk_tag).collect())
    }

    async fn put_bucket_tagging(&self, bucket: &str, tags: &[Tag]) -> Result<()> {
        let tag_set = tags.iter().map(to_sdk_tag).collect::<Result<Vec<_>>>()?;
        let tagging = sdk::Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .context("building SDK tagging")
            .map_err(Error::Internal)?;

        self.client
            .put_bucket_tagging()
            .bucket(bucket)
            .tagging(tagging)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        debug!(bucket = %bucket, "put_bucket_tagging completed");
        Ok(())
    }

    async fn get_object_tagging(&self, bucket: &str, key: &str) -> Result<Vec<Tag>> {
        let resp = self
            .client
            .get_object_tagging()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, Some(key)))?;
        Ok(resp.tag_set().iter().map(from_sdk_tag).collect())
    }

    async fn put_object_tagging(&self, bucket: &str, key: &str, tags: &[Tag]) -> Result<()> {
        let tag_set = tags.iter().map(to_sdk_tag).collect::<Result<Vec<_>>>()?;
        let tagging = sdk::Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .context("building SDK tagging")
            .map_err(Error::Internal)?;

        self.client
            .put_object_tagging()
            .bucket(bucket)
            .key(key)
            .tagging(tagging)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, Some(key)))?;
        debug!(bucket = %bucket, key = %key, "put_object_tagging completed");
        Ok(())
    }

    async fn get_bucket_lifecycle(&self, bucket: &str) -> Result<Vec<LifecycleRule>> {
        let resp = self
            .client
            .get_bucket_lifecycle_configuration()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        resp.rules().iter().map(from_sdk_lifecycle_rule).collect()
    }

    async fn put_bucket_lifecycle(
        &self,
        bucket: &str,
        rules: &[LifecycleRule],
        expected_owner: Option<&str>,
    ) -> Result<()> {
        let sdk_rules = rules
            .iter()
            .map(to_sdk_lifecycle_rule)
            .collect::<Result<Vec<_>>>()?;
        let configuration = sdk::BucketLifecycleConfiguration::builder()
            .set_rules(Some(sdk_rules))
            .build()
            .context("building SDK lifecycle configuration")
            .map_err(Error::Internal)?;

        self.client
            .put_bucket_lifecycle_configuration()
            .bucket(bucket)
            .lifecycle_configuration(configuration)
            .set_expected_bucket_owner(expected_owner.map(ToOwned::to_owned))
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        debug!(bucket = %bucket, rules = rules.len(), "put_bucket_lifecycle completed");
        Ok(())
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<PolicyDocument> {
        let resp = self
            .client
            .get_bucket_policy()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        let text = resp.policy().ok_or(Error::NoSuchBucketPolicy)?;
        serde_json::from_str(text)
            .context("bucket policy did not parse as a policy document")
            .map_err(Error::Internal)
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &PolicyDocument) -> Result<()> {
        let text = serde_json::to_string(policy)
            .context("serializing policy document")
            .map_err(Error::Internal)?;

        self.client
            .put_bucket_policy()
            .bucket(bucket)
            .policy(text)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        debug!(bucket = %bucket, "put_bucket_policy completed");
        Ok(())
    }

    async fn get_bucket_logging(&self, bucket: &str) -> Result<Option<LoggingEnabled>> {
        let resp = self
            .client
            .get_bucket_logging()
            .bucket(bucket)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        Ok(resp.logging_enabled().map(from_sdk_logging_enabled))
    }

    async fn put_bucket_logging(&self, bucket: &str, status: &BucketLoggingStatus) -> Result<()> {
        let logging_enabled = status
            .logging_enabled
            .as_ref()
            .map(to_sdk_logging_enabled)
            .transpose()?;
        let sdk_status = sdk::BucketLoggingStatus::builder()
            .set_logging_enabled(logging_enabled)
            .build();

        self.client
            .put_bucket_logging()
            .bucket(bucket)
            .bucket_logging_status(sdk_status)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;
        debug!(bucket = %bucket, "put_bucket_logging completed");
        Ok(())
    }

    async fn delete_objects(
        &self,
        bucket: &str,
        objects: &[ObjectIdentifier],
    ) -> Result<Vec<ObjectIdentifier>> {
        let targets = objects
            .iter()
            .map(to_sdk_object_identifier)
            .collect::<Result<Vec<_>>>()?;
        let delete = sdk::Delete::builder()
            .set_objects(Some(targets))
            .build()
            .context("building SDK delete request")
            .map_err(Error::Internal)?;

        let resp = self
            .client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .map_err(|err| map_sdk_error(err, bucket, None))?;

        Ok(resp
            .deleted()
            .iter()
            .filter_map(|deleted| {
                Some(ObjectIdentifier {
                    key: deleted.key()?.to_owned(),
                    version_id: deleted.version_id().map(ToOwned::to_owned),
                })
            })
            .collect())
    }
}
