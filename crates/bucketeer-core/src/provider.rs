//! The abstract storage-provider interface.
//!
//! [`ObjectStore`] names exactly the capabilities the helpers consume:
//! enumeration, tagging, lifecycle, policy, logging, and batched deletion.
//! The trait uses `#[async_trait]` so it stays object-safe and a connected
//! client handle (`Arc<dyn ObjectStore>`) can be reused across a loop of
//! per-object calls.
//!
//! Implementations: [`crate::memory::MemoryStore`] (in-process fake) and the
//! SDK-backed store in the `bucketeer-aws` crate.

use async_trait::async_trait;
use bucketeer_model::{
    BucketLoggingStatus, BucketSummary, LifecycleRule, LoggingEnabled, ObjectIdentifier,
    ObjectSummary, ObjectVersion, PolicyDocument, Region, StorageClass, Tag,
};
use bytes::Bytes;

use crate::error::Result;
use crate::tags::TagSet;

/// One S3-style storage service.
///
/// Error contract, mirrored from the service's error codes:
///
/// - `get_bucket_tagging` fails with [`crate::Error::NoSuchTagSet`] when the
///   bucket has no tag set (object tagging returns an empty list instead);
/// - `get_bucket_lifecycle` fails with
///   [`crate::Error::NoSuchLifecycleConfiguration`] and `get_bucket_policy`
///   with [`crate::Error::NoSuchBucketPolicy`] when unconfigured;
/// - tag-set writes fail with [`crate::Error::InvalidTag`] on duplicate or
///   invalid tags;
/// - operations on unknown buckets or keys fail with
///   [`crate::Error::NoSuchBucket`] / [`crate::Error::NoSuchKey`].
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Enumerate all buckets with their creation timestamps.
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>>;

    /// Create a bucket, optionally constrained to a region. `None` uses the
    /// provider's default region.
    async fn create_bucket(&self, bucket: &str, region: Option<Region>) -> Result<()>;

    /// Enumerate current objects of a bucket, optionally narrowed to keys
    /// starting with `prefix` (service-side, genuine starts-with).
    async fn list_objects(&self, bucket: &str, prefix: Option<&str>)
    -> Result<Vec<ObjectSummary>>;

    /// Enumerate every stored version of every object in a bucket.
    async fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectVersion>>;

    /// Write an object with a storage class and optional tags (delivered as
    /// a URL-encoded tagging header). The object is private.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        storage_class: StorageClass,
        tags: Option<&TagSet>,
    ) -> Result<()>;

    /// Fetch a bucket's tag set.
    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Vec<Tag>>;

    /// Replace a bucket's tag set.
    async fn put_bucket_tagging(&self, bucket: &str, tags: &[Tag]) -> Result<()>;

    /// Fetch an object's tag set (empty when untagged).
    async fn get_object_tagging(&self, bucket: &str, key: &str) -> Result<Vec<Tag>>;

    /// Replace an object's tag set.
    async fn put_object_tagging(&self, bucket: &str, key: &str, tags: &[Tag]) -> Result<()>;

    /// Fetch a bucket's lifecycle rules.
    async fn get_bucket_lifecycle(&self, bucket: &str) -> Result<Vec<LifecycleRule>>;

    /// Replace a bucket's lifecycle configuration, optionally asserting the
    /// expected bucket-owner account.
    async fn put_bucket_lifecycle(
        &self,
        bucket: &str,
        rules: &[LifecycleRule],
        expected_owner: Option<&str>,
    ) -> Result<()>;

    /// Fetch a bucket's policy document.
    async fn get_bucket_policy(&self, bucket: &str) -> Result<PolicyDocument>;

    /// Replace a bucket's policy document.
    async fn put_bucket_policy(&self, bucket: &str, policy: &PolicyDocument) -> Result<()>;

    /// Fetch a bucket's access-logging target, if logging is on.
    async fn get_bucket_logging(&self, bucket: &str) -> Result<Option<LoggingEnabled>>;

    /// Replace a bucket's access-logging configuration. An empty status
    /// turns logging off.
    async fn put_bucket_logging(&self, bucket: &str, status: &BucketLoggingStatus) -> Result<()>;

    /// Delete a batch of object versions. Returns the identifiers actually
    /// deleted.
    async fn delete_objects(
        &self,
        bucket: &str,
        objects: &[ObjectIdentifier],
    ) -> Result<Vec<ObjectIdentifier>>;
}
