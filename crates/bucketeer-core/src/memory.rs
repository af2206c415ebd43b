//! In-memory storage provider.
//!
//! [`MemoryStore`] implements [`ObjectStore`] against process-local state:
//! a `DashMap` of buckets, each holding its versioned objects and optional
//! configurations behind `parking_lot::RwLock`. It backs the operation
//! tests and serves as a fake for callers testing their own flows.
//!
//! Behavior mirrors the real service where the helpers depend on it: a
//! bucket without tags reports `NoSuchTagSet`, unconfigured lifecycle and
//! policy report their not-found codes, and tag-set writes reject duplicate
//! keys with `InvalidTag`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bucketeer_model::{
    BucketLoggingStatus, BucketSummary, LifecycleRule, LoggingEnabled, ObjectIdentifier,
    ObjectSummary, ObjectVersion, PolicyDocument, Region, StorageClass, Tag,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Error, Result};
use crate::naming::generate_version_id;
use crate::provider::ObjectStore;
use crate::tags::{TagSet, tag_set_to_pairs};
use crate::validation::{validate_bucket_name, validate_object_key, validate_tags};

/// One stored object version.
#[derive(Debug, Clone)]
struct StoredVersion {
    key: String,
    version_id: String,
    body: Bytes,
    storage_class: StorageClass,
    tags: Vec<Tag>,
    last_modified: DateTime<Utc>,
}

/// A bucket with its objects and configuration state.
#[derive(Debug)]
struct MemoryBucket {
    name: String,
    region: Option<Region>,
    creation_date: DateTime<Utc>,
    /// All object versions, in write order; the last entry per key is the
    /// current version.
    versions: RwLock<Vec<StoredVersion>>,
    /// Bucket tags. Empty means no tag set is configured.
    tags: RwLock<Vec<Tag>>,
    lifecycle: RwLock<Option<Vec<LifecycleRule>>>,
    policy: RwLock<Option<PolicyDocument>>,
    logging: RwLock<Option<LoggingEnabled>>,
}

impl MemoryBucket {
    fn new(name: &str, region: Option<Region>, creation_date: DateTime<Utc>) -> Self {
        Self {
            name: name.to_owned(),
            region,
            creation_date,
            versions: RwLock::new(Vec::new()),
            tags: RwLock::new(Vec::new()),
            lifecycle: RwLock::new(None),
            policy: RwLock::new(None),
            logging: RwLock::new(None),
        }
    }
}

/// An in-memory [`ObjectStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: DashMap<String, Arc<MemoryBucket>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bucket with an explicit creation timestamp.
    ///
    /// Lets tests and fixtures control the dates the date filters compare
    /// against.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBucketName`] or
    /// [`Error::BucketAlreadyExists`] like a regular create.
    pub fn create_bucket_dated(&self, bucket: &str, creation_date: DateTime<Utc>) -> Result<()> {
        self.insert_bucket(bucket, None, creation_date)
    }

    fn insert_bucket(
        &self,
        bucket: &str,
        region: Option<Region>,
        creation_date: DateTime<Utc>,
    ) -> Result<()> {
        validate_bucket_name(bucket)?;
        if self.buckets.contains_key(bucket) {
            return Err(Error::BucketAlreadyExists {
                bucket: bucket.to_owned(),
            });
        }
        self.buckets.insert(
            bucket.to_owned(),
            Arc::new(MemoryBucket::new(bucket, region, creation_date)),
        );
        Ok(())
    }

    /// The region constraint a bucket was created with, for assertions in
    /// tests built on the fake.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchBucket`] when the bucket does not exist.
    pub fn bucket_region(&self, bucket: &str) -> Result<Option<Region>> {
        Ok(self.bucket(bucket)?.region)
    }

    /// The current version's body and storage class, for assertions in
    /// tests built on the fake.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSuchBucket`] or [`Error::NoSuchKey`] when the
    /// target does not exist.
    pub fn object_contents(&self, bucket: &str, key: &str) -> Result<(Bytes, StorageClass)> {
        let bucket = self.bucket(bucket)?;
        let versions = bucket.versions.read();
        versions
            .iter()
            .rfind(|v| v.key == key)
            .map(|v| (v.body.clone(), v.storage_class))
            .ok_or_else(|| Error::NoSuchKey { key: key.to_owned() })
    }

    fn bucket(&self, name: &str) -> Result<Arc<MemoryBucket>> {
        self.buckets
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>> {
        let mut summaries: Vec<BucketSummary> = self
            .buckets
            .iter()
            .map(|entry| BucketSummary {
                name: entry.value().name.clone(),
                creation_date: entry.value().creation_date,
            })
            .collect();
        summaries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(summaries)
    }

    async fn create_bucket(&self, bucket: &str, region: Option<Region>) -> Result<()> {
        self.insert_bucket(bucket, region, Utc::now())?;
        debug!(bucket = %bucket, "create_bucket completed");
        Ok(())
    }

    async fn list_objects(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<ObjectSummary>> {
        let bucket = self.bucket(bucket)?;
        let versions = bucket.versions.read();

        // Last write per key wins; BTreeMap keeps the listing key-ordered.
        let mut current: BTreeMap<&str, &StoredVersion> = BTreeMap::new();
        for version in versions.iter() {
            current.insert(&version.key, version);
        }

        Ok(current
            .into_values()
            .filter(|v| prefix.is_none_or(|p| v.key.starts_with(p)))
            .map(|v| ObjectSummary {
                key: v.key.clone(),
                last_modified: Some(v.last_modified),
            })
            .collect())
    }

    async fn list_object_versions(&self, bucket: &str) -> Result<Vec<ObjectVersion>> {
        let bucket = self.bucket(bucket)?;
        let versions = bucket.versions.read();
        Ok(versions
            .iter()
            .map(|v| ObjectVersion {
                key: v.key.clone(),
                version_id: v.version_id.clone(),
                last_modified: Some(v.last_modified),
            })
            .collect())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        storage_class: StorageClass,
        tags: Option<&TagSet>,
    ) -> Result<()> {
        validate_object_key(key)?;
        let tags = match tags {
            Some(tags) => {
                let pairs = tag_set_to_pairs(tags);
                validate_tags(&pairs)?;
                pairs
            }
            None => Vec::new(),
        };

        let bucket = self.bucket(bucket)?;
        bucket.versions.write().push(StoredVersion {
            key: key.to_owned(),
            version_id: generate_version_id(),
            body,
            storage_class,
            tags,
            last_modified: Utc::now(),
        });
        debug!(bucket = %bucket.name, key = %key, "put_object completed");
        Ok(())
    }

    async fn get_bucket_tagging(&self, bucket: &str) -> Result<Vec<Tag>> {
        let bucket = self.bucket(bucket)?;
        let tags = bucket.tags.read();
        if tags.is_empty() {
            return Err(Error::NoSuchTagSet);
        }
        Ok(tags.clone())
    }

    async fn put_bucket_tagging(&self, bucket: &str, tags: &[Tag]) -> Result<()> {
        validate_tags(tags)?;
        let bucket = self.bucket(bucket)?;
        *bucket.tags.write() = tags.to_vec();
        debug!(bucket = %bucket.name, "put_bucket_tagging completed");
        Ok(())
    }

    async fn get_object_tagging(&self, bucket: &str, key: &str) -> Result<Vec<Tag>> {
        let bucket = self.bucket(bucket)?;
        let versions = bucket.versions.read();
        versions
            .iter()
            .rfind(|v| v.key == key)
            .map(|v| v.tags.clone())
            .ok_or_else(|| Error::NoSuchKey { key: key.to_owned() })
    }

    async fn put_object_tagging(&self, bucket: &str, key: &str, tags: &[Tag]) -> Result<()> {
        validate_tags(tags)?;
        let bucket = self.bucket(bucket)?;
        let mut versions = bucket.versions.write();
        let current = versions
            .iter_mut()
            .rfind(|v| v.key == key)
            .ok_or_else(|| Error::NoSuchKey { key: key.to_owned() })?;
        current.tags = tags.to_vec();
        debug!(bucket = %bucket.name, key = %key, "put_object_tagging completed");
        Ok(())
    }

    async fn get_bucket_lifecycle(&self, bucket: &str) -> Result<Vec<LifecycleRule>> {
        let bucket = self.bucket(bucket)?;
        let lifecycle = bucket.lifecycle.read();
        lifecycle
            .clone()
            .ok_or(Error::NoSuchLifecycleConfiguration)
    }

    async fn put_bucket_lifecycle(
        &self,
        bucket: &str,
        rules: &[LifecycleRule],
        _expected_owner: Option<&str>,
    ) -> Result<()> {
        let bucket = self.bucket(bucket)?;
        *bucket.lifecycle.write() = Some(rules.to_vec());
        debug!(bucket = %bucket.name, rules = rules.len(), "put_bucket_lifecycle completed");
        Ok(())
    }

    async fn get_bucket_policy(&self, bucket: &str) -> Result<PolicyDocument> {
        let bucket = self.bucket(bucket)?;
        let policy = bucket.policy.read();
        policy.clone().ok_or(Error::NoSuchBucketPolicy)
    }

    async fn put_bucket_policy(&self, bucket: &str, policy: &PolicyDocument) -> Result<()> {
        let bucket = self.bucket(bucket)?;
        *bucket.policy.write() = Some(policy.clone());
        debug!(bucket = %bucket.name, "put_bucket_policy completed");
        Ok(())
    }

    async fn get_bucket_logging(&self, bucket: &str) -> Result<Option<LoggingEnabled>> {
        let bucket = self.bucket(bucket)?;
        Ok(bucket.logging.read().clone())
    }

    async fn put_bucket_logging(&self, bucket: &str, status: &BucketLoggingStatus) -> Result<()> {
        let bucket = self.bucket(bucket)?;
        *bucket.logging.write() = status.logging_enabled.clone();
        debug!(bucket = %bucket.name, "put_bucket_logging completed");
        Ok(())
    }

    async fn delete_objects(
        &self,
        bucket: &str,
        objects: &[ObjectIdentifier],
    ) -> Result<Vec<ObjectIdentifier>> {
        let bucket = self.bucket(bucket)?;
        let mut versions = bucket.versions.write();
        let mut deleted = Vec::new();

        for target in objects {
            let position = match &target.version_id {
                Some(version_id) => versions
                    .iter()
                    .position(|v| v.key == target.key && &v.version_id == version_id),
                None => versions.iter().rposition(|v| v.key == target.key),
            };
            if let Some(position) = position {
                let removed = versions.remove(position);
                deleted.push(ObjectIdentifier::versioned(removed.key, removed.version_id));
            }
        }

        debug!(bucket = %bucket.name, deleted = deleted.len(), "delete_objects completed");
        Ok(deleted)
    }
}
