//! Bucket and object creation.

use bucketeer_model::{Region, StorageClass, Tag};
use bytes::Bytes;
use tracing::{debug, info};

use crate::error::Result;
use crate::naming::unique_bucket_name;
use crate::provider::ObjectStore;
use crate::tags::{TagSet, tag_set_to_pairs};
use crate::validation::{validate_object_key, validate_tags};

/// Create a bucket and return its final name.
///
/// With `unique_suffix` true, the name is `base` plus a random UUID suffix
/// (see [`unique_bucket_name`]), making collisions with the globally-unique
/// bucket namespace unlikely; with it false, `base` is used as-is and may
/// collide. `region` of `None` creates the bucket in the provider's default
/// region. When `tags` are given, the new bucket's tag set is written right
/// after creation.
///
/// # Errors
///
/// Returns the provider's creation or tagging error unchanged; tag sets are
/// validated before anything is sent.
pub async fn create_bucket(
    store: &impl ObjectStore,
    base: &str,
    region: Option<Region>,
    tags: Option<&[Tag]>,
    unique_suffix: bool,
) -> Result<String> {
    if let Some(tags) = tags {
        validate_tags(tags)?;
    }

    let bucket = if unique_suffix {
        unique_bucket_name(base)
    } else {
        base.to_owned()
    };

    store.create_bucket(&bucket, region).await?;
    info!(bucket = %bucket, "bucket created");

    if let Some(tags) = tags {
        store.put_bucket_tagging(&bucket, tags).await?;
        debug!(bucket = %bucket, tags = tags.len(), "initial tag set applied");
    }

    Ok(bucket)
}

/// Write an object with a storage class and optional tags.
///
/// The key and tag set are validated before the request is sent. Tags are
/// delivered with the write itself (as the URL-encoded tagging header), not
/// as a second call.
///
/// # Errors
///
/// Returns [`crate::Error::InvalidArgument`] or [`crate::Error::InvalidTag`]
/// for invalid inputs, otherwise the provider's error unchanged.
pub async fn put_object(
    store: &impl ObjectStore,
    bucket: &str,
    key: &str,
    body: Bytes,
    storage_class: StorageClass,
    tags: Option<&TagSet>,
) -> Result<()> {
    validate_object_key(key)?;
    if let Some(tags) = tags {
        validate_tags(&tag_set_to_pairs(tags))?;
    }

    store
        .put_object(bucket, key, body, storage_class, tags)
        .await?;
    debug!(bucket = %bucket, key = %key, storage_class = %storage_class, "object written");
    Ok(())
}
