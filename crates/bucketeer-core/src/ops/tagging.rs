//! Additive tagging of buckets and objects.

use bucketeer_model::Tag;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::provider::ObjectStore;
use crate::tags::merge_tags;

/// Add tags to a bucket without removing the existing ones.
///
/// With `overwrite` false, the existing tag set is fetched (a missing tag
/// set counts as empty) and the submitted set is `new_tags` followed by the
/// existing tags, unmerged — if a key appears on both sides the provider
/// rejects the write with a tag conflict, which is caught and reported as
/// `Ok(None)` rather than a failure. With `overwrite` true, the existing
/// set is replaced outright.
///
/// Returns the tag set actually submitted, or `None` on a conflict.
///
/// # Errors
///
/// Returns any provider error other than the tag conflict unchanged.
pub async fn add_tags_to_bucket(
    store: &impl ObjectStore,
    bucket: &str,
    new_tags: Vec<Tag>,
    overwrite: bool,
) -> Result<Option<Vec<Tag>>> {
    let existing = if overwrite {
        Vec::new()
    } else {
        match store.get_bucket_tagging(bucket).await {
            Ok(tags) => tags,
            Err(Error::NoSuchTagSet) => Vec::new(),
            Err(err) => return Err(err),
        }
    };

    let merged = merge_tags(existing, new_tags, overwrite);
    match store.put_bucket_tagging(bucket, &merged).await {
        Ok(()) => {
            debug!(bucket = %bucket, tags = merged.len(), "bucket tag set updated");
            Ok(Some(merged))
        }
        Err(err) if err.is_invalid_tag() => {
            warn!(bucket = %bucket, error = %err, "tag write rejected; there may be a duplicate tag");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Add tags to an object without removing the existing ones.
///
/// Same contract as [`add_tags_to_bucket`]; an untagged object simply has
/// an empty existing set.
///
/// # Errors
///
/// Returns any provider error other than the tag conflict unchanged.
pub async fn add_tags_to_object(
    store: &impl ObjectStore,
    bucket: &str,
    key: &str,
    new_tags: Vec<Tag>,
    overwrite: bool,
) -> Result<Option<Vec<Tag>>> {
    let existing = if overwrite {
        Vec::new()
    } else {
        store.get_object_tagging(bucket, key).await?
    };

    let merged = merge_tags(existing, new_tags, overwrite);
    match store.put_object_tagging(bucket, key, &merged).await {
        Ok(()) => {
            debug!(bucket = %bucket, key = %key, tags = merged.len(), "object tag set updated");
            Ok(Some(merged))
        }
        Err(err) if err.is_invalid_tag() => {
            warn!(
                bucket = %bucket,
                key = %key,
                error = %err,
                "tag write rejected; there may be a duplicate tag"
            );
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
