//! Candidate selection by tag, name, and creation date.

use bucketeer_model::{BucketSummary, ObjectSummary};
use tracing::debug;

use crate::datespec::DateSpec;
use crate::error::{Error, Result};
use crate::filter::{TagFilter, name_has_prefix};
use crate::provider::ObjectStore;
use crate::tags::{TagSet, pairs_to_tag_set};

/// Select buckets whose tag set satisfies `filter`.
///
/// Each bucket's tag set is fetched with a separate call; buckets with no
/// tag set configured are skipped, never treated as an error. Other
/// provider failures propagate unchanged.
///
/// # Errors
///
/// Returns the provider's listing or tagging error unchanged.
pub async fn find_buckets_by_tags(
    store: &impl ObjectStore,
    filter: &TagFilter,
) -> Result<Vec<(BucketSummary, TagSet)>> {
    let mut matches = Vec::new();
    for bucket in store.list_buckets().await? {
        let tags = match store.get_bucket_tagging(&bucket.name).await {
            Ok(pairs) => pairs_to_tag_set(&pairs),
            Err(Error::NoSuchTagSet) => continue,
            Err(err) => return Err(err),
        };
        if filter.matches(&tags) {
            matches.push((bucket, tags));
        }
    }
    debug!(matched = matches.len(), "bucket tag filtering completed");
    Ok(matches)
}

/// Select objects of one bucket whose tag set satisfies `filter`.
///
/// `list_prefix` narrows the listing on the provider side (genuine
/// starts-with semantics) before any tag sets are fetched, which keeps the
/// per-object round-trips down; it is an optimization, not part of the
/// predicate. Untagged objects carry an empty tag set and match exactly
/// when the filter is empty.
///
/// # Errors
///
/// Returns the provider's listing or tagging error unchanged.
pub async fn find_objects_by_tags(
    store: &impl ObjectStore,
    bucket: &str,
    filter: &TagFilter,
    list_prefix: Option<&str>,
) -> Result<Vec<(ObjectSummary, TagSet)>> {
    let mut matches = Vec::new();
    for object in store.list_objects(bucket, list_prefix).await? {
        let tags = pairs_to_tag_set(&store.get_object_tagging(bucket, &object.key).await?);
        if filter.matches(&tags) {
            matches.push((object, tags));
        }
    }
    debug!(bucket = %bucket, matched = matches.len(), "object tag filtering completed");
    Ok(matches)
}

/// Select buckets by name prefix and, optionally, creation date.
///
/// The name check compares the bucket name truncated to the prefix's length
/// (an empty prefix matches every bucket; a prefix longer than the name
/// never panics, it just fails the comparison). A `date` of `None` matches
/// every creation date.
///
/// # Errors
///
/// Returns the provider's listing error unchanged.
pub async fn find_buckets_by_name_date(
    store: &impl ObjectStore,
    prefix: &str,
    date: Option<&DateSpec>,
) -> Result<Vec<BucketSummary>> {
    let buckets = store
        .list_buckets()
        .await?
        .into_iter()
        .filter(|bucket| name_has_prefix(prefix, &bucket.name))
        .filter(|bucket| date.is_none_or(|spec| spec.matches(&bucket.creation_date)))
        .collect::<Vec<_>>();
    debug!(prefix = %prefix, matched = buckets.len(), "bucket name-date filtering completed");
    Ok(buckets)
}
