//! Prefix-filtered object deletion.

use bucketeer_model::ObjectIdentifier;
use tracing::{debug, info};

use crate::error::Result;
use crate::filter::PrefixSet;
use crate::provider::ObjectStore;

/// Delete every object version whose key matches the prefix set.
///
/// Lists all versions of the bucket, selects keys with
/// [`PrefixSet::matches`] (truncation semantics — see the type docs,
/// including the mixed-length caveat), and batch-deletes the selected
/// `(key, version)` pairs. Passing a set containing the empty prefix
/// deletes everything. Returns the identifiers the provider reports
/// deleted; when nothing matches, no delete call is made.
///
/// # Errors
///
/// Returns the provider's listing or deletion error unchanged.
pub async fn delete_objects_by_prefix(
    store: &impl ObjectStore,
    bucket: &str,
    prefixes: &PrefixSet,
) -> Result<Vec<ObjectIdentifier>> {
    let selected: Vec<ObjectIdentifier> = store
        .list_object_versions(bucket)
        .await?
        .into_iter()
        .filter(|version| prefixes.matches(&version.key))
        .map(|version| ObjectIdentifier::versioned(version.key, version.version_id))
        .collect();

    if selected.is_empty() {
        debug!(bucket = %bucket, "no object versions matched the prefix set");
        return Ok(Vec::new());
    }

    let deleted = store.delete_objects(bucket, &selected).await?;
    info!(bucket = %bucket, deleted = deleted.len(), "objects deleted");
    Ok(deleted)
}
