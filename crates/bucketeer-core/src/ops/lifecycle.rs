//! Lifecycle configuration updates.

use bucketeer_model::{AccountId, LifecycleRule};
use tracing::debug;

use crate::error::{Error, Result};
use crate::provider::ObjectStore;

/// Add one rule to a bucket's lifecycle configuration, keeping the rules
/// already there.
///
/// The configuration is fetched (absence counts as empty), the new rule is
/// placed first, and the whole set is written back — lifecycle writes
/// replace the entire configuration, so preservation has to happen here.
/// `expected_owner` asserts the bucket-owner account on the write when
/// given. Returns the full rule set as submitted.
///
/// # Errors
///
/// Returns the provider's error unchanged, except that a missing lifecycle
/// configuration on read is an expected condition, not a failure.
pub async fn append_bucket_lifecycle(
    store: &impl ObjectStore,
    bucket: &str,
    rule: LifecycleRule,
    expected_owner: Option<&AccountId>,
) -> Result<Vec<LifecycleRule>> {
    let existing = match store.get_bucket_lifecycle(bucket).await {
        Ok(rules) => rules,
        Err(Error::NoSuchLifecycleConfiguration) => Vec::new(),
        Err(err) => return Err(err),
    };

    let mut rules = vec![rule];
    rules.extend(existing);

    store
        .put_bucket_lifecycle(bucket, &rules, expected_owner.map(AccountId::as_str))
        .await?;
    debug!(bucket = %bucket, rules = rules.len(), "lifecycle configuration updated");
    Ok(rules)
}
