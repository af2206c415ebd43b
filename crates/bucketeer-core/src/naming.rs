//! Bucket-name and version-ID generation.

use uuid::Uuid;

/// Append a random UUIDv4 suffix to a bucket name base.
///
/// The suffix is joined with a hyphen unless the base already ends with one,
/// and the result is capped at `min(len(base) + 36, 63)` characters — the
/// UUID is truncated before the 63-character bucket-name limit is exceeded.
/// The base must already consist of bucket-valid characters.
///
/// # Examples
///
/// ```
/// use bucketeer_core::naming::unique_bucket_name;
///
/// let name = unique_bucket_name("sim-results");
/// assert!(name.starts_with("sim-results-"));
/// assert!(name.len() <= 63);
/// ```
#[must_use]
pub fn unique_bucket_name(base: &str) -> String {
    let suffix = Uuid::new_v4().to_string();
    let joined = if base.ends_with('-') {
        format!("{base}{suffix}")
    } else {
        format!("{base}-{suffix}")
    };
    let cap = (base.len() + 36).min(63);
    joined.chars().take(cap).collect()
}

/// Generate a random version ID for a stored object version.
///
/// # Examples
///
/// ```
/// use bucketeer_core::naming::generate_version_id;
///
/// let id = generate_version_id();
/// assert_eq!(id.len(), 32);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn generate_version_id() -> String {
    Uuid::new_v4().simple().to_string()
}
