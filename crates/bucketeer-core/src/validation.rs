//! Input validation for bucket names, object keys, and tag sets.
//!
//! Validation happens before a request is built, so unvalidated data never
//! reaches the provider. Rules follow the
//! [bucket naming documentation](https://docs.aws.amazon.com/AmazonS3/latest/userguide/bucketnamingrules.html).

use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use bucketeer_model::Tag;

use crate::error::{Error, Result};

/// Maximum number of tags allowed on a single object or bucket.
const MAX_TAGS: usize = 10;

/// Maximum length of a tag key in characters.
const MAX_TAG_KEY_LEN: usize = 128;

/// Maximum length of a tag value in characters.
const MAX_TAG_VALUE_LEN: usize = 256;

/// Maximum object key length in bytes.
const MAX_KEY_BYTES: usize = 1024;

/// Minimum bucket name length.
const MIN_BUCKET_NAME_LEN: usize = 3;

/// Maximum bucket name length.
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Validate a bucket name.
///
/// Rules:
/// - 3-63 characters long
/// - Only lowercase letters, numbers, hyphens, and dots
/// - Must start and end with a letter or number
/// - No consecutive dots (`..`)
/// - Not formatted as an IPv4 address
/// - Must not start with `xn--` or `sthree-`, or end with `-s3alias`
///
/// # Errors
///
/// Returns [`Error::InvalidBucketName`] if any rule is violated.
///
/// # Examples
///
/// ```
/// use bucketeer_core::validation::validate_bucket_name;
///
/// assert!(validate_bucket_name("my-valid-bucket").is_ok());
/// assert!(validate_bucket_name("AB").is_err());
/// ```
pub fn validate_bucket_name(name: &str) -> Result<()> {
    let len = name.len();

    if !(MIN_BUCKET_NAME_LEN..=MAX_BUCKET_NAME_LEN).contains(&len) {
        return Err(Error::InvalidBucketName {
            name: name.to_owned(),
            reason: format!(
                "Bucket name must be between {MIN_BUCKET_NAME_LEN} and {MAX_BUCKET_NAME_LEN} characters long"
            ),
        });
    }

    if !name
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-' || b == b'.')
    {
        return Err(Error::InvalidBucketName {
            name: name.to_owned(),
            reason: "Bucket name must only contain lowercase letters, numbers, hyphens, and dots"
                .to_owned(),
        });
    }

    let first = name.as_bytes()[0];
    let last = name.as_bytes()[len - 1];
    if !(first.is_ascii_lowercase() || first.is_ascii_digit())
        || !(last.is_ascii_lowercase() || last.is_ascii_digit())
    {
        return Err(Error::InvalidBucketName {
            name: name.to_owned(),
            reason: "Bucket name must start and end with a letter or number".to_owned(),
        });
    }

    if name.contains("..") {
        return Err(Error::InvalidBucketName {
            name: name.to_owned(),
            reason: "Bucket name must not contain consecutive dots".to_owned(),
        });
    }

    if name.parse::<Ipv4Addr>().is_ok() {
        return Err(Error::InvalidBucketName {
            name: name.to_owned(),
            reason: "Bucket name must not be formatted as an IP address".to_owned(),
        });
    }

    if name.starts_with("xn--") {
        return Err(Error::InvalidBucketName {
            name: name.to_owned(),
            reason: "Bucket name must not start with 'xn--'".to_owned(),
        });
    }

    if name.ends_with("-s3alias") {
        return Err(Error::InvalidBucketName {
            name: name.to_owned(),
            reason: "Bucket name must not end with '-s3alias'".to_owned(),
        });
    }

    if name.starts_with("sthree-") {
        return Err(Error::InvalidBucketName {
            name: name.to_owned(),
            reason: "Bucket name must not start with 'sthree-'".to_owned(),
        });
    }

    Ok(())
}

/// Validate an object key.
///
/// Rules: 1-1024 bytes; UTF-8 is enforced by the `&str` type.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the key is empty or too long.
pub fn validate_object_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidArgument {
            message: "Object key must not be empty".to_owned(),
        });
    }

    if key.len() > MAX_KEY_BYTES {
        return Err(Error::InvalidArgument {
            message: format!("Object key must not exceed {MAX_KEY_BYTES} bytes"),
        });
    }

    Ok(())
}

/// Validate a tag key.
///
/// # Errors
///
/// Returns [`Error::InvalidTag`] if the key is empty or exceeds 128
/// characters.
pub fn validate_tag_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::InvalidTag {
            message: "Tag key must not be empty".to_owned(),
        });
    }
    if key.chars().count() > MAX_TAG_KEY_LEN {
        return Err(Error::InvalidTag {
            message: format!(
                "Tag key must not exceed {MAX_TAG_KEY_LEN} characters, got {}",
                key.chars().count()
            ),
        });
    }
    Ok(())
}

/// Validate a tag value.
///
/// # Errors
///
/// Returns [`Error::InvalidTag`] if the value exceeds 256 characters (empty
/// values are allowed).
pub fn validate_tag_value(value: &str) -> Result<()> {
    if value.chars().count() > MAX_TAG_VALUE_LEN {
        return Err(Error::InvalidTag {
            message: format!(
                "Tag value must not exceed {MAX_TAG_VALUE_LEN} characters, got {}",
                value.chars().count()
            ),
        });
    }
    Ok(())
}

/// Validate a complete tag set as submitted to the service.
///
/// Rules:
/// - Maximum of 10 tags
/// - Each key 1-128 characters, each value 0-256 characters
/// - Keys unique — a duplicate key is the conflict the additive-merge write
///   path relies on the service to report
///
/// # Errors
///
/// Returns [`Error::InvalidTag`] if any rule is violated.
pub fn validate_tags(tags: &[Tag]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        return Err(Error::InvalidTag {
            message: format!("Tag set cannot hold more than {MAX_TAGS} tags, got {}", tags.len()),
        });
    }

    let mut seen = BTreeSet::new();
    for tag in tags {
        validate_tag_key(&tag.key)?;
        validate_tag_value(&tag.value)?;
        if !seen.insert(tag.key.as_str()) {
            return Err(Error::InvalidTag {
                message: format!("Cannot provide multiple Tags with the same key: {}", tag.key),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Bucket name validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_accept_valid_bucket_names() {
        let long_name = "a".repeat(63);
        let valid = [
            "my-bucket",
            "abc",
            "bucket.with.dots",
            "123bucket",
            long_name.as_str(),
        ];
        for name in valid {
            assert!(validate_bucket_name(name).is_ok(), "expected valid: {name}");
        }
    }

    #[test]
    fn test_should_reject_out_of_range_length() {
        assert!(validate_bucket_name("ab").is_err());
        assert!(validate_bucket_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_should_reject_uppercase_bucket_name() {
        assert!(validate_bucket_name("MyBucket").is_err());
    }

    #[test]
    fn test_should_reject_bad_edge_characters() {
        assert!(validate_bucket_name("-bucket").is_err());
        assert!(validate_bucket_name("bucket-").is_err());
    }

    #[test]
    fn test_should_reject_consecutive_dots() {
        assert!(validate_bucket_name("my..bucket").is_err());
    }

    #[test]
    fn test_should_reject_ip_address_name() {
        assert!(validate_bucket_name("192.168.1.1").is_err());
    }

    #[test]
    fn test_should_reject_reserved_affixes() {
        assert!(validate_bucket_name("xn--example").is_err());
        assert!(validate_bucket_name("mybucket-s3alias").is_err());
        assert!(validate_bucket_name("sthree-bucket").is_err());
    }

    // -----------------------------------------------------------------------
    // Object key validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_accept_valid_object_keys() {
        assert!(validate_object_key("a").is_ok());
        assert!(validate_object_key("photos/2024/image.jpg").is_ok());
        assert!(validate_object_key(&"k".repeat(1024)).is_ok());
    }

    #[test]
    fn test_should_reject_empty_or_oversized_key() {
        assert!(validate_object_key("").is_err());
        assert!(validate_object_key(&"k".repeat(1025)).is_err());
    }

    // -----------------------------------------------------------------------
    // Tag validation
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_accept_valid_tag_set() {
        let tags: Vec<Tag> = (0..10)
            .map(|i| Tag::new(format!("key{i}"), format!("val{i}")))
            .collect();
        assert!(validate_tags(&tags).is_ok());
    }

    #[test]
    fn test_should_reject_too_many_tags() {
        let tags: Vec<Tag> = (0..11)
            .map(|i| Tag::new(format!("key{i}"), format!("val{i}")))
            .collect();
        assert!(validate_tags(&tags).is_err());
    }

    #[test]
    fn test_should_reject_empty_tag_key() {
        assert!(validate_tags(&[Tag::new("", "value")]).is_err());
    }

    #[test]
    fn test_should_reject_oversized_key_and_value() {
        assert!(validate_tag_key(&"k".repeat(129)).is_err());
        assert!(validate_tag_value(&"v".repeat(257)).is_err());
        assert!(validate_tag_key(&"k".repeat(128)).is_ok());
        assert!(validate_tag_value(&"v".repeat(256)).is_ok());
    }

    #[test]
    fn test_should_reject_duplicate_tag_keys() {
        let tags = vec![Tag::new("env", "prod"), Tag::new("env", "dev")];
        let err = validate_tags(&tags).unwrap_err();
        assert!(err.is_invalid_tag());
        assert!(err.to_string().contains("env"));
    }
}
