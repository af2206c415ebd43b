//! Error types for the bucket-management helpers.
//!
//! Defines [`Error`], a domain-specific enum covering the three classes of
//! failure the helpers distinguish:
//!
//! - input validation errors, reported before any request is sent;
//! - "not found / not configured" responses that are expected steady-state
//!   conditions (the operations treat them as "empty set" and continue);
//! - service failures that propagate unchanged (no retry policy here).

use bucketeer_model::{InvalidValue, ValueKind};

/// Helper error type.
///
/// Variants carry enough context to be actionable without holding on to
/// provider-specific types; SDK adapters map their service errors onto
/// these variants by error code.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    // -----------------------------------------------------------------------
    // Input validation
    // -----------------------------------------------------------------------
    /// The specified bucket name is not valid.
    #[error("Invalid bucket name: {name}: {reason}")]
    InvalidBucketName {
        /// The invalid bucket name.
        name: String,
        /// The reason for the error.
        reason: String,
    },

    /// An argument provided is invalid.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// A tag key or value is invalid, or a tag set conflicts.
    #[error("Invalid tag: {message}")]
    InvalidTag {
        /// Description of the tag error.
        message: String,
    },

    /// A date input could not be understood.
    #[error("Invalid date input {input:?}: {reason}")]
    InvalidDate {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A date interval's start does not strictly precede its end.
    #[error("Invalid date range: start {start} must be before end {end}")]
    InvalidDateRange {
        /// The interval start, as given.
        start: String,
        /// The interval end, as given.
        end: String,
    },

    /// A storage-class literal names no known storage class.
    #[error("Invalid storage class: {value:?}")]
    InvalidStorageClass {
        /// The rejected literal.
        value: String,
    },

    /// A region literal names no known region.
    #[error("Invalid region: {value:?}")]
    InvalidRegion {
        /// The rejected literal.
        value: String,
    },

    /// An account ID is not a 12-digit numeric string.
    #[error("Invalid account ID: {value:?}")]
    InvalidAccountId {
        /// The rejected value.
        value: String,
    },

    // -----------------------------------------------------------------------
    // Bucket / object errors
    // -----------------------------------------------------------------------
    /// The specified bucket does not exist.
    #[error("The specified bucket does not exist: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// The requested bucket name is already taken.
    #[error("The requested bucket name is not available: {bucket}")]
    BucketAlreadyExists {
        /// The bucket name that already exists.
        bucket: String,
    },

    /// The specified key does not exist.
    #[error("The specified key does not exist: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    // -----------------------------------------------------------------------
    // Configuration-not-found (expected steady-state conditions)
    // -----------------------------------------------------------------------
    /// The tag set does not exist.
    #[error("The TagSet does not exist")]
    NoSuchTagSet,

    /// The lifecycle configuration does not exist.
    #[error("The lifecycle configuration does not exist")]
    NoSuchLifecycleConfiguration,

    /// The bucket policy does not exist.
    #[error("The bucket policy does not exist")]
    NoSuchBucketPolicy,

    // -----------------------------------------------------------------------
    // Service pass-through
    // -----------------------------------------------------------------------
    /// Access denied.
    #[error("Access Denied")]
    AccessDenied,

    /// Any other service error, carried with its wire code.
    #[error("Service error {code}: {message}")]
    Service {
        /// The service error code.
        code: String,
        /// The service error message.
        message: String,
    },

    /// Internal error with context.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl Error {
    /// Whether this error is the "no tag set configured" steady-state
    /// condition rather than a failure.
    #[must_use]
    pub fn is_no_such_tag_set(&self) -> bool {
        matches!(self, Self::NoSuchTagSet)
    }

    /// Whether this error is a tag conflict (duplicate or invalid tag)
    /// reported by the provider.
    #[must_use]
    pub fn is_invalid_tag(&self) -> bool {
        matches!(self, Self::InvalidTag { .. })
    }
}

impl From<InvalidValue> for Error {
    fn from(err: InvalidValue) -> Self {
        match err.kind {
            ValueKind::StorageClass => Self::InvalidStorageClass { value: err.value },
            ValueKind::Region => Self::InvalidRegion { value: err.value },
            ValueKind::AccountId => Self::InvalidAccountId { value: err.value },
        }
    }
}

/// Convenience result type for helper operations.
pub type Result<T> = std::result::Result<T, Error>;
