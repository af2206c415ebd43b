//! Value types mirroring the storage service's wire shapes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// The kind of literal that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// A storage-class literal such as `STANDARD_IA`.
    StorageClass,
    /// A region literal such as `eu-west-1`.
    Region,
    /// A 12-digit account ID.
    AccountId,
}

impl ValueKind {
    /// Returns a human-readable name for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StorageClass => "storage class",
            Self::Region => "region",
            Self::AccountId => "account ID",
        }
    }
}

/// Error returned when a literal does not name a known value.
///
/// Unlike a lenient `From<&str>` that falls back to a default, parsing here
/// is strict: an unrecognized storage-class or region literal is an input
/// error the caller must see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue {
    /// What kind of literal was being parsed.
    pub kind: ValueKind,
    /// The rejected input.
    pub value: String,
}

impl fmt::Display for InvalidValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {:?}", self.kind.as_str(), self.value)
    }
}

impl std::error::Error for InvalidValue {}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// A key-value metadata pair attachable to a bucket or an object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    /// The tag key. Unique within a tag set.
    pub key: String,
    /// The tag value.
    pub value: String,
}

impl Tag {
    /// Create a tag from a key and a value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Storage classes
// ---------------------------------------------------------------------------

/// Object storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StorageClass {
    /// Default variant.
    #[default]
    #[serde(rename = "STANDARD")]
    Standard,
    #[serde(rename = "REDUCED_REDUNDANCY")]
    ReducedRedundancy,
    #[serde(rename = "STANDARD_IA")]
    StandardIa,
    #[serde(rename = "ONEZONE_IA")]
    OnezoneIa,
    #[serde(rename = "INTELLIGENT_TIERING")]
    IntelligentTiering,
    #[serde(rename = "GLACIER")]
    Glacier,
    #[serde(rename = "GLACIER_IR")]
    GlacierIr,
    #[serde(rename = "DEEP_ARCHIVE")]
    DeepArchive,
    #[serde(rename = "OUTPOSTS")]
    Outposts,
}

impl StorageClass {
    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "STANDARD",
            Self::ReducedRedundancy => "REDUCED_REDUNDANCY",
            Self::StandardIa => "STANDARD_IA",
            Self::OnezoneIa => "ONEZONE_IA",
            Self::IntelligentTiering => "INTELLIGENT_TIERING",
            Self::Glacier => "GLACIER",
            Self::GlacierIr => "GLACIER_IR",
            Self::DeepArchive => "DEEP_ARCHIVE",
            Self::Outposts => "OUTPOSTS",
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageClass {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STANDARD" => Ok(Self::Standard),
            "REDUCED_REDUNDANCY" => Ok(Self::ReducedRedundancy),
            "STANDARD_IA" => Ok(Self::StandardIa),
            "ONEZONE_IA" => Ok(Self::OnezoneIa),
            "INTELLIGENT_TIERING" => Ok(Self::IntelligentTiering),
            "GLACIER" => Ok(Self::Glacier),
            "GLACIER_IR" => Ok(Self::GlacierIr),
            "DEEP_ARCHIVE" => Ok(Self::DeepArchive),
            "OUTPOSTS" => Ok(Self::Outposts),
            _ => Err(InvalidValue {
                kind: ValueKind::StorageClass,
                value: s.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Regions
// ---------------------------------------------------------------------------

/// Bucket location constraint.
///
/// These are the regions a bucket can be explicitly created in. The service
/// default region (`us-east-1`) is expressed as the absence of a constraint,
/// so it does not appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "af-south-1")]
    AfSouth1,
    #[serde(rename = "ap-east-1")]
    ApEast1,
    #[serde(rename = "ap-northeast-1")]
    ApNortheast1,
    #[serde(rename = "ap-northeast-2")]
    ApNortheast2,
    #[serde(rename = "ap-northeast-3")]
    ApNortheast3,
    #[serde(rename = "ap-south-1")]
    ApSouth1,
    #[serde(rename = "ap-south-2")]
    ApSouth2,
    #[serde(rename = "ap-southeast-1")]
    ApSoutheast1,
    #[serde(rename = "ap-southeast-2")]
    ApSoutheast2,
    #[serde(rename = "ap-southeast-3")]
    ApSoutheast3,
    #[serde(rename = "ca-central-1")]
    CaCentral1,
    #[serde(rename = "cn-north-1")]
    CnNorth1,
    #[serde(rename = "cn-northwest-1")]
    CnNorthwest1,
    #[serde(rename = "EU")]
    Eu,
    #[serde(rename = "eu-central-1")]
    EuCentral1,
    #[serde(rename = "eu-north-1")]
    EuNorth1,
    #[serde(rename = "eu-south-1")]
    EuSouth1,
    #[serde(rename = "eu-south-2")]
    EuSouth2,
    #[serde(rename = "eu-west-1")]
    EuWest1,
    #[serde(rename = "eu-west-2")]
    EuWest2,
    #[serde(rename = "eu-west-3")]
    EuWest3,
    #[serde(rename = "me-south-1")]
    MeSouth1,
    #[serde(rename = "sa-east-1")]
    SaEast1,
    #[serde(rename = "us-east-2")]
    UsEast2,
    #[serde(rename = "us-gov-east-1")]
    UsGovEast1,
    #[serde(rename = "us-gov-west-1")]
    UsGovWest1,
    #[serde(rename = "us-west-1")]
    UsWest1,
    #[serde(rename = "us-west-2")]
    UsWest2,
}

impl Region {
    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AfSouth1 => "af-south-1",
            Self::ApEast1 => "ap-east-1",
            Self::ApNortheast1 => "ap-northeast-1",
            Self::ApNortheast2 => "ap-northeast-2",
            Self::ApNortheast3 => "ap-northeast-3",
            Self::ApSouth1 => "ap-south-1",
            Self::ApSouth2 => "ap-south-2",
            Self::ApSoutheast1 => "ap-southeast-1",
            Self::ApSoutheast2 => "ap-southeast-2",
            Self::ApSoutheast3 => "ap-southeast-3",
            Self::CaCentral1 => "ca-central-1",
            Self::CnNorth1 => "cn-north-1",
            Self::CnNorthwest1 => "cn-northwest-1",
            Self::Eu => "EU",
            Self::EuCentral1 => "eu-central-1",
            Self::EuNorth1 => "eu-north-1",
            Self::EuSouth1 => "eu-south-1",
            Self::EuSouth2 => "eu-south-2",
            Self::EuWest1 => "eu-west-1",
            Self::EuWest2 => "eu-west-2",
            Self::EuWest3 => "eu-west-3",
            Self::MeSouth1 => "me-south-1",
            Self::SaEast1 => "sa-east-1",
            Self::UsEast2 => "us-east-2",
            Self::UsGovEast1 => "us-gov-east-1",
            Self::UsGovWest1 => "us-gov-west-1",
            Self::UsWest1 => "us-west-1",
            Self::UsWest2 => "us-west-2",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "af-south-1" => Ok(Self::AfSouth1),
            "ap-east-1" => Ok(Self::ApEast1),
            "ap-northeast-1" => Ok(Self::ApNortheast1),
            "ap-northeast-2" => Ok(Self::ApNortheast2),
            "ap-northeast-3" => Ok(Self::ApNortheast3),
            "ap-south-1" => Ok(Self::ApSouth1),
            "ap-south-2" => Ok(Self::ApSouth2),
            "ap-southeast-1" => Ok(Self::ApSoutheast1),
            "ap-southeast-2" => Ok(Self::ApSoutheast2),
            "ap-southeast-3" => Ok(Self::ApSoutheast3),
            "ca-central-1" => Ok(Self::CaCentral1),
            "cn-north-1" => Ok(Self::CnNorth1),
            "cn-northwest-1" => Ok(Self::CnNorthwest1),
            "EU" => Ok(Self::Eu),
            "eu-central-1" => Ok(Self::EuCentral1),
            "eu-north-1" => Ok(Self::EuNorth1),
            "eu-south-1" => Ok(Self::EuSouth1),
            "eu-south-2" => Ok(Self::EuSouth2),
            "eu-west-1" => Ok(Self::EuWest1),
            "eu-west-2" => Ok(Self::EuWest2),
            "eu-west-3" => Ok(Self::EuWest3),
            "me-south-1" => Ok(Self::MeSouth1),
            "sa-east-1" => Ok(Self::SaEast1),
            "us-east-2" => Ok(Self::UsEast2),
            "us-gov-east-1" => Ok(Self::UsGovEast1),
            "us-gov-west-1" => Ok(Self::UsGovWest1),
            "us-west-1" => Ok(Self::UsWest1),
            "us-west-2" => Ok(Self::UsWest2),
            _ => Err(InvalidValue {
                kind: ValueKind::Region,
                value: s.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Account IDs
// ---------------------------------------------------------------------------

/// AWS account ID (12-digit string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns an error if the account ID is not a 12-digit numeric string.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidValue> {
        let id = id.into();
        if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(InvalidValue {
                kind: ValueKind::AccountId,
                value: id,
            });
        }
        Ok(Self(id))
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = InvalidValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// Lifecycle configuration
// ---------------------------------------------------------------------------

/// Whether a lifecycle rule is in effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RuleStatus {
    /// Default variant.
    #[default]
    Enabled,
    Disabled,
}

impl RuleStatus {
    /// Returns the string value of this enum variant.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "Enabled",
            Self::Disabled => "Disabled",
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A current-version storage-class transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transition {
    /// Days after object creation before the transition applies.
    pub days: i32,
    /// The storage class objects transition to.
    pub storage_class: StorageClass,
}

/// A noncurrent-version storage-class transition.
///
/// Only meaningful on versioned buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoncurrentVersionTransition {
    /// Days after an object becomes noncurrent before the transition applies.
    pub noncurrent_days: i32,
    /// The storage class noncurrent objects transition to.
    pub storage_class: StorageClass,
}

/// Expiration of noncurrent object versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NoncurrentVersionExpiration {
    /// Days after an object becomes noncurrent before it expires.
    pub noncurrent_days: i32,
    /// Number of newer noncurrent versions to retain (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newer_noncurrent_versions: Option<i32>,
}

/// Expiration of current object versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleExpiration {
    /// Days after object creation before the object expires.
    pub days: i32,
}

/// Cleanup policy for abandoned multipart uploads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AbortIncompleteMultipartUpload {
    /// Days after initiation before incomplete upload parts are removed.
    pub days_after_initiation: i32,
}

/// The object subset a lifecycle rule applies to, in wire shape.
///
/// Exactly one of `prefix`, `tag`, or `and` is populated; `and` combines a
/// prefix with tags, or carries multiple tags on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleFilter {
    /// Key-prefix-only filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Single-tag filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<Tag>,
    /// Combined filter (prefix and/or multiple tags).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub and: Option<RuleFilterAnd>,
}

/// The conjunction arm of a [`RuleFilter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuleFilterAnd {
    /// Key prefix, if the conjunction includes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Tags the object must carry.
    pub tags: Vec<Tag>,
}

/// A single lifecycle rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleRule {
    /// Rule identifier.
    #[serde(rename = "ID", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Whether the rule is in effect.
    pub status: RuleStatus,
    /// The object subset the rule applies to. `None` means all objects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<RuleFilter>,
    /// Current-version transitions.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub transitions: Vec<Transition>,
    /// Current-version expiration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<LifecycleExpiration>,
    /// Noncurrent-version transitions.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub noncurrent_version_transitions: Vec<NoncurrentVersionTransition>,
    /// Noncurrent-version expiration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noncurrent_version_expiration: Option<NoncurrentVersionExpiration>,
    /// Abandoned multipart upload cleanup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_incomplete_multipart_upload: Option<AbortIncompleteMultipartUpload>,
}

// ---------------------------------------------------------------------------
// Access logging
// ---------------------------------------------------------------------------

/// Where a bucket's server access logs are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoggingEnabled {
    /// The bucket receiving the logs.
    pub target_bucket: String,
    /// The key prefix log objects are written under.
    pub target_prefix: String,
}

/// A bucket's server-access-logging configuration.
///
/// An empty status (no `logging_enabled`) turns logging off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketLoggingStatus {
    /// Delivery target, when logging is on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logging_enabled: Option<LoggingEnabled>,
}

// ---------------------------------------------------------------------------
// Listing summaries
// ---------------------------------------------------------------------------

/// A bucket as returned by a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BucketSummary {
    /// The bucket name.
    pub name: String,
    /// When the bucket was created.
    pub creation_date: DateTime<Utc>,
}

/// An object as returned by an object listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectSummary {
    /// The object key.
    pub key: String,
    /// When the current version was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// An object version as returned by a version listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectVersion {
    /// The object key.
    pub key: String,
    /// The version identifier.
    pub version_id: String,
    /// When this version was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// A `(key, version)` pair addressing one stored object version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectIdentifier {
    /// The object key.
    pub key: String,
    /// The version to address; `None` addresses the current version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

impl ObjectIdentifier {
    /// Address the current version of `key`.
    pub fn current(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version_id: None,
        }
    }

    /// Address a specific version of `key`.
    pub fn versioned(key: impl Into<String>, version_id: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            version_id: Some(version_id.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_parse_known_storage_class() {
        let sc: StorageClass = "GLACIER_IR".parse().unwrap();
        assert_eq!(sc, StorageClass::GlacierIr);
        assert_eq!(sc.as_str(), "GLACIER_IR");
    }

    #[test]
    fn test_should_reject_unknown_storage_class() {
        let err = "FROZEN".parse::<StorageClass>().unwrap_err();
        assert_eq!(err.kind, ValueKind::StorageClass);
        assert_eq!(err.value, "FROZEN");
    }

    #[test]
    fn test_should_round_trip_all_storage_classes() {
        let classes = [
            StorageClass::Standard,
            StorageClass::ReducedRedundancy,
            StorageClass::StandardIa,
            StorageClass::OnezoneIa,
            StorageClass::IntelligentTiering,
            StorageClass::Glacier,
            StorageClass::GlacierIr,
            StorageClass::DeepArchive,
            StorageClass::Outposts,
        ];
        for class in classes {
            assert_eq!(class.as_str().parse::<StorageClass>().unwrap(), class);
        }
    }

    #[test]
    fn test_should_parse_known_region() {
        let region: Region = "eu-west-1".parse().unwrap();
        assert_eq!(region, Region::EuWest1);
        assert_eq!(region.to_string(), "eu-west-1");
    }

    #[test]
    fn test_should_reject_unknown_region() {
        let err = "mars-north-1".parse::<Region>().unwrap_err();
        assert_eq!(err.kind, ValueKind::Region);
    }

    #[test]
    fn test_should_reject_default_region_as_location_constraint() {
        // us-east-1 is the absence of a constraint, not a constraint value.
        assert!("us-east-1".parse::<Region>().is_err());
    }

    #[test]
    fn test_should_create_valid_account_id() {
        let id = AccountId::new("123456789012").unwrap();
        assert_eq!(id.as_str(), "123456789012");
    }

    #[test]
    fn test_should_reject_invalid_account_id() {
        assert!(AccountId::new("12345").is_err());
        assert!(AccountId::new("abcdefghijkl").is_err());
        assert!(AccountId::new("1234567890123").is_err());
    }

    #[test]
    fn test_should_serialize_tag_in_wire_shape() {
        let tag = Tag::new("env", "prod");
        let json = serde_json::to_value(&tag).unwrap();
        assert_eq!(json, serde_json::json!({"Key": "env", "Value": "prod"}));
    }

    #[test]
    fn test_should_skip_absent_lifecycle_fields() {
        let rule = LifecycleRule {
            id: Some("archive".to_owned()),
            status: RuleStatus::Enabled,
            expiration: Some(LifecycleExpiration { days: 90 }),
            ..LifecycleRule::default()
        };
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "ID": "archive",
                "Status": "Enabled",
                "Expiration": {"Days": 90},
            })
        );
    }

    #[test]
    fn test_should_serialize_empty_logging_status_as_empty_object() {
        let status = BucketLoggingStatus::default();
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
