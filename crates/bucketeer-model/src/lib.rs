//! Plain data types for the bucketeer S3 helpers.
//!
//! This crate holds the wire-shaped value types shared by the core helpers
//! and the storage-provider adapters: tags, storage classes and regions,
//! lifecycle rules, logging configuration, bucket policies, and listing
//! summaries. All types are plain serializable values with no behavior
//! beyond construction, parsing, and display.
#![allow(missing_docs)]

pub mod policy;
pub mod types;

pub use policy::{Effect, PolicyCondition, PolicyDocument, PolicyStatement, Principal};
pub use types::{
    AbortIncompleteMultipartUpload, AccountId, BucketLoggingStatus, BucketSummary, InvalidValue,
    LifecycleExpiration, LifecycleRule, LoggingEnabled, NoncurrentVersionExpiration,
    NoncurrentVersionTransition, ObjectIdentifier, ObjectSummary, ObjectVersion, Region,
    RuleFilter, RuleFilterAnd, RuleStatus, StorageClass, Tag, Transition, ValueKind,
};
