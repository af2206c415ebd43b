//! Typed construction of lifecycle rules.
//!
//! [`LifecycleRuleBuilder`] assembles one [`LifecycleRule`] from explicit
//! parts, and [`RuleScope`] names the object subset a rule applies to as a
//! tagged union — the variant is selected by which optional inputs are
//! present, and the wire filter shape (single tag vs. conjunction) falls out
//! of the variant rather than being chosen by the caller.

use bucketeer_model::{
    AbortIncompleteMultipartUpload, LifecycleExpiration, LifecycleRule,
    NoncurrentVersionExpiration, NoncurrentVersionTransition, RuleFilter, RuleFilterAnd,
    RuleStatus, StorageClass, Tag, Transition,
};

use crate::error::{Error, Result};
use crate::validation::validate_tags;

/// Upper bound on `newer_noncurrent_versions`.
const MAX_NEWER_NONCURRENT_VERSIONS: i32 = 100;

/// Days to wait before cleaning up an abandoned multipart upload, unless
/// overridden.
const DEFAULT_ABORT_INCOMPLETE_DAYS: i32 = 1;

// ---------------------------------------------------------------------------
// Rule scope
// ---------------------------------------------------------------------------

/// The object subset a lifecycle rule applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RuleScope {
    /// Every object in the bucket.
    #[default]
    All,
    /// Objects whose key starts with the prefix.
    Prefix(String),
    /// Objects carrying all the given tags.
    Tags(Vec<Tag>),
    /// Objects under the prefix that also carry all the given tags.
    PrefixAndTags {
        /// The key prefix.
        prefix: String,
        /// The required tags.
        tags: Vec<Tag>,
    },
}

impl RuleScope {
    /// Derive the scope from whichever optional inputs are present.
    #[must_use]
    pub fn from_parts(prefix: Option<String>, tags: Vec<Tag>) -> Self {
        match (prefix, tags.is_empty()) {
            (None, true) => Self::All,
            (Some(prefix), true) => Self::Prefix(prefix),
            (None, false) => Self::Tags(tags),
            (Some(prefix), false) => Self::PrefixAndTags { prefix, tags },
        }
    }

    /// Encode the scope as the service's filter shape.
    ///
    /// A single tag encodes as the `Tag` arm, multiple tags as the `And`
    /// conjunction; [`RuleScope::All`] encodes as no filter at all.
    #[must_use]
    pub fn into_filter(self) -> Option<RuleFilter> {
        match self {
            Self::All => None,
            Self::Prefix(prefix) => Some(RuleFilter {
                prefix: Some(prefix),
                ..RuleFilter::default()
            }),
            Self::Tags(mut tags) => {
                if tags.len() == 1 {
                    Some(RuleFilter {
                        tag: tags.pop(),
                        ..RuleFilter::default()
                    })
                } else {
                    Some(RuleFilter {
                        and: Some(RuleFilterAnd { prefix: None, tags }),
                        ..RuleFilter::default()
                    })
                }
            }
            Self::PrefixAndTags { prefix, tags } => Some(RuleFilter {
                and: Some(RuleFilterAnd {
                    prefix: Some(prefix),
                    tags,
                }),
                ..RuleFilter::default()
            }),
        }
    }

    fn tags(&self) -> &[Tag] {
        match self {
            Self::All | Self::Prefix(_) => &[],
            Self::Tags(tags) | Self::PrefixAndTags { tags, .. } => tags,
        }
    }
}

// ---------------------------------------------------------------------------
// Rule builder
// ---------------------------------------------------------------------------

/// Builder for one lifecycle rule.
///
/// # Examples
///
/// ```
/// use bucketeer_core::lifecycle::{LifecycleRuleBuilder, RuleScope};
/// use bucketeer_model::StorageClass;
///
/// let rule = LifecycleRuleBuilder::new("archive-sim-data")
///     .transition(StorageClass::StandardIa, 30)
///     .expire_after(90)
///     .scope(RuleScope::Prefix("sim/".to_owned()))
///     .build()
///     .unwrap();
/// assert_eq!(rule.transitions.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LifecycleRuleBuilder {
    id: String,
    status: RuleStatus,
    scope: RuleScope,
    transition: Option<(StorageClass, i32)>,
    expiration_days: Option<i32>,
    noncurrent_transition: Option<(StorageClass, i32)>,
    noncurrent_expiration_days: Option<i32>,
    newer_noncurrent_versions: Option<i32>,
    abort_incomplete_days: i32,
}

impl LifecycleRuleBuilder {
    /// Start a rule with the given identifier. The rule is enabled, applies
    /// to all objects, and cleans up abandoned multipart uploads after one
    /// day unless configured otherwise.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: RuleStatus::Enabled,
            scope: RuleScope::All,
            transition: None,
            expiration_days: None,
            noncurrent_transition: None,
            noncurrent_expiration_days: None,
            newer_noncurrent_versions: None,
            abort_incomplete_days: DEFAULT_ABORT_INCOMPLETE_DAYS,
        }
    }

    /// Disable the rule without removing it.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.status = RuleStatus::Disabled;
        self
    }

    /// Transition current versions to `storage_class` after `days`.
    #[must_use]
    pub fn transition(mut self, storage_class: StorageClass, days: i32) -> Self {
        self.transition = Some((storage_class, days));
        self
    }

    /// Expire current versions after `days`.
    #[must_use]
    pub fn expire_after(mut self, days: i32) -> Self {
        self.expiration_days = Some(days);
        self
    }

    /// Transition noncurrent versions to `storage_class` after `days` of
    /// noncurrency. Only meaningful on versioned buckets.
    #[must_use]
    pub fn noncurrent_transition(mut self, storage_class: StorageClass, days: i32) -> Self {
        self.noncurrent_transition = Some((storage_class, days));
        self
    }

    /// Expire noncurrent versions after `days` of noncurrency.
    #[must_use]
    pub fn noncurrent_expire_after(mut self, days: i32) -> Self {
        self.noncurrent_expiration_days = Some(days);
        self
    }

    /// Retain this many newer noncurrent versions past their expiration
    /// (0-100).
    #[must_use]
    pub fn keep_newer_noncurrent_versions(mut self, count: i32) -> Self {
        self.newer_noncurrent_versions = Some(count);
        self
    }

    /// Override the abandoned-multipart-upload cleanup delay.
    #[must_use]
    pub fn abort_incomplete_after(mut self, days: i32) -> Self {
        self.abort_incomplete_days = days;
        self
    }

    /// Restrict the rule to a subset of objects.
    #[must_use]
    pub fn scope(mut self, scope: RuleScope) -> Self {
        self.scope = scope;
        self
    }

    /// Assemble the rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when a day count is not positive
    /// or `newer_noncurrent_versions` falls outside 0-100, and
    /// [`Error::InvalidTag`] when the scope carries an invalid tag set.
    pub fn build(self) -> Result<LifecycleRule> {
        for days in [
            self.transition.map(|(_, d)| d),
            self.expiration_days,
            self.noncurrent_transition.map(|(_, d)| d),
            self.noncurrent_expiration_days,
            Some(self.abort_incomplete_days),
        ]
        .into_iter()
        .flatten()
        {
            if days < 1 {
                return Err(Error::InvalidArgument {
                    message: format!("Lifecycle day counts must be positive, got {days}"),
                });
            }
        }

        if let Some(count) = self.newer_noncurrent_versions {
            if !(0..=MAX_NEWER_NONCURRENT_VERSIONS).contains(&count) {
                return Err(Error::InvalidArgument {
                    message: format!(
                        "newer_noncurrent_versions must be between 0 and {MAX_NEWER_NONCURRENT_VERSIONS}, got {count}"
                    ),
                });
            }
        }

        validate_tags(self.scope.tags())?;

        Ok(LifecycleRule {
            id: Some(self.id),
            status: self.status,
            filter: self.scope.into_filter(),
            transitions: self
                .transition
                .map(|(storage_class, days)| Transition {
                    days,
                    storage_class,
                })
                .into_iter()
                .collect(),
            expiration: self
                .expiration_days
                .map(|days| LifecycleExpiration { days }),
            noncurrent_version_transitions: self
                .noncurrent_transition
                .map(|(storage_class, days)| NoncurrentVersionTransition {
                    noncurrent_days: days,
                    storage_class,
                })
                .into_iter()
                .collect(),
            noncurrent_version_expiration: self.noncurrent_expiration_days.map(|days| {
                NoncurrentVersionExpiration {
                    noncurrent_days: days,
                    newer_noncurrent_versions: self.newer_noncurrent_versions,
                }
            }),
            abort_incomplete_multipart_upload: Some(AbortIncompleteMultipartUpload {
                days_after_initiation: self.abort_incomplete_days,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // Scope derivation
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_derive_scope_from_present_inputs() {
        assert_eq!(RuleScope::from_parts(None, vec![]), RuleScope::All);
        assert_eq!(
            RuleScope::from_parts(Some("logs/".to_owned()), vec![]),
            RuleScope::Prefix("logs/".to_owned())
        );
        let tags = vec![Tag::new("tier", "cold")];
        assert_eq!(
            RuleScope::from_parts(None, tags.clone()),
            RuleScope::Tags(tags.clone())
        );
        assert_eq!(
            RuleScope::from_parts(Some("logs/".to_owned()), tags.clone()),
            RuleScope::PrefixAndTags {
                prefix: "logs/".to_owned(),
                tags,
            }
        );
    }

    #[test]
    fn test_should_encode_all_scope_as_no_filter() {
        assert_eq!(RuleScope::All.into_filter(), None);
    }

    #[test]
    fn test_should_encode_single_tag_scope_as_tag_arm() {
        let filter = RuleScope::Tags(vec![Tag::new("tier", "cold")])
            .into_filter()
            .unwrap();
        assert_eq!(filter.tag, Some(Tag::new("tier", "cold")));
        assert!(filter.and.is_none());
        assert!(filter.prefix.is_none());
    }

    #[test]
    fn test_should_encode_multiple_tags_as_conjunction() {
        let tags = vec![Tag::new("tier", "cold"), Tag::new("kind", "log")];
        let filter = RuleScope::Tags(tags.clone()).into_filter().unwrap();
        let and = filter.and.unwrap();
        assert_eq!(and.tags, tags);
        assert!(and.prefix.is_none());
    }

    #[test]
    fn test_should_encode_prefix_and_tags_as_conjunction() {
        let filter = RuleScope::PrefixAndTags {
            prefix: "logs/".to_owned(),
            tags: vec![Tag::new("tier", "cold")],
        }
        .into_filter()
        .unwrap();
        let and = filter.and.unwrap();
        assert_eq!(and.prefix.as_deref(), Some("logs/"));
        assert_eq!(and.tags.len(), 1);
    }

    // -----------------------------------------------------------------------
    // Rule building
    // -----------------------------------------------------------------------

    #[test]
    fn test_should_build_rule_with_defaults() {
        let rule = LifecycleRuleBuilder::new("default-rule").build().unwrap();
        assert_eq!(rule.id.as_deref(), Some("default-rule"));
        assert_eq!(rule.status, RuleStatus::Enabled);
        assert!(rule.filter.is_none());
        assert_eq!(
            rule.abort_incomplete_multipart_upload.unwrap().days_after_initiation,
            1
        );
    }

    #[test]
    fn test_should_build_full_rule() {
        let rule = LifecycleRuleBuilder::new("archive")
            .transition(StorageClass::StandardIa, 30)
            .expire_after(90)
            .noncurrent_transition(StorageClass::Glacier, 14)
            .noncurrent_expire_after(60)
            .keep_newer_noncurrent_versions(3)
            .scope(RuleScope::Prefix("sim/".to_owned()))
            .build()
            .unwrap();

        assert_eq!(rule.transitions[0].storage_class, StorageClass::StandardIa);
        assert_eq!(rule.expiration.unwrap().days, 90);
        assert_eq!(rule.noncurrent_version_transitions[0].noncurrent_days, 14);
        let noncurrent = rule.noncurrent_version_expiration.unwrap();
        assert_eq!(noncurrent.noncurrent_days, 60);
        assert_eq!(noncurrent.newer_noncurrent_versions, Some(3));
        assert_eq!(rule.filter.unwrap().prefix.as_deref(), Some("sim/"));
    }

    #[test]
    fn test_should_reject_nonpositive_day_counts() {
        assert!(
            LifecycleRuleBuilder::new("r")
                .transition(StorageClass::Glacier, 0)
                .build()
                .is_err()
        );
        assert!(
            LifecycleRuleBuilder::new("r")
                .expire_after(-1)
                .build()
                .is_err()
        );
    }

    #[test]
    fn test_should_reject_out_of_range_newer_noncurrent_versions() {
        assert!(
            LifecycleRuleBuilder::new("r")
                .noncurrent_expire_after(30)
                .keep_newer_noncurrent_versions(101)
                .build()
                .is_err()
        );
        assert!(
            LifecycleRuleBuilder::new("r")
                .noncurrent_expire_after(30)
                .keep_newer_noncurrent_versions(100)
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_should_reject_scope_with_duplicate_tag_keys() {
        let scope = RuleScope::Tags(vec![Tag::new("a", "1"), Tag::new("a", "2")]);
        assert!(LifecycleRuleBuilder::new("r").scope(scope).build().is_err());
    }
}
