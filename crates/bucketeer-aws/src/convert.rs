//! Conversions between the helper model types and the SDK's.

use anyhow::Context;
use aws_sdk_s3::types as sdk;
use bucketeer_core::{Error, Result};
use bucketeer_model::{
    AbortIncompleteMultipartUpload, LifecycleExpiration, LifecycleRule, LoggingEnabled,
    NoncurrentVersionExpiration, NoncurrentVersionTransition, ObjectIdentifier, RuleFilter,
    RuleFilterAnd, RuleStatus, StorageClass, Tag, Transition,
};

/// Convert a model tag to the SDK's.
///
/// # Errors
///
/// Returns [`Error::Internal`] if the SDK builder rejects the tag.
pub fn to_sdk_tag(tag: &Tag) -> Result<sdk::Tag> {
    sdk::Tag::builder()
        .key(&tag.key)
        .value(&tag.value)
        .build()
        .context("building SDK tag")
        .map_err(Error::Internal)
}

/// Convert an SDK tag to the model's.
#[must_use]
pub fn from_sdk_tag(tag: &sdk::Tag) -> Tag {
    Tag::new(tag.key(), tag.value())
}

/// Convert a model `(key, version)` pair to the SDK's.
///
/// # Errors
///
/// Returns [`Error::Internal`] if the SDK builder rejects the identifier.
pub fn to_sdk_object_identifier(id: &ObjectIdentifier) -> Result<sdk::ObjectIdentifier> {
    sdk::ObjectIdentifier::builder()
        .key(&id.key)
        .set_version_id(id.version_id.clone())
        .build()
        .context("building SDK object identifier")
        .map_err(Error::Internal)
}

fn to_sdk_transition_storage_class(class: StorageClass) -> sdk::TransitionStorageClass {
    sdk::TransitionStorageClass::from(class.as_str())
}

fn parse_storage_class(value: &str) -> Result<StorageClass> {
    value.parse().map_err(Error::from)
}

/// Convert a model lifecycle rule to the SDK's.
///
/// # Errors
///
/// Returns [`Error::Internal`] if an SDK builder rejects the rule.
pub fn to_sdk_lifecycle_rule(rule: &LifecycleRule) -> Result<sdk::LifecycleRule> {
    let filter = rule.filter.as_ref().map(to_sdk_rule_filter).transpose()?;

    let transitions: Vec<sdk::Transition> = rule
        .transitions
        .iter()
        .map(|t| {
            sdk::Transition::builder()
                .days(t.days)
                .storage_class(to_sdk_transition_storage_class(t.storage_class))
                .build()
        })
        .collect();

    let noncurrent_transitions: Vec<sdk::NoncurrentVersionTransition> = rule
        .noncurrent_version_transitions
        .iter()
        .map(|t| {
            sdk::NoncurrentVersionTransition::builder()
                .noncurrent_days(t.noncurrent_days)
                .storage_class(to_sdk_transition_storage_class(t.storage_class))
                .build()
        })
        .collect();

    sdk::LifecycleRule::builder()
        .set_id(rule.id.clone())
        .status(sdk::ExpirationStatus::from(rule.status.as_str()))
        .set_filter(filter)
        .set_transitions((!transitions.is_empty()).then_some(transitions))
        .set_expiration(
            rule.expiration
                .as_ref()
                .map(|e| sdk::LifecycleExpiration::builder().days(e.days).build()),
        )
        .set_noncurrent_version_transitions(
            (!noncurrent_transitions.is_empty()).then_some(noncurrent_transitions),
        )
        .set_noncurrent_version_expiration(rule.noncurrent_version_expiration.as_ref().map(|e| {
            sdk::NoncurrentVersionExpiration::builder()
                .noncurrent_days(e.noncurrent_days)
                .set_newer_noncurrent_versions(e.newer_noncurrent_versions)
                .build()
        }))
        .set_abort_incomplete_multipart_upload(rule.abort_incomplete_multipart_upload.as_ref().map(
            |a| {
                sdk::AbortIncompleteMultipartUpload::builder()
                    .days_after_initiation(a.days_after_initiation)
                    .build()
            },
        ))
        .build()
        .context("building SDK lifecycle rule")
        .map_err(Error::Internal)
}

fn to_sdk_rule_filter(filter: &RuleFilter) -> Result<sdk::LifecycleRuleFilter> {
    let and = filter
        .and
        .as_ref()
        .map(|and| -> Result<sdk::LifecycleRuleAndOperator> {
            let tags = and.tags.iter().map(to_sdk_tag).collect::<Result<Vec<_>>>()?;
            Ok(sdk::LifecycleRuleAndOperator::builder()
                .set_prefix(and.prefix.clone())
                .set_tags((!tags.is_empty()).then_some(tags))
                .build())
        })
        .transpose()?;

    Ok(sdk::LifecycleRuleFilter::builder()
        .set_prefix(filter.prefix.clone())
        .set_tag(filter.tag.as_ref().map(to_sdk_tag).transpose()?)
        .set_and(and)
        .build())
}

/// Convert an SDK lifecycle rule to the model's.
///
/// # Errors
///
/// Returns [`Error::InvalidStorageClass`] when the service reports a
/// storage class this model does not know.
pub fn from_sdk_lifecycle_rule(rule: &sdk::LifecycleRule) -> Result<LifecycleRule> {
    let filter = rule.filter().map(from_sdk_rule_filter);

    let transitions = rule
        .transitions()
        .iter()
        .map(|t| {
            Ok(Transition {
                days: t.days().unwrap_or_default(),
                storage_class: parse_storage_class(
                    t.storage_class().map_or("STANDARD", sdk::TransitionStorageClass::as_str),
                )?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let noncurrent_version_transitions = rule
        .noncurrent_version_transitions()
        .iter()
        .map(|t| {
            Ok(NoncurrentVersionTransition {
                noncurrent_days: t.noncurrent_days().unwrap_or_default(),
                storage_class: parse_storage_class(
                    t.storage_class().map_or("STANDARD", sdk::TransitionStorageClass::as_str),
                )?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LifecycleRule {
        id: rule.id().map(ToOwned::to_owned),
        status: match rule.status().as_str() {
            "Disabled" => RuleStatus::Disabled,
            _ => RuleStatus::Enabled,
        },
        filter,
        transitions,
        expiration: rule.expiration().map(|e| LifecycleExpiration {
            days: e.days().unwrap_or_default(),
        }),
        noncurrent_version_transitions,
        noncurrent_version_expiration: rule.noncurrent_version_expiration().map(|e| {
            NoncurrentVersionExpiration {
                noncurrent_days: e.noncurrent_days().unwrap_or_default(),
                newer_noncurrent_versions: e.newer_noncurrent_versions(),
            }
        }),
        abort_incomplete_multipart_upload: rule.abort_incomplete_multipart_upload().map(|a| {
            AbortIncompleteMultipartUpload {
                days_after_initiation: a.days_after_initiation().unwrap_or_default(),
            }
        }),
    })
}

fn from_sdk_rule_filter(filter: &sdk::LifecycleRuleFilter) -> RuleFilter {
    RuleFilter {
        prefix: filter.prefix().map(ToOwned::to_owned),
        tag: filter.tag().map(from_sdk_tag),
        and: filter.and().map(|and| RuleFilterAnd {
            prefix: and.prefix().map(ToOwned::to_owned),
            tags: and.tags().iter().map(from_sdk_tag).collect(),
        }),
    }
}

/// Convert a model logging target to the SDK's.
///
/// # Errors
///
/// Returns [`Error::Internal`] if the SDK builder rejects the target.
pub fn to_sdk_logging_enabled(enabled: &LoggingEnabled) -> Result<sdk::LoggingEnabled> {
    sdk::LoggingEnabled::builder()
        .target_bucket(&enabled.target_bucket)
        .target_prefix(&enabled.target_prefix)
        .build()
        .context("building SDK logging target")
        .map_err(Error::Internal)
}

/// Convert an SDK logging target to the model's.
#[must_use]
pub fn from_sdk_logging_enabled(enabled: &sdk::LoggingEnabled) -> LoggingEnabled {
    LoggingEnabled {
        target_bucket: enabled.target_bucket().to_owned(),
        target_prefix: enabled.target_prefix().to_owned(),
    }
}

/// Convert a model storage class to the SDK's put-object storage class.
#[must_use]
pub fn storage_class_for_put(class: StorageClass) -> sdk::StorageClass {
    sdk::StorageClass::from(class.as_str())
}

#[cfg(test)]
mod tests {
    use bucketeer_core::lifecycle::{LifecycleRuleBuilder, RuleScope};

    use super::*;

    #[test]
    fn test_should_round_trip_tag() {
        let tag = Tag::new("env", "prod");
        let sdk_tag = to_sdk_tag(&tag).unwrap();
        assert_eq!(from_sdk_tag(&sdk_tag), tag);
    }

    #[test]
    fn test_should_round_trip_lifecycle_rule() {
        let rule = LifecycleRuleBuilder::new("archive")
            .transition(StorageClass::StandardIa, 30)
            .expire_after(90)
            .noncurrent_expire_after(60)
            .keep_newer_noncurrent_versions(2)
            .scope(RuleScope::PrefixAndTags {
                prefix: "sim/".to_owned(),
                tags: vec![Tag::new("tier", "cold")],
            })
            .build()
            .unwrap();

        let sdk_rule = to_sdk_lifecycle_rule(&rule).unwrap();
        let back = from_sdk_lifecycle_rule(&sdk_rule).unwrap();
        assert_eq!(back, rule);
    }

    #[test]
    fn test_should_round_trip_logging_target() {
        let enabled = LoggingEnabled {
            target_bucket: "bread".to_owned(),
            target_prefix: "melon/".to_owned(),
        };
        let sdk_enabled = to_sdk_logging_enabled(&enabled).unwrap();
        assert_eq!(from_sdk_logging_enabled(&sdk_enabled), enabled);
    }

    #[test]
    fn test_should_reject_unknown_storage_class_from_service() {
        let sdk_rule = sdk::LifecycleRule::builder()
            .status(sdk::ExpirationStatus::Enabled)
            .set_transitions(Some(vec![
                sdk::Transition::builder()
                    .days(30)
                    .storage_class(sdk::TransitionStorageClass::from("FROZEN"))
                    .build(),
            ]))
            .build()
            .unwrap();

        let err = from_sdk_lifecycle_rule(&sdk_rule).unwrap_err();
        assert!(matches!(err, Error::InvalidStorageClass { .. }));
    }

    #[test]
    fn test_should_keep_version_id_in_object_identifier() {
        let id = ObjectIdentifier::versioned("key", "v1");
        let sdk_id = to_sdk_object_identifier(&id).unwrap();
        assert_eq!(sdk_id.key(), "key");
        assert_eq!(sdk_id.version_id(), Some("v1"));
    }
}
