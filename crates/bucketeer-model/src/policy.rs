//! Bucket policy document types.
//!
//! A bucket policy is a JSON document; these structs serialize to the exact
//! wire shape the service expects, so a policy can be built as typed values
//! and submitted as a string.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The policy language version understood by the service.
pub const POLICY_VERSION: &str = "2012-10-17";

/// Whether a statement allows or denies the listed actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// The entity a statement applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Principal {
    /// A service principal such as `logging.s3.amazonaws.com`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// An account or role principal ARN.
    #[serde(rename = "AWS", skip_serializing_if = "Option::is_none")]
    pub aws: Option<String>,
}

impl Principal {
    /// A service principal.
    pub fn service(name: impl Into<String>) -> Self {
        Self {
            service: Some(name.into()),
            aws: None,
        }
    }
}

/// Statement conditions, keyed by condition operator.
///
/// `BTreeMap` keeps serialization deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyCondition {
    /// Exact string matching, e.g. `{"aws:SourceAccount": [...]}`.
    #[serde(rename = "StringEquals", skip_serializing_if = "Option::is_none")]
    pub string_equals: Option<BTreeMap<String, Vec<String>>>,
    /// ARN pattern matching, e.g. `{"aws:SourceArn": "arn:aws:s3:::prefix*"}`.
    #[serde(rename = "ArnLike", skip_serializing_if = "Option::is_none")]
    pub arn_like: Option<BTreeMap<String, String>>,
}

impl PolicyCondition {
    /// Whether no condition operator is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.string_equals.is_none() && self.arn_like.is_none()
    }
}

/// One statement within a policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyStatement {
    /// Optional statement identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    pub effect: Effect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    /// Actions the statement covers, e.g. `s3:PutObject`.
    pub action: Vec<String>,
    /// The resource ARN the statement covers.
    pub resource: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<PolicyCondition>,
}

/// A complete bucket policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    pub statement: Vec<PolicyStatement>,
}

impl PolicyDocument {
    /// A document with the current policy version and the given statements.
    #[must_use]
    pub fn new(statement: Vec<PolicyStatement>) -> Self {
        Self {
            version: POLICY_VERSION.to_owned(),
            statement,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_serialize_statement_in_wire_shape() {
        let statement = PolicyStatement {
            sid: Some("AllowPut".to_owned()),
            effect: Effect::Allow,
            principal: Some(Principal::service("logging.s3.amazonaws.com")),
            action: vec!["s3:PutObject".to_owned()],
            resource: "arn:aws:s3:::logs/*".to_owned(),
            condition: None,
        };
        let json = serde_json::to_value(PolicyDocument::new(vec![statement])).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Sid": "AllowPut",
                    "Effect": "Allow",
                    "Principal": {"Service": "logging.s3.amazonaws.com"},
                    "Action": ["s3:PutObject"],
                    "Resource": "arn:aws:s3:::logs/*",
                }],
            })
        );
    }

    #[test]
    fn test_should_round_trip_policy_document() {
        let mut string_equals = BTreeMap::new();
        string_equals.insert(
            "aws:SourceAccount".to_owned(),
            vec!["123456789012".to_owned()],
        );
        let doc = PolicyDocument::new(vec![PolicyStatement {
            sid: None,
            effect: Effect::Deny,
            principal: None,
            action: vec!["s3:*".to_owned()],
            resource: "arn:aws:s3:::bucket/*".to_owned(),
            condition: Some(PolicyCondition {
                string_equals: Some(string_equals),
                arn_like: None,
            }),
        }]);
        let text = serde_json::to_string(&doc).unwrap();
        let parsed: PolicyDocument = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, doc);
    }
}
