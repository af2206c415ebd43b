//! Bucket policy construction for server-access-log delivery.

use std::collections::BTreeMap;

use bucketeer_model::{AccountId, Effect, PolicyCondition, PolicyDocument, PolicyStatement, Principal};

/// The service principal that delivers server access logs.
pub const LOGGING_SERVICE_PRINCIPAL: &str = "logging.s3.amazonaws.com";

/// Statement ID used for the log-delivery grant.
const LOG_DELIVERY_SID: &str = "S3ServerAccessLogsPolicy";

/// Build the bucket policy that lets a bucket receive server access logs.
///
/// Grants `s3:PutObject` to the logging service principal on every path in
/// `logging_bucket`, conditioned on `aws:SourceAccount` matching one of
/// `source_accounts`. Note the service documentation leaves ambiguous
/// whether the matched account is the logging bucket's owner or the logged
/// buckets' owners — pass whichever account list applies to your setup; the
/// condition is emitted verbatim. An optional `source_bucket_prefix` adds an
/// `aws:SourceArn` condition restricting which source buckets may deliver
/// (a trailing `*` wildcard covers multiple buckets sharing the prefix).
///
/// # Examples
///
/// ```
/// use bucketeer_core::policy::logging_delivery_policy;
/// use bucketeer_model::AccountId;
///
/// let account = AccountId::new("123456789012").unwrap();
/// let policy = logging_delivery_policy("log-sink", &[account], None);
/// assert_eq!(policy.statement.len(), 1);
/// assert_eq!(policy.statement[0].resource, "arn:aws:s3:::log-sink/*");
/// ```
#[must_use]
pub fn logging_delivery_policy(
    logging_bucket: &str,
    source_accounts: &[AccountId],
    source_bucket_prefix: Option<&str>,
) -> PolicyDocument {
    let mut string_equals = BTreeMap::new();
    string_equals.insert(
        "aws:SourceAccount".to_owned(),
        source_accounts
            .iter()
            .map(|account| account.as_str().to_owned())
            .collect(),
    );

    let arn_like = source_bucket_prefix.map(|prefix| {
        let mut arn_like = BTreeMap::new();
        arn_like.insert(
            "aws:SourceArn".to_owned(),
            format!("arn:aws:s3:::{prefix}*"),
        );
        arn_like
    });

    PolicyDocument::new(vec![PolicyStatement {
        sid: Some(LOG_DELIVERY_SID.to_owned()),
        effect: Effect::Allow,
        principal: Some(Principal::service(LOGGING_SERVICE_PRINCIPAL)),
        action: vec!["s3:PutObject".to_owned()],
        resource: format!("arn:aws:s3:::{logging_bucket}/*"),
        condition: Some(PolicyCondition {
            string_equals: Some(string_equals),
            arn_like,
        }),
    }])
}
