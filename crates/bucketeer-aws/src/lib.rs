//! `aws-sdk-s3` backend for the bucketeer helpers.
//!
//! [`AwsStore`] implements [`bucketeer_core::ObjectStore`] over a connected
//! [`aws_sdk_s3::Client`], translating between the helper's model types and
//! the SDK's, and mapping SDK service errors onto
//! [`bucketeer_core::Error`] by error code. Pagination of listings happens
//! here; the helpers see complete result sets.

pub mod convert;
mod store;

pub use store::{AwsStore, connect, connect_with_region};
