//! High-level operations over an [`crate::ObjectStore`].
//!
//! Each operation is a free async function: one or more provider
//! round-trips plus local matching or request construction. Nothing is
//! cached between calls; reusing one connected store handle across a loop
//! of calls is purely a connection optimization.

pub mod create;
pub mod delete;
pub mod find;
pub mod lifecycle;
pub mod logging;
pub mod tagging;

pub use create::{create_bucket, put_object};
pub use delete::delete_objects_by_prefix;
pub use find::{find_buckets_by_name_date, find_buckets_by_tags, find_objects_by_tags};
pub use lifecycle::append_bucket_lifecycle;
pub use logging::{
    access_logging, disable_access_logging, enable_access_logging, grant_logging_permissions,
};
pub use tagging::{add_tags_to_bucket, add_tags_to_object};
