//! This module defines the bucket lookup performed before an upload.

use serde::Deserialize;

mod list_buckets;
pub use self::list_buckets::ListBuckets;

/// A bucket on backblaze.
///
/// Only the id is needed to request an upload url.
#[derive(Deserialize, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub bucket_id: String,
    #[serde(default)]
    pub bucket_name: Option<String>,
}
