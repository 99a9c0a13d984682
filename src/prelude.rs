//! Convenience reexport of common members.

pub use crate::auth::B2Authorization;
pub use crate::auth::B2Credentials;
pub use crate::buckets::Bucket;
pub use crate::client::{ApiCall, B2Client, Transport};
pub use crate::config::Config;
pub use crate::files::upload::{UploadUrl, UploadedFile};
pub use crate::upload::upload_file;
pub use crate::B2Error;
