//! Upload a single file to a [Backblaze B2][1] bucket from a CI pipeline step.
//!
//! The upload is performed by [`upload_file`], which runs the four api calls needed for
//! a simple upload in order:
//!
//! 1. [`b2_authorize_account`] using the [`B2Credentials`],
//! 2. [`b2_list_buckets`] to turn the bucket name into a bucket id,
//! 3. [`b2_get_upload_url`] to obtain an [`UploadUrl`],
//! 4. [`b2_upload_file`] with the file contents and their sha1.
//!
//! The api calls are executed by a [`B2Client`], which can run on top of any
//! [`Transport`]. The [`action`] module contains the glue for reading inputs and
//! publishing outputs on a GitHub Actions style runner.
//!
//! [1]: https://www.backblaze.com/b2/docs/
//! [`upload_file`]: upload/fn.upload_file.html
//! [`b2_authorize_account`]: https://www.backblaze.com/b2/docs/b2_authorize_account.html
//! [`b2_list_buckets`]: https://www.backblaze.com/b2/docs/b2_list_buckets.html
//! [`b2_get_upload_url`]: https://www.backblaze.com/b2/docs/b2_get_upload_url.html
//! [`b2_upload_file`]: https://www.backblaze.com/b2/docs/b2_upload_file.html
//! [`B2Credentials`]: auth/struct.B2Credentials.html
//! [`UploadUrl`]: files/upload/struct.UploadUrl.html
//! [`B2Client`]: client/struct.B2Client.html
//! [`Transport`]: client/trait.Transport.html
//! [`action`]: action/index.html

use std::path::PathBuf;

use http::header::InvalidHeaderValue;
use http::uri::InvalidUri;
use http::StatusCode;
use serde::Deserialize;

pub mod action;
pub mod auth;
pub mod b2_future;
pub mod buckets;
pub mod client;
pub mod config;
pub mod encoding;
pub mod files;
pub mod prelude;
pub mod upload;

/// The error body returned by backblaze when an api call fails.
#[derive(Deserialize, Clone, Debug, Eq, PartialEq)]
pub struct B2ErrorMessage {
    pub status: u16,
    pub code: String,
    pub message: String,
}

/// An error that aborts the upload.
///
/// Only the `Display` text of the error is reported to the runner.
#[derive(Debug, thiserror::Error)]
pub enum B2Error {
    /// The server answered with a status outside `200..=299`.
    #[error("Request to {url} failed with status {}{}", .status.as_u16(), detail(.message))]
    Status {
        url: String,
        status: StatusCode,
        message: Option<B2ErrorMessage>,
    },
    /// The listing did not contain the requested bucket.
    #[error("No bucket named {0:?} is visible to this key")]
    BucketNotFound(String),
    /// The local file could not be read.
    #[error("Unable to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The outputs could not be published.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Hyper(#[from] hyper::Error),
    #[error(transparent)]
    Http(#[from] http::Error),
    #[error(transparent)]
    InvalidUri(#[from] InvalidUri),
    #[error(transparent)]
    InvalidHeader(#[from] InvalidHeaderValue),
}

impl B2Error {
    /// The http status of the failed request, if the error came from the server.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            B2Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
    /// Returns `true` if backblaze rejected the key id or application key.
    pub fn is_wrong_credentials(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

fn detail(message: &Option<B2ErrorMessage>) -> String {
    match message {
        Some(msg) => format!(": {} ({})", msg.code, msg.message),
        None => String::new(),
    }
}
