//! The settings of a single upload.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::action::Runner;
use crate::auth::B2Credentials;

/// Everything needed to perform one upload.
///
/// This is read once when the program starts and then passed by reference. It can also
/// be loaded from a json document using the field names below.
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub key_id: String,
    pub application_key: String,
    /// The mime type sent with the file.
    pub content_type: String,
    /// The name of the bucket to upload into.
    pub bucket: String,
    /// Path of the local file.
    pub file: PathBuf,
    /// The name of the file on backblaze, before encoding.
    pub upload_key: String,
}

impl Config {
    /// Read the configuration from the inputs of the runner.
    ///
    /// Missing inputs are read as empty strings.
    pub fn from_inputs(runner: &Runner) -> Config {
        Config {
            key_id: runner.input("keyId"),
            application_key: runner.input("applicationKey"),
            content_type: runner.input("contentType"),
            bucket: runner.input("bucket"),
            file: PathBuf::from(runner.input("file")),
            upload_key: runner.input("uploadKey"),
        }
    }
    /// The credentials used to authorize the account.
    pub fn credentials(&self) -> B2Credentials {
        B2Credentials::new(&self.key_id, &self.application_key)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("key_id", &self.key_id)
            .field("application_key", &"<redacted>")
            .field("content_type", &self.content_type)
            .field("bucket", &self.bucket)
            .field("file", &self.file)
            .field("upload_key", &self.upload_key)
            .finish()
    }
}
