//! Upload files to backblaze.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::B2Error;
use http::header::HeaderValue;

mod get_upload_url;
mod upload_file;

pub use self::get_upload_url::GetUploadUrl;
pub use self::upload_file::UploadFile;

/// An url that can be used to upload files to backblaze.
#[derive(Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadUrl {
    #[serde(default)]
    pub bucket_id: Option<String>,
    pub upload_url: String,
    pub authorization_token: String,
}
impl UploadUrl {
    fn auth_token(&self) -> Result<HeaderValue, B2Error> {
        let mut header = HeaderValue::from_str(&self.authorization_token)?;
        header.set_sensitive(true);
        Ok(header)
    }
}
impl fmt::Debug for UploadUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadUrl")
            .field("bucket_id", &self.bucket_id)
            .field("upload_url", &self.upload_url)
            .field("authorization_token", &"<redacted>")
            .finish()
    }
}

/// The file record returned by backblaze after an upload.
///
/// Every field is kept as the json value the server sent, so that it can be passed on
/// unchanged. A field that is missing from the response, or is `null`, is `None`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadedFile {
    pub bucket_id: Option<Value>,
    pub content_length: Option<Value>,
    pub content_sha1: Option<Value>,
    pub content_md5: Option<Value>,
    pub content_type: Option<Value>,
    pub file_id: Option<Value>,
    pub file_info: Option<Value>,
    pub file_name: Option<Value>,
    pub file_retention: Option<Value>,
    pub legal_hold: Option<Value>,
    pub server_side_encryption: Option<Value>,
}
impl UploadedFile {
    /// The names of the fields, as they appear in the server response.
    pub const FIELDS: [&'static str; 11] = [
        "bucketId",
        "contentLength",
        "contentSha1",
        "contentMd5",
        "contentType",
        "fileId",
        "fileInfo",
        "fileName",
        "fileRetention",
        "legalHold",
        "serverSideEncryption",
    ];
    /// The fields paired with their names, in the order of [`FIELDS`].
    ///
    /// [`FIELDS`]: #associatedconstant.FIELDS
    pub fn outputs(&self) -> [(&'static str, Option<&Value>); 11] {
        let f = Self::FIELDS;
        [
            (f[0], self.bucket_id.as_ref()),
            (f[1], self.content_length.as_ref()),
            (f[2], self.content_sha1.as_ref()),
            (f[3], self.content_md5.as_ref()),
            (f[4], self.content_type.as_ref()),
            (f[5], self.file_id.as_ref()),
            (f[6], self.file_info.as_ref()),
            (f[7], self.file_name.as_ref()),
            (f[8], self.file_retention.as_ref()),
            (f[9], self.legal_hold.as_ref()),
            (f[10], self.server_side_encryption.as_ref()),
        ]
    }
}

/// Compute the sha1 of the data as 40 lowercase hex characters.
pub fn sha1_hex(data: &[u8]) -> String {
    let mut m = sha1::Sha1::new();
    m.update(data);
    m.digest().to_string()
}

#[cfg(test)]
mod tests {
    use super::{sha1_hex, UploadedFile};
    use serde_json::json;

    #[test]
    fn sha1_of_empty_input() {
        assert_eq!(sha1_hex(b""), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn sha1_is_lowercase_hex() {
        let sha1 = sha1_hex(b"abc");
        assert_eq!(sha1, "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(sha1.len(), 40);
    }

    #[test]
    fn missing_and_null_fields_are_none() {
        let file: UploadedFile = serde_json::from_value(json!({
            "accountId": "acc",
            "action": "upload",
            "bucketId": "b1",
            "contentLength": 3,
            "contentMd5": null,
            "fileInfo": {"src_last_modified_millis": "1"},
            "uploadTimestamp": 1600000000000u64
        }))
        .unwrap();
        let outputs = file.outputs();
        assert_eq!(outputs[0], ("bucketId", Some(&json!("b1"))));
        assert_eq!(outputs[1], ("contentLength", Some(&json!(3))));
        assert_eq!(outputs[3], ("contentMd5", None));
        assert_eq!(
            outputs[6],
            ("fileInfo", Some(&json!({"src_last_modified_millis": "1"})))
        );
        assert_eq!(outputs[9], ("legalHold", None));
        let names: Vec<&str> = outputs.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, UploadedFile::FIELDS);
    }
}
