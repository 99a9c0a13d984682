use crate::files::upload::{UploadUrl, UploadedFile};

use crate::client::ApiCall;
use crate::B2Error;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use http::method::Method;
use http::uri::Uri;
use hyper::Body;
use std::convert::TryFrom;

const FILE_NAME: HeaderName = HeaderName::from_static("x-bz-file-name");
const CONTENT_SHA1: HeaderName = HeaderName::from_static("x-bz-content-sha1");

/// The [`b2_upload_file`] api call.
///
/// You can execute this api call using a [`B2Client`], which will result in an
/// [`UploadedFile`] if successful.
///
/// The file name must already be encoded with [`encode_file_name`].
///
/// [`b2_upload_file`]: https://www.backblaze.com/b2/docs/b2_upload_file.html
/// [`B2Client`]: ../../client/struct.B2Client.html
/// [`UploadedFile`]: struct.UploadedFile.html
/// [`encode_file_name`]: ../../encoding/fn.encode_file_name.html
#[derive(Debug)]
pub struct UploadFile<'a> {
    url: &'a UploadUrl,
    file_name: &'a str,
    content_type: &'a str,
    content_sha1: &'a str,
    content_length: u64,
    body: Option<Body>,
}

impl<'a> UploadFile<'a> {
    /// Create an api call that uploads `data` to the upload url.
    pub fn new(
        url: &'a UploadUrl,
        file_name: &'a str,
        content_type: &'a str,
        content_sha1: &'a str,
        data: Bytes,
    ) -> Self {
        UploadFile {
            url,
            file_name,
            content_type,
            content_sha1,
            content_length: data.len() as u64,
            body: Some(Body::from(data)),
        }
    }
}

impl<'a> ApiCall for UploadFile<'a> {
    type Response = UploadedFile;
    type Output = UploadedFile;
    const METHOD: Method = Method::POST;
    fn url(&self) -> Result<Uri, B2Error> {
        Uri::try_from(self.url.upload_url.as_str()).map_err(B2Error::from)
    }
    fn headers(&self) -> Result<HeaderMap, B2Error> {
        let mut map = HeaderMap::new();
        map.append(AUTHORIZATION, self.url.auth_token()?);
        map.append(CONTENT_TYPE, HeaderValue::from_str(self.content_type)?);
        map.append(CONTENT_LENGTH, HeaderValue::from(self.content_length));
        map.append(CONTENT_SHA1, HeaderValue::from_str(self.content_sha1)?);
        map.append(FILE_NAME, HeaderValue::from_str(self.file_name)?);
        Ok(map)
    }
    fn body(&mut self) -> Result<Body, B2Error> {
        Ok(self.body.take().expect("body() called twice on UploadFile"))
    }
    fn finalize(response: UploadedFile) -> UploadedFile {
        response
    }
}

#[cfg(test)]
mod tests {
    use super::UploadFile;
    use crate::client::ApiCall;
    use crate::files::upload::UploadUrl;
    use bytes::Bytes;
    use hyper::body::to_bytes;

    #[tokio::test]
    async fn sends_upload_headers() {
        let url = UploadUrl {
            bucket_id: Some("b1".to_string()),
            upload_url: "https://pod-000-1000-00.backblaze.com/b2api/v2/b2_upload_file/b1/c001"
                .to_string(),
            authorization_token: "upload-token".to_string(),
        };
        let mut call = UploadFile::new(
            &url,
            "dist/app%20v1.tar.gz",
            "application/gzip",
            "a9993e364706816aba3e25717850c26c9cd0d89d",
            Bytes::from_static(b"abc"),
        );
        assert_eq!(call.url().unwrap(), url.upload_url.as_str());

        let headers = call.headers().unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "upload-token");
        assert_eq!(headers.get("content-type").unwrap(), "application/gzip");
        assert_eq!(headers.get("content-length").unwrap(), "3");
        assert_eq!(
            headers.get("x-bz-content-sha1").unwrap(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(headers.get("x-bz-file-name").unwrap(), "dist/app%20v1.tar.gz");

        let body = to_bytes(call.body().unwrap()).await.unwrap();
        assert_eq!(&body[..], b"abc");
    }

    #[test]
    fn invalid_content_type_is_an_error() {
        let url = UploadUrl {
            bucket_id: None,
            upload_url: "https://example.com/upload".to_string(),
            authorization_token: "t".to_string(),
        };
        let call = UploadFile::new(&url, "f", "text/plain\n", "0", Bytes::new());
        assert!(call.headers().is_err());
    }
}
