use crate::auth::B2Authorization;
use crate::files::upload::UploadUrl;

use serde::Serialize;

use crate::client::{serde_body, ApiCall};
use crate::B2Error;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::method::Method;
use http::uri::Uri;
use hyper::Body;
use std::convert::TryFrom;

/// The [`b2_get_upload_url`] api call.
///
/// You can execute this api call using a [`B2Client`], which will result in an
/// [`UploadUrl`] if successful.
///
/// [`b2_get_upload_url`]: https://www.backblaze.com/b2/docs/b2_get_upload_url.html
/// [`B2Client`]: ../../client/struct.B2Client.html
/// [`UploadUrl`]: struct.UploadUrl.html
#[derive(Clone, Debug)]
pub struct GetUploadUrl<'a> {
    auth: &'a B2Authorization,
    bucket_id: &'a str,
}
impl<'a> GetUploadUrl<'a> {
    /// Create an api call to request an upload url for the specified bucket.
    pub fn new(auth: &'a B2Authorization, bucket_id: &'a str) -> Self {
        GetUploadUrl { auth, bucket_id }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GetUploadUrlRequest<'a> {
    bucket_id: &'a str,
}

impl<'a> ApiCall for GetUploadUrl<'a> {
    type Response = UploadUrl;
    type Output = UploadUrl;
    const METHOD: Method = Method::POST;
    fn url(&self) -> Result<Uri, B2Error> {
        Uri::try_from(format!("{}/b2api/v2/b2_get_upload_url", self.auth.api_url))
            .map_err(B2Error::from)
    }
    fn headers(&self) -> Result<HeaderMap, B2Error> {
        let mut map = HeaderMap::new();
        map.append(AUTHORIZATION, self.auth.auth_token()?);
        map.append(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(map)
    }
    fn body(&mut self) -> Result<Body, B2Error> {
        serde_body(&GetUploadUrlRequest {
            bucket_id: self.bucket_id,
        })
    }
    fn finalize(response: UploadUrl) -> UploadUrl {
        response
    }
}
