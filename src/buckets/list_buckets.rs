use crate::auth::B2Authorization;
use crate::buckets::Bucket;

use serde::{Deserialize, Serialize};

use crate::client::{serde_body, ApiCall};
use crate::B2Error;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use http::method::Method;
use http::uri::Uri;
use hyper::Body;
use std::convert::TryFrom;

/// The [`b2_list_buckets`] api call.
///
/// You can execute this api call using a [`B2Client`], which will return a list of
/// [`Buckets`] if successful.
///
/// [`b2_list_buckets`]: https://www.backblaze.com/b2/docs/b2_list_buckets.html
/// [`B2Client`]: ../client/struct.B2Client.html
/// [`Buckets`]: struct.Bucket.html
#[derive(Clone, Debug)]
pub struct ListBuckets<'a> {
    auth: &'a B2Authorization,
    bucket_name: Option<&'a str>,
}
impl<'a> ListBuckets<'a> {
    /// Create a new api call that fetches the list of buckets.
    pub fn new(auth: &'a B2Authorization) -> ListBuckets<'a> {
        ListBuckets {
            auth,
            bucket_name: None,
        }
    }
    /// Only list the bucket with this name.
    pub fn bucket_name(self, bucket_name: &'a str) -> Self {
        ListBuckets {
            bucket_name: Some(bucket_name),
            ..self
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListBucketsRequest<'a> {
    account_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    bucket_name: Option<&'a str>,
}

#[derive(Deserialize)]
pub struct ListBucketsResponse {
    buckets: Vec<Bucket>,
}

impl<'a> ApiCall for ListBuckets<'a> {
    type Response = ListBucketsResponse;
    type Output = Vec<Bucket>;
    const METHOD: Method = Method::POST;
    fn url(&self) -> Result<Uri, B2Error> {
        Uri::try_from(format!("{}/b2api/v2/b2_list_buckets", self.auth.api_url))
            .map_err(B2Error::from)
    }
    fn headers(&self) -> Result<HeaderMap, B2Error> {
        let mut map = HeaderMap::new();
        map.append(AUTHORIZATION, self.auth.auth_token()?);
        map.append(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(map)
    }
    fn body(&mut self) -> Result<Body, B2Error> {
        serde_body(&ListBucketsRequest {
            account_id: &self.auth.account_id,
            bucket_name: self.bucket_name,
        })
    }
    fn finalize(response: ListBucketsResponse) -> Vec<Bucket> {
        response.buckets
    }
}

#[cfg(test)]
mod tests {
    use super::ListBuckets;
    use crate::auth::B2Authorization;
    use crate::client::ApiCall;
    use hyper::body::to_bytes;
    use serde_json::{json, Value};

    fn auth() -> B2Authorization {
        B2Authorization {
            account_id: "acc-1".to_string(),
            authorization_token: "token-1".to_string(),
            api_url: "https://api002.backblazeb2.com".to_string(),
        }
    }

    #[tokio::test]
    async fn request_is_scoped_to_account_and_name() {
        let auth = auth();
        let mut call = ListBuckets::new(&auth).bucket_name("releases");
        assert_eq!(
            call.url().unwrap(),
            "https://api002.backblazeb2.com/b2api/v2/b2_list_buckets"
        );
        let headers = call.headers().unwrap();
        assert_eq!(headers.get("authorization").unwrap(), "token-1");
        assert_eq!(headers.get("content-type").unwrap(), "application/json");

        let body = to_bytes(call.body().unwrap()).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({"accountId": "acc-1", "bucketName": "releases"}));
    }

    #[test]
    fn response_keeps_order() {
        let response = serde_json::from_value(json!({
            "buckets": [
                {"accountId": "acc-1", "bucketId": "b1", "bucketName": "releases"},
                {"bucketId": "b2"}
            ]
        }))
        .unwrap();
        let buckets = ListBuckets::finalize(response);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].bucket_id, "b1");
        assert_eq!(buckets[0].bucket_name.as_deref(), Some("releases"));
        assert_eq!(buckets[1].bucket_name, None);
    }
}
