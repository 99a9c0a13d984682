//! Module for authorization.
//!
//! The main types in this module are [`B2Credentials`] and [`B2Authorization`], and the
//! first is used to obtain the latter using the [`AuthorizeAccount`] api call.
//!
//! [`B2Credentials`]: struct.B2Credentials.html
//! [`B2Authorization`]: struct.B2Authorization.html
//! [`AuthorizeAccount`]: struct.AuthorizeAccount.html

use std::fmt;

use base64::encode as b64encode;
use serde::Deserialize;

use crate::client::ApiCall;
use crate::B2Error;
use http::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use http::method::Method;
use http::uri::Uri;
use hyper::Body;

/// The endpoint of the [`b2_authorize_account`] api call.
///
/// [`b2_authorize_account`]: https://www.backblaze.com/b2/docs/b2_authorize_account.html
pub const AUTHORIZE_URL: &str = "https://api.backblazeb2.com/b2api/v2/b2_authorize_account";

/// The key id and application key needed to create a [`B2Authorization`].
///
/// [`B2Authorization`]: struct.B2Authorization.html
#[derive(Clone)]
pub struct B2Credentials {
    pub id: String,
    key: String,
}
impl B2Credentials {
    pub fn new(id: &str, key: &str) -> B2Credentials {
        B2Credentials {
            id: id.to_string(),
            key: key.to_string(),
        }
    }
    /// The value of the `Authorization` header sent to `b2_authorize_account`.
    ///
    /// The id and the key are base64 encoded separately and then joined with a colon,
    /// which is not the usual basic auth encoding.
    pub fn auth_string(&self) -> String {
        format!("Basic {}:{}", b64encode(&self.id), b64encode(&self.key))
    }
    /// Create an api call that tries to authorize using these credentials.
    pub fn authorize(&self) -> AuthorizeAccount<'_> {
        AuthorizeAccount::new(self)
    }
}
impl fmt::Debug for B2Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("B2Credentials")
            .field("id", &self.id)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// The [`b2_authorize_account`] api call.
///
/// You can execute this api call using a [`B2Client`], which will result in an
/// [`B2Authorization`] if successful.
///
/// [`b2_authorize_account`]: https://www.backblaze.com/b2/docs/b2_authorize_account.html
/// [`B2Client`]: ../client/struct.B2Client.html
/// [`B2Authorization`]: struct.B2Authorization.html
#[derive(Copy, Clone, Debug)]
pub struct AuthorizeAccount<'a> {
    creds: &'a B2Credentials,
}
impl<'a> AuthorizeAccount<'a> {
    pub fn new(credentials: &'a B2Credentials) -> Self {
        AuthorizeAccount { creds: credentials }
    }
}
impl<'a> ApiCall for AuthorizeAccount<'a> {
    type Response = B2Authorization;
    type Output = B2Authorization;
    const METHOD: Method = Method::GET;
    fn url(&self) -> Result<Uri, B2Error> {
        Ok(Uri::from_static(AUTHORIZE_URL))
    }
    fn headers(&self) -> Result<HeaderMap, B2Error> {
        let mut map = HeaderMap::new();
        let mut header = HeaderValue::from_str(&self.creds.auth_string())?;
        header.set_sensitive(true);
        map.append(AUTHORIZATION, header);
        Ok(map)
    }
    fn body(&mut self) -> Result<Body, B2Error> {
        Ok(Body::empty())
    }
    fn finalize(response: B2Authorization) -> B2Authorization {
        response
    }
}

/// An authorization for the backblaze b2 api.
///
/// It is created using the [`AuthorizeAccount`] api call with a [`B2Credentials`].
/// Only the fields needed for uploading are kept; the rest of the response is ignored.
///
/// [`AuthorizeAccount`]: struct.AuthorizeAccount.html
/// [`B2Credentials`]: struct.B2Credentials.html
#[derive(Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct B2Authorization {
    pub account_id: String,
    pub authorization_token: String,
    /// The base url for all other api calls.
    pub api_url: String,
}
impl B2Authorization {
    pub(crate) fn auth_token(&self) -> Result<HeaderValue, B2Error> {
        let mut header = HeaderValue::from_str(&self.authorization_token)?;
        header.set_sensitive(true);
        Ok(header)
    }
}
impl fmt::Debug for B2Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("B2Authorization")
            .field("account_id", &self.account_id)
            .field("authorization_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{B2Authorization, B2Credentials};
    use crate::client::ApiCall;

    #[test]
    fn each_half_is_encoded_separately() {
        let creds = B2Credentials::new("keyid", "secret");
        assert_eq!(creds.auth_string(), "Basic a2V5aWQ=:c2VjcmV0");
    }

    #[test]
    fn padding_is_kept_on_both_halves() {
        let creds = B2Credentials::new("a", "bc");
        assert_eq!(creds.auth_string(), "Basic YQ==:YmM=");
        let creds = B2Credentials::new("", "");
        assert_eq!(creds.auth_string(), "Basic :");
    }

    #[test]
    fn authorize_sends_credentials_header() {
        let creds = B2Credentials::new("0012ab", "K001xyz");
        let headers = creds.authorize().headers().unwrap();
        assert_eq!(
            headers.get("authorization").unwrap(),
            "Basic MDAxMmFi:SzAwMXh5eg=="
        );
    }

    #[test]
    fn debug_hides_secrets() {
        let creds = B2Credentials::new("id", "very-secret");
        assert!(!format!("{:?}", creds).contains("very-secret"));

        let auth: B2Authorization = serde_json::from_str(
            r#"{
                "accountId": "acc",
                "authorizationToken": "tok-secret",
                "apiUrl": "https://api001.backblazeb2.com",
                "downloadUrl": "https://f001.backblazeb2.com",
                "recommendedPartSize": 100000000
            }"#,
        )
        .unwrap();
        assert_eq!(auth.account_id, "acc");
        assert_eq!(auth.api_url, "https://api001.backblazeb2.com");
        assert!(!format!("{:?}", auth).contains("tok-secret"));
    }
}
