//! Futures that parse the response returned from a [`Transport`].
//!
//! [`Transport`]: ../client/trait.Transport.html

use futures::future::FusedFuture;
use http::header::{HeaderMap, CONTENT_LENGTH};
use http::response::Response;
use http::StatusCode;
use hyper::body::HttpBody;
use hyper::Body;
use serde::de::DeserializeOwned;

use std::future::Future;
use std::marker::PhantomData;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::B2Error;

// Content-Length is only an allocation hint.
const MAX_PREALLOCATION: usize = 64 * 1024;

/// A future that reads all data from a response and parses it with `serde_json`.
///
/// A response with a status outside `200..=299` resolves to [`B2Error::Status`] with
/// the url of the request, regardless of the body. A successful response whose body is
/// not valid json resolves to [`B2Error::Json`].
///
/// [`B2Error::Status`]: ../enum.B2Error.html#variant.Status
/// [`B2Error::Json`]: ../enum.B2Error.html#variant.Json
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct B2Future<T, F> {
    state: State<F>,
    url: String,
    phantom: PhantomData<fn() -> T>,
}
enum State<F> {
    Connecting(F),
    Collecting(StatusCode, Body, Vec<u8>),
    FailImmediately(B2Error),
    Done,
}

impl<T, F> B2Future<T, F> {
    /// Create a new `B2Future`. The url is only used in error messages.
    pub fn new(url: String, resp: F) -> Self {
        B2Future {
            state: State::Connecting(resp),
            url,
            phantom: PhantomData,
        }
    }
    /// Create a `B2Future` that immediately fails with the specified error.
    pub fn err<E: Into<B2Error>>(err: E) -> Self {
        B2Future {
            state: State::FailImmediately(err.into()),
            url: String::new(),
            phantom: PhantomData,
        }
    }
    /// The url of the request this future is waiting on.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl<T, F> Future for B2Future<T, F>
where
    T: DeserializeOwned,
    F: Future<Output = Result<Response<Body>, B2Error>> + Unpin,
{
    type Output = Result<T, B2Error>;
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = mem::replace(&mut self.state, State::Done);
        loop {
            match state {
                State::Connecting(mut fut) => match Pin::new(&mut fut).poll(cx) {
                    Poll::Pending => {
                        self.state = State::Connecting(fut);
                        return Poll::Pending;
                    }
                    Poll::Ready(Ok(resp)) => {
                        let (parts, body) = resp.into_parts();
                        let size = get_content_length(&parts.headers);
                        state = State::Collecting(parts.status, body, Vec::with_capacity(size));
                    }
                    Poll::Ready(Err(err)) => return Poll::Ready(Err(err)),
                },
                State::Collecting(status, mut body, mut bytes) => {
                    match Pin::new(&mut body).poll_data(cx) {
                        Poll::Pending => {
                            self.state = State::Collecting(status, body, bytes);
                            return Poll::Pending;
                        }
                        Poll::Ready(Some(Ok(chunk))) => {
                            bytes.extend_from_slice(&chunk[..]);
                            state = State::Collecting(status, body, bytes);
                        }
                        Poll::Ready(Some(Err(err))) => return Poll::Ready(Err(err.into())),
                        Poll::Ready(None) => {
                            let url = mem::take(&mut self.url);
                            return Poll::Ready(parse_response(url, status, &bytes));
                        }
                    }
                }
                State::FailImmediately(err) => return Poll::Ready(Err(err)),
                State::Done => {
                    panic!("poll on finished b2_upload::b2_future::B2Future");
                }
            }
        }
    }
}
impl<T, F> FusedFuture for B2Future<T, F>
where
    T: DeserializeOwned,
    F: Future<Output = Result<Response<Body>, B2Error>> + Unpin,
{
    fn is_terminated(&self) -> bool {
        match self.state {
            State::Done => true,
            _ => false,
        }
    }
}

fn parse_response<T: DeserializeOwned>(
    url: String,
    status: StatusCode,
    bytes: &[u8],
) -> Result<T, B2Error> {
    if status.is_success() {
        Ok(serde_json::from_slice(bytes)?)
    } else {
        tracing::debug!(%url, status = status.as_u16(), "request failed");
        Err(B2Error::Status {
            url,
            status,
            message: serde_json::from_slice(bytes).ok(),
        })
    }
}

fn get_content_length(headers: &HeaderMap) -> usize {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|len| len.to_str().ok())
        .and_then(|len| len.parse::<usize>().ok())
        .map(|len| len.min(MAX_PREALLOCATION))
        .unwrap_or(0)
}
