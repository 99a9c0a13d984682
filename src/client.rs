//! The client used for executing api calls.

use hyper::client::connect::Connect;
use hyper::client::{Client, HttpConnector, ResponseFuture};
use hyper::Body;
use hyper_tls::HttpsConnector;

use http::header::{HeaderMap, HeaderValue};
use http::method::Method;
use http::request::{Builder, Request};
use http::response::Response;
use http::uri::Uri;

use crate::b2_future::B2Future;
use crate::B2Error;

use futures::future::FusedFuture;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// The hyper client used by [`B2Client::new`].
///
/// [`B2Client::new`]: struct.B2Client.html#method.new
pub type HyperClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Something that can send an http request and produce the response.
///
/// This is implemented for the hyper client. The body of the response is read by the
/// [`B2Future`] that wraps the returned future, so implementations only need to
/// resolve once the status and headers are known.
///
/// [`B2Future`]: ../b2_future/struct.B2Future.html
pub trait Transport {
    /// The future returned when a request is sent.
    type Future: Future<Output = Result<Response<Body>, B2Error>> + Unpin;
    /// Send the request.
    fn request(&self, request: Request<Body>) -> Self::Future;
}

impl<C> Transport for Client<C, Body>
where
    C: Connect + Clone + Send + Sync + 'static,
{
    type Future = HyperResponseFuture;
    fn request(&self, request: Request<Body>) -> HyperResponseFuture {
        HyperResponseFuture {
            inner: Client::request(self, request),
        }
    }
}

/// The future used when a hyper client is the transport.
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct HyperResponseFuture {
    inner: ResponseFuture,
}
impl Future for HyperResponseFuture {
    type Output = Result<Response<Body>, B2Error>;
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.inner).poll(cx).map_err(B2Error::from)
    }
}

/// A client for interacting with the b2 api.
#[derive(Clone, Debug)]
pub struct B2Client<T = HyperClient> {
    inner: T,
}

impl B2Client<HyperClient> {
    /// Creates a new client with the default hyper backend.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::with_transport(Client::builder().build(HttpsConnector::new()))
    }
}

impl<T> B2Client<T> {
    /// Creates a new client that sends its requests through the provided transport.
    pub fn with_transport(transport: T) -> Self {
        Self { inner: transport }
    }
    /// Access the underlying transport.
    pub fn transport(&self) -> &T {
        &self.inner
    }
}

impl<T: Transport> B2Client<T> {
    /// This function starts the provided api call. As this returns a future, you will
    /// need to await it to obtain the resulting value.
    ///
    /// Any failure while building the request is reported when the future is awaited.
    pub fn send<Api: ApiCall>(&self, mut api: Api) -> ApiFuture<Api, T::Future> {
        let url = match api.url() {
            Ok(url) => url,
            Err(err) => return ApiFuture::err(err),
        };
        let url_string = url.to_string();

        let mut builder = Builder::new().method(Api::METHOD).uri(url);

        // If headers_mut returns None, then the call to body() below will fail
        // with an Err(err), in turn resulting in this method returning an error.
        if let Some(headers_mut) = builder.headers_mut() {
            match api.headers() {
                Ok(headers) => {
                    *headers_mut = headers;
                }
                Err(err) => return ApiFuture::err(err),
            }
        }

        match api
            .body()
            .and_then(|body| builder.body(body).map_err(B2Error::from))
        {
            Ok(request) => {
                let method = Api::METHOD;
                tracing::debug!(method = method.as_str(), url = %url_string, "sending request");
                ApiFuture::new(B2Future::new(url_string, self.inner.request(request)))
            }
            Err(err) => ApiFuture::err(err),
        }
    }
}

/// An api call that the [`B2Client`] can execute.
///
/// This trait is implemented by every api call, so you can see a list of api calls in
/// [the implementors section](#implementors).
///
/// [`B2Client`]: struct.B2Client.html
pub trait ApiCall {
    /// The json body returned by the server on success.
    type Response: DeserializeOwned;
    /// The value the api call resolves to.
    type Output;
    /// The http method used by the api call.
    const METHOD: Method;
    /// The url for this api call.
    fn url(&self) -> Result<Uri, B2Error>;
    /// Any headers needed by the request.
    fn headers(&self) -> Result<HeaderMap<HeaderValue>, B2Error>;
    /// The body of the request. Calling this twice is not allowed and may panic.
    fn body(&mut self) -> Result<Body, B2Error>;
    /// Turn the parsed response into the output of the api call.
    fn finalize(response: Self::Response) -> Self::Output;
}

/// The future returned by [`B2Client::send`].
///
/// [`B2Client::send`]: struct.B2Client.html#method.send
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct ApiFuture<Api: ApiCall, F> {
    future: B2Future<Api::Response, F>,
    api: PhantomData<fn() -> Api>,
}
impl<Api: ApiCall, F> ApiFuture<Api, F> {
    fn new(future: B2Future<Api::Response, F>) -> Self {
        ApiFuture {
            future,
            api: PhantomData,
        }
    }
    fn err(err: B2Error) -> Self {
        ApiFuture::new(B2Future::err(err))
    }
}
impl<Api, F> Future for ApiFuture<Api, F>
where
    Api: ApiCall,
    F: Future<Output = Result<Response<Body>, B2Error>> + Unpin,
{
    type Output = Result<Api::Output, B2Error>;
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.future).poll(cx) {
            Poll::Ready(Ok(response)) => Poll::Ready(Ok(Api::finalize(response))),
            Poll::Ready(Err(err)) => Poll::Ready(Err(err)),
            Poll::Pending => Poll::Pending,
        }
    }
}
impl<Api, F> FusedFuture for ApiFuture<Api, F>
where
    Api: ApiCall,
    F: Future<Output = Result<Response<Body>, B2Error>> + Unpin,
{
    fn is_terminated(&self) -> bool {
        self.future.is_terminated()
    }
}

#[inline]
pub(crate) fn serde_body<T: Serialize + ?Sized>(body: &T) -> Result<Body, B2Error> {
    let body = serde_json::to_vec(body)?;
    Ok(Body::from(body))
}
