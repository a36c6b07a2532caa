use crate::params::Method;
use crate::session::TimeoutTier;
use bytes::Bytes;
use std::fmt::Debug;
use std::time::Duration;

/// Fully prepared HTTP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// `GET` for reads, `PUT` for writes and invocations.
    pub method: Method,
    /// Absolute URL without the query string.
    pub url: String,
    /// Flat key/value pairs: query string for `GET`, form body for `PUT`.
    pub params: Vec<(String, String)>,
    /// Value of the `Accept` header.
    pub accept: &'static str,
    /// Value of the `Accept-Encoding` header, if the caller asks for one.
    pub accept_encoding: Option<&'static str>,
    /// Request timeout.
    pub timeout: Duration,
    /// Tier the timeout was taken from.
    pub tier: TimeoutTier,
}

impl HttpRequest {
    /// Look up a parameter by exact name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Raw HTTP response.
///
/// Transports are expected to undo any `Content-Encoding` they negotiated
/// before handing the body over.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header.
    pub content_type: Option<String>,
    /// `Content-Encoding` header still applied to `body`, if any.
    pub content_encoding: Option<String>,
    /// Response body.
    pub body: Bytes,
}

/// HTTP client used to reach remote devices.
///
/// Any failure here (connection refused, timeout, broken body) is reported as
/// a transport error, never as a device error.
#[async_trait::async_trait]
pub trait Transport: Debug + Send + Sync {
    /// Perform one request.
    async fn send(&self, request: HttpRequest) -> eyre::Result<HttpResponse>;
}

/// [`Transport`] backed by [`reqwest`].
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

#[cfg(feature = "client")]
impl ReqwestTransport {
    /// Create a transport with transparent gzip/deflate decoding.
    pub fn new() -> eyre::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().gzip(true).deflate(true).build()?,
        })
    }
}

#[cfg(feature = "client")]
#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> eyre::Result<HttpResponse> {
        use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url).query(&request.params),
            Method::Put => self.client.put(&request.url).form(&request.params),
        }
        .header(ACCEPT, request.accept)
        .timeout(request.timeout);

        if let Some(accept_encoding) = request.accept_encoding {
            builder = builder.header(ACCEPT_ENCODING, accept_encoding);
        }

        let response = builder.send().await.map_err(|err| {
            if err.is_timeout() {
                eyre::eyre!("{} request timed out after {:?}", request.tier, request.timeout)
            } else {
                err.into()
            }
        })?;

        let header = |name: reqwest::header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        let status = response.status().as_u16();
        let content_type = header(CONTENT_TYPE);
        let content_encoding = header(CONTENT_ENCODING);

        Ok(HttpResponse {
            status,
            content_type,
            content_encoding,
            body: response.bytes().await?,
        })
    }
}
