//! HTTP transport types and the injected transport capability.
//!
//! # Design
//! Requests are plain data: the core resolves the method, URL and body, then
//! hands the `HttpRequest` to whatever `HttpTransport` the caller injected.
//! The core never depends on a concrete HTTP library. Response bodies stay
//! readable streams so reading them is a separate, fallible step; dropping an
//! `HttpResponse` releases its body.

use std::fmt;
use std::io::{Cursor, Read};

/// Error produced by a transport when the round trip itself fails.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved HTTP request.
///
/// Built by `Endpoint::build_request`. `url` already has path parameters
/// substituted and query parameters appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Vec<u8>>,
}

/// Readable response body.
pub struct Body(Box<dyn Read>);

impl Body {
    pub fn empty() -> Self {
        Self::from_bytes(Vec::new())
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Box::new(Cursor::new(bytes.into())))
    }

    pub fn from_reader(reader: impl Read + 'static) -> Self {
        Self(Box::new(reader))
    }

    /// Drain the body into memory, consuming it.
    pub fn read_to_end(mut self) -> std::io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.0.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Body { .. }")
    }
}

/// An HTTP response as returned by a transport.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Body,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: Body::from_bytes(body),
        }
    }
}

/// The single capability the core needs from the outside world: send one
/// request and hand back the response.
///
/// Implementations must return non-2xx statuses as `Ok` responses; status
/// interpretation happens in `AccountClient`. Any closure with the matching
/// signature is a transport, which keeps test doubles to one line.
pub trait HttpTransport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> HttpTransport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync,
{
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}
