//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The
//! `PageClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. The round trip itself goes through a
//! [`Transport`], which the caller injects.
//!
//! All fields use owned types (`String`, `Vec`) so requests can be stored,
//! compared in tests, and handed to any HTTP stack.

use std::fmt;

use crate::error::PageError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Head,
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Head => "HEAD",
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `PageClient::build_*` methods. `path` is the absolute URL
/// (base URL plus the `/pages/...` route).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Produced by a [`Transport`] after executing an `HttpRequest`, then passed
/// to `PageClient::parse_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A response with the given status and no headers or body.
    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }
}

/// Performs one HTTP round trip.
///
/// Implementations must return non-2xx statuses as `Ok` responses; only a
/// failure that yields no status at all (connect error, I/O error) is an
/// `Err`, conventionally [`PageError::Transport`].
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, PageError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, PageError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, PageError> {
        self(request)
    }
}
