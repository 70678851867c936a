//! Stateless request builder and response parser for the page API.
//!
//! # Design
//! `PageClient` holds only a `base_url` and the API key, and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that validates input and produces an `HttpRequest`, and a
//! `parse_*` method that maps an `HttpResponse` status to an [`Outcome`].
//! The convenience methods (`check_page`, `create_page`, ...) run exactly
//! one round trip through an injected [`Transport`] in between.

use base64::prelude::*;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::debug;

use crate::error::PageError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{non_empty, NewPage, Outcome, PageFormat, PageUpdate};
use crate::validate::{validate_name, validate_password, validate_title};

/// Host of the public page service.
pub const DEFAULT_BASE_URL: &str = "http://pen.io";

/// Environment variable holding the API key for [`PageClient::from_env`].
pub const API_KEY_ENV: &str = "PENIO_API_KEY";

/// Environment variable overriding the base URL for [`PageClient::from_env`].
pub const BASE_URL_ENV: &str = "PENIO_BASE_URL";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Characters left unescaped in a page-name path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Synchronous, stateless client for the page API.
#[derive(Clone)]
pub struct PageClient {
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for PageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl PageClient {
    /// Client for the public service at [`DEFAULT_BASE_URL`].
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Build a client from `PENIO_API_KEY` and, optionally, `PENIO_BASE_URL`.
    pub fn from_env() -> Result<Self, PageError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`PageClient::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PageError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| PageError::Config(format!("{API_KEY_ENV} is not set")))?;
        let base_url = lookup(BASE_URL_ENV)
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self::with_base_url(&base_url, &api_key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn page_url(&self, name: &str, format: PageFormat) -> String {
        let name = utf8_percent_encode(name, PATH_SEGMENT);
        match format.path_segment() {
            Some(segment) => format!("{}/pages/{name}/{segment}", self.base_url),
            None => format!("{}/pages/{name}", self.base_url),
        }
    }

    // -----------------------------------------------------------------------
    // Request builders
    // -----------------------------------------------------------------------

    pub fn build_check_page(&self, name: &str) -> Result<HttpRequest, PageError> {
        validate_name(name)?;
        Ok(HttpRequest {
            method: HttpMethod::Head,
            path: self.page_url(name, PageFormat::Html),
            headers: make_headers(&self.api_key, false, None),
            body: None,
        })
    }

    pub fn build_create_page(&self, page: &NewPage) -> Result<HttpRequest, PageError> {
        validate_name(&page.page_name)?;
        validate_password(&page.password)?;
        if let Some(title) = non_empty(&page.title) {
            validate_title(title)?;
        }
        let body = serde_urlencoded::to_string(page)?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/pages", self.base_url),
            headers: make_headers(&self.api_key, true, None),
            body: Some(body),
        })
    }

    pub fn build_update_page(
        &self,
        name: &str,
        password: &str,
        update: &PageUpdate,
    ) -> Result<HttpRequest, PageError> {
        validate_name(name)?;
        validate_password(password)?;
        if let Some(new_name) = non_empty(&update.page_name) {
            validate_name(new_name)?;
        }
        if let Some(title) = non_empty(&update.title) {
            validate_title(title)?;
        }
        let body = serde_urlencoded::to_string(update)?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.page_url(name, PageFormat::Html),
            headers: make_headers(&self.api_key, true, Some((name, password))),
            body: Some(body),
        })
    }

    pub fn build_delete_page(&self, name: &str, password: &str) -> Result<HttpRequest, PageError> {
        validate_name(name)?;
        validate_password(password)?;
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            path: self.page_url(name, PageFormat::Html),
            headers: make_headers(&self.api_key, false, Some((name, password))),
            body: None,
        })
    }

    /// Build a read request. An empty or absent password sends no
    /// credentials; `format` is one of `""`, `"html"`, `"json"`, `"xml"`.
    pub fn build_get_page(
        &self,
        name: &str,
        password: Option<&str>,
        format: &str,
    ) -> Result<HttpRequest, PageError> {
        let format: PageFormat = format.parse()?;
        validate_name(name)?;
        let password = password.filter(|p| !p.is_empty());
        if let Some(password) = password {
            validate_password(password)?;
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path: self.page_url(name, format),
            headers: make_headers(&self.api_key, false, password.map(|p| (name, p))),
            body: None,
        })
    }

    // -----------------------------------------------------------------------
    // Response parsers
    // -----------------------------------------------------------------------

    pub fn parse_check_page(&self, response: HttpResponse) -> Result<Outcome, PageError> {
        match response.status {
            200 => Ok(Outcome::Exists),
            404 => Ok(Outcome::Available),
            _ => Err(unexpected(response)),
        }
    }

    pub fn parse_create_page(&self, response: HttpResponse) -> Result<Outcome, PageError> {
        match response.status {
            201 => Ok(Outcome::Created),
            409 => Ok(Outcome::Conflict),
            412 => Ok(Outcome::ValidationError),
            _ => Err(unexpected(response)),
        }
    }

    pub fn parse_update_page(&self, response: HttpResponse) -> Result<Outcome, PageError> {
        match response.status {
            204 => Ok(Outcome::Modified),
            301 => Ok(Outcome::NameModified),
            409 => Ok(Outcome::Conflict),
            412 => Ok(Outcome::ValidationError),
            404 => Ok(Outcome::NotFound),
            401 => Ok(Outcome::AuthRequired),
            403 => Ok(Outcome::AuthError),
            _ => Err(unexpected(response)),
        }
    }

    pub fn parse_delete_page(&self, response: HttpResponse) -> Result<Outcome, PageError> {
        match response.status {
            204 => Ok(Outcome::Deleted),
            404 => Ok(Outcome::NotFound),
            401 => Ok(Outcome::AuthRequired),
            403 => Ok(Outcome::AuthError),
            _ => Err(unexpected(response)),
        }
    }

    pub fn parse_get_page(&self, response: HttpResponse) -> Result<Outcome, PageError> {
        match response.status {
            200 => Ok(Outcome::Page(response.body)),
            404 => Ok(Outcome::NotFound),
            401 => Ok(Outcome::AuthRequired),
            403 => Ok(Outcome::AuthError),
            _ => Err(unexpected(response)),
        }
    }

    // -----------------------------------------------------------------------
    // One-shot operations
    // -----------------------------------------------------------------------

    /// Whether a page named `name` exists.
    pub fn check_page<T: Transport>(&self, transport: &T, name: &str) -> Result<Outcome, PageError> {
        let request = self.build_check_page(name)?;
        let outcome = self.parse_check_page(send(transport, &request)?)?;
        debug!(page = name, ?outcome, "check_page");
        Ok(outcome)
    }

    pub fn create_page<T: Transport>(&self, transport: &T, page: &NewPage) -> Result<Outcome, PageError> {
        let request = self.build_create_page(page)?;
        let outcome = self.parse_create_page(send(transport, &request)?)?;
        debug!(page = %page.page_name, ?outcome, "create_page");
        Ok(outcome)
    }

    pub fn update_page<T: Transport>(
        &self,
        transport: &T,
        name: &str,
        password: &str,
        update: &PageUpdate,
    ) -> Result<Outcome, PageError> {
        let request = self.build_update_page(name, password, update)?;
        let outcome = self.parse_update_page(send(transport, &request)?)?;
        debug!(page = name, ?outcome, "update_page");
        Ok(outcome)
    }

    pub fn delete_page<T: Transport>(
        &self,
        transport: &T,
        name: &str,
        password: &str,
    ) -> Result<Outcome, PageError> {
        let request = self.build_delete_page(name, password)?;
        let outcome = self.parse_delete_page(send(transport, &request)?)?;
        debug!(page = name, ?outcome, "delete_page");
        Ok(outcome)
    }

    /// Fetch a page body. Returns [`Outcome::Page`] on success.
    pub fn get_page<T: Transport>(
        &self,
        transport: &T,
        name: &str,
        password: Option<&str>,
        format: &str,
    ) -> Result<Outcome, PageError> {
        let request = self.build_get_page(name, password, format)?;
        let outcome = self.parse_get_page(send(transport, &request)?)?;
        debug!(page = name, format, found = outcome.page_body().is_some(), "get_page");
        Ok(outcome)
    }
}

/// Headers for a page request.
///
/// Always carries `api-key`. Adds a form `content-type` when the request has
/// a urlencoded body, and a Basic `authorization` header when `credentials`
/// (page name, password) are given.
pub fn make_headers(
    api_key: &str,
    form_body: bool,
    credentials: Option<(&str, &str)>,
) -> Vec<(String, String)> {
    let mut headers = vec![("api-key".to_string(), api_key.to_string())];
    if form_body {
        headers.push(("content-type".to_string(), FORM_CONTENT_TYPE.to_string()));
    }
    if let Some((user, password)) = credentials {
        headers.push(("authorization".to_string(), basic_auth(user, password)));
    }
    headers
}

/// `Basic base64(user:password)`.
pub fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", BASE64_STANDARD.encode(format!("{user}:{password}")))
}

fn send<T: Transport>(transport: &T, request: &HttpRequest) -> Result<HttpResponse, PageError> {
    debug!(method = %request.method, url = %request.path, "sending page request");
    let response = transport.execute(request)?;
    debug!(status = response.status, "received page response");
    Ok(response)
}

fn unexpected(response: HttpResponse) -> PageError {
    PageError::ResponseError {
        status: response.status,
        body: response.body,
    }
}
