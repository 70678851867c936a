//! Synchronous client core for the pen.io page-publishing API.
//!
//! # Overview
//! Checks, creates, reads, updates and deletes pages identified by name.
//! Every request carries an API key; mutating requests on an existing page
//! authenticate with HTTP Basic using the page name and its password.
//!
//! # Design
//! - `PageClient` is stateless. It holds only `base_url` and the API key.
//! - Each operation is split into `build_*` (validates, produces a request)
//!   and `parse_*` (maps the status code to an [`Outcome`]), so the I/O
//!   boundary is explicit. One-shot helpers run a single round trip through
//!   an injected [`Transport`].
//! - Server answers such as "conflict" or "auth required" are `Outcome`
//!   values. Only local validation failures, unmapped statuses and
//!   transport failures are [`PageError`]s.
//! - With the default `ureq` feature, [`UreqTransport`] performs blocking
//!   HTTP.

pub mod client;
pub mod error;
pub mod http;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;
pub mod validate;

pub use client::{basic_auth, make_headers, PageClient, DEFAULT_BASE_URL};
pub use error::PageError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{NewPage, Outcome, PageFormat, PageUpdate};
pub use validate::{validate_name, validate_password, validate_title};
