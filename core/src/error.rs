//! Error types for the page client.
//!
//! # Design
//! Only conditions the caller did not ask the server about are errors:
//! local validation failures, an unsupported read format, a status code the
//! operation has no mapping for, and transport failures. Everything the
//! server deliberately answers (conflict, not found, auth failures) is an
//! [`Outcome`](crate::Outcome) instead.

/// Errors returned by `PageClient` operations.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Page name length (in characters) outside `2..=60`.
    #[error("invalid page name: length {len} is outside 2..=60")]
    InvalidName { len: usize },

    /// Password length (in characters) outside `1..=30`.
    #[error("invalid password: length {len} is outside 1..=30")]
    InvalidPassword { len: usize },

    /// Non-empty title longer than 255 characters.
    #[error("invalid title: length {len} is outside 1..=255")]
    InvalidTitle { len: usize },

    /// Requested read format is not one of html, json, xml.
    #[error("unsupported page format: {0:?}")]
    InvalidFormat(String),

    /// The server returned a status the operation does not map.
    #[error("unexpected response: HTTP {status}: {body}")]
    ResponseError { status: u16, body: String },

    /// The transport failed before any status was received.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The form payload could not be encoded.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Client configuration is missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_urlencoded::ser::Error> for PageError {
    fn from(e: serde_urlencoded::ser::Error) -> Self {
        PageError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_include_offending_length() {
        assert_eq!(
            PageError::InvalidName { len: 61 }.to_string(),
            "invalid page name: length 61 is outside 2..=60"
        );
        assert_eq!(
            PageError::InvalidFormat("bogus".to_string()).to_string(),
            "unsupported page format: \"bogus\""
        );
    }

    #[test]
    fn response_error_shows_status_and_body() {
        let err = PageError::ResponseError {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "unexpected response: HTTP 500: boom");
    }
}
