//! Domain types for the page API.
//!
//! # Design
//! Form payloads are plain serde structs encoded as
//! `application/x-www-form-urlencoded`. Optional fields that are absent or
//! empty are skipped during serialization, so an empty title never reaches
//! the server.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PageError;

/// Result of a page operation that the server answered deliberately.
///
/// Unexpected statuses are errors, not outcomes; see
/// [`PageError::ResponseError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `check_page`: a page with this name exists.
    Exists,
    /// `check_page`: the name is free.
    Available,
    Created,
    /// The name is taken (create) or the new name is taken (update).
    Conflict,
    /// The server rejected the submitted fields.
    ValidationError,
    Deleted,
    NotFound,
    /// The page is protected and no credentials were sent.
    AuthRequired,
    /// Credentials were sent but rejected.
    AuthError,
    Modified,
    /// The update renamed the page. The redirect is not followed.
    NameModified,
    /// `get_page`: the page body, verbatim, in the requested format.
    Page(String),
}

impl Outcome {
    /// The page body for [`Outcome::Page`], `None` for every other outcome.
    pub fn page_body(&self) -> Option<&str> {
        match self {
            Outcome::Page(body) => Some(body),
            _ => None,
        }
    }
}

/// Representation requested from `get_page`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageFormat {
    /// Rendered HTML, served from the bare page path.
    #[default]
    Html,
    Json,
    Xml,
}

impl PageFormat {
    /// Extra path segment appended after `/pages/{name}`, if any.
    pub fn path_segment(self) -> Option<&'static str> {
        match self {
            PageFormat::Html => None,
            PageFormat::Json => Some("json"),
            PageFormat::Xml => Some("xml"),
        }
    }
}

impl FromStr for PageFormat {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "html" => Ok(PageFormat::Html),
            "json" => Ok(PageFormat::Json),
            "xml" => Ok(PageFormat::Xml),
            other => Err(PageError::InvalidFormat(other.to_string())),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PageFormat::Html => "html",
            PageFormat::Json => "json",
            PageFormat::Xml => "xml",
        })
    }
}

/// Form payload for creating a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPage {
    pub page_name: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub content: Option<String>,
}

impl NewPage {
    pub fn new(page_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            page_name: page_name.into(),
            password: password.into(),
            title: None,
            content: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// Form payload for updating a page. Only non-empty fields are sent;
/// omitted fields remain unchanged on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageUpdate {
    /// New name for the page. The server answers 301 when it renames.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub page_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "is_blank")]
    pub content: Option<String>,
}

impl PageUpdate {
    pub fn rename(mut self, page_name: impl Into<String>) -> Self {
        self.page_name = Some(page_name.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// `Some("")` is treated the same as `None`.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    non_empty(value).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_parses_known_values() {
        assert_eq!("".parse::<PageFormat>().unwrap(), PageFormat::Html);
        assert_eq!("html".parse::<PageFormat>().unwrap(), PageFormat::Html);
        assert_eq!("json".parse::<PageFormat>().unwrap(), PageFormat::Json);
        assert_eq!("xml".parse::<PageFormat>().unwrap(), PageFormat::Xml);
    }

    #[test]
    fn format_rejects_unknown_values() {
        let err = "bogus".parse::<PageFormat>().unwrap_err();
        assert!(matches!(err, PageError::InvalidFormat(f) if f == "bogus"));
        assert!("JSON".parse::<PageFormat>().is_err());
    }

    #[test]
    fn html_has_no_path_segment() {
        assert_eq!(PageFormat::Html.path_segment(), None);
        assert_eq!(PageFormat::Xml.path_segment(), Some("xml"));
    }

    #[test]
    fn new_page_omits_empty_optionals() {
        let page = NewPage::new("page1", "pw").title("");
        let body = serde_urlencoded::to_string(&page).unwrap();
        assert_eq!(body, "page_name=page1&password=pw");
    }

    #[test]
    fn new_page_encodes_all_fields() {
        let page = NewPage::new("page1", "pw").title("Hi there").content("a&b");
        let body = serde_urlencoded::to_string(&page).unwrap();
        assert_eq!(
            body,
            "page_name=page1&password=pw&title=Hi+there&content=a%26b"
        );
    }

    #[test]
    fn empty_update_encodes_to_empty_body() {
        let update = PageUpdate::default().title("").content("");
        assert_eq!(serde_urlencoded::to_string(&update).unwrap(), "");
    }

    #[test]
    fn page_body_only_for_page_outcome() {
        assert_eq!(Outcome::Page("x".to_string()).page_body(), Some("x"));
        assert_eq!(Outcome::NotFound.page_body(), None);
    }
}
