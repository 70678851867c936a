//! Local length checks for page names, passwords and titles.
//!
//! Lengths are counted in characters, not bytes, so a 60-character name in
//! any script is accepted.

use crate::error::PageError;

pub const MIN_NAME: usize = 2;
pub const MAX_NAME: usize = 60;
pub const MIN_PASSWORD: usize = 1;
pub const MAX_PASSWORD: usize = 30;
pub const MIN_TITLE: usize = 1;
pub const MAX_TITLE: usize = 255;

/// Returns `Ok(true)` when `name` is `2..=60` characters long.
pub fn validate_name(name: &str) -> Result<bool, PageError> {
    let len = name.chars().count();
    if !(MIN_NAME..=MAX_NAME).contains(&len) {
        return Err(PageError::InvalidName { len });
    }
    Ok(true)
}

/// Returns `Ok(true)` when `password` is `1..=30` characters long.
pub fn validate_password(password: &str) -> Result<bool, PageError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD..=MAX_PASSWORD).contains(&len) {
        return Err(PageError::InvalidPassword { len });
    }
    Ok(true)
}

/// Returns `Ok(true)` when `title` is `1..=255` characters long.
///
/// Callers skip this check for empty titles, which mean "omit the field".
pub fn validate_title(title: &str) -> Result<bool, PageError> {
    let len = title.chars().count();
    if !(MIN_TITLE..=MAX_TITLE).contains(&len) {
        return Err(PageError::InvalidTitle { len });
    }
    Ok(true)
}
