//! Configuration constants and identifier validation.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ChecklistError, Result};

/// Site hosting the checklist pages.
pub const BASE_URL: &str = "https://ebird.org";

/// HTTP timeout in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

pub const USER_AGENT: &str = concat!("ebird-checklist/", env!("CARGO_PKG_VERSION"));

/// Base delay between requests in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 500;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const DEFAULT_CONCURRENT: usize = 5;

/// Checklist id pattern: S followed by digits.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^S\d+$").expect("valid regex"));

/// Validate a checklist identifier.
///
/// # Examples
/// ```
/// use ebird_checklist::config::validate_identifier;
///
/// assert!(validate_identifier("S62633426").is_ok());
/// assert!(validate_identifier("L123456").is_err());
/// ```
pub fn validate_identifier(identifier: &str) -> Result<()> {
    if IDENTIFIER_PATTERN.is_match(identifier) {
        Ok(())
    } else {
        Err(ChecklistError::InvalidIdentifier(identifier.to_string()))
    }
}

/// Build the page URL for a checklist.
pub fn checklist_url(base_url: &str, identifier: &str) -> String {
    format!("{}/checklist/{}", base_url.trim_end_matches('/'), identifier)
}
