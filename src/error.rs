//! Error types for checklist retrieval and extraction.

use thiserror::Error;

use crate::protocol::Field;

/// Every failure the scraper can surface. Extraction failures abort the whole
/// record; there is no partial result.
#[derive(Debug, Error)]
pub enum ChecklistError {
    /// Identifier does not look like a checklist id.
    #[error("Invalid checklist identifier: '{0}'. Expected S followed by digits (e.g., S62633426)")]
    InvalidIdentifier(String),

    /// The page could not be retrieved.
    #[error("Failed to retrieve checklist {identifier}: {reason}")]
    Retrieval { identifier: String, reason: String },

    /// HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A structurally required element is absent or unreadable.
    #[error("Malformed checklist document: {element} ({context})")]
    MalformedDocument { element: String, context: String },

    /// Protocol display name is not in the registry.
    #[error("Unsupported protocol: '{0}'")]
    UnsupportedProtocol(String),

    /// A field the protocol requires was not found.
    #[error("the {field} field was not found for protocol '{protocol}'")]
    MandatoryFieldMissing { field: Field, protocol: String },

    /// Unit token missing from the normalization table.
    #[error("Unknown {field} unit: '{unit}'")]
    UnitLookup { field: Field, unit: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChecklistError {
    pub(crate) fn malformed(element: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MalformedDocument {
            element: element.into(),
            context: context.into(),
        }
    }
}

/// Result type alias for checklist operations.
pub type Result<T> = std::result::Result<T, ChecklistError>;
