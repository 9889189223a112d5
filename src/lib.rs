//! Extract structured records from eBird checklist pages.
//!
//! A checklist page names the protocol it was recorded under, and the
//! protocol decides which fields are read and which must be present. The
//! extraction itself is synchronous and works on page text; [`fetch`] adds an
//! HTTP client for retrieving pages by checklist id.
//!
//! # Example
//!
//! ```no_run
//! use ebird_checklist::scrape_checklist;
//!
//! let html = std::fs::read_to_string("S136374832.html").unwrap();
//! let record = scrape_checklist(&html).unwrap();
//! println!("{} {}", record.identifier, record.protocol.name);
//! ```

pub mod checklist;
pub mod config;
pub mod document;
pub mod entries;
pub mod error;
pub mod fetch;
pub mod fields;
pub mod location;
pub mod protocol;
pub mod record;
pub mod units;
pub mod util;

#[cfg(test)]
mod fixture;

pub use checklist::scrape_checklist;
pub use error::{ChecklistError, Result};
pub use fetch::ChecklistScraper;
pub use protocol::{Field, Policy};
pub use record::{ChecklistRecord, Entry, Location, Measure, ProtocolFields, ProtocolRecord, Region};
pub use units::Unit;
