//! Assembles a [`ChecklistRecord`] from a checklist page.

use log::debug;
use scraper::ElementRef;

use crate::document::Document;
use crate::entries;
use crate::error::Result;
use crate::fields;
use crate::location;
use crate::protocol;
use crate::record::ChecklistRecord;

/// Parse a checklist page and extract its record.
pub fn scrape_checklist(contents: &str) -> Result<ChecklistRecord> {
    let document = Document::parse(contents);
    extract_checklist(document.root())
}

/// Extract a record from an already parsed page. The first failure aborts the
/// whole record.
pub fn extract_checklist(node: ElementRef<'_>) -> Result<ChecklistRecord> {
    let identifier = fields::scrape_identifier(node)?;
    let date = fields::scrape_date(node)?;
    let protocol = protocol::scrape_protocol(node)?;
    let location = location::scrape_location(node)?;
    let entries = entries::scrape_entries(node)?;
    let comment = fields::scrape_comment(node);
    let complete = fields::scrape_complete(node);

    debug!(
        "Parsed checklist {} ({}, {} entries)",
        identifier,
        protocol.name,
        entries.len()
    );

    Ok(ChecklistRecord {
        identifier,
        date,
        protocol,
        location,
        entries,
        comment,
        complete,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChecklistError;
    use crate::fixture::ChecklistPage;
    use crate::protocol::Field;
    use crate::record::{Entry, ProtocolFields};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stationary_checklist() {
        let record = scrape_checklist(&ChecklistPage::default().render()).unwrap();

        assert_eq!(record.identifier, "S12345678");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2023, 5, 14).unwrap());
        assert_eq!(record.protocol.name, "Stationary");
        assert_eq!(
            record.protocol.fields,
            ProtocolFields::Point {
                time: "07:00 AM".to_string(),
                duration: "30".to_string(),
                party_size: 2,
                observers: vec!["Jane Doe".to_string(), "John Roe".to_string()],
            }
        );
        assert_eq!(record.location.country.code, "US");
        assert_eq!(
            record.entries,
            vec![Entry {
                species: "Blue Jay".to_string(),
                count: Some(3)
            }]
        );
        assert_eq!(record.comment, None);
        assert!(record.complete);
    }

    #[test]
    fn test_incomplete_checklist() {
        let page = ChecklistPage {
            status: "Incomplete",
            ..Default::default()
        };
        assert!(!scrape_checklist(&page.render()).unwrap().complete);
    }

    #[test]
    fn test_identifier_checked_first() {
        let page = ChecklistPage {
            identifier: None,
            protocol: "Unknown",
            ..Default::default()
        };
        assert!(matches!(
            scrape_checklist(&page.render()),
            Err(ChecklistError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_protocol_failure_aborts_record() {
        let page = ChecklistPage {
            duration: None,
            ..ChecklistPage::with_protocol("Traveling")
        };
        match scrape_checklist(&page.render()) {
            Err(ChecklistError::MandatoryFieldMissing { field, .. }) => {
                assert_eq!(field, Field::Duration)
            }
            other => panic!("expected missing duration, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_checklist_has_no_entries() {
        let page = ChecklistPage {
            entries: None,
            ..Default::default()
        };
        assert!(scrape_checklist(&page.render()).unwrap().entries.is_empty());
    }

    #[test]
    fn test_serialized_record_shape() {
        let record = scrape_checklist(&ChecklistPage::with_protocol("Incidental").render()).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["date"], "2023-05-14");
        assert_eq!(value["protocol"]["name"], "Incidental");
        assert_eq!(value["protocol"]["time"], "07:00 AM");
        assert!(value["protocol"].get("duration").is_none());
        assert_eq!(value["location"]["subnational1"]["code"], "US-MA");
        assert_eq!(value["entries"][0]["count"], 3);
        assert!(value["comment"].is_null());
    }
}
