//! Species list extraction.

use log::debug;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use crate::document::{self, selector};
use crate::error::{ChecklistError, Result};
use crate::record::Entry;

static LIST: LazyLock<Selector> = LazyLock::new(|| selector("div#list"));
static OBSERVATION: LazyLock<Selector> = LazyLock::new(|| selector("li[data-observation]"));
static SPECIES: LazyLock<Selector> = LazyLock::new(|| selector("div.Observation-species"));
static NUMBER_OBSERVED: LazyLock<Selector> =
    LazyLock::new(|| selector("div.Observation-numberObserved"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));

/// Marker used for a species reported without a count.
const UNCOUNTED: &str = "x";

pub fn scrape_species(item: ElementRef<'_>) -> Result<String> {
    document::find(item, &SPECIES)
        .and_then(|species| document::find(species, &SPAN))
        .map(document::text)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ChecklistError::malformed("div.Observation-species", "species name"))
}

/// Count from the last span of the number observed block. `X` means present
/// but not counted.
pub fn scrape_count(item: ElementRef<'_>) -> Result<Option<u32>> {
    let value = document::find(item, &NUMBER_OBSERVED)
        .and_then(|number| document::find_all(number, &SPAN).pop())
        .map(|span| document::text(span).to_lowercase())
        .ok_or_else(|| ChecklistError::malformed("div.Observation-numberObserved", "count"))?;

    if value == UNCOUNTED {
        return Ok(None);
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| {
            ChecklistError::malformed(
                "div.Observation-numberObserved",
                format!("count '{value}' is not a number"),
            )
        })
}

pub fn scrape_entry(item: ElementRef<'_>) -> Result<Entry> {
    Ok(Entry {
        species: scrape_species(item)?,
        count: scrape_count(item)?,
    })
}

/// Entries in page order. A page without a list has no entries.
pub fn scrape_entries(node: ElementRef<'_>) -> Result<Vec<Entry>> {
    let Some(list) = document::find(node, &LIST) else {
        debug!("No species list on page");
        return Ok(Vec::new());
    };
    list.select(&OBSERVATION).map(scrape_entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::fixture::ChecklistPage;
    use pretty_assertions::assert_eq;

    fn entries(entries: Option<Vec<(&'static str, &'static str)>>) -> Result<Vec<Entry>> {
        let page = ChecklistPage {
            entries,
            ..Default::default()
        };
        let doc = Document::parse(&page.render());
        scrape_entries(doc.root())
    }

    #[test]
    fn test_entries_keep_page_order() {
        let result = entries(Some(vec![
            ("Blue Jay", "12"),
            ("Northern Cardinal", "X"),
            ("American Robin", "x"),
        ]))
        .unwrap();
        assert_eq!(
            result,
            vec![
                Entry {
                    species: "Blue Jay".to_string(),
                    count: Some(12)
                },
                Entry {
                    species: "Northern Cardinal".to_string(),
                    count: None
                },
                Entry {
                    species: "American Robin".to_string(),
                    count: None
                },
            ]
        );
    }

    #[test]
    fn test_missing_list_is_empty() {
        assert!(entries(None).unwrap().is_empty());
        assert!(entries(Some(Vec::new())).unwrap().is_empty());
    }

    #[test]
    fn test_bad_count_fails() {
        assert!(matches!(
            entries(Some(vec![("Blue Jay", "many")])),
            Err(ChecklistError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_species_whitespace_is_collapsed() {
        let doc = Document::parse(
            r#"<div id="list"><li data-observation="">
                <div class="Observation-species"><span>  Black-capped
                    Chickadee </span></div>
                <div class="Observation-numberObserved">
                    <span>Number observed:</span><span> 4 </span>
                </div>
            </li></div>"#,
        );
        assert_eq!(
            scrape_entries(doc.root()).unwrap(),
            vec![Entry {
                species: "Black-capped Chickadee".to_string(),
                count: Some(4)
            }]
        );
    }
}
