//! Atomic field extractors.
//!
//! Each extractor reads one value from the page. Absence of an optional value
//! is `Ok(None)`; an error is returned only when the page is structurally
//! wrong (a required anchor is missing or a value cannot be read).

use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, warn};
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

use crate::document::{self, pattern, selector};
use crate::error::{ChecklistError, Result};
use crate::record::Measure;
use crate::units;

static SUBMISSION_ID: LazyLock<Selector> = LazyLock::new(|| selector(r#"input[name="subID"]"#));
static PROTOCOL_NAME: LazyLock<Selector> =
    LazyLock::new(|| selector("span.Heading-main.u-inline-sm"));
static TIME: LazyLock<Selector> = LazyLock::new(|| selector("time"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static TITLED_SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span[title]"));
static BADGE_LABEL: LazyLock<Selector> = LazyLock::new(|| selector("span.Badge-label"));
static TERM: LazyLock<Selector> = LazyLock::new(|| selector("dt"));
static DEFINITION: LazyLock<Selector> = LazyLock::new(|| selector("dd"));
static OTHER_OBSERVERS: LazyLock<Selector> =
    LazyLock::new(|| selector("div#checklist-others"));

static DURATION_LABEL: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\s*duration:?\s*"));
static DISTANCE_LABEL: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\s*distance:?\s*"));
static AREA_LABEL: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)\s*area:?\s*"));
static PARTY_SIZE_LABEL: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)^\s*observers?:?\s*$"));
static OWNER_LABEL: LazyLock<Regex> = LazyLock::new(|| pattern(r"^Owner$"));

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%I:%M %p";

/// Checklist id from the hidden submission form field.
pub fn scrape_identifier(node: ElementRef<'_>) -> Result<String> {
    document::find(node, &SUBMISSION_ID)
        .and_then(|input| document::attr(input, "value"))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ChecklistError::malformed(r#"input[name="subID"]"#, "checklist identifier"))
}

pub fn scrape_protocol_name(node: ElementRef<'_>) -> Result<String> {
    document::find(node, &PROTOCOL_NAME)
        .map(document::text)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ChecklistError::malformed("span.Heading-main.u-inline-sm", "protocol name"))
}

/// The parsed value of the page's `<time datetime=...>` element.
///
/// A value carrying only a date means no start time was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Timestamp {
    DateTime(NaiveDateTime),
    Date(NaiveDate),
}

fn scrape_timestamp(node: ElementRef<'_>) -> Result<Option<Timestamp>> {
    let Some(value) = document::find(node, &TIME).and_then(|el| document::attr(el, "datetime"))
    else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(ts) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Ok(Some(Timestamp::DateTime(ts)));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|date| Some(Timestamp::Date(date)))
        .map_err(|_| {
            ChecklistError::malformed(
                "time[datetime]",
                format!("'{value}' does not match YYYY-MM-DDTHH:MM"),
            )
        })
}

pub fn scrape_date(node: ElementRef<'_>) -> Result<NaiveDate> {
    match scrape_timestamp(node)? {
        Some(Timestamp::DateTime(ts)) => Ok(ts.date()),
        Some(Timestamp::Date(date)) => Ok(date),
        None => Err(ChecklistError::malformed("time[datetime]", "checklist date")),
    }
}

/// Start time as a 12-hour clock string, e.g. `07:00 AM`.
pub fn scrape_time(node: ElementRef<'_>) -> Result<Option<String>> {
    Ok(match scrape_timestamp(node)? {
        Some(Timestamp::DateTime(ts)) => Some(ts.format(TIME_FORMAT).to_string()),
        _ => None,
    })
}

/// Text of the badge inside the span whose title matches `label`.
fn scrape_badge(node: ElementRef<'_>, label: &Regex, name: &str) -> Result<Option<String>> {
    let Some(tag) = document::find_by_attr(node, &TITLED_SPAN, "title", label) else {
        return Ok(None);
    };
    let badge = document::find(tag, &BADGE_LABEL)
        .ok_or_else(|| ChecklistError::malformed("span.Badge-label", format!("{name} value")))?;
    let value = document::text(badge);
    Ok((!value.is_empty()).then_some(value))
}

/// Split `"<number> <unit>"` and normalize the unit through `lookup`.
fn parse_measure(
    text: &str,
    name: &str,
    lookup: fn(&str) -> Result<units::Unit>,
) -> Result<Measure> {
    let lowered = text.to_lowercase();
    let mut tokens = lowered.split_whitespace();
    let (Some(value), Some(unit)) = (tokens.next(), tokens.next()) else {
        return Err(ChecklistError::malformed(
            name.to_string(),
            format!("'{text}' is not a value with a unit"),
        ));
    };
    let value = value.parse::<f64>().map_err(|_| {
        ChecklistError::malformed(name.to_string(), format!("'{value}' is not a number"))
    })?;
    Ok(Measure {
        value,
        unit: lookup(unit)?,
    })
}

pub fn scrape_duration(node: ElementRef<'_>) -> Result<Option<String>> {
    scrape_badge(node, &DURATION_LABEL, "duration")
}

pub fn scrape_distance(node: ElementRef<'_>) -> Result<Option<Measure>> {
    scrape_badge(node, &DISTANCE_LABEL, "distance")?
        .map(|text| parse_measure(&text, "distance", units::distance_unit))
        .transpose()
}

/// Area is laid out as a `<dt>Area:</dt><dd>4.5 ha</dd>` pair.
pub fn scrape_area(node: ElementRef<'_>) -> Result<Option<Measure>> {
    let Some(term) = document::find_by_text(node, &TERM, &AREA_LABEL) else {
        return Ok(None);
    };
    let field = document::parent_element(term)
        .and_then(|parent| document::find(parent, &DEFINITION))
        .ok_or_else(|| ChecklistError::malformed("dd", "area value"))?;
    let text = document::text(field);
    if text.is_empty() {
        return Ok(None);
    }
    parse_measure(&text, "area", units::area_unit).map(Some)
}

/// Number of people in the party, read from the element after the
/// `Observers:` label.
pub fn scrape_party_size(node: ElementRef<'_>) -> Result<Option<u32>> {
    let Some(label) = document::find_by_text(node, &SPAN, &PARTY_SIZE_LABEL) else {
        return Ok(None);
    };
    let value = document::next_sibling_element(label)
        .map(document::text)
        .ok_or_else(|| ChecklistError::malformed("span", "party size value"))?;
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<u32>()
        .map(Some)
        .map_err(|_| {
            ChecklistError::malformed("span", format!("party size '{value}' is not a number"))
        })
}

/// Owner's display name followed by every other observer that can be read.
///
/// Returns `None` when the owner label is missing. An unreadable entry in the
/// others list is logged and skipped.
pub fn scrape_observers(node: ElementRef<'_>) -> Option<Vec<String>> {
    let owner_label = document::find_by_text(node, &SPAN, &OWNER_LABEL)?;
    let owner = document::next_sibling_element(owner_label)
        .map(document::text)
        .filter(|name| !name.is_empty())?;

    let mut observers = vec![owner];

    let Some(others) = document::find(node, &OTHER_OBSERVERS) else {
        debug!("No additional observers listed");
        return Some(observers);
    };

    for (index, item) in document::child_elements(others).enumerate() {
        match document::find(item, &SPAN).map(document::text) {
            Some(name) if !name.is_empty() => observers.push(name),
            _ => warn!("Skipping observer entry {} with no readable name", index),
        }
    }

    Some(observers)
}

/// Checklist comments are only rendered for signed-in users, so there is no
/// markup to read them from.
pub fn scrape_comment(_node: ElementRef<'_>) -> Option<String> {
    None
}

/// `true` when the first badge on the page reads `Complete`.
pub fn scrape_complete(node: ElementRef<'_>) -> bool {
    document::find(node, &BADGE_LABEL).is_some_and(|badge| document::text(badge) == "Complete")
}
