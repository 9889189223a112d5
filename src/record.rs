use chrono::NaiveDate;
use serde::Serialize;

use crate::protocol::Field;
use crate::units::Unit;

/// Everything extracted from one checklist page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChecklistRecord {
    pub identifier: String,
    pub date: NaiveDate,
    pub protocol: ProtocolRecord,
    pub location: Location,
    pub entries: Vec<Entry>,
    pub comment: Option<String>,
    pub complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub identifier: String,
    pub subnational2: Region,
    pub subnational1: Region,
    pub country: Region,
    pub latitude: f64,
    pub longitude: f64,
}

/// One level of the administrative hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Region {
    pub name: String,
    pub code: String,
}

/// A numeric value with a normalized unit, used for distance and area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measure {
    pub value: f64,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProtocolRecord {
    pub name: String,
    #[serde(flatten)]
    pub fields: ProtocolFields,
}

/// Protocol specific fields. Each variant holds exactly what its policy
/// declares; optional fields are left out of the serialized form when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProtocolFields {
    Point {
        time: String,
        duration: String,
        party_size: u32,
        observers: Vec<String>,
    },
    Distance {
        time: String,
        duration: String,
        distance: Measure,
        party_size: u32,
        observers: Vec<String>,
    },
    Incidental {
        #[serde(skip_serializing_if = "Option::is_none")]
        time: Option<String>,
        observers: Vec<String>,
    },
    Historical {
        #[serde(skip_serializing_if = "Option::is_none")]
        time: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        distance: Option<Measure>,
        #[serde(skip_serializing_if = "Option::is_none")]
        area: Option<Measure>,
        #[serde(skip_serializing_if = "Option::is_none")]
        party_size: Option<u32>,
        observers: Vec<String>,
    },
    /// `area` is `Some` exactly when the policy includes it.
    Area {
        time: String,
        duration: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        area: Option<Measure>,
        party_size: u32,
        observers: Vec<String>,
    },
}

impl ProtocolFields {
    /// Names of the fields carried, in canonical order.
    pub fn field_names(&self) -> Vec<Field> {
        let (time, duration, distance, area, party_size) = match self {
            ProtocolFields::Point { .. } => (true, true, false, false, true),
            ProtocolFields::Distance { .. } => (true, true, true, false, true),
            ProtocolFields::Incidental { time, .. } => (time.is_some(), false, false, false, false),
            ProtocolFields::Historical {
                time,
                duration,
                distance,
                area,
                party_size,
                ..
            } => (
                time.is_some(),
                duration.is_some(),
                distance.is_some(),
                area.is_some(),
                party_size.is_some(),
            ),
            ProtocolFields::Area { area, .. } => (true, true, false, area.is_some(), true),
        };

        [
            (time, Field::Time),
            (duration, Field::Duration),
            (distance, Field::Distance),
            (area, Field::Area),
            (party_size, Field::PartySize),
            (true, Field::Observers),
        ]
        .into_iter()
        .filter_map(|(present, field)| present.then_some(field))
        .collect()
    }
}

/// One species line. `count` is `None` when the species was reported present
/// but not counted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub species: String,
    pub count: Option<u32>,
}

/// Flat row written to CSV, one per entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryRow<'a> {
    pub checklist: &'a str,
    pub date: NaiveDate,
    pub protocol: &'a str,
    pub location: &'a str,
    pub location_id: &'a str,
    pub country_code: &'a str,
    pub species: &'a str,
    pub count: Option<u32>,
    pub complete: bool,
}

impl ChecklistRecord {
    pub fn rows(&self) -> impl Iterator<Item = EntryRow<'_>> {
        self.entries.iter().map(move |entry| EntryRow {
            checklist: &self.identifier,
            date: self.date,
            protocol: &self.protocol.name,
            location: &self.location.name,
            location_id: &self.location.identifier,
            country_code: &self.location.country.code,
            species: &entry.species,
            count: entry.count,
            complete: self.complete,
        })
    }
}
