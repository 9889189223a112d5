//! Unit normalization for distance and area values.

use serde::Serialize;
use std::fmt;

use crate::error::{ChecklistError, Result};
use crate::protocol::Field;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Unit {
    #[serde(rename = "km")]
    Kilometers,
    #[serde(rename = "mi")]
    Miles,
    #[serde(rename = "ha")]
    Hectares,
    #[serde(rename = "acre")]
    Acres,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Kilometers => "km",
            Unit::Miles => "mi",
            Unit::Hectares => "ha",
            Unit::Acres => "acre",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const DISTANCE_UNITS: &[(&str, Unit)] = &[
    ("kilometer(s)", Unit::Kilometers),
    ("kilometre(s)", Unit::Kilometers),
    ("km(s)", Unit::Kilometers),
    ("kilometers", Unit::Kilometers),
    ("kilometres", Unit::Kilometers),
    ("km", Unit::Kilometers),
    ("kms", Unit::Kilometers),
    ("mile(s)", Unit::Miles),
    ("miles", Unit::Miles),
];

pub const AREA_UNITS: &[(&str, Unit)] = &[
    ("hectare(s)", Unit::Hectares),
    ("hectares", Unit::Hectares),
    ("ha", Unit::Hectares),
    ("acre(s)", Unit::Acres),
    ("acres", Unit::Acres),
];

fn lookup(table: &[(&str, Unit)], field: Field, token: &str) -> Result<Unit> {
    let token = token.to_lowercase();
    table
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, unit)| *unit)
        .ok_or_else(|| ChecklistError::UnitLookup { field, unit: token.clone() })
}

pub fn distance_unit(token: &str) -> Result<Unit> {
    lookup(DISTANCE_UNITS, Field::Distance, token)
}

pub fn area_unit(token: &str) -> Result<Unit> {
    lookup(AREA_UNITS, Field::Area, token)
}
