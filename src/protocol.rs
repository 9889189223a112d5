//! Protocol policy registry.
//!
//! The protocol name shown on the page decides which fields are read and
//! which of them must be present. Every supported name is listed in
//! [`PROTOCOLS`]; anything else is rejected rather than guessed at.

use log::debug;
use scraper::ElementRef;
use std::fmt;

use crate::error::{ChecklistError, Result};
use crate::fields;
use crate::record::{ProtocolFields, ProtocolRecord};

/// A protocol specific field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Time,
    Duration,
    Distance,
    Area,
    PartySize,
    Observers,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Time => "time",
            Field::Duration => "duration",
            Field::Distance => "distance",
            Field::Area => "area",
            Field::PartySize => "party_size",
            Field::Observers => "observers",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The shared shapes protocols are validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Counts from a single spot.
    Point,
    /// Counts along a route.
    Distance,
    Incidental,
    /// Old records where everything beyond the observers is optional.
    Historical,
    /// Counts over an area. Some protocols share the shape but never report
    /// the area itself.
    Area { include_area: bool },
}

/// Protocol display names and their policies. Names are matched exactly.
pub const PROTOCOLS: &[(&str, Policy)] = &[
    ("Stationary", Policy::Point),
    ("Traveling", Policy::Distance),
    ("Incidental", Policy::Incidental),
    ("Historical", Policy::Historical),
    ("Area", Policy::Area { include_area: true }),
    ("Banding", Policy::Area { include_area: false }),
    ("eBird Pelagic Protocol", Policy::Distance),
    ("Nocturnal Flight Call Count", Policy::Point),
    ("Random", Policy::Distance),
    ("CWC Point Count", Policy::Point),
    ("CWC Area Count", Policy::Area { include_area: true }),
    ("PROALAS", Policy::Point),
    ("TNC California Waterbird Count", Policy::Point),
    ("Rusty BlackbirdSpring Migration Blitz", Policy::Distance),
    ("California Brown Pelican Survey", Policy::Distance),
];

/// Look up the policy for a protocol display name.
pub fn policy_for(name: &str) -> Result<Policy> {
    PROTOCOLS
        .iter()
        .find(|(protocol, _)| *protocol == name)
        .map(|(_, policy)| *policy)
        .ok_or_else(|| ChecklistError::UnsupportedProtocol(name.to_string()))
}

fn require<T>(value: Option<T>, field: Field, protocol: &str) -> Result<T> {
    value.ok_or_else(|| ChecklistError::MandatoryFieldMissing {
        field,
        protocol: protocol.to_string(),
    })
}

impl Policy {
    /// Fields that must be present.
    pub fn mandatory_fields(self) -> &'static [Field] {
        match self {
            Policy::Point => &[Field::Time, Field::Duration, Field::PartySize, Field::Observers],
            Policy::Distance => &[
                Field::Time,
                Field::Duration,
                Field::Distance,
                Field::PartySize,
                Field::Observers,
            ],
            Policy::Incidental | Policy::Historical => &[Field::Observers],
            Policy::Area { include_area: true } => &[
                Field::Time,
                Field::Duration,
                Field::Area,
                Field::PartySize,
                Field::Observers,
            ],
            Policy::Area { include_area: false } => {
                &[Field::Time, Field::Duration, Field::PartySize, Field::Observers]
            }
        }
    }

    /// Fields included only when the page has them.
    pub fn optional_fields(self) -> &'static [Field] {
        match self {
            Policy::Incidental => &[Field::Time],
            Policy::Historical => &[
                Field::Time,
                Field::Duration,
                Field::Distance,
                Field::Area,
                Field::PartySize,
            ],
            _ => &[],
        }
    }

    /// Read and validate this policy's fields for `protocol`.
    pub fn apply(self, protocol: &str, node: ElementRef<'_>) -> Result<ProtocolFields> {
        let observers = || fields::scrape_observers(node);

        let record = match self {
            Policy::Point => ProtocolFields::Point {
                time: require(fields::scrape_time(node)?, Field::Time, protocol)?,
                duration: require(fields::scrape_duration(node)?, Field::Duration, protocol)?,
                party_size: require(fields::scrape_party_size(node)?, Field::PartySize, protocol)?,
                observers: require(observers(), Field::Observers, protocol)?,
            },
            Policy::Distance => ProtocolFields::Distance {
                time: require(fields::scrape_time(node)?, Field::Time, protocol)?,
                duration: require(fields::scrape_duration(node)?, Field::Duration, protocol)?,
                distance: require(fields::scrape_distance(node)?, Field::Distance, protocol)?,
                party_size: require(fields::scrape_party_size(node)?, Field::PartySize, protocol)?,
                observers: require(observers(), Field::Observers, protocol)?,
            },
            Policy::Incidental => ProtocolFields::Incidental {
                time: fields::scrape_time(node)?,
                observers: require(observers(), Field::Observers, protocol)?,
            },
            Policy::Historical => ProtocolFields::Historical {
                time: fields::scrape_time(node)?,
                duration: fields::scrape_duration(node)?,
                distance: fields::scrape_distance(node)?,
                area: fields::scrape_area(node)?,
                party_size: fields::scrape_party_size(node)?,
                observers: require(observers(), Field::Observers, protocol)?,
            },
            Policy::Area { include_area } => ProtocolFields::Area {
                time: require(fields::scrape_time(node)?, Field::Time, protocol)?,
                duration: require(fields::scrape_duration(node)?, Field::Duration, protocol)?,
                area: if include_area {
                    Some(require(fields::scrape_area(node)?, Field::Area, protocol)?)
                } else {
                    None
                },
                party_size: require(fields::scrape_party_size(node)?, Field::PartySize, protocol)?,
                observers: require(observers(), Field::Observers, protocol)?,
            },
        };

        debug!("Protocol '{}' fields: {:?}", protocol, record.field_names());
        Ok(record)
    }
}

/// Protocol name plus the fields its policy asks for.
pub fn scrape_protocol(node: ElementRef<'_>) -> Result<ProtocolRecord> {
    let name = fields::scrape_protocol_name(node)?;
    let fields = policy_for(&name)?.apply(&name, node)?;
    Ok(ProtocolRecord { name, fields })
}
