//! Manifest entries and the constraint notes attached to them.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::SimTime;
use crate::error::DispatchError;

/// A constraint note attached to a manifest entry.
///
/// Notes are parsed from the free-text special-instruction column:
///
/// | Text | Note |
/// |---|---|
/// | `Can only be on truck 2` | `RequiredVehicle(2)` |
/// | `Delayed on flight---will not arrive to depot until 9:05 am` | `ReadyAt(09:05)` |
/// | `Must be delivered with 15, 19` | `LinkedWith([15, 19])` |
/// | `Wrong address listed` | `AddressPending` |
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{ParcelNote, SimTime};
///
/// let note: ParcelNote = "Can only be on truck 2".parse().unwrap();
/// assert_eq!(note, ParcelNote::RequiredVehicle(2));
///
/// let note: ParcelNote = "Must be delivered with 13, 15".parse().unwrap();
/// assert_eq!(note, ParcelNote::LinkedWith(vec![13, 15]));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParcelNote {
    /// The parcel may only travel on the given vehicle.
    RequiredVehicle(usize),
    /// The parcel reaches the depot at the given time.
    ReadyAt(SimTime),
    /// The parcel must be delivered on the same trip as these parcels.
    LinkedWith(Vec<usize>),
    /// The listed address is wrong; hold the parcel until it is corrected.
    AddressPending,
}

impl FromStr for ParcelNote {
    type Err = DispatchError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || DispatchError::InvalidNote {
            text: text.to_string(),
        };
        let lower = text.trim().to_ascii_lowercase();

        if lower.starts_with("wrong address") {
            return Ok(Self::AddressPending);
        }

        if lower.starts_with("can only be on") {
            let vehicle = lower
                .split_whitespace()
                .last()
                .and_then(|n| n.parse().ok())
                .ok_or_else(invalid)?;
            return Ok(Self::RequiredVehicle(vehicle));
        }

        if let Some(rest) = lower.strip_prefix("must be delivered with") {
            let ids = rest
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty() && *s != "and")
                .map(|s| s.parse::<usize>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>, _>>()?;
            if ids.is_empty() {
                return Err(invalid());
            }
            return Ok(Self::LinkedWith(ids));
        }

        if let Some(idx) = lower.rfind("until ") {
            let clock = &lower[idx + "until ".len()..];
            let time = SimTime::parse_clock(clock).map_err(|_| invalid())?;
            return Ok(Self::ReadyAt(time));
        }

        Err(invalid())
    }
}

/// One row of the package manifest, as handed over by the loader.
///
/// Addresses are still unresolved text; the
/// [`Registry`](crate::registry::Registry) resolves them against the
/// location table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Parcel ID.
    pub id: usize,
    /// Street address.
    pub address: String,
    /// City, informational only.
    pub city: String,
    /// Postal code.
    pub postal_code: String,
    /// Deadline text: a 12-hour clock time or `EOD`.
    pub deadline: String,
    /// Mass.
    pub mass: f64,
    /// Raw special-instruction notes.
    pub notes: Vec<String>,
}

impl ManifestEntry {
    /// Creates an entry with no notes.
    pub fn new(
        id: usize,
        address: impl Into<String>,
        city: impl Into<String>,
        postal_code: impl Into<String>,
        deadline: impl Into<String>,
        mass: f64,
    ) -> Self {
        Self {
            id,
            address: address.into(),
            city: city.into(),
            postal_code: postal_code.into(),
            deadline: deadline.into(),
            mass,
            notes: Vec::new(),
        }
    }

    /// Attaches a special-instruction note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Parses all notes on this entry.
    pub fn parsed_notes(&self) -> Result<Vec<ParcelNote>, DispatchError> {
        self.notes.iter().map(|n| n.parse()).collect()
    }
}
