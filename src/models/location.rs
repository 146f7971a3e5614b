//! Delivery locations and address lookup.

use serde::{Deserialize, Serialize};

/// A physical delivery point.
///
/// The location id doubles as its row in the
/// [`DistanceMatrix`](crate::distance::DistanceMatrix); id 0 is the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    id: usize,
    name: String,
    address: String,
    postal_code: String,
}

impl Location {
    /// Creates a location.
    pub fn new(
        id: usize,
        name: impl Into<String>,
        address: impl Into<String>,
        postal_code: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            address: address.into(),
            postal_code: postal_code.into(),
        }
    }

    /// Location ID (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Street address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Postal code.
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

/// The set of known locations, searchable by address.
///
/// # Examples
///
/// ```
/// use u_dispatch::models::{Location, LocationTable};
///
/// let table = LocationTable::new(vec![
///     Location::new(0, "Hub", "4001 South 700 East", "84107"),
///     Location::new(1, "Gardens", "1060 Dalton Ave S", "84104"),
/// ]);
/// assert_eq!(table.lookup("1060 Dalton Ave S", "84104"), Some(1));
/// assert_eq!(table.lookup("1060 Dalton Ave S", "84105"), None);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationTable {
    locations: Vec<Location>,
}

impl LocationTable {
    /// Creates a table from the given locations.
    pub fn new(locations: Vec<Location>) -> Self {
        Self { locations }
    }

    /// Resolves an address and postal code to a location id.
    ///
    /// Both must match exactly.
    pub fn lookup(&self, address: &str, postal_code: &str) -> Option<usize> {
        self.locations
            .iter()
            .find(|l| l.address == address && l.postal_code == postal_code)
            .map(Location::id)
    }

    /// Returns the location with the given id.
    pub fn get(&self, id: usize) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Returns `true` if the table has no locations.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Iterates over all locations.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LocationTable {
        LocationTable::new(vec![
            Location::new(0, "Hub", "4001 South 700 East", "84107"),
            Location::new(8, "Ottinger Hall", "233 Canyon Rd", "84103"),
            Location::new(12, "Council Hall", "300 State St", "84103"),
        ])
    }

    #[test]
    fn test_lookup_exact() {
        let t = table();
        assert_eq!(t.lookup("300 State St", "84103"), Some(12));
        assert_eq!(t.lookup("233 Canyon Rd", "84103"), Some(8));
    }

    #[test]
    fn test_lookup_requires_both_fields() {
        let t = table();
        assert_eq!(t.lookup("300 State St", "84111"), None);
        assert_eq!(t.lookup("300 state st", "84103"), None);
    }

    #[test]
    fn test_get_by_id() {
        let t = table();
        assert_eq!(t.get(12).map(Location::name), Some("Council Hall"));
        assert!(t.get(5).is_none());
        assert_eq!(t.len(), 3);
        assert!(!t.is_empty());
    }
}
