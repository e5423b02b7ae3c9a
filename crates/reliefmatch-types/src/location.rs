//! Geographic location value type.
//!
//! Coordinates `(0.0, 0.0)` are reserved as "unknown": the Haversine
//! computation treats them as absent rather than as a point near Null
//! Island, so a missing location contributes no proximity score instead of
//! a bogus distance.

use serde::{Deserialize, Serialize};

use crate::constants::EARTH_RADIUS_KM;

/// An immutable location value. Two locations that compare equal are
/// interchangeable for scoring purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
    pub city: String,
    pub region: String,
}

impl Location {
    /// A location with coordinates only.
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: String::new(),
            city: String::new(),
            region: String::new(),
        }
    }

    /// A location with coordinates and address metadata.
    #[must_use]
    pub fn with_address(
        latitude: f64,
        longitude: f64,
        address: impl Into<String>,
        city: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            latitude,
            longitude,
            address: address.into(),
            city: city.into(),
            region: region.into(),
        }
    }

    /// A location with unknown coordinates.
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Whether real coordinates are present. `(0.0, 0.0)` means unknown.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }

    /// Haversine great-circle distance to `other`, in kilometers.
    ///
    /// Returns `None` when either location has unknown coordinates.
    #[must_use]
    pub fn distance_km(&self, other: &Location) -> Option<f64> {
        if !self.has_coordinates() || !other.has_coordinates() {
            return None;
        }

        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2)
            + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        Some(EARTH_RADIUS_KM * c)
    }
}

// Equality over latitude, longitude, and address only; city/region are
// display metadata.
impl PartialEq for Location {
    fn eq(&self, other: &Self) -> bool {
        self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.address == other.address
    }
}
