//! Geographic coordinate value type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, returning `None` when either component is out of
    /// range or not a number.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.is_valid().then_some(coordinate)
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180]. NaN fails both.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// `"lat,lng"` as expected by provider query strings.
    pub fn to_query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}
