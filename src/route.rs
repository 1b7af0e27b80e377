//! Route data model shared by the directions client, the router and the
//! straight-line fallback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::RouteError;
use crate::polyline::Polyline;

/// Travel mode understood by the directions provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Walking,
    Driving,
    Bicycling,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Driving => "driving",
            TravelMode::Bicycling => "bicycling",
        }
    }

    /// Assumed average speed used when no provider is available.
    pub fn average_speed_kmh(&self) -> f64 {
        match self {
            TravelMode::Walking => 5.0,
            TravelMode::Driving => 40.0,
            TravelMode::Bicycling => 15.0,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A display string paired with its numeric value (meters or seconds).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub text: String,
    pub value: u64,
}

/// One maneuver of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStep {
    /// Instruction text with markup removed.
    pub instruction: String,
    pub distance: String,
    pub duration: String,
    pub start_location: Coordinate,
    pub end_location: Coordinate,
}

/// Distance and duration of a single leg between consecutive stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegSummary {
    pub distance: Measure,
    pub duration: Measure,
}

/// A complete route across every leg returned by the provider.
///
/// `distance` and `duration` are totals over `legs`; `steps` are all leg
/// steps concatenated in travel order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub polyline: Polyline,
    pub distance: Measure,
    pub duration: Measure,
    pub steps: Vec<RouteStep>,
    pub legs: Vec<LegSummary>,
}

/// Origin, destination and pass-through stops for a single provider call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionsRequest {
    pub origin: Coordinate,
    pub destination: Coordinate,
    pub intermediates: Vec<Coordinate>,
    pub mode: TravelMode,
}

impl DirectionsRequest {
    pub fn new(origin: Coordinate, destination: Coordinate, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            intermediates: Vec::new(),
            mode,
        }
    }

    pub fn with_intermediates(mut self, intermediates: Vec<Coordinate>) -> Self {
        self.intermediates = intermediates;
        self
    }

    /// Splits an ordered waypoint list into origin, intermediates and
    /// destination.
    pub fn from_waypoints(waypoints: &[Coordinate], mode: TravelMode) -> Result<Self, RouteError> {
        let [origin, intermediates @ .., destination] = waypoints else {
            return Err(RouteError::TooFewWaypoints(waypoints.len()));
        };

        let request =
            Self::new(*origin, *destination, mode).with_intermediates(intermediates.to_vec());
        request.validate()?;
        Ok(request)
    }

    /// Every stop in travel order.
    pub fn waypoints(&self) -> impl Iterator<Item = &Coordinate> {
        std::iter::once(&self.origin)
            .chain(self.intermediates.iter())
            .chain(std::iter::once(&self.destination))
    }

    /// Rejects requests containing an out-of-range coordinate.
    pub fn validate(&self) -> Result<(), RouteError> {
        match self.waypoints().find(|point| !point.is_valid()) {
            Some(point) => Err(RouteError::InvalidCoordinate(*point)),
            None => Ok(()),
        }
    }
}
