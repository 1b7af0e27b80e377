//! Great-circle distance and a straight-line directions fallback.
//!
//! Distances assume a spherical Earth. The fallback provider ignores the road
//! and trail network entirely but is always available.

use crate::coordinate::Coordinate;
use crate::error::RouteError;
use crate::format::{format_distance, format_duration};
use crate::polyline::Polyline;
use crate::route::{DirectionsRequest, LegSummary, Measure, RouteInfo, RouteStep, TravelMode};
use crate::traits::DirectionsProvider;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Haversine distance between two points in meters.
///
/// NaN components propagate to a NaN result.
pub fn distance_meters(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

/// Sum of distances between consecutive points; 0 for fewer than two.
pub fn path_length_meters(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .map(|pair| distance_meters(pair[0], pair[1]))
        .sum()
}

/// Directions provider that connects the stops with straight lines.
///
/// Durations come from the travel mode's average speed unless a fixed speed
/// is configured.
#[derive(Debug, Clone, Default)]
pub struct HaversineDirections {
    /// Overrides the per-mode speed, in km/h.
    pub speed_kmh: Option<f64>,
}

impl HaversineDirections {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            speed_kmh: Some(speed_kmh),
        }
    }

    /// Speed for `mode` in km/h, rejecting zero, negative and non-finite values.
    fn speed_for(&self, mode: TravelMode) -> Result<f64, RouteError> {
        let speed_kmh = self.speed_kmh.unwrap_or_else(|| mode.average_speed_kmh());
        if !speed_kmh.is_finite() || speed_kmh <= 0.0 {
            return Err(RouteError::InvalidSpeed(speed_kmh));
        }
        Ok(speed_kmh)
    }

    fn meters_to_seconds(meters: f64, speed_kmh: f64) -> u64 {
        let hours = meters / 1000.0 / speed_kmh;
        (hours * 3600.0).round() as u64
    }
}

impl DirectionsProvider for HaversineDirections {
    fn directions(&self, request: &DirectionsRequest) -> Result<RouteInfo, RouteError> {
        request.validate()?;
        let speed_kmh = self.speed_for(request.mode)?;

        let points: Vec<Coordinate> = request.waypoints().copied().collect();
        let last_leg = points.len() - 2;
        let mut legs = Vec::with_capacity(points.len() - 1);
        let mut steps = Vec::with_capacity(points.len() - 1);
        let mut total_meters = 0.0;
        let mut total_seconds = 0;

        for (index, pair) in points.windows(2).enumerate() {
            let meters = distance_meters(pair[0], pair[1]);
            let seconds = Self::meters_to_seconds(meters, speed_kmh);
            total_meters += meters;
            total_seconds += seconds;

            let instruction = if index == last_leg {
                "Head straight to the destination".to_string()
            } else {
                format!("Head straight to stop {}", index + 1)
            };
            steps.push(RouteStep {
                instruction,
                distance: format_distance(meters),
                duration: format_duration(seconds),
                start_location: pair[0],
                end_location: pair[1],
            });
            legs.push(LegSummary {
                distance: Measure {
                    text: format_distance(meters),
                    value: meters.round() as u64,
                },
                duration: Measure {
                    text: format_duration(seconds),
                    value: seconds,
                },
            });
        }

        Ok(RouteInfo {
            polyline: Polyline::new(points),
            distance: Measure {
                text: format_distance(total_meters),
                value: total_meters.round() as u64,
            },
            duration: Measure {
                text: format_duration(total_seconds),
                value: total_seconds,
            },
            steps,
            legs,
        })
    }
}
