//! Error types for the codec, the directions client and the places clients.

use thiserror::Error;

use crate::coordinate::Coordinate;

/// Failure reported by [`crate::polyline::try_decode`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolylineError {
    #[error("byte {byte:#04x} at position {position} is outside the polyline alphabet")]
    InvalidCharacter { position: usize, byte: u8 },

    #[error("polyline ends in the middle of a value at position {position}")]
    Truncated { position: usize },

    #[error("value starting at position {position} does not fit in 32 bits")]
    Overflow { position: usize },
}

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("at least 2 waypoints are required, got {0}")]
    TooFewWaypoints(usize),

    #[error("coordinate {0} is out of range")]
    InvalidCoordinate(Coordinate),

    #[error("travel speed {0} km/h must be positive and finite")]
    InvalidSpeed(f64),

    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("directions provider returned HTTP {0}")]
    Status(u16),

    #[error("failed to parse directions response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("directions provider returned status {status}: {message}")]
    Provider { status: String, message: String },

    #[error("malformed directions response: {0}")]
    Malformed(String),

    #[error("no route found")]
    NoRoute,

    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}

#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("coordinate {0} is out of range")]
    InvalidCoordinate(Coordinate),

    #[error("radius {0} m is outside the accepted range")]
    InvalidRadius(f64),

    #[error("places request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("places provider returned HTTP {0}")]
    Status(u16),

    #[error("failed to parse places response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("places provider returned status {status}: {message}")]
    Provider { status: String, message: String },

    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
}
