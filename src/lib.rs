//! excursion-router core
//!
//! Route geometry and nearby-place ranking for walking excursions: polyline
//! codec, great-circle distance, a directions client that assembles
//! multi-waypoint routes, and a nearest-place ranker.

pub mod coordinate;
pub mod directions;
pub mod error;
pub mod format;
pub mod haversine;
pub mod places;
pub mod polyline;
pub mod ranker;
pub mod route;
pub mod router;
pub mod traits;

pub use coordinate::Coordinate;
pub use error::{PlacesError, PolylineError, RouteError};
pub use format::{format_distance, format_duration};
pub use haversine::{distance_meters, path_length_meters};
pub use polyline::{decode as decode_polyline, encode as encode_polyline};
pub use ranker::{RankedPlace, rank_nearby};
pub use route::{RouteInfo, RouteStep, TravelMode};
pub use router::compute_route;
