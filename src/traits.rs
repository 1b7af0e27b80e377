//! Provider seams for routing and place lookup.
//!
//! The router and the place search only depend on these traits, so the HTTP
//! clients, the straight-line fallback or a test fake can be plugged in.

use crate::coordinate::Coordinate;
use crate::error::{PlacesError, RouteError};
use crate::ranker::PlaceRecord;
use crate::route::{DirectionsRequest, RouteInfo};

/// Produces a route for an origin, destination and ordered intermediate stops.
pub trait DirectionsProvider {
    /// Returns [`RouteError::NoRoute`] when the provider found nothing.
    fn directions(&self, request: &DirectionsRequest) -> Result<RouteInfo, RouteError>;
}

impl<P: DirectionsProvider + ?Sized> DirectionsProvider for &P {
    fn directions(&self, request: &DirectionsRequest) -> Result<RouteInfo, RouteError> {
        (**self).directions(request)
    }
}

/// Returns raw candidate places around a center for ranking.
pub trait PlacesProvider {
    /// How many ranked results callers should keep from this source.
    fn result_limit(&self) -> usize;

    fn nearby(
        &self,
        center: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PlaceRecord>, PlacesError>;
}
