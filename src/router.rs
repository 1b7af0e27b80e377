//! Multi-waypoint routing on top of a [`DirectionsProvider`].

use tracing::{error, warn};

use crate::coordinate::Coordinate;
use crate::error::RouteError;
use crate::route::{DirectionsRequest, RouteInfo, TravelMode};
use crate::traits::DirectionsProvider;

/// Routes an ordered list of stops with a single provider call per request.
#[derive(Debug, Clone)]
pub struct Router<P> {
    provider: P,
}

impl<P: DirectionsProvider> Router<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Like [`Router::compute_route`] but keeps the failure reason.
    pub fn try_compute_route(
        &self,
        waypoints: &[Coordinate],
        mode: TravelMode,
    ) -> Result<RouteInfo, RouteError> {
        let request = DirectionsRequest::from_waypoints(waypoints, mode)?;
        self.provider.directions(&request)
    }

    /// Routes from the first waypoint to the last through every stop in
    /// between. Returns `None`, after logging, when there are fewer than two
    /// waypoints, a coordinate is invalid or the provider fails.
    pub fn compute_route(&self, waypoints: &[Coordinate], mode: TravelMode) -> Option<RouteInfo> {
        match self.try_compute_route(waypoints, mode) {
            Ok(route) => Some(route),
            Err(err @ (RouteError::TooFewWaypoints(_) | RouteError::InvalidCoordinate(_))) => {
                warn!(error = %err, "rejected waypoints");
                None
            }
            Err(RouteError::NoRoute) => {
                warn!(waypoints = waypoints.len(), %mode, "no route found");
                None
            }
            Err(err) => {
                error!(error = %err, "route computation failed");
                None
            }
        }
    }
}

/// Computes a route with a one-off [`Router`].
pub fn compute_route<P: DirectionsProvider>(
    provider: &P,
    waypoints: &[Coordinate],
    mode: TravelMode,
) -> Option<RouteInfo> {
    Router::new(provider).compute_route(waypoints, mode)
}
