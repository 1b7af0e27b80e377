//! Directions provider HTTP adapter.
//!
//! Requests a route through every intermediate stop and folds all legs of
//! the first returned route into one [`RouteInfo`].

use std::env;

use serde::Deserialize;
use tracing::{debug, error, warn};

use crate::coordinate::Coordinate;
use crate::error::RouteError;
use crate::format::{format_distance, format_duration};
use crate::polyline::Polyline;
use crate::route::{DirectionsRequest, LegSummary, Measure, RouteInfo, RouteStep};
use crate::traits::DirectionsProvider;

pub const DEFAULT_DIRECTIONS_URL: &str = "https://maps.googleapis.com/maps/api/directions/json";

/// Environment variable holding the provider key.
pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

/// Optional environment override for the endpoint.
pub const DIRECTIONS_URL_VAR: &str = "DIRECTIONS_API_URL";

#[derive(Debug, Clone)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIRECTIONS_URL.to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl DirectionsConfig {
    /// Reads the key (and an optional endpoint override) from the environment.
    pub fn from_env() -> Result<Self, RouteError> {
        let api_key = env::var(API_KEY_VAR).map_err(|_| RouteError::MissingConfig(API_KEY_VAR))?;
        let base_url =
            env::var(DIRECTIONS_URL_VAR).unwrap_or_else(|_| DEFAULT_DIRECTIONS_URL.to_string());

        Ok(Self {
            base_url,
            api_key,
            ..Self::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct DirectionsClient {
    config: DirectionsConfig,
    client: reqwest::blocking::Client,
}

impl DirectionsClient {
    pub fn new(config: DirectionsConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &DirectionsConfig {
        &self.config
    }

    /// Query string parameters for a request, in the order they are sent.
    pub fn query_params(&self, request: &DirectionsRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("origin", request.origin.to_query()),
            ("destination", request.destination.to_query()),
            ("mode", request.mode.as_str().to_string()),
            ("key", self.config.api_key.clone()),
        ];

        if !request.intermediates.is_empty() {
            let waypoints = request
                .intermediates
                .iter()
                .map(Coordinate::to_query)
                .collect::<Vec<_>>()
                .join("|");
            params.push(("waypoints", waypoints));
        }

        params
    }

    /// Fetches a route, collapsing every failure into `None` after logging it.
    #[tracing::instrument(skip(self))]
    pub fn fetch_route(&self, request: &DirectionsRequest) -> Option<RouteInfo> {
        match self.directions(request) {
            Ok(route) => Some(route),
            Err(RouteError::NoRoute) => {
                warn!("directions provider found no route");
                None
            }
            Err(err) => {
                error!(error = %err, "directions request failed");
                None
            }
        }
    }
}

impl DirectionsProvider for DirectionsClient {
    fn directions(&self, request: &DirectionsRequest) -> Result<RouteInfo, RouteError> {
        request.validate()?;

        debug!(
            url = %self.config.base_url,
            mode = %request.mode,
            stops = request.intermediates.len(),
            "requesting directions"
        );

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&self.query_params(request))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(RouteError::Status(status.as_u16()));
        }

        let body = response.text()?;
        parse_directions(&body)
    }
}

/// Parses a provider response body into a route.
pub fn parse_directions(body: &str) -> Result<RouteInfo, RouteError> {
    let response: DirectionsResponse = serde_json::from_str(body)?;
    response.into_route_info()
}

/// Removes markup tags from an instruction, leaving an unclosed `<` intact.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        text.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }
    text.push_str(rest);

    text
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<ApiRoute>,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    legs: Vec<ApiLeg>,
    overview_polyline: ApiPolyline,
}

#[derive(Debug, Deserialize)]
struct ApiPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct ApiLeg {
    distance: ApiMeasure,
    duration: ApiMeasure,
    steps: Vec<ApiStep>,
}

#[derive(Debug, Deserialize)]
struct ApiMeasure {
    text: String,
    value: u64,
}

#[derive(Debug, Deserialize)]
struct ApiText {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ApiStep {
    html_instructions: String,
    distance: ApiText,
    duration: ApiText,
    start_location: ApiLatLng,
    end_location: ApiLatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct ApiLatLng {
    lat: f64,
    lng: f64,
}

impl ApiLatLng {
    fn into_coordinate(self) -> Result<Coordinate, RouteError> {
        Coordinate::new(self.lat, self.lng).ok_or_else(|| {
            RouteError::Malformed(format!("step location {},{} out of range", self.lat, self.lng))
        })
    }
}

impl ApiStep {
    fn into_step(self) -> Result<RouteStep, RouteError> {
        Ok(RouteStep {
            instruction: strip_html(&self.html_instructions),
            distance: self.distance.text,
            duration: self.duration.text,
            start_location: self.start_location.into_coordinate()?,
            end_location: self.end_location.into_coordinate()?,
        })
    }
}

impl From<ApiMeasure> for Measure {
    fn from(measure: ApiMeasure) -> Self {
        Measure {
            text: measure.text,
            value: measure.value,
        }
    }
}

impl DirectionsResponse {
    fn into_route_info(self) -> Result<RouteInfo, RouteError> {
        match self.status.as_deref() {
            None | Some("OK") => {}
            Some("ZERO_RESULTS") => return Err(RouteError::NoRoute),
            Some(status) => {
                return Err(RouteError::Provider {
                    status: status.to_string(),
                    message: self.error_message.unwrap_or_default(),
                });
            }
        }

        let route = self.routes.into_iter().next().ok_or(RouteError::NoRoute)?;
        if route.legs.is_empty() {
            return Err(RouteError::Malformed("route has no legs".to_string()));
        }

        let single_leg = route.legs.len() == 1;
        let mut legs = Vec::with_capacity(route.legs.len());
        let mut steps = Vec::new();
        let mut total_meters = 0_u64;
        let mut total_seconds = 0_u64;

        for leg in route.legs {
            total_meters = total_meters
                .checked_add(leg.distance.value)
                .ok_or_else(|| RouteError::Malformed("leg totals overflow".to_string()))?;
            total_seconds = total_seconds
                .checked_add(leg.duration.value)
                .ok_or_else(|| RouteError::Malformed("leg totals overflow".to_string()))?;
            for step in leg.steps {
                steps.push(step.into_step()?);
            }
            legs.push(LegSummary {
                distance: leg.distance.into(),
                duration: leg.duration.into(),
            });
        }

        let (distance, duration) = if single_leg {
            (legs[0].distance.clone(), legs[0].duration.clone())
        } else {
            (
                Measure {
                    text: format_distance(total_meters as f64),
                    value: total_meters,
                },
                Measure {
                    text: format_duration(total_seconds),
                    value: total_seconds,
                },
            )
        };

        Ok(RouteInfo {
            polyline: Polyline::decode(&route.overview_polyline.points),
            distance,
            duration,
            steps,
            legs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::TravelMode;

    const SINGLE_LEG: &str = r#"{
        "status": "OK",
        "routes": [{
            "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
            "legs": [{
                "distance": { "text": "0.6 km", "value": 620 },
                "duration": { "text": "8 mins", "value": 480 },
                "steps": [
                    {
                        "html_instructions": "Head <b>north</b> on <b>Main St</b>",
                        "distance": { "text": "0.3 km", "value": 300 },
                        "duration": { "text": "4 mins", "value": 240 },
                        "start_location": { "lat": 38.5, "lng": -120.2 },
                        "end_location": { "lat": 38.503, "lng": -120.2 }
                    },
                    {
                        "html_instructions": "Turn <b>left</b><div style=\"font-size:0.9em\">Destination will be on the right</div>",
                        "distance": { "text": "0.3 km", "value": 320 },
                        "duration": { "text": "4 mins", "value": 240 },
                        "start_location": { "lat": 38.503, "lng": -120.2 },
                        "end_location": { "lat": 38.503, "lng": -120.204 }
                    }
                ]
            }]
        }]
    }"#;

    const TWO_LEGS: &str = r#"{
        "status": "OK",
        "routes": [{
            "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC" },
            "legs": [
                {
                    "distance": { "text": "0.8 km", "value": 800 },
                    "duration": { "text": "10 mins", "value": 600 },
                    "steps": [{
                        "html_instructions": "Walk to the <b>lake</b>",
                        "distance": { "text": "0.8 km" },
                        "duration": { "text": "10 mins" },
                        "start_location": { "lat": 38.5, "lng": -120.2 },
                        "end_location": { "lat": 38.51, "lng": -120.2 }
                    }]
                },
                {
                    "distance": { "text": "0.9 km", "value": 900 },
                    "duration": { "text": "1 hour 2 mins", "value": 3720 },
                    "steps": [{
                        "html_instructions": "Continue to the <b>summit</b>",
                        "distance": { "text": "0.9 km" },
                        "duration": { "text": "1 hour 2 mins" },
                        "start_location": { "lat": 38.51, "lng": -120.2 },
                        "end_location": { "lat": 38.52, "lng": -120.2 }
                    }]
                }
            ]
        }]
    }"#;

    #[test]
    fn test_parse_single_leg() {
        let route = parse_directions(SINGLE_LEG).unwrap();

        assert_eq!(route.distance.value, 620);
        assert_eq!(route.distance.text, "0.6 km");
        assert_eq!(route.duration.value, 480);
        assert_eq!(route.duration.text, "8 mins");
        assert_eq!(route.legs.len(), 1);
        assert_eq!(route.polyline.len(), 3);
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].instruction, "Head north on Main St");
        assert_eq!(
            route.steps[1].instruction,
            "Turn leftDestination will be on the right"
        );
        assert_eq!(route.steps[1].end_location, Coordinate::from((38.503, -120.204)));
    }

    #[test]
    fn test_parse_aggregates_all_legs() {
        let route = parse_directions(TWO_LEGS).unwrap();

        assert_eq!(route.legs.len(), 2);
        assert_eq!(route.distance.value, 1700);
        assert_eq!(route.distance.text, "1.7 km");
        assert_eq!(route.duration.value, 4320);
        assert_eq!(route.duration.text, "1h 12m");
        let instructions: Vec<_> = route.steps.iter().map(|s| s.instruction.as_str()).collect();
        assert_eq!(instructions, ["Walk to the lake", "Continue to the summit"]);
        assert_eq!(route.legs[1].duration.text, "1 hour 2 mins");
    }

    #[test]
    fn test_parse_empty_routes_is_no_route() {
        let err = parse_directions(r#"{ "status": "OK", "routes": [] }"#).unwrap_err();
        assert!(matches!(err, RouteError::NoRoute));

        let err = parse_directions(r#"{ "status": "ZERO_RESULTS", "routes": [] }"#).unwrap_err();
        assert!(matches!(err, RouteError::NoRoute));
    }

    #[test]
    fn test_parse_provider_error_status() {
        let body =
            r#"{ "status": "REQUEST_DENIED", "error_message": "invalid key", "routes": [] }"#;
        match parse_directions(body).unwrap_err() {
            RouteError::Provider { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "invalid key");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        let err = parse_directions("not json").unwrap_err();
        assert!(matches!(err, RouteError::Parse(_)));

        let missing_polyline = r#"{ "routes": [{ "legs": [] }] }"#;
        let err = parse_directions(missing_polyline).unwrap_err();
        assert!(matches!(err, RouteError::Parse(_)));

        let no_legs = r#"{ "routes": [{ "legs": [], "overview_polyline": { "points": "" } }] }"#;
        let err = parse_directions(no_legs).unwrap_err();
        assert!(matches!(err, RouteError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_overflowing_leg_totals() {
        let body = r#"{
            "status": "OK",
            "routes": [{
                "overview_polyline": { "points": "" },
                "legs": [
                    { "distance": { "text": "far", "value": 18446744073709551615 },
                      "duration": { "text": "1 min", "value": 60 }, "steps": [] },
                    { "distance": { "text": "1 m", "value": 1 },
                      "duration": { "text": "1 min", "value": 60 }, "steps": [] }
                ]
            }]
        }"#;

        let err = parse_directions(body).unwrap_err();
        assert!(
            matches!(err, RouteError::Malformed(ref reason) if reason == "leg totals overflow")
        );
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("Turn <b>right</b>"), "Turn right");
        assert_eq!(strip_html("no markup"), "no markup");
        assert_eq!(strip_html("a < b"), "a < b");
        assert_eq!(strip_html("<div>x</div><br/>"), "x");
    }

    #[test]
    fn test_query_params_without_waypoints() {
        let client = DirectionsClient::new(DirectionsConfig {
            api_key: "secret".to_string(),
            ..DirectionsConfig::default()
        })
        .unwrap();
        let request = DirectionsRequest::new(
            Coordinate::from((38.5, -120.2)),
            Coordinate::from((40.7, -120.95)),
            TravelMode::Walking,
        );

        let params = client.query_params(&request);
        assert_eq!(
            params,
            vec![
                ("origin", "38.5,-120.2".to_string()),
                ("destination", "40.7,-120.95".to_string()),
                ("mode", "walking".to_string()),
                ("key", "secret".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_pipe_joined_waypoints() {
        let client = DirectionsClient::new(DirectionsConfig::default()).unwrap();
        let request = DirectionsRequest::new(
            Coordinate::from((1.0, 1.0)),
            Coordinate::from((4.0, 4.0)),
            TravelMode::Driving,
        )
        .with_intermediates(vec![Coordinate::from((2.0, 2.5)), Coordinate::from((3.0, 3.5))]);

        let params = client.query_params(&request);
        assert_eq!(params.last(), Some(&("waypoints", "2,2.5|3,3.5".to_string())));
        assert!(params.contains(&("mode", "driving".to_string())));
    }
}
