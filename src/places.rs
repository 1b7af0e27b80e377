//! Places provider HTTP adapters feeding the ranker.
//!
//! Two sources are supported: a commercial nearby-search API and an open map
//! database queried with Overpass QL. Both return [`PlaceRecord`]s.

use std::env;

use serde::Deserialize;
use tracing::{debug, error};

use crate::coordinate::Coordinate;
use crate::directions::API_KEY_VAR;
use crate::error::PlacesError;
use crate::ranker::{NEARBY_SEARCH_LIMIT, OPEN_DATA_LIMIT, PlaceRecord, RankedPlace, Ranker};
use crate::traits::PlacesProvider;

pub const DEFAULT_NEARBY_SEARCH_URL: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

pub const DEFAULT_RADIUS_METERS: f64 = 5000.0;
pub const MIN_RADIUS_METERS: f64 = 100.0;
pub const MAX_RADIUS_METERS: f64 = 50_000.0;

/// Place types kept from nearby-search results.
const NATURE_TYPES: [&str; 4] = [
    "park",
    "natural_feature",
    "tourist_attraction",
    "point_of_interest",
];

/// Checks the search center and radius; `None` selects the default radius.
pub fn validate_search(center: Coordinate, radius_meters: Option<f64>) -> Result<f64, PlacesError> {
    if !center.is_valid() {
        return Err(PlacesError::InvalidCoordinate(center));
    }

    let radius = radius_meters.unwrap_or(DEFAULT_RADIUS_METERS);
    if !(MIN_RADIUS_METERS..=MAX_RADIUS_METERS).contains(&radius) {
        return Err(PlacesError::InvalidRadius(radius));
    }

    Ok(radius)
}

/// Fetches candidates from `provider` and keeps the closest ones.
#[tracing::instrument(skip(provider, ranker))]
pub fn find_nature_spots<P: PlacesProvider>(
    provider: &P,
    ranker: &Ranker,
    center: Coordinate,
    radius_meters: Option<f64>,
) -> Result<Vec<RankedPlace>, PlacesError> {
    let radius = validate_search(center, radius_meters)?;
    let candidates = provider.nearby(center, radius)?;
    let ranked = ranker.rank(center, &candidates, provider.result_limit());

    debug!(candidates = candidates.len(), ranked = ranked.len(), "ranked nearby places");
    Ok(ranked)
}

#[derive(Debug, Clone)]
pub struct NearbySearchConfig {
    pub base_url: String,
    pub api_key: String,
    /// Provider place type to search for.
    pub place_type: String,
    pub timeout_secs: u64,
}

impl Default for NearbySearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NEARBY_SEARCH_URL.to_string(),
            api_key: String::new(),
            place_type: "park".to_string(),
            timeout_secs: 10,
        }
    }
}

impl NearbySearchConfig {
    pub fn from_env() -> Result<Self, PlacesError> {
        let api_key =
            env::var(API_KEY_VAR).map_err(|_| PlacesError::MissingConfig(API_KEY_VAR))?;

        Ok(Self {
            api_key,
            ..Self::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct NearbySearchClient {
    config: NearbySearchConfig,
    client: reqwest::blocking::Client,
}

impl NearbySearchClient {
    pub fn new(config: NearbySearchConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn query_params(
        &self,
        center: Coordinate,
        radius_meters: f64,
    ) -> Vec<(&'static str, String)> {
        vec![
            ("location", center.to_query()),
            ("radius", radius_meters.to_string()),
            ("type", self.config.place_type.clone()),
            ("key", self.config.api_key.clone()),
        ]
    }
}

impl PlacesProvider for NearbySearchClient {
    fn result_limit(&self) -> usize {
        NEARBY_SEARCH_LIMIT
    }

    fn nearby(
        &self,
        center: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PlaceRecord>, PlacesError> {
        debug!(url = %self.config.base_url, %center, radius_meters, "nearby search");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&self.query_params(center, radius_meters))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "nearby search failed");
            return Err(PlacesError::Status(status.as_u16()));
        }

        parse_nearby_search(&response.text()?)
    }
}

/// Parses a nearby-search body, keeping only nature-related results.
pub fn parse_nearby_search(body: &str) -> Result<Vec<PlaceRecord>, PlacesError> {
    let response: NearbySearchResponse = serde_json::from_str(body)?;

    match response.status.as_str() {
        "OK" | "ZERO_RESULTS" => {}
        status => {
            return Err(PlacesError::Provider {
                status: status.to_string(),
                message: response.error_message.unwrap_or_default(),
            });
        }
    }

    Ok(response
        .results
        .into_iter()
        .filter(|place| {
            place
                .types
                .iter()
                .any(|kind| NATURE_TYPES.contains(&kind.as_str()))
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    status: String,
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<PlaceRecord>,
}

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OVERPASS_URL.to_string(),
            timeout_secs: 25,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OverpassClient {
    config: OverpassConfig,
    client: reqwest::blocking::Client,
}

impl OverpassClient {
    pub fn new(config: OverpassConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// Overpass QL for green and blue spaces within `radius_meters`.
    ///
    /// Ways and relations are returned with a `center` point.
    pub fn query(&self, center: Coordinate, radius_meters: f64) -> String {
        let around = format!(
            "(around:{},{},{})",
            radius_meters.round(),
            center.latitude,
            center.longitude
        );
        let filters = [
            r#"["leisure"~"^(park|garden|nature_reserve)$"]"#,
            r#"["natural"~"^(wood|water|beach|peak)$"]"#,
            r#"["landuse"="forest"]"#,
            r#"["boundary"~"^(national_park|protected_area)$"]"#,
            r#"["route"="hiking"]"#,
        ];

        let mut query = format!("[out:json][timeout:{}];(", self.config.timeout_secs);
        for filter in filters {
            query.push_str(&format!("nwr{}{};", filter, around));
        }
        query.push_str(");out center;");
        query
    }
}

impl PlacesProvider for OverpassClient {
    fn result_limit(&self) -> usize {
        OPEN_DATA_LIMIT
    }

    fn nearby(
        &self,
        center: Coordinate,
        radius_meters: f64,
    ) -> Result<Vec<PlaceRecord>, PlacesError> {
        debug!(url = %self.config.base_url, %center, radius_meters, "overpass query");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[("data", self.query(center, radius_meters))])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            error!(status = status.as_u16(), "overpass query failed");
            return Err(PlacesError::Status(status.as_u16()));
        }

        parse_overpass(&response.text()?)
    }
}

pub fn parse_overpass(body: &str) -> Result<Vec<PlaceRecord>, PlacesError> {
    let response: OverpassResponse = serde_json::from_str(body)?;
    Ok(response.elements)
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<PlaceRecord>,
}
