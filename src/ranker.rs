//! Nearest-place ranking over raw provider records.
//!
//! Records come either from a nearby-search API (`geometry.location`,
//! `types`) or from an open map database (`lat`/`lon` or `center`, `tags`).
//! Both shapes deserialize into [`PlaceRecord`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coordinate::Coordinate;
use crate::haversine::distance_meters;

/// Result cap for nearby-search API candidates.
pub const NEARBY_SEARCH_LIMIT: usize = 10;

/// Result cap for open map database candidates.
pub const OPEN_DATA_LIMIT: usize = 3;

pub const DEFAULT_CATEGORY: &str = "nature";

const UNNAMED_PLACE: &str = "Unnamed place";

/// Provider identifiers are strings for the API and integers for map data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceId {
    Text(String),
    Number(u64),
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceId::Text(id) => f.write_str(id),
            PlaceId::Number(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    #[serde(alias = "lng")]
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub location: LatLon,
}

/// A candidate place as delivered by a places provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    pub place_id: Option<String>,
    pub id: Option<PlaceId>,
    /// Map element kind (`node`, `way`, `relation`).
    #[serde(rename = "type")]
    pub element_type: Option<String>,
    pub name: Option<String>,
    pub lat: Option<f64>,
    #[serde(alias = "lng")]
    pub lon: Option<f64>,
    pub center: Option<LatLon>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl PlaceRecord {
    /// Direct `lat`/`lon` first, then `center`, then `geometry.location`.
    /// Out-of-range positions count as missing.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let (lat, lon) = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                let position = self
                    .center
                    .or_else(|| self.geometry.map(|geometry| geometry.location))?;
                (position.lat, position.lon)
            }
        };
        Coordinate::new(lat, lon)
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or_else(|| self.tags.get("name").map(String::as_str))
            .unwrap_or(UNNAMED_PLACE)
    }

    fn stable_id(&self, index: usize) -> String {
        if let Some(place_id) = &self.place_id {
            return place_id.clone();
        }
        match (&self.element_type, &self.id) {
            (Some(kind), Some(id)) => format!("{}/{}", kind, id),
            (None, Some(id)) => id.to_string(),
            (_, None) => format!("candidate-{}", index),
        }
    }
}

/// What a [`CategoryRule`] looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "match", rename_all = "snake_case")]
pub enum TagMatcher {
    /// An entry of the record's `types` list.
    Type { value: String },
    /// A `tags` entry; `value: None` matches any value of `key`.
    Tag { key: String, value: Option<String> },
}

impl TagMatcher {
    pub fn matches(&self, place: &PlaceRecord) -> bool {
        match self {
            TagMatcher::Type { value } => place.types.iter().any(|kind| kind == value),
            TagMatcher::Tag { key, value } => match (place.tags.get(key), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub matcher: TagMatcher,
    pub category: String,
}

impl CategoryRule {
    pub fn tag(key: &str, value: &str, category: &str) -> Self {
        Self {
            matcher: TagMatcher::Tag {
                key: key.to_string(),
                value: Some(value.to_string()),
            },
            category: category.to_string(),
        }
    }

    pub fn any_tag(key: &str, category: &str) -> Self {
        Self {
            matcher: TagMatcher::Tag {
                key: key.to_string(),
                value: None,
            },
            category: category.to_string(),
        }
    }

    pub fn place_type(value: &str, category: &str) -> Self {
        Self {
            matcher: TagMatcher::Type {
                value: value.to_string(),
            },
            category: category.to_string(),
        }
    }
}

/// Ordered tag-to-category table; the first matching rule wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    default_category: String,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::new(
            vec![
                CategoryRule::tag("leisure", "park", "park"),
                CategoryRule::place_type("park", "park"),
                CategoryRule::tag("leisure", "garden", "garden"),
                CategoryRule::tag("leisure", "nature_reserve", "reserve"),
                CategoryRule::tag("boundary", "national_park", "reserve"),
                CategoryRule::tag("boundary", "protected_area", "reserve"),
                CategoryRule::tag("natural", "wood", "forest"),
                CategoryRule::tag("landuse", "forest", "forest"),
                CategoryRule::tag("natural", "water", "water"),
                CategoryRule::any_tag("water", "water"),
                CategoryRule::tag("natural", "beach", "beach"),
                CategoryRule::tag("route", "hiking", "trail"),
                CategoryRule::tag("highway", "path", "trail"),
                CategoryRule::tag("tourism", "viewpoint", "viewpoint"),
                CategoryRule::tag("natural", "peak", "viewpoint"),
                CategoryRule::place_type("campground", "campground"),
                CategoryRule::place_type("tourist_attraction", "attraction"),
            ],
            DEFAULT_CATEGORY,
        )
    }
}

impl CategoryRules {
    pub fn new(rules: Vec<CategoryRule>, default_category: &str) -> Self {
        Self {
            rules,
            default_category: default_category.to_string(),
        }
    }

    /// Appends a rule with the lowest precedence.
    pub fn with_rule(mut self, rule: CategoryRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn categorize(&self, place: &PlaceRecord) -> &str {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(place))
            .map(|rule| rule.category.as_str())
            .unwrap_or(self.default_category.as_str())
    }
}

/// A candidate annotated with its distance from the search center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlace {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub kind: String,
    pub distance_meters: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    rules: CategoryRules,
}

impl Ranker {
    pub fn new(rules: CategoryRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    /// Closest `limit` candidates to `center`, nearest first.
    ///
    /// Candidates without a usable position are dropped. Equal distances keep
    /// their input order.
    pub fn rank(
        &self,
        center: Coordinate,
        candidates: &[PlaceRecord],
        limit: usize,
    ) -> Vec<RankedPlace> {
        if !center.is_valid() {
            warn!(%center, "cannot rank around an invalid center");
            return Vec::new();
        }

        let mut ranked: Vec<RankedPlace> = candidates
            .iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                let coordinate = candidate.coordinate()?;
                Some(RankedPlace {
                    id: candidate.stable_id(index),
                    name: candidate.display_name().to_string(),
                    coordinate,
                    kind: self.rules.categorize(candidate).to_string(),
                    distance_meters: distance_meters(center, coordinate),
                })
            })
            .collect();

        let dropped = candidates.len() - ranked.len();
        if dropped > 0 {
            debug!(dropped, "skipped candidates without coordinates");
        }

        ranked.sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
        ranked.truncate(limit);
        ranked
    }
}

/// Ranks with the default category table.
pub fn rank_nearby(
    center: Coordinate,
    candidates: &[PlaceRecord],
    limit: usize,
) -> Vec<RankedPlace> {
    Ranker::default().rank(center, candidates, limit)
}
