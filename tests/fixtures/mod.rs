//! Test fixtures for excursion-router.
//!
//! Provides:
//! - Canned provider response bodies (directions, nearby search, Overpass)
//! - A one-shot local HTTP server that replays them and records requests

#![allow(dead_code)]

pub mod server;

pub use server::*;

/// Green Lake loop in Seattle with one pass-through stop.
pub const GREEN_LAKE_TWO_LEGS: &str = r#"{
    "status": "OK",
    "geocoded_waypoints": [],
    "routes": [{
        "summary": "W Green Lake Way N",
        "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
        "legs": [
            {
                "distance": { "text": "1.2 km", "value": 1210 },
                "duration": { "text": "15 mins", "value": 905 },
                "steps": [
                    {
                        "html_instructions": "Head <b>north</b> on <b>E Green Lake Dr N</b>",
                        "distance": { "text": "0.7 km", "value": 700 },
                        "duration": { "text": "9 mins", "value": 525 },
                        "start_location": { "lat": 47.6776, "lng": -122.3256 },
                        "end_location": { "lat": 47.6830, "lng": -122.3300 },
                        "travel_mode": "WALKING"
                    },
                    {
                        "html_instructions": "Turn <b>left</b> to stay on the path",
                        "distance": { "text": "0.5 km", "value": 510 },
                        "duration": { "text": "6 mins", "value": 380 },
                        "start_location": { "lat": 47.6830, "lng": -122.3300 },
                        "end_location": { "lat": 47.6820, "lng": -122.3390 },
                        "travel_mode": "WALKING"
                    }
                ]
            },
            {
                "distance": { "text": "2.1 km", "value": 2090 },
                "duration": { "text": "27 mins", "value": 1620 },
                "steps": [
                    {
                        "html_instructions": "Continue onto <b>W Green Lake Way N</b><div style=\"font-size:0.9em\">Destination will be on the left</div>",
                        "distance": { "text": "2.1 km", "value": 2090 },
                        "duration": { "text": "27 mins", "value": 1620 },
                        "start_location": { "lat": 47.6820, "lng": -122.3390 },
                        "end_location": { "lat": 47.6700, "lng": -122.3420 },
                        "travel_mode": "WALKING"
                    }
                ]
            }
        ]
    }]
}"#;

pub const ZERO_RESULTS: &str = r#"{ "status": "ZERO_RESULTS", "routes": [] }"#;

pub const NEARBY_SEARCH: &str = r#"{
    "status": "OK",
    "results": [
        { "place_id": "far-park", "name": "Woodland Park", "types": ["park", "point_of_interest"],
          "geometry": { "location": { "lat": 47.6690, "lng": -122.3500 } } },
        { "place_id": "cafe", "name": "Corner Cafe", "types": ["cafe", "food"],
          "geometry": { "location": { "lat": 47.6781, "lng": -122.3260 } } },
        { "place_id": "near-park", "name": "Green Lake Park", "types": ["park"],
          "geometry": { "location": { "lat": 47.6790, "lng": -122.3270 } } }
    ]
}"#;

/// Five map elements around Green Lake; the relation has no position.
pub const OVERPASS_ELEMENTS: &str = r#"{
    "version": 0.6,
    "generator": "Overpass API",
    "elements": [
        { "type": "way", "id": 101, "center": { "lat": 47.6800, "lon": -122.3400 },
          "tags": { "leisure": "park", "name": "Green Lake Park" } },
        { "type": "node", "id": 102, "lat": 47.6780, "lon": -122.3260,
          "tags": { "natural": "peak", "name": "Lookout" } },
        { "type": "relation", "id": 103,
          "tags": { "boundary": "protected_area", "name": "Somewhere" } },
        { "type": "way", "id": 104, "center": { "lat": 47.7000, "lon": -122.3000 },
          "tags": { "natural": "water" } },
        { "type": "node", "id": 105, "lat": 47.6900, "lon": -122.3300,
          "tags": { "amenity": "bench" } }
    ]
}"#;
