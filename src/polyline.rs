//! Encoded polyline codec for route geometries.
//!
//! Providers ship route shapes in the compact polyline format: each
//! coordinate is stored as a latitude/longitude delta from the previous one,
//! scaled to 1e-5 degrees, zigzag-mapped to unsigned and packed into 5-bit
//! chunks offset by 63 into printable ASCII. Decoding happens once at the
//! provider boundary; everything downstream works on [`Polyline`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::coordinate::Coordinate;
use crate::error::PolylineError;
use crate::haversine::path_length_meters;

/// Fixed-point scale of the encoding (five decimal places).
const PRECISION: f64 = 1e5;

const CHUNK_BITS: u32 = 5;
const CHUNK_MASK: i64 = 0x1f;
const CONTINUATION_BIT: i64 = 0x20;
const ASCII_OFFSET: u8 = 63;

/// Highest character the encoding can produce (`'~'`).
const ASCII_MAX: u8 = ASCII_OFFSET + 63;

/// A 32-bit value never needs more than seven chunks.
const MAX_SHIFT: u32 = 30;

/// A route geometry as an ordered sequence of decoded coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a polyline from already-decoded points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Decodes a provider string, see [`decode`].
    pub fn decode(encoded: &str) -> Self {
        Self::new(decode(encoded))
    }

    pub fn encode(&self) -> String {
        encode(&self.points)
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Great-circle length of the path in meters.
    pub fn length_meters(&self) -> f64 {
        path_length_meters(&self.points)
    }
}

/// Decodes an encoded polyline, keeping every complete coordinate.
///
/// Malformed input never fails: decoding stops at the first byte outside
/// the polyline alphabet or at a truncated value, logs a warning and returns
/// the coordinates read so far. Use [`try_decode`] to reject such input.
pub fn decode(encoded: &str) -> Vec<Coordinate> {
    let (points, failure) = decode_points(encoded.as_bytes());
    if let Some(err) = failure {
        warn!(
            error = %err,
            decoded = points.len(),
            "polyline decoding stopped early"
        );
    }
    points
}

/// Decodes an encoded polyline, failing on any malformed byte sequence.
pub fn try_decode(encoded: &str) -> Result<Vec<Coordinate>, PolylineError> {
    match decode_points(encoded.as_bytes()) {
        (points, None) => Ok(points),
        (_, Some(err)) => Err(err),
    }
}

/// Encodes coordinates at 1e-5 degree precision.
pub fn encode(points: &[Coordinate]) -> String {
    let mut encoded = String::with_capacity(points.len() * 8);
    let mut previous = (0_i64, 0_i64);

    for point in points {
        let lat = scale(point.latitude);
        let lng = scale(point.longitude);
        write_value(lat - previous.0, &mut encoded);
        write_value(lng - previous.1, &mut encoded);
        previous = (lat, lng);
    }

    encoded
}

fn decode_points(bytes: &[u8]) -> (Vec<Coordinate>, Option<PolylineError>) {
    let mut points = Vec::new();
    let mut position = 0;
    let mut lat = 0_i64;
    let mut lng = 0_i64;

    while position < bytes.len() {
        let delta_lat = match read_value(bytes, &mut position) {
            Ok(value) => value,
            Err(err) => return (points, Some(err)),
        };
        let delta_lng = match read_value(bytes, &mut position) {
            Ok(value) => value,
            Err(err) => return (points, Some(err)),
        };

        lat += delta_lat;
        lng += delta_lng;
        points.push(Coordinate {
            latitude: lat as f64 / PRECISION,
            longitude: lng as f64 / PRECISION,
        });
    }

    (points, None)
}

/// Reads one zigzag-encoded signed value starting at `position`.
fn read_value(bytes: &[u8], position: &mut usize) -> Result<i64, PolylineError> {
    let start = *position;
    let mut result = 0_i64;
    let mut shift = 0_u32;

    loop {
        let Some(&byte) = bytes.get(*position) else {
            return Err(PolylineError::Truncated { position: start });
        };
        if !(ASCII_OFFSET..=ASCII_MAX).contains(&byte) {
            return Err(PolylineError::InvalidCharacter {
                position: *position,
                byte,
            });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { position: start });
        }
        *position += 1;

        let chunk = i64::from(byte - ASCII_OFFSET);
        result |= (chunk & CHUNK_MASK) << shift;
        if chunk & CONTINUATION_BIT == 0 {
            break;
        }
        shift += CHUNK_BITS;
    }

    if result > i64::from(u32::MAX) {
        return Err(PolylineError::Overflow { position: start });
    }

    Ok(if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

fn write_value(delta: i64, out: &mut String) {
    let mut value = if delta < 0 { !(delta << 1) } else { delta << 1 };

    while value >= CONTINUATION_BIT {
        out.push(chunk_char((CONTINUATION_BIT | (value & CHUNK_MASK)) as u8));
        value >>= CHUNK_BITS;
    }
    out.push(chunk_char(value as u8));
}

fn chunk_char(chunk: u8) -> char {
    char::from(chunk + ASCII_OFFSET)
}

fn scale(degrees: f64) -> i64 {
    (degrees * PRECISION).round() as i64
}
