//! Activity records: the data model shared by the server, the fetch client
//! and the renderer.

pub mod client;
pub mod fit;
pub mod store;

use crate::error::MalformedActivityError;
use crate::viewport::LatLon;
use serde::{Deserialize, Deserializer, Serialize};

/// A single recorded GPS point.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq)]
pub struct GpsPoint {
    /// Latitude, in degrees.
    #[serde(rename = "Lat")]
    pub lat: f64,
    /// Longitude, in degrees.
    #[serde(rename = "Lng")]
    pub lng: f64,
}

impl GpsPoint {
    /// Returns the point as a latitude-longitude coordinate.
    pub fn latlon(&self) -> LatLon {
        LatLon {
            lat: self.lat,
            lon: self.lng,
        }
    }
}

/// Summary metrics of one activity.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Summary {
    /// Sport label reported by the recording device.
    #[serde(rename = "Sport")]
    pub sport: String,
    /// Start of the activity, in seconds since the Unix epoch.
    #[serde(rename = "Timestamp")]
    pub timestamp: i64,
    /// Total timer duration, as an opaque human-readable string.
    #[serde(rename = "Duration")]
    pub duration: String,
    /// Total distance, in kilometers.
    #[serde(rename = "Distance")]
    pub distance: f64,
}

/// One recorded movement activity: an ordered GPS path plus summary metrics.
///
/// The point order is the recording order, and defines the shape of the
/// rendered path.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Activity {
    /// Summary metrics.
    #[serde(rename = "Summary")]
    pub summary: Summary,
    /// GPS points, in recording order.
    #[serde(rename = "Coords", default, deserialize_with = "nullable_points")]
    pub coords: Vec<GpsPoint>,
}

/// Accepts `null` for the coordinate list, which some encoders emit instead
/// of an empty array.
fn nullable_points<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<GpsPoint>, D::Error> {
    let points: Option<Vec<GpsPoint>> = Option::deserialize(deserializer)?;
    Ok(points.unwrap_or_default())
}

impl Activity {
    /// Parses and validates an activity record from a JSON body.
    pub fn from_json(bytes: &[u8]) -> Result<Self, MalformedActivityError> {
        let activity: Self = serde_json::from_slice(bytes)?;
        activity.validate()?;
        Ok(activity)
    }

    /// Checks the record for coordinate values that must not reach the
    /// renderer.
    ///
    /// Serde already rejects missing fields; this checks value ranges, so a
    /// bad record is rejected at the fetch boundary instead of after the
    /// previously displayed path has been cleared.
    pub fn validate(&self) -> Result<(), MalformedActivityError> {
        for (index, point) in self.coords.iter().enumerate() {
            if !point.lat.is_finite() || !point.lng.is_finite() {
                return Err(MalformedActivityError::NonFiniteCoordinate { index });
            }
            if point.lat.abs() > 90.0 || point.lng.abs() > 180.0 {
                return Err(MalformedActivityError::CoordinateOutOfRange {
                    index,
                    lat: point.lat,
                    lng: point.lng,
                });
            }
        }
        Ok(())
    }
}
