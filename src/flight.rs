//! Wire types returned by the flight API

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

use crate::geo::LatLng;

fn missing_coordinate() -> f64 {
    f64::NAN
}

/// `null` reads as a missing coordinate so placement rejects the entry later
fn coordinate_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One aircraft position from the `/flights` snapshot
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AircraftSnapshotEntry {
    /// ICAO 24-bit address, unique per aircraft
    #[serde(default, deserialize_with = "null_as_default")]
    pub hex: String,
    #[serde(default = "missing_coordinate", deserialize_with = "coordinate_or_nan")]
    pub lat: f64,
    #[serde(default = "missing_coordinate", deserialize_with = "coordinate_or_nan")]
    pub lng: f64,
    /// Heading in degrees
    #[serde(default, deserialize_with = "null_as_default")]
    pub dir: f64,
    #[serde(default)]
    pub flight_icao: Option<String>,
    #[serde(default)]
    pub flight_iata: Option<String>,
}

impl AircraftSnapshotEntry {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Decode a `/flights` body one entry at a time. An entry that does not fit
/// is logged and dropped; the rest of the snapshot is kept.
pub fn decode_snapshot(values: Vec<Value>) -> Vec<AircraftSnapshotEntry> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping snapshot entry {}: {}", index, e);
                None
            }
        })
        .collect()
}

/// A track point, sent either as `{"lat":..,"lng":..}` or as `[lat, lng]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TrackPoint {
    Object { lat: f64, lng: f64 },
    Pair([f64; 2]),
}

impl From<TrackPoint> for LatLng {
    fn from(point: TrackPoint) -> Self {
        match point {
            TrackPoint::Object { lat, lng } => LatLng::new(lat, lng),
            TrackPoint::Pair([lat, lng]) => LatLng::new(lat, lng),
        }
    }
}

/// Full record for one aircraft from `/flight/?hex=`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlightDetail {
    pub flight_icao: Option<String>,
    pub airline_iata: Option<String>,
    pub airline_name: Option<String>,
    pub dep_iata: Option<String>,
    pub arr_iata: Option<String>,
    pub dep_estimated: Option<String>,
    pub dep_actual: Option<String>,
    pub arr_estimated: Option<String>,
    pub arr_actual: Option<String>,
    pub dep_city: Option<String>,
    pub arr_city: Option<String>,
    pub reg_number: Option<String>,
    #[serde(rename = "positionHistory")]
    pub position_history: Option<Vec<TrackPoint>>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl FlightDetail {
    pub fn current_position(&self) -> Option<LatLng> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(LatLng::new(lat, lng)),
            _ => None,
        }
    }

    /// Position history followed by the live point
    pub fn track(&self) -> Vec<LatLng> {
        let mut points: Vec<LatLng> = self
            .position_history
            .iter()
            .flatten()
            .copied()
            .map(LatLng::from)
            .collect();
        if let Some(current) = self.current_position() {
            points.push(current);
        }
        points
    }
}

/// Body of `/airplane/picture/{reg}`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PictureResponse {
    #[serde(default)]
    pub picture: Option<String>,
}
