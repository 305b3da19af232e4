//! Aircraft markers

use crate::flight::AircraftSnapshotEntry;
use crate::geo::LatLng;

/// Icon variant drawn for a marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconStyle {
    #[default]
    Default,
    Selected,
}

/// A pin bound to one aircraft of the current snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub hex: String,
    pub flight_icao: Option<String>,
    pub flight_iata: Option<String>,
    pub position: LatLng,
    /// Icon rotation in degrees, taken from the aircraft heading
    pub rotation: f64,
    pub style: IconStyle,
}

impl Marker {
    pub fn from_entry(entry: &AircraftSnapshotEntry, style: IconStyle) -> Self {
        Self {
            hex: entry.hex.clone(),
            flight_icao: entry.flight_icao.clone(),
            flight_iata: entry.flight_iata.clone(),
            position: entry.position(),
            rotation: entry.dir,
            style,
        }
    }

    /// Hover label: the flight code when known, otherwise the hex address
    pub fn tooltip(&self) -> &str {
        self.flight_icao
            .as_deref()
            .or(self.flight_iata.as_deref())
            .unwrap_or(&self.hex)
    }

    /// Exact match on hex, ICAO flight code or IATA flight code
    pub fn matches(&self, query: &str) -> bool {
        self.hex == query
            || self.flight_icao.as_deref() == Some(query)
            || self.flight_iata.as_deref() == Some(query)
    }

    pub fn is_selected(&self) -> bool {
        self.style == IconStyle::Selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(hex: &str, icao: Option<&str>, iata: Option<&str>) -> AircraftSnapshotEntry {
        AircraftSnapshotEntry {
            hex: hex.to_string(),
            lat: 40.0,
            lng: -90.0,
            dir: 45.0,
            flight_icao: icao.map(str::to_string),
            flight_iata: iata.map(str::to_string),
        }
    }

    #[test]
    fn test_tooltip_prefers_flight_code() {
        let m = Marker::from_entry(&entry("A1", Some("AAL100"), Some("AA100")), IconStyle::Default);
        assert_eq!(m.tooltip(), "AAL100");
        let m = Marker::from_entry(&entry("A1", None, Some("AA100")), IconStyle::Default);
        assert_eq!(m.tooltip(), "AA100");
        let m = Marker::from_entry(&entry("A1", None, None), IconStyle::Default);
        assert_eq!(m.tooltip(), "A1");
    }

    #[test]
    fn test_matches_is_exact() {
        let m = Marker::from_entry(&entry("A1B2C3", Some("AAL100"), Some("AA100")), IconStyle::Default);
        assert!(m.matches("A1B2C3"));
        assert!(m.matches("AAL100"));
        assert!(m.matches("AA100"));
        assert!(!m.matches("aa100"));
        assert!(!m.matches("AA10"));
    }

    #[test]
    fn test_rotation_follows_heading() {
        let m = Marker::from_entry(&entry("A1", None, None), IconStyle::Selected);
        assert_eq!(m.rotation, 45.0);
        assert!(m.is_selected());
    }
}
