//! Event handling for the tracker
//!
//!  UI input and fetch results arrive as `Event`s. Handling an event mutates
//!  the map and may ask for more data through `Command`s, which the runtime
//!  executes and answers with further events.

use tracing::{debug, info, warn};

use crate::api::AirplanePicture;
use crate::config::Config;
use crate::detail::{FlightInfoPanel, InfoView};
use crate::flight::{AircraftSnapshotEntry, FlightDetail};
use crate::layer::MapLayer;
use crate::map::{ClickOutcome, MapSurface};

/// Share of the viewport moved by one pan step
const PAN_STEP: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    North,
    South,
    East,
    West,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    RefreshTick,
    FlightsLoaded(Vec<AircraftSnapshotEntry>),
    MarkerClicked(String),
    SearchSubmitted(String),
    DetailLoaded {
        hex: String,
        detail: Option<FlightDetail>,
    },
    PictureLoaded(AirplanePicture),
    Pan(PanDirection),
    Zoom(i8),
    Shutdown,
}

/// Work requested from the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchFlights,
    FetchDetail(String),
    FetchPicture(String),
}

pub struct App<L: MapLayer, V: InfoView> {
    map: MapSurface<L>,
    view: V,
}

impl<L: MapLayer, V: InfoView> App<L, V> {
    pub fn new(config: &Config, layer: L, view: V) -> Self {
        Self {
            map: MapSurface::new(config, layer),
            view,
        }
    }

    #[allow(dead_code)]
    pub fn map(&self) -> &MapSurface<L> {
        &self.map
    }

    #[allow(dead_code)]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::RefreshTick => {
                debug!("Auto refreshing");
                vec![Command::FetchFlights]
            }
            Event::FlightsLoaded(flights) => {
                let total = flights.len();
                self.map.update_markers(Some(flights));
                info!("Showing {} of {} aircraft", self.map.marker_count(), total);
                Vec::new()
            }
            Event::MarkerClicked(hex) => self.on_marker_clicked(&hex),
            Event::SearchSubmitted(query) => self.search_flight(&query),
            Event::DetailLoaded { hex, detail } => self.show_flight_info(&hex, detail),
            Event::PictureLoaded(picture) => {
                self.view.show_airplane_picture(&picture);
                Vec::new()
            }
            Event::Pan(direction) => {
                let (dx, dy) = match direction {
                    PanDirection::North => (0.0, -PAN_STEP),
                    PanDirection::South => (0.0, PAN_STEP),
                    PanDirection::East => (PAN_STEP, 0.0),
                    PanDirection::West => (-PAN_STEP, 0.0),
                };
                self.map.pan_by(dx, dy);
                Vec::new()
            }
            Event::Zoom(delta) => {
                self.map.zoom_by(delta);
                Vec::new()
            }
            Event::Shutdown => Vec::new(),
        }
    }

    fn on_marker_clicked(&mut self, hex: &str) -> Vec<Command> {
        match self.map.click_marker(hex) {
            ClickOutcome::Selected(hex) => vec![Command::FetchDetail(hex)],
            ClickOutcome::Deselected => Vec::new(),
            ClickOutcome::Missed => {
                info!("No aircraft {} on the map", hex);
                Vec::new()
            }
        }
    }

    fn search_flight(&mut self, query: &str) -> Vec<Command> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let Some((hex, position)) = self
            .map
            .find_flight_marker_from_params(query)
            .map(|m| (m.hex.clone(), m.position))
        else {
            info!("Flight not found: {}", query);
            return Vec::new();
        };

        // a match is handled like a click on that marker
        let deselected = self.map.update_selected_plane(&hex);
        self.map.move_map(position.lat, position.lng);
        if deselected {
            Vec::new()
        } else {
            vec![Command::FetchDetail(hex)]
        }
    }

    fn show_flight_info(&mut self, hex: &str, detail: Option<FlightDetail>) -> Vec<Command> {
        let Some(detail) = detail else {
            warn!("Flight info undefined for {}", hex);
            return Vec::new();
        };

        let panel = FlightInfoPanel::from_detail(&detail);
        self.view.show_flight_info(&panel);
        self.map.draw_lines(&detail.track());

        match panel.known_registration() {
            Some(registration) => vec![Command::FetchPicture(registration.to_string())],
            None => {
                self.view.show_airplane_picture(&AirplanePicture::Fallback);
                Vec::new()
            }
        }
    }
}

/// Turn one line of user input into an event
pub fn parse_input(line: &str) -> Option<Event> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let event = match (words.next()?, words.next()) {
        ("quit" | "exit", None) => Event::Shutdown,
        ("click", Some(hex)) => Event::MarkerClicked(hex.to_string()),
        ("pan", Some(dir)) => Event::Pan(match dir {
            "n" | "north" | "up" => PanDirection::North,
            "s" | "south" | "down" => PanDirection::South,
            "e" | "east" | "right" => PanDirection::East,
            "w" | "west" | "left" => PanDirection::West,
            _ => return None,
        }),
        ("zoom", Some("in" | "+")) => Event::Zoom(1),
        ("zoom", Some("out" | "-")) => Event::Zoom(-1),
        _ => Event::SearchSubmitted(line.to_string()),
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detail::testing::RecordingView;
    use crate::flight::TrackPoint;
    use crate::geo::{LatLng, LatLngBounds};
    use crate::layer::testing::RecordingLayer;
    use crate::marker::IconStyle;

    fn app() -> App<RecordingLayer, RecordingView> {
        let bounds = LatLngBounds::new(LatLng::new(30.0, -100.0), LatLng::new(50.0, -80.0));
        App::new(
            &Config::default(),
            RecordingLayer::with_bounds(bounds),
            RecordingView::default(),
        )
    }

    fn a1() -> AircraftSnapshotEntry {
        AircraftSnapshotEntry {
            hex: "A1".to_string(),
            lat: 40.0,
            lng: -90.0,
            dir: 0.0,
            flight_icao: None,
            flight_iata: None,
        }
    }

    fn a1_detail() -> FlightDetail {
        FlightDetail {
            position_history: Some(vec![TrackPoint::Object { lat: 39.0, lng: -91.0 }]),
            lat: Some(40.0),
            lng: Some(-90.0),
            reg_number: Some("N100".to_string()),
            ..FlightDetail::default()
        }
    }

    #[test]
    fn test_refresh_tick_requests_flights() {
        let mut app = app();
        assert_eq!(app.handle(Event::RefreshTick), vec![Command::FetchFlights]);
    }

    #[test]
    fn test_click_select_detail_then_deselect() {
        let mut app = app();
        app.handle(Event::FlightsLoaded(vec![a1()]));
        assert_eq!(app.map().marker_count(), 1);
        assert_eq!(app.map().layer().style_of("A1"), Some(IconStyle::Default));

        let commands = app.handle(Event::MarkerClicked("A1".to_string()));
        assert_eq!(commands, vec![Command::FetchDetail("A1".to_string())]);
        assert_eq!(app.map().layer().style_of("A1"), Some(IconStyle::Selected));

        let commands = app.handle(Event::DetailLoaded {
            hex: "A1".to_string(),
            detail: Some(a1_detail()),
        });
        assert_eq!(commands, vec![Command::FetchPicture("N100".to_string())]);
        let lines: Vec<_> = app.map().layer().polylines.values().cloned().collect();
        assert_eq!(lines, vec![vec![LatLng::new(39.0, -91.0), LatLng::new(40.0, -90.0)]]);
        assert_eq!(app.view().panels.len(), 1);

        let commands = app.handle(Event::MarkerClicked("A1".to_string()));
        assert!(commands.is_empty());
        assert_eq!(app.map().layer().style_of("A1"), Some(IconStyle::Default));
        assert!(app.map().layer().polylines.is_empty());
    }

    #[test]
    fn test_missing_detail_leaves_display() {
        let mut app = app();
        app.handle(Event::FlightsLoaded(vec![a1()]));
        app.handle(Event::MarkerClicked("A1".to_string()));
        app.handle(Event::DetailLoaded {
            hex: "A1".to_string(),
            detail: Some(a1_detail()),
        });

        let commands = app.handle(Event::DetailLoaded {
            hex: "A1".to_string(),
            detail: None,
        });
        assert!(commands.is_empty());
        assert_eq!(app.view().panels.len(), 1);
        assert_eq!(app.map().track().map(|t| t.len()), Some(2));
    }

    #[test]
    fn test_refresh_keeps_selection() {
        let mut app = app();
        app.handle(Event::FlightsLoaded(vec![a1()]));
        app.handle(Event::MarkerClicked("A1".to_string()));
        let moved = AircraftSnapshotEntry {
            lat: 40.2,
            ..a1()
        };
        app.handle(Event::FlightsLoaded(vec![moved]));
        assert_eq!(app.map().layer().style_of("A1"), Some(IconStyle::Selected));
    }

    #[test]
    fn test_search_selects_pans_and_fetches() {
        let mut app = app();
        let coded = AircraftSnapshotEntry {
            hex: "B2".to_string(),
            lat: 45.0,
            lng: -85.0,
            flight_icao: Some("ABC123".to_string()),
            ..a1()
        };
        app.handle(Event::FlightsLoaded(vec![a1(), coded]));

        let commands = app.handle(Event::SearchSubmitted(" ABC123 ".to_string()));
        assert_eq!(commands, vec![Command::FetchDetail("B2".to_string())]);
        assert_eq!(app.map().selected_hex(), Some("B2"));
        assert_eq!(app.map().layer().viewport.center, LatLng::new(45.0, -85.0));
        assert_eq!(app.map().layer().style_of("B2"), Some(IconStyle::Selected));

    }

    #[test]
    fn test_search_for_selected_aircraft_deselects() {
        let mut app = app();
        app.handle(Event::FlightsLoaded(vec![a1()]));
        app.handle(Event::MarkerClicked("A1".to_string()));
        app.handle(Event::DetailLoaded {
            hex: "A1".to_string(),
            detail: Some(a1_detail()),
        });
        assert!(app.map().track().is_some());

        let commands = app.handle(Event::SearchSubmitted("A1".to_string()));
        assert!(commands.is_empty());
        assert_eq!(app.map().selected_hex(), None);
        assert_eq!(app.map().layer().style_of("A1"), Some(IconStyle::Default));
        assert!(app.map().layer().polylines.is_empty());

        // a second search selects it again
        let commands = app.handle(Event::SearchSubmitted("A1".to_string()));
        assert_eq!(commands, vec![Command::FetchDetail("A1".to_string())]);
        assert_eq!(app.map().selected_hex(), Some("A1"));
    }

    #[test]
    fn test_search_miss() {
        let mut app = app();
        app.handle(Event::FlightsLoaded(vec![a1()]));
        assert!(app.handle(Event::SearchSubmitted("ZZZ".to_string())).is_empty());
        assert!(app.handle(Event::SearchSubmitted("   ".to_string())).is_empty());
        assert!(!app.map().has_selection());
    }

    #[test]
    fn test_unknown_registration_uses_fallback_picture() {
        let mut app = app();
        let commands = app.handle(Event::DetailLoaded {
            hex: "A1".to_string(),
            detail: Some(FlightDetail::default()),
        });
        assert!(commands.is_empty());
        assert_eq!(app.view().pictures, vec![AirplanePicture::Fallback]);
    }

    #[test]
    fn test_picture_loaded_is_shown() {
        let mut app = app();
        let picture = AirplanePicture::Remote("https://img.example/p.jpg".to_string());
        app.handle(Event::PictureLoaded(picture.clone()));
        assert_eq!(app.view().pictures, vec![picture]);
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("quit"), Some(Event::Shutdown));
        assert_eq!(parse_input("click A1"), Some(Event::MarkerClicked("A1".to_string())));
        assert_eq!(parse_input("pan n"), Some(Event::Pan(PanDirection::North)));
        assert_eq!(parse_input("pan sideways"), None);
        assert_eq!(parse_input("zoom in"), Some(Event::Zoom(1)));
        assert_eq!(parse_input("zoom -"), Some(Event::Zoom(-1)));
        assert_eq!(parse_input("  UAL12 "), Some(Event::SearchSubmitted("UAL12".to_string())));
        assert_eq!(parse_input("   "), None);
    }
}
