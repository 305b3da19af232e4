//! Marker reconciliation and selection
//!
//!  Every refresh rebuilds the whole marker set from the latest snapshot.
//!  The selected aircraft is remembered by hex so its styling survives the
//!  rebuild even though the marker itself is new.

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::PlacementError;
use crate::flight::AircraftSnapshotEntry;
use crate::geo::{LatLng, Viewport};
use crate::layer::{LayerId, MapLayer};
use crate::marker::{IconStyle, Marker};

/// Result of clicking a marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The marker became the selection; detail should be fetched
    Selected(String),
    /// The selected marker was clicked again and the selection cleared
    Deselected,
    /// No live marker carries that hex
    Missed,
}

#[derive(Debug)]
struct PlacedMarker {
    marker: Marker,
    layer_id: LayerId,
}

#[derive(Debug)]
struct Track {
    points: Vec<LatLng>,
    layer_id: LayerId,
}

pub struct MapSurface<L: MapLayer> {
    layer: L,
    /// Latest snapshot, reused when only the viewport changes
    snapshot: Vec<AircraftSnapshotEntry>,
    markers: Vec<PlacedMarker>,
    selected: Option<String>,
    track: Option<Track>,
    marker_cap: usize,
}

impl<L: MapLayer> MapSurface<L> {
    pub fn new(config: &Config, layer: L) -> Self {
        Self {
            layer,
            snapshot: Vec::new(),
            markers: Vec::new(),
            selected: None,
            track: None,
            marker_cap: config.marker_cap,
        }
    }

    #[allow(dead_code)]
    pub fn layer(&self) -> &L {
        &self.layer
    }

    /// Live markers in placement order
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().map(|p| &p.marker)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    #[allow(dead_code)]
    pub fn selected_hex(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    #[allow(dead_code)]
    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    #[allow(dead_code)]
    pub fn track(&self) -> Option<&[LatLng]> {
        self.track.as_ref().map(|t| t.points.as_slice())
    }

    pub fn is_in_bound(&self, coords: LatLng) -> bool {
        self.layer.bounds().contains(coords)
    }

    /// Rebuild the marker set. `None` reuses the retained snapshot.
    pub fn update_markers(&mut self, snapshot: Option<Vec<AircraftSnapshotEntry>>) {
        if let Some(snapshot) = snapshot {
            self.snapshot = snapshot;
        }

        for placed in self.markers.drain(..) {
            self.layer.remove_marker(placed.layer_id);
        }

        let mut placed = Vec::new();
        let mut selected_placed = false;
        let mut failures = 0usize;

        for entry in &self.snapshot {
            if placed.len() >= self.marker_cap {
                break;
            }

            let wants_selected = !selected_placed && self.selected.as_deref() == Some(entry.hex.as_str());
            let style = if wants_selected {
                IconStyle::Selected
            } else {
                IconStyle::Default
            };

            if let Err(e) = validate_entry(entry) {
                failures += 1;
                warn!("Skipping marker: {}", e);
                continue;
            }
            if !self.is_in_bound(entry.position()) {
                continue;
            }

            let marker = Marker::from_entry(entry, style);
            match self.layer.add_marker(&marker) {
                Ok(layer_id) => {
                    selected_placed |= wants_selected;
                    placed.push(PlacedMarker { marker, layer_id });
                }
                Err(e) => {
                    failures += 1;
                    warn!("Skipping marker: {}", e);
                }
            }
        }

        debug!(
            "Placed {} of {} aircraft ({} failed)",
            placed.len(),
            self.snapshot.len(),
            failures
        );

        self.markers = placed;
        self.layer.flush();
    }

    /// Toggle selection for `hex`. Returns true when this was a deselect.
    pub fn update_selected_plane(&mut self, hex: &str) -> bool {
        if self.selected.as_deref() == Some(hex) {
            self.restyle(hex, IconStyle::Default);
            self.selected = None;
            self.remove_lines();
            self.layer.flush();
            return true;
        }

        if let Some(previous) = self.selected.take() {
            self.restyle(&previous, IconStyle::Default);
        }
        self.restyle(hex, IconStyle::Selected);
        self.selected = Some(hex.to_string());
        self.layer.flush();
        false
    }

    /// Click on the marker carrying `hex`
    pub fn click_marker(&mut self, hex: &str) -> ClickOutcome {
        if !self.markers.iter().any(|p| p.marker.hex == hex) {
            return ClickOutcome::Missed;
        }
        if self.update_selected_plane(hex) {
            ClickOutcome::Deselected
        } else {
            ClickOutcome::Selected(hex.to_string())
        }
    }

    /// First live marker whose hex, ICAO or IATA code equals `query`
    pub fn find_flight_marker_from_params(&self, query: &str) -> Option<&Marker> {
        self.markers().find(|m| m.matches(query))
    }

    /// Replace the track with a polyline through `positions`
    pub fn draw_lines(&mut self, positions: &[LatLng]) {
        self.remove_lines();
        if positions.is_empty() {
            return;
        }
        let layer_id = self.layer.add_polyline(positions);
        self.track = Some(Track {
            points: positions.to_vec(),
            layer_id,
        });
        self.layer.flush();
    }

    pub fn remove_lines(&mut self) {
        if let Some(track) = self.track.take() {
            self.layer.remove_polyline(track.layer_id);
        }
    }

    /// Center the map on a point, keeping the zoom level
    pub fn move_map(&mut self, lat: f64, lng: f64) {
        let mut viewport = *self.layer.viewport();
        viewport.pan_to(LatLng::new(lat, lng));
        self.set_viewport(viewport);
    }

    /// Shift the view by a fraction of its width and height
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let mut viewport = *self.layer.viewport();
        viewport.pan_by(dx, dy);
        self.set_viewport(viewport);
    }

    pub fn zoom_by(&mut self, delta: i8) {
        let mut viewport = *self.layer.viewport();
        viewport.zoom_by(delta);
        self.set_viewport(viewport);
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.layer.set_viewport(viewport);
        self.update_markers(None);
    }

    fn restyle(&mut self, hex: &str, style: IconStyle) {
        if let Some(placed) = self.markers.iter_mut().find(|p| p.marker.hex == hex) {
            placed.marker.style = style;
            self.layer.set_marker_style(placed.layer_id, style);
        }
    }
}

/// Reject entries that cannot become a marker
fn validate_entry(entry: &AircraftSnapshotEntry) -> Result<(), PlacementError> {
    if entry.hex.is_empty() {
        return Err(PlacementError::MissingHex);
    }
    if !entry.position().is_finite() {
        return Err(PlacementError::InvalidCoordinates {
            hex: entry.hex.clone(),
            lat: entry.lat,
            lng: entry.lng,
        });
    }
    Ok(())
}
