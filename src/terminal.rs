//! Terminal rendering of the map
//!
//!  The layer and the info view write into a shared `Scene`; a separate task
//!  redraws the screen from it at a fixed rate.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::debug;

use crate::api::AirplanePicture;
use crate::detail::{FlightInfoPanel, InfoView};
use crate::error::PlacementError;
use crate::geo::{LatLng, Viewport};
use crate::layer::{LayerId, MapLayer};
use crate::marker::{IconStyle, Marker};

const BOLD: &str = "\x1B[1m";
const RED: &str = "\x1B[91m";
const RESET: &str = "\x1B[0m";

const SELECTED_GLYPH: char = '@';
const TRACK_GLYPH: char = '.';

/// Everything currently drawn
#[derive(Debug)]
pub struct Scene {
    pub viewport: Viewport,
    pub markers: BTreeMap<LayerId, Marker>,
    pub polylines: BTreeMap<LayerId, Vec<LatLng>>,
    pub panel: Option<FlightInfoPanel>,
    pub picture: Option<String>,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            markers: BTreeMap::new(),
            polylines: BTreeMap::new(),
            panel: None,
            picture: None,
        }
    }
}

pub type SharedScene = Arc<RwLock<Scene>>;

pub struct TerminalLayer {
    scene: SharedScene,
    viewport: Viewport,
    next_id: LayerId,
}

impl TerminalLayer {
    pub fn new(scene: SharedScene) -> Self {
        let viewport = scene.read().viewport;
        Self {
            scene,
            viewport,
            next_id: 1,
        }
    }

    fn next(&mut self) -> LayerId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl MapLayer for TerminalLayer {
    fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scene.write().viewport = viewport;
    }

    fn add_marker(&mut self, marker: &Marker) -> Result<LayerId, PlacementError> {
        let id = self.next();
        self.scene.write().markers.insert(id, marker.clone());
        Ok(id)
    }

    fn remove_marker(&mut self, id: LayerId) {
        self.scene.write().markers.remove(&id);
    }

    fn set_marker_style(&mut self, id: LayerId, style: IconStyle) {
        if let Some(marker) = self.scene.write().markers.get_mut(&id) {
            marker.style = style;
        }
    }

    fn add_polyline(&mut self, points: &[LatLng]) -> LayerId {
        let id = self.next();
        self.scene.write().polylines.insert(id, points.to_vec());
        id
    }

    fn remove_polyline(&mut self, id: LayerId) {
        self.scene.write().polylines.remove(&id);
    }

    fn flush(&mut self) {
        let scene = self.scene.read();
        debug!(
            "Scene: {} markers, {} polylines",
            scene.markers.len(),
            scene.polylines.len()
        );
    }
}

pub struct TerminalView {
    scene: SharedScene,
}

impl TerminalView {
    pub fn new(scene: SharedScene) -> Self {
        Self { scene }
    }
}

impl InfoView for TerminalView {
    fn show_flight_info(&mut self, panel: &FlightInfoPanel) {
        let mut scene = self.scene.write();
        scene.panel = Some(panel.clone());
        scene.picture = None;
    }

    fn show_airplane_picture(&mut self, picture: &AirplanePicture) {
        self.scene.write().picture = Some(picture.url().to_string());
    }
}

/// Arrow for a heading, 8 compass sectors
fn heading_glyph(degrees: f64) -> char {
    const ARROWS: [char; 8] = ['^', '/', '>', '\\', 'v', '/', '<', '\\'];
    let sector = ((degrees.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    ARROWS[sector]
}

fn cell_of(viewport: &Viewport, point: LatLng, rows: usize, cols: usize) -> Option<(usize, usize)> {
    if rows == 0 || cols == 0 {
        return None;
    }
    let (fx, fy) = viewport.relative_position(point);
    if !(0.0..1.0).contains(&fx) || !(0.0..1.0).contains(&fy) {
        return None;
    }
    Some(((fy * rows as f64) as usize, (fx * cols as f64) as usize))
}

/// Render the map grid followed by the info panel
pub fn render(scene: &Scene, rows: usize, cols: usize) -> Vec<String> {
    let mut grid = vec![vec![' '; cols]; rows];

    for points in scene.polylines.values() {
        for pair in points.windows(2) {
            let steps = cols.max(rows);
            for step in 0..=steps {
                let t = step as f64 / steps as f64;
                let point = LatLng::new(
                    pair[0].lat + (pair[1].lat - pair[0].lat) * t,
                    pair[0].lng + (pair[1].lng - pair[0].lng) * t,
                );
                if let Some((r, c)) = cell_of(&scene.viewport, point, rows, cols) {
                    grid[r][c] = TRACK_GLYPH;
                }
            }
        }
        if let [single] = points.as_slice() {
            if let Some((r, c)) = cell_of(&scene.viewport, *single, rows, cols) {
                grid[r][c] = TRACK_GLYPH;
            }
        }
    }

    let mut selected_cell = None;
    for marker in scene.markers.values() {
        let Some((r, c)) = cell_of(&scene.viewport, marker.position, rows, cols) else {
            continue;
        };
        if marker.is_selected() {
            selected_cell = Some((r, c));
        } else {
            grid[r][c] = heading_glyph(marker.rotation);
        }
    }
    if let Some((r, c)) = selected_cell {
        grid[r][c] = SELECTED_GLYPH;
    }

    let mut lines: Vec<String> = grid.into_iter().map(|row| row.into_iter().collect()).collect();

    let selected = scene.markers.values().find(|m| m.is_selected());
    lines.push("-".repeat(cols));
    lines.push(format!(
        "Aircraft: {} | Center: {:.2},{:.2} | Zoom: {}{}",
        scene.markers.len(),
        scene.viewport.center.lat,
        scene.viewport.center.lng,
        scene.viewport.zoom,
        selected
            .map(|m| format!(" | Selected: {} ({})", m.tooltip(), m.hex))
            .unwrap_or_default()
    ));

    if let Some(panel) = &scene.panel {
        lines.push(format!(
            "{} | {} {}",
            panel.flight_icao, panel.airline_code, panel.airline_name
        ));
        lines.push(format!(
            "{} {} -> {} {}",
            panel.from_iata, panel.from_city, panel.to_iata, panel.to_city
        ));
        lines.push(format!(
            "Depart: {} {} | Arrive: {} {}",
            panel.depart_estimated, panel.depart_actual, panel.arrive_estimated, panel.arrive_actual
        ));
        lines.push(format!("Reg: {} | Logo: {}", panel.registration, panel.airline_logo_url));
        if let Some(picture) = &scene.picture {
            lines.push(format!("Picture: {}", picture));
        }
    }

    lines
}

/// Redraw the terminal from the shared scene until the task is aborted
pub async fn run_display(scene: SharedScene, rows: usize, cols: usize) {
    let refresh_interval = Duration::from_millis(250);

    loop {
        tokio::time::sleep(refresh_interval).await;

        let lines = {
            let scene = scene.read();
            render(&scene, rows, cols)
        };

        let mut out = io::stdout().lock();
        let _ = write!(out, "\x1B[2J\x1B[H");
        for (i, line) in lines.iter().enumerate() {
            if i < rows && line.contains(SELECTED_GLYPH) {
                let colored = line.replace(SELECTED_GLYPH, &format!("{BOLD}{RED}{SELECTED_GLYPH}{RESET}"));
                let _ = writeln!(out, "{}", colored);
            } else {
                let _ = writeln!(out, "{}", line);
            }
        }
        let _ = write!(out, "> ");
        out.flush().ok();
    }
}
