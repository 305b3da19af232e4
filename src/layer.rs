//! Render surface abstraction
//!
//!  A `MapLayer` owns the viewport and draws whatever marker and polyline
//!  layers `MapSurface` hands it.

use crate::error::PlacementError;
use crate::geo::{LatLng, LatLngBounds, Viewport};
use crate::marker::{IconStyle, Marker};

/// Handle of a marker or polyline drawn on a layer
pub type LayerId = u64;

pub trait MapLayer {
    fn viewport(&self) -> &Viewport;

    fn set_viewport(&mut self, viewport: Viewport);

    /// Currently visible rectangle
    fn bounds(&self) -> LatLngBounds {
        self.viewport().bounds()
    }

    fn add_marker(&mut self, marker: &Marker) -> Result<LayerId, PlacementError>;

    fn remove_marker(&mut self, id: LayerId);

    /// Swap the icon of a marker that stays where it is
    fn set_marker_style(&mut self, id: LayerId, style: IconStyle);

    fn add_polyline(&mut self, points: &[LatLng]) -> LayerId;

    fn remove_polyline(&mut self, id: LayerId);

    /// Called once a batch of changes is complete
    fn flush(&mut self) {}
}

#[cfg(test)]
pub mod testing {
    use std::collections::HashMap;

    use super::*;

    /// In-memory layer that records what is drawn on it
    #[derive(Debug)]
    pub struct RecordingLayer {
        pub viewport: Viewport,
        pub fixed_bounds: Option<LatLngBounds>,
        pub markers: HashMap<LayerId, Marker>,
        pub polylines: HashMap<LayerId, Vec<LatLng>>,
        pub reject_hex: Option<String>,
        pub flushes: usize,
        next_id: LayerId,
    }

    impl RecordingLayer {
        pub fn new(viewport: Viewport) -> Self {
            Self {
                viewport,
                fixed_bounds: None,
                markers: HashMap::new(),
                polylines: HashMap::new(),
                reject_hex: None,
                flushes: 0,
                next_id: 1,
            }
        }

        pub fn with_bounds(bounds: LatLngBounds) -> Self {
            let mut layer = Self::new(Viewport::new(LatLng::new(36.0, -95.0), 5, 1280, 720));
            layer.fixed_bounds = Some(bounds);
            layer
        }

        pub fn selected_count(&self) -> usize {
            self.markers.values().filter(|m| m.is_selected()).count()
        }

        pub fn style_of(&self, hex: &str) -> Option<IconStyle> {
            self.markers.values().find(|m| m.hex == hex).map(|m| m.style)
        }

        fn next(&mut self) -> LayerId {
            let id = self.next_id;
            self.next_id += 1;
            id
        }
    }

    impl MapLayer for RecordingLayer {
        fn viewport(&self) -> &Viewport {
            &self.viewport
        }

        fn set_viewport(&mut self, viewport: Viewport) {
            self.viewport = viewport;
            self.fixed_bounds = None;
        }

        fn bounds(&self) -> LatLngBounds {
            self.fixed_bounds.unwrap_or_else(|| self.viewport.bounds())
        }

        fn add_marker(&mut self, marker: &Marker) -> Result<LayerId, PlacementError> {
            if self.reject_hex.as_deref() == Some(marker.hex.as_str()) {
                return Err(PlacementError::Layer {
                    hex: marker.hex.clone(),
                    reason: "rejected by test layer".to_string(),
                });
            }
            let id = self.next();
            self.markers.insert(id, marker.clone());
            Ok(id)
        }

        fn remove_marker(&mut self, id: LayerId) {
            self.markers.remove(&id);
        }

        fn set_marker_style(&mut self, id: LayerId, style: IconStyle) {
            if let Some(marker) = self.markers.get_mut(&id) {
                marker.style = style;
            }
        }

        fn add_polyline(&mut self, points: &[LatLng]) -> LayerId {
            let id = self.next();
            self.polylines.insert(id, points.to_vec());
            id
        }

        fn remove_polyline(&mut self, id: LayerId) {
            self.polylines.remove(&id);
        }

        fn flush(&mut self) {
            self.flushes += 1;
        }
    }
}
