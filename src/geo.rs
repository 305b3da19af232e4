//! Geographic primitives and the map viewport
//!
//!  Viewport bounds follow Web Mercator with 256 px tiles, the same projection
//!  the tile servers use.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Tile edge in pixels at zoom 0
const TILE_SIZE: f64 = 256.0;

/// Zoom range served by the tile layer
pub const MIN_ZOOM: u8 = 3;
pub const MAX_ZOOM: u8 = 14;

/// Largest latitude representable in Web Mercator
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// Axis-aligned rectangle given by its south-west and north-east corners
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Whole world, used as the pan limit
    pub fn world() -> Self {
        Self::new(LatLng::new(-90.0, -180.0), LatLng::new(90.0, 180.0))
    }

    /// Inclusive containment test. NaN coordinates are never contained.
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    pub fn clamp(&self, point: LatLng) -> LatLng {
        LatLng::new(
            point.lat.clamp(self.south_west.lat, self.north_east.lat),
            point.lng.clamp(self.south_west.lng, self.north_east.lng),
        )
    }
}

/// Visible portion of the map: a center, a zoom level and a pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: u8, width: u32, height: u32) -> Self {
        let mut viewport = Self {
            center,
            zoom: MIN_ZOOM,
            width,
            height,
        };
        viewport.set_zoom(zoom);
        viewport.pan_to(center);
        viewport
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * f64::from(1u32 << self.zoom)
    }

    /// Project a point to world pixel coordinates at the current zoom
    pub fn project(&self, point: LatLng) -> (f64, f64) {
        let world = self.world_size();
        let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
        let x = (point.lng + 180.0) / 360.0 * world;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * world;
        (x, y)
    }

    pub fn unproject(&self, x: f64, y: f64) -> LatLng {
        let world = self.world_size();
        let lng = x / world * 360.0 - 180.0;
        let n = PI * (1.0 - 2.0 * y / world);
        let lat = n.sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }

    /// Rectangle currently on screen
    pub fn bounds(&self) -> LatLngBounds {
        let (cx, cy) = self.project(self.center);
        let half_w = f64::from(self.width) / 2.0;
        let half_h = f64::from(self.height) / 2.0;
        LatLngBounds::new(
            self.unproject(cx - half_w, cy + half_h),
            self.unproject(cx + half_w, cy - half_h),
        )
    }

    /// Position of `point` inside the viewport as fractions of width and height.
    /// Values outside 0..1 are off screen.
    pub fn relative_position(&self, point: LatLng) -> (f64, f64) {
        let (cx, cy) = self.project(self.center);
        let (px, py) = self.project(point);
        let fx = (px - cx) / f64::from(self.width.max(1)) + 0.5;
        let fy = (py - cy) / f64::from(self.height.max(1)) + 0.5;
        (fx, fy)
    }

    pub fn pan_to(&mut self, center: LatLng) {
        let limited = LatLngBounds::world().clamp(center);
        self.center = LatLng::new(limited.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE), limited.lng);
    }

    /// Move the center by a fraction of the visible span
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let (cx, cy) = self.project(self.center);
        let target = self.unproject(
            cx + dx * f64::from(self.width),
            cy + dy * f64::from(self.height),
        );
        self.pan_to(target);
    }

    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_by(&mut self, delta: i8) {
        let zoom = i16::from(self.zoom) + i16::from(delta);
        self.set_zoom(zoom.clamp(0, i16::from(u8::MAX)) as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn startup() -> Viewport {
        Viewport::new(LatLng::new(36.0, -95.0), 5, 1280, 720)
    }

    #[test]
    fn test_bounds_contain_center() {
        let vp = startup();
        let bounds = vp.bounds();
        assert!(bounds.contains(vp.center));
        assert!(bounds.south_west.lat < 36.0 && bounds.north_east.lat > 36.0);
        assert!(bounds.south_west.lng < -95.0 && bounds.north_east.lng > -95.0);
    }

    #[test]
    fn test_contains_is_inclusive_and_rejects_nan() {
        let bounds = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(10.0, 10.0));
        assert!(bounds.contains(LatLng::new(0.0, 10.0)));
        assert!(!bounds.contains(LatLng::new(10.5, 5.0)));
        assert!(!bounds.contains(LatLng::new(f64::NAN, 5.0)));
    }

    #[test]
    fn test_project_roundtrip_point() {
        let vp = startup();
        let (x, y) = vp.project(LatLng::new(40.0, -90.0));
        let back = vp.unproject(x, y);
        assert!((back.lat - 40.0).abs() < 1e-9);
        assert!((back.lng + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_zoom_in_shrinks_bounds() {
        let mut vp = startup();
        let wide = vp.bounds();
        vp.zoom_by(2);
        let narrow = vp.bounds();
        assert!(narrow.north_east.lng - narrow.south_west.lng < wide.north_east.lng - wide.south_west.lng);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = startup();
        vp.zoom_by(-10);
        assert_eq!(vp.zoom, MIN_ZOOM);
        vp.zoom_by(100);
        assert_eq!(vp.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_pan_is_limited_to_world() {
        let mut vp = startup();
        vp.pan_to(LatLng::new(120.0, 500.0));
        assert_eq!(vp.center.lng, 180.0);
        assert!((vp.center.lat - MAX_LATITUDE).abs() < 1e-12);
    }

    #[test]
    fn test_relative_position_of_center() {
        let vp = startup();
        let (fx, fy) = vp.relative_position(vp.center);
        assert!((fx - 0.5).abs() < 1e-9);
        assert!((fy - 0.5).abs() < 1e-9);
    }
}
