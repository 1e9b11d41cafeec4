use std::collections::BTreeMap;
use std::f64::consts::{LN_2, PI};

use crate::models::location::{Bounds, LatLng};
use crate::models::map::{MarkerId, MarkerSpec, Viewport};

const WORLD_TILE_PX: f64 = 256.0;
const MAX_MAP_ZOOM: f64 = 21.0;
const DEFAULT_ZOOM: f64 = 13.0;

// Map panel is full width and h-96 on the itinerary page
pub const DEFAULT_WIDTH_PX: f64 = 768.0;
pub const DEFAULT_HEIGHT_PX: f64 = 384.0;

/// The operations the map controller needs from a map.
pub trait MapWidget: Send {
    fn viewport(&self) -> Viewport;
    fn set_center(&mut self, center: LatLng);
    fn set_zoom(&mut self, zoom: f64);
    /// Moves the viewport so the whole box is visible at the largest zoom.
    fn fit_bounds(&mut self, bounds: &Bounds);
    fn add_marker(&mut self, marker: &MarkerSpec) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId) -> bool;
    fn open_info_window(&mut self, id: MarkerId) -> bool;
    fn close_info_window(&mut self);
    fn marker_count(&self) -> usize;
}

fn lat_rad(lat: f64) -> f64 {
    let sin = (lat * PI / 180.0).sin();
    let rad_x2 = ((1.0 + sin) / (1.0 - sin)).ln() / 2.0;
    rad_x2.clamp(-PI, PI) / 2.0
}

fn zoom_for(map_px: f64, fraction: f64) -> f64 {
    ((map_px / WORLD_TILE_PX / fraction).ln() / LN_2).floor()
}

/// Largest whole Web-Mercator zoom at which `bounds` fits a
/// `width_px` x `height_px` viewport. A single point fits at the maximum zoom.
pub fn fit_zoom(bounds: &Bounds, width_px: f64, height_px: f64) -> f64 {
    let lat_fraction = (lat_rad(bounds.north) - lat_rad(bounds.south)) / PI;
    let lng_diff = bounds.east - bounds.west;
    let lng_fraction = (if lng_diff < 0.0 { lng_diff + 360.0 } else { lng_diff }) / 360.0;

    let lat_zoom = if lat_fraction > 0.0 {
        zoom_for(height_px, lat_fraction)
    } else {
        MAX_MAP_ZOOM
    };
    let lng_zoom = if lng_fraction > 0.0 {
        zoom_for(width_px, lng_fraction)
    } else {
        MAX_MAP_ZOOM
    };

    lat_zoom.min(lng_zoom).clamp(0.0, MAX_MAP_ZOOM)
}

/// In-memory map that keeps the resulting view so it can be handed to the
/// page as data.
#[derive(Debug, Clone)]
pub struct ViewportMap {
    width_px: f64,
    height_px: f64,
    center: Option<LatLng>,
    zoom: f64,
    markers: BTreeMap<MarkerId, MarkerSpec>,
    next_id: MarkerId,
    open_info: Option<MarkerId>,
}

impl Default for ViewportMap {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH_PX, DEFAULT_HEIGHT_PX)
    }
}

impl ViewportMap {
    pub fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px,
            height_px,
            center: None,
            zoom: DEFAULT_ZOOM,
            markers: BTreeMap::new(),
            next_id: 1,
            open_info: None,
        }
    }

    pub fn open_info_window_id(&self) -> Option<MarkerId> {
        self.open_info
    }
}

impl MapWidget for ViewportMap {
    fn viewport(&self) -> Viewport {
        Viewport {
            center: self.center,
            zoom: self.zoom,
        }
    }

    fn set_center(&mut self, center: LatLng) {
        self.center = Some(center);
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(0.0, MAX_MAP_ZOOM);
    }

    fn fit_bounds(&mut self, bounds: &Bounds) {
        self.center = Some(bounds.center());
        self.zoom = fit_zoom(bounds, self.width_px, self.height_px);
    }

    fn add_marker(&mut self, marker: &MarkerSpec) -> MarkerId {
        let id = self.next_id;
        self.next_id += 1;
        self.markers.insert(id, marker.clone());
        id
    }

    fn remove_marker(&mut self, id: MarkerId) -> bool {
        if self.open_info == Some(id) {
            self.open_info = None;
        }
        self.markers.remove(&id).is_some()
    }

    fn open_info_window(&mut self, id: MarkerId) -> bool {
        if self.markers.contains_key(&id) {
            self.open_info = Some(id);
            true
        } else {
            false
        }
    }

    fn close_info_window(&mut self) {
        self.open_info = None;
    }

    fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::map::InfoWindow;

    fn spec(lat: f64, lng: f64) -> MarkerSpec {
        MarkerSpec {
            activity_index: 0,
            label: "1".to_string(),
            title: "Spot".to_string(),
            position: LatLng::new(lat, lng),
            info: InfoWindow {
                title: "Spot".to_string(),
                description: String::new(),
                time: "09:00 AM".to_string(),
            },
        }
    }

    #[test]
    fn test_single_point_fits_at_max_zoom() {
        let point = LatLng::new(48.8584, 2.2945);
        let bounds = Bounds::from_points([&point]).unwrap();
        assert_eq!(fit_zoom(&bounds, DEFAULT_WIDTH_PX, DEFAULT_HEIGHT_PX), 21.0);
    }

    #[test]
    fn test_city_spread_fits_at_city_zoom() {
        let points = [LatLng::new(48.8530, 2.2945), LatLng::new(48.8606, 2.3499)];
        let bounds = Bounds::from_points(&points).unwrap();
        let zoom = fit_zoom(&bounds, DEFAULT_WIDTH_PX, DEFAULT_HEIGHT_PX);
        assert!((12.0..=15.0).contains(&zoom), "zoom {}", zoom);
    }

    #[test]
    fn test_wider_spread_zooms_out() {
        let city = Bounds::from_points(&[LatLng::new(48.85, 2.29), LatLng::new(48.86, 2.35)]).unwrap();
        let country = Bounds::from_points(&[LatLng::new(43.30, 5.37), LatLng::new(48.86, 2.35)]).unwrap();
        assert!(fit_zoom(&country, 768.0, 384.0) < fit_zoom(&city, 768.0, 384.0));
    }

    #[test]
    fn test_marker_lifecycle() {
        let mut map = ViewportMap::default();
        let a = map.add_marker(&spec(1.0, 1.0));
        let b = map.add_marker(&spec(2.0, 2.0));
        assert_ne!(a, b);
        assert_eq!(map.marker_count(), 2);

        assert!(map.open_info_window(b));
        assert!(map.remove_marker(b));
        assert_eq!(map.open_info_window_id(), None);
        assert!(!map.remove_marker(b));
        assert!(!map.open_info_window(b));
        assert_eq!(map.marker_count(), 1);
    }
}
