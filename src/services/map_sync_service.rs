//! Keeps the map in step with the selected itinerary day
//!
//! Markers are derived state: they are rebuilt from `days[active]` whenever
//! the active day or the itinerary changes, and the old set is always torn
//! down before the new one is attached.

use log::debug;
use std::sync::Arc;

use crate::models::itinerary::Itinerary;
use crate::models::location::Bounds;
use crate::models::map::{DayView, FocusView, InfoWindow, MarkerId, MarkerSpec, PlacedMarker};
use crate::services::map_widget::MapWidget;
use crate::services::maps_loader_service::MapAvailability;

/// Fit-to-bounds never zooms past street level.
pub const MAX_READABLE_ZOOM: f64 = 16.0;
pub const INITIAL_ZOOM: f64 = 13.0;
pub const FOCUS_ZOOM: f64 = 15.0;

pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom > MAX_READABLE_ZOOM {
        MAX_READABLE_ZOOM
    } else {
        zoom
    }
}

/// Markers for a day's activities that carry a location, in activity order.
/// Unknown days have no markers.
pub fn markers_for_day(itinerary: &Itinerary, day: u32) -> Vec<MarkerSpec> {
    itinerary
        .day(day)
        .map(|plan| {
            plan.located_activities()
                .filter_map(|(index, activity)| MarkerSpec::for_activity(index, activity))
                .collect()
        })
        .unwrap_or_default()
}

pub struct MapSyncController<W: MapWidget> {
    widget: W,
    availability: MapAvailability,
    itinerary: Option<Arc<Itinerary>>,
    active_day: Option<u32>,
    markers: Vec<PlacedMarker>,
    bounds: Option<Bounds>,
}

impl<W: MapWidget> MapSyncController<W> {
    pub fn new(widget: W, availability: MapAvailability) -> Self {
        Self {
            widget,
            availability,
            itinerary: None,
            active_day: None,
            markers: Vec::new(),
            bounds: None,
        }
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn availability(&self) -> &MapAvailability {
        &self.availability
    }

    pub fn active_day(&self) -> Option<u32> {
        self.active_day
    }

    pub fn markers(&self) -> &[PlacedMarker] {
        &self.markers
    }

    fn is_showing(&self, itinerary: &Arc<Itinerary>, day: u32) -> bool {
        self.active_day == Some(day)
            && self
                .itinerary
                .as_ref()
                .is_some_and(|current| Arc::ptr_eq(current, itinerary))
    }

    /// Shows `day` of `itinerary`. Rebuilds only when the day or the
    /// itinerary reference changed.
    pub fn select_day(&mut self, itinerary: &Arc<Itinerary>, day: u32) -> DayView {
        if !self.is_showing(itinerary, day) {
            self.rebuild(itinerary, day);
        }
        self.view(day)
    }

    fn rebuild(&mut self, itinerary: &Arc<Itinerary>, day: u32) {
        self.teardown();
        self.itinerary = Some(Arc::clone(itinerary));
        self.active_day = Some(day);

        if !self.availability.is_available() {
            debug!("Map unavailable, skipping marker sync for day {}", day);
            return;
        }

        let specs = markers_for_day(itinerary, day);
        let Some(first) = specs.first() else {
            debug!("Day {} has no mappable activities", day);
            return;
        };

        if self.widget.viewport().center.is_none() {
            self.widget.set_center(first.position);
            self.widget.set_zoom(INITIAL_ZOOM);
        }

        for spec in specs {
            let id = self.widget.add_marker(&spec);
            self.markers.push(PlacedMarker { id, spec });
        }

        self.bounds = Bounds::from_points(self.markers.iter().map(|m| &m.spec.position));
        if let Some(bounds) = &self.bounds {
            self.widget.fit_bounds(bounds);
            let fitted = self.widget.viewport().zoom;
            let clamped = clamp_zoom(fitted);
            if clamped != fitted {
                self.widget.set_zoom(clamped);
            }
        }

        debug!("Day {}: {} markers on the map", day, self.markers.len());
    }

    fn teardown(&mut self) {
        self.widget.close_info_window();
        for marker in self.markers.drain(..) {
            self.widget.remove_marker(marker.id);
        }
        self.bounds = None;
    }

    /// Drops all markers, e.g. when the itinerary is replaced or cleared.
    pub fn reset(&mut self) {
        self.teardown();
        self.itinerary = None;
        self.active_day = None;
    }

    /// "Show on map": centres on the activity, zooms in and opens its
    /// callout. `None` (and no change) when the activity cannot be mapped.
    pub fn show_on_map(&mut self, activity_index: usize) -> Option<FocusView> {
        let marker = self
            .markers
            .iter()
            .find(|m| m.spec.activity_index == activity_index)?
            .clone();

        self.widget.set_center(marker.spec.position);
        self.widget.set_zoom(FOCUS_ZOOM);
        self.widget.open_info_window(marker.id);

        Some(FocusView {
            marker,
            viewport: self.widget.viewport(),
        })
    }

    /// Marker click: opens the marker's callout.
    pub fn click_marker(&mut self, id: MarkerId) -> Option<InfoWindow> {
        let marker = self.markers.iter().find(|m| m.id == id)?;
        self.widget.open_info_window(id);
        Some(marker.spec.info.clone())
    }

    fn view(&self, day: u32) -> DayView {
        DayView {
            day,
            map_available: self.availability.is_available(),
            markers: self.markers.clone(),
            bounds: self.bounds,
            viewport: self.widget.viewport(),
        }
    }
}
