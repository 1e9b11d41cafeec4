use serde::Serialize;

use super::activity::Activity;
use super::location::{Bounds, LatLng};

pub type MarkerId = u64;

/// Callout shown when a marker is clicked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoWindow {
    pub title: String,
    pub description: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSpec {
    /// Position of the activity within its day, not within the marker list.
    pub activity_index: usize,
    pub label: String,
    pub title: String,
    pub position: LatLng,
    pub info: InfoWindow,
}

impl MarkerSpec {
    /// `None` when the activity has no location.
    pub fn for_activity(activity_index: usize, activity: &Activity) -> Option<Self> {
        let position = activity.location?;
        Some(Self {
            activity_index,
            label: (activity_index + 1).to_string(),
            title: activity.title.clone(),
            position,
            info: InfoWindow {
                title: activity.title.clone(),
                description: activity.description.clone(),
                time: activity.time.clone(),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedMarker {
    pub id: MarkerId,
    #[serde(flatten)]
    pub spec: MarkerSpec,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    pub center: Option<LatLng>,
    pub zoom: f64,
}

/// What the map shows after syncing to a day.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayView {
    pub day: u32,
    pub map_available: bool,
    pub markers: Vec<PlacedMarker>,
    pub bounds: Option<Bounds>,
    pub viewport: Viewport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusView {
    pub marker: PlacedMarker,
    pub viewport: Viewport,
}
