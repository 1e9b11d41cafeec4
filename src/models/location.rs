use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the WGS84 coordinate ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Axis-aligned lat/lng box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing every point, `None` for an empty set.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Bounds {
            south: first.lat,
            west: first.lng,
            north: first.lat,
            east: first.lng,
        };
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: &LatLng) {
        self.south = self.south.min(point.lat);
        self.north = self.north.max(point.lat);
        self.west = self.west.min(point.lng);
        self.east = self.east.max(point.lng);
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south + self.north) / 2.0,
            (self.west + self.east) / 2.0,
        )
    }

    pub fn contains(&self, point: &LatLng) -> bool {
        (self.south..=self.north).contains(&point.lat) && (self.west..=self.east).contains(&point.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_cover_all_points() {
        let points = vec![
            LatLng::new(48.8584, 2.2945),
            LatLng::new(48.8606, 2.3376),
            LatLng::new(48.8530, 2.3499),
        ];
        let bounds = Bounds::from_points(&points).unwrap();

        assert_eq!(bounds.south, 48.8530);
        assert_eq!(bounds.north, 48.8606);
        assert_eq!(bounds.west, 2.2945);
        assert_eq!(bounds.east, 2.3499);
        assert!(points.iter().all(|p| bounds.contains(p)));
    }

    #[test]
    fn test_bounds_of_empty_set() {
        let points: Vec<LatLng> = Vec::new();
        assert!(Bounds::from_points(&points).is_none());
    }

    #[test]
    fn test_coordinate_ranges() {
        assert!(LatLng::new(48.85, 2.35).is_valid());
        assert!(!LatLng::new(91.0, 2.35).is_valid());
        assert!(!LatLng::new(10.0, f64::NAN).is_valid());
    }
}
