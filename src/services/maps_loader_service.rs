use log::{info, warn};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use url::Url;

use crate::errors::MapLoadError;

const MAPS_SCRIPT_URL: &str = "https://maps.googleapis.com/maps/api/js";
const MAPS_LIBRARIES: &str = "places";

/// Handle to the loaded maps library, shared for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLibrary {
    pub script_url: String,
    pub libraries: Vec<String>,
}

/// Whether a map can be drawn. Injected into the map controller instead of
/// probing for the library at sync time.
#[derive(Debug, Clone, PartialEq)]
pub enum MapAvailability {
    Available(Arc<MapLibrary>),
    Unavailable(String),
}

impl MapAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, MapAvailability::Available(_))
    }
}

pub struct MapLibraryLoader {
    api_key: Option<String>,
    library: OnceCell<Arc<MapLibrary>>,
    loads: AtomicUsize,
}

impl MapLibraryLoader {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            library: OnceCell::new(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Resolves the library once; later and concurrent callers get the same
    /// handle. A failed load is not cached.
    pub async fn load_map_library(&self) -> Result<Arc<MapLibrary>, MapLoadError> {
        self.library
            .get_or_try_init(|| async {
                self.loads.fetch_add(1, Ordering::SeqCst);
                let api_key = self.api_key.as_deref().ok_or(MapLoadError::MissingApiKey)?;
                let script_url = Url::parse_with_params(
                    MAPS_SCRIPT_URL,
                    &[("key", api_key), ("libraries", MAPS_LIBRARIES)],
                )
                .map_err(|e| MapLoadError::InvalidUrl(e.to_string()))?;

                info!("Map library ready ({} libraries)", MAPS_LIBRARIES);
                Ok(Arc::new(MapLibrary {
                    script_url: script_url.to_string(),
                    libraries: vec![MAPS_LIBRARIES.to_string()],
                }))
            })
            .await
            .cloned()
    }

    pub async fn capability(&self) -> MapAvailability {
        match self.load_map_library().await {
            Ok(library) => MapAvailability::Available(library),
            Err(e) => {
                warn!("Map unavailable: {}", e);
                MapAvailability::Unavailable(e.to_string())
            }
        }
    }

    /// Number of load attempts that actually ran.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}
