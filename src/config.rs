//! Dashboard configuration.
//!
//! Defaults reproduce the published dashboard exactly. Nothing here is read from
//! the environment; callers that want different values build the struct
//! themselves (or pass a JS object to the WebAssembly exports).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Workbook read when no path is given.
pub const DEFAULT_INPUT_PATH: &str = "Jamaica Locations Healthcare settings.xlsx";

/// Page and map title.
pub const DEFAULT_TITLE: &str = "Healthcare Centers in Jamaica";

/// Initial zoom level of the map.
pub const DEFAULT_ZOOM: u8 = 10;

/// OpenStreetMap tile server, the Leaflet default.
pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";

pub const DEFAULT_TILE_ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

/// Appearance shared by every facility marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkerStyle {
    /// Circle radius in screen pixels.
    pub radius: f64,
    pub fill: bool,
    pub fill_opacity: f64,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: 9.0,
            fill: true,
            fill_opacity: 0.4,
        }
    }
}

/// Everything one dashboard run needs besides the workbook itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardConfig {
    pub input_path: PathBuf,
    pub title: String,
    pub zoom: u8,
    pub marker: MarkerStyle,
    pub tile_url: String,
    pub tile_attribution: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            title: DEFAULT_TITLE.to_string(),
            zoom: DEFAULT_ZOOM,
            marker: MarkerStyle::default(),
            tile_url: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }
}
