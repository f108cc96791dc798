//! Drawable map primitives handed to a map surface.

use serde::{Deserialize, Serialize};

use super::Category;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Initial map position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

/// Marker colors. Only these three are ever drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    Red,
    Yellow,
    Green,
}

impl MarkerColor {
    /// CSS color keyword.
    pub fn as_css(self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Yellow => "yellow",
            MarkerColor::Green => "green",
        }
    }
}

/// A filled circle drawn at a facility location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleMarker {
    pub location: LatLng,
    pub radius: f64,
    pub color: MarkerColor,
    pub fill: bool,
    pub fill_opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,
    pub category: Category,
}

/// Every primitive emitted for one rendered map, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<MapView>,
    pub markers: Vec<CircleMarker>,
}

impl MapDocument {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            view: None,
            markers: Vec::new(),
        }
    }
}
