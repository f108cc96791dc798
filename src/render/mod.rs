//! Map rendering.
//!
//! [`render_map`] turns a cleaned facility table into draw calls on a
//! [`MapSurface`]. The surface decides what a draw call produces: an HTML page
//! ([`leaflet::LeafletPage`]) or a plain record of primitives ([`MapDocument`]).

pub mod leaflet;

use crate::config::DashboardConfig;
use crate::error::{HealthmapError, Result};
use crate::types::{Category, CircleMarker, CleanedTable, LatLng, MapDocument, MapView};

pub use leaflet::LeafletPage;

/// Category draw order. Later layers are drawn on top, so Government markers
/// stay visible over Primary Care ones at the same spot.
pub const LAYER_ORDER: [Category; 3] = [
    Category::PrimaryCare,
    Category::SecondaryCare,
    Category::Government,
];

/// Trait for map surfaces
///
/// Implementations receive one `begin`, then every marker in draw order, then
/// one `finish`.
pub trait MapSurface {
    /// Start a map with the given initial view
    fn begin(&mut self, view: &MapView) -> Result<()>;

    /// Draw one circle marker on top of everything drawn so far
    fn draw_circle_marker(&mut self, marker: &CircleMarker) -> Result<()>;

    /// Complete the map
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl MapSurface for MapDocument {
    fn begin(&mut self, view: &MapView) -> Result<()> {
        self.view = Some(*view);
        self.markers.clear();
        Ok(())
    }

    fn draw_circle_marker(&mut self, marker: &CircleMarker) -> Result<()> {
        self.markers.push(marker.clone());
        Ok(())
    }
}

/// Mean latitude and mean longitude of every facility.
///
/// # Errors
/// Returns [`HealthmapError::NoLocations`] for an empty table.
#[allow(clippy::cast_precision_loss)]
pub fn compute_center(table: &CleanedTable) -> Result<LatLng> {
    if table.is_empty() {
        return Err(HealthmapError::NoLocations);
    }

    let (lat_sum, lng_sum) = table
        .facilities()
        .iter()
        .fold((0.0, 0.0), |(lat, lng), f| (lat + f.latitude, lng + f.longitude));
    let n = table.len() as f64;

    Ok(LatLng {
        lat: lat_sum / n,
        lng: lng_sum / n,
    })
}

/// Markers for every facility, in [`LAYER_ORDER`] and table order within a layer.
pub fn layered_markers(table: &CleanedTable, config: &DashboardConfig) -> Vec<CircleMarker> {
    LAYER_ORDER
        .iter()
        .flat_map(|&category| table.by_category(category))
        .map(|f| CircleMarker {
            location: LatLng {
                lat: f.latitude,
                lng: f.longitude,
            },
            radius: config.marker.radius,
            color: f.category.color(),
            fill: config.marker.fill,
            fill_opacity: config.marker.fill_opacity,
            popup: f.name.clone(),
            category: f.category,
        })
        .collect()
}

/// Draw the cleaned table onto a surface.
///
/// # Errors
/// Returns [`HealthmapError::NoLocations`] for an empty table, or whatever the
/// surface reports.
pub fn render_map<S: MapSurface + ?Sized>(
    table: &CleanedTable,
    config: &DashboardConfig,
    surface: &mut S,
) -> Result<()> {
    let view = MapView {
        center: compute_center(table)?,
        zoom: config.zoom,
    };
    log::debug!(
        "map center ({:.5}, {:.5}) at zoom {}",
        view.center.lat,
        view.center.lng,
        view.zoom
    );

    surface.begin(&view)?;
    let markers = layered_markers(table, config);
    for marker in &markers {
        surface.draw_circle_marker(marker)?;
    }
    surface.finish()?;

    log::info!("drew {} markers", markers.len());
    Ok(())
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::types::{Facility, MarkerColor};

    fn facility(category: Category, name: &str, latitude: f64, longitude: f64) -> Facility {
        Facility {
            category,
            name: Some(name.to_string()),
            latitude,
            longitude,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_center_is_mean() {
        let table = CleanedTable::new(vec![
            facility(Category::Government, "a", 18.0, -77.0),
            facility(Category::PrimaryCare, "b", 18.2, -76.8),
            facility(Category::PrimaryCare, "c", 18.4, -76.6),
        ]);
        let center = compute_center(&table).unwrap();
        assert!(close(center.lat, 18.2));
        assert!(close(center.lng, -76.8));
    }

    #[test]
    fn test_center_of_empty_table_fails() {
        let err = compute_center(&CleanedTable::default()).unwrap_err();
        assert!(matches!(err, HealthmapError::NoLocations));
    }

    #[test]
    fn test_layer_order_and_colors() {
        let table = CleanedTable::new(vec![
            facility(Category::Government, "g1", 18.0, -77.0),
            facility(Category::SecondaryCare, "s1", 18.1, -77.1),
            facility(Category::PrimaryCare, "p1", 18.2, -77.2),
            facility(Category::Government, "g2", 18.3, -77.3),
            facility(Category::PrimaryCare, "p2", 18.4, -77.4),
        ]);
        let markers = layered_markers(&table, &DashboardConfig::default());

        let popups: Vec<_> = markers.iter().filter_map(|m| m.popup.as_deref()).collect();
        assert_eq!(popups, ["p1", "p2", "s1", "g1", "g2"]);

        for marker in &markers {
            let expected = match marker.category {
                Category::Government => MarkerColor::Red,
                Category::SecondaryCare => MarkerColor::Yellow,
                Category::PrimaryCare => MarkerColor::Green,
            };
            assert_eq!(marker.color, expected);
            assert_eq!(marker.radius, 9.0);
            assert_eq!(marker.fill_opacity, 0.4);
            assert!(marker.fill);
        }
    }

    #[test]
    fn test_render_into_document() {
        let table = CleanedTable::new(vec![
            facility(Category::Government, "Clinic A", 18.0, -77.0),
            facility(Category::PrimaryCare, "Clinic B", 18.2, -76.8),
        ]);
        let mut doc = MapDocument::new("test");
        render_map(&table, &DashboardConfig::default(), &mut doc).unwrap();

        let view = doc.view.unwrap();
        assert_eq!(view.zoom, 10);
        assert!(close(view.center.lat, 18.1));
        assert!(close(view.center.lng, -76.9));
        assert_eq!(doc.markers.len(), 2);
        assert_eq!(doc.markers[0].color, MarkerColor::Green);
        assert_eq!(doc.markers[0].location, LatLng { lat: 18.2, lng: -76.8 });
        assert_eq!(doc.markers[1].color, MarkerColor::Red);
        assert_eq!(doc.markers[1].popup.as_deref(), Some("Clinic A"));
    }

    #[test]
    fn test_render_empty_table_draws_nothing() {
        let mut doc = MapDocument::new("test");
        let result = render_map(&CleanedTable::default(), &DashboardConfig::default(), &mut doc);
        assert!(matches!(result, Err(HealthmapError::NoLocations)));
        assert!(doc.view.is_none());
        assert!(doc.markers.is_empty());
    }
}
