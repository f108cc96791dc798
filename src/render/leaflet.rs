//! Leaflet page surface.
//!
//! Writes a self-contained HTML page: a title heading, a full-width map `div`,
//! and a script that creates the Leaflet map and one `L.circleMarker` per draw
//! call. Values reach the script as JSON so names with quotes or markup cannot
//! break out of it.

use serde::Serialize;

use super::MapSurface;
use crate::config::DashboardConfig;
use crate::error::{HealthmapError, Result};
use crate::types::{CircleMarker, MapView};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

/// Escape text for use in HTML element content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize a value as JSON that is safe inside an inline `<script>`.
fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CircleOptions<'a> {
    radius: f64,
    color: &'a str,
    fill: bool,
    fill_opacity: f64,
}

#[derive(Serialize)]
struct TileOptions<'a> {
    #[serde(rename = "maxZoom")]
    max_zoom: u8,
    attribution: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    Empty,
    Drawing,
    Finished,
}

/// [`MapSurface`] that builds a Leaflet HTML page.
#[derive(Debug)]
pub struct LeafletPage {
    title: String,
    tile_url: String,
    tile_attribution: String,
    html: String,
    state: PageState,
}

impl LeafletPage {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            title: config.title.clone(),
            tile_url: config.tile_url.clone(),
            tile_attribution: config.tile_attribution.clone(),
            html: String::with_capacity(16 * 1024),
            state: PageState::Empty,
        }
    }

    /// The finished page.
    ///
    /// # Errors
    /// Returns [`HealthmapError::Render`] if the map was never finished.
    pub fn into_html(self) -> Result<String> {
        if self.state != PageState::Finished {
            return Err(HealthmapError::Render(
                "page requested before the map was finished".to_string(),
            ));
        }
        Ok(self.html)
    }

    fn expect_state(&self, expected: PageState, action: &str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(HealthmapError::Render(format!(
                "cannot {action} while the page is {:?}",
                self.state
            )))
        }
    }
}

impl MapSurface for LeafletPage {
    fn begin(&mut self, view: &MapView) -> Result<()> {
        self.expect_state(PageState::Empty, "begin a map")?;

        let title = escape_html(&self.title);
        let out = &mut self.html;
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\" />\n");
        out.push_str(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n",
        );
        out.push_str(&format!("<title>{title}</title>\n"));
        out.push_str(&format!(
            "<link rel=\"stylesheet\" href=\"{LEAFLET_CSS}\" crossorigin=\"\" />\n"
        ));
        out.push_str(&format!(
            "<script src=\"{LEAFLET_JS}\" crossorigin=\"\"></script>\n"
        ));
        out.push_str("<style>\n");
        out.push_str("  body { margin: 0 auto; max-width: 960px; padding: 1rem; font-family: sans-serif; }\n");
        out.push_str("  #map { width: 100%; height: 600px; }\n");
        out.push_str("</style>\n</head>\n<body>\n");
        out.push_str(&format!("<h1>{title}</h1>\n"));
        out.push_str("<div id=\"map\"></div>\n<script>\n");

        out.push_str(&format!(
            "const map = L.map('map').setView([{}, {}], {});\n",
            view.center.lat, view.center.lng, view.zoom
        ));
        let tiles = TileOptions {
            max_zoom: 19,
            attribution: &self.tile_attribution,
        };
        let tile_line = format!(
            "L.tileLayer({}, {}).addTo(map);\n",
            script_json(&self.tile_url)?,
            script_json(&tiles)?
        );
        self.html.push_str(&tile_line);

        self.state = PageState::Drawing;
        Ok(())
    }

    fn draw_circle_marker(&mut self, marker: &CircleMarker) -> Result<()> {
        self.expect_state(PageState::Drawing, "draw a marker")?;

        let options = CircleOptions {
            radius: marker.radius,
            color: marker.color.as_css(),
            fill: marker.fill,
            fill_opacity: marker.fill_opacity,
        };
        let mut line = format!(
            "L.circleMarker([{}, {}], {})",
            marker.location.lat,
            marker.location.lng,
            script_json(&options)?
        );
        // Leaflet renders popup strings as HTML
        if let Some(popup) = &marker.popup {
            line.push_str(&format!(
                ".bindPopup({})",
                script_json(&escape_html(popup))?
            ));
        }
        line.push_str(".addTo(map);\n");
        self.html.push_str(&line);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.expect_state(PageState::Drawing, "finish the map")?;
        self.html.push_str("</script>\n</body>\n</html>\n");
        self.state = PageState::Finished;
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::types::{Category, LatLng, MarkerColor};

    fn view() -> MapView {
        MapView {
            center: LatLng {
                lat: 18.1,
                lng: -76.9,
            },
            zoom: 10,
        }
    }

    fn marker(popup: Option<&str>) -> CircleMarker {
        CircleMarker {
            location: LatLng {
                lat: 18.2,
                lng: -76.8,
            },
            radius: 9.0,
            color: MarkerColor::Green,
            fill: true,
            fill_opacity: 0.4,
            popup: popup.map(ToString::to_string),
            category: Category::PrimaryCare,
        }
    }

    #[test]
    fn test_page_structure() {
        let mut page = LeafletPage::new(&DashboardConfig::default());
        page.begin(&view()).unwrap();
        page.draw_circle_marker(&marker(Some("Clinic B"))).unwrap();
        page.finish().unwrap();
        let html = page.into_html().unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Healthcare Centers in Jamaica</title>"));
        assert!(html.contains("<h1>Healthcare Centers in Jamaica</h1>"));
        assert!(html.contains("L.map('map').setView([18.1, -76.9], 10);"));
        assert!(html.contains(
            r#"L.circleMarker([18.2, -76.8], {"radius":9.0,"color":"green","fill":true,"fillOpacity":0.4}).bindPopup("Clinic B").addTo(map);"#
        ));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_popup_text_is_escaped() {
        let mut page = LeafletPage::new(&DashboardConfig::default());
        page.begin(&view()).unwrap();
        page.draw_circle_marker(&marker(Some("St. Ann's <Bay> \"Clinic\"</script>")))
            .unwrap();
        page.finish().unwrap();
        let html = page.into_html().unwrap();

        assert!(!html.contains("<Bay>"));
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains("St. Ann&#39;s &lt;Bay&gt;"));
    }

    #[test]
    fn test_marker_without_name_has_no_popup() {
        let mut page = LeafletPage::new(&DashboardConfig::default());
        page.begin(&view()).unwrap();
        page.draw_circle_marker(&marker(None)).unwrap();
        page.finish().unwrap();
        let html = page.into_html().unwrap();
        assert!(!html.contains("bindPopup"));
    }

    #[test]
    fn test_out_of_order_calls_fail() {
        let mut page = LeafletPage::new(&DashboardConfig::default());
        assert!(matches!(
            page.draw_circle_marker(&marker(None)),
            Err(HealthmapError::Render(_))
        ));
        page.begin(&view()).unwrap();
        assert!(page.begin(&view()).is_err());
        let unfinished = LeafletPage::new(&DashboardConfig::default());
        assert!(unfinished.into_html().is_err());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("<i>"), "&lt;i&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
