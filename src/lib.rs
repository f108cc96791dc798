//! healthmap - healthcare facility map for Jamaica
//!
//! Reads the facility workbook and renders one colored circle marker per
//! facility on a Leaflet map page:
//! - Government (red), Secondary Care (yellow), Primary Care (green) sheets
//! - Rows without usable coordinates are dropped
//! - Map centered on the mean facility location
//! - Government markers drawn on top
//!
//! # Usage (Rust)
//!
//! ```rust,no_run
//! use healthmap::config::DashboardConfig;
//!
//! let html = healthmap::dashboard::render_dashboard(&DashboardConfig::default())?;
//! # Ok::<(), healthmap::error::HealthmapError>(())
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { mount_dashboard } from 'healthmap';
//! await init();
//! mount_dashboard(bytes, 'map-container');
//! ```

pub mod cell_ref;
pub mod cleaner;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod parser;
pub mod render;
pub mod types;
pub mod xml_helpers;

use wasm_bindgen::prelude::*;

use config::DashboardConfig;

pub use types::*;

/// Read an optional JS config object; `undefined` and `null` mean defaults.
fn config_from_js(config: JsValue) -> Result<DashboardConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(DashboardConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid config: {e}")))
}

/// Render the dashboard page for an XLSX file
///
/// # Arguments
/// * `data` - The raw bytes of the XLSX file
/// * `config` - Optional partial `DashboardConfig` object
///
/// # Returns
/// A complete HTML document
///
/// # Errors
/// Returns an error if the workbook cannot be loaded or has no valid coordinates.
#[wasm_bindgen]
pub fn render_dashboard_html(data: &[u8], config: JsValue) -> Result<String, JsValue> {
    let config = config_from_js(config)?;
    dashboard::render_html(data, &config).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Return the map primitives (view and markers in draw order) as a `JsValue`
///
/// # Errors
/// Returns an error if the workbook cannot be loaded or has no valid coordinates.
#[wasm_bindgen]
pub fn render_dashboard_to_js(data: &[u8], config: JsValue) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    let doc = dashboard::build_map(data, &config).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&doc)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Render the dashboard into the element with the given id (WASM only).
///
/// The page is placed in an `iframe` so its Leaflet scripts run in their own document.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn mount_dashboard(data: &[u8], element_id: &str, config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = config_from_js(config)?;
    let html = dashboard::render_html(data, &config)?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let container = document
        .get_element_by_id(element_id)
        .ok_or_else(|| JsValue::from_str(&format!("Element not found: {element_id}")))?;

    let frame = document.create_element("iframe")?;
    frame.set_attribute("title", &config.title)?;
    frame.set_attribute("srcdoc", &html)?;
    frame.set_attribute("style", "width: 100%; height: 720px; border: 0;")?;

    container.set_inner_html("");
    container.append_child(&frame)?;
    Ok(())
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
