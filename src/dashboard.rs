//! The load, clean, render sequence.
//!
//! Every call starts from the workbook bytes; nothing is cached between runs.

use crate::cleaner::clean;
use crate::config::DashboardConfig;
use crate::error::Result;
use crate::loader::{load_facilities, load_facilities_from_bytes};
use crate::render::{render_map, LeafletPage, MapSurface};
use crate::types::{CleanedTable, MapDocument};

/// Load and clean the facility table from XLSX bytes.
///
/// # Errors
/// Returns an error if the workbook cannot be loaded.
pub fn load_cleaned(data: &[u8]) -> Result<CleanedTable> {
    Ok(clean(load_facilities_from_bytes(data)?))
}

/// Render the facility map from XLSX bytes onto any surface.
///
/// # Errors
/// Returns an error if the workbook cannot be loaded, no facility has valid
/// coordinates, or the surface fails.
pub fn render_to<S: MapSurface + ?Sized>(
    data: &[u8],
    config: &DashboardConfig,
    surface: &mut S,
) -> Result<()> {
    let table = load_cleaned(data)?;
    render_map(&table, config, surface)
}

/// Every map primitive for the workbook, in draw order.
///
/// # Errors
/// See [`render_to`].
pub fn build_map(data: &[u8], config: &DashboardConfig) -> Result<MapDocument> {
    let mut doc = MapDocument::new(config.title.clone());
    render_to(data, config, &mut doc)?;
    Ok(doc)
}

/// The dashboard page for the workbook, as HTML.
///
/// # Errors
/// See [`render_to`].
pub fn render_html(data: &[u8], config: &DashboardConfig) -> Result<String> {
    let mut page = LeafletPage::new(config);
    render_to(data, config, &mut page)?;
    page.into_html()
}

/// Read `config.input_path` and render the dashboard page.
///
/// # Errors
/// Returns an I/O error if the workbook is missing, otherwise see [`render_to`].
pub fn render_dashboard(config: &DashboardConfig) -> Result<String> {
    let table = clean(load_facilities(&config.input_path)?);
    let mut page = LeafletPage::new(config);
    render_map(&table, config, &mut page)?;
    page.into_html()
}
