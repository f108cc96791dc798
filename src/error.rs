//! Structured error types for healthmap.

/// All errors that can occur while loading the workbook and rendering the map.
#[derive(Debug, thiserror::Error)]
pub enum HealthmapError {
    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON serialization: {0}")]
    Json(#[from] serde_json::Error),

    /// A required worksheet is not present in the workbook.
    #[error("Worksheet not found: {0}")]
    MissingSheet(String),

    /// A sheet's relationship id has no target in the workbook relationships.
    #[error("Worksheet '{sheet}' refers to unknown relationship '{id}'")]
    UnresolvedSheet { sheet: String, id: String },

    /// A required header column is not present in a worksheet.
    #[error("Column '{column}' not found in worksheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    /// No row survived coordinate cleaning, so the map has no center.
    #[error("No facility has valid coordinates; cannot center the map")]
    NoLocations,

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HealthmapError>;

#[cfg(target_arch = "wasm32")]
impl From<HealthmapError> for wasm_bindgen::JsValue {
    fn from(e: HealthmapError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
