use serde::{Deserialize, Serialize};

/// Cell with position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    pub r: u32, // row (0-indexed)
    pub c: u32, // col (0-indexed)
    pub value: CellValue,
}

/// A single non-empty cell value.
///
/// Shared and inline strings both resolve to `String`; the parser never
/// produces an empty-cell variant because sheets are stored sparsely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v", rename_all = "camelCase")]
pub enum CellValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Error(String),
}

impl CellValue {
    /// Text shown for this value in a label or popup.
    ///
    /// Whole numbers print without a fractional part ("12", not "12.0").
    pub fn display_text(&self) -> String {
        match self {
            CellValue::String(s) | CellValue::Error(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract().abs() < f64::EPSILON && n.abs() < 1e15 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}
