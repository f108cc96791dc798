//! Facility workbook loading.
//!
//! Reads the three category worksheets and concatenates their data rows into one
//! table, tagging each row with the category of the sheet it came from.

use std::path::Path;

use crate::cell_ref::col_to_letter;
use crate::error::{HealthmapError, Result};
use crate::parser;
use crate::types::{CellData, CellValue, Category, FacilityRecord, Sheet};

pub const NAME_COLUMN: &str = "Name";
pub const LATITUDE_COLUMN: &str = "Latitude";
pub const LONGITUDE_COLUMN: &str = "Longitude";

/// Where the required columns sit in one worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    header_row: u32,
    name: u32,
    latitude: u32,
    longitude: u32,
}

/// Find the header row (the first populated row) and the required columns in it.
fn locate_columns(sheet: &Sheet) -> Result<ColumnMap> {
    let (header_row, header): (u32, &[CellData]) = sheet.rows().next().unwrap_or_default();

    // Exact match; duplicate headers resolve to the leftmost column
    let find = |column: &str| -> Result<u32> {
        header
            .iter()
            .find(|cd| cd.value.display_text() == column)
            .map(|cd| cd.c)
            .ok_or_else(|| HealthmapError::MissingColumn {
                sheet: sheet.name.clone(),
                column: column.to_string(),
            })
    };

    Ok(ColumnMap {
        header_row,
        name: find(NAME_COLUMN)?,
        latitude: find(LATITUDE_COLUMN)?,
        longitude: find(LONGITUDE_COLUMN)?,
    })
}

fn value_at(cells: &[CellData], col: u32) -> Option<&CellValue> {
    cells.iter().find(|cd| cd.c == col).map(|cd| &cd.value)
}

/// Data rows of one category sheet, in sheet order.
fn sheet_records(sheet: &Sheet, category: Category) -> Result<Vec<FacilityRecord>> {
    let columns = locate_columns(sheet)?;
    log::debug!(
        "sheet '{}': header on row {}, {}={}, {}={}, {}={}",
        sheet.name,
        columns.header_row + 1,
        NAME_COLUMN,
        col_to_letter(columns.name),
        LATITUDE_COLUMN,
        col_to_letter(columns.latitude),
        LONGITUDE_COLUMN,
        col_to_letter(columns.longitude),
    );

    let records = sheet
        .rows()
        .filter(|(row, _)| *row > columns.header_row)
        .map(|(row, cells)| FacilityRecord {
            category,
            row,
            name: value_at(cells, columns.name).map(CellValue::display_text),
            latitude: value_at(cells, columns.latitude).cloned(),
            longitude: value_at(cells, columns.longitude).cloned(),
        })
        .collect();

    Ok(records)
}

/// Load the combined facility table from XLSX bytes.
///
/// Government rows come first, then Secondary Care, then Primary Care; rows keep
/// their sheet order within each category.
///
/// # Errors
/// Returns an error if the workbook is malformed, a category sheet is missing,
/// or a sheet lacks a `Name`, `Latitude`, or `Longitude` header.
pub fn load_facilities_from_bytes(data: &[u8]) -> Result<Vec<FacilityRecord>> {
    let names = Category::ALL.map(Category::sheet_name);
    let workbook = parser::parse_sheets(data, &names)?;

    let mut combined = Vec::new();
    for (category, sheet) in Category::ALL.into_iter().zip(&workbook.sheets) {
        let records = sheet_records(sheet, category)?;
        log::debug!("loaded {} rows from '{}'", records.len(), category);
        combined.extend(records);
    }

    Ok(combined)
}

/// Load the combined facility table from an XLSX file on disk.
///
/// # Errors
/// Returns [`HealthmapError::Io`] if the file cannot be read, otherwise as
/// [`load_facilities_from_bytes`].
pub fn load_facilities(path: &Path) -> Result<Vec<FacilityRecord>> {
    let data = std::fs::read(path)?;
    log::info!("read {} bytes from {}", data.len(), path.display());
    load_facilities_from_bytes(&data)
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

    fn sheet(cells: Vec<(u32, u32, CellValue)>) -> Sheet {
        let mut sheet = Sheet::new("Government");
        sheet.cells = cells
            .into_iter()
            .map(|(r, c, value)| CellData { r, c, value })
            .collect();
        sheet
    }

    fn text(s: &str) -> CellValue {
        CellValue::String(s.to_string())
    }

    #[test]
    fn test_locate_columns_any_order() {
        let s = sheet(vec![
            (0, 0, text("Longitude")),
            (0, 1, text("Parish")),
            (0, 2, text("Name")),
            (0, 3, text("Latitude")),
        ]);
        let columns = locate_columns(&s).unwrap();
        assert_eq!(columns.header_row, 0);
        assert_eq!(columns.name, 2);
        assert_eq!(columns.latitude, 3);
        assert_eq!(columns.longitude, 0);
    }

    #[test]
    fn test_header_is_first_populated_row() {
        let s = sheet(vec![
            (2, 0, text("Name")),
            (2, 1, text("Latitude")),
            (2, 2, text("Longitude")),
            (3, 0, text("Clinic")),
        ]);
        let records = sheet_records(&s, Category::Government).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].row, 3);
        assert_eq!(records[0].name.as_deref(), Some("Clinic"));
        assert_eq!(records[0].latitude, None);
    }

    #[test]
    fn test_missing_column_is_reported() {
        let s = sheet(vec![(0, 0, text("Name")), (0, 1, text("Latitude"))]);
        match locate_columns(&s) {
            Err(HealthmapError::MissingColumn { sheet, column }) => {
                assert_eq!(sheet, "Government");
                assert_eq!(column, "Longitude");
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_sheet_has_no_header() {
        let s = sheet(Vec::new());
        assert!(matches!(
            locate_columns(&s),
            Err(HealthmapError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_records_keep_raw_values() {
        let s = sheet(vec![
            (0, 0, text("Name")),
            (0, 1, text("Latitude")),
            (0, 2, text("Longitude")),
            (1, 0, text("A")),
            (1, 1, CellValue::Number(18.0)),
            (1, 2, text("-77.0")),
            (2, 1, text("n/a")),
        ]);
        let records = sheet_records(&s, Category::PrimaryCare).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.category == Category::PrimaryCare));
        assert_eq!(records[0].latitude, Some(CellValue::Number(18.0)));
        assert_eq!(records[0].longitude, Some(text("-77.0")));
        assert_eq!(records[1].name, None);
        assert_eq!(records[1].latitude, Some(text("n/a")));
    }

    #[test]
    fn test_header_match_is_exact() {
        let s = sheet(vec![
            (0, 0, text("Name")),
            (0, 1, text("Latitude ")),
            (0, 2, text("Longitude")),
        ]);
        match locate_columns(&s) {
            Err(HealthmapError::MissingColumn { column, .. }) => assert_eq!(column, "Latitude"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }

        let lower = sheet(vec![
            (0, 0, text("name")),
            (0, 1, text("Latitude")),
            (0, 2, text("Longitude")),
        ]);
        assert!(locate_columns(&lower).is_err());
    }

    #[test]
    fn test_whitespace_name_is_kept() {
        let s = sheet(vec![
            (0, 0, text("Name")),
            (0, 1, text("Latitude")),
            (0, 2, text("Longitude")),
            (1, 0, text("   ")),
            (1, 1, CellValue::Number(18.0)),
        ]);
        let records = sheet_records(&s, Category::Government).unwrap();
        assert_eq!(records[0].name.as_deref(), Some("   "));
    }
}
