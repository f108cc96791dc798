//! Main XLSX parser
//!
//! Orchestrates reading worksheets and the shared string table from the ZIP archive.

mod relationships;
mod worksheet;

use std::io::Cursor;
use zip::ZipArchive;

use crate::error::{HealthmapError, Result};
use crate::types::Workbook;

use relationships::{get_sheet_info, parse_shared_strings, parse_workbook_relationships};
use worksheet::parse_sheet;

/// Parse every worksheet of an XLSX file, in workbook order.
///
/// # Errors
/// Returns an error if the archive or any worksheet XML is malformed.
pub fn parse(data: &[u8]) -> Result<Workbook> {
    parse_selected(data, None)
}

/// Parse only the named worksheets, in the order given.
///
/// # Errors
/// Returns [`HealthmapError::MissingSheet`] for the first name not present in
/// the workbook, or an error if the archive or worksheet XML is malformed.
pub fn parse_sheets(data: &[u8], names: &[&str]) -> Result<Workbook> {
    parse_selected(data, Some(names))
}

fn parse_selected(data: &[u8], names: Option<&[&str]>) -> Result<Workbook> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let rels = parse_workbook_relationships(&mut archive)?;
    let sheet_infos = get_sheet_info(&mut archive, &rels)?;

    let selected = match names {
        Some(names) => names
            .iter()
            .map(|name| {
                sheet_infos
                    .iter()
                    .find(|info| info.name == *name)
                    .ok_or_else(|| HealthmapError::MissingSheet((*name).to_string()))
            })
            .collect::<Result<Vec<_>>>()?,
        None => sheet_infos.iter().collect(),
    };

    let shared_strings = parse_shared_strings(&mut archive, rels.shared_strings.as_deref())?;
    log::debug!(
        "workbook has {} sheets, {} shared strings",
        sheet_infos.len(),
        shared_strings.len()
    );

    let mut workbook = Workbook::default();
    for info in selected {
        let sheet = parse_sheet(&mut archive, info, &shared_strings)?;
        log::debug!(
            "parsed sheet '{}' from {}: {} cells",
            sheet.name,
            info.path,
            sheet.cells.len()
        );
        workbook.sheets.push(sheet);
    }

    Ok(workbook)
}
