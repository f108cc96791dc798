//! Worksheet parsing - reads cell values from individual sheet XML into Sheet structs.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::Result;
use crate::types::{CellData, CellValue, Sheet};

/// Sheet metadata from workbook.xml
#[derive(Debug, Clone)]
pub(super) struct SheetInfo {
    pub name: String,
    pub path: String,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Date,
    Default,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        b"d" => CellTypeTag::Date,
        _ => CellTypeTag::Default,
    }
}

fn parse_u32_bytes(value: &[u8]) -> Option<u32> {
    std::str::from_utf8(value).ok()?.trim().parse().ok()
}

/// Turn the raw text of a cell into a typed value.
///
/// Returns `None` when the cell carries nothing worth keeping (a numeric cell
/// with no text, or a shared string index outside the table).
pub(super) fn resolve_cell_value(
    text: &str,
    tag: CellTypeTag,
    shared_strings: &[String],
) -> Option<CellValue> {
    match tag {
        CellTypeTag::Shared => {
            let idx = parse_u32_bytes(text.as_bytes())?;
            shared_strings
                .get(usize::try_from(idx).ok()?)
                .map(|s| CellValue::String(s.clone()))
        }
        CellTypeTag::Inline | CellTypeTag::Str | CellTypeTag::Date => {
            Some(CellValue::String(text.to_string()))
        }
        CellTypeTag::Bool => Some(CellValue::Boolean(matches!(text.trim(), "1" | "true"))),
        CellTypeTag::Error => Some(CellValue::Error(text.to_string())),
        CellTypeTag::Default => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else if let Ok(n) = trimmed.parse::<f64>() {
                Some(CellValue::Number(n))
            } else {
                Some(CellValue::String(text.to_string()))
            }
        }
    }
}

/// Position and type of the `<c>` element currently being read.
struct PendingCell {
    row: u32,
    col: u32,
    tag: CellTypeTag,
    text: String,
    has_value: bool,
}

/// Read `r` and `t` from a `<c>` element, falling back to the next free column.
fn start_cell(e: &BytesStart, current_row: u32, next_col: u32) -> PendingCell {
    let mut row = current_row;
    let mut col = next_col;
    let mut tag = CellTypeTag::Default;

    for attr in e.attributes().flatten() {
        match attr.key.as_ref() {
            b"r" => {
                if let Some((c, r)) = parse_cell_ref_bytes(&attr.value) {
                    col = c;
                    row = r;
                }
            }
            b"t" => tag = parse_cell_type_tag(&attr.value),
            _ => {}
        }
    }

    PendingCell {
        row,
        col,
        tag,
        text: String::new(),
        has_value: false,
    }
}

/// 0-indexed row of a `<row>` element. Rows without `r` follow the previous one.
fn row_index(e: &BytesStart, last_row: Option<u32>) -> u32 {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == b"r")
        .and_then(|a| parse_u32_bytes(&a.value))
        .map_or_else(
            || last_row.map_or(0, |r| r.saturating_add(1)),
            |r| r.saturating_sub(1),
        )
}

/// Parse a single worksheet
pub(super) fn parse_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    info: &SheetInfo,
    shared_strings: &[String],
) -> Result<Sheet> {
    let file = archive.by_name(&info.path)?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut sheet = Sheet::new(info.name.clone());

    let mut buf = Vec::new();
    let mut last_row: Option<u32> = None;
    let mut next_col: u32 = 0;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    last_row = Some(row_index(e, last_row));
                    next_col = 0;
                }
                b"c" => {
                    cell = Some(start_cell(e, last_row.unwrap_or(0), next_col));
                }
                // <v> holds the value; <is><t> holds inline text, possibly in several runs
                b"v" | b"t" if cell.is_some() && !in_phonetic => {
                    in_value = true;
                    if let Some(pending) = cell.as_mut() {
                        pending.has_value = true;
                    }
                }
                b"rPh" => in_phonetic = true,
                _ => {}
            },
            Event::Empty(ref e) => match e.local_name().as_ref() {
                b"row" => {
                    last_row = Some(row_index(e, last_row));
                }
                b"c" => {
                    // Self-closing cells like <c r="A1" s="1"/> carry style only
                    let empty = start_cell(e, last_row.unwrap_or(0), next_col);
                    next_col = empty.col.saturating_add(1);
                }
                _ => {}
            },
            Event::Text(ref e) if in_value => {
                if let Some(pending) = cell.as_mut() {
                    pending.text.push_str(&e.unescape()?);
                }
            }
            Event::CData(ref e) if in_value => {
                if let Some(pending) = cell.as_mut() {
                    pending.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"rPh" => in_phonetic = false,
                b"c" => {
                    if let Some(pending) = cell.take() {
                        next_col = pending.col.saturating_add(1);
                        let value = if pending.has_value {
                            resolve_cell_value(&pending.text, pending.tag, shared_strings)
                        } else {
                            None
                        };
                        if let Some(value) = value {
                            sheet.cells.push(CellData {
                                r: pending.row,
                                c: pending.col,
                                value,
                            });
                        }
                    }
                    in_value = false;
                }
                b"row" => {
                    // The next row without `r` continues from here
                    next_col = 0;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    // Rows and cells are normally in order already; keep lookups valid if not
    sheet.cells.sort_by_key(|cd| (cd.r, cd.c));

    Ok(sheet)
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

    #[test]
    fn test_parse_cell_type_tag() {
        assert_eq!(parse_cell_type_tag(b"s"), CellTypeTag::Shared);
        assert_eq!(parse_cell_type_tag(b"inlineStr"), CellTypeTag::Inline);
        assert_eq!(parse_cell_type_tag(b"n"), CellTypeTag::Default);
        assert_eq!(parse_cell_type_tag(b""), CellTypeTag::Default);
    }

    #[test]
    fn test_resolve_shared_string() {
        let sst = vec!["Government".to_string(), "Clinic A".to_string()];
        assert_eq!(
            resolve_cell_value("1", CellTypeTag::Shared, &sst),
            Some(CellValue::String("Clinic A".to_string()))
        );
        assert_eq!(resolve_cell_value("7", CellTypeTag::Shared, &sst), None);
        assert_eq!(resolve_cell_value("x", CellTypeTag::Shared, &sst), None);
    }

    #[test]
    fn test_resolve_numbers() {
        assert_eq!(
            resolve_cell_value("18.0123", CellTypeTag::Default, &[]),
            Some(CellValue::Number(18.0123))
        );
        assert_eq!(
            resolve_cell_value("-7.7E1", CellTypeTag::Default, &[]),
            Some(CellValue::Number(-77.0))
        );
        assert_eq!(resolve_cell_value("", CellTypeTag::Default, &[]), None);
    }

    #[test]
    fn test_resolve_other_types() {
        assert_eq!(
            resolve_cell_value("1", CellTypeTag::Bool, &[]),
            Some(CellValue::Boolean(true))
        );
        assert_eq!(
            resolve_cell_value("#N/A", CellTypeTag::Error, &[]),
            Some(CellValue::Error("#N/A".to_string()))
        );
        assert_eq!(
            resolve_cell_value("18.1 N", CellTypeTag::Str, &[]),
            Some(CellValue::String("18.1 N".to_string()))
        );
    }
}
