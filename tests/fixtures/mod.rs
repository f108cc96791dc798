//! Test fixtures for generating valid XLSX files in memory.
//!
//! This module provides builders for creating facility workbooks
//! programmatically, useful for testing the loader and renderer with known
//! inputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{SheetBuilder, XlsxBuilder};
//!
//! let xlsx = XlsxBuilder::new()
//!     .sheet(
//!         SheetBuilder::new("Government")
//!             .header(&["Name", "Latitude", "Longitude"])
//!             .row(vec!["Clinic A".into(), 18.0.into(), (-77.0).into()]),
//!     )
//!     .build();
//!
//! let records = healthmap::loader::load_facilities_from_bytes(&xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Header row used by every facility sheet.
pub const FACILITY_HEADER: [&str; 3] = ["Name", "Latitude", "Longitude"];

// ============================================================================
// Cell Values
// ============================================================================

/// Value written into a fixture cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// A shared string.
    String(String),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// An error value (e.g., "#DIV/0!").
    Error(String),
    /// An inline string (not shared).
    InlineString(String),
    /// A formula cell with a cached string result.
    FormulaString(String),
    /// No `<c>` element at all.
    Empty,
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// A cell in the sheet.
#[derive(Debug, Clone)]
pub struct CellEntry {
    pub cell_ref: String,
    pub value: CellValue,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub cells: Vec<CellEntry>,
    pub hidden: bool,
    /// 1-indexed row the next `row()` call writes to.
    next_row: u32,
}

impl SheetBuilder {
    /// Create a new sheet builder with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            cells: Vec::new(),
            hidden: false,
            next_row: 1,
        }
    }

    /// Add a cell at an explicit reference such as "C7".
    #[must_use]
    pub fn cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
        });
        let (_, row) = parse_cell_ref(cell_ref);
        self.next_row = self.next_row.max(row + 1);
        self
    }

    /// Write a row of header labels.
    #[must_use]
    pub fn header(self, labels: &[&str]) -> Self {
        self.row(labels.iter().map(|l| CellValue::from(*l)).collect())
    }

    /// Write the next row, starting at column A.
    #[must_use]
    pub fn row(mut self, values: Vec<CellValue>) -> Self {
        let row = self.next_row;
        for (i, value) in values.into_iter().enumerate() {
            if value == CellValue::Empty {
                continue;
            }
            self.cells.push(CellEntry {
                cell_ref: format!("{}{}", col_num_to_letter(i as u32 + 1), row),
                value,
            });
        }
        self.next_row = row + 1;
        self
    }

    /// Skip the next `count` rows entirely.
    #[must_use]
    pub fn skip_rows(mut self, count: u32) -> Self {
        self.next_row += count;
        self
    }

    /// Mark the sheet hidden in the workbook.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

// ============================================================================
// XLSX Builder
// ============================================================================

/// Builder for a complete XLSX file.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
    workbook_rels: Option<String>,
}

impl XlsxBuilder {
    /// Create a new XLSX builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet. Sheets appear in the workbook in the order added.
    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Replace the generated xl/_rels/workbook.xml.rels with raw XML.
    ///
    /// Sheet N is declared with `r:id="rIdN"` and stored at `worksheets/sheetN.xml`.
    #[must_use]
    pub fn workbook_rels(mut self, xml: &str) -> Self {
        self.workbook_rels = Some(xml.to_string());
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        // Collect shared strings
        let mut shared_strings: Vec<String> = Vec::new();
        for sheet in &self.sheets {
            for cell in &sheet.cells {
                if let CellValue::String(ref s) = cell.value {
                    if !shared_strings.contains(s) {
                        shared_strings.push(s.clone());
                    }
                }
            }
        }

        // Write [Content_Types].xml
        let _ = zip.start_file("[Content_Types].xml", options);
        let _ = zip.write_all(generate_content_types(self.sheets.len()).as_bytes());

        // Write _rels/.rels
        let _ = zip.start_file("_rels/.rels", options);
        let _ = zip.write_all(generate_rels().as_bytes());

        // Write xl/_rels/workbook.xml.rels
        let _ = zip.start_file("xl/_rels/workbook.xml.rels", options);
        let workbook_rels = self
            .workbook_rels
            .clone()
            .unwrap_or_else(|| generate_workbook_rels(self.sheets.len()));
        let _ = zip.write_all(workbook_rels.as_bytes());

        // Write xl/workbook.xml
        let _ = zip.start_file("xl/workbook.xml", options);
        let _ = zip.write_all(generate_workbook(&self.sheets).as_bytes());

        // Write xl/sharedStrings.xml if we have any
        if !shared_strings.is_empty() {
            let _ = zip.start_file("xl/sharedStrings.xml", options);
            let _ = zip.write_all(generate_shared_strings(&shared_strings).as_bytes());
        }

        // Write each sheet
        for (i, sheet) in self.sheets.iter().enumerate() {
            let path = format!("xl/worksheets/sheet{}.xml", i + 1);
            let _ = zip.start_file(&path, options);
            let _ = zip.write_all(generate_sheet_xml(sheet, &shared_strings).as_bytes());
        }

        let cursor = zip.finish().expect("Failed to finish ZIP");
        cursor.into_inner()
    }
}

// ============================================================================
// XML Generation
// ============================================================================

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Generate [Content_Types].xml
fn generate_content_types(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);

    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            i
        ));
    }

    xml.push_str("</Types>");
    xml
}

/// Generate _rels/.rels
fn generate_rels() -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#);
    xml.push_str("</Relationships>");
    xml
}

/// Generate xl/_rels/workbook.xml.rels
fn generate_workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            i, i
        ));
    }

    xml.push_str(&format!(
        r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#,
        sheet_count + 1
    ));

    xml.push_str("</Relationships>");
    xml
}

/// Relationships part pointing each `rIdN` at the given worksheet target.
#[must_use]
pub fn worksheet_rels(targets: &[(&str, &str)]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for (id, target) in targets {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="{}"/>"#,
            id, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Generate xl/workbook.xml
fn generate_workbook(sheets: &[SheetBuilder]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    xml.push_str("<sheets>");

    for (i, sheet) in sheets.iter().enumerate() {
        let state = if sheet.hidden { r#" state="hidden""# } else { "" };
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}"{} r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            i + 1,
            state,
            i + 1
        ));
    }

    xml.push_str("</sheets>");
    xml.push_str("</workbook>");
    xml
}

/// Generate xl/sharedStrings.xml
fn generate_shared_strings(strings: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!(
        r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
        strings.len(),
        strings.len()
    ));

    for s in strings {
        // Add xml:space="preserve" to preserve leading/trailing whitespace
        xml.push_str(&format!(
            r#"<si><t xml:space="preserve">{}</t></si>"#,
            escape_xml(s)
        ));
    }

    xml.push_str("</sst>");
    xml
}

/// Convert column number (1-indexed) to letter(s).
fn col_num_to_letter(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;
    while n > 0 {
        n -= 1;
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        n /= 26;
    }
    if result.is_empty() {
        result.push('A');
    }
    result
}

/// Generate a sheet XML file
fn generate_sheet_xml(sheet: &SheetBuilder, shared_strings: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str("<sheetData>");

    // Group cells by row, columns in order within a row
    let mut rows: std::collections::BTreeMap<u32, Vec<(u32, &CellEntry)>> =
        std::collections::BTreeMap::new();
    for cell in &sheet.cells {
        let (col, row) = parse_cell_ref(&cell.cell_ref);
        rows.entry(row).or_default().push((col, cell));
    }

    for (row_num, mut cells) in rows {
        cells.sort_by_key(|(col, _)| *col);
        xml.push_str(&format!(r#"<row r="{}">"#, row_num));

        for (_, cell) in cells {
            let cell_attrs = format!(r#"r="{}""#, cell.cell_ref);

            match &cell.value {
                CellValue::String(s) => {
                    let idx = shared_strings.iter().position(|x| x == s).unwrap_or(0);
                    xml.push_str(&format!(r#"<c {} t="s"><v>{}</v></c>"#, cell_attrs, idx));
                }
                CellValue::Number(n) => {
                    xml.push_str(&format!(r#"<c {}><v>{}</v></c>"#, cell_attrs, n));
                }
                CellValue::Boolean(b) => {
                    let v = if *b { "1" } else { "0" };
                    xml.push_str(&format!(r#"<c {} t="b"><v>{}</v></c>"#, cell_attrs, v));
                }
                CellValue::Error(e) => {
                    xml.push_str(&format!(
                        r#"<c {} t="e"><v>{}</v></c>"#,
                        cell_attrs,
                        escape_xml(e)
                    ));
                }
                CellValue::InlineString(s) => {
                    xml.push_str(&format!(
                        r#"<c {} t="inlineStr"><is><t>{}</t></is></c>"#,
                        cell_attrs,
                        escape_xml(s)
                    ));
                }
                CellValue::FormulaString(s) => {
                    xml.push_str(&format!(
                        r#"<c {} t="str"><f>TRIM(Z1)</f><v>{}</v></c>"#,
                        cell_attrs,
                        escape_xml(s)
                    ));
                }
                CellValue::Empty => {}
            }
        }

        xml.push_str("</row>");
    }

    xml.push_str("</sheetData>");
    xml.push_str("</worksheet>");
    xml
}

/// Parse a cell reference like "A1" into (col, row) as 1-indexed.
fn parse_cell_ref(cell_ref: &str) -> (u32, u32) {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut in_letters = true;

    for c in cell_ref.chars() {
        if in_letters && c.is_ascii_alphabetic() {
            col = col * 26 + (c.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
        } else {
            in_letters = false;
            if c.is_ascii_digit() {
                row = row * 10 + (c as u32 - '0' as u32);
            }
        }
    }

    (col, row)
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// A facility sheet with the standard header and numeric coordinates.
#[must_use]
pub fn facility_sheet(name: &str, rows: &[(&str, f64, f64)]) -> SheetBuilder {
    rows.iter().fold(
        SheetBuilder::new(name).header(&FACILITY_HEADER),
        |sheet, (facility, lat, lng)| {
            sheet.row(vec![(*facility).into(), (*lat).into(), (*lng).into()])
        },
    )
}

/// A workbook with the three category sheets in their usual order.
#[must_use]
pub fn facility_workbook(
    government: &[(&str, f64, f64)],
    secondary: &[(&str, f64, f64)],
    primary: &[(&str, f64, f64)],
) -> Vec<u8> {
    XlsxBuilder::new()
        .sheet(facility_sheet("Government", government))
        .sheet(facility_sheet("Secondary Care", secondary))
        .sheet(facility_sheet("Primary Care", primary))
        .build()
}

/// A workbook shaped like the published dataset, with `per_sheet` rows per
/// category spread over the island.
#[must_use]
pub fn synthetic_workbook(per_sheet: usize) -> Vec<u8> {
    let rows = |prefix: &str, offset: f64| -> Vec<(String, f64, f64)> {
        (0..per_sheet)
            .map(|i| {
                let step = (i % 100) as f64 / 100.0;
                (
                    format!("{prefix} {i}"),
                    17.7 + offset + step * 0.8,
                    -78.3 + step * 2.0,
                )
            })
            .collect()
    };

    let mut builder = XlsxBuilder::new();
    for (name, offset) in [
        ("Government", 0.0),
        ("Secondary Care", 0.05),
        ("Primary Care", 0.1),
    ] {
        let owned = rows(name, offset);
        let borrowed: Vec<(&str, f64, f64)> = owned
            .iter()
            .map(|(n, lat, lng)| (n.as_str(), *lat, *lng))
            .collect();
        builder = builder.sheet(facility_sheet(name, &borrowed));
    }
    builder.build()
}
