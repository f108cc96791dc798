use serde::{Deserialize, Serialize};

use super::{CellData, CellValue};

/// The worksheets of a parsed workbook, in requested or workbook order.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// A single worksheet
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub name: String,
    /// Sparse representation, sorted by (row, col).
    pub cells: Vec<CellData>,
}

impl Sheet {
    /// Create an empty sheet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
        }
    }

    /// Value at (row, col), if the cell is populated.
    pub fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells
            .binary_search_by(|cd| (cd.r, cd.c).cmp(&(row, col)))
            .ok()
            .and_then(|idx| self.cells.get(idx))
            .map(|cd| &cd.value)
    }

    /// Populated rows in ascending order, each with its cells in column order.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            cells: &self.cells,
        }
    }
}

/// Iterator over the populated rows of a [`Sheet`].
pub struct Rows<'a> {
    cells: &'a [CellData],
}

impl<'a> Iterator for Rows<'a> {
    type Item = (u32, &'a [CellData]);

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.cells.first()?;
        let row = first.r;
        let len = self.cells.iter().take_while(|cd| cd.r == row).count();
        let (head, tail) = self.cells.split_at(len);
        self.cells = tail;
        Some((row, head))
    }
}
