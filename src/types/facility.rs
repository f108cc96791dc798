use serde::{Deserialize, Serialize};

use super::{CellValue, MarkerColor};

/// Facility category. Each category is one worksheet of the input workbook.
///
/// Declaration order is load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Government")]
    Government,
    #[serde(rename = "Secondary Care")]
    SecondaryCare,
    #[serde(rename = "Primary Care")]
    PrimaryCare,
}

impl Category {
    /// All categories in load order.
    pub const ALL: [Category; 3] = [
        Category::Government,
        Category::SecondaryCare,
        Category::PrimaryCare,
    ];

    /// Name of the worksheet holding this category.
    pub fn sheet_name(self) -> &'static str {
        match self {
            Category::Government => "Government",
            Category::SecondaryCare => "Secondary Care",
            Category::PrimaryCare => "Primary Care",
        }
    }

    /// Marker color used for facilities of this category.
    pub fn color(self) -> MarkerColor {
        match self {
            Category::Government => MarkerColor::Red,
            Category::SecondaryCare => MarkerColor::Yellow,
            Category::PrimaryCare => MarkerColor::Green,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// One data row of a facility worksheet, before cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRecord {
    pub category: Category,
    /// Worksheet row (0-indexed) the record was read from.
    pub row: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<CellValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<CellValue>,
}

/// A facility whose coordinates are present and finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// Facilities that survived coordinate cleaning, in load order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanedTable {
    facilities: Vec<Facility>,
}

impl CleanedTable {
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Facilities of one category, in table order.
    pub fn by_category(&self, category: Category) -> impl Iterator<Item = &Facility> {
        self.facilities
            .iter()
            .filter(move |f| f.category == category)
    }
}
