//! Coordinate cleaning.
//!
//! Rows whose latitude or longitude is missing or not numeric are dropped
//! silently. Surviving rows keep their load order.

use crate::types::{CellValue, CleanedTable, Facility, FacilityRecord};

/// Parse a raw coordinate cell into a finite number.
///
/// Numbers pass through, strings are parsed after trimming, and booleans count
/// as 1 and 0. Error cells and anything that does not parse to a finite value
/// yield `None`.
pub fn coerce_coordinate(value: &CellValue) -> Option<f64> {
    let n = match value {
        CellValue::Number(n) => *n,
        CellValue::String(s) => s.trim().parse::<f64>().ok()?,
        CellValue::Boolean(b) => f64::from(u8::from(*b)),
        CellValue::Error(_) => return None,
    };
    n.is_finite().then_some(n)
}

/// Keep only the records with two valid coordinates.
pub fn clean(records: Vec<FacilityRecord>) -> CleanedTable {
    let total = records.len();

    let facilities: Vec<Facility> = records
        .into_iter()
        // Blank coordinate cells are never coerced
        .filter(|r| r.latitude.is_some() && r.longitude.is_some())
        .filter_map(|r| {
            let latitude = r.latitude.as_ref().and_then(coerce_coordinate)?;
            let longitude = r.longitude.as_ref().and_then(coerce_coordinate)?;
            Some(Facility {
                category: r.category,
                name: r.name,
                latitude,
                longitude,
            })
        })
        .collect();

    log::debug!(
        "kept {} of {} rows with valid coordinates",
        facilities.len(),
        total
    );
    CleanedTable::new(facilities)
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
    use crate::types::Category;
    use test_case::test_case;

    #[test_case(CellValue::Number(18.25) => Some(18.25); "number")]
    #[test_case(CellValue::String("-76.8".into()) => Some(-76.8); "numeric string")]
    #[test_case(CellValue::String("  18.1 ".into()) => Some(18.1); "padded string")]
    #[test_case(CellValue::String("1e1".into()) => Some(10.0); "exponent")]
    #[test_case(CellValue::Boolean(true) => Some(1.0); "boolean true")]
    #[test_case(CellValue::Boolean(false) => Some(0.0); "boolean false")]
    #[test_case(CellValue::String("18°N".into()) => None; "degree sign")]
    #[test_case(CellValue::String("".into()) => None; "empty string")]
    #[test_case(CellValue::String("NaN".into()) => None; "nan string")]
    #[test_case(CellValue::String("inf".into()) => None; "infinite string")]
    #[test_case(CellValue::Number(f64::NAN) => None; "nan number")]
    #[test_case(CellValue::Error("#VALUE!".into()) => None; "error cell")]
    fn test_coerce_coordinate(value: CellValue) -> Option<f64> {
        coerce_coordinate(&value)
    }

    fn record(
        category: Category,
        name: &str,
        latitude: Option<CellValue>,
        longitude: Option<CellValue>,
    ) -> FacilityRecord {
        FacilityRecord {
            category,
            row: 1,
            name: Some(name.to_string()),
            latitude,
            longitude,
        }
    }

    #[test]
    fn test_clean_drops_invalid_rows_and_keeps_order() {
        let num = |n: f64| Some(CellValue::Number(n));
        let text = |s: &str| Some(CellValue::String(s.to_string()));
        let records = vec![
            record(Category::Government, "a", num(18.0), num(-77.0)),
            record(Category::Government, "missing lat", None, num(-77.0)),
            record(Category::SecondaryCare, "b", text("18.3"), text("-76.7")),
            record(Category::SecondaryCare, "bad lng", num(18.3), text("west")),
            record(Category::PrimaryCare, "missing both", None, None),
            record(Category::PrimaryCare, "c", num(17.9), num(-77.2)),
        ];

        let table = clean(records);
        let names: Vec<_> = table
            .facilities()
            .iter()
            .filter_map(|f| f.name.as_deref())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(table.facilities()[1].latitude, 18.3);
        assert_eq!(table.facilities()[1].longitude, -76.7);
        assert!(table
            .facilities()
            .iter()
            .all(|f| f.latitude.is_finite() && f.longitude.is_finite()));
    }

    #[test]
    fn test_clean_keeps_missing_names() {
        let mut r = record(
            Category::Government,
            "",
            Some(CellValue::Number(18.0)),
            Some(CellValue::Number(-77.0)),
        );
        r.name = None;
        let table = clean(vec![r]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.facilities()[0].name, None);
    }

    #[test]
    fn test_clean_empty_input() {
        assert!(clean(Vec::new()).is_empty());
    }
}
