use super::group::PartGroup;
use super::model::{CellValue, NormalizedRecord};

// ---------------------------------------------------------------------------
// Queryable – what the filter and sort operations need from a row
// ---------------------------------------------------------------------------

/// A displayable row: either a flat record or an aggregated part group.
pub trait Queryable {
    fn identifier(&self) -> &str;

    /// Locations this row covers. A group covers every member's location.
    fn locations(&self) -> Vec<&str>;

    fn planners(&self) -> Vec<&str>;

    /// Value of a named column, if the row has one.
    fn cell(&self, column: &str) -> Option<CellValue>;
}

impl Queryable for NormalizedRecord {
    fn identifier(&self) -> &str {
        &self.part_id
    }

    fn locations(&self) -> Vec<&str> {
        vec![self.location.as_str()]
    }

    fn planners(&self) -> Vec<&str> {
        vec![self.planner.as_str()]
    }

    fn cell(&self, column: &str) -> Option<CellValue> {
        self.field(column).cloned()
    }
}

/// Aggregate columns a [`PartGroup`] exposes to sorting and filtering.
pub const GROUP_COLUMNS: [&str; 10] = [
    "Part",
    "Locations",
    "Occurrences",
    "Mean",
    "Variance",
    "StdDev",
    "CV",
    "Min",
    "Max",
    "Range",
];

impl Queryable for PartGroup {
    fn identifier(&self) -> &str {
        &self.part_id
    }

    fn locations(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.location.as_str()).collect()
    }

    fn planners(&self) -> Vec<&str> {
        self.members.iter().map(|m| m.planner.as_str()).collect()
    }

    fn cell(&self, column: &str) -> Option<CellValue> {
        match column {
            "Part" => return Some(CellValue::String(self.part_id.clone())),
            "Locations" => return Some(CellValue::String(self.joined_locations())),
            "Occurrences" => return Some(CellValue::Integer(self.members.len() as i64)),
            _ => {}
        }
        let stats = self.stats?;
        let v = match column {
            "Mean" => stats.mean,
            "Variance" => stats.variance,
            "StdDev" => stats.std_dev,
            "CV" => stats.coefficient_of_variation,
            "Min" => stats.min,
            "Max" => stats.max,
            "Range" => stats.range,
            _ => return None,
        };
        Some(CellValue::Float(v))
    }
}

// ---------------------------------------------------------------------------
// FilterSet – the recognised predicates
// ---------------------------------------------------------------------------

/// Predicates combined with AND. An empty string means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    /// Case-insensitive substring of the identifier.
    pub identifier_contains: String,
    /// Case-insensitive substring of any covered location.
    pub location_contains: String,
    /// Case-insensitive substring of any covered planner.
    pub planner_contains: String,
    /// Column that must read as a non-zero number.
    pub column_non_zero: String,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.identifier_contains.is_empty()
            && self.location_contains.is_empty()
            && self.planner_contains.is_empty()
            && self.column_non_zero.is_empty()
    }

    pub fn matches<T: Queryable>(&self, row: &T) -> bool {
        contains_ci(row.identifier(), &self.identifier_contains)
            && any_contains_ci(&row.locations(), &self.location_contains)
            && any_contains_ci(&row.planners(), &self.planner_contains)
            && (self.column_non_zero.is_empty() || non_zero(row, &self.column_non_zero))
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn any_contains_ci(haystacks: &[&str], needle: &str) -> bool {
    needle.is_empty() || haystacks.iter().any(|h| contains_ci(h, needle))
}

/// Absent and non-numeric values fail.
fn non_zero<T: Queryable>(row: &T, column: &str) -> bool {
    row.cell(column)
        .and_then(|c| c.as_f64())
        .is_some_and(|v| v != 0.0)
}

/// Rows that pass every predicate, in input order.
pub fn filter<T: Queryable + Clone>(rows: &[T], filters: &FilterSet) -> Vec<T> {
    if filters.is_empty() {
        return rows.to_vec();
    }
    rows.iter().filter(|r| filters.matches(*r)).cloned().collect()
}
