use std::fmt;

use super::filter::Queryable;
use super::model::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

// ---------------------------------------------------------------------------
// SortState – column-header toggle with tie-breaking history
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: SortDirection,
}

/// Sort toggles of one view, oldest first. The newest key is the primary
/// order; earlier keys break its ties.
///
/// Clicking the newest key again flips its direction. Any other key starts
/// ascending and becomes the newest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    keys: Vec<SortKey>,
}

impl SortState {
    pub fn toggled(&self, key: &str) -> SortState {
        let mut keys = self.keys.clone();
        if keys.last().is_some_and(|k| k.column == key) {
            if let Some(last) = keys.last_mut() {
                last.direction = last.direction.flipped();
            }
        } else {
            // a re-clicked older key becomes the primary one
            keys.retain(|k| k.column != key);
            keys.push(SortKey {
                column: key.to_string(),
                direction: SortDirection::Ascending,
            });
        }
        SortState { keys }
    }

    /// Keys from oldest to newest.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_sorted(&self) -> bool {
        !self.keys.is_empty()
    }

    /// The primary (newest) key.
    pub fn key(&self) -> Option<&str> {
        self.keys.last().map(|k| k.column.as_str())
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.keys.last().map(|k| k.direction)
    }

    /// Rows ordered by every key, newest as primary; no keys keeps input
    /// order.
    pub fn apply<T: Queryable + Clone>(&self, rows: &[T]) -> Vec<T> {
        let mut out = rows.to_vec();
        for k in &self.keys {
            out = sort_by_column(&out, &k.column, k.direction);
        }
        out
    }
}

impl fmt::Display for SortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.keys.is_empty() {
            return write!(f, "unsorted");
        }
        for (i, k) in self.keys.iter().rev().enumerate() {
            if i > 0 {
                write!(f, ", then ")?;
            }
            write!(f, "{} {}", k.column, k.direction.arrow())?;
        }
        Ok(())
    }
}

/// Stable sort on one column using [`CellValue::sort_cmp`]. Rows lacking
/// the column compare as null.
pub fn sort_by_column<T: Queryable + Clone>(rows: &[T], key: &str, direction: SortDirection) -> Vec<T> {
    let mut keyed: Vec<(CellValue, &T)> = rows
        .iter()
        .map(|r| (r.cell(key).unwrap_or(CellValue::Null), r))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = a.sort_cmp(b);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}
