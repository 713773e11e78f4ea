use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as produced by the loader's type coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Numeric reading of the cell. Text is parsed after trimming; booleans,
    /// nulls and non-finite results yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Bool(_) | CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Nulls and empty strings carry no value.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Ordering used by column sorts over mixed-type columns.
    ///
    /// Values rank as `Null < Bool < number < text`. Anything that reads as a
    /// number (including numeric text) compares numerically; remaining text
    /// compares lexicographically.
    pub fn sort_cmp(&self, other: &Self) -> Ordering {
        fn rank(v: &CellValue) -> u8 {
            match v {
                CellValue::Null => 0,
                CellValue::Bool(_) => 1,
                _ if v.as_f64().is_some() => 2,
                _ => 3,
            }
        }
        let (ra, rb) = (rank(self), rank(other));
        if ra != rb {
            return ra.cmp(&rb);
        }
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            _ if ra == 2 => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => Ordering::Equal,
            },
            _ => self.to_string().cmp(&other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// RawRow / RawDataset – the loader's output
// ---------------------------------------------------------------------------

/// One parsed data row: column name → value.
pub type RawRow = BTreeMap<String, CellValue>;

/// A parsed table: header order plus data rows.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawDataset {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

// ---------------------------------------------------------------------------
// NormalizedRecord – one count row with its roles resolved
// ---------------------------------------------------------------------------

/// A typed count record. The source row is kept in `fields` so that views
/// can filter and sort on any dataset column.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRecord {
    /// Position of the source row among the data rows.
    pub row: usize,
    pub part_id: String,
    pub location: String,
    pub description: String,
    pub planner: String,
    pub start_count: f64,
    pub end_count: f64,
    pub difference: f64,
    pub percent_change: f64,
    pub fields: RawRow,
}

impl NormalizedRecord {
    pub fn field(&self, column: &str) -> Option<&CellValue> {
        self.fields.get(column)
    }
}
