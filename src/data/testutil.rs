use super::model::{CellValue, NormalizedRecord, RawRow};

/// A record with only the fields grouping and dispersion look at.
pub fn record(row: usize, part: &str, location: &str, difference: f64) -> NormalizedRecord {
    NormalizedRecord {
        row,
        part_id: part.into(),
        location: location.into(),
        description: String::new(),
        planner: String::new(),
        start_count: 0.0,
        end_count: difference,
        difference,
        percent_change: 0.0,
        fields: RawRow::new(),
    }
}

/// A record whose source row carries the given extra columns.
pub fn record_with(row: usize, part: &str, location: &str, fields: &[(&str, CellValue)]) -> NormalizedRecord {
    let mut r = record(row, part, location, 0.0);
    r.fields = fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect();
    r
}
