use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

use crate::color::colored;
use crate::data::group::PartGroup;
use crate::data::model::NormalizedRecord;
use crate::data::sort::SortState;
use crate::data::stats::Metric;

/// Columns of the duplicate table; each name is a sortable group column.
const DUPLICATE_HEADERS: [&str; 7] = ["Part", "Locations", "Occurrences", "Mean", "StdDev", "CV", "Range"];

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Header label with the sort arrow when `column` is the active key.
fn header(column: &str, sort: &SortState) -> Cell {
    match (sort.key(), sort.direction()) {
        (Some(key), Some(direction)) if key == column => Cell::new(format!("{column} {}", direction.arrow())),
        _ => Cell::new(column),
    }
}

fn number(v: f64) -> Cell {
    Cell::new(format_number(v)).set_alignment(CellAlignment::Right)
}

/// Whole numbers without decimals, everything else to two places.
pub fn format_number(v: f64) -> String {
    // folds -0.0 into 0.0
    let v = v + 0.0;
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

// ---------------------------------------------------------------------------
// Duplicate parts
// ---------------------------------------------------------------------------

/// One row per duplicated part.
pub fn duplicate_table(groups: &[PartGroup], sort: &SortState) -> Table {
    let mut table = new_table();
    table.set_header(DUPLICATE_HEADERS.iter().map(|h| header(h, sort)));
    for group in groups {
        let Some(stats) = group.stats else { continue };
        table.add_row(vec![
            Cell::new(&group.part_id),
            Cell::new(group.joined_locations()),
            Cell::new(group.members.len()).set_alignment(CellAlignment::Right),
            number(stats.mean),
            number(stats.std_dev),
            Cell::new(format!("{:.2}%", stats.coefficient_of_variation)).set_alignment(CellAlignment::Right),
            number(stats.range),
        ]);
    }
    table
}

/// Per-location breakdown of one part, with each member's deviation from
/// the group mean.
pub fn member_matrix(group: &PartGroup, metric: Metric) -> Table {
    let mut table = new_table();
    let value_header = format!("Value ({})", metric.label());
    table.set_header(vec!["Branch", "Description", "Start", "End", value_header.as_str(), "Variance"]);
    for m in &group.members {
        let value = metric.value(m);
        let deviation = group.stats.map(|s| s.deviation(value));
        let variance_cell = match deviation {
            Some(d) => colored(Cell::new(format!("{:.2}%", d.percent)), d.absolute),
            None => Cell::new("0.00%"),
        };
        table.add_row(vec![
            Cell::new(&m.location),
            Cell::new(&m.description),
            number(m.start_count),
            number(m.end_count),
            number(value),
            variance_cell.set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

// ---------------------------------------------------------------------------
// Flat matrices
// ---------------------------------------------------------------------------

/// All dataset columns; missing and null cells show as `-`.
pub fn flat_table(columns: &[String], records: &[NormalizedRecord], sort: &SortState) -> Table {
    let mut table = new_table();
    table.set_header(columns.iter().map(|c| header(c, sort)));
    for r in records {
        table.add_row(columns.iter().map(|c| match r.field(c) {
            Some(v) if !v.is_blank() => match v.as_f64() {
                Some(_) => Cell::new(v).set_alignment(CellAlignment::Right),
                None => Cell::new(v),
            },
            _ => Cell::new("-"),
        }));
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::group::{duplicates_only, group_by_identifier};
    use crate::data::model::CellValue;
    use crate::data::testutil::{record, record_with};

    fn groups() -> Vec<PartGroup> {
        let records = vec![record(0, "A", "X", 10.0), record(1, "A", "Y", -10.0), record(2, "B", "X", 5.0)];
        duplicates_only(&group_by_identifier(&records), |r| Metric::Difference.value(r))
    }

    #[test]
    fn numbers_drop_trailing_zeros_when_whole() {
        assert_eq!(format_number(20.0), "20");
        assert_eq!(format_number(-3.14159), "-3.14");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn duplicate_table_lists_groups_and_marks_sort() {
        let sort = SortState::default().toggled("Range");
        let text = duplicate_table(&groups(), &sort).to_string();
        assert!(text.contains("Range ↑"));
        assert!(text.contains("X, Y"));
        assert!(text.contains("20"));
        assert!(!text.contains("B"));
    }

    #[test]
    fn member_matrix_shows_percent_deviation() {
        let group = &groups()[0];
        let text = member_matrix(group, Metric::Difference).to_string();
        // mean is zero, so deviations read as 0%
        assert!(text.contains("0.00%"));
        assert!(text.contains("-10"));
        assert!(text.contains("Value (Difference)"));
    }

    #[test]
    fn member_matrix_labels_metric_column_by_role() {
        let group = &groups()[0];
        let text = member_matrix(group, Metric::StartCount).to_string();
        assert!(text.contains("Value (Start)"));
    }

    #[test]
    fn flat_table_marks_missing_cells() {
        let columns = vec!["Part".to_string(), "North".to_string()];
        let records = vec![
            record_with(0, "A", "", &[("Part", CellValue::String("A".into())), ("North", CellValue::Integer(4))]),
            record_with(1, "B", "", &[("Part", CellValue::String("B".into()))]),
        ];
        let text = flat_table(&columns, &records, &SortState::default()).to_string();
        assert!(text.contains('4'));
        assert!(text.contains('-'));
    }
}
