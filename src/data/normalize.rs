use super::model::{CellValue, NormalizedRecord, RawDataset, RawRow};
use crate::config::FieldMap;
use crate::error::DataQualityWarning;

/// The normalizer's output: typed records plus every warning raised on the way.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub records: Vec<NormalizedRecord>,
    pub warnings: Vec<DataQualityWarning>,
}

/// Resolve each row's roles through `field_map`.
///
/// Every row with an identifier produces exactly one record; rows without
/// one are excluded. Numeric cells that do not parse become `0`. Neither
/// case is an error: both are recorded as [`DataQualityWarning`]s.
pub fn normalize(dataset: &RawDataset, field_map: &FieldMap) -> Normalized {
    let mut out = Normalized::default();

    let mut bound = vec![Some(&field_map.identifier)];
    bound.extend([
        field_map.location.as_ref(),
        field_map.description.as_ref(),
        field_map.planner.as_ref(),
        field_map.start_count.as_ref(),
        field_map.end_count.as_ref(),
        field_map.difference.as_ref(),
        field_map.percent_change.as_ref(),
    ]);
    for field in bound.into_iter().flatten() {
        if !dataset.has_column(field) {
            record_warning(
                &mut out.warnings,
                DataQualityWarning::MissingColumn {
                    field: field.clone(),
                },
            );
        }
    }
    // Without the identifier column no row can be grouped; the single
    // missing-column warning stands in for per-row ones.
    if !dataset.has_column(&field_map.identifier) {
        return out;
    }

    for (row, raw) in dataset.rows.iter().enumerate() {
        let Some(part_id) = identifier(raw, &field_map.identifier) else {
            record_warning(
                &mut out.warnings,
                DataQualityWarning::MissingIdentifier {
                    row,
                    field: field_map.identifier.clone(),
                },
            );
            continue;
        };

        let mut number = |column: &Option<String>| -> f64 {
            let Some(column) = column else { return 0.0 };
            match raw.get(column) {
                None => 0.0,
                Some(cell) if cell.is_blank() => 0.0,
                Some(cell) => cell.as_f64().unwrap_or_else(|| {
                    record_warning(
                        &mut out.warnings,
                        DataQualityWarning::NonNumeric {
                            row,
                            field: column.clone(),
                            raw: cell.to_string(),
                        },
                    );
                    0.0
                }),
            }
        };
        let start_count = number(&field_map.start_count);
        let end_count = number(&field_map.end_count);
        let difference = number(&field_map.difference);
        let percent_change = number(&field_map.percent_change);

        out.records.push(NormalizedRecord {
            row,
            part_id,
            location: text(raw, &field_map.location),
            description: text(raw, &field_map.description),
            planner: text(raw, &field_map.planner),
            start_count,
            end_count,
            difference,
            percent_change,
            fields: raw.clone(),
        });
    }

    out
}

fn record_warning(warnings: &mut Vec<DataQualityWarning>, warning: DataQualityWarning) {
    log::warn!("{warning}");
    warnings.push(warning);
}

/// The identifier exactly as it appears; blank cells have none.
fn identifier(raw: &RawRow, column: &str) -> Option<String> {
    raw.get(column)
        .filter(|cell| !cell.is_blank())
        .map(CellValue::to_string)
}

fn text(raw: &RawRow, column: &Option<String>) -> String {
    column
        .as_ref()
        .and_then(|c| raw.get(c))
        .map(CellValue::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(columns: &[&str], rows: Vec<Vec<CellValue>>) -> RawDataset {
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
        let rows = rows
            .into_iter()
            .map(|cells| columns.iter().cloned().zip(cells).collect())
            .collect();
        RawDataset { columns, rows }
    }

    fn s(v: &str) -> CellValue {
        CellValue::String(v.into())
    }

    #[test]
    fn resolves_default_roles() {
        let ds = dataset(
            &["Part", "Description", "Branch", "StartCount", "EndCount", "Difference", "Variance", "Planner"],
            vec![vec![
                s("A-1"),
                s("Hex bolt"),
                s("North"),
                CellValue::Integer(10),
                CellValue::Integer(14),
                CellValue::Integer(4),
                CellValue::Float(40.0),
                s("kim"),
            ]],
        );
        let out = normalize(&ds, &FieldMap::default());
        assert!(out.warnings.is_empty());
        let r = &out.records[0];
        assert_eq!(r.part_id, "A-1");
        assert_eq!(r.location, "North");
        assert_eq!(r.description, "Hex bolt");
        assert_eq!(r.planner, "kim");
        assert_eq!((r.start_count, r.end_count, r.difference, r.percent_change), (10.0, 14.0, 4.0, 40.0));
    }

    #[test]
    fn non_numeric_difference_becomes_zero_with_warning() {
        let map = FieldMap {
            start_count: None,
            end_count: None,
            percent_change: None,
            description: None,
            planner: None,
            ..FieldMap::default()
        };
        let ds = dataset(
            &["Part", "Branch", "Difference"],
            vec![vec![s("A"), s("X"), s("abc")], vec![s("B"), s("Y"), CellValue::Integer(5)]],
        );
        let out = normalize(&ds, &map);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].difference, 0.0);
        assert_eq!(
            out.warnings,
            vec![DataQualityWarning::NonNumeric {
                row: 0,
                field: "Difference".into(),
                raw: "abc".into(),
            }]
        );
    }

    #[test]
    fn rows_without_identifier_are_excluded() {
        let map = FieldMap::identifier_only("Part");
        let ds = dataset(
            &["Part", "Qty"],
            vec![vec![s("A"), CellValue::Integer(1)], vec![CellValue::Null, CellValue::Integer(2)], vec![s("B"), CellValue::Null]],
        );
        let out = normalize(&ds, &map);
        let ids: Vec<_> = out.records.iter().map(|r| (r.row, r.part_id.as_str())).collect();
        assert_eq!(ids, vec![(0, "A"), (2, "B")]);
        assert_eq!(
            out.warnings,
            vec![DataQualityWarning::MissingIdentifier {
                row: 1,
                field: "Part".into()
            }]
        );
    }

    #[test]
    fn identifier_is_not_trimmed_or_recased() {
        let ds = dataset(&["Part"], vec![vec![s(" a ")], vec![CellValue::Integer(77)]]);
        let out = normalize(&ds, &FieldMap::identifier_only("Part"));
        assert_eq!(out.records[0].part_id, " a ");
        assert_eq!(out.records[1].part_id, "77");
    }

    #[test]
    fn missing_bound_columns_warn_once() {
        let ds = dataset(&["Part", "Branch"], vec![vec![s("A"), s("X")], vec![s("A"), s("Y")]]);
        let out = normalize(&ds, &FieldMap::default());
        assert_eq!(out.records.len(), 2);
        let missing: Vec<_> = out
            .warnings
            .iter()
            .filter_map(|w| match w {
                DataQualityWarning::MissingColumn { field } => Some(field.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(
            missing,
            vec!["Description", "Planner", "StartCount", "EndCount", "Difference", "Variance"]
        );
        assert_eq!(out.warnings.len(), 6);
    }

    #[test]
    fn missing_identifier_column_yields_no_records() {
        let ds = dataset(&["Item"], vec![vec![s("A")]]);
        let out = normalize(&ds, &FieldMap::identifier_only("Part"));
        assert!(out.records.is_empty());
        assert_eq!(
            out.warnings,
            vec![DataQualityWarning::MissingColumn { field: "Part".into() }]
        );
    }
}
