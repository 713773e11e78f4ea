use super::filter::{filter, FilterSet};
use super::group::{duplicates_only, group_by_identifier, part_groups, PartGroup, PartGroups};
use super::model::{NormalizedRecord, RawDataset};
use super::normalize::normalize;
use super::sort::SortState;
use super::stats::Metric;
use crate::config::FieldMap;
use crate::error::DataQualityWarning;

// ---------------------------------------------------------------------------
// Analysis – everything derived from one loaded dataset
// ---------------------------------------------------------------------------

/// Immutable snapshot computed once per load. A reload builds a new one.
#[derive(Debug, Clone)]
pub struct Analysis {
    columns: Vec<String>,
    metric: Metric,
    records: Vec<NormalizedRecord>,
    groups: PartGroups,
    duplicates: Vec<PartGroup>,
    warnings: Vec<DataQualityWarning>,
    locations: Vec<String>,
    planners: Vec<String>,
    metric_columns: Vec<String>,
}

impl Analysis {
    pub fn build(dataset: &RawDataset, field_map: &FieldMap, metric: Metric) -> Self {
        let normalized = normalize(dataset, field_map);
        let groups = group_by_identifier(&normalized.records);
        let duplicates = duplicates_only(&groups, |r| metric.value(r));

        let locations = distinct(normalized.records.iter().map(|r| r.location.as_str()));
        let planners = distinct(normalized.records.iter().map(|r| r.planner.as_str()));
        let descriptive = field_map.descriptive_columns();
        let metric_columns = dataset
            .columns
            .iter()
            .filter(|c| !descriptive.contains(&c.as_str()))
            .cloned()
            .collect();

        log::info!(
            "Normalized {} of {} rows into {} parts ({} duplicated), {} warnings",
            normalized.records.len(),
            dataset.len(),
            groups.len(),
            duplicates.len(),
            normalized.warnings.len()
        );

        Self {
            columns: dataset.columns.clone(),
            metric,
            records: normalized.records,
            groups,
            duplicates,
            warnings: normalized.warnings,
            locations,
            planners,
            metric_columns,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Parts seen at two or more rows, in first-seen order.
    pub fn duplicates(&self) -> &[PartGroup] {
        &self.duplicates
    }

    /// Every part including single-occurrence ones.
    pub fn part_groups(&self) -> Vec<PartGroup> {
        part_groups(&self.groups, |r| self.metric.value(r))
    }

    pub fn duplicate_report(&self, filters: &FilterSet, sort: &SortState) -> Vec<PartGroup> {
        sort.apply(&filter(&self.duplicates, filters))
    }

    pub fn flat_view(&self, filters: &FilterSet, sort: &SortState) -> Vec<NormalizedRecord> {
        sort.apply(&filter(&self.records, filters))
    }

    pub fn available_locations(&self) -> &[String] {
        &self.locations
    }

    pub fn available_planners(&self) -> &[String] {
        &self.planners
    }

    pub fn available_metric_columns(&self) -> &[String] {
        &self.metric_columns
    }
}

/// Non-empty values, first occurrence wins.
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !v.is_empty() && !out.iter().any(|o| o == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, RawRow};

    fn row(cells: &[(&str, CellValue)]) -> RawRow {
        cells.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn s(v: &str) -> CellValue {
        CellValue::String(v.into())
    }

    fn scenario() -> RawDataset {
        RawDataset {
            columns: vec!["Part".into(), "Branch".into(), "Difference".into()],
            rows: vec![
                row(&[("Part", s("A")), ("Branch", s("X")), ("Difference", CellValue::Integer(10))]),
                row(&[("Part", s("A")), ("Branch", s("Y")), ("Difference", CellValue::Integer(-10))]),
                row(&[("Part", s("B")), ("Branch", s("X")), ("Difference", CellValue::Integer(5))]),
            ],
        }
    }

    fn counts_map() -> FieldMap {
        FieldMap {
            description: None,
            planner: None,
            start_count: None,
            end_count: None,
            percent_change: None,
            ..FieldMap::default()
        }
    }

    #[test]
    fn duplicate_report_for_two_location_part() {
        let analysis = Analysis::build(&scenario(), &counts_map(), Metric::Difference);
        let report = analysis.duplicate_report(&FilterSet::default(), &SortState::default());
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].part_id, "A");
        let stats = report[0].stats.unwrap();
        assert!(stats.mean.abs() < 1e-9);
        assert!((stats.std_dev - 10.0).abs() < 1e-9);
        assert!((stats.range - 20.0).abs() < 1e-9);
        assert!(analysis.warnings().is_empty());
        assert_eq!(analysis.part_groups().len(), 2);
    }

    #[test]
    fn bad_number_keeps_row_and_warns() {
        let mut ds = scenario();
        ds.rows[2].insert("Difference".into(), s("abc"));
        let analysis = Analysis::build(&ds, &counts_map(), Metric::Difference);
        assert_eq!(analysis.records().len(), 3);
        assert_eq!(analysis.records()[2].difference, 0.0);
        assert_eq!(analysis.warnings().len(), 1);
    }

    #[test]
    fn selector_lists_are_distinct_and_skip_blanks() {
        let mut ds = scenario();
        ds.columns.push("Planner".into());
        ds.rows[0].insert("Planner".into(), s("kim"));
        ds.rows[1].insert("Planner".into(), CellValue::Null);
        ds.rows[2].insert("Planner".into(), s("kim"));
        ds.rows.push(row(&[("Part", s("C")), ("Branch", s("")), ("Difference", CellValue::Integer(0))]));
        let map = FieldMap {
            planner: Some("Planner".into()),
            ..counts_map()
        };
        let analysis = Analysis::build(&ds, &map, Metric::Difference);
        assert_eq!(analysis.available_locations(), ["X", "Y"]);
        assert_eq!(analysis.available_planners(), ["kim"]);
        assert_eq!(analysis.available_metric_columns(), ["Difference"]);
    }

    #[test]
    fn matrix_metric_columns_exclude_identifier_only() {
        let ds = RawDataset {
            columns: vec!["Part".into(), "North".into(), "South".into()],
            rows: vec![row(&[("Part", s("A")), ("North", CellValue::Integer(1)), ("South", CellValue::Integer(0))])],
        };
        let analysis = Analysis::build(&ds, &FieldMap::identifier_only("Part"), Metric::Difference);
        assert_eq!(analysis.available_metric_columns(), ["North", "South"]);
        let view = analysis.flat_view(
            &FilterSet {
                column_non_zero: "South".into(),
                ..Default::default()
            },
            &SortState::default(),
        );
        assert!(view.is_empty());
    }

    #[test]
    fn report_sorts_by_group_column() {
        let mut ds = scenario();
        ds.rows.push(row(&[("Part", s("B")), ("Branch", s("Y")), ("Difference", CellValue::Integer(6))]));
        let analysis = Analysis::build(&ds, &counts_map(), Metric::Difference);
        let sort = SortState::default().toggled("Range");
        let ids: Vec<_> = analysis
            .duplicate_report(&FilterSet::default(), &sort)
            .into_iter()
            .map(|g| g.part_id)
            .collect();
        assert_eq!(ids, vec!["B", "A"]);
    }
}
