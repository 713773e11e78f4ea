//! Presentation adapter: turns the session state into terminal tables.

pub mod tables;

use crate::state::{AppState, LoadStatus, View};

/// Lines joined with a trailing newline.
fn text(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Render one view of the current state as text.
pub fn render_view(state: &AppState, view: View, detail: bool) -> String {
    let mut lines = vec![view.title().to_string()];

    let analysis = match (&state.status, state.analysis(view)) {
        (_, Some(a)) => a,
        (LoadStatus::Failed { kind, message }, None) => {
            lines.push(format!("Error ({kind}): {message}"));
            return text(lines);
        }
        (LoadStatus::Loading, None) => {
            lines.push("Loading data...".to_string());
            return text(lines);
        }
        _ => {
            lines.push("No dataset loaded.".to_string());
            return text(lines);
        }
    };
    let query = state.query(view);

    match view {
        View::Duplicates => {
            let report = state.duplicate_report();
            lines.push(format!("Total duplicate parts found: {}", analysis.duplicates().len()));
            lines.push(format!("Filtered results: {}", report.len()));
            if report.is_empty() {
                lines.push("No duplicate parts found matching your filters.".to_string());
                return text(lines);
            }
            lines.push(tables::duplicate_table(&report, &query.sort).to_string());
            if detail {
                for group in &report {
                    lines.push(format!("\n{} ({})", group.part_id, analysis.metric().label()));
                    lines.push(tables::member_matrix(group, analysis.metric()).to_string());
                }
            }
        }
        View::PartMatrix | View::PlannerMatrix => {
            let rows = state.flat_view(view);
            lines.push(format!("Total parts: {}", analysis.records().len()));
            lines.push(format!("Filtered results: {}", rows.len()));
            if rows.is_empty() {
                lines.push("No data found matching your filters.".to_string());
                return text(lines);
            }
            lines.push(tables::flat_table(analysis.columns(), &rows, &query.sort).to_string());
        }
    }
    text(lines)
}

/// Distinct values available to the filter options of one view.
pub fn render_selectors(state: &AppState, view: View) -> String {
    let Some(analysis) = state.analysis(view) else {
        return String::new();
    };
    let mut lines = vec![format!("Locations: {}", analysis.available_locations().join(", "))];
    if !analysis.available_planners().is_empty() {
        lines.push(format!("Planners: {}", analysis.available_planners().join(", ")));
    }
    lines.push(format!("Metric columns: {}", analysis.available_metric_columns().join(", ")));
    text(lines)
}

/// Data-quality warnings raised while reading the dataset for one view.
pub fn render_warnings(state: &AppState, view: View) -> String {
    let Some(analysis) = state.analysis(view) else {
        return String::new();
    };
    let mut lines = vec![format!("{} data-quality warnings", analysis.warnings().len())];
    lines.extend(analysis.warnings().iter().map(|w| format!("  {w}")));
    text(lines)
}
