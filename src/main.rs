use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};

use part_variance::config::FieldMap;
use part_variance::data::filter::{FilterSet, GROUP_COLUMNS};
use part_variance::data::loader;
use part_variance::data::stats::Metric;
use part_variance::state::{AppState, LoadStatus, View};
use part_variance::ui;

#[derive(Parser, Debug)]
#[command(
    name = "part-variance",
    version,
    about = "Find parts whose counts disagree across locations"
)]
struct Cli {
    /// Count dataset (.csv, .json or .parquet)
    input: PathBuf,

    /// Which table to print
    #[arg(long, value_enum, default_value_t = ViewArg::Duplicates)]
    view: ViewArg,

    /// JSON file overriding the view's column bindings
    #[arg(long)]
    field_map: Option<PathBuf>,

    /// Numeric field the dispersion is computed over
    #[arg(long, value_enum, default_value_t = MetricArg::Difference)]
    metric: MetricArg,

    /// Keep parts whose identifier contains this text
    #[arg(long, default_value = "")]
    part: String,

    /// Keep rows (or groups with any member) whose location contains this text
    #[arg(long, default_value = "")]
    location: String,

    /// Keep rows whose planner contains this text
    #[arg(long, default_value = "")]
    planner: String,

    /// Keep rows where this column holds a non-zero number
    #[arg(long, default_value = "")]
    non_zero: String,

    /// Sort by column; repeat the same column to flip to descending.
    /// Earlier columns break ties of later ones
    #[arg(long)]
    sort: Vec<String>,

    /// Print each duplicate part's per-location breakdown
    #[arg(long)]
    detail: bool,

    /// List data-quality warnings
    #[arg(long)]
    warnings: bool,

    /// Print the distinct locations, planners and metric columns
    #[arg(long)]
    selectors: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    Duplicates,
    Parts,
    Planners,
}

impl From<ViewArg> for View {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::Duplicates => View::Duplicates,
            ViewArg::Parts => View::PartMatrix,
            ViewArg::Planners => View::PlannerMatrix,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    Start,
    End,
    Difference,
    Percent,
}

impl From<MetricArg> for Metric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::Start => Metric::StartCount,
            MetricArg::End => Metric::EndCount,
            MetricArg::Difference => Metric::Difference,
            MetricArg::Percent => Metric::PercentChange,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let view = View::from(cli.view);

    let mut state = AppState::new(cli.metric.into());
    if let Some(path) = &cli.field_map {
        state.set_field_map(view, FieldMap::from_json_file(path)?);
    }

    let ticket = state.begin_load();
    let result = loader::load_in_background(cli.input.clone())
        .join()
        .map_err(|_| anyhow!("loader thread panicked"))?;
    state.finish_load(ticket, result);

    if let LoadStatus::Failed { kind, message } = &state.status {
        bail!("{kind}: {message}");
    }

    state.set_filters(
        view,
        FilterSet {
            identifier_contains: cli.part,
            location_contains: cli.location,
            planner_contains: cli.planner,
            column_non_zero: cli.non_zero,
        },
    );
    let analysis = state.analysis(view).context("dataset was not loaded")?;
    for key in &cli.sort {
        let known = match view {
            View::Duplicates => GROUP_COLUMNS.contains(&key.as_str()),
            View::PartMatrix | View::PlannerMatrix => analysis.columns().contains(key),
        };
        if !known {
            log::warn!("Sort column '{key}' is not in this view; rows keep their order");
        }
    }
    let warning_count = analysis.warnings().len();
    for key in &cli.sort {
        state.toggle_sort(view, key);
    }

    if cli.selectors {
        println!("{}", ui::render_selectors(&state, view));
    }
    print!("{}", ui::render_view(&state, view, cli.detail));
    if cli.warnings {
        print!("{}", ui::render_warnings(&state, view));
    }
    if warning_count > 0 && !cli.warnings {
        log::info!("{warning_count} data-quality warnings (rerun with --warnings to list them)");
    }
    Ok(())
}
