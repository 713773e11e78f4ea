use crate::config::FieldMap;
use crate::data::analysis::Analysis;
use crate::data::filter::FilterSet;
use crate::data::group::PartGroup;
use crate::data::model::{NormalizedRecord, RawDataset};
use crate::data::sort::SortState;
use crate::data::stats::Metric;
use crate::error::{DatasetError, FailureKind};

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// The three tabular views over a count dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Parts counted at two or more locations, with dispersion.
    Duplicates,
    /// One row per part, one column per location.
    PartMatrix,
    /// One row per part number, with planner and variance columns.
    PlannerMatrix,
}

impl View {
    pub const ALL: [View; 3] = [View::Duplicates, View::PartMatrix, View::PlannerMatrix];

    pub fn default_field_map(self) -> FieldMap {
        match self {
            View::Duplicates => FieldMap::default(),
            View::PartMatrix => FieldMap::identifier_only("Part"),
            View::PlannerMatrix => FieldMap {
                planner: Some("Planner".into()),
                ..FieldMap::identifier_only("Part number")
            },
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Duplicates => "Duplicate Parts Analyzer",
            View::PartMatrix => "Part Variance Matrix",
            View::PlannerMatrix => "Planner Variance Matrix",
        }
    }

    fn index(self) -> usize {
        match self {
            View::Duplicates => 0,
            View::PartMatrix => 1,
            View::PlannerMatrix => 2,
        }
    }
}

/// Filter and sort choices of one view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub filters: FilterSet,
    pub sort: SortState,
}

// ---------------------------------------------------------------------------
// Load lifecycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
    Failed { kind: FailureKind, message: String },
}

/// Handed out by [`AppState::begin_load`]; only the newest ticket may
/// complete a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Session state, independent of rendering.
///
/// Each view reads the loaded dataset through its own field map, so each
/// holds its own [`Analysis`] next to its own query.
pub struct AppState {
    pub status: LoadStatus,

    pub metric: Metric,

    field_maps: [FieldMap; 3],

    /// Snapshot per view (None until a load succeeds).
    analyses: [Option<Analysis>; 3],

    queries: [ViewQuery; 3],

    generation: u64,
}

impl AppState {
    pub fn new(metric: Metric) -> Self {
        Self {
            status: LoadStatus::Idle,
            metric,
            field_maps: View::ALL.map(View::default_field_map),
            analyses: Default::default(),
            queries: Default::default(),
            generation: 0,
        }
    }

    pub fn field_map(&self, view: View) -> &FieldMap {
        &self.field_maps[view.index()]
    }

    /// Replace one view's column bindings. Takes effect on the next load.
    pub fn set_field_map(&mut self, view: View, field_map: FieldMap) {
        self.field_maps[view.index()] = field_map;
    }

    pub fn analysis(&self, view: View) -> Option<&Analysis> {
        self.analyses[view.index()].as_ref()
    }

    /// Start a new load. Any earlier ticket becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply a finished load. Returns `false` when the ticket was superseded
    /// and the result was discarded.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: Result<RawDataset, DatasetError>) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale load result (generation {} < {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        match result {
            Ok(dataset) => self.set_dataset(&dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.analyses = Default::default();
                self.status = LoadStatus::Failed {
                    kind: e.kind(),
                    message: e.to_string(),
                };
            }
        }
        true
    }

    /// Rebuild every view's snapshot and reset every view's query.
    pub fn set_dataset(&mut self, dataset: &RawDataset) {
        let metric = self.metric;
        self.analyses = View::ALL.map(|view| {
            log::debug!("Building {} snapshot", view.title());
            Some(Analysis::build(dataset, self.field_map(view), metric))
        });
        self.queries = Default::default();
        self.status = LoadStatus::Ready;
    }

    pub fn query(&self, view: View) -> &ViewQuery {
        &self.queries[view.index()]
    }

    pub fn set_filters(&mut self, view: View, filters: FilterSet) {
        self.queries[view.index()].filters = filters;
    }

    /// Column-header click: same key flips direction, new key sorts
    /// ascending with the previous keys as tie-breakers.
    pub fn toggle_sort(&mut self, view: View, key: &str) {
        let q = &mut self.queries[view.index()];
        q.sort = q.sort.toggled(key);
    }

    /// Duplicate parts through the duplicates view's filters and sort.
    pub fn duplicate_report(&self) -> Vec<PartGroup> {
        let q = self.query(View::Duplicates);
        self.analysis(View::Duplicates)
            .map(|a| a.duplicate_report(&q.filters, &q.sort))
            .unwrap_or_default()
    }

    /// Flat records through the given view's filters and sort.
    pub fn flat_view(&self, view: View) -> Vec<NormalizedRecord> {
        let q = self.query(view);
        self.analysis(view)
            .map(|a| a.flat_view(&q.filters, &q.sort))
            .unwrap_or_default()
    }
}
