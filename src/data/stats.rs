use super::model::NormalizedRecord;

// ---------------------------------------------------------------------------
// Metric selection
// ---------------------------------------------------------------------------

/// Which numeric field of a record the dispersion is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    StartCount,
    EndCount,
    #[default]
    Difference,
    PercentChange,
}

impl Metric {
    pub fn value(self, record: &NormalizedRecord) -> f64 {
        match self {
            Metric::StartCount => record.start_count,
            Metric::EndCount => record.end_count,
            Metric::Difference => record.difference,
            Metric::PercentChange => record.percent_change,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::StartCount => "Start",
            Metric::EndCount => "End",
            Metric::Difference => "Difference",
            Metric::PercentChange => "Percent change",
        }
    }
}

// ---------------------------------------------------------------------------
// DispersionStats
// ---------------------------------------------------------------------------

/// First- and second-moment dispersion of one part's values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispersionStats {
    pub mean: f64,
    /// Population variance (divisor `n`).
    pub variance: f64,
    pub std_dev: f64,
    /// `std_dev / |mean| * 100`; `0` when the mean is `0`.
    pub coefficient_of_variation: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
}

/// A single value's distance from its group mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deviation {
    pub absolute: f64,
    /// `absolute / |mean| * 100`; `0` when the mean is `0`.
    pub percent: f64,
}

impl DispersionStats {
    /// Compute over `metric` of every member. Returns `None` for an empty
    /// slice; callers only pass groups of two or more.
    pub fn compute<F>(members: &[NormalizedRecord], metric: F) -> Option<Self>
    where
        F: Fn(&NormalizedRecord) -> f64,
    {
        let values: Vec<f64> = members.iter().map(metric).collect();
        Self::from_values(&values)
    }

    /// Two-pass computation: the mean first, then the mean of squared
    /// deviations from it.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std_dev = variance.sqrt();
        let coefficient_of_variation = if mean != 0.0 {
            std_dev / mean.abs() * 100.0
        } else {
            0.0
        };
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            variance,
            std_dev,
            coefficient_of_variation,
            min,
            max,
            range: max - min,
        })
    }

    pub fn deviation(&self, value: f64) -> Deviation {
        let absolute = value - self.mean;
        let percent = if self.mean != 0.0 {
            absolute / self.mean.abs() * 100.0
        } else {
            0.0
        };
        Deviation { absolute, percent }
    }
}
