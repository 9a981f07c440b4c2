//! Filter output records.

/// What one filter pass did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSummary {
    /// Root-mean-square change applied to the series.
    pub rms_correction: f64,
    /// Points left uncorrected for lack of neighbors.
    pub skipped: usize,
}

/// A filtered series and per-pass diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoiseReduction {
    /// The filtered series, same length as the input.
    pub series: Vec<f64>,
    /// One summary per pass actually run.
    pub passes: Vec<PassSummary>,
}

impl NoiseReduction {
    /// Number of passes actually run.
    pub fn passes_run(&self) -> usize {
        self.passes.len()
    }
}

pub(crate) fn rms_difference(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() {
        return 0.0;
    }
    let ss: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
    (ss / a.len() as f64).sqrt()
}
