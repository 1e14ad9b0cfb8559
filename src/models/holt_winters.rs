use tracing::debug;

use super::Forecaster;
use crate::types::{PricePoint, TimeSeries};

/// Triple exponential smoothing with optional seasonality.
///
/// `alpha`, `beta` and `gamma` weight the level, trend and seasonal updates;
/// `season_length == 0` disables the seasonal component, which fits the
/// bazaar's mostly aperiodic price history.
#[derive(Debug, Clone, Copy)]
pub struct HoltWinters {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub season_length: usize,
}

/// Smoothing state carried through one forward pass. Never shared between
/// invocations.
#[derive(Debug, Clone)]
struct SmoothingState {
    level: f64,
    trend: f64,
    season: Vec<f64>,
}

impl HoltWinters {
    pub const DEFAULT_ALPHA: f64 = 0.6;
    pub const DEFAULT_BETA: f64 = 0.1;
    pub const DEFAULT_GAMMA: f64 = 0.1;

    /// The update at each sample is computed from the state left by the
    /// previous sample, so this pass is strictly sequential.
    fn smooth(&self, values: &[f64], out: &mut Vec<f64>) -> SmoothingState {
        let mut state = SmoothingState {
            level: values[0],
            trend: values[1] - values[0],
            season: vec![0.0; self.season_length],
        };
        for (i, slot) in state.season.iter_mut().enumerate().take(values.len()) {
            *slot = values[i] - state.level;
        }

        for (i, &actual) in values.iter().enumerate() {
            let s = if self.season_length > 0 {
                state.season[i % self.season_length]
            } else {
                0.0
            };

            // Emit with the state as of the previous step, then update.
            out.push(state.level + state.trend + s);

            let new_level =
                self.alpha * (actual - s) + (1.0 - self.alpha) * (state.level + state.trend);
            state.trend = self.beta * (new_level - state.level) + (1.0 - self.beta) * state.trend;
            state.level = new_level;
            if self.season_length > 0 {
                state.season[i % self.season_length] =
                    self.gamma * (actual - state.level) + (1.0 - self.gamma) * s;
            }
        }

        state
    }

    /// In-sample fit followed by `periods` projected points. A series with
    /// fewer than 3 samples cannot seed level and trend, and yields the
    /// empty series.
    pub fn run(&self, series: &TimeSeries, periods: usize) -> TimeSeries {
        if series.len() < 3 {
            debug!(len = series.len(), "holt-winters needs at least 3 samples");
            return TimeSeries::empty();
        }

        let values: Vec<f64> = series.values().collect();
        let mut smoothed = Vec::with_capacity(values.len() + periods);
        let state = self.smooth(&values, &mut smoothed);

        let mut result: Vec<PricePoint> = series
            .points()
            .iter()
            .zip(&smoothed)
            .map(|(p, &v)| PricePoint::new(p.timestamp_ms, v))
            .collect();

        // mean_interval_ms is Some here, len >= 3
        let interval = series.mean_interval_ms().unwrap_or_default();
        let last_t = series.last().map(|p| p.timestamp_ms).unwrap_or_default();
        let n = values.len();
        for j in 1..=periods {
            let s = if self.season_length > 0 {
                state.season[(n - 1 + j) % self.season_length]
            } else {
                0.0
            };
            let t = last_t + (j as f64 * interval).round() as i64;
            result.push(PricePoint::new(t, state.level + j as f64 * state.trend + s));
        }

        TimeSeries::new(result)
    }
}

impl Default for HoltWinters {
    fn default() -> Self {
        Self {
            alpha: Self::DEFAULT_ALPHA,
            beta: Self::DEFAULT_BETA,
            gamma: Self::DEFAULT_GAMMA,
            season_length: 0,
        }
    }
}

impl Forecaster for HoltWinters {
    fn name(&self) -> &'static str {
        "holt-winters"
    }

    fn forecast(&self, series: &TimeSeries, horizon: usize) -> TimeSeries {
        self.run(series, horizon)
    }
}
