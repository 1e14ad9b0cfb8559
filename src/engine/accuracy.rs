use serde::Serialize;
use tracing::debug;

use crate::models::Forecaster;
use crate::types::TimeSeries;

/// Directional backtest score: positive means the model over-forecasts,
/// negative means it under-forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AccuracyScore {
    pub mean_percent_error: f64,
    pub sample_count: usize,
}

impl AccuracyScore {
    /// The defined result when there is not enough history to hold anything
    /// out, or when every pair was skipped.
    pub fn zero() -> Self {
        Self {
            mean_percent_error: 0.0,
            sample_count: 0,
        }
    }
}

/// Holds out the last `horizon` samples, refits the model on the remainder
/// and scores its projection against the held-out actuals.
///
/// Models may emit more points than requested (Holt-Winters prepends its
/// in-sample fit), so only the trailing points are aligned with the holdout
/// window. Pairs with a forecast of exactly zero are skipped rather than
/// divided by.
pub fn evaluate(model: &dyn Forecaster, series: &TimeSeries, horizon: usize) -> AccuracyScore {
    if horizon == 0 || series.len() <= horizon {
        debug!(
            model = model.name(),
            len = series.len(),
            horizon,
            "not enough history to backtest"
        );
        return AccuracyScore::zero();
    }

    let training = series.head(series.len() - horizon);
    let actual = series.tail(horizon);
    let produced = model.forecast(&training, horizon);

    let mut total_percent_error = 0.0f64;
    let mut counted = 0usize;
    for (forecast, actual) in produced
        .points()
        .iter()
        .rev()
        .zip(actual.points().iter().rev())
    {
        if forecast.value == 0.0 {
            continue;
        }
        total_percent_error += (forecast.value - actual.value) / forecast.value * 100.0;
        counted += 1;
    }

    if counted == 0 {
        return AccuracyScore::zero();
    }
    AccuracyScore {
        mean_percent_error: total_percent_error / counted as f64,
        sample_count: counted,
    }
}
