use tracing::debug;

use super::Forecaster;
use crate::types::{PricePoint, TimeSeries};

/// Forward points emitted when the caller does not ask for a horizon.
pub const DEFAULT_FORECAST_POINTS: usize = 10;

#[derive(Debug, Clone, Copy)]
struct LineFit {
    slope: f64,
    intercept: f64,
}

/// Ordinary least squares over `(x, y)` pairs.
///
/// Returns `None` for fewer than 2 pairs, or when every `x` is identical
/// (zero denominator). History snapshots taken in the same instant would
/// otherwise turn the whole trendline into NaN.
fn least_squares(pairs: impl Iterator<Item = (f64, f64)>) -> Option<LineFit> {
    let mut n = 0.0f64;
    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    let mut sum_xy = 0.0f64;
    let mut sum_xx = 0.0f64;

    for (x, y) in pairs {
        n += 1.0;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    if n < 2.0 {
        return None;
    }
    let denominator = n * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        debug!("degenerate regression input: all timestamps identical");
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / n;
    Some(LineFit { slope, intercept })
}

/// Evaluate a fit forward of the series at its mean sampling interval.
fn extend_fit(
    series: &TimeSeries,
    horizon: usize,
    eval: impl Fn(f64) -> f64,
) -> TimeSeries {
    let (Some(last), Some(interval)) = (series.last(), series.mean_interval_ms()) else {
        return TimeSeries::empty();
    };
    (1..=horizon)
        .map(|i| {
            let t = last.timestamp_ms + (i as f64 * interval).round() as i64;
            PricePoint::new(t, eval(t as f64))
        })
        .collect()
}

/// Straight-line least-squares trendline over buy or sell history.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRegression;

impl LinearRegression {
    fn fit(series: &TimeSeries) -> Option<LineFit> {
        least_squares(
            series
                .points()
                .iter()
                .map(|p| (p.timestamp_ms as f64, p.value)),
        )
    }

    /// Fitted line evaluated at every input timestamp. Empty when the series
    /// has fewer than 2 points or no time spread.
    pub fn trendline(&self, series: &TimeSeries) -> TimeSeries {
        let Some(fit) = Self::fit(series) else {
            return TimeSeries::empty();
        };
        series
            .points()
            .iter()
            .map(|p| {
                PricePoint::new(
                    p.timestamp_ms,
                    fit.intercept + fit.slope * p.timestamp_ms as f64,
                )
            })
            .collect()
    }

    /// `horizon` points beyond the last sample, on the fitted line, spaced at
    /// the series' mean sampling interval.
    pub fn extend(&self, series: &TimeSeries, horizon: usize) -> TimeSeries {
        let Some(fit) = Self::fit(series) else {
            return TimeSeries::empty();
        };
        extend_fit(series, horizon, |x| fit.intercept + fit.slope * x)
    }
}

impl Forecaster for LinearRegression {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn forecast(&self, series: &TimeSeries, horizon: usize) -> TimeSeries {
        self.extend(series, horizon)
    }
}

/// Log-linear least squares: fits `ln(y)` against `x`, so the trendline is
/// `exp(intercept + slope * x)`. Non-positive values cannot enter the log
/// and are left out of the sums entirely.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialRegression;

impl ExponentialRegression {
    fn fit(series: &TimeSeries) -> Option<LineFit> {
        least_squares(
            series
                .points()
                .iter()
                .filter(|p| p.value > 0.0)
                .map(|p| (p.timestamp_ms as f64, p.value.ln())),
        )
    }

    pub fn trendline(&self, series: &TimeSeries) -> TimeSeries {
        let Some(fit) = Self::fit(series) else {
            return TimeSeries::empty();
        };
        series
            .points()
            .iter()
            .map(|p| {
                PricePoint::new(
                    p.timestamp_ms,
                    (fit.intercept + fit.slope * p.timestamp_ms as f64).exp(),
                )
            })
            .collect()
    }

    pub fn extend(&self, series: &TimeSeries, horizon: usize) -> TimeSeries {
        let Some(fit) = Self::fit(series) else {
            return TimeSeries::empty();
        };
        extend_fit(series, horizon, |x| (fit.intercept + fit.slope * x).exp())
    }
}

impl Forecaster for ExponentialRegression {
    fn name(&self) -> &'static str {
        "exponential"
    }

    fn forecast(&self, series: &TimeSeries, horizon: usize) -> TimeSeries {
        self.extend(series, horizon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn linear_series(n: usize) -> TimeSeries {
        // y = 2x + 3 at evenly spaced timestamps
        (0..n)
            .map(|i| {
                let t = (i as i64 + 1) * 1000;
                PricePoint::new(t, 2.0 * t as f64 + 3.0)
            })
            .collect()
    }

    #[test]
    fn test_linear_recovers_exact_line() {
        let series = linear_series(10);
        let trend = LinearRegression.trendline(&series);

        assert_eq!(trend.len(), series.len());
        for (fitted, original) in trend.points().iter().zip(series.points()) {
            assert_eq!(fitted.timestamp_ms, original.timestamp_ms);
            assert!((fitted.value - original.value).abs() < TOLERANCE);
        }
    }

    #[test]
    fn test_linear_forecast_stays_on_line() {
        let series = linear_series(10);
        let forecast = LinearRegression.extend(&series, 5);

        assert_eq!(forecast.len(), 5);
        let last_t = series.last().unwrap().timestamp_ms;
        for (i, point) in forecast.points().iter().enumerate() {
            assert_eq!(point.timestamp_ms, last_t + (i as i64 + 1) * 1000);
            let expected = 2.0 * point.timestamp_ms as f64 + 3.0;
            assert!((point.value - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_linear_too_few_points() {
        assert!(LinearRegression.trendline(&TimeSeries::empty()).is_empty());

        let single: TimeSeries = [PricePoint::new(1000, 5.0)].into_iter().collect();
        assert!(LinearRegression.trendline(&single).is_empty());
        assert!(LinearRegression.extend(&single, 10).is_empty());
    }

    #[test]
    fn test_linear_identical_timestamps_guarded() {
        let stacked: TimeSeries = [
            PricePoint::new(1000, 1.0),
            PricePoint::new(1000, 2.0),
            PricePoint::new(1000, 3.0),
        ]
        .into_iter()
        .collect();

        assert!(LinearRegression.trendline(&stacked).is_empty());
        assert!(LinearRegression.extend(&stacked, 10).is_empty());
    }

    #[test]
    fn test_exponential_recovers_growth_curve() {
        // y = 5 * e^(0.001 x)
        let series: TimeSeries = (0..20)
            .map(|i| {
                let t = i * 100;
                PricePoint::new(t, 5.0 * (0.001 * t as f64).exp())
            })
            .collect();

        let fit = ExponentialRegression::fit(&series).unwrap();
        assert!((fit.slope - 0.001).abs() < 1e-9);
        assert!((fit.intercept - 5.0f64.ln()).abs() < 1e-6);

        let trend = ExponentialRegression.trendline(&series);
        for (fitted, original) in trend.points().iter().zip(series.points()) {
            assert!((fitted.value - original.value).abs() < 1e-6);
        }
    }

    #[test]
    fn test_exponential_skips_non_positive_values() {
        let series: TimeSeries = [
            PricePoint::new(0, 5.0),
            PricePoint::new(1000, 0.0),
            PricePoint::new(2000, -3.0),
            PricePoint::new(3000, 5.0 * (0.001 * 3000.0f64).exp()),
        ]
        .into_iter()
        .collect();

        // Fit sees only the two positive samples; trendline still covers all
        // four timestamps.
        let trend = ExponentialRegression.trendline(&series);
        assert_eq!(trend.len(), 4);
        assert!((trend.points()[0].value - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_exponential_all_non_positive_is_empty() {
        let series: TimeSeries = [
            PricePoint::new(0, 0.0),
            PricePoint::new(1000, -1.0),
            PricePoint::new(2000, -2.0),
        ]
        .into_iter()
        .collect();

        assert!(ExponentialRegression.trendline(&series).is_empty());
        assert!(ExponentialRegression.extend(&series, 10).is_empty());
    }
}
