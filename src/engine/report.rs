use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::accuracy::{self, AccuracyScore};
use crate::config::AnalyticsConfig;
use crate::models::{
    ExponentialRegression, Forecaster, HoltWinters, LinearRegression, MovingAverage,
};
use crate::types::{self, PriceRecord, TimeSeries};

/// Simple trading heuristic over the loaded range: buy at the cheapest
/// observed buy price, sell at the richest observed sell price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecommendedPrices {
    pub buy: f64,
    pub sell: f64,
}

impl RecommendedPrices {
    pub fn from_series(buy: &TimeSeries, sell: &TimeSeries) -> Option<Self> {
        Some(Self {
            buy: buy.min_value()?,
            sell: sell.max_value()?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PriceSummary {
    pub recommended: Option<RecommendedPrices>,
    /// Spread on the most recent sample, `sell - buy`.
    pub latest_margin: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelAccuracy {
    pub linear: AccuracyScore,
    pub holt_winters: AccuracyScore,
}

/// Everything the rendering layer plots for one item and range, produced in
/// one pass. A new fetch builds a new report; nothing is retained between
/// requests.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub generated_at: DateTime<Utc>,
    pub sample_count: usize,
    pub buy: TimeSeries,
    pub sell: TimeSeries,
    pub linear_trend: TimeSeries,
    pub exponential_trend: TimeSeries,
    pub moving_average: TimeSeries,
    pub forecast: TimeSeries,
    pub holt_winters: TimeSeries,
    pub accuracy: ModelAccuracy,
    pub summary: PriceSummary,
}

impl AnalyticsReport {
    /// Runs every model over the record set. The trend, smoothing and
    /// forecast series follow the buy price; the sell series feeds the
    /// recommended sell side.
    pub fn build(records: &[PriceRecord], config: &AnalyticsConfig) -> Self {
        let buy = types::buy_series(records);
        let sell = types::sell_series(records);
        debug!(samples = buy.len(), "building analytics report");

        let linear = LinearRegression;
        let exponential = ExponentialRegression;
        let holt_winters = HoltWinters {
            alpha: config.holt_winters.alpha,
            beta: config.holt_winters.beta,
            gamma: config.holt_winters.gamma,
            season_length: config.holt_winters.season_length,
        };

        let accuracy = ModelAccuracy {
            linear: accuracy::evaluate(&linear, &buy, config.backtest.horizon),
            holt_winters: accuracy::evaluate(&holt_winters, &buy, config.backtest.horizon),
        };

        let latest_margin = records.last().map(|r| r.sell_price - r.buy_price);
        let summary = PriceSummary {
            recommended: RecommendedPrices::from_series(&buy, &sell),
            latest_margin,
        };

        let report = Self {
            generated_at: Utc::now(),
            sample_count: records.len(),
            linear_trend: linear.trendline(&buy),
            exponential_trend: exponential.trendline(&buy),
            moving_average: MovingAverage::new(config.moving_average.window).smooth(&buy),
            forecast: linear.forecast(&buy, config.forecast.points),
            holt_winters: holt_winters.run(&buy, config.holt_winters.periods),
            accuracy,
            summary,
            buy,
            sell,
        };

        info!(
            samples = report.sample_count,
            linear_err_pct = report.accuracy.linear.mean_percent_error,
            "analytics report ready"
        );
        report
    }
}
