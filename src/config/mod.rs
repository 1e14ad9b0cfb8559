use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::{HoltWinters, MovingAverage, DEFAULT_FORECAST_POINTS};

/// Per-model knobs for one analytics pass. Every field has a default, so a
/// caller with no opinions can run the whole engine unconfigured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub moving_average: MovingAverageSettings,
    pub forecast: ForecastSettings,
    pub holt_winters: HoltWintersSettings,
    pub backtest: BacktestSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovingAverageSettings {
    pub window: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Points projected beyond the last observed sample.
    pub points: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoltWintersSettings {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    /// 0 disables the seasonal component.
    pub season_length: usize,
    /// Forecast continuation length after the in-sample fit.
    pub periods: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// Trailing samples held out when scoring forecast accuracy.
    pub horizon: usize,
}

impl Default for MovingAverageSettings {
    fn default() -> Self {
        Self {
            window: MovingAverage::DEFAULT_WINDOW,
        }
    }
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            points: DEFAULT_FORECAST_POINTS,
        }
    }
}

impl Default for HoltWintersSettings {
    fn default() -> Self {
        Self {
            alpha: HoltWinters::DEFAULT_ALPHA,
            beta: HoltWinters::DEFAULT_BETA,
            gamma: HoltWinters::DEFAULT_GAMMA,
            season_length: 0,
            periods: DEFAULT_FORECAST_POINTS,
        }
    }
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self { horizon: 5 }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            moving_average: MovingAverageSettings::default(),
            forecast: ForecastSettings::default(),
            holt_winters: HoltWintersSettings::default(),
            backtest: BacktestSettings::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn load(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: Self =
            toml::from_str(&raw).with_context(|| format!("Failed to parse config file: {path}"))?;

        if let Err(errors) = config.validate() {
            anyhow::bail!("Invalid config {path}: {}", errors.join(", "));
        }
        info!("Loaded analytics config from {path}");
        Ok(config)
    }

    /// Loads `path` when it exists, otherwise falls back to defaults. A
    /// malformed file is still an error.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            warn!("Config file {path} not found, using defaults");
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.moving_average.window == 0 {
            errors.push("moving_average.window must be > 0".to_string());
        }
        if self.forecast.points == 0 {
            errors.push("forecast.points must be > 0".to_string());
        }

        for (name, weight) in [
            ("alpha", self.holt_winters.alpha),
            ("beta", self.holt_winters.beta),
            ("gamma", self.holt_winters.gamma),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                errors.push(format!("holt_winters.{name} must be between 0 and 1"));
            }
        }

        if self.backtest.horizon == 0 {
            errors.push("backtest.horizon must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
