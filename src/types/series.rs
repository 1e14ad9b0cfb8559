use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single plotted point. Serialized as `{x, y}` for the chart layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "x")]
    pub timestamp_ms: i64,
    #[serde(rename = "y")]
    pub value: f64,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, value: f64) -> Self {
        Self { timestamp_ms, value }
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

/// Ordered sequence of timestamped values. Construction is the only way to
/// put points in; every model transformation returns a fresh series.
///
/// Timestamps are expected to be non-decreasing. The series does not sort or
/// deduplicate — the data source already delivers history in time order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeSeries {
    points: Vec<PricePoint>,
}

impl TimeSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    /// The empty series. Models return this for inputs below their minimum
    /// sample count; downstream consumers treat it as "nothing to plot".
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.values().fold(None, |min, v| match min {
            Some(m) => Some(v.min(m)),
            None => Some(v),
        })
    }

    pub fn max_value(&self) -> Option<f64> {
        self.values().fold(None, |max, v| match max {
            Some(m) => Some(v.max(m)),
            None => Some(v),
        })
    }

    /// New series holding the first `count` points.
    pub fn head(&self, count: usize) -> Self {
        Self {
            points: self.points.iter().take(count).copied().collect(),
        }
    }

    /// New series holding the last `count` points.
    pub fn tail(&self, count: usize) -> Self {
        let skip = self.points.len().saturating_sub(count);
        Self {
            points: self.points.iter().skip(skip).copied().collect(),
        }
    }

    /// Mean spacing between consecutive samples in milliseconds, used to
    /// place synthetic forecast timestamps. `None` for fewer than 2 points.
    pub fn mean_interval_ms(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        let first = self.points[0].timestamp_ms;
        let last = self.points[self.points.len() - 1].timestamp_ms;
        Some((last - first) as f64 / (self.points.len() - 1) as f64)
    }
}

impl FromIterator<PricePoint> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
