use crate::types::{PricePoint, TimeSeries};

/// Trailing-mean smoother. The window shrinks at the head of the series, so
/// the first `window - 1` points average over whatever has been seen so far
/// instead of waiting for a full window.
#[derive(Debug, Clone, Copy)]
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    pub const DEFAULT_WINDOW: usize = 5;

    /// `window` is clamped to at least 1.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Same timestamps as the input, each value replaced by the mean of the
    /// trailing window ending at it.
    pub fn smooth(&self, series: &TimeSeries) -> TimeSeries {
        let points = series.points();
        let mut sum = 0.0f64;

        points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                sum += point.value;
                if i >= self.window {
                    sum -= points[i - self.window].value;
                }
                let count = (i + 1).min(self.window);
                PricePoint::new(point.timestamp_ms, sum / count as f64)
            })
            .collect()
    }
}

impl Default for MovingAverage {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> TimeSeries {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| PricePoint::new(i as i64 * 1000, v))
            .collect()
    }

    #[test]
    fn test_window_one_is_identity() {
        let input = series(&[4.0, 7.0, 1.0, 9.0]);
        let smoothed = MovingAverage::new(1).smooth(&input);
        assert_eq!(smoothed, input);
    }

    #[test]
    fn test_partial_windows_at_head() {
        let input = series(&[3.0, 6.0, 9.0]);
        let smoothed = MovingAverage::new(5).smooth(&input);

        let values: Vec<f64> = smoothed.values().collect();
        assert_eq!(values, vec![3.0, 4.5, 6.0]);
    }

    #[test]
    fn test_full_window_rolls() {
        let input = series(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let smoothed = MovingAverage::new(3).smooth(&input);

        let values: Vec<f64> = smoothed.values().collect();
        assert_eq!(values, vec![1.0, 1.5, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_timestamps_preserved() {
        let input = series(&[1.0, 2.0, 3.0]);
        let smoothed = MovingAverage::default().smooth(&input);
        for (a, b) in smoothed.points().iter().zip(input.points()) {
            assert_eq!(a.timestamp_ms, b.timestamp_ms);
        }
    }

    #[test]
    fn test_zero_window_clamped() {
        assert_eq!(MovingAverage::new(0).window(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(MovingAverage::default().smooth(&TimeSeries::empty()).is_empty());
    }
}
