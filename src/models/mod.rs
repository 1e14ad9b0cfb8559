pub mod holt_winters;
pub mod moving_average;
pub mod regression;

pub use holt_winters::*;
pub use moving_average::*;
pub use regression::*;

use crate::types::TimeSeries;

/// Contract shared by every model that can project a series forward.
///
/// Implementations may emit more than `horizon` points (Holt-Winters returns
/// its in-sample fit followed by the projection); callers that need exactly
/// the projection align on the trailing points.
pub trait Forecaster {
    fn name(&self) -> &'static str;

    fn forecast(&self, series: &TimeSeries, horizon: usize) -> TimeSeries;
}
