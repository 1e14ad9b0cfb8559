pub mod record;
pub mod series;

pub use record::*;
pub use series::*;
