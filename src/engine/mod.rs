pub mod accuracy;
pub mod report;

pub use accuracy::*;
pub use report::*;
