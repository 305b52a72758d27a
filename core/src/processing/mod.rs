pub mod baseline;
pub mod enu;
pub mod kernel;
pub mod series;

pub use kernel::{KernelModel, DETREND_SECONDS_PER_YEAR, SECONDS_PER_YEAR};
pub use series::TIME_SERIES_COLUMNS;
