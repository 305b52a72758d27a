pub mod dataset;
pub mod observation;

pub use dataset::GpsDataset;
pub use observation::Observation;
