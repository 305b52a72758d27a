//! Core data model and numerics for GPS position time series.
//!
//! Observations are held column-wise in ndarray matrices and can be baselined
//! against a reference station, rotated into a local east/north/up frame, turned
//! into block design matrices for least-squares fits, and persisted in a fixed
//! big-endian binary layout.

pub mod codec;
pub mod data;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use data::{GpsDataset, Observation};
pub use prelude::{BinaryDataSet, Frame, GpsError, GpsResult};
