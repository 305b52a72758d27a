use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate frame a dataset's position and covariance columns are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum Frame {
    /// Earth-centered, earth-fixed cartesian metres.
    #[default]
    Ecef,
    /// Local east/north/up metres about an origin given in degrees.
    Enu { lon: f64, lat: f64 },
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::Ecef => write!(f, "ECEF"),
            Frame::Enu { lon, lat } => write!(f, "ENU(lon {:.6}, lat {:.6})", lon, lat),
        }
    }
}

/// Common error type for dataset construction, codec and transforms.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GpsError {
    #[error("truncated dataset: need {needed} bytes, have {available}")]
    Format { needed: usize, available: usize },
    #[error("negative row count {0} in dataset header")]
    NegativeRowCount(i32),
    #[error("{0} rows do not fit the signed 32-bit row count")]
    TooManyRows(usize),
    #[error("cannot build a dataset from an empty observation sequence")]
    EmptySequence,
    #[error("frame mismatch: expected {expected}, found {found}")]
    FrameMismatch { expected: Frame, found: Frame },
    #[error("column shape mismatch: {0}")]
    Shape(String),
}

pub type GpsResult<T> = Result<T, GpsError>;

/// Byte-level persistence used for caching and for shipping datasets to plotting clients.
pub trait BinaryDataSet: Sized {
    fn to_binary(&self) -> GpsResult<Vec<u8>>;
    fn from_binary(bytes: &[u8]) -> GpsResult<Self>;
}
