use serde::{Deserialize, Serialize};

/// A single time-stamped station position with its packed covariance.
///
/// `len` is the distance from a reference point; `NaN` marks it as unset, in
/// which case the dataset derives it from the first observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub time: f64,
    pub rank: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub sxx: f64,
    pub syy: f64,
    pub szz: f64,
    pub sxy: f64,
    pub sxz: f64,
    pub syz: f64,
    #[serde(default = "unset_length", with = "optional_length")]
    pub len: f64,
}

fn unset_length() -> f64 {
    f64::NAN
}

/// Records coming from import feeds spell a missing length as an absent key or `null`.
mod optional_length {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

impl Observation {
    /// Builds an observation with zero covariance and no length.
    pub fn new(time: f64, rank: f64, position: [f64; 3]) -> Self {
        Self {
            time,
            rank,
            x: position[0],
            y: position[1],
            z: position[2],
            sxx: 0.0,
            syy: 0.0,
            szz: 0.0,
            sxy: 0.0,
            sxz: 0.0,
            syz: 0.0,
            len: f64::NAN,
        }
    }

    /// An observation with every field set to `NaN`, the "no usable data" sentinel.
    pub fn nan() -> Self {
        Self {
            time: f64::NAN,
            rank: f64::NAN,
            x: f64::NAN,
            y: f64::NAN,
            z: f64::NAN,
            sxx: f64::NAN,
            syy: f64::NAN,
            szz: f64::NAN,
            sxy: f64::NAN,
            sxz: f64::NAN,
            syz: f64::NAN,
            len: f64::NAN,
        }
    }

    pub fn with_covariance(mut self, cov: [f64; 6]) -> Self {
        self.set_covariance(cov);
        self
    }

    pub fn with_length(mut self, len: f64) -> Self {
        self.len = len;
        self
    }

    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Packed upper triangle in `xx, yy, zz, xy, xz, yz` order.
    pub fn covariance(&self) -> [f64; 6] {
        [self.sxx, self.syy, self.szz, self.sxy, self.sxz, self.syz]
    }

    pub fn set_covariance(&mut self, cov: [f64; 6]) {
        self.sxx = cov[0];
        self.syy = cov[1];
        self.szz = cov[2];
        self.sxy = cov[3];
        self.sxz = cov[4];
        self.syz = cov[5];
    }

    pub fn has_length(&self) -> bool {
        !self.len.is_nan()
    }
}
