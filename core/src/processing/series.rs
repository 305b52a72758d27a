use crate::data::GpsDataset;
use crate::math::xyz2llh;
use crate::prelude::{GpsError, GpsResult};
use ndarray::{concatenate, Array2, Axis};

/// Column order of the plotting matrix returned by [`GpsDataset::to_time_series`].
pub const TIME_SERIES_COLUMNS: [&str; 6] = ["time", "rank", "east", "north", "up", "length"];

impl GpsDataset {
    /// Builds the `N x 6` plotting matrix `[time, rank, e, n, u, len]`.
    ///
    /// The ENU origin is the geodetic position of this dataset's first ECEF
    /// row, taken before the optional baseline is applied. On success the
    /// dataset is left baselined and in ENU; on error it is unchanged.
    pub fn to_time_series(&mut self, baseline: Option<&GpsDataset>) -> GpsResult<Array2<f64>> {
        let [x, y, z] = self.origin();
        let (lon, lat, _) = xyz2llh(x, y, z);

        let mut work = self.clone();
        if let Some(baseline) = baseline {
            work.apply_baseline(baseline)?;
        }
        work.to_enu(lon, lat)?;

        let series = concatenate(
            Axis(1),
            &[
                work.times().view(),
                work.ranks().view(),
                work.xyz().view(),
                work.lengths().view(),
            ],
        )
        .map_err(|err| GpsError::Shape(err.to_string()))?;
        *self = work;
        Ok(series)
    }
}
