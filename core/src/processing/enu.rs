use crate::data::GpsDataset;
use crate::math::MatrixHelper;
use crate::prelude::{Frame, GpsError, GpsResult};
use log::debug;
use ndarray::Array1;

impl GpsDataset {
    /// Rotates every ECEF position into east/north/up about `lon`, `lat`
    /// (degrees) and carries each covariance through the same rotation as
    /// `R * C * R^T`. Lengths are left as they are.
    ///
    /// Fails with [`GpsError::FrameMismatch`] unless the dataset is ECEF, so a
    /// transform can never be applied twice. The ECEF columns are overwritten;
    /// use [`GpsDataset::enu`] to keep them.
    pub fn to_enu(&mut self, lon: f64, lat: f64) -> GpsResult<()> {
        if self.frame() != Frame::Ecef {
            return Err(GpsError::FrameMismatch {
                expected: Frame::Ecef,
                found: self.frame(),
            });
        }

        let rotation = MatrixHelper::enu_rotation(lon, lat);
        let rows = self.observations();
        let (xyz, covariance) = self.columns_mut();

        for i in 0..rows {
            let position: Array1<f64> = rotation.dot(&xyz.row(i));
            xyz.row_mut(i).assign(&position);

            let full = MatrixHelper::unpack_covariance(covariance.row(i));
            let rotated = MatrixHelper::congruence(rotation.view(), full.view());
            let packed = MatrixHelper::pack_covariance(rotated.view());
            for (j, value) in packed.into_iter().enumerate() {
                covariance[[i, j]] = value;
            }
        }

        debug!("rotated {} rows into ENU at lon {} lat {}", rows, lon, lat);
        self.set_frame(Frame::Enu { lon, lat });
        Ok(())
    }

    /// Copying form of [`GpsDataset::to_enu`].
    pub fn enu(&self, lon: f64, lat: f64) -> GpsResult<GpsDataset> {
        let mut copy = self.clone();
        copy.to_enu(lon, lat)?;
        Ok(copy)
    }
}
