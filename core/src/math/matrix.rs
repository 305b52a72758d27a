use ndarray::{array, Array2, ArrayView1, ArrayView2};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Rotation taking ECEF vectors into east/north/up about `lon`, `lat` (degrees).
    pub fn enu_rotation(lon: f64, lat: f64) -> Array2<f64> {
        let (s1, c1) = lon.to_radians().sin_cos();
        let (s2, c2) = lat.to_radians().sin_cos();
        array![
            [-s1, c1, 0.0],
            [-s2 * c1, -s2 * s1, c2],
            [c2 * c1, c2 * s1, s2],
        ]
    }

    /// `R * C * R^T`, the covariance of a rotated random vector.
    pub fn congruence(rotation: ArrayView2<f64>, cov: ArrayView2<f64>) -> Array2<f64> {
        rotation.dot(&cov).dot(&rotation.t())
    }

    /// Expands a packed `xx, yy, zz, xy, xz, yz` row into the full symmetric matrix.
    pub fn unpack_covariance(packed: ArrayView1<f64>) -> Array2<f64> {
        array![
            [packed[0], packed[3], packed[4]],
            [packed[3], packed[1], packed[5]],
            [packed[4], packed[5], packed[2]],
        ]
    }

    /// Inverse of [`MatrixHelper::unpack_covariance`]; reads the upper triangle only.
    pub fn pack_covariance(full: ArrayView2<f64>) -> [f64; 6] {
        [
            full[[0, 0]],
            full[[1, 1]],
            full[[2, 2]],
            full[[0, 1]],
            full[[0, 2]],
            full[[1, 2]],
        ]
    }

    /// Euclidean length; `NaN` components give `NaN`.
    pub fn norm(vector: ArrayView1<f64>) -> f64 {
        vector.dot(&vector).sqrt()
    }
}
