//! Design matrices for weighted least-squares fits of a station's series.
//!
//! Each kernel is a vertical stack of one row-block per observation, so the
//! result has `3 * N` rows and three columns per estimated vector.

use crate::data::GpsDataset;
use crate::math::{Block, BlockMatrix, I3, Z3};
use serde::{Deserialize, Serialize};

/// Seconds per Julian year used by the velocity model.
pub const SECONDS_PER_YEAR: f64 = 31_557_600.0;
/// Year length used by the detrended displacement model.
pub const DETREND_SECONDS_PER_YEAR: f64 = 86_400.0 * 365.25;

/// Least-squares model selector; `split` is the displacement epoch in the dataset's time base.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum KernelModel {
    Velocity,
    Displacement { split: f64 },
    DetrendedDisplacement { split: f64 },
}

impl GpsDataset {
    /// `[dt_i * I, I]` per row, with `dt_i` in years since the first row.
    pub fn velocity_kernel(&self) -> BlockMatrix {
        let t0 = self.time(0);
        BlockMatrix::from_row_blocks(self.observations(), 2, |i| {
            let ta = (self.time(i) - t0) / SECONDS_PER_YEAR;
            vec![Block::Scaled(ta), I3]
        })
    }

    /// Step at `dt`: `[Z, I]` before, `[I, I]` after. Rows exactly at `dt` get `[Z, Z]`.
    pub fn displacement_kernel(&self, dt: f64) -> BlockMatrix {
        BlockMatrix::from_row_blocks(self.observations(), 2, |i| {
            let t = self.time(i);
            if t == dt {
                vec![Z3, Z3]
            } else if t < dt {
                vec![Z3, I3]
            } else {
                vec![I3, I3]
            }
        })
    }

    /// Step at `dt` fitted together with a linear trend: `[S, dt_i * I, I]`
    /// where `S` is zero before `dt` and identity from `dt` on.
    pub fn detrended_displacement_kernel(&self, dt: f64) -> BlockMatrix {
        let t0 = self.time(0);
        BlockMatrix::from_row_blocks(self.observations(), 3, |i| {
            let t = self.time(i);
            let step = if t < dt { Z3 } else { I3 };
            let ta = (t - t0) / DETREND_SECONDS_PER_YEAR;
            vec![step, Block::Scaled(ta), I3]
        })
    }

    pub fn kernel(&self, model: KernelModel) -> BlockMatrix {
        match model {
            KernelModel::Velocity => self.velocity_kernel(),
            KernelModel::Displacement { split } => self.displacement_kernel(split),
            KernelModel::DetrendedDisplacement { split } => {
                self.detrended_displacement_kernel(split)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Observation;

    fn three_rows() -> GpsDataset {
        let points: Vec<Observation> = [(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]
            .iter()
            .map(|&(t, x)| Observation::new(t, 1.0, [x, 0.0, 0.0]))
            .collect();
        GpsDataset::from_observations(&points).unwrap()
    }

    #[test]
    fn kernel_shapes_follow_row_count() {
        let dataset = three_rows();
        assert_eq!(dataset.velocity_kernel().shape(), (9, 6));
        assert_eq!(dataset.displacement_kernel(1.0).shape(), (9, 6));
        assert_eq!(dataset.detrended_displacement_kernel(1.0).shape(), (9, 9));
    }

    #[test]
    fn velocity_rows_scale_by_years_elapsed() {
        let kernel = three_rows().velocity_kernel();
        assert_eq!(kernel.row_block(0), &[Block::Scaled(0.0), I3]);
        assert_eq!(kernel.row_block(1), &[Block::Scaled(1.0 / 31_557_600.0), I3]);
        let dense = kernel.to_dense();
        assert_eq!(dense[[3, 0]], 1.0 / 31_557_600.0);
        assert_eq!(dense[[5, 2]], 1.0 / 31_557_600.0);
        assert_eq!(dense[[5, 5]], 1.0);
        assert_eq!(dense[[3, 1]], 0.0);
    }

    #[test]
    fn displacement_zeroes_the_split_epoch() {
        let kernel = three_rows().displacement_kernel(1.0);
        assert_eq!(kernel.row_block(0), &[Z3, I3]);
        assert_eq!(kernel.row_block(1), &[Z3, Z3]);
        assert_eq!(kernel.row_block(2), &[I3, I3]);
        let dense = kernel.to_dense();
        assert!(dense.slice(ndarray::s![3..6, ..]).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn detrended_step_starts_at_split_epoch() {
        let kernel = three_rows().detrended_displacement_kernel(1.0);
        assert_eq!(kernel.row_block(0), &[Z3, Block::Scaled(0.0), I3]);
        assert_eq!(
            kernel.row_block(1),
            &[I3, Block::Scaled(1.0 / (86_400.0 * 365.25)), I3]
        );
        assert_eq!(kernel.row_block(2)[0], I3);
    }

    #[test]
    fn kernel_dispatches_on_model() {
        let dataset = three_rows();
        assert_eq!(dataset.kernel(KernelModel::Velocity), dataset.velocity_kernel());
        assert_eq!(
            dataset.kernel(KernelModel::Displacement { split: 2.0 }),
            dataset.displacement_kernel(2.0)
        );
        assert_eq!(
            dataset.kernel(KernelModel::DetrendedDisplacement { split: 0.5 }).shape(),
            (9, 9)
        );
    }
}
