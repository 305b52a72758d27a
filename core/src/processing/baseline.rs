use crate::data::{GpsDataset, Observation};
use crate::math::MatrixHelper;
use crate::prelude::{GpsError, GpsResult};
use log::{debug, warn};
use ndarray::ArrayView1;

impl GpsDataset {
    /// Differences this dataset against `baseline` at their common epochs.
    ///
    /// Both series must be sorted by ascending time; that is not checked, and
    /// out-of-order input silently misaligns. Matching is exact on time and
    /// only ever moves forward through the baseline. Positions are subtracted,
    /// covariances are summed, matched rows carry rank 0, and rows with no
    /// matching baseline epoch are dropped. If either series starts with a
    /// `NaN` time the result is a single all-`NaN` row.
    pub fn baselined(&self, baseline: &GpsDataset) -> GpsResult<GpsDataset> {
        if self.frame() != baseline.frame() {
            return Err(GpsError::FrameMismatch {
                expected: self.frame(),
                found: baseline.frame(),
            });
        }

        let points = if self.time(0).is_nan() || baseline.time(0).is_nan() {
            vec![Observation::nan()]
        } else {
            let aligned = align(self, baseline);
            if aligned.is_empty() {
                warn!(
                    "no common epochs between {} rows and {} baseline rows",
                    self.observations(),
                    baseline.observations()
                );
                vec![Observation::nan()]
            } else {
                aligned
            }
        };

        debug!(
            "baseline kept {} of {} rows",
            points.len(),
            self.observations()
        );
        let dataset = GpsDataset::from_observations(&points)?;
        Ok(dataset.with_frame(self.frame()))
    }

    /// In-place form of [`GpsDataset::baselined`]; replaces every column.
    pub fn apply_baseline(&mut self, baseline: &GpsDataset) -> GpsResult<()> {
        *self = self.baselined(baseline)?;
        Ok(())
    }
}

fn align(data: &GpsDataset, baseline: &GpsDataset) -> Vec<Observation> {
    let first = data.time(0);
    let mut k = 0;
    for j in 0..baseline.observations() {
        if baseline.time(j) == first {
            k = j;
        }
    }

    let mut points = Vec::with_capacity(data.observations());
    for i in 0..data.observations() {
        let t = data.time(i);
        let Some(j) = (k..baseline.observations()).find(|&j| baseline.time(j) == t) else {
            continue;
        };

        let p = data.position(i);
        let q = baseline.position(j);
        let delta = [p[0] - q[0], p[1] - q[1], p[2] - q[2]];
        let mut cov = [0.0; 6];
        for (c, (a, b)) in cov.iter_mut().zip(
            data.packed_covariance(i)
                .iter()
                .zip(baseline.packed_covariance(j).iter()),
        ) {
            *c = a + b;
        }
        let len = MatrixHelper::norm(ArrayView1::from(&delta[..]));

        points.push(
            Observation::new(t, 0.0, delta)
                .with_covariance(cov)
                .with_length(len),
        );
        k = j + 1;
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::Frame;

    fn series(times: &[f64], offset: f64, cov: [f64; 6]) -> GpsDataset {
        let points: Vec<Observation> = times
            .iter()
            .enumerate()
            .map(|(i, &t)| {
                Observation::new(t, 1.0, [offset + i as f64, 2.0 * offset, -offset])
                    .with_covariance(cov)
            })
            .collect();
        GpsDataset::from_observations(&points).unwrap()
    }

    #[test]
    fn identical_grid_subtracts_positions_and_keeps_covariance() {
        let cov = [1.0, 2.0, 3.0, 0.1, 0.2, 0.3];
        let data = series(&[0.0, 10.0, 20.0], 100.0, cov);
        let baseline = series(&[0.0, 10.0, 20.0], 40.0, [0.0; 6]);

        let out = data.baselined(&baseline).unwrap();
        assert_eq!(out.observations(), 3);
        for i in 0..3 {
            assert_eq!(out.position(i).to_vec(), vec![60.0, 120.0, -60.0]);
            assert_eq!(out.packed_covariance(i).to_vec(), cov.to_vec());
            assert_eq!(out.lengths()[[i, 0]], (60.0f64 * 60.0 * 6.0).sqrt());
            assert_eq!(out.time(i), data.time(i));
        }
    }

    #[test]
    fn covariances_are_summed() {
        let data = series(&[0.0], 1.0, [1.0, 1.0, 1.0, 0.5, 0.5, 0.5]);
        let baseline = series(&[0.0], 0.0, [2.0, 3.0, 4.0, 0.25, 0.125, 0.5]);
        let out = data.baselined(&baseline).unwrap();
        assert_eq!(
            out.packed_covariance(0).to_vec(),
            vec![3.0, 4.0, 5.0, 0.75, 0.625, 1.0]
        );
    }

    #[test]
    fn unmatched_rows_are_dropped() {
        let data = series(&[0.0, 5.0, 10.0, 15.0], 10.0, [0.0; 6]);
        let baseline = series(&[0.0, 10.0, 15.0], 0.0, [0.0; 6]);
        let out = data.baselined(&baseline).unwrap();
        assert_eq!(out.times().column(0).to_vec(), vec![0.0, 10.0, 15.0]);
        assert_eq!(out.position(1)[0], 12.0 - 1.0);
        assert_eq!(out.ranks()[[2, 0]], 0.0);
    }

    #[test]
    fn search_starts_at_first_common_epoch() {
        let data = series(&[20.0, 30.0], 10.0, [0.0; 6]);
        let baseline = series(&[0.0, 10.0, 20.0, 30.0], 0.0, [0.0; 6]);
        let out = data.baselined(&baseline).unwrap();
        assert_eq!(out.observations(), 2);
        // baseline rows 2 and 3 carry x = 2 and 3
        assert_eq!(out.position(0)[0], 10.0 - 2.0);
        assert_eq!(out.position(1)[0], 11.0 - 3.0);
    }

    #[test]
    fn matching_never_backtracks() {
        // descending data violates the precondition: the second row is only
        // searched for after the first match and is lost
        let data = series(&[10.0, 0.0], 5.0, [0.0; 6]);
        let baseline = series(&[0.0, 10.0], 0.0, [0.0; 6]);
        let out = data.baselined(&baseline).unwrap();
        assert_eq!(out.times().column(0).to_vec(), vec![10.0]);
    }

    #[test]
    fn nan_baseline_yields_single_nan_row() {
        let data = series(&[0.0, 1.0, 2.0], 3.0, [1.0; 6]);
        let baseline = GpsDataset::from_observations(&[Observation::nan()]).unwrap();
        let out = data.baselined(&baseline).unwrap();
        assert_eq!(out.observations(), 1);
        let row = out.first_observation().unwrap();
        assert!(row.time.is_nan() && row.rank.is_nan() && row.len.is_nan());
        assert!(row.position().iter().all(|v| v.is_nan()));
        assert!(row.covariance().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn nan_data_yields_single_nan_row() {
        let data = GpsDataset::from_observations(&[Observation::nan()]).unwrap();
        let baseline = series(&[0.0, 1.0], 3.0, [1.0; 6]);
        let out = data.baselined(&baseline).unwrap();
        assert_eq!(out.observations(), 1);
        assert!(out.time(0).is_nan());
    }

    #[test]
    fn disjoint_epochs_collapse_to_sentinel() {
        let data = series(&[1.0, 2.0], 3.0, [0.0; 6]);
        let baseline = series(&[5.0, 6.0], 0.0, [0.0; 6]);
        let out = data.baselined(&baseline).unwrap();
        assert_eq!(out.observations(), 1);
        assert!(out.time(0).is_nan());
    }

    #[test]
    fn frames_must_agree() {
        let data = series(&[0.0], 1.0, [0.0; 6]);
        let baseline = series(&[0.0], 0.0, [0.0; 6]).with_frame(Frame::Enu { lon: 1.0, lat: 2.0 });
        assert!(matches!(
            data.baselined(&baseline),
            Err(GpsError::FrameMismatch { .. })
        ));
    }

    #[test]
    fn apply_baseline_replaces_columns() {
        let mut data = series(&[0.0, 5.0, 10.0], 10.0, [0.0; 6]);
        let baseline = series(&[0.0, 10.0], 0.0, [0.0; 6]);
        data.apply_baseline(&baseline).unwrap();
        assert_eq!(data.observations(), 2);
        assert_eq!(data.xyz().nrows(), 2);
        assert_eq!(data.covariance().nrows(), 2);
    }

    #[test]
    fn baselined_rows_carry_zero_rank() {
        let data = GpsDataset::from_observations(&[Observation::new(0.0, 3.0, [5.0, 0.0, 0.0])])
            .unwrap();
        let baseline =
            GpsDataset::from_observations(&[Observation::new(0.0, 2.0, [1.0, 0.0, 0.0])])
                .unwrap();
        let out = data.baselined(&baseline).unwrap();
        assert_eq!(out.ranks()[[0, 0]], 0.0);
        assert_eq!(out.lengths()[[0, 0]], 4.0);
    }
}
