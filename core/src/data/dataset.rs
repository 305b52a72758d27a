use crate::data::observation::Observation;
use crate::math::MatrixHelper;
use crate::prelude::{Frame, GpsError, GpsResult};
use ndarray::{Array2, ArrayView1};
use std::fmt::Write;

/// Column-oriented GPS time series.
///
/// Every column shares row indexing: row `i` of the time, rank, position,
/// covariance and length matrices describes the same observation. Position is
/// `N x 3`, covariance is the packed upper triangle `N x 6` in
/// `xx, yy, zz, xy, xz, yz` order, the other columns are `N x 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct GpsDataset {
    times: Array2<f64>,
    ranks: Array2<f64>,
    xyz: Array2<f64>,
    covariance: Array2<f64>,
    lengths: Array2<f64>,
    frame: Frame,
}

impl GpsDataset {
    /// Builds the column matrices from an ordered, non-empty observation sequence.
    ///
    /// Whether lengths are taken verbatim or derived is decided once from the
    /// first observation: if its `len` is set every row's `len` is copied as is,
    /// otherwise every row gets its distance from the first position.
    pub fn from_observations(points: &[Observation]) -> GpsResult<Self> {
        let origin = points.first().ok_or(GpsError::EmptySequence)?;
        let has_len = origin.has_length();
        let rows = points.len();

        let mut dataset = Self::zeroed(rows);
        for (i, point) in points.iter().enumerate() {
            let len = if has_len {
                point.len
            } else {
                let delta = [point.x - origin.x, point.y - origin.y, point.z - origin.z];
                MatrixHelper::norm(ArrayView1::from(&delta[..]))
            };
            dataset.write_row(i, point, len);
        }
        Ok(dataset)
    }

    pub(crate) fn zeroed(rows: usize) -> Self {
        Self {
            times: Array2::zeros((rows, 1)),
            ranks: Array2::zeros((rows, 1)),
            xyz: Array2::zeros((rows, 3)),
            covariance: Array2::zeros((rows, 6)),
            lengths: Array2::zeros((rows, 1)),
            frame: Frame::Ecef,
        }
    }

    pub(crate) fn write_row(&mut self, i: usize, point: &Observation, len: f64) {
        self.times[[i, 0]] = point.time;
        self.ranks[[i, 0]] = point.rank;
        for (j, value) in point.position().into_iter().enumerate() {
            self.xyz[[i, j]] = value;
        }
        for (j, value) in point.covariance().into_iter().enumerate() {
            self.covariance[[i, j]] = value;
        }
        self.lengths[[i, 0]] = len;
    }

    /// Number of rows shared by every column.
    pub fn observations(&self) -> usize {
        self.times.nrows()
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Retags the dataset, e.g. after decoding a buffer known to hold ENU data.
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    pub(crate) fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    pub fn times(&self) -> &Array2<f64> {
        &self.times
    }

    pub fn ranks(&self) -> &Array2<f64> {
        &self.ranks
    }

    pub fn xyz(&self) -> &Array2<f64> {
        &self.xyz
    }

    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    pub fn lengths(&self) -> &Array2<f64> {
        &self.lengths
    }

    pub(crate) fn columns_mut(&mut self) -> (&mut Array2<f64>, &mut Array2<f64>) {
        (&mut self.xyz, &mut self.covariance)
    }

    pub fn time(&self, row: usize) -> f64 {
        self.times[[row, 0]]
    }

    pub fn position(&self, row: usize) -> ArrayView1<'_, f64> {
        self.xyz.row(row)
    }

    pub fn packed_covariance(&self, row: usize) -> ArrayView1<'_, f64> {
        self.covariance.row(row)
    }

    /// Position of the first row.
    pub fn origin(&self) -> [f64; 3] {
        [self.xyz[[0, 0]], self.xyz[[0, 1]], self.xyz[[0, 2]]]
    }

    /// Reassembles row `row` into an observation, including its stored length.
    pub fn observation(&self, row: usize) -> Option<Observation> {
        if row >= self.observations() {
            return None;
        }
        let mut point = Observation::new(
            self.times[[row, 0]],
            self.ranks[[row, 0]],
            [self.xyz[[row, 0]], self.xyz[[row, 1]], self.xyz[[row, 2]]],
        )
        .with_length(self.lengths[[row, 0]]);
        let cov = self.covariance.row(row);
        point.set_covariance([cov[0], cov[1], cov[2], cov[3], cov[4], cov[5]]);
        Some(point)
    }

    pub fn first_observation(&self) -> Option<Observation> {
        self.observation(0)
    }

    pub fn iter_observations(&self) -> impl Iterator<Item = Observation> + '_ {
        (0..self.observations()).filter_map(move |row| self.observation(row))
    }

    /// Shifts every time entry by `adj` seconds (time-zone handling).
    pub fn adjust_time(&mut self, adj: f64) {
        self.times.mapv_inplace(|t| t + adj);
    }

    /// Replaces every column at once. Shapes must agree on a common, non-zero row count.
    pub fn set_data(
        &mut self,
        times: Array2<f64>,
        ranks: Array2<f64>,
        xyz: Array2<f64>,
        covariance: Array2<f64>,
        lengths: Array2<f64>,
    ) -> GpsResult<()> {
        let rows = times.nrows();
        if rows == 0 {
            return Err(GpsError::EmptySequence);
        }
        let expected = [
            ("time", times.dim(), 1),
            ("rank", ranks.dim(), 1),
            ("position", xyz.dim(), 3),
            ("covariance", covariance.dim(), 6),
            ("length", lengths.dim(), 1),
        ];
        for (name, dim, cols) in expected {
            if dim != (rows, cols) {
                return Err(GpsError::Shape(format!(
                    "{} column is {}x{}, expected {}x{}",
                    name, dim.0, dim.1, rows, cols
                )));
            }
        }
        self.times = times;
        self.ranks = ranks;
        self.xyz = xyz;
        self.covariance = covariance;
        self.lengths = lengths;
        Ok(())
    }

    /// Row-by-row text rendering for diagnostics, with the covariance expanded
    /// back into its symmetric 3x3 form.
    pub fn debug_dump(&self) -> String {
        let mut out = String::new();
        for row in 0..self.observations() {
            let p = self.xyz.row(row);
            let c = self.covariance.row(row);
            let _ = writeln!(out, "{}", self.times[[row, 0]]);
            let _ = writeln!(out, "{}", self.ranks[[row, 0]]);
            let _ = writeln!(out, "\t{} {} {} {}", p[0], p[1], p[2], self.lengths[[row, 0]]);
            let _ = writeln!(out, "\t\t{} {} {}", c[0], c[3], c[4]);
            let _ = writeln!(out, "\t\t{} {} {}", c[3], c[1], c[5]);
            let _ = writeln!(out, "\t\t{} {} {}", c[4], c[5], c[2]);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn line() -> Vec<Observation> {
        vec![
            Observation::new(0.0, 1.0, [1.0, 0.0, 0.0]),
            Observation::new(1.0, 1.0, [2.0, 0.0, 0.0]),
            Observation::new(2.0, 2.0, [4.0, 3.0, 0.0]),
        ]
    }

    #[test]
    fn missing_lengths_are_measured_from_first_position() {
        let dataset = GpsDataset::from_observations(&line()).unwrap();
        assert_eq!(dataset.observations(), 3);
        assert_eq!(dataset.lengths().column(0).to_vec(), vec![0.0, 1.0, 5.0]);
        assert_eq!(dataset.frame(), Frame::Ecef);
    }

    #[test]
    fn explicit_first_length_is_applied_to_every_row() {
        let mut points = line();
        points[0].len = 7.0;
        let dataset = GpsDataset::from_observations(&points).unwrap();
        assert_eq!(dataset.lengths()[[0, 0]], 7.0);
        // later rows keep their own (unset) value rather than being measured
        assert!(dataset.lengths()[[1, 0]].is_nan());
        assert!(dataset.lengths()[[2, 0]].is_nan());
    }

    #[test]
    fn unset_first_length_overrides_later_explicit_lengths() {
        let mut points = line();
        points[2].len = 99.0;
        let dataset = GpsDataset::from_observations(&points).unwrap();
        assert_eq!(dataset.lengths()[[2, 0]], 5.0);
    }

    #[test]
    fn empty_sequence_is_rejected() {
        assert_eq!(
            GpsDataset::from_observations(&[]).unwrap_err(),
            GpsError::EmptySequence
        );
    }

    #[test]
    fn columns_share_row_indexing() {
        let points = vec![
            Observation::new(10.0, 3.0, [1.0, 2.0, 3.0])
                .with_covariance([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            Observation::new(20.0, 4.0, [4.0, 5.0, 6.0])
                .with_covariance([7.0, 8.0, 9.0, 10.0, 11.0, 12.0]),
        ];
        let dataset = GpsDataset::from_observations(&points).unwrap();
        assert_eq!(dataset.times().dim(), (2, 1));
        assert_eq!(dataset.ranks().dim(), (2, 1));
        assert_eq!(dataset.xyz().dim(), (2, 3));
        assert_eq!(dataset.covariance().dim(), (2, 6));
        assert_eq!(dataset.lengths().dim(), (2, 1));
        assert_eq!(dataset.time(1), 20.0);
        assert_eq!(dataset.position(1).to_vec(), vec![4.0, 5.0, 6.0]);
        assert_eq!(dataset.packed_covariance(1)[3], 10.0);
        assert_eq!(dataset.origin(), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn observation_reassembles_rows() {
        let dataset = GpsDataset::from_observations(&line()).unwrap();
        let third = dataset.observation(2).unwrap();
        assert_eq!(third.time, 2.0);
        assert_eq!(third.rank, 2.0);
        assert_eq!(third.position(), [4.0, 3.0, 0.0]);
        assert_eq!(third.len, 5.0);
        assert!(dataset.observation(3).is_none());
        assert_eq!(dataset.first_observation().unwrap().time, 0.0);
        assert_eq!(dataset.iter_observations().count(), 3);
    }

    #[test]
    fn adjust_time_shifts_every_row() {
        let mut dataset = GpsDataset::from_observations(&line()).unwrap();
        dataset.adjust_time(-3600.0);
        assert_eq!(
            dataset.times().column(0).to_vec(),
            vec![-3600.0, -3599.0, -3598.0]
        );
    }

    #[test]
    fn set_data_validates_shapes() {
        let mut dataset = GpsDataset::from_observations(&line()).unwrap();
        let bad = dataset.set_data(
            array![[1.0], [2.0]],
            array![[1.0], [1.0]],
            Array2::zeros((2, 3)),
            Array2::zeros((3, 6)),
            Array2::zeros((2, 1)),
        );
        assert!(matches!(bad, Err(GpsError::Shape(_))));
        assert_eq!(dataset.observations(), 3);

        dataset
            .set_data(
                array![[1.0], [2.0]],
                array![[1.0], [1.0]],
                Array2::zeros((2, 3)),
                Array2::zeros((2, 6)),
                Array2::zeros((2, 1)),
            )
            .unwrap();
        assert_eq!(dataset.observations(), 2);
    }

    #[test]
    fn debug_dump_expands_symmetric_covariance() {
        let points = vec![Observation::new(1.5, 2.0, [1.0, 2.0, 3.0])
            .with_covariance([1.0, 2.0, 3.0, 4.0, 5.0, 6.0])];
        let dataset = GpsDataset::from_observations(&points).unwrap();
        let dump = dataset.debug_dump();
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "1.5");
        assert_eq!(lines[2], "\t1 2 3 0");
        assert_eq!(lines[3], "\t\t1 4 5");
        assert_eq!(lines[4], "\t\t4 2 6");
        assert_eq!(lines[5], "\t\t5 6 3");
    }
}
