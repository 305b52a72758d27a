//! Fixed big-endian layout for whole datasets.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0 | 4 | row count `N`, signed 32-bit |
//! | 4 + 96*i | 96 | row `i`: time, rank, x, y, z, xx, yy, zz, xy, xz, yz, len as f64 |
//!
//! There is no version or frame marker; decoded datasets are tagged ECEF.

use crate::data::{GpsDataset, Observation};
use crate::prelude::{BinaryDataSet, GpsError, GpsResult};

const HEADER_BYTES: usize = 4;
const FIELDS_PER_ROW: usize = 12;
pub const ROW_BYTES: usize = FIELDS_PER_ROW * 8;

/// Row-count header; fails when `rows` does not fit the signed 32-bit field.
fn row_count_header(rows: usize) -> GpsResult<[u8; HEADER_BYTES]> {
    i32::try_from(rows)
        .map(i32::to_be_bytes)
        .map_err(|_| GpsError::TooManyRows(rows))
}

/// Serialises every row of `dataset`. Output is exactly `4 + 96 * N` bytes.
pub fn encode(dataset: &GpsDataset) -> GpsResult<Vec<u8>> {
    let rows = dataset.observations();
    let header = row_count_header(rows)?;
    let mut buffer = Vec::with_capacity(HEADER_BYTES + rows * ROW_BYTES);
    buffer.extend_from_slice(&header);

    for row in 0..rows {
        buffer.extend_from_slice(&dataset.times()[[row, 0]].to_be_bytes());
        buffer.extend_from_slice(&dataset.ranks()[[row, 0]].to_be_bytes());
        for &value in dataset.position(row).iter() {
            buffer.extend_from_slice(&value.to_be_bytes());
        }
        for &value in dataset.packed_covariance(row).iter() {
            buffer.extend_from_slice(&value.to_be_bytes());
        }
        buffer.extend_from_slice(&dataset.lengths()[[row, 0]].to_be_bytes());
    }

    debug_assert_eq!(buffer.len(), HEADER_BYTES + rows * ROW_BYTES);
    Ok(buffer)
}

/// Rebuilds a dataset from an encoded buffer. Bytes past the last row are ignored.
pub fn decode(bytes: &[u8]) -> GpsResult<GpsDataset> {
    let header: [u8; HEADER_BYTES] = bytes
        .get(..HEADER_BYTES)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(GpsError::Format {
            needed: HEADER_BYTES,
            available: bytes.len(),
        })?;
    let declared = i32::from_be_bytes(header);
    if declared < 0 {
        return Err(GpsError::NegativeRowCount(declared));
    }
    let rows = declared as usize;
    if rows == 0 {
        return Err(GpsError::EmptySequence);
    }

    let needed = HEADER_BYTES + rows * ROW_BYTES;
    if bytes.len() < needed {
        return Err(GpsError::Format {
            needed,
            available: bytes.len(),
        });
    }

    let mut dataset = GpsDataset::zeroed(rows);
    for (row, chunk) in bytes[HEADER_BYTES..needed]
        .chunks_exact(ROW_BYTES)
        .enumerate()
    {
        let mut fields = [0.0f64; FIELDS_PER_ROW];
        for (field, raw) in fields.iter_mut().zip(chunk.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(raw);
            *field = f64::from_be_bytes(word);
        }
        let point = Observation::new(fields[0], fields[1], [fields[2], fields[3], fields[4]])
            .with_covariance([
                fields[5], fields[6], fields[7], fields[8], fields[9], fields[10],
            ]);
        dataset.write_row(row, &point, fields[11]);
    }
    Ok(dataset)
}

impl BinaryDataSet for GpsDataset {
    fn to_binary(&self) -> GpsResult<Vec<u8>> {
        encode(self)
    }

    fn from_binary(bytes: &[u8]) -> GpsResult<Self> {
        decode(bytes)
    }
}
