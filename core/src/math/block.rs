use ndarray::Array2;

pub const BLOCK_SIZE: usize = 3;

/// A 3x3 block of a design matrix. Every block these kernels use is a multiple of identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Block {
    Zero,
    Identity,
    Scaled(f64),
}

/// Shared 3x3 identity block.
pub const I3: Block = Block::Identity;
/// Shared 3x3 zero block.
pub const Z3: Block = Block::Zero;

impl Block {
    /// Diagonal value; off-diagonal entries are always zero.
    pub fn diagonal(&self) -> f64 {
        match *self {
            Block::Zero => 0.0,
            Block::Identity => 1.0,
            Block::Scaled(scale) => scale,
        }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row == col {
            self.diagonal()
        } else {
            0.0
        }
    }
}

/// Row-major grid of 3x3 blocks, stored without expanding zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMatrix {
    block_rows: usize,
    block_cols: usize,
    blocks: Vec<Block>,
}

impl BlockMatrix {
    /// Builds a `block_rows x block_cols` grid, filling each row-block from `row_fn`.
    pub fn from_row_blocks<F>(block_rows: usize, block_cols: usize, mut row_fn: F) -> Self
    where
        F: FnMut(usize) -> Vec<Block>,
    {
        let mut blocks = Vec::with_capacity(block_rows * block_cols);
        for row in 0..block_rows {
            let row_blocks = row_fn(row);
            debug_assert_eq!(row_blocks.len(), block_cols);
            blocks.extend(
                row_blocks
                    .into_iter()
                    .chain(std::iter::repeat(Block::Zero))
                    .take(block_cols),
            );
        }
        Self {
            block_rows,
            block_cols,
            blocks,
        }
    }

    /// Scalar dimensions `(3 * block_rows, 3 * block_cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.block_rows * BLOCK_SIZE, self.block_cols * BLOCK_SIZE)
    }

    pub fn block(&self, row: usize, col: usize) -> Block {
        self.blocks[row * self.block_cols + col]
    }

    pub fn row_block(&self, row: usize) -> &[Block] {
        let start = row * self.block_cols;
        &self.blocks[start..start + self.block_cols]
    }

    /// Scalar entry at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.block(row / BLOCK_SIZE, col / BLOCK_SIZE)
            .get(row % BLOCK_SIZE, col % BLOCK_SIZE)
    }

    /// `(row, col, value)` for every non-zero scalar entry, row-major.
    pub fn triplets(&self) -> Vec<(usize, usize, f64)> {
        let mut out = Vec::new();
        for row in 0..self.block_rows {
            for k in 0..BLOCK_SIZE {
                for (col, block) in self.row_block(row).iter().enumerate() {
                    let value = block.diagonal();
                    if value != 0.0 {
                        out.push((row * BLOCK_SIZE + k, col * BLOCK_SIZE + k, value));
                    }
                }
            }
        }
        out
    }

    pub fn nnz(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| block.diagonal() != 0.0)
            .count()
            * BLOCK_SIZE
    }

    /// Dense copy; only sensible for moderate row counts.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros(self.shape());
        for (row, col, value) in self.triplets() {
            dense[[row, col]] = value;
        }
        dense
    }
}
