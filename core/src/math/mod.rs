pub mod block;
pub mod geodesy;
pub mod matrix;

pub use block::{Block, BlockMatrix, I3, Z3};
pub use geodesy::{llh2xyz, xyz2llh};
pub use matrix::MatrixHelper;
