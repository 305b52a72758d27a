pub mod binary;

pub use binary::{decode, encode, ROW_BYTES};
