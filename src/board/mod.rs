//! Board and board generation.
//!
//! The generator turns an identity pool into a shuffled sequence where each
//! chosen face appears twice, then lays it out on a grid. Odd grids and short
//! pools under-fill the board instead of failing; the `BuildReport` records
//! what was dealt.

#[allow(clippy::module_inception)]
mod board;
mod generator;

pub use board::Board;
pub use generator::{BoardGenerator, BuildReport};
