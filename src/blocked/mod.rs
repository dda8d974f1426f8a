//! Cache-blocked (tiled) kernels.
//!
//! These functions break the iteration space into square tiles of a
//! caller-chosen edge so that the tiles of A, B and C touched by one inner
//! loop nest stay resident in cache. Edge tiles are clamped to the matrix
//! bounds, so the block size never has to divide the matrix size.
//!
//! Available implementations:
//! - `gemm`: 3-D blocked multiply, tile order ii → jj → kk
//! - `transpose`: 2-D blocked transpose

pub mod gemm;
pub mod transpose;

use crate::error::{Result, invalid_parameter};

/// Tile edge length, applied identically along every blocked dimension.
///
/// Always at least 1. A block at least as large as the matrix degenerates
/// to the naive kernel's access order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockSize(usize);

impl BlockSize {
    /// 64×64 `f32` tiles: three of them (A, B, C) take 48 KiB, roughly the
    /// `sqrt(cache / 3)` rule of thumb for a 256 KiB L2.
    pub const DEFAULT: BlockSize = BlockSize(64);

    /// # Errors
    ///
    /// [`Error::InvalidParameter`](crate::Error::InvalidParameter) if `edge`
    /// is zero.
    pub fn new(edge: usize) -> Result<Self> {
        if edge == 0 {
            return Err(invalid_parameter("block_size", edge, "must be at least 1"));
        }
        Ok(BlockSize(edge))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}
