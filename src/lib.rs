//! Cache-aware dense matrix kernels, and the harness that measures them.
//!
//! The same product can be computed with very different memory traffic.
//! This crate puts the classic variants side by side so the difference can
//! be measured rather than assumed:
//!
//! - naive i-j-k multiply and transpose: the correctness oracle and the
//!   baseline to beat
//! - blocked (tiled) multiply and transpose with a tunable tile edge
//! - a recursive cache-oblivious multiply with no tile size at all
//! - a strided memory access probe reporting effective bandwidth
//! - record layout workloads: array of structures against structure of
//!   arrays, padded against cache-line-aligned records
//!
//! ## Usage
//!
//! ```
//! use cacheblock::{Matrix, blocked::BlockSize};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let a = Matrix::random(96, 96, 0.0, 1.0, &mut rng).unwrap();
//! let b = Matrix::random(96, 96, 0.0, 1.0, &mut rng).unwrap();
//!
//! let oracle = cacheblock::multiply_naive(&a, &b).unwrap();
//! let tiled = cacheblock::multiply_blocked(&a, &b, BlockSize::new(32).unwrap()).unwrap();
//! let recursive = cacheblock::multiply_oblivious(&a, &b).unwrap();
//!
//! assert!(tiled.equals_within_tolerance(&oracle, 1e-5));
//! assert!(recursive.equals_within_tolerance(&oracle, 1e-5));
//! ```
//!
//! Everything here is single-threaded. Kernels borrow their inputs and
//! write into an output they own exclusively for the duration of the call.

pub mod blocked;
pub mod config;
pub mod error;
pub mod harness;
pub mod layout;
pub mod matrix;
pub mod oblivious;
pub mod probe;

pub use blocked::BlockSize;
pub use config::BenchConfig;
pub use error::{Error, Result};
pub use matrix::Matrix;

pub use blocked::gemm::multiply as multiply_blocked;
pub use matrix::naive_ijk::multiply as multiply_naive;
pub use oblivious::multiply as multiply_oblivious;
