//! Bit-exact golden model for an int8 compute-in-memory convolution datapath.
//!
//! This crate computes reference convolution results with a fixed-width
//! accumulator, writes pixel, weight and result tensors as fixed-width hex
//! text vectors, and compares a software result file against a hardware
//! simulation dump line by line.
//!
//! # Example
//!
//! ```no_run
//! use cim_golden::compare::{compare_files, CompareOptions};
//! use cim_golden::variant::{run, GoldenConfig, Variant};
//!
//! let summary = run(&GoldenConfig::new(Variant::Single64).with_out_dir("vectors"))?;
//! println!("golden results: {:?}", summary.results.values());
//!
//! let report = compare_files(
//!     "vectors/conv_results.txt",
//!     "sim/result.txt",
//!     CompareOptions::default(),
//! )?;
//! println!("{}", report);
//! # Ok::<(), cim_golden::GoldenError>(())
//! ```

/// Error type shared by every module.
pub mod error;
/// Fixed-width two's-complement hex records.
pub mod codec;
/// Pixel, kernel and output tensors with validated shapes.
pub mod tensor;
/// Direct, im2col and split-channel integer convolution.
pub mod conv;
/// Hex text writers and strict readers.
pub mod serialize;
/// Line-by-line result comparison.
pub mod compare;
/// Seeded random tensor source.
pub mod generate;
/// Named golden-vector configurations.
pub mod variant;

pub use error::{GoldenError, Result};
