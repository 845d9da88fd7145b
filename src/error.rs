//! Error types for the golden model, serializer and comparator.
//!
//! Every variant is fatal for the operation that raised it: the caller gets
//! the location of the fault and nothing is retried.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building tensors, convolving, writing or comparing vectors.
#[derive(Error, Debug)]
pub enum GoldenError {
    #[error("shape mismatch in {what}: expected {expected} but got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid {what} shape: {expected} elements required, buffer holds {actual}")]
    InvalidShape {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("bit width must be within 1..=64, got {bit_width}")]
    InvalidBitWidth { bit_width: u32 },

    #[error("{digits} hex digits cannot hold a {bit_width}-bit record")]
    DigitsTooNarrow { bit_width: u32, digits: usize },

    #[error("stride must be greater than 0")]
    InvalidStride,

    #[error("kernel {kh}x{kw} does not fit padded input {h}x{w}")]
    KernelTooLarge {
        kh: usize,
        kw: usize,
        h: usize,
        w: usize,
    },

    #[error("split point {split} is outside the channel range 0..={channels}")]
    InvalidSplit { split: usize, channels: usize },

    #[error(
        "partial sums do not reconcile at output {index}: total {total}, low + high {partial_sum}"
    )]
    Reconciliation {
        index: usize,
        total: i32,
        partial_sum: i32,
    },

    #[error("parse error in {source_name} at line {line}: {reason} ({text:?})")]
    Parse {
        source_name: String,
        line: usize,
        text: String,
        reason: String,
    },

    #[error("line count mismatch after line {line}: {left} and {right} have different lengths")]
    LengthMismatch {
        left: String,
        right: String,
        line: usize,
    },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GoldenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GoldenError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(
        source_name: &str,
        line: usize,
        text: &str,
        reason: impl Into<String>,
    ) -> Self {
        GoldenError::Parse {
            source_name: source_name.to_string(),
            line,
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GoldenError>;
