//! Integer convolution engine.
//!
//! Provides the direct sliding-window formulation (the golden reference), an
//! im2col + dot-product formulation that must agree with it element-for-element,
//! partial reductions over channel ranges and the single-pixel dot products.

mod direct;
mod im2col;
mod pixel;
mod simd;
mod split;

pub use direct::{conv2d_channels, conv2d_direct};
pub use im2col::conv2d_im2col;
pub use pixel::{dot_pixel, dot_pixel_channels, dot_pixel_split};
pub use simd::dot_i8;
pub use split::{conv2d_split, SplitResult};

use std::ops::Range;

use crate::error::{GoldenError, Result};
use crate::tensor::{KernelTensor, OutputTensor, PixelTensor};

/// Selects which convolution formulation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvAlgorithm {
    /// Nested-loop sliding window (reference implementation).
    Direct,
    /// Im2col unfolding + int8 dot-product kernel.
    Im2col,
}

/// Dispatch convolution to the selected algorithm.
pub fn conv2d(
    algorithm: ConvAlgorithm,
    pixel: &PixelTensor,
    kernel: &KernelTensor,
    stride: usize,
    padding: usize,
) -> Result<OutputTensor> {
    match algorithm {
        ConvAlgorithm::Direct => conv2d_direct(pixel, kernel, stride, padding),
        ConvAlgorithm::Im2col => conv2d_im2col(pixel, kernel, stride, padding),
    }
}

/// Validates a convolution problem and returns its (OH, OW).
///
/// `OH = (H + 2 * padding - KH) / stride + 1`, OW analogous.
pub fn output_shape(
    pixel: &PixelTensor,
    kernel: &KernelTensor,
    stride: usize,
    padding: usize,
) -> Result<(usize, usize)> {
    if kernel.channels() != pixel.channels() {
        return Err(GoldenError::ShapeMismatch {
            what: "kernel channels",
            expected: pixel.channels(),
            actual: kernel.channels(),
        });
    }
    if stride == 0 {
        return Err(GoldenError::InvalidStride);
    }
    let h = pixel.height() + 2 * padding;
    let w = pixel.width() + 2 * padding;
    let (kh, kw) = (kernel.kernel_height(), kernel.kernel_width());
    if kh > h || kw > w || kh == 0 || kw == 0 {
        return Err(GoldenError::KernelTooLarge { kh, kw, h, w });
    }
    Ok(((h - kh) / stride + 1, (w - kw) / stride + 1))
}

pub(crate) fn check_channel_range(range: &Range<usize>, channels: usize) -> Result<()> {
    if range.start > range.end || range.end > channels {
        return Err(GoldenError::InvalidSplit {
            split: if range.end > channels {
                range.end
            } else {
                range.start
            },
            channels,
        });
    }
    Ok(())
}
