use std::ops::Range;

use super::check_channel_range;
use super::split::SplitResult;
use crate::error::{GoldenError, Result};
use crate::tensor::{KernelMatrix, OutputTensor, PixelVector};

fn check_channels(pixel: &PixelVector, kernels: &KernelMatrix) -> Result<()> {
    if kernels.channels() != pixel.channels() {
        return Err(GoldenError::ShapeMismatch {
            what: "kernel channels",
            expected: pixel.channels(),
            actual: kernels.channels(),
        });
    }
    Ok(())
}

/// Dot product of one pixel with every kernel: a (KN,) result.
///
/// Equivalent to a 1x1 convolution of the pixel viewed as a 1x1 feature map.
pub fn dot_pixel(pixel: &PixelVector, kernels: &KernelMatrix) -> Result<OutputTensor> {
    dot_pixel_channels(pixel, kernels, 0..pixel.channels())
}

/// [`dot_pixel`] restricted to the channels in `channels`.
pub fn dot_pixel_channels(
    pixel: &PixelVector,
    kernels: &KernelMatrix,
    channels: Range<usize>,
) -> Result<OutputTensor> {
    check_channels(pixel, kernels)?;
    check_channel_range(&channels, pixel.channels())?;

    let inp = &pixel.as_slice()[channels.clone()];
    let values = (0..kernels.kernels())
        .map(|k| {
            let wts = &kernels.kernel(k)[channels.clone()];
            let sum: i64 = inp
                .iter()
                .zip(wts)
                .map(|(&x, &w)| x as i64 * w as i64)
                .sum();
            sum as i32
        })
        .collect();
    Ok(OutputTensor::vector(values))
}

/// Single-pixel split reduction: the full dot products plus the partial
/// products over channels `0..split` and `split..C`, reconciled.
pub fn dot_pixel_split(
    pixel: &PixelVector,
    kernels: &KernelMatrix,
    split: usize,
) -> Result<SplitResult> {
    let channels = pixel.channels();
    if split > channels {
        return Err(GoldenError::InvalidSplit { split, channels });
    }
    let result = SplitResult {
        total: dot_pixel(pixel, kernels)?,
        low: dot_pixel_channels(pixel, kernels, 0..split)?,
        high: dot_pixel_channels(pixel, kernels, split..channels)?,
    };
    result.reconcile()?;
    Ok(result)
}
