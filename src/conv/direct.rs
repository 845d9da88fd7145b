use std::ops::Range;

use log::debug;

use super::{check_channel_range, output_shape};
use crate::error::Result;
use crate::tensor::{KernelTensor, OutputTensor, PixelTensor};

/// Direct int8 convolution: for every output position and kernel, the dot
/// product of the input patch with the kernel over all (kh, kw, c).
///
/// The input is zero-padded by `padding` on each spatial side. Both factors
/// are widened before multiplying and the sum is kept in 64 bits, then
/// narrowed to the 32-bit accumulator with two's-complement wrap.
pub fn conv2d_direct(
    pixel: &PixelTensor,
    kernel: &KernelTensor,
    stride: usize,
    padding: usize,
) -> Result<OutputTensor> {
    conv2d_channels(pixel, kernel, stride, padding, 0..pixel.channels())
}

/// Direct convolution restricted to the input channels in `channels`.
///
/// Reductions over disjoint ranges that cover every channel add up
/// (with 32-bit wrap) to [`conv2d_direct`].
pub fn conv2d_channels(
    pixel: &PixelTensor,
    kernel: &KernelTensor,
    stride: usize,
    padding: usize,
    channels: Range<usize>,
) -> Result<OutputTensor> {
    let (out_h, out_w) = output_shape(pixel, kernel, stride, padding)?;
    check_channel_range(&channels, pixel.channels())?;
    debug!(
        "direct conv: input {} kernel {} stride {} padding {} channels {:?} -> {}x{}",
        pixel, kernel, stride, padding, channels, out_h, out_w
    );

    let padded = pixel.padded(padding);
    let mut output = OutputTensor::new(out_h, out_w, kernel.kernels());

    for oh in 0..out_h {
        for ow in 0..out_w {
            let ih0 = oh * stride;
            let iw0 = ow * stride;
            for k in 0..kernel.kernels() {
                let mut sum: i64 = 0;
                for kh in 0..kernel.kernel_height() {
                    for kw in 0..kernel.kernel_width() {
                        for c in channels.clone() {
                            let inp = padded.get(ih0 + kh, iw0 + kw, c) as i64;
                            let wt = kernel.get(kh, kw, c, k) as i64;
                            sum += inp * wt;
                        }
                    }
                }
                output.set(oh, ow, k, sum as i32);
            }
        }
    }
    Ok(output)
}
