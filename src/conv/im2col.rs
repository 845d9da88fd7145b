//! Im2col + int8 dot-product convolution.
//!
//! Unfolds every input patch into a contiguous row, transposes the kernel bank
//! to kernel-major rows, then computes each output as one dot product.

use log::debug;

use super::{output_shape, simd};
use crate::error::Result;
use crate::tensor::{KernelTensor, OutputTensor, PixelTensor};

/// Unfold input patches into a column matrix (transposed: cols x rows).
///
/// Output layout: `col_t[col_idx * k + row]` where col_idx = oh*out_w+ow,
/// k = KH*KW*C and row = (kh*KW + kw)*C + c, matching the (KH, KW, KC) order.
fn im2col_i8(
    padded: &PixelTensor,
    kernel_h: usize,
    kernel_w: usize,
    stride: usize,
    out_h: usize,
    out_w: usize,
    col_t: &mut [i8],
) {
    let channels = padded.channels();
    let k = kernel_h * kernel_w * channels;
    for oh in 0..out_h {
        for ow in 0..out_w {
            let dst_off = (oh * out_w + ow) * k;
            for kh in 0..kernel_h {
                for kw in 0..kernel_w {
                    let row = (kh * kernel_w + kw) * channels;
                    let src = padded.pixel(oh * stride + kh, ow * stride + kw);
                    col_t[dst_off + row..dst_off + row + channels].copy_from_slice(src);
                }
            }
        }
    }
}

/// Rearrange (KH, KW, KC, KN) weights into KN rows of length KH*KW*KC.
fn kernel_rows(kernel: &KernelTensor) -> Vec<i8> {
    let k = kernel.kernel_height() * kernel.kernel_width() * kernel.channels();
    let mut rows = vec![0i8; kernel.kernels() * k];
    for kh in 0..kernel.kernel_height() {
        for kw in 0..kernel.kernel_width() {
            for c in 0..kernel.channels() {
                let row = (kh * kernel.kernel_width() + kw) * kernel.channels() + c;
                for (n, &wt) in kernel.position(kh, kw, c).iter().enumerate() {
                    rows[n * k + row] = wt;
                }
            }
        }
    }
    rows
}

/// INT8 Im2col convolution entry point.
///
/// Produces the same [`OutputTensor`] as [`super::conv2d_direct`].
pub fn conv2d_im2col(
    pixel: &PixelTensor,
    kernel: &KernelTensor,
    stride: usize,
    padding: usize,
) -> Result<OutputTensor> {
    let (out_h, out_w) = output_shape(pixel, kernel, stride, padding)?;
    let k = kernel.kernel_height() * kernel.kernel_width() * kernel.channels();
    let n_cols = out_h * out_w;
    debug!("im2col conv: {} columns of {} taps, {} kernels", n_cols, k, kernel.kernels());

    let padded = pixel.padded(padding);
    let mut col_t = vec![0i8; n_cols * k];
    im2col_i8(
        &padded,
        kernel.kernel_height(),
        kernel.kernel_width(),
        stride,
        out_h,
        out_w,
        &mut col_t,
    );
    let weights = kernel_rows(kernel);

    let mut output = OutputTensor::new(out_h, out_w, kernel.kernels());
    for col in 0..n_cols {
        for n in 0..kernel.kernels() {
            let acc = simd::dot_i8(&weights, n * k, &col_t, col * k, k);
            output.set(col / out_w, col % out_w, n, acc);
        }
    }
    Ok(output)
}
