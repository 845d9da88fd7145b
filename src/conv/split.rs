use log::debug;

use super::{conv2d_channels, conv2d_direct};
use crate::error::{GoldenError, Result};
use crate::tensor::{KernelTensor, OutputTensor, PixelTensor};

/// A full reduction together with its two partial reductions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitResult {
    /// Reduction over every input channel.
    pub total: OutputTensor,
    /// Reduction over channels `0..split`.
    pub low: OutputTensor,
    /// Reduction over channels `split..C`.
    pub high: OutputTensor,
}

impl SplitResult {
    /// Checks `total == low + high` (32-bit wrapping) for every output.
    pub fn reconcile(&self) -> Result<()> {
        let pairs = self.low.values().iter().zip(self.high.values());
        for (index, (&total, (&low, &high))) in self.total.values().iter().zip(pairs).enumerate() {
            let partial_sum = low.wrapping_add(high);
            if total != partial_sum {
                return Err(GoldenError::Reconciliation {
                    index,
                    total,
                    partial_sum,
                });
            }
        }
        Ok(())
    }
}

/// Computes the convolution as one full reduction and as two independent
/// partial reductions split at channel `split`, and checks they reconcile.
pub fn conv2d_split(
    pixel: &PixelTensor,
    kernel: &KernelTensor,
    stride: usize,
    padding: usize,
    split: usize,
) -> Result<SplitResult> {
    let channels = pixel.channels();
    if split > channels {
        return Err(GoldenError::InvalidSplit { split, channels });
    }
    let total = conv2d_direct(pixel, kernel, stride, padding)?;
    let low = conv2d_channels(pixel, kernel, stride, padding, 0..split)?;
    let high = conv2d_channels(pixel, kernel, stride, padding, split..channels)?;
    let result = SplitResult { total, low, high };
    result.reconcile()?;
    debug!("split at channel {} of {} reconciles", split, channels);
    Ok(result)
}
