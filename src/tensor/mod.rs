mod pixel;
mod kernel;
mod output;

pub use pixel::{PixelTensor, PixelVector};
pub use kernel::{KernelMatrix, KernelTensor};
pub use output::OutputTensor;

use crate::error::{GoldenError, Result};

pub(crate) fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(GoldenError::InvalidShape {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
