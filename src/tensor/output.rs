use std::fmt;

use super::check_len;
use crate::error::Result;

/// Convolution result: one 32-bit accumulator per (oh, ow, kernel).
///
/// Layout is (OH, OW, KN), which is also the order results are serialized in.
/// Single-pixel results use OH = OW = 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputTensor {
    oh: usize,
    ow: usize,
    kn: usize,
    data: Vec<i32>,
}

impl OutputTensor {
    pub fn new(oh: usize, ow: usize, kn: usize) -> Self {
        OutputTensor {
            oh,
            ow,
            kn,
            data: vec![0i32; oh * ow * kn],
        }
    }

    pub fn from_vec(oh: usize, ow: usize, kn: usize, data: Vec<i32>) -> Result<Self> {
        check_len("output tensor", oh * ow * kn, data.len())?;
        Ok(OutputTensor { oh, ow, kn, data })
    }

    /// A (KN,) result for a single pixel.
    pub fn vector(values: Vec<i32>) -> Self {
        OutputTensor {
            oh: 1,
            ow: 1,
            kn: values.len(),
            data: values,
        }
    }

    pub fn height(&self) -> usize {
        self.oh
    }

    pub fn width(&self) -> usize {
        self.ow
    }

    pub fn kernels(&self) -> usize {
        self.kn
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, oh: usize, ow: usize, k: usize) -> i32 {
        self.data[(oh * self.ow + ow) * self.kn + k]
    }

    pub(crate) fn set(&mut self, oh: usize, ow: usize, k: usize, val: i32) {
        let idx = (oh * self.ow + ow) * self.kn + k;
        self.data[idx] = val;
    }

    pub fn values(&self) -> &[i32] {
        &self.data
    }
}

impl fmt::Display for OutputTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{} (i32)", self.oh, self.ow, self.kn)
    }
}
