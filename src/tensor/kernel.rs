use std::fmt;
use std::ops::Range;

use super::check_len;
use crate::error::Result;

/// A bank of `kn` int8 kernels of shape (KH, KW, KC).
///
/// Layout is (KH, KW, KC, KN) with the kernel index innermost, so the weights
/// of every kernel at one (kh, kw, c) position are contiguous. That is the
/// grouping the weight file uses: one line per position, across all kernels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelTensor {
    kh: usize,
    kw: usize,
    kc: usize,
    kn: usize,
    data: Vec<i8>,
}

impl KernelTensor {
    pub fn new(kh: usize, kw: usize, kc: usize, kn: usize) -> Self {
        KernelTensor {
            kh,
            kw,
            kc,
            kn,
            data: vec![0i8; kh * kw * kc * kn],
        }
    }

    /// Wraps a (KH, KW, KC, KN) buffer, checking its length against the shape.
    pub fn from_vec(kh: usize, kw: usize, kc: usize, kn: usize, data: Vec<i8>) -> Result<Self> {
        check_len("kernel tensor", kh * kw * kc * kn, data.len())?;
        Ok(KernelTensor {
            kh,
            kw,
            kc,
            kn,
            data,
        })
    }

    pub fn kernel_height(&self) -> usize {
        self.kh
    }

    pub fn kernel_width(&self) -> usize {
        self.kw
    }

    pub fn channels(&self) -> usize {
        self.kc
    }

    pub fn kernels(&self) -> usize {
        self.kn
    }

    fn index(&self, kh: usize, kw: usize, c: usize, k: usize) -> usize {
        ((kh * self.kw + kw) * self.kc + c) * self.kn + k
    }

    pub fn get(&self, kh: usize, kw: usize, c: usize, k: usize) -> i8 {
        self.data[self.index(kh, kw, c, k)]
    }

    pub fn set(&mut self, kh: usize, kw: usize, c: usize, k: usize, val: i8) {
        let idx = self.index(kh, kw, c, k);
        self.data[idx] = val;
    }

    /// Weights of all kernels at position (kh, kw, c), in kernel order.
    pub fn position(&self, kh: usize, kw: usize, c: usize) -> &[i8] {
        let start = self.index(kh, kw, c, 0);
        &self.data[start..start + self.kn]
    }

    /// Zeroes every weight for which `keep(kh, kw, c, k)` is false.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize, usize, usize, usize) -> bool,
    {
        for kh in 0..self.kh {
            for kw in 0..self.kw {
                for c in 0..self.kc {
                    for k in 0..self.kn {
                        if !keep(kh, kw, c, k) {
                            self.set(kh, kw, c, k, 0);
                        }
                    }
                }
            }
        }
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }
}

impl fmt::Display for KernelTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}x{} (i8)", self.kh, self.kw, self.kc, self.kn)
    }
}

/// `kn` kernels of `c` weights each, for the single-pixel configurations.
///
/// Layout is (KN, C): each kernel's weights are contiguous.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelMatrix {
    kn: usize,
    c: usize,
    data: Vec<i8>,
}

impl KernelMatrix {
    pub fn new(kn: usize, c: usize) -> Self {
        KernelMatrix {
            kn,
            c,
            data: vec![0i8; kn * c],
        }
    }

    pub fn from_vec(kn: usize, c: usize, data: Vec<i8>) -> Result<Self> {
        check_len("kernel matrix", kn * c, data.len())?;
        Ok(KernelMatrix { kn, c, data })
    }

    pub fn kernels(&self) -> usize {
        self.kn
    }

    pub fn channels(&self) -> usize {
        self.c
    }

    pub fn get(&self, k: usize, c: usize) -> i8 {
        self.data[k * self.c + c]
    }

    pub fn set(&mut self, k: usize, c: usize, val: i8) {
        self.data[k * self.c + c] = val;
    }

    /// All weights of kernel `k`.
    pub fn kernel(&self, k: usize) -> &[i8] {
        &self.data[k * self.c..(k + 1) * self.c]
    }

    /// Zeroes every weight for which `keep(k, c)` is false.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize, usize) -> bool,
    {
        for k in 0..self.kn {
            for c in 0..self.c {
                if !keep(k, c) {
                    self.set(k, c, 0);
                }
            }
        }
    }

    /// Zeroes every channel outside `active`, for all kernels.
    pub fn retain_channels(&mut self, active: Range<usize>) {
        self.retain(|_, c| active.contains(&c));
    }

    /// Copy restricted to the channels in `range`.
    pub fn slice_channels(&self, range: Range<usize>) -> KernelMatrix {
        let width = range.len();
        let mut data = Vec::with_capacity(self.kn * width);
        for k in 0..self.kn {
            data.extend_from_slice(&self.kernel(k)[range.clone()]);
        }
        KernelMatrix {
            kn: self.kn,
            c: width,
            data,
        }
    }

    /// The same weights as a 1x1 kernel bank.
    pub fn to_tensor(&self) -> KernelTensor {
        let mut t = KernelTensor::new(1, 1, self.c, self.kn);
        for k in 0..self.kn {
            for c in 0..self.c {
                t.set(0, 0, c, k, self.get(k, c));
            }
        }
        t
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }
}

impl fmt::Display for KernelMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} (i8)", self.kn, self.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_groups_kernels() {
        let mut t = KernelTensor::new(2, 2, 3, 4);
        for k in 0..4 {
            t.set(1, 0, 2, k, k as i8 + 10);
        }
        assert_eq!(t.position(1, 0, 2), &[10, 11, 12, 13]);
        assert_eq!(t.position(0, 0, 0), &[0, 0, 0, 0]);
    }

    #[test]
    fn matrix_to_tensor_transposes() {
        let m = KernelMatrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let t = m.to_tensor();
        assert_eq!(t.to_string(), "1x1x3x2 (i8)");
        assert_eq!(t.position(0, 0, 0), &[1, 4]);
        assert_eq!(t.position(0, 0, 2), &[3, 6]);
    }

    #[test]
    fn slice_channels_keeps_every_kernel() {
        let m = KernelMatrix::from_vec(2, 4, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let s = m.slice_channels(1..3);
        assert_eq!(s.channels(), 2);
        assert_eq!(s.as_slice(), &[2, 3, 6, 7]);
    }

    #[test]
    fn retain_by_position_and_kernel() {
        let mut t = KernelTensor::from_vec(1, 1, 2, 2, vec![1, 2, 3, 4]).unwrap();
        t.retain(|_, _, c, k| c == 0 && k == 0);
        assert_eq!(t.as_slice(), &[1, 0, 0, 0]);
    }
}
