//! Seeded random test-vector source.
//!
//! The random generator is owned by the caller and passed in explicitly, so
//! every generated vector set is reproducible from its seed alone. Masking is
//! left to the caller through the `retain` methods of each tensor type.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::tensor::{KernelMatrix, KernelTensor, PixelTensor, PixelVector};

/// Caller-owned source of random int8 tensors.
pub struct TensorSource {
    rng: StdRng,
}

impl TensorSource {
    pub fn new(rng: StdRng) -> Self {
        TensorSource { rng }
    }

    pub fn from_seed(seed: u64) -> Self {
        TensorSource::new(StdRng::seed_from_u64(seed))
    }

    fn fill(&mut self, len: usize) -> Vec<i8> {
        (0..len).map(|_| self.rng.gen_range(i8::MIN..=i8::MAX)).collect()
    }

    pub fn pixel_vector(&mut self, channels: usize) -> PixelVector {
        PixelVector::from_vec(self.fill(channels))
    }

    pub fn pixel_tensor(&mut self, h: usize, w: usize, c: usize) -> PixelTensor {
        let mut t = PixelTensor::new(h, w, c);
        for (h_idx, w_idx, c_idx) in hwc(h, w, c) {
            t.set(h_idx, w_idx, c_idx, self.rng.gen_range(i8::MIN..=i8::MAX));
        }
        t
    }

    pub fn kernel_matrix(&mut self, kernels: usize, channels: usize) -> KernelMatrix {
        let mut m = KernelMatrix::new(kernels, channels);
        for k in 0..kernels {
            for c in 0..channels {
                m.set(k, c, self.rng.gen_range(i8::MIN..=i8::MAX));
            }
        }
        m
    }

    pub fn kernel_tensor(&mut self, kh: usize, kw: usize, kc: usize, kn: usize) -> KernelTensor {
        let mut t = KernelTensor::new(kh, kw, kc, kn);
        for y in 0..kh {
            for x in 0..kw {
                for c in 0..kc {
                    for k in 0..kn {
                        t.set(y, x, c, k, self.rng.gen_range(i8::MIN..=i8::MAX));
                    }
                }
            }
        }
        t
    }

    /// Random values for `channels.len()` channels, zero everywhere else.
    ///
    /// Only the active channels consume the random stream.
    pub fn sparse_pixel_vector(&mut self, total: usize, channels: Range<usize>) -> PixelVector {
        let mut v = PixelVector::new(total);
        for (c, val) in channels.clone().zip(self.fill(channels.len())) {
            v.set(c, val);
        }
        v
    }

    /// Kernel matrix with random weights on `channels` only, zero elsewhere.
    pub fn sparse_kernel_matrix(
        &mut self,
        kernels: usize,
        total: usize,
        channels: Range<usize>,
    ) -> KernelMatrix {
        let mut m = KernelMatrix::new(kernels, total);
        for k in 0..kernels {
            for c in channels.clone() {
                m.set(k, c, self.rng.gen_range(i8::MIN..=i8::MAX));
            }
        }
        m
    }
}

fn hwc(h: usize, w: usize, c: usize) -> impl Iterator<Item = (usize, usize, usize)> {
    (0..h).flat_map(move |y| (0..w).flat_map(move |x| (0..c).map(move |z| (y, x, z))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_tensors() {
        let mut a = TensorSource::from_seed(42);
        let mut b = TensorSource::from_seed(42);
        assert_eq!(a.pixel_vector(64), b.pixel_vector(64));
        assert_eq!(a.kernel_matrix(8, 64), b.kernel_matrix(8, 64));
        assert_eq!(a.pixel_tensor(3, 2, 5), b.pixel_tensor(3, 2, 5));
    }

    #[test]
    fn different_seeds_differ() {
        let mut a = TensorSource::from_seed(42);
        let mut b = TensorSource::from_seed(86);
        assert_ne!(a.pixel_vector(64), b.pixel_vector(64));
    }

    #[test]
    fn sparse_vectors_are_zero_outside_range() {
        let mut src = TensorSource::from_seed(7);
        let v = src.sparse_pixel_vector(576, 64..128);
        assert!(v.as_slice()[..64].iter().all(|&x| x == 0));
        assert!(v.as_slice()[128..].iter().all(|&x| x == 0));
        assert!(v.as_slice()[64..128].iter().any(|&x| x != 0));

        let m = src.sparse_kernel_matrix(8, 576, 64..128);
        for k in 0..8 {
            assert!(m.kernel(k)[..64].iter().all(|&x| x == 0));
            assert!(m.kernel(k)[128..].iter().all(|&x| x == 0));
        }
    }
}
