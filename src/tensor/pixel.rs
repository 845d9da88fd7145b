use std::fmt;
use std::ops::Range;

use super::check_len;
use crate::error::Result;

/// A 3D int8 feature map.
///
/// Layout is HWC: the channels of one pixel are contiguous, which is also
/// the order in which a pixel's bytes are concatenated on a serialized line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelTensor {
    h: usize,
    w: usize,
    c: usize,
    data: Vec<i8>,
}

impl PixelTensor {
    pub fn new(h: usize, w: usize, c: usize) -> Self {
        PixelTensor {
            h,
            w,
            c,
            data: vec![0i8; h * w * c],
        }
    }

    /// Wraps an HWC buffer, checking its length against the shape.
    pub fn from_vec(h: usize, w: usize, c: usize, data: Vec<i8>) -> Result<Self> {
        check_len("pixel tensor", h * w * c, data.len())?;
        Ok(PixelTensor { h, w, c, data })
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn channels(&self) -> usize {
        self.c
    }

    fn index(&self, h: usize, w: usize, c: usize) -> usize {
        (h * self.w + w) * self.c + c
    }

    pub fn get(&self, h: usize, w: usize, c: usize) -> i8 {
        self.data[self.index(h, w, c)]
    }

    pub fn set(&mut self, h: usize, w: usize, c: usize, val: i8) {
        let idx = self.index(h, w, c);
        self.data[idx] = val;
    }

    /// All channels of the pixel at (h, w).
    pub fn pixel(&self, h: usize, w: usize) -> &[i8] {
        let start = self.index(h, w, 0);
        &self.data[start..start + self.c]
    }

    pub fn fill(&mut self, val: i8) {
        self.data.fill(val);
    }

    /// Zeroes every element for which `keep(h, w, c)` is false.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize, usize, usize) -> bool,
    {
        for h in 0..self.h {
            for w in 0..self.w {
                for c in 0..self.c {
                    if !keep(h, w, c) {
                        self.set(h, w, c, 0);
                    }
                }
            }
        }
    }

    /// Copy surrounded by `pad` rows and columns of zeros on every side.
    pub fn padded(&self, pad: usize) -> PixelTensor {
        if pad == 0 {
            return self.clone();
        }
        let mut padded = PixelTensor::new(self.h + 2 * pad, self.w + 2 * pad, self.c);
        for h in 0..self.h {
            for w in 0..self.w {
                let start = padded.index(h + pad, w + pad, 0);
                padded.data[start..start + self.c].copy_from_slice(self.pixel(h, w));
            }
        }
        padded
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }
}

impl fmt::Display for PixelTensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{} (i8)", self.h, self.w, self.c)
    }
}

/// The channels of a single pixel, as used by the flattened single-pixel
/// configurations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelVector {
    data: Vec<i8>,
}

impl PixelVector {
    pub fn new(channels: usize) -> Self {
        PixelVector {
            data: vec![0i8; channels],
        }
    }

    pub fn from_vec(data: Vec<i8>) -> Self {
        PixelVector { data }
    }

    pub fn channels(&self) -> usize {
        self.data.len()
    }

    pub fn get(&self, c: usize) -> i8 {
        self.data[c]
    }

    pub fn set(&mut self, c: usize, val: i8) {
        self.data[c] = val;
    }

    /// Zeroes every channel for which `keep(c)` is false.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        for (c, v) in self.data.iter_mut().enumerate() {
            if !keep(c) {
                *v = 0;
            }
        }
    }

    /// Zeroes every channel outside `active`.
    pub fn retain_channels(&mut self, active: Range<usize>) {
        self.retain(|c| active.contains(&c));
    }

    /// Copy of the channels in `range`.
    pub fn slice(&self, range: Range<usize>) -> PixelVector {
        PixelVector::from_vec(self.data[range].to_vec())
    }

    /// The same values viewed as a 1x1 feature map.
    pub fn to_tensor(&self) -> PixelTensor {
        PixelTensor {
            h: 1,
            w: 1,
            c: self.data.len(),
            data: self.data.clone(),
        }
    }

    pub fn as_slice(&self) -> &[i8] {
        &self.data
    }
}

impl fmt::Display for PixelVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (i8)", self.data.len())
    }
}
