use std::fmt;

use thiserror::Error;

use crate::error::{GoldenError, Result};

/// Letter case used when rendering hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexCase {
    Upper,
    Lower,
}

/// Layout of a single hex record: how many low bits are kept and how many
/// digits are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexFormat {
    bit_width: u32,
    digits: usize,
    case: HexCase,
}

impl HexFormat {
    /// One int8 value per record, upper-case (`pixel_data.txt` style files).
    pub const BYTE_UPPER: HexFormat = HexFormat::raw(8, 2, HexCase::Upper);
    /// One int8 value per record, lower-case (CIM group files).
    pub const BYTE_LOWER: HexFormat = HexFormat::raw(8, 2, HexCase::Lower);
    /// 22-bit accumulator in 6 upper-case digits.
    pub const ACC22_UPPER: HexFormat = HexFormat::raw(22, 6, HexCase::Upper);
    /// 26-bit accumulator in 7 upper-case digits.
    pub const ACC26_UPPER: HexFormat = HexFormat::raw(26, 7, HexCase::Upper);
    /// 26-bit accumulator zero-padded to 8 lower-case digits (CIM group results).
    pub const ACC26_WIDE_LOWER: HexFormat = HexFormat::raw(26, 8, HexCase::Lower);

    const fn raw(bit_width: u32, digits: usize, case: HexCase) -> Self {
        HexFormat {
            bit_width,
            digits,
            case,
        }
    }

    /// Format keeping `bit_width` bits, written with the minimal `ceil(bit_width / 4)` digits.
    pub fn new(bit_width: u32, case: HexCase) -> Result<Self> {
        if bit_width == 0 || bit_width > 64 {
            return Err(GoldenError::InvalidBitWidth { bit_width });
        }
        Ok(HexFormat::raw(bit_width, min_digits(bit_width), case))
    }

    /// Zero-pads records to `digits` digits instead of the minimal count.
    pub fn with_digits(self, digits: usize) -> Result<Self> {
        if digits < min_digits(self.bit_width) {
            return Err(GoldenError::DigitsTooNarrow {
                bit_width: self.bit_width,
                digits,
            });
        }
        Ok(HexFormat { digits, ..self })
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn case(&self) -> HexCase {
        self.case
    }

    /// Renders `value` as one record of this format.
    pub fn encode(&self, value: i64) -> String {
        let mut out = String::with_capacity(self.digits);
        self.encode_into(value, &mut out);
        out
    }

    /// Appends the record for `value` to `out` without a separator.
    ///
    /// Wide words (a kernel position across all kernels) are built by
    /// appending records in index order, so index 0 ends up most significant.
    pub fn encode_into(&self, value: i64, out: &mut String) {
        use std::fmt::Write;

        let bits = truncate(value, self.bit_width);
        // Writing into a String cannot fail.
        let _ = match self.case {
            HexCase::Upper => write!(out, "{:0width$X}", bits, width = self.digits),
            HexCase::Lower => write!(out, "{:0width$x}", bits, width = self.digits),
        };
    }
}

impl fmt::Display for HexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let case = match self.case {
            HexCase::Upper => "upper",
            HexCase::Lower => "lower",
        };
        write!(f, "{}-bit/{} digits ({})", self.bit_width, self.digits, case)
    }
}

fn min_digits(bit_width: u32) -> usize {
    ((bit_width + 3) / 4) as usize
}

fn low_mask(bit_width: u32) -> u64 {
    if bit_width >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_width) - 1
    }
}

/// Two's-complement truncation of `value` to its low `bit_width` bits.
///
/// Negative inputs get bit `bit_width - 1` OR-ed in after masking. For values
/// that fit the width this is a no-op; for negative values whose magnitude
/// exceeds the width it forces the sign bit on, which pure masking would not.
/// Hardware reference vectors depend on this exact behaviour.
///
/// `bit_width` must be within `1..=64`; callers go through [`HexFormat`] or
/// [`encode`], which validate it.
pub fn truncate(value: i64, bit_width: u32) -> u64 {
    debug_assert!((1..=64).contains(&bit_width));
    let mut bits = (value as u64) & low_mask(bit_width);
    if value < 0 {
        bits |= 1u64 << (bit_width - 1);
    }
    bits
}

/// Encodes `value` as `ceil(bit_width / 4)` upper-case hex digits.
pub fn encode(value: i64, bit_width: u32) -> Result<String> {
    Ok(HexFormat::new(bit_width, HexCase::Upper)?.encode(value))
}

/// Reason a record failed to decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty record")]
    Empty,

    #[error("non-hex character {ch:?} at column {column}")]
    InvalidDigit { ch: char, column: usize },

    #[error("record does not fit in 64 bits")]
    Overflow,
}

/// Parses a record as an unsigned hex integer.
///
/// No sign reconstruction takes place: records are compared by their raw
/// bit pattern. Only `[0-9a-fA-F]` is accepted; prefixes, signs and inner
/// whitespace are rejected.
pub fn decode(text: &str) -> std::result::Result<u64, DecodeError> {
    if text.is_empty() {
        return Err(DecodeError::Empty);
    }
    if let Some((column, ch)) = text.char_indices().find(|(_, ch)| !ch.is_ascii_hexdigit()) {
        return Err(DecodeError::InvalidDigit {
            ch,
            column: column + 1,
        });
    }
    let significant = text.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(significant, 16).map_err(|_| DecodeError::Overflow)
}

/// Reinterprets the low `bit_width` bits of `raw` as a two's-complement value.
pub fn sign_extend(raw: u64, bit_width: u32) -> i64 {
    debug_assert!((1..=64).contains(&bit_width));
    let shift = 64 - bit_width;
    ((raw << shift) as i64) >> shift
}
