//! Fixed-width two's-complement hex codec.
//!
//! Every vector file stores one record per line as a fixed number of hex
//! digits. The width is a property of the file kind, not of the record.

mod hex;

pub use hex::{decode, encode, sign_extend, truncate, DecodeError, HexCase, HexFormat};
