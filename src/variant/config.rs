use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Seed of the single-pixel reference vector sets.
pub const DEFAULT_SEED: u64 = 42;
/// Seed of the CIM group reference vector set.
pub const CIM_GROUP_SEED: u64 = 86;

/// A named golden-vector configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// One 64-channel pixel against 8 kernels; 22-bit results.
    Single64,
    /// 576-channel pixel with only channels 64..128 populated; 26-bit results.
    Window512,
    /// 576-channel pixel reduced as 64 + 512 partial sums plus the total; 26-bit results.
    Split576,
    /// 7x7x64 feature map through a 1x1x64x64 kernel bank; lower-case files.
    /// Seeded with [`CIM_GROUP_SEED`] by default.
    CimGroup,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Single64,
        Variant::Window512,
        Variant::Split576,
        Variant::CimGroup,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variant::Single64 => "single64",
            Variant::Window512 => "window512",
            Variant::Split576 => "split576",
            Variant::CimGroup => "cim-group",
        }
    }

    /// Seed the published vectors of this variant were generated with.
    pub fn default_seed(&self) -> u64 {
        match self {
            Variant::CimGroup => CIM_GROUP_SEED,
            _ => DEFAULT_SEED,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug)]
#[error("unknown variant {0:?} (expected single64, window512, split576 or cim-group)")]
pub struct UnknownVariant(pub String);

impl FromStr for Variant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

/// Inputs of a generation run.
#[derive(Debug, Clone)]
pub struct GoldenConfig {
    pub variant: Variant,
    pub seed: u64,
    /// Directory receiving the vector files.
    pub out_dir: PathBuf,
}

impl GoldenConfig {
    pub fn new(variant: Variant) -> Self {
        GoldenConfig {
            variant,
            seed: variant.default_seed(),
            out_dir: PathBuf::from("."),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }
}
