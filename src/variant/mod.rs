//! The golden-vector configurations used to verify the CIM datapath.
//!
//! Each [`Variant`] fixes tensor shapes, masking, result width and file
//! names. [`run`] generates its tensors from a seed, computes the golden
//! results and writes every file into the configured directory.

mod config;

pub use config::{GoldenConfig, UnknownVariant, Variant, CIM_GROUP_SEED, DEFAULT_SEED};

use std::path::{Path, PathBuf};

use log::info;

use crate::codec::{HexCase, HexFormat};
use crate::conv::{conv2d_direct, dot_pixel, dot_pixel_split};
use crate::error::Result;
use crate::generate::TensorSource;
use crate::serialize::{
    save_kernel_matrix, save_kernels, save_pixel_vector, save_pixels, save_results,
};
use crate::tensor::OutputTensor;

/// Channels of the narrow single-pixel configuration.
pub const NARROW_CHANNELS: usize = 64;
/// Channels of the single-pixel configurations that feed the wide reduction.
pub const WIDE_CHANNELS: usize = 576;
/// Split point between the narrow and the wide partial sums.
pub const SPLIT_CHANNELS: usize = 64;
/// Kernels evaluated by the single-pixel configurations.
pub const PIXEL_KERNELS: usize = 8;

fn target<'a>(files: &'a mut Vec<PathBuf>, dir: &Path, name: &str) -> &'a Path {
    files.push(dir.join(name));
    &files[files.len() - 1]
}

/// What a run produced.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub variant: Variant,
    /// Every file written, in write order.
    pub files: Vec<PathBuf>,
    /// The full-reduction golden results.
    pub results: OutputTensor,
}

/// Generates the tensors of `config.variant`, computes the golden results and
/// writes all files. Existing files are overwritten.
pub fn run(config: &GoldenConfig) -> Result<GenerationSummary> {
    let mut source = TensorSource::from_seed(config.seed);
    let dir = config.out_dir.as_path();
    let mut files = Vec::new();

    info!("generating {} vectors (seed {})", config.variant, config.seed);

    let results = match config.variant {
        Variant::Single64 => {
            let pixel = source.pixel_vector(NARROW_CHANNELS);
            let kernels = source.kernel_matrix(PIXEL_KERNELS, NARROW_CHANNELS);
            let results = dot_pixel(&pixel, &kernels)?;

            save_pixel_vector(target(&mut files, dir, "pixel_data.txt"), &pixel, HexCase::Upper)?;
            save_kernel_matrix(
                target(&mut files, dir, "kernel_weights.txt"),
                &kernels,
                HexCase::Upper,
            )?;
            save_results(
                target(&mut files, dir, "conv_results.txt"),
                &results,
                HexFormat::ACC22_UPPER,
            )?;
            results
        }
        Variant::Window512 => {
            let active = NARROW_CHANNELS..2 * NARROW_CHANNELS;
            let pixel = source.sparse_pixel_vector(WIDE_CHANNELS, active.clone());
            let kernels = source.sparse_kernel_matrix(PIXEL_KERNELS, WIDE_CHANNELS, active);
            let results = dot_pixel(&pixel, &kernels)?;

            save_pixel_vector(
                target(&mut files, dir, "pixel_data_512.txt"),
                &pixel,
                HexCase::Upper,
            )?;
            save_kernel_matrix(
                target(&mut files, dir, "kernel_weights_512.txt"),
                &kernels,
                HexCase::Upper,
            )?;
            save_results(
                target(&mut files, dir, "conv_results_512.txt"),
                &results,
                HexFormat::ACC26_UPPER,
            )?;
            results
        }
        Variant::Split576 => {
            let pixel = source.pixel_vector(WIDE_CHANNELS);
            let kernels = source.kernel_matrix(PIXEL_KERNELS, WIDE_CHANNELS);
            let split = dot_pixel_split(&pixel, &kernels, SPLIT_CHANNELS)?;

            save_pixel_vector(
                target(&mut files, dir, "pixel_data_576.txt"),
                &pixel,
                HexCase::Upper,
            )?;
            save_kernel_matrix(
                target(&mut files, dir, "kernel_weights_576.txt"),
                &kernels,
                HexCase::Upper,
            )?;
            save_results(
                target(&mut files, dir, "conv_results_total.txt"),
                &split.total,
                HexFormat::ACC26_UPPER,
            )?;
            save_results(
                target(&mut files, dir, "conv_results_64.txt"),
                &split.low,
                HexFormat::ACC26_UPPER,
            )?;
            save_results(
                target(&mut files, dir, "conv_results_512.txt"),
                &split.high,
                HexFormat::ACC26_UPPER,
            )?;
            split.total
        }
        Variant::CimGroup => {
            let mut pixel = source.pixel_tensor(7, 7, 64);
            pixel.retain(|_, _, c| c == 0);
            let mut kernel = source.kernel_tensor(1, 1, 64, 64);
            kernel.retain(|_, _, c, k| c == 0 && k == 0);
            let results = conv2d_direct(&pixel, &kernel, 1, 0)?;

            save_pixels(
                target(&mut files, dir, "pixel_data_CIM_Group.txt"),
                &pixel,
                HexCase::Lower,
            )?;
            save_kernels(
                target(&mut files, dir, "kernel_weights_CIM_Group.txt"),
                &kernel,
                HexCase::Lower,
            )?;
            save_results(
                target(&mut files, dir, "output_CIM_Group.txt"),
                &results,
                HexFormat::ACC26_WIDE_LOWER,
            )?;
            results
        }
    };

    info!("{}: {} files written, {} results", config.variant, files.len(), results);
    Ok(GenerationSummary {
        variant: config.variant,
        files,
        results,
    })
}
