use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::info;

use crate::codec::{HexCase, HexFormat};
use crate::error::{GoldenError, Result};
use crate::tensor::{KernelMatrix, KernelTensor, OutputTensor, PixelTensor, PixelVector};

fn byte_format(case: HexCase) -> HexFormat {
    match case {
        HexCase::Upper => HexFormat::BYTE_UPPER,
        HexCase::Lower => HexFormat::BYTE_LOWER,
    }
}

/// Writes one line holding `values` concatenated, index 0 first (most significant).
fn write_word<W: Write>(
    out: &mut W,
    values: &[i8],
    format: HexFormat,
    line: &mut String,
) -> io::Result<()> {
    line.clear();
    for &v in values {
        format.encode_into(v as i64, line);
    }
    line.push('\n');
    out.write_all(line.as_bytes())
}

/// One line per pixel in row-major (h, w) order, each line the pixel's
/// channel bytes concatenated in channel order.
pub fn write_pixels<W: Write>(
    out: &mut W,
    pixel: &PixelTensor,
    case: HexCase,
) -> io::Result<usize> {
    let format = byte_format(case);
    let mut line = String::with_capacity(pixel.channels() * 2 + 1);
    for h in 0..pixel.height() {
        for w in 0..pixel.width() {
            write_word(out, pixel.pixel(h, w), format, &mut line)?;
        }
    }
    Ok(pixel.height() * pixel.width())
}

/// One byte per line, in channel order.
pub fn write_pixel_vector<W: Write>(
    out: &mut W,
    pixel: &PixelVector,
    case: HexCase,
) -> io::Result<usize> {
    let format = byte_format(case);
    let mut line = String::with_capacity(3);
    for c in 0..pixel.channels() {
        write_word(out, &[pixel.get(c)], format, &mut line)?;
    }
    Ok(pixel.channels())
}

/// One line per kernel position, iterating kw, then kh, then c (c fastest).
/// Each line holds that position's weight from every kernel, kernel 0 first.
pub fn write_kernels<W: Write>(
    out: &mut W,
    kernel: &KernelTensor,
    case: HexCase,
) -> io::Result<usize> {
    let format = byte_format(case);
    let mut line = String::with_capacity(kernel.kernels() * 2 + 1);
    for kw in 0..kernel.kernel_width() {
        for kh in 0..kernel.kernel_height() {
            for c in 0..kernel.channels() {
                write_word(out, kernel.position(kh, kw, c), format, &mut line)?;
            }
        }
    }
    Ok(kernel.kernel_width() * kernel.kernel_height() * kernel.channels())
}

/// One line per channel, each holding that channel's weight from every
/// kernel, kernel 0 first.
pub fn write_kernel_matrix<W: Write>(
    out: &mut W,
    kernels: &KernelMatrix,
    case: HexCase,
) -> io::Result<usize> {
    let format = byte_format(case);
    let mut line = String::with_capacity(kernels.kernels() * 2 + 1);
    let mut column = vec![0i8; kernels.kernels()];
    for c in 0..kernels.channels() {
        for (k, slot) in column.iter_mut().enumerate() {
            *slot = kernels.get(k, c);
        }
        write_word(out, &column, format, &mut line)?;
    }
    Ok(kernels.channels())
}

/// One truncated accumulator record per line, in (oh, ow, k) order.
pub fn write_results<W: Write>(
    out: &mut W,
    results: &OutputTensor,
    format: HexFormat,
) -> io::Result<usize> {
    let mut line = String::with_capacity(format.digits() + 1);
    for &v in results.values() {
        line.clear();
        format.encode_into(v as i64, &mut line);
        line.push('\n');
        out.write_all(line.as_bytes())?;
    }
    Ok(results.len())
}

fn save_with<F>(path: &Path, what: &str, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<usize>,
{
    let file = File::create(path).map_err(|e| GoldenError::io(path, e))?;
    let mut out = BufWriter::new(file);
    let lines = write(&mut out).map_err(|e| GoldenError::io(path, e))?;
    out.flush().map_err(|e| GoldenError::io(path, e))?;
    info!("wrote {} ({} lines) to {}", what, lines, path.display());
    Ok(())
}

/// Writes `pixel` to `path` with [`write_pixels`], replacing any existing file.
pub fn save_pixels(path: impl AsRef<Path>, pixel: &PixelTensor, case: HexCase) -> Result<()> {
    save_with(path.as_ref(), "pixel data", |out| write_pixels(out, pixel, case))
}

/// Writes `pixel` to `path` with [`write_pixel_vector`], replacing any existing file.
pub fn save_pixel_vector(path: impl AsRef<Path>, pixel: &PixelVector, case: HexCase) -> Result<()> {
    save_with(path.as_ref(), "pixel data", |out| write_pixel_vector(out, pixel, case))
}

/// Writes `kernel` to `path` with [`write_kernels`], replacing any existing file.
pub fn save_kernels(path: impl AsRef<Path>, kernel: &KernelTensor, case: HexCase) -> Result<()> {
    save_with(path.as_ref(), "kernel weights", |out| write_kernels(out, kernel, case))
}

/// Writes `kernels` to `path` with [`write_kernel_matrix`], replacing any existing file.
pub fn save_kernel_matrix(
    path: impl AsRef<Path>,
    kernels: &KernelMatrix,
    case: HexCase,
) -> Result<()> {
    save_with(path.as_ref(), "kernel weights", |out| {
        write_kernel_matrix(out, kernels, case)
    })
}

/// Writes `results` to `path` with [`write_results`], replacing any existing file.
pub fn save_results(
    path: impl AsRef<Path>,
    results: &OutputTensor,
    format: HexFormat,
) -> Result<()> {
    save_with(path.as_ref(), "convolution results", |out| {
        write_results(out, results, format)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<usize>,
    {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn pixel_lines_concatenate_channels() {
        let pixel = PixelTensor::from_vec(1, 2, 3, vec![1, -1, 16, -128, 127, 0]).unwrap();
        let text = render(|out| write_pixels(out, &pixel, HexCase::Lower));
        assert_eq!(text, "01ff10\n807f00\n");
    }

    #[test]
    fn pixel_vector_is_one_byte_per_line() {
        let pixel = PixelVector::from_vec(vec![-83, 10]);
        let text = render(|out| write_pixel_vector(out, &pixel, HexCase::Upper));
        assert_eq!(text, "AD\n0A\n");
    }

    #[test]
    fn kernel_lines_group_positions_across_kernels() {
        // 2x2 kernels, 1 channel, 2 kernels; value encodes (kh, kw, k).
        let mut kernel = KernelTensor::new(2, 2, 1, 2);
        for kh in 0..2 {
            for kw in 0..2 {
                for k in 0..2 {
                    kernel.set(kh, kw, 0, k, (kh * 16 + kw * 4 + k) as i8);
                }
            }
        }
        let text = render(|out| write_kernels(out, &kernel, HexCase::Upper));
        // kw outermost, then kh.
        assert_eq!(text, "0001\n1011\n0405\n1415\n");
    }

    #[test]
    fn kernel_matrix_lines_are_channels() {
        let kernels = KernelMatrix::from_vec(3, 2, vec![1, 2, 3, 4, -1, -2]).unwrap();
        let text = render(|out| write_kernel_matrix(out, &kernels, HexCase::Upper));
        assert_eq!(text, "0103FF\n0204FE\n");
    }

    #[test]
    fn results_use_accumulator_format() {
        let results = OutputTensor::vector(vec![-1, 5, -(1 << 22)]);
        let text = render(|out| write_results(out, &results, HexFormat::ACC22_UPPER));
        assert_eq!(text, "3FFFFF\n000005\n200000\n");
    }
}
