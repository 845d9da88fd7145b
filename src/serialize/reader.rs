use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::debug;

use super::RecordLines;
use crate::codec::{decode, sign_extend, HexFormat};
use crate::error::{GoldenError, Result};
use crate::tensor::{KernelMatrix, KernelTensor, OutputTensor, PixelTensor, PixelVector};

/// Reads exactly `lines` lines of `per_line` records each and returns the
/// raw record values in file order.
fn read_records<R: BufRead>(
    reader: R,
    source: &str,
    lines: usize,
    per_line: usize,
    format: HexFormat,
) -> Result<Vec<u64>> {
    let digits = format.digits();
    let width = digits * per_line;
    let mut records = Vec::with_capacity(lines * per_line);
    let mut count = 0usize;

    let mut input = RecordLines::new(reader, source);
    while let Some((line_no, line)) = input.next_line()? {
        if line_no > lines {
            return Err(GoldenError::parse(
                source,
                line_no,
                &line,
                format!("unexpected extra line, expected {} lines", lines),
            ));
        }
        if let Some((column, ch)) = line.char_indices().find(|(_, ch)| !ch.is_ascii_hexdigit()) {
            return Err(GoldenError::parse(
                source,
                line_no,
                &line,
                format!("non-hex character {:?} at column {}", ch, column + 1),
            ));
        }
        if line.len() != width {
            return Err(GoldenError::parse(
                source,
                line_no,
                &line,
                format!("expected {} hex digits, found {}", width, line.len()),
            ));
        }
        for chunk in 0..per_line {
            let text = &line[chunk * digits..(chunk + 1) * digits];
            let raw = decode(text)
                .map_err(|e| GoldenError::parse(source, line_no, &line, e.to_string()))?;
            if format.bit_width() < 64 && raw >> format.bit_width() != 0 {
                return Err(GoldenError::parse(
                    source,
                    line_no,
                    &line,
                    format!("record {} exceeds {} bits", text, format.bit_width()),
                ));
            }
            records.push(raw);
        }
        count = line_no;
    }

    if count < lines {
        return Err(GoldenError::parse(
            source,
            count + 1,
            "",
            format!("unexpected end of file, expected {} lines", lines),
        ));
    }
    debug!("read {} records from {}", records.len(), source);
    Ok(records)
}

fn to_bytes(records: Vec<u64>) -> Vec<i8> {
    records.into_iter().map(|r| sign_extend(r, 8) as i8).collect()
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| GoldenError::io(path, e))
}

/// Reads an (h, w, c) pixel file written by [`super::write_pixels`].
pub fn read_pixels<R: BufRead>(
    reader: R,
    source: &str,
    h: usize,
    w: usize,
    c: usize,
) -> Result<PixelTensor> {
    let records = read_records(reader, source, h * w, c, HexFormat::BYTE_UPPER)?;
    PixelTensor::from_vec(h, w, c, to_bytes(records))
}

/// Reads a one-byte-per-line pixel vector of `c` channels.
pub fn read_pixel_vector<R: BufRead>(reader: R, source: &str, c: usize) -> Result<PixelVector> {
    let records = read_records(reader, source, c, 1, HexFormat::BYTE_UPPER)?;
    Ok(PixelVector::from_vec(to_bytes(records)))
}

/// Reads a (KH, KW, KC, KN) weight file written by [`super::write_kernels`].
pub fn read_kernels<R: BufRead>(
    reader: R,
    source: &str,
    kh: usize,
    kw: usize,
    kc: usize,
    kn: usize,
) -> Result<KernelTensor> {
    let records = to_bytes(read_records(reader, source, kh * kw * kc, kn, HexFormat::BYTE_UPPER)?);
    let mut kernel = KernelTensor::new(kh, kw, kc, kn);
    let mut values = records.into_iter();
    for x in 0..kw {
        for y in 0..kh {
            for c in 0..kc {
                for k in 0..kn {
                    if let Some(v) = values.next() {
                        kernel.set(y, x, c, k, v);
                    }
                }
            }
        }
    }
    Ok(kernel)
}

/// Reads a (KN, C) weight file written by [`super::write_kernel_matrix`].
pub fn read_kernel_matrix<R: BufRead>(
    reader: R,
    source: &str,
    kn: usize,
    c: usize,
) -> Result<KernelMatrix> {
    let records = to_bytes(read_records(reader, source, c, kn, HexFormat::BYTE_UPPER)?);
    let mut kernels = KernelMatrix::new(kn, c);
    for (idx, v) in records.into_iter().enumerate() {
        kernels.set(idx % kn, idx / kn, v);
    }
    Ok(kernels)
}

/// Reads an (oh, ow, kn) result file, sign-extending each record from
/// `format.bit_width()` bits.
pub fn read_results<R: BufRead>(
    reader: R,
    source: &str,
    format: HexFormat,
    oh: usize,
    ow: usize,
    kn: usize,
) -> Result<OutputTensor> {
    let records = read_records(reader, source, oh * ow * kn, 1, format)?;
    let values = records
        .into_iter()
        .map(|r| sign_extend(r, format.bit_width()) as i32)
        .collect();
    OutputTensor::from_vec(oh, ow, kn, values)
}

pub fn load_pixels(path: impl AsRef<Path>, h: usize, w: usize, c: usize) -> Result<PixelTensor> {
    let path = path.as_ref();
    read_pixels(open(path)?, &path.display().to_string(), h, w, c)
}

pub fn load_pixel_vector(path: impl AsRef<Path>, c: usize) -> Result<PixelVector> {
    let path = path.as_ref();
    read_pixel_vector(open(path)?, &path.display().to_string(), c)
}

pub fn load_kernels(
    path: impl AsRef<Path>,
    kh: usize,
    kw: usize,
    kc: usize,
    kn: usize,
) -> Result<KernelTensor> {
    let path = path.as_ref();
    read_kernels(open(path)?, &path.display().to_string(), kh, kw, kc, kn)
}

pub fn load_kernel_matrix(path: impl AsRef<Path>, kn: usize, c: usize) -> Result<KernelMatrix> {
    let path = path.as_ref();
    read_kernel_matrix(open(path)?, &path.display().to_string(), kn, c)
}

pub fn load_results(
    path: impl AsRef<Path>,
    format: HexFormat,
    oh: usize,
    ow: usize,
    kn: usize,
) -> Result<OutputTensor> {
    let path = path.as_ref();
    read_results(open(path)?, &path.display().to_string(), format, oh, ow, kn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::HexCase;
    use crate::serialize::{write_kernel_matrix, write_kernels, write_pixels};

    #[test]
    fn pixels_read_back() {
        let pixel = PixelTensor::from_vec(2, 1, 2, vec![-5, 6, 127, -128]).unwrap();
        let mut buf = Vec::new();
        write_pixels(&mut buf, &pixel, HexCase::Lower).unwrap();
        let back = read_pixels(buf.as_slice(), "mem", 2, 1, 2).unwrap();
        assert_eq!(back, pixel);
    }

    #[test]
    fn kernels_read_back() {
        let data: Vec<i8> = (0..2 * 3 * 2 * 4).map(|i| (i as i8).wrapping_mul(37)).collect();
        let kernel = KernelTensor::from_vec(2, 3, 2, 4, data).unwrap();
        let mut buf = Vec::new();
        write_kernels(&mut buf, &kernel, HexCase::Upper).unwrap();
        assert_eq!(read_kernels(buf.as_slice(), "mem", 2, 3, 2, 4).unwrap(), kernel);

        let matrix = KernelMatrix::from_vec(4, 3, (0..12).map(|i| i * 10 - 60).collect()).unwrap();
        let mut buf = Vec::new();
        write_kernel_matrix(&mut buf, &matrix, HexCase::Upper).unwrap();
        assert_eq!(read_kernel_matrix(buf.as_slice(), "mem", 4, 3).unwrap(), matrix);
    }

    #[test]
    fn results_are_sign_extended() {
        let text = "3FFFFF\n000010\n200000\n";
        let out = read_results(text.as_bytes(), "mem", HexFormat::ACC22_UPPER, 1, 1, 3).unwrap();
        assert_eq!(out.values(), &[-1, 16, -(1 << 21)]);
    }

    #[test]
    fn wrong_width_is_reported_with_line() {
        let text = "3FFFFF\n00010\n";
        let err = read_results(text.as_bytes(), "r.txt", HexFormat::ACC22_UPPER, 1, 1, 2)
            .unwrap_err();
        match err {
            GoldenError::Parse {
                source_name, line, ..
            } => {
                assert_eq!(source_name, "r.txt");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_hex_and_line_count_errors() {
        let err = read_pixel_vector("0A\nZZ\n".as_bytes(), "p", 2).unwrap_err();
        assert!(matches!(err, GoldenError::Parse { line: 2, .. }));

        let err = read_pixel_vector("0A\n".as_bytes(), "p", 2).unwrap_err();
        assert!(matches!(err, GoldenError::Parse { line: 2, .. }));

        let err = read_pixel_vector("0A\n0B\n0C\n".as_bytes(), "p", 2).unwrap_err();
        assert!(matches!(err, GoldenError::Parse { line: 3, .. }));
    }

    #[test]
    fn crlf_files_are_accepted() {
        let v = read_pixel_vector("0A\r\nFF\r\n".as_bytes(), "p", 2).unwrap();
        assert_eq!(v.as_slice(), &[10, -1]);
    }

    #[test]
    fn records_wider_than_format_are_rejected() {
        // 7 digits can encode 28 bits; 26-bit results must keep the top two clear.
        let err = read_results("FFFFFFF\n".as_bytes(), "r", HexFormat::ACC26_UPPER, 1, 1, 1)
            .unwrap_err();
        assert!(matches!(err, GoldenError::Parse { line: 1, .. }));
    }
}
