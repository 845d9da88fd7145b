//! Line-by-line comparison of two hex result files.
//!
//! Records are compared by their raw unsigned value: bit-exact agreement of
//! the packed representation is what the hardware must reproduce.

mod report;

pub use report::{CompareReport, Mismatch};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{info, warn};

use crate::codec::decode;
use crate::error::{GoldenError, Result};
use crate::serialize::RecordLines;

/// Options for a comparison run.
#[derive(Debug, Clone, Copy)]
pub struct CompareOptions {
    /// Log a warning for every mismatching line.
    pub log_mismatches: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            log_mismatches: true,
        }
    }
}

fn parse_record(text: &str, source: &str, line: usize) -> Result<u64> {
    decode(text.trim()).map_err(|e| GoldenError::parse(source, line, text, e.to_string()))
}

/// Compares two record streams in lock-step.
///
/// Surrounding whitespace on a line is ignored. The first non-hex line in
/// either stream aborts the run, as does one stream outlasting the other.
pub fn compare_readers<A, B>(
    left: A,
    left_name: &str,
    right: B,
    right_name: &str,
    options: CompareOptions,
) -> Result<CompareReport>
where
    A: BufRead,
    B: BufRead,
{
    let mut left_lines = RecordLines::new(left, left_name);
    let mut right_lines = RecordLines::new(right, right_name);
    let mut report = CompareReport::default();

    loop {
        let l = left_lines.next_line()?;
        let r = right_lines.next_line()?;
        let (line, l, r) = match (l, r) {
            (Some((line, l)), Some((_, r))) => (line, l, r),
            (None, None) => break,
            _ => {
                return Err(GoldenError::LengthMismatch {
                    left: left_name.to_string(),
                    right: right_name.to_string(),
                    line: report.lines,
                })
            }
        };

        let lv = parse_record(&l, left_name, line)?;
        let rv = parse_record(&r, right_name, line)?;
        report.lines = line;

        if lv != rv {
            if options.log_mismatches {
                warn!("mismatch @ line {}: {} != {}", line, l.trim(), r.trim());
            }
            report.mismatches.push(Mismatch {
                line,
                left: l.trim().to_string(),
                right: r.trim().to_string(),
            });
        }
    }

    info!(
        "compared {} lines of {} and {}: different_cnt = {}",
        report.lines,
        left_name,
        right_name,
        report.mismatch_count()
    );
    Ok(report)
}

/// Compares two result files, e.g. a software golden file against a
/// hardware simulation dump.
pub fn compare_files(
    left: impl AsRef<Path>,
    right: impl AsRef<Path>,
    options: CompareOptions,
) -> Result<CompareReport> {
    let (left, right) = (left.as_ref(), right.as_ref());
    let open = |path: &Path| {
        File::open(path)
            .map(BufReader::new)
            .map_err(|e| GoldenError::io(path, e))
    };
    let left_reader = open(left)?;
    let right_reader = open(right)?;
    compare_readers(
        left_reader,
        &left.display().to_string(),
        right_reader,
        &right.display().to_string(),
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(a: &str, b: &str) -> Result<CompareReport> {
        compare_readers(a.as_bytes(), "a", b.as_bytes(), "b", CompareOptions::default())
    }

    #[test]
    fn identical_streams() {
        let report = run("3FFFFF\n000001\n", "3FFFFF\n000001\n").unwrap();
        assert_eq!(report.lines, 2);
        assert_eq!(report.mismatch_count(), 0);
        assert!(report.is_exact());
    }

    #[test]
    fn compares_values_not_text() {
        // Case and zero padding do not matter; the unsigned value does.
        let report = run("03fffffe\n  0A \n", "3FFFFFE\n0a\n").unwrap();
        assert!(report.is_exact());
    }

    #[test]
    fn reports_mismatch_position() {
        let report = run("01\n02\n03\n", "01\n07\n03\n").unwrap();
        assert_eq!(report.mismatch_count(), 1);
        assert_eq!(
            report.mismatches[0],
            Mismatch {
                line: 2,
                left: "02".into(),
                right: "07".into()
            }
        );
    }

    #[test]
    fn parse_error_names_file_and_line() {
        let err = run("01\n02\n", "01\nxyz\n").unwrap_err();
        match err {
            GoldenError::Parse {
                source_name, line, ..
            } => {
                assert_eq!(source_name, "b");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(matches!(run("\n", "00\n"), Err(GoldenError::Parse { line: 1, .. })));
    }

    #[test]
    fn invalid_utf8_is_located() {
        let err = compare_readers(
            &b"000001\n000002\n"[..],
            "sw",
            &b"000001\n0\xff0002\n"[..],
            "hw",
            CompareOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GoldenError::Parse { line: 2, .. }));
    }

    #[test]
    fn length_mismatch_either_side() {
        assert!(matches!(
            run("01\n02\n", "01\n"),
            Err(GoldenError::LengthMismatch { line: 1, .. })
        ));
        assert!(matches!(
            run("01\n", "01\n02\n"),
            Err(GoldenError::LengthMismatch { line: 1, .. })
        ));
        assert!(matches!(
            run("01\n", "01\n\n"),
            Err(GoldenError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn empty_streams_agree() {
        let report = run("", "").unwrap();
        assert_eq!(report.lines, 0);
        assert!(report.is_exact());
    }
}
