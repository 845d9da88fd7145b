use std::fmt;

/// A line whose two records differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-based line number.
    pub line: usize,
    pub left: String,
    pub right: String,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} != {}", self.line, self.left, self.right)
    }
}

/// Outcome of a completed comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareReport {
    /// Number of line pairs compared.
    pub lines: usize,
    pub mismatches: Vec<Mismatch>,
}

impl CompareReport {
    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }

    /// True when every line agreed.
    pub fn is_exact(&self) -> bool {
        self.mismatches.is_empty()
    }
}

impl fmt::Display for CompareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "different_cnt = {}", self.mismatch_count())
    }
}
