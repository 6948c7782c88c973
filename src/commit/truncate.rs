//! Head-and-tail truncation of large diffs.
//!
//! The start of a diff usually carries new files and signature changes and
//! the end carries the closing hunks, so an oversized diff keeps both ends
//! and drops the middle. Cuts are by raw line count and may split a hunk.

/// A diff bounded to a line budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedDiff {
    pub text: String,
    /// Lines dropped from the middle; zero when the diff fit.
    pub omitted: usize,
}

impl TruncatedDiff {
    pub fn was_truncated(&self) -> bool {
        self.omitted > 0
    }
}

/// The single line inserted where lines were dropped.
pub fn omission_marker(omitted: usize) -> String {
    format!("... [{} lines omitted] ...", omitted)
}

/// Bound `diff` to `max_lines` lines.
///
/// Within budget the input is returned unchanged. Otherwise the first and
/// last `max_lines / 2` lines are kept with one marker line between them.
pub fn truncate_diff(diff: &str, max_lines: usize) -> TruncatedDiff {
    let lines: Vec<&str> = diff.lines().collect();

    if lines.len() <= max_lines {
        return TruncatedDiff {
            text: diff.to_string(),
            omitted: 0,
        };
    }

    let half = max_lines / 2;
    let omitted = lines.len() - 2 * half;

    let mut kept: Vec<String> = Vec::with_capacity(2 * half + 1);
    kept.extend(lines[..half].iter().map(|l| l.to_string()));
    kept.push(omission_marker(omitted));
    kept.extend(lines[lines.len() - half..].iter().map(|l| l.to_string()));

    TruncatedDiff {
        text: kept.join("\n"),
        omitted,
    }
}
