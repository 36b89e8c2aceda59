#![forbid(unsafe_code)]

//! Post-edit integrity repair for style runs.
//!
//! Hard breaks typed at the end of styled text can leave a logical line
//! with a gappy run, empty declarations, or no run at all, so the next
//! character typed there silently loses its style. [`StyleRuns::repair`]
//! finds such lines and rebuilds them as dense runs `0..expected_len`,
//! borrowing a style from the nearest styled line where one is missing.
//!
//! A line is *sound* when its run holds exactly the keys
//! `0..expected_line_len(..)` and no declaration is empty.

use tracing::debug;

use crate::declaration::StyleDeclaration;
use crate::runs::{LineStyles, StyleRuns};

/// A logical line that needs repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkedLine {
    pub line: usize,
    /// Number of slots the repaired run must hold.
    pub expected_len: usize,
    /// Whether empty slots should be filled from a neighbouring line.
    pub empty_style: bool,
}

/// Slots a sound run of line `index` holds.
///
/// The last line of a multi-line text also owns the slot past its final
/// grapheme, where the cursor sits after a trailing break.
#[must_use]
pub const fn expected_line_len(index: usize, line_len: usize, line_count: usize) -> usize {
    if index + 1 == line_count && index != 0 {
        line_len + 1
    } else {
        line_len
    }
}

impl StyleRuns {
    /// Find lines whose runs are not sound.
    ///
    /// `line_lens` are the grapheme counts of the logical lines; `inserted`
    /// is the text of the edit that just happened. A text without any run
    /// has nothing to repair.
    #[must_use]
    pub fn integrity_check(&self, line_lens: &[usize], inserted: &str) -> Vec<MarkedLine> {
        if self.is_empty() {
            return Vec::new();
        }
        let new_empty_line = inserted == "\n";
        let count = line_lens.len();
        let mut marked = Vec::new();

        for (line, &len) in line_lens.iter().enumerate() {
            let expected_len = expected_line_len(line, len, count);
            match self.lines.get(&line).filter(|run| !run.is_empty()) {
                Some(run) => {
                    if run.values().any(StyleDeclaration::is_empty) {
                        marked.push(MarkedLine {
                            line,
                            expected_len,
                            empty_style: true,
                        });
                    } else if !is_dense(run, expected_len) {
                        marked.push(MarkedLine {
                            line,
                            expected_len,
                            empty_style: new_empty_line,
                        });
                    }
                }
                None if new_empty_line && len == 0 => marked.push(MarkedLine {
                    line,
                    expected_len,
                    empty_style: true,
                }),
                None => {}
            }
        }
        marked
    }

    /// The closest non-empty declaration around `line`.
    ///
    /// Earlier lines are searched first, each from its last character
    /// backwards; then later lines from their first character.
    #[must_use]
    pub fn nearest_style(&self, line: usize) -> Option<StyleDeclaration> {
        let before = self
            .lines
            .range(..line)
            .rev()
            .flat_map(|(_, run)| run.values().rev())
            .find(|decl| !decl.is_empty());
        before
            .or_else(|| {
                self.lines
                    .range(line + 1..)
                    .flat_map(|(_, run)| run.values())
                    .find(|decl| !decl.is_empty())
            })
            .cloned()
    }

    /// Rebuild every marked line as a dense run.
    ///
    /// Without a donor, empty declarations keep their slots so the
    /// declarations after them stay on their characters. Returns whether
    /// any run changed.
    pub fn fix_integrity(&mut self, marked: &[MarkedLine]) -> bool {
        let mut changed = false;
        for mark in marked {
            let donor = if mark.empty_style {
                self.nearest_style(mark.line)
            } else {
                None
            };
            let run = self.lines.remove(&mark.line).unwrap_or_default();

            let mut values: Vec<StyleDeclaration> = if run.is_empty() {
                vec![donor.clone().unwrap_or_default(); mark.expected_len]
            } else {
                run.values()
                    .map(|decl| match &donor {
                        Some(d) if decl.is_empty() => d.clone(),
                        _ => decl.clone(),
                    })
                    .collect()
            };

            let Some(last) = values.last().cloned() else {
                continue;
            };
            values.resize(mark.expected_len, last);
            if values.is_empty() {
                changed = true;
                continue;
            }
            debug!(
                line = mark.line,
                slots = values.len(),
                borrowed = donor.is_some(),
                "style run rebuilt"
            );
            let dense: LineStyles = values.into_iter().enumerate().collect();
            changed |= dense != run;
            self.lines.insert(mark.line, dense);
        }
        changed
    }

    /// Prune runs beyond the text, then check and fix until the runs
    /// settle.
    ///
    /// A line filled during a pass can become the donor of an earlier line
    /// that found none, so fixing repeats while it changes anything.
    /// Returns the number of lines the first check marked.
    pub fn repair(&mut self, line_lens: &[usize], inserted: &str) -> usize {
        self.truncate_lines(line_lens.len());
        let mut marked = self.integrity_check(line_lens, inserted);
        let count = marked.len();
        if count > 0 {
            debug!(marked = count, "repairing style runs");
        }
        for _ in 0..=line_lens.len() {
            if marked.is_empty() || !self.fix_integrity(&marked) {
                break;
            }
            marked = self.integrity_check(line_lens, inserted);
        }
        count
    }
}

fn is_dense(run: &LineStyles, expected_len: usize) -> bool {
    run.len() == expected_len && run.keys().copied().eq(0..expected_len)
}
