#![forbid(unsafe_code)]

//! Sparse style runs keyed by logical position.
//!
//! [`StyleRuns`] maps `logical line → char index → declaration`. A missing
//! entry means "inherit the object style". Keys are grapheme indices into
//! the logical (unwrapped) line; the slot one past the last grapheme of a
//! line is the line's hard break.
//!
//! The mutation helpers keep keys in step with text edits: they are called
//! *before* the new text is committed, with positions expressed against the
//! old text.

use std::collections::BTreeMap;

use crate::declaration::{StyleDeclaration, StyleProperty};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Declarations of one logical line, keyed by grapheme index.
pub type LineStyles = BTreeMap<usize, StyleDeclaration>;

/// A grapheme position in unwrapped text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LogicalPosition {
    pub line: usize,
    pub char: usize,
}

impl LogicalPosition {
    #[must_use]
    pub const fn new(line: usize, char: usize) -> Self {
        Self { line, char }
    }
}

/// The per-character style store.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct StyleRuns {
    pub(crate) lines: BTreeMap<usize, LineStyles>,
}

impl StyleRuns {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// No line carries any declaration.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.values().all(BTreeMap::is_empty)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines that have a run, in ascending order.
    pub fn lines(&self) -> impl Iterator<Item = (usize, &LineStyles)> + '_ {
        self.lines.iter().map(|(i, run)| (*i, run))
    }

    #[must_use]
    pub fn line(&self, line: usize) -> Option<&LineStyles> {
        self.lines.get(&line)
    }

    pub fn line_mut(&mut self, line: usize) -> Option<&mut LineStyles> {
        self.lines.get_mut(&line)
    }

    /// The run for `line`, created empty if missing.
    pub fn ensure_line(&mut self, line: usize) -> &mut LineStyles {
        self.lines.entry(line).or_default()
    }

    pub fn remove_line(&mut self, line: usize) -> Option<LineStyles> {
        self.lines.remove(&line)
    }

    #[must_use]
    pub fn get(&self, pos: LogicalPosition) -> Option<&StyleDeclaration> {
        self.lines.get(&pos.line)?.get(&pos.char)
    }

    pub fn get_mut(&mut self, pos: LogicalPosition) -> Option<&mut StyleDeclaration> {
        self.lines.get_mut(&pos.line)?.get_mut(&pos.char)
    }

    /// Whether any declaration (on `line`, or anywhere) sets `property`.
    #[must_use]
    pub fn has_property(&self, property: StyleProperty, line: Option<usize>) -> bool {
        match line {
            Some(line) => self
                .lines
                .get(&line)
                .is_some_and(|run| run.values().any(|d| d.has(property))),
            None => self
                .lines
                .values()
                .flat_map(BTreeMap::values)
                .any(|d| d.has(property)),
        }
    }

    /// Store `decl` at `pos`, replacing whatever was there.
    pub fn set(&mut self, pos: LogicalPosition, decl: StyleDeclaration) {
        self.ensure_line(pos.line).insert(pos.char, decl);
    }

    /// Remove the declaration at `pos`, dropping the line run if it empties.
    pub fn remove(&mut self, pos: LogicalPosition) -> Option<StyleDeclaration> {
        let run = self.lines.get_mut(&pos.line)?;
        let removed = run.remove(&pos.char);
        if run.is_empty() {
            self.lines.remove(&pos.line);
        }
        removed
    }

    /// Drop every run at or after `line_count`.
    pub fn truncate_lines(&mut self, line_count: usize) {
        self.lines.split_off(&line_count);
    }

    /// Move every run on a line after `after` by `delta` lines.
    ///
    /// Runs that would land on a negative line are dropped.
    pub fn shift_lines(&mut self, after: usize, delta: isize) {
        if delta == 0 {
            return;
        }
        let moved = self.lines.split_off(&(after + 1));
        for (line, run) in moved {
            if let Some(target) = line.checked_add_signed(delta) {
                self.lines.insert(target, run);
            }
        }
    }

    /// Make room for `qty` graphemes inserted at `line:ch` on one line.
    ///
    /// Declarations at or after `ch` move right by `qty`. The new slots take
    /// their style from `copied` (empty entries are skipped) or, without
    /// copied styles, from the neighbour the cursor was attached to.
    pub fn insert_chars(
        &mut self,
        line: usize,
        ch: usize,
        qty: usize,
        copied: Option<&[StyleDeclaration]>,
    ) {
        let qty = qty.max(1);
        if let Some(run) = self.lines.get_mut(&line) {
            let tail = run.split_off(&ch);
            run.extend(tail.into_iter().map(|(k, v)| (k + qty, v)));
        }

        if let Some(copied) = copied {
            for (q, decl) in copied.iter().enumerate().take(qty) {
                if decl.is_empty() {
                    continue;
                }
                self.ensure_line(line).insert(ch + q, decl.clone());
            }
            return;
        }

        let Some(run) = self.lines.get_mut(&line) else {
            return;
        };
        let neighbour = if ch > 0 { ch - 1 } else { ch + qty };
        if let Some(style) = run.get(&neighbour).cloned() {
            for q in 0..qty {
                run.insert(ch + q, style.clone());
            }
        }
    }

    /// Split `line` at `ch` for `qty` inserted hard breaks.
    ///
    /// Declarations after the split move to the last new line. Every other
    /// new line is seeded with `copied[q - 1]` or the style of the character
    /// at the cursor. `line_len` is the line's length in the store's current
    /// coordinates; splitting at its end carries nothing over.
    pub fn insert_newlines(
        &mut self,
        line: usize,
        ch: usize,
        qty: usize,
        copied: Option<&[StyleDeclaration]>,
        line_len: usize,
    ) {
        let mut qty = qty.max(1);
        let is_end_of_line = ch == line_len;
        self.shift_lines(line, qty as isize);

        let mut current_char_style = None;
        let mut carried = LineStyles::new();
        if let Some(run) = self.lines.get_mut(&line) {
            current_char_style = run.get(&ch.saturating_sub(1)).cloned();
            // An empty line keeps its break style.
            if !(is_end_of_line && ch == 0) {
                carried = run.split_off(&ch).into_iter().map(|(k, v)| (k - ch, v)).collect();
                if run.is_empty() {
                    self.lines.remove(&line);
                }
            }
        }

        if !carried.is_empty() && !is_end_of_line {
            self.lines.insert(line + qty, carried);
            qty -= 1;
        }

        while qty > 0 {
            let seed = copied
                .and_then(|c| c.get(qty - 1))
                .filter(|d| !d.is_empty())
                .or(current_char_style.as_ref());
            match seed {
                Some(decl) => {
                    self.lines.insert(line + qty, LineStyles::from([(0, decl.clone())]));
                }
                None => {
                    self.lines.remove(&(line + qty));
                }
            }
            qty -= 1;
        }
    }

    /// Insert styles for a block of graphemes (possibly spanning lines) at
    /// `at`.
    ///
    /// `copied` holds one declaration per inserted grapheme, hard breaks
    /// included. `line_len` is the length of `at.line` before the insert.
    pub fn insert_block<S: AsRef<str>>(
        &mut self,
        at: LogicalPosition,
        inserted: &[S],
        copied: Option<&[StyleDeclaration]>,
        line_len: usize,
    ) {
        let added = added_line_lengths(inserted);
        let breaks = added.len() - 1;
        let mut copied = copied;

        if added[0] > 0 {
            self.insert_chars(at.line, at.char, added[0], copied);
            copied = copied.map(|c| c.get(added[0] + 1..).unwrap_or(&[]));
        }
        if breaks > 0 {
            self.insert_newlines(at.line, at.char + added[0], breaks, None, line_len + added[0]);
        }
        for (i, &count) in added.iter().enumerate().take(breaks).skip(1) {
            if count > 0 {
                self.insert_chars(at.line + i, 0, count, copied);
            } else if let Some(first) = copied.and_then(|c| c.first()) {
                self.ensure_line(at.line + i).insert(0, first.clone());
            }
            copied = copied.map(|c| c.get(count + 1..).unwrap_or(&[]));
        }
        if breaks > 0 && added[breaks] > 0 {
            self.insert_chars(at.line + breaks, 0, added[breaks], copied);
        }
    }

    /// Remove the declarations of the graphemes in `start..end`.
    ///
    /// When the range spans lines, the tail of the end line joins the start
    /// line and the lines in between disappear.
    pub fn remove_range(&mut self, start: LogicalPosition, end: LogicalPosition) {
        if start.line != end.line {
            if let Some(run) = self.lines.get_mut(&start.line) {
                run.split_off(&start.char);
            }
            let tail = self
                .lines
                .get_mut(&end.line)
                .map(|run| run.split_off(&end.char))
                .unwrap_or_default();
            if !tail.is_empty() {
                let run = self.ensure_line(start.line);
                run.extend(tail.into_iter().map(|(k, v)| (start.char + k - end.char, v)));
            }
            for line in start.line + 1..=end.line {
                self.lines.remove(&line);
            }
            if self.lines.get(&start.line).is_some_and(BTreeMap::is_empty) {
                self.lines.remove(&start.line);
            }
            self.shift_lines(end.line, start.line as isize - end.line as isize);
        } else if let Some(run) = self.lines.get_mut(&start.line) {
            let diff = end.char.saturating_sub(start.char);
            let mut tail = run.split_off(&start.char);
            let kept = tail.split_off(&end.char);
            run.extend(kept.into_iter().map(|(k, v)| (k - diff, v)));
        }
    }
}

/// Grapheme count of each line segment of an inserted block.
///
/// A block with `n` hard breaks yields `n + 1` entries.
#[must_use]
pub fn added_line_lengths<S: AsRef<str>>(inserted: &[S]) -> Vec<usize> {
    let mut added = vec![0];
    for g in inserted {
        if g.as_ref() == "\n" {
            added.push(0);
        } else if let Some(last) = added.last_mut() {
            *last += 1;
        }
    }
    added
}
