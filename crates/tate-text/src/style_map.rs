#![forbid(unsafe_code)]

//! Translation between display-line and logical coordinates.
//!
//! Styles are stored per logical line ([`StyleRuns`]); rendering and
//! hit-testing walk display lines. A [`StyleMap`] records, for every display
//! line, which logical line it came from and at which grapheme offset it
//! starts. It is rebuilt on every layout pass.
//!
//! Flat offsets (selection positions) count graphemes across display lines
//! plus one "missing newline" slot per line boundary that consumed a
//! grapheme: always in word mode (the collapsed space or the break), only at
//! logical line ends in grapheme mode.
//!
//! A lookup through a missing entry reads as "no style" and writes through
//! one are dropped.

use tate_style::{LogicalPosition, StyleDeclaration, StyleProperty, StyleRuns};
use tracing::trace;

use crate::script::is_line_break;

/// Origin of one display line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StyleMapEntry {
    /// Logical line the display line belongs to.
    pub line: usize,
    /// Grapheme offset of the display line within that logical line.
    pub offset: usize,
}

/// Display line → logical line table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleMap {
    entries: Vec<StyleMapEntry>,
    display_lens: Vec<usize>,
    logical_lens: Vec<usize>,
    split_by_grapheme: bool,
}

fn is_space_or_tab(g: &str) -> bool {
    matches!(g, " " | "\t")
}

impl StyleMap {
    /// Build the table for wrapped `display` lines of `logical` text.
    #[must_use]
    pub fn build(display: &[Vec<String>], logical: &[Vec<String>], split_by_grapheme: bool) -> Self {
        let mut flat: Vec<&str> = Vec::new();
        for (i, line) in logical.iter().enumerate() {
            if i > 0 {
                flat.push("\n");
            }
            flat.extend(line.iter().map(String::as_str));
        }

        let mut entries = Vec::with_capacity(display.len());
        let mut real_line = 0;
        let mut real_offset = 0;
        let mut count = 0;
        for (i, line) in display.iter().enumerate() {
            let at = flat.get(count).copied();
            if i > 0 && at.is_some_and(is_line_break) {
                real_offset = 0;
                count += 1;
                real_line += 1;
            } else if i > 0 && !split_by_grapheme && at.is_some_and(is_space_or_tab) {
                real_offset += 1;
                count += 1;
            }
            entries.push(StyleMapEntry {
                line: real_line,
                offset: real_offset,
            });
            count += line.len();
            real_offset += line.len();
        }
        trace!(entries = entries.len(), "style map rebuilt");

        Self {
            entries,
            display_lens: display.iter().map(Vec::len).collect(),
            logical_lens: logical.iter().map(Vec::len).collect(),
            split_by_grapheme,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn entries(&self) -> &[StyleMapEntry] {
        &self.entries
    }

    #[must_use]
    pub fn entry(&self, display_line: usize) -> Option<StyleMapEntry> {
        self.entries.get(display_line).copied()
    }

    #[must_use]
    pub fn split_by_grapheme(&self) -> bool {
        self.split_by_grapheme
    }

    /// Grapheme count of each logical line.
    #[must_use]
    pub fn logical_lens(&self) -> &[usize] {
        &self.logical_lens
    }

    /// Grapheme count of each display line.
    #[must_use]
    pub fn display_lens(&self) -> &[usize] {
        &self.display_lens
    }

    /// Logical position of display coordinate `(display_line, char)`.
    #[must_use]
    pub fn resolve(&self, display_line: usize, char: usize) -> Option<LogicalPosition> {
        let entry = self.entry(display_line)?;
        Some(LogicalPosition::new(entry.line, entry.offset + char))
    }

    /// The display line is the last one of its logical line.
    #[must_use]
    pub fn is_end_of_wrapping(&self, display_line: usize) -> bool {
        match (self.entry(display_line), self.entry(display_line + 1)) {
            (_, None) => true,
            (Some(this), Some(next)) => next.line != this.line,
            (None, Some(_)) => true,
        }
    }

    /// Hidden slots between this display line and the next in flat offsets.
    #[must_use]
    pub fn missing_newline_offset(&self, display_line: usize) -> usize {
        if self.split_by_grapheme {
            usize::from(self.is_end_of_wrapping(display_line))
        } else {
            1
        }
    }

    /// Display coordinate `(line, char)` of a flat offset.
    ///
    /// Offsets past the end clamp to the end of the last display line.
    #[must_use]
    pub fn location_of(&self, flat: usize) -> (usize, usize) {
        let mut rest = flat;
        for (i, &len) in self.display_lens.iter().enumerate() {
            if rest <= len {
                return (i, rest);
            }
            rest -= len + self.missing_newline_offset(i);
        }
        match self.display_lens.last() {
            Some(&len) => (self.display_lens.len() - 1, rest.min(len)),
            None => (0, 0),
        }
    }

    /// Flat offset of display coordinate `(line, char)`.
    #[must_use]
    pub fn flat_index(&self, display_line: usize, char: usize) -> usize {
        let before: usize = (0..display_line.min(self.display_lens.len()))
            .map(|i| self.display_lens[i] + self.missing_newline_offset(i))
            .sum();
        before + char
    }

    /// Logical position of a flat offset in the unwrapped text.
    #[must_use]
    pub fn logical_location(&self, flat: usize) -> LogicalPosition {
        let mut rest = flat;
        for (i, &len) in self.logical_lens.iter().enumerate() {
            if rest <= len {
                return LogicalPosition::new(i, rest);
            }
            rest -= len + 1;
        }
        match self.logical_lens.last() {
            Some(&len) => LogicalPosition::new(self.logical_lens.len() - 1, rest.min(len)),
            None => LogicalPosition::default(),
        }
    }

    /// Flat offset of a logical position.
    #[must_use]
    pub fn logical_flat(&self, pos: LogicalPosition) -> usize {
        let before: usize = self.logical_lens.iter().take(pos.line).map(|len| len + 1).sum();
        before + pos.char
    }

    /// Read access to `runs` in display coordinates.
    #[must_use]
    pub fn styles<'a>(&'a self, runs: &'a StyleRuns) -> MappedStyles<'a> {
        MappedStyles { map: self, runs }
    }

    /// Write access to `runs` in display coordinates.
    pub fn styles_mut<'a>(&'a self, runs: &'a mut StyleRuns) -> MappedStylesMut<'a> {
        MappedStylesMut { map: self, runs }
    }
}

/// Style runs viewed through a [`StyleMap`].
#[derive(Debug, Clone, Copy)]
pub struct MappedStyles<'a> {
    map: &'a StyleMap,
    runs: &'a StyleRuns,
}

impl<'a> MappedStyles<'a> {
    /// Declaration at a display coordinate.
    #[must_use]
    pub fn declaration(&self, display_line: usize, char: usize) -> Option<&'a StyleDeclaration> {
        self.runs.get(self.map.resolve(display_line, char)?)
    }

    /// Whether `property` is set on the display line's logical line, or
    /// anywhere when `display_line` is `None`.
    #[must_use]
    pub fn style_has(&self, property: StyleProperty, display_line: Option<usize>) -> bool {
        let line = display_line.map(|i| self.map.entry(i).map_or(i, |e| e.line));
        self.runs.has_property(property, line)
    }

    /// Whether the display line's logical line has a run.
    #[must_use]
    pub fn line_has_style(&self, display_line: usize) -> bool {
        self.map
            .entry(display_line)
            .is_some_and(|e| self.runs.line(e.line).is_some())
    }

    /// Whether no non-empty declaration falls inside the display line's own
    /// slice of its logical line.
    #[must_use]
    pub fn is_empty_styles(&self, display_line: usize) -> bool {
        let Some(entry) = self.map.entry(display_line) else {
            return self.runs.is_empty();
        };
        let limit = self
            .map
            .entry(display_line + 1)
            .filter(|next| next.line == entry.line)
            .map(|next| next.offset);
        let Some(run) = self.runs.line(entry.line) else {
            return true;
        };
        !run.range(entry.offset..)
            .take_while(|(k, _)| limit.is_none_or(|l| **k < l))
            .any(|(_, decl)| !decl.is_empty())
    }
}

/// Mutable style runs viewed through a [`StyleMap`].
#[derive(Debug)]
pub struct MappedStylesMut<'a> {
    map: &'a StyleMap,
    runs: &'a mut StyleRuns,
}

impl MappedStylesMut<'_> {
    /// Read-only view over the same runs.
    #[must_use]
    pub fn view(&self) -> MappedStyles<'_> {
        MappedStyles {
            map: self.map,
            runs: self.runs,
        }
    }

    /// Replace the declaration at a display coordinate.
    pub fn set_declaration(&mut self, display_line: usize, char: usize, decl: StyleDeclaration) {
        if let Some(pos) = self.map.resolve(display_line, char) {
            self.runs.set(pos, decl);
        }
    }

    /// Delete the declaration at a display coordinate.
    pub fn delete_declaration(&mut self, display_line: usize, char: usize) {
        if let Some(pos) = self.map.resolve(display_line, char) {
            self.runs.remove(pos);
        }
    }

    /// Create an empty run for the display line's logical line.
    pub fn ensure_line_style(&mut self, display_line: usize) {
        if let Some(entry) = self.map.entry(display_line) {
            self.runs.ensure_line(entry.line);
        }
    }

    /// Merge `partial` into the declaration at a display coordinate.
    pub fn extend_declaration(&mut self, display_line: usize, char: usize, partial: &StyleDeclaration) {
        if let Some(pos) = self.map.resolve(display_line, char) {
            self.runs
                .ensure_line(pos.line)
                .entry(pos.char)
                .or_default()
                .extend(partial);
        }
    }

    /// Drop runs of logical lines no display line maps to.
    pub fn remove_extraneous_styles(&mut self) {
        let keep: Vec<usize> = self.map.entries.iter().map(|e| e.line).collect();
        let stale: Vec<usize> = self
            .runs
            .lines()
            .map(|(line, _)| line)
            .filter(|line| !keep.contains(line))
            .collect();
        for line in stale {
            self.runs.remove_line(line);
        }
    }
}
