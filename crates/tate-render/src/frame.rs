#![forbid(unsafe_code)]

//! Measured text as seen by the painters.
//!
//! Coordinates are object-centred: the object spans `-width/2..width/2`
//! horizontally and `-height/2..height/2` vertically. Columns flow right to
//! left, so column `i` ends `Σ extents[<i]` to the left of the object's
//! right edge.

use tate_style::TextStyle;
use tate_text::{CharBox, LineRecord, StyleMap};

/// One layout pass, borrowed for painting.
#[derive(Debug, Clone, Copy)]
pub struct TextFrame<'a> {
    pub lines: &'a [Vec<String>],
    pub records: &'a [&'a LineRecord],
    pub map: &'a StyleMap,
    /// Object default style.
    pub base: &'a TextStyle,
    pub width: f64,
    pub height: f64,
    pub line_height: f64,
    /// Char spacing in object units.
    pub spacing: f64,
    pub cursor_width: f64,
}

impl<'a> TextFrame<'a> {
    /// Distance from the object's right edge to column `line`.
    #[must_use]
    pub fn column_offset(&self, line: usize) -> f64 {
        self.records.iter().take(line).map(|r| r.extent).sum()
    }

    /// Right edge of column `line`, `inset` inside the object.
    #[must_use]
    pub fn column_right(&self, line: usize, inset: f64) -> f64 {
        self.width / 2.0 - inset - self.column_offset(line)
    }

    /// Top of every column.
    #[inline]
    #[must_use]
    pub fn top(&self) -> f64 {
        -self.height / 2.0
    }

    #[must_use]
    pub fn extent(&self, line: usize) -> f64 {
        self.records.get(line).map_or(0.0, |r| r.extent)
    }

    /// Column thickness without the line height gap.
    #[must_use]
    pub fn glyph_extent(&self, line: usize) -> f64 {
        self.extent(line) / self.line_height
    }

    #[must_use]
    pub fn boxes(&self, line: usize) -> &'a [CharBox] {
        self.records.get(line).map_or(&[], |r| r.boxes.as_slice())
    }

    #[must_use]
    pub fn styles(&self, line: usize) -> &'a [TextStyle] {
        self.records.get(line).map_or(&[], |r| r.styles.as_slice())
    }

    /// Offset down column `line` where character `char` starts; the end of
    /// the last character for `char == len`.
    #[must_use]
    pub fn char_top(&self, line: usize, char: usize) -> f64 {
        let boxes = self.boxes(line);
        match boxes.get(char) {
            Some(b) => b.top,
            None => boxes.last().map_or(0.0, |b| b.top + b.advance()),
        }
    }
}
