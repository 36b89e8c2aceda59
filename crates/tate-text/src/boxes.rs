#![forbid(unsafe_code)]

//! Per-character geometry of display lines.
//!
//! A [`CharBox`] holds the measured metrics of one grapheme and its `top`,
//! the distance from the top of the column to the start of the glyph.
//! Boxes of a display line, together with the resolved style of every
//! grapheme and the column thickness, form a [`LineRecord`].
//!
//! Records live in a [`BoxModel`]: an arena indexed by display line and
//! stamped with a version. [`BoxModel::invalidate`] is the single
//! invalidation entry point; stale records are re-measured lazily on the
//! next access.

use tate_style::TextStyle;
use tracing::trace;

use crate::config::LayoutConfig;
use crate::measure::GlyphMetrics;
use crate::script::{GlyphClass, classify};

/// Geometry of one grapheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharBox {
    pub width: f64,
    pub kerned_width: f64,
    pub height: f64,
    /// Offset from the top of the column.
    pub top: f64,
    pub class: GlyphClass,
}

impl CharBox {
    /// Distance to the next box down the column.
    #[inline]
    #[must_use]
    pub fn advance(&self) -> f64 {
        match self.class {
            GlyphClass::Latin => self.width,
            GlyphClass::Cjk => self.height,
        }
    }

    /// Advance used when accumulating decoration and background runs.
    #[inline]
    #[must_use]
    pub fn kerned_advance(&self) -> f64 {
        match self.class {
            GlyphClass::Latin => self.kerned_width,
            GlyphClass::Cjk => self.height,
        }
    }
}

/// Measure a display line into boxes.
///
/// `metrics(index, grapheme, previous)` supplies the raw metrics; `spacing`
/// is added to every width. Each box starts where the previous one's
/// advance ends.
pub fn measure_line<F>(graphemes: &[String], spacing: f64, mut metrics: F) -> Vec<CharBox>
where
    F: FnMut(usize, &str, Option<&str>) -> GlyphMetrics,
{
    let mut boxes: Vec<CharBox> = Vec::with_capacity(graphemes.len());
    let mut previous: Option<&str> = None;
    for (i, g) in graphemes.iter().enumerate() {
        let m = metrics(i, g, previous);
        let top = boxes.last().map_or(0.0, |prev| prev.top + prev.advance());
        boxes.push(CharBox {
            width: m.width + spacing,
            kerned_width: m.kerned_width + spacing,
            height: m.height,
            top,
            class: classify(g),
        });
        previous = Some(g.as_str());
    }
    boxes
}

/// Column thickness of a line.
///
/// The largest font size on the line, or `base_font_size` for an empty
/// line, scaled by line height and the font size multiplier.
#[must_use]
pub fn line_extent(styles: &[TextStyle], base_font_size: f64, config: &LayoutConfig) -> f64 {
    let max = styles
        .iter()
        .map(|s| s.font_size)
        .fold(None, |acc: Option<f64>, size| Some(acc.map_or(size, |a| a.max(size))))
        .unwrap_or(base_font_size);
    config.line_extent(max)
}

/// Measured geometry of one display line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub boxes: Vec<CharBox>,
    /// Resolved style of every grapheme.
    pub styles: Vec<TextStyle>,
    /// Column thickness.
    pub extent: f64,
    version: u64,
}

impl LineRecord {
    #[must_use]
    pub fn new(boxes: Vec<CharBox>, styles: Vec<TextStyle>, extent: f64) -> Self {
        Self {
            boxes,
            styles,
            extent,
            version: 0,
        }
    }

    /// Summed advance of the line, char spacing included.
    #[must_use]
    pub fn length(&self, spacing: f64) -> f64 {
        self.boxes.iter().map(|b| b.advance() + spacing).sum()
    }

    /// Largest font size on the line.
    #[must_use]
    pub fn max_font_size(&self) -> Option<f64> {
        self.styles
            .iter()
            .map(|s| s.font_size)
            .fold(None, |acc, size| Some(acc.map_or(size, |a: f64| a.max(size))))
    }
}

/// Version-tagged arena of line records.
#[derive(Debug, Clone, Default)]
pub struct BoxModel {
    version: u64,
    records: Vec<Option<LineRecord>>,
}

impl BoxModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mark every record stale and size the arena for `line_count` lines.
    pub fn invalidate(&mut self, line_count: usize) {
        self.version += 1;
        self.records.resize(line_count, None);
        trace!(version = self.version, lines = line_count, "box model invalidated");
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.records.len()
    }

    /// A fresh record, if line `line` has been measured since the last
    /// invalidation.
    #[must_use]
    pub fn get(&self, line: usize) -> Option<&LineRecord> {
        self.records
            .get(line)?
            .as_ref()
            .filter(|r| r.version == self.version)
    }

    #[must_use]
    pub fn is_fresh(&self, line: usize) -> bool {
        self.get(line).is_some()
    }

    /// The record of `line`, measuring it with `measure` if stale.
    pub fn ensure<F>(&mut self, line: usize, measure: F) -> Option<&LineRecord>
    where
        F: FnOnce() -> LineRecord,
    {
        let version = self.version;
        let slot = self.records.get_mut(line)?;
        if slot.as_ref().is_none_or(|r| r.version != version) {
            let mut record = measure();
            record.version = version;
            *slot = Some(record);
        }
        slot.as_ref()
    }

    /// All records, provided every line is fresh.
    #[must_use]
    pub fn fresh_records(&self) -> Option<Vec<&LineRecord>> {
        (0..self.records.len()).map(|i| self.get(i)).collect()
    }
}
