#![forbid(unsafe_code)]

//! Layout orchestration.
//!
//! [`TextLayout`] owns everything derived from the text during a layout
//! pass: logical lines, wrapped display lines, the [`StyleMap`] between
//! them, the lazily measured [`BoxModel`] and the cursor offset cache.
//! Style runs, the object default style and the measurement cache stay
//! with the caller and are lent for the duration of a call through
//! [`StyledGlyphs`].
//!
//! ```text
//! text ─▶ split_logical_lines ─▶ wrap_lines ─▶ StyleMap::build
//!                                                   │
//!                       hit-test / render ◀── BoxModel (lazy)
//! ```

use tate_style::{LogicalPosition, StyleRuns, TextStyle};
use tracing::debug_span;

use crate::boxes::{BoxModel, LineRecord, line_extent, measure_line};
use crate::config::LayoutConfig;
use crate::hit_test::{self, CursorOffsets, PointerQuery};
use crate::measure::{FontMeasurer, GlyphMetrics, MeasureCache};
use crate::script::{flat_len, split_logical_lines};
use crate::style_map::StyleMap;
use crate::wrap::{GlyphSource, WrapOptions, wrap_lines};

/// Styled measurement over borrowed style runs.
///
/// As a [`GlyphSource`] it measures a grapheme at a logical position in the
/// style resolved there, with char spacing added to both widths.
pub struct StyledGlyphs<'a, M> {
    runs: &'a StyleRuns,
    base: &'a TextStyle,
    cache: &'a mut MeasureCache<M>,
    spacing: f64,
}

impl<'a, M: FontMeasurer> StyledGlyphs<'a, M> {
    pub fn new(
        runs: &'a StyleRuns,
        base: &'a TextStyle,
        cache: &'a mut MeasureCache<M>,
        config: &LayoutConfig,
    ) -> Self {
        Self {
            runs,
            base,
            cache,
            spacing: config.spacing_width(base.font_size),
        }
    }

    /// Char spacing in object units.
    #[must_use]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    #[must_use]
    pub fn base(&self) -> &TextStyle {
        self.base
    }

    /// Complete style at a logical position; the default style where
    /// nothing is set or the position is unknown.
    #[must_use]
    pub fn style_at(&self, pos: Option<LogicalPosition>) -> TextStyle {
        match pos.and_then(|p| self.runs.get(p)) {
            Some(decl) => self.base.patch(decl),
            None => self.base.clone(),
        }
    }

    fn raw(&mut self, grapheme: &str, previous: Option<&str>, style: &TextStyle) -> GlyphMetrics {
        self.cache.measure(grapheme, previous, style)
    }
}

impl<M: FontMeasurer> GlyphSource for StyledGlyphs<'_, M> {
    fn metrics(
        &mut self,
        line: usize,
        index: usize,
        grapheme: &str,
        previous: Option<&str>,
    ) -> GlyphMetrics {
        let style = self.style_at(Some(LogicalPosition::new(line, index)));
        let mut metrics = self.raw(grapheme, previous, &style);
        metrics.width += self.spacing;
        metrics.kerned_width += self.spacing;
        metrics
    }
}

/// Derived layout state of one text object.
#[derive(Debug, Clone)]
pub struct TextLayout {
    config: LayoutConfig,
    logical: Vec<Vec<String>>,
    lines: Vec<Vec<String>>,
    map: StyleMap,
    boxes: BoxModel,
    column_height: f64,
    dynamic_min_width: f64,
    cursor: Option<(usize, CursorOffsets)>,
}

impl TextLayout {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            logical: vec![Vec::new()],
            lines: vec![Vec::new()],
            map: StyleMap::build(&[Vec::new()], &[Vec::new()], config.split_by_grapheme),
            boxes: BoxModel::new(),
            column_height: 0.0,
            dynamic_min_width: 0.0,
            cursor: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next
    /// [`relayout`](Self::relayout).
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.invalidate();
    }

    /// Wrap `text` into columns of `column_height` and rebuild the style
    /// map. Geometry is re-measured lazily afterwards.
    pub fn relayout<M: FontMeasurer>(
        &mut self,
        text: &str,
        column_height: f64,
        glyphs: &mut StyledGlyphs<'_, M>,
    ) {
        let _span = debug_span!("layout", column_height, bytes = text.len()).entered();
        let logical = split_logical_lines(text);
        let options = WrapOptions::from_config(&self.config, column_height, glyphs.base.font_size);
        let wrapped = wrap_lines(&logical, &options, glyphs);
        self.map = StyleMap::build(&wrapped.lines, &logical, self.config.split_by_grapheme);
        self.logical = logical;
        self.lines = wrapped.lines;
        self.dynamic_min_width = wrapped.dynamic_min_width;
        self.column_height = column_height;
        self.invalidate();
    }

    /// Drop measured geometry and the cursor cache.
    pub fn invalidate(&mut self) {
        self.boxes.invalidate(self.lines.len());
        self.cursor = None;
    }

    #[must_use]
    pub fn lines(&self) -> &[Vec<String>] {
        &self.lines
    }

    #[must_use]
    pub fn logical_lines(&self) -> &[Vec<String>] {
        &self.logical
    }

    #[must_use]
    pub fn map(&self) -> &StyleMap {
        &self.map
    }

    #[must_use]
    pub fn column_height(&self) -> f64 {
        self.column_height
    }

    /// Column height needed by the largest unbreakable word.
    #[must_use]
    pub fn dynamic_min_width(&self) -> f64 {
        self.dynamic_min_width
    }

    /// Flat grapheme length of the text.
    #[must_use]
    pub fn text_len(&self) -> usize {
        flat_len(&self.logical)
    }

    /// Geometry of display line `line`, measuring it if stale.
    pub fn line_record<M: FontMeasurer>(
        &mut self,
        line: usize,
        glyphs: &mut StyledGlyphs<'_, M>,
    ) -> Option<&LineRecord> {
        let Self {
            config,
            lines,
            map,
            boxes,
            ..
        } = self;
        let graphemes = lines.get(line)?;
        boxes.ensure(line, || {
            let styles: Vec<TextStyle> = (0..graphemes.len())
                .map(|c| glyphs.style_at(map.resolve(line, c)))
                .collect();
            let spacing = glyphs.spacing;
            let char_boxes =
                measure_line(graphemes, spacing, |c, g, prev| glyphs.raw(g, prev, &styles[c]));
            let extent = line_extent(&styles, glyphs.base.font_size, config);
            LineRecord::new(char_boxes, styles, extent)
        })
    }

    /// Measure every stale display line.
    pub fn measure_all<M: FontMeasurer>(&mut self, glyphs: &mut StyledGlyphs<'_, M>) {
        for line in 0..self.lines.len() {
            self.line_record(line, glyphs);
        }
    }

    /// Records of every display line, if all are measured.
    #[must_use]
    pub fn records(&self) -> Option<Vec<&LineRecord>> {
        self.boxes.fresh_records()
    }

    /// Length of the longest column plus room for the cursor.
    pub fn text_height<M: FontMeasurer>(&mut self, glyphs: &mut StyledGlyphs<'_, M>) -> f64 {
        self.measure_all(glyphs);
        let spacing = glyphs.spacing;
        let longest = self
            .records()
            .unwrap_or_default()
            .iter()
            .map(|r| r.length(spacing))
            .fold(0.0, f64::max);
        longest + self.config.cursor_width
    }

    /// Summed column thickness; the last column counts without its line
    /// height.
    pub fn text_width<M: FontMeasurer>(&mut self, glyphs: &mut StyledGlyphs<'_, M>) -> f64 {
        self.measure_all(glyphs);
        let records = self.records().unwrap_or_default();
        let last = records.len().saturating_sub(1);
        records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                if i == last {
                    r.extent / self.config.line_height
                } else {
                    r.extent
                }
            })
            .sum()
    }

    /// Flat selection index under a pointer.
    pub fn selection_index_at_pointer<M: FontMeasurer>(
        &mut self,
        query: &PointerQuery,
        glyphs: &mut StyledGlyphs<'_, M>,
    ) -> usize {
        self.measure_all(glyphs);
        let records = self.records().unwrap_or_default();
        hit_test::selection_index_at_pointer(
            query,
            &records,
            &self.map,
            glyphs.spacing,
            self.text_len(),
        )
    }

    /// Cursor offsets at flat index `flat`, cached until the next
    /// invalidation.
    pub fn cursor_offsets<M: FontMeasurer>(
        &mut self,
        flat: usize,
        glyphs: &mut StyledGlyphs<'_, M>,
    ) -> CursorOffsets {
        if let Some((_, offsets)) = self.cursor.filter(|(cached, _)| *cached == flat) {
            return offsets;
        }
        self.measure_all(glyphs);
        let records = self.records().unwrap_or_default();
        let offsets = hit_test::cursor_offsets(flat, &records, &self.map, glyphs.spacing);
        self.cursor = Some((flat, offsets));
        offsets
    }
}

impl Default for TextLayout {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}
