#![forbid(unsafe_code)]

//! The editable vertical textbox.
//!
//! [`VerticalTextbox`] owns the text, its style runs and every cache
//! derived from them. Edits shift style runs first, then commit the text,
//! then repair the runs and re-wrap:
//!
//! ```text
//! Edit ─▶ StyleRuns::remove_range / insert_block ─▶ commit text
//!      ─▶ StyleRuns::repair ─▶ TextLayout::relayout ─▶ paint / hit-test
//! ```
//!
//! Layout is lazy: setters only mark the box dirty and the next query or
//! paint re-wraps.

use std::ops::Range;

use tate_core::{Point, Surface};
use tate_render::{CursorState, DecorationConfig, TextFrame};
use tate_style::{DecorationKind, LogicalPosition, StyleDeclaration, StyleRuns, TextStyle};
use tate_text::script::{graphemes, split_logical_lines};
use tate_text::{
    CursorOffsets, Edit, FontMeasurer, LayoutConfig, MeasureCache, PointerQuery, StyleMap,
    StyledGlyphs, TextInput, TextLayout,
};
use tracing::{debug, debug_span, trace};

use crate::error::Result;

/// Column height of a freshly created textbox.
pub const DEFAULT_COLUMN_HEIGHT: f64 = 200.0;

/// An editable block of vertical text.
///
/// Columns run top to bottom and are stacked right to left. `height` is the
/// column height text wraps under; `width` is the summed column thickness,
/// never smaller than the text needs.
pub struct VerticalTextbox<M> {
    text: String,
    styles: StyleRuns,
    base: TextStyle,
    config: LayoutConfig,
    decoration: DecorationConfig,
    cache: MeasureCache<M>,
    layout: TextLayout,
    width: f64,
    height: f64,
    min_height: f64,
    scale_x: f64,
    scale_y: f64,
    flip_x: bool,
    selection: Range<usize>,
    composition: Option<Range<usize>>,
    dirty: bool,
}

impl<M: FontMeasurer> VerticalTextbox<M> {
    pub fn new(text: impl Into<String>, measurer: M) -> Self {
        let config = LayoutConfig::new();
        Self {
            text: text.into(),
            styles: StyleRuns::new(),
            base: TextStyle::default(),
            config,
            decoration: DecorationConfig::new(),
            cache: MeasureCache::new(measurer),
            layout: TextLayout::new(config),
            width: 0.0,
            height: DEFAULT_COLUMN_HEIGHT,
            min_height: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            flip_x: false,
            selection: 0..0,
            composition: None,
            dirty: true,
        }
    }

    /// Set the column height.
    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self.dirty = true;
        self
    }

    /// Set the width; the text width still wins if it is larger.
    #[must_use]
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self.dirty = true;
        self
    }

    /// Smallest column height [`resize`](Self::resize) accepts.
    #[must_use]
    pub fn with_min_height(mut self, min_height: f64) -> Self {
        self.min_height = min_height;
        self
    }

    #[must_use]
    pub fn with_base_style(mut self, style: TextStyle) -> Self {
        self.base = style;
        self.dirty = true;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self.layout.set_config(config);
        self.dirty = true;
        self
    }

    #[must_use]
    pub fn with_decoration(mut self, decoration: DecorationConfig) -> Self {
        self.decoration = decoration;
        self
    }

    #[must_use]
    pub fn with_styles(mut self, styles: StyleRuns) -> Self {
        self.styles = styles;
        self.dirty = true;
        self
    }

    /// Object scale, used to map pointers and to keep the cursor thin.
    #[must_use]
    pub fn with_scale(mut self, scale_x: f64, scale_y: f64) -> Self {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
        self
    }

    #[must_use]
    pub fn with_flip_x(mut self, flip: bool) -> Self {
        self.flip_x = flip;
        self
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Flat grapheme length; a line break counts as one.
    #[must_use]
    pub fn text_len(&self) -> usize {
        graphemes(&self.text).len()
    }

    #[must_use]
    pub fn styles(&self) -> &StyleRuns {
        &self.styles
    }

    #[must_use]
    pub fn base_style(&self) -> &TextStyle {
        &self.base
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    #[must_use]
    pub fn decoration(&self) -> &DecorationConfig {
        &self.decoration
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn min_height(&self) -> f64 {
        self.min_height
    }

    #[must_use]
    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    #[must_use]
    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    #[must_use]
    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Range of the running IME composition, if any.
    #[must_use]
    pub fn composition(&self) -> Option<Range<usize>> {
        self.composition.clone()
    }

    #[must_use]
    pub fn measurer(&self) -> &M {
        self.cache.measurer()
    }

    /// Move the selection. Offsets clamp to the text.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.text_len();
        let end = end.min(len);
        self.selection = start.min(end)..end;
    }

    pub fn end_composition(&mut self) {
        self.composition = None;
    }

    /// Parse and set a fixed cursor color.
    pub fn set_cursor_color(&mut self, css: &str) -> Result<()> {
        self.decoration.cursor_color = Some(css.parse()?);
        Ok(())
    }

    /// Replace the whole text, dropping every style run.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.styles.clear();
        self.selection = 0..0;
        self.composition = None;
        self.dirty = true;
    }

    // ── Layout ───────────────────────────────────────────────────────────

    /// Wrap under `column_height` and return the width the columns need.
    pub fn layout(&mut self, column_height: f64) -> f64 {
        self.height = column_height;
        self.relayout();
        self.width
    }

    /// Resize the object. The width never drops below the text width; a
    /// height change re-wraps.
    pub fn resize(&mut self, width: f64, height: f64) {
        let text_width = self.measured(|layout, glyphs| layout.text_width(glyphs));
        self.width = width.max(text_width);
        let height = height.max(self.min_height);
        if height != self.height {
            self.height = height;
            self.relayout();
        }
    }

    /// Display lines of the current layout.
    pub fn lines(&mut self) -> &[Vec<String>] {
        self.ensure_layout();
        self.layout.lines()
    }

    pub fn style_map(&mut self) -> &StyleMap {
        self.ensure_layout();
        self.layout.map()
    }

    /// Column height the largest unbreakable word needs.
    pub fn dynamic_min_width(&mut self) -> f64 {
        self.ensure_layout();
        self.layout.dynamic_min_width()
    }

    /// Length of the longest column plus room for the cursor.
    pub fn text_height(&mut self) -> f64 {
        self.measured(|layout, glyphs| layout.text_height(glyphs))
    }

    fn ensure_layout(&mut self) {
        if self.dirty {
            self.relayout();
        }
    }

    fn relayout(&mut self) {
        let Self {
            text,
            styles,
            base,
            config,
            cache,
            layout,
            width,
            height,
            dirty,
            ..
        } = self;
        let mut glyphs = StyledGlyphs::new(styles, base, cache, config);
        layout.relayout(text.as_str(), *height, &mut glyphs);

        let dynamic = layout.dynamic_min_width();
        if dynamic > *height {
            debug!(height = *height, dynamic, "column height raised to fit the largest word");
            *height = dynamic;
        }
        let text_width = layout.text_width(&mut glyphs);
        let needed = if text_width > 0.0 {
            text_width
        } else {
            config.cursor_width
        };
        *width = width.max(needed);
        *dirty = false;
    }

    fn measured<R>(&mut self, f: impl FnOnce(&mut TextLayout, &mut StyledGlyphs<'_, M>) -> R) -> R {
        self.ensure_layout();
        let mut glyphs = StyledGlyphs::new(&self.styles, &self.base, &mut self.cache, &self.config);
        f(&mut self.layout, &mut glyphs)
    }

    // ── Styles ───────────────────────────────────────────────────────────

    /// Complete style of a display position.
    pub fn style_at(&mut self, display_line: usize, char: usize) -> TextStyle {
        self.ensure_layout();
        match self
            .layout
            .map()
            .resolve(display_line, char)
            .and_then(|pos| self.styles.get(pos))
        {
            Some(decl) => self.base.patch(decl),
            None => self.base.clone(),
        }
    }

    /// Merge `partial` into every character of flat range `start..end`.
    pub fn set_style_range(&mut self, start: usize, end: usize, partial: &StyleDeclaration) {
        if start >= end || partial.is_empty() {
            return;
        }
        self.ensure_layout();
        let map = self.layout.map();
        let mut mapped = map.styles_mut(&mut self.styles);
        for flat in start..end {
            let (line, char) = map.location_of(flat);
            mapped.extend_declaration(line, char, partial);
        }
        self.dirty = true;
    }

    /// Declarations of flat range `start..end`, one per grapheme; empty
    /// where nothing is set.
    pub fn selection_styles(&mut self, start: usize, end: usize) -> Vec<StyleDeclaration> {
        self.ensure_layout();
        let map = self.layout.map();
        (start..end)
            .map(|flat| {
                self.styles
                    .get(map.logical_location(flat))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Style new text typed at `at` picks up: the character before the
    /// cursor, or the first slot of the line at a line start.
    fn cursor_style(&self, at: LogicalPosition) -> TextStyle {
        let pos = if at.char > 0 {
            LogicalPosition::new(at.line, at.char - 1)
        } else {
            at
        };
        match self.styles.get(pos) {
            Some(decl) => self.base.patch(decl),
            None => self.base.clone(),
        }
    }

    // ── Editing ──────────────────────────────────────────────────────────

    /// Apply one edit: shift styles, commit the text, repair, re-wrap.
    pub fn apply_edit(&mut self, edit: &Edit) {
        self.ensure_layout();
        let old = graphemes(&self.text);
        let mut next = old.clone();
        edit.apply(&mut next);
        let inserted = graphemes(edit.inserted());
        let end = edit.removed().end.min(old.len());
        let start = edit.start().min(end);
        let _span = debug_span!("edit", start, removed = end - start, inserted = inserted.len())
            .entered();

        if next.is_empty() {
            self.styles.clear();
            self.commit(String::new(), None, 0..0);
            return;
        }

        let map = self.layout.map();
        let from = map.logical_location(start);
        let to = map.logical_location(end);
        let old_lens = map.logical_lens().to_vec();

        let mut copied = None;
        if end > start {
            if !inserted.is_empty() {
                let decl = self.styles.get(from).cloned().unwrap_or_default();
                copied = Some(vec![decl; inserted.len()]);
            }
            self.styles.remove_range(from, to);
        }

        if !inserted.is_empty() {
            let copied = edit
                .pasted_styles()
                .map(<[StyleDeclaration]>::to_vec)
                .or(copied)
                .unwrap_or_else(|| {
                    let decl = StyleDeclaration::from_style(&self.cursor_style(from));
                    vec![decl; inserted.len()]
                });
            let line_len = if end > start {
                from.char + old_lens.get(to.line).map_or(0, |len| len.saturating_sub(to.char))
            } else {
                old_lens.get(from.line).copied().unwrap_or(0)
            };
            self.styles.insert_block(from, &inserted, Some(copied.as_slice()), line_len);
        }

        let text = next.concat();
        let reaches_end = end == old.len();
        if reaches_end && !(edit.is_paste() && !inserted.is_empty()) {
            let lens: Vec<usize> = split_logical_lines(&text).iter().map(Vec::len).collect();
            let repaired = self.styles.repair(&lens, edit.inserted());
            trace!(repaired, "integrity pass");
        }

        let caret = start + inserted.len();
        let composition = edit.is_composition().then_some(start..caret);
        self.commit(text, composition, caret..caret);
    }

    fn commit(&mut self, text: String, composition: Option<Range<usize>>, selection: Range<usize>) {
        self.text = text;
        self.composition = composition;
        self.selection = selection;
        self.relayout();
    }

    /// Diff a host input snapshot against the text and apply it.
    ///
    /// Returns whether anything changed. The selection follows the host's.
    pub fn apply_input(&mut self, input: &TextInput) -> bool {
        let old = graphemes(&self.text);
        let Some(edit) = Edit::from_input(&old, self.selection.clone(), input) else {
            return false;
        };
        self.apply_edit(&edit);
        if !edit.is_composition() {
            self.set_selection(input.selection_start, input.selection_end);
        }
        true
    }

    // ── Hit-testing ──────────────────────────────────────────────────────

    /// Flat selection index under an object-local pointer.
    pub fn selection_index_at_pointer(&mut self, point: Point) -> usize {
        let query = PointerQuery::new(point, self.width)
            .scale(self.scale_x, self.scale_y)
            .flip_x(self.flip_x);
        self.measured(|layout, glyphs| layout.selection_index_at_pointer(&query, glyphs))
    }

    /// Offsets of the cursor at the selection start.
    pub fn cursor_offsets(&mut self) -> CursorOffsets {
        let flat = self.selection.start;
        self.measured(|layout, glyphs| layout.cursor_offsets(flat, glyphs))
    }

    // ── Painting ─────────────────────────────────────────────────────────

    fn with_frame<R>(&mut self, f: impl FnOnce(&TextFrame<'_>, &DecorationConfig) -> R) -> R {
        self.measured(|layout, glyphs| layout.measure_all(glyphs));
        let records = self.layout.records().unwrap_or_default();
        let frame = TextFrame {
            lines: self.layout.lines(),
            records: &records,
            map: self.layout.map(),
            base: &self.base,
            width: self.width,
            height: self.height,
            line_height: self.config.line_height,
            spacing: self.config.spacing_width(self.base.font_size),
            cursor_width: self.config.cursor_width,
        };
        f(&frame, &self.decoration)
    }

    pub fn render_background<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.with_frame(|frame, config| tate_render::render_background(surface, frame, config));
    }

    pub fn render_text<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.with_frame(|frame, _| tate_render::render_text(surface, frame));
    }

    pub fn render_decoration<S: Surface + ?Sized>(&mut self, surface: &mut S, kind: DecorationKind) {
        self.with_frame(|frame, config| {
            tate_render::render_decoration(surface, frame, kind, config);
        });
    }

    /// Highlight the current selection.
    pub fn render_selection<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let range = self.selection.clone();
        self.with_frame(|frame, config| {
            tate_render::render_selection(surface, frame, range, false, config);
        });
    }

    /// Paint the cursor at the selection start.
    ///
    /// `zoom` is the canvas zoom; the bar keeps its on-screen thickness.
    pub fn render_cursor<S: Surface + ?Sized>(&mut self, surface: &mut S, opacity: f64, zoom: f64) {
        let cursor = CursorState::new(self.selection.start)
            .opacity(opacity)
            .scale(self.scale_x * zoom)
            .composition(self.composition.clone());
        self.with_frame(|frame, config| tate_render::render_cursor(surface, frame, &cursor, config));
    }

    /// Paint backgrounds, glyphs and every decoration, in that order.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.render_background(surface);
        self.render_text(surface);
        for kind in [
            DecorationKind::Underline,
            DecorationKind::Linethrough,
            DecorationKind::Overline,
        ] {
            self.render_decoration(surface, kind);
        }
    }

    /// Selection highlight when something is selected, the cursor otherwise.
    pub fn render_editing<S: Surface + ?Sized>(&mut self, surface: &mut S, opacity: f64, zoom: f64) {
        if self.selection.is_empty() {
            self.render_cursor(surface, opacity, zoom);
        } else {
            self.render_selection(surface);
        }
    }
}
