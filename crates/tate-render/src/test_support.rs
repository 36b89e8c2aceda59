//! Layout fixtures shared by the painter tests.

use std::ops::Range;

use tate_style::{LogicalPosition, StyleDeclaration, StyleRuns, TextStyle};
use tate_text::{FixedMeasurer, LayoutConfig, MeasureCache, StyledGlyphs, TextLayout};

use crate::frame::TextFrame;

pub(crate) struct FrameFixture {
    text: String,
    runs: StyleRuns,
    base: TextStyle,
    config: LayoutConfig,
    column_height: f64,
}

impl FrameFixture {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            runs: StyleRuns::new(),
            base: TextStyle::default(),
            config: LayoutConfig::new(),
            column_height: 1000.0,
        }
    }

    pub(crate) fn column_height(mut self, height: f64) -> Self {
        self.column_height = height;
        self
    }

    pub(crate) fn config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn style(&mut self, line: usize, chars: Range<usize>, decl: StyleDeclaration) {
        for char in chars {
            self.runs.set(LogicalPosition::new(line, char), decl.clone());
        }
    }

    pub(crate) fn with_frame<R>(&self, f: impl FnOnce(&TextFrame<'_>) -> R) -> R {
        let mut cache = MeasureCache::new(FixedMeasurer::new());
        let mut layout = TextLayout::new(self.config);
        let mut glyphs = StyledGlyphs::new(&self.runs, &self.base, &mut cache, &self.config);
        layout.relayout(&self.text, self.column_height, &mut glyphs);
        let width = layout.text_width(&mut glyphs);
        let spacing = glyphs.spacing();
        let records = layout.records().unwrap_or_default();
        let frame = TextFrame {
            lines: layout.lines(),
            records: &records,
            map: layout.map(),
            base: &self.base,
            width,
            height: self.column_height,
            line_height: self.config.line_height,
            spacing,
            cursor_width: self.config.cursor_width,
        };
        f(&frame)
    }
}
