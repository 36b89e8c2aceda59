#![forbid(unsafe_code)]

//! Layout configuration.

/// Default line height multiplier.
pub const DEFAULT_LINE_HEIGHT: f64 = 1.16;

/// Ratio between a font's nominal size and its line box.
pub const FONT_SIZE_MULT: f64 = 1.13;

/// Extra advance given to `,` and `@` when measured upright.
pub const SPECIAL_SYMBOL_BONUS: f64 = 3.0;

/// Default cursor thickness in object units.
pub const DEFAULT_CURSOR_WIDTH: f64 = 2.0;

/// Tunables for wrapping and measuring vertical text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Wrap at any grapheme instead of at spaces.
    pub split_by_grapheme: bool,
    /// Line height multiplier applied to each column.
    pub line_height: f64,
    /// Font size to line box ratio.
    pub font_size_mult: f64,
    /// Extra space between graphemes, in thousandths of an em.
    pub char_spacing: f64,
    /// Cursor thickness, reserved at the end of the longest column.
    pub cursor_width: f64,
    /// See [`SPECIAL_SYMBOL_BONUS`].
    pub special_symbol_bonus: f64,
}

impl LayoutConfig {
    /// Default configuration: grapheme wrapping, no extra spacing.
    #[must_use]
    pub fn new() -> Self {
        Self {
            split_by_grapheme: true,
            line_height: DEFAULT_LINE_HEIGHT,
            font_size_mult: FONT_SIZE_MULT,
            char_spacing: 0.0,
            cursor_width: DEFAULT_CURSOR_WIDTH,
            special_symbol_bonus: SPECIAL_SYMBOL_BONUS,
        }
    }

    #[must_use]
    pub fn split_by_grapheme(mut self, split: bool) -> Self {
        self.split_by_grapheme = split;
        self
    }

    #[must_use]
    pub fn line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    #[must_use]
    pub fn char_spacing(mut self, spacing: f64) -> Self {
        self.char_spacing = spacing;
        self
    }

    #[must_use]
    pub fn cursor_width(mut self, width: f64) -> Self {
        self.cursor_width = width;
        self
    }

    #[must_use]
    pub fn special_symbol_bonus(mut self, bonus: f64) -> Self {
        self.special_symbol_bonus = bonus;
        self
    }

    /// Char spacing in object units for a font of `font_size`.
    #[inline]
    #[must_use]
    pub fn spacing_width(&self, font_size: f64) -> f64 {
        font_size * self.char_spacing / 1000.0
    }

    /// Column thickness for a line whose largest font is `max_font_size`.
    #[inline]
    #[must_use]
    pub fn line_extent(&self, max_font_size: f64) -> f64 {
        max_font_size * self.line_height * self.font_size_mult
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}
