#![forbid(unsafe_code)]

//! Paint tunables.

use tate_core::Rgba;
use tate_style::DecorationKind;

/// Underline offset from the column's right edge, in font sizes.
pub const UNDERLINE_OFFSET: f64 = 0.05;
/// Strikethrough offset, in font sizes.
pub const LINETHROUGH_OFFSET: f64 = 0.65;
/// Overline offset, in font sizes.
pub const OVERLINE_OFFSET: f64 = 1.10;
/// Decoration thickness is font size over this.
pub const THICKNESS_DIVISOR: f64 = 15.0;
pub const MIN_UNDERLINE_THICKNESS: f64 = 1.0;
pub const MAX_UNDERLINE_THICKNESS: f64 = 5.0;
/// Gap between merged underlines and the glyphs.
pub const UNDERLINE_RIGHT_MARGIN: f64 = 2.0;
/// Font sizes above this weigh more in the merged underline thickness.
pub const UNDERLINE_BIAS_DIVISOR: f64 = 50.0;
/// Keeps decorations inside the object's control bounds.
pub const EDGE_INSET: f64 = 1.0;

pub const SELECTION_COLOR: Rgba = Rgba::rgba(17, 119, 255, 77);
pub const COMPOSITION_COLOR: Rgba = Rgba::rgba(0, 0, 0, 51);

/// Paint configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationConfig {
    pub underline_offset: f64,
    pub linethrough_offset: f64,
    pub overline_offset: f64,
    pub thickness_divisor: f64,
    pub min_thickness: f64,
    pub max_thickness: f64,
    pub underline_right_margin: f64,
    pub bias_divisor: f64,
    pub edge_inset: f64,
    pub selection_color: Rgba,
    pub composition_color: Rgba,
    /// Fixed cursor color; the character's fill when unset.
    pub cursor_color: Option<Rgba>,
    /// Justified text: wrapped selections extend to the full column.
    pub justify: bool,
}

impl DecorationConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            underline_offset: UNDERLINE_OFFSET,
            linethrough_offset: LINETHROUGH_OFFSET,
            overline_offset: OVERLINE_OFFSET,
            thickness_divisor: THICKNESS_DIVISOR,
            min_thickness: MIN_UNDERLINE_THICKNESS,
            max_thickness: MAX_UNDERLINE_THICKNESS,
            underline_right_margin: UNDERLINE_RIGHT_MARGIN,
            bias_divisor: UNDERLINE_BIAS_DIVISOR,
            edge_inset: EDGE_INSET,
            selection_color: SELECTION_COLOR,
            composition_color: COMPOSITION_COLOR,
            cursor_color: None,
            justify: false,
        }
    }

    #[must_use]
    pub const fn selection_color(mut self, color: Rgba) -> Self {
        self.selection_color = color;
        self
    }

    #[must_use]
    pub const fn composition_color(mut self, color: Rgba) -> Self {
        self.composition_color = color;
        self
    }

    #[must_use]
    pub const fn cursor_color(mut self, color: Option<Rgba>) -> Self {
        self.cursor_color = color;
        self
    }

    #[must_use]
    pub const fn justify(mut self, justify: bool) -> Self {
        self.justify = justify;
        self
    }

    #[must_use]
    pub const fn edge_inset(mut self, inset: f64) -> Self {
        self.edge_inset = inset;
        self
    }

    /// Offset of a decoration from the column edge, in font sizes.
    #[must_use]
    pub const fn offset(&self, kind: DecorationKind) -> f64 {
        match kind {
            DecorationKind::Underline => self.underline_offset,
            DecorationKind::Linethrough => self.linethrough_offset,
            DecorationKind::Overline => self.overline_offset,
        }
    }

    /// Underline thickness for an (average) font size.
    #[must_use]
    pub fn underline_thickness(&self, size: f64) -> f64 {
        (size / self.thickness_divisor).clamp(self.min_thickness, self.max_thickness)
    }
}

impl Default for DecorationConfig {
    fn default() -> Self {
        Self::new()
    }
}
