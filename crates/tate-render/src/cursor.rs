#![forbid(unsafe_code)]

//! Insertion cursor.

use std::ops::Range;

use tate_core::{Rect, Surface};
use tate_text::hit_test::cursor_offsets;

use crate::config::DecorationConfig;
use crate::frame::TextFrame;
use crate::selection::render_selection;

/// Cursor paint parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorState {
    /// Flat cursor index.
    pub position: usize,
    /// Blink opacity, `0.0..=1.0`.
    pub opacity: f64,
    /// Object scale times canvas zoom; keeps the bar thickness constant on
    /// screen.
    pub scale: f64,
    /// Active IME composition range, highlighted under the cursor.
    pub composition: Option<Range<usize>>,
}

impl CursorState {
    #[must_use]
    pub fn new(position: usize) -> Self {
        Self {
            position,
            opacity: 1.0,
            scale: 1.0,
            composition: None,
        }
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn composition(mut self, range: Option<Range<usize>>) -> Self {
        self.composition = range;
        self
    }
}

/// Paint the cursor: a bar across the column, as wide as the font size of
/// the character before it.
pub fn render_cursor<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &TextFrame<'_>,
    cursor: &CursorState,
    config: &DecorationConfig,
) {
    if let Some(range) = &cursor.composition {
        render_selection(surface, frame, range.clone(), true, config);
    }
    let (line, char) = frame.map.location_of(cursor.position);
    let index = char.saturating_sub(1);
    let style = frame.styles(line).get(index).unwrap_or(frame.base);
    let box_height = frame
        .boxes(line)
        .get(index)
        .map_or(style.font_size, |b| b.height);
    let offsets = cursor_offsets(cursor.position, frame.records, frame.map, frame.spacing);
    let scale = if cursor.scale > 0.0 { cursor.scale } else { 1.0 };

    let x = frame.column_right(line, 0.0) - (frame.glyph_extent(line) + box_height) / 2.0;
    let y = frame.top() + offsets.top;
    surface.save();
    surface.set_fill_style(config.cursor_color.unwrap_or(style.fill));
    surface.set_global_alpha(cursor.opacity.clamp(0.0, 1.0));
    surface.fill_rect(Rect::new(x, y, style.font_size, frame.cursor_width / scale));
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FrameFixture;
    use tate_core::{DrawCommand, RecordingSurface, Rgba};
    use tate_style::StyleDeclaration;

    #[test]
    fn bar_sits_below_the_previous_char() {
        let fx = FrameFixture::new("字字");
        let mut surface = RecordingSurface::new();
        fx.with_frame(|frame| {
            render_cursor(&mut surface, frame, &CursorState::new(1), &DecorationConfig::new());
        });
        let (rect, color) = surface.filled_rects().next().expect("cursor");
        assert_eq!(rect.y, -500.0 + 40.0);
        assert_eq!(rect.width, 40.0);
        assert_eq!(rect.height, 2.0);
        assert_eq!(color, Rgba::BLACK);
    }

    #[test]
    fn color_follows_the_char_fill_and_alpha_the_blink() {
        let mut fx = FrameFixture::new("字字");
        fx.style(0, 0..1, StyleDeclaration::new().fill(Rgba::rgb(0, 128, 0)).font_size(20.0));
        let mut surface = RecordingSurface::new();
        fx.with_frame(|frame| {
            let cursor = CursorState::new(1).opacity(0.5).scale(2.0);
            render_cursor(&mut surface, frame, &cursor, &DecorationConfig::new());
        });
        let (rect, color) = surface.filled_rects().next().expect("cursor");
        assert_eq!(color, Rgba::rgb(0, 128, 0));
        assert_eq!(rect.width, 20.0);
        assert_eq!(rect.height, 1.0);
        assert!(surface.commands().contains(&DrawCommand::GlobalAlpha(0.5)));
        assert!(surface.is_balanced());
    }

    #[test]
    fn composition_is_highlighted_under_the_cursor() {
        let fx = FrameFixture::new("字字");
        let mut surface = RecordingSurface::new();
        let config = DecorationConfig::new().cursor_color(Some(Rgba::WHITE));
        fx.with_frame(|frame| {
            let cursor = CursorState::new(2).composition(Some(0..2));
            render_cursor(&mut surface, frame, &cursor, &config);
        });
        let colors: Vec<_> = surface.filled_rects().map(|(_, c)| c).collect();
        assert_eq!(colors, vec![config.composition_color, Rgba::WHITE]);
    }
}
