#![forbid(unsafe_code)]

//! Text background bands.

use tate_core::{Rect, Rgba, Surface};

use crate::config::DecorationConfig;
use crate::frame::TextFrame;

/// Paint `textBackgroundColor` runs.
///
/// Each run of equal background color on a column becomes one band, as
/// wide as the column's glyph extent and flush with its right edge.
pub fn render_background<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &TextFrame<'_>,
    config: &DecorationConfig,
) {
    surface.save();
    for line in 0..frame.records.len() {
        let styles = frame.styles(line);
        if !styles.iter().any(|s| s.background().is_some()) {
            continue;
        }
        let boxes = frame.boxes(line);
        let band = frame.glyph_extent(line);
        let x = frame.column_right(line, config.edge_inset) - band;
        let fill = |surface: &mut S, color: Option<Rgba>, top: f64, length: f64| {
            if let Some(color) = color {
                surface.set_fill_style(color);
                surface.fill_rect(Rect::new(x, frame.top() + top, band, length));
            }
        };

        let mut last = styles[0].background();
        let mut top = boxes[0].top;
        let mut length = 0.0;
        for (b, style) in boxes.iter().zip(styles) {
            let current = style.background();
            if current == last {
                length += b.kerned_advance();
            } else {
                fill(surface, last, top, length);
                last = current;
                top = b.top;
                length = b.advance();
            }
        }
        fill(surface, last, top, length);
    }
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FrameFixture;
    use tate_core::RecordingSurface;
    use tate_style::StyleDeclaration;

    const RED: Rgba = Rgba::rgb(255, 0, 0);
    const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    #[test]
    fn runs_of_equal_color_share_a_band() {
        let mut fx = FrameFixture::new("字字字字");
        fx.style(0, 0..2, StyleDeclaration::new().background(RED));
        fx.style(0, 2..3, StyleDeclaration::new().background(BLUE));
        let mut surface = RecordingSurface::new();
        fx.with_frame(|frame| render_background(&mut surface, frame, &DecorationConfig::new()));

        let rects: Vec<_> = surface.filled_rects().collect();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].1, RED);
        assert_eq!(rects[0].0.height, 80.0);
        assert_eq!(rects[1].1, BLUE);
        assert_eq!(rects[1].0.y, rects[0].0.y + 80.0);
        assert_eq!(rects[1].0.height, 40.0);
        assert!(surface.is_balanced());
    }

    #[test]
    fn band_hugs_the_right_edge_of_the_column() {
        let mut fx = FrameFixture::new("字");
        fx.style(0, 0..1, StyleDeclaration::new().background(RED));
        let mut surface = RecordingSurface::new();
        let (width, extent) = fx.with_frame(|frame| {
            render_background(&mut surface, frame, &DecorationConfig::new());
            (frame.width, frame.glyph_extent(0))
        });
        let (rect, _) = surface.filled_rects().next().expect("band");
        assert!((rect.right() - (width / 2.0 - 1.0)).abs() < 1e-9);
        assert!((rect.width - extent).abs() < 1e-9);
    }

    #[test]
    fn transparent_backgrounds_paint_nothing() {
        let mut fx = FrameFixture::new("字字");
        fx.style(0, 0..2, StyleDeclaration::new().background(Rgba::TRANSPARENT));
        let mut surface = RecordingSurface::new();
        fx.with_frame(|frame| render_background(&mut surface, frame, &DecorationConfig::new()));
        assert_eq!(surface.filled_rects().count(), 0);
    }
}
