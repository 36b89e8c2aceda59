#![forbid(unsafe_code)]

//! Glyph painting.
//!
//! CJK characters stand upright, one `fill_text` each, centred in their
//! column. Brackets and the prolonged sound mark are turned a quarter turn
//! counter-clockwise, `。` and `、` half a turn so they land in the top
//! right of their cell, and slashes are raised. Consecutive Latin
//! characters with unchanged glyph style are painted as one string turned
//! a quarter turn clockwise, so words read top to bottom.
//!
//! Text is anchored at the left end of its baseline.

use std::f64::consts::{FRAC_PI_2, PI};

use tate_core::Surface;
use tate_style::TextStyle;
use tate_text::GlyphRotation;
use tate_text::config::FONT_SIZE_MULT;
use tate_text::script::{is_latin, rotation};

use crate::frame::TextFrame;

/// Share of the box height slashes are raised by.
pub const RAISED_SHIFT: f64 = 0.18;

fn paint<S: Surface + ?Sized>(surface: &mut S, style: &TextStyle, text: &str, x: f64, y: f64) {
    surface.set_font(&style.css_font());
    surface.set_fill_style(style.fill);
    surface.fill_text(text, x, y + style.delta_y);
}

fn paint_cjk<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &TextFrame<'_>,
    line: usize,
    index: usize,
    right: f64,
) {
    let (Some(grapheme), Some(b), Some(style)) = (
        frame.lines.get(line).and_then(|l| l.get(index)),
        frame.boxes(line).get(index),
        frame.styles(line).get(index),
    ) else {
        return;
    };
    let mut left = right - (frame.glyph_extent(line) + b.width) / 2.0;
    let mut top = frame.top() + b.top + b.height / frame.line_height;

    surface.save();
    match rotation(grapheme) {
        turn @ (GlyphRotation::QuarterTurn | GlyphRotation::HalfTurn) => {
            let shift = frame.line_height * FONT_SIZE_MULT;
            top += shift;
            left -= shift;
            let tx = left - b.width / 2.0;
            let ty = top - b.height / 2.0;
            surface.translate(tx, ty);
            if turn == GlyphRotation::HalfTurn {
                surface.rotate(-PI);
                surface.translate(-tx, -ty - b.height / 4.0);
            } else {
                surface.rotate(-FRAC_PI_2);
                surface.translate(-tx, -ty);
            }
        }
        GlyphRotation::Raised => surface.translate(0.0, -b.height * RAISED_SHIFT),
        GlyphRotation::Upright => {}
    }
    paint(surface, style, grapheme, left, top);
    surface.restore();
}

fn paint_latin<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &TextFrame<'_>,
    line: usize,
    start: usize,
    end: usize,
    right: f64,
) {
    let (Some(graphemes), Some(boxes), Some(style)) = (
        frame.lines.get(line).and_then(|l| l.get(start..=end)),
        frame.boxes(line).get(start..=end),
        frame.styles(line).get(start),
    ) else {
        return;
    };
    let first = boxes[0];
    let text = graphemes.concat();
    let draw_width: f64 = boxes.iter().map(|b| b.width).sum();
    let left = right - (draw_width + frame.glyph_extent(line)) / 2.0;
    let top = frame.top() + first.top + draw_width / 2.0;

    let tx = left + draw_width / 2.0 - first.height / 8.0;
    let ty = top - first.height / 8.0;
    surface.save();
    surface.translate(tx, ty);
    surface.rotate(FRAC_PI_2);
    surface.translate(-tx, -ty);
    paint(surface, style, &text, left, top);
    surface.restore();
}

/// Paint every glyph of the frame.
pub fn render_text<S: Surface + ?Sized>(surface: &mut S, frame: &TextFrame<'_>) {
    surface.save();
    for (line, graphemes) in frame.lines.iter().enumerate() {
        let right = frame.column_right(line, 0.0);
        let styles = frame.styles(line);
        let mut i = 0;
        while i < graphemes.len() {
            if !is_latin(&graphemes[i]) {
                paint_cjk(surface, frame, line, i, right);
                i += 1;
                continue;
            }
            let mut end = i;
            while end + 1 < graphemes.len()
                && is_latin(&graphemes[end + 1])
                && !styles
                    .get(end)
                    .zip(styles.get(end + 1))
                    .is_some_and(|(a, b)| a.glyphs_differ(b))
            {
                end += 1;
            }
            paint_latin(surface, frame, line, i, end, right);
            i = end + 1;
        }
    }
    surface.restore();
}
