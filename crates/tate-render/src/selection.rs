#![forbid(unsafe_code)]

//! Selection and composition highlight.

use std::ops::Range;

use tate_core::{Rect, Surface};

use crate::config::DecorationConfig;
use crate::frame::TextFrame;

/// Length painted for a fully covered empty column.
pub const EMPTY_LINE_SELECTION: f64 = 5.0;

/// Paint the highlight of flat `range`, one rect per covered column.
///
/// `composing` switches to the composition color.
pub fn render_selection<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &TextFrame<'_>,
    range: Range<usize>,
    composing: bool,
    config: &DecorationConfig,
) {
    if range.is_empty() && !composing {
        return;
    }
    let (start_line, start_char) = frame.map.location_of(range.start);
    let (end_line, end_char) = frame.map.location_of(range.end);
    let color = if composing {
        config.composition_color
    } else {
        config.selection_color
    };

    surface.save();
    surface.set_fill_style(color);
    for line in start_line..=end_line.min(frame.records.len().saturating_sub(1)) {
        let box_start = if line == start_line {
            frame.char_top(line, start_char)
        } else {
            0.0
        };
        let box_end = if line < end_line {
            if config.justify && !frame.map.is_end_of_wrapping(line) {
                frame.height
            } else {
                let length = frame.records[line].length(frame.spacing);
                if length > 0.0 { length } else { EMPTY_LINE_SELECTION }
            }
        } else if end_char == 0 {
            frame.char_top(line, 0)
        } else {
            frame
                .boxes(line)
                .get(end_char - 1)
                .map_or(0.0, |prev| prev.top - frame.spacing + prev.advance())
        };

        let mut draw_width = frame.extent(line);
        if frame.line_height < 1.0 || (line == end_line && frame.line_height > 1.0) {
            draw_width /= frame.line_height;
        }
        let x = frame.column_right(line, config.edge_inset) - draw_width;
        surface.fill_rect(Rect::new(
            x,
            frame.top() + box_start,
            draw_width,
            box_end - box_start,
        ));
    }
    surface.restore();
}
