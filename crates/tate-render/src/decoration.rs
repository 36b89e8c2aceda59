#![forbid(unsafe_code)]

//! Underline, strikethrough and overline.
//!
//! A column is scanned for runs of characters sharing decoration flag,
//! fill, font size and baseline shift. Strikethrough and overline runs are
//! painted as they close. Underline runs of every column are collected
//! first and merged: consecutive runs whose vertical extents touch form a
//! *sector*, painted as one continuous stroke of a single thickness and
//! horizontal position so a font size change does not break the line.
//!
//! ```text
//!  size 40 │      merged sector:
//!  size 60 │  ──▶ one x, one thickness,
//!  size 40 │      each stroke starting where the previous ended
//! ```

use tate_core::{Rect, Rgba, Surface, is_almost_equal};
use tate_style::{DecorationKind, TextStyle};
use tracing::trace;

use crate::config::DecorationConfig;
use crate::frame::TextFrame;

/// One closed underline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnderlineRecord {
    /// Unmerged stroke position.
    pub x: f64,
    pub y: f64,
    /// Largest font size seen on the column so far.
    pub size: f64,
    /// Run length down the column.
    pub height: f64,
    pub color: Rgba,
}

impl UnderlineRecord {
    #[inline]
    #[must_use]
    pub fn end(&self) -> f64 {
        self.y + self.height
    }
}

/// Key deciding where a decoration run breaks.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RunKey {
    on: bool,
    fill: Rgba,
    size: f64,
    delta_y: f64,
}

impl RunKey {
    fn of(style: &TextStyle, kind: DecorationKind) -> Self {
        Self {
            on: style.decoration(kind),
            fill: style.fill,
            size: style.font_size,
            delta_y: style.delta_y,
        }
    }
}

/// A closed run on one column.
#[derive(Debug, Clone, Copy)]
struct Run {
    key: RunKey,
    top: f64,
    length: f64,
    max_size: f64,
}

fn column_runs(frame: &TextFrame<'_>, line: usize, kind: DecorationKind) -> Vec<Run> {
    let boxes = frame.boxes(line);
    let styles = frame.styles(line);
    let Some(first) = styles.first() else {
        return Vec::new();
    };
    let mut runs = Vec::new();
    let mut key = RunKey::of(first, kind);
    let mut top = boxes[0].top;
    let mut length = 0.0;
    let mut width = 0.0;
    let mut max_size = 0.0_f64;

    for (b, style) in boxes.iter().zip(styles) {
        let current = RunKey::of(style, kind);
        max_size = max_size.max(current.size);
        if !key.on {
            top = b.top;
        }
        if current != key && width > 0.0 {
            if key.on {
                runs.push(Run {
                    key,
                    top,
                    length,
                    max_size,
                });
            }
            key = current;
            top = b.top;
            length = b.advance();
            width = b.width;
        } else {
            length += b.kerned_advance();
            width += b.kerned_width;
        }
    }
    if key.on {
        runs.push(Run {
            key,
            top,
            length,
            max_size,
        });
    }
    runs
}

/// Paint one decoration kind over every column.
pub fn render_decoration<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &TextFrame<'_>,
    kind: DecorationKind,
    config: &DecorationConfig,
) {
    let offset = config.offset(kind);
    let mut underlines = Vec::new();
    surface.save();
    for line in 0..frame.records.len() {
        let right = frame.column_right(line, config.edge_inset);
        for run in column_runs(frame, line, kind) {
            let x = right - run.key.size * offset;
            let y = frame.top() + run.top;
            match kind {
                DecorationKind::Underline => underlines.push(UnderlineRecord {
                    x,
                    y,
                    size: run.max_size,
                    height: run.length,
                    color: run.key.fill,
                }),
                DecorationKind::Linethrough | DecorationKind::Overline => {
                    let thickness = frame.base.font_size / config.thickness_divisor;
                    surface.set_fill_style(run.key.fill);
                    surface.fill_rect(Rect::new(x, y, thickness, run.length));
                }
            }
        }
    }
    if !underlines.is_empty() {
        paint_underlines(surface, &underlines, config);
    }
    surface.restore();
}

/// Group records into sectors of touching runs.
#[must_use]
pub fn underline_sectors(records: &[UnderlineRecord]) -> Vec<&[UnderlineRecord]> {
    records
        .chunk_by(|a, b| is_almost_equal(a.end(), b.y))
        .collect()
}

/// Thickness of a merged sector: the size-weighted average font size over
/// the divisor, clamped.
#[must_use]
pub fn sector_thickness(sector: &[UnderlineRecord], config: &DecorationConfig) -> f64 {
    let mut weighted = 0.0;
    let mut count = 0.0;
    let mut max_size = 0.0_f64;
    for r in sector.iter().filter(|r| r.size > 0.0) {
        let chars = r.height / r.size;
        let bias = (r.size / config.bias_divisor).max(1.0);
        weighted += r.size * chars.floor() * bias;
        count += chars * bias;
        max_size = max_size.max(r.size);
    }
    let average = if count > 0.0 {
        weighted / count
    } else {
        max_size
    };
    config.underline_thickness(average)
}

/// Paint underline records, merging touching runs.
pub fn paint_underlines<S: Surface + ?Sized>(
    surface: &mut S,
    records: &[UnderlineRecord],
    config: &DecorationConfig,
) {
    let sectors = underline_sectors(records);
    trace!(records = records.len(), sectors = sectors.len(), "underline sectors");
    for sector in sectors {
        if let [record] = sector {
            let thickness = config.underline_thickness(record.size);
            let x = (record.x + config.underline_right_margin).round();
            surface.set_fill_style(record.color);
            surface.fill_rect(Rect::new(x - thickness, record.y, thickness, record.height));
            continue;
        }
        let thickness = sector_thickness(sector, config);
        let max_x = sector.iter().map(|r| r.x).fold(f64::NEG_INFINITY, f64::max);
        let x = (max_x + config.underline_right_margin).round();
        let mut y = sector[0].y;
        for record in sector {
            surface.set_fill_style(record.color);
            surface.fill_rect(Rect::new(x - thickness, y, thickness, record.height));
            y += record.height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FrameFixture;
    use tate_core::RecordingSurface;
    use tate_style::StyleDeclaration;

    fn record(x: f64, y: f64, size: f64, height: f64) -> UnderlineRecord {
        UnderlineRecord {
            x,
            y,
            size,
            height,
            color: Rgba::BLACK,
        }
    }

    #[test]
    fn touching_records_share_a_sector() {
        let records = [
            record(0.0, 0.0, 40.0, 40.0),
            record(0.0, 40.00001, 40.0, 40.0),
            record(0.0, 200.0, 40.0, 40.0),
        ];
        let sectors = underline_sectors(&records);
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].len(), 2);
    }

    #[test]
    fn lone_record_uses_its_own_size() {
        let mut surface = RecordingSurface::new();
        paint_underlines(&mut surface, &[record(10.3, 5.0, 30.0, 60.0)], &DecorationConfig::new());
        let (rect, _) = surface.filled_rects().next().expect("stroke");
        assert_eq!(rect.width, 2.0);
        assert_eq!(rect.x, 12.0 - 2.0);
        assert_eq!(rect.y, 5.0);
    }

    #[test]
    fn thickness_is_clamped() {
        let config = DecorationConfig::new();
        assert_eq!(sector_thickness(&[record(0.0, 0.0, 6.0, 12.0)], &config), 1.0);
        assert_eq!(sector_thickness(&[record(0.0, 0.0, 300.0, 300.0)], &config), 5.0);
        assert_eq!(sector_thickness(&[record(0.0, 0.0, 40.0, 20.0)], &config), 1.0);
    }

    #[test]
    fn strikethrough_runs_break_on_fill() {
        let mut fx = FrameFixture::new("字字字");
        fx.style(0, 0..2, StyleDeclaration::new().linethrough(true));
        fx.style(
            0,
            2..3,
            StyleDeclaration::new()
                .linethrough(true)
                .fill(Rgba::rgb(255, 0, 0)),
        );
        let mut surface = RecordingSurface::new();
        let right = fx.with_frame(|frame| {
            render_decoration(&mut surface, frame, DecorationKind::Linethrough, &DecorationConfig::new());
            frame.column_right(0, 1.0)
        });
        let rects: Vec<_> = surface.filled_rects().collect();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].0.height, 80.0);
        assert_eq!(rects[1].0.height, 40.0);
        assert_eq!(rects[1].1, Rgba::rgb(255, 0, 0));
        assert!((rects[0].0.x - (right - 40.0 * 0.65)).abs() < 1e-9);
        assert!((rects[0].0.width - 40.0 / 15.0).abs() < 1e-9);
        assert!(surface.is_balanced());
    }

    #[test]
    fn undecorated_text_paints_nothing() {
        let fx = FrameFixture::new("abc字");
        let mut surface = RecordingSurface::new();
        fx.with_frame(|frame| {
            render_decoration(&mut surface, frame, DecorationKind::Overline, &DecorationConfig::new());
        });
        assert_eq!(surface.filled_rects().count(), 0);
    }

    #[test]
    fn font_size_change_inside_an_underline_merges() {
        let mut fx = FrameFixture::new("字字字");
        fx.style(0, 0..1, StyleDeclaration::new().underline(true));
        fx.style(0, 1..2, StyleDeclaration::new().underline(true).font_size(60.0));
        fx.style(0, 2..3, StyleDeclaration::new().underline(true));
        let mut surface = RecordingSurface::new();
        fx.with_frame(|frame| {
            render_decoration(&mut surface, frame, DecorationKind::Underline, &DecorationConfig::new());
        });
        let rects: Vec<_> = surface.filled_rects().map(|(r, _)| r).collect();
        assert_eq!(rects.len(), 3);
        assert!(rects.iter().all(|r| r.x == rects[0].x && r.width == rects[0].width));
        assert_eq!(rects[1].y, rects[0].bottom());
        assert_eq!(rects[2].y, rects[1].bottom());
    }

    #[test]
    fn underline_stepping_across_three_columns_is_one_stroke() {
        // Three columns of three glyphs; the underline moves one glyph down
        // per column, so each run starts where the previous one ended.
        let mut fx = FrameFixture::new("字字字字字字字字字").column_height(120.0);
        for flat in [0, 4, 8] {
            fx.style(0, flat..flat + 1, StyleDeclaration::new().underline(true));
        }
        let config = DecorationConfig::new();
        let mut surface = RecordingSurface::new();
        let (lines, right, top) = fx.with_frame(|frame| {
            render_decoration(&mut surface, frame, DecorationKind::Underline, &config);
            (frame.lines.len(), frame.column_right(0, config.edge_inset), frame.top())
        });
        assert_eq!(lines, 3);

        let rects: Vec<_> = surface.filled_rects().map(|(r, _)| r).collect();
        assert_eq!(rects.len(), 3);
        let x = (right - 40.0 * config.underline_offset + config.underline_right_margin).round();
        for rect in &rects {
            assert!((rect.right() - x).abs() < 1e-9);
            assert!((rect.width - 40.0 / 15.0).abs() < 1e-9);
            assert_eq!(rect.height, 40.0);
        }
        assert_eq!(rects[0].y, top);
        assert_eq!(rects[1].y, rects[0].bottom());
        assert_eq!(rects[2].y, rects[1].bottom());
        assert!(surface.is_balanced());
    }
}
