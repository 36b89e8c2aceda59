#![forbid(unsafe_code)]

//! Drawing surface abstraction.
//!
//! [`Surface`] is the narrow slice of a 2D canvas context the renderers
//! need: state save/restore, fill style, rectangles, affine transforms and
//! text. Renderers only issue draw calls through it; they never read back.
//!
//! [`RecordingSurface`] captures every call as a [`DrawCommand`], which
//! makes render output assertable in tests and replayable by hosts that
//! batch their drawing.

use crate::color::Rgba;
use crate::geometry::Rect;

/// A 2D drawing context.
pub trait Surface {
    /// Push the current transform, fill style, alpha and font.
    fn save(&mut self);
    /// Pop the state pushed by the matching [`save`](Self::save).
    fn restore(&mut self);
    /// Set the color used by subsequent fills.
    fn set_fill_style(&mut self, color: Rgba);
    /// Set the global alpha applied to subsequent fills.
    fn set_global_alpha(&mut self, alpha: f64);
    /// Fill a rectangle with the current fill style.
    fn fill_rect(&mut self, rect: Rect);
    /// Translate the current transform.
    fn translate(&mut self, dx: f64, dy: f64);
    /// Rotate the current transform clockwise by `radians`.
    fn rotate(&mut self, radians: f64);
    /// Set the CSS font used by subsequent text calls.
    fn set_font(&mut self, font: &str);
    /// Draw text with its anchor at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Save,
    Restore,
    FillStyle(Rgba),
    GlobalAlpha(f64),
    FillRect { rect: Rect, color: Rgba },
    Translate { dx: f64, dy: f64 },
    Rotate(f64),
    Font(String),
    FillText { text: String, x: f64, y: f64, color: Rgba },
}

/// A [`Surface`] that records calls instead of drawing.
///
/// Fill commands carry the fill style that was active when they were
/// issued, so assertions do not need to replay the state stack.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    fill: Rgba,
    stack: Vec<Rgba>,
}

impl RecordingSurface {
    /// Create an empty recorder with a black fill.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            fill: Rgba::BLACK,
            stack: Vec::new(),
        }
    }

    /// All recorded commands in call order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Only the filled rectangles, with their colors.
    pub fn filled_rects(&self) -> impl Iterator<Item = (Rect, Rgba)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::FillRect { rect, color } => Some((*rect, *color)),
            _ => None,
        })
    }

    /// Only the drawn strings, in call order.
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether every `save` was matched by a `restore`.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.stack.is_empty()
    }

    /// Drop all recorded commands and reset the state.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.stack.clear();
        self.fill = Rgba::BLACK;
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.stack.push(self.fill);
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if let Some(fill) = self.stack.pop() {
            self.fill = fill;
        }
        self.commands.push(DrawCommand::Restore);
    }

    fn set_fill_style(&mut self, color: Rgba) {
        self.fill = color;
        self.commands.push(DrawCommand::FillStyle(color));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.commands.push(DrawCommand::GlobalAlpha(alpha));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color: self.fill,
        });
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.commands.push(DrawCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f64) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn set_font(&mut self, font: &str) {
        self.commands.push(DrawCommand::Font(font.to_string()));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            x,
            y,
            color: self.fill,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_capture_active_color() {
        let mut s = RecordingSurface::new();
        s.set_fill_style(Rgba::rgb(1, 2, 3));
        s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        s.save();
        s.set_fill_style(Rgba::WHITE);
        s.fill_text("a", 0.0, 0.0);
        s.restore();
        s.fill_rect(Rect::new(1.0, 1.0, 1.0, 1.0));

        let rects: Vec<_> = s.filled_rects().collect();
        assert_eq!(rects.len(), 2);
        assert_eq!(rects[0].1, Rgba::rgb(1, 2, 3));
        assert_eq!(rects[1].1, Rgba::rgb(1, 2, 3), "restore brings back fill");
        assert_eq!(s.texts().collect::<Vec<_>>(), vec!["a"]);
        assert!(s.is_balanced());
    }

    #[test]
    fn unbalanced_save_is_detected() {
        let mut s = RecordingSurface::new();
        s.save();
        assert!(!s.is_balanced());
        s.clear();
        assert!(s.is_balanced());
        assert!(s.commands().is_empty());
    }
}
