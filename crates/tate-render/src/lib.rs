#![forbid(unsafe_code)]

//! Painters for laid-out vertical text.
//!
//! # Role in Tategaki
//! `tate-render` turns a measured layout into [`Surface`](tate_core::Surface)
//! calls. It never measures or wraps; everything it needs arrives in a
//! [`TextFrame`].
//!
//! # Primary responsibilities
//! - **background**: `textBackgroundColor` bands.
//! - **decoration**: underline, strikethrough and overline, with underline
//!   runs merged across font size changes.
//! - **selection** / **cursor**: editing feedback.
//! - **glyphs**: upright CJK, rotated Latin runs, bracket rotation.
//!
//! # How it fits in the system
//! The `tate` facade builds a [`TextFrame`] from its
//! [`TextLayout`](tate_text::TextLayout) and calls the painters in order:
//! background, text, decorations, then selection or cursor.

pub mod background;
pub mod config;
pub mod cursor;
pub mod decoration;
pub mod frame;
pub mod glyphs;
pub mod selection;

#[cfg(test)]
mod test_support;

pub use background::render_background;
pub use config::DecorationConfig;
pub use cursor::{CursorState, render_cursor};
pub use decoration::{UnderlineRecord, paint_underlines, render_decoration, underline_sectors};
pub use frame::TextFrame;
pub use glyphs::render_text;
pub use selection::render_selection;
