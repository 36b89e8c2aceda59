#![forbid(unsafe_code)]

//! Tategaki public facade crate.
//!
//! This crate provides [`VerticalTextbox`], an editable block of vertical
//! Japanese, Chinese and Latin text, and re-exports the types callers need
//! from the layer crates. A lightweight prelude covers day-to-day use.
//!
//! # Example
//! ```
//! use tate::prelude::*;
//!
//! let mut textbox = VerticalTextbox::new("縦書きのtext", FixedMeasurer::new());
//! let width = textbox.layout(200.0);
//! assert!(width > 0.0);
//!
//! textbox.apply_edit(&Edit::Insert { at: 0, text: "「".into() });
//! let mut surface = RecordingSurface::new();
//! textbox.render(&mut surface);
//! assert!(surface.is_balanced());
//! ```

pub mod convert;
pub mod error;
pub mod state;
pub mod textbox;

// --- Core re-exports -------------------------------------------------------

pub use tate_core::{ColorParseError, DrawCommand, Point, Rect, RecordingSurface, Rgba, Surface};

// --- Style re-exports ------------------------------------------------------

pub use tate_style::{
    DecorationKind, FontStyle, FontWeight, LogicalPosition, StyleDeclaration, StyleProperty,
    StyleRuns, TextStyle,
};

// --- Text re-exports -------------------------------------------------------

pub use tate_text::{
    CursorOffsets, Edit, FixedMeasurer, FontMeasurer, GlyphMetrics, InputKind, LayoutConfig,
    MeasureError, TextInput,
};

// --- Render re-exports -----------------------------------------------------

pub use tate_render::DecorationConfig;

// --- Facade ----------------------------------------------------------------

pub use convert::HorizontalTextbox;
pub use error::{Result, TextboxError};
pub use state::{Direction, HORIZONTAL_TEXTBOX_TYPE, TextboxState, VERTICAL_TEXTBOX_TYPE};
pub use textbox::{DEFAULT_COLUMN_HEIGHT, VerticalTextbox};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DecorationKind, Edit, FixedMeasurer, FontMeasurer, InputKind, LayoutConfig, Point,
        RecordingSurface, Result, Rgba, StyleDeclaration, Surface, TextInput, TextStyle,
        TextboxError, VerticalTextbox,
    };

    pub use crate::{render, style, text};
}

pub use tate_core as core;
pub use tate_render as render;
pub use tate_style as style;
pub use tate_text as text;
