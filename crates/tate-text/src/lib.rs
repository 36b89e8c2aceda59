#![forbid(unsafe_code)]

//! Layout kernel: classification, wrapping, style mapping, and geometry.
//!
//! # Role in Tategaki
//! `tate-text` turns logical text plus style runs into columns. It decides
//! where columns break, which logical character each display position
//! belongs to, where every glyph sits, and which character a pointer
//! lands on.
//!
//! # Primary responsibilities
//! - **script**: CJK/Latin classification and bracket rotation.
//! - **measure**: the [`FontMeasurer`] seam and its LRU [`MeasureCache`].
//! - **wrap**: grapheme and word column wrapping.
//! - **style_map**: display ↔ logical coordinate translation.
//! - **boxes**: per-character boxes in a version-tagged arena.
//! - **hit_test**: pointer lookup and cursor offsets.
//! - **edit**: the [`Edit`] union and host input diffing.
//! - **layout**: [`TextLayout`], which runs a full pass.
//!
//! # How it fits in the system
//! The `tate` facade owns text and style runs and calls into
//! [`TextLayout`] after each edit; `tate-render` reads the resulting
//! [`LineRecord`]s and [`StyleMap`] to paint.

pub mod boxes;
pub mod config;
pub mod edit;
pub mod layout;
pub mod measure;
pub mod script;
pub mod style_map;
pub mod wrap;

pub use boxes::{BoxModel, CharBox, LineRecord};
pub use config::LayoutConfig;
pub use edit::{Edit, InputKind, TextInput};
pub use hit_test::{CursorOffsets, PointerQuery};
pub use layout::{StyledGlyphs, TextLayout};
pub use measure::{FixedMeasurer, FontMeasurer, GlyphMetrics, MeasureCache, MeasureError};
pub use script::{GlyphClass, GlyphRotation};
pub use style_map::{MappedStyles, MappedStylesMut, StyleMap, StyleMapEntry};
pub use wrap::{GlyphSource, WrapOptions, WrapOutput};
