#![forbid(unsafe_code)]

//! Core: geometry, color, and the drawing surface abstraction.
//!
//! # Role in Tategaki
//! `tate-core` is the kernel every other crate builds on. It owns the
//! floating-point geometry used by the canvas coordinate space, the
//! [`Rgba`] color type, and the [`Surface`] trait through which all
//! painting reaches the host 2D context.
//!
//! # How it fits in the system
//! `tate-style` stores colors in style declarations, `tate-text` produces
//! geometry, and `tate-render` turns geometry plus style into [`Surface`]
//! calls. The host implements [`Surface`] over its canvas; tests use
//! [`RecordingSurface`] to assert on the emitted draw commands.

pub mod color;
pub mod geometry;
pub mod surface;

pub use color::{ColorParseError, Rgba};
pub use geometry::{Point, Rect, is_almost_equal};
pub use surface::{DrawCommand, RecordingSurface, Surface};
