#![forbid(unsafe_code)]

//! Style types for Tategaki with sparse per-character runs.
//!
//! # Role in Tategaki
//! `tate-style` is the authoritative store for "what style applies to this
//! character". Everything derived from text (wrapped lines, geometry,
//! paint) is regenerated on each layout pass; the [`StyleRuns`] kept here
//! persist across passes and edits.
//!
//! # This crate provides
//! - [`TextStyle`], the complete object-level style every character
//!   inherits from.
//! - [`StyleDeclaration`], a partial per-character override.
//! - [`StyleRuns`], the sparse `line → char → declaration` store, with the
//!   shifting rules applied when text is inserted or removed.
//! - Integrity checking and repair of runs after an edit
//!   ([`StyleRuns::integrity_check`], [`StyleRuns::fix_integrity`]).
//!
//! # How it fits in the system
//! Runs are keyed by *logical* line (hard line breaks only). `tate-text`
//! translates display-line coordinates into logical ones before touching
//! the store, so wrapping never has to rewrite style keys.

pub mod declaration;
pub mod integrity;
pub mod runs;

pub use declaration::{
    DecorationKind, FontStyle, FontWeight, StyleDeclaration, StyleProperty, TextStyle,
};
pub use integrity::{MarkedLine, expected_line_len};
pub use runs::{LineStyles, LogicalPosition, StyleRuns};
