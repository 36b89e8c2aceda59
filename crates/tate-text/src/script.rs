#![forbid(unsafe_code)]

//! Grapheme segmentation and vertical script classification.
//!
//! In vertical writing, CJK glyphs stand upright and advance by their
//! height, while Latin letters, digits and brackets are laid on their side
//! and advance by their width. [`classify`] decides which treatment a
//! grapheme cluster gets; [`rotation`] names the extra transform some CJK
//! punctuation needs so it sits correctly in a column.
//!
//! # Example
//!
//! ```
//! use tate_text::script::{GlyphClass, GlyphRotation, classify, rotation};
//!
//! assert_eq!(classify("A"), GlyphClass::Latin);
//! assert_eq!(classify("7"), GlyphClass::Latin);
//! assert_eq!(classify("字"), GlyphClass::Cjk);
//! assert_eq!(rotation("「"), GlyphRotation::QuarterTurn);
//! assert_eq!(rotation("。"), GlyphRotation::HalfTurn);
//! ```

use unicode_segmentation::UnicodeSegmentation;

/// How a grapheme advances down a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphClass {
    /// Laid on its side; advances by its width.
    Latin,
    /// Upright; advances by its height.
    Cjk,
}

impl GlyphClass {
    #[inline]
    #[must_use]
    pub const fn is_latin(self) -> bool {
        matches!(self, Self::Latin)
    }
}

/// Extra transform applied when painting an upright glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphRotation {
    Upright,
    /// Brackets and prolonged sound marks: a quarter turn counter-clockwise.
    QuarterTurn,
    /// Ideographic full stop and comma: a half turn, nudged to the top right.
    HalfTurn,
    /// Slashes: raised by a fraction of the box height.
    Raised,
}

const BRACKETS: [char; 6] = ['(', ')', '[', ']', '{', '}'];

const ROTATED: &str = "ー「」『』（）〔〕［］｛｝｟｠〈〉《》【】〖〗〘〙〚〛゛゜。、・゠＝…•‥◦﹅﹆";

const HALF_TURN: [char; 2] = ['。', '、'];

const RAISED: [char; 2] = ['/', '\\'];

const SPECIAL_SYMBOLS: [char; 2] = [',', '@'];

/// Classify a grapheme cluster.
///
/// A cluster is Latin when any of its scalars is an ASCII letter, `.`,
/// whitespace (ideographic space included), an ASCII digit or an ASCII
/// bracket. Everything else is CJK.
#[must_use]
pub fn classify(grapheme: &str) -> GlyphClass {
    let latin = grapheme.chars().any(|c| {
        c.is_ascii_alphanumeric() || c == '.' || c.is_whitespace() || BRACKETS.contains(&c)
    });
    if latin {
        GlyphClass::Latin
    } else {
        GlyphClass::Cjk
    }
}

/// Shorthand for `classify(g).is_latin()`.
#[inline]
#[must_use]
pub fn is_latin(grapheme: &str) -> bool {
    classify(grapheme).is_latin()
}

/// Symbols that get a small extra advance when measured upright.
#[must_use]
pub fn is_special_symbol(grapheme: &str) -> bool {
    grapheme.chars().any(|c| SPECIAL_SYMBOLS.contains(&c))
}

/// Paint-time transform for a grapheme.
#[must_use]
pub fn rotation(grapheme: &str) -> GlyphRotation {
    if grapheme.chars().any(|c| ROTATED.contains(c)) {
        if grapheme.chars().any(|c| HALF_TURN.contains(&c)) {
            GlyphRotation::HalfTurn
        } else {
            GlyphRotation::QuarterTurn
        }
    } else if grapheme.chars().any(|c| RAISED.contains(&c)) {
        GlyphRotation::Raised
    } else {
        GlyphRotation::Upright
    }
}

/// Split text into extended grapheme clusters.
#[must_use]
pub fn graphemes(text: &str) -> Vec<String> {
    text.graphemes(true).map(str::to_owned).collect()
}

/// Whether a grapheme is a hard line break.
#[inline]
#[must_use]
pub fn is_line_break(grapheme: &str) -> bool {
    grapheme == "\n" || grapheme == "\r\n"
}

/// Split text into logical lines of graphemes.
///
/// `\n` and `\r\n` both end a line. The result always holds at least one
/// (possibly empty) line.
#[must_use]
pub fn split_logical_lines(text: &str) -> Vec<Vec<String>> {
    let mut lines = vec![Vec::new()];
    for g in text.graphemes(true) {
        if is_line_break(g) {
            lines.push(Vec::new());
        } else if let Some(line) = lines.last_mut() {
            line.push(g.to_owned());
        }
    }
    lines
}

/// Grapheme count of text whose lines are joined by single breaks.
#[must_use]
pub fn flat_len(lines: &[Vec<String>]) -> usize {
    lines.iter().map(Vec::len).sum::<usize>() + lines.len().saturating_sub(1)
}
