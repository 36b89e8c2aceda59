#![forbid(unsafe_code)]

//! Column wrapping for vertical text.
//!
//! Each logical line is broken into display lines (columns) whose summed
//! advance fits the column height. In grapheme mode every grapheme is a
//! break opportunity; in word mode the line splits on space, tab and
//! carriage return, and a single space is re-inserted between words that
//! share a column.
//!
//! Advances come from a [`GlyphSource`], addressed by logical position so
//! the source can look up per-character styles. Latin graphemes advance by
//! their kerned width, CJK graphemes by their height.
//!
//! The wrapper is pure: the same lines, options and metrics always produce
//! the same output.
//!
//! # Example
//!
//! ```
//! use tate_text::measure::GlyphMetrics;
//! use tate_text::script::split_logical_lines;
//! use tate_text::wrap::{WrapOptions, wrap_lines};
//!
//! let lines = split_logical_lines("字字字");
//! let mut glyphs = |_line: usize, _index: usize, _g: &str, _prev: Option<&str>| GlyphMetrics {
//!     width: 10.0,
//!     kerned_width: 10.0,
//!     height: 10.0,
//! };
//! let out = wrap_lines(&lines, &WrapOptions::new(25.0), &mut glyphs);
//! assert_eq!(out.lines.len(), 2);
//! assert_eq!(out.lines[0].len(), 2);
//! ```

use smallvec::SmallVec;
use tracing::trace;

use crate::config::{LayoutConfig, SPECIAL_SYMBOL_BONUS};
use crate::measure::GlyphMetrics;
use crate::script::{classify, is_special_symbol};

/// Provider of glyph metrics during wrapping.
///
/// `line` and `index` are logical coordinates of the grapheme being
/// measured; `previous` is the grapheme before it within the same word.
pub trait GlyphSource {
    fn metrics(
        &mut self,
        line: usize,
        index: usize,
        grapheme: &str,
        previous: Option<&str>,
    ) -> GlyphMetrics;
}

impl<F> GlyphSource for F
where
    F: FnMut(usize, usize, &str, Option<&str>) -> GlyphMetrics,
{
    fn metrics(
        &mut self,
        line: usize,
        index: usize,
        grapheme: &str,
        previous: Option<&str>,
    ) -> GlyphMetrics {
        self(line, index, grapheme, previous)
    }
}

/// Wrapping parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapOptions {
    /// Available column height.
    pub column_height: f64,
    /// Break at any grapheme instead of at spaces.
    pub split_by_grapheme: bool,
    /// Char spacing in object units.
    pub spacing: f64,
    /// Extra advance for `,` and `@`.
    pub special_symbol_bonus: f64,
}

impl WrapOptions {
    #[must_use]
    pub fn new(column_height: f64) -> Self {
        Self {
            column_height,
            split_by_grapheme: true,
            spacing: 0.0,
            special_symbol_bonus: SPECIAL_SYMBOL_BONUS,
        }
    }

    /// Options matching a layout configuration for a font of `font_size`.
    #[must_use]
    pub fn from_config(config: &LayoutConfig, column_height: f64, font_size: f64) -> Self {
        Self {
            column_height,
            split_by_grapheme: config.split_by_grapheme,
            spacing: config.spacing_width(font_size),
            special_symbol_bonus: config.special_symbol_bonus,
        }
    }

    #[must_use]
    pub fn split_by_grapheme(mut self, split: bool) -> Self {
        self.split_by_grapheme = split;
        self
    }

    #[must_use]
    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    #[must_use]
    pub fn special_symbol_bonus(mut self, bonus: f64) -> Self {
        self.special_symbol_bonus = bonus;
        self
    }
}

/// Result of a wrap pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrapOutput {
    /// Display lines, in order, across all logical lines.
    pub lines: Vec<Vec<String>>,
    /// Smallest column height that fits the largest unbreakable word.
    pub dynamic_min_width: f64,
}

/// A word: graphemes plus the logical index of its first grapheme.
struct Word<'a> {
    graphemes: SmallVec<[&'a str; 8]>,
    start: usize,
}

fn is_word_joiner(g: &str) -> bool {
    matches!(g, " " | "\t" | "\r")
}

fn split_words(line: &[String], split_by_grapheme: bool) -> Vec<Word<'_>> {
    if split_by_grapheme {
        return line
            .iter()
            .enumerate()
            .map(|(i, g)| Word {
                graphemes: SmallVec::from_elem(g.as_str(), 1),
                start: i,
            })
            .collect();
    }
    let mut words = vec![Word {
        graphemes: SmallVec::new(),
        start: 0,
    }];
    for (i, g) in line.iter().enumerate() {
        if is_word_joiner(g) {
            words.push(Word {
                graphemes: SmallVec::new(),
                start: i + 1,
            });
        } else if let Some(word) = words.last_mut() {
            word.graphemes.push(g.as_str());
        }
    }
    words
}

/// Summed advance of a word.
///
/// Latin graphemes contribute their kerned width; CJK graphemes their
/// height plus the special-symbol bonus where it applies.
pub fn measure_word<G: GlyphSource + ?Sized>(
    word: &[&str],
    line: usize,
    start: usize,
    options: &WrapOptions,
    glyphs: &mut G,
) -> f64 {
    let mut previous = None;
    let mut width = 0.0;
    for (i, g) in word.iter().enumerate() {
        let metrics = glyphs.metrics(line, start + i, g, previous);
        width += if classify(g).is_latin() {
            metrics.kerned_width
        } else if is_special_symbol(g) {
            metrics.height + options.special_symbol_bonus
        } else {
            metrics.height
        };
        previous = Some(*g);
    }
    width
}

/// Wrap one logical line. Returns its display lines and its largest word.
pub fn wrap_line<G: GlyphSource + ?Sized>(
    line: &[String],
    line_index: usize,
    options: &WrapOptions,
    glyphs: &mut G,
) -> (Vec<Vec<String>>, f64) {
    let words = split_words(line, options.split_by_grapheme);
    let spacing = options.spacing;
    let mut out = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut line_width = 0.0;
    let mut infix_width = 0.0;
    let mut largest = 0.0_f64;
    let mut just_started = true;

    for word in &words {
        let word_width = measure_word(&word.graphemes, line_index, word.start, options, glyphs);

        line_width += infix_width + word_width - spacing;
        if line_width > options.column_height && !just_started {
            out.push(std::mem::take(&mut current));
            line_width = word_width;
            just_started = true;
        } else {
            line_width += spacing;
        }

        if !just_started && !options.split_by_grapheme {
            current.push(" ".to_owned());
        }
        current.extend(word.graphemes.iter().map(|g| (*g).to_owned()));

        infix_width = if options.split_by_grapheme {
            0.0
        } else {
            let end = word.start + word.graphemes.len();
            measure_word(&[" "], line_index, end, options, glyphs)
        };
        just_started = false;
        largest = largest.max(word_width);
    }
    out.push(current);
    (out, largest)
}

/// Wrap every logical line under `options.column_height`.
///
/// An empty logical line yields exactly one empty display line.
pub fn wrap_lines<G: GlyphSource + ?Sized>(
    logical: &[Vec<String>],
    options: &WrapOptions,
    glyphs: &mut G,
) -> WrapOutput {
    let mut output = WrapOutput::default();
    for (index, line) in logical.iter().enumerate() {
        let (lines, largest) = wrap_line(line, index, options, glyphs);
        output.dynamic_min_width = output.dynamic_min_width.max(largest - options.spacing);
        output.lines.extend(lines);
    }
    trace!(
        logical = logical.len(),
        display = output.lines.len(),
        dynamic_min_width = output.dynamic_min_width,
        "wrapped text"
    );
    output
}
