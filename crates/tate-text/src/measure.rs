#![forbid(unsafe_code)]

//! Glyph measurement seam and measurement cache.
//!
//! The engine never talks to a font rasteriser. Hosts implement
//! [`FontMeasurer`] (typically over a canvas `measureText`), and the engine
//! wraps it in a [`MeasureCache`] so repeated layout passes do not
//! re-measure the same grapheme in the same font.
//!
//! Measurement is allowed to fail. A failed or non-finite measurement
//! degrades to zero metrics with a warning instead of aborting layout.
//!
//! ```text
//! wrap / box model
//!     │
//!     ▼
//! ┌──────────────┐
//! │ MeasureCache │──hit──▶ GlyphMetrics
//! │ (LRU + gen)  │
//! └──────┬───────┘
//!        │ miss
//!        ▼
//!   FontMeasurer  (host | FixedMeasurer)
//! ```

use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::FxBuildHasher;
use tate_style::{FontStyle, FontWeight, TextStyle};
use tracing::warn;
use unicode_width::UnicodeWidthStr;

/// Default number of cached measurements.
pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

/// Metrics of one grapheme in one font.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GlyphMetrics {
    /// Horizontal advance.
    pub width: f64,
    /// Advance after kerning against the previous grapheme.
    pub kerned_width: f64,
    /// Line box height of the font.
    pub height: f64,
}

impl GlyphMetrics {
    pub const ZERO: Self = Self {
        width: 0.0,
        kerned_width: 0.0,
        height: 0.0,
    };

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.width.is_finite() && self.kerned_width.is_finite() && self.height.is_finite()
    }
}

/// Error reported by a [`FontMeasurer`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeasureError {
    #[error("font not available: {0}")]
    FontUnavailable(String),
    #[error("cannot measure {grapheme:?}: {reason}")]
    Unmeasurable { grapheme: String, reason: String },
}

/// Host font metrics provider.
pub trait FontMeasurer {
    /// Measure `grapheme` set in `style`, kerned against `previous`.
    fn measure(
        &self,
        grapheme: &str,
        previous: Option<&str>,
        style: &TextStyle,
    ) -> Result<GlyphMetrics, MeasureError>;
}

impl<M: FontMeasurer + ?Sized> FontMeasurer for &M {
    fn measure(
        &self,
        grapheme: &str,
        previous: Option<&str>,
        style: &TextStyle,
    ) -> Result<GlyphMetrics, MeasureError> {
        (**self).measure(grapheme, previous, style)
    }
}

impl<M: FontMeasurer + ?Sized> FontMeasurer for Box<M> {
    fn measure(
        &self,
        grapheme: &str,
        previous: Option<&str>,
        style: &TextStyle,
    ) -> Result<GlyphMetrics, MeasureError> {
        (**self).measure(grapheme, previous, style)
    }
}

/// Deterministic metrics derived from the font size alone.
///
/// Narrow graphemes advance by `narrow_ratio × size`, wide ones (East
/// Asian wide, by display width) by `size`. Height is always the font
/// size. No kerning. Useful for tests and headless layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedMeasurer {
    pub narrow_ratio: f64,
}

impl FixedMeasurer {
    #[must_use]
    pub const fn new() -> Self {
        Self { narrow_ratio: 0.5 }
    }

    #[must_use]
    pub const fn narrow_ratio(mut self, ratio: f64) -> Self {
        self.narrow_ratio = ratio;
        self
    }
}

impl Default for FixedMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl FontMeasurer for FixedMeasurer {
    fn measure(
        &self,
        grapheme: &str,
        _previous: Option<&str>,
        style: &TextStyle,
    ) -> Result<GlyphMetrics, MeasureError> {
        let size = style.font_size;
        let width = if grapheme.width() >= 2 {
            size
        } else {
            size * self.narrow_ratio
        };
        Ok(GlyphMetrics {
            width,
            kerned_width: width,
            height: size,
        })
    }
}

/// Measure, degrading failures and non-finite results to zero.
pub fn measure_or_zero<M: FontMeasurer + ?Sized>(
    measurer: &M,
    grapheme: &str,
    previous: Option<&str>,
    style: &TextStyle,
) -> GlyphMetrics {
    match measurer.measure(grapheme, previous, style) {
        Ok(metrics) if metrics.is_finite() => metrics,
        Ok(metrics) => {
            warn!(grapheme, ?metrics, "non-finite glyph metrics, using zero advance");
            GlyphMetrics::ZERO
        }
        Err(error) => {
            warn!(grapheme, %error, "glyph measurement failed, using zero advance");
            GlyphMetrics::ZERO
        }
    }
}

/// Cache key: grapheme pair plus everything in the style that changes
/// glyph shapes. The strings are kept verbatim so distinct glyphs never
/// share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MeasureKey {
    grapheme: String,
    previous: Option<String>,
    font_family: String,
    font_size_bits: u64,
    font_weight: FontWeight,
    font_style: FontStyle,
    generation: u64,
}

impl MeasureKey {
    fn new(grapheme: &str, previous: Option<&str>, style: &TextStyle, generation: u64) -> Self {
        Self {
            grapheme: grapheme.to_owned(),
            previous: previous.map(str::to_owned),
            font_family: style.font_family.clone(),
            font_size_bits: style.font_size.to_bits(),
            font_weight: style.font_weight,
            font_style: style.font_style,
            generation,
        }
    }
}

/// Hit/miss counters of a [`MeasureCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeasureCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub size: usize,
    pub capacity: usize,
    pub generation: u64,
}

/// LRU cache in front of a [`FontMeasurer`].
///
/// Invalidation is generation based: [`invalidate`](Self::invalidate)
/// bumps the generation, older entries simply stop matching and age out.
#[derive(Debug)]
pub struct MeasureCache<M> {
    measurer: M,
    cache: LruCache<MeasureKey, GlyphMetrics, FxBuildHasher>,
    generation: u64,
    stats: MeasureCacheStats,
}

impl<M: FontMeasurer> MeasureCache<M> {
    #[must_use]
    pub fn new(measurer: M) -> Self {
        Self::with_capacity(measurer, DEFAULT_CACHE_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(measurer: M, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            measurer,
            cache: LruCache::with_hasher(cap, FxBuildHasher),
            generation: 0,
            stats: MeasureCacheStats {
                capacity: cap.get(),
                ..MeasureCacheStats::default()
            },
        }
    }

    /// Measure through the cache, degrading failures to zero metrics.
    pub fn measure(
        &mut self,
        grapheme: &str,
        previous: Option<&str>,
        style: &TextStyle,
    ) -> GlyphMetrics {
        let key = MeasureKey::new(grapheme, previous, style, self.generation);
        if let Some(metrics) = self.cache.get(&key) {
            self.stats.hits += 1;
            return *metrics;
        }
        self.stats.misses += 1;
        let metrics = measure_or_zero(&self.measurer, grapheme, previous, style);
        self.cache.put(key, metrics);
        metrics
    }

    /// Forget every cached measurement (e.g. after a font finished
    /// loading).
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.stats.generation = self.generation;
    }

    #[must_use]
    pub fn measurer(&self) -> &M {
        &self.measurer
    }

    #[must_use]
    pub fn stats(&self) -> MeasureCacheStats {
        MeasureCacheStats {
            size: self.cache.len(),
            ..self.stats
        }
    }

    pub fn into_inner(self) -> M {
        self.measurer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Failing;

    impl FontMeasurer for Failing {
        fn measure(
            &self,
            grapheme: &str,
            _previous: Option<&str>,
            _style: &TextStyle,
        ) -> Result<GlyphMetrics, MeasureError> {
            Err(MeasureError::Unmeasurable {
                grapheme: grapheme.to_string(),
                reason: "no glyph".into(),
            })
        }
    }

    struct NotANumber;

    impl FontMeasurer for NotANumber {
        fn measure(
            &self,
            _grapheme: &str,
            _previous: Option<&str>,
            _style: &TextStyle,
        ) -> Result<GlyphMetrics, MeasureError> {
            Ok(GlyphMetrics {
                width: f64::NAN,
                kerned_width: 1.0,
                height: 1.0,
            })
        }
    }

    struct Counting<'a>(&'a Cell<usize>);

    impl FontMeasurer for Counting<'_> {
        fn measure(
            &self,
            grapheme: &str,
            previous: Option<&str>,
            style: &TextStyle,
        ) -> Result<GlyphMetrics, MeasureError> {
            self.0.set(self.0.get() + 1);
            FixedMeasurer::new().measure(grapheme, previous, style)
        }
    }

    #[test]
    fn fixed_measurer_distinguishes_wide_graphemes() {
        let style = TextStyle::default();
        let narrow = FixedMeasurer::new().measure("A", None, &style).unwrap();
        let wide = FixedMeasurer::new().measure("字", None, &style).unwrap();
        assert_eq!(narrow.width, 20.0);
        assert_eq!(wide.width, 40.0);
        assert_eq!(narrow.height, 40.0);
    }

    #[tracing_test::traced_test]
    #[test]
    fn failures_degrade_to_zero() {
        let style = TextStyle::default();
        assert_eq!(measure_or_zero(&Failing, "x", None, &style), GlyphMetrics::ZERO);
        assert!(logs_contain("glyph measurement failed"));
        assert_eq!(measure_or_zero(&NotANumber, "x", None, &style), GlyphMetrics::ZERO);
        assert!(logs_contain("non-finite glyph metrics"));
    }

    #[test]
    fn cache_hits_until_invalidated() {
        let calls = Cell::new(0);
        let mut cache = MeasureCache::new(Counting(&calls));
        let style = TextStyle::default();
        let a = cache.measure("字", None, &style);
        let b = cache.measure("字", None, &style);
        assert_eq!(a, b);
        assert_eq!(calls.get(), 1);
        assert_eq!(cache.stats().hits, 1);

        cache.measure("字", Some("a"), &style);
        assert_eq!(calls.get(), 2, "previous grapheme is part of the key");

        cache.invalidate();
        cache.measure("字", None, &style);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn split_pairs_get_their_own_entries() {
        let calls = Cell::new(0);
        let mut cache = MeasureCache::new(Counting(&calls));
        let style = TextStyle::default();
        cache.measure("ab", None, &style);
        cache.measure("a", Some("b"), &style);
        cache.measure("b", Some("a"), &style);
        assert_eq!(calls.get(), 3);
        assert_eq!(cache.stats().size, 3);

        cache.measure("a", Some("b"), &style);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn font_size_is_part_of_the_key() {
        let calls = Cell::new(0);
        let mut cache = MeasureCache::with_capacity(Counting(&calls), 0);
        let small = TextStyle {
            font_size: 10.0,
            ..TextStyle::default()
        };
        assert_eq!(cache.measure("A", None, &small).width, 5.0);
        assert_eq!(cache.measure("A", None, &TextStyle::default()).width, 20.0);
        assert_eq!(calls.get(), 2);
        assert_eq!(cache.stats().capacity, 1);
    }
}
