//! Property and scenario tests for wrapping, style mapping and hit-testing.
//!
//! Run:
//!   cargo test -p tate-text --test layout_props

use tate_core::Point;
use tate_style::{StyleRuns, TextStyle};
use tate_text::script::{graphemes, is_line_break};
use tate_text::{
    Edit, FixedMeasurer, InputKind, LayoutConfig, MeasureCache, PointerQuery, StyledGlyphs,
    TextInput, TextLayout,
};

use proptest::prelude::*;

const EXTENT: f64 = 40.0 * 1.16 * 1.13;

fn layout(text: &str, column_height: f64, split_by_grapheme: bool) -> TextLayout {
    let runs = StyleRuns::new();
    let base = TextStyle::default();
    let mut cache = MeasureCache::new(FixedMeasurer::new());
    let config = LayoutConfig::new().split_by_grapheme(split_by_grapheme);
    let mut layout = TextLayout::new(config);
    let mut glyphs = StyledGlyphs::new(&runs, &base, &mut cache, &config);
    layout.relayout(text, column_height, &mut glyphs);
    layout.measure_all(&mut glyphs);
    layout
}

// ── Strategies ──────────────────────────────────────────────────────────

fn arb_text() -> impl Strategy<Value = String> {
    "[a-c字あ \n]{0,40}"
}

fn arb_height() -> impl Strategy<Value = f64> {
    prop_oneof![Just(5.0), 20.0..400.0f64]
}

// ═════════════════════════════════════════════════════════════════════════
// Wrapping and mapping
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn wrapping_is_deterministic(text in arb_text(), height in arb_height(), split in any::<bool>()) {
        let a = layout(&text, height, split);
        let b = layout(&text, height, split);
        prop_assert_eq!(a.lines(), b.lines());
        prop_assert_eq!(a.map(), b.map());
        prop_assert_eq!(a.dynamic_min_width(), b.dynamic_min_width());
    }

    #[test]
    fn grapheme_mode_maps_every_character(text in arb_text(), height in arb_height()) {
        let layout = layout(&text, height, true);
        let logical = layout.logical_lines();
        let mut covered = vec![0usize; logical.len()];
        for (i, line) in layout.lines().iter().enumerate() {
            let entry = layout.map().entry(i).expect("entry per display line");
            prop_assert_eq!(entry.offset, covered[entry.line]);
            covered[entry.line] += line.len();
        }
        let expected: Vec<usize> = logical.iter().map(Vec::len).collect();
        prop_assert_eq!(covered, expected);
    }

    #[test]
    fn word_mode_keeps_every_word_character(text in arb_text(), height in arb_height()) {
        let layout = layout(&text, height, false);
        let logical = layout.logical_lines();
        let mut kept = vec![0usize; logical.len()];
        for (i, line) in layout.lines().iter().enumerate() {
            let entry = layout.map().entry(i).expect("entry per display line");
            kept[entry.line] += line.iter().filter(|g| g.as_str() != " ").count();
        }
        let expected: Vec<usize> = logical
            .iter()
            .map(|line| line.iter().filter(|g| g.as_str() != " ").count())
            .collect();
        prop_assert_eq!(kept, expected);
    }

    #[test]
    fn flat_locations_round_trip(text in arb_text(), height in arb_height(), split in any::<bool>()) {
        let layout = layout(&text, height, split);
        let map = layout.map();
        for (i, line) in layout.lines().iter().enumerate() {
            for c in 0..=line.len() {
                let flat = map.flat_index(i, c);
                prop_assert!(flat <= layout.text_len() || !split);
                if c > 0 || i == 0 {
                    prop_assert_eq!(map.location_of(flat), (i, c));
                }
            }
        }
    }

    #[test]
    fn input_diff_reproduces_the_new_value(
        old in "[a-c字\n]{0,12}",
        inserted in "[x-z字\n]{0,4}",
        a in 0usize..13,
        b in 0usize..13,
    ) {
        let old_g = graphemes(&old);
        let (start, end) = (a.min(b).min(old_g.len()), a.max(b).min(old_g.len()));
        let new_value = format!(
            "{}{}{}",
            old_g[..start].concat(),
            inserted,
            old_g[end..].concat()
        );
        let caret = start + graphemes(&inserted).len();
        let input = TextInput::new(InputKind::InsertText, new_value.clone(), caret);
        match Edit::from_input(&old_g, start..end, &input) {
            Some(edit) => {
                let mut text = old_g.clone();
                edit.apply(&mut text);
                prop_assert_eq!(text.concat(), new_value);
            }
            None => prop_assert_eq!(old, new_value),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Scenarios
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn column_shorter_than_a_glyph_holds_one_glyph_each() {
    let layout = layout("字字字", 10.0, true);
    assert_eq!(layout.lines().len(), 3);
    assert!(layout.lines().iter().all(|l| l.len() == 1));
    assert!(layout.dynamic_min_width() >= 40.0);
}

#[test]
fn empty_logical_lines_become_empty_columns() {
    let layout = layout("a\n\nb", 100.0, false);
    assert_eq!(layout.lines().len(), 3);
    assert!(layout.lines()[1].is_empty());
    assert!(
        layout
            .lines()
            .iter()
            .flatten()
            .all(|g| !is_line_break(g))
    );
}

#[test]
fn scaled_pointer_midpoint_resolves_forward() {
    let runs = StyleRuns::new();
    let base = TextStyle::default();
    let mut cache = MeasureCache::new(FixedMeasurer::new());
    let config = LayoutConfig::new();
    let mut layout = TextLayout::new(config);
    let mut glyphs = StyledGlyphs::new(&runs, &base, &mut cache, &config);
    layout.relayout("字字字", 1000.0, &mut glyphs);

    let query = PointerQuery::new(Point::new(10.0, 120.0), EXTENT).scale(2.0, 2.0);
    assert_eq!(layout.selection_index_at_pointer(&query, &mut glyphs), 2);
    let query = PointerQuery::new(Point::new(10.0, 119.0), EXTENT).scale(2.0, 2.0);
    assert_eq!(layout.selection_index_at_pointer(&query, &mut glyphs), 1);
}
