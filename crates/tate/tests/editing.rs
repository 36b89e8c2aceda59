//! End-to-end editing through the facade.
//!
//! Drives a [`VerticalTextbox`] the way a host does: input snapshots from
//! a hidden text field, pointer lookups, and repaints after each change.
//!
//! Run:
//!   cargo test -p tate --test editing

use proptest::prelude::*;
use tate::prelude::*;
use tate::text::script::graphemes;

const RED: Rgba = Rgba::rgb(255, 0, 0);

fn textbox(text: &str) -> VerticalTextbox<FixedMeasurer> {
    VerticalTextbox::new(text, FixedMeasurer::new()).with_height(1000.0)
}

// ═══════════════════════════════════════════════════════════════════════
// Scenarios
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn latin_boxes_stack_by_width() {
    let mut tb = textbox("AB字");
    assert_eq!(tb.lines().len(), 1);
    tb.set_selection(0, 0);
    assert_eq!(tb.cursor_offsets().top, 0.0);
    tb.set_selection(2, 2);
    assert_eq!(tb.cursor_offsets().top, 20.0 + 20.0);
}

#[test]
fn line_break_typed_after_styled_text_keeps_the_style() {
    let mut tb = textbox("ab");
    tb.set_style_range(0, 2, &StyleDeclaration::new().fill(RED));
    tb.set_selection(2, 2);

    assert!(tb.apply_input(&TextInput::new(InputKind::InsertLineBreak, "ab\n", 3)));
    let run = tb.styles().line(1).expect("styled new line");
    assert_eq!(run.keys().copied().collect::<Vec<_>>(), vec![0]);

    assert!(tb.apply_input(&TextInput::new(InputKind::InsertText, "ab\nx", 4)));
    assert_eq!(tb.text(), "ab\nx");
    assert_eq!(tb.style_at(1, 0).fill, RED);
}

#[test]
fn backspace_across_a_line_break_joins_the_runs() {
    let mut tb = textbox("ab\ncd");
    tb.set_style_range(3, 5, &StyleDeclaration::new().fill(RED));
    tb.set_selection(3, 3);

    assert!(tb.apply_input(&TextInput::new(InputKind::DeleteBackward, "abcd", 2)));
    assert_eq!(tb.text(), "abcd");
    assert_eq!(tb.lines().len(), 1);
    assert_eq!(tb.style_at(0, 1).fill, Rgba::BLACK);
    assert_eq!(tb.style_at(0, 2).fill, RED);
    assert_eq!(tb.style_at(0, 3).fill, RED);
}

#[test]
fn pointer_midpoint_resolves_forward() {
    let mut tb = textbox("字字");
    let x = tb.layout(1000.0) - 1.0;
    assert_eq!(tb.selection_index_at_pointer(Point::new(x, 20.0)), 1);
}

#[test]
fn pointer_past_the_text_clamps() {
    let mut tb = textbox("字字");
    let x = tb.layout(1000.0) - 1.0;
    assert_eq!(tb.selection_index_at_pointer(Point::new(x, 900.0)), 2);
}

#[test]
fn tiny_columns_hold_one_glyph_each() {
    let mut tb = VerticalTextbox::new("字字字", FixedMeasurer::new()).with_height(5.0);
    assert_eq!(tb.lines().len(), 3);
    assert!(tb.dynamic_min_width() >= 40.0);
    assert!(tb.height() >= tb.dynamic_min_width());
}

#[test]
fn composition_paints_under_the_cursor() {
    let mut tb = textbox("ab");
    tb.set_selection(2, 2);
    tb.apply_input(&TextInput::new(InputKind::InsertComposition, "abか", 3));

    let mut surface = RecordingSurface::new();
    tb.render_editing(&mut surface, 1.0, 1.0);
    let colors: Vec<Rgba> = surface.filled_rects().map(|(_, c)| c).collect();
    assert_eq!(colors.len(), 2);
    assert_eq!(colors[0], tb.decoration().composition_color);
}

#[test]
fn selection_paints_instead_of_the_cursor() {
    let mut tb = textbox("字字\n字");
    tb.set_selection(0, 4);
    let mut surface = RecordingSurface::new();
    tb.render_editing(&mut surface, 1.0, 1.0);
    let colors: Vec<Rgba> = surface.filled_rects().map(|(_, c)| c).collect();
    assert_eq!(colors.len(), 2);
    assert!(colors.iter().all(|c| *c == tb.decoration().selection_color));
}

#[test]
fn decorations_paint_per_kind() {
    let mut tb = textbox("字字字");
    tb.set_style_range(0, 3, &StyleDeclaration::new().linethrough(true));
    let mut surface = RecordingSurface::new();
    tb.render_decoration(&mut surface, DecorationKind::Underline);
    assert_eq!(surface.filled_rects().count(), 0);
    tb.render_decoration(&mut surface, DecorationKind::Linethrough);
    assert_eq!(surface.filled_rects().count(), 1);
    assert!(surface.is_balanced());
}

// ── Strategies ─────────────────────────────────────────────────────────

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["字", "a", "b", " ", "\n", "「", "。", "/"]),
        0..24,
    )
    .prop_map(|parts| parts.concat())
}

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, String),
    Delete(usize, usize),
    Replace(usize, usize, String),
    Style(usize, usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), text_strategy()).prop_map(|(at, t)| Op::Insert(at, t)),
        (any::<usize>(), 1usize..5).prop_map(|(at, n)| Op::Delete(at, n)),
        (any::<usize>(), 1usize..5, text_strategy()).prop_map(|(at, n, t)| Op::Replace(at, n, t)),
        (any::<usize>(), 1usize..5).prop_map(|(at, n)| Op::Style(at, n)),
    ]
}

fn to_edit(op: &Op, len: usize) -> Option<Edit> {
    let clamp = |at: usize, n: usize| {
        let start = at % (len + 1);
        start..(start + n).min(len)
    };
    match op {
        Op::Insert(at, text) => Some(Edit::Insert {
            at: at % (len + 1),
            text: text.clone(),
        }),
        Op::Delete(at, n) => Some(Edit::Delete { range: clamp(*at, *n) }),
        Op::Replace(at, n, text) => Some(Edit::Replace {
            range: clamp(*at, *n),
            text: text.clone(),
        }),
        Op::Style(..) => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Properties
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn edits_track_a_plain_model(
        initial in text_strategy(),
        ops in prop::collection::vec(op_strategy(), 1..12),
    ) {
        let mut tb = VerticalTextbox::new(initial.clone(), FixedMeasurer::new()).with_height(120.0);
        let mut model = graphemes(&initial);

        for op in &ops {
            match to_edit(op, model.len()) {
                Some(edit) => {
                    edit.apply(&mut model);
                    tb.apply_edit(&edit);
                }
                None => {
                    if let Op::Style(at, n) = op {
                        let start = at % (model.len() + 1);
                        tb.set_style_range(start, start + n, &StyleDeclaration::new().fill(RED));
                    }
                }
            }
            prop_assert_eq!(tb.text(), model.concat());

            let shown: String = tb.lines().iter().flatten().map(String::as_str).collect();
            prop_assert_eq!(shown, model.concat().replace('\n', ""));

            let line_count = model.iter().filter(|g| g.as_str() == "\n").count() + 1;
            let last = tb.styles().lines().map(|(line, _)| line).last();
            if let Some(last) = last {
                prop_assert!(last < line_count + 1, "run on line {} of {}", last, line_count);
            }
        }
    }

    #[test]
    fn painting_never_unbalances_the_surface(
        text in text_strategy(),
        start in 0usize..30,
        len in 0usize..10,
    ) {
        let mut tb = VerticalTextbox::new(text, FixedMeasurer::new()).with_height(90.0);
        tb.set_style_range(
            start,
            start + len,
            &StyleDeclaration::new().underline(true).background(RED),
        );
        tb.set_selection(start, start + len);
        let mut surface = RecordingSurface::new();
        tb.render(&mut surface);
        tb.render_editing(&mut surface, 0.5, 2.0);
        prop_assert!(surface.is_balanced());
    }
}
