//! Property tests for the style run store.
//!
//! Run:
//!   cargo test -p tate-style --test style_run_props

use tate_core::Rgba;
use tate_style::{LogicalPosition, StyleDeclaration, StyleRuns, expected_line_len};

use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn arb_decl() -> impl Strategy<Value = StyleDeclaration> {
    prop_oneof![
        1 => Just(StyleDeclaration::new()),
        4 => (any::<u8>(), any::<bool>()).prop_map(|(r, underline)| {
            StyleDeclaration::new().fill(Rgba::rgb(r, 0, 0)).underline(underline)
        }),
    ]
}

/// Logical line lengths plus a sparse, possibly broken run store.
fn arb_text_and_runs() -> impl Strategy<Value = (Vec<usize>, StyleRuns)> {
    prop::collection::vec(0usize..8, 1..6).prop_flat_map(|lens| {
        let entries = prop::collection::vec((0usize..8, 0usize..10, arb_decl()), 0..24);
        (Just(lens), entries).prop_map(|(lens, entries)| {
            let mut runs = StyleRuns::new();
            for (line, ch, decl) in entries {
                runs.set(LogicalPosition::new(line, ch), decl);
            }
            (lens, runs)
        })
    })
}

fn arb_inserted() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("\n"), Just("a"), Just("ab\ncd"), Just("")]
}

// ═════════════════════════════════════════════════════════════════════════
// Integrity repair
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn repair_is_idempotent((lens, runs) in arb_text_and_runs(), inserted in arb_inserted()) {
        let mut once = runs.clone();
        once.repair(&lens, inserted);
        let mut twice = once.clone();
        twice.repair(&lens, inserted);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn repaired_runs_stay_within_text((lens, runs) in arb_text_and_runs(), inserted in arb_inserted()) {
        let mut runs = runs;
        let marked = runs.integrity_check(&lens, inserted);
        runs.repair(&lens, inserted);
        for (line, run) in runs.lines() {
            prop_assert!(line < lens.len());
            if marked.iter().any(|m| m.line == line) {
                let expected = expected_line_len(line, lens[line], lens.len());
                let keys: Vec<usize> = run.keys().copied().collect();
                prop_assert_eq!(keys, (0..expected).collect::<Vec<_>>());
            }
        }
    }

    #[test]
    fn empty_slots_survive_only_without_a_donor((lens, runs) in arb_text_and_runs(), inserted in arb_inserted()) {
        let mut runs = runs;
        runs.repair(&lens, inserted);
        for (line, run) in runs.lines() {
            if run.values().any(StyleDeclaration::is_empty) {
                let donor = runs
                    .lines()
                    .filter(|(other, _)| *other != line)
                    .flat_map(|(_, other)| other.values())
                    .any(|d| !d.is_empty());
                prop_assert!(!donor, "line {} kept an empty slot beside a donor", line);
            }
        }
    }

    #[test]
    fn repair_never_moves_a_declaration_left((lens, runs) in arb_text_and_runs(), inserted in arb_inserted()) {
        let mut repaired = runs.clone();
        repaired.repair(&lens, inserted);
        for (line, run) in runs.lines().filter(|(line, _)| *line < lens.len()) {
            let dense = run.keys().copied().eq(0..run.len());
            if !dense {
                continue;
            }
            for (&ch, decl) in run.iter().filter(|(_, d)| !d.is_empty()) {
                if let Some(after) = repaired.get(LogicalPosition::new(line, ch)) {
                    prop_assert_eq!(after, decl);
                }
            }
        }
    }

    #[test]
    fn insert_then_remove_restores_line((lens, runs) in arb_text_and_runs(), ch in 0usize..8, qty in 1usize..4) {
        let _ = lens;
        let mut edited = runs.clone();
        edited.insert_chars(0, ch, qty, None);
        edited.remove_range(LogicalPosition::new(0, ch), LogicalPosition::new(0, ch + qty));
        prop_assert_eq!(edited.line(0), runs.line(0));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Editing scenarios
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn enter_at_end_of_styled_text_keeps_style() {
    // "ab" fully red; Enter typed at the end leaves line 1 unstyled until
    // repair borrows from line 0.
    let red = StyleDeclaration::new().fill(Rgba::rgb(255, 0, 0));
    let mut runs = StyleRuns::new();
    runs.set(LogicalPosition::new(0, 0), red.clone());
    runs.set(LogicalPosition::new(0, 1), red.clone());

    runs.insert_block(LogicalPosition::new(0, 2), &["\n"], None, 2);
    runs.repair(&[2, 0], "\n");

    assert_eq!(runs.get(LogicalPosition::new(1, 0)), Some(&red));
    assert!(runs.integrity_check(&[2, 0], "\n").is_empty());
}

#[test]
fn deleting_a_line_break_joins_runs() {
    let red = StyleDeclaration::new().fill(Rgba::rgb(255, 0, 0));
    let blue = StyleDeclaration::new().fill(Rgba::rgb(0, 0, 255));
    let mut runs = StyleRuns::new();
    runs.set(LogicalPosition::new(0, 0), red.clone());
    runs.set(LogicalPosition::new(1, 0), blue.clone());

    // "a\nb" → "ab": the break sits at 0:1.
    runs.remove_range(LogicalPosition::new(0, 1), LogicalPosition::new(1, 0));
    assert_eq!(runs.get(LogicalPosition::new(0, 0)), Some(&red));
    assert_eq!(runs.get(LogicalPosition::new(0, 1)), Some(&blue));
    assert!(runs.line(1).is_none());
}
