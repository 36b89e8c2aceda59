#![forbid(unsafe_code)]

//! Text edits and host input diffing.
//!
//! Every mutation of the text is expressed as one [`Edit`]. Hosts that
//! capture keyboard and IME input through a hidden text field report a
//! [`TextInput`] snapshot after each input event; [`Edit::from_input`]
//! diffs that snapshot against the current text and selection to recover
//! what was removed and what was inserted.
//!
//! All offsets are grapheme offsets into the flat text, where a line break
//! counts as one grapheme.

use std::ops::Range;

use tate_style::StyleDeclaration;

use crate::script::graphemes;

/// Kind of a host input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Paste,
    InsertText,
    InsertComposition,
    InsertFromComposition,
    DeleteBackward,
    DeleteWordBackward,
    InsertLineBreak,
    DeleteComposition,
    Cut,
    /// Anything else; ignored.
    Other,
}

impl InputKind {
    /// Map a DOM `InputEvent.inputType` name.
    #[must_use]
    pub fn from_input_type(name: &str) -> Self {
        match name {
            "insertFromPaste" => Self::Paste,
            "insertText" => Self::InsertText,
            "insertCompositionText" => Self::InsertComposition,
            "insertFromComposition" => Self::InsertFromComposition,
            "deleteContentBackward" => Self::DeleteBackward,
            "deleteWordBackward" => Self::DeleteWordBackward,
            "insertLineBreak" => Self::InsertLineBreak,
            "deleteCompositionText" => Self::DeleteComposition,
            "deleteByCut" => Self::Cut,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn is_composition(self) -> bool {
        matches!(self, Self::InsertComposition | Self::DeleteComposition)
    }
}

/// Snapshot of the host's hidden text field after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub kind: InputKind,
    /// Full new value of the field.
    pub value: String,
    /// Selection in `value`, in graphemes.
    pub selection_start: usize,
    pub selection_end: usize,
}

impl TextInput {
    #[must_use]
    pub fn new(kind: InputKind, value: impl Into<String>, caret: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            selection_start: caret,
            selection_end: caret,
        }
    }

    #[must_use]
    pub fn selection(mut self, start: usize, end: usize) -> Self {
        self.selection_start = start;
        self.selection_end = end;
        self
    }
}

/// One mutation of the text.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Insert {
        at: usize,
        text: String,
    },
    Delete {
        range: Range<usize>,
    },
    Replace {
        range: Range<usize>,
        text: String,
    },
    /// Pasted text, optionally carrying the styles it was copied with
    /// (one declaration per inserted grapheme).
    PasteBlock {
        range: Range<usize>,
        text: String,
        styles: Option<Vec<StyleDeclaration>>,
    },
    /// IME composition replaced `range` with its current candidate.
    CompositionUpdate {
        range: Range<usize>,
        text: String,
    },
}

impl Edit {
    /// Range of the old text that is removed.
    #[must_use]
    pub fn removed(&self) -> Range<usize> {
        match self {
            Self::Insert { at, .. } => *at..*at,
            Self::Delete { range }
            | Self::Replace { range, .. }
            | Self::PasteBlock { range, .. }
            | Self::CompositionUpdate { range, .. } => range.clone(),
        }
    }

    /// Text inserted at the start of [`removed`](Self::removed).
    #[must_use]
    pub fn inserted(&self) -> &str {
        match self {
            Self::Delete { .. } => "",
            Self::Insert { text, .. }
            | Self::Replace { text, .. }
            | Self::PasteBlock { text, .. }
            | Self::CompositionUpdate { text, .. } => text,
        }
    }

    #[must_use]
    pub fn start(&self) -> usize {
        self.removed().start
    }

    #[must_use]
    pub fn is_paste(&self) -> bool {
        matches!(self, Self::PasteBlock { .. })
    }

    #[must_use]
    pub fn is_composition(&self) -> bool {
        matches!(self, Self::CompositionUpdate { .. })
    }

    /// Styles carried by a paste.
    #[must_use]
    pub fn pasted_styles(&self) -> Option<&[StyleDeclaration]> {
        match self {
            Self::PasteBlock {
                styles: Some(styles),
                ..
            } => Some(styles),
            _ => None,
        }
    }

    /// Apply to a flat grapheme sequence. Out-of-range offsets clamp.
    pub fn apply(&self, text: &mut Vec<String>) {
        let removed = self.removed();
        let end = removed.end.min(text.len());
        let start = removed.start.min(end);
        text.splice(start..end, graphemes(self.inserted()));
    }

    /// Diff a host input snapshot against `old` and its `selection`.
    ///
    /// Returns `None` for ignored input kinds and for snapshots that change
    /// nothing.
    #[must_use]
    pub fn from_input(old: &[String], selection: Range<usize>, input: &TextInput) -> Option<Self> {
        if input.kind == InputKind::Other {
            return None;
        }
        let new = graphemes(&input.value);
        let (n, m) = (old.len(), new.len());
        let sel_end = selection.end.min(n);
        let sel_start = selection.start.min(sel_end);

        let removed = if sel_start != sel_end {
            sel_start..sel_end
        } else if m < n {
            let count = n - m;
            if sel_start > input.selection_start {
                sel_end.saturating_sub(count)..sel_end
            } else {
                sel_start..(sel_start + count).min(n)
            }
        } else {
            sel_start..sel_start
        };

        let inserted_len = (m + removed.len()).saturating_sub(n);
        let caret = input.selection_end.min(m);
        let inserted = new[caret.saturating_sub(inserted_len)..caret].concat();

        if removed.is_empty() && inserted.is_empty() {
            return None;
        }
        let edit = match input.kind {
            InputKind::Paste => Self::PasteBlock {
                range: removed,
                text: inserted,
                styles: None,
            },
            kind if kind.is_composition() => Self::CompositionUpdate {
                range: removed,
                text: inserted,
            },
            _ if removed.is_empty() => Self::Insert {
                at: removed.start,
                text: inserted,
            },
            _ if inserted.is_empty() => Self::Delete { range: removed },
            _ => Self::Replace {
                range: removed,
                text: inserted,
            },
        };
        Some(edit)
    }
}
