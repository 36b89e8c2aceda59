#![forbid(unsafe_code)]

//! Switching between vertical and horizontal textboxes.
//!
//! A vertical textbox's column height is the horizontal box's line width,
//! and its summed column thickness the horizontal box's height. Text, style
//! runs and the wrapping mode carry over unchanged.

use serde::{Deserialize, Serialize};
use tate_style::{StyleRuns, TextStyle};
use tate_text::FontMeasurer;

use crate::error::Result;
use crate::state::{Direction, HORIZONTAL_TEXTBOX_TYPE, TextboxState, VERTICAL_TEXTBOX_TYPE};
use crate::textbox::VerticalTextbox;

/// A left-to-right horizontal textbox, as handed to or received from the
/// host's horizontal text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalTextbox {
    pub text: String,
    #[serde(default)]
    pub styles: StyleRuns,
    pub width: f64,
    pub height: f64,
    pub split_by_grapheme: bool,
    pub line_height: f64,
    pub char_spacing: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub style: TextStyle,
}

impl HorizontalTextbox {
    /// Saved form, tagged as a horizontal textbox.
    #[must_use]
    pub fn to_state(&self) -> TextboxState {
        TextboxState {
            kind: HORIZONTAL_TEXTBOX_TYPE.to_owned(),
            text: self.text.clone(),
            styles: self.styles.clone(),
            width: self.width,
            height: self.height,
            min_height: 0.0,
            split_by_grapheme: self.split_by_grapheme,
            line_height: self.line_height,
            char_spacing: self.char_spacing,
            flip_x: self.flip_x,
            direction: Direction::Ltr,
            style: self.style.clone(),
        }
    }
}

impl<M: FontMeasurer> VerticalTextbox<M> {
    /// The same text laid out horizontally.
    #[must_use]
    pub fn to_horizontal(&self) -> HorizontalTextbox {
        let state = self.export_state();
        HorizontalTextbox {
            text: state.text,
            styles: state.styles,
            width: state.height,
            height: state.width,
            split_by_grapheme: state.split_by_grapheme,
            line_height: state.line_height,
            char_spacing: state.char_spacing,
            flip_x: state.flip_x,
            style: state.style,
        }
    }

    /// Turn a horizontal textbox vertical. Its line width becomes the
    /// column height and the smallest height a resize accepts.
    pub fn from_horizontal(textbox: HorizontalTextbox, measurer: M) -> Result<Self> {
        let state = TextboxState {
            kind: VERTICAL_TEXTBOX_TYPE.to_owned(),
            text: textbox.text,
            styles: textbox.styles,
            width: textbox.height,
            height: textbox.width,
            min_height: textbox.width,
            split_by_grapheme: textbox.split_by_grapheme,
            line_height: textbox.line_height,
            char_spacing: textbox.char_spacing,
            flip_x: textbox.flip_x,
            direction: Direction::Rtl,
            style: textbox.style,
        };
        Self::from_state(state, measurer)
    }
}
