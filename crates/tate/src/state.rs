#![forbid(unsafe_code)]

//! Saved textbox state.
//!
//! The JSON shape follows the canvas object model hosts already persist:
//! camelCase keys, a `type` tag, style runs as nested index maps.
//!
//! ```json
//! {
//!   "type": "vertical-textbox",
//!   "text": "縦書き",
//!   "styles": { "0": { "1": { "fill": "#ff0000" } } },
//!   "width": 52.4, "height": 200.0, "minHeight": 200.0,
//!   "splitByGrapheme": true, "lineHeight": 1.16, "charSpacing": 0.0,
//!   "flipX": false, "direction": "rtl",
//!   "style": { "fontSize": 40.0, "fontFamily": "Times New Roman" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use tate_style::{StyleRuns, TextStyle};
use tate_text::config::DEFAULT_LINE_HEIGHT;
use tate_text::{FontMeasurer, LayoutConfig};

use crate::error::{Result, TextboxError};
use crate::textbox::VerticalTextbox;

/// `type` tag of a saved vertical textbox.
pub const VERTICAL_TEXTBOX_TYPE: &str = "vertical-textbox";
/// `type` tag of a saved horizontal textbox.
pub const HORIZONTAL_TEXTBOX_TYPE: &str = "textbox";

/// Writing direction recorded with the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    #[default]
    Rtl,
}

const fn default_split() -> bool {
    true
}

const fn default_line_height() -> f64 {
    DEFAULT_LINE_HEIGHT
}

/// Everything needed to rebuild a textbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextboxState {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    #[serde(default)]
    pub styles: StyleRuns,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub min_height: f64,
    #[serde(default = "default_split")]
    pub split_by_grapheme: bool,
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    #[serde(default)]
    pub char_spacing: f64,
    #[serde(default)]
    pub flip_x: bool,
    #[serde(default)]
    pub direction: Direction,
    /// Object default style.
    #[serde(default)]
    pub style: TextStyle,
}

impl TextboxState {
    fn validate(&self) -> Result<()> {
        if self.kind != VERTICAL_TEXTBOX_TYPE {
            return Err(TextboxError::invalid_state(format!(
                "expected type \"{VERTICAL_TEXTBOX_TYPE}\", found \"{}\"",
                self.kind
            )));
        }
        let dimensions = [
            ("width", self.width),
            ("height", self.height),
            ("minHeight", self.min_height),
        ];
        for (name, value) in dimensions {
            if !value.is_finite() || value < 0.0 {
                return Err(TextboxError::invalid_state(format!("{name} is {value}")));
            }
        }
        if !self.line_height.is_finite() || self.line_height <= 0.0 {
            return Err(TextboxError::invalid_state(format!(
                "lineHeight is {}",
                self.line_height
            )));
        }
        if !self.style.font_size.is_finite() || self.style.font_size <= 0.0 {
            return Err(TextboxError::invalid_state(format!(
                "fontSize is {}",
                self.style.font_size
            )));
        }
        Ok(())
    }
}

impl<M: FontMeasurer> VerticalTextbox<M> {
    /// Snapshot of the persistent properties.
    #[must_use]
    pub fn export_state(&self) -> TextboxState {
        let config = self.config();
        TextboxState {
            kind: VERTICAL_TEXTBOX_TYPE.to_owned(),
            text: self.text().to_owned(),
            styles: self.styles().clone(),
            width: self.width(),
            height: self.height(),
            min_height: self.min_height(),
            split_by_grapheme: config.split_by_grapheme,
            line_height: config.line_height,
            char_spacing: config.char_spacing,
            flip_x: self.flip_x(),
            direction: Direction::Rtl,
            style: self.base_style().clone(),
        }
    }

    /// Rebuild a textbox from saved state and lay it out.
    pub fn from_state(state: TextboxState, measurer: M) -> Result<Self> {
        Self::from_state_with(state, measurer, |_| {})
    }

    /// Like [`from_state`](Self::from_state), handing the textbox to
    /// `callback` before the first layout.
    pub fn from_state_with(
        state: TextboxState,
        measurer: M,
        callback: impl FnOnce(&mut Self),
    ) -> Result<Self> {
        state.validate()?;
        let config = LayoutConfig::new()
            .split_by_grapheme(state.split_by_grapheme)
            .line_height(state.line_height)
            .char_spacing(state.char_spacing);
        let mut textbox = Self::new(state.text, measurer)
            .with_config(config)
            .with_base_style(state.style)
            .with_styles(state.styles)
            .with_width(state.width)
            .with_height(state.height)
            .with_min_height(state.min_height)
            .with_flip_x(state.flip_x);
        callback(&mut textbox);
        let height = textbox.height();
        textbox.layout(height);
        Ok(textbox)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.export_state())?)
    }

    pub fn from_json(json: &str, measurer: M) -> Result<Self> {
        let state: TextboxState = serde_json::from_str(json)?;
        Self::from_state(state, measurer)
    }
}
