#![forbid(unsafe_code)]

//! Complete and partial text styles.
//!
//! A [`TextStyle`] is fully resolved: every property has a value. The text
//! object owns one as its default. A [`StyleDeclaration`] is a partial
//! override stored per character; [`TextStyle::patch`] layers it on top of
//! the default to get what is actually painted.
//!
//! # Example
//! ```
//! use tate_core::Rgba;
//! use tate_style::{StyleDeclaration, TextStyle};
//!
//! let base = TextStyle::default();
//! let decl = StyleDeclaration::new().fill(Rgba::rgb(200, 0, 0)).underline(true);
//! let painted = base.patch(&decl);
//! assert_eq!(painted.fill, Rgba::rgb(200, 0, 0));
//! assert!(painted.underline);
//! assert_eq!(painted.font_size, base.font_size);
//! ```

use std::fmt;

use tate_core::Rgba;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Font weight as accepted by a CSS font declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    /// Numeric weight (100..=900).
    Numeric(u16),
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Bold => f.write_str("bold"),
            Self::Numeric(w) => write!(f, "{w}"),
        }
    }
}

#[cfg(feature = "serde")]
impl Serialize for FontWeight {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Numeric(w) => serializer.serialize_u16(*w),
            other => serializer.collect_str(other),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u16),
            Text(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Number(w) => Ok(Self::Numeric(w)),
            Raw::Text(s) => match s.as_str() {
                "normal" => Ok(Self::Normal),
                "bold" => Ok(Self::Bold),
                other => other
                    .parse()
                    .map(Self::Numeric)
                    .map_err(|_| serde::de::Error::custom(format!("invalid font weight: {other}"))),
            },
        }
    }
}

/// Font slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        })
    }
}

/// Names of the properties a declaration can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    Fill,
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    Underline,
    Overline,
    Linethrough,
    DeltaY,
    TextBackgroundColor,
}

/// The three line decorations a run can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    Underline,
    Overline,
    Linethrough,
}

impl DecorationKind {
    /// The style property toggling this decoration.
    #[must_use]
    pub const fn property(self) -> StyleProperty {
        match self {
            Self::Underline => StyleProperty::Underline,
            Self::Overline => StyleProperty::Overline,
            Self::Linethrough => StyleProperty::Linethrough,
        }
    }
}

/// A complete style: the object default every character inherits.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct TextStyle {
    pub fill: Rgba,
    pub font_family: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub underline: bool,
    pub overline: bool,
    pub linethrough: bool,
    /// Baseline shift.
    pub delta_y: f64,
    pub text_background_color: Option<Rgba>,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            fill: Rgba::BLACK,
            font_family: "Times New Roman".to_string(),
            font_size: 40.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            underline: false,
            overline: false,
            linethrough: false,
            delta_y: 0.0,
            text_background_color: None,
        }
    }
}

impl TextStyle {
    /// Apply a declaration on top of this style.
    ///
    /// Properties set in `decl` win; everything else is inherited.
    #[must_use]
    pub fn patch(&self, decl: &StyleDeclaration) -> TextStyle {
        TextStyle {
            fill: decl.fill.unwrap_or(self.fill),
            font_family: decl
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            font_size: decl.font_size.unwrap_or(self.font_size),
            font_weight: decl.font_weight.unwrap_or(self.font_weight),
            font_style: decl.font_style.unwrap_or(self.font_style),
            underline: decl.underline.unwrap_or(self.underline),
            overline: decl.overline.unwrap_or(self.overline),
            linethrough: decl.linethrough.unwrap_or(self.linethrough),
            delta_y: decl.delta_y.unwrap_or(self.delta_y),
            text_background_color: decl.text_background_color.or(self.text_background_color),
        }
    }

    /// Whether a decoration is switched on.
    #[must_use]
    pub const fn decoration(&self, kind: DecorationKind) -> bool {
        match kind {
            DecorationKind::Underline => self.underline,
            DecorationKind::Overline => self.overline,
            DecorationKind::Linethrough => self.linethrough,
        }
    }

    /// Background color, if one paints anything.
    #[must_use]
    pub fn background(&self) -> Option<Rgba> {
        self.text_background_color.filter(|c| !c.is_transparent())
    }

    /// CSS font shorthand for the drawing surface.
    #[must_use]
    pub fn css_font(&self) -> String {
        format!(
            "{} {} {}px \"{}\"",
            self.font_style, self.font_weight, self.font_size, self.font_family
        )
    }

    /// Whether two styles would paint glyphs differently.
    ///
    /// Decorations and backgrounds are painted in separate passes and do
    /// not split glyph runs.
    #[must_use]
    pub fn glyphs_differ(&self, other: &TextStyle) -> bool {
        self.fill != other.fill
            || self.font_size != other.font_size
            || self.font_family != other.font_family
            || self.font_weight != other.font_weight
            || self.font_style != other.font_style
            || self.delta_y != other.delta_y
    }
}

/// A partial style stored for one character.
///
/// An empty declaration (no property set) is equivalent to no declaration.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct StyleDeclaration {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub fill: Option<Rgba>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub font_family: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub font_size: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub font_weight: Option<FontWeight>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub font_style: Option<FontStyle>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub underline: Option<bool>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub overline: Option<bool>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub linethrough: Option<bool>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub delta_y: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub text_background_color: Option<Rgba>,
}

impl StyleDeclaration {
    /// An empty declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A declaration carrying every property of `style`.
    #[must_use]
    pub fn from_style(style: &TextStyle) -> Self {
        Self {
            fill: Some(style.fill),
            font_family: Some(style.font_family.clone()),
            font_size: Some(style.font_size),
            font_weight: Some(style.font_weight),
            font_style: Some(style.font_style),
            underline: Some(style.underline),
            overline: Some(style.overline),
            linethrough: Some(style.linethrough),
            delta_y: Some(style.delta_y),
            text_background_color: Some(style.text_background_color.unwrap_or(Rgba::TRANSPARENT)),
        }
    }

    #[must_use]
    pub fn fill(mut self, color: Rgba) -> Self {
        self.fill = Some(color);
        self
    }

    #[must_use]
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    #[must_use]
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    #[must_use]
    pub fn font_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    #[must_use]
    pub fn font_style(mut self, style: FontStyle) -> Self {
        self.font_style = Some(style);
        self
    }

    #[must_use]
    pub fn underline(mut self, on: bool) -> Self {
        self.underline = Some(on);
        self
    }

    #[must_use]
    pub fn overline(mut self, on: bool) -> Self {
        self.overline = Some(on);
        self
    }

    #[must_use]
    pub fn linethrough(mut self, on: bool) -> Self {
        self.linethrough = Some(on);
        self
    }

    #[must_use]
    pub fn delta_y(mut self, shift: f64) -> Self {
        self.delta_y = Some(shift);
        self
    }

    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.text_background_color = Some(color);
        self
    }

    /// No property set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether `property` is explicitly set.
    #[must_use]
    pub fn has(&self, property: StyleProperty) -> bool {
        match property {
            StyleProperty::Fill => self.fill.is_some(),
            StyleProperty::FontFamily => self.font_family.is_some(),
            StyleProperty::FontSize => self.font_size.is_some(),
            StyleProperty::FontWeight => self.font_weight.is_some(),
            StyleProperty::FontStyle => self.font_style.is_some(),
            StyleProperty::Underline => self.underline.is_some(),
            StyleProperty::Overline => self.overline.is_some(),
            StyleProperty::Linethrough => self.linethrough.is_some(),
            StyleProperty::DeltaY => self.delta_y.is_some(),
            StyleProperty::TextBackgroundColor => self.text_background_color.is_some(),
        }
    }

    /// Copy every property set in `other` into `self`.
    pub fn extend(&mut self, other: &StyleDeclaration) {
        if other.fill.is_some() {
            self.fill = other.fill;
        }
        if other.font_family.is_some() {
            self.font_family.clone_from(&other.font_family);
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.font_weight.is_some() {
            self.font_weight = other.font_weight;
        }
        if other.font_style.is_some() {
            self.font_style = other.font_style;
        }
        if other.underline.is_some() {
            self.underline = other.underline;
        }
        if other.overline.is_some() {
            self.overline = other.overline;
        }
        if other.linethrough.is_some() {
            self.linethrough = other.linethrough;
        }
        if other.delta_y.is_some() {
            self.delta_y = other.delta_y;
        }
        if other.text_background_color.is_some() {
            self.text_background_color = other.text_background_color;
        }
    }
}
