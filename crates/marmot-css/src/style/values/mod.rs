//! CSS value types and resolution per [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/).
//!
//! Values are parsed from component values into tagged types exactly once;
//! nothing downstream re-parses strings. Resolution happens in two steps:
//!
//! - At style time, [`LengthValue::to_size`] resolves everything a
//!   [`ResolveContext`] can answer (absolute units, `em`, `rem`, `vw`,
//!   `vh`). Percentages and `calc()` terms that mention percentages stay
//!   symbolic inside a [`Size`].
//! - At layout time, [`Size::resolve`] collapses the rest against the
//!   containing block's size, or reports `None` when the base itself is
//!   still `auto`.
//!
//! # Value Processing Stages
//!
//! [§ 4.4 Used Values](https://www.w3.org/TR/css-cascade-4/#used-value)
//!
//! "The used value is the result of taking the computed value and completing
//! any remaining calculations to make it the absolute theoretical value
//! used in the formatting of the document."

pub mod calc;
pub mod color;
pub mod grid;
pub mod keywords;
pub mod length;

pub use calc::CalcExpr;
pub use color::Rgba;
pub use grid::{GridLine, RepeatCount, TemplateEntry, TrackSize, TrackTemplate};
pub use keywords::{
    AlignContent, AlignItems, AlignSelf, Display, FlexDirection, FlexWrap, JustifyContent,
    TextAlign,
};
pub use length::{AutoLength, LengthValue, Size};

use crate::parser::ComponentValue;
use crate::tokenizer::CssToken;

/// User agent default font size.
///
/// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// "Initial: medium" - we define medium as 16px per common browser convention.
pub const DEFAULT_FONT_SIZE_PX: f64 = 16.0;

/// [§ 4.4 Used Values](https://www.w3.org/TR/css-cascade-4/#used-value)
///
/// "The used value is the result of taking the computed value and completing
/// any remaining calculations to make it the absolute theoretical value."
///
/// Context required to resolve relative CSS units to absolute pixel values.
#[derive(Debug, Clone, Copy)]
pub struct ResolveContext {
    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    ///
    /// "em: Equal to the computed value of the font-size property of the
    /// element on which it is used."
    pub font_size: f64,

    /// The parent element's computed font size. `font-size` percentages and
    /// `em` values in `font-size` itself resolve against this.
    pub parent_font_size: f64,

    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    ///
    /// "rem: Equal to the computed value of font-size on the root element."
    pub root_font_size: f64,

    /// [§ 5.1.2 Viewport-percentage lengths](https://www.w3.org/TR/css-values-4/#viewport-relative-lengths)
    ///
    /// "The viewport-percentage lengths are relative to the size of the
    /// initial containing block."
    pub viewport_width: f64,

    /// [§ 5.1.2 Viewport-percentage lengths](https://www.w3.org/TR/css-values-4/#viewport-relative-lengths)
    pub viewport_height: f64,

    /// The containing block's content width, when known. Width-like
    /// percentages (and margin/padding percentages) resolve against this.
    pub container_width: Option<f64>,

    /// The containing block's content height, when definite. Height-like
    /// percentages resolve against this; with `None` they stay `auto`.
    pub container_height: Option<f64>,
}

impl ResolveContext {
    /// Create a context with default font sizes (16px) and the viewport as
    /// the containing block.
    #[must_use]
    pub const fn with_viewport(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE_PX,
            parent_font_size: DEFAULT_FONT_SIZE_PX,
            root_font_size: DEFAULT_FONT_SIZE_PX,
            viewport_width,
            viewport_height,
            container_width: Some(viewport_width),
            container_height: Some(viewport_height),
        }
    }

    /// Derive a context for an element with the given computed font size.
    #[must_use]
    pub const fn with_font_size(self, font_size: f64) -> Self {
        Self {
            parent_font_size: self.font_size,
            font_size,
            ..self
        }
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::with_viewport(0.0, 0.0)
    }
}

/// Filter out whitespace tokens from a component value list.
///
/// Declaration values keep the whitespace the tokenizer produced; almost
/// every consumer only cares about the significant parts.
#[must_use]
pub fn significant(values: &[ComponentValue]) -> Vec<&ComponentValue> {
    values
        .iter()
        .filter(|v| !matches!(v, ComponentValue::Token(CssToken::Whitespace)))
        .collect()
}

/// Split a component value list into whitespace-separated groups.
///
/// Used by shorthand expansion (`margin: 4px 8px`) and multi-part values
/// (`grid-template-columns: 1fr 2fr`).
#[must_use]
pub fn split_spaces(values: &[ComponentValue]) -> Vec<Vec<ComponentValue>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    for value in values {
        if matches!(value, ComponentValue::Token(CssToken::Whitespace)) {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(value.clone());
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}

/// Extract the single significant ident from a value, lowercased.
///
/// Returns `None` when the value is not exactly one ident token.
#[must_use]
pub fn single_ident(values: &[ComponentValue]) -> Option<String> {
    match significant(values).as_slice() {
        [ComponentValue::Token(CssToken::Ident(name))] => Some(name.to_ascii_lowercase()),
        _ => None,
    }
}

/// Extract the single significant number from a value.
#[must_use]
pub fn single_number(values: &[ComponentValue]) -> Option<f64> {
    match significant(values).as_slice() {
        [ComponentValue::Token(CssToken::Number(n))] => Some(*n),
        _ => None,
    }
}
