//! Length values and their resolution.
//!
//! [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
//!
//! "Lengths refer to distance measurements and are denoted by <length> in
//! the property definitions."
//!
//! Absolute units other than `px` are collapsed to `px` while parsing
//! ("all of the absolute length units are compatible, and px is their
//! canonical unit"), so only units that need context survive as variants.

use serde::Serialize;

use super::calc::CalcExpr;
use super::{ResolveContext, significant};
use crate::parser::ComponentValue;
use crate::tokenizer::CssToken;

/// [§ 5 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
///
/// A `<length-percentage>` value as parsed from a declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LengthValue {
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    ///
    /// "1px = 1/96th of 1in". Also holds `pt`, `pc`, `in`, `cm` and `mm`
    /// values after their fixed-ratio conversion.
    Px(f64),

    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    ///
    /// "Equal to the computed value of the font-size property of the element
    /// on which it is used."
    Em(f64),

    /// [§ 5.1.1 Font-relative lengths](https://www.w3.org/TR/css-values-4/#font-relative-lengths)
    ///
    /// "Equal to the computed value of font-size on the root element."
    Rem(f64),

    /// [§ 5.1.2 Viewport-percentage lengths](https://www.w3.org/TR/css-values-4/#viewport-relative-lengths)
    ///
    /// "1vw = 1% of viewport width"
    Vw(f64),

    /// [§ 5.1.2 Viewport-percentage lengths](https://www.w3.org/TR/css-values-4/#viewport-relative-lengths)
    ///
    /// "1vh = 1% of viewport height"
    Vh(f64),

    /// [§ 5.1.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    ///
    /// "Percentage values are always relative to another quantity." The
    /// reference quantity depends on the property, so percentages stay
    /// symbolic until the caller supplies a base.
    Percent(f64),

    /// [§ 10 Mathematical Expressions](https://www.w3.org/TR/css-values-4/#calc-func)
    ///
    /// A `calc()` expression, kept as an AST so percentage terms can be
    /// deferred alongside plain percentages.
    Calc(Box<CalcExpr>),
}

impl LengthValue {
    /// Convert a dimension token into a length.
    ///
    /// [§ 6.1 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
    ///
    /// "1in = 2.54cm = 96px; 1pt = 1/72th of 1in; 1pc = 1/6th of 1in"
    #[must_use]
    pub fn from_dimension(value: f64, unit: &str) -> Option<Self> {
        if unit.eq_ignore_ascii_case("px") {
            Some(Self::Px(value))
        } else if unit.eq_ignore_ascii_case("em") {
            Some(Self::Em(value))
        } else if unit.eq_ignore_ascii_case("rem") {
            Some(Self::Rem(value))
        } else if unit.eq_ignore_ascii_case("vw") {
            Some(Self::Vw(value))
        } else if unit.eq_ignore_ascii_case("vh") {
            Some(Self::Vh(value))
        } else if unit.eq_ignore_ascii_case("pt") {
            Some(Self::Px(value * 96.0 / 72.0))
        } else if unit.eq_ignore_ascii_case("pc") {
            Some(Self::Px(value * 16.0))
        } else if unit.eq_ignore_ascii_case("in") {
            Some(Self::Px(value * 96.0))
        } else if unit.eq_ignore_ascii_case("cm") {
            Some(Self::Px(value * 96.0 / 2.54))
        } else if unit.eq_ignore_ascii_case("mm") {
            Some(Self::Px(value * 96.0 / 25.4))
        } else {
            None
        }
    }

    /// Resolve to a [`Size`], deferring percentage parts.
    ///
    /// [§ 4.4 Used Values](https://www.w3.org/TR/css-cascade-4/#used-value)
    ///
    /// Font-relative and viewport-relative units resolve here; percentages
    /// and percentage-bearing `calc()` results wait for a layout-time base.
    /// A `calc()` expression that fails to evaluate yields zero.
    #[must_use]
    pub fn to_size(&self, ctx: &ResolveContext) -> Size {
        match self {
            Self::Px(v) => Size::Px(*v),
            Self::Em(v) => Size::Px(*v * ctx.font_size),
            Self::Rem(v) => Size::Px(*v * ctx.root_font_size),
            Self::Vw(v) => Size::Px(*v * ctx.viewport_width / 100.0),
            Self::Vh(v) => Size::Px(*v * ctx.viewport_height / 100.0),
            Self::Percent(p) => Size::Percent(*p),
            Self::Calc(expr) => match expr.resolve(ctx) {
                Some((px, percent)) => Size::Calc { px, percent },
                None => Size::Px(0.0),
            },
        }
    }

    /// Resolve fully to pixels, given a percentage base.
    ///
    /// Used for properties that must end up numeric at style time
    /// (`font-size`, `line-height`, border widths). Returns `None` when the
    /// value needs a base that is not available; a failed `calc()` yields
    /// zero.
    #[must_use]
    pub fn to_px(&self, ctx: &ResolveContext, percent_base: Option<f64>) -> Option<f64> {
        match self {
            Self::Percent(p) => percent_base.map(|base| *p * base / 100.0),
            Self::Calc(expr) => match expr.resolve(ctx) {
                Some((px, percent)) => {
                    if percent == 0.0 {
                        Some(px)
                    } else {
                        percent_base.map(|base| px + percent * base / 100.0)
                    }
                }
                None => Some(0.0),
            },
            _ => match self.to_size(ctx) {
                Size::Px(v) => Some(v),
                _ => None,
            },
        }
    }
}

/// [§ 4.4 Automatic values](https://www.w3.org/TR/CSS2/cascade.html#value-def-auto)
///
/// "Some properties can take the keyword 'auto' as a value. This keyword
/// allows the user agent to compute the value based on other properties."
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AutoLength {
    /// The value is 'auto' and will be resolved during layout.
    Auto,
    /// A specific length value.
    Length(LengthValue),
}

impl AutoLength {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve to a [`Size`]; `auto` stays `auto`.
    #[must_use]
    pub fn to_size(&self, ctx: &ResolveContext) -> Size {
        match self {
            Self::Auto => Size::Auto,
            Self::Length(len) => len.to_size(ctx),
        }
    }
}

impl From<LengthValue> for AutoLength {
    fn from(len: LengthValue) -> Self {
        Self::Length(len)
    }
}

/// A computed size, with layout-dependent parts still symbolic.
///
/// [§ 4.4 Used Values](https://www.w3.org/TR/css-cascade-4/#used-value)
///
/// Everything the style stage can resolve is already pixels; what remains
/// is `auto`, a percentage of the containing block, or a `calc()` linear
/// combination of the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Size {
    /// Resolved during layout from context.
    Auto,
    /// An absolute pixel value.
    Px(f64),
    /// A percentage of a layout-time base.
    Percent(f64),
    /// A `calc()` result: `px + percent% of base`.
    Calc {
        /// The absolute pixel part.
        px: f64,
        /// The percentage part.
        percent: f64,
    },
}

impl Size {
    /// Check if the value is 'auto'.
    #[must_use]
    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Resolve against a containing-block base.
    ///
    /// [§ 5.1.3 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
    ///
    /// "Percentage values are always relative to another quantity."
    ///
    /// `Auto` resolves to `None`, as does a percentage whose base is itself
    /// unresolved — the caller falls back to the property's initial value.
    #[must_use]
    pub fn resolve(&self, base: Option<f64>) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Px(v) => Some(*v),
            Self::Percent(p) => base.map(|b| *p * b / 100.0),
            Self::Calc { px, percent } => {
                if *percent == 0.0 {
                    Some(*px)
                } else {
                    base.map(|b| *px + *percent * b / 100.0)
                }
            }
        }
    }

    /// Resolve against a base, with a fallback for `auto`/unresolvable.
    #[must_use]
    pub fn resolve_or(&self, base: Option<f64>, fallback: f64) -> f64 {
        self.resolve(base).unwrap_or(fallback)
    }
}

impl Default for Size {
    fn default() -> Self {
        Self::Auto
    }
}

/// Parse a single `<length-percentage>` from a declaration value.
///
/// Accepts a dimension, a percentage, a bare number (treated as pixels),
/// or a `calc()` function. Returns `None` for anything else.
#[must_use]
pub fn parse_length(values: &[ComponentValue]) -> Option<LengthValue> {
    match significant(values).as_slice() {
        [single] => parse_length_component(single),
        _ => None,
    }
}

/// Parse one component value as a `<length-percentage>`.
#[must_use]
pub fn parse_length_component(value: &ComponentValue) -> Option<LengthValue> {
    match value {
        ComponentValue::Token(CssToken::Dimension { value, unit }) => {
            LengthValue::from_dimension(*value, unit)
        }
        ComponentValue::Token(CssToken::Percentage(p)) => Some(LengthValue::Percent(*p)),
        // Unitless numbers are tolerated as pixels (authors write `margin: 0`,
        // and tools emit unitless lengths more often than the grammar allows).
        ComponentValue::Token(CssToken::Number(n)) => Some(LengthValue::Px(*n)),
        ComponentValue::Function { name, value } if name.eq_ignore_ascii_case("calc") => {
            CalcExpr::parse(value).map(|expr| LengthValue::Calc(Box::new(expr)))
        }
        _ => None,
    }
}

/// Parse `auto | <length-percentage>` from a declaration value.
#[must_use]
pub fn parse_auto_length(values: &[ComponentValue]) -> Option<AutoLength> {
    match significant(values).as_slice() {
        [ComponentValue::Token(CssToken::Ident(kw))] if kw.eq_ignore_ascii_case("auto") => {
            Some(AutoLength::Auto)
        }
        [single] => parse_length_component(single).map(AutoLength::Length),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_units_collapse_to_px() {
        assert_eq!(
            LengthValue::from_dimension(1.0, "in"),
            Some(LengthValue::Px(96.0))
        );
        assert_eq!(
            LengthValue::from_dimension(72.0, "pt"),
            Some(LengthValue::Px(96.0))
        );
        assert_eq!(
            LengthValue::from_dimension(6.0, "pc"),
            Some(LengthValue::Px(96.0))
        );
        assert_eq!(
            LengthValue::from_dimension(2.54, "cm"),
            Some(LengthValue::Px(96.0))
        );
        assert_eq!(
            LengthValue::from_dimension(25.4, "mm"),
            Some(LengthValue::Px(96.0))
        );
    }

    #[test]
    fn relative_units_use_context() {
        let mut ctx = ResolveContext::with_viewport(1000.0, 800.0);
        ctx.font_size = 20.0;
        ctx.root_font_size = 16.0;

        assert_eq!(LengthValue::Em(2.0).to_size(&ctx), Size::Px(40.0));
        assert_eq!(LengthValue::Rem(2.0).to_size(&ctx), Size::Px(32.0));
        assert_eq!(LengthValue::Vw(50.0).to_size(&ctx), Size::Px(500.0));
        assert_eq!(LengthValue::Vh(25.0).to_size(&ctx), Size::Px(200.0));
    }

    #[test]
    fn percent_defers_to_layout_base() {
        let ctx = ResolveContext::default();
        let size = LengthValue::Percent(50.0).to_size(&ctx);
        assert_eq!(size, Size::Percent(50.0));
        assert_eq!(size.resolve(Some(400.0)), Some(200.0));
        assert_eq!(size.resolve(None), None);
    }

    #[test]
    fn unknown_unit_is_rejected() {
        assert!(LengthValue::from_dimension(1.0, "parsec").is_none());
    }
}
