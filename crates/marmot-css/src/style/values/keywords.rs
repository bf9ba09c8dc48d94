//! Keyword-valued properties.
//!
//! Each enum round-trips through its kebab-case CSS keyword via strum, so
//! parsing a declaration value is a `FromStr` call and serialized output
//! reads like the stylesheet that produced it.

use serde::Serialize;
use strum_macros::{Display, EnumString};

/// [§ 2 Box Layout Modes](https://www.w3.org/TR/css-display-3/#the-display-properties)
///
/// "The display property defines an element's display type." The single
/// keywords this engine lays out; everything else falls back to `block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Display {
    /// "The element and its descendants generate no boxes or text runs."
    None,
    /// "The element generates a block-level box."
    Block,
    /// "The element generates one or more inline-level boxes."
    #[default]
    Inline,
    /// Inline-level box that establishes its own formatting context.
    InlineBlock,
    /// [CSS Flexbox § 4](https://www.w3.org/TR/css-flexbox-1/#flex-containers)
    /// "generates a block-level flex container box"
    Flex,
    /// [CSS Grid § 5.1](https://www.w3.org/TR/css-grid-1/#grid-containers)
    /// "generates a block-level grid container box"
    Grid,
}

impl Display {
    /// Whether children of this box participate in block-style stacking
    /// rather than flex or grid placement.
    #[must_use]
    pub const fn is_flow(self) -> bool {
        matches!(self, Self::Block | Self::Inline | Self::InlineBlock)
    }
}

/// [CSS Flexbox § 5.1 flex-direction](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
///
/// "specifies how flex items are placed in the flex container, by setting
/// the direction of the flex container's main axis"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FlexDirection {
    /// "the main axis ... has the same direction as the inline axis"
    #[default]
    Row,
    /// "Same as row, except the main-start and main-end directions are swapped."
    RowReverse,
    /// "the main axis ... has the same direction as the block axis"
    Column,
    /// "Same as column, except the main-start and main-end directions are swapped."
    ColumnReverse,
}

impl FlexDirection {
    /// Whether the main axis is horizontal.
    #[must_use]
    pub const fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    /// Whether visual order is flipped along the main axis.
    #[must_use]
    pub const fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// [CSS Flexbox § 5.2 flex-wrap](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
///
/// "controls whether the flex container is single-line or multi-line"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FlexWrap {
    /// "The flex container is single-line."
    #[default]
    Nowrap,
    /// "The flex container is multi-line."
    Wrap,
    /// Multi-line with reversed cross-axis line order. Line stacking
    /// direction is not modeled; treated as `wrap`.
    WrapReverse,
}

impl FlexWrap {
    /// Whether items may break onto additional lines.
    #[must_use]
    pub const fn is_wrapping(self) -> bool {
        !matches!(self, Self::Nowrap)
    }
}

/// [CSS Flexbox § 8.2 justify-content](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
///
/// "aligns flex items along the main axis of the current line"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum JustifyContent {
    /// "Flex items are packed toward the start of the line."
    #[default]
    FlexStart,
    /// "Flex items are packed toward the end of the line."
    FlexEnd,
    /// "Flex items are packed toward the center of the line."
    Center,
    /// "Flex items are evenly distributed in the line."
    SpaceBetween,
    /// "...with half-size spaces on either end."
    SpaceAround,
    /// Evenly distributed, including before the first and after the last item.
    SpaceEvenly,
}

/// [CSS Flexbox § 8.3 align-items](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
///
/// "sets the default alignment for all of the flex container's items"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AlignItems {
    /// "flex items are stretched ... to fill the line"
    #[default]
    Stretch,
    /// "cross-start margin edge ... placed flush with the cross-start edge"
    FlexStart,
    /// "cross-end margin edge ... placed flush with the cross-end edge"
    FlexEnd,
    /// "margin box is centered in the cross axis"
    Center,
}

/// [CSS Flexbox § 8.3 align-self](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
///
/// "allows this default alignment to be overridden for individual flex items"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AlignSelf {
    /// "Computes to the parent's align-items value."
    #[default]
    Auto,
    /// See [`AlignItems::Stretch`].
    Stretch,
    /// See [`AlignItems::FlexStart`].
    FlexStart,
    /// See [`AlignItems::FlexEnd`].
    FlexEnd,
    /// See [`AlignItems::Center`].
    Center,
}

impl AlignSelf {
    /// Resolve against the container's `align-items`.
    #[must_use]
    pub const fn resolve(self, parent: AlignItems) -> AlignItems {
        match self {
            Self::Auto => parent,
            Self::Stretch => AlignItems::Stretch,
            Self::FlexStart => AlignItems::FlexStart,
            Self::FlexEnd => AlignItems::FlexEnd,
            Self::Center => AlignItems::Center,
        }
    }
}

/// [CSS Flexbox § 8.4 align-content](https://www.w3.org/TR/css-flexbox-1/#align-content-property)
///
/// "aligns a flex container's lines within the flex container when there
/// is extra space in the cross-axis"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum AlignContent {
    /// "Lines stretch to take up the remaining space."
    #[default]
    Stretch,
    /// "Lines are packed toward the start of the flex container."
    FlexStart,
    /// "Lines are packed toward the end of the flex container."
    FlexEnd,
    /// "Lines are packed toward the center of the flex container."
    Center,
    /// "Lines are evenly distributed in the flex container."
    SpaceBetween,
    /// "...with half-size spaces on either end."
    SpaceAround,
    /// Evenly distributed, including both ends.
    SpaceEvenly,
}

/// [CSS Text § 6.1 text-align](https://www.w3.org/TR/css-text-3/#text-align-property)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextAlign {
    /// "Inline-level content is aligned to the line-left edge of the line box."
    #[default]
    Left,
    /// "Inline-level content is aligned to the line-right edge of the line box."
    Right,
    /// "Inline-level content is centered within the line box."
    Center,
    /// "Text is justified according to the method specified by the
    /// text-justify property."
    Justify,
}

/// [CSS Backgrounds § 4.3 border-width](https://www.w3.org/TR/css-backgrounds-3/#the-border-width)
///
/// "Value: <line-width> ... thin | medium | thick". The spec leaves the
/// mapping UA-defined; 1/3/5 px matches the major engines.
#[must_use]
pub fn border_width_keyword(name: &str) -> Option<f64> {
    if name.eq_ignore_ascii_case("thin") {
        Some(1.0)
    } else if name.eq_ignore_ascii_case("medium") {
        Some(3.0)
    } else if name.eq_ignore_ascii_case("thick") {
        Some(5.0)
    } else {
        None
    }
}

/// [CSS Fonts § 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// "bolder: Specifies a bolder weight than the inherited value." Mapped
/// with the spec's coarse graduation table.
#[must_use]
pub fn bolder_font_weight(inherited: f64) -> f64 {
    if inherited < 400.0 {
        400.0
    } else if inherited < 600.0 {
        700.0
    } else {
        900.0
    }
}

/// [CSS Fonts § 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// "lighter: Specifies a lighter weight than the inherited value."
#[must_use]
pub fn lighter_font_weight(inherited: f64) -> f64 {
    if inherited < 600.0 {
        100.0
    } else if inherited < 800.0 {
        400.0
    } else {
        700.0
    }
}

/// [CSS Inline § line-height](https://www.w3.org/TR/css-inline-3/#line-height-property)
///
/// "normal: ... the user agent should set it relative to the font size".
/// The conventional factor is 1.2.
pub const LINE_HEIGHT_NORMAL_FACTOR: f64 = 1.2;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn keywords_parse_from_kebab_case() {
        assert_eq!(
            FlexDirection::from_str("row-reverse"),
            Ok(FlexDirection::RowReverse)
        );
        assert_eq!(
            JustifyContent::from_str("space-between"),
            Ok(JustifyContent::SpaceBetween)
        );
        assert_eq!(Display::from_str("inline-block"), Ok(Display::InlineBlock));
        assert_eq!(Display::from_str("FLEX"), Ok(Display::Flex));
        assert!(FlexWrap::from_str("sideways").is_err());
    }

    #[test]
    fn keywords_display_as_css() {
        assert_eq!(AlignItems::FlexStart.to_string(), "flex-start");
        assert_eq!(AlignContent::SpaceEvenly.to_string(), "space-evenly");
    }

    #[test]
    fn align_self_defers_to_align_items() {
        assert_eq!(AlignSelf::Auto.resolve(AlignItems::Center), AlignItems::Center);
        assert_eq!(
            AlignSelf::FlexEnd.resolve(AlignItems::Center),
            AlignItems::FlexEnd
        );
    }

    #[test]
    fn border_width_keywords() {
        assert_eq!(border_width_keyword("thin"), Some(1.0));
        assert_eq!(border_width_keyword("medium"), Some(3.0));
        assert_eq!(border_width_keyword("thick"), Some(5.0));
        assert_eq!(border_width_keyword("chunky"), None);
    }

    #[test]
    fn relative_font_weights_graduate() {
        assert_eq!(bolder_font_weight(100.0), 400.0);
        assert_eq!(bolder_font_weight(400.0), 700.0);
        assert_eq!(bolder_font_weight(700.0), 900.0);
        assert_eq!(lighter_font_weight(400.0), 100.0);
        assert_eq!(lighter_font_weight(700.0), 400.0);
        assert_eq!(lighter_font_weight(900.0), 700.0);
    }
}
