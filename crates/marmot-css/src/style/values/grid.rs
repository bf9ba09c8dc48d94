//! Grid track template values per [CSS Grid Level 1](https://www.w3.org/TR/css-grid-1/).
//!
//! `grid-template-columns`/`-rows` parse once into a [`TrackTemplate`]
//! whose fixed entries are still [`LengthValue`]s; style resolution maps
//! them to [`Size`]s, and the grid engine expands `repeat()` against the
//! real container width.

use serde::Serialize;

use super::length::{LengthValue, Size, parse_length_component};
use super::{ResolveContext, significant, split_spaces};
use crate::parser::ComponentValue;
use crate::tokenizer::CssToken;

/// [§ 7.2.1 Track Sizes](https://www.w3.org/TR/css-grid-1/#track-sizes)
///
/// One track sizing function. The type parameter is [`LengthValue`] as
/// parsed and [`Size`] once resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TrackSize<L> {
    /// A fixed `<length-percentage>` track.
    Fixed(L),
    /// [§ 7.2.4 Flexible Lengths](https://www.w3.org/TR/css-grid-1/#fr-unit)
    ///
    /// "A flexible length or <flex> is a dimension with the fr unit, which
    /// represents a fraction of the leftover space in the grid container."
    Fr(f64),
    /// "auto: ... identical to maximal content-based sizing" — here, an
    /// equal share of the leftover space.
    Auto,
    /// [§ 7.2.1] "minmax(min, max): Defines a size range greater than or
    /// equal to min and less than or equal to max."
    MinMax(Box<TrackSize<L>>, Box<TrackSize<L>>),
}

/// [§ 7.2.3.1 Syntax of repeat()](https://www.w3.org/TR/css-grid-1/#repeat-syntax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RepeatCount {
    /// A literal positive integer repetition count.
    Count(u32),
    /// "auto-fill: ... the largest possible positive integer that does not
    /// cause the grid to overflow the content box of its grid container"
    AutoFill,
    /// "auto-fit: Behaves the same as auto-fill, except that after grid item
    /// placement any empty repeated tracks are collapsed."
    AutoFit,
}

/// One entry of a track list: a single track or a `repeat()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TemplateEntry<L> {
    /// A single track sizing function.
    Single(TrackSize<L>),
    /// A `repeat(count, <track>)` group.
    Repeat(RepeatCount, TrackSize<L>),
}

/// [§ 7.2 Explicit Track Sizing](https://www.w3.org/TR/css-grid-1/#track-sizing)
///
/// A parsed `grid-template-columns` or `grid-template-rows` value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackTemplate<L> {
    /// The track list in source order.
    pub entries: Vec<TemplateEntry<L>>,
}

impl<L> TrackTemplate<L> {
    /// An empty template (the property's initial `none` value).
    #[must_use]
    pub const fn none() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Whether the template declares no explicit tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L> Default for TrackTemplate<L> {
    fn default() -> Self {
        Self::none()
    }
}

impl TrackSize<LengthValue> {
    fn resolve(&self, ctx: &ResolveContext) -> TrackSize<Size> {
        match self {
            Self::Fixed(len) => TrackSize::Fixed(len.to_size(ctx)),
            Self::Fr(f) => TrackSize::Fr(*f),
            Self::Auto => TrackSize::Auto,
            Self::MinMax(min, max) => TrackSize::MinMax(
                Box::new(min.resolve(ctx)),
                Box::new(max.resolve(ctx)),
            ),
        }
    }
}

impl TrackTemplate<LengthValue> {
    /// Resolve every fixed track against the style-time context.
    ///
    /// Percentage tracks stay symbolic inside [`Size`] until the grid
    /// engine knows the container width.
    #[must_use]
    pub fn resolve(&self, ctx: &ResolveContext) -> TrackTemplate<Size> {
        TrackTemplate {
            entries: self
                .entries
                .iter()
                .map(|entry| match entry {
                    TemplateEntry::Single(track) => TemplateEntry::Single(track.resolve(ctx)),
                    TemplateEntry::Repeat(count, track) => {
                        TemplateEntry::Repeat(*count, track.resolve(ctx))
                    }
                })
                .collect(),
        }
    }
}

/// [§ 8.3 Line-based Placement](https://www.w3.org/TR/css-grid-1/#line-placement)
///
/// A `grid-row-start`-style placement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum GridLine {
    /// "auto: ... no line, contributing the default span of one"
    #[default]
    Auto,
    /// "<integer>: Contributes the Nth grid line to the grid item's placement."
    /// One-based; negative lines count from the end.
    Line(i32),
    /// "span <integer>: Contributes a grid span to the grid item's placement."
    Span(u32),
}

/// Parse a `grid-template-columns`/`-rows` declaration value.
///
/// Supported syntaxes: fixed lengths, `Nfr`, `auto`, `minmax(min, max)`,
/// and `repeat(count | auto-fill | auto-fit, <track>)`. `none` and any
/// unrecognized track produce `None` (initial value).
#[must_use]
pub fn parse_track_template(values: &[ComponentValue]) -> Option<TrackTemplate<LengthValue>> {
    let groups = split_spaces(values);
    if groups.is_empty() {
        return None;
    }
    if let [group] = groups.as_slice()
        && let [ComponentValue::Token(CssToken::Ident(kw))] = group.as_slice()
        && kw.eq_ignore_ascii_case("none")
    {
        return Some(TrackTemplate::none());
    }

    let mut entries = Vec::new();
    for group in &groups {
        let [single] = group.as_slice() else {
            return None;
        };
        entries.push(parse_template_entry(single)?);
    }
    Some(TrackTemplate { entries })
}

fn parse_template_entry(value: &ComponentValue) -> Option<TemplateEntry<LengthValue>> {
    if let ComponentValue::Function { name, value } = value
        && name.eq_ignore_ascii_case("repeat")
    {
        return parse_repeat(value);
    }
    parse_track_size(value).map(TemplateEntry::Single)
}

/// Parse one `<track-size>` component value.
fn parse_track_size(value: &ComponentValue) -> Option<TrackSize<LengthValue>> {
    match value {
        ComponentValue::Token(CssToken::Ident(kw)) if kw.eq_ignore_ascii_case("auto") => {
            Some(TrackSize::Auto)
        }
        ComponentValue::Token(CssToken::Dimension { value, unit })
            if unit.eq_ignore_ascii_case("fr") =>
        {
            Some(TrackSize::Fr(*value))
        }
        ComponentValue::Function { name, value } if name.eq_ignore_ascii_case("minmax") => {
            let (min, max) = split_two_args(value)?;
            Some(TrackSize::MinMax(
                Box::new(parse_track_size(&min)?),
                Box::new(parse_track_size(&max)?),
            ))
        }
        other => parse_length_component(other).map(TrackSize::Fixed),
    }
}

/// [§ 7.2.3.1 Syntax of repeat()](https://www.w3.org/TR/css-grid-1/#repeat-syntax)
fn parse_repeat(args: &[ComponentValue]) -> Option<TemplateEntry<LengthValue>> {
    let (count_arg, track_arg) = split_two_args(args)?;

    let count = match &count_arg {
        ComponentValue::Token(CssToken::Ident(kw)) if kw.eq_ignore_ascii_case("auto-fill") => {
            RepeatCount::AutoFill
        }
        ComponentValue::Token(CssToken::Ident(kw)) if kw.eq_ignore_ascii_case("auto-fit") => {
            RepeatCount::AutoFit
        }
        ComponentValue::Token(CssToken::Number(n)) if *n >= 1.0 => {
            RepeatCount::Count(to_count(*n))
        }
        _ => return None,
    };

    parse_track_size(&track_arg).map(|track| TemplateEntry::Repeat(count, track))
}

/// Split function arguments on the single comma, expecting one significant
/// component value on each side.
fn split_two_args(args: &[ComponentValue]) -> Option<(ComponentValue, ComponentValue)> {
    let parts = significant(args);
    let comma = parts
        .iter()
        .position(|v| matches!(v, ComponentValue::Token(CssToken::Comma)))?;
    let (lhs, rhs) = parts.split_at(comma);
    match (lhs, &rhs[1..]) {
        ([a], [b]) => Some(((*a).clone(), (*b).clone())),
        _ => None,
    }
}

/// Parse a `grid-row/column-start/end` declaration value.
#[must_use]
pub fn parse_grid_line(values: &[ComponentValue]) -> Option<GridLine> {
    match significant(values).as_slice() {
        [ComponentValue::Token(CssToken::Ident(kw))] if kw.eq_ignore_ascii_case("auto") => {
            Some(GridLine::Auto)
        }
        [ComponentValue::Token(CssToken::Number(n))] => Some(GridLine::Line(to_line(*n))),
        [
            ComponentValue::Token(CssToken::Ident(kw)),
            ComponentValue::Token(CssToken::Number(n)),
        ] if kw.eq_ignore_ascii_case("span") && *n >= 1.0 => Some(GridLine::Span(to_count(*n))),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_count(n: f64) -> u32 {
    n.max(1.0) as u32
}

#[allow(clippy::cast_possible_truncation)]
fn to_line(n: f64) -> i32 {
    n as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CssParser;
    use crate::tokenizer::CssTokenizer;

    fn parse(css: &str) -> Option<TrackTemplate<LengthValue>> {
        let mut tokenizer = CssTokenizer::new(&format!("grid-template-columns: {css}"));
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        let decl = parser.parse_declaration_list().remove(0);
        parse_track_template(&decl.value)
    }

    #[test]
    fn fixed_and_flexible_tracks() {
        let template = parse("100px 1fr auto").unwrap();
        assert_eq!(
            template.entries,
            vec![
                TemplateEntry::Single(TrackSize::Fixed(LengthValue::Px(100.0))),
                TemplateEntry::Single(TrackSize::Fr(1.0)),
                TemplateEntry::Single(TrackSize::Auto),
            ]
        );
    }

    #[test]
    fn repeat_with_count() {
        let template = parse("repeat(3, 1fr)").unwrap();
        assert_eq!(
            template.entries,
            vec![TemplateEntry::Repeat(RepeatCount::Count(3), TrackSize::Fr(1.0))]
        );
    }

    #[test]
    fn repeat_auto_fit_minmax() {
        let template = parse("repeat(auto-fit, minmax(300px, 1fr))").unwrap();
        assert_eq!(
            template.entries,
            vec![TemplateEntry::Repeat(
                RepeatCount::AutoFit,
                TrackSize::MinMax(
                    Box::new(TrackSize::Fixed(LengthValue::Px(300.0))),
                    Box::new(TrackSize::Fr(1.0)),
                ),
            )]
        );
    }

    #[test]
    fn none_is_an_empty_template() {
        assert_eq!(parse("none"), Some(TrackTemplate::none()));
    }

    #[test]
    fn malformed_templates_are_rejected() {
        assert!(parse("repeat(banana, 1fr)").is_none());
        assert!(parse("minmax(100px)").is_none());
        assert!(parse("1parsec").is_none());
    }

    #[test]
    fn grid_line_values() {
        let parse_line = |css: &str| {
            let mut tokenizer = CssTokenizer::new(&format!("grid-column-start: {css}"));
            tokenizer.run();
            let mut parser = CssParser::new(tokenizer.into_tokens());
            let decl = parser.parse_declaration_list().remove(0);
            parse_grid_line(&decl.value)
        };
        assert_eq!(parse_line("auto"), Some(GridLine::Auto));
        assert_eq!(parse_line("2"), Some(GridLine::Line(2)));
        assert_eq!(parse_line("-1"), Some(GridLine::Line(-1)));
        assert_eq!(parse_line("span 3"), Some(GridLine::Span(3)));
        assert_eq!(parse_line("span banana"), None);
    }
}
