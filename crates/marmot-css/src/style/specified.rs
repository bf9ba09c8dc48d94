//! Specified style accumulation.
//!
//! [§ 4.2 Specified Values](https://www.w3.org/TR/css-cascade-4/#specified)
//!
//! "The specified value is the value of a given property that the style
//! sheet authors intended for that element."
//!
//! Every field is an `Option` — `None` means no declaration touched the
//! property, so inheritance or the initial value applies during
//! resolution. Declarations are applied in cascade order; later ones
//! overwrite earlier ones field by field. Shorthands expand into their
//! longhands here, so resolution only ever sees longhand state.

use std::str::FromStr;

use marmot_common::warning::warn_once;

use super::values::grid::{parse_grid_line, parse_track_template};
use super::values::length::{parse_auto_length, parse_length, parse_length_component};
use super::values::{
    AlignContent, AlignItems, AlignSelf, AutoLength, Display, FlexDirection, FlexWrap, GridLine,
    JustifyContent, LengthValue, Rgba, TextAlign, TrackTemplate, color::parse_color, keywords,
    significant, single_ident, single_number, split_spaces,
};
use crate::parser::{ComponentValue, Declaration};
use crate::tokenizer::CssToken;

/// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// `bolder`/`lighter` are relative to the inherited weight, so they stay
/// symbolic until resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontWeight {
    /// A numeric weight, including `normal` (400) and `bold` (700).
    Absolute(f64),
    /// "bolder: Specifies a bolder weight than the inherited value."
    Bolder,
    /// "lighter: Specifies a lighter weight than the inherited value."
    Lighter,
}

/// [§ 4.2 line-height](https://www.w3.org/TR/css-inline-3/#line-height-property)
///
/// "Value: normal | <number> | <length-percentage>"
#[derive(Debug, Clone, PartialEq)]
pub enum LineHeight {
    /// "normal: ... set relative to the font size" (× 1.2).
    Normal,
    /// "<number>: The used value is this number multiplied by the font size."
    Multiple(f64),
    /// A length, or a percentage of the element's own font size.
    Length(LengthValue),
}

/// The accumulated author + UA + inline declarations for one element.
///
/// [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
///
/// Declarations must be applied in ascending cascade order; the last write
/// to a field wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecifiedStyle {
    /// [§ 2 display](https://www.w3.org/TR/css-display-3/#the-display-properties)
    pub display: Option<Display>,

    /// [§ 3.1 color](https://www.w3.org/TR/css-color-4/#the-color-property)
    pub color: Option<Rgba>,
    /// [§ 3.2 background-color](https://www.w3.org/TR/css-backgrounds-3/#background-color)
    pub background_color: Option<Rgba>,

    /// [§ 3.1 font-family](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
    pub font_family: Option<String>,
    /// [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
    pub font_size: Option<LengthValue>,
    /// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
    pub font_weight: Option<FontWeight>,
    /// [§ 4.2 line-height](https://www.w3.org/TR/css-inline-3/#line-height-property)
    pub line_height: Option<LineHeight>,
    /// [CSS Text § 8.2 letter-spacing](https://www.w3.org/TR/css-text-3/#letter-spacing-property)
    pub letter_spacing: Option<LengthValue>,
    /// [CSS Text § 6.1 text-align](https://www.w3.org/TR/css-text-3/#text-align-property)
    pub text_align: Option<TextAlign>,
    /// [CSS Text § 2.1 text-transform](https://www.w3.org/TR/css-text-3/#text-transform)
    pub text_transform: Option<String>,
    /// [CSS Text § 3 white-space](https://www.w3.org/TR/css-text-3/#white-space-property)
    pub white_space: Option<String>,
    /// [CSS2 § 11.2 visibility](https://www.w3.org/TR/CSS2/visufx.html#visibility)
    pub visibility: Option<String>,
    /// [CSS UI § 8.1 cursor](https://www.w3.org/TR/css-ui-4/#cursor)
    pub cursor: Option<String>,

    /// [§ 10.2 width](https://www.w3.org/TR/CSS2/visudet.html#the-width-property)
    pub width: Option<AutoLength>,
    /// [§ 10.5 height](https://www.w3.org/TR/CSS2/visudet.html#the-height-property)
    pub height: Option<AutoLength>,
    /// [§ 10.4 min-width](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    pub min_width: Option<LengthValue>,
    /// [§ 10.7 min-height](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    pub min_height: Option<LengthValue>,
    /// [§ 10.4 max-width](https://www.w3.org/TR/CSS2/visudet.html#min-max-widths)
    pub max_width: Option<LengthValue>,
    /// [§ 10.7 max-height](https://www.w3.org/TR/CSS2/visudet.html#min-max-heights)
    pub max_height: Option<LengthValue>,

    /// [§ 6.1 margin-top](https://www.w3.org/TR/css-box-4/#margin-physical)
    pub margin_top: Option<AutoLength>,
    /// [§ 6.1 margin-right](https://www.w3.org/TR/css-box-4/#margin-physical)
    pub margin_right: Option<AutoLength>,
    /// [§ 6.1 margin-bottom](https://www.w3.org/TR/css-box-4/#margin-physical)
    pub margin_bottom: Option<AutoLength>,
    /// [§ 6.1 margin-left](https://www.w3.org/TR/css-box-4/#margin-physical)
    pub margin_left: Option<AutoLength>,

    /// [§ 6.2 padding-top](https://www.w3.org/TR/css-box-4/#padding-physical)
    pub padding_top: Option<LengthValue>,
    /// [§ 6.2 padding-right](https://www.w3.org/TR/css-box-4/#padding-physical)
    pub padding_right: Option<LengthValue>,
    /// [§ 6.2 padding-bottom](https://www.w3.org/TR/css-box-4/#padding-physical)
    pub padding_bottom: Option<LengthValue>,
    /// [§ 6.2 padding-left](https://www.w3.org/TR/css-box-4/#padding-physical)
    pub padding_left: Option<LengthValue>,

    /// [§ 4.3 border-top-width](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    pub border_top_width: Option<LengthValue>,
    /// [§ 4.3 border-right-width](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    pub border_right_width: Option<LengthValue>,
    /// [§ 4.3 border-bottom-width](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    pub border_bottom_width: Option<LengthValue>,
    /// [§ 4.3 border-left-width](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    pub border_left_width: Option<LengthValue>,
    /// [§ 4.2 border-style](https://www.w3.org/TR/css-backgrounds-3/#border-style)
    pub border_style: Option<String>,
    /// [§ 4.1 border-color](https://www.w3.org/TR/css-backgrounds-3/#border-color)
    pub border_color: Option<Rgba>,

    /// [CSS Flexbox § 5.1 flex-direction](https://www.w3.org/TR/css-flexbox-1/#flex-direction-property)
    pub flex_direction: Option<FlexDirection>,
    /// [CSS Flexbox § 5.2 flex-wrap](https://www.w3.org/TR/css-flexbox-1/#flex-wrap-property)
    pub flex_wrap: Option<FlexWrap>,
    /// [CSS Flexbox § 8.2 justify-content](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
    pub justify_content: Option<JustifyContent>,
    /// [CSS Flexbox § 8.3 align-items](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
    pub align_items: Option<AlignItems>,
    /// [CSS Flexbox § 8.3 align-self](https://www.w3.org/TR/css-flexbox-1/#align-items-property)
    pub align_self: Option<AlignSelf>,
    /// [CSS Flexbox § 8.4 align-content](https://www.w3.org/TR/css-flexbox-1/#align-content-property)
    pub align_content: Option<AlignContent>,
    /// [CSS Flexbox § 7.2 flex-grow](https://www.w3.org/TR/css-flexbox-1/#flex-grow-property)
    pub flex_grow: Option<f64>,
    /// [CSS Flexbox § 7.3 flex-shrink](https://www.w3.org/TR/css-flexbox-1/#flex-shrink-property)
    pub flex_shrink: Option<f64>,
    /// [CSS Flexbox § 7.2.3 flex-basis](https://www.w3.org/TR/css-flexbox-1/#flex-basis-property)
    pub flex_basis: Option<AutoLength>,
    /// [CSS Flexbox § 5.4 order](https://www.w3.org/TR/css-flexbox-1/#order-property)
    pub order: Option<i32>,

    /// [CSS Align § 8.1 row-gap](https://www.w3.org/TR/css-align-3/#column-row-gap)
    pub row_gap: Option<LengthValue>,
    /// [CSS Align § 8.1 column-gap](https://www.w3.org/TR/css-align-3/#column-row-gap)
    pub column_gap: Option<LengthValue>,

    /// [CSS Grid § 7.2 grid-template-columns](https://www.w3.org/TR/css-grid-1/#track-sizing)
    pub grid_template_columns: Option<TrackTemplate<LengthValue>>,
    /// [CSS Grid § 7.2 grid-template-rows](https://www.w3.org/TR/css-grid-1/#track-sizing)
    pub grid_template_rows: Option<TrackTemplate<LengthValue>>,
    /// [CSS Grid § 8.3 grid-row-start](https://www.w3.org/TR/css-grid-1/#line-placement)
    pub grid_row_start: Option<GridLine>,
    /// [CSS Grid § 8.3 grid-row-end](https://www.w3.org/TR/css-grid-1/#line-placement)
    pub grid_row_end: Option<GridLine>,
    /// [CSS Grid § 8.3 grid-column-start](https://www.w3.org/TR/css-grid-1/#line-placement)
    pub grid_column_start: Option<GridLine>,
    /// [CSS Grid § 8.3 grid-column-end](https://www.w3.org/TR/css-grid-1/#line-placement)
    pub grid_column_end: Option<GridLine>,
}

impl SpecifiedStyle {
    /// Apply one declaration in cascade order.
    ///
    /// [§ 6.1 Cascade Sorting Order](https://www.w3.org/TR/css-cascade-4/#cascade-sort)
    ///
    /// A value that fails to parse leaves the field untouched — the
    /// previous cascade winner (or the initial value) survives, per the
    /// degradation policy.
    pub fn apply_declaration(&mut self, decl: &Declaration) {
        match decl.name.to_ascii_lowercase().as_str() {
            // [§ 2 The display property](https://www.w3.org/TR/css-display-3/#the-display-properties)
            "display" => {
                if let Some(kw) = single_ident(&decl.value)
                    && let Ok(display) = Display::from_str(&kw)
                {
                    self.display = Some(display);
                }
            }

            "color" => apply_color(&mut self.color, &decl.value),
            "background-color" => apply_color(&mut self.background_color, &decl.value),

            "font-family" => {
                if let Some(family) = parse_font_family(&decl.value) {
                    self.font_family = Some(family);
                }
            }
            "font-size" => {
                if let Some(len) = parse_length(&decl.value) {
                    self.font_size = Some(len);
                }
            }
            "font-weight" => {
                if let Some(weight) = parse_font_weight(&decl.value) {
                    self.font_weight = Some(weight);
                }
            }
            "line-height" => {
                if let Some(lh) = parse_line_height(&decl.value) {
                    self.line_height = Some(lh);
                }
            }
            "letter-spacing" => {
                if single_ident(&decl.value).is_some_and(|kw| kw == "normal") {
                    self.letter_spacing = Some(LengthValue::Px(0.0));
                } else if let Some(len) = parse_length(&decl.value) {
                    self.letter_spacing = Some(len);
                }
            }
            "text-align" => {
                if let Some(kw) = single_ident(&decl.value)
                    && let Ok(align) = TextAlign::from_str(&kw)
                {
                    self.text_align = Some(align);
                }
            }
            "text-transform" => apply_keyword(&mut self.text_transform, &decl.value),
            "white-space" => apply_keyword(&mut self.white_space, &decl.value),
            "visibility" => apply_keyword(&mut self.visibility, &decl.value),
            "cursor" => apply_keyword(&mut self.cursor, &decl.value),

            "width" => apply_auto_length(&mut self.width, &decl.value),
            "height" => apply_auto_length(&mut self.height, &decl.value),
            "min-width" => apply_length(&mut self.min_width, &decl.value),
            "min-height" => apply_length(&mut self.min_height, &decl.value),
            // "none" clears any earlier max constraint
            "max-width" => apply_max(&mut self.max_width, &decl.value),
            "max-height" => apply_max(&mut self.max_height, &decl.value),

            // [§ 9.2 Shorthand properties](https://www.w3.org/TR/css-cascade-4/#shorthand)
            "margin" => self.apply_margin_shorthand(&decl.value),
            "margin-top" => apply_auto_length(&mut self.margin_top, &decl.value),
            "margin-right" => apply_auto_length(&mut self.margin_right, &decl.value),
            "margin-bottom" => apply_auto_length(&mut self.margin_bottom, &decl.value),
            "margin-left" => apply_auto_length(&mut self.margin_left, &decl.value),

            "padding" => self.apply_padding_shorthand(&decl.value),
            "padding-top" => apply_length(&mut self.padding_top, &decl.value),
            "padding-right" => apply_length(&mut self.padding_right, &decl.value),
            "padding-bottom" => apply_length(&mut self.padding_bottom, &decl.value),
            "padding-left" => apply_length(&mut self.padding_left, &decl.value),

            "border" => self.apply_border_shorthand(&decl.value),
            "border-width" => self.apply_border_width_shorthand(&decl.value),
            "border-top-width" => apply_border_width(&mut self.border_top_width, &decl.value),
            "border-right-width" => apply_border_width(&mut self.border_right_width, &decl.value),
            "border-bottom-width" => apply_border_width(&mut self.border_bottom_width, &decl.value),
            "border-left-width" => apply_border_width(&mut self.border_left_width, &decl.value),
            "border-style" => {
                if let Some(style) = parse_border_style(&decl.value) {
                    self.border_style = Some(style);
                }
            }
            "border-color" => apply_color(&mut self.border_color, &decl.value),

            "flex-direction" => apply_enum(&mut self.flex_direction, &decl.value),
            "flex-wrap" => apply_enum(&mut self.flex_wrap, &decl.value),
            "justify-content" => apply_enum(&mut self.justify_content, &decl.value),
            "align-items" => apply_enum(&mut self.align_items, &decl.value),
            "align-self" => apply_enum(&mut self.align_self, &decl.value),
            "align-content" => apply_enum(&mut self.align_content, &decl.value),
            "flex" => self.apply_flex_shorthand(&decl.value),
            "flex-grow" => {
                if let Some(n) = single_number(&decl.value)
                    && n >= 0.0
                {
                    self.flex_grow = Some(n);
                }
            }
            "flex-shrink" => {
                if let Some(n) = single_number(&decl.value)
                    && n >= 0.0
                {
                    self.flex_shrink = Some(n);
                }
            }
            "flex-basis" => apply_auto_length(&mut self.flex_basis, &decl.value),
            "order" => {
                if let Some(n) = single_number(&decl.value) {
                    self.order = Some(to_order(n));
                }
            }

            "gap" => self.apply_gap_shorthand(&decl.value),
            "row-gap" => apply_length(&mut self.row_gap, &decl.value),
            "column-gap" => apply_length(&mut self.column_gap, &decl.value),

            "grid-template-columns" => {
                if let Some(template) = parse_track_template(&decl.value) {
                    self.grid_template_columns = Some(template);
                }
            }
            "grid-template-rows" => {
                if let Some(template) = parse_track_template(&decl.value) {
                    self.grid_template_rows = Some(template);
                }
            }
            "grid-row-start" => apply_grid_line(&mut self.grid_row_start, &decl.value),
            "grid-row-end" => apply_grid_line(&mut self.grid_row_end, &decl.value),
            "grid-column-start" => apply_grid_line(&mut self.grid_column_start, &decl.value),
            "grid-column-end" => apply_grid_line(&mut self.grid_column_end, &decl.value),

            other => {
                warn_once("style", &format!("unsupported property: {other}"));
            }
        }
    }

    /// [§ 8.3 Margin properties](https://www.w3.org/TR/CSS2/box.html#margin-properties)
    ///
    /// "If there is only one component value, it applies to all sides. If
    /// there are two values, the top and bottom margins are set to the
    /// first value and the right and left margins are set to the second.
    /// If there are three values, the top is set to the first value, the
    /// left and right are set to the second, and the bottom is set to the
    /// third. If there are four values, they apply to the top, right,
    /// bottom, and left, respectively."
    fn apply_margin_shorthand(&mut self, values: &[ComponentValue]) {
        let groups = split_spaces(values);
        let parsed: Option<Vec<AutoLength>> =
            groups.iter().map(|g| parse_auto_length(g)).collect();
        if let Some(sides) = parsed.and_then(|v| expand_sides(&v)) {
            let [top, right, bottom, left] = sides;
            self.margin_top = Some(top);
            self.margin_right = Some(right);
            self.margin_bottom = Some(bottom);
            self.margin_left = Some(left);
        }
    }

    /// Same 1/2/3/4-value expansion as margins, without `auto`.
    fn apply_padding_shorthand(&mut self, values: &[ComponentValue]) {
        let groups = split_spaces(values);
        let parsed: Option<Vec<LengthValue>> = groups.iter().map(|g| parse_length(g)).collect();
        if let Some(sides) = parsed.and_then(|v| expand_sides(&v)) {
            let [top, right, bottom, left] = sides;
            self.padding_top = Some(top);
            self.padding_right = Some(right);
            self.padding_bottom = Some(bottom);
            self.padding_left = Some(left);
        }
    }

    /// [§ 4.4 border](https://www.w3.org/TR/css-backgrounds-3/#border-shorthands)
    ///
    /// "<line-width> || <line-style> || <color>" — the three parts may
    /// appear in any order, each at most once.
    fn apply_border_shorthand(&mut self, values: &[ComponentValue]) {
        let mut width = None;
        let mut style = None;
        let mut color = None;

        for part in significant(values) {
            if let Some(w) = parse_border_width_component(part) {
                width = Some(w);
            } else if let Some(s) = parse_border_style_component(part) {
                style = Some(s);
            } else if let Some(c) = parse_color(std::slice::from_ref(part)) {
                color = Some(c);
            } else {
                return; // unrecognized part invalidates the shorthand
            }
        }

        // "Value: ... none of the properties are required"; omitted parts
        // reset to their initial values.
        let width = width.unwrap_or(LengthValue::Px(3.0)); // medium
        self.border_top_width = Some(width.clone());
        self.border_right_width = Some(width.clone());
        self.border_bottom_width = Some(width.clone());
        self.border_left_width = Some(width);
        self.border_style = Some(style.unwrap_or_else(|| "none".to_string()));
        if let Some(color) = color {
            self.border_color = Some(color);
        }
    }

    /// 1/2/3/4-value expansion for `border-width`.
    fn apply_border_width_shorthand(&mut self, values: &[ComponentValue]) {
        let groups = split_spaces(values);
        let parsed: Option<Vec<LengthValue>> = groups
            .iter()
            .map(|g| match significant(g).as_slice() {
                [single] => parse_border_width_component(single),
                _ => None,
            })
            .collect();
        if let Some(sides) = parsed.and_then(|v| expand_sides(&v)) {
            let [top, right, bottom, left] = sides;
            self.border_top_width = Some(top);
            self.border_right_width = Some(right);
            self.border_bottom_width = Some(bottom);
            self.border_left_width = Some(left);
        }
    }

    /// [CSS Flexbox § 7.1 flex](https://www.w3.org/TR/css-flexbox-1/#flex-property)
    ///
    /// "Value: none | [ <'flex-grow'> <'flex-shrink'>? || <'flex-basis'> ]"
    ///
    /// `flex: none` is `0 0 auto`; `flex: <number>` is `<number> 1 0`.
    fn apply_flex_shorthand(&mut self, values: &[ComponentValue]) {
        if let Some(kw) = single_ident(values) {
            match kw.as_str() {
                "none" => {
                    self.flex_grow = Some(0.0);
                    self.flex_shrink = Some(0.0);
                    self.flex_basis = Some(AutoLength::Auto);
                }
                "auto" => {
                    self.flex_grow = Some(1.0);
                    self.flex_shrink = Some(1.0);
                    self.flex_basis = Some(AutoLength::Auto);
                }
                "initial" => {
                    self.flex_grow = Some(0.0);
                    self.flex_shrink = Some(1.0);
                    self.flex_basis = Some(AutoLength::Auto);
                }
                _ => {}
            }
            return;
        }

        let groups = split_spaces(values);
        let numbers: Vec<Option<f64>> = groups
            .iter()
            .map(|g| single_number(g).filter(|n| *n >= 0.0))
            .collect();

        match (groups.len(), numbers.as_slice()) {
            // flex: <grow> — "flex basis ... when omitted from the flex
            // shorthand, its specified value is 0"
            (1, [Some(grow)]) => {
                self.flex_grow = Some(*grow);
                self.flex_shrink = Some(1.0);
                self.flex_basis = Some(AutoLength::Length(LengthValue::Px(0.0)));
            }
            // flex: <grow> <shrink>
            (2, [Some(grow), Some(shrink)]) => {
                self.flex_grow = Some(*grow);
                self.flex_shrink = Some(shrink.max(0.0));
                self.flex_basis = Some(AutoLength::Length(LengthValue::Px(0.0)));
            }
            // flex: <grow> <basis>
            (2, [Some(grow), None]) => {
                if let Some(basis) = parse_auto_length(&groups[1]) {
                    self.flex_grow = Some(*grow);
                    self.flex_shrink = Some(1.0);
                    self.flex_basis = Some(basis);
                }
            }
            // flex: <grow> <shrink> <basis>
            (3, [Some(grow), Some(shrink), None]) => {
                if let Some(basis) = parse_auto_length(&groups[2]) {
                    self.flex_grow = Some(*grow);
                    self.flex_shrink = Some(*shrink);
                    self.flex_basis = Some(basis);
                }
            }
            _ => {}
        }
    }

    /// [CSS Align § 8.1 gap](https://www.w3.org/TR/css-align-3/#gap-shorthand)
    ///
    /// "Value: <'row-gap'> <'column-gap'>?" — one value sets both.
    fn apply_gap_shorthand(&mut self, values: &[ComponentValue]) {
        let groups = split_spaces(values);
        match groups.as_slice() {
            [both] => {
                if let Some(gap) = parse_length(both) {
                    self.row_gap = Some(gap.clone());
                    self.column_gap = Some(gap);
                }
            }
            [row, column] => {
                if let (Some(row), Some(column)) = (parse_length(row), parse_length(column)) {
                    self.row_gap = Some(row);
                    self.column_gap = Some(column);
                }
            }
            _ => {}
        }
    }
}

/// [§ 8.3](https://www.w3.org/TR/CSS2/box.html#margin-properties) 1/2/3/4-value
/// box-edge expansion to `[top, right, bottom, left]`.
fn expand_sides<T: Clone>(values: &[T]) -> Option<[T; 4]> {
    match values {
        [all] => Some([all.clone(), all.clone(), all.clone(), all.clone()]),
        [vertical, horizontal] => Some([
            vertical.clone(),
            horizontal.clone(),
            vertical.clone(),
            horizontal.clone(),
        ]),
        [top, horizontal, bottom] => Some([
            top.clone(),
            horizontal.clone(),
            bottom.clone(),
            horizontal.clone(),
        ]),
        [top, right, bottom, left] => {
            Some([top.clone(), right.clone(), bottom.clone(), left.clone()])
        }
        _ => None,
    }
}

fn apply_color(field: &mut Option<Rgba>, values: &[ComponentValue]) {
    if let Some(color) = parse_color(values) {
        *field = Some(color);
    }
}

fn apply_length(field: &mut Option<LengthValue>, values: &[ComponentValue]) {
    if let Some(len) = parse_length(values) {
        *field = Some(len);
    }
}

fn apply_auto_length(field: &mut Option<AutoLength>, values: &[ComponentValue]) {
    if let Some(len) = parse_auto_length(values) {
        *field = Some(len);
    }
}

/// `max-width`/`max-height`: "none: No limit on the size of the box."
fn apply_max(field: &mut Option<LengthValue>, values: &[ComponentValue]) {
    if single_ident(values).is_some_and(|kw| kw == "none") {
        *field = None;
    } else {
        apply_length(field, values);
    }
}

fn apply_keyword(field: &mut Option<String>, values: &[ComponentValue]) {
    if let Some(kw) = single_ident(values) {
        *field = Some(kw);
    }
}

fn apply_enum<E: FromStr>(field: &mut Option<E>, values: &[ComponentValue]) {
    if let Some(kw) = single_ident(values)
        && let Ok(value) = E::from_str(&kw)
    {
        *field = Some(value);
    }
}

fn apply_grid_line(field: &mut Option<GridLine>, values: &[ComponentValue]) {
    if let Some(line) = parse_grid_line(values) {
        *field = Some(line);
    }
}

fn apply_border_width(field: &mut Option<LengthValue>, values: &[ComponentValue]) {
    if let [single] = significant(values).as_slice()
        && let Some(width) = parse_border_width_component(single)
    {
        *field = Some(width);
    }
}

/// "<line-width> = <length [0,∞]> | thin | medium | thick"
fn parse_border_width_component(value: &ComponentValue) -> Option<LengthValue> {
    if let ComponentValue::Token(CssToken::Ident(kw)) = value {
        return keywords::border_width_keyword(kw).map(LengthValue::Px);
    }
    parse_length_component(value)
}

/// "<line-style> = none | hidden | dotted | dashed | solid | double |
///                 groove | ridge | inset | outset"
fn parse_border_style(values: &[ComponentValue]) -> Option<String> {
    match significant(values).as_slice() {
        [single] => parse_border_style_component(single),
        _ => None,
    }
}

fn parse_border_style_component(value: &ComponentValue) -> Option<String> {
    let ComponentValue::Token(CssToken::Ident(kw)) = value else {
        return None;
    };
    let lower = kw.to_ascii_lowercase();
    matches!(
        lower.as_str(),
        "none"
            | "hidden"
            | "dotted"
            | "dashed"
            | "solid"
            | "double"
            | "groove"
            | "ridge"
            | "inset"
            | "outset"
    )
    .then_some(lower)
}

/// [§ 3.2 font-weight](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
///
/// "Value: <font-weight-absolute> | bolder | lighter"
fn parse_font_weight(values: &[ComponentValue]) -> Option<FontWeight> {
    if let Some(n) = single_number(values) {
        return (1.0..=1000.0)
            .contains(&n)
            .then_some(FontWeight::Absolute(n));
    }
    match single_ident(values)?.as_str() {
        "normal" => Some(FontWeight::Absolute(400.0)),
        "bold" => Some(FontWeight::Absolute(700.0)),
        "bolder" => Some(FontWeight::Bolder),
        "lighter" => Some(FontWeight::Lighter),
        _ => None,
    }
}

/// [§ 4.2 line-height](https://www.w3.org/TR/css-inline-3/#line-height-property)
fn parse_line_height(values: &[ComponentValue]) -> Option<LineHeight> {
    if single_ident(values).is_some_and(|kw| kw == "normal") {
        return Some(LineHeight::Normal);
    }
    match significant(values).as_slice() {
        [ComponentValue::Token(CssToken::Number(n))] if *n >= 0.0 => {
            Some(LineHeight::Multiple(*n))
        }
        [single] => parse_length_component(single).map(LineHeight::Length),
        _ => None,
    }
}

/// [§ 2.1 font-family](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
///
/// Joined back into one comma-separated string; only the first family
/// typically matters to a consumer, but the full list is preserved.
fn parse_font_family(values: &[ComponentValue]) -> Option<String> {
    let mut families = Vec::new();
    let mut current = Vec::new();

    for part in significant(values) {
        match part {
            ComponentValue::Token(CssToken::Comma) => {
                if !current.is_empty() {
                    families.push(current.join(" "));
                    current.clear();
                }
            }
            ComponentValue::Token(CssToken::Ident(name)) => current.push(name.clone()),
            ComponentValue::Token(CssToken::String(name)) => current.push(name.clone()),
            _ => return None,
        }
    }
    if !current.is_empty() {
        families.push(current.join(" "));
    }

    if families.is_empty() {
        None
    } else {
        Some(families.join(", "))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn to_order(n: f64) -> i32 {
    n as i32
}
