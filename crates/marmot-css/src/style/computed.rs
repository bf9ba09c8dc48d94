//! Computed style values.
//!
//! [§ 4.3 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//!
//! "The computed value is the result of resolving the specified value as
//! defined in the 'Computed Value' line of the property definition table,
//! generally absolutizing it in preparation for inheritance."
//!
//! A [`ComputedStyle`] has no optional fields: every property carries
//! either the cascade winner, the inherited value, or the property's
//! initial value. Lengths that depend on the containing block stay
//! symbolic as [`Size`]s and are finished during layout.

use serde::Serialize;

use super::specified::{FontWeight, LineHeight, SpecifiedStyle};
use super::values::keywords::{
    LINE_HEIGHT_NORMAL_FACTOR, bolder_font_weight, lighter_font_weight,
};
use super::values::{
    AlignContent, AlignItems, AlignSelf, AutoLength, DEFAULT_FONT_SIZE_PX, Display, FlexDirection,
    FlexWrap, GridLine, JustifyContent, LengthValue, ResolveContext, Rgba, Size, TextAlign,
    TrackTemplate,
};

/// The fully resolved style of one element.
///
/// [§ 4.3 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedStyle {
    /// Box generation and inner layout mode.
    pub display: Display,

    /// Foreground color. Inherited.
    pub color: Rgba,
    /// Background color. Initial: `transparent`.
    pub background_color: Rgba,

    /// Font family list as written. Inherited.
    pub font_family: String,
    /// Font size in pixels. Inherited.
    pub font_size: f64,
    /// Numeric font weight (100–900 scale). Inherited.
    pub font_weight: f64,
    /// Line height in pixels. Inherited.
    pub line_height: f64,
    /// Letter spacing in pixels. Inherited.
    pub letter_spacing: f64,
    /// Inline content alignment. Inherited.
    pub text_align: TextAlign,
    /// `text-transform` keyword. Inherited.
    pub text_transform: String,
    /// `white-space` keyword. Inherited.
    pub white_space: String,
    /// `visibility` keyword. Inherited.
    pub visibility: String,
    /// `cursor` keyword. Inherited.
    pub cursor: String,

    /// Content-box width. Initial: `auto`.
    pub width: Size,
    /// Content-box height. Initial: `auto`.
    pub height: Size,
    /// Minimum width. Initial: zero.
    pub min_width: Size,
    /// Minimum height. Initial: zero.
    pub min_height: Size,
    /// Maximum width. `Auto` means no limit.
    pub max_width: Size,
    /// Maximum height. `Auto` means no limit.
    pub max_height: Size,

    /// Top margin. `Auto` participates in centering during layout.
    pub margin_top: Size,
    /// Right margin.
    pub margin_right: Size,
    /// Bottom margin.
    pub margin_bottom: Size,
    /// Left margin.
    pub margin_left: Size,

    /// Top padding. Never `auto`.
    pub padding_top: Size,
    /// Right padding.
    pub padding_right: Size,
    /// Bottom padding.
    pub padding_bottom: Size,
    /// Left padding.
    pub padding_left: Size,

    /// [§ 4.3 border-width](https://www.w3.org/TR/css-backgrounds-3/#border-width)
    ///
    /// "if the border style is none ... the computed value of the
    /// corresponding border-width is zero"
    pub border_top_width: f64,
    /// Right border width in pixels.
    pub border_right_width: f64,
    /// Bottom border width in pixels.
    pub border_bottom_width: f64,
    /// Left border width in pixels.
    pub border_left_width: f64,
    /// Border line style keyword. Initial: `none`.
    pub border_style: String,
    /// Border color. Defaults to the element's own `color` (currentColor).
    pub border_color: Rgba,

    /// Main axis direction of a flex container.
    pub flex_direction: FlexDirection,
    /// Single-line or multi-line flex layout.
    pub flex_wrap: FlexWrap,
    /// Main-axis content distribution.
    pub justify_content: JustifyContent,
    /// Default cross-axis item alignment.
    pub align_items: AlignItems,
    /// Per-item cross-axis alignment override.
    pub align_self: AlignSelf,
    /// Cross-axis line distribution in multi-line containers.
    pub align_content: AlignContent,
    /// Flex growth factor. Initial: 0.
    pub flex_grow: f64,
    /// Flex shrink factor. Initial: 1.
    pub flex_shrink: f64,
    /// Initial main size of a flex item. Initial: `auto`.
    pub flex_basis: Size,
    /// Display-order group for flex and grid items. Initial: 0.
    pub order: i32,

    /// Gap between rows. Initial: zero.
    pub row_gap: Size,
    /// Gap between columns. Initial: zero.
    pub column_gap: Size,

    /// Explicit column track list. Empty means `none`.
    pub grid_template_columns: TrackTemplate<Size>,
    /// Explicit row track list. Empty means `none`.
    pub grid_template_rows: TrackTemplate<Size>,
    /// Row placement start line.
    pub grid_row_start: GridLine,
    /// Row placement end line.
    pub grid_row_end: GridLine,
    /// Column placement start line.
    pub grid_column_start: GridLine,
    /// Column placement end line.
    pub grid_column_end: GridLine,
}

impl Default for ComputedStyle {
    /// The initial value of every property, as inherited by the root
    /// element from nothing.
    fn default() -> Self {
        Self {
            display: Display::default(),
            color: Rgba::BLACK,
            background_color: Rgba::TRANSPARENT,
            font_family: "sans-serif".to_string(),
            font_size: DEFAULT_FONT_SIZE_PX,
            font_weight: 400.0,
            line_height: DEFAULT_FONT_SIZE_PX * LINE_HEIGHT_NORMAL_FACTOR,
            letter_spacing: 0.0,
            text_align: TextAlign::default(),
            text_transform: "none".to_string(),
            white_space: "normal".to_string(),
            visibility: "visible".to_string(),
            cursor: "auto".to_string(),
            width: Size::Auto,
            height: Size::Auto,
            min_width: Size::Px(0.0),
            min_height: Size::Px(0.0),
            max_width: Size::Auto,
            max_height: Size::Auto,
            margin_top: Size::Px(0.0),
            margin_right: Size::Px(0.0),
            margin_bottom: Size::Px(0.0),
            margin_left: Size::Px(0.0),
            padding_top: Size::Px(0.0),
            padding_right: Size::Px(0.0),
            padding_bottom: Size::Px(0.0),
            padding_left: Size::Px(0.0),
            border_top_width: 0.0,
            border_right_width: 0.0,
            border_bottom_width: 0.0,
            border_left_width: 0.0,
            border_style: "none".to_string(),
            border_color: Rgba::BLACK,
            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            align_self: AlignSelf::default(),
            align_content: AlignContent::default(),
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Size::Auto,
            order: 0,
            row_gap: Size::Px(0.0),
            column_gap: Size::Px(0.0),
            grid_template_columns: TrackTemplate::none(),
            grid_template_rows: TrackTemplate::none(),
            grid_row_start: GridLine::Auto,
            grid_row_end: GridLine::Auto,
            grid_column_start: GridLine::Auto,
            grid_column_end: GridLine::Auto,
        }
    }
}

impl ComputedStyle {
    /// Whether this element generates any box at all.
    #[must_use]
    pub fn generates_box(&self) -> bool {
        self.display != Display::None
    }

    /// Whether the borders paint (and take up space).
    #[must_use]
    pub fn has_visible_border(&self) -> bool {
        !matches!(self.border_style.as_str(), "none" | "hidden")
    }
}

impl SpecifiedStyle {
    /// Resolve the cascade output into a [`ComputedStyle`].
    ///
    /// [§ 4.3 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
    ///
    /// `ctx.font_size` must be the parent's computed font size: `font-size`
    /// itself resolves first (its `em` and `%` values are relative to the
    /// parent), and every other font-relative length on this element then
    /// resolves against the element's own font size.
    ///
    /// Inherited properties fall back to `parent`; with no parent they take
    /// their initial values.
    #[must_use]
    pub fn resolve(&self, parent: Option<&ComputedStyle>, ctx: &ResolveContext) -> ComputedStyle {
        let defaults = ComputedStyle::default();
        let inherited = parent.unwrap_or(&defaults);

        // [§ 3.5 font-size](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
        // "Percentage values refer to the parent element's font size."
        let font_size = self
            .font_size
            .as_ref()
            .and_then(|len| len.to_px(ctx, Some(inherited.font_size)))
            .unwrap_or(inherited.font_size);
        let ctx = ctx.with_font_size(font_size);

        let font_weight = match self.font_weight {
            Some(FontWeight::Absolute(w)) => w,
            Some(FontWeight::Bolder) => bolder_font_weight(inherited.font_weight),
            Some(FontWeight::Lighter) => lighter_font_weight(inherited.font_weight),
            None => inherited.font_weight,
        };

        // [§ 4.2 line-height] "Percentages: computed relative to 1em"
        let line_height = match &self.line_height {
            Some(LineHeight::Normal) => font_size * LINE_HEIGHT_NORMAL_FACTOR,
            Some(LineHeight::Multiple(n)) => n * font_size,
            Some(LineHeight::Length(len)) => len
                .to_px(&ctx, Some(font_size))
                .unwrap_or(font_size * LINE_HEIGHT_NORMAL_FACTOR),
            None if self.font_size.is_some() => {
                // The inherited value may have been font-relative; keep the
                // inherited ratio rather than the inherited pixels.
                inherited.line_height / inherited.font_size * font_size
            }
            None => inherited.line_height,
        };

        let letter_spacing = self
            .letter_spacing
            .as_ref()
            .and_then(|len| len.to_px(&ctx, Some(font_size)))
            .unwrap_or(inherited.letter_spacing);

        let color = self.color.unwrap_or(inherited.color);

        // "Initial: currentColor"
        let border_color = self.border_color.unwrap_or(color);
        let border_style = self
            .border_style
            .clone()
            .unwrap_or_else(|| defaults.border_style.clone());
        let paints_border = !matches!(border_style.as_str(), "none" | "hidden");
        let border_width = |spec: &Option<LengthValue>| {
            if !paints_border {
                return 0.0;
            }
            spec.as_ref()
                // "Initial: medium"
                .map_or(3.0, |len| len.to_px(&ctx, None).unwrap_or(0.0))
        };

        let size_of = |spec: &Option<AutoLength>, initial: Size| {
            spec.as_ref().map_or(initial, |len| len.to_size(&ctx))
        };
        let length_of = |spec: &Option<LengthValue>, initial: Size| {
            spec.as_ref().map_or(initial, |len| len.to_size(&ctx))
        };

        ComputedStyle {
            display: self.display.unwrap_or_default(),

            color,
            background_color: self
                .background_color
                .unwrap_or(defaults.background_color),

            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| inherited.font_family.clone()),
            font_size,
            font_weight,
            line_height,
            letter_spacing,
            text_align: self.text_align.unwrap_or(inherited.text_align),
            text_transform: self
                .text_transform
                .clone()
                .unwrap_or_else(|| inherited.text_transform.clone()),
            white_space: self
                .white_space
                .clone()
                .unwrap_or_else(|| inherited.white_space.clone()),
            visibility: self
                .visibility
                .clone()
                .unwrap_or_else(|| inherited.visibility.clone()),
            cursor: self
                .cursor
                .clone()
                .unwrap_or_else(|| inherited.cursor.clone()),

            width: size_of(&self.width, Size::Auto),
            height: size_of(&self.height, Size::Auto),
            min_width: length_of(&self.min_width, Size::Px(0.0)),
            min_height: length_of(&self.min_height, Size::Px(0.0)),
            max_width: length_of(&self.max_width, Size::Auto),
            max_height: length_of(&self.max_height, Size::Auto),

            margin_top: size_of(&self.margin_top, Size::Px(0.0)),
            margin_right: size_of(&self.margin_right, Size::Px(0.0)),
            margin_bottom: size_of(&self.margin_bottom, Size::Px(0.0)),
            margin_left: size_of(&self.margin_left, Size::Px(0.0)),

            padding_top: length_of(&self.padding_top, Size::Px(0.0)),
            padding_right: length_of(&self.padding_right, Size::Px(0.0)),
            padding_bottom: length_of(&self.padding_bottom, Size::Px(0.0)),
            padding_left: length_of(&self.padding_left, Size::Px(0.0)),

            border_top_width: border_width(&self.border_top_width),
            border_right_width: border_width(&self.border_right_width),
            border_bottom_width: border_width(&self.border_bottom_width),
            border_left_width: border_width(&self.border_left_width),
            border_style,
            border_color,

            flex_direction: self.flex_direction.unwrap_or_default(),
            flex_wrap: self.flex_wrap.unwrap_or_default(),
            justify_content: self.justify_content.unwrap_or_default(),
            align_items: self.align_items.unwrap_or_default(),
            align_self: self.align_self.unwrap_or_default(),
            align_content: self.align_content.unwrap_or_default(),
            flex_grow: self.flex_grow.unwrap_or(0.0),
            flex_shrink: self.flex_shrink.unwrap_or(1.0),
            flex_basis: size_of(&self.flex_basis, Size::Auto),
            order: self.order.unwrap_or(0),

            row_gap: length_of(&self.row_gap, Size::Px(0.0)),
            column_gap: length_of(&self.column_gap, Size::Px(0.0)),

            grid_template_columns: self
                .grid_template_columns
                .as_ref()
                .map_or_else(TrackTemplate::none, |t| t.resolve(&ctx)),
            grid_template_rows: self
                .grid_template_rows
                .as_ref()
                .map_or_else(TrackTemplate::none, |t| t.resolve(&ctx)),
            grid_row_start: self.grid_row_start.unwrap_or_default(),
            grid_row_end: self.grid_row_end.unwrap_or_default(),
            grid_column_start: self.grid_column_start.unwrap_or_default(),
            grid_column_end: self.grid_column_end.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CssParser;
    use crate::tokenizer::CssTokenizer;

    fn specified(css: &str) -> SpecifiedStyle {
        let mut tokenizer = CssTokenizer::new(css);
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        let mut style = SpecifiedStyle::default();
        for decl in parser.parse_declaration_list() {
            style.apply_declaration(&decl);
        }
        style
    }

    fn ctx() -> ResolveContext {
        ResolveContext::with_viewport(1280.0, 720.0)
    }

    #[test]
    fn empty_style_takes_initial_values() {
        let computed = SpecifiedStyle::default().resolve(None, &ctx());
        assert_eq!(computed, ComputedStyle::default());
    }

    #[test]
    fn font_size_em_resolves_against_parent() {
        let parent = specified("font-size: 20px").resolve(None, &ctx());
        assert_eq!(parent.font_size, 20.0);

        let child_ctx = ctx().with_font_size(parent.font_size);
        let child = specified("font-size: 1.5em").resolve(Some(&parent), &child_ctx);
        assert_eq!(child.font_size, 30.0);

        let percent = specified("font-size: 50%").resolve(Some(&parent), &child_ctx);
        assert_eq!(percent.font_size, 10.0);
    }

    #[test]
    fn em_lengths_use_own_font_size() {
        let computed = specified("font-size: 20px; padding-left: 2em").resolve(None, &ctx());
        assert_eq!(computed.padding_left, Size::Px(40.0));
    }

    #[test]
    fn inherited_properties_flow_from_parent() {
        let parent = specified("color: red; text-align: center; letter-spacing: 2px")
            .resolve(None, &ctx());
        let child = SpecifiedStyle::default().resolve(Some(&parent), &ctx());
        assert_eq!(child.color, Rgba::new(255, 0, 0, 255));
        assert_eq!(child.text_align, TextAlign::Center);
        assert_eq!(child.letter_spacing, 2.0);
        // width is not inherited
        let parent_sized = specified("width: 100px").resolve(None, &ctx());
        let child = SpecifiedStyle::default().resolve(Some(&parent_sized), &ctx());
        assert_eq!(child.width, Size::Auto);
    }

    #[test]
    fn relative_font_weights_resolve_against_inherited() {
        let parent = specified("font-weight: bold").resolve(None, &ctx());
        assert_eq!(parent.font_weight, 700.0);
        let child = specified("font-weight: bolder").resolve(Some(&parent), &ctx());
        assert_eq!(child.font_weight, 900.0);
        let lighter = specified("font-weight: lighter").resolve(Some(&parent), &ctx());
        assert_eq!(lighter.font_weight, 400.0);
    }

    #[test]
    fn line_height_forms() {
        let normal = specified("font-size: 10px").resolve(None, &ctx());
        assert_eq!(normal.line_height, 12.0);

        let multiple = specified("font-size: 10px; line-height: 2").resolve(None, &ctx());
        assert_eq!(multiple.line_height, 20.0);

        let percent = specified("font-size: 10px; line-height: 150%").resolve(None, &ctx());
        assert_eq!(percent.line_height, 15.0);
    }

    #[test]
    fn border_width_is_zero_without_style() {
        let no_style = specified("border-top-width: 4px").resolve(None, &ctx());
        assert_eq!(no_style.border_top_width, 0.0);

        let styled = specified("border-top-width: 4px; border-style: solid").resolve(None, &ctx());
        assert_eq!(styled.border_top_width, 4.0);

        // width omitted: medium
        let medium = specified("border-style: solid").resolve(None, &ctx());
        assert_eq!(medium.border_top_width, 3.0);
    }

    #[test]
    fn border_color_defaults_to_current_color() {
        let computed = specified("color: blue; border-style: solid").resolve(None, &ctx());
        assert_eq!(computed.border_color, Rgba::new(0, 0, 255, 255));
    }

    #[test]
    fn percentages_stay_symbolic() {
        let computed = specified("width: 50%; margin-left: 10%").resolve(None, &ctx());
        assert_eq!(computed.width, Size::Percent(50.0));
        assert_eq!(computed.margin_left, Size::Percent(10.0));
    }

    #[test]
    fn grid_template_resolves_fixed_tracks() {
        let computed =
            specified("grid-template-columns: 100px 1fr; font-size: 10px").resolve(None, &ctx());
        use crate::style::values::{TemplateEntry, TrackSize};
        assert_eq!(
            computed.grid_template_columns.entries,
            vec![
                TemplateEntry::Single(TrackSize::Fixed(Size::Px(100.0))),
                TemplateEntry::Single(TrackSize::Fr(1.0)),
            ]
        );
    }

    #[test]
    fn unset_line_height_scales_with_own_font_size() {
        let parent = specified("line-height: 1.5; font-size: 10px").resolve(None, &ctx());
        assert_eq!(parent.line_height, 15.0);
        let child_ctx = ctx().with_font_size(parent.font_size);
        let child = specified("font-size: 20px").resolve(Some(&parent), &child_ctx);
        assert_eq!(child.line_height, 30.0);
    }

    #[test]
    fn calc_widths_resolve_at_style_time_when_possible() {
        let computed = specified("width: calc(100% - 24px)").resolve(None, &ctx());
        assert_eq!(
            computed.width,
            Size::Calc {
                px: -24.0,
                percent: 100.0
            }
        );
    }
}
