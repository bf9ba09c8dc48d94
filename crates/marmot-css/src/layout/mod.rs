//! Box layout.
//!
//! [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//!
//! One layout pass turns the computed-style tree into a [`LayoutBox`] per
//! element. Styles are already fully computed; the only values still
//! symbolic are percentages and percentage-bearing `calc()` parts, which
//! resolve here against real containing-block sizes.
//!
//! Sizing order follows the CSS constraint structure: a container's width
//! is determined before its children are laid out (children may depend on
//! it), while an `auto` height is determined after (it depends on the
//! children). Each container with `display: flex` or `display: grid` hands
//! its children to the matching engine; everything else stacks children
//! vertically in normal flow.
//!
//! Every box is positioned relative to the content origin of its
//! containing block; ancestors only ever translate descendants when
//! placing them.

pub mod box_model;
pub mod flex;
pub mod grid;

pub use box_model::{EdgeSizes, LayoutBox, Rect};

use std::collections::HashMap;
use std::sync::OnceLock;

use marmot_dom::{DomTree, NodeId, NodeType};

use crate::style::ComputedStyle;
use crate::style::values::Display;

/// Content measurement for text runs.
///
/// Real text shaping needs font metrics the engine does not have; the
/// trait seam lets an embedder supply real measurements while the default
/// [`HeuristicMeasure`] keeps layout deterministic and self-contained.
pub trait ContentMeasure {
    /// The max-content width of a text run: no wrapping.
    fn text_width(&self, text: &str, style: &ComputedStyle) -> f64;

    /// The height of a text run wrapped to `width`.
    fn text_height(&self, text: &str, style: &ComputedStyle, width: f64) -> f64;
}

/// Deterministic character-count text measurement.
///
/// Approximates each glyph at half the font size, a reasonable average
/// for proportional Latin text. Height is whole line boxes at the
/// computed line height.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicMeasure;

impl ContentMeasure for HeuristicMeasure {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, style: &ComputedStyle) -> f64 {
        let glyphs = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let count = glyphs.chars().count() as f64;
        let advance = style.font_size * 0.5 + style.letter_spacing;
        count * advance
    }

    fn text_height(&self, text: &str, style: &ComputedStyle, width: f64) -> f64 {
        let full_width = self.text_width(text, style);
        if full_width <= 0.0 {
            return 0.0;
        }
        let lines = if width > 0.0 {
            (full_width / width).ceil().max(1.0)
        } else {
            1.0
        };
        lines * style.line_height
    }
}

/// The containing block a box is laid out against.
///
/// [CSS2 § 10.1 Definition of "containing block"](https://www.w3.org/TR/CSS2/visudet.html#containing-block-details)
///
/// Width is always definite by the time a child is laid out; height is
/// `None` while the container's own height is still `auto`, which makes
/// height percentages unresolvable (they fall back to `auto`).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Containing {
    pub width: f64,
    pub height: Option<f64>,
}

/// Used sizes imposed by a parent layout engine, overriding the child's
/// own width/height properties (flex main sizes, grid track spans).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SizeOverride {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

/// Shared state of one layout pass. Read-only; results accumulate in the
/// output map passed alongside.
pub(crate) struct LayoutEnv<'a> {
    pub tree: &'a DomTree,
    pub styles: &'a HashMap<NodeId, ComputedStyle>,
    pub measure: &'a dyn ContentMeasure,
}

fn initial_style() -> &'static ComputedStyle {
    static INITIAL: OnceLock<ComputedStyle> = OnceLock::new();
    INITIAL.get_or_init(ComputedStyle::default)
}

/// Every finished box field must be finite and non-negative.
fn sane(v: f64) -> f64 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

impl LayoutEnv<'_> {
    pub(crate) fn style(&self, id: NodeId) -> &ComputedStyle {
        self.styles.get(&id).unwrap_or_else(|| initial_style())
    }

    /// The element children that generate boxes, in document order.
    pub(crate) fn box_children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree
            .children(id)
            .iter()
            .copied()
            .filter(|&child| {
                self.tree.as_element(child).is_some() && self.style(child).generates_box()
            })
            .collect()
    }

    /// Estimate a subtree's max-content width.
    ///
    /// Text runs measure through the [`ContentMeasure`]; element children
    /// contribute their own estimate plus box-edge extras. The widest
    /// piece wins, matching max-content behavior for block-ish content.
    pub(crate) fn intrinsic_width(&self, id: NodeId) -> f64 {
        let style = self.style(id);
        let mut widest: f64 = 0.0;
        for &child in self.tree.children(id) {
            let contribution = match self.tree.get(child).map(|n| &n.node_type) {
                Some(NodeType::Text(text)) => self.measure.text_width(text, style),
                Some(NodeType::Element(_)) if self.style(child).generates_box() => {
                    let child_style = self.style(child);
                    self.intrinsic_width(child)
                        + child_style.margin_left.resolve_or(None, 0.0)
                        + child_style.margin_right.resolve_or(None, 0.0)
                }
                _ => 0.0,
            };
            widest = widest.max(contribution);
        }
        // Explicit pixel widths short-circuit the estimate.
        if let Some(width) = style.width.resolve(None) {
            widest = width;
        }
        widest
            + style.padding_left.resolve_or(None, 0.0)
            + style.padding_right.resolve_or(None, 0.0)
            + style.border_left_width
            + style.border_right_width
    }

    /// Lay out one element and its subtree.
    ///
    /// The returned box has final sizes and edges but `x`/`y` still zero;
    /// the caller positions it within its own content box. Children's
    /// boxes are written to `out`, positioned relative to this element's
    /// content origin.
    pub(crate) fn layout_element(
        &self,
        id: NodeId,
        containing: Containing,
        forced: SizeOverride,
        out: &mut HashMap<NodeId, LayoutBox>,
    ) -> LayoutBox {
        let style = self.style(id);
        let cb_width = Some(containing.width);

        // [CSS2 § 8.3/8.4] margin and padding percentages resolve against
        // the containing block's width, for the vertical edges too.
        let margin = EdgeSizes {
            top: style.margin_top.resolve_or(cb_width, 0.0),
            right: style.margin_right.resolve_or(cb_width, 0.0),
            bottom: style.margin_bottom.resolve_or(cb_width, 0.0),
            left: style.margin_left.resolve_or(cb_width, 0.0),
        };
        let padding = EdgeSizes {
            top: style.padding_top.resolve_or(cb_width, 0.0),
            right: style.padding_right.resolve_or(cb_width, 0.0),
            bottom: style.padding_bottom.resolve_or(cb_width, 0.0),
            left: style.padding_left.resolve_or(cb_width, 0.0),
        };
        let border = EdgeSizes {
            top: style.border_top_width,
            right: style.border_right_width,
            bottom: style.border_bottom_width,
            left: style.border_left_width,
        };

        let horizontal_extras = margin.horizontal() + padding.horizontal() + border.horizontal();

        let width = forced.width.or_else(|| style.width.resolve(cb_width));
        let width = width.unwrap_or_else(|| {
            // auto width: block-level boxes fill the containing block;
            // inline-level boxes shrink to fit their content.
            match style.display {
                Display::Inline | Display::InlineBlock => self
                    .intrinsic_width(id)
                    .min(containing.width - horizontal_extras),
                _ => containing.width - horizontal_extras,
            }
        });
        let min_width = style.min_width.resolve_or(cb_width, 0.0);
        let width = match style.max_width.resolve(cb_width) {
            Some(max) => width.min(max),
            None => width,
        };
        let width = sane(width.max(min_width));

        let explicit_height = forced
            .height
            .or_else(|| style.height.resolve(containing.height));
        let inner = Containing {
            width,
            height: explicit_height,
        };

        let content_height = match style.display {
            Display::Flex => flex::layout_flex(self, id, style, inner, out),
            Display::Grid => grid::layout_grid(self, id, style, inner, out),
            _ => self.stack_children(id, style, inner, out),
        };

        let height = explicit_height.unwrap_or(content_height);
        let min_height = style.min_height.resolve_or(containing.height, 0.0);
        let height = match style.max_height.resolve(containing.height) {
            Some(max) => height.min(max),
            None => height,
        };
        let height = sane(height.max(min_height));

        LayoutBox {
            x: 0.0,
            y: 0.0,
            width,
            height,
            margin,
            padding,
            border_width: border,
        }
    }

    /// [CSS2 § 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "In a block formatting context, boxes are laid out one after the
    /// other, vertically, beginning at the top of a containing block."
    ///
    /// Margin collapsing is not modeled. Returns the content height used.
    fn stack_children(
        &self,
        id: NodeId,
        style: &ComputedStyle,
        inner: Containing,
        out: &mut HashMap<NodeId, LayoutBox>,
    ) -> f64 {
        let mut cursor = 0.0;
        for &child in self.tree.children(id) {
            match self.tree.get(child).map(|n| &n.node_type) {
                Some(NodeType::Element(_)) if self.style(child).generates_box() => {
                    let mut child_box = self.layout_element(
                        child,
                        Containing {
                            width: inner.width,
                            height: inner.height,
                        },
                        SizeOverride::default(),
                        out,
                    );
                    child_box.x = child_box.margin.left;
                    child_box.y = cursor + child_box.margin.top;
                    cursor += child_box.outer_height();
                    let _ = out.insert(child, child_box);
                }
                Some(NodeType::Text(text)) => {
                    // Text inherits the container's style and occupies
                    // whole line boxes.
                    cursor += self.measure.text_height(text, style, inner.width);
                }
                _ => {}
            }
        }
        cursor
    }
}

/// Lay out the whole tree against a viewport.
///
/// Produces one [`LayoutBox`] per box-generating element, each positioned
/// relative to its containing block's content origin. The pass is a pure
/// function of its inputs: running it twice yields identical maps.
#[must_use]
pub fn layout_tree(
    tree: &DomTree,
    styles: &HashMap<NodeId, ComputedStyle>,
    measure: &dyn ContentMeasure,
    viewport_width: f64,
    viewport_height: f64,
) -> HashMap<NodeId, LayoutBox> {
    let env = LayoutEnv {
        tree,
        styles,
        measure,
    };
    let mut out = HashMap::new();

    // The document behaves as a block container the size of the viewport.
    let mut cursor = 0.0;
    for child in env.box_children(tree.root()) {
        let mut top_box = env.layout_element(
            child,
            Containing {
                width: viewport_width,
                height: Some(viewport_height),
            },
            SizeOverride::default(),
            &mut out,
        );
        top_box.x = top_box.margin.left;
        top_box.y = cursor + top_box.margin.top;
        cursor += top_box.outer_height();
        let _ = out.insert(child, top_box);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::compute_styles;
    use crate::parser::CssParser;
    use crate::tokenizer::CssTokenizer;
    use marmot_dom::{AttributesMap, ElementData};

    fn element(tag: &str, class: Option<&str>) -> NodeType {
        let mut attrs = AttributesMap::new();
        if let Some(class) = class {
            let _ = attrs.insert("class".to_string(), class.to_string());
        }
        NodeType::Element(ElementData {
            tag_name: tag.to_string(),
            attrs,
        })
    }

    fn layout(css: &str, build: impl FnOnce(&mut DomTree)) -> HashMap<NodeId, LayoutBox> {
        let mut tree = DomTree::new();
        build(&mut tree);
        let mut tokenizer = CssTokenizer::new(css);
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        let stylesheet = parser.parse_stylesheet();
        let styles = compute_styles(&tree, &stylesheet, 800.0, 600.0);
        layout_tree(&tree, &styles, &HeuristicMeasure, 800.0, 600.0)
    }

    #[test]
    fn block_children_stack_vertically() {
        let boxes = layout(
            "div { margin: 0; } .a { height: 40px; } .b { height: 60px; }",
            |tree| {
                let root = tree.alloc(element("div", None));
                let a = tree.alloc(element("div", Some("a")));
                let b = tree.alloc(element("div", Some("b")));
                tree.append_child(NodeId::ROOT, root);
                tree.append_child(root, a);
                tree.append_child(root, b);
            },
        );

        assert_eq!(boxes[&NodeId(2)].y, 0.0);
        assert_eq!(boxes[&NodeId(3)].y, 40.0);
        // auto height wraps the children
        assert_eq!(boxes[&NodeId(1)].height, 100.0);
        // auto width fills the containing block
        assert_eq!(boxes[&NodeId(1)].width, 800.0);
    }

    #[test]
    fn percentage_width_resolves_against_container() {
        let boxes = layout(
            ".outer { width: 400px; margin: 0; } .inner { width: 50%; height: 10px; }",
            |tree| {
                let outer = tree.alloc(element("div", Some("outer")));
                let inner = tree.alloc(element("div", Some("inner")));
                tree.append_child(NodeId::ROOT, outer);
                tree.append_child(outer, inner);
            },
        );

        assert_eq!(boxes[&NodeId(2)].width, 200.0);
    }

    #[test]
    fn unresolvable_percentage_height_falls_back_to_content() {
        // The container's height is auto, so the child's percentage height
        // has no base and behaves as auto.
        let boxes = layout(
            ".outer { margin: 0; } .inner { height: 50%; }",
            |tree| {
                let outer = tree.alloc(element("div", Some("outer")));
                let inner = tree.alloc(element("div", Some("inner")));
                tree.append_child(NodeId::ROOT, outer);
                tree.append_child(outer, inner);
            },
        );

        assert_eq!(boxes[&NodeId(2)].height, 0.0);
    }

    #[test]
    fn padding_and_border_surround_content() {
        let boxes = layout(
            ".box { width: 100px; height: 50px; padding: 10px; border: 2px solid black; margin: 5px; }",
            |tree| {
                let b = tree.alloc(element("div", Some("box")));
                tree.append_child(NodeId::ROOT, b);
            },
        );

        let layout_box = &boxes[&NodeId(1)];
        assert_eq!(layout_box.width, 100.0);
        assert_eq!(layout_box.border_box_width(), 124.0);
        assert_eq!(layout_box.outer_width(), 134.0);
        assert_eq!(layout_box.x, 5.0);
        assert_eq!(layout_box.y, 5.0);
    }

    #[test]
    fn display_none_generates_no_box() {
        let boxes = layout(".hidden { display: none; }", |tree| {
            let root = tree.alloc(element("div", None));
            let hidden = tree.alloc(element("div", Some("hidden")));
            tree.append_child(NodeId::ROOT, root);
            tree.append_child(root, hidden);
        });

        assert!(boxes.contains_key(&NodeId(1)));
        assert!(!boxes.contains_key(&NodeId(2)));
    }

    #[test]
    fn text_contributes_line_height() {
        let boxes = layout(".p { font-size: 16px; line-height: 20px; margin: 0; }", |tree| {
            let p = tree.alloc(element("p", Some("p")));
            let text = tree.alloc(NodeType::Text("hello".to_string()));
            tree.append_child(NodeId::ROOT, p);
            tree.append_child(p, text);
        });

        // one line of text
        assert_eq!(boxes[&NodeId(1)].height, 20.0);
    }

    #[test]
    fn min_and_max_constrain_sizes() {
        let boxes = layout(
            ".a { width: 500px; max-width: 300px; height: 10px; min-height: 25px; }",
            |tree| {
                let a = tree.alloc(element("div", Some("a")));
                tree.append_child(NodeId::ROOT, a);
            },
        );

        assert_eq!(boxes[&NodeId(1)].width, 300.0);
        assert_eq!(boxes[&NodeId(1)].height, 25.0);
    }

    #[test]
    fn layout_is_idempotent() {
        let build = |tree: &mut DomTree| {
            let root = tree.alloc(element("div", None));
            let a = tree.alloc(element("div", Some("a")));
            tree.append_child(NodeId::ROOT, root);
            tree.append_child(root, a);
        };
        let css = ".a { width: 50%; height: 30px; padding: 4px; }";
        let first = layout(css, build);
        let second = layout(css, build);
        assert_eq!(first, second);
    }
}
