//! CSS tokenizer, parser, cascade, style computation, and flex/grid layout
//! for Marmot.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   for stylesheets, style rules, and declaration lists
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/)):
//!   type, class, ID, universal and attribute selectors, compounds, the
//!   descendant combinator, and specificity
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/)):
//!   UA/author/inline ordering, specificity sorting, inheritance
//! - **Value resolution** ([CSS Values Level 4](https://www.w3.org/TR/css-values-4/)):
//!   absolute and relative length units, percentages, `calc()`, colors
//! - **Layout** ([CSS Display Level 3](https://www.w3.org/TR/css-display-3/)):
//!   block stacking plus the
//!   [Flexbox](https://www.w3.org/TR/css-flexbox-1/) and
//!   [Grid](https://www.w3.org/TR/css-grid-1/) algorithms
//!
//! Unsupported input never panics: unknown properties, selectors, and
//! malformed values are dropped with a one-time warning and the rest of
//! the stylesheet keeps working.

/// CSS cascade and style computation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Box model and layout engines per [CSS Display Level 3](https://www.w3.org/TR/css-display-3/).
pub mod layout;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Specified and computed style representation per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod style;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;

pub use cascade::compute_styles;
pub use layout::{ContentMeasure, EdgeSizes, HeuristicMeasure, LayoutBox, Rect, layout_tree};
pub use parser::{ComponentValue, CssParser, Declaration, Rule, StyleRule, Stylesheet};
pub use selector::{ParsedSelector, parse_selector};
pub use style::values::{
    AutoLength, DEFAULT_FONT_SIZE_PX, Display, LengthValue, ResolveContext, Rgba, Size,
};
pub use style::{ComputedStyle, SpecifiedStyle};
pub use tokenizer::{CssToken, CssTokenizer};

use std::collections::HashMap;

use marmot_dom::{DomTree, NodeId, NodeType};

/// Parse CSS text into a [`Stylesheet`].
///
/// Never fails: unparseable rules are skipped per the CSS error recovery
/// rules, so the worst case is an empty stylesheet.
#[must_use]
pub fn parse_css_text(css: &str) -> Stylesheet {
    let mut tokenizer = CssTokenizer::new(css);
    tokenizer.run();
    let mut parser = CssParser::new(tokenizer.into_tokens());
    parser.parse_stylesheet()
}

/// [HTML § 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)
///
/// Concatenate the CSS text of every `<style>` element in the tree, in
/// document order.
#[must_use]
pub fn extract_style_content(tree: &DomTree) -> String {
    let mut css = String::new();
    let mut worklist = vec![tree.root()];
    while let Some(id) = worklist.pop() {
        if let Some(node) = tree.get(id) {
            if let NodeType::Element(data) = &node.node_type
                && data.tag_name.eq_ignore_ascii_case("style")
            {
                for &child in tree.children(id) {
                    if let Some(text) = tree.as_text(child) {
                        css.push_str(text);
                        css.push('\n');
                    }
                }
            }
            worklist.extend(tree.children(id).iter().rev().copied());
        }
    }
    css
}

/// Compute styles and lay out a document in one call.
///
/// Runs the cascade over the UA stylesheet, the given author stylesheet,
/// and inline `style` attributes, then lays the tree out against the
/// viewport with the built-in [`HeuristicMeasure`]. Both maps are keyed by
/// [`NodeId`]; elements with `display: none` still get computed styles but
/// generate no layout boxes, and neither do their descendants.
#[must_use]
pub fn style_and_layout(
    tree: &DomTree,
    stylesheet: &Stylesheet,
    viewport_width: f64,
    viewport_height: f64,
) -> (HashMap<NodeId, ComputedStyle>, HashMap<NodeId, LayoutBox>) {
    let styles = compute_styles(tree, stylesheet, viewport_width, viewport_height);
    let boxes = layout_tree(
        tree,
        &styles,
        &HeuristicMeasure,
        viewport_width,
        viewport_height,
    );
    (styles, boxes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use marmot_dom::ElementData;

    #[test]
    fn style_elements_concatenate_in_document_order() {
        let mut tree = DomTree::new();
        let head = tree.alloc(NodeType::Element(ElementData::new("head")));
        let s1 = tree.alloc(NodeType::Element(ElementData::new("style")));
        let t1 = tree.alloc(NodeType::Text("p { color: red; }".to_string()));
        let s2 = tree.alloc(NodeType::Element(ElementData::new("style")));
        let t2 = tree.alloc(NodeType::Text("div { margin: 0; }".to_string()));
        tree.append_child(NodeId::ROOT, head);
        tree.append_child(head, s1);
        tree.append_child(s1, t1);
        tree.append_child(head, s2);
        tree.append_child(s2, t2);

        let css = extract_style_content(&tree);
        assert_eq!(css, "p { color: red; }\ndiv { margin: 0; }\n");
    }

    #[test]
    fn parse_css_text_recovers_from_garbage() {
        let sheet = parse_css_text("p { color: red; } @!!; div { }");
        assert!(!sheet.rules.is_empty());
    }
}
