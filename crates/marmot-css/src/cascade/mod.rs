//! CSS cascading and style computation per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/).
//!
//! [`compute_styles`] walks the element tree with an explicit worklist
//! (parents before children, so inherited values are always available) and
//! produces one [`ComputedStyle`] per element. For each element the
//! declarations of every matching rule accumulate into a
//! [`SpecifiedStyle`] in cascade order:
//!
//! 1. user-agent rules, ascending specificity, source order breaking ties,
//! 2. author rules, the same way,
//! 3. the element's `style` attribute.
//!
//! `!important` is parsed and carried on declarations but does not form a
//! separate priority tier here.

use std::collections::HashMap;

use marmot_common::warning::warn_once;
use marmot_dom::{DomTree, NodeId, NodeType};

use crate::parser::{CssParser, Rule, StyleRule, Stylesheet};
use crate::selector::{ParsedSelector, parse_selector};
use crate::style::values::{DEFAULT_FONT_SIZE_PX, ResolveContext};
use crate::style::{ComputedStyle, SpecifiedStyle};
use crate::tokenizer::CssTokenizer;
use crate::ua_stylesheet::ua_stylesheet;

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// One selector of one rule, ready for matching. Comma-separated selector
/// lists are split into independent entries sharing the rule's declarations.
struct CascadeRule<'a> {
    selector: ParsedSelector,
    specificity: u32,
    rule: &'a StyleRule,
}

/// Parse every selector of every style rule in a sheet.
///
/// A selector that fails to parse entirely is dropped with a warning; the
/// rule's other selectors still participate.
fn collect_rules(sheet: &Stylesheet) -> Vec<CascadeRule<'_>> {
    let mut rules = Vec::new();
    for rule in &sheet.rules {
        let Rule::Style(style_rule) = rule else {
            continue; // at-rules are not cascaded
        };
        for selector in &style_rule.selectors {
            if let Some(parsed) = parse_selector(&selector.text) {
                let specificity = parsed.specificity();
                rules.push(CascadeRule {
                    selector: parsed,
                    specificity,
                    rule: style_rule,
                });
            } else {
                warn_once(
                    "CSS",
                    &format!("failed to parse selector '{}'", selector.text),
                );
            }
        }
    }
    rules
}

/// Apply every rule matching `node_id`, in ascending specificity with
/// source order breaking ties.
///
/// [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
///
/// "The declaration with the highest specificity wins." Sorting ascending
/// and letting later applications overwrite earlier ones implements that
/// property-by-property.
fn apply_matching(
    style: &mut SpecifiedStyle,
    rules: &[CascadeRule<'_>],
    tree: &DomTree,
    node_id: NodeId,
) {
    let mut matched: Vec<&CascadeRule<'_>> = rules
        .iter()
        .filter(|rule| rule.selector.matches_in_tree(tree, node_id))
        .collect();
    // stable: equal specificity keeps source order, so later rules win
    matched.sort_by_key(|rule| rule.specificity);

    for rule in matched {
        for decl in &rule.rule.declarations {
            style.apply_declaration(decl);
        }
    }
}

/// [CSS Style Attributes](https://www.w3.org/TR/css-style-attr/#interpret)
///
/// "The value of the style attribute must match the syntax of the contents
/// of a CSS declaration block." Inline declarations are applied after all
/// rules, as the highest authored priority.
fn apply_inline_style(style: &mut SpecifiedStyle, inline: &str) {
    let mut tokenizer = CssTokenizer::new(inline);
    tokenizer.run();
    let mut parser = CssParser::new(tokenizer.into_tokens());
    for decl in parser.parse_declaration_list() {
        style.apply_declaration(&decl);
    }
}

/// Compute the style of every element in the tree.
///
/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
///
/// "The cascade takes an unordered list of declared values for a given
/// property on a given element, sorts them by their declaration's
/// precedence, and outputs a single cascaded value."
///
/// Traversal uses an explicit worklist rather than recursion, so arbitrarily
/// deep trees cannot exhaust the call stack. Document and text nodes carry
/// no style of their own; text inherits from its parent element at layout
/// time.
#[must_use]
pub fn compute_styles(
    tree: &DomTree,
    stylesheet: &Stylesheet,
    viewport_width: f64,
    viewport_height: f64,
) -> HashMap<NodeId, ComputedStyle> {
    let ua_rules = collect_rules(ua_stylesheet());
    let author_rules = collect_rules(stylesheet);

    let mut styles: HashMap<NodeId, ComputedStyle> = HashMap::new();
    // The root element's font size backs `rem`; until it is computed the
    // default applies (covers the root element's own declarations).
    let mut root_font_size: Option<f64> = None;

    // (node, nearest ancestor element) — parents are processed before
    // children, so the ancestor's computed style is always present.
    let mut worklist: Vec<(NodeId, Option<NodeId>)> = vec![(tree.root(), None)];
    while let Some((node_id, parent_id)) = worklist.pop() {
        let Some(node) = tree.get(node_id) else {
            continue;
        };

        let next_parent = match &node.node_type {
            NodeType::Element(element) => {
                let parent_style = parent_id.and_then(|id| styles.get(&id));

                let mut specified = SpecifiedStyle::default();
                apply_matching(&mut specified, &ua_rules, tree, node_id);
                apply_matching(&mut specified, &author_rules, tree, node_id);
                if let Some(inline) = element.inline_style() {
                    apply_inline_style(&mut specified, inline);
                }

                let mut ctx = ResolveContext::with_viewport(viewport_width, viewport_height);
                ctx.root_font_size = root_font_size.unwrap_or(DEFAULT_FONT_SIZE_PX);
                if let Some(parent) = parent_style {
                    ctx = ctx.with_font_size(parent.font_size);
                }

                let computed = specified.resolve(parent_style, &ctx);
                if root_font_size.is_none() {
                    root_font_size = Some(computed.font_size);
                }
                let _ = styles.insert(node_id, computed);
                Some(node_id)
            }
            // Document and text nodes pass the ancestor element through.
            NodeType::Document | NodeType::Text(_) => parent_id,
        };

        // Reverse push keeps document order on the stack.
        for &child_id in tree.children(node_id).iter().rev() {
            worklist.push((child_id, next_parent));
        }
    }

    styles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::values::{Rgba, Size, TextAlign};
    use marmot_dom::{AttributesMap, ElementData};

    fn parse_css(css: &str) -> Stylesheet {
        let mut tokenizer = CssTokenizer::new(css);
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        parser.parse_stylesheet()
    }

    fn make_element(tag: &str, id: Option<&str>, classes: &[&str]) -> NodeType {
        let mut attrs = AttributesMap::new();
        if let Some(id_val) = id {
            let _ = attrs.insert("id".to_string(), id_val.to_string());
        }
        if !classes.is_empty() {
            let _ = attrs.insert("class".to_string(), classes.join(" "));
        }
        NodeType::Element(ElementData {
            tag_name: tag.to_string(),
            attrs,
        })
    }

    fn styles_for(
        css: &str,
        build: impl FnOnce(&mut DomTree),
    ) -> (DomTree, HashMap<NodeId, ComputedStyle>) {
        let stylesheet = parse_css(css);
        let mut tree = DomTree::new();
        build(&mut tree);
        let styles = compute_styles(&tree, &stylesheet, 1280.0, 720.0);
        (tree, styles)
    }

    #[test]
    fn simple_rule_applies() {
        let (_, styles) = styles_for("body { color: #333; }", |tree| {
            let body = tree.alloc(make_element("body", None, &[]));
            tree.append_child(NodeId::ROOT, body);
        });

        assert!(!styles.contains_key(&NodeId::ROOT));
        let body_style = &styles[&NodeId(1)];
        assert_eq!(body_style.color, Rgba::new(0x33, 0x33, 0x33, 255));
    }

    #[test]
    fn inherited_properties_reach_descendants() {
        let (_, styles) = styles_for("body { color: #ff0000; }", |tree| {
            let body = tree.alloc(make_element("body", None, &[]));
            let p = tree.alloc(make_element("p", None, &[]));
            tree.append_child(NodeId::ROOT, body);
            tree.append_child(body, p);
        });

        let p_style = &styles[&NodeId(2)];
        assert_eq!(p_style.color, Rgba::new(0xff, 0, 0, 255));
        // background-color is not inherited
        assert_eq!(p_style.background_color, Rgba::TRANSPARENT);
    }

    #[test]
    fn higher_specificity_wins_regardless_of_source_order() {
        let (_, styles) = styles_for(
            ".highlight { color: #00ff00; } p { color: #ff0000; }",
            |tree| {
                let p = tree.alloc(make_element("p", None, &["highlight"]));
                tree.append_child(NodeId::ROOT, p);
            },
        );

        let p_style = &styles[&NodeId(1)];
        assert_eq!(p_style.color, Rgba::new(0, 0xff, 0, 255));
    }

    #[test]
    fn equal_specificity_later_rule_wins() {
        let (_, styles) = styles_for("p { color: #ff0000; } p { color: #0000ff; }", |tree| {
            let p = tree.alloc(make_element("p", None, &[]));
            tree.append_child(NodeId::ROOT, p);
        });

        let p_style = &styles[&NodeId(1)];
        assert_eq!(p_style.color, Rgba::new(0, 0, 0xff, 255));
    }

    #[test]
    fn author_rules_override_ua_rules() {
        // The UA sheet gives body `display: block; margin: 8px`.
        let (_, styles) = styles_for("body { margin: 0; display: flex; }", |tree| {
            let body = tree.alloc(make_element("body", None, &[]));
            tree.append_child(NodeId::ROOT, body);
        });

        let body_style = &styles[&NodeId(1)];
        assert_eq!(body_style.margin_top, Size::Px(0.0));
        assert_eq!(
            body_style.display,
            crate::style::values::Display::Flex
        );
    }

    #[test]
    fn ua_defaults_apply_without_author_rules() {
        let (_, styles) = styles_for("", |tree| {
            let body = tree.alloc(make_element("body", None, &[]));
            let h1 = tree.alloc(make_element("h1", None, &[]));
            tree.append_child(NodeId::ROOT, body);
            tree.append_child(body, h1);
        });

        let body_style = &styles[&NodeId(1)];
        assert_eq!(body_style.margin_top, Size::Px(8.0));
        let h1_style = &styles[&NodeId(2)];
        assert_eq!(h1_style.font_size, 32.0);
        assert_eq!(h1_style.font_weight, 700.0);
    }

    #[test]
    fn inline_style_beats_every_rule() {
        let (_, styles) = styles_for("#box { color: red !important; }", |tree| {
            let mut attrs = AttributesMap::new();
            let _ = attrs.insert("id".to_string(), "box".to_string());
            let _ = attrs.insert("style".to_string(), "color: blue".to_string());
            let div = tree.alloc(NodeType::Element(ElementData {
                tag_name: "div".to_string(),
                attrs,
            }));
            tree.append_child(NodeId::ROOT, div);
        });

        let div_style = &styles[&NodeId(1)];
        assert_eq!(div_style.color, Rgba::new(0, 0, 0xff, 255));
    }

    #[test]
    fn comma_selector_lists_are_independent_rules() {
        let (_, styles) = styles_for("h1, .wide, #main { text-align: center; }", |tree| {
            let h1 = tree.alloc(make_element("h1", None, &[]));
            let div = tree.alloc(make_element("div", None, &["wide"]));
            let span = tree.alloc(make_element("span", Some("main"), &[]));
            let other = tree.alloc(make_element("span", None, &[]));
            for id in [h1, div, span, other] {
                tree.append_child(NodeId::ROOT, id);
            }
        });

        assert_eq!(styles[&NodeId(1)].text_align, TextAlign::Center);
        assert_eq!(styles[&NodeId(2)].text_align, TextAlign::Center);
        assert_eq!(styles[&NodeId(3)].text_align, TextAlign::Center);
        assert_eq!(styles[&NodeId(4)].text_align, TextAlign::Left);
    }

    #[test]
    fn descendant_combinator_matches_through_ancestors() {
        let (_, styles) = styles_for(".card p { color: #123456; }", |tree| {
            let card = tree.alloc(make_element("div", None, &["card"]));
            let inner = tree.alloc(make_element("div", None, &[]));
            let p = tree.alloc(make_element("p", None, &[]));
            let outside = tree.alloc(make_element("p", None, &[]));
            tree.append_child(NodeId::ROOT, card);
            tree.append_child(card, inner);
            tree.append_child(inner, p);
            tree.append_child(NodeId::ROOT, outside);
        });

        assert_eq!(styles[&NodeId(3)].color, Rgba::new(0x12, 0x34, 0x56, 255));
        assert_eq!(styles[&NodeId(4)].color, Rgba::BLACK);
    }

    #[test]
    fn font_relative_units_resolve_through_the_tree() {
        let (_, styles) = styles_for(
            "html { font-size: 10px; } .big { font-size: 2em; } .pad { padding-top: 1.5rem; }",
            |tree| {
                let html = tree.alloc(make_element("html", None, &[]));
                let big = tree.alloc(make_element("div", None, &["big"]));
                let pad = tree.alloc(make_element("div", None, &["pad"]));
                tree.append_child(NodeId::ROOT, html);
                tree.append_child(html, big);
                tree.append_child(big, pad);
            },
        );

        assert_eq!(styles[&NodeId(2)].font_size, 20.0);
        // rem resolves against the root element's 10px
        assert_eq!(styles[&NodeId(3)].padding_top, Size::Px(15.0));
    }
}
