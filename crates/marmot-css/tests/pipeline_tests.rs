//! End-to-end tests of the style and layout pipeline.

use marmot_css::style::values::Rgba;
use marmot_css::{Stylesheet, parse_css_text, style_and_layout};
use marmot_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

fn parse_css(css: &str) -> Stylesheet {
    parse_css_text(css)
}

fn make_element(tag: &str, attrs: &[(&str, &str)]) -> NodeType {
    let mut map = AttributesMap::new();
    for (name, value) in attrs {
        let _ = map.insert((*name).to_string(), (*value).to_string());
    }
    NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: map,
    })
}

#[test]
fn test_pipeline_is_deterministic() {
    let build = || {
        let mut tree = DomTree::new();
        let root = tree.alloc(make_element("div", &[("class", "wrap")]));
        let child = tree.alloc(make_element("p", &[]));
        let text = tree.alloc(NodeType::Text("hello world".to_string()));
        tree.append_child(NodeId::ROOT, root);
        tree.append_child(root, child);
        tree.append_child(child, text);
        tree
    };
    let sheet = parse_css(".wrap { width: 50%; padding: 1em; } p { font-size: 14px; }");

    let tree = build();
    let (styles_a, boxes_a) = style_and_layout(&tree, &sheet, 1024.0, 768.0);
    let (styles_b, boxes_b) = style_and_layout(&tree, &sheet, 1024.0, 768.0);

    assert_eq!(styles_a, styles_b);
    assert_eq!(boxes_a, boxes_b);
}

#[test]
fn test_author_rules_override_ua_defaults() {
    let mut tree = DomTree::new();
    let body = tree.alloc(make_element("body", &[]));
    tree.append_child(NodeId::ROOT, body);
    let sheet = parse_css("body { margin: 0; }");

    let (_, boxes) = style_and_layout(&tree, &sheet, 800.0, 600.0);

    // the UA sheet's `body { margin: 8px }` loses to the author rule
    assert_eq!(boxes[&NodeId(1)].margin.horizontal(), 0.0);
    assert_eq!(boxes[&NodeId(1)].width, 800.0);
}

#[test]
fn test_inline_style_wins_the_cascade() {
    let mut tree = DomTree::new();
    let div = tree.alloc(make_element(
        "div",
        &[("id", "box"), ("style", "width: 120px")],
    ));
    tree.append_child(NodeId::ROOT, div);
    let sheet = parse_css("#box { width: 500px; height: 10px; }");

    let (_, boxes) = style_and_layout(&tree, &sheet, 800.0, 600.0);

    assert_eq!(boxes[&NodeId(1)].width, 120.0);
}

#[test]
fn test_inherited_and_non_inherited_properties() {
    let mut tree = DomTree::new();
    let outer = tree.alloc(make_element("div", &[("class", "outer")]));
    let inner = tree.alloc(make_element("span", &[]));
    tree.append_child(NodeId::ROOT, outer);
    tree.append_child(outer, inner);
    let sheet = parse_css(".outer { color: #ff0000; font-size: 20px; width: 300px; }");

    let (styles, _) = style_and_layout(&tree, &sheet, 800.0, 600.0);

    let inner_style = &styles[&NodeId(2)];
    assert_eq!(inner_style.color, Rgba::new(255, 0, 0, 255));
    assert_eq!(inner_style.font_size, 20.0);
    // width does not inherit
    assert!(inner_style.width.is_auto());
}

#[test]
fn test_malformed_values_degrade_to_initial() {
    let mut tree = DomTree::new();
    let div = tree.alloc(make_element("div", &[]));
    tree.append_child(NodeId::ROOT, div);
    let sheet = parse_css(
        "div { background-color: not-a-color; width: 1parsec; height: 12px; }",
    );

    let (styles, boxes) = style_and_layout(&tree, &sheet, 800.0, 600.0);

    // the bad declarations are dropped; the good one still applies
    assert_eq!(styles[&NodeId(1)].background_color, Rgba::TRANSPARENT);
    assert_eq!(boxes[&NodeId(1)].width, 800.0);
    assert_eq!(boxes[&NodeId(1)].height, 12.0);
}

#[test]
fn test_percentages_resolve_against_containing_block() {
    let mut tree = DomTree::new();
    let outer = tree.alloc(make_element("div", &[("class", "outer")]));
    let inner = tree.alloc(make_element("div", &[("class", "inner")]));
    tree.append_child(NodeId::ROOT, outer);
    tree.append_child(outer, inner);
    let sheet =
        parse_css(".outer { width: 400px; margin: 0; } .inner { width: 50%; height: 10px; }");

    let (_, boxes) = style_and_layout(&tree, &sheet, 800.0, 600.0);

    assert_eq!(boxes[&NodeId(2)].width, 200.0);
}

#[test]
fn test_flex_main_sizes_fill_the_container() {
    let mut tree = DomTree::new();
    let flex = tree.alloc(make_element("div", &[("class", "flex")]));
    tree.append_child(NodeId::ROOT, flex);
    for _ in 0..3 {
        let item = tree.alloc(make_element("div", &[]));
        tree.append_child(flex, item);
    }
    let sheet = parse_css(
        ".flex { display: flex; width: 630px; gap: 15px; margin: 0; }
         .flex div { flex: 1; height: 10px; }",
    );

    let (_, boxes) = style_and_layout(&tree, &sheet, 800.0, 600.0);

    let widths: f64 = (2..=4).map(|i| boxes[&NodeId(i)].width).sum();
    assert_eq!(widths + 2.0 * 15.0, 630.0);
    assert_eq!(boxes[&NodeId(2)].width, 200.0);
}

#[test]
fn test_grid_auto_fit_fills_the_container() {
    let mut tree = DomTree::new();
    let grid = tree.alloc(make_element("div", &[("class", "grid")]));
    tree.append_child(NodeId::ROOT, grid);
    for _ in 0..4 {
        let item = tree.alloc(make_element("div", &[]));
        tree.append_child(grid, item);
    }
    let sheet = parse_css(
        ".grid { display: grid; width: 1320px; margin: 0; gap: 24px;
                 grid-template-columns: repeat(auto-fit, minmax(300px, 1fr)); }
         .grid div { height: 10px; }",
    );

    let (_, boxes) = style_and_layout(&tree, &sheet, 1600.0, 900.0);

    for i in 2..=5 {
        assert_eq!(boxes[&NodeId(i)].width, 312.0);
    }
    assert_eq!(boxes[&NodeId(5)].x, 3.0 * (312.0 + 24.0));
}

#[test]
fn test_display_none_subtree_is_styled_but_not_laid_out() {
    let mut tree = DomTree::new();
    let root = tree.alloc(make_element("div", &[]));
    let hidden = tree.alloc(make_element("div", &[("class", "hidden")]));
    let nested = tree.alloc(make_element("p", &[]));
    tree.append_child(NodeId::ROOT, root);
    tree.append_child(root, hidden);
    tree.append_child(hidden, nested);
    let sheet = parse_css(".hidden { display: none; color: #00ff00; }");

    let (styles, boxes) = style_and_layout(&tree, &sheet, 800.0, 600.0);

    assert_eq!(styles[&NodeId(2)].color, Rgba::new(0, 255, 0, 255));
    assert!(!boxes.contains_key(&NodeId(2)));
    assert!(!boxes.contains_key(&NodeId(3)));
}

#[test]
fn test_computed_styles_and_boxes_serialize() {
    let mut tree = DomTree::new();
    let div = tree.alloc(make_element("div", &[]));
    tree.append_child(NodeId::ROOT, div);
    let sheet = parse_css("div { width: 100px; height: 40px; color: #336699; }");

    let (styles, boxes) = style_and_layout(&tree, &sheet, 800.0, 600.0);

    let style_json = serde_json::to_value(&styles[&NodeId(1)]).expect("style serializes");
    assert!(style_json.get("font_size").is_some());
    assert!(style_json.get("color").is_some());

    let box_json = serde_json::to_value(&boxes[&NodeId(1)]).expect("box serializes");
    assert_eq!(box_json["width"], 100.0);
    assert_eq!(box_json["height"], 40.0);
}
