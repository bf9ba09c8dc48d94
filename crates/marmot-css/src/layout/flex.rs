//! CSS Flexbox layout.
//!
//! [§ 9 Flex Layout Algorithm](https://www.w3.org/TR/css-flexbox-1/#layout-algorithm)
//!
//! Supported: both axes with their reverse variants, multi-line wrapping,
//! the full grow/shrink freeze loop with min/max clamping, `order`,
//! main-axis gaps, `justify-content`, `align-items`/`align-self`, and
//! `align-content` for multi-line containers.
//!
//! Item main sizes are border-box sizes; margins ride along as the outer
//! contribution. Within a line, after flexible-length resolution, the used
//! main sizes plus gaps exactly fill the available space whenever the
//! items' minimum sizes permit — otherwise every item sits at its minimum
//! and the container overflows, which is a valid outcome rather than an
//! error.

use std::collections::HashMap;

use marmot_dom::NodeId;

use super::box_model::LayoutBox;
use super::{Containing, LayoutEnv, SizeOverride};
use crate::style::ComputedStyle;
use crate::style::values::{AlignContent, AlignItems, JustifyContent};

/// Per-item data collected during flex layout.
///
/// [§ 9.2 Line Length Determination](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
struct FlexItem {
    node: NodeId,
    /// Flex base size, border-box, before clamping.
    base_size: f64,
    /// [§ 9.2 step 3E] "The hypothetical main size is the item's flex base
    /// size clamped according to its used min and max main sizes."
    hypothetical: f64,
    min_main: f64,
    max_main: Option<f64>,
    grow: f64,
    shrink: f64,
    /// Resolved target main size (border-box) after § 9.7.
    target: f64,
    frozen: bool,
    /// Main-axis margins.
    margin_main: f64,
    /// Main-axis padding plus border, already inside the border-box size.
    edges_main: f64,
    /// Effective cross-axis alignment (align-self resolved against the
    /// container's align-items).
    align: AlignItems,
}

impl FlexItem {
    /// Margin-box main extent.
    fn outer(&self) -> f64 {
        self.target + self.margin_main
    }
}

/// Lay out the children of a flex container.
///
/// `inner` is the container's content box: width definite, height definite
/// only when the container has an explicit height. Returns the content
/// height used.
pub(crate) fn layout_flex(
    env: &LayoutEnv<'_>,
    container: NodeId,
    style: &ComputedStyle,
    inner: Containing,
    out: &mut HashMap<NodeId, LayoutBox>,
) -> f64 {
    let direction = style.flex_direction;
    let row = direction.is_row();

    // Available space on each axis. A column container with auto height
    // has an indefinite main axis: nothing can grow or shrink there.
    let avail_main = if row { Some(inner.width) } else { inner.height };
    let avail_cross = if row { inner.height } else { Some(inner.width) };

    // [CSS Align § 8.1] gutters: column-gap separates items along a row's
    // main axis, row-gap separates lines (and vice versa for columns).
    let (main_gap, cross_gap) = if row {
        (
            style.column_gap.resolve_or(Some(inner.width), 0.0),
            style.row_gap.resolve_or(inner.height, 0.0),
        )
    } else {
        (
            style.row_gap.resolve_or(inner.height, 0.0),
            style.column_gap.resolve_or(Some(inner.width), 0.0),
        )
    };

    // [§ 5.4 order] "Items with the same ordinal group are laid out in the
    // order they appear in the source document." — stable sort.
    let mut children = env.box_children(container);
    children.sort_by_key(|&child| env.style(child).order);

    let mut items: Vec<FlexItem> = children
        .iter()
        .map(|&child| build_item(env, child, style, inner, row))
        .collect();

    if items.is_empty() {
        return 0.0;
    }

    #[cfg(feature = "layout-trace")]
    eprintln!(
        "[FLEX] container {container:?}: {} items, direction={}, main avail={avail_main:?}",
        items.len(),
        style.flex_direction,
    );

    // [§ 9.3 step 5 Main Sizing: Collect flex items into flex lines]
    let lines = collect_lines(&items, style, avail_main, main_gap);

    // [§ 9.7 Resolving Flexible Lengths] per line.
    for line in &lines {
        resolve_flexible_lengths(&mut items[line.clone()], avail_main, main_gap);
        #[cfg(feature = "layout-trace")]
        eprintln!(
            "[FLEX] line {line:?}: targets={:?}",
            items[line.clone()].iter().map(|i| i.target).collect::<Vec<_>>(),
        );
    }

    // Lay each item out once at its resolved main size, collecting natural
    // cross sizes.
    let mut boxes: Vec<LayoutBox> = Vec::with_capacity(items.len());
    for item in &items {
        let content_main = (item.target - item.edges_main).max(0.0);
        let forced = if row {
            SizeOverride {
                width: Some(content_main),
                height: None,
            }
        } else {
            SizeOverride {
                width: None,
                height: Some(content_main),
            }
        };
        boxes.push(env.layout_element(item.node, inner, forced, out));
    }

    // [§ 9.4 Cross Size Determination] line cross size = largest item.
    let mut line_cross: Vec<f64> = lines
        .iter()
        .map(|line| {
            boxes[line.clone()]
                .iter()
                .map(|b| if row { b.outer_height() } else { b.outer_width() })
                .fold(0.0_f64, f64::max)
        })
        .collect();

    // [§ 9.6 step 15 / § 8.4 align-content] distribute free cross space
    // over the lines.
    #[allow(clippy::cast_precision_loss)]
    let gaps_cross = cross_gap * (lines.len() - 1) as f64;
    let total_cross: f64 = line_cross.iter().sum::<f64>() + gaps_cross;
    let free_cross = avail_cross.map_or(0.0, |avail| (avail - total_cross).max(0.0));
    let (mut line_offset, line_between) =
        align_content_offsets(style.align_content, free_cross, lines.len(), &mut line_cross);

    for (line, cross_size) in lines.iter().zip(&line_cross) {
        let count = line.len();

        // [§ 9.5 Main-Axis Alignment: justify-content]
        #[allow(clippy::cast_precision_loss)]
        let line_used: f64 = items[line.clone()].iter().map(FlexItem::outer).sum::<f64>()
            + main_gap * (count - 1) as f64;
        let free_main = avail_main.map_or(0.0, |avail| (avail - line_used).max(0.0));
        let (lead, between) = justify_offsets(style.justify_content, free_main, count);

        // [§ 5.1] the *-reverse directions flip visual order only.
        let order: Vec<usize> = if direction.is_reverse() {
            line.clone().rev().collect()
        } else {
            line.clone().collect()
        };

        let mut cursor = lead;
        for index in order {
            let item = &items[index];
            let item_box = &mut boxes[index];

            // [§ 9.6 Cross-Axis Alignment: align-items / align-self]
            let outer_cross = if row {
                item_box.outer_height()
            } else {
                item_box.outer_width()
            };
            let cross_pos = match item.align {
                AlignItems::Stretch => {
                    stretch_item(env, item, item_box, row, *cross_size);
                    line_offset
                }
                AlignItems::FlexStart => line_offset,
                AlignItems::Center => line_offset + (cross_size - outer_cross) / 2.0,
                AlignItems::FlexEnd => line_offset + cross_size - outer_cross,
            };

            if row {
                item_box.x = cursor + item_box.margin.left;
                item_box.y = cross_pos + item_box.margin.top;
            } else {
                item_box.x = cross_pos + item_box.margin.left;
                item_box.y = cursor + item_box.margin.top;
            }
            cursor += item.outer() + main_gap + between;
        }

        line_offset += cross_size + cross_gap + line_between;
    }

    for (item, item_box) in items.iter().zip(boxes) {
        let _ = out.insert(item.node, item_box);
    }

    // [§ 9.9 step 16] auto container main/cross sizes come from content.
    if row {
        line_cross.iter().sum::<f64>() + gaps_cross
    } else {
        // For columns the block axis is the main axis: the tallest line
        // determines the content height.
        lines
            .iter()
            .map(|line| {
                #[allow(clippy::cast_precision_loss)]
                let gaps = main_gap * (line.len() - 1) as f64;
                items[line.clone()].iter().map(FlexItem::outer).sum::<f64>() + gaps
            })
            .fold(0.0_f64, f64::max)
    }
}

/// [§ 9.2 step 3](https://www.w3.org/TR/css-flexbox-1/#algo-main-item)
///
/// "Determine the flex base size and hypothetical main size of each item."
fn build_item(
    env: &LayoutEnv<'_>,
    node: NodeId,
    container_style: &ComputedStyle,
    inner: Containing,
    row: bool,
) -> FlexItem {
    let style = env.style(node);
    let cb_width = Some(inner.width);
    let main_base = if row { cb_width } else { inner.height };

    // Margin/padding percentages resolve against the containing block
    // width regardless of axis.
    let margin = [
        style.margin_top.resolve_or(cb_width, 0.0),
        style.margin_right.resolve_or(cb_width, 0.0),
        style.margin_bottom.resolve_or(cb_width, 0.0),
        style.margin_left.resolve_or(cb_width, 0.0),
    ];
    let padding = [
        style.padding_top.resolve_or(cb_width, 0.0),
        style.padding_right.resolve_or(cb_width, 0.0),
        style.padding_bottom.resolve_or(cb_width, 0.0),
        style.padding_left.resolve_or(cb_width, 0.0),
    ];
    let border = [
        style.border_top_width,
        style.border_right_width,
        style.border_bottom_width,
        style.border_left_width,
    ];
    let (margin_main, edges_main) = if row {
        (
            margin[1] + margin[3],
            padding[1] + padding[3] + border[1] + border[3],
        )
    } else {
        (
            margin[0] + margin[2],
            padding[0] + padding[2] + border[0] + border[2],
        )
    };

    // A. flex-basis if definite. B. the main-axis size property.
    // C. content size estimate.
    let content_basis = style
        .flex_basis
        .resolve(main_base)
        .or_else(|| {
            if row {
                style.width.resolve(cb_width)
            } else {
                style.height.resolve(inner.height)
            }
        });
    let base_size = match content_basis {
        Some(content) => content + edges_main,
        None if row => env.intrinsic_width(node),
        None => {
            // Column with no definite height: measure by trial layout at
            // the available cross size.
            let mut scratch = HashMap::new();
            env.layout_element(node, inner, SizeOverride::default(), &mut scratch)
                .border_box_height()
        }
    };

    let (min_main, max_main) = if row {
        (
            style.min_width.resolve_or(cb_width, 0.0) + edges_main,
            style.max_width.resolve(cb_width).map(|m| m + edges_main),
        )
    } else {
        (
            style.min_height.resolve_or(inner.height, 0.0) + edges_main,
            style.max_height.resolve(inner.height).map(|m| m + edges_main),
        )
    };

    let hypothetical = clamp_main(base_size, min_main, max_main);

    FlexItem {
        node,
        base_size,
        hypothetical,
        min_main,
        max_main,
        grow: style.flex_grow,
        shrink: style.flex_shrink,
        target: hypothetical,
        frozen: false,
        margin_main,
        edges_main,
        align: style.align_self.resolve(container_style.align_items),
    }
}

fn clamp_main(size: f64, min: f64, max: Option<f64>) -> f64 {
    let size = match max {
        Some(max) => size.min(max),
        None => size,
    };
    size.max(min)
}

/// [§ 9.3 step 5](https://www.w3.org/TR/css-flexbox-1/#algo-line-break)
///
/// "Collect flex items into flex lines... a single line if the flex
/// container is single-line. Otherwise, starting from the first uncollected
/// item, collect consecutive items one by one until the first time that the
/// next collected item would not fit into the flex container's inner main
/// size."
///
/// One greedy O(n) pass; an item wider than the line still occupies a line
/// of its own.
fn collect_lines(
    items: &[FlexItem],
    style: &ComputedStyle,
    avail_main: Option<f64>,
    main_gap: f64,
) -> Vec<std::ops::Range<usize>> {
    let Some(avail) = avail_main else {
        return vec![0..items.len()];
    };
    if !style.flex_wrap.is_wrapping() {
        return vec![0..items.len()];
    }

    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0.0;
    for (i, item) in items.iter().enumerate() {
        let outer = item.hypothetical + item.margin_main;
        let needed = if i == start { outer } else { used + main_gap + outer };
        if i > start && needed > avail {
            lines.push(start..i);
            start = i;
            used = outer;
        } else {
            used = needed;
        }
    }
    lines.push(start..items.len());
    lines
}

/// [§ 9.7 Resolving Flexible Lengths](https://www.w3.org/TR/css-flexbox-1/#resolve-flexible-lengths)
///
/// The iterative freeze loop. On exit every item's target main size is
/// final, clamped to its min/max constraints, and — when the constraints
/// allow — the line exactly fills the available main space.
fn resolve_flexible_lengths(items: &mut [FlexItem], avail_main: Option<f64>, main_gap: f64) {
    if items.is_empty() {
        return;
    }
    let Some(avail) = avail_main else {
        // Indefinite main axis: hypothetical sizes are used sizes.
        for item in &mut *items {
            item.target = item.hypothetical;
        }
        return;
    };

    #[allow(clippy::cast_precision_loss)]
    let gaps = main_gap * (items.len() - 1) as f64;
    let avail = avail - gaps;

    // "Determine the used flex factor."
    let sum_hypothetical: f64 = items.iter().map(|i| i.hypothetical + i.margin_main).sum();
    let growing = sum_hypothetical < avail;

    // "Size inflexible items": freeze anything that cannot flex.
    for item in &mut *items {
        let factor = if growing { item.grow } else { item.shrink };
        let inflexible = factor == 0.0
            || (growing && item.base_size > item.hypothetical)
            || (!growing && item.base_size < item.hypothetical);
        item.frozen = inflexible;
        item.target = if inflexible {
            item.hypothetical
        } else {
            item.base_size
        };
    }

    // "Calculate initial free space. Sum the outer sizes of all items on
    // the line ... use the flex base size" for unfrozen items.
    let free_space = |items: &[FlexItem]| {
        avail
            - items
                .iter()
                .map(|i| {
                    let main = if i.frozen { i.target } else { i.base_size };
                    main + i.margin_main
                })
                .sum::<f64>()
    };
    let initial_free = free_space(items);

    // "Loop ... until there are no unfrozen items."
    while items.iter().any(|i| !i.frozen) {
        let remaining_free = free_space(items);

        // "If the sum of the unfrozen flex factors is less than one,
        // multiply the initial free space by this sum" (capped at the
        // remaining free space).
        let factor_sum: f64 = items
            .iter()
            .filter(|i| !i.frozen)
            .map(|i| if growing { i.grow } else { i.shrink })
            .sum();
        let free = if factor_sum > 0.0 && factor_sum < 1.0 {
            let scaled = initial_free * factor_sum;
            if scaled.abs() < remaining_free.abs() {
                scaled
            } else {
                remaining_free
            }
        } else {
            remaining_free
        };

        // "Distribute free space proportional to the flex factors."
        if growing {
            let grow_sum: f64 = items.iter().filter(|i| !i.frozen).map(|i| i.grow).sum();
            if grow_sum > 0.0 {
                for item in items.iter_mut().filter(|i| !i.frozen) {
                    item.target = item.base_size + free * (item.grow / grow_sum);
                }
            }
        } else {
            let scaled_sum: f64 = items
                .iter()
                .filter(|i| !i.frozen)
                .map(|i| i.shrink * i.base_size)
                .sum();
            if scaled_sum > 0.0 {
                for item in items.iter_mut().filter(|i| !i.frozen) {
                    let ratio = item.shrink * item.base_size / scaled_sum;
                    item.target = free.abs().mul_add(-ratio, item.base_size);
                }
            }
        }

        // "Fix min/max violations" and freeze accordingly.
        let mut total_violation = 0.0;
        for item in items.iter_mut().filter(|i| !i.frozen) {
            let clamped = clamp_main(item.target, item.min_main, item.max_main);
            total_violation += clamped - item.target;
            item.target = clamped;
        }

        if total_violation.abs() < 1e-6 {
            for item in &mut *items {
                item.frozen = true;
            }
        } else if total_violation > 0.0 {
            // min violations: freeze items sitting at their minimum
            for item in items.iter_mut().filter(|i| !i.frozen) {
                if item.target <= item.min_main + 1e-6 {
                    item.frozen = true;
                }
            }
        } else {
            // max violations: freeze items sitting at their maximum
            for item in items.iter_mut().filter(|i| !i.frozen) {
                if item.max_main.is_some_and(|max| item.target >= max - 1e-6) {
                    item.frozen = true;
                }
            }
        }
    }
}

/// [§ 8.2 justify-content](https://www.w3.org/TR/css-flexbox-1/#justify-content-property)
///
/// Returns `(leading_offset, extra_space_between_items)`. Negative free
/// space packs from the start — overflow spills toward main-end, keeping
/// every coordinate non-negative.
#[allow(clippy::cast_precision_loss)]
fn justify_offsets(keyword: JustifyContent, free: f64, count: usize) -> (f64, f64) {
    if count == 0 || free <= 0.0 {
        return (0.0, 0.0);
    }
    match keyword {
        JustifyContent::FlexStart => (0.0, 0.0),
        JustifyContent::FlexEnd => (free, 0.0),
        JustifyContent::Center => (free / 2.0, 0.0),
        // "If ... there is only a single flex item ... identical to
        // flex-start."
        JustifyContent::SpaceBetween => {
            if count <= 1 {
                (0.0, 0.0)
            } else {
                (0.0, free / (count - 1) as f64)
            }
        }
        JustifyContent::SpaceAround => {
            let gap = free / count as f64;
            (gap / 2.0, gap)
        }
        JustifyContent::SpaceEvenly => {
            let gap = free / (count + 1) as f64;
            (gap, gap)
        }
    }
}

/// [§ 8.4 align-content](https://www.w3.org/TR/css-flexbox-1/#align-content-property)
///
/// Same distribution math as justify, applied to lines. `stretch` grows
/// every line instead of moving them; the mutation happens here so the
/// caller positions against the final line sizes.
#[allow(clippy::cast_precision_loss)]
fn align_content_offsets(
    keyword: AlignContent,
    free: f64,
    count: usize,
    line_cross: &mut [f64],
) -> (f64, f64) {
    if count == 0 || free <= 0.0 {
        return (0.0, 0.0);
    }
    match keyword {
        AlignContent::Stretch => {
            let extra = free / count as f64;
            for size in &mut *line_cross {
                *size += extra;
            }
            (0.0, 0.0)
        }
        AlignContent::FlexStart => (0.0, 0.0),
        AlignContent::FlexEnd => (free, 0.0),
        AlignContent::Center => (free / 2.0, 0.0),
        AlignContent::SpaceBetween => {
            if count <= 1 {
                (0.0, 0.0)
            } else {
                (0.0, free / (count - 1) as f64)
            }
        }
        AlignContent::SpaceAround => {
            let gap = free / count as f64;
            (gap / 2.0, gap)
        }
        AlignContent::SpaceEvenly => {
            let gap = free / (count + 1) as f64;
            (gap, gap)
        }
    }
}

/// [§ 9.6 step 11](https://www.w3.org/TR/css-flexbox-1/#algo-stretch)
///
/// "If a flex item has align-self: stretch, its computed cross size
/// property is auto, and neither of its cross-axis margins are auto, the
/// used outer cross size is the used cross size of its flex line."
fn stretch_item(
    env: &LayoutEnv<'_>,
    item: &FlexItem,
    item_box: &mut LayoutBox,
    row: bool,
    line_cross: f64,
) {
    let style = env.style(item.node);
    if row {
        if style.height.is_auto() {
            item_box.height = (line_cross
                - item_box.margin.vertical()
                - item_box.padding.vertical()
                - item_box.border_width.vertical())
            .max(0.0);
        }
    } else if style.width.is_auto() {
        item_box.width = (line_cross
            - item_box.margin.horizontal()
            - item_box.padding.horizontal()
            - item_box.border_width.horizontal())
        .max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::compute_styles;
    use crate::layout::{HeuristicMeasure, layout_tree};
    use crate::parser::CssParser;
    use crate::tokenizer::CssTokenizer;
    use marmot_dom::{AttributesMap, DomTree, ElementData, NodeType};

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

    /// A flex container with `n` item divs, classes `i0`, `i1`, ...
    fn flex_tree(n: usize) -> DomTree {
        let mut tree = DomTree::new();
        let container = tree.alloc(element("div", Some("flex")));
        tree.append_child(NodeId::ROOT, container);
        for i in 0..n {
            let item = tree.alloc(element("div", Some(&format!("i{i}"))));
            tree.append_child(container, item);
        }
        tree
    }

    fn layout(css: &str, tree: &DomTree) -> HashMap<NodeId, LayoutBox> {
        let mut tokenizer = CssTokenizer::new(css);
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        let stylesheet = parser.parse_stylesheet();
        let styles = compute_styles(tree, &stylesheet, 800.0, 600.0);
        layout_tree(tree, &styles, &HeuristicMeasure, 800.0, 600.0)
    }

    #[test]
    fn space_between_positions_items() {
        let tree = flex_tree(3);
        let boxes = layout(
            ".flex { display: flex; width: 600px; justify-content: space-between; margin: 0; }
             .flex div { width: 100px; height: 10px; }",
            &tree,
        );

        assert_eq!(boxes[&NodeId(2)].x, 0.0);
        assert_eq!(boxes[&NodeId(3)].x, 250.0);
        assert_eq!(boxes[&NodeId(4)].x, 500.0);
    }

    #[test]
    fn space_evenly_and_around() {
        let tree = flex_tree(2);
        let evenly = layout(
            ".flex { display: flex; width: 300px; justify-content: space-evenly; margin: 0; }
             .flex div { width: 60px; height: 10px; }",
            &tree,
        );
        // free = 180, thirds of 60
        assert_eq!(evenly[&NodeId(2)].x, 60.0);
        assert_eq!(evenly[&NodeId(3)].x, 180.0);

        let around = layout(
            ".flex { display: flex; width: 300px; justify-content: space-around; margin: 0; }
             .flex div { width: 60px; height: 10px; }",
            &tree,
        );
        // gap = 90, half-gaps at the ends
        assert_eq!(around[&NodeId(2)].x, 45.0);
        assert_eq!(around[&NodeId(3)].x, 195.0);
    }

    #[test]
    fn grow_distributes_free_space_proportionally() {
        let tree = flex_tree(2);
        let boxes = layout(
            ".flex { display: flex; width: 600px; margin: 0; }
             .i0 { flex: 1; height: 10px; }
             .i1 { flex: 2; height: 10px; }",
            &tree,
        );

        assert_eq!(boxes[&NodeId(2)].width, 200.0);
        assert_eq!(boxes[&NodeId(3)].width, 400.0);
        assert_eq!(boxes[&NodeId(3)].x, 200.0);
    }

    #[test]
    fn grow_respects_max_width() {
        let tree = flex_tree(2);
        let boxes = layout(
            ".flex { display: flex; width: 600px; margin: 0; }
             .i0 { flex: 1; max-width: 100px; height: 10px; }
             .i1 { flex: 1; height: 10px; }",
            &tree,
        );

        // i0 froze at its max; i1 takes the rest.
        assert_eq!(boxes[&NodeId(2)].width, 100.0);
        assert_eq!(boxes[&NodeId(3)].width, 500.0);
    }

    #[test]
    fn shrink_clamps_at_min_width_and_overflows() {
        let tree = flex_tree(2);
        let boxes = layout(
            ".flex { display: flex; width: 300px; margin: 0; }
             .flex div { width: 250px; min-width: 200px; height: 10px; }",
            &tree,
        );

        // 500px of minimum cannot fit in 300px: both clamp, container
        // overflows.
        assert_eq!(boxes[&NodeId(2)].width, 200.0);
        assert_eq!(boxes[&NodeId(3)].width, 200.0);
        assert_eq!(boxes[&NodeId(3)].x, 200.0);
    }

    #[test]
    fn main_size_conservation_with_gaps() {
        let tree = flex_tree(3);
        let boxes = layout(
            ".flex { display: flex; width: 640px; gap: 20px; margin: 0; }
             .flex div { flex: 1; height: 10px; }",
            &tree,
        );

        // 640 - 2*20 = 600 shared three ways
        assert_eq!(boxes[&NodeId(2)].width, 200.0);
        assert_eq!(boxes[&NodeId(3)].x, 220.0);
        assert_eq!(boxes[&NodeId(4)].x, 440.0);
        let main_sum: f64 = (2..=4).map(|i| boxes[&NodeId(i)].width).sum::<f64>() + 40.0;
        assert_eq!(main_sum, 640.0);
    }

    #[test]
    fn wrap_collects_lines_greedily() {
        let tree = flex_tree(3);
        let boxes = layout(
            ".flex { display: flex; flex-wrap: wrap; width: 300px; margin: 0; }
             .flex div { width: 150px; height: 40px; flex-shrink: 0; }",
            &tree,
        );

        // two fit on the first line, the third wraps
        assert_eq!(boxes[&NodeId(2)].y, 0.0);
        assert_eq!(boxes[&NodeId(3)].y, 0.0);
        assert_eq!(boxes[&NodeId(3)].x, 150.0);
        assert_eq!(boxes[&NodeId(4)].y, 40.0);
        assert_eq!(boxes[&NodeId(4)].x, 0.0);
        // auto container height spans both lines
        assert_eq!(boxes[&NodeId(1)].height, 80.0);
    }

    #[test]
    fn column_direction_stacks_on_main_axis() {
        let tree = flex_tree(3);
        let boxes = layout(
            ".flex { display: flex; flex-direction: column; height: 300px; width: 100px; margin: 0; }
             .flex div { flex: 1; }",
            &tree,
        );

        assert_eq!(boxes[&NodeId(2)].height, 100.0);
        assert_eq!(boxes[&NodeId(3)].y, 100.0);
        assert_eq!(boxes[&NodeId(4)].y, 200.0);
        // stretch is the default cross alignment
        assert_eq!(boxes[&NodeId(2)].width, 100.0);
    }

    #[test]
    fn row_reverse_flips_visual_order() {
        let tree = flex_tree(2);
        let boxes = layout(
            ".flex { display: flex; flex-direction: row-reverse; width: 300px; margin: 0; }
             .flex div { width: 100px; height: 10px; flex-shrink: 0; }",
            &tree,
        );

        // first source item is placed last visually
        assert_eq!(boxes[&NodeId(3)].x, 0.0);
        assert_eq!(boxes[&NodeId(2)].x, 100.0);
    }

    #[test]
    fn align_items_and_self() {
        let tree = flex_tree(2);
        let boxes = layout(
            ".flex { display: flex; width: 400px; height: 100px; align-items: center; margin: 0; }
             .i0 { width: 50px; height: 40px; }
             .i1 { width: 50px; height: 40px; align-self: flex-end; }",
            &tree,
        );

        assert_eq!(boxes[&NodeId(2)].y, 30.0);
        assert_eq!(boxes[&NodeId(3)].y, 60.0);
    }

    #[test]
    fn order_rearranges_items() {
        let tree = flex_tree(2);
        let boxes = layout(
            ".flex { display: flex; width: 400px; margin: 0; }
             .flex div { width: 100px; height: 10px; }
             .i0 { order: 1; }",
            &tree,
        );

        // i1 (order 0) now precedes i0 (order 1)
        assert_eq!(boxes[&NodeId(3)].x, 0.0);
        assert_eq!(boxes[&NodeId(2)].x, 100.0);
    }

    #[test]
    fn align_content_spreads_wrapped_lines() {
        let tree = flex_tree(2);
        let boxes = layout(
            ".flex { display: flex; flex-wrap: wrap; width: 100px; height: 120px;
                     align-content: space-between; margin: 0; }
             .flex div { width: 100px; height: 40px; flex-shrink: 0; }",
            &tree,
        );

        assert_eq!(boxes[&NodeId(2)].y, 0.0);
        assert_eq!(boxes[&NodeId(3)].y, 80.0);
    }
}
