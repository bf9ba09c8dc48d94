//! CSS Grid layout.
//!
//! [§ 12 Grid Sizing](https://www.w3.org/TR/css-grid-1/#layout-algorithm)
//!
//! Supported: `grid-template-columns`/`-rows` with px, percentage, `fr`,
//! `auto`, `minmax()` and `repeat()` including `auto-fill`/`auto-fit`;
//! gaps; explicit line/span placement; row-major auto-placement.
//!
//! Column sizing is a single distribution pass rather than the full
//! iterative track sizing algorithm: fixed tracks take their size, then
//! flexible tracks (`fr`, `auto`, and `minmax` with a flexible max) share
//! the leftover, each clamped to its minimum and maximum. Rows are sized
//! from content unless the template fixes them.

use std::collections::HashMap;

use marmot_dom::NodeId;

use super::box_model::LayoutBox;
use super::{Containing, LayoutEnv, SizeOverride};
use crate::style::ComputedStyle;
use crate::style::values::{
    GridLine, RepeatCount, Size, TemplateEntry, TrackSize, TrackTemplate,
};

/// One sized track: a fixed size or a flexible share of the leftover,
/// clamped between `min` and `max`.
struct Track {
    size: f64,
    /// `fr` weight; zero for fixed tracks. `auto` weighs 1.
    weight: f64,
    min: f64,
    max: Option<f64>,
}

/// 0-based half-open track ranges for one placed item.
struct GridArea {
    node: NodeId,
    col_start: usize,
    col_end: usize,
    row_start: usize,
    row_end: usize,
}

/// Lay out the children of a grid container.
///
/// `inner` is the container's content box. Returns the content height:
/// the sum of the row tracks plus the gaps between them.
pub(crate) fn layout_grid(
    env: &LayoutEnv<'_>,
    container: NodeId,
    style: &ComputedStyle,
    inner: Containing,
    out: &mut HashMap<NodeId, LayoutBox>,
) -> f64 {
    let column_gap = style.column_gap.resolve_or(Some(inner.width), 0.0);
    let row_gap = style.row_gap.resolve_or(inner.height, 0.0);

    let mut children = env.box_children(container);
    children.sort_by_key(|&child| env.style(child).order);

    if children.is_empty() {
        return 0.0;
    }

    // [§ 7.2 Explicit Track Sizing] expand the template and size the
    // columns against the definite content width.
    let mut columns = expand_template(
        &style.grid_template_columns,
        inner.width,
        column_gap,
        children.len(),
    );
    distribute_leftover(&mut columns, inner.width, column_gap);

    // [§ 8.5 Grid Item Placement Algorithm]
    let areas = place_items(env, &children, columns.len());
    let row_count = areas.iter().map(|a| a.row_end).max().unwrap_or(1);

    #[cfg(feature = "layout-trace")]
    eprintln!(
        "[GRID] container {container:?}: {} items, {} cols {:?}, {row_count} rows",
        areas.len(),
        columns.len(),
        columns.iter().map(|t| t.size).collect::<Vec<_>>(),
    );

    // Lay out each item at its spanned column width; heights feed the row
    // sizing below.
    let mut boxes: Vec<LayoutBox> = Vec::with_capacity(areas.len());
    for area in &areas {
        let cell_width = span_extent(&columns, area.col_start, area.col_end, column_gap);
        let item_box = layout_in_cell(env, area.node, cell_width, inner, out);
        boxes.push(item_box);
    }

    // [§ 7.2 / § 11] rows: a fixed template track is the row's floor;
    // content can only grow a row. Flexible row tracks share a definite
    // container height; with an auto height they size from content alone.
    let mut rows = expand_row_tracks(style, inner, row_gap, row_count);
    for (area, item_box) in areas.iter().zip(&boxes) {
        if area.row_end - area.row_start == 1 {
            let row = &mut rows[area.row_start];
            row.size = row.size.max(item_box.outer_height());
        }
    }
    // Multi-row spans grow the last spanned row when they do not fit.
    for (area, item_box) in areas.iter().zip(&boxes) {
        let span = area.row_end - area.row_start;
        if span > 1 {
            let extent = span_extent(&rows, area.row_start, area.row_end, row_gap);
            let overflow = item_box.outer_height() - extent;
            if overflow > 0.0 {
                rows[area.row_end - 1].size += overflow;
            }
        }
    }

    let col_offsets = track_offsets(&columns, column_gap);
    let row_offsets = track_offsets(&rows, row_gap);

    for (area, mut item_box) in areas.iter().zip(boxes) {
        // [§ 6.6] stretch is the default alignment: an auto-height item
        // fills its row span.
        if env.style(area.node).height.is_auto() {
            let extent = span_extent(&rows, area.row_start, area.row_end, row_gap);
            item_box.height = (extent
                - item_box.margin.vertical()
                - item_box.padding.vertical()
                - item_box.border_width.vertical())
            .max(0.0);
        }
        item_box.x = col_offsets[area.col_start] + item_box.margin.left;
        item_box.y = row_offsets[area.row_start] + item_box.margin.top;
        let _ = out.insert(area.node, item_box);
    }

    #[allow(clippy::cast_precision_loss)]
    let gaps = row_gap * (rows.len() - 1) as f64;
    rows.iter().map(|t| t.size).sum::<f64>() + gaps
}

/// Lay out one grid item inside a cell of the given width.
fn layout_in_cell(
    env: &LayoutEnv<'_>,
    node: NodeId,
    cell_width: f64,
    inner: Containing,
    out: &mut HashMap<NodeId, LayoutBox>,
) -> LayoutBox {
    let style = env.style(node);
    let cb_width = Some(inner.width);
    let extras = style.margin_left.resolve_or(cb_width, 0.0)
        + style.margin_right.resolve_or(cb_width, 0.0)
        + style.padding_left.resolve_or(cb_width, 0.0)
        + style.padding_right.resolve_or(cb_width, 0.0)
        + style.border_left_width
        + style.border_right_width;
    // The item's margin box fills the cell unless it sets its own width.
    let forced = if style.width.is_auto() {
        SizeOverride {
            width: Some((cell_width - extras).max(0.0)),
            height: None,
        }
    } else {
        SizeOverride::default()
    };
    env.layout_element(
        node,
        Containing {
            width: cell_width,
            height: None,
        },
        forced,
        out,
    )
}

/// [§ 7.2.3 Repeating Rows and Columns](https://www.w3.org/TR/css-grid-1/#repeat-notation)
///
/// Expand a track template into concrete tracks. An empty template yields
/// one flexible track filling the axis.
///
/// For `auto-fill`/`auto-fit` the repetition count is "the largest
/// possible positive integer that does not cause the grid to overflow":
/// `floor((available + gap) / (track minimum + gap))`, at least one.
/// `auto-fit` additionally collapses empty tracks, which with row-major
/// auto-placement caps the count at the number of items.
fn expand_template(
    template: &TrackTemplate<Size>,
    available: f64,
    gap: f64,
    item_count: usize,
) -> Vec<Track> {
    let mut tracks = Vec::new();
    for entry in &template.entries {
        match entry {
            TemplateEntry::Single(size) => tracks.push(resolve_track(size, available)),
            TemplateEntry::Repeat(RepeatCount::Count(n), size) => {
                for _ in 0..*n {
                    tracks.push(resolve_track(size, available));
                }
            }
            TemplateEntry::Repeat(count, size) => {
                let min = track_minimum(size, available);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let mut fit = if min + gap > 0.0 {
                    (((available + gap) / (min + gap)).floor() as usize).max(1)
                } else {
                    1
                };
                if *count == RepeatCount::AutoFit {
                    fit = fit.min(item_count.max(1));
                }
                for _ in 0..fit {
                    tracks.push(resolve_track(size, available));
                }
            }
        }
    }
    if tracks.is_empty() {
        tracks.push(Track {
            size: 0.0,
            weight: 1.0,
            min: 0.0,
            max: None,
        });
    }
    tracks
}

/// Map one track sizing function onto the fixed/flexible [`Track`] model.
fn resolve_track(size: &TrackSize<Size>, available: f64) -> Track {
    match size {
        TrackSize::Fixed(s) => {
            let px = s.resolve(Some(available)).unwrap_or(0.0);
            Track {
                size: px,
                weight: 0.0,
                min: px,
                max: Some(px),
            }
        }
        TrackSize::Fr(f) => Track {
            size: 0.0,
            weight: *f,
            min: 0.0,
            max: None,
        },
        TrackSize::Auto => Track {
            size: 0.0,
            weight: 1.0,
            min: 0.0,
            max: None,
        },
        TrackSize::MinMax(_, max) => {
            let floor = track_minimum(size, available);
            match &**max {
                TrackSize::Fr(f) => Track {
                    size: floor,
                    weight: *f,
                    min: floor,
                    max: None,
                },
                TrackSize::Fixed(s) => {
                    let ceil = s.resolve(Some(available)).unwrap_or(0.0).max(floor);
                    Track {
                        size: ceil,
                        weight: 0.0,
                        min: floor,
                        max: Some(ceil),
                    }
                }
                _ => Track {
                    size: floor,
                    weight: 1.0,
                    min: floor,
                    max: None,
                },
            }
        }
    }
}

/// The smallest width a track can take, used for `auto-fill` counting and
/// as a flexible track's floor.
fn track_minimum(size: &TrackSize<Size>, available: f64) -> f64 {
    match size {
        TrackSize::Fixed(s) => s.resolve(Some(available)).unwrap_or(0.0),
        TrackSize::MinMax(min, _) => track_minimum(min, available),
        TrackSize::Fr(_) | TrackSize::Auto => 0.0,
    }
}

/// [§ 12.7 Expand Flexible Tracks](https://www.w3.org/TR/css-grid-1/#algo-flex-tracks)
///
/// Share the leftover space among flexible tracks in proportion to their
/// weights. A track whose proportional share violates its min or max is
/// pinned there and the remainder is redistributed; each pass pins at
/// least one track, so the loop is bounded by the track count.
fn distribute_leftover(tracks: &mut [Track], available: f64, gap: f64) {
    #[allow(clippy::cast_precision_loss)]
    let gaps = gap * (tracks.len() - 1) as f64;
    let fixed: f64 = tracks
        .iter()
        .filter(|t| t.weight == 0.0)
        .map(|t| t.size)
        .sum();
    let mut free = (available - gaps - fixed).max(0.0);
    let mut open: Vec<usize> = (0..tracks.len())
        .filter(|&i| tracks[i].weight > 0.0)
        .collect();

    while !open.is_empty() {
        let weight_sum: f64 = open.iter().map(|&i| tracks[i].weight).sum();
        let mut pinned = Vec::new();
        for &i in &open {
            let share = free * tracks[i].weight / weight_sum;
            let clamped = match tracks[i].max {
                Some(max) => share.min(max),
                None => share,
            }
            .max(tracks[i].min);
            if (clamped - share).abs() > 1e-6 {
                tracks[i].size = clamped;
                pinned.push(i);
            }
        }
        if pinned.is_empty() {
            for &i in &open {
                tracks[i].size = free * tracks[i].weight / weight_sum;
            }
            break;
        }
        for &i in &pinned {
            free = (free - tracks[i].size).max(0.0);
        }
        open.retain(|i| !pinned.contains(i));
    }
}

/// [§ 8.5 Grid Item Placement Algorithm](https://www.w3.org/TR/css-grid-1/#auto-placement-algo)
///
/// Items with a definite row and column position claim their cells first;
/// the rest auto-place row-major into the first free area, with a cursor
/// that only moves forward. The implicit grid grows rows as needed.
fn place_items(env: &LayoutEnv<'_>, children: &[NodeId], col_count: usize) -> Vec<GridArea> {
    let mut occupancy: Vec<Vec<bool>> = vec![vec![false; col_count]];
    let mut areas: Vec<Option<GridArea>> = Vec::with_capacity(children.len());

    // Definite placements first.
    for &node in children {
        let style = env.style(node);
        let col = definite_range(
            style.grid_column_start,
            style.grid_column_end,
            col_count,
        );
        let row = definite_range(style.grid_row_start, style.grid_row_end, usize::MAX);
        if let (Some((cs, ce)), Some((rs, re))) = (col, row) {
            let ce = ce.min(col_count).max(cs + 1);
            ensure_rows(&mut occupancy, re, col_count);
            occupy(&mut occupancy, cs, ce, rs, re);
            areas.push(Some(GridArea {
                node,
                col_start: cs,
                col_end: ce,
                row_start: rs,
                row_end: re,
            }));
        } else {
            areas.push(None);
        }
    }

    // Auto placement, row-major from a forward-only cursor.
    let mut cursor_row = 0;
    let mut cursor_col = 0;
    for (slot, &node) in areas.iter_mut().zip(children) {
        if slot.is_some() {
            continue;
        }
        let style = env.style(node);
        let col_span = span_of(style.grid_column_start, style.grid_column_end).min(col_count);
        let row_span = span_of(style.grid_row_start, style.grid_row_end);

        loop {
            if cursor_col + col_span > col_count {
                cursor_col = 0;
                cursor_row += 1;
            }
            let (cs, ce) = (cursor_col, cursor_col + col_span);
            let (rs, re) = (cursor_row, cursor_row + row_span);
            ensure_rows(&mut occupancy, re, col_count);
            if area_free(&occupancy, cs, ce, rs, re) {
                occupy(&mut occupancy, cs, ce, rs, re);
                *slot = Some(GridArea {
                    node,
                    col_start: cs,
                    col_end: ce,
                    row_start: rs,
                    row_end: re,
                });
                cursor_col = ce;
                break;
            }
            cursor_col += 1;
        }
    }

    areas.into_iter().flatten().collect()
}

/// Resolve a start/end pair to a definite 0-based half-open range, or
/// `None` when the item participates in auto-placement.
///
/// [§ 8.3 Line-based Placement](https://www.w3.org/TR/css-grid-1/#line-placement)
///
/// Positive lines are 1-based; negative lines count from the end of the
/// explicit grid.
fn definite_range(start: GridLine, end: GridLine, track_count: usize) -> Option<(usize, usize)> {
    let start_index = line_index(start, track_count)?;
    let end_index = match end {
        GridLine::Line(_) => line_index(end, track_count)
            .map(|e| e.max(start_index + 1))?,
        GridLine::Span(n) => start_index + n as usize,
        GridLine::Auto => start_index + 1,
    };
    Some((start_index, end_index))
}

fn line_index(line: GridLine, track_count: usize) -> Option<usize> {
    match line {
        GridLine::Line(n) if n > 0 => Some((n - 1).unsigned_abs() as usize),
        GridLine::Line(n) if n < 0 && track_count < usize::MAX => {
            // -1 is the end line of the explicit grid.
            let from_end = i64::try_from(track_count).ok()? + 1 + i64::from(n);
            usize::try_from(from_end.max(0)).ok()
        }
        _ => None,
    }
}

/// The track span an auto-placed item requests (default 1).
fn span_of(start: GridLine, end: GridLine) -> usize {
    match (start, end) {
        (GridLine::Span(n), _) | (_, GridLine::Span(n)) => (n as usize).max(1),
        _ => 1,
    }
}

fn ensure_rows(occupancy: &mut Vec<Vec<bool>>, rows: usize, col_count: usize) {
    while occupancy.len() < rows {
        occupancy.push(vec![false; col_count]);
    }
}

fn area_free(
    occupancy: &[Vec<bool>],
    col_start: usize,
    col_end: usize,
    row_start: usize,
    row_end: usize,
) -> bool {
    occupancy[row_start..row_end]
        .iter()
        .all(|row| row[col_start..col_end].iter().all(|&cell| !cell))
}

fn occupy(
    occupancy: &mut [Vec<bool>],
    col_start: usize,
    col_end: usize,
    row_start: usize,
    row_end: usize,
) {
    for row in &mut occupancy[row_start..row_end] {
        for cell in &mut row[col_start..col_end] {
            *cell = true;
        }
    }
}

/// Expand the row template to cover every placed row; implicit rows are
/// content-sized.
fn expand_row_tracks(
    style: &ComputedStyle,
    inner: Containing,
    row_gap: f64,
    row_count: usize,
) -> Vec<Track> {
    let available = inner.height.unwrap_or(0.0);
    let mut rows = if style.grid_template_rows.is_empty() {
        Vec::new()
    } else {
        expand_template(&style.grid_template_rows, available, row_gap, row_count)
    };
    if let Some(height) = inner.height
        && !rows.is_empty()
    {
        distribute_leftover(&mut rows, height, row_gap);
    } else {
        // No definite height to share: flexible rows start at their floor.
        for row in &mut rows {
            if row.weight > 0.0 {
                row.size = row.min;
            }
        }
    }
    while rows.len() < row_count {
        rows.push(Track {
            size: 0.0,
            weight: 0.0,
            min: 0.0,
            max: None,
        });
    }
    rows
}

/// Prefix-sum positions of each track's leading edge.
fn track_offsets(tracks: &[Track], gap: f64) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(tracks.len());
    let mut position = 0.0;
    for track in tracks {
        offsets.push(position);
        position += track.size + gap;
    }
    offsets
}

/// Total extent of a half-open track span, including internal gaps.
fn span_extent(tracks: &[Track], start: usize, end: usize, gap: f64) -> f64 {
    let end = end.min(tracks.len());
    if start >= end {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let gaps = gap * (end - start - 1) as f64;
    tracks[start..end].iter().map(|t| t.size).sum::<f64>() + gaps
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

    /// A grid container with `n` item divs, classes `i0`, `i1`, ...
    fn grid_tree(n: usize) -> DomTree {
        let mut tree = DomTree::new();
        let container = tree.alloc(element("div", Some("grid")));
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
        let styles = compute_styles(tree, &stylesheet, 1600.0, 900.0);
        layout_tree(tree, &styles, &HeuristicMeasure, 1600.0, 900.0)
    }

    #[test]
    fn auto_fit_counts_and_sizes_tracks() {
        let tree = grid_tree(5);
        let boxes = layout(
            ".grid { display: grid; width: 1320px; margin: 0;
                     grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
                     gap: 24px; }
             .grid div { height: 10px; }",
            &tree,
        );

        // floor((1320 + 24) / (300 + 24)) = 4 columns of 312px
        assert_eq!(boxes[&NodeId(2)].width, 312.0);
        assert_eq!(boxes[&NodeId(2)].x, 0.0);
        assert_eq!(boxes[&NodeId(3)].x, 336.0);
        assert_eq!(boxes[&NodeId(4)].x, 672.0);
        assert_eq!(boxes[&NodeId(5)].x, 1008.0);
        // the fifth item wraps to the second row
        assert_eq!(boxes[&NodeId(6)].x, 0.0);
        assert_eq!(boxes[&NodeId(6)].y, 34.0);
    }

    #[test]
    fn auto_fit_collapses_to_item_count() {
        let tree = grid_tree(2);
        let boxes = layout(
            ".grid { display: grid; width: 1320px; margin: 0;
                     grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
                     gap: 24px; }
             .grid div { height: 10px; }",
            &tree,
        );

        // only two items, so only two tracks: (1320 - 24) / 2
        assert_eq!(boxes[&NodeId(2)].width, 648.0);
        assert_eq!(boxes[&NodeId(3)].x, 672.0);
    }

    #[test]
    fn fixed_and_fr_columns_share_leftover() {
        let tree = grid_tree(3);
        let boxes = layout(
            ".grid { display: grid; width: 700px; margin: 0;
                     grid-template-columns: 100px 1fr 2fr; }
             .grid div { height: 10px; }",
            &tree,
        );

        assert_eq!(boxes[&NodeId(2)].width, 100.0);
        assert_eq!(boxes[&NodeId(3)].width, 200.0);
        assert_eq!(boxes[&NodeId(4)].width, 400.0);
        assert_eq!(boxes[&NodeId(4)].x, 300.0);
    }

    #[test]
    fn auto_placement_wraps_rows() {
        let tree = grid_tree(4);
        let boxes = layout(
            ".grid { display: grid; width: 300px; margin: 0;
                     grid-template-columns: repeat(3, 1fr); }
             .grid div { height: 20px; }",
            &tree,
        );

        assert_eq!(boxes[&NodeId(2)].y, 0.0);
        assert_eq!(boxes[&NodeId(4)].x, 200.0);
        // fourth item starts the second row
        assert_eq!(boxes[&NodeId(5)].x, 0.0);
        assert_eq!(boxes[&NodeId(5)].y, 20.0);
    }

    #[test]
    fn explicit_lines_claim_cells_before_auto_items() {
        let tree = grid_tree(2);
        let boxes = layout(
            ".grid { display: grid; width: 300px; margin: 0;
                     grid-template-columns: repeat(3, 100px); }
             .grid div { height: 10px; }
             .i1 { grid-column-start: 1; grid-column-end: 3;
                   grid-row-start: 1; grid-row-end: 2; }",
            &tree,
        );

        // i1 occupies columns 1-2 of the first row; i0 auto-places into
        // the remaining third column.
        assert_eq!(boxes[&NodeId(3)].x, 0.0);
        assert_eq!(boxes[&NodeId(3)].width, 200.0);
        assert_eq!(boxes[&NodeId(2)].x, 200.0);
        assert_eq!(boxes[&NodeId(2)].y, 0.0);
    }

    #[test]
    fn span_spreads_across_columns_with_gap() {
        let tree = grid_tree(1);
        let boxes = layout(
            ".grid { display: grid; width: 320px; margin: 0;
                     grid-template-columns: repeat(3, 100px); gap: 10px; }
             .i0 { grid-column-start: span 2; height: 10px; }",
            &tree,
        );

        // two 100px tracks plus the 10px gap between them
        assert_eq!(boxes[&NodeId(2)].width, 210.0);
    }

    #[test]
    fn fixed_row_tracks_floor_row_heights() {
        let tree = grid_tree(2);
        let boxes = layout(
            ".grid { display: grid; width: 100px; margin: 0;
                     grid-template-columns: 100px;
                     grid-template-rows: 50px 30px; row-gap: 4px; }
             .i0 { height: 20px; }
             .i1 { height: 20px; }",
            &tree,
        );

        assert_eq!(boxes[&NodeId(2)].y, 0.0);
        assert_eq!(boxes[&NodeId(3)].y, 54.0);
        // auto container height sums the row tracks and the gap
        assert_eq!(boxes[&NodeId(1)].height, 84.0);
    }

    #[test]
    fn content_grows_auto_rows() {
        let tree = grid_tree(2);
        let boxes = layout(
            ".grid { display: grid; width: 200px; margin: 0;
                     grid-template-columns: 100px 100px; }
             .i0 { height: 60px; }
             .i1 { height: 25px; }",
            &tree,
        );

        // both items share one row sized by the tallest
        assert_eq!(boxes[&NodeId(1)].height, 60.0);
        assert_eq!(boxes[&NodeId(3)].x, 100.0);
    }

    #[test]
    fn percent_tracks_resolve_against_container() {
        let tree = grid_tree(2);
        let boxes = layout(
            ".grid { display: grid; width: 400px; margin: 0;
                     grid-template-columns: 25% 75%; }
             .grid div { height: 10px; }",
            &tree,
        );

        assert_eq!(boxes[&NodeId(2)].width, 100.0);
        assert_eq!(boxes[&NodeId(3)].width, 300.0);
        assert_eq!(boxes[&NodeId(3)].x, 100.0);
    }
}
