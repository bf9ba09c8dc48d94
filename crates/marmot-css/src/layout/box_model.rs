//! CSS Box Model types.
//!
//! [CSS Box Model Module Level 3](https://www.w3.org/TR/css-box-3/)

use serde::Serialize;

/// A rectangle positioned in 2D space.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f64,
    /// Vertical position of the top-left corner.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

/// Edge sizes for padding, border, or margin.
///
/// [§ 3 The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f64,
    /// Right edge size.
    pub right: f64,
    /// Bottom edge size.
    pub bottom: f64,
    /// Left edge size.
    pub left: f64,
}

impl EdgeSizes {
    /// Left plus right.
    #[must_use]
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Top plus bottom.
    #[must_use]
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// The final geometry of one element.
///
/// [§ 3. The CSS Box Model](https://www.w3.org/TR/css-box-3/#box-model)
///
/// "Each box has a content area and optional surrounding padding, border,
/// and margin areas."
///
/// `x`/`y` locate the border box's top-left corner relative to the content
/// origin of the containing block. `width`/`height` are the content box
/// dimensions; they are final once computed. An ancestor placing this box
/// only ever translates `x`/`y`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutBox {
    /// Border-box left edge, relative to the containing block's content origin.
    pub x: f64,
    /// Border-box top edge, relative to the containing block's content origin.
    pub y: f64,
    /// Content-box width.
    pub width: f64,
    /// Content-box height.
    pub height: f64,
    /// Margin edge sizes.
    pub margin: EdgeSizes,
    /// Padding edge sizes.
    pub padding: EdgeSizes,
    /// Border edge sizes.
    pub border_width: EdgeSizes,
}

impl LayoutBox {
    /// [§ 3.3 Borders](https://www.w3.org/TR/css-box-3/#borders)
    ///
    /// "The border box contains content, padding, and border areas."
    #[must_use]
    pub fn border_box_width(&self) -> f64 {
        self.width + self.padding.horizontal() + self.border_width.horizontal()
    }

    /// Border-box height (content + padding + border).
    #[must_use]
    pub fn border_box_height(&self) -> f64 {
        self.height + self.padding.vertical() + self.border_width.vertical()
    }

    /// [§ 3.1 Margins](https://www.w3.org/TR/css-box-3/#margins)
    ///
    /// "The margin box is the outermost box, and contains all four areas."
    #[must_use]
    pub fn outer_width(&self) -> f64 {
        self.border_box_width() + self.margin.horizontal()
    }

    /// Margin-box height.
    #[must_use]
    pub fn outer_height(&self) -> f64 {
        self.border_box_height() + self.margin.vertical()
    }

    /// The border box as a positioned rectangle.
    #[must_use]
    pub fn border_box(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: self.border_box_width(),
            height: self.border_box_height(),
        }
    }

    /// The content box as a positioned rectangle.
    #[must_use]
    pub fn content_box(&self) -> Rect {
        Rect {
            x: self.x + self.border_width.left + self.padding.left,
            y: self.y + self.border_width.top + self.padding.top,
            width: self.width,
            height: self.height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_arithmetic() {
        let layout = LayoutBox {
            x: 10.0,
            y: 20.0,
            width: 100.0,
            height: 50.0,
            margin: EdgeSizes {
                top: 1.0,
                right: 2.0,
                bottom: 3.0,
                left: 4.0,
            },
            padding: EdgeSizes {
                top: 5.0,
                right: 6.0,
                bottom: 7.0,
                left: 8.0,
            },
            border_width: EdgeSizes {
                top: 1.0,
                right: 1.0,
                bottom: 1.0,
                left: 1.0,
            },
        };

        assert_eq!(layout.border_box_width(), 100.0 + 6.0 + 8.0 + 2.0);
        assert_eq!(layout.border_box_height(), 50.0 + 5.0 + 7.0 + 2.0);
        assert_eq!(layout.outer_width(), layout.border_box_width() + 6.0);
        assert_eq!(layout.outer_height(), layout.border_box_height() + 4.0);

        let content = layout.content_box();
        assert_eq!(content.x, 10.0 + 1.0 + 8.0);
        assert_eq!(content.y, 20.0 + 1.0 + 5.0);
    }
}
