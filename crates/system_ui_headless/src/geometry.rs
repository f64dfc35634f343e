//! Viewport-space geometry snapshots used by floating placement.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Axis-aligned bounding box in viewport (client) coordinates.
pub struct Rect {
    /// Top edge.
    pub top: f64,
    /// Left edge.
    pub left: f64,
    /// Right edge.
    pub right: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl Rect {
    /// Builds a rect from its top-left corner and size.
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            top: y,
            left: x,
            right: x + width,
            bottom: y + height,
            width,
            height,
        }
    }

    /// Horizontal center of the box.
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Vertical center of the box.
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// Returns `true` when the box has finite edges, non-negative sides, and at least one
    /// non-zero side.
    ///
    /// Detached DOM nodes report an all-zero rect, which is treated as unmeasurable. A zero-width
    /// or zero-height box (a collapsed trigger, a rule) still anchors content.
    pub fn is_measurable(&self) -> bool {
        let finite = [self.top, self.left, self.width, self.height]
            .iter()
            .all(|value| value.is_finite());
        finite && self.width >= 0.0 && self.height >= 0.0 && (self.width > 0.0 || self.height > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Visible viewport extent.
pub struct ViewportSize {
    /// Viewport width in CSS pixels.
    pub width: f64,
    /// Viewport height in CSS pixels.
    pub height: f64,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
/// Top-left coordinate at which a floating element is fixed-positioned.
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Sentinel coordinate that keeps an unmeasured floating element outside the viewport.
    pub const OFFSCREEN: Position = Position {
        x: -9999.0,
        y: -9999.0,
    };

    /// Inline `position: fixed` style for the coordinate, rounded to whole pixels.
    pub fn fixed_style(&self) -> String {
        format!(
            "position:fixed;left:{}px;top:{}px;",
            self.x.round(),
            self.y.round()
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn origin_size_constructor_keeps_edges_consistent() {
        let rect = Rect::from_origin_size(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right, 40.0);
        assert_eq!(rect.bottom, 60.0);
        assert_eq!(rect.center_x(), 25.0);
        assert_eq!(rect.center_y(), 40.0);
    }

    #[test]
    fn detached_zero_rect_is_not_measurable() {
        assert!(!Rect::default().is_measurable());
        assert!(Rect::from_origin_size(0.0, 0.0, 12.0, 0.0).is_measurable());
        assert!(!Rect::from_origin_size(f64::NAN, 0.0, 12.0, 4.0).is_measurable());
    }

    #[test]
    fn fixed_style_rounds_coordinates() {
        let style = Position { x: 12.4, y: 7.6 }.fixed_style();
        assert_eq!(style, "position:fixed;left:12px;top:8px;");
    }
}
