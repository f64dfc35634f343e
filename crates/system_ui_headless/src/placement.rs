//! Floating element placement: side/align anchoring followed by viewport clamping.
//!
//! The resolver is intentionally simple. Content that does not fit is pinned at the collision
//! padding and may overlap its trigger; there is no flip to the opposite side.

use serde::{Deserialize, Serialize};

use crate::geometry::{Position, Rect, ViewportSize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Trigger edge a floating element is anchored to.
pub enum Side {
    /// Above the trigger.
    Top,
    /// Right of the trigger.
    Right,
    /// Below the trigger.
    Bottom,
    /// Left of the trigger.
    Left,
}

impl Default for Side {
    fn default() -> Self {
        Self::Bottom
    }
}

impl Side {
    /// Stable `data-side` token.
    pub fn token(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Reduced-axis side used by select dropdowns.
pub enum SelectSide {
    /// Above the trigger.
    Top,
    /// Below the trigger.
    Bottom,
}

impl Default for SelectSide {
    fn default() -> Self {
        Self::Bottom
    }
}

impl From<SelectSide> for Side {
    fn from(side: SelectSide) -> Self {
        match side {
            SelectSide::Top => Side::Top,
            SelectSide::Bottom => Side::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Cross-axis alignment relative to the trigger.
pub enum Align {
    /// Leading edges aligned.
    Start,
    /// Centered over the trigger span.
    Center,
    /// Trailing edges aligned.
    End,
}

impl Default for Align {
    fn default() -> Self {
        Self::Center
    }
}

impl Align {
    /// Stable `data-align` token.
    pub fn token(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Center => "center",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
/// Placement request for one floating element.
pub struct FloatingOptions {
    /// Anchored trigger edge.
    pub side: Side,
    /// Cross-axis alignment.
    pub align: Align,
    /// Main-axis gap between trigger and content. Negative values overlap.
    pub side_offset: f64,
    /// Cross-axis shift applied after alignment.
    pub align_offset: f64,
    /// Minimum distance kept from every viewport edge.
    pub collision_padding: f64,
}

impl Default for FloatingOptions {
    fn default() -> Self {
        Self {
            side: Side::Bottom,
            align: Align::Center,
            side_offset: 4.0,
            align_offset: 0.0,
            collision_padding: 8.0,
        }
    }
}

/// Places `content` next to `trigger` without any viewport adjustment.
pub fn unclamped_position(trigger: &Rect, content: &Rect, options: &FloatingOptions) -> Position {
    let cross = |leading: f64, span: f64, size: f64| -> f64 {
        let aligned = match options.align {
            Align::Start => leading,
            Align::Center => leading + (span - size) / 2.0,
            Align::End => leading + span - size,
        };
        aligned + options.align_offset
    };

    match options.side {
        Side::Bottom => Position {
            x: cross(trigger.left, trigger.width, content.width),
            y: trigger.bottom + options.side_offset,
        },
        Side::Top => Position {
            x: cross(trigger.left, trigger.width, content.width),
            y: trigger.top - content.height - options.side_offset,
        },
        Side::Right => Position {
            x: trigger.right + options.side_offset,
            y: cross(trigger.top, trigger.height, content.height),
        },
        Side::Left => Position {
            x: trigger.left - content.width - options.side_offset,
            y: cross(trigger.top, trigger.height, content.height),
        },
    }
}

/// Clamps one coordinate into `[padding, max(padding, extent - size - padding)]`.
pub fn clamp_axis(value: f64, size: f64, extent: f64, padding: f64) -> f64 {
    let upper = (extent - size - padding).max(padding);
    value.min(upper).max(padding)
}

/// Resolves the fixed-position coordinate for a floating element.
///
/// The result always keeps `collision_padding` from the viewport edges unless the content is
/// larger than the viewport, in which case it is pinned to the padding.
pub fn resolve_position(
    trigger: &Rect,
    content: &Rect,
    viewport: ViewportSize,
    options: &FloatingOptions,
) -> Position {
    let padding = options.collision_padding.max(0.0);
    let raw = unclamped_position(trigger, content, options);
    Position {
        x: clamp_axis(raw.x, content.width, viewport.width, padding),
        y: clamp_axis(raw.y, content.height, viewport.height, padding),
    }
}

/// Resolves a select dropdown: start-aligned with the trigger on the top or bottom edge.
pub fn resolve_select_position(
    trigger: &Rect,
    content: &Rect,
    viewport: ViewportSize,
    side: SelectSide,
    side_offset: f64,
    collision_padding: f64,
) -> Position {
    let options = FloatingOptions {
        side: side.into(),
        align: Align::Start,
        side_offset,
        align_offset: 0.0,
        collision_padding,
    };
    resolve_position(trigger, content, viewport, &options)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn trigger() -> Rect {
        Rect::from_origin_size(200.0, 100.0, 80.0, 20.0)
    }

    fn viewport() -> ViewportSize {
        ViewportSize {
            width: 1000.0,
            height: 800.0,
        }
    }

    fn options(side: Side, align: Align) -> FloatingOptions {
        FloatingOptions {
            side,
            align,
            side_offset: 8.0,
            align_offset: 0.0,
            collision_padding: 8.0,
        }
    }

    #[test]
    fn bottom_side_places_content_below_trigger_with_offset() {
        let content = Rect::from_origin_size(0.0, 0.0, 120.0, 50.0);
        let raw = unclamped_position(&trigger(), &content, &options(Side::Bottom, Align::Start));
        assert_eq!(raw.y, 128.0);
        assert_eq!(raw.x, 200.0);
    }

    #[test]
    fn top_side_places_content_above_trigger_with_offset() {
        let content = Rect::from_origin_size(0.0, 0.0, 120.0, 50.0);
        let raw = unclamped_position(&trigger(), &content, &options(Side::Top, Align::Start));
        assert_eq!(raw.y, 100.0 - 50.0 - 8.0);
    }

    #[test]
    fn left_and_right_sides_use_horizontal_main_axis() {
        let content = Rect::from_origin_size(0.0, 0.0, 60.0, 40.0);
        let right = unclamped_position(&trigger(), &content, &options(Side::Right, Align::Center));
        assert_eq!(right, Position { x: 288.0, y: 90.0 });

        let left = unclamped_position(&trigger(), &content, &options(Side::Left, Align::End));
        assert_eq!(left, Position { x: 132.0, y: 80.0 });
    }

    #[test]
    fn center_alignment_centers_over_trigger_span() {
        let content = Rect::from_origin_size(0.0, 0.0, 120.0, 50.0);
        let raw = unclamped_position(&trigger(), &content, &options(Side::Bottom, Align::Center));
        let content_center = raw.x + content.width / 2.0;
        assert!((content_center - trigger().center_x()).abs() < 0.5);
    }

    #[test]
    fn end_alignment_matches_trailing_edges_and_applies_align_offset() {
        let content = Rect::from_origin_size(0.0, 0.0, 120.0, 50.0);
        let mut opts = options(Side::Bottom, Align::End);
        opts.align_offset = -6.0;
        let raw = unclamped_position(&trigger(), &content, &opts);
        assert_eq!(raw.x + content.width, trigger().right - 6.0);
    }

    #[test]
    fn clamps_into_viewport_with_padding() {
        let near_edge = Rect::from_origin_size(960.0, 780.0, 30.0, 10.0);
        let content = Rect::from_origin_size(0.0, 0.0, 200.0, 100.0);
        let options = options(Side::Bottom, Align::Start);
        let pos = resolve_position(&near_edge, &content, viewport(), &options);
        assert_eq!(pos, Position { x: 792.0, y: 692.0 });
    }

    #[test]
    fn oversized_content_is_pinned_to_padding() {
        let content = Rect::from_origin_size(0.0, 0.0, 990.0, 900.0);
        let options = options(Side::Top, Align::Center);
        let pos = resolve_position(&trigger(), &content, viewport(), &options);
        assert_eq!(pos, Position { x: 8.0, y: 8.0 });
    }

    #[test]
    fn no_flip_when_preferred_side_overflows() {
        let top_trigger = Rect::from_origin_size(300.0, 10.0, 80.0, 20.0);
        let content = Rect::from_origin_size(0.0, 0.0, 100.0, 60.0);
        let options = options(Side::Top, Align::Start);
        let pos = resolve_position(&top_trigger, &content, viewport(), &options);
        assert_eq!(pos.y, 8.0);
    }

    #[test]
    fn select_variant_is_start_aligned() {
        let content = Rect::from_origin_size(0.0, 0.0, 80.0, 120.0);
        let pos =
            resolve_select_position(&trigger(), &content, viewport(), SelectSide::Bottom, 4.0, 8.0);
        assert_eq!(pos, Position { x: 200.0, y: 124.0 });
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let opts: FloatingOptions = serde_json::from_str(r#"{"side":"left","sideOffset":12}"#)
            .expect("parse floating options");
        assert_eq!(opts.side, Side::Left);
        assert_eq!(opts.side_offset, 12.0);
        assert_eq!(opts.align, Align::Center);
        assert_eq!(opts.collision_padding, 8.0);
    }
}
