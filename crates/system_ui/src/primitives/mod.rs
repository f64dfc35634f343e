//! Shared control, overlay, select, and calendar primitives.

use leptos::ev::{FocusEvent, KeyboardEvent, MouseEvent};
use leptos::*;
use system_ui_headless::{bool_token, checked_token, OpenState};

mod calendar;
mod controls;
mod overlays;
mod select;

pub use calendar::CalendarInput;
pub use controls::{Button, Switch, TextField};
pub use overlays::{Dialog, DialogHandle, Popover, PopoverHandle, Tooltip, TriggerBindings};
pub use select::{Select, SelectOption};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared button variants.
pub enum ButtonVariant {
    /// Standard action button.
    #[default]
    Standard,
    /// Primary emphasized action button.
    Primary,
    /// Quiet/toggle style button.
    Quiet,
    /// Danger/destructive button.
    Danger,
}

impl ButtonVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Primary => "primary",
            Self::Quiet => "quiet",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared button sizing tokens.
pub enum ButtonSize {
    /// Dense button.
    Sm,
    /// Default button.
    #[default]
    Md,
    /// Large button.
    Lg,
}

impl ButtonSize {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Sm => "sm",
            Self::Md => "md",
            Self::Lg => "lg",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Shared input-field variants.
pub enum FieldVariant {
    /// Standard input.
    #[default]
    Standard,
    /// Inset/editor input.
    Inset,
}

impl FieldVariant {
    pub(crate) fn token(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Inset => "inset",
        }
    }
}

pub(crate) fn merge_layout_class(base: &'static str, layout_class: Option<&'static str>) -> String {
    match layout_class {
        Some(layout_class) if !layout_class.is_empty() => format!("{base} {layout_class}"),
        _ => base.to_string(),
    }
}

pub(crate) fn open_token(open: bool) -> &'static str {
    OpenState::from(open).token()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn layout_class_is_appended_when_present() {
        assert_eq!(merge_layout_class("ui-popover", None), "ui-popover");
        assert_eq!(merge_layout_class("ui-popover", Some("")), "ui-popover");
        assert_eq!(
            merge_layout_class("ui-popover", Some("toolbar-popover")),
            "ui-popover toolbar-popover"
        );
    }

    #[test]
    fn tokens_match_data_attribute_contract() {
        assert_eq!(open_token(true), "open");
        assert_eq!(open_token(false), "closed");
        assert_eq!(ButtonVariant::default().token(), "standard");
        assert_eq!(ButtonSize::Sm.token(), "sm");
        assert_eq!(FieldVariant::Inset.token(), "inset");
    }
}
