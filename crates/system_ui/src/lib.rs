//! Leptos floating UI primitives: popover, select, tooltip, dialog, and calendar input.
//!
//! The crate binds the framework-free logic in `system_ui_headless` to the DOM. Components emit
//! a stable `data-ui-*` / `data-state` attribute contract for external CSS and wire ARIA roles,
//! open/close state, keyboard navigation, and focus hand-off. Every stateful component accepts
//! an optional controlled value, a default for uncontrolled use, and a change callback.
//!
//! Compound pieces never reach for ambient context: popup content receives an explicit handle
//! ([`PopoverHandle`], [`DialogHandle`]) and custom triggers are adapters receiving
//! [`TriggerBindings`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod config;
mod controllable;
mod dom;
mod floating;
mod primitives;

pub use config::{provide_ui_config, use_ui_config, UiConfigProvider};
pub use primitives::{
    Button, ButtonSize, ButtonVariant, CalendarInput, Dialog, DialogHandle, FieldVariant, Popover,
    PopoverHandle, Select, SelectOption, Switch, TextField, Tooltip, TriggerBindings,
};
pub use system_ui_headless::{
    Align, FloatingOptions, SelectSide, Side, TooltipDelays, UiConfig, ZonedTimestamp,
};

/// Convenience imports for application crates consuming the primitive set.
pub mod prelude {
    pub use crate::{
        provide_ui_config, use_ui_config, Align, Button, ButtonSize, ButtonVariant, CalendarInput,
        Dialog, DialogHandle, FieldVariant, FloatingOptions, Popover, PopoverHandle, Select,
        SelectOption, SelectSide, Side, Switch, TextField, Tooltip, TooltipDelays,
        TriggerBindings, UiConfig, UiConfigProvider, ZonedTimestamp,
    };
}
