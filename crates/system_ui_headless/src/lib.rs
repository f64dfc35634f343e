//! Framework-free logic behind the `system_ui` floating primitives.
//!
//! The crate owns everything that can be decided without a DOM: viewport geometry and the
//! floating position resolver, the open/close controller reducer, controlled/uncontrolled value
//! bookkeeping, generation-token timers, hover intent, listbox and calendar keyboard
//! navigation, and the timezone-aware date value used by the calendar input. The Leptos layer
//! measures elements, schedules frames and timers, and executes the effects emitted here.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod a11y;
pub mod calendar;
pub mod config;
pub mod controllable;
pub mod datetime;
pub mod error;
pub mod floating;
pub mod geometry;
pub mod hover_intent;
pub mod listbox;
pub mod placement;
pub mod timers;

pub use a11y::{bool_token, checked_token, OpenState};
pub use calendar::{
    month_grid, navigate_calendar, shift_month, weekday_columns, CalendarBounds, CalendarDay,
    CalendarKey, GRID_WEEKS,
};
pub use config::{TooltipDelays, UiConfig};
pub use controllable::Controllable;
pub use datetime::{format_offset, parse_date_input, DateCommit, DateInputState, ZonedTimestamp};
pub use error::{ConfigError, DateInputError};
pub use floating::{
    dismissal_for_key, dismissal_for_pointer_down, reduce_floating, FloatingAction,
    FloatingEffect, FloatingSession, Measurement, OpenChangeReason, MAX_MEASURE_ATTEMPTS,
};
pub use geometry::{Position, Rect, ViewportSize};
pub use hover_intent::{HoverIntent, HoverStep};
pub use listbox::{ListNavigator, NavKey, Typeahead};
pub use placement::{
    clamp_axis, resolve_position, resolve_select_position, unclamped_position, Align,
    FloatingOptions, SelectSide, Side,
};
pub use timers::{TimerSlot, TimerToken};
