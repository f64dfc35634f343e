//! Open/close controller shared by every floating consumer.
//!
//! [`reduce_floating`] applies a [`FloatingAction`] to one [`FloatingSession`] and returns the
//! side effects the host binding must execute in order. The session never touches the DOM: it
//! only records what the latest layout snapshot is and whether a frame is already pending.

use crate::a11y::OpenState;
use crate::geometry::{Position, Rect, ViewportSize};
use crate::placement::{resolve_position, FloatingOptions};

/// Consecutive frames allowed to report an unmeasurable element before giving up.
pub const MAX_MEASURE_ATTEMPTS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Why a floating element opened or closed.
pub enum OpenChangeReason {
    /// Click or keyboard activation of the trigger.
    Trigger,
    /// Host code called `set_open` directly.
    Programmatic,
    /// Pointer-down landed outside both trigger and content.
    OutsidePointer,
    /// Escape was pressed while open.
    EscapeKey,
    /// A select option or calendar day was committed.
    SelectionCommit,
}

impl OpenChangeReason {
    /// Returns `true` when closing for this reason must hand focus back to the trigger.
    pub fn restores_trigger_focus(self) -> bool {
        matches!(
            self,
            Self::OutsidePointer | Self::EscapeKey | Self::SelectionCommit
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Layout snapshot taken when a scheduled frame fires.
pub struct Measurement {
    /// Trigger bounding box.
    pub trigger: Rect,
    /// Floating content bounding box.
    pub content: Rect,
    /// Viewport extent at measurement time.
    pub viewport: ViewportSize,
}

impl Measurement {
    fn is_usable(&self) -> bool {
        self.trigger.is_measurable() && self.content.is_measurable()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Inputs accepted by [`reduce_floating`].
pub enum FloatingAction {
    /// Apply an open-state change that has already been accepted by the value owner.
    SetOpen {
        /// New open state.
        open: bool,
        /// Cause of the change.
        reason: OpenChangeReason,
    },
    /// Window resize or ancestor scroll asked for a new layout.
    RequestReposition,
    /// The scheduled layout frame fired. `None` when an element could not be found.
    FrameFired {
        /// Measured rects, if both elements are attached.
        measurement: Option<Measurement>,
    },
    /// Placement props changed.
    SetOptions(FloatingOptions),
    /// The owning component is being destroyed.
    Unmount,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Side effects emitted by [`reduce_floating`] for the host binding to execute.
pub enum FloatingEffect {
    /// Register resize, capture-phase scroll, outside-pointer, and Escape listeners.
    InstallListeners,
    /// Remove every listener registered by [`FloatingEffect::InstallListeners`].
    RemoveListeners,
    /// Request one animation frame that reports back with [`FloatingAction::FrameFired`].
    ScheduleFrame,
    /// Cancel the pending animation frame.
    CancelFrame,
    /// Write a new fixed position to the floating element.
    ApplyPosition(Position),
    /// Move focus to the first focusable descendant of the content.
    FocusFirstDescendant,
    /// Return focus to the trigger element.
    RestoreTriggerFocus,
}

#[derive(Debug, Clone, PartialEq)]
/// Mutable state for one floating element. A fresh open session starts on every open.
pub struct FloatingSession {
    state: OpenState,
    options: FloatingOptions,
    auto_focus: bool,
    position: Position,
    frame_pending: bool,
    measure_attempts: u8,
    focus_pending: bool,
    mounted: bool,
}

impl FloatingSession {
    /// Creates a closed session.
    pub fn new(options: FloatingOptions, auto_focus: bool) -> Self {
        Self {
            state: OpenState::Closed,
            options,
            auto_focus,
            position: Position::OFFSCREEN,
            frame_pending: false,
            measure_attempts: 0,
            focus_pending: false,
            mounted: false,
        }
    }

    /// Current open state.
    pub fn state(&self) -> OpenState {
        self.state
    }

    /// Most recent applied position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns `true` while a layout frame is outstanding.
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Returns `true` once the content has been opened at least once and not unmounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Placement request in effect.
    pub fn options(&self) -> &FloatingOptions {
        &self.options
    }

    fn schedule_frame(&mut self, effects: &mut Vec<FloatingEffect>) {
        if !self.frame_pending {
            self.frame_pending = true;
            effects.push(FloatingEffect::ScheduleFrame);
        }
    }

    fn teardown(&mut self, effects: &mut Vec<FloatingEffect>) {
        if self.frame_pending {
            self.frame_pending = false;
            effects.push(FloatingEffect::CancelFrame);
        }
        effects.push(FloatingEffect::RemoveListeners);
        self.state = OpenState::Closed;
        self.focus_pending = false;
        self.measure_attempts = 0;
        self.position = Position::OFFSCREEN;
    }
}

/// Applies `action` to `session` and returns the effects to execute, in order.
pub fn reduce_floating(
    session: &mut FloatingSession,
    action: FloatingAction,
) -> Vec<FloatingEffect> {
    let mut effects = Vec::new();
    match action {
        FloatingAction::SetOpen { open: true, .. } => {
            if session.state.is_open() {
                return effects;
            }
            session.state = OpenState::Open;
            session.mounted = true;
            session.position = Position::OFFSCREEN;
            session.measure_attempts = 0;
            session.focus_pending = session.auto_focus;
            effects.push(FloatingEffect::ApplyPosition(Position::OFFSCREEN));
            effects.push(FloatingEffect::InstallListeners);
            session.schedule_frame(&mut effects);
        }
        FloatingAction::SetOpen {
            open: false,
            reason,
        } => {
            if !session.state.is_open() {
                return effects;
            }
            session.teardown(&mut effects);
            if reason.restores_trigger_focus() {
                effects.push(FloatingEffect::RestoreTriggerFocus);
            }
        }
        FloatingAction::RequestReposition => {
            if session.state.is_open() {
                session.schedule_frame(&mut effects);
            }
        }
        FloatingAction::FrameFired { measurement } => {
            if !session.state.is_open() || !session.frame_pending {
                return effects;
            }
            session.frame_pending = false;
            match measurement.filter(Measurement::is_usable) {
                Some(measurement) => {
                    session.measure_attempts = 0;
                    let position = resolve_position(
                        &measurement.trigger,
                        &measurement.content,
                        measurement.viewport,
                        &session.options,
                    );
                    if position != session.position {
                        session.position = position;
                        effects.push(FloatingEffect::ApplyPosition(position));
                    }
                    if session.focus_pending {
                        session.focus_pending = false;
                        effects.push(FloatingEffect::FocusFirstDescendant);
                    }
                }
                None => {
                    session.measure_attempts = session.measure_attempts.saturating_add(1);
                    if session.measure_attempts < MAX_MEASURE_ATTEMPTS {
                        session.schedule_frame(&mut effects);
                    }
                }
            }
        }
        FloatingAction::SetOptions(options) => {
            if options != session.options {
                session.options = options;
                if session.state.is_open() {
                    session.schedule_frame(&mut effects);
                }
            }
        }
        FloatingAction::Unmount => {
            if session.state.is_open() {
                session.teardown(&mut effects);
            }
            session.mounted = false;
        }
    }
    effects
}

/// Classifies a pointer-down while open. Only presses outside both elements dismiss.
pub fn dismissal_for_pointer_down(
    inside_trigger: bool,
    inside_content: bool,
) -> Option<OpenChangeReason> {
    if inside_trigger || inside_content {
        None
    } else {
        Some(OpenChangeReason::OutsidePointer)
    }
}

/// Classifies a keydown while open.
pub fn dismissal_for_key(key: &str) -> Option<OpenChangeReason> {
    (key == "Escape").then_some(OpenChangeReason::EscapeKey)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn measurement() -> Measurement {
        Measurement {
            trigger: Rect::from_origin_size(100.0, 100.0, 80.0, 20.0),
            content: Rect::from_origin_size(0.0, 0.0, 80.0, 40.0),
            viewport: ViewportSize {
                width: 800.0,
                height: 600.0,
            },
        }
    }

    fn open(session: &mut FloatingSession) -> Vec<FloatingEffect> {
        reduce_floating(
            session,
            FloatingAction::SetOpen {
                open: true,
                reason: OpenChangeReason::Trigger,
            },
        )
    }

    fn close(session: &mut FloatingSession, reason: OpenChangeReason) -> Vec<FloatingEffect> {
        reduce_floating(
            session,
            FloatingAction::SetOpen {
                open: false,
                reason,
            },
        )
    }

    #[test]
    fn opening_holds_offscreen_installs_listeners_and_schedules_frame() {
        let mut session = FloatingSession::new(FloatingOptions::default(), false);
        let effects = open(&mut session);
        assert_eq!(
            effects,
            vec![
                FloatingEffect::ApplyPosition(Position::OFFSCREEN),
                FloatingEffect::InstallListeners,
                FloatingEffect::ScheduleFrame,
            ]
        );
        assert!(session.is_mounted());
        assert!(session.state().is_open());
        assert!(open(&mut session).is_empty());
    }

    #[test]
    fn reposition_requests_coalesce_while_frame_pending() {
        let mut session = FloatingSession::new(FloatingOptions::default(), false);
        open(&mut session);
        assert!(reduce_floating(&mut session, FloatingAction::RequestReposition).is_empty());
        assert!(reduce_floating(&mut session, FloatingAction::RequestReposition).is_empty());

        let effects = reduce_floating(
            &mut session,
            FloatingAction::FrameFired {
                measurement: Some(measurement()),
            },
        );
        assert_eq!(
            effects,
            vec![FloatingEffect::ApplyPosition(Position { x: 100.0, y: 124.0 })]
        );
        assert_eq!(
            reduce_floating(&mut session, FloatingAction::RequestReposition),
            vec![FloatingEffect::ScheduleFrame]
        );
    }

    #[test]
    fn unchanged_position_is_not_reapplied() {
        let mut session = FloatingSession::new(FloatingOptions::default(), false);
        open(&mut session);
        let fire = FloatingAction::FrameFired {
            measurement: Some(measurement()),
        };
        assert_eq!(reduce_floating(&mut session, fire.clone()).len(), 1);
        reduce_floating(&mut session, FloatingAction::RequestReposition);
        assert!(reduce_floating(&mut session, fire).is_empty());
    }

    #[test]
    fn auto_focus_waits_for_first_successful_measurement() {
        let mut session = FloatingSession::new(FloatingOptions::default(), true);
        open(&mut session);
        let missing =
            reduce_floating(&mut session, FloatingAction::FrameFired { measurement: None });
        assert_eq!(missing, vec![FloatingEffect::ScheduleFrame]);

        let placed = reduce_floating(
            &mut session,
            FloatingAction::FrameFired {
                measurement: Some(measurement()),
            },
        );
        assert_eq!(placed.last(), Some(&FloatingEffect::FocusFirstDescendant));
    }

    #[test]
    fn unmeasurable_content_stays_offscreen_after_bounded_retries() {
        let mut session = FloatingSession::new(FloatingOptions::default(), false);
        open(&mut session);
        let mut detached = measurement();
        detached.content = Rect::default();
        for attempt in 1..=MAX_MEASURE_ATTEMPTS {
            let effects = reduce_floating(
                &mut session,
                FloatingAction::FrameFired {
                    measurement: Some(detached),
                },
            );
            if attempt < MAX_MEASURE_ATTEMPTS {
                assert_eq!(effects, vec![FloatingEffect::ScheduleFrame]);
            } else {
                assert!(effects.is_empty());
            }
        }
        assert_eq!(session.position(), Position::OFFSCREEN);
        assert!(!session.frame_pending());
    }

    #[test]
    fn escape_close_cancels_frame_and_restores_focus() {
        let mut session = FloatingSession::new(FloatingOptions::default(), false);
        open(&mut session);
        let effects = close(&mut session, OpenChangeReason::EscapeKey);
        assert_eq!(
            effects,
            vec![
                FloatingEffect::CancelFrame,
                FloatingEffect::RemoveListeners,
                FloatingEffect::RestoreTriggerFocus,
            ]
        );
        assert!(close(&mut session, OpenChangeReason::EscapeKey).is_empty());
    }

    #[test]
    fn trigger_close_does_not_move_focus() {
        let mut session = FloatingSession::new(FloatingOptions::default(), false);
        open(&mut session);
        reduce_floating(
            &mut session,
            FloatingAction::FrameFired {
                measurement: Some(measurement()),
            },
        );
        assert_eq!(
            close(&mut session, OpenChangeReason::Trigger),
            vec![FloatingEffect::RemoveListeners]
        );
    }

    #[test]
    fn frames_firing_after_close_are_ignored() {
        let mut session = FloatingSession::new(FloatingOptions::default(), false);
        open(&mut session);
        close(&mut session, OpenChangeReason::Programmatic);
        let effects = reduce_floating(
            &mut session,
            FloatingAction::FrameFired {
                measurement: Some(measurement()),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(session.position(), Position::OFFSCREEN);
    }

    #[test]
    fn unmount_while_open_tears_down_without_focus_move() {
        let mut session = FloatingSession::new(FloatingOptions::default(), true);
        open(&mut session);
        let effects = reduce_floating(&mut session, FloatingAction::Unmount);
        assert_eq!(
            effects,
            vec![FloatingEffect::CancelFrame, FloatingEffect::RemoveListeners]
        );
        assert!(!session.is_mounted());
    }

    #[test]
    fn option_changes_reschedule_only_while_open() {
        let mut session = FloatingSession::new(FloatingOptions::default(), false);
        let mut options = FloatingOptions::default();
        options.side_offset = 12.0;
        assert!(reduce_floating(&mut session, FloatingAction::SetOptions(options)).is_empty());
        assert_eq!(session.options().side_offset, 12.0);

        open(&mut session);
        reduce_floating(
            &mut session,
            FloatingAction::FrameFired {
                measurement: Some(measurement()),
            },
        );
        options.side_offset = 2.0;
        assert_eq!(
            reduce_floating(&mut session, FloatingAction::SetOptions(options)),
            vec![FloatingEffect::ScheduleFrame]
        );
    }

    #[test]
    fn dismissal_classification() {
        assert_eq!(
            dismissal_for_pointer_down(false, false),
            Some(OpenChangeReason::OutsidePointer)
        );
        assert_eq!(dismissal_for_pointer_down(true, false), None);
        assert_eq!(dismissal_for_pointer_down(false, true), None);
        assert_eq!(dismissal_for_key("Escape"), Some(OpenChangeReason::EscapeKey));
        assert_eq!(dismissal_for_key("Enter"), None);
    }
}
