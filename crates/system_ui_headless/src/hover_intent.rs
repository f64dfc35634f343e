//! Hover-intent state for tooltips: delayed open on enter, delayed close on leave.

use std::time::Duration;

use crate::config::TooltipDelays;
use crate::timers::{TimerSlot, TimerToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Work the host must perform after a hover-intent transition.
pub struct HoverStep {
    /// Timer whose host handle must be cleared.
    pub cancel: Option<TimerToken>,
    /// Timer to start; report back through [`HoverIntent::fire`] when it elapses.
    pub schedule: Option<(TimerToken, Duration)>,
    /// New open state to publish.
    pub open_changed: Option<bool>,
}

#[derive(Debug, Clone)]
/// Per-element hover-intent state with one timer slot.
pub struct HoverIntent {
    delays: TooltipDelays,
    slot: TimerSlot,
    pending: Option<bool>,
    open: bool,
    pressed: bool,
    unmounted: bool,
}

impl HoverIntent {
    /// Creates closed hover-intent state.
    pub fn new(delays: TooltipDelays) -> Self {
        Self {
            delays,
            slot: TimerSlot::new(),
            pending: None,
            open: false,
            pressed: false,
            unmounted: false,
        }
    }

    /// Current open state.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Pointer entered the trigger or content.
    pub fn pointer_enter(&mut self) -> HoverStep {
        if self.unmounted {
            return HoverStep::default();
        }
        if self.open {
            return self.cancel_pending();
        }
        if self.pending == Some(true) {
            return HoverStep::default();
        }
        self.transition_after(true, Duration::from_millis(self.delays.open_delay_ms))
    }

    /// Pointer left the trigger and content.
    pub fn pointer_leave(&mut self) -> HoverStep {
        self.pressed = false;
        if self.unmounted {
            return HoverStep::default();
        }
        if !self.open {
            return self.cancel_pending();
        }
        if self.pending == Some(false) {
            return HoverStep::default();
        }
        self.transition_after(false, Duration::from_millis(self.delays.close_delay_ms))
    }

    /// Keyboard focus reached the trigger: open without delay.
    ///
    /// Focus that follows a pointer press on the trigger is ignored until the pointer leaves or
    /// focus moves away.
    pub fn focus(&mut self) -> HoverStep {
        if self.pressed {
            return HoverStep::default();
        }
        self.set_now(true)
    }

    /// Focus left the trigger: close without delay.
    pub fn blur(&mut self) -> HoverStep {
        self.pressed = false;
        self.set_now(false)
    }

    /// The trigger was activated with a pointer: close without delay.
    pub fn pointer_down(&mut self) -> HoverStep {
        self.pressed = true;
        self.set_now(false)
    }

    /// Open without delay regardless of pointer state, e.g. when the consumer opens it.
    pub fn show(&mut self) -> HoverStep {
        self.set_now(true)
    }

    /// Escape was pressed or the consumer closed it: close without delay.
    pub fn dismiss(&mut self) -> HoverStep {
        self.set_now(false)
    }

    /// A host timer elapsed. Stale or cancelled tokens change nothing.
    pub fn fire(&mut self, token: TimerToken) -> HoverStep {
        if self.unmounted || !self.slot.fire(token) {
            return HoverStep::default();
        }
        let Some(target) = self.pending.take() else {
            return HoverStep::default();
        };
        self.publish(target, None)
    }

    /// Tears down the element. Returns the timer that must be cleared, if any.
    pub fn unmount(&mut self) -> Option<TimerToken> {
        self.unmounted = true;
        self.pending = None;
        self.slot.disarm()
    }

    fn cancel_pending(&mut self) -> HoverStep {
        self.pending = None;
        HoverStep {
            cancel: self.slot.disarm(),
            ..HoverStep::default()
        }
    }

    fn set_now(&mut self, open: bool) -> HoverStep {
        if self.unmounted {
            return HoverStep::default();
        }
        self.pending = None;
        let cancel = self.slot.disarm();
        self.publish(open, cancel)
    }

    fn transition_after(&mut self, target: bool, delay: Duration) -> HoverStep {
        if delay.is_zero() {
            return self.set_now(target);
        }
        let (token, cancel) = self.slot.arm();
        self.pending = Some(target);
        HoverStep {
            cancel,
            schedule: Some((token, delay)),
            open_changed: None,
        }
    }

    fn publish(&mut self, open: bool, cancel: Option<TimerToken>) -> HoverStep {
        let changed = self.open != open;
        self.open = open;
        HoverStep {
            cancel,
            schedule: None,
            open_changed: changed.then_some(open),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn delays() -> TooltipDelays {
        TooltipDelays {
            open_delay_ms: 700,
            close_delay_ms: 300,
        }
    }

    #[test]
    fn enter_schedules_open_and_fire_opens() {
        let mut intent = HoverIntent::new(delays());
        let step = intent.pointer_enter();
        let (token, delay) = step.schedule.expect("open timer");
        assert_eq!(delay, Duration::from_millis(700));
        assert_eq!(step.open_changed, None);

        let fired = intent.fire(token);
        assert_eq!(fired.open_changed, Some(true));
        assert!(intent.is_open());
    }

    #[test]
    fn leave_before_delay_cancels_open() {
        let mut intent = HoverIntent::new(delays());
        let (token, _) = intent.pointer_enter().schedule.expect("open timer");
        let step = intent.pointer_leave();
        assert_eq!(step.cancel, Some(token));
        assert_eq!(intent.fire(token), HoverStep::default());
        assert!(!intent.is_open());
    }

    #[test]
    fn reentering_cancels_pending_close() {
        let mut intent = HoverIntent::new(delays());
        intent.focus();
        let (close_token, delay) = intent.pointer_leave().schedule.expect("close timer");
        assert_eq!(delay, Duration::from_millis(300));
        assert_eq!(intent.pointer_enter().cancel, Some(close_token));
        assert_eq!(intent.fire(close_token), HoverStep::default());
        assert!(intent.is_open());
    }

    #[test]
    fn unmount_before_delay_never_opens() {
        let mut intent = HoverIntent::new(delays());
        let (token, _) = intent.pointer_enter().schedule.expect("open timer");
        assert_eq!(intent.unmount(), Some(token));
        assert_eq!(intent.fire(token), HoverStep::default());
        assert!(!intent.is_open());
        assert_eq!(intent.pointer_enter(), HoverStep::default());
    }

    #[test]
    fn dismiss_closes_immediately_and_clears_timer() {
        let mut intent = HoverIntent::new(delays());
        intent.focus();
        let (token, _) = intent.pointer_leave().schedule.expect("close timer");
        let step = intent.dismiss();
        assert_eq!(step.cancel, Some(token));
        assert_eq!(step.open_changed, Some(false));
    }

    #[test]
    fn focus_after_pointer_activation_stays_closed() {
        let mut intent = HoverIntent::new(delays());
        let (token, _) = intent.pointer_enter().schedule.expect("open timer");
        intent.fire(token);
        assert!(intent.is_open());

        assert_eq!(intent.pointer_down().open_changed, Some(false));
        assert_eq!(intent.focus(), HoverStep::default());
        assert!(!intent.is_open());
    }

    #[test]
    fn keyboard_focus_opens_again_after_blur() {
        let mut intent = HoverIntent::new(delays());
        intent.pointer_down();
        intent.focus();
        assert_eq!(intent.blur(), HoverStep::default());
        assert_eq!(intent.focus().open_changed, Some(true));

        intent.pointer_down();
        intent.pointer_leave();
        assert_eq!(intent.show().open_changed, Some(true));
    }

    #[test]
    fn zero_delay_opens_immediately() {
        let mut intent = HoverIntent::new(TooltipDelays {
            open_delay_ms: 0,
            close_delay_ms: 0,
        });
        assert_eq!(intent.pointer_enter().open_changed, Some(true));
        assert_eq!(intent.pointer_leave().open_changed, Some(false));
    }
}
