//! Generation-token timer bookkeeping.
//!
//! The host owns the real timeout handles. A [`TimerSlot`] only decides which token is live so
//! that a callback firing after cancellation or unmount can be recognized and ignored.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// Identity of one scheduled timer.
pub struct TimerToken(u64);

#[derive(Debug, Default, Clone)]
/// Holds at most one live timer token.
pub struct TimerSlot {
    next_generation: u64,
    armed: Option<TimerToken>,
}

impl TimerSlot {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a new timer, returning its token and the previously armed token to cancel.
    pub fn arm(&mut self) -> (TimerToken, Option<TimerToken>) {
        self.next_generation += 1;
        let token = TimerToken(self.next_generation);
        let previous = self.armed.replace(token);
        (token, previous)
    }

    /// Disarms the slot and returns the token that should be cancelled, if any.
    pub fn disarm(&mut self) -> Option<TimerToken> {
        self.armed.take()
    }

    /// Consumes `token` if it is the live one. Stale tokens return `false`.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if self.armed == Some(token) {
            self.armed = None;
            true
        } else {
            false
        }
    }

    /// Currently armed token.
    pub fn armed(&self) -> Option<TimerToken> {
        self.armed
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rearming_reports_previous_token_and_invalidates_it() {
        let mut slot = TimerSlot::new();
        let (first, none) = slot.arm();
        assert_eq!(none, None);
        let (second, previous) = slot.arm();
        assert_eq!(previous, Some(first));
        assert!(!slot.fire(first));
        assert!(slot.fire(second));
        assert!(!slot.fire(second));
    }

    #[test]
    fn disarmed_token_never_fires() {
        let mut slot = TimerSlot::new();
        let (token, _) = slot.arm();
        assert_eq!(slot.disarm(), Some(token));
        assert!(!slot.fire(token));
        assert_eq!(slot.armed(), None);
    }
}
