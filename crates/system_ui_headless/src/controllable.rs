//! Controlled/uncontrolled value ownership.
//!
//! A component value is controlled once the consumer supplies it. From then on the component
//! reports change requests but displays only what the consumer passes back.

#[derive(Debug, Clone, PartialEq)]
/// Value that is either owned by the component or mirrored from its consumer.
pub struct Controllable<T> {
    controlled: Option<T>,
    internal: T,
}

impl<T: Clone + PartialEq> Controllable<T> {
    /// Component-owned value starting at `default`.
    pub fn uncontrolled(default: T) -> Self {
        Self {
            controlled: None,
            internal: default,
        }
    }

    /// Consumer-owned value. `default` is kept as the internal fallback.
    pub fn controlled(value: T, default: T) -> Self {
        Self {
            controlled: Some(value),
            internal: default,
        }
    }

    /// Syncs the consumer-supplied value after a render.
    ///
    /// Passing `None` on a controlled value keeps it controlled with its last supplied value.
    pub fn sync_external(&mut self, external: Option<T>) {
        if let Some(value) = external {
            self.controlled = Some(value);
        }
    }

    /// Returns `true` when the consumer owns the value.
    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    /// Value that should be displayed.
    pub fn value(&self) -> &T {
        self.controlled.as_ref().unwrap_or(&self.internal)
    }

    /// Requests a change and returns the value to report through the change callback.
    ///
    /// Uncontrolled values update immediately. Controlled values stay put until the consumer
    /// syncs a new one. Requests equal to the displayed value report nothing.
    pub fn request(&mut self, next: T) -> Option<T> {
        if *self.value() == next {
            return None;
        }
        if self.controlled.is_none() {
            self.internal = next.clone();
        }
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn uncontrolled_value_updates_and_reports() {
        let mut value = Controllable::uncontrolled(false);
        assert_eq!(value.request(true), Some(true));
        assert_eq!(*value.value(), true);
        assert_eq!(value.request(true), None);
    }

    #[test]
    fn controlled_value_reports_but_does_not_diverge() {
        let mut value = Controllable::controlled("a".to_string(), String::new());
        assert_eq!(value.request("b".to_string()), Some("b".to_string()));
        assert_eq!(value.value(), "a");

        value.sync_external(Some("c".to_string()));
        assert_eq!(value.value(), "c");
    }

    #[test]
    fn external_value_wins_over_previous_internal_state() {
        let mut value = Controllable::uncontrolled(1);
        value.request(5);
        value.sync_external(Some(2));
        assert!(value.is_controlled());
        assert_eq!(*value.value(), 2);

        value.sync_external(None);
        assert_eq!(*value.value(), 2);
    }
}
