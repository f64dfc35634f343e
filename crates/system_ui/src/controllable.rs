//! Reactive wrapper over [`Controllable`] shared by every stateful primitive.

use leptos::*;
use system_ui_headless::Controllable;

/// Resolves a prop triple (`value`, `default_value`, `on_change`) into a displayed signal and a
/// change request callback.
///
/// Once `value` is supplied the returned signal mirrors it exactly; requests are only reported
/// through `on_change`. Without `value` the request updates the internal state first.
pub(crate) fn use_controllable<T>(
    value: Option<MaybeSignal<T>>,
    default_value: T,
    on_change: Option<Callback<T>>,
) -> (Signal<T>, Callback<T>)
where
    T: Clone + PartialEq + 'static,
{
    let initial = match value.as_ref() {
        Some(value) => Controllable::controlled(value.get_untracked(), default_value),
        None => Controllable::uncontrolled(default_value),
    };
    let state = create_rw_signal(initial);

    if let Some(value) = value {
        create_effect(move |_| {
            let external = value.get();
            state.update(|state| state.sync_external(Some(external)));
        });
    }

    let current = Signal::derive(move || state.with(|state| state.value().clone()));
    let request = Callback::new(move |next: T| {
        let mut reported = None;
        state.update(|state| reported = state.request(next));
        if let (Some(next), Some(on_change)) = (reported, on_change) {
            on_change.call(next);
        }
    });

    (current, request)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn controlled_value_ignores_requests_until_owner_updates() {
        let _ = leptos::create_runtime();
        let external = create_rw_signal("apple".to_string());
        let reported = store_value(Vec::<String>::new());
        let (current, request) = use_controllable(
            Some(MaybeSignal::Dynamic(external.into())),
            String::new(),
            Some(Callback::new(move |next: String| {
                reported.update_value(|reported| reported.push(next));
            })),
        );

        request.call("cherry".to_string());
        assert_eq!(current.get_untracked(), "apple");
        assert_eq!(reported.get_value(), vec!["cherry".to_string()]);

        external.set("banana".to_string());
        assert_eq!(current.get_untracked(), "banana");
    }

    #[test]
    fn uncontrolled_value_applies_requests_and_skips_repeats() {
        let _ = leptos::create_runtime();
        let reported = store_value(0_usize);
        let (current, request) = use_controllable(
            None,
            false,
            Some(Callback::new(move |_: bool| {
                reported.update_value(|count| *count += 1);
            })),
        );

        request.call(true);
        request.call(true);
        assert!(current.get_untracked());
        assert_eq!(reported.get_value(), 1);
    }
}
