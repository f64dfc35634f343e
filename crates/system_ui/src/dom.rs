//! Internal DOM measurement, focus, and listener helpers for floating primitives.

use std::cell::Cell;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

use leptos::leptos_dom::helpers::TimeoutHandle;
use leptos::StoredValue;
use system_ui_headless::{Rect, ViewportSize};
use wasm_bindgen::{closure::Closure, JsCast};

const AUTOFOCUS_SELECTOR: &str = r#"[data-ui-autofocus="true"]"#;
const FOCUSABLE_SELECTOR: &str = concat!(
    r#"button:not([disabled]), [href], input:not([disabled]), select:not([disabled]), "#,
    r#"textarea:not([disabled]), [tabindex]:not([tabindex="-1"])"#
);

thread_local! {
    static NEXT_DOM_SERIAL: Cell<u64> = const { Cell::new(0) };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Generated DOM id shared between a trigger and its floating content.
pub(crate) struct DomId {
    prefix: &'static str,
    serial: u64,
}

impl DomId {
    /// Allocates the next id for `prefix`.
    pub(crate) fn next(prefix: &'static str) -> Self {
        let serial = NEXT_DOM_SERIAL.with(|next| {
            let serial = next.get() + 1;
            next.set(serial);
            serial
        });
        Self { prefix, serial }
    }

    /// Id of a sub-part, e.g. `ui-select-4-content`.
    pub(crate) fn part(self, part: &str) -> String {
        format!("ui-{}-{}-{part}", self.prefix, self.serial)
    }
}

/// Returns the current unix timestamp in milliseconds.
pub(crate) fn now_ms() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now().max(0.0) as u64
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }
}

/// Clears the timeout held in `slot`, if any. Disposed slots are ignored.
pub(crate) fn clear_timer(slot: StoredValue<Option<TimeoutHandle>>) {
    if let Some(Some(handle)) = slot.try_update_value(Option::take) {
        handle.clear();
    }
}

fn element_by_id(id: &str) -> Option<web_sys::Element> {
    web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(id))
}

/// Measures an attached element. Detached or missing elements return `None`.
pub(crate) fn measure_element(id: &str) -> Option<Rect> {
    let element = element_by_id(id)?;
    if !element.is_connected() {
        return None;
    }
    let rect = element.get_bounding_client_rect();
    Some(Rect {
        top: rect.top(),
        left: rect.left(),
        right: rect.right(),
        bottom: rect.bottom(),
        width: rect.width(),
        height: rect.height(),
    })
}

/// Current viewport extent, falling back to a desktop-sized default outside a browser.
pub(crate) fn viewport_size() -> ViewportSize {
    let Some(window) = web_sys::window() else {
        return ViewportSize::default();
    };
    let fallback = ViewportSize::default();
    let width = window
        .inner_width()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(fallback.width);
    let height = window
        .inner_height()
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or(fallback.height);
    ViewportSize { width, height }
}

/// Focuses an element by ID and reports whether a focusable HTML element was found.
pub(crate) fn focus_element_by_id(id: &str) -> bool {
    let Some(element) = element_by_id(id) else {
        return false;
    };
    let Ok(element) = element.dyn_into::<web_sys::HtmlElement>() else {
        return false;
    };
    let _ = element.focus();
    true
}

/// Focuses the marked autofocus descendant of `container_id`, else its first focusable
/// descendant, else the container itself.
pub(crate) fn focus_first_descendant(container_id: &str) -> bool {
    let Some(container) = element_by_id(container_id) else {
        return false;
    };
    let target = [AUTOFOCUS_SELECTOR, FOCUSABLE_SELECTOR]
        .into_iter()
        .find_map(|selector| container.query_selector(selector).ok().flatten())
        .unwrap_or(container);
    match target.dyn_into::<web_sys::HtmlElement>() {
        Ok(element) => {
            let _ = element.focus();
            true
        }
        Err(_) => false,
    }
}

/// Returns `true` when the event target lies inside the element with `id`.
pub(crate) fn event_within(ev: &web_sys::Event, id: &str) -> bool {
    let Some(node) = ev
        .target()
        .and_then(|target| target.dyn_into::<web_sys::Node>().ok())
    else {
        return false;
    };
    element_by_id(id).is_some_and(|element| element.contains(Some(&node)))
}

/// Returns `true` when the event target lies inside any mounted floating layer.
pub(crate) fn event_within_floating_layer(ev: &web_sys::Event) -> bool {
    ev.target()
        .and_then(|target| target.dyn_into::<web_sys::Element>().ok())
        .and_then(|element| element.closest(r#"[data-ui-floating-layer="true"]"#).ok())
        .flatten()
        .is_some()
}

/// Window listener registered in the capture phase (ancestor scrolls do not bubble).
pub(crate) struct CaptureListener {
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl CaptureListener {
    /// Registers `handler` for `event` on the window with `capture = true`.
    pub(crate) fn install(
        event: &'static str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Option<Self> {
        let window = web_sys::window()?;
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        window
            .add_event_listener_with_callback_and_bool(
                event,
                closure.as_ref().unchecked_ref(),
                true,
            )
            .ok()?;
        Some(Self { event, closure })
    }

    /// Unregisters the listener and drops its closure.
    pub(crate) fn remove(self) {
        if let Some(window) = web_sys::window() {
            let _ = window.remove_event_listener_with_callback_and_bool(
                self.event,
                self.closure.as_ref().unchecked_ref(),
                true,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn dom_ids_are_unique_and_scoped_by_part() {
        let first = DomId::next("popover");
        let second = DomId::next("popover");
        assert!(first != second);
        assert!(first.part("content").starts_with("ui-popover-"));
        assert!(first.part("content").ends_with("-content"));
        assert_eq!(first.part("trigger"), first.part("trigger"));
    }

    #[test]
    fn clearing_an_idle_timer_slot_is_a_no_op() {
        let _ = leptos::create_runtime();
        let slot = leptos::store_value(None::<TimeoutHandle>);
        clear_timer(slot);
        clear_timer(slot);
        assert_eq!(slot.get_value(), None);
    }
}
