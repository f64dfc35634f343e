//! Leptos executor for the headless open/close controller.
//!
//! Every floating consumer (popover, select, calendar input, tooltip) owns one
//! [`FloatingRuntime`]. Reactive open-state changes are turned into [`FloatingAction`]s, the
//! reducer decides what must happen, and this module performs the DOM work: frame scheduling,
//! measurement, listener installation, and focus moves.

use leptos::leptos_dom::helpers::{AnimationFrameRequestHandle, WindowListenerHandle};
use leptos::*;
use system_ui_headless::{
    dismissal_for_key, dismissal_for_pointer_down, reduce_floating, FloatingAction,
    FloatingEffect, FloatingOptions, FloatingSession, Measurement, OpenChangeReason, Position,
};

use crate::controllable::use_controllable;
use crate::dom::{
    event_within, event_within_floating_layer, focus_element_by_id, focus_first_descendant,
    measure_element, viewport_size, CaptureListener, DomId,
};

enum Listener {
    Window(WindowListenerHandle),
    Capture(CaptureListener),
}

impl Listener {
    fn remove(self) {
        match self {
            Self::Window(handle) => handle.remove(),
            Self::Capture(listener) => listener.remove(),
        }
    }
}

#[derive(Clone, Copy)]
/// Reactive owner of one [`FloatingSession`].
pub(crate) struct FloatingRuntime {
    id: DomId,
    session: StoredValue<FloatingSession>,
    position: RwSignal<Position>,
    frame: StoredValue<Option<AnimationFrameRequestHandle>>,
    listeners: StoredValue<Vec<Listener>>,
    request_close: Callback<OpenChangeReason>,
    dismiss_on_outside_pointer: bool,
    trigger_parts: &'static [&'static str],
}

impl FloatingRuntime {
    pub(crate) fn trigger_id(self) -> String {
        self.id.part("trigger")
    }

    pub(crate) fn content_id(self) -> String {
        self.id.part("content")
    }

    /// Id of an extra trigger element registered through `trigger_parts`.
    pub(crate) fn part_id(self, part: &str) -> String {
        self.id.part(part)
    }

    /// Every element id whose pointer-downs count as pressing the trigger.
    fn trigger_ids(self) -> Vec<String> {
        std::iter::once(self.trigger_id())
            .chain(self.trigger_parts.iter().map(|part| self.part_id(part)))
            .collect()
    }

    /// Fixed-position coordinates of the content, [`Position::OFFSCREEN`] until measured.
    pub(crate) fn position(self) -> Signal<Position> {
        self.position.into()
    }

    /// Schedules a new measurement, coalesced with any pending one.
    pub(crate) fn reposition(self) {
        self.dispatch(FloatingAction::RequestReposition);
    }

    fn dispatch(self, action: FloatingAction) {
        let effects = self
            .session
            .try_update_value(|session| reduce_floating(session, action))
            .unwrap_or_default();
        for effect in effects {
            self.execute(effect);
        }
    }

    fn execute(self, effect: FloatingEffect) {
        match effect {
            FloatingEffect::InstallListeners => self.install_listeners(),
            FloatingEffect::RemoveListeners => {
                let listeners = self
                    .listeners
                    .try_update_value(std::mem::take)
                    .unwrap_or_default();
                for listener in listeners {
                    listener.remove();
                }
            }
            FloatingEffect::ScheduleFrame => self.schedule_frame(),
            FloatingEffect::CancelFrame => {
                self.frame.update_value(|frame| {
                    if let Some(handle) = frame.take() {
                        handle.cancel();
                    }
                });
            }
            FloatingEffect::ApplyPosition(position) => {
                let _ = self.position.try_set(position);
            }
            FloatingEffect::FocusFirstDescendant => {
                if !focus_first_descendant(&self.content_id()) {
                    let content_id = self.content_id();
                    logging::warn!("floating focus failed: content {content_id} not found");
                }
            }
            FloatingEffect::RestoreTriggerFocus => {
                let _ = focus_element_by_id(&self.trigger_id());
            }
        }
    }

    fn measure(self) -> Option<Measurement> {
        Some(Measurement {
            trigger: measure_element(&self.trigger_id())?,
            content: measure_element(&self.content_id())?,
            viewport: viewport_size(),
        })
    }

    fn schedule_frame(self) {
        let runtime = self;
        match request_animation_frame_with_handle(move || {
            runtime.frame.set_value(None);
            runtime.dispatch(FloatingAction::FrameFired {
                measurement: runtime.measure(),
            });
        }) {
            Ok(handle) => self.frame.set_value(Some(handle)),
            Err(err) => {
                logging::warn!("floating frame schedule failed: {err:?}");
                self.dispatch(FloatingAction::FrameFired {
                    measurement: self.measure(),
                });
            }
        }
    }

    fn install_listeners(self) {
        let runtime = self;
        let mut installed = vec![Listener::Window(window_event_listener(
            ev::resize,
            move |_| runtime.reposition(),
        ))];

        match CaptureListener::install("scroll", move |_| runtime.reposition()) {
            Some(listener) => installed.push(Listener::Capture(listener)),
            None => logging::warn!("floating scroll listener install failed"),
        }

        if self.dismiss_on_outside_pointer {
            installed.push(Listener::Window(window_event_listener(
                ev::pointerdown,
                move |ev| {
                    let inside_trigger =
                        runtime.trigger_ids().iter().any(|id| event_within(&ev, id));
                    let inside_content = event_within(&ev, &runtime.content_id())
                        || event_within_floating_layer(&ev);
                    if let Some(reason) = dismissal_for_pointer_down(inside_trigger, inside_content)
                    {
                        runtime.request_close.call(reason);
                    }
                },
            )));
        }

        installed.push(Listener::Window(window_event_listener(
            ev::keydown,
            move |ev| {
                if ev.default_prevented() {
                    return;
                }
                if let Some(reason) = dismissal_for_key(&ev.key()) {
                    ev.prevent_default();
                    runtime.request_close.call(reason);
                }
            },
        )));

        self.listeners.update_value(|listeners| listeners.extend(installed));
    }
}

#[derive(Clone, Copy)]
/// Open-state change requests tagged with their cause.
pub(crate) struct OpenRequest {
    pub(crate) open: Signal<bool>,
    reason: StoredValue<OpenChangeReason>,
    request_open: Callback<bool>,
}

impl OpenRequest {
    pub(crate) fn new(open: Signal<bool>, request_open: Callback<bool>) -> Self {
        Self {
            open,
            reason: store_value(OpenChangeReason::Programmatic),
            request_open,
        }
    }

    /// Requests `open`, recording `reason` for the next open-state change.
    ///
    /// Requests equal to the current state are dropped. When a controlling owner declines the
    /// request the recorded reason is discarded, so a later owner-driven change reads as
    /// [`OpenChangeReason::Programmatic`].
    pub(crate) fn request(self, open: bool, reason: OpenChangeReason) {
        if self.open.get_untracked() == open {
            return;
        }
        self.reason.set_value(reason);
        self.request_open.call(open);
        if self.open.get_untracked() != open {
            self.reason.set_value(OpenChangeReason::Programmatic);
        }
    }

    /// Consumes the recorded reason, leaving [`OpenChangeReason::Programmatic`] behind.
    pub(crate) fn take_reason(self) -> OpenChangeReason {
        self.reason
            .try_update_value(|reason| std::mem::replace(reason, OpenChangeReason::Programmatic))
            .unwrap_or(OpenChangeReason::Programmatic)
    }
}

/// Wires a [`FloatingRuntime`] to an open request and option signal for the current owner.
///
/// Each open-state change consumes the reason recorded by [`OpenRequest::request`].
pub(crate) fn use_floating(
    id: DomId,
    request: OpenRequest,
    options: Signal<FloatingOptions>,
    auto_focus: bool,
    dismiss_on_outside_pointer: bool,
    trigger_parts: &'static [&'static str],
) -> FloatingRuntime {
    let runtime = FloatingRuntime {
        id,
        session: store_value(FloatingSession::new(options.get_untracked(), auto_focus)),
        position: create_rw_signal(Position::OFFSCREEN),
        frame: store_value(None),
        listeners: store_value(Vec::new()),
        request_close: Callback::new(move |why: OpenChangeReason| request.request(false, why)),
        dismiss_on_outside_pointer,
        trigger_parts,
    };

    create_effect(move |_| {
        let options = options.get();
        runtime.dispatch(FloatingAction::SetOptions(options));
    });

    create_effect(move |_| {
        let open = request.open.get();
        let reason = request.take_reason();
        runtime.dispatch(FloatingAction::SetOpen { open, reason });
    });

    on_cleanup(move || runtime.dispatch(FloatingAction::Unmount));

    runtime
}

#[derive(Clone, Copy)]
/// Controllable open state bound to a floating runtime.
pub(crate) struct Disclosure {
    pub(crate) open: Signal<bool>,
    pub(crate) floating: FloatingRuntime,
    request: OpenRequest,
}

impl Disclosure {
    /// Requests an open-state change, remembering why for focus restoration.
    pub(crate) fn set_open(self, open: bool, reason: OpenChangeReason) {
        self.request.request(open, reason);
    }

    pub(crate) fn toggle(self) {
        self.set_open(!self.open.get_untracked(), OpenChangeReason::Trigger);
    }

    pub(crate) fn close(self, reason: OpenChangeReason) {
        self.set_open(false, reason);
    }
}

/// Open-state props shared by every floating primitive.
pub(crate) struct DisclosureProps {
    pub(crate) open: Option<MaybeSignal<bool>>,
    pub(crate) default_open: bool,
    pub(crate) on_open_change: Option<Callback<bool>>,
    pub(crate) options: Signal<FloatingOptions>,
    pub(crate) auto_focus: bool,
    pub(crate) dismiss_on_outside_pointer: bool,
    /// Extra trigger elements (ids from [`FloatingRuntime::part_id`]) that never dismiss.
    pub(crate) trigger_parts: &'static [&'static str],
}

/// Builds the open state and floating runtime for one trigger/content pair.
pub(crate) fn use_disclosure(prefix: &'static str, props: DisclosureProps) -> Disclosure {
    let (open, request_open) =
        use_controllable(props.open, props.default_open, props.on_open_change);
    let request = OpenRequest::new(open, request_open);
    let floating = use_floating(
        DomId::next(prefix),
        request,
        props.options,
        props.auto_focus,
        props.dismiss_on_outside_pointer,
        props.trigger_parts,
    );
    Disclosure {
        open,
        floating,
        request,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn declined_request_leaves_no_reason_behind() {
        let _ = leptos::create_runtime();
        let external = create_rw_signal(true);
        let (open, request_open) =
            use_controllable(Some(MaybeSignal::Dynamic(external.into())), false, None);
        let request = OpenRequest::new(open, request_open);

        request.request(false, OpenChangeReason::EscapeKey);
        assert!(open.get_untracked());
        assert_eq!(request.take_reason(), OpenChangeReason::Programmatic);

        external.set(false);
        assert!(!open.get_untracked());
        assert_eq!(request.take_reason(), OpenChangeReason::Programmatic);
    }

    #[test]
    fn extra_trigger_parts_count_as_trigger() {
        let _ = leptos::create_runtime();
        let disclosure = use_disclosure(
            "calendar",
            DisclosureProps {
                open: None,
                default_open: false,
                on_open_change: None,
                options: Signal::derive(FloatingOptions::default),
                auto_focus: false,
                dismiss_on_outside_pointer: true,
                trigger_parts: &["toggle"],
            },
        );
        let floating = disclosure.floating;
        assert_eq!(
            floating.trigger_ids(),
            vec![floating.trigger_id(), floating.part_id("toggle")]
        );
        assert!(floating.part_id("toggle").ends_with("-toggle"));
    }

    #[test]
    fn accepted_request_keeps_reason_until_consumed() {
        let _ = leptos::create_runtime();
        let (open, request_open) = use_controllable(None, true, None);
        let request = OpenRequest::new(open, request_open);

        request.request(false, OpenChangeReason::EscapeKey);
        assert!(!open.get_untracked());
        assert_eq!(request.take_reason(), OpenChangeReason::EscapeKey);
        assert_eq!(request.take_reason(), OpenChangeReason::Programmatic);

        request.request(false, OpenChangeReason::OutsidePointer);
        assert_eq!(request.take_reason(), OpenChangeReason::Programmatic);
    }
}
