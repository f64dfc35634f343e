use std::time::Duration;

use leptos::leptos_dom::helpers::TimeoutHandle;
use system_ui_headless::{
    dismissal_for_key, dismissal_for_pointer_down, Align, FloatingOptions, HoverIntent,
    HoverStep, OpenChangeReason, Side, TooltipDelays,
};

use super::*;
use crate::config::use_ui_config;
use crate::controllable::use_controllable;
use crate::dom::{clear_timer, event_within, focus_element_by_id, focus_first_descendant, DomId};
use crate::floating::{use_disclosure, Disclosure, DisclosureProps, OpenRequest};

/// Applies per-instance placement props over configured defaults.
pub(crate) fn placement_options(
    base: FloatingOptions,
    side: Option<Side>,
    align: Option<Align>,
    side_offset: Option<f64>,
    align_offset: Option<f64>,
    collision_padding: Option<f64>,
) -> FloatingOptions {
    FloatingOptions {
        side: side.unwrap_or(base.side),
        align: align.unwrap_or(base.align),
        side_offset: side_offset.unwrap_or(base.side_offset),
        align_offset: align_offset.unwrap_or(base.align_offset),
        collision_padding: collision_padding.unwrap_or(base.collision_padding).max(0.0),
    }
}

#[derive(Clone)]
/// Everything a custom trigger element must carry to drive a popup.
///
/// Adapters render their own element and must set `id`, the ARIA attributes, and call
/// [`TriggerBindings::activate`] from their click handler.
pub struct TriggerBindings {
    /// DOM id the popup measures and returns focus to.
    pub id: String,
    /// Value for `aria-controls`.
    pub aria_controls: String,
    /// Value for `aria-haspopup`.
    pub aria_haspopup: &'static str,
    /// Value for `aria-expanded`.
    pub expanded: Signal<bool>,
    /// Value for `data-state` (`open` or `closed`).
    pub data_state: Signal<&'static str>,
    toggle: Callback<()>,
}

impl TriggerBindings {
    fn new(disclosure: Disclosure, aria_haspopup: &'static str) -> Self {
        let open = disclosure.open;
        Self {
            id: disclosure.floating.trigger_id(),
            aria_controls: disclosure.floating.content_id(),
            aria_haspopup,
            expanded: open,
            data_state: Signal::derive(move || open_token(open.get())),
            toggle: Callback::new(move |()| disclosure.toggle()),
        }
    }

    /// Toggles the popup as a trigger activation.
    pub fn activate(&self) {
        self.toggle.call(());
    }
}

fn render_trigger(
    bindings: TriggerBindings,
    trigger: Option<Callback<TriggerBindings, View>>,
    label: MaybeSignal<String>,
) -> View {
    if let Some(trigger) = trigger {
        return trigger.call(bindings);
    }
    let TriggerBindings {
        id,
        aria_controls,
        aria_haspopup,
        expanded,
        data_state,
        toggle,
    } = bindings;
    view! {
        <Button
            id=id
            aria_controls=aria_controls
            aria_haspopup=aria_haspopup.to_string()
            aria_expanded=expanded
            data_state=Signal::derive(move || data_state.get().to_string())
            ui_slot="trigger"
            on_click=Callback::new(move |_| toggle.call(()))
        >
            {move || label.get()}
        </Button>
    }
    .into_view()
}

#[derive(Clone, Copy)]
/// Handle passed to popover content for reading and changing the open state.
pub struct PopoverHandle {
    disclosure: Disclosure,
}

impl PopoverHandle {
    /// Reactive open state.
    pub fn is_open(&self) -> Signal<bool> {
        self.disclosure.open
    }

    /// Opens or closes the popover without moving focus.
    pub fn set_open(&self, open: bool) {
        self.disclosure.set_open(open, OpenChangeReason::Programmatic);
    }

    /// Closes after a choice was made in the content; focus returns to the trigger.
    pub fn commit(&self) {
        self.disclosure.close(OpenChangeReason::SelectionCommit);
    }

    /// Re-measures after the content changed size.
    pub fn reposition(&self) {
        self.disclosure.floating.reposition();
    }
}

#[component]
/// Anchored non-modal popup positioned next to its trigger and clamped to the viewport.
pub fn Popover(
    #[prop(optional)] layout_class: Option<&'static str>,
    /// Consumer-owned open state.
    #[prop(optional, into)]
    open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    #[prop(optional)] side: Option<Side>,
    #[prop(optional)] align: Option<Align>,
    #[prop(optional)] side_offset: Option<f64>,
    #[prop(optional)] align_offset: Option<f64>,
    #[prop(optional)] collision_padding: Option<f64>,
    /// Move focus into the content once it has been placed.
    #[prop(default = true)]
    auto_focus: bool,
    #[prop(optional, into)] aria_label: Option<String>,
    /// Label of the default trigger button.
    #[prop(optional, into)]
    trigger_label: MaybeSignal<String>,
    /// Custom trigger adapter. Replaces the default button.
    #[prop(optional)]
    trigger: Option<Callback<TriggerBindings, View>>,
    /// Content renderer, invoked each time the popover opens.
    content: Callback<PopoverHandle, View>,
) -> impl IntoView {
    let config = use_ui_config();
    let options = placement_options(
        config.floating,
        side,
        align,
        side_offset,
        align_offset,
        collision_padding,
    );
    let disclosure = use_disclosure(
        "popover",
        DisclosureProps {
            open,
            default_open,
            on_open_change,
            options: Signal::derive(move || options),
            auto_focus,
            dismiss_on_outside_pointer: true,
            trigger_parts: &[],
        },
    );
    let handle = PopoverHandle { disclosure };
    let floating = disclosure.floating;
    let is_open = disclosure.open;
    let aria_label = store_value(aria_label);

    view! {
        <div
            class=merge_layout_class("ui-popover", layout_class)
            data-ui-primitive="true"
            data-ui-kind="popover"
            data-state=move || open_token(is_open.get())
        >
            {render_trigger(TriggerBindings::new(disclosure, "dialog"), trigger, trigger_label)}
            <Show when=move || is_open.get()>
                <Portal>
                    <div
                        id=floating.content_id()
                        class="ui-popover-content"
                        role="dialog"
                        tabindex="-1"
                        aria-label=aria_label.get_value()
                        aria-labelledby=floating.trigger_id()
                        style=move || floating.position().get().fixed_style()
                        data-ui-floating-layer="true"
                        data-ui-slot="content"
                        data-state=move || open_token(is_open.get())
                        data-side=options.side.token()
                        data-align=options.align.token()
                        on:keydown=move |ev: KeyboardEvent| {
                            if ev.default_prevented() {
                                return;
                            }
                            if let Some(reason) = dismissal_for_key(&ev.key()) {
                                ev.prevent_default();
                                disclosure.close(reason);
                            }
                        }
                    >
                        {content.call(handle)}
                    </div>
                </Portal>
            </Show>
        </div>
    }
}

#[derive(Clone, Copy)]
/// Handle passed to dialog content.
pub struct DialogHandle {
    request: OpenRequest,
}

impl DialogHandle {
    /// Reactive open state.
    pub fn is_open(&self) -> Signal<bool> {
        self.request.open
    }

    /// Closes the dialog and returns focus to the element that opened it.
    pub fn close(&self) {
        self.request.request(false, OpenChangeReason::SelectionCommit);
    }
}

/// Backdrop pointer-downs dismiss unless they land inside the dialog content.
fn backdrop_dismissal(close_on_backdrop: bool, inside_content: bool) -> Option<OpenChangeReason> {
    if !close_on_backdrop {
        return None;
    }
    dismissal_for_pointer_down(false, inside_content)
}

#[component]
/// Modal dialog with backdrop, Escape dismissal, and focus hand-off.
pub fn Dialog(
    #[prop(optional)] layout_class: Option<&'static str>,
    /// Consumer-owned open state.
    #[prop(optional, into)]
    open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    #[prop(optional, into)] aria_label: Option<String>,
    /// Close when the backdrop receives a pointer-down.
    #[prop(default = true)]
    close_on_backdrop: bool,
    #[prop(optional, into)] trigger_label: MaybeSignal<String>,
    #[prop(optional)] trigger: Option<Callback<TriggerBindings, View>>,
    content: Callback<DialogHandle, View>,
) -> impl IntoView {
    let id = DomId::next("dialog");
    let (open, request_open) = use_controllable(open, default_open, on_open_change);
    let request = OpenRequest::new(open, request_open);
    let handle = DialogHandle { request };
    let aria_label = store_value(aria_label);
    let focus_timer = store_value(None::<TimeoutHandle>);

    create_effect(move |was_open: Option<bool>| {
        let is_open = open.get();
        let reason = request.take_reason();
        if is_open && was_open != Some(true) {
            // Content mounts in the same tick; move focus once it is attached.
            let content_id = id.part("content");
            clear_timer(focus_timer);
            match set_timeout_with_handle(
                move || {
                    let _ = focus_timer.try_set_value(None);
                    let _ = focus_first_descendant(&content_id);
                },
                Duration::from_millis(0),
            ) {
                Ok(handle) => focus_timer.set_value(Some(handle)),
                Err(err) => logging::warn!("dialog focus schedule failed: {err:?}"),
            }
        } else if !is_open && was_open == Some(true) {
            clear_timer(focus_timer);
            if reason.restores_trigger_focus() {
                let _ = focus_element_by_id(&id.part("trigger"));
            }
        }
        is_open
    });

    let escape_listener = window_event_listener(ev::keydown, move |ev| {
        if ev.default_prevented() || !open.get_untracked() {
            return;
        }
        if let Some(why) = dismissal_for_key(&ev.key()) {
            ev.prevent_default();
            request.request(false, why);
        }
    });
    on_cleanup(move || {
        escape_listener.remove();
        clear_timer(focus_timer);
    });

    let bindings = TriggerBindings {
        id: id.part("trigger"),
        aria_controls: id.part("content"),
        aria_haspopup: "dialog",
        expanded: open,
        data_state: Signal::derive(move || open_token(open.get())),
        toggle: Callback::new(move |()| {
            request.request(!open.get_untracked(), OpenChangeReason::Trigger)
        }),
    };

    view! {
        <div
            class=merge_layout_class("ui-dialog", layout_class)
            data-ui-primitive="true"
            data-ui-kind="dialog"
            data-state=move || open_token(open.get())
        >
            {render_trigger(bindings, trigger, trigger_label)}
            <Show when=move || open.get()>
                <Portal>
                    <div
                        class="ui-dialog-backdrop"
                        data-ui-slot="backdrop"
                        data-ui-floating-layer="true"
                        data-state=move || open_token(open.get())
                        on:pointerdown=move |ev| {
                            let inside_content = event_within(&ev, &id.part("content"));
                            if let Some(why) = backdrop_dismissal(close_on_backdrop, inside_content)
                            {
                                request.request(false, why);
                            }
                        }
                    >
                        <div
                            id=id.part("content")
                            class="ui-dialog-content"
                            role="dialog"
                            aria-modal="true"
                            tabindex="-1"
                            aria-label=aria_label.get_value()
                            data-ui-slot="content"
                            data-state=move || open_token(open.get())
                        >
                            {content.call(handle)}
                        </div>
                    </div>
                </Portal>
            </Show>
        </div>
    }
}

#[derive(Clone, Copy)]
struct TooltipRuntime {
    intent: StoredValue<HoverIntent>,
    pending: StoredValue<Option<TimeoutHandle>>,
    disclosure: Disclosure,
}

impl TooltipRuntime {
    fn step(self, transition: impl FnOnce(&mut HoverIntent) -> HoverStep) {
        if let Some(step) = self.intent.try_update_value(transition) {
            self.apply(step);
        }
    }

    fn clear_pending(self) {
        clear_timer(self.pending);
    }

    fn apply(self, step: HoverStep) {
        if step.cancel.is_some() {
            self.clear_pending();
        }
        if let Some((token, delay)) = step.schedule {
            let runtime = self;
            match set_timeout_with_handle(
                move || {
                    let _ = runtime.pending.try_set_value(None);
                    runtime.step(|intent| intent.fire(token));
                },
                delay,
            ) {
                Ok(handle) => self.pending.set_value(Some(handle)),
                Err(err) => {
                    logging::warn!("tooltip timer schedule failed: {err:?}");
                    self.step(|intent| intent.fire(token));
                }
            }
        }
        if let Some(open) = step.open_changed {
            self.disclosure.set_open(open, OpenChangeReason::Programmatic);
        }
    }
}

#[component]
/// Hover/focus tooltip that describes its wrapped trigger.
pub fn Tooltip(
    #[prop(optional)] layout_class: Option<&'static str>,
    /// Tooltip text.
    #[prop(into)]
    label: MaybeSignal<String>,
    #[prop(optional, into)] open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    #[prop(optional)] side: Option<Side>,
    #[prop(optional)] align: Option<Align>,
    #[prop(optional)] side_offset: Option<f64>,
    #[prop(optional)] collision_padding: Option<f64>,
    #[prop(optional)] open_delay_ms: Option<u64>,
    #[prop(optional)] close_delay_ms: Option<u64>,
    children: Children,
) -> impl IntoView {
    let config = use_ui_config();
    let options = placement_options(
        config.tooltip_floating,
        side,
        align,
        side_offset,
        None,
        collision_padding,
    );
    let delays = TooltipDelays {
        open_delay_ms: open_delay_ms.unwrap_or(config.tooltip.open_delay_ms),
        close_delay_ms: close_delay_ms.unwrap_or(config.tooltip.close_delay_ms),
    };
    let disclosure = use_disclosure(
        "tooltip",
        DisclosureProps {
            open,
            default_open,
            on_open_change,
            options: Signal::derive(move || options),
            auto_focus: false,
            dismiss_on_outside_pointer: false,
            trigger_parts: &[],
        },
    );
    let runtime = TooltipRuntime {
        intent: store_value(HoverIntent::new(delays)),
        pending: store_value(None),
        disclosure,
    };
    let floating = disclosure.floating;
    let is_open = disclosure.open;
    let label = Signal::derive(move || label.get());

    create_effect(move |_| {
        let open = is_open.get();
        let intent_open = runtime.intent.with_value(HoverIntent::is_open);
        if open && !intent_open {
            runtime.step(HoverIntent::show);
        } else if !open && intent_open {
            runtime.step(HoverIntent::dismiss);
        }
    });

    on_cleanup(move || {
        if runtime
            .intent
            .try_update_value(HoverIntent::unmount)
            .flatten()
            .is_some()
        {
            runtime.clear_pending();
        }
    });

    view! {
        <span
            id=floating.trigger_id()
            class=merge_layout_class("ui-tooltip-trigger", layout_class)
            aria-describedby=move || is_open.get().then(|| floating.content_id())
            data-ui-primitive="true"
            data-ui-kind="tooltip"
            data-state=move || open_token(is_open.get())
            on:pointerenter=move |_| runtime.step(HoverIntent::pointer_enter)
            on:pointerleave=move |_| runtime.step(HoverIntent::pointer_leave)
            on:focusin=move |_| runtime.step(HoverIntent::focus)
            on:focusout=move |_| runtime.step(HoverIntent::blur)
            on:pointerdown=move |_| runtime.step(HoverIntent::pointer_down)
        >
            {children()}
        </span>
        <Show when=move || is_open.get()>
            <Portal>
                <div
                    id=floating.content_id()
                    class="ui-tooltip-content"
                    role="tooltip"
                    style=move || floating.position().get().fixed_style()
                    data-ui-floating-layer="true"
                    data-ui-slot="content"
                    data-state=move || open_token(is_open.get())
                    data-side=options.side.token()
                    data-align=options.align.token()
                    on:pointerenter=move |_| runtime.step(HoverIntent::pointer_enter)
                    on:pointerleave=move |_| runtime.step(HoverIntent::pointer_leave)
                >
                    {move || label.get()}
                </div>
            </Portal>
        </Show>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn placement_props_override_configured_defaults() {
        let base = FloatingOptions::default();
        assert_eq!(placement_options(base, None, None, None, None, None), base);

        let options = placement_options(
            base,
            Some(Side::Right),
            Some(Align::End),
            Some(12.0),
            Some(-3.0),
            Some(-5.0),
        );
        assert_eq!(options.side, Side::Right);
        assert_eq!(options.align, Align::End);
        assert_eq!(options.side_offset, 12.0);
        assert_eq!(options.align_offset, -3.0);
        assert_eq!(options.collision_padding, 0.0);
    }

    #[test]
    fn backdrop_dismisses_only_outside_content() {
        assert_eq!(
            backdrop_dismissal(true, false),
            Some(OpenChangeReason::OutsidePointer)
        );
        assert_eq!(backdrop_dismissal(true, true), None);
        assert_eq!(backdrop_dismissal(false, false), None);
    }
}
