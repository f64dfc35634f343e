use super::*;

use crate::controllable::use_controllable;

#[component]
/// Shared button primitive with standardized states and ARIA wiring for popup triggers.
pub fn Button(
    #[prop(default = ButtonVariant::Standard)] variant: ButtonVariant,
    #[prop(default = ButtonSize::Md)] size: ButtonSize,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] role: Option<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional, into)] aria_controls: MaybeSignal<String>,
    #[prop(optional, into)] aria_expanded: MaybeSignal<bool>,
    #[prop(optional, into)] aria_haspopup: MaybeSignal<String>,
    #[prop(optional, into)] aria_describedby: MaybeSignal<String>,
    #[prop(optional, into)] data_state: MaybeSignal<String>,
    #[prop(optional, into)] title: MaybeSignal<String>,
    #[prop(optional)] tabindex: Option<i32>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] selected: MaybeSignal<bool>,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    #[prop(optional)] on_keydown: Option<Callback<KeyboardEvent>>,
    #[prop(optional)] on_focus: Option<Callback<FocusEvent>>,
    #[prop(optional)] on_blur: Option<Callback<FocusEvent>>,
    #[prop(optional)] on_pointerenter: Option<Callback<web_sys::PointerEvent>>,
    #[prop(optional)] on_pointerleave: Option<Callback<web_sys::PointerEvent>>,
    children: Children,
) -> impl IntoView {
    let class = merge_layout_class("ui-button", layout_class);
    let non_empty = |value: String| (!value.is_empty()).then_some(value);
    let aria_haspopup_for_expanded = aria_haspopup.clone();
    view! {
        <button
            type="button"
            class=class
            id=id
            role=role
            aria-label=move || non_empty(aria_label.get())
            aria-controls=move || non_empty(aria_controls.get())
            aria-expanded=move || {
                aria_haspopup_for_expanded
                    .with(|popup| !popup.is_empty())
                    .then(|| bool_token(aria_expanded.get()))
            }
            aria-haspopup=move || non_empty(aria_haspopup.get())
            aria-describedby=move || non_empty(aria_describedby.get())
            data-state=move || non_empty(data_state.get())
            title=move || non_empty(title.get())
            tabindex=tabindex
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="button"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-size=size.token()
            data-ui-selected=move || bool_token(selected.get())
            data-ui-disabled=move || bool_token(disabled.get())
            on:click=move |ev| {
                if let Some(on_click) = on_click.as_ref() {
                    on_click.call(ev);
                }
            }
            on:keydown=move |ev| {
                if let Some(on_keydown) = on_keydown.as_ref() {
                    on_keydown.call(ev);
                }
            }
            on:focus=move |ev| {
                if let Some(on_focus) = on_focus.as_ref() {
                    on_focus.call(ev);
                }
            }
            on:blur=move |ev| {
                if let Some(on_blur) = on_blur.as_ref() {
                    on_blur.call(ev);
                }
            }
            on:pointerenter=move |ev| {
                if let Some(on_pointerenter) = on_pointerenter.as_ref() {
                    on_pointerenter.call(ev);
                }
            }
            on:pointerleave=move |ev| {
                if let Some(on_pointerleave) = on_pointerleave.as_ref() {
                    on_pointerleave.call(ev);
                }
            }
        >
            {children()}
        </button>
    }
}

#[component]
/// Shared text input primitive.
pub fn TextField(
    #[prop(default = FieldVariant::Standard)] variant: FieldVariant,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] title: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional, into)] aria_controls: MaybeSignal<String>,
    #[prop(optional, into)] aria_expanded: MaybeSignal<bool>,
    #[prop(optional, into)] aria_haspopup: Option<&'static str>,
    #[prop(optional)] node_ref: NodeRef<html::Input>,
    #[prop(optional)] autocomplete: Option<&'static str>,
    #[prop(optional)] spellcheck: Option<bool>,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_input: Option<Callback<web_sys::Event>>,
    #[prop(optional)] on_keydown: Option<Callback<KeyboardEvent>>,
    #[prop(optional)] on_focus: Option<Callback<FocusEvent>>,
    #[prop(optional)] on_blur: Option<Callback<FocusEvent>>,
) -> impl IntoView {
    view! {
        <input
            class=merge_layout_class("ui-field", layout_class)
            id=id
            title=title
            placeholder=placeholder
            aria-label=aria_label
            aria-controls=move || aria_haspopup.map(|_| aria_controls.get())
            aria-expanded=move || aria_haspopup.map(|_| bool_token(aria_expanded.get()))
            aria-haspopup=aria_haspopup
            node_ref=node_ref
            autocomplete=autocomplete
            spellcheck=spellcheck
            type=input_type.unwrap_or("text")
            prop:value=move || value.get()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="text-field"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-disabled=move || bool_token(disabled.get())
            on:input=move |ev| {
                if let Some(on_input) = on_input.as_ref() {
                    on_input.call(ev);
                }
            }
            on:keydown=move |ev| {
                if let Some(on_keydown) = on_keydown.as_ref() {
                    on_keydown.call(ev);
                }
            }
            on:focus=move |ev| {
                if let Some(on_focus) = on_focus.as_ref() {
                    on_focus.call(ev);
                }
            }
            on:blur=move |ev| {
                if let Some(on_blur) = on_blur.as_ref() {
                    on_blur.call(ev);
                }
            }
        />
    }
}

#[component]
/// Switch with explicit `role="switch"` semantics and controlled/uncontrolled `checked`.
pub fn Switch(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    /// Consumer-owned checked state. When set, the switch only reports toggles.
    #[prop(optional, into)]
    checked: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_checked: bool,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_checked_change: Option<Callback<bool>>,
) -> impl IntoView {
    let (checked, request_checked) = use_controllable(checked, default_checked, on_checked_change);
    let handle_toggle = move || {
        if disabled.get_untracked() {
            return;
        }
        request_checked.call(!checked.get_untracked());
    };

    view! {
        <button
            type="button"
            class=merge_layout_class("ui-switch", layout_class)
            id=id
            role="switch"
            aria-label=move || aria_label.get()
            aria-checked=move || bool_token(checked.get())
            disabled=move || disabled.get()
            data-state=move || checked_token(checked.get())
            data-ui-primitive="true"
            data-ui-kind="switch"
            data-ui-slot=ui_slot
            data-ui-disabled=move || bool_token(disabled.get())
            on:click=move |_| handle_toggle()
        >
            <span data-ui-slot="track" data-state=move || checked_token(checked.get())>
                <span data-ui-slot="thumb"></span>
            </span>
        </button>
    }
}
