use system_ui_headless::{
    Align, FloatingOptions, ListNavigator, NavKey, OpenChangeReason, SelectSide, Typeahead,
};

use super::*;
use crate::config::use_ui_config;
use crate::controllable::use_controllable;
use crate::dom::now_ms;
use crate::floating::{use_disclosure, DisclosureProps};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One choice offered by a [`Select`].
pub struct SelectOption {
    /// Value reported through `on_value_change`.
    pub value: String,
    /// Visible label, also matched by typeahead.
    pub label: String,
    /// Disabled options are skipped by keyboard navigation and cannot be committed.
    pub disabled: bool,
}

impl SelectOption {
    /// Enabled option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Marks the option as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

fn selected_index(options: &[SelectOption], value: Option<&str>) -> Option<usize> {
    let value = value?;
    options.iter().position(|option| option.value == value)
}

fn navigator_for(options: &[SelectOption], value: Option<&str>) -> ListNavigator {
    ListNavigator::new(
        options.iter().map(|option| option.disabled).collect(),
        selected_index(options, value),
    )
}

/// Listbox placement: start-aligned on the requested vertical side.
fn select_floating_options(side: SelectSide, side_offset: f64, padding: f64) -> FloatingOptions {
    FloatingOptions {
        side: side.into(),
        align: Align::Start,
        side_offset,
        align_offset: 0.0,
        collision_padding: padding,
    }
}

fn option_id(content_id: &str, index: usize) -> String {
    format!("{content_id}-option-{index}")
}

fn typeahead_char(ev: &KeyboardEvent) -> Option<char> {
    if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
        return None;
    }
    let key = ev.key();
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if !ch.is_whitespace() => Some(ch),
        _ => None,
    }
}

#[component]
/// Single-value select rendered as a combobox trigger and a positioned listbox.
pub fn Select(
    #[prop(optional)] layout_class: Option<&'static str>,
    /// Choices, in display order.
    #[prop(into)]
    options: MaybeSignal<Vec<SelectOption>>,
    /// Consumer-owned selected value.
    #[prop(optional, into)]
    value: Option<MaybeSignal<Option<String>>>,
    #[prop(optional)] default_value: Option<String>,
    #[prop(optional)] on_value_change: Option<Callback<String>>,
    #[prop(optional, into)] open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    #[prop(optional)] side: SelectSide,
    #[prop(optional)] side_offset: Option<f64>,
    #[prop(optional)] collision_padding: Option<f64>,
    #[prop(optional, into)] placeholder: MaybeSignal<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    /// Form field name; renders a hidden input carrying the value.
    #[prop(optional, into)]
    name: Option<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
) -> impl IntoView {
    let config = use_ui_config();
    let placement = select_floating_options(
        side,
        side_offset.unwrap_or(config.floating.side_offset),
        collision_padding
            .unwrap_or(config.floating.collision_padding)
            .max(0.0),
    );
    let options = Signal::derive(move || options.get());
    let on_change = on_value_change.map(|on_value_change| {
        Callback::new(move |next: Option<String>| {
            if let Some(next) = next {
                on_value_change.call(next);
            }
        })
    });
    let (value, request_value) = use_controllable(value, default_value, on_change);
    let disclosure = use_disclosure(
        "select",
        DisclosureProps {
            open,
            default_open,
            on_open_change,
            options: Signal::derive(move || placement),
            auto_focus: true,
            dismiss_on_outside_pointer: true,
            trigger_parts: &[],
        },
    );
    let floating = disclosure.floating;
    let is_open = disclosure.open;
    let navigator = create_rw_signal(ListNavigator::default());
    let typeahead = store_value(Typeahead::new(config.typeahead_reset_ms));
    let highlighted = move || navigator.with(ListNavigator::highlighted);

    create_effect(move |_| {
        if is_open.get() {
            let current = value.get_untracked();
            let fresh =
                options.with_untracked(|options| navigator_for(options, current.as_deref()));
            navigator.set(fresh);
            typeahead.set_value(Typeahead::new(config.typeahead_reset_ms));
        }
    });

    let selected_label = move || {
        let current = value.get()?;
        options.with(|options| {
            options
                .iter()
                .find(|option| option.value == current)
                .map(|option| option.label.clone())
        })
    };

    let commit = move |index: usize| {
        let Some(option) = options.with_untracked(|options| options.get(index).cloned()) else {
            return;
        };
        if option.disabled {
            return;
        }
        request_value.call(Some(option.value));
        disclosure.close(OpenChangeReason::SelectionCommit);
    };

    let on_trigger_keydown = Callback::new(move |ev: KeyboardEvent| {
        if disabled.get_untracked() || is_open.get_untracked() {
            return;
        }
        if matches!(ev.key().as_str(), "ArrowDown" | "ArrowUp" | "Enter" | " ") {
            ev.prevent_default();
            disclosure.set_open(true, OpenChangeReason::Trigger);
        }
    });

    let on_listbox_keydown = move |ev: KeyboardEvent| {
        if ev.default_prevented() {
            return;
        }
        let key = ev.key();
        if let Some(nav_key) = NavKey::from_key(&key) {
            ev.prevent_default();
            navigator.update(|navigator| {
                navigator.apply(nav_key);
            });
            return;
        }
        match key.as_str() {
            "Enter" | " " => {
                ev.prevent_default();
                if let Some(index) = navigator.with_untracked(ListNavigator::highlighted) {
                    commit(index);
                }
            }
            "Escape" => {
                ev.prevent_default();
                disclosure.close(OpenChangeReason::EscapeKey);
            }
            "Tab" => ev.prevent_default(),
            _ => {
                let Some(ch) = typeahead_char(&ev) else {
                    return;
                };
                let Some(query) = typeahead
                    .try_update_value(|typeahead| typeahead.push(ch, now_ms()).to_string())
                else {
                    return;
                };
                let labels = options.with_untracked(|options| {
                    options.iter().map(|option| option.label.clone()).collect::<Vec<_>>()
                });
                navigator.update(|navigator| {
                    if let Some(index) = Typeahead::find(&query, &labels, navigator) {
                        navigator.highlight(index);
                    }
                });
            }
        }
    };

    let option_rows = move || {
        let current = value.get();
        let content_id = floating.content_id();
        options
            .get()
            .into_iter()
            .enumerate()
            .map(|(index, option)| {
                let selected = current.as_deref() == Some(option.value.as_str());
                let option_disabled = option.disabled;
                view! {
                    <li
                        id=option_id(&content_id, index)
                        class="ui-select-option"
                        role="option"
                        aria-selected=bool_token(selected)
                        aria-disabled=bool_token(option_disabled)
                        data-state=checked_token(selected)
                        data-disabled=bool_token(option_disabled)
                        data-highlighted=move || bool_token(highlighted() == Some(index))
                        on:pointermove=move |_| {
                            if navigator.with_untracked(ListNavigator::highlighted) != Some(index) {
                                navigator.update(|navigator| {
                                    navigator.highlight(index);
                                });
                            }
                        }
                        on:click=move |_| commit(index)
                    >
                        {option.label}
                    </li>
                }
            })
            .collect_view()
    };

    view! {
        <div
            class=merge_layout_class("ui-select", layout_class)
            data-ui-primitive="true"
            data-ui-kind="select"
            data-state=move || open_token(is_open.get())
            data-disabled=move || bool_token(disabled.get())
        >
            <Button
                id=floating.trigger_id()
                role="combobox"
                aria_label=aria_label
                aria_controls=floating.content_id()
                aria_haspopup="listbox".to_string()
                aria_expanded=is_open
                data_state=Signal::derive(move || open_token(is_open.get()).to_string())
                disabled=disabled
                ui_slot="trigger"
                on_click=Callback::new(move |_| {
                    if !disabled.get_untracked() {
                        disclosure.toggle();
                    }
                })
                on_keydown=on_trigger_keydown
            >
                <span
                    data-ui-slot="value"
                    data-placeholder=move || selected_label().is_none().then_some("true")
                >
                    {move || selected_label().unwrap_or_else(|| placeholder.get())}
                </span>
            </Button>
            {name.map(|name| view! {
                <input type="hidden" name=name prop:value=move || value.get().unwrap_or_default() />
            })}
            <Show when=move || is_open.get()>
                <Portal>
                    <ul
                        id=floating.content_id()
                        class="ui-select-content"
                        role="listbox"
                        tabindex="-1"
                        aria-labelledby=floating.trigger_id()
                        aria-activedescendant=move || {
                            highlighted().map(|index| option_id(&floating.content_id(), index))
                        }
                        style=move || floating.position().get().fixed_style()
                        data-ui-floating-layer="true"
                        data-ui-slot="content"
                        data-state=move || open_token(is_open.get())
                        data-side=placement.side.token()
                        data-align=placement.align.token()
                        on:keydown=on_listbox_keydown
                    >
                        {option_rows}
                    </ul>
                </Portal>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use system_ui_headless::{resolve_position, resolve_select_position, Rect, ViewportSize};

    use super::*;

    fn fruit() -> Vec<SelectOption> {
        vec![
            SelectOption::new("apple", "Apple"),
            SelectOption::new("banana", "Banana").disabled(),
            SelectOption::new("cherry", "Cherry"),
        ]
    }

    #[test]
    fn navigator_starts_on_selected_enabled_option() {
        let options = fruit();
        assert_eq!(navigator_for(&options, Some("cherry")).highlighted(), Some(2));
        assert_eq!(navigator_for(&options, Some("banana")).highlighted(), Some(0));
        assert_eq!(navigator_for(&options, Some("missing")).highlighted(), Some(0));
        assert_eq!(navigator_for(&options, None).highlighted(), Some(0));
    }

    #[test]
    fn listbox_placement_matches_select_resolver() {
        let trigger = Rect::from_origin_size(300.0, 100.0, 120.0, 32.0);
        let content = Rect::from_origin_size(0.0, 0.0, 200.0, 160.0);
        let viewport = ViewportSize {
            width: 800.0,
            height: 600.0,
        };
        for side in [SelectSide::Top, SelectSide::Bottom] {
            let options = select_floating_options(side, 4.0, 8.0);
            assert_eq!(
                resolve_position(&trigger, &content, viewport, &options),
                resolve_select_position(&trigger, &content, viewport, side, 4.0, 8.0)
            );
        }
    }

    #[test]
    fn option_ids_are_scoped_to_listbox() {
        assert_eq!(option_id("ui-select-3-content", 2), "ui-select-3-content-option-2");
        assert_eq!(selected_index(&fruit(), Some("cherry")), Some(2));
        assert_eq!(selected_index(&fruit(), None), None);
    }
}
