use std::time::Duration;

use chrono::{Datelike, Month, NaiveDate};
use leptos::leptos_dom::helpers::TimeoutHandle;
use system_ui_headless::{
    month_grid, navigate_calendar, weekday_columns, Align, CalendarBounds, CalendarDay,
    CalendarKey, DateCommit, DateInputError, DateInputState, OpenChangeReason, Side,
    ZonedTimestamp,
};

use super::overlays::placement_options;
use super::*;
use crate::config::use_ui_config;
use crate::controllable::use_controllable;
use crate::dom::{clear_timer, focus_element_by_id, now_ms};
use crate::floating::{use_disclosure, DisclosureProps};

const TOGGLE_PART: &str = "toggle";

fn date_placeholder(with_time: bool) -> &'static str {
    if with_time {
        "YYYY-MM-DD HH:MM"
    } else {
        "YYYY-MM-DD"
    }
}

fn day_id(content_id: &str, date: NaiveDate) -> String {
    format!("{content_id}-day-{date}")
}

fn month_caption(year: i32, month: u32) -> String {
    match u8::try_from(month).ok().and_then(|month| Month::try_from(month).ok()) {
        Some(name) => format!("{} {year}", name.name()),
        None => format!("{year}-{month:02}"),
    }
}

/// Day focused when the grid opens: the committed date, else today, kept inside `bounds`.
fn initial_focus(
    committed: Option<NaiveDate>,
    today: NaiveDate,
    bounds: &CalendarBounds,
) -> NaiveDate {
    bounds.clamp(committed.unwrap_or(today))
}

/// Value produced by picking `date` in the grid. A committed value keeps its wall-clock time.
fn value_for_date(
    committed: Option<&ZonedTimestamp>,
    date: NaiveDate,
    timezone: &str,
) -> Result<ZonedTimestamp, DateInputError> {
    match committed {
        Some(value) => value.with_date(date),
        None => {
            let midnight = date
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| DateInputError::Unrecognized(date.to_string()))?;
            ZonedTimestamp::from_local(midnight, timezone)
        }
    }
}

#[derive(Clone, Copy)]
struct DateField {
    state: StoredValue<DateInputState>,
    text: RwSignal<String>,
    debounce: StoredValue<Option<TimeoutHandle>>,
}

impl DateField {
    fn clear_debounce(self) {
        clear_timer(self.debounce);
    }

    fn sync(self, value: Option<ZonedTimestamp>) {
        let Some(cancelled) = self
            .state
            .try_update_value(|state| state.sync_committed(value))
        else {
            return;
        };
        if cancelled.is_some() {
            self.clear_debounce();
        }
        self.publish_text();
    }

    fn publish_text(self) {
        if let Some(text) = self.state.try_with_value(|state| state.text().to_string()) {
            if self.text.get_untracked() != text {
                let _ = self.text.try_set(text);
            }
        }
    }
}

#[component]
/// Text date input with a calendar popover, producing timezone-aware values.
pub fn CalendarInput(
    #[prop(optional)] layout_class: Option<&'static str>,
    /// Consumer-owned value.
    #[prop(optional, into)]
    value: Option<MaybeSignal<Option<ZonedTimestamp>>>,
    #[prop(optional)] default_value: Option<ZonedTimestamp>,
    #[prop(optional)] on_value_change: Option<Callback<Option<ZonedTimestamp>>>,
    /// IANA zone used for parsing and display. Defaults to the configured zone.
    #[prop(optional, into)]
    timezone: Option<MaybeSignal<String>>,
    /// Show and accept `HH:MM` after the date.
    #[prop(optional)]
    with_time: bool,
    #[prop(optional)] min: Option<NaiveDate>,
    #[prop(optional)] max: Option<NaiveDate>,
    #[prop(optional, into)] open: Option<MaybeSignal<bool>>,
    #[prop(optional)] default_open: bool,
    #[prop(optional)] on_open_change: Option<Callback<bool>>,
    #[prop(optional)] side: Option<Side>,
    #[prop(optional)] align: Option<Align>,
    #[prop(optional)] side_offset: Option<f64>,
    #[prop(optional)] collision_padding: Option<f64>,
    #[prop(optional)] debounce_ms: Option<u64>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
) -> impl IntoView {
    let config = use_ui_config();
    let week_start = config.week_start;
    let bounds = CalendarBounds { min, max };
    let debounce = Duration::from_millis(debounce_ms.unwrap_or(config.date_input_debounce_ms));
    let options = placement_options(
        config.floating,
        side,
        Some(align.unwrap_or(Align::Start)),
        side_offset,
        None,
        collision_padding,
    );
    let fallback_zone = config.default_timezone.clone();
    let zone = Signal::derive(move || {
        timezone
            .as_ref()
            .map(|timezone| timezone.get())
            .unwrap_or_else(|| fallback_zone.clone())
    });

    let (value, request_value) = use_controllable(value, default_value, on_value_change);
    let disclosure = use_disclosure(
        "calendar",
        DisclosureProps {
            open,
            default_open,
            on_open_change,
            options: Signal::derive(move || options),
            auto_focus: true,
            dismiss_on_outside_pointer: true,
            trigger_parts: &[TOGGLE_PART],
        },
    );
    let floating = disclosure.floating;
    let is_open = disclosure.open;

    let initial_zone = zone.get_untracked();
    if let Err(err) = ZonedTimestamp::from_timestamp_ms(0, &initial_zone) {
        logging::warn!("calendar input timezone failed: {err}");
    }
    let initial_state = DateInputState::new(value.get_untracked(), &initial_zone, with_time);
    let field = DateField {
        text: create_rw_signal(initial_state.text().to_string()),
        state: store_value(initial_state),
        debounce: store_value(None),
    };

    let apply_commit = move |commit: DateCommit| {
        match commit {
            DateCommit::Committed(next) => request_value.call(Some(next)),
            DateCommit::Cleared => request_value.call(None),
            DateCommit::Unchanged => {}
            DateCommit::Reverted { error, .. } => {
                logging::warn!("calendar input parse failed: {error}");
            }
        }
        // Controlled owners may reject the change; always show what they hold.
        field.sync(value.get_untracked());
    };

    create_effect(move |_| {
        let current = value.get();
        field.sync(current);
    });

    create_effect(move |previous: Option<String>| {
        let timezone = zone.get();
        if previous.is_some_and(|previous| previous != timezone) {
            if let Err(err) = ZonedTimestamp::from_timestamp_ms(0, &timezone) {
                logging::warn!("calendar input timezone failed: {err}");
            }
            field.state.update_value(|state| state.set_timezone(&timezone));
            let converted = field.state.with_value(|state| state.committed().cloned());
            if converted != value.get_untracked() {
                request_value.call(converted);
            }
            field.sync(value.get_untracked());
        }
        timezone
    });

    // Moves focus to a day button once a paged grid has re-rendered.
    let day_focus = store_value(None::<TimeoutHandle>);

    on_cleanup(move || {
        let _ = field.state.try_update_value(DateInputState::cancel);
        field.clear_debounce();
        clear_timer(day_focus);
    });

    let on_input = Callback::new(move |ev: web_sys::Event| {
        let text = event_target_value(&ev);
        field.text.set(text.clone());
        let Some((token, superseded)) = field.state.try_update_value(|state| state.input(&text))
        else {
            return;
        };
        if superseded.is_some() {
            field.clear_debounce();
        }
        match set_timeout_with_handle(
            move || {
                let _ = field.debounce.try_set_value(None);
                if let Some(Some(commit)) = field
                    .state
                    .try_update_value(|state| state.debounce_fired(token))
                {
                    apply_commit(commit);
                }
            },
            debounce,
        ) {
            Ok(handle) => field.debounce.set_value(Some(handle)),
            Err(err) => logging::warn!("calendar input debounce schedule failed: {err:?}"),
        }
    });

    let commit_now = move || {
        let Some((commit, cancelled)) = field.state.try_update_value(DateInputState::commit_now)
        else {
            return;
        };
        if cancelled.is_some() {
            field.clear_debounce();
        }
        apply_commit(commit);
    };

    let on_keydown = Callback::new(move |ev: KeyboardEvent| match ev.key().as_str() {
        "Enter" => {
            ev.prevent_default();
            commit_now();
        }
        "ArrowDown" if ev.alt_key() => {
            ev.prevent_default();
            disclosure.set_open(true, OpenChangeReason::Trigger);
        }
        _ => {}
    });

    let today = move || {
        ZonedTimestamp::from_timestamp_ms(now_ms() as i64, &zone.get_untracked())
            .ok()
            .and_then(|now| now.date())
            .unwrap_or_default()
    };
    let first_focus = initial_focus(None, today(), &bounds);
    let focused = create_rw_signal(first_focus);
    let view_month = create_rw_signal((first_focus.year(), first_focus.month()));

    let focus_date = move |date: NaiveDate| {
        focused.set(date);
        view_month.set((date.year(), date.month()));
    };

    create_effect(move |_| {
        if !is_open.get() {
            clear_timer(day_focus);
            return;
        }
        let committed = value.with_untracked(|value| value.as_ref().and_then(ZonedTimestamp::date));
        focus_date(initial_focus(committed, today(), &bounds));
    });

    let select_date = move |date: NaiveDate| {
        if !bounds.contains(date) {
            return;
        }
        let timezone = zone.get_untracked();
        let picked = value.with_untracked(|value| value_for_date(value.as_ref(), date, &timezone));
        match picked {
            Ok(next) => {
                request_value.call(Some(next));
                field.sync(value.get_untracked());
                disclosure.close(OpenChangeReason::SelectionCommit);
            }
            Err(err) => logging::warn!("calendar date pick failed: {err}"),
        }
    };

    let on_grid_keydown = move |ev: KeyboardEvent| {
        let Some(key) = CalendarKey::from_key(&ev.key(), ev.shift_key()) else {
            return;
        };
        ev.prevent_default();
        let next = navigate_calendar(focused.get_untracked(), key, week_start, &bounds);
        focus_date(next);
        let target = day_id(&floating.content_id(), next);
        clear_timer(day_focus);
        // The day button for a new month only exists after the grid re-renders.
        match set_timeout_with_handle(
            move || {
                let _ = day_focus.try_set_value(None);
                let _ = focus_element_by_id(&target);
            },
            Duration::from_millis(0),
        ) {
            Ok(handle) => day_focus.set_value(Some(handle)),
            Err(err) => logging::warn!("calendar focus schedule failed: {err:?}"),
        }
    };

    let page = move |key: CalendarKey| {
        focus_date(navigate_calendar(focused.get_untracked(), key, week_start, &bounds));
    };

    let day_cell = move |content_id: &str, day: CalendarDay| {
        let date = day.date;
        let enabled = bounds.contains(date);
        let is_focused = move || focused.get() == date;
        let is_selected = move || {
            value.with(|value| value.as_ref().and_then(ZonedTimestamp::date) == Some(date))
        };
        view! {
            <td role="gridcell" aria-selected=move || bool_token(is_selected())>
                <button
                    type="button"
                    id=day_id(content_id, date)
                    class="ui-calendar-day"
                    tabindex=move || if is_focused() { "0" } else { "-1" }
                    disabled=!enabled
                    aria-disabled=bool_token(!enabled)
                    aria-label=date.format("%A, %B %-d, %Y").to_string()
                    data-ui-autofocus=move || bool_token(is_focused())
                    data-state=move || checked_token(is_selected())
                    data-outside-month=bool_token(!day.in_month)
                    on:click=move |_| select_date(date)
                >
                    {date.day()}
                </button>
            </td>
        }
    };

    let grid_rows = move || {
        let (year, month) = view_month.get();
        let content_id = floating.content_id();
        month_grid(year, month, week_start)
            .into_iter()
            .map(|week| {
                let cells = week
                    .into_iter()
                    .map(|day| day_cell(&content_id, day))
                    .collect_view();
                view! { <tr>{cells}</tr> }
            })
            .collect_view()
    };

    view! {
        <div
            class=merge_layout_class("ui-calendar-input", layout_class)
            data-ui-primitive="true"
            data-ui-kind="calendar-input"
            data-state=move || open_token(is_open.get())
        >
            <TextField
                id=floating.trigger_id()
                placeholder=placeholder.unwrap_or_else(|| date_placeholder(with_time).to_string())
                aria_label=aria_label.unwrap_or_default()
                aria_controls=floating.content_id()
                aria_expanded=is_open
                aria_haspopup="dialog"
                autocomplete="off"
                spellcheck=false
                ui_slot="input"
                value=field.text
                disabled=disabled
                on_input=on_input
                on_keydown=on_keydown
                on_blur=Callback::new(move |_| commit_now())
            />
            <Button
                id=floating.part_id(TOGGLE_PART)
                variant=ButtonVariant::Quiet
                size=ButtonSize::Sm
                aria_label="Choose date".to_string()
                aria_controls=floating.content_id()
                aria_haspopup="dialog".to_string()
                aria_expanded=is_open
                disabled=disabled
                ui_slot="calendar-toggle"
                on_click=Callback::new(move |_| disclosure.toggle())
            >
                <span data-ui-slot="icon" aria-hidden="true"></span>
            </Button>
            <Show when=move || is_open.get()>
                <Portal>
                    <div
                        id=floating.content_id()
                        class="ui-calendar-content"
                        role="dialog"
                        aria-modal="false"
                        aria-label=move || {
                            let (year, month) = view_month.get();
                            month_caption(year, month)
                        }
                        style=move || floating.position().get().fixed_style()
                        data-ui-floating-layer="true"
                        data-ui-slot="content"
                        data-state=move || open_token(is_open.get())
                        data-side=options.side.token()
                        data-align=options.align.token()
                    >
                        <div data-ui-slot="header">
                            <Button
                                variant=ButtonVariant::Quiet
                                size=ButtonSize::Sm
                                aria_label="Previous month".to_string()
                                ui_slot="previous-month"
                                on_click=Callback::new(move |_| page(CalendarKey::PrevMonth))
                            >
                                "‹"
                            </Button>
                            <span data-ui-slot="caption" aria-live="polite">
                                {move || {
                                    let (year, month) = view_month.get();
                                    month_caption(year, month)
                                }}
                            </span>
                            <Button
                                variant=ButtonVariant::Quiet
                                size=ButtonSize::Sm
                                aria_label="Next month".to_string()
                                ui_slot="next-month"
                                on_click=Callback::new(move |_| page(CalendarKey::NextMonth))
                            >
                                "›"
                            </Button>
                        </div>
                        <table role="grid" data-ui-slot="grid" on:keydown=on_grid_keydown>
                            <thead>
                                <tr>
                                    {weekday_columns(week_start)
                                        .into_iter()
                                        .map(|weekday| view! {
                                            <th scope="col" abbr=weekday.to_string()>
                                                {weekday.to_string()}
                                            </th>
                                        })
                                        .collect_view()}
                                </tr>
                            </thead>
                            <tbody>{grid_rows}</tbody>
                        </table>
                    </div>
                </Portal>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn captions_name_the_month() {
        assert_eq!(month_caption(2024, 3), "March 2024");
        assert_eq!(month_caption(2024, 13), "2024-13");
    }

    #[test]
    fn initial_focus_prefers_committed_date_within_bounds() {
        let bounds = CalendarBounds {
            min: Some(date(2024, 3, 1)),
            max: Some(date(2024, 3, 31)),
        };
        let today = date(2024, 3, 15);
        assert_eq!(initial_focus(Some(date(2024, 3, 9)), today, &bounds), date(2024, 3, 9));
        assert_eq!(initial_focus(None, today, &bounds), today);
        assert_eq!(initial_focus(Some(date(2024, 5, 1)), today, &bounds), date(2024, 3, 31));
    }

    #[test]
    fn picking_a_day_keeps_wall_clock_time_of_the_value() {
        let committed = ZonedTimestamp::from_local(
            date(2024, 1, 15).and_hms_opt(9, 30, 0).expect("time"),
            "America/New_York",
        )
        .expect("value");
        let picked =
            value_for_date(Some(&committed), date(2024, 7, 1), "America/New_York").expect("pick");
        assert_eq!(picked.iso, "2024-07-01T09:30:00-04:00");

        let fresh = value_for_date(None, date(2024, 7, 1), "UTC").expect("pick");
        assert_eq!(fresh.timestamp, 1_719_792_000_000);
    }

    #[test]
    fn day_ids_embed_iso_date() {
        assert_eq!(
            day_id("ui-calendar-2-content", date(2024, 3, 5)),
            "ui-calendar-2-content-day-2024-03-05"
        );
        assert_eq!(date_placeholder(true), "YYYY-MM-DD HH:MM");
    }
}
