//! Month grid construction and keyboard movement for the calendar popover.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Rows rendered for every month so the popover height never changes while paging.
pub const GRID_WEEKS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// One cell of the month grid.
pub struct CalendarDay {
    /// Calendar date of the cell.
    pub date: NaiveDate,
    /// `false` for leading/trailing days of the neighbouring months.
    pub in_month: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Optional inclusive date limits.
pub struct CalendarBounds {
    /// Earliest selectable date.
    pub min: Option<NaiveDate>,
    /// Latest selectable date.
    pub max: Option<NaiveDate>,
}

impl CalendarBounds {
    /// Returns `true` when `date` is selectable.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min.map_or(true, |min| date >= min) && self.max.map_or(true, |max| date <= max)
    }

    /// Moves `date` inside the bounds.
    pub fn clamp(&self, date: NaiveDate) -> NaiveDate {
        let date = self.min.map_or(date, |min| date.max(min));
        self.max.map_or(date, |max| date.min(max))
    }
}

/// Weekday column order starting at `week_start`.
pub fn weekday_columns(week_start: Weekday) -> [Weekday; 7] {
    let mut day = week_start;
    std::array::from_fn(|_| {
        let current = day;
        day = day.succ();
        current
    })
}

/// Builds the six-week grid for `year`/`month`. Returns no rows for an invalid month.
pub fn month_grid(year: i32, month: u32, week_start: Weekday) -> Vec<[CalendarDay; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let lead = (first.weekday().num_days_from_monday() + 7 - week_start.num_days_from_monday()) % 7;
    let Some(grid_start) = first.checked_sub_days(Days::new(u64::from(lead))) else {
        return Vec::new();
    };

    let mut rows = Vec::with_capacity(GRID_WEEKS);
    let mut cursor = grid_start;
    for _ in 0..GRID_WEEKS {
        let mut row = [CalendarDay {
            date: cursor,
            in_month: false,
        }; 7];
        for cell in &mut row {
            *cell = CalendarDay {
                date: cursor,
                in_month: cursor.month() == month && cursor.year() == year,
            };
            cursor = cursor.succ_opt().unwrap_or(cursor);
        }
        rows.push(row);
    }
    rows
}

/// Returns `(year, month)` shifted by `delta` months.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Keyboard movement inside the grid.
pub enum CalendarKey {
    /// One day back.
    PrevDay,
    /// One day forward.
    NextDay,
    /// One week back.
    PrevWeek,
    /// One week forward.
    NextWeek,
    /// Same day in the previous month (clamped to month length).
    PrevMonth,
    /// Same day in the next month (clamped to month length).
    NextMonth,
    /// Same day one year back.
    PrevYear,
    /// Same day one year forward.
    NextYear,
    /// First day of the displayed week.
    WeekStart,
    /// Last day of the displayed week.
    WeekEnd,
}

impl CalendarKey {
    /// Maps a `KeyboardEvent.key` value and shift state to a movement.
    pub fn from_key(key: &str, shift: bool) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::PrevDay),
            "ArrowRight" => Some(Self::NextDay),
            "ArrowUp" => Some(Self::PrevWeek),
            "ArrowDown" => Some(Self::NextWeek),
            "PageUp" if shift => Some(Self::PrevYear),
            "PageDown" if shift => Some(Self::NextYear),
            "PageUp" => Some(Self::PrevMonth),
            "PageDown" => Some(Self::NextMonth),
            "Home" => Some(Self::WeekStart),
            "End" => Some(Self::WeekEnd),
            _ => None,
        }
    }
}

/// Moves the focused date and keeps it inside `bounds`.
pub fn navigate_calendar(
    date: NaiveDate,
    key: CalendarKey,
    week_start: Weekday,
    bounds: &CalendarBounds,
) -> NaiveDate {
    let weekday = date.weekday().num_days_from_monday();
    let offset_in_week = u64::from((weekday + 7 - week_start.num_days_from_monday()) % 7);
    let moved = match key {
        CalendarKey::PrevDay => date.checked_sub_days(Days::new(1)),
        CalendarKey::NextDay => date.checked_add_days(Days::new(1)),
        CalendarKey::PrevWeek => date.checked_sub_days(Days::new(7)),
        CalendarKey::NextWeek => date.checked_add_days(Days::new(7)),
        CalendarKey::PrevMonth => date.checked_sub_months(Months::new(1)),
        CalendarKey::NextMonth => date.checked_add_months(Months::new(1)),
        CalendarKey::PrevYear => date.checked_sub_months(Months::new(12)),
        CalendarKey::NextYear => date.checked_add_months(Months::new(12)),
        CalendarKey::WeekStart => date.checked_sub_days(Days::new(offset_in_week)),
        CalendarKey::WeekEnd => date.checked_add_days(Days::new(6 - offset_in_week)),
    };
    bounds.clamp(moved.unwrap_or(date))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn grid_starts_on_week_start_and_has_six_rows() {
        let rows = month_grid(2024, 2, Weekday::Sun);
        assert_eq!(rows.len(), GRID_WEEKS);
        assert_eq!(rows[0][0].date, date(2024, 1, 28));
        assert!(!rows[0][0].in_month);
        assert_eq!(rows[0][4].date, date(2024, 2, 1));
        assert!(rows[0][4].in_month);
        assert_eq!(rows[5][6].date, date(2024, 3, 9));
    }

    #[test]
    fn monday_week_start_shifts_leading_days() {
        let rows = month_grid(2024, 2, Weekday::Mon);
        assert_eq!(rows[0][0].date, date(2024, 1, 29));
        assert_eq!(rows[0][3].date, date(2024, 2, 1));
        assert_eq!(
            weekday_columns(Weekday::Mon)[6],
            Weekday::Sun
        );
    }

    #[test]
    fn invalid_month_has_no_rows() {
        assert!(month_grid(2024, 13, Weekday::Sun).is_empty());
    }

    #[test]
    fn month_shift_wraps_years() {
        assert_eq!(shift_month(2024, 1, -1), (2023, 12));
        assert_eq!(shift_month(2024, 12, 1), (2025, 1));
        assert_eq!(shift_month(2024, 5, -17), (2022, 12));
    }

    #[test]
    fn keyboard_movement_clamps_month_length_and_bounds() {
        let bounds = CalendarBounds::default();
        assert_eq!(
            navigate_calendar(date(2024, 1, 31), CalendarKey::NextMonth, Weekday::Sun, &bounds),
            date(2024, 2, 29)
        );
        assert_eq!(
            navigate_calendar(date(2024, 2, 29), CalendarKey::NextYear, Weekday::Sun, &bounds),
            date(2025, 2, 28)
        );

        let bounded = CalendarBounds {
            min: Some(date(2024, 3, 1)),
            max: Some(date(2024, 3, 31)),
        };
        assert_eq!(
            navigate_calendar(date(2024, 3, 3), CalendarKey::PrevWeek, Weekday::Sun, &bounded),
            date(2024, 3, 1)
        );
        assert!(!bounded.contains(date(2024, 4, 1)));
    }

    #[test]
    fn home_and_end_follow_week_start() {
        let bounds = CalendarBounds::default();
        let wednesday = date(2024, 3, 6);
        assert_eq!(
            navigate_calendar(wednesday, CalendarKey::WeekStart, Weekday::Sun, &bounds),
            date(2024, 3, 3)
        );
        assert_eq!(
            navigate_calendar(wednesday, CalendarKey::WeekEnd, Weekday::Mon, &bounds),
            date(2024, 3, 10)
        );
    }

    #[test]
    fn key_mapping_honors_shift() {
        assert_eq!(CalendarKey::from_key("PageUp", true), Some(CalendarKey::PrevYear));
        assert_eq!(CalendarKey::from_key("PageUp", false), Some(CalendarKey::PrevMonth));
        assert_eq!(CalendarKey::from_key("x", false), None);
    }
}
