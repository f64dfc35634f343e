//! Timezone-aware date value emitted by the calendar input, plus typed-input parsing.
//!
//! The wire value is [`ZonedTimestamp`]: a unix millisecond timestamp together with the IANA
//! zone it was entered in, the numeric offset, the formatted offset, and an RFC 3339 string.

use chrono::{
    DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, SecondsFormat, TimeZone,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::DateInputError;
use crate::timers::{TimerSlot, TimerToken};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const ACCEPTED_DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Date value with enough zone information for lossless round-tripping.
pub struct ZonedTimestamp {
    /// Unix epoch milliseconds.
    pub timestamp: i64,
    /// IANA timezone name.
    pub timezone: String,
    /// UTC offset in minutes, positive east of Greenwich.
    pub offset_minutes: i32,
    /// Offset formatted as `+HH:MM` / `-HH:MM`.
    pub offset: String,
    /// RFC 3339 timestamp carrying the explicit offset.
    pub iso: String,
}

fn parse_timezone(timezone: &str) -> Result<Tz, DateInputError> {
    timezone
        .parse::<Tz>()
        .map_err(|_| DateInputError::UnknownTimezone(timezone.to_string()))
}

/// Formats a minute offset as `+HH:MM` or `-HH:MM`.
pub fn format_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes < 0 { '-' } else { '+' };
    let magnitude = offset_minutes.unsigned_abs();
    format!("{sign}{:02}:{:02}", magnitude / 60, magnitude % 60)
}

impl ZonedTimestamp {
    fn from_datetime(datetime: DateTime<Tz>, timezone: &str) -> Self {
        let offset_minutes = datetime.offset().fix().local_minus_utc() / 60;
        Self {
            timestamp: datetime.timestamp_millis(),
            timezone: timezone.to_string(),
            offset_minutes,
            offset: format_offset(offset_minutes),
            iso: datetime.to_rfc3339_opts(SecondsFormat::Secs, false),
        }
    }

    /// Builds the value for an instant viewed in `timezone`.
    ///
    /// # Errors
    ///
    /// Returns [`DateInputError::UnknownTimezone`] for an unknown zone name and
    /// [`DateInputError::Unrecognized`] when the timestamp is out of range.
    pub fn from_timestamp_ms(timestamp: i64, timezone: &str) -> Result<Self, DateInputError> {
        let tz = parse_timezone(timezone)?;
        let utc = DateTime::from_timestamp_millis(timestamp)
            .ok_or_else(|| DateInputError::Unrecognized(timestamp.to_string()))?;
        Ok(Self::from_datetime(utc.with_timezone(&tz), timezone))
    }

    /// Builds the value for a wall-clock time in `timezone`.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant.
    ///
    /// # Errors
    ///
    /// Returns [`DateInputError::UnknownTimezone`] for an unknown zone name and
    /// [`DateInputError::NonexistentLocalTime`] for wall-clock times skipped by a DST gap.
    pub fn from_local(local: NaiveDateTime, timezone: &str) -> Result<Self, DateInputError> {
        let tz = parse_timezone(timezone)?;
        match tz.from_local_datetime(&local) {
            LocalResult::Single(datetime) | LocalResult::Ambiguous(datetime, _) => {
                Ok(Self::from_datetime(datetime, timezone))
            }
            LocalResult::None => Err(DateInputError::NonexistentLocalTime(local.to_string())),
        }
    }

    /// Wall-clock time in the value's own zone.
    pub fn local(&self) -> Option<NaiveDateTime> {
        let tz = parse_timezone(&self.timezone).ok()?;
        DateTime::from_timestamp_millis(self.timestamp)
            .map(|utc| utc.with_timezone(&tz).naive_local())
    }

    /// Calendar date in the value's own zone.
    pub fn date(&self) -> Option<NaiveDate> {
        self.local().map(|local| local.date())
    }

    /// Same wall-clock time on a different calendar date.
    ///
    /// # Errors
    ///
    /// Propagates [`ZonedTimestamp::from_local`] errors.
    pub fn with_date(&self, date: NaiveDate) -> Result<Self, DateInputError> {
        let time = self.local().map(|local| local.time()).unwrap_or(NaiveTime::MIN);
        Self::from_local(date.and_time(time), &self.timezone)
    }

    /// Re-expresses the same instant in another zone.
    ///
    /// # Errors
    ///
    /// Returns [`DateInputError::UnknownTimezone`] for an unknown zone name.
    pub fn in_timezone(&self, timezone: &str) -> Result<Self, DateInputError> {
        Self::from_timestamp_ms(self.timestamp, timezone)
    }

    /// Text shown in the input: `YYYY-MM-DD`, or `YYYY-MM-DD HH:MM` with time.
    pub fn display(&self, with_time: bool) -> String {
        let format = if with_time { DATE_TIME_FORMAT } else { DATE_FORMAT };
        self.local()
            .map(|local| local.format(format).to_string())
            .unwrap_or_default()
    }
}

/// Parses typed input into a value in `timezone`.
///
/// Accepted forms: `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]`, `YYYY-MM-DDTHH:MM[:SS]`, and
/// RFC 3339 with an explicit offset (converted into `timezone`).
///
/// # Errors
///
/// Returns [`DateInputError::Empty`] for blank input, [`DateInputError::Unrecognized`] when
/// nothing matches, and zone errors from [`ZonedTimestamp::from_local`].
pub fn parse_date_input(text: &str, timezone: &str) -> Result<ZonedTimestamp, DateInputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DateInputError::Empty);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return ZonedTimestamp::from_timestamp_ms(datetime.timestamp_millis(), timezone);
    }
    if let Some(local) = ACCEPTED_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return ZonedTimestamp::from_local(local, timezone);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, DATE_FORMAT) {
        return ZonedTimestamp::from_local(date.and_time(NaiveTime::MIN), timezone);
    }
    Err(DateInputError::Unrecognized(text.to_string()))
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of committing the typed text.
pub enum DateCommit {
    /// A new value was accepted.
    Committed(ZonedTimestamp),
    /// The text was cleared and the value removed.
    Cleared,
    /// The text parsed to the value already committed.
    Unchanged,
    /// Parsing failed; the visible text reverts to the last committed value.
    Reverted {
        /// Text to show again.
        text: String,
        /// Why the input was rejected.
        error: DateInputError,
    },
}

#[derive(Debug, Clone)]
/// Typed-text state of a calendar input with a debounced commit.
pub struct DateInputState {
    committed: Option<ZonedTimestamp>,
    text: String,
    timezone: String,
    with_time: bool,
    debounce: TimerSlot,
}

impl DateInputState {
    /// Creates state showing `committed`.
    pub fn new(committed: Option<ZonedTimestamp>, timezone: &str, with_time: bool) -> Self {
        let text = committed
            .as_ref()
            .map(|value| value.display(with_time))
            .unwrap_or_default();
        Self {
            committed,
            text,
            timezone: timezone.to_string(),
            with_time,
            debounce: TimerSlot::new(),
        }
    }

    /// Visible text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Last committed value.
    pub fn committed(&self) -> Option<&ZonedTimestamp> {
        self.committed.as_ref()
    }

    /// Zone used for parsing.
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Records typed text and re-arms the debounce timer.
    ///
    /// Returns the token to schedule and the superseded token to cancel.
    pub fn input(&mut self, text: &str) -> (TimerToken, Option<TimerToken>) {
        self.text = text.to_string();
        self.debounce.arm()
    }

    /// Handles an elapsed debounce timer. Stale tokens return `None`.
    ///
    /// Text that does not parse yet is left alone so typing is never interrupted; it is only
    /// reverted by an explicit [`DateInputState::commit_now`].
    pub fn debounce_fired(&mut self, token: TimerToken) -> Option<DateCommit> {
        if !self.debounce.fire(token) {
            return None;
        }
        let incomplete = !self.text.trim().is_empty()
            && parse_date_input(&self.text, &self.timezone).is_err();
        if incomplete {
            return None;
        }
        Some(self.commit())
    }

    /// Commits immediately (Enter or blur) and returns the cancelled debounce token.
    pub fn commit_now(&mut self) -> (DateCommit, Option<TimerToken>) {
        let cancelled = self.debounce.disarm();
        (self.commit(), cancelled)
    }

    /// Accepts a value chosen elsewhere (calendar grid or controlled prop).
    pub fn sync_committed(&mut self, value: Option<ZonedTimestamp>) -> Option<TimerToken> {
        let cancelled = self.debounce.disarm();
        self.text = value
            .as_ref()
            .map(|value| value.display(self.with_time))
            .unwrap_or_default();
        self.committed = value;
        cancelled
    }

    /// Changes the parsing zone, re-expressing the committed instant in it.
    pub fn set_timezone(&mut self, timezone: &str) {
        self.timezone = timezone.to_string();
        if let Some(converted) = self
            .committed
            .as_ref()
            .and_then(|value| value.in_timezone(timezone).ok())
        {
            self.text = converted.display(self.with_time);
            self.committed = Some(converted);
        }
    }

    /// Cancels any pending debounce (unmount).
    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.debounce.disarm()
    }

    fn committed_text(&self) -> String {
        self.committed
            .as_ref()
            .map(|value| value.display(self.with_time))
            .unwrap_or_default()
    }

    fn commit(&mut self) -> DateCommit {
        if self.text.trim().is_empty() {
            self.text.clear();
            return if self.committed.take().is_some() {
                DateCommit::Cleared
            } else {
                DateCommit::Unchanged
            };
        }
        match parse_date_input(&self.text, &self.timezone) {
            Ok(value) => {
                self.text = value.display(self.with_time);
                if self.committed.as_ref() == Some(&value) {
                    DateCommit::Unchanged
                } else {
                    self.committed = Some(value.clone());
                    DateCommit::Committed(value)
                }
            }
            Err(error) => {
                self.text = self.committed_text();
                DateCommit::Reverted {
                    text: self.text.clone(),
                    error,
                }
            }
        }
    }
}
