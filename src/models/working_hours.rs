//! Working hours model
//!
//! An organization's weekly open/closed schedule plus date-specific
//! overrides (holidays, special hours). Every time of day is "HH:MM" in UTC;
//! callers convert local wall-clock times before they reach this module.
//!
//! Stored values are kept in their raw string form. [`DaySpec::validate`] is
//! the strict check applied when an administrator saves a schedule, while
//! [`DaySpec::effective_hours`] is the lenient read used during evaluation:
//! anything malformed reads as closed.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{time_of_day_field, validate_time_of_day};

/// Days of the week in storage order (0 = Sunday)
const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Errors raised by strict schedule validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("{day} is open but has no {field}")]
    MissingTime { day: String, field: &'static str },

    #[error("{day}: opening time {open} must be before closing time {close}")]
    InvertedWindow {
        day: String,
        open: String,
        close: String,
    },

    #[error("unknown day of week '{0}', expected 0 (Sunday) to 6 (Saturday)")]
    UnknownDay(String),
}

/// Full English name of a weekday
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

pub(crate) fn serialize_weekday<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}

/// A UTC time of day with minute precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Parse a strict "HH:MM" 24h string
    pub fn parse(value: &str) -> Result<Self, ScheduleError> {
        if !validate_time_of_day(value) {
            return Err(ScheduleError::InvalidTime(value.to_string()));
        }
        NaiveTime::parse_from_str(value, "%H:%M")
            .map(TimeOfDay)
            .map_err(|_| ScheduleError::InvalidTime(value.to_string()))
    }

    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeOfDay)
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Effective hours for one date after resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayHours {
    Open { open: TimeOfDay, close: TimeOfDay },
    Closed,
}

impl DayHours {
    pub fn is_open(&self) -> bool {
        matches!(self, DayHours::Open { .. })
    }

    /// Whether `time` lies within the open window, both bounds inclusive
    pub fn admits(&self, time: NaiveTime) -> bool {
        match self {
            DayHours::Open { open, close } => open.as_naive() <= time && time <= close.as_naive(),
            DayHours::Closed => false,
        }
    }

    pub fn open_time(&self) -> Option<TimeOfDay> {
        match self {
            DayHours::Open { open, .. } => Some(*open),
            DayHours::Closed => None,
        }
    }

    pub fn close_time(&self) -> Option<TimeOfDay> {
        match self {
            DayHours::Open { close, .. } => Some(*close),
            DayHours::Closed => None,
        }
    }
}

/// Stored open/close entry for one day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySpec {
    #[serde(default, alias = "isOpen")]
    pub is_open: bool,
    #[serde(default, alias = "openTime", skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
    #[serde(default, alias = "closeTime", skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,
}

impl DaySpec {
    pub fn open(open_time: &str, close_time: &str) -> Self {
        Self {
            is_open: true,
            open_time: Some(open_time.to_string()),
            close_time: Some(close_time.to_string()),
        }
    }

    pub fn closed() -> Self {
        Self::default()
    }

    /// Strict validation applied when a schedule is saved.
    ///
    /// Closed days are always valid, even if they still carry times from an
    /// earlier edit.
    pub fn validate(&self, label: &str) -> Result<(), ScheduleError> {
        if !self.is_open {
            return Ok(());
        }

        let open = self
            .open_time
            .as_deref()
            .ok_or_else(|| ScheduleError::MissingTime {
                day: label.to_string(),
                field: "open_time",
            })?;
        let close = self
            .close_time
            .as_deref()
            .ok_or_else(|| ScheduleError::MissingTime {
                day: label.to_string(),
                field: "close_time",
            })?;

        if TimeOfDay::parse(open)? >= TimeOfDay::parse(close)? {
            return Err(ScheduleError::InvertedWindow {
                day: label.to_string(),
                open: open.to_string(),
                close: close.to_string(),
            });
        }

        Ok(())
    }

    /// Lenient interpretation used at evaluation time: an open day with
    /// missing, unparseable or inverted times reads as closed.
    pub fn effective_hours(&self) -> DayHours {
        if !self.is_open {
            return DayHours::Closed;
        }

        let open = self.open_time.as_deref().map(TimeOfDay::parse);
        let close = self.close_time.as_deref().map(TimeOfDay::parse);

        match (open, close) {
            (Some(Ok(open)), Some(Ok(close))) if open < close => DayHours::Open { open, close },
            _ => DayHours::Closed,
        }
    }

    /// Marked open but unusable
    pub fn is_malformed(&self) -> bool {
        self.is_open && !self.effective_hours().is_open()
    }
}

/// Seven day schedule, stored as a JSON object keyed "0" (Sunday) to "6"
/// (Saturday). Days missing from the stored object are closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, DaySpec>",
    into = "BTreeMap<String, DaySpec>"
)]
pub struct WeeklySchedule {
    days: [DaySpec; 7],
}

impl WeeklySchedule {
    /// A schedule with every day closed
    pub fn closed() -> Self {
        Self {
            days: Default::default(),
        }
    }

    /// A schedule with the same hours on all seven days
    pub fn every_day(open_time: &str, close_time: &str) -> Self {
        Self {
            days: std::array::from_fn(|_| DaySpec::open(open_time, close_time)),
        }
    }

    pub fn day(&self, weekday: Weekday) -> &DaySpec {
        &self.days[weekday.num_days_from_sunday() as usize]
    }

    pub fn set_day(&mut self, weekday: Weekday, spec: DaySpec) {
        self.days[weekday.num_days_from_sunday() as usize] = spec;
    }

    pub fn with_day(mut self, weekday: Weekday, spec: DaySpec) -> Self {
        self.set_day(weekday, spec);
        self
    }

    /// Days in storage order, Sunday first
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DaySpec)> {
        WEEK.iter().copied().zip(self.days.iter())
    }

    /// Validate every day; the first offending day is reported
    pub fn validate(&self) -> Result<(), ScheduleError> {
        for (weekday, spec) in self.iter() {
            spec.validate(weekday_name(weekday))?;
        }
        Ok(())
    }
}

impl Default for WeeklySchedule {
    /// Monday to Friday 09:00-17:00, weekend closed
    fn default() -> Self {
        let mut schedule = Self::closed();
        for weekday in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
        ] {
            schedule.set_day(weekday, DaySpec::open("09:00", "17:00"));
        }
        schedule
    }
}

impl TryFrom<BTreeMap<String, DaySpec>> for WeeklySchedule {
    type Error = ScheduleError;

    fn try_from(map: BTreeMap<String, DaySpec>) -> Result<Self, Self::Error> {
        let mut schedule = Self::closed();
        for (key, spec) in map {
            let index = key
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|i| *i < WEEK.len())
                .ok_or_else(|| ScheduleError::UnknownDay(key.clone()))?;
            schedule.days[index] = spec;
        }
        Ok(schedule)
    }
}

impl From<WeeklySchedule> for BTreeMap<String, DaySpec> {
    fn from(schedule: WeeklySchedule) -> Self {
        schedule
            .days
            .into_iter()
            .enumerate()
            .map(|(i, spec)| (i.to_string(), spec))
            .collect()
    }
}

/// Replacement of the weekly entry for one specific date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOverride {
    pub id: Uuid,
    pub date: NaiveDate,
    pub is_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DateOverride {
    pub fn closed(date: NaiveDate, reason: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            is_open: false,
            open_time: None,
            close_time: None,
            reason: reason.map(str::to_string),
        }
    }

    pub fn open(date: NaiveDate, open_time: &str, close_time: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            is_open: true,
            open_time: Some(open_time.to_string()),
            close_time: Some(close_time.to_string()),
            reason: None,
        }
    }

    pub fn day_spec(&self) -> DaySpec {
        DaySpec {
            is_open: self.is_open,
            open_time: self.open_time.clone(),
            close_time: self.close_time.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ScheduleError> {
        self.day_spec().validate(&self.date.to_string())
    }
}

/// Where the effective hours of a date came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoursSource {
    Weekly,
    Override,
}

/// Effective hours of one calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDay {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
    #[serde(flatten)]
    pub hours: DayHours,
    pub source: HoursSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Working hours configuration of one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHoursConfig {
    /// When disabled every day is open around the clock
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub weekly_schedule: WeeklySchedule,
    /// Ordered by date, at most one per date
    #[serde(default)]
    pub overrides: Vec<DateOverride>,
}

impl Default for WorkingHoursConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            weekly_schedule: WeeklySchedule::default(),
            overrides: Vec::new(),
        }
    }
}

impl WorkingHoursConfig {
    pub fn new(enabled: bool, weekly_schedule: WeeklySchedule) -> Self {
        Self {
            enabled,
            weekly_schedule,
            overrides: Vec::new(),
        }
    }

    /// Add an override, replacing any existing one for the same date
    pub fn with_override(mut self, date_override: DateOverride) -> Self {
        self.overrides.retain(|o| o.date != date_override.date);
        self.overrides.push(date_override);
        self.overrides.sort_by_key(|o| o.date);
        self
    }

    pub fn override_for(&self, date: NaiveDate) -> Option<&DateOverride> {
        self.overrides.iter().find(|o| o.date == date)
    }

    /// Resolve the effective hours for a date.
    ///
    /// An override for that exact date replaces the weekly entry entirely,
    /// including its open flag. There is no partial merge.
    pub fn resolve(&self, date: NaiveDate) -> ResolvedDay {
        let weekday = date.weekday();

        let (spec, source, reason) = match self.override_for(date) {
            Some(o) => (o.day_spec(), HoursSource::Override, o.reason.clone()),
            None => (
                self.weekly_schedule.day(weekday).clone(),
                HoursSource::Weekly,
                None,
            ),
        };

        if spec.is_malformed() {
            warn!(
                %date,
                source = ?source,
                open_time = ?spec.open_time,
                close_time = ?spec.close_time,
                "Malformed working hours treated as closed"
            );
        }

        ResolvedDay {
            date,
            weekday,
            hours: spec.effective_hours(),
            source,
            reason,
        }
    }

    /// Closed for booking purposes; never true while working hours are disabled
    pub fn is_closed(&self, date: NaiveDate) -> bool {
        self.enabled && !self.resolve(date).hours.is_open()
    }

    /// Number of closed dates strictly between `start` and `end`.
    ///
    /// Whole weeks are counted from the weekly schedule and each override in
    /// range corrects its own date, so the cost depends on the number of
    /// overrides and not on the length of the span. Malformed entries read as
    /// closed and are reported once per call.
    pub fn closed_days_between(&self, start: NaiveDate, end: NaiveDate) -> u64 {
        if !self.enabled {
            return 0;
        }
        let Some(first) = start.succ_opt() else {
            return 0;
        };
        let Ok(span) = u64::try_from((end - first).num_days()) else {
            return 0;
        };

        let weekly_closed = |weekday: Weekday| {
            !self
                .weekly_schedule
                .day(weekday)
                .effective_hours()
                .is_open()
        };
        let closed_per_week = WEEK.iter().filter(|day| weekly_closed(**day)).count() as u64;

        let mut count = (span / 7) * closed_per_week;
        let mut weekday = first.weekday();
        for _ in 0..span % 7 {
            if weekly_closed(weekday) {
                count += 1;
            }
            weekday = weekday.succ();
        }

        let mut malformed_overrides = 0usize;
        for date_override in self.overrides.iter().filter(|o| o.date > start && o.date < end) {
            let spec = date_override.day_spec();
            if spec.is_malformed() {
                malformed_overrides += 1;
            }
            let closed = !spec.effective_hours().is_open();
            match (closed, weekly_closed(date_override.date.weekday())) {
                (true, false) => count += 1,
                (false, true) => count = count.saturating_sub(1),
                _ => {}
            }
        }

        let malformed_weekdays = self
            .weekly_schedule
            .iter()
            .filter(|(_, spec)| spec.is_malformed())
            .count();
        if span > 0 && malformed_weekdays + malformed_overrides > 0 {
            warn!(
                %start,
                %end,
                malformed_weekdays,
                malformed_overrides,
                "Malformed working hours treated as closed"
            );
        }

        count
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateWorkingHoursRequest {
    pub enabled: Option<bool>,
    pub weekly_schedule: Option<WeeklySchedule>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOverrideRequest {
    pub date: NaiveDate,
    #[serde(default)]
    pub is_open: bool,
    #[validate(custom(function = "time_of_day_field"))]
    pub open_time: Option<String>,
    #[validate(custom(function = "time_of_day_field"))]
    pub close_time: Option<String>,
    #[validate(length(max = 255))]
    pub reason: Option<String>,
}

impl CreateOverrideRequest {
    pub fn into_override(self) -> DateOverride {
        DateOverride {
            id: Uuid::new_v4(),
            date: self.date,
            is_open: self.is_open,
            open_time: self.open_time,
            close_time: self.close_time,
            reason: self.reason.filter(|r| !r.trim().is_empty()),
        }
    }
}
