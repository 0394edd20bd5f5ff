//! Recurring-event expansion.
//!
//! [`expand`] turns an event template and an optional [`RepeatRule`] into the
//! ordered list of concrete occurrences that get persisted as independent rows.
//! No series id is kept: every occurrence is a standalone copy of the template.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Hard ceiling on the number of occurrences a single rule may produce.
pub const MAX_OCCURRENCES: u32 = 365;

/// Repeat frequency.
///
/// Wire format: `"daily"`, `"weekly"`, `"monthly"`, `"yearly"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// How an event repeats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepeatRule {
    #[serde(rename = "type", alias = "frequency")]
    pub frequency: Frequency,
    /// Step between occurrences in units of `frequency` (default 1, must be ≥ 1).
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Weekday indices, 0 = Monday … 6 = Sunday. Weekly only.
    #[serde(default)]
    pub days: Option<Vec<u8>>,
    /// Explicit day of month (1–31). Monthly only.
    #[serde(default)]
    pub day_of_month: Option<u32>,
    /// Inclusive upper bound for occurrence timestamps.
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    /// Maximum number of occurrences, including the first (capped at [`MAX_OCCURRENCES`]).
    #[serde(default)]
    pub occurrences: Option<u32>,
}

fn default_interval() -> u32 {
    1
}

impl RepeatRule {
    /// Convenience constructor with defaults for everything but the frequency.
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: default_interval(),
            days: None,
            day_of_month: None,
            end_date: None,
            occurrences: None,
        }
    }

    /// Effective occurrence limit: the stated count, else the ceiling.
    pub fn limit(&self) -> u32 {
        self.occurrences
            .unwrap_or(MAX_OCCURRENCES)
            .min(MAX_OCCURRENCES)
    }

    fn validate(&self, starts_at: DateTime<Utc>) -> Result<(), RecurrenceError> {
        if self.interval == 0 {
            return Err(RecurrenceError::ZeroInterval);
        }
        if self.occurrences == Some(0) {
            return Err(RecurrenceError::ZeroOccurrences);
        }
        if let Some(day) = self.days.iter().flatten().find(|d| **d > 6) {
            return Err(RecurrenceError::InvalidWeekday(*day));
        }
        if let Some(day) = self.day_of_month.filter(|d| !(1..=31).contains(d)) {
            return Err(RecurrenceError::InvalidDayOfMonth(day));
        }
        if self.end_date.is_some_and(|end| end < starts_at) {
            return Err(RecurrenceError::EndBeforeStart);
        }
        Ok(())
    }
}

/// Rejections for rules that cannot be expanded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceError {
    #[error("repeat interval must be at least 1")]
    ZeroInterval,
    #[error("occurrence count must be at least 1")]
    ZeroOccurrences,
    #[error("weekday index {0} is out of range 0-6")]
    InvalidWeekday(u8),
    #[error("day of month {0} is out of range 1-31")]
    InvalidDayOfMonth(u32),
    #[error("repeat end date is before the event start")]
    EndBeforeStart,
}

/// Every event attribute except its timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDetails {
    pub title: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub host: String,
    pub creator_id: Uuid,
    pub category: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub capacity: i32,
    pub is_free: bool,
    pub price: f64,
}

/// Input to [`expand`]: the event as described by its creator.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTemplate {
    pub details: EventDetails,
    pub starts_at: DateTime<Utc>,
}

/// One concrete dated instance of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOccurrence {
    pub details: EventDetails,
    pub starts_at: DateTime<Utc>,
}

impl EventTemplate {
    fn occurrence_at(&self, starts_at: DateTime<Utc>) -> EventOccurrence {
        EventOccurrence {
            details: self.details.clone(),
            starts_at,
        }
    }
}

/// Expand a template into its occurrences, in chronological order.
///
/// Without a rule the result is the template's own timestamp. With a rule the
/// template's timestamp is always the first occurrence; later ones are produced
/// until the rule's count (or [`MAX_OCCURRENCES`]) is reached or the next
/// candidate falls after `end_date`.
pub fn expand(
    template: &EventTemplate,
    rule: Option<&RepeatRule>,
) -> Result<Vec<EventOccurrence>, RecurrenceError> {
    let Some(rule) = rule else {
        return Ok(vec![template.occurrence_at(template.starts_at)]);
    };
    rule.validate(template.starts_at)?;

    let limit = rule.limit() as usize;
    let mut stepper = Stepper::new(template.starts_at, rule);
    let mut occurrences = Vec::with_capacity(limit);
    occurrences.push(template.occurrence_at(template.starts_at));

    while occurrences.len() < limit {
        let Some(next) = stepper.advance() else {
            break;
        };
        if rule.end_date.is_some_and(|end| next > end) {
            break;
        }
        occurrences.push(template.occurrence_at(next));
    }
    Ok(occurrences)
}

/// Produces successive candidate timestamps for a validated rule.
///
/// Monthly and yearly steps are computed from the start rather than from the
/// previous candidate so a clamped day (Jan 31 → Feb 28) does not drift.
struct Stepper<'a> {
    rule: &'a RepeatRule,
    start: DateTime<Utc>,
    current: DateTime<Utc>,
    steps: u32,
}

impl<'a> Stepper<'a> {
    fn new(start: DateTime<Utc>, rule: &'a RepeatRule) -> Self {
        Self {
            rule,
            start,
            current: start,
            steps: 0,
        }
    }

    /// `None` once the calendar range is exhausted.
    fn advance(&mut self) -> Option<DateTime<Utc>> {
        self.steps += 1;
        let interval = self.rule.interval;
        let next = match self.rule.frequency {
            Frequency::Daily => self
                .current
                .checked_add_signed(TimeDelta::try_days(i64::from(interval))?)?,
            Frequency::Weekly => {
                let next = self
                    .current
                    .checked_add_signed(TimeDelta::try_weeks(i64::from(interval))?)?;
                match self.rule.days.as_deref() {
                    Some(days) if !days.is_empty() => align_to_weekday(next, days)?,
                    _ => next,
                }
            }
            Frequency::Monthly => {
                let day = self.rule.day_of_month.unwrap_or(self.start.day());
                let months = u64::from(interval) * u64::from(self.steps);
                shift_months(self.start, months, day)?
            }
            Frequency::Yearly => {
                let months = 12 * u64::from(interval) * u64::from(self.steps);
                shift_months(self.start, months, self.start.day())?
            }
        };
        self.current = next;
        Some(next)
    }
}

/// Move forward to the first configured weekday after `at`'s weekday.
///
/// When none is later in the week it wraps to the earliest configured weekday
/// of the following week. A single configured weekday that `at` already falls
/// on needs no alignment.
fn align_to_weekday(at: DateTime<Utc>, days: &[u8]) -> Option<DateTime<Utc>> {
    let current = at.weekday().num_days_from_monday();
    let mut sorted: Vec<u32> = days.iter().map(|d| u32::from(*d)).collect();
    sorted.sort_unstable();
    sorted.dedup();

    let shift = match (sorted.iter().find(|d| **d > current), sorted.as_slice()) {
        (Some(day), _) => day - current,
        (None, [only]) if *only == current => 0,
        (None, _) => 7 - current + sorted.first()?,
    };
    at.checked_add_signed(TimeDelta::try_days(i64::from(shift))?)
}

/// Add `months` to `base`, landing on `day` clamped to the target month's length.
/// Time of day is preserved.
fn shift_months(base: DateTime<Utc>, months: u64, day: u32) -> Option<DateTime<Utc>> {
    let total = i64::from(base.year()) * 12 + i64::from(base.month0()) + i64::try_from(months).ok()?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    let day = day.min(days_in_month(year, month)?);
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.and_time(base.time()).and_utc())
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|d| d.day())
}
