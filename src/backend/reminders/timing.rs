//! Fire-time arithmetic
//!
//! Due times carry no date. A due time always refers to its next occurrence
//! on the wall clock, and a reminder fires a fixed lead interval before it.
//! All values here are local naive date-times; the scheduler's clock decides
//! what "now" is.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta};

/// Where a reminder lands relative to "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirePlan {
    /// The fire instant is still ahead
    At(NaiveDateTime),
    /// The fire instant has already passed; the reminder is skipped
    Elapsed(NaiveDateTime),
}

/// Next instant strictly after `now` whose clock time is `due`
///
/// A due time equal to the current clock time counts as passed and rolls
/// over to tomorrow.
pub fn next_occurrence(due: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(due);
    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}

/// Decide when a reminder for `due` should fire
pub fn plan_fire(due: NaiveTime, now: NaiveDateTime, lead: TimeDelta) -> FirePlan {
    let fire_at = next_occurrence(due, now) - lead;
    if fire_at < now {
        FirePlan::Elapsed(fire_at)
    } else {
        FirePlan::At(fire_at)
    }
}

/// Time left until `fire_at`, clamped at zero
pub fn delay_until(fire_at: NaiveDateTime, now: NaiveDateTime) -> std::time::Duration {
    (fire_at - now).to_std().unwrap_or_default()
}
