use crate::model::{DayKey, Duration, Issue, WorkLogEntry};
use chrono::NaiveDateTime;

/// The remaining estimate for `issue` as it stood at the end of `day`.
///
/// Uses the latest dated estimate revision logged on or before `day`. Without one, the
/// original estimate applies if the issue existed by then (or is backfilled), otherwise zero.
pub fn last_estimate_for_day(issue: &Issue, day: DayKey) -> Duration {
    let revisions = issue
        .work_log
        .iter()
        .filter(|worked| worked.day_key().is_some_and(|worked_day| worked_day <= day));
    if let Some(estimate) = latest_revision(revisions) {
        return estimate;
    }

    if issue.include_in_initial_estimates || DayKey::of(&issue.created) <= day {
        issue.time_estimate.unwrap_or_default()
    } else {
        Duration::zero()
    }
}

/// The most recent remaining estimate for `issue`, falling back to its original estimate.
pub fn last_estimate_for_issue(issue: &Issue) -> Option<Duration> {
    latest_revision(issue.work_log.iter()).or(issue.time_estimate)
}

pub fn total_worked_for_day(issue: &Issue, day: DayKey) -> Duration {
    issue
        .work_log
        .iter()
        // entries without a revised estimate are left out along with undated ones
        .filter(|worked| worked.updated_required.is_some())
        .filter(|worked| worked.day_key() == Some(day))
        .filter_map(|worked| worked.worked)
        .sum()
}

/// Picks the revision with the latest day; on equal days the first one listed wins.
fn latest_revision<'a>(entries: impl Iterator<Item = &'a WorkLogEntry>) -> Option<Duration> {
    entries
        .filter_map(|worked| Some((worked.day?, worked.updated_required?)))
        .fold(None, |latest: Option<(NaiveDateTime, Duration)>, (day, required)| {
            match latest {
                Some((latest_day, _)) if day <= latest_day => latest,
                _ => Some((day, required)),
            }
        })
        .map(|(_, required)| required)
}
