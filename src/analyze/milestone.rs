use crate::analyze::estimate::{last_estimate_for_day, last_estimate_for_issue};
use crate::analyze::MilestoneView;
use crate::model::{DayKey, Duration};
use chrono::{NaiveDateTime, TimeDelta};
use std::iter;

/// Days a milestone defaults to when it has no explicit start.
const DEFAULT_LENGTH_DAYS: i64 = 14;

/// The explicit start date, or two weeks before the due date (`now` when there is none),
/// pulled back to the earliest logged work on any member issue.
pub fn milestone_start_date(view: &MilestoneView, now: NaiveDateTime) -> NaiveDateTime {
    start_date_before(view, view.milestone.due_date.unwrap_or(now))
}

fn start_date_before(view: &MilestoneView, due: NaiveDateTime) -> NaiveDateTime {
    if let Some(start) = view.milestone.start_date {
        return start;
    }

    let default_start = due - TimeDelta::days(DEFAULT_LENGTH_DAYS);
    view.issues
        .iter()
        .flat_map(|issue| &issue.work_log)
        .filter_map(|worked| worked.day)
        .fold(default_start, NaiveDateTime::min)
}

/// The day axis of a milestone's burndown chart. Empty when there is no due date.
pub fn milestone_dates(view: &MilestoneView, include_day_before: bool) -> MilestoneDates {
    let Some(due) = view.milestone.due_date else {
        return MilestoneDates::empty();
    };

    let start = DayKey::of(&start_date_before(view, due));
    let first = if include_day_before { start.prev() } else { start };
    let skip_weekends = view.config.ignore_weekend() && !view.config.burndown();
    MilestoneDates::new(first, DayKey::of(&due), skip_weekends)
}

/// Effort remaining at the end of each day: a leading entry for the day before the first
/// axis day, then one per day of [`milestone_dates`]. `None` when there is nothing to chart.
pub fn milestone_effort_required(view: Option<&MilestoneView>) -> Option<Vec<Duration>> {
    let view = view?;
    let dates = milestone_dates(view, false);
    let first = dates.first()?;
    let days = iter::once(first.prev()).chain(dates.iter());

    if view.issues.is_empty() {
        return Some(days.map(|_| Duration::zero()).collect());
    }

    let effort = days
        .map(|day| {
            view.issues
                .iter()
                .map(|issue| last_estimate_for_day(issue, day))
                .sum::<Duration>()
        })
        .collect::<Vec<_>>();
    Some(effort)
}

/// The share of the milestone that is done, weighted by estimate when time is tracked.
/// NaN for a milestone without issues.
pub fn milestone_completeness(view: &MilestoneView) -> f64 {
    let time_enabled = view.config.time_tracking_enabled();
    let burndown = view.config.burndown();

    let mut done = 0.0;
    let mut total = 0.0;
    for issue in &view.issues {
        let weight = match issue.time_estimate {
            Some(estimate) if time_enabled => estimate.as_hours(),
            _ => 1.0,
        };
        total += weight;

        if issue.status.is_resolved() {
            done += weight;
            continue;
        }
        if !time_enabled {
            continue;
        }

        if burndown {
            if let Some(left) = last_estimate_for_issue(issue) {
                done += (weight - left.as_hours()).max(0.0);
            }
        } else {
            done += issue.total_worked().as_hours().min(weight);
        }
    }

    done / total
}

/// A finite, restartable run of milestone days.
///
/// Weekends are left out when `skip_weekends` is set, except for the first day produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MilestoneDates {
    first: DayKey,
    last: DayKey,
    skip_weekends: bool,
}

impl MilestoneDates {
    pub fn new(first: DayKey, last: DayKey, skip_weekends: bool) -> Self {
        Self {
            first,
            last,
            skip_weekends,
        }
    }

    pub fn empty() -> Self {
        let day = DayKey::from_date(chrono::NaiveDate::MIN);
        Self::new(day.next(), day, false)
    }

    pub fn iter(&self) -> MilestoneDays {
        MilestoneDays {
            next: self.first,
            last: self.last,
            skip_weekends: self.skip_weekends,
            first_pending: true,
        }
    }

    pub fn first(&self) -> Option<DayKey> {
        self.iter().next()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

impl IntoIterator for &MilestoneDates {
    type Item = DayKey;
    type IntoIter = MilestoneDays;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct MilestoneDays {
    next: DayKey,
    last: DayKey,
    skip_weekends: bool,
    first_pending: bool,
}

impl Iterator for MilestoneDays {
    type Item = DayKey;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next <= self.last {
            let day = self.next;
            self.next = day.next();
            if self.skip_weekends && !self.first_pending && day.is_weekend() {
                continue;
            }
            self.first_pending = false;
            return Some(day);
        }
        None
    }
}
