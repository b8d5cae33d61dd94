use crate::analyze::hours::calculate_hours_logged;
use crate::analyze::velocity::{calculate_velocity, milestone_velocity};
use crate::analyze::{MetricCache, WorkLogSource};
use crate::model::{DayKey, Duration, Milestone, User, WorkLogEntry};
use chrono::{NaiveDateTime, TimeDelta};
use tracing::debug;

/// Per-user and team-wide time-tracking metrics over a [`WorkLogSource`].
///
/// Owns the velocity caches; entries live for the configured TTL and are dropped early by
/// [`TimeTracker::invalidate_user`] after a user logs new work.
#[derive(Debug)]
pub struct TimeTracker<S> {
    source: S,
    velocities: MetricCache<String, f64>,
    average: MetricCache<(), f64>,
}

impl<S: WorkLogSource> TimeTracker<S> {
    pub fn new(source: S, cache_ttl: std::time::Duration) -> Self {
        Self {
            source,
            velocities: MetricCache::new(cache_ttl),
            average: MetricCache::new(cache_ttl),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn invalidate_user(&self, username: &str) {
        debug!("Dropping cached velocity for {username}");
        self.velocities.invalidate(&username.to_string());
        self.average.invalidate(&());
    }

    pub fn invalidate_all(&self) {
        self.velocities.invalidate_all();
        self.average.invalidate_all();
    }

    /// Velocity over everything the user ever logged.
    pub fn user_velocity(&self, user: &User) -> f64 {
        self.velocities
            .compute_if_absent(user.username.clone(), || {
                let worked = self.source.work_logged_by(user, None);
                calculate_velocity(&self.source, &worked, user)
            })
    }

    /// Velocity over the seven days before `now`.
    pub fn current_user_velocity(&self, user: &User, now: NaiveDateTime) -> f64 {
        let worked = self.work_logged_between(user, now - TimeDelta::days(7), now);
        calculate_velocity(&self.source, &worked, user)
    }

    /// Velocity over the ISO week (Monday to Sunday) containing `week`.
    pub fn user_velocity_in_week(&self, user: &User, week: DayKey) -> f64 {
        let (start, end) = week_range(week);
        let worked = self.work_logged_between(user, start, end);
        calculate_velocity(&self.source, &worked, user)
    }

    pub fn velocity(&self, entries: &[WorkLogEntry], milestone: &Milestone) -> f64 {
        milestone_velocity(&self.source, entries, milestone)
    }

    /// Mean of the cached velocities of every user who can log in; NaN velocities are left out.
    pub fn average_velocity(&self) -> f64 {
        self.average.compute_if_absent((), || {
            let velocities = self
                .source
                .users()
                .into_iter()
                .filter(|user| user.can_login)
                .map(|user| self.user_velocity(user))
                .filter(|velocity| !velocity.is_nan())
                .collect::<Vec<_>>();
            velocities.iter().sum::<f64>() / velocities.len() as f64
        })
    }

    pub fn user_hours_logged(&self, user: &User) -> f64 {
        calculate_hours_logged(&self.source.work_logged_by(user, None), user)
    }

    pub fn user_hours_logged_in_week(&self, user: &User, week: DayKey) -> f64 {
        let (start, end) = week_range(week);
        calculate_hours_logged(&self.work_logged_between(user, start, end), user)
    }

    /// Total hours logged between `start` and `end` inclusive, without day averaging.
    pub fn logged_time_for_user(&self, user: &User, start: NaiveDateTime, end: NaiveDateTime) -> Duration {
        self.work_logged_between(user, start, end)
            .iter()
            .filter_map(|worked| worked.worked)
            .sum()
    }

    /// Queries the window and drops anything the source returned outside of it.
    fn work_logged_between(&self, user: &User, start: NaiveDateTime, end: NaiveDateTime) -> Vec<WorkLogEntry> {
        let mut worked = self.source.work_logged_by(user, Some((start, end)));
        worked.retain(|worked| worked.is_within(&start, &end));
        worked
    }
}

/// Monday 00:00 up to the last millisecond of Sunday.
fn week_range(week: DayKey) -> (NaiveDateTime, NaiveDateTime) {
    let monday = week.iso_week_start();
    (monday.start(), monday.offset(6).end())
}
