use crate::analyze::WorkLogSource;
use crate::model::{DayKey, Issue, IssueId, Milestone, User, WorkLogEntry, WorkLogId};
use itertools::Itertools;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Hours of estimate reduction credited to `user` per day they actually worked.
///
/// Only entries in `entries` earn credit, but every estimate revision on the touched issues
/// moves the running estimate, including revisions outside the window. NaN for users hidden
/// from time tracking, zero when no day was worked.
pub fn calculate_velocity<S>(source: &S, entries: &[WorkLogEntry], user: &User) -> f64
where
    S: WorkLogSource + ?Sized,
{
    if user.hidden_in_time_tracking {
        return f64::NAN;
    }

    // work-log ids are only unique within their issue
    let window = entries
        .iter()
        .map(|e| (e.issue, e.id))
        .collect::<HashSet<(Option<IssueId>, WorkLogId)>>();
    let mut estimated_hours_worked = 0.0;
    let mut days_seen = HashSet::new();

    for issue in relevant_issues(source, entries) {
        let Some(original) = issue.time_estimate.filter(|e| !e.is_zero()) else {
            continue;
        };

        let mut estimate = original.as_hours();
        let mut hours_worked = 0.0;
        let mut total_estimated = 0.0;
        for worked in chronological(&issue.work_log) {
            let required = worked.updated_required.map(|r| r.as_hours());
            if !worked.has_work() || !window.contains(&(worked.issue, worked.id)) {
                if let Some(required) = required {
                    estimate = required;
                }
                continue;
            }

            if worked.user == user.username {
                hours_worked += worked.worked_hours();
                if let Some(required) = required {
                    total_estimated += estimate - required;
                }
                if let Some(day) = worked.day_key() {
                    days_seen.insert(day);
                }
            }

            if let Some(required) = required {
                estimate = estimate.min(required);
            }
        }

        if hours_worked == 0.0 {
            continue;
        }
        estimated_hours_worked += total_estimated;
    }

    let days_worked = days_seen.len() as f64;
    let velocity = if days_worked > 0.0 {
        estimated_hours_worked / days_worked
    } else {
        0.0
    };
    debug!(
        "Velocity {velocity} for user {} based on {estimated_hours_worked} over {days_worked} days",
        user.username
    );
    velocity
}

/// Average velocity of the visible, login-enabled users who logged `entries`, limited to the milestone's
/// own range when it has an explicit start. NaN when no user qualifies.
pub fn milestone_velocity<S>(source: &S, entries: &[WorkLogEntry], milestone: &Milestone) -> f64
where
    S: WorkLogSource + ?Sized,
{
    let entries = velocity_window(entries, milestone);
    let velocities = entries
        .iter()
        .map(|worked| worked.user.as_str())
        .unique()
        .filter_map(|username| {
            let user = source.user(username);
            if user.is_none() {
                warn!("Work logged by unknown user `{username}`, skipping");
            }
            user
        })
        .filter(|user| user.can_login && !user.hidden_in_time_tracking)
        .map(|user| calculate_velocity(source, &entries, user))
        .filter(|velocity| !velocity.is_nan())
        .collect::<Vec<_>>();

    velocities.iter().sum::<f64>() / velocities.len() as f64
}

/// Entries inside the milestone, from the start of its start day to the end of its due day.
/// Without an explicit start the range spans the entries themselves, so only undated
/// entries drop out.
fn velocity_window(entries: &[WorkLogEntry], milestone: &Milestone) -> Vec<WorkLogEntry> {
    let start = milestone.start_date.map(|start| DayKey::of(&start).start());
    let end = match start {
        Some(_) => milestone.due_date.map(|due| DayKey::of(&due).end()),
        None => None,
    };

    entries
        .iter()
        .filter(|worked| match worked.day {
            Some(day) => {
                start.map_or(true, |start| day >= start) && end.map_or(true, |end| day <= end)
            }
            None => false,
        })
        .cloned()
        .collect()
}

/// Distinct issues behind `entries`, in first-seen order. Unresolvable references are skipped.
fn relevant_issues<'a, S>(source: &'a S, entries: &[WorkLogEntry]) -> Vec<&'a Issue>
where
    S: WorkLogSource + ?Sized,
{
    entries
        .iter()
        .filter_map(|worked| worked.issue)
        .unique()
        .filter_map(|id| match source.issue(id) {
            Ok(issue) => Some(issue),
            Err(err) => {
                debug!("Ignoring work log reference: {err}");
                None
            }
        })
        .collect()
}

/// Dated entries ordered by day, ties broken by the revised estimate (missing counts as zero).
fn chronological(work_log: &[WorkLogEntry]) -> Vec<&WorkLogEntry> {
    let required = |worked: &WorkLogEntry| worked.updated_required.map_or(0.0, |r| r.as_hours());
    work_log
        .iter()
        .filter(|worked| worked.day.is_some())
        .sorted_by(|a, b| {
            a.day
                .cmp(&b.day)
                .then_with(|| required(a).total_cmp(&required(b)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::fixtures::{at, store};
    use crate::model::Issue;

    /// Estimate 10h: andy brings it to 6h on day one, zoe to 5h on day two, andy to 2h on day three.
    fn shared_issue() -> Issue {
        Issue::new(1, "agile", at(2012, 3, 1, 9))
            .estimated(10.0)
            .log(WorkLogEntry::new(3, "andy").on_day(at(2012, 3, 7, 9)).worked(2.0).remaining(2.0))
            .log(WorkLogEntry::new(1, "andy").on_day(at(2012, 3, 5, 9)).worked(3.0).remaining(6.0))
            .log(WorkLogEntry::new(2, "zoe").on_day(at(2012, 3, 6, 9)).worked(1.0).remaining(5.0))
    }

    #[test]
    fn test_empty_window_is_zero() {
        let store = store(vec![User::new("andy")], vec![shared_issue()]);
        assert_eq!(calculate_velocity(&store, &[], &User::new("andy")), 0.0);
    }

    #[test]
    fn test_hidden_user_is_nan() {
        let store = store(vec![], vec![shared_issue()]);
        let entries = shared_issue().work_log;
        assert!(calculate_velocity(&store, &entries, &User::new("bot").hidden()).is_nan());
    }

    #[test]
    fn test_velocity_credits_estimate_reduction_per_day() {
        let store = store(vec![], vec![shared_issue()]);
        let entries = shared_issue().work_log;

        // andy: (10 - 6) + (5 - 2) over two days
        assert_eq!(calculate_velocity(&store, &entries, &User::new("andy")), 3.5);
        // zoe: 6 - 5 over one day
        assert_eq!(calculate_velocity(&store, &entries, &User::new("zoe")), 1.0);
    }

    #[test]
    fn test_revisions_outside_window_move_the_estimate() {
        let store = store(vec![], vec![shared_issue()]);
        let window = shared_issue()
            .work_log
            .into_iter()
            .filter(|w| w.id == 3)
            .collect::<Vec<_>>();

        // zoe's revision to 5h is outside the window but still the base: 5 - 2
        assert_eq!(calculate_velocity(&store, &window, &User::new("andy")), 3.0);
    }

    #[test]
    fn test_work_log_ids_repeat_across_issues() {
        let first = Issue::new(1, "agile", at(2012, 3, 1, 9))
            .estimated(10.0)
            .log(WorkLogEntry::new(1, "andy").on_day(at(2012, 3, 5, 9)).worked(2.0).remaining(8.0));
        let second = Issue::new(2, "agile", at(2012, 3, 1, 9))
            .estimated(10.0)
            .log(WorkLogEntry::new(1, "zoe").on_day(at(2012, 3, 5, 9)).worked(1.0).remaining(12.0))
            .log(WorkLogEntry::new(2, "andy").on_day(at(2012, 3, 6, 9)).worked(1.0).remaining(9.0));
        let entries = first
            .work_log
            .iter()
            .chain(&second.work_log)
            .filter(|w| w.user == "andy")
            .cloned()
            .collect::<Vec<_>>();
        let store = store(vec![], vec![first, second]);

        // zoe's #1 on the second issue is not andy's #1: it raises the base to 12h
        assert_eq!(calculate_velocity(&store, &entries, &User::new("andy")), (2.0 + 3.0) / 2.0);
    }

    #[test]
    fn test_same_day_ties_sorted_by_remaining() {
        let issue = Issue::new(1, "agile", at(2012, 3, 1, 9))
            .estimated(10.0)
            .log(WorkLogEntry::new(1, "andy").on_day(at(2012, 3, 5, 9)).worked(1.0).remaining(8.0))
            .log(WorkLogEntry::new(2, "andy").on_day(at(2012, 3, 5, 9)).worked(1.0).remaining(4.0));
        let entries = issue.work_log.clone();
        let store = store(vec![], vec![issue]);

        // 4h entry first: (10 - 4), then min(10, 4) = 4 leaves (4 - 8) for the other
        assert_eq!(calculate_velocity(&store, &entries, &User::new("andy")), 2.0);
    }

    #[test]
    fn test_unestimated_and_unresolvable_issues_are_skipped() {
        let unestimated = Issue::new(2, "agile", at(2012, 3, 1, 9))
            .log(WorkLogEntry::new(10, "andy").on_day(at(2012, 3, 5, 9)).worked(3.0).remaining(1.0));
        let orphan = WorkLogEntry::new(11, "andy")
            .on_issue(404)
            .on_day(at(2012, 3, 5, 9))
            .worked(2.0)
            .remaining(0.0);
        let mut entries = unestimated.work_log.clone();
        entries.push(orphan);
        let store = store(vec![], vec![unestimated]);

        assert_eq!(calculate_velocity(&store, &entries, &User::new("andy")), 0.0);
    }

    #[test]
    fn test_milestone_velocity_averages_visible_users() {
        let store = store(
            vec![
                User::new("andy"),
                User::new("zoe"),
                User::new("bot").hidden(),
                User::new("former").without_login(),
            ],
            vec![shared_issue()
                .log(WorkLogEntry::new(4, "bot").on_day(at(2012, 3, 8, 9)).worked(1.0).remaining(1.0))
                .log(WorkLogEntry::new(5, "former").on_day(at(2012, 3, 9, 9)).worked(1.0).remaining(0.0))],
        );
        let entries = store.issues[&1].work_log.clone();
        let milestone = Milestone::new("1.0", "agile");

        assert_eq!(milestone_velocity(&store, &entries, &milestone), (3.5 + 1.0) / 2.0);
    }

    #[test]
    fn test_milestone_velocity_clips_to_explicit_range() {
        let store = store(vec![User::new("andy"), User::new("zoe")], vec![shared_issue()]);
        let entries = shared_issue().work_log;
        let milestone = Milestone::new("1.0", "agile")
            .starting(at(2012, 3, 6, 15))
            .due(at(2012, 3, 6, 10));

        // only zoe's 6 March entry falls inside 6 March 00:00 .. 23:59:59.999
        assert_eq!(milestone_velocity(&store, &entries, &milestone), 1.0);
    }

    #[test]
    fn test_milestone_velocity_without_users_is_nan() {
        let store = store(vec![], vec![]);
        let milestone = Milestone::new("1.0", "agile");
        assert!(milestone_velocity(&store, &[], &milestone).is_nan());
    }
}
