use crate::analyze::estimate::last_estimate_for_issue;
use crate::analyze::milestone::{
    milestone_completeness, milestone_dates, milestone_effort_required, milestone_start_date,
};
use crate::analyze::{
    overwork, IssueAnalyzed, MilestoneAnalyzed, MilestoneView, TimeTracker, UserAnalyzed,
    WorkLogSource, WorkLogStore,
};
use crate::markup::{mark_up, LinkProviders};
use crate::model::{DayKey, Duration, WorkLogEntry};
use chrono::{Local, NaiveDateTime};
use itertools::Itertools;
use std::iter;
use tracing::debug;

pub trait Analyzer {
    fn analyze_milestone(&self, name: &str, links: &LinkProviders) -> Option<MilestoneAnalyzed>;
}

impl Analyzer for TimeTracker<WorkLogStore> {
    fn analyze_milestone(&self, name: &str, links: &LinkProviders) -> Option<MilestoneAnalyzed> {
        self.analyze_milestone_at(name, links, Local::now().naive_local())
    }
}

impl TimeTracker<WorkLogStore> {
    fn analyze_milestone_at(
        &self,
        name: &str,
        links: &LinkProviders,
        now: NaiveDateTime,
    ) -> Option<MilestoneAnalyzed> {
        let store = self.source();
        let milestone = store.milestone(name)?;
        let view = store.milestone_view(milestone);

        let start = milestone_start_date(&view, now);
        let end = milestone
            .due_date
            .map(|due| DayKey::of(&due).end())
            .unwrap_or(now);
        let worked = view.work_logged();
        debug!(
            "Milestone `{name}`: {} issues, {} work log entries",
            view.issues.len(),
            worked.len()
        );

        let users = worked
            .iter()
            .map(|entry| entry.user.as_str())
            .unique()
            .filter_map(|username| store.user(username))
            .filter(|user| !user.hidden_in_time_tracking)
            .map(|user| UserAnalyzed {
                user: user.clone(),
                velocity: self.user_velocity(user),
                current_velocity: self.current_user_velocity(user, now),
                week_velocity: self.user_velocity_in_week(user, DayKey::of(&now)),
                hours_per_day: self.user_hours_logged(user),
                week_hours: self.user_hours_logged_in_week(user, DayKey::of(&now)),
                logged_in_milestone: self.logged_time_for_user(user, start, end),
            })
            .collect();

        let burndown = view.config.burndown();
        let issues = view
            .issues
            .iter()
            .map(|issue| IssueAnalyzed {
                id: issue.id,
                summary: mark_up(&issue.summary, &issue.project, links),
                estimate: issue
                    .time_estimate
                    .map(|estimate| estimate.to_string())
                    .unwrap_or_default(),
                remaining: last_estimate_for_issue(issue),
                overwork: overwork(issue, burndown),
            })
            .collect();

        Some(MilestoneAnalyzed {
            milestone: milestone.clone(),
            start,
            burndown: view.burndown(),
            completeness: milestone_completeness(&view),
            velocity: self.velocity(&worked, milestone),
            average_velocity: self.average_velocity(),
            users,
            issues,
        })
    }
}

trait MilestoneViewExtension {
    fn work_logged(&self) -> Vec<WorkLogEntry>;

    fn burndown(&self) -> Vec<(DayKey, Duration)>;
}

impl MilestoneViewExtension for MilestoneView<'_> {
    fn work_logged(&self) -> Vec<WorkLogEntry> {
        self.issues
            .iter()
            .flat_map(|issue| &issue.work_log)
            .filter(|entry| entry.has_work())
            .cloned()
            .collect()
    }

    /// Effort paired with its day; the leading entry is the day before the first.
    fn burndown(&self) -> Vec<(DayKey, Duration)> {
        let dates = milestone_dates(self, false);
        let (Some(first), Some(effort)) = (dates.first(), milestone_effort_required(Some(self)))
        else {
            return vec![];
        };
        iter::once(first.prev())
            .chain(dates.iter())
            .zip(effort)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::fixtures::{at, day};
    use crate::analyze::Overwork;
    use crate::markup::IssueLinkProvider;
    use crate::model::{Issue, IssueStatus, Milestone, Project, ProjectConfig, User};
    use std::time::Duration as StdDuration;

    fn tracker() -> TimeTracker<WorkLogStore> {
        let config = ProjectConfig::new()
            .with(ProjectConfig::TIMETRACKING_ENABLED, true)
            .with(ProjectConfig::TIMETRACKING_BURNDOWN, true);
        let first = Issue {
            summary: "Follows issue:2".to_string(),
            ..Issue::new(1, "agile", at(2012, 3, 1, 9))
                .estimated(8.0)
                .log(WorkLogEntry::new(1, "andy").on_day(at(2012, 3, 5, 9)).worked(4.0).remaining(4.0))
        };
        let second = Issue::new(2, "agile", at(2012, 3, 1, 9))
            .estimated(2.0)
            .with_status(IssueStatus::RESOLVED)
            .log(WorkLogEntry::new(2, "bot").on_day(at(2012, 3, 6, 9)).worked(2.0).remaining(0.0));
        let milestone = Milestone {
            issues: vec![1, 2],
            ..Milestone::new("1.0", "agile")
                .starting(at(2012, 3, 5, 9))
                .due(at(2012, 3, 7, 17))
        };
        let store = WorkLogStore::new(
            vec![User::new("andy"), User::new("bot").hidden()],
            vec![Project::new("agile", "HeadsUp Agile", config)],
            vec![milestone],
            vec![first, second],
        );
        TimeTracker::new(store, StdDuration::from_secs(60))
    }

    fn links() -> LinkProviders {
        let mut links = LinkProviders::new(vec!["agile".to_string()]);
        links.register("issue", IssueLinkProvider::new("/{project}/issues/{name}", [1, 2]));
        links
    }

    #[test]
    fn test_unknown_milestone() {
        assert!(tracker().analyze_milestone("2.0", &links()).is_none());
    }

    #[test]
    fn test_analyze_milestone() {
        let analyzed = tracker()
            .analyze_milestone_at("1.0", &links(), at(2012, 3, 8, 9))
            .unwrap();

        assert_eq!(
            analyzed.burndown,
            vec![
                (day(2012, 3, 4), Duration::hours(10.0)),
                (day(2012, 3, 5), Duration::hours(6.0)),
                (day(2012, 3, 6), Duration::hours(4.0)),
                (day(2012, 3, 7), Duration::hours(4.0)),
            ]
        );
        assert_eq!(analyzed.completeness, 6.0 / 10.0);
        assert_eq!(analyzed.velocity, 4.0);
        // the hidden user has no velocity and is left out of the mean
        assert_eq!(analyzed.average_velocity, 4.0);

        assert_eq!(analyzed.users.len(), 1);
        let andy = &analyzed.users[0];
        assert_eq!(andy.user.username, "andy");
        assert_eq!(andy.velocity, 4.0);
        assert_eq!(andy.current_velocity, 4.0);
        assert_eq!(andy.week_velocity, 4.0);
        assert_eq!(andy.hours_per_day, 4.0);
        assert_eq!(andy.week_hours, 4.0);
        assert_eq!(andy.logged_in_milestone, Duration::hours(4.0));

        assert_eq!(analyzed.issues[0].estimate, "8h");
        assert_eq!(analyzed.issues[0].remaining, Some(Duration::hours(4.0)));
        assert_eq!(
            analyzed.issues[0].summary,
            "Follows <a href=\"/agile/issues/2\">issue:2</a>"
        );
        // without time_required the full estimate still counts as outstanding
        assert_eq!(analyzed.issues[0].overwork, Some(Overwork::Warning));
    }
}
