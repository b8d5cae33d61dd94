use crate::analyze::{LookupError, Overwork, WorkLogSource};
use crate::model::{DayKey, Duration, Issue, IssueId, Milestone, Project, ProjectConfig, User, WorkLogEntry};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use tracing::warn;

/// In-memory persistence for everything loaded from the data files.
#[derive(Debug, Clone, Default)]
pub struct WorkLogStore {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub milestones: Vec<Milestone>,
    pub issues: IndexMap<IssueId, Issue>,
    unconfigured: ProjectConfig,
}

impl WorkLogStore {
    pub fn new(
        users: Vec<User>,
        projects: Vec<Project>,
        milestones: Vec<Milestone>,
        issues: Vec<Issue>,
    ) -> Self {
        let mut store = Self {
            users,
            projects,
            milestones,
            issues: IndexMap::new(),
            unconfigured: ProjectConfig::new(),
        };
        for issue in issues {
            store.insert_issue(issue);
        }
        store
    }

    pub fn insert_issue(&mut self, issue: Issue) {
        self.issues.insert(issue.id, issue);
    }

    pub fn project_config(&self, project: &str) -> &ProjectConfig {
        match self.projects.iter().find(|p| p.id == project) {
            Some(project) => &project.config,
            None => {
                warn!("Project `{project}` has no configuration, time tracking is off");
                &self.unconfigured
            }
        }
    }

    pub fn milestone(&self, name: &str) -> Option<&Milestone> {
        self.milestones.iter().find(|m| m.name == name)
    }

    /// Joins a milestone with its project configuration and member issues.
    /// Member ids that do not resolve are left out.
    pub fn milestone_view<'a>(&'a self, milestone: &'a Milestone) -> MilestoneView<'a> {
        let issues = milestone
            .issues
            .iter()
            .filter_map(|id| match self.issue(*id) {
                Ok(issue) => Some(issue),
                Err(err) => {
                    warn!("Milestone `{}`: {err}, skipping", milestone.name);
                    None
                }
            })
            .collect();
        MilestoneView::new(milestone, self.project_config(&milestone.project), issues)
    }
}

impl WorkLogSource for WorkLogStore {
    fn work_logged_by(
        &self,
        user: &User,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Vec<WorkLogEntry> {
        self.issues
            .values()
            .flat_map(|issue| &issue.work_log)
            .filter(|worked| worked.user == user.username)
            .filter(|worked| worked.worked_hours() > 0.0)
            .filter(|worked| match &range {
                Some((start, end)) => worked.is_within(start, end),
                None => true,
            })
            .cloned()
            .collect()
    }

    fn issue(&self, id: IssueId) -> Result<&Issue, LookupError> {
        self.issues.get(&id).ok_or(LookupError::IssueNotFound(id))
    }

    fn user(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    fn users(&self) -> Vec<&User> {
        self.users.iter().collect()
    }
}

/// A milestone together with the data its calculations need.
#[derive(Debug, Clone)]
pub struct MilestoneView<'a> {
    pub milestone: &'a Milestone,
    pub config: &'a ProjectConfig,
    pub issues: Vec<&'a Issue>,
}

impl<'a> MilestoneView<'a> {
    pub fn new(milestone: &'a Milestone, config: &'a ProjectConfig, issues: Vec<&'a Issue>) -> Self {
        Self {
            milestone,
            config,
            issues,
        }
    }
}

pub type MilestonesAnalyzed = Vec<MilestoneAnalyzed>;

#[derive(Debug, Clone)]
pub struct MilestoneAnalyzed {
    pub milestone: Milestone,
    pub start: NaiveDateTime,
    pub burndown: Vec<(DayKey, Duration)>,
    pub completeness: f64,
    pub velocity: f64,
    /// Team-wide mean over every user who can log in.
    pub average_velocity: f64,
    pub users: Vec<UserAnalyzed>,
    pub issues: Vec<IssueAnalyzed>,
}

#[derive(Debug, Clone)]
pub struct UserAnalyzed {
    pub user: User,
    pub velocity: f64,
    pub current_velocity: f64,
    /// Velocity within the current ISO week.
    pub week_velocity: f64,
    pub hours_per_day: f64,
    pub week_hours: f64,
    pub logged_in_milestone: Duration,
}

#[derive(Debug, Clone)]
pub struct IssueAnalyzed {
    pub id: IssueId,
    pub summary: String,
    pub estimate: String,
    pub remaining: Option<Duration>,
    pub overwork: Option<Overwork>,
}
