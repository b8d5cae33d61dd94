use crate::model::{parse_datetime, Duration, ModelError, Result, WorkLogEntry};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

pub type IssueId = i64;

/// Ordinal issue status; everything from [`IssueStatus::RESOLVED`] up counts as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IssueStatus(pub i32);

impl IssueStatus {
    pub const NEW: IssueStatus = IssueStatus(200);
    pub const FEEDBACK: IssueStatus = IssueStatus(210);
    pub const ASSIGNED: IssueStatus = IssueStatus(220);
    pub const REOPENED: IssueStatus = IssueStatus(230);
    pub const IN_PROGRESS: IssueStatus = IssueStatus(240);
    pub const RESOLVED: IssueStatus = IssueStatus(250);
    pub const CLOSED: IssueStatus = IssueStatus(260);

    pub fn is_resolved(&self) -> bool {
        *self >= Self::RESOLVED
    }

    fn from_name(name: &str) -> Option<Self> {
        let status = match name.to_lowercase().as_str() {
            "new" => Self::NEW,
            "feedback" => Self::FEEDBACK,
            "assigned" => Self::ASSIGNED,
            "reopened" => Self::REOPENED,
            "inprogress" | "in_progress" | "in progress" => Self::IN_PROGRESS,
            "resolved" => Self::RESOLVED,
            "closed" => Self::CLOSED,
            _ => return None,
        };
        Some(status)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub id: IssueId,
    pub project: String,
    pub summary: String,
    pub created: NaiveDateTime,
    pub time_estimate: Option<Duration>,
    pub time_required: Option<Duration>,
    pub status: IssueStatus,
    pub include_in_initial_estimates: bool,
    pub work_log: Vec<WorkLogEntry>,
}

// Create
impl Issue {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(id: IssueId, project: impl ToString, created: NaiveDateTime) -> Self {
        Self {
            id,
            project: project.to_string(),
            summary: String::new(),
            created,
            time_estimate: None,
            time_required: None,
            status: IssueStatus::NEW,
            include_in_initial_estimates: false,
            work_log: vec![],
        }
    }

    pub fn estimated(mut self, hours: f64) -> Self {
        self.time_estimate = Some(Duration::hours(hours));
        self
    }

    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    /// Attaches a work-log entry, pointing its back-reference at this issue.
    pub fn log(mut self, entry: WorkLogEntry) -> Self {
        self.work_log.push(entry.on_issue(self.id));
        self
    }
}

impl Issue {
    pub fn total_worked(&self) -> Duration {
        self.work_log.iter().filter_map(|worked| worked.worked).sum()
    }
}

// Parser
impl Issue {
    fn parse(json_str: &str) -> Result<Vec<Self>> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (key, details) in elements {
            let entity = format!("issue {key}");
            let Ok(id) = key.parse::<IssueId>() else {
                return Err(ModelError::missing(entity, "id"));
            };
            let Some(project) = details["project"].as_str() else {
                return Err(ModelError::missing(entity, "project"));
            };
            let Some(created) = details["created"].as_str() else {
                return Err(ModelError::missing(entity, "created"));
            };
            let status = match &details["status"] {
                Value::Null => IssueStatus::NEW,
                Value::Number(number) => match number.as_i64().and_then(|n| i32::try_from(n).ok()) {
                    Some(ordinal) => IssueStatus(ordinal),
                    None => return Err(ModelError::InvalidStatus(number.to_string())),
                },
                Value::String(name) => match IssueStatus::from_name(name) {
                    Some(status) => status,
                    None => return Err(ModelError::InvalidStatus(name.clone())),
                },
                other => return Err(ModelError::InvalidStatus(other.to_string())),
            };
            let work_log = match details["workLog"].as_array() {
                Some(entries) => entries
                    .iter()
                    .map(|entry| WorkLogEntry::parse(entry, id))
                    .collect::<Result<Vec<_>>>()?,
                None => vec![],
            };

            let mut new = Self::new(id, project, parse_datetime(created)?);
            new.summary = details["summary"].as_str().unwrap_or_default().to_string();
            new.time_estimate = details["timeEstimate"].as_f64().map(Duration::hours);
            new.time_required = details["timeRequired"].as_f64().map(Duration::hours);
            new.status = status;
            new.include_in_initial_estimates = details["includeInInitialEstimates"]
                .as_bool()
                .unwrap_or(false);
            new.work_log = work_log;
            result.push(new);
        }
        Ok(result)
    }
}
