use crate::model::{parse_datetime, DayKey, Duration, IssueId, ModelError, Result};
use chrono::NaiveDateTime;
use serde_json::Value;

pub type WorkLogId = u64;

/// One record of work performed, with an optional revised remaining estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkLogEntry {
    pub id: WorkLogId,
    pub issue: Option<IssueId>,
    pub user: String,
    pub day: Option<NaiveDateTime>,
    pub worked: Option<Duration>,
    pub updated_required: Option<Duration>,
}

// Create
impl WorkLogEntry {
    pub fn new(id: WorkLogId, user: impl ToString) -> Self {
        Self {
            id,
            issue: None,
            user: user.to_string(),
            day: None,
            worked: None,
            updated_required: None,
        }
    }

    pub fn on_issue(mut self, issue: IssueId) -> Self {
        self.issue = Some(issue);
        self
    }

    pub fn on_day(mut self, day: NaiveDateTime) -> Self {
        self.day = Some(day);
        self
    }

    pub fn worked(mut self, hours: f64) -> Self {
        self.worked = Some(Duration::hours(hours));
        self
    }

    pub fn remaining(mut self, hours: f64) -> Self {
        self.updated_required = Some(Duration::hours(hours));
        self
    }
}

impl WorkLogEntry {
    pub fn day_key(&self) -> Option<DayKey> {
        self.day.as_ref().map(DayKey::of)
    }

    pub fn worked_hours(&self) -> f64 {
        self.worked.map(|worked| worked.as_hours()).unwrap_or(0.0)
    }

    pub fn has_work(&self) -> bool {
        self.worked_hours() != 0.0
    }

    pub fn is_within(&self, start: &NaiveDateTime, end: &NaiveDateTime) -> bool {
        self.day
            .map(|day| day >= *start && day <= *end)
            .unwrap_or(false)
    }
}

// Parser
impl WorkLogEntry {
    pub(crate) fn parse(details: &Value, issue: IssueId) -> Result<Self> {
        let entity = format!("issue {issue} work log");
        let Some(id) = details["id"].as_u64() else {
            return Err(ModelError::missing(entity, "id"));
        };
        let Some(user) = details["user"].as_str() else {
            return Err(ModelError::missing(entity, "user"));
        };
        let day = match details["day"].as_str() {
            Some(day) => Some(parse_datetime(day)?),
            None => None,
        };
        Ok(Self {
            id,
            issue: Some(issue),
            user: user.to_string(),
            day,
            worked: details["worked"].as_f64().map(Duration::hours),
            updated_required: details["updatedRequired"].as_f64().map(Duration::hours),
        })
    }
}
