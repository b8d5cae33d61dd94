//! Shared builders for aggregator tests.

use crate::analyze::{LookupError, WorkLogSource, WorkLogStore};
use crate::model::{DayKey, Issue, IssueId, User, WorkLogEntry};
use chrono::{NaiveDate, NaiveDateTime};

pub fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, 0, 0))
        .expect("valid test date")
}

pub fn day(year: i32, month: u32, day: u32) -> DayKey {
    DayKey::from_date(NaiveDate::from_ymd_opt(year, month, day).expect("valid test date"))
}

pub fn store(users: Vec<User>, issues: Vec<Issue>) -> WorkLogStore {
    WorkLogStore::new(users, vec![], vec![], issues)
}

/// A source whose range query ignores the range, like a sloppy backend would.
pub struct LeakySource {
    entries: Vec<WorkLogEntry>,
}

impl LeakySource {
    pub fn new(entries: Vec<WorkLogEntry>) -> Self {
        Self { entries }
    }
}

impl WorkLogSource for LeakySource {
    fn work_logged_by(
        &self,
        user: &User,
        _range: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Vec<WorkLogEntry> {
        self.entries
            .iter()
            .filter(|worked| worked.user == user.username)
            .cloned()
            .collect()
    }

    fn issue(&self, id: IssueId) -> Result<&Issue, LookupError> {
        Err(LookupError::IssueNotFound(id))
    }

    fn user(&self, _username: &str) -> Option<&User> {
        None
    }

    fn users(&self) -> Vec<&User> {
        vec![]
    }
}
