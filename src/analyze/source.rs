use crate::model::{Issue, IssueId, User, WorkLogEntry};
use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("issue {0} not found")]
    IssueNotFound(IssueId),
}

/// Persistence queries the aggregator reads work logs through.
pub trait WorkLogSource {
    /// Entries with positive worked time logged by `user`, optionally bounded to the
    /// inclusive `[start, end]` window. Order is unspecified.
    fn work_logged_by(
        &self,
        user: &User,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Vec<WorkLogEntry>;

    fn issue(&self, id: IssueId) -> Result<&Issue, LookupError>;

    fn user(&self, username: &str) -> Option<&User>;

    fn users(&self) -> Vec<&User>;
}
