mod day;
mod duration;
mod error;
mod issue;
mod milestone;
mod project;
mod user;
mod work_log;

pub use day::DayKey;
pub use duration::Duration;
pub use error::{ModelError, Result};
pub use issue::{Issue, IssueId, IssueStatus};
pub use milestone::Milestone;
pub use project::{Project, ProjectConfig};
pub use user::User;
pub use work_log::{WorkLogEntry, WorkLogId};

use chrono::{DateTime, Local, NaiveDateTime};

/// Parses an RFC 3339 timestamp into the viewer's local calendar.
pub(crate) fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    let Ok(datetime) = DateTime::parse_from_rfc3339(value) else {
        return Err(ModelError::InvalidDate(value.to_string()));
    };
    Ok(datetime.with_timezone(&Local).naive_local())
}
