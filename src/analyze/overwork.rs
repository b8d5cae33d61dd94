use crate::model::Issue;
use std::fmt::{Display, Formatter};

/// How far logged work has run past an issue's estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overwork {
    Warning,
    Failing,
}

impl Display for Overwork {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Overwork::Warning => write!(f, "⚠️ over estimate"),
            Overwork::Failing => write!(f, "❌ far over estimate"),
        }
    }
}

/// Only meaningful in burndown mode for issues with a positive estimate.
///
/// Whatever was worked plus what is still required beyond the original estimate is the
/// overrun; more than half the estimate fails, anything at all warns.
pub fn overwork(issue: &Issue, burndown: bool) -> Option<Overwork> {
    if !burndown {
        return None;
    }
    let estimate = issue.time_estimate?.as_hours();
    if estimate <= 0.0 {
        return None;
    }

    let required = issue.time_required.map_or(estimate, |r| r.as_hours());
    let remain = estimate - issue.total_worked().as_hours() - required;
    if remain < -(estimate / 2.0) {
        Some(Overwork::Failing)
    } else if remain < 0.0 {
        Some(Overwork::Warning)
    } else {
        None
    }
}
