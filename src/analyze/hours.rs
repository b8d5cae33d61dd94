use crate::model::{User, WorkLogEntry};
use std::collections::HashSet;

/// Average hours `user` logged per calendar day they logged anything.
/// NaN when they logged nothing.
pub fn calculate_hours_logged(entries: &[WorkLogEntry], user: &User) -> f64 {
    let mut total = 0.0;
    let mut days_seen = HashSet::new();
    for worked in entries {
        if worked.user != user.username {
            continue;
        }
        let (Some(hours), Some(day)) = (worked.worked, worked.day_key()) else {
            continue;
        };
        total += hours.as_hours();
        days_seen.insert(day);
    }

    total / days_seen.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::fixtures::at;

    #[test]
    fn test_same_day_counts_once() {
        let entries = vec![
            WorkLogEntry::new(1, "andy").on_day(at(2012, 3, 5, 9)).worked(2.0),
            WorkLogEntry::new(2, "andy").on_day(at(2012, 3, 5, 16)).worked(3.0),
        ];
        assert_eq!(calculate_hours_logged(&entries, &User::new("andy")), 5.0);
    }

    #[test]
    fn test_different_days_average() {
        let entries = vec![
            WorkLogEntry::new(1, "andy").on_day(at(2012, 3, 5, 9)).worked(2.0),
            WorkLogEntry::new(2, "andy").on_day(at(2012, 3, 6, 9)).worked(3.0),
        ];
        assert_eq!(calculate_hours_logged(&entries, &User::new("andy")), 2.5);
    }

    #[test]
    fn test_other_users_and_empty_entries_ignored() {
        let entries = vec![
            WorkLogEntry::new(1, "andy").on_day(at(2012, 3, 5, 9)).worked(4.0),
            WorkLogEntry::new(2, "zoe").on_day(at(2012, 3, 6, 9)).worked(3.0),
            WorkLogEntry::new(3, "andy").on_day(at(2012, 3, 7, 9)).remaining(1.0),
        ];
        assert_eq!(calculate_hours_logged(&entries, &User::new("andy")), 4.0);
    }

    #[test]
    fn test_nothing_logged_is_nan() {
        assert!(calculate_hours_logged(&[], &User::new("andy")).is_nan());
    }
}
