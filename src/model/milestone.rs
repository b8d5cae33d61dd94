use crate::model::{parse_datetime, IssueId, ModelError, Result};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Milestone {
    pub name: String,
    pub project: String,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub issues: Vec<IssueId>,
}

// Create
impl Milestone {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(name: impl ToString, project: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            project: project.to_string(),
            start_date: None,
            due_date: None,
            issues: vec![],
        }
    }

    pub fn starting(mut self, start: NaiveDateTime) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn due(mut self, due: NaiveDateTime) -> Self {
        self.due_date = Some(due);
        self
    }
}

// Parser
impl Milestone {
    fn parse(json_str: &str) -> Result<Vec<Self>> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (name, details) in elements {
            let Some(project) = details["project"].as_str() else {
                return Err(ModelError::missing(&name, "project"));
            };
            let mut new = Self::new(&name, project);
            if let Some(start) = details["start"].as_str() {
                new.start_date = Some(parse_datetime(start)?);
            }
            if let Some(due) = details["due"].as_str() {
                new.due_date = Some(parse_datetime(due)?);
            }
            new.issues = match details["issues"].as_array() {
                Some(ids) => ids.iter().filter_map(Value::as_i64).collect(),
                None => vec![],
            };
            result.push(new);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_milestone_optional_dates() {
        let milestones = Milestone::parse(
            r#"{
                "1.0": { "project": "agile", "due": "2012-03-30T17:00:00Z", "issues": [1, 2, 5] },
                "backlog": { "project": "agile" }
            }"#,
        )
        .unwrap();

        assert_eq!(milestones[0].issues, vec![1, 2, 5]);
        assert!(milestones[0].start_date.is_none());
        assert!(milestones[0].due_date.is_some());
        assert!(milestones[1].due_date.is_none());
    }

    #[test]
    fn test_invalid_due_date() {
        let error =
            Milestone::parse(r#"{ "1.0": { "project": "agile", "due": "next friday" } }"#)
                .unwrap_err();
        assert!(matches!(error, ModelError::InvalidDate(_)));
    }
}
