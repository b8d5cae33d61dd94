use crate::model::Result;
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct User {
    pub username: String,
    pub full_name: Option<String>,
    pub hidden_in_time_tracking: bool,
    pub can_login: bool,
}

// Create
impl User {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(username: impl ToString) -> Self {
        Self {
            username: username.to_string(),
            full_name: None,
            hidden_in_time_tracking: false,
            can_login: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.hidden_in_time_tracking = true;
        self
    }

    pub fn without_login(mut self) -> Self {
        self.can_login = false;
        self
    }

    pub fn full_name_or_username(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.username)
    }
}

// Parser
impl User {
    fn parse(json_str: &str) -> Result<Vec<Self>> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (name, details) in elements {
            let mut new = Self::new(name);
            new.full_name = details["fullName"].as_str().map(String::from);
            new.hidden_in_time_tracking = details["hiddenInTimeTracking"].as_bool().unwrap_or(false);
            new.can_login = details["canLogin"].as_bool().unwrap_or(true);
            result.push(new);
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_users_keeps_file_order() {
        let users = User::parse(
            r#"{
                "zoe": { "fullName": "Zoe Smith" },
                "bot": { "hiddenInTimeTracking": true, "canLogin": false },
                "andy": {}
            }"#,
        )
        .unwrap();

        assert_eq!(users.len(), 3);
        assert_eq!(users[0].full_name_or_username(), "Zoe Smith");
        assert!(users[1].hidden_in_time_tracking);
        assert!(!users[1].can_login);
        assert_eq!(users[2].full_name_or_username(), "andy");
        assert!(users[2].can_login);
    }
}
