use crate::model::Result;
use indexmap::IndexMap;
use serde_json::{from_str, Value};
use std::fs;

/// Project level configuration values, looked up by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectConfig {
    values: IndexMap<String, String>,
}

impl ProjectConfig {
    pub const TIMETRACKING_ENABLED: &'static str = "timetracking.enabled";
    pub const TIMETRACKING_BURNDOWN: &'static str = "timetracking.burndown";
    pub const TIMETRACKING_IGNORE_WEEKEND: &'static str = "timetracking.ignoreWeekend";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl ToString, value: impl ToString) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// A flag is set only when its value reads `true`, ignoring case.
    pub fn flag(&self, key: &str) -> bool {
        self.value(key)
            .map(|value| value.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn time_tracking_enabled(&self) -> bool {
        self.flag(Self::TIMETRACKING_ENABLED)
    }

    pub fn burndown(&self) -> bool {
        self.flag(Self::TIMETRACKING_BURNDOWN)
    }

    pub fn ignore_weekend(&self) -> bool {
        self.flag(Self::TIMETRACKING_IGNORE_WEEKEND)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub config: ProjectConfig,
}

// Create
impl Project {
    pub fn from_config(path: &str) -> Result<Vec<Self>> {
        let json_str = fs::read_to_string(path)?;
        Self::parse(&json_str)
    }

    pub fn new(id: impl ToString, name: impl ToString, config: ProjectConfig) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            config,
        }
    }
}

// Parser
impl Project {
    fn parse(json_str: &str) -> Result<Vec<Self>> {
        let elements: IndexMap<String, Value> = from_str(json_str)?;
        let mut result = Vec::new();
        for (id, details) in elements {
            let name = details["name"].as_str().unwrap_or(&id).to_string();
            let mut config = ProjectConfig::new();
            if let Some(values) = details["configuration"].as_object() {
                for (key, value) in values {
                    let value = match value {
                        Value::String(value) => value.clone(),
                        other => other.to_string(),
                    };
                    config = config.with(key, value);
                }
            }
            result.push(Self::new(id, name, config));
        }
        Ok(result)
    }
}
