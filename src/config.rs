//! Configuration file handling.
//!
//! Settings come from `.timetracking.toml` (or `--config`); command-line flags win.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = ".timetracking.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// URL templates for wiki links, keyed by module (`doc`, `issue`, ...).
    /// `{project}` and `{name}` are substituted.
    #[serde(default)]
    pub links: LinksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory the markdown reports are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            verbose: false,
        }
    }
}

fn default_output_dir() -> String {
    ".".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a computed velocity is reused. Zero disables caching.
    #[serde(default = "default_velocity_ttl_hours")]
    pub velocity_ttl_hours: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            velocity_ttl_hours: default_velocity_ttl_hours(),
        }
    }
}

fn default_velocity_ttl_hours() -> u64 {
    7 * 24
}

impl CacheConfig {
    pub fn velocity_ttl(&self) -> Duration {
        Duration::from_secs(self.velocity_ttl_hours * 60 * 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinksConfig {
    pub templates: IndexMap<String, String>,
}

impl Default for LinksConfig {
    fn default() -> Self {
        let templates = [
            ("doc", "/{project}/docs/{name}"),
            ("issue", "/{project}/issues/view/id/{name}"),
            ("milestone", "/{project}/milestones/view/id/{name}"),
        ]
        .into_iter()
        .map(|(module, template)| (module.to_string(), template.to_string()))
        .collect();
        Self { templates }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Returns `Ok(None)` if the default file doesn't exist.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    pub fn merge_with_args(&mut self, args: &crate::Args) {
        if let Some(output_dir) = &args.output_dir {
            self.general.output_dir = output_dir.clone();
        }
        if let Some(ttl) = args.cache_ttl_hours {
            self.cache.velocity_ttl_hours = ttl;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }
}
