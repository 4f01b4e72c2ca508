//! TOML configuration: HTTP client settings, output limits, and the set of
//! filter lists to convert.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::split::MAX_RULES_PER_FILE;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub output: OutputConfig,
    pub lists: Vec<FilterList>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    pub retries: u32,
}

impl Default for HttpConfig {
    fn default() -> HttpConfig {
        HttpConfig {
            timeout_secs: 30,
            retries: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub max_rules_per_file: usize,
    pub generate_combined: bool,
    pub generate_manifest: bool,
}

impl Default for OutputConfig {
    fn default() -> OutputConfig {
        OutputConfig {
            max_rules_per_file: MAX_RULES_PER_FILE,
            generate_combined: true,
            generate_manifest: true,
        }
    }
}

/// One filter list source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterList {
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn enabled_lists(&self) -> impl Iterator<Item = &FilterList> {
        self.lists.iter().filter(|list| list.enabled)
    }
}

/// Default configuration written by `webkit-filters init`.
pub const DEFAULT_CONFIG: &str = r#"# webkit-filters configuration

# HTTP client settings
[http]
timeout_secs = 30
retries = 3

# Output settings
[output]
max_rules_per_file = 50000
generate_combined = true
generate_manifest = true

# Filter lists to convert
# Set enabled = false to skip a list

[[lists]]
name = "easylist"
url = "https://easylist.to/easylist/easylist.txt"
enabled = true

[[lists]]
name = "easyprivacy"
url = "https://easylist.to/easylist/easyprivacy.txt"
enabled = true

[[lists]]
name = "ublock-filters"
url = "https://ublockorigin.github.io/uAssets/filters/filters.txt"
enabled = true

[[lists]]
name = "ublock-privacy"
url = "https://ublockorigin.github.io/uAssets/filters/privacy.txt"
enabled = true

[[lists]]
name = "ublock-badware"
url = "https://ublockorigin.github.io/uAssets/filters/badware.txt"
enabled = true

[[lists]]
name = "ublock-unbreak"
url = "https://ublockorigin.github.io/uAssets/filters/unbreak.txt"
enabled = true

[[lists]]
name = "ublock-quick-fixes"
url = "https://ublockorigin.github.io/uAssets/filters/quick-fixes.txt"
enabled = true
"#;
