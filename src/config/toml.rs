//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::Path;

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// Task list source configuration section
    #[serde(default)]
    pub source: SourceSection,

    /// Monitoring configuration section
    #[serde(default)]
    pub monitor: MonitorSection,

    /// Notification delivery configuration section
    #[serde(default)]
    pub notify: NotifySection,
}

/// Task list source configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSection {
    /// Task list URL
    pub url: Option<String>,

    /// Per-request fetch timeout in seconds
    pub timeout: Option<u64>,
}

/// Monitoring configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorSection {
    /// Polling interval in seconds
    pub poll_interval: Option<u64>,

    /// Path to the subscriber registry file
    pub registry_file: Option<String>,
}

/// Notification delivery configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifySection {
    /// Telegram bot token
    pub token: Option<String>,

    /// Telegram Bot API base URL
    pub api_base: Option<String>,

    /// Handlebars template for the change notice
    pub message_template: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# Taskwatch Configuration File

[source]
# Task list URL (required)
# url = "https://example.com/tasks.txt"

# Per-request fetch timeout in seconds (default: 30)
# timeout = 30

[monitor]
# Polling interval in seconds (default: 60)
poll_interval = 60

# Path to the subscriber registry file (default: subscribers.json)
# Supports ~ expansion.
# registry_file = "~/.taskwatch/subscribers.json"

[notify]
# Telegram bot token (required for the broadcast daemon)
# token = "123456:ABC-DEF"

# Telegram Bot API base URL (default: https://api.telegram.org)
# api_base = "https://api.telegram.org"

# Handlebars template for the change notice
# Available variables: {{tasks}} (list), {{count}}, {{empty}}
# message_template = "Tasks ({{count}}):\n{{#each tasks}}{{this}}\n{{/each}}"
"#
    .to_string()
}
