//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use handlebars::Handlebars;
use url::Url;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML
/// config. The function validates all inputs and returns errors for invalid
/// configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Task list URL (required)
    pub url: Url,

    /// Per-request fetch timeout
    pub fetch_timeout: Duration,

    /// Polling interval
    pub poll_interval: Duration,

    /// Path to the subscriber registry file (tilde-expanded)
    pub registry_file: PathBuf,

    /// Telegram bot token. `None` is valid for commands that never deliver.
    pub token: Option<String>,

    /// Telegram Bot API base URL
    pub api_base: Url,

    /// Handlebars template for the change notice (optional)
    pub message_template: Option<String>,

    /// Dry-run mode (log notices without delivering them)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ url: {}, timeout: {}s, poll_interval: {}s, registry: {}, \
             api_base: {}, token: {}, template: {}, dry_run: {} }}",
            self.url,
            self.fetch_timeout.as_secs(),
            self.poll_interval.as_secs(),
            self.registry_file.display(),
            self.api_base,
            if self.token.is_some() { "set" } else { "unset" },
            if self.message_template.is_some() {
                "custom"
            } else {
                "default"
            },
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML
    /// config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The task list URL is missing or invalid
    /// - The API base URL is invalid
    /// - Duration values are zero
    /// - The message template has invalid Handlebars syntax
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let url = Self::resolve_url(cli, toml)?;
        let fetch_timeout = Self::resolve_fetch_timeout(cli, toml)?;
        let poll_interval = Self::resolve_poll_interval(cli, toml)?;
        let registry_file = Self::resolve_registry_file(cli, toml);
        let token = Self::resolve_token(cli, toml);
        let api_base = Self::resolve_api_base(cli, toml)?;
        let message_template = Self::resolve_message_template(cli, toml)?;

        Ok(Self {
            url,
            fetch_timeout,
            poll_interval,
            registry_file,
            token,
            api_base,
            message_template,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    fn resolve_url(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // CLI takes precedence
        let url_str = cli
            .url
            .as_deref()
            .or_else(|| toml.and_then(|t| t.source.url.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(field::URL, "Use --url or set source.url in config file")
            })?;

        parse_url(url_str)
    }

    fn resolve_fetch_timeout(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .timeout
            .or_else(|| toml.and_then(|t| t.source.timeout))
            .unwrap_or(defaults::FETCH_TIMEOUT_SECS);

        positive_duration("timeout", seconds)
    }

    fn resolve_poll_interval(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        let seconds = cli
            .poll_interval
            .or_else(|| toml.and_then(|t| t.monitor.poll_interval))
            .unwrap_or(defaults::POLL_INTERVAL_SECS);

        positive_duration("poll_interval", seconds)
    }

    fn resolve_registry_file(cli: &Cli, toml: Option<&TomlConfig>) -> PathBuf {
        let path = cli.registry_file.clone().unwrap_or_else(|| {
            toml.and_then(|t| t.monitor.registry_file.as_deref())
                .map_or_else(|| PathBuf::from(defaults::REGISTRY_FILE), PathBuf::from)
        });

        expand_tilde(&path)
    }

    fn resolve_token(cli: &Cli, toml: Option<&TomlConfig>) -> Option<String> {
        cli.token
            .clone()
            .or_else(|| toml.and_then(|t| t.notify.token.clone()))
    }

    fn resolve_api_base(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        let base_str = cli
            .api_base
            .as_deref()
            .or_else(|| toml.and_then(|t| t.notify.api_base.as_deref()))
            .unwrap_or(defaults::API_BASE);

        parse_url(base_str)
    }

    fn resolve_message_template(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Option<String>, ConfigError> {
        let template = cli
            .message_template
            .clone()
            .or_else(|| toml.and_then(|t| t.notify.message_template.clone()));

        // Validate Handlebars syntax if a template is provided
        if let Some(ref tmpl) = template {
            Self::validate_template(tmpl)?;
        }

        Ok(template)
    }

    fn validate_template(template: &str) -> Result<(), ConfigError> {
        let hbs = Handlebars::new();
        // Compile-check only; render with an empty-list context to validate syntax
        hbs.render_template(
            template,
            &serde_json::json!({ "tasks": [], "count": 0, "empty": true }),
        )
        .map_err(|e| ConfigError::InvalidTemplate {
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn parse_url(s: &str) -> Result<Url, ConfigError> {
    Url::parse(s).map_err(|e| ConfigError::InvalidUrl {
        url: s.to_string(),
        reason: e.to_string(),
    })
}

fn positive_duration(field: &'static str, seconds: u64) -> Result<Duration, ConfigError> {
    if seconds == 0 {
        return Err(ConfigError::InvalidDuration {
            field,
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok(Duration::from_secs(seconds))
}

/// Expands a leading `~` or `~/` to the user's home directory.
///
/// Paths without a leading tilde are returned unchanged, as is the tilde
/// itself when no home directory can be determined.
fn expand_tilde(path: &Path) -> PathBuf {
    let Some(s) = path.to_str() else {
        return path.to_path_buf();
    };

    if s == "~" {
        return dirs::home_dir().unwrap_or_else(|| path.to_path_buf());
    }

    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }

    path.to_path_buf()
}
