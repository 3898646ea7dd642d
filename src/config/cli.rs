//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::registry::SubscriberId;

/// Taskwatch: Task List Change Monitor
///
/// Polls a remote newline-delimited task list, detects content changes,
/// and notifies subscribed Telegram chats.
#[derive(Debug, Parser)]
#[command(name = "taskwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run (default: the broadcast daemon)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Task list URL (required for all fetching commands)
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Per-request fetch timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Polling interval in seconds
    #[arg(long = "poll-interval", global = true)]
    pub poll_interval: Option<u64>,

    /// Path to the subscriber registry file
    #[arg(long = "registry-file", global = true)]
    pub registry_file: Option<PathBuf>,

    /// Telegram bot token (required for the broadcast daemon)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Telegram Bot API base URL
    #[arg(long = "api-base", global = true)]
    pub api_base: Option<String>,

    /// Handlebars template for the change notice
    #[arg(long = "message-template", global = true)]
    pub message_template: Option<String>,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Test mode - log notices without delivering them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for taskwatch
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "taskwatch.toml")]
        output: PathBuf,
    },

    /// Add a subscriber to the registry
    Subscribe {
        /// Telegram chat id (may be negative for group chats)
        #[arg(allow_hyphen_values = true)]
        id: SubscriberId,
    },

    /// Remove a subscriber from the registry
    Unsubscribe {
        /// Telegram chat id (may be negative for group chats)
        #[arg(allow_hyphen_values = true)]
        id: SubscriberId,
    },

    /// Fetch the task list once and print it
    Tasks,

    /// Poll the task list and print changes, without notifying anyone
    Watch,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
