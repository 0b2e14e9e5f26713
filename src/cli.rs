//! Command-line interface parsing for moviecat
//!
//! This module handles parsing of CLI arguments using clap and turns the raw
//! subcommand into a validated `Request` the binary can execute.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::config::RetrySettings;
use crate::data::TimeWindow;
use crate::retry::RetryPolicy;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified trending window is not recognized
    #[error("Invalid time window: '{0}'. Valid windows: day, week")]
    InvalidWindow(String),

    /// Page numbers are 1-based
    #[error("Invalid page: {0}. Pages start at 1")]
    InvalidPage(u32),
}

/// moviecat - Browse trending, popular and searched movies from TMDB
#[derive(Parser, Debug)]
#[command(name = "moviecat")]
#[command(about = "Browse trending, popular and searched movies from TMDB")]
#[command(version)]
pub struct Cli {
    /// Path to config file (default: $XDG_CONFIG_HOME/moviecat/config.json)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Total attempts per request, overriding the config file
    #[arg(long, value_name = "N", global = true)]
    pub retries: Option<u32>,

    /// Base delay between attempts in milliseconds, overriding the config file
    #[arg(long, value_name = "MS", global = true)]
    pub retry_delay_ms: Option<u64>,

    /// Print raw JSON instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Trending today and the first page of popular movies
    Home,

    /// Trending movies
    ///
    /// Valid windows: day, week
    Trending {
        #[arg(short, long, value_name = "WINDOW")]
        window: Option<String>,
    },

    /// Popular movies
    Popular {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Search movies by title
    Search {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },

    /// Full details for a movie, including cast and trailer
    Details { id: u64 },

    /// Build an image URL from a poster path (no network access)
    ImageUrl {
        path: Option<String>,
        /// Image size segment, e.g. w185 or original
        #[arg(short, long)]
        size: Option<String>,
    },
}

/// A validated request derived from the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Home,
    Trending(TimeWindow),
    Popular(u32),
    Search { query: String, page: u32 },
    Details(u64),
    ImageUrl {
        path: Option<String>,
        size: Option<String>,
    },
}

impl Request {
    /// Validates a parsed subcommand.
    ///
    /// Search text is passed through untouched; the client rejects blank queries.
    pub fn from_command(command: &Command) -> Result<Self, CliError> {
        match command {
            Command::Home => Ok(Request::Home),
            Command::Trending { window } => {
                let window = match window {
                    Some(w) => parse_window_arg(w)?,
                    None => TimeWindow::default(),
                };
                Ok(Request::Trending(window))
            }
            Command::Popular { page } => Ok(Request::Popular(check_page(*page)?)),
            Command::Search { query, page } => Ok(Request::Search {
                query: query.clone(),
                page: check_page(*page)?,
            }),
            Command::Details { id } => Ok(Request::Details(*id)),
            Command::ImageUrl { path, size } => Ok(Request::ImageUrl {
                path: path.clone(),
                size: size.clone(),
            }),
        }
    }

    /// Whether executing this request talks to the API
    pub fn needs_network(&self) -> bool {
        !matches!(self, Request::ImageUrl { .. })
    }
}

/// Parses a trending window argument.
pub fn parse_window_arg(s: &str) -> Result<TimeWindow, CliError> {
    TimeWindow::parse(s).ok_or_else(|| CliError::InvalidWindow(s.to_string()))
}

fn check_page(page: u32) -> Result<u32, CliError> {
    if page == 0 {
        Err(CliError::InvalidPage(page))
    } else {
        Ok(page)
    }
}

impl Cli {
    /// Retry policy from config settings with any CLI overrides applied
    pub fn retry_policy(&self, settings: &RetrySettings) -> RetryPolicy {
        let base = settings.policy();
        RetryPolicy::new(
            self.retries.unwrap_or(base.max_attempts),
            self.retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(base.base_delay),
        )
    }
}
