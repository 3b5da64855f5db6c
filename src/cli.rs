//! CLI - Command Line Interface for tubetui
//!
//! Scriptable access to the catalog. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search the catalog
//! tubetui search "lofi hip hop" --json
//!
//! # Resolve an audio stream for a video id
//! tubetui resolve dQw4w9WgXcQ
//!
//! # Show or write the configuration
//! tubetui config --init
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Catalog or network failure
    NetworkError = 3,
    /// yt-dlp or mpv missing
    ToolNotFound = 4,
    /// Search matched nothing
    NoResults = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// tubetui - search a video catalog and stream its audio
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "tubetui",
    version,
    author = "Gorka & Hermes",
    about = "Terminal audio player for a video catalog",
    long_about = "Search a video catalog, pick a result and stream its audio \
                  through mpv.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  tubetui                             Launch interactive TUI\n\
                  tubetui search \"lofi hip hop\"       Search the catalog\n\
                  tubetui resolve dQw4w9WgXcQ         Print the audio stream URL\n\
                  tubetui config --init               Write a default config file"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the catalog
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Resolve the audio stream URL for a video id
    #[command(visible_alias = "r")]
    Resolve(ResolveCmd),

    /// Show the effective configuration
    Config(ConfigCmd),
}

/// Search the catalog by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results (defaults to the configured limit)
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

/// Resolve a stream for one video
#[derive(Args, Debug)]
pub struct ResolveCmd {
    /// Video id (11 characters)
    #[arg(required = true)]
    pub id: String,
}

/// Show or initialise configuration
#[derive(Args, Debug)]
pub struct ConfigCmd {
    /// Write the effective configuration to the config file
    #[arg(long)]
    pub init: bool,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data as JSON
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print a plain text line (human mode only)
    pub fn line(&self, msg: impl std::fmt::Display) {
        if !self.json {
            println!("{}", msg);
        }
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Video ID Validation
// =============================================================================

/// Validate a video id (11 characters of `[A-Za-z0-9_-]`)
pub fn validate_video_id(id: &str) -> Result<&str, &'static str> {
    const MSG: &str = "Invalid video id (expected 11 characters of A-Z, a-z, 0-9, '_' or '-')";

    let re = regex::Regex::new(r"^[A-Za-z0-9_-]{11}$").map_err(|_| MSG)?;
    if re.is_match(id) {
        Ok(id)
    } else {
        Err(MSG)
    }
}

// =============================================================================
// Tests
// =============================================================================
