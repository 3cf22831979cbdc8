//! CLI module for the class-type checker
//!
//! ## Commands
//!
//! - `check <file>` - Load a declaration file and run its checks
//! - `show <file>` - Print the slot layout of every declared type
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use crate::config::CheckConfig;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Structural class-type checker
#[derive(Parser, Debug)]
#[command(name = "classtype")]
#[command(version = VERSION)]
#[command(about = "Load class and interface declarations and check structural assignability", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run every check in a declaration file
    Check {
        /// Declaration file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Report only the first failure of each check
        #[arg(long)]
        first_only: bool,
        /// Print class layouts before the check results
        #[arg(long)]
        show_layout: bool,
    },

    /// Print the slot layout of every declared type
    Show {
        /// Declaration file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Check {
            file,
            first_only,
            show_layout,
        } => {
            let config = CheckConfig::new()
                .with_collect_all(!first_only)
                .with_show_layout(show_layout);
            commands::check_file(&file, &config)
        }
        Command::Show { file } => commands::show_file(&file),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_error_exit_codes() {
        let err = CliError::new("boom", ExitCode(2));
        assert_eq!(err.exit_code, ExitCode(2));
        assert_eq!(err.to_string(), "boom");
        assert_eq!(CliError::failure("bad").exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_cli_parse_check() {
        let cli = Cli::try_parse_from(["classtype", "check", "decls.json"]).unwrap();
        if let Command::Check {
            file,
            first_only,
            show_layout,
        } = cli.command
        {
            assert_eq!(file, PathBuf::from("decls.json"));
            assert!(!first_only);
            assert!(!show_layout);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_parse_check_flags() {
        let cli =
            Cli::try_parse_from(["classtype", "check", "--first-only", "--show-layout", "decls.json"]).unwrap();
        if let Command::Check {
            first_only,
            show_layout,
            ..
        } = cli.command
        {
            assert!(first_only);
            assert!(show_layout);
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_parse_show() {
        let cli = Cli::try_parse_from(["classtype", "show", "decls.json"]).unwrap();
        assert!(matches!(cli.command, Command::Show { .. }));
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["classtype"]).is_err());
        assert!(Cli::try_parse_from(["classtype", "check"]).is_err());
    }
}
