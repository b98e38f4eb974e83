//! CLI error types with miette diagnostics.
//!
//! Maps config and purge errors into user-facing errors with help text.

use miette::Diagnostic;
use thiserror::Error;

use akapurge_config::ConfigError;
use akapurge_core::{ErrorCategory, PurgeError};

/// Process exit codes.
pub mod exit_code {
    pub const PURGE_FAILED: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(akapurge::config_file),
        help("Pass a readable properties or TOML file with --config-file.")
    )]
    ConfigFile(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(
        code(akapurge::config),
        help(
            "Fast Purge needs fastpurge_host, fastpurge_client_token,\n\
             fastpurge_client_secret and fastpurge_access_token; --recursive\n\
             needs the same four keys with the eccu_ prefix.\n\
             Any key can also come from AKAPURGE_<KEY> in the environment."
        )
    )]
    Config(PurgeError),

    // ── Validation ───────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(akapurge::validation),
        help("URLs must be absolute and name a host; CP codes are unsigned integers.")
    )]
    Validation(PurgeError),

    // ── Purge ────────────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(akapurge::transport),
        help("Check network access to the API host, or raise --timeout.")
    )]
    Transport(PurgeError),

    #[error(transparent)]
    #[diagnostic(
        code(akapurge::rejected),
        help(
            "The API did not answer 201 Created. Tasks before this one were\n\
             accepted; tasks after it were not sent."
        )
    )]
    Rejected(PurgeError),

    #[error("Could not set up the HTTP client: {0}")]
    #[diagnostic(code(akapurge::client))]
    Client(#[from] akapurge_api::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigFile(_) | Self::Config(_) => exit_code::CONFIG,
            Self::Validation(_) => exit_code::USAGE,
            Self::Transport(_) | Self::Rejected(_) | Self::Client(_) => exit_code::PURGE_FAILED,
        }
    }
}

// ── PurgeError → CliError mapping ────────────────────────────────────

impl From<PurgeError> for CliError {
    fn from(err: PurgeError) -> Self {
        match err.category() {
            ErrorCategory::Config => Self::Config(err),
            ErrorCategory::Validation => Self::Validation(err),
            ErrorCategory::Transport => Self::Transport(err),
            ErrorCategory::Api => Self::Rejected(err),
        }
    }
}
