// ── Core error types ──
//
// The purge taxonomy: configuration, validation, transport, and API
// rejection. Configuration and validation errors surface while tasks are
// being built, before any network call. Transport and API errors end a
// dispatch run at the first failing task.

use thiserror::Error;

use crate::credential::KeyNamespace;
use crate::task::TaskKind;

/// Broad class of a [`PurgeError`], used by the CLI to pick an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Validation,
    Transport,
    Api,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum PurgeError {
    // ── Configuration errors ─────────────────────────────────────────
    #[error("Incomplete {namespace} configuration: missing or blank {}", .missing.join(", "))]
    IncompleteConfig {
        namespace: KeyNamespace,
        missing: Vec<String>,
    },

    #[error("Invalid API host '{host}': {source}")]
    InvalidEndpoint {
        host: String,
        #[source]
        source: url::ParseError,
    },

    // ── Validation errors ────────────────────────────────────────────
    #[error("Malformed URL '{input}': {reason}")]
    MalformedUrl { input: String, reason: String },

    #[error("Invalid CP code '{input}': {source}")]
    InvalidCpCode {
        input: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("No {kind} items to purge")]
    EmptyInput { kind: TaskKind },

    // ── Dispatch errors ──────────────────────────────────────────────
    #[error("Transport failure: {0}")]
    Transport(#[from] akapurge_api::Error),

    #[error("{kind} purge rejected (HTTP {status}): {body}")]
    Api {
        kind: TaskKind,
        status: u16,
        body: String,
    },

    #[error("Failed to encode request payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl PurgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IncompleteConfig { .. } | Self::InvalidEndpoint { .. } => ErrorCategory::Config,
            Self::MalformedUrl { .. } | Self::InvalidCpCode { .. } | Self::EmptyInput { .. } => {
                ErrorCategory::Validation
            }
            Self::Transport(_) | Self::Payload(_) => ErrorCategory::Transport,
            Self::Api { .. } => ErrorCategory::Api,
        }
    }
}
