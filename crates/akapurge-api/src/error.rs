use thiserror::Error;

/// Top-level error type for the `akapurge-api` crate.
///
/// Covers credential construction, request signing, and transport.
/// A non-success HTTP status is *not* an error at this layer -- the
/// caller receives the status and decides. `akapurge-core` maps these
/// into its purge taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Credentials ─────────────────────────────────────────────────
    /// A credential field was missing or blank.
    #[error("Incomplete credential: {field} is blank")]
    IncompleteCredential { field: &'static str },

    // ── Signing ─────────────────────────────────────────────────────
    /// The request could not be signed (e.g. the target URL has no host).
    #[error("Request signing failed: {0}")]
    Signing(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

impl Error {
    /// Returns `true` if the request never got an HTTP response back.
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
