//! Clap derive structures for the `akapurge` CLI.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use akapurge_core::PurgeInput;

// ── Top-Level CLI ────────────────────────────────────────────────────

/// akapurge -- invalidate Akamai edge caches by URL, directory, tag, or CP code
#[derive(Debug, Parser)]
#[command(
    name = "akapurge",
    version,
    about = "Invalidate Akamai edge caches from the command line",
    long_about = "Invalidate Akamai edge caches from the command line.\n\n\
        URLs, cache tags, and CP codes go through the Fast Purge API.\n\
        With --recursive, URLs are consolidated into directory prefixes\n\
        and sent as an ECCU request, one per host.",
    arg_required_else_help = true,
    group(
        ArgGroup::new("targets")
            .args(["urls", "tags", "cpcodes"])
            .required(true)
            .multiple(true)
    )
)]
pub struct Cli {
    /// Properties or TOML file holding the API credentials
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config_file: PathBuf,

    // ── Purge targets ────────────────────────────────────────────────
    /// URLs to invalidate (comma-separated)
    #[arg(long, short = 'u', value_delimiter = ',', value_name = "URL")]
    pub urls: Option<Vec<String>>,

    /// Cache tags to invalidate (comma-separated)
    #[arg(long, short = 't', value_delimiter = ',', value_name = "TAG")]
    pub tags: Option<Vec<String>>,

    /// CP codes to invalidate (comma-separated)
    #[arg(long, value_delimiter = ',', value_name = "CODE")]
    pub cpcodes: Option<Vec<String>>,

    /// Purge each URL's directory and everything below it (ECCU)
    #[arg(long, short = 'r', requires = "urls")]
    pub recursive: bool,

    /// Address notified when a recursive purge completes
    #[arg(long, short = 'm', value_name = "ADDRESS")]
    pub mail: Option<String>,

    // ── Behaviour ────────────────────────────────────────────────────
    /// Print each request instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Request timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    pub timeout: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    pub fn purge_input(&self) -> PurgeInput {
        PurgeInput {
            urls: self.urls.clone(),
            recursive: self.recursive,
            tags: self.tags.clone(),
            cp_codes: self.cpcodes.clone(),
        }
    }
}
