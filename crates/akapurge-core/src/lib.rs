//! Purge planning and dispatch between `akapurge-api` and the CLI.
//!
//! - **[`Settings`]**: flat key/value configuration as loaded by
//!   `akapurge-config`; [`credential::resolve`] turns one key namespace of it
//!   into an EdgeGrid [`ClientCredential`].
//!
//! - **[`PurgeItem`]**: validated URLs, cache tags, and CP codes. Parsing is
//!   all-or-nothing per batch.
//!
//! - **[`PathTree`]**: consolidates recursive-purge URLs into the minimal set
//!   of directory prefixes; [`eccu::render_metadata`] serializes it into the
//!   ECCU match document.
//!
//! - **[`PurgeTask`] / [`TaskSet`]**: one task per API request, keyed by
//!   [`TaskKind`] (and host, for recursive purges).
//!
//! - **[`Dispatcher`]**: sends tasks in order through a [`PurgeSender`] and
//!   stops at the first failure.

pub mod credential;
pub mod dispatch;
pub mod eccu;
pub mod error;
pub mod item;
pub mod path_tree;
pub mod settings;
pub mod task;

// ── Primary re-exports ──────────────────────────────────────────────
pub use credential::KeyNamespace;
pub use dispatch::{Dispatcher, PurgeSender, TaskOutcome};
pub use eccu::EccuRequest;
pub use error::{ErrorCategory, PurgeError};
pub use item::{PurgeItem, PurgeUrl};
pub use path_tree::{PathNode, PathTree};
pub use settings::Settings;
pub use task::{PurgeInput, PurgeTask, TaskKey, TaskKind, TaskSet};

pub use akapurge_api::{ClientCredential, PurgeAck, PurgeResponse};
