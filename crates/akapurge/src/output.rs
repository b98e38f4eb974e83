//! Plain-text rendering of planned and completed purges.
//!
//! Everything here goes to stdout; logs and diagnostics go to stderr.

use std::fmt::Write as _;

use akapurge_core::{PurgeError, PurgeTask, TaskOutcome};

/// Describe a task without sending it: request line, then the JSON body.
pub fn render_task(task: &PurgeTask) -> Result<String, PurgeError> {
    let mut out = format!("{} POST {}", task.kind(), task.endpoint());
    if let Some(host) = task.host() {
        let _ = write!(out, " ({host})");
    }
    out.push('\n');
    out.push_str(&task.payload()?);
    Ok(out)
}

/// One summary line for an accepted purge.
pub fn render_outcome(outcome: &TaskOutcome) -> String {
    let mut line = outcome.kind.to_string();
    if let Some(host) = &outcome.host {
        let _ = write!(line, " {host}");
    }
    let _ = write!(line, ": accepted (HTTP {})", outcome.status);

    let Some(ack) = &outcome.ack else {
        return line;
    };
    if let Some(id) = &ack.purge_id {
        let _ = write!(line, " purgeId={id}");
    }
    if let Some(id) = &ack.request_id {
        let _ = write!(line, " requestId={id}");
    }
    if let Some(secs) = ack.estimated_seconds {
        let _ = write!(line, " estimated={secs}s");
    }
    line
}
