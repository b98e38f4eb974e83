// ── Purge items ──
//
// Raw command-line strings become typed items here. Each batch is parsed
// all-or-nothing: the first bad entry fails the whole batch and no task is
// built from it.

use std::fmt;

use serde::{Serialize, Serializer};
use url::Url;

use crate::error::PurgeError;
use crate::task::TaskKind;

// ── PurgeUrl ────────────────────────────────────────────────────────

/// An absolute URL with a host component.
///
/// Keeps the operator's text verbatim for Fast Purge payloads alongside the
/// parsed form used for host grouping and path consolidation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeUrl {
    raw: String,
    url: Url,
    host: String,
}

impl PurgeUrl {
    pub fn parse(input: &str) -> Result<Self, PurgeError> {
        let raw = input.trim();
        let url = Url::parse(raw).map_err(|e| PurgeError::MalformedUrl {
            input: raw.to_owned(),
            reason: e.to_string(),
        })?;
        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| PurgeError::MalformedUrl {
                input: raw.to_owned(),
                reason: "URL has no host".into(),
            })?
            .to_owned();

        Ok(Self {
            raw: raw.to_owned(),
            url,
            host,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercased host, as normalized by the URL parser.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Non-empty `/`-separated path segments, still percent-encoded.
    /// Query and fragment are not part of the path.
    pub fn segments(&self) -> Vec<&str> {
        self.url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect()
    }
}

impl fmt::Display for PurgeUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PurgeUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

// ── PurgeItem ───────────────────────────────────────────────────────

/// One validated thing to invalidate.
///
/// Serializes to the bare JSON value the Fast Purge `objects` array expects:
/// a string for URLs and tags, a number for CP codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PurgeItem {
    Url(PurgeUrl),
    CacheTag(String),
    CpCode(u32),
}

impl PurgeItem {
    pub fn as_url(&self) -> Option<&PurgeUrl> {
        match self {
            Self::Url(url) => Some(url),
            Self::CacheTag(_) | Self::CpCode(_) => None,
        }
    }
}

impl fmt::Display for PurgeItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::CacheTag(tag) => f.write_str(tag),
            Self::CpCode(code) => write!(f, "{code}"),
        }
    }
}

// ── Batch parsing ───────────────────────────────────────────────────

/// Trimmed, non-empty entries in their original order.
fn entries<S: AsRef<str>>(inputs: &[S]) -> impl Iterator<Item = &str> {
    inputs
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
}

/// Parse a URL batch. Fails on the first malformed entry.
pub fn parse_urls<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<PurgeUrl>, PurgeError> {
    entries(inputs).map(PurgeUrl::parse).collect()
}

/// Parse a batch for the given task kind, preserving input order.
///
/// Every entry is trimmed first, cache tags included: a tag is otherwise
/// taken as-is, but surrounding whitespace from `--tags "a, b"` is never
/// part of it. Entries that are blank after trimming are skipped.
pub fn parse_items<S: AsRef<str>>(
    kind: TaskKind,
    inputs: &[S],
) -> Result<Vec<PurgeItem>, PurgeError> {
    let items: Vec<PurgeItem> = match kind {
        TaskKind::Urls | TaskKind::UrlsRecursive => parse_urls(inputs)?
            .into_iter()
            .map(PurgeItem::Url)
            .collect(),
        TaskKind::CacheTags => entries(inputs)
            .map(|tag| PurgeItem::CacheTag(tag.to_owned()))
            .collect(),
        TaskKind::CpCodes => entries(inputs)
            .map(|code| {
                code.parse::<u32>()
                    .map(PurgeItem::CpCode)
                    .map_err(|source| PurgeError::InvalidCpCode {
                        input: code.to_owned(),
                        source,
                    })
            })
            .collect::<Result<_, _>>()?,
    };

    if items.is_empty() {
        return Err(PurgeError::EmptyInput { kind });
    }
    Ok(items)
}
