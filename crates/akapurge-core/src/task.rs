// ── Purge tasks ──
//
// A task is one API request: credential, endpoint, and validated items.
// `TaskKind` is the closed set of request shapes; everything that varies
// per kind (key namespace, endpoint path, payload) is a `match` on it.

use akapurge_api::ClientCredential;
use indexmap::IndexMap;
use serde::Serialize;
use strum::Display;
use tracing::debug;
use url::Url;

use crate::credential::{self, KeyNamespace};
use crate::eccu::EccuRequest;
use crate::error::PurgeError;
use crate::item::{self, PurgeItem, PurgeUrl};
use crate::path_tree::PathTree;
use crate::settings::{MAIL_KEY, Settings};

// ── TaskKind ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum TaskKind {
    /// Fast Purge by URL.
    Urls,
    /// ECCU directory purge of every URL's path and everything below it.
    UrlsRecursive,
    /// Fast Purge by cache tag.
    CacheTags,
    /// Fast Purge by CP code.
    CpCodes,
}

impl TaskKind {
    /// Settings namespace holding this kind's API credential.
    pub fn namespace(self) -> KeyNamespace {
        match self {
            Self::UrlsRecursive => KeyNamespace::Eccu,
            Self::Urls | Self::CacheTags | Self::CpCodes => KeyNamespace::FastPurge,
        }
    }

    /// API path appended to the credential host.
    pub fn endpoint_path(self) -> &'static str {
        match self {
            Self::Urls => "/ccu/v3/invalidate/url/production",
            Self::UrlsRecursive => "/eccu-api/v1/requests",
            Self::CacheTags => "/ccu/v3/invalidate/tag/production",
            Self::CpCodes => "/ccu/v3/invalidate/cpcode/production",
        }
    }

    pub fn endpoint(self, credential: &ClientCredential) -> Result<Url, PurgeError> {
        let host = credential.host();
        Url::parse(&format!("https://{host}{}", self.endpoint_path())).map_err(|source| {
            PurgeError::InvalidEndpoint {
                host: host.to_owned(),
                source,
            }
        })
    }
}

// ── Payloads ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct FastPurgeRequest<'a> {
    objects: &'a [PurgeItem],
}

// ── PurgeTask ───────────────────────────────────────────────────────

/// One fully-validated purge request, ready to send.
#[derive(Debug, Clone)]
pub struct PurgeTask {
    kind: TaskKind,
    credential: ClientCredential,
    endpoint: Url,
    items: Vec<PurgeItem>,
    /// Notification address, recursive purges only.
    notify: Option<String>,
}

impl PurgeTask {
    /// Build the tasks for one kind of input.
    ///
    /// Credentials are resolved first, then the endpoint, then the items.
    /// Fast Purge kinds always yield a single task. Recursive purges yield
    /// one task per host, in first-seen host order, since an ECCU request
    /// targets exactly one property.
    pub fn build<S: AsRef<str>>(
        kind: TaskKind,
        settings: &Settings,
        inputs: &[S],
    ) -> Result<Vec<Self>, PurgeError> {
        let credential = credential::resolve(settings, kind.namespace())?;
        let endpoint = kind.endpoint(&credential)?;
        let items = item::parse_items(kind, inputs)?;

        if kind != TaskKind::UrlsRecursive {
            return Ok(vec![Self {
                kind,
                credential,
                endpoint,
                items,
                notify: None,
            }]);
        }

        let notify = settings.get(MAIL_KEY).map(str::to_owned);
        let mut by_host: IndexMap<String, Vec<PurgeItem>> = IndexMap::new();
        for item in items {
            let host = item.as_url().map(PurgeUrl::host).unwrap_or_default().to_owned();
            by_host.entry(host).or_default().push(item);
        }
        if by_host.len() > 1 {
            debug!(hosts = by_host.len(), "splitting recursive purge by host");
        }

        Ok(by_host
            .into_values()
            .map(|items| Self {
                kind,
                credential: credential.clone(),
                endpoint: endpoint.clone(),
                items,
                notify: notify.clone(),
            })
            .collect())
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn credential(&self) -> &ClientCredential {
        &self.credential
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn items(&self) -> &[PurgeItem] {
        &self.items
    }

    pub fn notify(&self) -> Option<&str> {
        self.notify.as_deref()
    }

    /// Target host of a recursive purge.
    pub fn host(&self) -> Option<&str> {
        match self.kind {
            TaskKind::UrlsRecursive => self.urls().next().map(PurgeUrl::host),
            TaskKind::Urls | TaskKind::CacheTags | TaskKind::CpCodes => None,
        }
    }

    /// Consolidated directory tree of a recursive purge.
    pub fn path_tree(&self) -> Option<PathTree> {
        match self.kind {
            TaskKind::UrlsRecursive => Some(PathTree::from_paths(self.urls().map(PurgeUrl::segments))),
            TaskKind::Urls | TaskKind::CacheTags | TaskKind::CpCodes => None,
        }
    }

    fn urls(&self) -> impl Iterator<Item = &PurgeUrl> {
        self.items.iter().filter_map(PurgeItem::as_url)
    }

    /// JSON request body for this task's endpoint.
    pub fn payload(&self) -> Result<String, PurgeError> {
        let body = match self.kind {
            TaskKind::Urls | TaskKind::CacheTags | TaskKind::CpCodes => {
                serde_json::to_string(&FastPurgeRequest {
                    objects: &self.items,
                })?
            }
            TaskKind::UrlsRecursive => {
                let tree = self.path_tree().unwrap_or_default();
                let host = self.host().unwrap_or_default();
                serde_json::to_string(&EccuRequest::new(host, &tree, self.notify()))?
            }
        };
        Ok(body)
    }

    pub fn key(&self) -> TaskKey {
        TaskKey {
            kind: self.kind,
            host: self.host().map(str::to_owned),
        }
    }
}

// ── TaskSet ─────────────────────────────────────────────────────────

/// Identity of a task within a [`TaskSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskKey {
    pub kind: TaskKind,
    /// Set only for recursive purges, which are split per host.
    pub host: Option<String>,
}

/// Parsed command input, one optional batch per kind.
#[derive(Debug, Clone, Default)]
pub struct PurgeInput {
    pub urls: Option<Vec<String>>,
    pub recursive: bool,
    pub tags: Option<Vec<String>>,
    pub cp_codes: Option<Vec<String>>,
}

/// Insertion-ordered, deduplicated collection of tasks.
///
/// Adding a task whose [`TaskKey`] is already present keeps the first one.
#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: IndexMap<TaskKey, PurgeTask>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every task the input asks for, in URL, tag, CP-code order.
    ///
    /// Any configuration or validation error aborts the whole plan.
    pub fn plan(input: &PurgeInput, settings: &Settings) -> Result<Self, PurgeError> {
        let mut set = Self::new();

        if let Some(urls) = &input.urls {
            let kind = if input.recursive {
                TaskKind::UrlsRecursive
            } else {
                TaskKind::Urls
            };
            set.extend(PurgeTask::build(kind, settings, urls)?);
        }
        if let Some(tags) = &input.tags {
            set.extend(PurgeTask::build(TaskKind::CacheTags, settings, tags)?);
        }
        if let Some(codes) = &input.cp_codes {
            set.extend(PurgeTask::build(TaskKind::CpCodes, settings, codes)?);
        }

        debug!(tasks = set.len(), "purge plan built");
        Ok(set)
    }

    /// Returns `false` when a task with the same key was already present.
    pub fn insert(&mut self, task: PurgeTask) -> bool {
        let key = task.key();
        if self.tasks.contains_key(&key) {
            return false;
        }
        self.tasks.insert(key, task);
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &PurgeTask> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl Extend<PurgeTask> for TaskSet {
    fn extend<I: IntoIterator<Item = PurgeTask>>(&mut self, iter: I) {
        for task in iter {
            self.insert(task);
        }
    }
}
