// ── Dispatch ──
//
// Sends a planned task set one request at a time. The first transport
// failure or non-201 answer ends the run; purges already accepted stay
// accepted, since invalidation cannot be rolled back.

use std::future::Future;

use akapurge_api::{ClientCredential, PurgeAck, PurgeClient, PurgeResponse};
use tracing::{debug, error, info};
use url::Url;

use crate::error::PurgeError;
use crate::task::{PurgeTask, TaskKind, TaskSet};

/// Anything that can deliver one signed JSON POST.
pub trait PurgeSender {
    fn send(
        &self,
        endpoint: &Url,
        credential: &ClientCredential,
        body: &str,
    ) -> impl Future<Output = Result<PurgeResponse, akapurge_api::Error>>;
}

impl PurgeSender for PurgeClient {
    async fn send(
        &self,
        endpoint: &Url,
        credential: &ClientCredential,
        body: &str,
    ) -> Result<PurgeResponse, akapurge_api::Error> {
        self.post_json(endpoint, credential, body).await
    }
}

/// Result of one accepted purge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub kind: TaskKind,
    pub endpoint: Url,
    pub host: Option<String>,
    pub status: u16,
    pub ack: Option<PurgeAck>,
}

pub struct Dispatcher<S> {
    sender: S,
}

impl<S: PurgeSender> Dispatcher<S> {
    pub fn new(sender: S) -> Self {
        Self { sender }
    }

    /// Execute every task in order, stopping at the first failure.
    pub async fn run(&self, tasks: &TaskSet) -> Result<Vec<TaskOutcome>, PurgeError> {
        let mut outcomes = Vec::with_capacity(tasks.len());
        for task in tasks.iter() {
            outcomes.push(self.execute(task).await?);
        }
        Ok(outcomes)
    }

    /// Execute a single task. Success is `201 Created` and nothing else.
    pub async fn execute(&self, task: &PurgeTask) -> Result<TaskOutcome, PurgeError> {
        let kind = task.kind();
        let payload = task.payload()?;

        info!(
            %kind,
            endpoint = %task.endpoint(),
            items = task.items().len(),
            "issuing purge"
        );
        debug!(payload = %payload, "purge payload");

        let response = self
            .sender
            .send(task.endpoint(), task.credential(), &payload)
            .await
            .map_err(|err| {
                error!(%kind, error = %err, "purge request failed");
                PurgeError::Transport(err)
            })?;

        info!(%kind, status = response.status, "purge response");

        if !response.is_created() {
            error!(%kind, status = response.status, body = %response.body, "purge rejected");
            return Err(PurgeError::Api {
                kind,
                status: response.status,
                body: response.body,
            });
        }

        let ack = response.ack();
        debug!(?ack, "purge accepted");

        Ok(TaskOutcome {
            kind,
            endpoint: task.endpoint().clone(),
            host: task.host().map(str::to_owned),
            status: response.status,
            ack,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::settings::Settings;
    use crate::task::PurgeInput;

    /// Records requests and answers from a scripted queue.
    #[derive(Default)]
    struct ScriptedSender {
        replies: RefCell<VecDeque<Result<PurgeResponse, akapurge_api::Error>>>,
        sent: RefCell<Vec<(String, String)>>,
    }

    impl ScriptedSender {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Ok(PurgeResponse {
                status,
                body: body.to_owned(),
            }));
            self
        }

        fn fail(self) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Err(akapurge_api::Error::Signing("boom".into())));
            self
        }
    }

    impl PurgeSender for &ScriptedSender {
        async fn send(
            &self,
            endpoint: &Url,
            _credential: &ClientCredential,
            body: &str,
        ) -> Result<PurgeResponse, akapurge_api::Error> {
            self.sent
                .borrow_mut()
                .push((endpoint.path().to_owned(), body.to_owned()));
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| panic!("unexpected request to {endpoint}"))
        }
    }

    fn tasks() -> TaskSet {
        let settings: Settings = [
            ("fastpurge_host", "fp.example.net"),
            ("fastpurge_client_token", "ct"),
            ("fastpurge_client_secret", "cs"),
            ("fastpurge_access_token", "at"),
        ]
        .into_iter()
        .collect();
        TaskSet::plan(
            &PurgeInput {
                urls: Some(vec!["https://example.com/a".into()]),
                tags: Some(vec!["promo".into(), "home".into()]),
                cp_codes: Some(vec!["123".into()]),
                ..PurgeInput::default()
            },
            &settings,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn runs_all_tasks_in_order() {
        let sender = ScriptedSender::default()
            .reply(201, r#"{"purgeId":"p-1","estimatedSeconds":5}"#)
            .reply(201, "{}")
            .reply(201, "not json");

        let outcomes = Dispatcher::new(&sender).run(&tasks()).await.unwrap();

        let kinds: Vec<_> = outcomes.iter().map(|o| o.kind).collect();
        assert_eq!(kinds, vec![TaskKind::Urls, TaskKind::CacheTags, TaskKind::CpCodes]);
        assert_eq!(
            outcomes[0].ack.as_ref().unwrap().purge_id.as_deref(),
            Some("p-1")
        );
        assert!(outcomes[2].ack.is_none());

        let sent = sender.sent.borrow();
        assert_eq!(sent[0].0, "/ccu/v3/invalidate/url/production");
        assert_eq!(sent[1], (
            "/ccu/v3/invalidate/tag/production".to_owned(),
            r#"{"objects":["promo","home"]}"#.to_owned()
        ));
        assert_eq!(sent[2].1, r#"{"objects":[123]}"#);
    }

    #[tokio::test]
    async fn stops_at_first_rejection() {
        let sender = ScriptedSender::default()
            .reply(201, "{}")
            .reply(403, "Forbidden");

        let err = Dispatcher::new(&sender).run(&tasks()).await.unwrap_err();

        match err {
            PurgeError::Api { kind, status, body } => {
                assert_eq!(kind, TaskKind::CacheTags);
                assert_eq!(status, 403);
                assert_eq!(body, "Forbidden");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
        assert_eq!(sender.sent.borrow().len(), 2);
    }

    #[tokio::test]
    async fn any_status_other_than_created_fails() {
        let sender = ScriptedSender::default().reply(200, "{}");
        let err = Dispatcher::new(&sender).run(&tasks()).await.unwrap_err();
        assert!(matches!(err, PurgeError::Api { status: 200, .. }));
    }

    #[tokio::test]
    async fn transport_failure_ends_run() {
        let sender = ScriptedSender::default().fail();
        let err = Dispatcher::new(&sender).run(&tasks()).await.unwrap_err();
        assert!(matches!(err, PurgeError::Transport(_)));
        assert_eq!(sender.sent.borrow().len(), 1);
    }
}
