//! Preview lifecycle for the currently derived badge request
//!
//! The fetcher is told about every derived request and moves through
//! `Idle → Loading → Loaded | Errored`. Entering `Loading` happens synchronously
//! inside [`PreviewFetcher::observe`], before any network activity, so the view
//! never keeps showing an artifact for an older configuration.
//!
//! Each observed request gets a [`RequestTicket`]. A finished fetch writes its
//! result only if its ticket is still the current one; the comparison and the
//! write happen inside a single `send_if_modified` call, so a response for a
//! superseded request can never overwrite a newer state, whatever order the
//! responses arrive in.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::models::{DerivedRequest, FetchFailure, PreviewState};
use crate::traits::ArtifactProvider;

/// Identity of one observed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    pub seq: u64,
    pub preview_url: String,
}

/// What subscribers see: the current ticket and the state it produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewSnapshot {
    pub ticket: Option<RequestTicket>,
    pub state: PreviewState,
}

impl PreviewSnapshot {
    pub fn preview_url(&self) -> Option<&str> {
        self.ticket.as_ref().map(|t| t.preview_url.as_str())
    }
}

pub struct PreviewFetcher {
    provider: Arc<dyn ArtifactProvider>,
    tx: Arc<watch::Sender<PreviewSnapshot>>,
    next_seq: u64,
    tasks: JoinSet<()>,
}

impl PreviewFetcher {
    pub fn new(provider: Arc<dyn ArtifactProvider>) -> Self {
        let (tx, _rx) = watch::channel(PreviewSnapshot::default());
        Self {
            provider,
            tx: Arc::new(tx),
            next_seq: 0,
            tasks: JoinSet::new(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PreviewSnapshot> {
        self.tx.subscribe()
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> PreviewSnapshot {
        self.tx.borrow().clone()
    }

    pub fn state(&self) -> PreviewState {
        self.tx.borrow().state.clone()
    }

    /// Reacts to a freshly derived request.
    ///
    /// Must be called from inside a tokio runtime since it spawns the fetch.
    /// Re-observing the request that is already current does nothing.
    pub fn observe(&mut self, request: Option<&DerivedRequest>) {
        let Some(request) = request else {
            self.go_idle();
            return;
        };

        let already_current = self
            .tx
            .borrow()
            .ticket
            .as_ref()
            .is_some_and(|t| t.preview_url == request.preview_url);
        if already_current {
            return;
        }

        self.next_seq += 1;
        let ticket = RequestTicket {
            seq: self.next_seq,
            preview_url: request.preview_url.clone(),
        };
        self.tx.send_modify(|snapshot| {
            snapshot.ticket = Some(ticket.clone());
            snapshot.state = PreviewState::Loading;
        });
        self.reap_finished();

        let request_id = request.request_id();
        info!("Loading badge preview {} (#{})", request_id, ticket.seq);

        let provider = Arc::clone(&self.provider);
        let tx = Arc::clone(&self.tx);
        self.tasks.spawn(async move {
            let next = match provider.fetch(&ticket.preview_url).await {
                Ok(artifact) => PreviewState::Loaded(artifact),
                Err(e) => PreviewState::Errored(FetchFailure {
                    status: e.status(),
                    message: e.to_string(),
                    preview_url: ticket.preview_url.clone(),
                }),
            };
            let failed = matches!(next, PreviewState::Errored(_));

            let committed = tx.send_if_modified(|snapshot| {
                if snapshot.ticket.as_ref() != Some(&ticket) {
                    return false;
                }
                snapshot.state = next;
                true
            });

            if !committed {
                debug!("Discarded stale preview {} (#{})", request_id, ticket.seq);
            } else if failed {
                warn!("Badge preview {} failed to load", request_id);
            } else {
                info!("Badge preview {} loaded", request_id);
            }
        });
    }

    /// Waits until every spawned fetch has finished
    pub async fn settle(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result
                && e.is_panic()
            {
                warn!("preview fetch task panicked: {}", e);
            }
        }
    }

    /// Stops applying results; nothing in flight can touch the state afterwards
    pub fn abandon(&mut self) {
        self.tasks.abort_all();
        self.go_idle();
    }

    fn go_idle(&mut self) {
        let changed = self.tx.send_if_modified(|snapshot| {
            if snapshot.ticket.is_none() && snapshot.state == PreviewState::Idle {
                return false;
            }
            snapshot.ticket = None;
            snapshot.state = PreviewState::Idle;
            true
        });
        if changed {
            debug!("Badge preview cleared");
        }
    }

    fn reap_finished(&mut self) {
        while self.tasks.try_join_next().is_some() {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::error::FetchError;
    use crate::models::Artifact;

    type Reply = oneshot::Sender<Result<Artifact, FetchError>>;

    /// Provider whose requests stay pending until the test resolves them
    #[derive(Default)]
    struct ScriptedProvider {
        pending: Mutex<Vec<(String, Reply)>>,
        calls: AtomicUsize,
    }

    impl ScriptedProvider {
        async fn wait_for_pending(&self, count: usize) {
            while self.pending.lock().unwrap().len() < count {
                tokio::task::yield_now().await;
            }
        }

        /// Resolves the oldest pending request for `url`
        fn resolve(&self, url: &str, outcome: Result<Artifact, FetchError>) {
            let mut pending = self.pending.lock().unwrap();
            let index = pending
                .iter()
                .position(|(pending_url, _)| pending_url == url)
                .expect("no pending request for url");
            let (_, reply) = pending.remove(index);
            let _ = reply.send(outcome);
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ArtifactProvider for ScriptedProvider {
        async fn fetch(&self, url: &str) -> Result<Artifact, FetchError> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push((url.to_string(), tx));
            self.calls.fetch_add(1, Ordering::SeqCst);
            rx.await.unwrap_or_else(|_| {
                Err(FetchError::Body {
                    url: url.to_string(),
                    message: "reply dropped".to_string(),
                })
            })
        }
    }

    fn request(tag: &str) -> DerivedRequest {
        DerivedRequest {
            preview_url: format!("https://badges.test/api/badges/preview?url={tag}"),
            canonical_url: format!("https://badges.test/api/badges?url={tag}"),
            html_snippet: String::new(),
            markdown_snippet: String::new(),
        }
    }

    fn svg(text: &str) -> Artifact {
        Artifact {
            body: format!("<svg><text>{text}</text></svg>").into_bytes(),
            content_type: Some("image/svg+xml".to_string()),
        }
    }

    fn fetcher() -> (PreviewFetcher, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::default());
        (PreviewFetcher::new(provider.clone()), provider)
    }

    async fn let_tasks_run() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn starts_idle_and_enters_loading_synchronously() {
        let (mut fetcher, _provider) = fetcher();
        assert_eq!(fetcher.state(), PreviewState::Idle);

        let r = request("a");
        fetcher.observe(Some(&r));
        assert_eq!(fetcher.state(), PreviewState::Loading);
        assert_eq!(fetcher.snapshot().preview_url(), Some(r.preview_url.as_str()));
    }

    #[tokio::test]
    async fn successful_fetch_stores_the_raw_body() {
        let (mut fetcher, provider) = fetcher();
        let r = request("a");
        fetcher.observe(Some(&r));

        provider.wait_for_pending(1).await;
        provider.resolve(&r.preview_url, Ok(svg("7")));
        fetcher.settle().await;

        assert_eq!(fetcher.state(), PreviewState::Loaded(svg("7")));
    }

    #[tokio::test]
    async fn failed_fetch_reports_status_and_url() {
        let (mut fetcher, provider) = fetcher();
        let r = request("a");
        fetcher.observe(Some(&r));

        provider.wait_for_pending(1).await;
        provider.resolve(
            &r.preview_url,
            Err(FetchError::Status {
                status: 503,
                url: r.preview_url.clone(),
            }),
        );
        fetcher.settle().await;

        match fetcher.state() {
            PreviewState::Errored(failure) => {
                assert_eq!(failure.status, Some(503));
                assert_eq!(failure.preview_url, r.preview_url);
            }
            other => panic!("expected Errored, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn only_the_latest_request_wins_when_responses_arrive_out_of_order() {
        let (mut fetcher, provider) = fetcher();
        let (r1, r2, r3) = (request("g"), request("gi"), request("git"));

        fetcher.observe(Some(&r1));
        fetcher.observe(Some(&r2));
        fetcher.observe(Some(&r3));
        assert_eq!(fetcher.state(), PreviewState::Loading);
        provider.wait_for_pending(3).await;
        assert_eq!(provider.calls(), 3);

        provider.resolve(&r3.preview_url, Ok(svg("git")));
        provider.resolve(&r1.preview_url, Ok(svg("g")));
        provider.resolve(
            &r2.preview_url,
            Err(FetchError::Status {
                status: 500,
                url: r2.preview_url.clone(),
            }),
        );
        fetcher.settle().await;

        let snapshot = fetcher.snapshot();
        assert_eq!(snapshot.state, PreviewState::Loaded(svg("git")));
        assert_eq!(snapshot.preview_url(), Some(r3.preview_url.as_str()));
    }

    #[tokio::test]
    async fn stale_responses_leave_the_newer_request_loading() {
        let (mut fetcher, provider) = fetcher();
        let (r1, r2) = (request("a"), request("b"));

        fetcher.observe(Some(&r1));
        fetcher.observe(Some(&r2));
        provider.wait_for_pending(2).await;

        provider.resolve(&r1.preview_url, Ok(svg("a")));
        let_tasks_run().await;
        assert_eq!(fetcher.state(), PreviewState::Loading);

        provider.resolve(&r2.preview_url, Ok(svg("b")));
        fetcher.settle().await;
        assert_eq!(fetcher.state(), PreviewState::Loaded(svg("b")));
    }

    #[tokio::test]
    async fn returning_to_an_earlier_url_still_discards_its_old_response() {
        let (mut fetcher, provider) = fetcher();
        let (a, b) = (request("a"), request("b"));

        fetcher.observe(Some(&a));
        fetcher.observe(Some(&b));
        fetcher.observe(Some(&a));
        provider.wait_for_pending(3).await;

        provider.resolve(&a.preview_url, Ok(svg("old")));
        provider.resolve(&b.preview_url, Ok(svg("b")));
        let_tasks_run().await;
        assert_eq!(fetcher.state(), PreviewState::Loading);

        provider.resolve(&a.preview_url, Ok(svg("fresh")));
        fetcher.settle().await;
        assert_eq!(fetcher.state(), PreviewState::Loaded(svg("fresh")));
    }

    #[tokio::test]
    async fn observing_the_current_request_again_does_not_refetch() {
        let (mut fetcher, provider) = fetcher();
        let r = request("a");

        fetcher.observe(Some(&r));
        fetcher.observe(Some(&r.clone()));
        provider.wait_for_pending(1).await;
        provider.resolve(&r.preview_url, Ok(svg("a")));
        fetcher.settle().await;

        fetcher.observe(Some(&r));
        assert_eq!(fetcher.state(), PreviewState::Loaded(svg("a")));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn no_request_means_idle_and_clears_content() {
        let (mut fetcher, provider) = fetcher();
        let r = request("a");
        fetcher.observe(Some(&r));
        provider.wait_for_pending(1).await;
        provider.resolve(&r.preview_url, Ok(svg("a")));
        fetcher.settle().await;

        fetcher.observe(None);
        assert_eq!(fetcher.snapshot(), PreviewSnapshot::default());
    }

    #[tokio::test]
    async fn in_flight_fetch_cannot_land_after_going_idle() {
        let (mut fetcher, provider) = fetcher();
        let r = request("a");
        fetcher.observe(Some(&r));
        provider.wait_for_pending(1).await;

        fetcher.observe(None);
        provider.resolve(&r.preview_url, Ok(svg("a")));
        fetcher.settle().await;
        assert_eq!(fetcher.state(), PreviewState::Idle);
    }

    #[tokio::test]
    async fn abandon_drops_pending_work() {
        let (mut fetcher, provider) = fetcher();
        let r = request("a");
        fetcher.observe(Some(&r));
        provider.wait_for_pending(1).await;

        fetcher.abandon();
        provider.resolve(&r.preview_url, Ok(svg("a")));
        fetcher.settle().await;
        assert_eq!(fetcher.state(), PreviewState::Idle);
    }

    #[tokio::test]
    async fn subscribers_are_told_about_transitions() {
        let (mut fetcher, provider) = fetcher();
        let mut rx = fetcher.subscribe();
        let r = request("a");

        fetcher.observe(Some(&r));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().state, PreviewState::Loading);

        provider.wait_for_pending(1).await;
        provider.resolve(&r.preview_url, Ok(svg("a")));
        let snapshot = rx
            .wait_for(|s| s.state.is_settled())
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.state, PreviewState::Loaded(svg("a")));
    }
}
