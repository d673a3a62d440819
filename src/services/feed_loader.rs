//! Incremental loader shared by every paginated feed.
//!
//! One [`FeedLoader`] owns the state of one feed. Loads are gated on the
//! loading flags under the session lock, so at most one fetch per feed is in
//! flight. Changing the query or shutting the loader down bumps the session
//! generation and cancels the in-flight fetch; a response that still arrives
//! for an older generation is dropped without touching the state.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{FeedQuery, FeedState};
use crate::errors::FeedResult;
use crate::sources::PageFetcher;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// A fetch for this feed is already in flight
    Busy,
    /// The first page has not been loaded yet
    NotStarted,
    /// The first page was already loaded
    AlreadyStarted,
    /// The last page was reached
    Exhausted,
    /// A previous fetch failed and needs a retry
    Errored,
    NothingToRetry,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { page: u32, added: usize },
    Skipped(SkipReason),
    /// The query changed or the loader shut down while the fetch was in flight
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadKind {
    Initial,
    More,
    Retry,
}

struct Ticket {
    query: FeedQuery,
    page: u32,
    generation: u64,
    cancel: CancellationToken,
}

struct FeedSession {
    query: FeedQuery,
    state: FeedState,
    generation: u64,
    cancel: CancellationToken,
    closed: bool,
}

impl FeedSession {
    fn restart(&mut self) {
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
        self.generation = self.generation.wrapping_add(1);
        self.state = FeedState::new();
    }
}

struct LoaderInner<F> {
    fetcher: Arc<F>,
    page_size: u32,
    session: Mutex<FeedSession>,
    updates: watch::Sender<FeedState>,
}

pub struct FeedLoader<F> {
    inner: Arc<LoaderInner<F>>,
}

impl<F> Clone for FeedLoader<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: PageFetcher> FeedLoader<F> {
    pub fn new(fetcher: Arc<F>, query: FeedQuery, page_size: u32) -> Self {
        let state = FeedState::new();
        let (updates, _) = watch::channel(state.clone());

        Self {
            inner: Arc::new(LoaderInner {
                fetcher,
                page_size: page_size.max(1),
                session: Mutex::new(FeedSession {
                    query,
                    state,
                    generation: 0,
                    cancel: CancellationToken::new(),
                    closed: false,
                }),
                updates,
            }),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.inner.page_size
    }

    pub fn query(&self) -> FeedQuery {
        self.lock().query.clone()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> FeedState {
        self.lock().state.clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.inner.updates.subscribe()
    }

    pub fn can_load_more(&self) -> bool {
        let session = self.lock();
        !session.closed && session.state.can_load_more()
    }

    /// Fetch the first page. Also re-issues page one after a failed first load.
    pub async fn load_initial(&self) -> FeedResult<LoadOutcome> {
        self.load(LoadKind::Initial).await
    }

    /// Fetch the page after `current_page`
    pub async fn load_more(&self) -> FeedResult<LoadOutcome> {
        self.load(LoadKind::More).await
    }

    /// Re-issue whichever fetch failed last
    pub async fn retry(&self) -> FeedResult<LoadOutcome> {
        self.load(LoadKind::Retry).await
    }

    /// Switch to another query. The current state is discarded and any
    /// in-flight fetch is cancelled. Returns false if the query is unchanged.
    pub fn set_query(&self, query: FeedQuery) -> bool {
        let mut session = self.lock();
        if session.closed || session.query == query {
            return false;
        }

        debug!(
            from = %session.query.describe(),
            to = %query.describe(),
            "feed query changed, restarting"
        );
        session.query = query;
        session.restart();
        self.publish(&session);
        true
    }

    /// Start the same query over from an empty state
    pub fn refresh(&self) {
        let mut session = self.lock();
        if session.closed {
            return;
        }
        session.restart();
        self.publish(&session);
    }

    /// Cancel any in-flight fetch and refuse further loads
    pub fn shutdown(&self) {
        let mut session = self.lock();
        if session.closed {
            return;
        }
        session.closed = true;
        session.cancel.cancel();
        session.generation = session.generation.wrapping_add(1);
        session.state.finish();
        self.publish(&session);
    }

    async fn load(&self, kind: LoadKind) -> FeedResult<LoadOutcome> {
        match self.begin(kind) {
            Ok(ticket) => self.run(ticket).await,
            Err(reason) => {
                debug!(?kind, ?reason, "load skipped");
                Ok(LoadOutcome::Skipped(reason))
            }
        }
    }

    /// Check the gate and mark the feed as loading in one step
    fn begin(&self, kind: LoadKind) -> Result<Ticket, SkipReason> {
        let mut session = self.lock();
        if session.closed {
            return Err(SkipReason::Closed);
        }

        let state = &mut session.state;
        if state.is_busy() {
            return Err(SkipReason::Busy);
        }

        let page = match kind {
            LoadKind::Initial => {
                if state.current_page > 0 {
                    return Err(SkipReason::AlreadyStarted);
                }
                state.begin_initial();
                1
            }
            LoadKind::More => {
                if state.current_page == 0 {
                    return Err(SkipReason::NotStarted);
                }
                if state.error.is_some() {
                    return Err(SkipReason::Errored);
                }
                if !state.has_more {
                    return Err(SkipReason::Exhausted);
                }
                state.begin_more();
                state.next_page()
            }
            LoadKind::Retry => {
                if state.error.is_none() {
                    return Err(SkipReason::NothingToRetry);
                }
                if state.current_page == 0 {
                    state.begin_initial();
                    1
                } else {
                    state.begin_more();
                    state.next_page()
                }
            }
        };

        let ticket = Ticket {
            query: session.query.clone(),
            page,
            generation: session.generation,
            cancel: session.cancel.clone(),
        };
        self.publish(&session);
        Ok(ticket)
    }

    async fn run(&self, ticket: Ticket) -> FeedResult<LoadOutcome> {
        let fetch = self
            .inner
            .fetcher
            .fetch_page(&ticket.query, ticket.page, self.inner.page_size);

        let result = tokio::select! {
            _ = ticket.cancel.cancelled() => {
                debug!(page = ticket.page, "fetch cancelled");
                return Ok(LoadOutcome::Cancelled);
            }
            result = fetch => result,
        };

        let mut session = self.lock();
        if session.generation != ticket.generation {
            warn!(page = ticket.page, "dropping response for a replaced feed");
            return Ok(LoadOutcome::Cancelled);
        }

        match result {
            Ok(page) => {
                let added = session.state.apply_page(page, ticket.page);
                debug!(
                    page = ticket.page,
                    added,
                    total = session.state.items.len(),
                    has_more = session.state.has_more,
                    "feed page applied"
                );
                self.publish(&session);
                Ok(LoadOutcome::Loaded {
                    page: ticket.page,
                    added,
                })
            }
            Err(e) => {
                warn!(
                    query = %ticket.query.describe(),
                    page = ticket.page,
                    error = %e,
                    "feed page failed"
                );
                session.state.fail(e.to_string());
                self.publish(&session);
                Err(e)
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedSession> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, session: &FeedSession) {
        self.inner.updates.send_replace(session.state.clone());
    }
}
