use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::FeedResult;
use crate::services::feed_loader::{FeedLoader, LoadOutcome};
use crate::sources::PageFetcher;

/// End-of-list marker. Asks the loader for the next page whenever it is
/// visible and the feed is idle with more pages to fetch.
pub struct Sentinel<F> {
    loader: FeedLoader<F>,
}

impl<F: PageFetcher> Sentinel<F> {
    pub fn new(loader: FeedLoader<F>) -> Self {
        Self { loader }
    }

    /// Record a visibility observation and fire at most one load-more.
    /// Returns `None` when the marker is hidden or the feed gate is closed.
    pub async fn observe(&mut self, visible: bool) -> FeedResult<Option<LoadOutcome>> {
        if !visible || !self.loader.can_load_more() {
            return Ok(None);
        }

        debug!("sentinel visible, requesting next page");
        self.loader.load_more().await.map(Some)
    }

    /// Keep loading while the marker stays visible. Re-evaluates on every
    /// visibility change and every feed state change, until `shutdown` fires
    /// or the visibility sender goes away.
    pub async fn watch(mut self, mut visibility: watch::Receiver<bool>, shutdown: CancellationToken) {
        let mut updates = self.loader.subscribe();

        loop {
            updates.borrow_and_update();
            let visible = *visibility.borrow_and_update();

            match self.observe(visible).await {
                Ok(Some(_)) => continue,
                Ok(None) => {}
                // The failure is already on the feed state; the gate stays shut until a retry
                Err(e) => warn!(error = %e, "sentinel load failed"),
            }

            tokio::select! {
                _ = shutdown.cancelled() => return,
                changed = visibility.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
    }
}
