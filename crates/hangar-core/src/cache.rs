use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use log::{info, warn};

use crate::error::FetchError;
use crate::github::ReleaseSource;
use crate::release::Release;

/// How often the production poller refreshes the cached release.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// The result of one completed fetch attempt, failure included.
///
/// A failed poll is cached exactly like a successful one and stays visible
/// until the next tick overwrites it; update checks are low-frequency and
/// idempotent, so a stale error for up to one interval is acceptable.
#[derive(Debug, Clone)]
pub struct CachedOutcome {
    pub outcome: Result<Release, FetchError>,
    pub fetched_at: DateTime<Utc>,
}

type SharedFetch = Shared<BoxFuture<'static, Arc<CachedOutcome>>>;

/// The single slot every reader observes. `Pending` only ever holds the
/// initial fetch; refreshes replace the slot with `Settled` on completion,
/// so readers see the previous outcome while a refresh is in flight.
enum Slot {
    Pending(SharedFetch),
    Settled(Arc<CachedOutcome>),
}

/// Read handle over the release slot kept fresh by a background poller.
///
/// Cloning is cheap; all clones observe the same slot.
#[derive(Clone)]
pub struct ReleaseCache {
    slot: Arc<RwLock<Slot>>,
}

impl ReleaseCache {
    /// Trigger the initial fetch and spawn the background refresh task.
    ///
    /// The initial in-flight fetch is itself the first cached value: readers
    /// arriving before it completes all await the same fetch instead of
    /// triggering their own. Afterwards one timer-driven task refreshes the
    /// slot every `interval`; fetches are never started by request traffic,
    /// so at most one is in flight at any time.
    pub fn spawn(source: Arc<dyn ReleaseSource>, interval: Duration) -> Self {
        let initial = shared_fetch(Arc::clone(&source));
        let slot = Arc::new(RwLock::new(Slot::Pending(initial.clone())));

        tokio::spawn(refresh_loop(Arc::clone(&slot), source, interval, initial));

        Self { slot }
    }

    /// Latest outcome: the settled value, or the initial fetch once it lands.
    ///
    /// Never blocks the poller and never starts a fetch of its own.
    pub async fn latest(&self) -> Arc<CachedOutcome> {
        let pending = {
            let guard = self.slot.read().unwrap_or_else(PoisonError::into_inner);
            match &*guard {
                Slot::Settled(outcome) => return Arc::clone(outcome),
                Slot::Pending(fetch) => fetch.clone(),
            }
        };
        pending.await
    }
}

async fn refresh_loop(
    slot: Arc<RwLock<Slot>>,
    source: Arc<dyn ReleaseSource>,
    interval: Duration,
    initial: SharedFetch,
) {
    let first = initial.await;
    settle(&slot, first);

    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately; consume it so the next refresh
    // lands a full interval after the initial fetch settled.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        let outcome = Arc::new(fetch_outcome(source.as_ref()).await);
        settle(&slot, outcome);
    }
}

fn settle(slot: &RwLock<Slot>, outcome: Arc<CachedOutcome>) {
    let mut guard = slot.write().unwrap_or_else(PoisonError::into_inner);
    *guard = Slot::Settled(outcome);
}

fn shared_fetch(source: Arc<dyn ReleaseSource>) -> SharedFetch {
    async move { Arc::new(fetch_outcome(source.as_ref()).await) }
        .boxed()
        .shared()
}

async fn fetch_outcome(source: &dyn ReleaseSource) -> CachedOutcome {
    let outcome = source.fetch_latest_release().await;
    match &outcome {
        Ok(release) => info!("Cached latest release {}", release.version),
        Err(error) => warn!("Release fetch failed, caching the failure: {error}"),
    }
    CachedOutcome {
        outcome,
        fetched_at: Utc::now(),
    }
}
