//! Buffered, category-bucketed view over the paginated recommendations
//! endpoint.
//!
//! Pages arrive twelve items at a time; at most four are surfaced per
//! reveal step, the rest wait in a read-ahead buffer per category. When a
//! reveal leaves the buffer low, the next page is fetched in the
//! background so scrolling never stalls on the network. At most one page
//! fetch is in flight per feed; a fetch failure is surfaced and leaves
//! the feed ready to retry, never exhausted.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;

use client_core::ApiError;

use crate::dtos::universities::{RecommendationsPage, ShortlistAction};
use crate::models::{Category, RecommendationItem};
use crate::services::partition::{self, Buckets, REVEAL_BATCH};
use crate::services::universities::UniversityService;

/// Server items requested per page.
pub const PAGE_SIZE: u32 = 12;

/// Feed lifecycle. `Exhausted` is terminal until an explicit
/// [`RecommendationFeed::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// No fetch issued yet.
    Idle,
    /// First page requested; nothing to show until it resolves.
    LoadingInitial,
    /// At least one page resolved; reveals and prefetch operate here.
    Ready,
    /// A background page fetch is in flight; reveals may still proceed.
    LoadingMore,
    /// Server reported no further pages and the buffer is drained.
    Exhausted,
}

/// Render-ready snapshot of the feed.
#[derive(Debug, Clone, Default)]
pub struct FeedView {
    pub dream: Vec<RecommendationItem>,
    pub target: Vec<RecommendationItem>,
    pub safe: Vec<RecommendationItem>,
    pub locked: Vec<String>,
    pub has_more: bool,
    pub buffered: usize,
    pub last_error: Option<String>,
}

struct FeedState {
    phase: FeedPhase,
    displayed: Buckets,
    buffered: Buckets,
    page: u32,
    has_more: bool,
    fetch_in_flight: bool,
    locked: HashSet<String>,
    last_error: Option<String>,
}

impl FeedState {
    fn new() -> Self {
        Self {
            phase: FeedPhase::Idle,
            displayed: Buckets::default(),
            buffered: Buckets::default(),
            page: 1,
            has_more: false,
            fetch_in_flight: false,
            locked: HashSet::new(),
            last_error: None,
        }
    }
}

struct FeedInner {
    universities: UniversityService,
    state: Mutex<FeedState>,
    phase_tx: watch::Sender<FeedPhase>,
}

#[derive(Clone)]
pub struct RecommendationFeed {
    inner: Arc<FeedInner>,
}

impl RecommendationFeed {
    pub fn new(universities: UniversityService) -> Self {
        let (phase_tx, _) = watch::channel(FeedPhase::Idle);
        Self {
            inner: Arc::new(FeedInner {
                universities,
                state: Mutex::new(FeedState::new()),
                phase_tx,
            }),
        }
    }

    /// Fetch page 1 and split it into the initial display slice and the
    /// read-ahead buffer. No-op if the feed already left `Idle`.
    pub async fn initialize(&self) -> Result<FeedView, ApiError> {
        {
            let mut state = self.lock_state();
            if state.phase != FeedPhase::Idle {
                return Ok(Self::view_of(&state));
            }
            state.phase = FeedPhase::LoadingInitial;
            self.publish(&state);
        }

        match self.inner.universities.recommendations(1, PAGE_SIZE).await {
            Ok(page) => {
                let mut state = self.lock_state();
                let has_more = page.has_next();
                let locked = page.locked_universities.clone();
                let (displayed, buffered) = partition::partition_initial(
                    Self::buckets_of(page),
                    REVEAL_BATCH,
                );

                state.displayed = displayed;
                state.buffered = buffered;
                state.page = 1;
                state.has_more = has_more;
                state.locked = locked.into_iter().collect();
                state.last_error = None;
                state.phase = FeedPhase::Ready;
                self.publish(&state);
                Ok(Self::view_of(&state))
            }
            Err(err) => {
                let mut state = self.lock_state();
                state.phase = FeedPhase::Idle;
                state.last_error = Some(err.to_string());
                self.publish(&state);
                Err(err)
            }
        }
    }

    /// Surface up to four buffered items, in fixed category order. When
    /// the remaining buffer is low and the server has more, a background
    /// fetch of the next page is started; when both the buffer and the
    /// server are out of items, the feed becomes `Exhausted`.
    pub fn reveal(&self) -> Vec<(Category, RecommendationItem)> {
        let (revealed, spawn_fetch) = {
            let mut state = self.lock_state();
            if !matches!(state.phase, FeedPhase::Ready | FeedPhase::LoadingMore) {
                return Vec::new();
            }

            let state = &mut *state;
            let revealed =
                partition::reveal(&mut state.displayed, &mut state.buffered, REVEAL_BATCH);

            let mut spawn_fetch = false;
            if state.buffered.total() < REVEAL_BATCH
                && state.has_more
                && !state.fetch_in_flight
            {
                state.fetch_in_flight = true;
                state.phase = FeedPhase::LoadingMore;
                spawn_fetch = true;
            } else if state.buffered.is_empty() && !state.has_more && !state.fetch_in_flight {
                state.phase = FeedPhase::Exhausted;
            }
            self.publish(&state);
            (revealed, spawn_fetch)
        };

        if spawn_fetch {
            let feed = self.clone();
            tokio::spawn(async move {
                let _ = feed.run_fetch().await;
            });
        }

        revealed
    }

    /// Fetch the next page inline. Used when the buffer has drained before
    /// the prefetch landed; no-op while another fetch is in flight or when
    /// the server has nothing more.
    pub async fn fetch_next_page(&self) -> Result<(), ApiError> {
        {
            let mut state = self.lock_state();
            if state.fetch_in_flight
                || !state.has_more
                || !matches!(state.phase, FeedPhase::Ready | FeedPhase::LoadingMore)
            {
                return Ok(());
            }
            state.fetch_in_flight = true;
            state.phase = FeedPhase::LoadingMore;
            self.publish(&state);
        }

        self.run_fetch().await
    }

    async fn run_fetch(&self) -> Result<(), ApiError> {
        let next_page = self.lock_state().page + 1;
        let result = self
            .inner
            .universities
            .recommendations(next_page, PAGE_SIZE)
            .await;

        let mut state = self.lock_state();
        let state = &mut *state;
        state.fetch_in_flight = false;
        match result {
            Ok(page) => {
                let has_more = page.has_next();
                partition::merge_page(
                    &state.displayed,
                    &mut state.buffered,
                    Self::buckets_of(page),
                );
                state.page = next_page;
                state.has_more = has_more;
                state.last_error = None;
                state.phase = if state.buffered.is_empty() && !state.has_more {
                    FeedPhase::Exhausted
                } else {
                    FeedPhase::Ready
                };
                self.publish(&state);
                Ok(())
            }
            Err(err) => {
                // Transient failure is never exhaustion: stay ready so the
                // next reveal or an explicit retry can fetch again.
                tracing::warn!(page = next_page, error = %err, "recommendation page fetch failed");
                state.last_error = Some(err.to_string());
                state.phase = FeedPhase::Ready;
                self.publish(&state);
                Err(err)
            }
        }
    }

    /// Toggle shortlist membership for a displayed item: the locked set is
    /// updated optimistically and reverted if the server rejects the
    /// mutation.
    pub async fn lock(
        &self,
        item: &RecommendationItem,
        category: Category,
    ) -> Result<(), ApiError> {
        self.set_locked(item, category, true).await
    }

    pub async fn unlock(
        &self,
        item: &RecommendationItem,
        category: Category,
    ) -> Result<(), ApiError> {
        self.set_locked(item, category, false).await
    }

    async fn set_locked(
        &self,
        item: &RecommendationItem,
        category: Category,
        locked: bool,
    ) -> Result<(), ApiError> {
        let changed = {
            let mut state = self.lock_state();
            if locked {
                state.locked.insert(item.name.clone())
            } else {
                state.locked.remove(&item.name)
            }
        };

        let action = if locked {
            ShortlistAction::Lock
        } else {
            ShortlistAction::Unlock
        };
        let result = self
            .inner
            .universities
            .shortlist(action, &item.name, Some(category), Some(&item.country))
            .await;

        if let Err(err) = result {
            if changed {
                let mut state = self.lock_state();
                if locked {
                    state.locked.remove(&item.name);
                } else {
                    state.locked.insert(item.name.clone());
                }
            }
            tracing::warn!(university = %item.name, error = %err, "shortlist update rejected, reverting");
            return Err(err);
        }

        Ok(())
    }

    pub fn is_locked(&self, name: &str) -> bool {
        self.lock_state().locked.contains(name)
    }

    pub fn phase(&self) -> FeedPhase {
        self.lock_state().phase
    }

    /// Observe phase transitions (`Loading(more)` completing, exhaustion).
    pub fn watch_phase(&self) -> watch::Receiver<FeedPhase> {
        self.inner.phase_tx.subscribe()
    }

    pub fn view(&self) -> FeedView {
        Self::view_of(&self.lock_state())
    }

    /// Drop all feed state and return to `Idle`; the next `initialize`
    /// starts over from page 1.
    pub fn reset(&self) {
        let mut state = self.lock_state();
        *state = FeedState::new();
        self.publish(&state);
    }

    fn view_of(state: &FeedState) -> FeedView {
        FeedView {
            dream: state.displayed.get(Category::Dream).to_vec(),
            target: state.displayed.get(Category::Target).to_vec(),
            safe: state.displayed.get(Category::Safe).to_vec(),
            locked: state.locked.iter().cloned().collect(),
            has_more: state.has_more,
            buffered: state.buffered.total(),
            last_error: state.last_error.clone(),
        }
    }

    fn buckets_of(page: RecommendationsPage) -> Buckets {
        Buckets::from_ordered(page.data.into_ordered())
    }

    fn publish(&self, state: &FeedState) {
        self.inner.phase_tx.send_replace(state.phase);
    }

    fn lock_state(&self) -> MutexGuard<'_, FeedState> {
        self.inner.state.lock().expect("feed state lock poisoned")
    }
}
