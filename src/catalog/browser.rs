//! Interactive browsing session with delayed "load more"

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

use super::engine::{evaluate, facets, CatalogView, Facets};
use super::state::{CatalogState, SortKey};
use crate::content::Post;

#[derive(Debug)]
struct Shared {
    state: CatalogState,
    /// Bumped on every filter or sort change; a pending load only applies
    /// if the epoch it started in is still current
    epoch: u64,
    loading: bool,
}

/// A visitor's session over one listing.
///
/// `load_more` grows the window after a delay on a tokio timer. The timer
/// only holds a weak reference to the session: dropping the `Browser`
/// aborts it, and a filter change made while it is pending cancels it.
#[derive(Debug)]
pub struct Browser {
    posts: Vec<Post>,
    facets: Facets,
    shared: Arc<Mutex<Shared>>,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Browser {
    pub fn new(posts: Vec<Post>, page_size: usize, delay: Duration) -> Self {
        let facets = facets(&posts);
        Self {
            posts,
            facets,
            shared: Arc::new(Mutex::new(Shared {
                state: CatalogState::new(page_size),
                epoch: 0,
                loading: false,
            })),
            delay,
            pending: None,
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// Snapshot of the current selections
    pub fn state(&self) -> CatalogState {
        self.lock().state.clone()
    }

    /// Whether a load is waiting on its timer
    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    /// The visible window for the current state
    pub fn view(&self) -> CatalogView<'_> {
        let state = self.state();
        evaluate(&self.posts, &state)
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.update(|state| state.set_search_query(query));
    }

    pub fn toggle_category(&mut self, category: &str) {
        self.update(|state| state.toggle_category(category));
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.update(|state| state.toggle_tag(tag));
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.update(|state| state.set_sort(sort));
    }

    pub fn reset_filters(&mut self) {
        self.update(CatalogState::reset_filters);
    }

    /// Start loading the next page.
    ///
    /// Returns `false` when everything is already visible or a load is in
    /// flight. Must be called from within a tokio runtime.
    pub fn load_more(&mut self) -> bool {
        let (epoch, step) = {
            let mut shared = self.lock();
            if shared.loading || !evaluate(&self.posts, &shared.state).has_more {
                return false;
            }
            shared.loading = true;
            (shared.epoch, shared.state.page_size)
        };

        let weak = Arc::downgrade(&self.shared);
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            apply_load(weak, epoch, step);
        }));
        tracing::debug!("Loading {} more templates in {:?}", step, delay);
        true
    }

    /// Wait for a pending load, if any, to finish
    pub async fn settle(&mut self) {
        if let Some(handle) = self.pending.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    tracing::error!("Load-more task failed: {}", e);
                }
            }
        }
    }

    fn update(&mut self, change: impl FnOnce(&mut CatalogState)) {
        {
            let mut shared = self.lock();
            change(&mut shared.state);
            shared.epoch += 1;
            shared.loading = false;
        }
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn apply_load(weak: Weak<Mutex<Shared>>, epoch: u64, step: usize) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let mut shared = shared
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if shared.epoch != epoch {
        return;
    }
    shared.state.visible_count += step;
    shared.loading = false;
}

impl Drop for Browser {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
