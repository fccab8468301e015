//! The search popup: debounced input, concurrent provider dispatch,
//! incremental merge and keyboard navigation.
//!
//! All state lives on one thread. Provider calls run as local tasks and every
//! callback carries the generation it was dispatched for; callbacks from an
//! older generation are dropped without touching the list.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::error::{Result, ResultExt};
use crate::list_view::{HighlightedTitle, ListView, RowView};
use crate::logging;
use crate::merge::{MergeMap, ResultEntry, Upsert};
use crate::navigation::{Focus, NavKey, NavOutcome, Navigator};
use crate::providers::{LinkOpener, Providers};
use crate::query::Query;
use crate::search::{prepare_batch, MatchedItem, SourceBatch};
use crate::sources::{Source, SourceSet};

/// Wall clock in Unix milliseconds
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

struct PopupState {
    config: Config,
    providers: Providers,
    opener: Rc<dyn LinkOpener>,
    view: Box<dyn ListView>,
    clock: fn() -> i64,

    generation: u64,
    query: Query,
    merge: MergeMap,
    /// Sources that have answered (or failed) for the current generation
    settled: SourceSet,
    navigator: Navigator,
    debouncer: Debouncer,
}

/// Handle to a popup. Cloning shares the same state.
#[derive(Clone)]
pub struct Popup {
    inner: Rc<RefCell<PopupState>>,
}

/// The provider tasks started by one dispatch
pub struct Dispatch {
    generation: u64,
    tasks: Vec<JoinHandle<()>>,
}

impl Dispatch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait until every provider task of this dispatch has completed
    pub async fn finished(self) {
        for task in self.tasks {
            if let Err(e) = task.await {
                if e.is_panic() {
                    logging::log_error("provider_task", &e.to_string(), None);
                }
            }
        }
    }
}

impl Popup {
    /// Create a popup. Must be called inside a `tokio::task::LocalSet`
    /// before any input is fed to it.
    pub fn new(
        config: Config,
        providers: Providers,
        view: Box<dyn ListView>,
        opener: Rc<dyn LinkOpener>,
    ) -> Self {
        let debouncer = Debouncer::new(config.get_debounce());
        Popup {
            inner: Rc::new(RefCell::new(PopupState {
                config,
                providers,
                opener,
                view,
                clock: now_ms,
                generation: 0,
                query: Query::default(),
                merge: MergeMap::new(),
                settled: SourceSet::empty(),
                navigator: Navigator::new(),
                debouncer,
            })),
        }
    }

    /// Replace the clock used for history recency
    pub fn with_clock(self, clock: fn() -> i64) -> Self {
        self.inner.borrow_mut().clock = clock;
        self
    }

    fn from_weak(weak: &Weak<RefCell<PopupState>>) -> Option<Self> {
        weak.upgrade().map(|inner| Popup { inner })
    }

    /// Feed the current contents of the search input. The query is
    /// dispatched once input has been quiet for the debounce interval.
    pub fn on_input(&self, text: &str) {
        let weak = Rc::downgrade(&self.inner);
        let text = text.to_string();
        self.inner.borrow_mut().debouncer.schedule(move || {
            if let Some(popup) = Popup::from_weak(&weak) {
                popup.dispatch(&text);
            }
        });
    }

    /// Start a new query generation right away.
    ///
    /// Clears the list, then queries every enabled source concurrently. An
    /// empty (or whitespace-only) query only clears.
    pub fn dispatch(&self, raw: &str) -> Dispatch {
        let query = Query::new(raw);
        let (generation, providers, enabled, max_results) = {
            let mut state = self.inner.borrow_mut();
            state.generation += 1;
            state.reset_results();
            state.query = query.clone();

            let sources = state.config.get_sources();
            let mut enabled = SourceSet::empty();
            for source in Source::ALL {
                if sources.is_enabled(source) {
                    enabled.add(source);
                } else {
                    state.settled.add(source);
                }
            }
            (
                state.generation,
                state.providers.clone(),
                enabled,
                state.config.get_history_max_results(),
            )
        };

        if query.is_empty() {
            logging::log_query_event(generation, "", "cleared");
            return Dispatch {
                generation,
                tasks: Vec::new(),
            };
        }
        logging::log_query_event(generation, query.as_str(), "dispatched");

        let tasks = enabled
            .sources()
            .map(|source| {
                let weak = Rc::downgrade(&self.inner);
                let providers = providers.clone();
                let query = query.clone();
                tokio::task::spawn_local(async move {
                    let started = Instant::now();
                    let result = fetch(&providers, source, query.as_str(), max_results).await;
                    match Popup::from_weak(&weak) {
                        Some(popup) => popup.apply(generation, source, result, started.elapsed()),
                        None => debug!(generation, %source, "Popup gone before provider answered"),
                    }
                })
            })
            .collect();

        // Every source may be disabled
        self.inner.borrow_mut().show_empty_if_settled();

        Dispatch { generation, tasks }
    }

    /// Merge one provider's answer into the list, if it is still current
    fn apply(&self, generation: u64, source: Source, result: Result<SourceBatch>, elapsed: Duration) {
        let mut state = self.inner.borrow_mut();
        if generation != state.generation {
            debug!(
                generation,
                current = state.generation,
                %source,
                "Discarding stale provider result"
            );
            return;
        }

        let duration_ms = u64::try_from(elapsed.as_millis()).ok();
        match result {
            Ok(batch) => {
                let now = (state.clock)();
                let items = prepare_batch(batch, &state.query, now);
                for item in &items {
                    state.merge_item(item);
                }
                logging::log_source_event(generation, source, items.len(), duration_ms, true);
            }
            Err(e) => {
                warn!(error = %e, %source, "Provider failed, continuing without it");
                logging::log_source_event(generation, source, 0, duration_ms, false);
            }
        }

        state.settled.add(source);
        state.show_empty_if_settled();
    }

    /// Handle a navigation key
    pub fn on_key(&self, key: NavKey) -> NavOutcome {
        let mut guard = self.inner.borrow_mut();
        let state = &mut *guard;
        let outcome = state.navigator.handle_key(key, state.merge.len());

        match outcome {
            NavOutcome::Moved(focus) => {
                logging::log_key_event(&format!("{:?}", key), "moved");
                state.view.set_focus(focus);
            }
            NavOutcome::Activate(index) => {
                logging::log_key_event(&format!("{:?}", key), "activated");
                match state.merge.entries().get(index) {
                    Some(entry) if state.config.should_open_links() => {
                        state.opener.open(&entry.url).log_err();
                    }
                    Some(entry) => info!(url = %entry.url, "Link opening disabled"),
                    None => crate::debug_panic!("focused row {} has no entry", index),
                }
            }
            NavOutcome::Ignored => {}
        }
        outcome
    }

    /// Tear down: cancel any pending dispatch and drop in-flight results
    pub fn close(&self) {
        let mut state = self.inner.borrow_mut();
        state.debouncer.cancel();
        state.generation += 1;
        state.query = Query::default();
        state.reset_results();
        logging::log_query_event(state.generation, "", "closed");
    }

    pub fn generation(&self) -> u64 {
        self.inner.borrow().generation
    }

    pub fn focus(&self) -> Focus {
        self.inner.borrow().navigator.focus()
    }

    /// Current query text (normalized)
    pub fn query(&self) -> String {
        self.inner.borrow().query.to_string()
    }

    /// Snapshot of the merged results, in display order
    pub fn entries(&self) -> Vec<ResultEntry> {
        self.inner.borrow().merge.entries().to_vec()
    }

    /// True once every source answered for the current generation.
    /// An empty query has nothing in flight.
    pub fn is_settled(&self) -> bool {
        let state = self.inner.borrow();
        state.query.is_empty() || state.settled.is_all()
    }

    /// True while typed input is waiting out the debounce interval
    pub fn has_pending_input(&self) -> bool {
        self.inner.borrow().debouncer.is_pending()
    }
}

impl PopupState {
    fn reset_results(&mut self) {
        self.merge.clear();
        self.settled = SourceSet::empty();
        self.navigator.reset();
        self.view.clear();
        self.view.set_focus(Focus::SearchInput);
    }

    fn merge_item(&mut self, item: &MatchedItem) {
        match self.merge.upsert_item(item) {
            Upsert::Inserted { index } => {
                let highlight = self.config.get_highlight();
                let title = if highlight.enabled {
                    HighlightedTitle::for_query(&item.title, &self.query)
                } else {
                    HighlightedTitle::plain(item.title.as_str())
                };
                self.view.insert_row(
                    index,
                    RowView {
                        url: item.url.clone(),
                        domain: item.domain.clone(),
                        title,
                        sources: SourceSet::from(item.source),
                    },
                );

                let before = self.navigator.focus();
                self.navigator.on_row_inserted(index);
                if self.navigator.focus() != before {
                    self.view.set_focus(self.navigator.focus());
                }
            }
            Upsert::Updated { sources, .. } => {
                if !self.view.update_row(&item.url, sources) {
                    crate::debug_panic!("merged url {} has no rendered row", item.url);
                }
            }
            Upsert::Unchanged { .. } => {}
        }
    }

    fn show_empty_if_settled(&mut self) {
        if self.settled.is_all() && self.merge.is_empty() && !self.query.is_empty() {
            info!(generation = self.generation, "No results");
            self.view.show_empty(true);
        }
    }
}

async fn fetch(
    providers: &Providers,
    source: Source,
    query: &str,
    max_results: usize,
) -> Result<SourceBatch> {
    Ok(match source {
        Source::Tab => SourceBatch::Tabs(providers.tabs.query_all_tabs().await?),
        Source::Bookmark => {
            SourceBatch::Bookmarks(providers.bookmarks.search_bookmarks(query).await?)
        }
        Source::History => {
            SourceBatch::History(providers.history.search_history(query, max_results).await?)
        }
    })
}

#[cfg(test)]
#[path = "popup_tests.rs"]
mod tests;
