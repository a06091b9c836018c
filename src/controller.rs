//! The interaction/state-synchronization controller.
//!
//! [`SearchController`] owns all mutable session state (selected tab, per-tab
//! focus, last-executed-query cache, crate filter, saved titles) and funnels
//! every mutation through a single [`dispatch`](SearchController::dispatch)
//! entry point. The embedding host forwards raw events into the controller's
//! serialized event queue; handlers may suspend (query execution, category
//! rendering) but never leave the session state inconsistent at a suspension
//! point.
//!
//! Only the most recently initiated search may commit to the visible state:
//! each search takes a fresh epoch and the commit step discards completions
//! whose epoch has been superseded.

use crate::address::{AddressParams, build_address};
use crate::error::Result;
use crate::host::{
    ALL_CRATES, FocusRef, FocusTarget, HistoryMode, NavigationPort, Preferences, QueryEngine,
    ViewHost,
};
use crate::query::ResultsTable;
use crate::render::{ResultsView, banners, render_category, tab_headers};
use crate::tabs::{TabState, initial_tab};
use crate::trigger::{DEBOUNCE_DELAY, DebounceScheduler, DebouncedTrigger};
use anyhow::Context as _;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// An unmodified navigation keystroke. The host filters out modified
/// keystrokes (alt/ctrl/shift/meta) before forwarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
}

/// A raw event forwarded by the host into the controller's queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The input field's text changed (keystroke). Debounced.
    InputChanged,
    /// Explicit submit of the search form. Immediate.
    SubmitQuery,
    /// A paste or change event settled new input text. Immediate.
    InputCommitted,
    /// A scheduled debounce window elapsed.
    DebounceElapsed { generation: u64 },
    /// The input field gained focus.
    InputFocused,
    /// A keystroke while the input field has focus.
    InputKey(Key),
    /// A keystroke while the results pane has focus.
    ResultsKey(Key),
    /// A tab header was clicked.
    TabSelected(usize),
    /// The crate-filter selection changed to this raw value (possibly the
    /// "all crates" sentinel).
    CrateFilterSelected(String),
    /// The browser navigated back or forward to a recorded history entry.
    HistoryPopped,
    /// The page was restored from a cached back/forward navigation.
    PageShown,
}

/// Process-wide mutable session state, single instance per controller.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Selected tab and per-tab focus memory.
    pub tabs: TabState,
    /// Last executed `userQuery`, used solely to suppress redundant
    /// re-execution. Cleared on back/forward navigation and on crate-filter
    /// change.
    pub current_results: Option<String>,
    /// The crate-filter selection, `None` for the "all crates" sentinel.
    pub filter_crate: Option<String>,
    /// The results title last written for this session's searches.
    pub results_title: String,
    /// The document title from before the feature's own title mutations.
    pub previous_title: String,
    search_epoch: u64,
}

/// The results-presentation and navigation controller.
pub struct SearchController<E, V, N, P> {
    engine: E,
    view: V,
    nav: N,
    prefs: P,
    /// Identifier of the currently-active index, passed through to the
    /// engine on every execution.
    active_crate: String,
    session: SessionState,
    trigger: DebouncedTrigger,
    scheduler: DebounceScheduler,
    committed: Option<ResultsView>,
    events: UnboundedSender<Event>,
}

impl<E, V, N, P> SearchController<E, V, N, P>
where
    E: QueryEngine,
    V: ViewHost,
    N: NavigationPort,
    P: Preferences,
{
    /// Create a controller and the receiving half of its event queue. The
    /// caller drives the queue, usually via [`run`](Self::run).
    pub fn new(
        engine: E,
        view: V,
        nav: N,
        prefs: P,
        active_crate: impl Into<String>,
    ) -> (Self, UnboundedReceiver<Event>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let controller = Self {
            engine,
            view,
            nav,
            prefs,
            active_crate: active_crate.into(),
            session: SessionState::default(),
            trigger: DebouncedTrigger::default(),
            scheduler: DebounceScheduler::new(events.clone()),
            committed: None,
            events,
        };
        (controller, receiver)
    }

    /// A handle the host uses to forward events into the queue.
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.events.clone()
    }

    /// The current session state.
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The last committed results view, if a search has rendered.
    pub fn committed_view(&self) -> Option<&ResultsView> {
        self.committed.as_ref()
    }

    /// The rendering surface, for hosts that need it back.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Mutable access to the rendering surface, e.g. for the host to write
    /// new input text before forwarding the event that announces it.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// The navigation port, for hosts that need it back.
    pub fn nav(&self) -> &N {
        &self.nav
    }

    /// Mutable access to the navigation port.
    pub fn nav_mut(&mut self) -> &mut N {
        &mut self.nav
    }

    /// One-time initialization: capture the pre-search document title, seed
    /// an empty input field from the address's `search` parameter, and run
    /// the restored search if one is present.
    pub async fn startup(&mut self) -> Result<()> {
        self.session.previous_title = self.view.document_title();
        let params = self.nav.query_params();
        if self.view.input_value().is_empty()
            && let Some(search) = &params.search
        {
            self.view.set_input_value(search);
        }
        if params.search.as_deref().is_some_and(|s| !s.is_empty()) {
            self.search(false).await?;
        }
        Ok(())
    }

    /// Drain the event queue until the host drops all senders.
    pub async fn run(mut self, mut events: UnboundedReceiver<Event>) -> Result<()> {
        while let Some(event) = events.recv().await {
            self.dispatch(event).await?;
        }
        Ok(())
    }

    /// Apply one event. All session-state mutations go through here.
    pub async fn dispatch(&mut self, event: Event) -> Result<()> {
        tracing::trace!(?event, "dispatch");
        match event {
            Event::InputChanged => {
                self.on_input_changed();
                Ok(())
            }
            Event::SubmitQuery | Event::InputCommitted => {
                self.cancel_pending();
                self.search(false).await
            }
            Event::DebounceElapsed { generation } => {
                if self.trigger.accepts(generation) {
                    self.search(false).await
                } else {
                    tracing::trace!(generation, "discarding superseded debounce firing");
                    Ok(())
                }
            }
            Event::InputFocused => {
                self.put_back_search();
                Ok(())
            }
            Event::InputKey(key) => {
                if key == Key::ArrowDown {
                    self.focus_search_result();
                }
                Ok(())
            }
            Event::ResultsKey(key) => {
                self.on_results_key(key);
                Ok(())
            }
            Event::TabSelected(tab) => {
                self.print_tab(tab);
                Ok(())
            }
            Event::CrateFilterSelected(value) => self.on_crate_filter_selected(value).await,
            Event::HistoryPopped => self.on_history_popped().await,
            Event::PageShown => self.on_page_shown().await,
        }
    }

    /// Keystroke in the input field: reschedule the debounced search, or
    /// drop straight to the hidden state when the field was emptied.
    fn on_input_changed(&mut self) {
        if self.view.input_value().is_empty() {
            self.cancel_pending();
            self.view.hide_results();
        } else {
            // schedule() supersedes any outstanding generation on its own.
            let generation = self.trigger.schedule();
            self.scheduler.schedule(generation, DEBOUNCE_DELAY);
        }
    }

    fn cancel_pending(&mut self) {
        self.trigger.cancel();
        self.scheduler.cancel();
    }

    /// The crate filter in effect: the stored selection, but only while the
    /// engine actually indexes that crate.
    fn effective_filter(&self) -> Option<String> {
        self.session
            .filter_crate
            .as_ref()
            .filter(|name| self.engine.has_crate(name))
            .cloned()
    }

    /// Run the full search pipeline from the current input state.
    ///
    /// With `forced` unset, a query equal to the last executed one
    /// short-circuits without re-execution, only restoring visibility of the
    /// previously rendered results if they are hidden.
    pub async fn search(&mut self, forced: bool) -> Result<()> {
        let raw = self.view.input_value();
        let query = self.engine.parse_query(raw.trim());
        let mut filter_crate = self.effective_filter();

        if !forced && self.session.current_results.as_deref() == Some(query.user_query.as_str()) {
            if !query.user_query.is_empty() {
                self.put_back_search();
            }
            return Ok(());
        }

        self.session.search_epoch += 1;
        let epoch = self.session.search_epoch;
        self.view.set_loading();

        let params = self.nav.query_params();
        // No in-page selection to go on: the address's filter parameter wins.
        if filter_crate.is_none() {
            filter_crate = params.filter_crate.clone();
        }

        // Keep the browser history meaningful: the title names the query,
        // and only the most recent query text is recorded per entry.
        self.session.results_title = format!("Results for {} - Rust", query.original);
        let address = build_address(
            &self.nav.base_address(),
            &query.original,
            filter_crate.as_deref(),
            self.nav.page_fragment().as_deref(),
        );
        self.update_search_history(&address);

        tracing::debug!(query = %query.user_query, filter = ?filter_crate, "executing search");
        let results = self
            .engine
            .exec_query(query, filter_crate.as_deref(), &self.active_crate)
            .await
            .context("query execution failed")?;

        self.show_results(results, params.go_to_first, filter_crate, epoch)
            .await
    }

    /// Render a completed search and commit it to the host.
    async fn show_results(
        &mut self,
        results: ResultsTable,
        go_to_first: bool,
        filter_crate: Option<String>,
        epoch: u64,
    ) -> Result<()> {
        if go_to_first || (results.others.len() == 1 && self.prefs.go_to_only_result()) {
            // Jump straight to the sole result. The query parameters are
            // stripped first and history replay is marked as a no-op so
            // back-navigation lands on the search, not in a redirect loop.
            self.nav.mark_replay_noop();
            self.nav.remove_query_parameters();
            if let Some(sole) = results.others.first() {
                tracing::debug!(href = %sole.href, "jumping to sole result");
                self.view.navigate_to(&sole.href);
            }
            return Ok(());
        }

        let query = results.query;
        let (others, in_args, returned) = futures::join!(
            render_category(&results.others, &query, true),
            render_category(&results.in_args, &query, false),
            render_category(&results.returned, &query, false),
        );
        let counts = [others.count, in_args.count, returned.count];

        // Last write wins: a newer search owns the visible state by now, and
        // a discarded completion must leave the execution cache alone too.
        if epoch != self.session.search_epoch {
            tracing::trace!(epoch, "discarding stale search completion");
            return Ok(());
        }

        self.session.current_results = Some(query.user_query.clone());
        let headers = tab_headers(&query, counts);
        let active_tab = if headers.len() == 1 {
            0
        } else {
            initial_tab(self.session.tabs.current(), counts)
        };

        let crate_names = self.engine.crate_names();
        let view = ResultsView {
            crate_options: if crate_names.len() > 1 {
                crate_names
            } else {
                Vec::new()
            },
            selected_crate: filter_crate,
            banners: banners(&query),
            tab_headers: headers,
            categories: vec![others, in_args, returned],
            active_tab,
        };

        self.session.tabs.reset(view.tab_count());
        self.view.commit(&view);
        self.view.show_results();
        self.view.set_document_title(&self.session.results_title);
        self.committed = Some(view);
        self.print_tab(active_tab);
        Ok(())
    }

    /// Select a rendered tab, falling back to tab 0 when the requested one
    /// was not rendered.
    fn print_tab(&mut self, tab: usize) {
        let Some(view) = self.committed.as_mut() else {
            return;
        };
        let target = if tab < view.tab_headers.len() && tab < view.categories.len() {
            tab
        } else {
            0
        };
        view.active_tab = target;
        let corrections_visible = view.corrections_visible(target);
        self.session.tabs.set_current(target);
        self.view.set_active_tab(target, corrections_visible);
    }

    /// Cyclic tab move, saving the outgoing tab's focused row first.
    fn next_tab(&mut self, direction: isize) {
        if self.committed.is_none() {
            return;
        }
        self.session.tabs.save_focus(self.view.focused_row());
        let next = self.session.tabs.advance(direction);
        self.print_tab(next);
        self.focus_search_result();
    }

    /// Focus the row last focused on the active tab, else the first result,
    /// else the active tab's header.
    fn focus_search_result(&mut self) {
        let current = self.session.tabs.current();
        let target = self
            .session
            .tabs
            .take_focus(current)
            .map(FocusTarget::Row)
            .or_else(|| {
                let has_rows = self
                    .committed
                    .as_ref()
                    .is_some_and(|view| view.active_count() > 0);
                has_rows.then_some(FocusTarget::Row(FocusRef {
                    tab: current,
                    row: 0,
                }))
            })
            .unwrap_or(FocusTarget::TabHeader(current));
        self.view.focus(target);
    }

    fn on_results_key(&mut self, key: Key) {
        match key {
            Key::ArrowUp => match self.view.focused_row() {
                Some(row) if row.row > 0 => self.view.focus(FocusTarget::Row(FocusRef {
                    tab: row.tab,
                    row: row.row - 1,
                })),
                _ => self.view.focus(FocusTarget::SearchInput),
            },
            Key::ArrowDown => {
                if let Some(row) = self.view.focused_row() {
                    let count = self.committed.as_ref().map_or(0, ResultsView::active_count);
                    if row.row + 1 < count {
                        self.view.focus(FocusTarget::Row(FocusRef {
                            tab: row.tab,
                            row: row.row + 1,
                        }));
                    }
                }
            }
            Key::ArrowLeft => self.next_tab(-1),
            Key::ArrowRight => self.next_tab(1),
        }
    }

    /// Restore visibility of already-rendered results without recomputation,
    /// re-recording the address and the results title.
    fn put_back_search(&mut self) {
        let input = self.view.input_value();
        if input.is_empty() || self.view.is_displayed() {
            return;
        }
        self.view.show_results();
        let address = build_address(
            &self.nav.base_address(),
            &input,
            self.effective_filter().as_deref(),
            self.nav.page_fragment().as_deref(),
        );
        self.nav.update(&address, HistoryMode::Replace);
        self.view.set_document_title(&self.session.results_title);
    }

    /// Push only on arrival at the search feature (no entry state and no
    /// `search` parameter yet); every subsequent keystroke replaces, so
    /// incremental typing does not bloat the history stack.
    fn update_search_history(&mut self, address: &str) {
        let params: AddressParams = self.nav.query_params();
        let arriving =
            !self.nav.has_entry() && params.search.as_deref().unwrap_or_default().is_empty();
        let mode = if arriving {
            HistoryMode::Push
        } else {
            HistoryMode::Replace
        };
        self.nav.update(address, mode);
    }

    /// Back/forward navigation: restore the input from the address, clear
    /// the execution cache so the displayed state is rebuilt, and re-run the
    /// pipeline (or return to the blank state).
    async fn on_history_popped(&mut self) -> Result<()> {
        let params = self.nav.query_params();
        // The history capability does not restore titles; do it manually.
        self.view.set_document_title(&self.session.previous_title);
        self.session.current_results = None;
        match params.search {
            Some(search) if !search.is_empty() => {
                self.view.set_input_value(&search);
                self.search(false).await
            }
            _ => {
                self.view.set_input_value("");
                self.view.hide_results();
                Ok(())
            }
        }
    }

    /// Page restore from a cached back/forward navigation: re-seed the input
    /// from the address and re-run the pipeline idempotently.
    async fn on_page_shown(&mut self) -> Result<()> {
        let params = self.nav.query_params();
        if self.view.input_value().is_empty()
            && let Some(search) = &params.search
            && !search.is_empty()
        {
            self.view.set_input_value(search);
        }
        self.search(false).await
    }

    /// Crate-filter change: store the selection, drop the filter parameter
    /// from the address when reset to the sentinel, invalidate the execution
    /// cache, and re-search immediately.
    async fn on_crate_filter_selected(&mut self, value: String) -> Result<()> {
        if value == ALL_CRATES {
            self.session.filter_crate = None;
            let query = self.view.input_value().trim().to_string();
            let address = build_address(
                &self.nav.base_address(),
                &query,
                None,
                self.nav.page_fragment().as_deref(),
            );
            self.update_search_history(&address);
        } else {
            self.session.filter_crate = Some(value);
        }
        // The previous results were computed under a different scope; even
        // identical query text must re-execute.
        self.session.current_results = None;
        self.search(true).await
    }
}
