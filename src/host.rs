//! Host-boundary traits.
//!
//! The controller never touches a real rendering surface, history API, or
//! search index. The embedding shell supplies these four capabilities, which
//! keeps every controller transition unit-testable against mock hosts.

use crate::query::{ParsedQuery, ResultsTable};
use crate::render::ResultsView;

/// Sentinel value of the crate-filter selection meaning "no filter".
pub const ALL_CRATES: &str = "all crates";

/// Error at the host boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HostError {
    /// The query engine failed to resolve a query.
    #[error("query engine failure: {0}")]
    Engine(String),
}

/// How a navigation-history update is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryMode {
    /// Add a new history entry.
    Push,
    /// Overwrite the current entry.
    Replace,
}

/// Identifies a result row by rendered position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusRef {
    /// Tab the row belongs to.
    pub tab: usize,
    /// Zero-based row index within the tab.
    pub row: usize,
}

/// Where the controller wants input focus to land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    /// A specific result row. The host scrolls it into view as needed.
    Row(FocusRef),
    /// The tab header button at the given index.
    TabHeader(usize),
    /// The search input field.
    SearchInput,
}

/// The external query engine: parser plus ranked-result executor.
///
/// `parse_query` is synchronous and infallible (parse errors are data, not
/// failures); `exec_query` is asynchronous and must not block the caller's
/// event loop.
pub trait QueryEngine {
    /// Parse raw input text into a structured query.
    fn parse_query(&self, raw: &str) -> ParsedQuery;

    /// Execute a parsed query against the index identified by
    /// `active_crate`, optionally narrowed to `filter_crate`.
    fn exec_query(
        &self,
        query: ParsedQuery,
        filter_crate: Option<&str>,
        active_crate: &str,
    ) -> impl Future<Output = Result<ResultsTable, HostError>> + Send;

    /// Whether the engine indexes a crate by this name. Gates the crate
    /// filter so a stale selection cannot narrow the search to nothing.
    fn has_crate(&self, name: &str) -> bool;

    /// All indexed crate names, for the filter dropdown.
    fn crate_names(&self) -> Vec<String>;
}

/// The rendering surface: a committed view model, the input field, the
/// document title, visibility, and focus queries.
pub trait ViewHost {
    /// Current contents of the search input field.
    fn input_value(&self) -> String;
    /// Overwrite the search input field.
    fn set_input_value(&mut self, value: &str);

    /// Current document title.
    fn document_title(&self) -> String;
    /// Overwrite the document title.
    fn set_document_title(&mut self, title: &str);

    /// Show a transient loading state until the next commit.
    fn set_loading(&mut self);
    /// Whether the results pane is currently visible.
    fn is_displayed(&self) -> bool;
    /// Make the results pane visible.
    fn show_results(&mut self);
    /// Hide the results pane, returning to the page content.
    fn hide_results(&mut self);

    /// Replace the displayed results with a freshly rendered view.
    fn commit(&mut self, view: &ResultsView);
    /// Switch the highlighted tab and correction-banner visibility on the
    /// already-committed view.
    fn set_active_tab(&mut self, tab: usize, corrections_visible: bool);

    /// The result row that currently has input focus, if any.
    fn focused_row(&self) -> Option<FocusRef>;
    /// Move input focus. Scrolling the target into view is the host's job.
    fn focus(&mut self, target: FocusTarget);

    /// Navigate the page directly to a result target (sole-result jump).
    fn navigate_to(&mut self, href: &str);
}

/// Narrow read/write interface over the navigable address and history stack.
pub trait NavigationPort {
    /// The current address without query string or fragment.
    fn base_address(&self) -> String;
    /// The current page-section fragment, without its `#`.
    fn page_fragment(&self) -> Option<String>;
    /// Search-related parameters decoded from the current address.
    fn query_params(&self) -> crate::address::AddressParams;
    /// Whether the current history entry carries state for this page.
    fn has_entry(&self) -> bool;
    /// Record an address, either as a new entry or replacing the current one.
    fn update(&mut self, address: &str, mode: HistoryMode);
    /// Strip the search query parameters from the current address.
    fn remove_query_parameters(&mut self);
    /// Mark history replay as a no-op for the next transition, so direct
    /// navigation away from a sole result does not redirect-loop on
    /// back-navigation.
    fn mark_replay_noop(&mut self);
}

/// User-preference lookup.
pub trait Preferences {
    /// Whether a search with exactly one result should navigate straight to
    /// it instead of rendering the results view.
    fn go_to_only_result(&self) -> bool;
}
