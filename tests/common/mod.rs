//! Shared mock hosts for integration tests.
//!
//! The controller only ever talks to the four host traits, so a full search
//! session can run against these in-memory fakes: a `MockEngine` with canned
//! result buckets and a deliberately tiny query grammar, a `MockView` that
//! records commits/focus/navigation, a `MockNav` holding one address, and a
//! `MockPrefs` flag.
//!
//! The mock query grammar covers the query shapes the controller
//! distinguishes: `(::` anywhere is a parse error, `->` splits parameter
//! elements (comma-separated) from a return-type constraint, anything else
//! is a single plain name element.

// Helpers used across different integration test crates.
#![allow(dead_code)]

use docsearch_ui::address::parse_query_string;
use docsearch_ui::{
    AddressParams, Event, FocusRef, FocusTarget, HistoryMode, HostError, NavigationPort,
    ParsedQuery, Preferences, QueryElement, QueryEngine, ResultItem, ResultsTable, ResultsView,
    SearchController, ViewHost,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::UnboundedReceiver;

/// A controller wired to all four mocks, plus its event receiver and the
/// shared execution log.
pub type TestController = SearchController<MockEngine, MockView, MockNav, MockPrefs>;

/// One recorded engine execution: query text and effective crate filter.
pub type ExecRecord = (String, Option<String>);

#[derive(Clone, Default)]
pub struct MockEngine {
    pub crates: Vec<String>,
    /// Canned buckets keyed by `user_query`: (others, in_args, returned).
    pub buckets: HashMap<String, (Vec<ResultItem>, Vec<ResultItem>, Vec<ResultItem>)>,
    pub exec_log: Arc<Mutex<Vec<ExecRecord>>>,
}

impl MockEngine {
    pub fn with_crates(names: &[&str]) -> Self {
        Self {
            crates: names.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    pub fn put_results(&mut self, user_query: &str, others: Vec<ResultItem>) {
        self.buckets
            .insert(user_query.to_string(), (others, Vec::new(), Vec::new()));
    }

    pub fn put_all_buckets(
        &mut self,
        user_query: &str,
        others: Vec<ResultItem>,
        in_args: Vec<ResultItem>,
        returned: Vec<ResultItem>,
    ) {
        self.buckets
            .insert(user_query.to_string(), (others, in_args, returned));
    }

    pub fn executions(&self) -> Vec<ExecRecord> {
        self.exec_log.lock().unwrap().clone()
    }
}

impl QueryEngine for MockEngine {
    fn parse_query(&self, raw: &str) -> ParsedQuery {
        let mut query = ParsedQuery::plain(raw);
        if raw.contains("(::") {
            query.error = Some(vec!["unexpected ".to_string(), "::".to_string()]);
            return query;
        }
        if let Some((before, after)) = raw.split_once("->") {
            query.elems = before
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|name| QueryElement {
                    name: name.to_string(),
                })
                .collect();
            query.returned = after
                .split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(|name| QueryElement {
                    name: name.to_string(),
                })
                .collect();
        } else if !raw.is_empty() {
            query.elems = vec![QueryElement {
                name: raw.to_string(),
            }];
        }
        query.found_elems = query.elems.len() + query.returned.len();
        query
    }

    async fn exec_query(
        &self,
        query: ParsedQuery,
        filter_crate: Option<&str>,
        _active_crate: &str,
    ) -> Result<ResultsTable, HostError> {
        self.exec_log.lock().unwrap().push((
            query.user_query.clone(),
            filter_crate.map(ToString::to_string),
        ));
        let (others, in_args, returned) = self
            .buckets
            .get(&query.user_query)
            .cloned()
            .unwrap_or_default();
        Ok(ResultsTable {
            query,
            others,
            in_args,
            returned,
        })
    }

    fn has_crate(&self, name: &str) -> bool {
        self.crates.iter().any(|c| c == name)
    }

    fn crate_names(&self) -> Vec<String> {
        self.crates.clone()
    }
}

#[derive(Debug, Default)]
pub struct MockView {
    pub input: String,
    pub title: String,
    pub displayed: bool,
    pub loading_calls: usize,
    pub committed: Vec<ResultsView>,
    pub active_tab_calls: Vec<(usize, bool)>,
    pub focused: Option<FocusRef>,
    pub focus_calls: Vec<FocusTarget>,
    pub navigations: Vec<String>,
}

impl ViewHost for MockView {
    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn set_input_value(&mut self, value: &str) {
        self.input = value.to_string();
    }

    fn document_title(&self) -> String {
        self.title.clone()
    }

    fn set_document_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_loading(&mut self) {
        self.loading_calls += 1;
    }

    fn is_displayed(&self) -> bool {
        self.displayed
    }

    fn show_results(&mut self) {
        self.displayed = true;
    }

    fn hide_results(&mut self) {
        self.displayed = false;
    }

    fn commit(&mut self, view: &ResultsView) {
        self.committed.push(view.clone());
    }

    fn set_active_tab(&mut self, tab: usize, corrections_visible: bool) {
        self.active_tab_calls.push((tab, corrections_visible));
    }

    fn focused_row(&self) -> Option<FocusRef> {
        self.focused
    }

    fn focus(&mut self, target: FocusTarget) {
        self.focus_calls.push(target);
        self.focused = match target {
            FocusTarget::Row(row) => Some(row),
            FocusTarget::TabHeader(_) | FocusTarget::SearchInput => None,
        };
    }

    fn navigate_to(&mut self, href: &str) {
        self.navigations.push(href.to_string());
    }
}

#[derive(Debug, Default)]
pub struct MockNav {
    pub base: String,
    pub fragment: Option<String>,
    /// Query string of the current address, without the leading `?`.
    pub query_string: String,
    pub entry: bool,
    pub updates: Vec<(String, HistoryMode)>,
    pub removed_params: usize,
    pub replay_noop: bool,
}

impl MockNav {
    pub fn at(base: &str) -> Self {
        Self {
            base: base.to_string(),
            ..Self::default()
        }
    }

    pub fn last_update(&self) -> Option<&(String, HistoryMode)> {
        self.updates.last()
    }
}

impl NavigationPort for MockNav {
    fn base_address(&self) -> String {
        self.base.clone()
    }

    fn page_fragment(&self) -> Option<String> {
        self.fragment.clone()
    }

    fn query_params(&self) -> AddressParams {
        parse_query_string(&self.query_string)
    }

    fn has_entry(&self) -> bool {
        self.entry
    }

    fn update(&mut self, address: &str, mode: HistoryMode) {
        let after_base = address.split_once('?').map_or("", |(_, rest)| rest);
        let query_string = after_base.split_once('#').map_or(after_base, |(qs, _)| qs);
        self.query_string = query_string.to_string();
        self.updates.push((address.to_string(), mode));
    }

    fn remove_query_parameters(&mut self) {
        self.query_string.clear();
        self.removed_params += 1;
    }

    fn mark_replay_noop(&mut self) {
        self.replay_noop = true;
    }
}

#[derive(Debug, Default)]
pub struct MockPrefs {
    pub go_to_only_result: bool,
}

impl Preferences for MockPrefs {
    fn go_to_only_result(&self) -> bool {
        self.go_to_only_result
    }
}

/// A result row pointing at `<name>.html`.
pub fn item(name: &str, ty: usize) -> ResultItem {
    ResultItem {
        name: name.to_string(),
        ty,
        href: format!("{name}.html"),
        display_path: "demo::".to_string(),
        desc: format!("<p>{name} description</p>"),
        is_alias: false,
        alias: None,
    }
}

/// Controller over the given engine with fresh mocks, rooted at
/// `index.html`, filter dropdown populated from the engine.
pub fn controller(engine: MockEngine) -> (TestController, UnboundedReceiver<Event>) {
    docsearch_ui::tracing::init();
    SearchController::new(
        engine,
        MockView::default(),
        MockNav::at("index.html"),
        MockPrefs::default(),
        "demo",
    )
}

/// Type the given text and run an immediate (submit) search.
pub async fn submit(controller: &mut TestController, text: &str) {
    controller.view_mut().input = text.to_string();
    controller
        .dispatch(Event::SubmitQuery)
        .await
        .expect("search should succeed");
}
