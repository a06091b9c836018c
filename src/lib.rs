//! Results-presentation and navigation controller for an interactive
//! documentation-search feature.
//!
//! The crate receives a parsed query and ranked result buckets from an
//! external engine, renders them into a tabbed view, keeps that view
//! synchronized with the navigable address and history stack, and answers
//! keyboard/pointer navigation across tabs and result rows. The engine, the
//! rendering surface, the history store, and the preference store are traits
//! in [`host`]; everything else is host-agnostic and unit-testable.

pub mod address;
pub mod controller;
pub mod error;
pub mod host;
pub mod query;
pub mod render;
pub mod tabs;
pub mod tracing;
pub mod trigger;

pub use address::AddressParams;
pub use controller::{Event, Key, SearchController, SessionState};
pub use host::{
    ALL_CRATES, FocusRef, FocusTarget, HistoryMode, HostError, NavigationPort, Preferences,
    QueryEngine, ViewHost,
};
pub use query::{ParsedQuery, QueryElement, ResultItem, ResultsTable};
pub use render::{CategoryView, Node, ResultsView, TabHeader};
