//! Data model shared with the external query engine.
//!
//! A search invocation produces one immutable [`ParsedQuery`] and, once the
//! engine resolves it, one [`ResultsTable`] that the controller owns until the
//! next search supersedes it. None of the ranking or matching logic lives
//! here; these types are the wire format of the engine boundary.

use serde::{Deserialize, Serialize};

/// Short item-type names, indexed by an item's type index. Used as CSS class
/// suffixes on rendered result rows (`result-fn`, `result-struct`, ...).
pub const ITEM_TYPES: [&str; 26] = [
    "keyword",
    "primitive",
    "mod",
    "externcrate",
    "import",
    "struct",
    "enum",
    "fn",
    "type",
    "static",
    "trait",
    "impl",
    "tymethod",
    "method",
    "structfield",
    "variant",
    "macro",
    "associatedtype",
    "constant",
    "associatedconstant",
    "union",
    "foreigntype",
    "existential",
    "attr",
    "derive",
    "traitalias",
];

/// Human-readable item-type labels, indexed by an item's type index.
/// The entry for `impl` is intentionally empty; [`type_label`] substitutes
/// `"?"` for empty or out-of-range entries.
pub const LONG_ITEM_TYPES: [&str; 26] = [
    "keyword",
    "primitive type",
    "module",
    "extern crate",
    "re-export",
    "struct",
    "enum",
    "function",
    "type alias",
    "static",
    "trait",
    "",
    "trait method",
    "method",
    "struct field",
    "enum variant",
    "macro",
    "assoc type",
    "constant",
    "assoc const",
    "union",
    "foreign type",
    "existential type",
    "attribute macro",
    "derive macro",
    "trait alias",
];

/// Human-readable type label for a result row, or `"?"` when the table has no
/// usable entry for this type index.
pub fn type_label(ty: usize) -> &'static str {
    match LONG_ITEM_TYPES.get(ty) {
        Some(label) if !label.is_empty() => label,
        _ => "?",
    }
}

/// Short type name for a result row, used as a class suffix. Falls back to
/// an empty string for out-of-range indices.
pub fn type_class(ty: usize) -> &'static str {
    ITEM_TYPES.get(ty).copied().unwrap_or("")
}

/// A single searched element of a parsed query (a name term or a type term).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryElement {
    /// The element name as the user wrote it.
    pub name: String,
}

/// The parsed form of the raw query string, produced once per search
/// invocation by the external parser and immutable thereafter.
///
/// Invariant: `error.is_some()` implies downstream rendering shows only the
/// "In Names" category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    /// Normalized query text, compared against the last-executed cache.
    pub user_query: String,
    /// The query exactly as typed, used for the address and the title.
    pub original: String,
    /// Plain name/type elements searched for.
    pub elems: Vec<QueryElement>,
    /// Return-type constraints (`-> T`).
    pub returned: Vec<QueryElement>,
    /// Total number of searched elements across positions.
    pub found_elems: usize,
    /// Parser error as alternating literal/highlighted segments, or `None`
    /// for a well-formed query.
    pub error: Option<Vec<String>>,
    /// Near-match type-name substitution the engine applied, if any.
    pub correction: Option<String>,
    /// Generic-parameter type name with a near-match that was not applied.
    pub propose_correction_from: Option<String>,
    /// The suggested replacement for `propose_correction_from`.
    pub propose_correction_to: Option<String>,
}

impl ParsedQuery {
    /// A well-formed query with no elements, as the parser produces for
    /// plain-text searches.
    pub fn plain(text: &str) -> Self {
        Self {
            user_query: text.to_string(),
            original: text.to_string(),
            elems: Vec::new(),
            returned: Vec::new(),
            found_elems: 0,
            error: None,
            correction: None,
            propose_correction_from: None,
            propose_correction_to: None,
        }
    }
}

/// One ranked result row, sourced read-only from the external index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    /// Item name, rendered inside the path span.
    pub name: String,
    /// Type index into [`ITEM_TYPES`] / [`LONG_ITEM_TYPES`].
    pub ty: usize,
    /// Link target for the row.
    pub href: String,
    /// Leading module path, rendered before the name.
    #[serde(rename = "displayPath")]
    pub display_path: String,
    /// Short description fragment. Trusted, pre-sanitized HTML; the
    /// sanitization guarantee is an upstream precondition.
    pub desc: String,
    /// Whether the item matched through an alias rather than its name.
    pub is_alias: bool,
    /// The alias that matched, when `is_alias` is set.
    pub alias: Option<String>,
}

/// The three ranked result buckets for one completed search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsTable {
    /// The query these results answer.
    pub query: ParsedQuery,
    /// Matches in item names.
    pub others: Vec<ResultItem>,
    /// Matches in function-parameter types.
    pub in_args: Vec<ResultItem>,
    /// Matches in function-return types.
    pub returned: Vec<ResultItem>,
}

impl ResultsTable {
    /// An empty table for the given query.
    pub fn empty(query: ParsedQuery) -> Self {
        Self {
            query,
            others: Vec::new(),
            in_args: Vec::new(),
            returned: Vec::new(),
        }
    }
}
