//! Categorized results renderer.
//!
//! Turns the three ranked result buckets into a committable [`ResultsView`]:
//! one renderable fragment plus an item count per category, tab headers with
//! fixed-width count labels, and the banner stack (parse error, applied and
//! proposed corrections). The three category fragments are computed
//! independently and awaited together; partial rendering is never exposed.
//!
//! Result descriptions and alias fragments are trusted, pre-sanitized HTML
//! from the index; they are inserted verbatim via [`Node::Html`].

use crate::address::encode_component;
use crate::query::{ParsedQuery, ResultItem, type_class, type_label};

/// A renderable node, the capability-level abstraction over the host's
/// rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with classes, attributes, and children.
    Element {
        tag: &'static str,
        classes: Vec<String>,
        attrs: Vec<(&'static str, String)>,
        children: Vec<Node>,
    },
    /// Plain text, escaped on serialization.
    Text(String),
    /// A trusted, pre-sanitized rich-text fragment, inserted verbatim.
    Html(String),
}

impl Node {
    fn element(tag: &'static str) -> Self {
        Self::Element {
            tag,
            classes: Vec::new(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    fn class(mut self, class: &str) -> Self {
        if let Self::Element { classes, .. } = &mut self {
            classes.push(class.to_string());
        }
        self
    }

    fn attr(mut self, name: &'static str, value: String) -> Self {
        if let Self::Element { attrs, .. } = &mut self {
            attrs.push((name, value));
        }
        self
    }

    fn child(mut self, node: Self) -> Self {
        if let Self::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    /// Serialize to HTML. Text nodes are escaped; [`Node::Html`] fragments
    /// are emitted as-is per the upstream-sanitization precondition.
    pub fn to_html(&self) -> String {
        match self {
            Self::Text(text) => escape_text(text),
            Self::Html(html) => html.clone(),
            Self::Element {
                tag,
                classes,
                attrs,
                children,
            } => {
                let mut out = format!("<{tag}");
                if !classes.is_empty() {
                    out.push_str(&format!(" class=\"{}\"", escape_attr(&classes.join(" "))));
                }
                for (name, value) in attrs {
                    out.push_str(&format!(" {name}=\"{}\"", escape_attr(value)));
                }
                out.push('>');
                for node in children {
                    out.push_str(&node.to_html());
                }
                out.push_str(&format!("</{tag}>"));
                out
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// One rendered category: its fragment and item count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub node: Node,
    pub count: usize,
}

/// A tab-bar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabHeader {
    pub title: &'static str,
    pub count: usize,
}

impl TabHeader {
    /// Fixed-width count label. U+2007 (figure space) is defined to be the
    /// width of a digit under tabular numerics, so single/double/triple-digit
    /// counts do not shift the header layout.
    pub fn count_label(&self) -> String {
        match self.count {
            n @ 0..=9 => format!("\u{2007}({n})\u{2007}\u{2007}"),
            n @ 10..=99 => format!("\u{2007}({n})\u{2007}"),
            n => format!("\u{2007}({n})"),
        }
    }
}

/// The committed results view: everything the host needs to display one
/// completed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    /// Indexed crate names for the filter dropdown; empty when only one
    /// crate is indexed and the dropdown is hidden.
    pub crate_options: Vec<String>,
    /// The crate filter in effect when this view was rendered.
    pub selected_crate: Option<String>,
    /// Error and correction banners, in display order.
    pub banners: Vec<Node>,
    /// Tab-bar entries; a single entry in error or composite-signature mode.
    pub tab_headers: Vec<TabHeader>,
    /// Rendered category fragments, parallel to the category order.
    pub categories: Vec<CategoryView>,
    /// Index of the highlighted tab.
    pub active_tab: usize,
}

impl ResultsView {
    /// Number of rendered tabs.
    pub fn tab_count(&self) -> usize {
        self.tab_headers.len()
    }

    /// Item count of the category behind the active tab.
    pub fn active_count(&self) -> usize {
        self.categories
            .get(self.active_tab)
            .map_or(0, |category| category.count)
    }

    /// Whether correction banners should be visible with the given tab
    /// active. Corrections only apply to type-based searches: any tab past
    /// the first, or the single composite tab.
    pub fn corrections_visible(&self, tab: usize) -> bool {
        tab > 0 || self.tab_headers.len() == 1
    }

    /// Serialize the whole pane to HTML, in the shape the documentation
    /// site's stylesheet expects.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<h1 class=\"search-results-title\">Results");
        if !self.crate_options.is_empty() {
            out.push_str(
                " in&nbsp;<div id=\"crate-search-div\"><select id=\"crate-search\">\
                 <option value=\"all crates\">all crates</option>",
            );
            for name in &self.crate_options {
                let selected = if self.selected_crate.as_deref() == Some(name.as_str()) {
                    " selected"
                } else {
                    ""
                };
                out.push_str(&format!(
                    "<option value=\"{0}\"{selected}>{0}</option>",
                    escape_attr(name)
                ));
            }
            out.push_str("</select></div>");
        }
        out.push_str("</h1>");

        for banner in &self.banners {
            out.push_str(&banner.to_html());
        }

        out.push_str("<div id=\"search-tabs\">");
        for (index, header) in self.tab_headers.iter().enumerate() {
            let selected = if index == self.active_tab {
                " class=\"selected\""
            } else {
                ""
            };
            out.push_str(&format!(
                "<button{selected}>{}<span class=\"count\">{}</span></button>",
                header.title,
                header.count_label()
            ));
        }
        out.push_str("</div><div id=\"results\">");
        for category in &self.categories {
            out.push_str(&category.node.to_html());
        }
        out.push_str("</div>");
        out
    }
}

/// Render one category's result list into a fragment plus its item count.
///
/// An empty category renders a category-specific empty-state fragment when
/// the query is well-formed; when the query failed to parse, the error
/// banner takes precedence and the fragment stays bare.
pub(crate) async fn render_category(
    items: &[ResultItem],
    query: &ParsedQuery,
    active: bool,
) -> CategoryView {
    let active_class = if active { " active" } else { "" };
    let node = if items.is_empty() {
        if query.error.is_none() {
            Node::element("div")
                .class(&format!("search-failed{active_class}"))
                .child(Node::Html(no_results_fragment(&query.user_query)))
        } else {
            Node::element("div")
        }
    } else {
        let mut list = Node::element("div").class(&format!("search-results{active_class}"));
        for item in items {
            list = list.child(render_result(item));
        }
        list
    };
    CategoryView {
        node,
        count: items.len(),
    }
}

/// One result row: typed link, path with optional alias annotation, and the
/// verbatim description fragment.
fn render_result(item: &ResultItem) -> Node {
    let short = type_class(item.ty);
    let label = type_label(item.ty);

    let alias = if item.is_alias {
        format!(
            " <div class=\"alias\"><b>{}</b>\
             <i class=\"grey\">&nbsp;- see&nbsp;</i></div>",
            item.alias.as_deref().unwrap_or_default()
        )
    } else {
        " ".to_string()
    };

    let result_name = Node::element("div")
        .class("result-name")
        .child(Node::Html(format!(
            "<span class=\"typename\">{label}</span>"
        )))
        .child(Node::Html(format!(
            "<div class=\"path\">{alias}{}<span class=\"{short}\">{}</span></div>",
            item.display_path, item.name
        )));

    let description = Node::element("div")
        .class("desc")
        .child(Node::Html(item.desc.clone()));

    Node::element("a")
        .class(&format!("result-{short}"))
        .attr("href", item.href.clone())
        .child(result_name)
        .child(description)
}

/// Empty-state fragment with external search-engine suggestion links.
fn no_results_fragment(user_query: &str) -> String {
    format!(
        "No results :(<br/>\
         Try on <a href=\"https://duckduckgo.com/?q={}\">DuckDuckGo</a>?<br/><br/>\
         Or try looking in one of these:<ul>\
         <li>The <a href=\"https://doc.rust-lang.org/reference/index.html\">Rust Reference</a> \
         for technical details about the language.</li>\
         <li><a href=\"https://doc.rust-lang.org/rust-by-example/index.html\">Rust By Example</a> \
         for expository code examples.</li>\
         <li>The <a href=\"https://doc.rust-lang.org/book/index.html\">Rust Book</a> \
         for introductions to language features and the language itself.</li>\
         <li><a href=\"https://docs.rs\">Docs.rs</a> for documentation of crates released on \
         <a href=\"https://crates.io/\">crates.io</a>.</li></ul>",
        encode_component(&format!("rust {user_query}"))
    )
}

/// Tab-bar entries for a query, given the three category counts.
///
/// A parse error forces the single "In Names" tab. A query expressing more
/// than one searched element or an explicit return-type constraint collapses
/// the three-way split into one composite-signature tab whose title follows
/// the query shape.
pub(crate) fn tab_headers(query: &ParsedQuery, counts: [usize; 3]) -> Vec<TabHeader> {
    if query.error.is_some() {
        return vec![TabHeader {
            title: "In Names",
            count: counts[0],
        }];
    }
    if query.found_elems <= 1 && query.returned.is_empty() {
        return vec![
            TabHeader {
                title: "In Names",
                count: counts[0],
            },
            TabHeader {
                title: "In Parameters",
                count: counts[1],
            },
            TabHeader {
                title: "In Return Types",
                count: counts[2],
            },
        ];
    }
    let title = if query.elems.is_empty() {
        "In Function Return Types"
    } else if query.returned.is_empty() {
        "In Function Parameters"
    } else {
        "In Function Signatures"
    };
    vec![TabHeader {
        title,
        count: counts[0],
    }]
}

/// The banner stack for a query: parse error first, then applied and
/// proposed corrections. Correction banners are suppressed entirely when the
/// query failed to parse.
pub(crate) fn banners(query: &ParsedQuery) -> Vec<Node> {
    let mut out = Vec::new();
    if let Some(error) = &query.error {
        out.push(error_banner(error));
        return out;
    }
    if let Some(correction) = &query.correction {
        let original = query
            .returned
            .first()
            .or_else(|| query.elems.first())
            .map(|elem| elem.name.as_str())
            .unwrap_or_default();
        out.push(Node::element("h3").class("search-corrections").child(Node::Html(format!(
            "Type \"{original}\" not found. Showing results for closest type name \"{correction}\" instead."
        ))));
    }
    if let (Some(from), Some(to)) = (
        &query.propose_correction_from,
        &query.propose_correction_to,
    ) {
        out.push(Node::element("h3").class("search-corrections").child(Node::Html(format!(
            "Type \"{from}\" not found and used as generic parameter. Consider searching for \"{to}\" instead."
        ))));
    }
    out
}

/// Inline parser-error banner with the offending tokens highlighted.
///
/// Error segments alternate literal text and highlighted tokens; highlighted
/// segments become code spans with their spaces hardened so the message does
/// not reflow around them. Only angle brackets are escaped, matching what
/// the parser guarantees about segment content.
fn error_banner(segments: &[String]) -> Node {
    let joined: String = segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            let escaped = segment.replace('<', "&lt;").replace('>', "&gt;");
            if index % 2 == 0 {
                escaped
            } else {
                format!("<code>{}</code>", escaped.replace(' ', "&nbsp;"))
            }
        })
        .collect();
    Node::element("h3")
        .class("error")
        .child(Node::Html(format!("Query parser error: \"{joined}\".")))
}
