//! Shareable-address encoding and decoding.
//!
//! The navigable address is the persistent half of the controller's state:
//! `?search=<query>&filter-crate=<crate>` plus an untouched page-section
//! fragment. Encoding must round-trip arbitrary query text, including
//! reserved characters, so the same search can be reproduced from a pasted
//! link or a back/forward navigation.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Address parameter carrying the literal query text.
pub const PARAM_SEARCH: &str = "search";
/// Address parameter carrying the crate filter.
pub const PARAM_FILTER_CRATE: &str = "filter-crate";
/// Read-only trigger parameter for the sole-result jump; never re-emitted.
pub const PARAM_GO_TO_FIRST: &str = "go_to_first";

/// Characters escaped in parameter values. Everything except the
/// `encodeURIComponent` unreserved set, so addresses produced here match the
/// ones produced by the surrounding site.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// The search-related query parameters decoded from an address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParams {
    /// Literal query text from `search`, if present.
    pub search: Option<String>,
    /// Crate filter from `filter-crate`, if present.
    pub filter_crate: Option<String>,
    /// Whether `go_to_first` was set.
    pub go_to_first: bool,
}

/// Percent-encode a single parameter value.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Decode a percent-encoded parameter value. Invalid UTF-8 sequences are
/// replaced rather than rejected; a mangled pasted link still searches.
pub fn decode_component(value: &str) -> String {
    percent_decode_str(value).decode_utf8_lossy().into_owned()
}

/// Build the canonical shareable address for a query and crate filter.
///
/// The filter parameter is appended only when a filter is active, and the
/// page-section fragment (without its `#`) is preserved untouched at the end.
pub fn build_address(
    base: &str,
    search: &str,
    filter_crate: Option<&str>,
    fragment: Option<&str>,
) -> String {
    let mut address = format!("{base}?{PARAM_SEARCH}={}", encode_component(search));
    if let Some(filter) = filter_crate {
        address.push_str(&format!(
            "&{PARAM_FILTER_CRATE}={}",
            encode_component(filter)
        ));
    }
    if let Some(fragment) = fragment {
        address.push('#');
        address.push_str(fragment);
    }
    address
}

/// Parse the search-related parameters out of a raw query string.
///
/// Accepts the string with or without its leading `?`. Unknown parameters are
/// ignored; repeated parameters keep the last occurrence.
pub fn parse_query_string(raw: &str) -> AddressParams {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut params = AddressParams::default();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match decode_component(key).as_str() {
            PARAM_SEARCH => params.search = Some(decode_component(value)),
            PARAM_FILTER_CRATE => params.filter_crate = Some(decode_component(value)),
            PARAM_GO_TO_FIRST => params.go_to_first = !value.is_empty() && value != "false",
            _ => {}
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("Vec", None)]
    #[case("a & b = c", None)]
    #[case("-> Result<T, E>", Some("serde"))]
    #[case("fn(&mut [u8]) -> usize", Some("my-crate"))]
    #[case("100% <escaped>", Some("crate&name"))]
    fn test_address_round_trip(#[case] search: &str, #[case] filter: Option<&str>) {
        let address = build_address("index.html", search, filter, None);
        let query_string = address.split_once('?').unwrap().1;
        let params = parse_query_string(query_string);
        check!(params.search.as_deref() == Some(search));
        check!(params.filter_crate.as_deref() == filter);
        check!(!params.go_to_first);
    }

    #[test]
    fn test_fragment_preserved() {
        let address = build_address("trait.Read.html", "read", None, Some("required-methods"));
        check!(address.ends_with("#required-methods"));
        check!(address.starts_with("trait.Read.html?search=read"));
    }

    #[test]
    fn test_filter_omitted_when_absent() {
        let address = build_address("index.html", "Vec", None, None);
        check!(!address.contains(PARAM_FILTER_CRATE));
    }

    #[rstest]
    #[case("?go_to_first=true", true)]
    #[case("go_to_first=1", true)]
    #[case("go_to_first=false", false)]
    // A valueless parameter does not trigger the jump.
    #[case("go_to_first", false)]
    #[case("go_to_first=", false)]
    #[case("search=x", false)]
    fn test_go_to_first(#[case] raw: &str, #[case] expected: bool) {
        check!(parse_query_string(raw).go_to_first == expected);
    }

    #[test]
    fn test_unknown_params_ignored() {
        let params = parse_query_string("search=Vec&theme=dark");
        check!(params.search.as_deref() == Some("Vec"));
        check!(params.filter_crate.is_none());
    }

    #[test]
    fn test_reserved_characters_encoded() {
        let encoded = encode_component("a&b=c d<e>");
        check!(encoded == "a%26b%3Dc%20d%3Ce%3E");
    }
}
