//! Query-string construction for WMS requests.
//!
//! Values are encoded the way the browser client encoded them
//! (`encodeURIComponent`, then `@ : $ , ;` restored and spaces kept as
//! `%20`), so generated URLs are byte-identical to the ones permalinks and
//! caches already know about.

/// Characters `encodeURIComponent` leaves alone but `urlencoding` escapes.
const URI_COMPONENT_RAW: [(&str, &str); 5] = [
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
    ("%2A", "*"),
];

/// Characters the client restores in query values on top of
/// `encodeURIComponent`.
const QUERY_RAW: [(&str, &str); 5] = [
    ("%40", "@"),
    ("%3A", ":"),
    ("%24", "$"),
    ("%2C", ","),
    ("%3B", ";"),
];

/// Template braces, kept raw so `{token}` placeholders survive encoding.
const TEMPLATE_BRACES: [(&str, &str); 2] = [("%7B", "{"), ("%7D", "}")];

fn restore(mut encoded: String, table: &[(&str, &str)]) -> String {
    for &(escaped, raw) in table {
        encoded = encoded.replace(escaped, raw);
    }
    encoded
}

/// Encode `value` as a whole URI component, e.g. a proxied URL.
pub fn encode_uri_component(value: &str) -> String {
    restore(urlencoding::encode(value).into_owned(), &URI_COMPONENT_RAW)
}

/// Encode a single query key or value.
pub fn encode_uri_query(value: &str) -> String {
    restore(encode_uri_component(value), &QUERY_RAW)
}

/// Ordered key-value pairs rendered as a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
    keep_template_tokens: bool,
}

impl QueryString {
    pub fn new() -> Self {
        Self::default()
    }

    /// A query string whose values may contain `{token}` placeholders.
    pub fn template() -> Self {
        Self {
            pairs: Vec::new(),
            keep_template_tokens: true,
        }
    }

    /// Append a pair. Order is preserved in the output.
    pub fn push(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    /// Append a pair in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn encode(&self, value: &str) -> String {
        let mut encoded = encode_uri_query(value);
        if self.keep_template_tokens {
            for (escaped, raw) in TEMPLATE_BRACES {
                encoded = encoded.replace(escaped, raw);
            }
        }
        encoded
    }

    /// Render as `k1=v1&k2=v2`.
    pub fn to_key_value(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{}={}", self.encode(k), self.encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Append an already encoded parameter string to a URL, adding `?` or `&`
/// only when the URL does not already end with one.
pub fn append(url: &str, params: &str) -> String {
    if params.is_empty() {
        return url.to_string();
    }

    let separator = if url.ends_with('?') || url.ends_with('&') {
        ""
    } else if url.contains(['?', '&']) {
        "&"
    } else {
        "?"
    };

    format!("{url}{separator}{params}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_browser_encoding() {
        assert_eq!(encode_uri_query("image/png"), "image%2Fpng");
        assert_eq!(encode_uri_query("EPSG:4326"), "EPSG:4326");
        assert_eq!(encode_uri_query("a,b;c@d$e"), "a,b;c@d$e");
        assert_eq!(encode_uri_query("two words"), "two%20words");
        assert_eq!(encode_uri_query("it's (ok)!*"), "it's%20(ok)!*");
        assert_eq!(encode_uri_query("{x}"), "%7Bx%7D");
    }

    #[test]
    fn test_encode_uri_component() {
        assert_eq!(
            encode_uri_component("wms.ch:8080/a?b=(1)!*&c='d'"),
            "wms.ch%3A8080%2Fa%3Fb%3D(1)!*%26c%3D'd'"
        );
    }

    #[test]
    fn test_key_value_preserves_order() {
        let query = QueryString::new()
            .push("layers", "a,b")
            .push("format", "image/png")
            .push("styles", "");
        assert_eq!(query.to_key_value(), "layers=a,b&format=image%2Fpng&styles=");
        assert_eq!(query.keys().collect::<Vec<_>>(), vec!["layers", "format", "styles"]);
    }

    #[test]
    fn test_template_keeps_tokens() {
        let query = QueryString::template().push("bbox", "{west},{south}");
        assert_eq!(query.to_key_value(), "bbox={west},{south}");
    }

    #[test]
    fn test_append_separators() {
        assert_eq!(append("https://wms.ch/", "a=1"), "https://wms.ch/?a=1");
        assert_eq!(append("https://wms.ch/?", "a=1"), "https://wms.ch/?a=1");
        assert_eq!(append("https://wms.ch/?map=x", "a=1"), "https://wms.ch/?map=x&a=1");
        assert_eq!(append("https://wms.ch/?map=x&", "a=1"), "https://wms.ch/?map=x&a=1");
        assert_eq!(append("https://wms.ch/", ""), "https://wms.ch/");
    }
}
