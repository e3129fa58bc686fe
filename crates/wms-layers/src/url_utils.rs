//! URL helpers: subdomain templates, origin trust and proxying.
//!
//! Subdomain templates come in two forms. `{s}` expands to the caller's
//! default subdomain list; `{s:a,b,c}` carries its own list, which wins.

use serde::{Deserialize, Serialize};
use tracing::trace;
use url::Url;

use wms_protocol::encode_uri_component;

use crate::config::GlobalOptions;

/// Subdomains tried for external WMS endpoints without an explicit list.
pub const DEFAULT_SUBDOMAINS: [&str; 6] = ["", "0", "1", "2", "3", "4"];

/// Placeholder understood by tile URL consumers.
pub const SUBDOMAIN_PLACEHOLDER: &str = "{s}";

const TEMPLATE_OPEN: &str = "{s";

/// Byte range of the first subdomain template in `url` and its explicit
/// list, if any. `{s:}` and lists made only of separators carry no list.
fn find_template(url: &str) -> Option<(usize, usize, Option<&str>)> {
    let mut offset = 0;
    while let Some(pos) = url[offset..].find(TEMPLATE_OPEN) {
        let start = offset + pos;
        let rest = &url[start + TEMPLATE_OPEN.len()..];
        if rest.starts_with('}') {
            return Some((start, start + TEMPLATE_OPEN.len() + 1, None));
        }
        if let Some(list) = rest.strip_prefix(':') {
            if let Some(close) = list.find('}') {
                let items = &list[..close];
                let valid = items
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ','));
                if valid {
                    let end = start + TEMPLATE_OPEN.len() + 1 + close + 1;
                    let explicit = items.split(',').any(|s| !s.is_empty());
                    return Some((start, end, explicit.then_some(items)));
                }
            }
        }
        offset = start + TEMPLATE_OPEN.len();
    }
    None
}

/// Explicit subdomain list of a `{s:a,b,c}` template.
pub fn parse_subdomains_tpl(url: &str) -> Option<Vec<String>> {
    let (_, _, list) = find_template(url)?;
    list.map(|items| {
        items
            .split(',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
}

/// Rewrite `{s:a,b,c}` as `{s}`. URLs without a template are unchanged.
pub fn normalize_subdomains_tpl(url: &str) -> String {
    match find_template(url) {
        Some((start, end, _)) => {
            format!("{}{}{}", &url[..start], SUBDOMAIN_PLACEHOLDER, &url[end..])
        }
        None => url.to_string(),
    }
}

/// Concrete endpoint URLs for `url`: one per subdomain when it holds a
/// template, otherwise `url` alone.
pub fn multidomain_urls(url: &str, default_subdomains: &[&str]) -> Vec<String> {
    let Some((start, end, list)) = find_template(url) else {
        return vec![url.to_string()];
    };

    let subdomains: Vec<&str> = match list {
        Some(items) => items.split(',').filter(|s| !s.is_empty()).collect(),
        None => default_subdomains.to_vec(),
    };

    subdomains
        .iter()
        .map(|subdomain| format!("{}{}{}", &url[..start], subdomain, &url[end..]))
        .collect()
}

/// Endpoint built from the first non-empty subdomain, for code that needs a
/// single resolvable URL.
pub fn first_concrete_url(url: &str, default_subdomains: &[&str]) -> String {
    let Some((start, end, list)) = find_template(url) else {
        return url.to_string();
    };
    let first = match list {
        Some(items) => items.split(',').find(|s| !s.is_empty()).unwrap_or(""),
        None => default_subdomains
            .iter()
            .copied()
            .find(|s| !s.is_empty())
            .unwrap_or(""),
    };
    format!("{}{}{}", &url[..start], first, &url[end..])
}

/// Origin trust policy and proxy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlUtils {
    admin_domains: Vec<String>,
    proxy_url: String,
}

impl UrlUtils {
    pub fn new(admin_domains: Vec<String>, proxy_url: impl Into<String>) -> Self {
        Self {
            admin_domains,
            proxy_url: proxy_url.into(),
        }
    }

    pub fn from_options(options: &GlobalOptions) -> Self {
        Self::new(options.admin_domains.clone(), options.proxy_url.clone())
    }

    pub fn proxy_url(&self) -> &str {
        &self.proxy_url
    }

    fn host_of(url: &str) -> Option<String> {
        let concrete = first_concrete_url(url, &DEFAULT_SUBDOMAINS);
        let parsed = Url::parse(&concrete).ok()?;
        match parsed.scheme() {
            "http" | "https" => parsed.host_str().map(str::to_ascii_lowercase),
            _ => None,
        }
    }

    /// Whether `url` points at a domain operated by the administration.
    pub fn is_admin_valid(&self, url: &str) -> bool {
        let Some(host) = Self::host_of(url) else {
            return false;
        };
        self.admin_domains.iter().any(|domain| {
            let domain = domain.to_ascii_lowercase();
            host == domain || host.ends_with(&format!(".{domain}"))
        })
    }

    /// Whether `url` is a well-formed HTTP(S) URL outside the administration's
    /// domains, i.e. data the user must be told comes from a third party.
    pub fn is_third_party_valid(&self, url: &str) -> bool {
        Self::host_of(url).is_some() && !self.is_admin_valid(url)
    }

    /// Route `url` through the proxy: `<proxy><scheme>/<encoded rest>`.
    pub fn proxify_url(&self, url: &str) -> String {
        let (scheme, rest) = match url.split_once("://") {
            Some((scheme, rest)) => (scheme, rest),
            None => ("http", url),
        };
        let proxied = format!("{}{}/{}", self.proxy_url, scheme, encode_uri_component(rest));
        trace!(url, proxied = %proxied, "Proxified url");
        proxied
    }

    /// Proxy handed to 3D imagery providers.
    pub fn tile_proxy(&self) -> TileProxy {
        TileProxy {
            utils: self.clone(),
        }
    }
}

/// Resolves tile request URLs: trusted HTTPS origins are fetched directly,
/// everything else goes through the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileProxy {
    #[serde(flatten)]
    utils: UrlUtils,
}

impl TileProxy {
    pub fn get_url(&self, url: &str) -> String {
        if url.starts_with("https://") && self.utils.is_admin_valid(url) {
            url.to_string()
        } else {
            self.utils.proxify_url(url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utils() -> UrlUtils {
        UrlUtils::from_options(&GlobalOptions::default())
    }

    #[test]
    fn test_parse_subdomains_tpl() {
        assert_eq!(
            parse_subdomains_tpl("https://wms{s:a,b,c}.ch/"),
            Some(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(parse_subdomains_tpl("https://wms{s}.ch/"), None);
        assert_eq!(parse_subdomains_tpl("https://wms{s:}.ch/"), None);
        assert_eq!(parse_subdomains_tpl("https://wms{s:,}.ch/"), None);
        assert_eq!(parse_subdomains_tpl("https://wms.ch/"), None);
    }

    #[test]
    fn test_multidomain_urls_default_list() {
        let urls = multidomain_urls("http://{s}.example.com/wms", &DEFAULT_SUBDOMAINS);
        assert_eq!(
            urls,
            vec![
                "http://.example.com/wms",
                "http://0.example.com/wms",
                "http://1.example.com/wms",
                "http://2.example.com/wms",
                "http://3.example.com/wms",
                "http://4.example.com/wms",
            ]
        );
    }

    #[test]
    fn test_multidomain_urls_explicit_list() {
        let urls = multidomain_urls("https://wms{s:5,6}.geo.admin.ch/", &DEFAULT_SUBDOMAINS);
        assert_eq!(urls, vec!["https://wms5.geo.admin.ch/", "https://wms6.geo.admin.ch/"]);
    }

    #[test]
    fn test_multidomain_urls_empty_list_uses_defaults() {
        for url in ["https://wms{s:}.ch/", "https://wms{s:,}.ch/"] {
            let urls = multidomain_urls(url, &DEFAULT_SUBDOMAINS);
            assert_eq!(urls.len(), DEFAULT_SUBDOMAINS.len(), "{url}");
            assert_eq!(urls[1], "https://wms0.ch/");
        }
        assert_eq!(
            normalize_subdomains_tpl("https://wms{s:,}.ch/"),
            "https://wms{s}.ch/"
        );
    }

    #[test]
    fn test_multidomain_urls_without_template() {
        let urls = multidomain_urls("https://wms.geo.admin.ch/?lang=de", &DEFAULT_SUBDOMAINS);
        assert_eq!(urls, vec!["https://wms.geo.admin.ch/?lang=de"]);
    }

    #[test]
    fn test_normalize_and_first_concrete() {
        assert_eq!(
            normalize_subdomains_tpl("https://wms{s:5,6}.ch/"),
            "https://wms{s}.ch/"
        );
        assert_eq!(
            first_concrete_url("https://wms{s}.ch/", &DEFAULT_SUBDOMAINS),
            "https://wms0.ch/"
        );
        assert_eq!(
            first_concrete_url("https://wms{s:5,6}.ch/", &DEFAULT_SUBDOMAINS),
            "https://wms5.ch/"
        );
    }

    #[test]
    fn test_proxify_keeps_uri_component_marks() {
        assert_eq!(
            utils().proxify_url("https://maps.example.com/wms?name=(a)!*&t='x'"),
            "https://proxy.geo.admin.ch/https/maps.example.com%2Fwms%3Fname%3D(a)!*%26t%3D'x'"
        );
    }

    #[test]
    fn test_trust_policy() {
        let utils = utils();
        assert!(utils.is_admin_valid("https://wms.geo.admin.ch/"));
        assert!(utils.is_admin_valid("https://wms{s}.geo.admin.ch/"));
        assert!(!utils.is_admin_valid("https://notadmin.ch/"));
        assert!(utils.is_third_party_valid("https://wms.geo.bs.ch/wmsBS"));
        assert!(!utils.is_third_party_valid("https://wms.geo.admin.ch/"));
        assert!(!utils.is_third_party_valid("not a url"));
    }

    #[test]
    fn test_proxify_and_tile_proxy() {
        let utils = utils();
        assert_eq!(
            utils.proxify_url("http://wms.geo.bs.ch/wmsBS?map=x"),
            "https://proxy.geo.admin.ch/http/wms.geo.bs.ch%2FwmsBS%3Fmap%3Dx"
        );
        let proxy = utils.tile_proxy();
        assert_eq!(
            proxy.get_url("https://wms0.geo.admin.ch/?a=1"),
            "https://wms0.geo.admin.ch/?a=1"
        );
        assert!(proxy
            .get_url("https://wms.geo.bs.ch/wmsBS")
            .starts_with("https://proxy.geo.admin.ch/https/"));
    }
}
