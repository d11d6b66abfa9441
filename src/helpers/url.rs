//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped by JavaScript's `encodeURIComponent`
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

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/posts/hello") // -> "https://blog.rook.works/posts/hello"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let path = path.trim_start_matches('/');
    format!("{}/{}", config.base_url(), path)
}

/// Like `full_url_for`, but keeps URLs that already carry a scheme
pub fn absolute_url(config: &SiteConfig, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        full_url_for(config, path)
    }
}

/// Percent-encode a single URL component
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Build a query string from key/value pairs, skipping blank values.
/// Returns an empty string when nothing is left.
pub fn build_query(params: &[(&str, &str)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect();

    if pairs.is_empty() {
        String::new()
    } else {
        format!("?{}", pairs.join("&"))
    }
}

/// Share links for a post page
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ShareLinks {
    pub x: String,
    pub facebook: String,
    pub linkedin: String,
}

impl ShareLinks {
    pub fn new(title: &str, url: &str) -> Self {
        let text = encode_component(title);
        let url = encode_component(url);
        Self {
            x: format!("https://twitter.com/intent/tweet?text={}&url={}", text, url),
            facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
            linkedin: format!(
                "https://www.linkedin.com/sharing/share-offsite/?url={}",
                url
            ),
        }
    }
}
