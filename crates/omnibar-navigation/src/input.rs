//! Input classification for the location bar
//!
//! Every input yields two targets:
//! 1. A navigation URL (scheme completed, guessed when not typed)
//! 2. A search-provider URL (query form-encoded)
//!
//! and a verdict on which of the two the user most likely meant.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use url::{form_urlencoded, Url};

pub const DEFAULT_SEARCH_TEMPLATE: &str = "https://duckduckgo.com/?q=%s";
pub const DEFAULT_SEARCH_LABEL: &str = "DuckDuckGo Search";

/// Schemes that form a complete URL without `://`
const OPAQUE_SCHEMES: &[&str] = &["about:", "data:", "file:", "mailto:", "view-source:"];

/// Result of classifying location-bar input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Where "Go to ..." navigates
    pub navigate_url: String,
    /// Search-provider URL for the raw input
    pub search_url: String,
    /// Display label of the search provider
    pub search_label: String,
    /// Input looks more like a URL than search terms
    pub is_probably_url: bool,
    /// The scheme of `navigate_url` was not typed by the user
    pub guessed_scheme: bool,
}

#[derive(Debug, Clone)]
pub struct InputClassifier {
    /// Search engine URL template (%s replaced with query)
    search_template: String,
    search_label: String,
}

struct Target {
    url: String,
    is_url: bool,
    guessed: bool,
}

impl InputClassifier {
    pub fn new() -> Self {
        Self {
            search_template: DEFAULT_SEARCH_TEMPLATE.to_string(),
            search_label: DEFAULT_SEARCH_LABEL.to_string(),
        }
    }

    pub fn with_search_engine(template: String, label: String) -> Self {
        Self {
            search_template: template,
            search_label: label,
        }
    }

    pub fn set_search_engine(&mut self, template: String) {
        self.search_template = template;
    }

    pub fn set_search_label(&mut self, label: String) {
        self.search_label = label;
    }

    pub fn search_template(&self) -> &str {
        &self.search_template
    }

    pub fn search_label(&self) -> &str {
        &self.search_label
    }

    /// Classify raw input. Total: any string produces a classification.
    pub fn classify(&self, input: &str) -> Classification {
        let text = input.trim();
        let target = self.navigation_target(text);

        Classification {
            navigate_url: target.url,
            search_url: self.build_search_url(text),
            search_label: self.search_label.clone(),
            is_probably_url: target.is_url,
            guessed_scheme: target.guessed,
        }
    }

    fn navigation_target(&self, text: &str) -> Target {
        if text.is_empty() {
            return Target {
                url: "about:blank".to_string(),
                is_url: false,
                guessed: false,
            };
        }

        // Free text still gets a (guessed) navigation target
        let fallback = Target {
            url: format!("https://{}", text),
            is_url: false,
            guessed: true,
        };

        if text.contains(char::is_whitespace) {
            return fallback;
        }

        if Self::has_explicit_scheme(text) {
            return Target {
                url: text.to_string(),
                is_url: true,
                guessed: false,
            };
        }

        let (host, rest) = Self::split_host_and_rest(text);

        if Self::is_localhost(host) {
            return Target {
                url: format!("http://{}", text),
                is_url: true,
                guessed: false,
            };
        }

        if let Some(ip) = Self::parse_ip_host(host) {
            let host = if ip.is_ipv6() && !host.starts_with('[') {
                format!("[{}]", host)
            } else {
                host.to_string()
            };
            let (scheme, guessed) = if ip.is_loopback() {
                ("http", false)
            } else {
                ("https", true)
            };
            return Target {
                url: format!("{}://{}{}", scheme, host, rest),
                is_url: true,
                guessed,
            };
        }

        if Self::looks_like_domain(host) {
            let with_https = format!("https://{}", text);
            if Url::parse(&with_https).is_ok() {
                return Target {
                    url: with_https,
                    is_url: true,
                    guessed: true,
                };
            }
        }

        fallback
    }

    fn has_explicit_scheme(text: &str) -> bool {
        if text.contains("://") {
            return true;
        }

        let lowered = text.to_ascii_lowercase();
        OPAQUE_SCHEMES
            .iter()
            .any(|scheme| lowered.starts_with(scheme))
    }

    fn is_localhost(host: &str) -> bool {
        let name = host.split(':').next().unwrap_or(host);
        name.eq_ignore_ascii_case("localhost")
    }

    /// Host with a dot-separated alphabetic TLD, port allowed
    fn looks_like_domain(host: &str) -> bool {
        let name = host.split(':').next().unwrap_or(host);
        match name.rsplit_once('.') {
            Some((labels, tld)) => {
                !labels.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
            }
            None => false,
        }
    }

    fn parse_ip_host(host: &str) -> Option<IpAddr> {
        let host = host.trim();
        if host.is_empty() {
            return None;
        }

        let host = if host.starts_with('[') {
            host.strip_prefix('[')
                .and_then(|s| s.split(']').next())
                .unwrap_or(host)
        } else if host.matches(':').count() == 1 {
            host.split(':').next().unwrap_or(host)
        } else {
            host
        };

        host.parse().ok()
    }

    fn split_host_and_rest(input: &str) -> (&str, &str) {
        let cut = input
            .find(|c| matches!(c, '/' | '?' | '#'))
            .unwrap_or(input.len());
        input.split_at(cut)
    }

    /// Build search URL from query
    fn build_search_url(&self, query: &str) -> String {
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        self.search_template.replace("%s", &encoded)
    }
}

impl Default for InputClassifier {
    fn default() -> Self {
        Self::new()
    }
}
