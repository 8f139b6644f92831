//! Document-link discovery on listing pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

static ANCHOR_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

/// Raw-href filter recognizing links to individual documents.
#[derive(Debug, Clone, Copy)]
pub struct LinkPattern {
    /// The href must contain at least one of these substrings.
    pub contains_any: &'static [&'static str],
    /// Hrefs exactly equal to one of these are rejected (usually the listing itself).
    pub except: &'static [&'static str],
}

impl LinkPattern {
    pub fn matches(&self, href: &str) -> bool {
        self.contains_any.iter().any(|needle| href.contains(needle))
            && !self.except.iter().any(|exact| href == *exact)
    }
}

/// Ordering of discovered links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOrder {
    /// Order of first appearance on the page(s).
    FirstSeen,
    /// Set semantics: discovery order is discarded, links come back sorted.
    Sorted,
}

/// Accumulates matching links from one or more listing pages, deduplicated
/// by exact absolute-URL string.
#[derive(Debug)]
pub struct LinkSet {
    order: LinkOrder,
    seen: HashSet<String>,
    links: Vec<Url>,
}

impl LinkSet {
    pub fn new(order: LinkOrder) -> Self {
        Self {
            order,
            seen: HashSet::new(),
            links: Vec::new(),
        }
    }

    /// Add every anchor on `doc` whose href matches `pattern`, resolved
    /// against `page_url`. Hrefs that do not resolve are ignored.
    pub fn collect(&mut self, doc: &Html, page_url: &Url, pattern: &LinkPattern) {
        for el in doc.select(&ANCHOR_SEL) {
            let Some(href) = el.value().attr("href") else {
                continue;
            };
            if !pattern.matches(href) {
                continue;
            }
            let Ok(resolved) = page_url.join(href) else {
                continue;
            };
            if self.seen.insert(resolved.as_str().to_string()) {
                self.links.push(resolved);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn into_vec(mut self) -> Vec<Url> {
        if self.order == LinkOrder::Sorted {
            self.links.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        }
        self.links
    }
}

/// Discover document links on a single listing page.
pub fn discover_links(
    doc: &Html,
    page_url: &Url,
    pattern: &LinkPattern,
    order: LinkOrder,
) -> Vec<Url> {
    let mut set = LinkSet::new(order);
    set.collect(doc, page_url, pattern);
    set.into_vec()
}
