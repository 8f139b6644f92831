//! Listing-page scraping shared by the HTML adapters.
//!
//! Parsing happens in synchronous helpers so that no `scraper::Html` value
//! lives across an `.await`.

use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

use gleaner_markdown::{BodyFormat, document_text, render};
use gleaner_shared::{ContentType, KnowledgeItem, Result};

use crate::fetch::Fetcher;
use crate::fields::{FieldRule, extract_author, extract_title};
use crate::links::{LinkOrder, LinkPattern, discover_links};

/// Where an item's `author` comes from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AuthorSource {
    Fixed(&'static str),
    Rules(&'static [FieldRule]),
}

/// Everything an adapter varies when turning one document page into an item.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DocumentProfile {
    pub title_rules: &'static [FieldRule],
    pub untitled: &'static str,
    pub body_selectors: &'static [&'static str],
    pub format: BodyFormat,
    pub author: AuthorSource,
    pub content_type: ContentType,
}

/// Build a knowledge item from a fetched document page.
pub(crate) fn extract_document(
    html: &str,
    url: &Url,
    profile: &DocumentProfile,
    team_id: &str,
) -> KnowledgeItem {
    let doc = Html::parse_document(html);

    let title = extract_title(&doc, profile.title_rules, profile.untitled);
    let content = extract_body(&doc, profile.body_selectors, profile.format);
    let author = match profile.author {
        AuthorSource::Fixed(name) => name.to_string(),
        AuthorSource::Rules(rules) => extract_author(&doc, rules),
    };

    KnowledgeItem::new(team_id, title, content, profile.content_type)
        .with_source_url(url.as_str())
        .with_author(author)
}

/// Render the first container matched by `selectors`; if none matches or the
/// container renders empty, fall back to the whole document's text.
pub(crate) fn extract_body(doc: &Html, selectors: &[&str], format: BodyFormat) -> String {
    for raw in selectors {
        let Ok(sel) = Selector::parse(raw) else {
            continue;
        };
        if let Some(container) = doc.select(&sel).next() {
            let content = render(container, format);
            if !content.is_empty() {
                return content;
            }
            debug!(selector = *raw, "container rendered empty");
            break;
        }
    }
    document_text(doc)
}

/// Parse a listing page and return its document links.
pub(crate) fn links_in(
    body: &str,
    page_url: &Url,
    pattern: &LinkPattern,
    order: LinkOrder,
) -> Vec<Url> {
    let doc = Html::parse_document(body);
    discover_links(&doc, page_url, pattern, order)
}

/// Fetch a listing page, discover its document links, then scrape each one.
///
/// Fails only when the listing page itself cannot be fetched.
pub(crate) async fn scrape_listing(
    fetcher: &Fetcher,
    listing_url: &Url,
    pattern: &LinkPattern,
    order: LinkOrder,
    profile: &DocumentProfile,
    team_id: &str,
) -> Result<Vec<KnowledgeItem>> {
    let body = fetcher.get_text(listing_url).await?;
    let links = links_in(&body, listing_url, pattern, order);
    info!(listing = %listing_url, count = links.len(), "found documents to scrape");

    Ok(scrape_documents(fetcher, &links, profile, team_id).await)
}

/// Scrape documents one at a time, skipping any that fail to fetch.
pub(crate) async fn scrape_documents(
    fetcher: &Fetcher,
    urls: &[Url],
    profile: &DocumentProfile,
    team_id: &str,
) -> Vec<KnowledgeItem> {
    let mut items = Vec::with_capacity(urls.len());
    for url in urls {
        match fetcher.get_text(url).await {
            Ok(html) => items.push(extract_document(&html, url, profile, team_id)),
            Err(e) => warn!(%url, error = %e, "skipping document"),
        }
    }
    items
}
