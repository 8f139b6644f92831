//! Nil Mamano's data-structures-and-algorithms blog.

use async_trait::async_trait;
use tracing::instrument;

use gleaner_markdown::{BodyFormat, Traversal};
use gleaner_shared::{ContentType, KnowledgeItem, Result};

use super::listing::{AuthorSource, DocumentProfile, scrape_listing};
use super::{SiteAdapter, SourceKind, join_origin};
use crate::fetch::Fetcher;
use crate::fields::{TITLE_RULES, UNTITLED};
use crate::links::{LinkOrder, LinkPattern};

const DEFAULT_ORIGIN: &str = "https://nilmamano.com";
const LISTING_PATH: &str = "/blog/category/dsa";

const POST_LINKS: LinkPattern = LinkPattern {
    contains_any: &["/blog/"],
    except: &["/blog/"],
};

const POST: DocumentProfile = DocumentProfile {
    title_rules: TITLE_RULES,
    untitled: UNTITLED,
    body_selectors: &["article", ".post-content"],
    format: BodyFormat::Structured(Traversal::Descendants),
    author: AuthorSource::Fixed("Nil Mamano"),
    content_type: ContentType::Blog,
};

/// Adapter for the DSA category of nilmamano.com.
///
/// The source string only selects the adapter; the category listing is
/// always the one scraped.
pub struct NilMamanoAdapter {
    fetcher: Fetcher,
    origin: String,
}

impl NilMamanoAdapter {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}

#[async_trait]
impl SiteAdapter for NilMamanoAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::NilMamano
    }

    #[instrument(skip_all, fields(source = %source))]
    async fn scrape(&self, source: &str, team_id: &str) -> Result<Vec<KnowledgeItem>> {
        let listing_url = join_origin(&self.origin, LISTING_PATH)?;
        scrape_listing(
            &self.fetcher,
            &listing_url,
            &POST_LINKS,
            LinkOrder::FirstSeen,
            &POST,
            team_id,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_shared::ScrapeConfig;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn scrapes_dsa_category() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LISTING_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<nav><a href="/blog/">Blog</a></nav>
                   <a href="/blog/heaps">Heaps</a>
                   <a href="/about">About</a>"#,
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/blog/heaps"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><h1>Heaps</h1><article>
                     <p>Use <code>heapq</code>.</p>
                     <pre><code>heapq.heappush(h, x)</code></pre>
                   </article></body></html>"#,
            ))
            .mount(&server)
            .await;

        let config = ScrapeConfig {
            request_delay: Duration::ZERO,
            ..ScrapeConfig::default()
        };
        let adapter = NilMamanoAdapter::new(Fetcher::new(&config).unwrap()).with_origin(server.uri());
        let items = adapter
            .scrape("https://nilmamano.com/blog/category/dsa", "team")
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        let post = &items[0];
        assert_eq!(post.title, "Heaps");
        assert_eq!(post.author, "Nil Mamano");
        assert_eq!(post.content_type, ContentType::Blog);
        assert!(post.content.starts_with("Use heapq."), "{}", post.content);
        assert!(post.content.contains("`heapq`"));
        assert!(post.content.contains("``` heapq.heappush(h, x) ```"));
        assert!(!post.content.contains("`heapq.heappush(h, x)`"));
    }
}
