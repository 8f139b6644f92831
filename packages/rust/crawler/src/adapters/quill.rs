//! The Quill company blog.
//!
//! Fetched without the inter-request delay. Post links are kept as a set, so
//! posts come back in URL order rather than listing order.

use async_trait::async_trait;
use tracing::instrument;

use gleaner_markdown::BodyFormat;
use gleaner_shared::{ContentType, KnowledgeItem, Result};

use super::listing::{AuthorSource, DocumentProfile, scrape_listing};
use super::{SiteAdapter, SourceKind, join_origin};
use crate::fetch::Fetcher;
use crate::fields::{TITLE_RULES, UNTITLED};
use crate::links::{LinkOrder, LinkPattern};

const DEFAULT_ORIGIN: &str = "https://quill.co";

const POST_LINKS: LinkPattern = LinkPattern {
    contains_any: &["/blog/"],
    except: &["/blog/"],
};

const POST: DocumentProfile = DocumentProfile {
    title_rules: TITLE_RULES,
    untitled: UNTITLED,
    body_selectors: &["article", "main"],
    format: BodyFormat::Plain,
    author: AuthorSource::Fixed("Quill Team"),
    content_type: ContentType::Blog,
};

pub struct QuillAdapter {
    fetcher: Fetcher,
    origin: String,
}

impl QuillAdapter {
    /// `fetcher` is expected to be unthrottled.
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
impl SiteAdapter for QuillAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Quill
    }

    #[instrument(skip_all, fields(source = %source))]
    async fn scrape(&self, source: &str, team_id: &str) -> Result<Vec<KnowledgeItem>> {
        let listing_url = join_origin(&self.origin, "/blog")?;
        scrape_listing(
            &self.fetcher,
            &listing_url,
            &POST_LINKS,
            LinkOrder::Sorted,
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
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn page(server: &MockServer, route: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn posts_sorted_with_plain_text_bodies() {
        let server = MockServer::start().await;
        page(
            &server,
            "/blog",
            r#"<a href="/blog/">Index</a>
               <a href="/blog/zebra">Zebra</a>
               <a href="/blog/apple">Apple</a>
               <a href="/blog/zebra">Zebra again</a>"#,
        )
        .await;
        page(
            &server,
            "/blog/apple",
            "<html><body><h1>Apple</h1><article><h2>Sub</h2><p>Crisp\n  text</p></article></body></html>",
        )
        .await;
        page(
            &server,
            "/blog/zebra",
            "<html><head><title>Zebra</title></head><body><main><p>Stripes</p></main></body></html>",
        )
        .await;

        let fetcher = Fetcher::new(&ScrapeConfig::default()).unwrap().unthrottled();
        let adapter = QuillAdapter::new(fetcher).with_origin(server.uri());
        let items = adapter.scrape("https://quill.co/blog", "team").await.unwrap();

        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Apple", "Zebra"]);
        assert_eq!(items[0].content, "SubCrisp text");
        assert_eq!(items[1].content, "Stripes");
        assert!(items.iter().all(|i| i.author == "Quill Team"));
    }
}
