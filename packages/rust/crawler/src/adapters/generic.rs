//! Fallback adapter for sources no other adapter claims.
//!
//! Fetches the source page and emits a single best-effort item.

use async_trait::async_trait;
use tracing::instrument;

use gleaner_markdown::BodyFormat;
use gleaner_shared::{ContentType, KnowledgeItem, Result};

use super::listing::{AuthorSource, DocumentProfile, extract_document};
use super::{SiteAdapter, SourceKind, parse_url};
use crate::fetch::Fetcher;
use crate::fields::{AUTHOR_RULES, TITLE_RULES};

const PAGE: DocumentProfile = DocumentProfile {
    title_rules: TITLE_RULES,
    untitled: "Unknown Content",
    body_selectors: &["main", "article", "body"],
    format: BodyFormat::Plain,
    author: AuthorSource::Rules(AUTHOR_RULES),
    content_type: ContentType::Other,
};

/// Always-available fallback adapter.
pub struct GenericAdapter {
    fetcher: Fetcher,
}

impl GenericAdapter {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl SiteAdapter for GenericAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Generic
    }

    #[instrument(skip_all, fields(source = %source))]
    async fn scrape(&self, source: &str, team_id: &str) -> Result<Vec<KnowledgeItem>> {
        let url = parse_url(source)?;
        let html = self.fetcher.get_text(&url).await?;
        Ok(vec![extract_document(&html, &url, &PAGE, team_id)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_shared::{GleanerError, ScrapeConfig};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter() -> GenericAdapter {
        let config = ScrapeConfig {
            request_delay: Duration::ZERO,
            ..ScrapeConfig::default()
        };
        GenericAdapter::new(Fetcher::new(&config).unwrap())
    }

    #[tokio::test]
    async fn single_best_effort_item() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/article"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><head><title>An Article</title></head><body>
                     <nav>menu</nav>
                     <main><h2>Section</h2><p>Body text.</p></main>
                     <p class="byline">Sam</p>
                   </body></html>"#,
            ))
            .mount(&server)
            .await;

        let source = format!("{}/article", server.uri());
        let items = adapter().scrape(&source, "team").await.unwrap();

        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "An Article");
        assert_eq!(item.content, "SectionBody text.");
        assert_eq!(item.author, "Sam");
        assert_eq!(item.content_type, ContentType::Other);
        assert_eq!(item.source_url.as_deref(), Some(source.as_str()));
    }

    #[tokio::test]
    async fn untitled_page_gets_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>just text</p>"))
            .mount(&server)
            .await;

        let items = adapter().scrape(&server.uri(), "team").await.unwrap();
        assert_eq!(items[0].title, "Unknown Content");
        assert_eq!(items[0].content, "just text");
    }

    #[tokio::test]
    async fn failed_fetch_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = adapter().scrape(&server.uri(), "team").await.unwrap_err();
        assert!(matches!(err, GleanerError::Network(_)));
    }

    #[tokio::test]
    async fn relative_source_is_rejected() {
        let err = adapter().scrape("notes/today", "team").await.unwrap_err();
        assert!(matches!(err, GleanerError::Parse { .. }));
    }
}
