//! Substack newsletters.
//!
//! Post links are gathered from the archive page, the posts page, and the
//! source page itself, merged in first-seen order.

use async_trait::async_trait;
use scraper::Html;
use tracing::{info, instrument, warn};
use url::Url;

use gleaner_markdown::{BodyFormat, Traversal};
use gleaner_shared::{ContentType, KnowledgeItem, Result};

use super::listing::{AuthorSource, DocumentProfile, scrape_documents};
use super::{SiteAdapter, SourceKind, parse_url};
use crate::fetch::Fetcher;
use crate::fields::{FieldRule, UNTITLED};
use crate::links::{LinkOrder, LinkPattern, LinkSet};

const POST_LINKS: LinkPattern = LinkPattern {
    contains_any: &["/p/"],
    except: &[],
};

const TITLE_RULES: &[FieldRule] = &[FieldRule::new("h1"), FieldRule::new(".post-title")];
const AUTHOR_RULES: &[FieldRule] = &[FieldRule::new(".byline-name"), FieldRule::new(".author")];

const POST: DocumentProfile = DocumentProfile {
    title_rules: TITLE_RULES,
    untitled: UNTITLED,
    body_selectors: &[".available-content", ".post-content"],
    format: BodyFormat::Structured(Traversal::Flat),
    author: AuthorSource::Rules(AUTHOR_RULES),
    content_type: ContentType::Blog,
};

pub struct SubstackAdapter {
    fetcher: Fetcher,
}

impl SubstackAdapter {
    pub fn new(fetcher: Fetcher) -> Self {
        Self { fetcher }
    }

    /// Pages probed for post links, in order.
    fn probe_urls(source: &Url) -> Result<Vec<Url>> {
        let origin = source.origin().ascii_serialization();
        Ok(vec![
            parse_url(&format!("{origin}/archive"))?,
            parse_url(&format!("{origin}/posts"))?,
            source.clone(),
        ])
    }
}

#[async_trait]
impl SiteAdapter for SubstackAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Substack
    }

    #[instrument(skip_all, fields(source = %source))]
    async fn scrape(&self, source: &str, team_id: &str) -> Result<Vec<KnowledgeItem>> {
        let source_url = parse_url(source)?;

        let mut links = LinkSet::new(LinkOrder::FirstSeen);
        for probe in Self::probe_urls(&source_url)? {
            match self.fetcher.get_text(&probe).await {
                Ok(body) => collect_links(&mut links, &body, &probe),
                Err(e) => warn!(url = %probe, error = %e, "skipping listing probe"),
            }
        }

        let links = links.into_vec();
        info!(count = links.len(), "found newsletter posts to scrape");

        Ok(scrape_documents(&self.fetcher, &links, &POST, team_id).await)
    }
}

fn collect_links(links: &mut LinkSet, body: &str, page_url: &Url) {
    let doc = Html::parse_document(body);
    links.collect(&doc, page_url, &POST_LINKS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_shared::{GleanerError, ScrapeConfig};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn adapter() -> SubstackAdapter {
        let config = ScrapeConfig {
            request_delay: Duration::ZERO,
            ..ScrapeConfig::default()
        };
        SubstackAdapter::new(Fetcher::new(&config).unwrap())
    }

    async fn page(server: &MockServer, route: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    #[test]
    fn probes_archive_posts_then_source() {
        let source = Url::parse("https://letters.substack.com/p/welcome?utm=x").unwrap();
        let probes: Vec<String> = SubstackAdapter::probe_urls(&source)
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(
            probes,
            [
                "https://letters.substack.com/archive",
                "https://letters.substack.com/posts",
                "https://letters.substack.com/p/welcome?utm=x",
            ]
        );
    }

    #[tokio::test]
    async fn merges_probes_and_skips_failed_ones() {
        let server = MockServer::start().await;
        page(
            &server,
            "/archive",
            200,
            r#"<a href="/p/one">One</a><a href="/about">About</a><a href="/p/two">Two</a>"#,
        )
        .await;
        page(&server, "/posts", 404, "").await;
        page(
            &server,
            "/home",
            200,
            r#"<a href="/p/two">Two</a><a href="/p/gone">Gone</a>"#,
        )
        .await;
        page(
            &server,
            "/p/one",
            200,
            r#"<html><body>
                 <h1 class="post-title">One</h1>
                 <div class="byline-name">Shrey</div>
                 <div class="available-content">
                   <h3>Part</h3>
                   <ul><li><p>Point <code>x</code></p></li></ul>
                 </div>
               </body></html>"#,
        )
        .await;
        page(
            &server,
            "/p/two",
            200,
            r#"<html><body><div class="post-title">Two</div><span class="author">Guest</span>
               <div class="post-content"><p>Body</p></div></body></html>"#,
        )
        .await;
        page(&server, "/p/gone", 404, "").await;

        let source = format!("{}/home", server.uri());
        let items = adapter().scrape(&source, "team").await.unwrap();

        assert_eq!(items.len(), 2);

        assert_eq!(items[0].title, "One");
        assert_eq!(items[0].author, "Shrey");
        assert_eq!(items[0].content, "### Part - Point `x`");

        assert_eq!(items[1].title, "Two");
        assert_eq!(items[1].author, "Guest");
        assert_eq!(items[1].content, "Body");
    }

    #[tokio::test]
    async fn invalid_source_is_rejected() {
        let err = adapter().scrape("substack newsletter", "team").await.unwrap_err();
        assert!(matches!(err, GleanerError::Parse { .. }));
    }
}
