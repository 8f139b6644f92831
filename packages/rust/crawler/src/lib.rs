//! Fetching, link discovery, field extraction, and site adapters.
//!
//! This crate provides:
//! - [`fetch`]: the sequential HTTP session (timeout plus optional delay)
//! - [`links`]: document-link discovery on listing pages
//! - [`fields`]: title and author fallback chains
//! - [`adapters`]: one [`SiteAdapter`] per supported site, source
//!   classification, and the [`AdapterRegistry`]

pub mod adapters;
pub mod fetch;
pub mod fields;
pub mod links;

pub use adapters::{
    AdapterRegistry, GenericAdapter, InterviewingIoAdapter, NilMamanoAdapter, PdfAdapter,
    QuillAdapter, SiteAdapter, SourceKind, SubstackAdapter, classify, segment_chapters,
};
pub use fetch::Fetcher;
pub use fields::{AUTHOR_RULES, FieldRule, TITLE_RULES, extract_author, extract_title};
pub use links::{LinkOrder, LinkPattern, LinkSet, discover_links};

#[cfg(test)]
mod tests {
    use super::*;
    use gleaner_shared::{ContentType, ScrapeConfig};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn load_fixture(name: &str) -> String {
        let path = format!("{}/../../../fixtures/html/{name}", env!("CARGO_MANIFEST_DIR"));
        std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("missing fixture: {path}"))
    }

    fn fetcher() -> Fetcher {
        let config = ScrapeConfig {
            request_delay: Duration::ZERO,
            ..ScrapeConfig::default()
        };
        Fetcher::new(&config).unwrap()
    }

    async fn serve(server: &MockServer, route: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    // -----------------------------------------------------------------------
    // Fixture-driven extraction
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn blog_post_fixture() {
        let server = MockServer::start().await;
        serve(&server, "/blog", r#"<a href="/blog/system-design">Post</a>"#.into()).await;
        serve(&server, "/blog/system-design", load_fixture("blog_post.html")).await;

        let items = InterviewingIoAdapter::new(fetcher())
            .with_origin(server.uri())
            .scrape("https://interviewing.io/blog", "aline123")
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        let post = &items[0];
        assert_eq!(post.title, "How to prepare for system design interviews");
        assert_eq!(post.author, "Aline Lerner");
        assert_eq!(post.content_type, ContentType::Blog);

        let content = &post.content;
        assert!(content.starts_with("# How to prepare for system design interviews"));
        assert!(content.contains("open-ended. Here is how"), "{content}");
        assert!(content.contains("## Start with requirements"));
        assert!(content.contains("- Functional requirements - Non-functional requirements"));
        assert!(content.contains("### Estimate scale"));
        assert!(content.contains("`QPS`"));
        assert!(content.contains("``` reads_per_second = daily_active_users * 10 / 86400 ```"));
        assert!(!content.contains("Copyright"));
        assert!(!content.contains("analytics"));
        assert!(!content.contains('\u{200B}'));
    }

    #[tokio::test]
    async fn company_guide_fixture() {
        let server = MockServer::start().await;
        serve(&server, "/topics", r#"<a href="/companies/acme">Acme</a>"#.into()).await;
        serve(&server, "/companies/acme", load_fixture("company_guide.html")).await;

        let items = InterviewingIoAdapter::new(fetcher())
            .with_origin(server.uri())
            .scrape("https://interviewing.io/topics#companies", "aline123")
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Acme's interview process");
        assert_eq!(items[0].author, "interviewing.io");
        assert_eq!(
            items[0].content,
            "# Acme's interview process Acme runs four rounds. ## Rounds \
             - Recruiter call - Technical phone screen - Onsite coding - System design"
        );
    }

    #[tokio::test]
    async fn substack_post_fixture() {
        let server = MockServer::start().await;
        serve(&server, "/archive", r#"<a href="/p/dp">DP</a>"#.into()).await;
        serve(&server, "/p/dp", load_fixture("substack_post.html")).await;

        let source = format!("{}/archive", server.uri());
        let items = SubstackAdapter::new(fetcher())
            .scrape(&source, "aline123")
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        let post = &items[0];
        assert_eq!(post.title, "Dynamic programming, gently");
        assert_eq!(post.author, "Shrey");
        assert_eq!(
            post.content,
            "Start from the recurrence. ### Memoize - Cache `f(n)` results ``` memo = {} ```"
        );
        assert!(!post.content.contains("Subscribe"));
    }

    #[tokio::test]
    async fn generic_fixture_falls_back_to_body() {
        let server = MockServer::start().await;
        serve(&server, "/about", load_fixture("generic.html")).await;

        let source = format!("{}/about", server.uri());
        let items = GenericAdapter::new(fetcher())
            .scrape(&source, "aline123")
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "About Our Company");
        assert_eq!(items[0].content, "Home We build tools. Since 2019.");
        assert_eq!(items[0].author, "");
        assert_eq!(items[0].content_type, ContentType::Other);
    }

    // -----------------------------------------------------------------------
    // Classification + registry
    // -----------------------------------------------------------------------

    #[test]
    fn registry_routes_classified_sources() {
        let registry = AdapterRegistry::new(&ScrapeConfig::default()).unwrap();
        let cases = [
            ("https://interviewing.io/blog", "interviewing_io"),
            ("https://nilmamano.com/blog/category/dsa", "nil_mamano"),
            ("https://quill.co/blog", "quill"),
            ("/uploads/book.pdf", "pdf"),
            ("https://shreycation.substack.com", "substack"),
            ("https://example.com/post", "generic"),
        ];
        for (source, expected) in cases {
            let adapter = registry.adapter_for(classify(source)).unwrap();
            assert_eq!(adapter.name(), expected, "{source}");
        }
    }
}
