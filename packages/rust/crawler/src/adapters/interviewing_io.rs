//! interviewing.io: the blog, company guides, and interview guides.
//!
//! The source string selects one section; each section has its own listing
//! page, link pattern, and document profile.

use async_trait::async_trait;
use tracing::{info, instrument};

use gleaner_markdown::{BodyFormat, Traversal};
use gleaner_shared::{ContentType, KnowledgeItem, Result};

use super::listing::{AuthorSource, DocumentProfile, scrape_listing};
use super::{SiteAdapter, SourceKind, join_origin};
use crate::fetch::Fetcher;
use crate::fields::{AUTHOR_RULES, TITLE_RULES};
use crate::links::{LinkOrder, LinkPattern};

const DEFAULT_ORIGIN: &str = "https://interviewing.io";

const BLOG_LINKS: LinkPattern = LinkPattern {
    contains_any: &["/blog/"],
    except: &["/blog"],
};

const BLOG_POST: DocumentProfile = DocumentProfile {
    title_rules: TITLE_RULES,
    untitled: "Untitled",
    body_selectors: &[
        "article",
        ".post-content",
        ".content",
        ".entry-content",
        "main",
        ".blog-post",
    ],
    format: BodyFormat::Structured(Traversal::Descendants),
    author: AuthorSource::Rules(AUTHOR_RULES),
    content_type: ContentType::Blog,
};

const COMPANY_LINKS: LinkPattern = LinkPattern {
    contains_any: &["/companies/"],
    except: &[],
};

const GUIDE_LINKS: LinkPattern = LinkPattern {
    contains_any: &["/guides/", "/learn/"],
    except: &[],
};

const GUIDE_BODY: &[&str] = &["main", "article", ".content"];

const COMPANY_GUIDE: DocumentProfile = DocumentProfile {
    title_rules: TITLE_RULES,
    untitled: "Untitled Company Guide",
    body_selectors: GUIDE_BODY,
    format: BodyFormat::Structured(Traversal::Descendants),
    author: AuthorSource::Fixed("interviewing.io"),
    content_type: ContentType::Other,
};

const INTERVIEW_GUIDE: DocumentProfile = DocumentProfile {
    untitled: "Untitled Interview Guide",
    ..COMPANY_GUIDE
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Blog,
    CompanyGuides,
    InterviewGuides,
}

impl Section {
    fn detect(source: &str) -> Option<Self> {
        if source.contains("/blog") {
            Some(Self::Blog)
        } else if source.contains("/topics#companies") {
            Some(Self::CompanyGuides)
        } else if source.contains("/learn#interview-guides") {
            Some(Self::InterviewGuides)
        } else {
            None
        }
    }

    fn listing_path(self) -> &'static str {
        match self {
            Self::Blog => "/blog",
            Self::CompanyGuides => "/topics",
            Self::InterviewGuides => "/learn",
        }
    }

    fn links(self) -> &'static LinkPattern {
        match self {
            Self::Blog => &BLOG_LINKS,
            Self::CompanyGuides => &COMPANY_LINKS,
            Self::InterviewGuides => &GUIDE_LINKS,
        }
    }

    fn profile(self) -> &'static DocumentProfile {
        match self {
            Self::Blog => &BLOG_POST,
            Self::CompanyGuides => &COMPANY_GUIDE,
            Self::InterviewGuides => &INTERVIEW_GUIDE,
        }
    }
}

/// Adapter for interviewing.io sources.
pub struct InterviewingIoAdapter {
    fetcher: Fetcher,
    origin: String,
}

impl InterviewingIoAdapter {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            fetcher,
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }

    /// Fetch listing pages from `origin` instead of the live site.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}

#[async_trait]
impl SiteAdapter for InterviewingIoAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::InterviewingIo
    }

    #[instrument(skip_all, fields(source = %source))]
    async fn scrape(&self, source: &str, team_id: &str) -> Result<Vec<KnowledgeItem>> {
        let Some(section) = Section::detect(source) else {
            info!("source matches no interviewing.io section");
            return Ok(Vec::new());
        };

        let listing_url = join_origin(&self.origin, section.listing_path())?;
        scrape_listing(
            &self.fetcher,
            &listing_url,
            section.links(),
            LinkOrder::FirstSeen,
            section.profile(),
            team_id,
        )
        .await
    }
}
