//! Site adapter trait, source classification, and the adapter registry.
//!
//! Each supported site gets one concrete adapter. The orchestrator classifies
//! a source string into a [`SourceKind`] and asks the registry for the
//! matching adapter; [`SourceKind::Generic`] is the unconditional fallback.

mod generic;
mod interviewing_io;
mod listing;
mod nil_mamano;
mod pdf;
mod quill;
mod substack;

use std::fmt;

use async_trait::async_trait;
use url::Url;

use gleaner_shared::{GleanerError, KnowledgeItem, Result, ScrapeConfig};

use crate::fetch::Fetcher;

pub use generic::GenericAdapter;
pub use interviewing_io::InterviewingIoAdapter;
pub use nil_mamano::NilMamanoAdapter;
pub use pdf::{CHAPTER_MARKER, Chapter, MAX_CHAPTERS, PdfAdapter, segment_chapters};
pub use quill::QuillAdapter;
pub use substack::SubstackAdapter;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Which adapter handles a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    InterviewingIo,
    NilMamano,
    Quill,
    Pdf,
    Substack,
    Generic,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InterviewingIo => "interviewing_io",
            Self::NilMamano => "nil_mamano",
            Self::Quill => "quill",
            Self::Pdf => "pdf",
            Self::Substack => "substack",
            Self::Generic => "generic",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Classify a source by pattern. First match wins:
/// known domains, then a `.pdf` suffix, then `substack`, then generic.
pub fn classify(source: &str) -> SourceKind {
    if source.contains("interviewing.io") {
        SourceKind::InterviewingIo
    } else if source.contains("nilmamano.com") {
        SourceKind::NilMamano
    } else if source.contains("quill.co") {
        SourceKind::Quill
    } else if source.to_ascii_lowercase().ends_with(".pdf") {
        SourceKind::Pdf
    } else if source.contains("substack") {
        SourceKind::Substack
    } else {
        SourceKind::Generic
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A site-specific extraction strategy.
///
/// `scrape` enumerates the documents behind `source` and extracts one item
/// per document, skipping documents that fail individually. An `Err` means
/// the whole source produced nothing (listing page unreachable, PDF
/// undecodable, unusable source string).
#[async_trait]
pub trait SiteAdapter: Send + Sync {
    fn kind(&self) -> SourceKind;

    async fn scrape(&self, source: &str, team_id: &str) -> Result<Vec<KnowledgeItem>>;

    /// Adapter name for tracing.
    fn name(&self) -> &str {
        self.kind().name()
    }
}

/// Parse an absolute URL.
pub(crate) fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| GleanerError::parse(format!("invalid URL '{raw}': {e}")))
}

/// Resolve an absolute path such as `/blog` against a site origin.
pub(crate) fn join_origin(origin: &str, path: &str) -> Result<Url> {
    parse_url(origin)?
        .join(path)
        .map_err(|e| GleanerError::validation(format!("cannot join '{path}' onto '{origin}': {e}")))
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Holds one adapter per [`SourceKind`].
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn SiteAdapter>>,
}

impl AdapterRegistry {
    /// Create a registry with all built-in adapters.
    ///
    /// The Quill and PDF adapters share the connection pool but skip the
    /// inter-request delay.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let throttled = Fetcher::new(config)?;
        let unthrottled = throttled.unthrottled();

        Ok(Self::from_adapters(vec![
            Box::new(InterviewingIoAdapter::new(throttled.clone())),
            Box::new(NilMamanoAdapter::new(throttled.clone())),
            Box::new(QuillAdapter::new(unthrottled.clone())),
            Box::new(PdfAdapter::new(unthrottled, config.book_author.clone())),
            Box::new(SubstackAdapter::new(throttled.clone())),
            Box::new(GenericAdapter::new(throttled)),
        ]))
    }

    /// Build a registry from explicit adapters (used to point adapters at
    /// test servers).
    pub fn from_adapters(adapters: Vec<Box<dyn SiteAdapter>>) -> Self {
        Self { adapters }
    }

    /// The adapter registered for `kind`, if any.
    pub fn adapter_for(&self, kind: SourceKind) -> Option<&dyn SiteAdapter> {
        self.adapters
            .iter()
            .find(|a| a.kind() == kind)
            .map(|a| a.as_ref())
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
