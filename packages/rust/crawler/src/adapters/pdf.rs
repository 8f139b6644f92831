//! PDF books, split into chapters.
//!
//! Chapters are found with a page heuristic: a page whose text contains
//! [`CHAPTER_MARKER`] starts a new chapter. Pages without the marker are
//! appended to the current one. At most [`MAX_CHAPTERS`] chapters are
//! numbered; once the counter reaches the cap, every remaining page is
//! folded into the last chapter.

use async_trait::async_trait;
use lopdf::Document;
use tracing::{debug, info, instrument};

use gleaner_markdown::clean_text;
use gleaner_shared::{ContentType, GleanerError, KnowledgeItem, Result};

use super::{SiteAdapter, SourceKind, parse_url};
use crate::fetch::Fetcher;

/// Highest chapter number ever emitted.
pub const MAX_CHAPTERS: usize = 8;

/// Literal token that marks a chapter-opening page.
pub const CHAPTER_MARKER: &str = "Chapter";

/// One segmented chapter: its 1-based number and raw accumulated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub number: usize,
    pub text: String,
}

impl Chapter {
    pub fn title(&self) -> String {
        format!("Chapter {}", self.number)
    }
}

/// Segment page texts into chapters.
///
/// A marker page closes the current chapter (emitted only when non-empty)
/// and seeds the next one with its own text. Other pages are appended with
/// no separator. Marker pages are only honored while the counter is below
/// [`MAX_CHAPTERS`], so chapter 1 is skipped when the first page carries the
/// marker.
pub fn segment_chapters<I, S>(pages: I) -> Vec<Chapter>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut chapters = Vec::new();
    let mut current = 1;
    let mut buffer = String::new();

    for page in pages {
        if current > MAX_CHAPTERS {
            break;
        }
        let text = page.as_ref();
        if text.contains(CHAPTER_MARKER) && current < MAX_CHAPTERS {
            if !buffer.is_empty() {
                chapters.push(Chapter {
                    number: current,
                    text: std::mem::take(&mut buffer),
                });
            }
            current += 1;
            buffer = text.to_string();
        } else {
            buffer.push_str(text);
        }
    }

    if !buffer.is_empty() && current <= MAX_CHAPTERS {
        chapters.push(Chapter {
            number: current,
            text: buffer,
        });
    }

    chapters
}

/// Extract the text of every page, in page order.
///
/// A page whose text cannot be extracted contributes an empty string.
fn page_texts(bytes: &[u8]) -> Result<Vec<String>> {
    let doc = Document::load_mem(bytes).map_err(|e| GleanerError::Pdf(e.to_string()))?;

    let texts = doc
        .get_pages()
        .into_keys()
        .map(|number| {
            doc.extract_text(&[number]).unwrap_or_else(|e| {
                debug!(page = number, error = %e, "page text unavailable");
                String::new()
            })
        })
        .collect();
    Ok(texts)
}

/// Adapter for local or remote PDF documents.
pub struct PdfAdapter {
    fetcher: Fetcher,
    author: String,
}

impl PdfAdapter {
    /// `author` is recorded on every chapter.
    pub fn new(fetcher: Fetcher, author: impl Into<String>) -> Self {
        Self {
            fetcher,
            author: author.into(),
        }
    }

    async fn load(&self, source: &str) -> Result<Vec<u8>> {
        if is_remote(source) {
            let url = parse_url(source)?;
            self.fetcher.get_bytes(&url).await
        } else {
            tokio::fs::read(source)
                .await
                .map_err(|e| GleanerError::io(source, e))
        }
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http")
}

#[async_trait]
impl SiteAdapter for PdfAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Pdf
    }

    #[instrument(skip_all, fields(source = %source))]
    async fn scrape(&self, source: &str, team_id: &str) -> Result<Vec<KnowledgeItem>> {
        let bytes = self.load(source).await?;
        let pages = tokio::task::spawn_blocking(move || page_texts(&bytes))
            .await
            .map_err(|e| GleanerError::Pdf(format!("page extraction task failed: {e}")))??;

        let chapters = segment_chapters(&pages);
        info!(pages = pages.len(), chapters = chapters.len(), "segmented PDF");

        let items = chapters
            .into_iter()
            .map(|chapter| {
                let item = KnowledgeItem::new(
                    team_id,
                    chapter.title(),
                    clean_text(&chapter.text),
                    ContentType::Book,
                )
                .with_author(self.author.as_str());
                if is_remote(source) {
                    item.with_source_url(source)
                } else {
                    item
                }
            })
            .collect();
        Ok(items)
    }
}
