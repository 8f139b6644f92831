//! Core domain types for Gleaner knowledge bases.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ContentType
// ---------------------------------------------------------------------------

/// Kind of content a knowledge item was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Book,
    Other,
}

impl ContentType {
    /// Wire name of the tag (`blog`, `book`, `other`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Book => "book",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// KnowledgeItem
// ---------------------------------------------------------------------------

/// One normalized unit of extracted content (article, chapter, guide).
///
/// Items are plain values: two items with the same fields are the same item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Display title (never empty; adapters substitute a placeholder).
    pub title: String,
    /// Normalized body text. Empty when extraction recovered nothing.
    pub content: String,
    /// Content tag.
    pub content_type: ContentType,
    /// Tenant the scrape was requested for.
    pub team_id: String,
    /// Origin URL for web-derived items, `None` for local files.
    pub source_url: Option<String>,
    /// Best-effort author, empty when unknown.
    #[serde(default)]
    pub author: String,
    /// Reserved.
    #[serde(default)]
    pub user_id: String,
}

impl KnowledgeItem {
    /// Build an item for `team_id` with an empty author and user id.
    pub fn new(
        team_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            content_type,
            team_id: team_id.into(),
            source_url: None,
            author: String::new(),
            user_id: String::new(),
        }
    }

    /// Set the origin URL.
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }
}

// ---------------------------------------------------------------------------
// KnowledgeBase
// ---------------------------------------------------------------------------

/// The full result of one scrape request: a tenant id plus its items, in
/// source order then discovery order.
///
/// Deserialized knowledge bases go through [`KnowledgeBase::extend`], so
/// foreign-team items in the input are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KnowledgeBaseRecord")]
pub struct KnowledgeBase {
    team_id: String,
    items: Vec<KnowledgeItem>,
}

/// Wire shape of a [`KnowledgeBase`] before the tenant check.
#[derive(Deserialize)]
struct KnowledgeBaseRecord {
    team_id: String,
    #[serde(default)]
    items: Vec<KnowledgeItem>,
}

impl From<KnowledgeBaseRecord> for KnowledgeBase {
    fn from(record: KnowledgeBaseRecord) -> Self {
        let mut kb = Self::new(record.team_id);
        kb.extend(record.items);
        kb
    }
}

impl KnowledgeBase {
    /// Start an empty knowledge base for `team_id`.
    pub fn new(team_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            items: Vec::new(),
        }
    }

    /// Tenant identifier.
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[KnowledgeItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a batch of items produced for this tenant.
    ///
    /// Items tagged with another tenant are dropped: every item in a knowledge
    /// base carries the knowledge base's own `team_id`.
    pub fn extend(&mut self, items: impl IntoIterator<Item = KnowledgeItem>) {
        for item in items {
            if item.team_id != self.team_id {
                tracing::warn!(
                    expected = %self.team_id,
                    found = %item.team_id,
                    title = %item.title,
                    "dropping item tagged with a different team"
                );
                continue;
            }
            self.items.push(item);
        }
    }

    /// Consume the knowledge base, returning its items.
    pub fn into_items(self) -> Vec<KnowledgeItem> {
        self.items
    }
}
