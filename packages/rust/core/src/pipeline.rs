//! End-to-end scrape: sources → classify → adapter → knowledge base.
//!
//! Sources are processed strictly one after another. A failing source is
//! logged, reported to the observer, and contributes zero items; the
//! knowledge base is always returned.

use std::time::Instant;

use tracing::{info, instrument, warn};

use gleaner_crawler::{AdapterRegistry, SiteAdapter, SourceKind, classify};
use gleaner_shared::{GleanerError, KnowledgeBase, KnowledgeItem, Result, ScrapeConfig};

/// Observer for scrape progress, owned by the caller.
pub trait ScrapeObserver: Send + Sync {
    /// A source is about to be scraped. `index` is 0-based.
    fn source_started(&self, source: &str, kind: SourceKind, index: usize, total: usize);
    /// A source finished and contributed `items` items.
    fn source_finished(&self, source: &str, items: usize);
    /// A source failed and contributed nothing.
    fn source_failed(&self, source: &str, error: &GleanerError);
    /// Every source has been processed.
    fn done(&self, kb: &KnowledgeBase);
}

/// No-op observer for headless/test usage.
pub struct SilentObserver;

impl ScrapeObserver for SilentObserver {
    fn source_started(&self, _source: &str, _kind: SourceKind, _index: usize, _total: usize) {}
    fn source_finished(&self, _source: &str, _items: usize) {}
    fn source_failed(&self, _source: &str, _error: &GleanerError) {}
    fn done(&self, _kb: &KnowledgeBase) {}
}

/// Routes sources to site adapters and aggregates their items.
pub struct Orchestrator {
    registry: AdapterRegistry,
}

impl Orchestrator {
    /// Orchestrator backed by every built-in adapter.
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        Ok(Self::from_registry(AdapterRegistry::new(config)?))
    }

    pub fn from_registry(registry: AdapterRegistry) -> Self {
        Self { registry }
    }

    /// Scrape every source in order into one knowledge base for `team_id`.
    #[instrument(skip_all, fields(team_id = %team_id, sources = sources.len()))]
    pub async fn scrape_all<S: AsRef<str>>(
        &self,
        sources: &[S],
        team_id: &str,
        observer: &dyn ScrapeObserver,
    ) -> KnowledgeBase {
        let start = Instant::now();
        let mut kb = KnowledgeBase::new(team_id);
        let total = sources.len();

        for (index, source) in sources.iter().enumerate() {
            let source = source.as_ref();
            let kind = classify(source);
            info!(source, %kind, "processing source");
            observer.source_started(source, kind, index, total);

            match self.scrape_one(source, kind, team_id).await {
                Ok(items) => {
                    info!(source, count = items.len(), "extracted items");
                    observer.source_finished(source, items.len());
                    kb.extend(items);
                }
                Err(e) => {
                    warn!(source, error = %e, "failed to process source");
                    observer.source_failed(source, &e);
                }
            }
        }

        info!(
            items = kb.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scrape complete"
        );
        observer.done(&kb);
        kb
    }

    async fn scrape_one(
        &self,
        source: &str,
        kind: SourceKind,
        team_id: &str,
    ) -> Result<Vec<KnowledgeItem>> {
        let adapter = self.adapter(kind)?;
        adapter.scrape(source, team_id).await
    }

    /// The adapter for `kind`, falling back to the generic one.
    fn adapter(&self, kind: SourceKind) -> Result<&dyn SiteAdapter> {
        self.registry
            .adapter_for(kind)
            .or_else(|| self.registry.adapter_for(SourceKind::Generic))
            .ok_or_else(|| GleanerError::config(format!("no adapter registered for {kind}")))
    }
}
