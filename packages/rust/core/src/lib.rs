//! Scrape orchestration for Gleaner.
//!
//! Classifies each source, routes it to its site adapter, and aggregates the
//! results into one [`KnowledgeBase`](gleaner_shared::KnowledgeBase).

pub mod pipeline;

pub use gleaner_crawler::SourceKind;
pub use pipeline::{Orchestrator, ScrapeObserver, SilentObserver};
