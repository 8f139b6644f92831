//! Shared types, error model, and configuration for Gleaner.
//!
//! This crate is the foundation depended on by all other Gleaner crates.
//! It provides:
//! - [`GleanerError`]: the unified error type
//! - Domain types ([`KnowledgeItem`], [`KnowledgeBase`], [`ContentType`])
//! - Configuration ([`AppConfig`], [`ScrapeConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, ScrapeConfig, ScrapeSection, config_dir, config_file_path,
    init_config, load_config, load_config_from,
};
pub use error::{GleanerError, Result};
pub use types::{ContentType, KnowledgeBase, KnowledgeItem};
