//! Tankobon - Manga Page to EPUB Conversion Library
//!
//! This crate turns a folder of numbered manga page images into a single EPUB book
//! with a chapter structure and table of contents. Chapters come either from the page
//! file names themselves (`CH01_001.jpg`, `VOL2_014.png`) or from a TOML book
//! configuration describing a nested chapter tree (volume → chapter → ...).
//!
//! # Getting Started
//!
//! ```rust,no_run
//! use tankobon::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> tankobon::error::Result<()> {
//!     // 1. Describe the book
//!     let metadata = EbookMetadata {
//!         title: "Chainsaw Man".to_string(),
//!         authors: vec!["Fujimoto Tatsuki".to_string()],
//!         ..Default::default()
//!     };
//!
//!     // 2. Configure the conversion
//!     let config = ConverterConfig::builder()
//!         .metadata(metadata)
//!         .source_path(PathBuf::from("./chainsaw_man"))
//!         .output_path(PathBuf::from("./Chainsaw Man.epub"))
//!         .build()?;
//!
//!     // Optional: inspect the chapter plan first
//!     let plan = config.plan().await?;
//!     println!("{} chapters, {} pages", plan.chapters.len(), plan.total_images());
//!
//!     // 3. Write the book
//!     config.convert(&mut SilentProgress).await?;
//!     Ok(())
//! }
//! ```
//!
//! Hierarchy-driven books are loaded with [`hierarchy::load_book_config`] and turned into
//! a conversion with [`ConverterConfig::from_book_config`].

pub mod chapters;
pub mod collector;
pub mod converter;
pub mod error;
pub mod generator;
pub mod hierarchy;
pub mod password;
pub mod path_utils;
pub mod progress;
pub mod toc;
pub mod types;

// Publicly expose the main `ConverterConfig` struct and its builder
pub use converter::ConverterConfig;
pub use converter::ConverterConfigBuilder;

// Re-export core types for direct access
pub use types::{
    BookPlan, Chapter, ChapterHierarchy, ChapterNode, ChapterSource, EbookMetadata, ImageOptions,
    ParsedImage, SortKey, TitleLabels, TocEntry,
};

/// Prelude module for convenient imports.
///
/// Brings the configuration, its builder, the core types and the progress sinks into
/// scope with a single `use tankobon::prelude::*;`.
pub mod prelude {
    pub use super::{
        BookPlan, Chapter, ChapterHierarchy, ChapterNode, ChapterSource, ConverterConfig,
        ConverterConfigBuilder, EbookMetadata, ImageOptions, TitleLabels, TocEntry, error,
        generator, types,
    };
    pub use crate::hierarchy::BookConfig;
    pub use crate::progress::{ProgressSink, SilentProgress, StderrProgress};
    pub use std::path::{Path, PathBuf};
}
