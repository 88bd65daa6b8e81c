//! Generator module provides the archive-writer seam and its EPUB implementation.
//!
//! The conversion pipeline hands a generator recompressed pages and planned chapters
//! in reading order; the generator owns the container format.

use crate::error::Result;
use crate::types::{Chapter, EbookMetadata, TocEntry};
use async_trait::async_trait;
use std::path::Path;

pub mod codec;
pub mod epub;

pub use codec::EncodedImage;

/// Common interface for book writers.
///
/// Calls arrive in this order: `set_metadata`, `set_cover`, then for every chapter its
/// pages via `add_page` followed by `add_chapter`, and finally `save`.
#[async_trait]
pub trait Generator {
    /// Creates a new generator writing to `output_file`.
    ///
    /// Missing parent directories are created.
    fn new(output_file: &Path) -> Result<Self>
    where
        Self: Sized;

    /// Sets the book metadata (title, authors, language, ...).
    async fn set_metadata(&mut self, metadata: &EbookMetadata) -> Result<&mut Self>
    where
        Self: Sized;

    /// Sets the cover picture.
    async fn set_cover(&mut self, cover: &EncodedImage) -> Result<&mut Self>
    where
        Self: Sized;

    /// Embeds one recompressed page.
    async fn add_page(&mut self, page: &EncodedImage) -> Result<&mut Self>
    where
        Self: Sized;

    /// Adds the reading-order document for one chapter whose pages were already added.
    ///
    /// # Parameters
    /// * `chapter_index` - 0-based position of the chapter in reading order
    /// * `chapter` - The planned chapter
    /// * `toc_entry` - The top-level table-of-contents entry linking to this chapter, if any
    async fn add_chapter(
        &mut self,
        chapter_index: usize,
        chapter: &Chapter,
        toc_entry: Option<&TocEntry>,
    ) -> Result<&mut Self>
    where
        Self: Sized;

    /// Finalizes the book and writes it to disk.
    async fn save(self) -> Result<()>;
}
