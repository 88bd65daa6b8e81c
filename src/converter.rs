use std::collections::HashMap;
use std::path::PathBuf;

use log::{debug, info};

use crate::chapters::assign_chapters;
use crate::collector::{Collector, FilenameGrammar};
use crate::error::{Error, Result};
use crate::generator::codec::{EncodedImage, encode_page};
use crate::generator::{Generator, epub::EPub};
use crate::hierarchy::BookConfig;
use crate::path_utils::{output_path_from_folder, output_path_from_title, with_epub_extension};
use crate::progress::ProgressSink;
use crate::toc::build_toc;
use crate::types::{BookPlan, ChapterSource, EbookMetadata, ImageOptions, TitleLabels, TocEntry};

/// A manga-to-EPUB conversion, built declaratively using the builder pattern.
///
/// The same configuration drives both conversion modes:
///
/// - [`ChapterSource::Filenames`]: chapters come from names like `CH01_001.jpg`
/// - [`ChapterSource::Hierarchy`]: chapters come from a configured tree whose leaves
///   start at `VOL<n>_<page>` files
///
/// ```rust,no_run
/// # use tankobon::prelude::*;
/// # #[tokio::main]
/// # async fn main() -> tankobon::error::Result<()> {
/// let config = ConverterConfig::builder()
///     .metadata(EbookMetadata::default_with_title("Chainsaw Man".to_string()))
///     .source_path(PathBuf::from("./chainsaw_man"))
///     .build()?;
///
/// let written = config.convert(&mut StderrProgress::default()).await?;
/// println!("Wrote {:?}", written);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, derive_builder::Builder)]
#[builder(setter(into, strip_option), build_fn(validate = "Self::validate"))]
pub struct ConverterConfig {
    /// Metadata embedded into the book. The title is required.
    pub metadata: EbookMetadata,

    /// Folder holding the page images. Only its direct entries are read.
    pub source_path: PathBuf,

    /// Where to write the book. `.epub` is appended when missing.
    ///
    /// Defaults to `<source folder name>.epub` for filename-driven books and to
    /// `<sanitized title>.epub` for hierarchy-driven ones, both in the working directory.
    #[builder(default)]
    pub output_path: Option<PathBuf>,

    /// How pages are mapped onto chapters.
    #[builder(default)]
    pub chapter_source: ChapterSource,

    /// Recompression bounds and JPEG quality.
    #[builder(default)]
    pub image_options: ImageOptions,

    /// Labels used for filename-derived and synthesized titles.
    #[builder(default)]
    pub title_labels: TitleLabels,
}

impl ConverterConfig {
    /// Creates a new builder for configuring `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder::default()
    }

    /// Builds a hierarchy-driven conversion from a loaded book configuration.
    pub fn from_book_config(
        book: BookConfig,
        source_path: PathBuf,
        output_path: Option<PathBuf>,
    ) -> Result<Self> {
        let mut builder = Self::builder();
        builder
            .metadata(book.metadata)
            .source_path(source_path)
            .chapter_source(ChapterSource::Hierarchy(book.hierarchy));
        if let Some(output_path) = output_path {
            builder.output_path(output_path);
        }
        Ok(builder.build()?)
    }

    /// Checks that the source folder can be read before any work is done.
    ///
    /// # Returns
    ///
    /// * `Ok(&self)` - The source path is an existing directory
    /// * `Err(Error::NotFound)` - The source path does not exist
    /// * `Err(Error::InvalidPath)` - The source path is empty or not a directory
    pub fn preflight_check(&self) -> Result<&Self> {
        if self.source_path.as_os_str().is_empty() {
            return Err(Error::InvalidPath(
                self.source_path.clone(),
                "Source path must be set.".to_string(),
            ));
        }
        if !self.source_path.exists() {
            return Err(Error::NotFound(format!(
                "Source path does not exist: {:?}",
                self.source_path
            )));
        }
        if !self.source_path.is_dir() {
            return Err(Error::InvalidPath(
                self.source_path.clone(),
                "Source path is not a directory.".to_string(),
            ));
        }
        Ok(self)
    }

    /// The file the book will be written to.
    pub fn output_file(&self) -> PathBuf {
        match &self.output_path {
            Some(path) => with_epub_extension(path.clone()),
            None => match &self.chapter_source {
                ChapterSource::Filenames => output_path_from_folder(&self.source_path),
                ChapterSource::Hierarchy(_) => output_path_from_title(&self.metadata.title),
            },
        }
    }

    fn grammar(&self) -> FilenameGrammar {
        match self.chapter_source {
            ChapterSource::Filenames => FilenameGrammar::Prefixed,
            ChapterSource::Hierarchy(_) => FilenameGrammar::Volume,
        }
    }

    /// Lists, validates and assigns the source pages without touching any image data.
    ///
    /// Planning the same folder twice yields the same plan.
    pub async fn plan(&self) -> Result<BookPlan> {
        self.preflight_check()?;

        let images = Collector::new(&self.source_path, self.grammar())
            .collect()
            .await?;
        let chapters = assign_chapters(images, &self.chapter_source, &self.title_labels)?;
        let toc = build_toc(&chapters, &self.chapter_source);
        info!("Chapters: {}", chapters.len());

        Ok(BookPlan { chapters, toc })
    }

    /// Runs the whole pipeline and writes the book.
    ///
    /// Pages are recompressed one at a time on the blocking pool. The first page in
    /// reading order doubles as the cover. Nothing is written when planning fails.
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written EPUB
    /// * `Err(Error)` - Validation, decoding or packaging failed
    pub async fn convert(&self, progress: &mut dyn ProgressSink) -> Result<PathBuf> {
        let plan = self.plan().await?;
        let output_file = self.output_file();
        let total = plan.total_images();

        let mut epub = EPub::new(&output_file)?;
        epub.set_metadata(&self.metadata).await?;

        let entries_by_target: HashMap<usize, &TocEntry> =
            plan.toc.iter().map(|entry| (entry.target, entry)).collect();

        let mut done = 0;
        for (chapter_index, chapter) in plan.chapters.iter().enumerate() {
            for image in &chapter.images {
                let path = self.source_path.join(&image.filename);
                let options = self.image_options;
                let data = tokio::task::spawn_blocking(move || encode_page(&path, &options))
                    .await??;
                let page = EncodedImage {
                    source_name: image.filename.clone(),
                    data,
                };

                if done == 0 {
                    epub.set_cover(&page).await?;
                }
                epub.add_page(&page).await?;

                done += 1;
                progress.image_processed(done, total);
            }

            epub.add_chapter(
                chapter_index,
                chapter,
                entries_by_target.get(&chapter_index).copied(),
            )
            .await?;
        }
        progress.finished(total);

        epub.save().await?;
        debug!("Wrote {} pages to {:?}", total, output_file);
        Ok(output_file)
    }
}

impl ConverterConfigBuilder {
    fn validate(&self) -> std::result::Result<(), String> {
        if let Some(metadata) = &self.metadata {
            if metadata.title.trim().is_empty() {
                return Err("Ebook title is required".to_string());
            }
            if metadata.language.trim().is_empty() {
                return Err("Ebook language is required".to_string());
            }
        }

        if let Some(options) = &self.image_options {
            if options.max_width == 0 || options.max_height == 0 {
                return Err(format!(
                    "Image bounds must be positive, got {}x{}",
                    options.max_width, options.max_height
                ));
            }
            if !(1..=100).contains(&options.jpeg_quality) {
                return Err(format!(
                    "JPEG quality must be between 1 and 100, got {}",
                    options.jpeg_quality
                ));
            }
        }

        Ok(())
    }
}
