use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::generator::codec::{EncodedImage, PAGE_MIME, page_resource_name};
use crate::path_utils::path_to_string_lossy;
use crate::types::{Chapter, EbookMetadata, TocEntry};
use async_trait::async_trait;
use epub_builder::{EpubBuilder, EpubContent, EpubVersion, TocElement, ZipLibrary};
use log::debug;

/// Folder holding the page images inside the book.
const IMAGE_DIR: &str = "images";

/// Internal href of the chapter document at `chapter_index` (0-based).
pub fn chapter_href(chapter_index: usize) -> String {
    format!("chapter_{:03}.xhtml", chapter_index + 1)
}

/// Generates the XHTML document for one chapter: every page image, in order.
///
/// # Arguments
///
/// * `chapter_title` - Title shown in the document head
/// * `page_names` - Source file names of the chapter's pages
fn generate_xhtml(chapter_title: &str, page_names: &[&str]) -> String {
    const TEMPLATE: &str = include_str!("../../templates/chapter.xhtml");
    let pages = page_names
        .iter()
        .map(|name| {
            format!(
                "    <div class=\"page\"><img src=\"{}/{}\" alt=\"{}\"/></div>",
                IMAGE_DIR,
                html_escape::encode_double_quoted_attribute(&page_resource_name(name)),
                html_escape::encode_double_quoted_attribute(name)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    TEMPLATE
        .replace("%title%", &html_escape::encode_text(chapter_title))
        .replace("%pages%", &pages)
}

/// Converts a nested table-of-contents entry into an `epub-builder` element.
fn toc_element(entry: &TocEntry, level: i32) -> TocElement {
    entry.children.iter().fold(
        TocElement::new(chapter_href(entry.target), entry.title.clone()).level(level),
        |element, child| element.child(toc_element(child, level + 1)),
    )
}

/// A generator for creating EPUB 3 books from recompressed manga pages.
///
/// This struct wraps the `EpubBuilder` functionality and implements the `Generator` trait.
/// The book opens with an inline navigation page followed by one document per chapter.
pub struct EPub {
    epub: EpubBuilder<ZipLibrary>,
    output_file: PathBuf,
}

#[async_trait]
impl Generator for EPub {
    fn new(output_file: &Path) -> Result<Self> {
        let mut epub = EpubBuilder::new(ZipLibrary::new()?)?;

        epub.epub_version(EpubVersion::V30);
        epub.stylesheet(include_bytes!("../../templates/style.css").as_slice())?;
        epub.inline_toc();

        if let Some(parent) = output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(EPub {
            epub,
            output_file: output_file.to_path_buf(),
        })
    }

    async fn set_metadata(&mut self, metadata: &EbookMetadata) -> Result<&mut Self> {
        self.epub.metadata("title", &metadata.title)?;
        for author in &metadata.authors {
            self.epub.metadata("author", author)?;
        }
        self.epub.set_lang(&metadata.language);

        if let Some(description) = &metadata.description {
            self.epub.metadata("description", description)?;
        }
        if let Some(release_date) = metadata.release_date {
            self.epub.set_publication_date(release_date);
        }
        Ok(self)
    }

    async fn set_cover(&mut self, cover: &EncodedImage) -> Result<&mut Self> {
        let internal_cover_path = format!("{}/cover.jpg", IMAGE_DIR);
        self.epub
            .add_cover_image(internal_cover_path, cover.data.as_slice(), PAGE_MIME)?;
        Ok(self)
    }

    async fn add_page(&mut self, page: &EncodedImage) -> Result<&mut Self> {
        let resource_path = format!("{}/{}", IMAGE_DIR, page.resource_name());
        self.epub
            .add_resource(resource_path, page.data.as_slice(), PAGE_MIME)?;
        Ok(self)
    }

    async fn add_chapter(
        &mut self,
        chapter_index: usize,
        chapter: &Chapter,
        toc_entry: Option<&TocEntry>,
    ) -> Result<&mut Self> {
        let page_names: Vec<&str> = chapter
            .images
            .iter()
            .map(|img| img.filename.as_str())
            .collect();
        let xhtml = generate_xhtml(&chapter.title, &page_names);

        let mut content = EpubContent::new(chapter_href(chapter_index), xhtml.as_bytes());
        // Only chapters a top-level entry links to are titled; the rest stay out of the TOC.
        if let Some(entry) = toc_entry {
            content = content.title(entry.title.clone());
            for child in &entry.children {
                content = content.child(toc_element(child, 2));
            }
        }

        self.epub.add_content(content)?;
        debug!(
            "Added chapter {} '{}' with {} pages",
            chapter_index + 1,
            chapter.title,
            chapter.images.len()
        );
        Ok(self)
    }

    async fn save(mut self) -> Result<()> {
        let file = File::create(&self.output_file).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create EPUB file '{}': {}",
                    path_to_string_lossy(&self.output_file),
                    e
                ),
            ))
        })?;

        self.epub.generate(file)?;
        Ok(())
    }
}
