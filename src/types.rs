//! Core data types shared by the planning and generation stages.
//!
//! This module defines the fundamental data structures used throughout tankobon:
//! - Book metadata (`EbookMetadata`)
//! - Parsed input pages (`ParsedImage`, `SortKey`)
//! - The configured chapter tree (`ChapterHierarchy`, `ChapterNode`, `ChapterBoundary`)
//! - Planning output (`Chapter`, `TocEntry`, `BookPlan`)
//! - Tunables (`ChapterSource`, `TitleLabels`, `ImageOptions`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// File extensions accepted as manga pages, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "webp"];

/// Metadata embedded into the generated EPUB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EbookMetadata {
    pub title: String,
    pub authors: Vec<String>,
    pub language: String, // e.g., "ja", "zh"
    pub description: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
}

impl Default for EbookMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            authors: Vec::new(),
            language: "ja".to_string(),
            description: None,
            release_date: None,
        }
    }
}

impl EbookMetadata {
    /// Creates a default `EbookMetadata` instance with a specified title and default language "ja".
    pub fn default_with_title(title: String) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }
}

/// Numeric pair extracted from a page filename: `(chapter or sort number, page number)`.
///
/// Ordering is lexicographic, which gives every page of a run a total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortKey(pub u32, pub u32);

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// One input page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedImage {
    pub filename: String,
    /// Upper-cased letter prefix, e.g. "CH" or "VOL".
    pub prefix: String,
    pub sort_key: SortKey,
    /// Position in the chapter hierarchy, root to leaf. Empty until assignment.
    pub chapter_path: Vec<u32>,
    /// Optional custom title per hierarchy level, aligned with `chapter_path`.
    pub chapter_titles: Vec<Option<String>>,
}

impl ParsedImage {
    pub fn new(filename: impl Into<String>, prefix: impl Into<String>, sort_key: SortKey) -> Self {
        Self {
            filename: filename.into(),
            prefix: prefix.into(),
            sort_key,
            chapter_path: Vec::new(),
            chapter_titles: Vec::new(),
        }
    }
}

/// A node of a configured chapter tree.
///
/// A node either holds pages (a leaf with a start file) or groups sub-chapters
/// (a branch), never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterNode {
    Leaf {
        number: u32,
        title: Option<String>,
        start_file: String,
    },
    Branch {
        number: u32,
        title: Option<String>,
        children: Vec<ChapterNode>,
    },
}

impl ChapterNode {
    pub fn number(&self) -> u32 {
        match self {
            ChapterNode::Leaf { number, .. } | ChapterNode::Branch { number, .. } => *number,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ChapterNode::Leaf { title, .. } | ChapterNode::Branch { title, .. } => {
                title.as_deref()
            }
        }
    }
}

/// A validated chapter tree together with its level names (e.g. `["卷", "话"]`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterHierarchy {
    pub levels: Vec<String>,
    pub chapters: Vec<ChapterNode>,
}

/// Where a leaf chapter begins, flattened out of the chapter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterBoundary {
    pub sort_key: SortKey,
    pub start_file: String,
    pub chapter_path: Vec<u32>,
    pub chapter_titles: Vec<Option<String>>,
}

/// One produced output chapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub path: Vec<u32>,
    pub titles: Vec<Option<String>>,
    pub images: Vec<ParsedImage>,
}

/// A table-of-contents entry linking to the chapter at index `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub target: usize,
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    pub fn new(title: impl Into<String>, target: usize) -> Self {
        Self {
            title: title.into(),
            target,
            children: Vec::new(),
        }
    }
}

/// Chapters in reading order plus the table of contents that points into them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookPlan {
    pub chapters: Vec<Chapter>,
    pub toc: Vec<TocEntry>,
}

impl BookPlan {
    pub fn total_images(&self) -> usize {
        self.chapters.iter().map(|c| c.images.len()).sum()
    }

    /// The first page in reading order, used as the cover.
    pub fn first_image(&self) -> Option<&ParsedImage> {
        self.chapters.first().and_then(|c| c.images.first())
    }
}

/// How pages are mapped onto chapters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChapterSource {
    /// Chapters come from the filenames themselves (`CH01_001.jpg`, `VOL2_014.png`).
    #[default]
    Filenames,
    /// Chapters come from a configured tree keyed by `VOL<n>_<page>` start files.
    Hierarchy(ChapterHierarchy),
}

/// Localized labels used for filename-derived chapter titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleLabels {
    pub volume: String,
    pub chapter: String,
}

impl Default for TitleLabels {
    fn default() -> Self {
        Self {
            volume: "卷".to_string(),
            chapter: "话".to_string(),
        }
    }
}

/// Recompression settings applied to every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOptions {
    pub max_width: u32,
    pub max_height: u32,
    pub jpeg_quality: u8, // 1-100
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            max_width: 1200,
            max_height: 1600,
            jpeg_quality: 60,
        }
    }
}

/// Returns true when the path carries one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            let e = e.to_ascii_lowercase();
            SUPPORTED_EXTENSIONS.contains(&e.as_str())
        })
        .unwrap_or(false)
}
