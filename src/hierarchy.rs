//! Book configuration loading for hierarchy-driven conversions.
//!
//! A book configuration is a TOML document with three parts: the level names of the
//! chapter hierarchy, the book metadata, and the chapter tree itself:
//!
//! ```toml
//! hierarchy = ["卷", "话"]
//!
//! [metadata]
//! title = "Chainsaw Man"
//! author = "Fujimoto Tatsuki"
//! language = "ja"
//!
//! [[chapters]]
//! chapter = 1
//! title = "Volume 1"
//!
//!   [[chapters.sub]]
//!   chapter = 1
//!   start_file = "VOL01_001.jpg"
//!
//!   [[chapters.sub]]
//!   chapter = 2
//!   start_file = "VOL01_045.jpg"
//! ```
//!
//! Validation is fail-fast: the first violation is returned as a [`ConfigError`]
//! naming the offending node, e.g. `chapters[0].sub[1]`.

use std::collections::HashSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;

use crate::error::{ConfigError, Error, Result};
use crate::types::{ChapterHierarchy, ChapterNode, EbookMetadata};

const ROOT_PATH: &str = "config";
const METADATA_PATH: &str = "metadata";
const CHAPTERS_KEY: &str = "chapters";
const SUB_KEY: &str = "sub";

/// A fully validated book configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct BookConfig {
    pub metadata: EbookMetadata,
    pub hierarchy: ChapterHierarchy,
}

#[derive(Debug, Deserialize)]
struct RawBookConfig {
    metadata: Option<RawMetadata>,
    hierarchy: Option<Vec<String>>,
    chapters: Option<Vec<RawChapter>>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    title: Option<String>,
    author: Option<String>,
    language: Option<String>,
    description: Option<String>,
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RawChapter {
    chapter: Option<u32>,
    title: Option<String>,
    start_file: Option<String>,
    sub: Option<Vec<RawChapter>>,
}

/// Reads and validates a book configuration file.
///
/// # Returns
///
/// * `Ok(BookConfig)` - Metadata and chapter hierarchy
/// * `Err(Error::NotFound)` - The file does not exist
/// * `Err(Error::Toml)` / `Err(Error::Config)` - The document is malformed or violates the schema
pub async fn load_book_config(path: &Path) -> Result<BookConfig> {
    if !path.is_file() {
        return Err(Error::NotFound(format!(
            "Config file does not exist: {:?}",
            path
        )));
    }
    let contents = tokio::fs::read_to_string(path).await?;
    let config = parse_book_config(&contents)?;
    debug!(
        "Loaded config {:?}: {} level(s), {} top-level chapter(s)",
        path,
        config.hierarchy.levels.len(),
        config.hierarchy.chapters.len()
    );
    Ok(config)
}

/// Parses and validates a book configuration document.
pub fn parse_book_config(contents: &str) -> Result<BookConfig> {
    let raw: RawBookConfig = toml::from_str(contents)?;

    let metadata = build_metadata(raw.metadata)?;

    let levels = raw.hierarchy.unwrap_or_default();
    if levels.is_empty() {
        return Err(ConfigError::EmptyHierarchy.into());
    }

    let raw_chapters = match raw.chapters {
        Some(chapters) if !chapters.is_empty() => chapters,
        _ => return Err(missing(ROOT_PATH, CHAPTERS_KEY).into()),
    };
    let chapters = build_nodes(raw_chapters, 0, levels.len(), CHAPTERS_KEY)?;

    Ok(BookConfig {
        metadata,
        hierarchy: ChapterHierarchy { levels, chapters },
    })
}

fn missing(path: &str, field: &str) -> ConfigError {
    ConfigError::MissingField {
        path: path.to_string(),
        field: field.to_string(),
    }
}

fn build_metadata(raw: Option<RawMetadata>) -> Result<EbookMetadata> {
    let raw = raw.ok_or_else(|| missing(ROOT_PATH, METADATA_PATH))?;

    let title = raw.title.ok_or_else(|| missing(METADATA_PATH, "title"))?;
    let author = raw.author.ok_or_else(|| missing(METADATA_PATH, "author"))?;
    let language = raw
        .language
        .ok_or_else(|| missing(METADATA_PATH, "language"))?;

    Ok(EbookMetadata {
        title,
        authors: vec![author],
        language,
        description: raw.description,
        release_date: raw.date,
    })
}

/// Validates one sibling list of the chapter tree.
///
/// `list_path` is the path of the list itself (`chapters` or `chapters[0].sub`);
/// `depth` is the 0-based hierarchy level of the nodes in it.
fn build_nodes(
    raw_nodes: Vec<RawChapter>,
    depth: usize,
    level_count: usize,
    list_path: &str,
) -> Result<Vec<ChapterNode>> {
    let deepest = depth + 1 == level_count;
    let mut seen_numbers = HashSet::new();
    let mut nodes = Vec::with_capacity(raw_nodes.len());

    for (index, raw) in raw_nodes.into_iter().enumerate() {
        let path = format!("{}[{}]", list_path, index);

        let number = raw.chapter.ok_or_else(|| missing(&path, "chapter"))?;

        let node = match (raw.start_file, raw.sub) {
            (Some(_), Some(_)) => return Err(ConfigError::LeafBranchConflict { path }.into()),
            (None, None) => return Err(ConfigError::EmptyNode { path }.into()),
            (None, Some(sub)) if sub.is_empty() => {
                return Err(ConfigError::EmptyNode { path }.into());
            }
            (None, Some(_)) if deepest => {
                return Err(ConfigError::TooDeep {
                    path,
                    depth: level_count,
                }
                .into());
            }
            (Some(_), None) if !deepest => {
                return Err(ConfigError::LeafAboveDeepestLevel {
                    path,
                    depth: level_count,
                }
                .into());
            }
            (Some(start_file), None) => ChapterNode::Leaf {
                number,
                title: raw.title,
                start_file,
            },
            (None, Some(sub)) => {
                let children_path = format!("{}.{}", path, SUB_KEY);
                ChapterNode::Branch {
                    number,
                    title: raw.title,
                    children: build_nodes(sub, depth + 1, level_count, &children_path)?,
                }
            }
        };

        if !seen_numbers.insert(number) {
            return Err(ConfigError::DuplicateNumber {
                path: list_path.to_string(),
                number,
            }
            .into());
        }
        nodes.push(node);
    }

    Ok(nodes)
}
