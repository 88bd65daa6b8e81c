//! Manga page collection, filename parsing and validation.
//!
//! This module lists the page images of a source folder and turns every file name
//! into a [`ParsedImage`] with a numeric [`SortKey`]. Two naming grammars exist:
//!
//! - [`FilenameGrammar::Prefixed`]: `<letters><digits>_<digits>.ext` (e.g. `CH01_05.jpg`,
//!   `VOL1_74.png`). The letters are a case-insensitive prefix, the first number is the
//!   chapter or volume, the second the page.
//! - [`FilenameGrammar::Volume`]: `VOL<digits>_<digits>.ext`. The first number is only a
//!   sort key; chapters come from a configured hierarchy.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::{debug, info};
use regex::Regex;
use tokio::fs::{ReadDir, read_dir};

use crate::error::{Error, Result};
use crate::path_utils::is_hidden_file;
use crate::types::{ParsedImage, SortKey, is_supported_image};

lazy_static! {
    /// Matches `<letters><digits>_<digits>.` at the start of a file name.
    pub static ref PREFIXED_FILENAME_REGEX: Regex = Regex::new(r"^([A-Za-z]+)(\d+)_(\d+)\.").unwrap();
    /// Matches `VOL<digits>_<digits>.` at the start of a file name, in any case.
    pub static ref VOLUME_FILENAME_REGEX: Regex = Regex::new(r"(?i)^(VOL)(\d+)_(\d+)\.").unwrap();
}

/// The naming convention page files are expected to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameGrammar {
    Prefixed,
    Volume,
}

impl FilenameGrammar {
    fn regex(&self) -> &'static Regex {
        match self {
            FilenameGrammar::Prefixed => &*PREFIXED_FILENAME_REGEX,
            FilenameGrammar::Volume => &*VOLUME_FILENAME_REGEX,
        }
    }

    /// Human-readable description of the grammar, used in error messages.
    pub fn expected_format(&self) -> &'static str {
        match self {
            FilenameGrammar::Prefixed => "PREFIX<number>_<page>.ext (e.g., CH01_05.jpg)",
            FilenameGrammar::Volume => "VOL<number>_<page>.ext (e.g., VOL01_005.jpg)",
        }
    }

    /// Parses a file name into a [`ParsedImage`] with an unassigned chapter path.
    ///
    /// # Returns
    ///
    /// * `Ok(ParsedImage)` - The prefix and sort key extracted from the name
    /// * `Err(Error::InvalidFilename)` - The name does not follow this grammar, or a
    ///   number does not fit into 32 bits
    pub fn parse(&self, filename: &str) -> Result<ParsedImage> {
        let invalid = || Error::InvalidFilename {
            filename: filename.to_string(),
            expected: self.expected_format().to_string(),
        };

        let captures = self.regex().captures(filename).ok_or_else(invalid)?;
        let prefix = captures[1].to_ascii_uppercase();
        let number = captures[2].parse::<u32>().map_err(|_| invalid())?;
        let page = captures[3].parse::<u32>().map_err(|_| invalid())?;

        Ok(ParsedImage::new(filename, prefix, SortKey(number, page)))
    }
}

/// Lists and validates the page images of one source folder.
#[derive(Debug)]
pub struct Collector<'a> {
    base_directory: &'a Path,
    grammar: FilenameGrammar,
}

impl<'a> Collector<'a> {
    /// Creates a new Collector for the specified folder.
    ///
    /// # Arguments
    ///
    /// * `base_directory` - Folder containing the page images (not scanned recursively)
    /// * `grammar` - Naming convention the page files must follow
    pub fn new(base_directory: &'a Path, grammar: FilenameGrammar) -> Self {
        Self {
            base_directory,
            grammar,
        }
    }

    /// Lists, parses and validates every page in the folder.
    ///
    /// # Returns
    ///
    /// * `Result<Vec<ParsedImage>>` - Pages sorted by their sort key
    pub async fn collect(&self) -> Result<Vec<ParsedImage>> {
        let names = self.collect_image_names().await?;
        if names.is_empty() {
            return Err(Error::NoImages(self.base_directory.to_path_buf()));
        }
        info!("Found {} images", names.len());

        let images = self.parse_and_validate(&names)?;
        if let Some(first) = images.first() {
            info!("Validated: All files use {} prefix", first.prefix);
        }
        Ok(images)
    }

    /// Collects the names of all supported image files directly inside the folder.
    ///
    /// Hidden files and subdirectories are skipped. Names are returned in lexical
    /// order so that validation reports the same first offender on every run.
    pub async fn collect_image_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = Vec::new();

        let mut entries: ReadDir = read_dir(self.base_directory).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path: PathBuf = entry.path();

            if is_hidden_file(&path) || !is_supported_image(&path) {
                continue;
            }
            if !entry.file_type().await?.is_file() {
                continue;
            }

            let name = entry.file_name().into_string().map_err(|_| {
                Error::InvalidPath(path.clone(), "File name is not valid UTF-8".to_string())
            })?;
            names.push(name);
        }

        names.sort();
        debug!(
            "Collected {} image names from {:?}",
            names.len(),
            self.base_directory
        );
        Ok(names)
    }

    /// Parses every file name with the collector's grammar and validates the set.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ParsedImage>)` - Pages sorted by sort key
    /// * `Err(Error)` - The first invalid name, mixed prefixes (prefixed grammar only),
    ///   or two pages sharing a sort key
    pub fn parse_and_validate(&self, filenames: &[String]) -> Result<Vec<ParsedImage>> {
        if filenames.is_empty() {
            return Err(Error::NoImages(self.base_directory.to_path_buf()));
        }

        let mut parsed_images = filenames
            .iter()
            .map(|name| self.grammar.parse(name))
            .collect::<Result<Vec<_>>>()?;

        if self.grammar == FilenameGrammar::Prefixed {
            let prefixes: BTreeSet<&str> =
                parsed_images.iter().map(|img| img.prefix.as_str()).collect();
            if prefixes.len() > 1 {
                return Err(Error::MixedPrefixes(
                    prefixes.into_iter().map(str::to_string).collect(),
                ));
            }
        }

        parsed_images.sort_by_key(|img| img.sort_key);
        check_unique_sort_keys(&parsed_images)?;

        Ok(parsed_images)
    }
}

/// Fails when two neighbours of a sorted page list share a sort key.
pub fn check_unique_sort_keys(sorted_images: &[ParsedImage]) -> Result<()> {
    for pair in sorted_images.windows(2) {
        if pair[0].sort_key == pair[1].sort_key {
            return Err(Error::DuplicatePage {
                first: pair[0].filename.clone(),
                second: pair[1].filename.clone(),
            });
        }
    }
    Ok(())
}
