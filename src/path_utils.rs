//! Path utilities for input listing and output naming.
//!
//! This module provides the small helpers used to skip hidden files, turn book titles
//! into safe file names, and derive the default `.epub` output path.

use std::path::{Path, PathBuf};

/// Extension given to every generated book.
pub const EPUB_EXTENSION: &str = "epub";

/// Converts a path to a string with fallback to lossy conversion.
pub fn path_to_string_lossy(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Gets the file name from a path with fallback to lossy conversion.
///
/// # Arguments
///
/// * `path` - The path to extract the file name from
///
/// # Returns
///
/// * `String` - The file name, or "unknown" when the path has none (e.g. `/` or `..`)
pub fn get_file_name_lossy(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Checks if a filename starts with a dot (hidden file) using safe conversion.
pub fn is_hidden_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

/// Sanitizes a filename by replacing invalid characters with safe alternatives.
///
/// # Arguments
///
/// * `filename` - The filename to sanitize
///
/// # Returns
///
/// * `String` - The sanitized filename
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| match c {
            '<' | '>' | '"' | '|' | '?' | '*' => '-',
            ':' => '-',
            '/' | '\\' => '-',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

/// Appends `.epub` unless the path already ends with it (compared case-insensitively).
pub fn with_epub_extension(path: PathBuf) -> PathBuf {
    let has_extension = path
        .extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(EPUB_EXTENSION))
        .unwrap_or(false);

    if has_extension {
        path
    } else {
        let mut raw = path.into_os_string();
        raw.push(".");
        raw.push(EPUB_EXTENSION);
        PathBuf::from(raw)
    }
}

/// Output path named after the source folder, e.g. `Chainsaw Man Vol1/` → `Chainsaw Man Vol1.epub`.
///
/// Trailing separators are ignored. The file is placed in the current directory.
pub fn output_path_from_folder(source_folder: &Path) -> PathBuf {
    let folder_name = sanitize_filename(&get_file_name_lossy(source_folder));
    with_epub_extension(PathBuf::from(folder_name))
}

/// Output path named after the book title, placed in the current directory.
pub fn output_path_from_title(title: &str) -> PathBuf {
    with_epub_extension(PathBuf::from(sanitize_filename(title)))
}
