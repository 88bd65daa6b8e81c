//! Custom error types and result handling for tankobon operations.
//!
//! Every failure in the conversion pipeline is terminal: the first error aborts the run
//! and is reported as a single message naming the offending file or configuration path.
//! All operations return a [`Result<T>`] which is a type alias for `std::result::Result<T, Error>`.
//!
use std::path::PathBuf;

/// Type alias for Results with tankobon errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error type for all tankobon operations.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O errors from the standard library
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Image decoding or encoding errors
    #[error(transparent)]
    Image(#[from] image::ImageError),
    /// EPUB generation errors
    #[error(transparent)]
    Epub(#[from] epub_builder::Error),
    /// Malformed book configuration documents
    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
    /// Blocking task join errors
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error(transparent)]
    ConverterBuilder(#[from] crate::converter::ConverterConfigBuilderError),
    /// Error for invalid file or directory paths
    #[error("The given path '{0:?}' is invalid: {1}")]
    InvalidPath(PathBuf, String),
    /// Error for resources that couldn't be found (e.g., source directory, config file)
    #[error("Not found: {0}")]
    NotFound(String),
    /// The source directory holds no supported image files
    #[error("No images found in the input folder: {0:?}")]
    NoImages(PathBuf),
    /// A file name does not follow the expected naming grammar
    #[error("Invalid filename format: {filename}\nExpected format: {expected}")]
    InvalidFilename { filename: String, expected: String },
    /// Flat mode found more than one naming prefix in one folder
    #[error("Mixed prefixes found: {}. All files must use the same prefix", .0.join(", "))]
    MixedPrefixes(Vec<String>),
    /// Two images resolve to the same sort key
    #[error("Duplicate page: '{first}' and '{second}' have the same chapter and page numbers")]
    DuplicatePage { first: String, second: String },
    /// Two configured chapters start at the same file
    #[error("Chapters '{first}' and '{second}' start at the same file '{start_file}'")]
    DuplicateBoundary {
        first: String,
        second: String,
        start_file: String,
    },
    /// An image sorts before every configured chapter start
    #[error("No chapter starts before this file: {0}")]
    NoChapterBefore(String),
    /// Book configuration schema violations
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Other errors that don't fit into specific categories
    #[error("Other error: {0}")]
    Other(String),
}

/// Schema violations in a book configuration file.
///
/// Every variant carries the path of the offending node, written the way it appears
/// in the document (e.g. `chapters[2].sub[0]`).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required field '{field}' in {path}")]
    MissingField { path: String, field: String },
    #[error("The hierarchy must declare at least one level name")]
    EmptyHierarchy,
    #[error("Chapter {path} has both 'start_file' and 'sub'; a chapter holds pages or sub-chapters, not both")]
    LeafBranchConflict { path: String },
    #[error("Chapter {path} has neither 'start_file' nor 'sub'")]
    EmptyNode { path: String },
    #[error("Chapter {path} declares sub-chapters, but the hierarchy only has {depth} level(s)")]
    TooDeep { path: String, depth: usize },
    #[error("Chapter {path} sets 'start_file' above the deepest of the {depth} hierarchy level(s)")]
    LeafAboveDeepestLevel { path: String, depth: usize },
    #[error("Chapter number {number} is used twice under {path}")]
    DuplicateNumber { path: String, number: u32 },
}

// Basic From<String> conversion for convenience
impl From<String> for Error {
    fn from(error: String) -> Self {
        Error::Other(error)
    }
}

impl From<&str> for Error {
    fn from(error: &str) -> Self {
        Error::Other(error.to_string())
    }
}
