//! Common test utilities for the tankobon crate.
//!
//! Provides scratch directories, dummy page images and helpers for looking inside
//! the produced EPUB archives.

use image::{Rgb, RgbImage};
use rand::{Rng, distributions::Alphanumeric};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tankobon::error::Result;
use tokio::fs;

#[allow(dead_code)]
pub const TEST_TMP_DIR: &str = "tests/tmp";
#[allow(dead_code)]
pub const LONG_TEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A unique scratch directory with a `source` folder for pages and a `target` folder
/// for output.
pub struct TestDirs {
    pub base_dir: PathBuf,
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
}

impl Drop for TestDirs {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.base_dir);
    }
}

/// Creates a clean, uniquely named test directory.
#[allow(dead_code)]
pub async fn setup_test_dirs(sub_path: &str) -> TestDirs {
    let rand_string: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect();
    let base_dir = PathBuf::from(TEST_TMP_DIR).join(format!("{}-{}", sub_path, rand_string));
    if base_dir.exists() {
        fs::remove_dir_all(&base_dir).await.unwrap();
    }
    let source_dir = base_dir.join("source");
    let target_dir = base_dir.join("target");

    fs::create_dir_all(&source_dir).await.unwrap();
    fs::create_dir_all(&target_dir).await.unwrap();

    TestDirs {
        base_dir,
        source_dir,
        target_dir,
    }
}

/// Creates a solid-color image; the format follows the file extension.
#[allow(dead_code)]
pub async fn create_dummy_image(path: &Path, width: u32, height: u32, color: Rgb<u8>) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let img = RgbImage::from_pixel(width, height, color);
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || img.save(path)).await??;
    Ok(())
}

/// Creates a small red page for every name in `names`.
#[allow(dead_code)]
pub async fn create_pages(dir: &Path, names: &[&str]) -> Result<()> {
    for name in names {
        create_dummy_image(&dir.join(name), 60, 80, Rgb([200, 30, 30])).await?;
    }
    Ok(())
}

/// Lists every entry of a ZIP archive (EPUBs are ZIP files).
#[allow(dead_code)]
pub fn zip_entry_names(path: &Path) -> Vec<String> {
    let file = std::fs::File::open(path).unwrap();
    let archive = zip::ZipArchive::new(file).unwrap();
    archive.file_names().map(str::to_string).collect()
}

/// Reads the first archive entry whose name ends with `suffix`.
#[allow(dead_code)]
pub fn read_zip_entry_ending_with(path: &Path, suffix: &str) -> Option<String> {
    let name = zip_entry_names(path)
        .into_iter()
        .find(|name| name.ends_with(suffix))?;
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(&name).unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    Some(content)
}

/// Decodes the first archive entry whose name ends with `suffix` as an image.
#[allow(dead_code)]
pub fn read_zip_image_ending_with(path: &Path, suffix: &str) -> Option<image::DynamicImage> {
    let name = zip_entry_names(path)
        .into_iter()
        .find(|name| name.ends_with(suffix))?;
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name(&name).unwrap();
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes).unwrap();
    image::load_from_memory(&bytes).ok()
}
