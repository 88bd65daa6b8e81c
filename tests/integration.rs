//! Integration tests for the tankobon crate.
//!
//! These tests run full conversions from a scratch folder of pages to a written EPUB
//! and look inside the produced archive.

use image::{GenericImageView, Rgb};
use tankobon::error::{Error, Result};
use tankobon::hierarchy::load_book_config;
use tankobon::prelude::*;
use tokio::time::timeout;

mod common;
use common::{
    LONG_TEST_TIMEOUT, create_dummy_image, create_pages, read_zip_entry_ending_with,
    read_zip_image_ending_with, setup_test_dirs, zip_entry_names,
};

const TREE_CONFIG: &str = r#"
hierarchy = ["卷", "话"]

[metadata]
title = "Tree Manga"
author = "Someone"
language = "zh"
description = "Two volumes"

[[chapters]]
chapter = 1
title = "Volume One"

  [[chapters.sub]]
  chapter = 1
  start_file = "VOL1_001.jpg"

  [[chapters.sub]]
  chapter = 2
  title = "Bonus"
  start_file = "VOL1_003.jpg"

[[chapters]]
chapter = 2

  [[chapters.sub]]
  chapter = 1
  start_file = "VOL2_001.jpg"
"#;

#[derive(Default)]
struct RecordingProgress {
    processed: Vec<(usize, usize)>,
    finished: Option<usize>,
}

impl ProgressSink for RecordingProgress {
    fn image_processed(&mut self, done: usize, total: usize) {
        self.processed.push((done, total));
    }

    fn finished(&mut self, total: usize) {
        self.finished = Some(total);
    }
}

fn flat_config(source: &Path, output: PathBuf) -> Result<ConverterConfig> {
    let metadata = EbookMetadata {
        title: "Flat Manga".to_string(),
        authors: vec!["Someone".to_string()],
        ..Default::default()
    };
    Ok(ConverterConfig::builder()
        .metadata(metadata)
        .source_path(source.to_path_buf())
        .output_path(output)
        .build()?)
}

#[tokio::test]
async fn test_flat_conversion_writes_chapters_and_cover() -> Result<()> {
    let dirs = setup_test_dirs("flat_conversion").await;
    create_pages(
        &dirs.source_dir,
        &["CH01_001.jpg", "CH01_002.png", "CH02_001.jpg"],
    )
    .await?;
    tokio::fs::write(dirs.source_dir.join("notes.txt"), "not a page").await?;
    tokio::fs::write(dirs.source_dir.join(".hidden.jpg"), "not a page").await?;

    let config = flat_config(&dirs.source_dir, dirs.target_dir.join("flat"))?;
    let written = timeout(LONG_TEST_TIMEOUT, config.convert(&mut SilentProgress))
        .await
        .expect("Test timed out")?;

    assert_eq!(written, dirs.target_dir.join("flat.epub"));
    assert!(written.is_file());

    let entries = zip_entry_names(&written);
    assert!(entries.iter().any(|e| e.ends_with("images/cover.jpg")));
    assert!(entries.iter().any(|e| e.ends_with("images/CH01_002.jpg")));
    assert!(entries.iter().any(|e| e.ends_with("chapter_001.xhtml")));
    assert!(entries.iter().any(|e| e.ends_with("chapter_002.xhtml")));
    assert!(!entries.iter().any(|e| e.ends_with("chapter_003.xhtml")));

    let first = read_zip_entry_ending_with(&written, "chapter_001.xhtml").unwrap();
    let one = first.find("images/CH01_001.jpg").unwrap();
    let two = first.find("images/CH01_002.jpg").unwrap();
    assert!(one < two);
    assert!(!first.contains("CH02_001"));

    let ncx = read_zip_entry_ending_with(&written, "toc.ncx").unwrap();
    assert!(ncx.contains("话1"));
    assert!(ncx.contains("话2"));

    let opf = read_zip_entry_ending_with(&written, ".opf").unwrap();
    assert!(opf.contains("Flat Manga"));
    assert!(opf.contains("Someone"));
    Ok(())
}

#[tokio::test]
async fn test_large_pages_are_shrunk_to_fit() -> Result<()> {
    let dirs = setup_test_dirs("large_pages").await;
    create_dummy_image(
        &dirs.source_dir.join("CH01_001.png"),
        2400,
        1600,
        Rgb([10, 120, 10]),
    )
    .await?;

    let config = flat_config(&dirs.source_dir, dirs.target_dir.join("large.epub"))?;
    let written = config.convert(&mut SilentProgress).await?;

    let page = read_zip_image_ending_with(&written, "images/CH01_001.jpg").unwrap();
    assert_eq!(page.dimensions(), (1200, 800));
    Ok(())
}

#[tokio::test]
async fn test_tree_conversion_from_config_file() -> Result<()> {
    let dirs = setup_test_dirs("tree_conversion").await;
    create_pages(
        &dirs.source_dir,
        &[
            "VOL1_001.jpg",
            "VOL1_002.jpg",
            "VOL1_003.jpg",
            "VOL1_004.jpg",
            "VOL2_001.jpg",
            "VOL2_002.jpg",
        ],
    )
    .await?;
    let config_path = dirs.base_dir.join("book.toml");
    tokio::fs::write(&config_path, TREE_CONFIG).await?;

    let book = load_book_config(&config_path).await?;
    let config = ConverterConfig::from_book_config(
        book,
        dirs.source_dir.clone(),
        Some(dirs.target_dir.join("tree")),
    )?;

    let plan = config.plan().await?;
    let titles: Vec<&str> = plan.chapters.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["卷1 话1", "Bonus", "卷2 话1"]);
    let sizes: Vec<usize> = plan.chapters.iter().map(|c| c.images.len()).collect();
    assert_eq!(sizes, vec![2, 2, 2]);
    assert_eq!(plan.toc.len(), 2);
    assert_eq!(plan.toc[0].title, "Volume One");
    assert_eq!(plan.toc[0].children.len(), 2);
    assert_eq!(plan.toc[1].title, "卷2");
    assert_eq!(plan.toc[1].target, 2);

    let written = config.convert(&mut SilentProgress).await?;
    assert_eq!(written, dirs.target_dir.join("tree.epub"));

    let ncx = read_zip_entry_ending_with(&written, "toc.ncx").unwrap();
    assert!(ncx.contains("Volume One"));
    assert!(ncx.contains("Bonus"));
    assert!(ncx.contains("卷2 话1"));

    let opf = read_zip_entry_ending_with(&written, ".opf").unwrap();
    assert!(opf.contains("Tree Manga"));
    Ok(())
}

#[tokio::test]
async fn test_progress_reports_every_page() -> Result<()> {
    let dirs = setup_test_dirs("progress").await;
    create_pages(
        &dirs.source_dir,
        &["CH01_001.jpg", "CH01_002.jpg", "CH03_001.jpg"],
    )
    .await?;

    let config = flat_config(&dirs.source_dir, dirs.target_dir.join("progress.epub"))?;
    let mut progress = RecordingProgress::default();
    config.convert(&mut progress).await?;

    assert_eq!(progress.processed, vec![(1, 3), (2, 3), (3, 3)]);
    assert_eq!(progress.finished, Some(3));
    Ok(())
}

#[tokio::test]
async fn test_mixed_prefixes_write_nothing() -> Result<()> {
    let dirs = setup_test_dirs("mixed_prefixes").await;
    create_pages(&dirs.source_dir, &["CH01_001.jpg", "VOL1_001.jpg"]).await?;

    let output = dirs.target_dir.join("mixed.epub");
    let config = flat_config(&dirs.source_dir, output.clone())?;
    let result = config.convert(&mut SilentProgress).await;

    match result {
        Err(Error::MixedPrefixes(prefixes)) => {
            assert_eq!(prefixes, vec!["CH".to_string(), "VOL".to_string()])
        }
        other => panic!("expected MixedPrefixes, got {:?}", other),
    }
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_page_before_first_boundary_fails() -> Result<()> {
    let dirs = setup_test_dirs("before_first_boundary").await;
    create_pages(&dirs.source_dir, &["VOL1_001.jpg", "VOL1_002.jpg"]).await?;

    let book = tankobon::hierarchy::parse_book_config(
        r#"
hierarchy = ["话"]

[metadata]
title = "Late Start"
author = "Someone"
language = "ja"

[[chapters]]
chapter = 1
start_file = "VOL1_002.jpg"
"#,
    )?;
    let output = dirs.target_dir.join("late.epub");
    let config =
        ConverterConfig::from_book_config(book, dirs.source_dir.clone(), Some(output.clone()))?;

    match config.convert(&mut SilentProgress).await {
        Err(Error::NoChapterBefore(file)) => assert_eq!(file, "VOL1_001.jpg"),
        other => panic!("expected NoChapterBefore, got {:?}", other),
    }
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_source_folder() -> Result<()> {
    let dirs = setup_test_dirs("missing_source").await;
    let config = flat_config(&dirs.base_dir.join("nope"), dirs.target_dir.join("x.epub"))?;

    assert!(matches!(
        config.convert(&mut SilentProgress).await,
        Err(Error::NotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_missing_config_file() -> Result<()> {
    let dirs = setup_test_dirs("missing_config").await;
    let result = load_book_config(&dirs.base_dir.join("book.toml")).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
    Ok(())
}
