//! Chapter assignment and title formatting.
//!
//! Pages arrive sorted by [`SortKey`]. In filename mode every change of the chapter
//! number starts a new chapter. In hierarchy mode the configured tree is flattened into
//! [`ChapterBoundary`] start keys and each page joins the nearest boundary at or before
//! its own key. Either way consecutive pages sharing a chapter path form one [`Chapter`].

use log::debug;

use crate::collector::FilenameGrammar;
use crate::error::{Error, Result};
use crate::types::{
    Chapter, ChapterBoundary, ChapterHierarchy, ChapterNode, ChapterSource, ParsedImage,
    TitleLabels,
};

/// Assigns sorted pages to chapters according to the configured chapter source.
pub fn assign_chapters(
    images: Vec<ParsedImage>,
    source: &ChapterSource,
    labels: &TitleLabels,
) -> Result<Vec<Chapter>> {
    match source {
        ChapterSource::Filenames => Ok(assign_by_filename(images, labels)),
        ChapterSource::Hierarchy(hierarchy) => assign_by_hierarchy(images, hierarchy),
    }
}

/// Groups pages by the chapter number in their file names.
pub fn assign_by_filename(mut images: Vec<ParsedImage>, labels: &TitleLabels) -> Vec<Chapter> {
    images.sort_by_key(|img| img.sort_key);
    for image in images.iter_mut() {
        image.chapter_path = vec![image.sort_key.0];
        image.chapter_titles = vec![None];
    }

    group_consecutive(images, |image| {
        format_filename_title(&image.prefix, image.sort_key.0, labels)
    })
}

/// Assigns every page to the configured chapter whose start file is the closest one
/// not sorting after it.
///
/// # Returns
///
/// * `Ok(Vec<Chapter>)` - Chapters in page order; boundaries that receive no pages are dropped
/// * `Err(Error::NoChapterBefore)` - A page sorts before every configured start file
/// * `Err(Error::InvalidFilename)` / `Err(Error::DuplicateBoundary)` - A start file is malformed
///   or shared by two chapters
pub fn assign_by_hierarchy(
    mut images: Vec<ParsedImage>,
    hierarchy: &ChapterHierarchy,
) -> Result<Vec<Chapter>> {
    let boundaries = flatten_boundaries(hierarchy)?;
    debug!("Flattened {} chapter boundaries", boundaries.len());

    images.sort_by_key(|img| img.sort_key);
    for image in images.iter_mut() {
        let boundary = find_boundary(&boundaries, image)
            .ok_or_else(|| Error::NoChapterBefore(image.filename.clone()))?;
        image.chapter_path = boundary.chapter_path.clone();
        image.chapter_titles = boundary.chapter_titles.clone();
    }

    Ok(group_consecutive(images, |image| {
        format_hierarchy_title(
            &hierarchy.levels,
            &image.chapter_path,
            &image.chapter_titles,
        )
    }))
}

/// Flattens the chapter tree into start boundaries sorted by key.
pub fn flatten_boundaries(hierarchy: &ChapterHierarchy) -> Result<Vec<ChapterBoundary>> {
    let mut boundaries = Vec::new();
    let mut path = Vec::new();
    let mut titles = Vec::new();
    collect_leaves(&hierarchy.chapters, &mut path, &mut titles, &mut boundaries)?;

    // Stable, so equal keys stay in declaration order for the duplicate report.
    boundaries.sort_by_key(|b| b.sort_key);

    for pair in boundaries.windows(2) {
        if pair[0].sort_key == pair[1].sort_key {
            return Err(Error::DuplicateBoundary {
                first: synthesize_label(&hierarchy.levels, &pair[0].chapter_path),
                second: synthesize_label(&hierarchy.levels, &pair[1].chapter_path),
                start_file: pair[1].start_file.clone(),
            });
        }
    }
    Ok(boundaries)
}

fn collect_leaves(
    nodes: &[ChapterNode],
    path: &mut Vec<u32>,
    titles: &mut Vec<Option<String>>,
    boundaries: &mut Vec<ChapterBoundary>,
) -> Result<()> {
    for node in nodes {
        path.push(node.number());
        titles.push(node.title().map(str::to_string));

        match node {
            ChapterNode::Leaf { start_file, .. } => {
                let start = FilenameGrammar::Volume.parse(start_file)?;
                boundaries.push(ChapterBoundary {
                    sort_key: start.sort_key,
                    start_file: start_file.clone(),
                    chapter_path: path.clone(),
                    chapter_titles: titles.clone(),
                });
            }
            ChapterNode::Branch { children, .. } => {
                collect_leaves(children, path, titles, boundaries)?;
            }
        }

        path.pop();
        titles.pop();
    }
    Ok(())
}

/// Returns the last boundary whose key is not greater than the page's key.
pub fn find_boundary<'b>(
    boundaries: &'b [ChapterBoundary],
    image: &ParsedImage,
) -> Option<&'b ChapterBoundary> {
    boundaries
        .iter()
        .rev()
        .find(|boundary| boundary.sort_key <= image.sort_key)
}

fn group_consecutive<F>(images: Vec<ParsedImage>, mut title_for: F) -> Vec<Chapter>
where
    F: FnMut(&ParsedImage) -> String,
{
    let mut chapters: Vec<Chapter> = Vec::new();

    for image in images {
        let starts_new_chapter = chapters
            .last()
            .map_or(true, |current| current.path != image.chapter_path);

        if starts_new_chapter {
            chapters.push(Chapter {
                title: title_for(&image),
                path: image.chapter_path.clone(),
                titles: image.chapter_titles.clone(),
                images: vec![image],
            });
        } else if let Some(current) = chapters.last_mut() {
            current.images.push(image);
        }
    }

    chapters
}

/// Title of a filename-derived chapter: `VOL` and `CH` use the localized labels,
/// anything else falls back to `Chapter <PREFIX><number>`.
pub fn format_filename_title(prefix: &str, number: u32, labels: &TitleLabels) -> String {
    match prefix.to_ascii_uppercase().as_str() {
        "VOL" => format!("{}{}", labels.volume, number),
        "CH" => format!("{}{}", labels.chapter, number),
        other => format!("Chapter {}{:02}", other, number),
    }
}

/// Title of a configured chapter: its own custom title, or the synthesized label of its path.
pub fn format_hierarchy_title(
    levels: &[String],
    path: &[u32],
    titles: &[Option<String>],
) -> String {
    match titles.last() {
        Some(Some(title)) => title.clone(),
        _ => synthesize_label(levels, path),
    }
}

/// `<level><number>` for every level of the path, joined by spaces (e.g. `卷1 话2`).
pub fn synthesize_label(levels: &[String], path: &[u32]) -> String {
    levels
        .iter()
        .zip(path)
        .map(|(level, number)| format!("{}{}", level, number))
        .collect::<Vec<_>>()
        .join(" ")
}
