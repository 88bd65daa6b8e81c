//! Table-of-contents construction.
//!
//! Filename-derived books get one entry per chapter. Hierarchy books are grouped level
//! by level: every intermediate level becomes a section (ordered by its number) that
//! links to the first chapter it contains, and the deepest level lists the chapters.

use std::collections::BTreeMap;

use crate::types::{Chapter, ChapterSource, TocEntry};

/// Builds the table of contents for already assigned chapters.
pub fn build_toc(chapters: &[Chapter], source: &ChapterSource) -> Vec<TocEntry> {
    match source {
        ChapterSource::Filenames => chapters
            .iter()
            .enumerate()
            .map(|(index, chapter)| TocEntry::new(chapter.title.clone(), index))
            .collect(),
        ChapterSource::Hierarchy(hierarchy) => {
            let all: Vec<usize> = (0..chapters.len()).collect();
            build_level(chapters, &all, 0, &hierarchy.levels)
        }
    }
}

fn build_level(
    chapters: &[Chapter],
    members: &[usize],
    depth: usize,
    levels: &[String],
) -> Vec<TocEntry> {
    if depth + 1 >= levels.len() {
        return members
            .iter()
            .map(|&index| TocEntry::new(chapters[index].title.clone(), index))
            .collect();
    }

    // Sections follow numeric order; members keep reading order.
    let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for &index in members {
        if let Some(&number) = chapters[index].path.get(depth) {
            groups.entry(number).or_default().push(index);
        }
    }

    groups
        .into_iter()
        .map(|(number, group)| {
            let first = group[0];
            let title = chapters[first]
                .titles
                .get(depth)
                .cloned()
                .flatten()
                .unwrap_or_else(|| format!("{}{}", levels[depth], number));

            TocEntry {
                title,
                target: first,
                children: build_level(chapters, &group, depth + 1, levels),
            }
        })
        .collect()
}
