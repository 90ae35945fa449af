use crate::{CurriculumItem, ItemClass};

/// Drops chapter headers, keeping the relative order of everything else.
///
/// Chapters never render as matchable rows, so they must not occupy
/// alignment slots in the matcher.
pub fn filter_content_items(items: &[CurriculumItem]) -> Vec<CurriculumItem> {
    items
        .iter()
        .filter(|item| item.class != ItemClass::Chapter)
        .cloned()
        .collect()
}
