use crate::{created_year, CurriculumItem, ItemClass};
use serde::Serialize;
use std::collections::BTreeMap;

/// Count of content items per creation year (UTC), years ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YearHistogram {
    counts: BTreeMap<i32, usize>,
}

impl YearHistogram {
    /// Chapters and items without a parseable `created` are not counted.
    pub fn from_items(items: &[CurriculumItem]) -> Self {
        let mut counts = BTreeMap::new();
        for item in items {
            if item.class == ItemClass::Chapter {
                continue;
            }
            if let Some(year) = item.created().and_then(created_year) {
                *counts.entry(year).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.values().copied().max().unwrap_or(0)
    }

    pub fn count(&self, year: i32) -> usize {
        self.counts.get(&year).copied().unwrap_or(0)
    }

    pub fn years(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.counts.iter().map(|(year, count)| (*year, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(class: ItemClass, created: Option<&str>) -> CurriculumItem {
        CurriculumItem {
            class,
            id: 0,
            title: String::new(),
            created: created.map(str::to_string),
            sort_order: 0.0,
        }
    }

    #[test]
    fn counts_content_items_per_year() {
        let items = vec![
            item(ItemClass::Chapter, Some("2019-01-01T00:00:00Z")),
            item(ItemClass::Lecture, Some("2020-05-01T00:00:00Z")),
            item(ItemClass::Lecture, Some("2020-07-01T00:00:00Z")),
            item(ItemClass::Quiz, Some("2022-01-01T00:00:00Z")),
            item(ItemClass::Lecture, None),
            item(ItemClass::Lecture, Some("not a date")),
        ];
        let hist = YearHistogram::from_items(&items);
        assert_eq!(hist.years().collect::<Vec<_>>(), vec![(2020, 2), (2022, 1)]);
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.max_count(), 2);
        assert_eq!(hist.count(2019), 0);
    }

    #[test]
    fn empty_histogram() {
        let hist = YearHistogram::from_items(&[]);
        assert!(hist.is_empty());
        assert_eq!(hist.max_count(), 0);
    }
}
