use crate::Result;
use serde::{Deserialize, Serialize};

/// Kind of curriculum entry as reported by the API's `_class` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    Chapter,
    Lecture,
    Quiz,
    Practice,
    Asset,
}

impl ItemClass {
    pub const ALL: [Self; 5] = [
        Self::Chapter,
        Self::Lecture,
        Self::Quiz,
        Self::Practice,
        Self::Asset,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chapter => "chapter",
            Self::Lecture => "lecture",
            Self::Quiz => "quiz",
            Self::Practice => "practice",
            Self::Asset => "asset",
        }
    }
}

/// One row-level entity of a course outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurriculumItem {
    #[serde(rename = "_class")]
    pub class: ItemClass,
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// ISO-8601 creation timestamp; absent for some item kinds.
    #[serde(default)]
    pub created: Option<String>,
    /// Higher values render earlier on the page.
    #[serde(default)]
    pub sort_order: f64,
}

impl CurriculumItem {
    /// Creation timestamp, treating an empty string as absent.
    pub fn created(&self) -> Option<&str> {
        self.created.as_deref().filter(|c| !c.trim().is_empty())
    }
}

/// Course-level metadata shown next to "Last updated".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub id: u64,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_update_date: Option<String>,
}

/// Sorts into visual top-to-bottom order (descending `sort_order`).
///
/// The sort is stable, so items sharing a `sort_order` keep API order.
pub fn sort_descending(items: &mut [CurriculumItem]) {
    items.sort_by(|a, b| b.sort_order.total_cmp(&a.sort_order));
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemsDocument {
    List(Vec<CurriculumItem>),
    Page { results: Vec<CurriculumItem> },
}

/// Parses a stored curriculum listing: either a bare JSON array of items or
/// a single API page object with a `results` array. Order is preserved.
pub fn parse_items_json(raw: &str) -> Result<Vec<CurriculumItem>> {
    let doc: ItemsDocument = serde_json::from_str(raw)?;
    Ok(match doc {
        ItemsDocument::List(items) | ItemsDocument::Page { results: items } => items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_api_shape() {
        let raw = r#"{
            "_class": "lecture",
            "id": 42,
            "title": "Introduction",
            "created": "2023-01-01T00:00:00Z",
            "sort_order": 10
        }"#;
        let item: CurriculumItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.class, ItemClass::Lecture);
        assert_eq!(item.id, 42);
        assert_eq!(item.created(), Some("2023-01-01T00:00:00Z"));
        assert_eq!(item.sort_order, 10.0);
    }

    #[test]
    fn empty_created_counts_as_absent() {
        let raw = r#"{"_class": "quiz", "id": 1, "title": "Q", "created": ""}"#;
        let item: CurriculumItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.created(), None);
    }

    #[test]
    fn unknown_class_is_rejected() {
        let raw = r#"[{"_class": "banner", "id": 1, "title": "x"}]"#;
        assert!(parse_items_json(raw).is_err());
    }

    #[test]
    fn parses_page_document() {
        let raw = r#"{"count": 1, "next": null, "results": [
            {"_class": "chapter", "id": 7, "title": "Chapter 1", "sort_order": 20}
        ]}"#;
        let items = parse_items_json(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].class, ItemClass::Chapter);
    }

    #[test]
    fn sort_descending_is_stable() {
        let mk = |id, sort_order| CurriculumItem {
            class: ItemClass::Lecture,
            id,
            title: String::new(),
            created: None,
            sort_order,
        };
        let mut items = vec![mk(1, 5.0), mk(2, 10.0), mk(3, 5.0), mk(4, 1.0)];
        sort_descending(&mut items);
        let ids: Vec<u64> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }
}
