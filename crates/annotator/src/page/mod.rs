//! Page abstraction consumed by the matcher, injector and driver.

mod memory;

pub use memory::{MemoryAnchor, MemoryPage, MemoryRow, RowId, TextBuilder};

use lecture_dates_curriculum::YearHistogram;
use serde::Serialize;

/// A rendered curriculum row paired with its visible title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomRow<E> {
    pub element: E,
    pub title: String,
}

/// Page-wide annotations that are written at most once per page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMarker {
    CourseCreated,
    YearHistogram,
}

/// The live page as seen by one annotation pass.
///
/// `Element` is an opaque row handle; its identity must survive across
/// snapshots for the injection marker to mean anything.
pub trait CurriculumPage {
    type Element: Clone + PartialEq + std::fmt::Debug;
    type Anchor;
    type Fragment;

    /// Currently rendered rows, in document order.
    fn snapshot_rows(&self) -> Vec<DomRow<Self::Element>>;

    /// Child node of `element` that annotations are appended to.
    fn resolve_anchor(&self, element: &Self::Element) -> Option<Self::Anchor>;

    fn append(&mut self, anchor: &Self::Anchor, fragment: Self::Fragment);

    fn has_marker(&self, element: &Self::Element) -> bool;

    /// Never undone by this crate.
    fn set_marker(&mut self, element: &Self::Element);

    /// Where the course-level "Created" badge goes (next to "Last updated").
    fn course_anchor(&self) -> Option<Self::Anchor>;

    fn histogram_anchor(&self) -> Option<Self::Anchor>;

    fn has_page_marker(&self, marker: PageMarker) -> bool;

    fn set_page_marker(&mut self, marker: PageMarker);
}

/// Builds the UI fragments written into the page.
pub trait AnnotationBuilder {
    type Fragment;

    fn lecture_date(&self, display: &str) -> Self::Fragment;

    fn course_created(&self, display: &str) -> Self::Fragment;

    fn year_histogram(&self, histogram: &YearHistogram) -> Self::Fragment;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

/// One observed change to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationRecord {
    pub kind: MutationKind,
}

impl MutationRecord {
    pub const fn child_list() -> Self {
        Self {
            kind: MutationKind::ChildList,
        }
    }

    /// Only structural changes can add or remove rows.
    pub const fn is_structural(&self) -> bool {
        matches!(self.kind, MutationKind::ChildList)
    }
}
