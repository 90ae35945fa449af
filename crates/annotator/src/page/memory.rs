use super::{
    AnnotationBuilder, CurriculumPage, DomRow, MutationKind, MutationRecord, PageMarker,
};
use lecture_dates_curriculum::YearHistogram;
use serde::Serialize;
use std::collections::HashSet;
use tokio::sync::mpsc;

const OBSERVER_CAPACITY: usize = 1024;

/// Stable handle to a row of a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RowId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryAnchor {
    Row(RowId),
    Course,
    Histogram,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemoryRow {
    pub id: RowId,
    pub title: String,
    pub marked: bool,
    pub annotations: Vec<String>,
    #[serde(skip)]
    has_anchor: bool,
}

/// In-process page model with text fragments.
///
/// Structural edits, attribute writes and title edits are reported to the
/// observer registered with [`MemoryPage::observe`], mirroring what a
/// mutation observer on a real document would see.
#[derive(Debug, Default)]
pub struct MemoryPage {
    rows: Vec<MemoryRow>,
    next_id: usize,
    course_anchor: bool,
    histogram_anchor: bool,
    course_annotations: Vec<String>,
    histogram_annotations: Vec<String>,
    page_markers: HashSet<PageMarker>,
    observer: Option<mpsc::Sender<MutationRecord>>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self {
            course_anchor: true,
            histogram_anchor: true,
            ..Self::default()
        }
    }

    pub fn with_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut page = Self::new();
        for title in titles {
            page.push_row(title);
        }
        page
    }

    /// Registers the (single) mutation observer, replacing any previous one.
    pub fn observe(&mut self) -> mpsc::Receiver<MutationRecord> {
        let (tx, rx) = mpsc::channel(OBSERVER_CAPACITY);
        self.observer = Some(tx);
        rx
    }

    pub fn push_row(&mut self, title: impl Into<String>) -> RowId {
        let index = self.rows.len();
        self.insert_row(index, title)
    }

    /// Inserts before `index`; indexes past the end append.
    pub fn insert_row(&mut self, index: usize, title: impl Into<String>) -> RowId {
        self.insert_row_inner(index, title.into(), true)
    }

    /// A row whose markup lacks the annotation target.
    pub fn push_row_without_anchor(&mut self, title: impl Into<String>) -> RowId {
        let index = self.rows.len();
        self.insert_row_inner(index, title.into(), false)
    }

    fn insert_row_inner(&mut self, index: usize, title: String, has_anchor: bool) -> RowId {
        let id = RowId(self.next_id);
        self.next_id += 1;
        let index = index.min(self.rows.len());
        self.rows.insert(
            index,
            MemoryRow {
                id,
                title,
                marked: false,
                annotations: Vec::new(),
                has_anchor,
            },
        );
        self.notify(MutationKind::ChildList);
        id
    }

    pub fn remove_row(&mut self, id: RowId) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.id != id);
        let removed = self.rows.len() != before;
        if removed {
            self.notify(MutationKind::ChildList);
        }
        removed
    }

    pub fn set_title(&mut self, id: RowId, title: impl Into<String>) {
        if let Some(row) = self.row_mut(id) {
            row.title = title.into();
            self.notify(MutationKind::CharacterData);
        }
    }

    pub fn set_course_anchor(&mut self, present: bool) {
        self.course_anchor = present;
    }

    pub fn set_histogram_anchor(&mut self, present: bool) {
        self.histogram_anchor = present;
    }

    pub fn rows(&self) -> &[MemoryRow] {
        &self.rows
    }

    pub fn row(&self, id: RowId) -> Option<&MemoryRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn annotations(&self, id: RowId) -> &[String] {
        self.row(id)
            .map(|row| row.annotations.as_slice())
            .unwrap_or_default()
    }

    pub fn course_annotations(&self) -> &[String] {
        &self.course_annotations
    }

    pub fn histogram_annotations(&self) -> &[String] {
        &self.histogram_annotations
    }

    fn row_mut(&mut self, id: RowId) -> Option<&mut MemoryRow> {
        self.rows.iter_mut().find(|row| row.id == id)
    }

    fn notify(&self, kind: MutationKind) {
        if let Some(tx) = &self.observer {
            // Full queue: a pass is already pending and will see this change.
            let _ = tx.try_send(MutationRecord { kind });
        }
    }
}

impl CurriculumPage for MemoryPage {
    type Element = RowId;
    type Anchor = MemoryAnchor;
    type Fragment = String;

    fn snapshot_rows(&self) -> Vec<DomRow<RowId>> {
        self.rows
            .iter()
            .map(|row| DomRow {
                element: row.id,
                title: row.title.clone(),
            })
            .collect()
    }

    fn resolve_anchor(&self, element: &RowId) -> Option<MemoryAnchor> {
        self.row(*element)
            .filter(|row| row.has_anchor)
            .map(|row| MemoryAnchor::Row(row.id))
    }

    fn append(&mut self, anchor: &MemoryAnchor, fragment: String) {
        match anchor {
            MemoryAnchor::Row(id) => {
                let Some(row) = self.row_mut(*id) else {
                    return;
                };
                row.annotations.push(fragment);
            }
            MemoryAnchor::Course => self.course_annotations.push(fragment),
            MemoryAnchor::Histogram => self.histogram_annotations.push(fragment),
        }
        self.notify(MutationKind::ChildList);
    }

    fn has_marker(&self, element: &RowId) -> bool {
        self.row(*element).is_some_and(|row| row.marked)
    }

    fn set_marker(&mut self, element: &RowId) {
        if let Some(row) = self.row_mut(*element) {
            row.marked = true;
            self.notify(MutationKind::Attributes);
        }
    }

    fn course_anchor(&self) -> Option<MemoryAnchor> {
        self.course_anchor.then_some(MemoryAnchor::Course)
    }

    fn histogram_anchor(&self) -> Option<MemoryAnchor> {
        self.histogram_anchor.then_some(MemoryAnchor::Histogram)
    }

    fn has_page_marker(&self, marker: PageMarker) -> bool {
        self.page_markers.contains(&marker)
    }

    fn set_page_marker(&mut self, marker: PageMarker) {
        if self.page_markers.insert(marker) {
            self.notify(MutationKind::Attributes);
        }
    }
}

/// Plain-text fragments for [`MemoryPage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TextBuilder;

impl AnnotationBuilder for TextBuilder {
    type Fragment = String;

    fn lecture_date(&self, display: &str) -> String {
        format!("Created {display}")
    }

    fn course_created(&self, display: &str) -> String {
        format!("Created {display}")
    }

    fn year_histogram(&self, histogram: &YearHistogram) -> String {
        histogram
            .years()
            .map(|(year, count)| format!("{year}: {count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
