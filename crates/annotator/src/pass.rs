use crate::inject::{inject_if_absent, InjectOutcome};
use crate::matcher::match_rows;
use crate::page::{AnnotationBuilder, CurriculumPage};
use lecture_dates_curriculum::{CurriculumItem, DateFormatter};
use serde::Serialize;

/// Summary of one snapshot → match → inject pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub reason: String,
    pub rows: usize,
    pub matched: usize,
    pub injected: usize,
    pub already_marked: usize,
    pub missing_created: usize,
    pub no_anchor: usize,
}

impl PassReport {
    fn record(&mut self, outcome: InjectOutcome) {
        match outcome {
            InjectOutcome::Injected => self.injected += 1,
            InjectOutcome::AlreadyMarked => self.already_marked += 1,
            InjectOutcome::MissingCreated => self.missing_created += 1,
            InjectOutcome::NoAnchor => self.no_anchor += 1,
        }
    }
}

/// Runs one full annotation pass against the current page state.
///
/// `items` is the filtered, visually ordered curriculum held for the page's
/// lifetime. The only state read back from the page is the injection
/// marker, so running this any number of times is safe.
pub fn run_pass<P, B, D>(
    page: &mut P,
    items: &[CurriculumItem],
    builder: &B,
    formatter: &D,
    reason: &str,
) -> PassReport
where
    P: CurriculumPage + ?Sized,
    B: AnnotationBuilder<Fragment = P::Fragment> + ?Sized,
    D: DateFormatter + ?Sized,
{
    let rows = page.snapshot_rows();
    let pairs = match_rows(&rows, items);

    let mut report = PassReport {
        reason: reason.to_string(),
        rows: rows.len(),
        matched: pairs.len(),
        ..PassReport::default()
    };
    for pair in &pairs {
        report.record(inject_if_absent(page, builder, formatter, pair));
    }

    log::debug!(
        "annotation pass ({}): rows={} matched={} injected={}",
        report.reason,
        report.rows,
        report.matched,
        report.injected
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{MemoryPage, TextBuilder};
    use lecture_dates_curriculum::{filter_content_items, ItemClass, MonthYearFormatter};
    use pretty_assertions::assert_eq;

    fn item(
        class: ItemClass,
        id: u64,
        title: &str,
        created: &str,
        sort_order: f64,
    ) -> CurriculumItem {
        CurriculumItem {
            class,
            id,
            title: title.to_string(),
            created: Some(created.to_string()),
            sort_order,
        }
    }

    #[test]
    fn two_lectures_get_their_dates_in_row_order() {
        let items = vec![
            item(ItemClass::Lecture, 1, "Introduction", "2023-01-01T00:00:00Z", 10.0),
            item(ItemClass::Lecture, 2, "Model Measurements", "2023-02-01T00:00:00Z", 5.0),
        ];
        let mut page = MemoryPage::with_titles(["Introduction", "Model Measurements"]);

        let report = run_pass(&mut page, &items, &TextBuilder, &MonthYearFormatter, "test");

        assert_eq!(report.injected, 2);
        let annotations: Vec<Vec<String>> =
            page.rows().iter().map(|r| r.annotations.clone()).collect();
        assert_eq!(
            annotations,
            vec![
                vec!["Created 1/2023".to_string()],
                vec!["Created 2/2023".to_string()]
            ]
        );
    }

    #[test]
    fn chapter_is_filtered_before_matching() {
        let raw = vec![
            item(ItemClass::Chapter, 1, "Chapter 1", "2022-01-01T00:00:00Z", 20.0),
            item(ItemClass::Lecture, 2, "Lecture 1", "2022-03-01T00:00:00Z", 10.0),
        ];
        let items = filter_content_items(&raw);
        let mut page = MemoryPage::with_titles(["Lecture 1"]);

        let report = run_pass(&mut page, &items, &TextBuilder, &MonthYearFormatter, "test");

        assert_eq!(report.matched, 1);
        assert_eq!(page.rows()[0].annotations, vec!["Created 3/2022".to_string()]);
    }

    #[test]
    fn repeated_passes_inject_once_per_row() {
        let items = vec![
            item(ItemClass::Lecture, 1, "A", "2020-01-01T00:00:00Z", 2.0),
            item(ItemClass::Lecture, 2, "B", "2021-01-01T00:00:00Z", 1.0),
        ];
        let mut page = MemoryPage::with_titles(["A", "B"]);

        run_pass(&mut page, &items, &TextBuilder, &MonthYearFormatter, "first");
        let second = run_pass(&mut page, &items, &TextBuilder, &MonthYearFormatter, "second");

        assert_eq!(second.matched, 2);
        assert_eq!(second.injected, 0);
        assert_eq!(second.already_marked, 2);
        assert!(page.rows().iter().all(|r| r.annotations.len() == 1));
    }

    #[test]
    fn matched_item_without_date_still_advances_cursor() {
        let mut undated = item(ItemClass::Lecture, 1, "A", "", 3.0);
        undated.created = None;
        let items = vec![
            undated,
            item(ItemClass::Lecture, 2, "B", "2021-05-01T00:00:00Z", 2.0),
        ];
        let mut page = MemoryPage::with_titles(["A", "B"]);

        let report = run_pass(&mut page, &items, &TextBuilder, &MonthYearFormatter, "test");

        assert_eq!(report.matched, 2);
        assert_eq!(report.missing_created, 1);
        assert_eq!(report.injected, 1);
        assert!(page.rows()[0].annotations.is_empty());
        assert_eq!(page.rows()[1].annotations, vec!["Created 5/2021".to_string()]);
    }
}
