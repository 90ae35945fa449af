use async_trait::async_trait;
use lecture_dates_annotator::{
    Activation, DriverConfig, InjectOutcome, LectureDateFeature, MemoryPage, TextBuilder,
};
use lecture_dates_curriculum::{
    CourseInfo, CurriculumItem, CurriculumSource, ItemClass, MonthYearFormatter,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const COURSE_PAGE: &str = r#"<body data-clp-course-id="4471964"><div class="last-update">Last updated 3/2024</div></body>"#;

#[derive(thiserror::Error, Debug)]
#[error("{0}")]
struct FakeError(&'static str);

#[derive(Default)]
struct FakeSource {
    fail: bool,
    calls: AtomicUsize,
}

#[async_trait]
impl CurriculumSource for FakeSource {
    type Error = FakeError;

    async fn fetch_curriculum_items(
        &self,
        course_id: u64,
    ) -> Result<Vec<CurriculumItem>, FakeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(course_id, 4_471_964);
        if self.fail {
            return Err(FakeError("connection reset"));
        }
        Ok(vec![
            item(ItemClass::Chapter, 1, "Chapter 1", Some("2020-01-01T00:00:00Z"), 20.0),
            item(ItemClass::Lecture, 2, "Lecture 1", Some("2021-04-01T00:00:00Z"), 10.0),
            item(ItemClass::Quiz, 3, "Quiz 1", None, 5.0),
        ])
    }

    async fn fetch_course_info(&self, course_id: u64) -> Result<CourseInfo, FakeError> {
        if self.fail {
            return Err(FakeError("connection reset"));
        }
        Ok(CourseInfo {
            id: course_id,
            created: Some("2019-09-12T08:00:00Z".to_string()),
            last_update_date: Some("2024-03-01".to_string()),
        })
    }
}

fn item(
    class: ItemClass,
    id: u64,
    title: &str,
    created: Option<&str>,
    sort_order: f64,
) -> CurriculumItem {
    CurriculumItem {
        class,
        id,
        title: title.to_string(),
        created: created.map(str::to_string),
        sort_order,
    }
}

fn feature(fail: bool) -> LectureDateFeature<FakeSource, TextBuilder, MonthYearFormatter> {
    LectureDateFeature::new(
        FakeSource {
            fail,
            ..FakeSource::default()
        },
        TextBuilder,
        MonthYearFormatter,
        DriverConfig::default(),
    )
}

#[tokio::test(start_paused = true)]
async fn activates_and_annotates_after_chapter_filtering() {
    let mut memory = MemoryPage::with_titles(["Lecture 1", "Quiz 1"]);
    let mutations = memory.observe();
    let page = Arc::new(Mutex::new(memory));

    let activation = feature(false).activate(COURSE_PAGE, page.clone(), mutations).await;
    assert!(activation.handle().is_some());
    tokio::time::sleep(Duration::from_millis(1)).await;

    let guard = page.lock().unwrap();
    assert_eq!(guard.rows()[0].annotations, vec!["Created 4/2021".to_string()]);
    assert!(guard.rows()[1].annotations.is_empty());
    assert_eq!(guard.histogram_annotations(), ["2021: 1".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn histogram_follows_curriculum_rendered_after_activation() {
    let mut memory = MemoryPage::new();
    memory.set_histogram_anchor(false);
    let mutations = memory.observe();
    let page = Arc::new(Mutex::new(memory));

    let activation = feature(false).activate(COURSE_PAGE, page.clone(), mutations).await;
    let handle = activation.handle().expect("active").clone();
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert!(page.lock().unwrap().histogram_annotations().is_empty());
    assert_eq!(handle.latest_report().map(|r| r.reason), Some("startup".to_string()));

    {
        let mut guard = page.lock().unwrap();
        guard.set_histogram_anchor(true);
        guard.push_row("Lecture 1");
    }
    tokio::time::sleep(Duration::from_secs(1)).await;

    let guard = page.lock().unwrap();
    assert_eq!(guard.rows()[0].annotations, vec!["Created 4/2021".to_string()]);
    assert_eq!(guard.histogram_annotations(), ["2021: 1".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn page_without_course_id_stays_inactive() {
    let mut memory = MemoryPage::with_titles(["Lecture 1"]);
    let mutations = memory.observe();
    let page = Arc::new(Mutex::new(memory));
    let feature = feature(false);

    let activation = feature
        .activate("<html>home</html>", page.clone(), mutations)
        .await;

    assert!(matches!(activation, Activation::Inactive));
    assert_eq!(feature_calls(&feature), 0);
    assert!(page.lock().unwrap().rows()[0].annotations.is_empty());
}

#[tokio::test(start_paused = true)]
async fn fetch_failure_aborts_without_touching_page() {
    let mut memory = MemoryPage::with_titles(["Lecture 1"]);
    let mutations = memory.observe();
    let page = Arc::new(Mutex::new(memory));

    let activation = feature(true).activate(COURSE_PAGE, page.clone(), mutations).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    assert!(matches!(activation, Activation::Aborted));
    let guard = page.lock().unwrap();
    assert!(guard.rows()[0].annotations.is_empty());
    assert!(guard.histogram_annotations().is_empty());
}

#[tokio::test]
async fn course_badge_is_added_once() {
    let page = Mutex::new(MemoryPage::new());
    let feature = feature(false);

    let first = feature.annotate_course(COURSE_PAGE, &page).await;
    let second = feature.annotate_course(COURSE_PAGE, &page).await;

    assert_eq!(first, Some(InjectOutcome::Injected));
    assert_eq!(second, Some(InjectOutcome::AlreadyMarked));
    assert_eq!(
        page.lock().unwrap().course_annotations(),
        ["Created 9/2019".to_string()]
    );
}

#[tokio::test]
async fn course_badge_skipped_on_fetch_failure() {
    let page = Mutex::new(MemoryPage::new());
    assert_eq!(feature(true).annotate_course(COURSE_PAGE, &page).await, None);
    assert!(page.lock().unwrap().course_annotations().is_empty());
}

fn feature_calls(
    feature: &LectureDateFeature<FakeSource, TextBuilder, MonthYearFormatter>,
) -> usize {
    feature.source().calls.load(Ordering::SeqCst)
}
