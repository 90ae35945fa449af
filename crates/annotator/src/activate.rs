use crate::course_id::extract_course_id;
use crate::driver::{DriverConfig, DriverHandle, LectureDateDriver};
use crate::inject::{inject_course_created, InjectOutcome};
use crate::page::{AnnotationBuilder, CurriculumPage, MutationRecord};
use lecture_dates_curriculum::{
    filter_content_items, CurriculumItem, CurriculumSource, DateFormatter,
};
use log::{debug, info, warn};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Result of trying to switch the lecture-date feature on for a page view.
pub enum Activation {
    /// The page carries no course id.
    Inactive,
    /// The curriculum could not be fetched; the page stays unannotated.
    Aborted,
    Active(DriverHandle),
}

impl Activation {
    pub fn handle(&self) -> Option<&DriverHandle> {
        match self {
            Self::Active(handle) => Some(handle),
            Self::Inactive | Self::Aborted => None,
        }
    }
}

/// Everything needed to annotate one kind of page, minus the page itself.
pub struct LectureDateFeature<S, B, D> {
    source: S,
    builder: B,
    formatter: D,
    config: DriverConfig,
}

impl<S, B, D> LectureDateFeature<S, B, D>
where
    S: CurriculumSource,
    B: AnnotationBuilder + Clone + Send + 'static,
    D: DateFormatter + Clone + Send + 'static,
{
    pub const fn new(source: S, builder: B, formatter: D, config: DriverConfig) -> Self {
        Self {
            source,
            builder,
            formatter,
            config,
        }
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Fetches the curriculum once and arms the reactive driver, which
    /// annotates the rows and the year histogram as they render.
    ///
    /// A failed fetch is logged and abandons the feature for this page view;
    /// it is not retried.
    pub async fn activate<P>(
        &self,
        markup: &str,
        page: Arc<Mutex<P>>,
        mutations: mpsc::Receiver<MutationRecord>,
    ) -> Activation
    where
        P: CurriculumPage<Fragment = B::Fragment> + Send + 'static,
    {
        let Some(course_id) = extract_course_id(markup) else {
            debug!("No course id on page; lecture dates stay off");
            return Activation::Inactive;
        };

        let items = match self.source.fetch_curriculum_items(course_id).await {
            Ok(items) => items,
            Err(err) => {
                warn!("Failed to fetch curriculum for course {course_id}: {err}");
                return Activation::Aborted;
            }
        };
        let items: Arc<[CurriculumItem]> = filter_content_items(&items).into();

        info!(
            "Lecture dates active for course {course_id} ({} content items)",
            items.len()
        );
        Activation::Active(LectureDateDriver::start(
            page,
            items,
            self.builder.clone(),
            self.formatter.clone(),
            mutations,
            self.config,
        ))
    }

    /// Adds the course "Created" badge on a course landing page.
    ///
    /// Returns `None` when the page has no course id or the fetch failed.
    pub async fn annotate_course<P>(&self, markup: &str, page: &Mutex<P>) -> Option<InjectOutcome>
    where
        P: CurriculumPage<Fragment = B::Fragment>,
    {
        let course_id = extract_course_id(markup)?;
        let course = match self.source.fetch_course_info(course_id).await {
            Ok(course) => course,
            Err(err) => {
                warn!("Failed to fetch course {course_id}: {err}");
                return None;
            }
        };
        let Ok(mut guard) = page.lock() else {
            warn!("Page lock poisoned; skipping course badge");
            return None;
        };
        Some(inject_course_created(
            &mut *guard,
            &self.builder,
            &self.formatter,
            &course,
        ))
    }
}
