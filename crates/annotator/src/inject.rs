use crate::matcher::MatchedPair;
use crate::page::{AnnotationBuilder, CurriculumPage, PageMarker};
use lecture_dates_curriculum::{CourseInfo, CurriculumItem, DateFormatter, YearHistogram};
use serde::Serialize;

/// What happened to one injection attempt. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectOutcome {
    Injected,
    AlreadyMarked,
    /// The item has no usable `created` timestamp.
    MissingCreated,
    /// The row (or page region) has no node to attach to.
    NoAnchor,
}

/// Writes the lecture date into the matched row unless it is already there.
///
/// Build-then-mark happens inside this one call; the caller holds the page
/// exclusively, so no other pass can observe the row in between.
pub fn inject_if_absent<P, B, D>(
    page: &mut P,
    builder: &B,
    formatter: &D,
    pair: &MatchedPair<'_, P::Element>,
) -> InjectOutcome
where
    P: CurriculumPage + ?Sized,
    B: AnnotationBuilder<Fragment = P::Fragment> + ?Sized,
    D: DateFormatter + ?Sized,
{
    if page.has_marker(&pair.element) {
        return InjectOutcome::AlreadyMarked;
    }
    let Some(display) = display_date(formatter, pair.item) else {
        return InjectOutcome::MissingCreated;
    };
    let Some(anchor) = page.resolve_anchor(&pair.element) else {
        return InjectOutcome::NoAnchor;
    };

    page.append(&anchor, builder.lecture_date(&display));
    page.set_marker(&pair.element);
    InjectOutcome::Injected
}

/// Adds the course "Created" badge next to "Last updated", once per page.
pub fn inject_course_created<P, B, D>(
    page: &mut P,
    builder: &B,
    formatter: &D,
    course: &CourseInfo,
) -> InjectOutcome
where
    P: CurriculumPage + ?Sized,
    B: AnnotationBuilder<Fragment = P::Fragment> + ?Sized,
    D: DateFormatter + ?Sized,
{
    if page.has_page_marker(PageMarker::CourseCreated) {
        return InjectOutcome::AlreadyMarked;
    }
    let Some(display) = course
        .created
        .as_deref()
        .filter(|created| !created.trim().is_empty())
        .and_then(|created| formatter.format_date(created))
    else {
        return InjectOutcome::MissingCreated;
    };
    let Some(anchor) = page.course_anchor() else {
        return InjectOutcome::NoAnchor;
    };

    page.append(&anchor, builder.course_created(&display));
    page.set_page_marker(PageMarker::CourseCreated);
    InjectOutcome::Injected
}

/// Adds the per-year histogram widget, once per page.
///
/// An empty histogram counts as missing dates.
pub fn inject_year_histogram<P, B>(
    page: &mut P,
    builder: &B,
    histogram: &YearHistogram,
) -> InjectOutcome
where
    P: CurriculumPage + ?Sized,
    B: AnnotationBuilder<Fragment = P::Fragment> + ?Sized,
{
    if page.has_page_marker(PageMarker::YearHistogram) {
        return InjectOutcome::AlreadyMarked;
    }
    if histogram.is_empty() {
        return InjectOutcome::MissingCreated;
    }
    let Some(anchor) = page.histogram_anchor() else {
        return InjectOutcome::NoAnchor;
    };

    page.append(&anchor, builder.year_histogram(histogram));
    page.set_page_marker(PageMarker::YearHistogram);
    InjectOutcome::Injected
}

fn display_date<D: DateFormatter + ?Sized>(formatter: &D, item: &CurriculumItem) -> Option<String> {
    formatter.format_date(item.created()?)
}
