use crate::{CourseInfo, CurriculumItem};
use async_trait::async_trait;

/// Where curriculum data comes from.
///
/// Implementations return every page merged and already sorted by
/// descending `sort_order`; consumers rely on that order and never re-sort.
#[async_trait]
pub trait CurriculumSource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_curriculum_items(&self, course_id: u64)
        -> Result<Vec<CurriculumItem>, Self::Error>;

    async fn fetch_course_info(&self, course_id: u64) -> Result<CourseInfo, Self::Error>;
}
