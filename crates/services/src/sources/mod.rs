mod loader;
mod remote;
mod sample;

use async_trait::async_trait;
use training_core::model::Course;

use crate::error::CourseSourceError;

pub use loader::{CourseLoad, CourseLoader};
pub use remote::{RemoteCourseSource, RemoteSourceConfig};
pub use sample::{SampleCourseSource, sample_courses};

/// Capability for fetching the current user's assigned courses.
#[async_trait]
pub trait CourseSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Fetch the ordered course list.
    ///
    /// # Errors
    ///
    /// Returns `CourseSourceError` if the list cannot be fetched or decoded.
    async fn fetch_courses(&self) -> Result<Vec<Course>, CourseSourceError>;
}
