use std::sync::Arc;

use training_core::model::Course;
use training_core::Notice;

use super::{CourseSource, SampleCourseSource};
use crate::notifier::Notifier;

/// Courses obtained at start-up and where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseLoad {
    pub courses: Vec<Course>,
    pub source: &'static str,
    pub used_fallback: bool,
}

/// Fetches the course list once, substituting a fallback source when the
/// primary source fails or returns nothing.
#[derive(Clone)]
pub struct CourseLoader {
    primary: Arc<dyn CourseSource>,
    fallback: Option<Arc<dyn CourseSource>>,
}

impl CourseLoader {
    #[must_use]
    pub fn new(primary: Arc<dyn CourseSource>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    #[must_use]
    pub fn with_fallback(mut self, fallback: Arc<dyn CourseSource>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Loader over the built-in sample set only.
    #[must_use]
    pub fn sample() -> Self {
        Self::new(Arc::new(SampleCourseSource))
    }

    /// Load the course list. Never fails: errors are reported through
    /// `notifier` and degrade to the fallback source or an empty list.
    pub async fn load(&self, notifier: &dyn Notifier) -> CourseLoad {
        let reason = match self.primary.fetch_courses().await {
            Ok(courses) if !courses.is_empty() => {
                tracing::info!(
                    source = self.primary.name(),
                    count = courses.len(),
                    "loaded assigned courses"
                );
                return CourseLoad {
                    courses,
                    source: self.primary.name(),
                    used_fallback: false,
                };
            }
            Ok(_) => "no courses are assigned yet".to_owned(),
            Err(err) => {
                tracing::warn!(source = self.primary.name(), error = %err, "course fetch failed");
                format!("the course service is unavailable ({err})")
            }
        };

        let Some(fallback) = &self.fallback else {
            notifier.notify(&Notice::error("Could not load courses", capitalize(&reason)));
            return CourseLoad {
                courses: Vec::new(),
                source: self.primary.name(),
                used_fallback: false,
            };
        };

        match fallback.fetch_courses().await {
            Ok(courses) => {
                tracing::info!(
                    source = fallback.name(),
                    count = courses.len(),
                    "using fallback courses"
                );
                notifier.notify(&Notice::info(
                    "Showing sample courses",
                    format!("Sample training is shown because {reason}."),
                ));
                CourseLoad {
                    courses,
                    source: fallback.name(),
                    used_fallback: true,
                }
            }
            Err(err) => {
                tracing::warn!(source = fallback.name(), error = %err, "fallback fetch failed");
                notifier.notify(&Notice::error("Could not load courses", err.to_string()));
                CourseLoad {
                    courses: Vec::new(),
                    source: fallback.name(),
                    used_fallback: true,
                }
            }
        }
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
