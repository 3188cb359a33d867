use chrono::NaiveDate;

use crate::model::{Course, CourseStatus};

/// Aggregate figures for the employee's training landing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrainingOverview {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub overdue: usize,
    pub certificates_available: usize,
    pub average_progress: u8,
}

impl TrainingOverview {
    #[must_use]
    pub fn from_courses(courses: &[Course], today: NaiveDate) -> Self {
        let mut overview = Self {
            total: courses.len(),
            ..Self::default()
        };

        let mut progress_sum = 0_usize;
        for course in courses {
            progress_sum += usize::from(course.progress());
            if course.certificate_available() {
                overview.certificates_available += 1;
            }
            match course.status(today) {
                CourseStatus::Completed => overview.completed += 1,
                CourseStatus::InProgress => overview.in_progress += 1,
                CourseStatus::NotStarted => overview.not_started += 1,
                CourseStatus::Overdue => overview.overdue += 1,
            }
        }

        if !courses.is_empty() {
            let n = courses.len();
            let avg = (2 * progress_sum + n) / (2 * n);
            overview.average_progress = u8::try_from(avg).unwrap_or(100);
        }
        overview
    }
}
