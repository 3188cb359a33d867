use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::model::ids::{CourseId, VideoId};
use crate::model::video::Video;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CourseError {
    #[error("course {0} title cannot be empty")]
    EmptyTitle(CourseId),

    #[error("course {course} lists video {video} more than once")]
    DuplicateVideo { course: CourseId, video: VideoId },

    #[error("course {course} has no video {video}")]
    UnknownVideo { course: CourseId, video: VideoId },
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Coarse status shown next to a course in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseStatus {
    NotStarted,
    InProgress,
    Completed,
    Overdue,
}

impl CourseStatus {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CourseStatus::NotStarted => "not started",
            CourseStatus::InProgress => "in progress",
            CourseStatus::Completed => "completed",
            CourseStatus::Overdue => "overdue",
        }
    }
}

//
// ─── COURSE ────────────────────────────────────────────────────────────────────
//

/// A training course assigned to an employee.
///
/// `progress`, `completed` and `certificate_available` are derived from the
/// video completion flags and are recomputed together whenever a flag flips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    id: CourseId,
    title: String,
    description: String,
    due_date: Option<NaiveDate>,
    videos: Vec<Video>,
    progress: u8,
    completed: bool,
    certificate_available: bool,
}

impl Course {
    /// Creates a course and derives its aggregate fields from `videos`.
    ///
    /// # Errors
    ///
    /// Returns `CourseError` if the title is blank or video ids repeat.
    pub fn new(
        id: CourseId,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<NaiveDate>,
        videos: Vec<Video>,
    ) -> Result<Self, CourseError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(CourseError::EmptyTitle(id));
        }

        let mut seen = HashSet::with_capacity(videos.len());
        for video in &videos {
            if !seen.insert(video.id()) {
                return Err(CourseError::DuplicateVideo {
                    course: id,
                    video: video.id(),
                });
            }
        }

        let mut course = Self {
            id,
            title,
            description: description.into(),
            due_date,
            videos,
            progress: 0,
            completed: false,
            certificate_available: false,
        };
        course.recompute();
        Ok(course)
    }

    /// Returns a copy of this course with `video` marked completed and the
    /// aggregate fields recomputed. Completing an already completed video is
    /// a no-op on the copy.
    ///
    /// # Errors
    ///
    /// Returns `CourseError::UnknownVideo` if the course has no such video.
    pub fn with_video_completed(&self, video: VideoId) -> Result<Self, CourseError> {
        let mut next = self.clone();
        let target = next
            .videos
            .iter_mut()
            .find(|v| v.id() == video)
            .ok_or(CourseError::UnknownVideo {
                course: self.id,
                video,
            })?;
        target.mark_completed();
        next.recompute();
        Ok(next)
    }

    fn recompute(&mut self) {
        let total = self.videos.len();
        let done = self.completed_video_count();
        self.progress = percent_rounded(done, total);
        self.completed = total > 0 && done == total;
        self.certificate_available = crate::certificate::certificate_available(self);
    }

    #[must_use]
    pub fn id(&self) -> CourseId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    #[must_use]
    pub fn videos(&self) -> &[Video] {
        &self.videos
    }

    #[must_use]
    pub fn video(&self, id: VideoId) -> Option<&Video> {
        self.videos.iter().find(|v| v.id() == id)
    }

    #[must_use]
    pub fn total_videos(&self) -> usize {
        self.videos.len()
    }

    #[must_use]
    pub fn completed_video_count(&self) -> usize {
        self.videos.iter().filter(|v| v.is_completed()).count()
    }

    /// Percentage of completed videos, 0-100.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn certificate_available(&self) -> bool {
        self.certificate_available
    }

    /// First video not yet completed, in course order.
    #[must_use]
    pub fn next_video(&self) -> Option<&Video> {
        self.videos.iter().find(|v| !v.is_completed())
    }

    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }

    #[must_use]
    pub fn status(&self, today: NaiveDate) -> CourseStatus {
        if self.completed {
            CourseStatus::Completed
        } else if self.is_overdue(today) {
            CourseStatus::Overdue
        } else if self.progress == 0 {
            CourseStatus::NotStarted
        } else {
            CourseStatus::InProgress
        }
    }
}

/// `round(100 * part / whole)` with halves rounded up. Zero `whole` yields 0.
#[must_use]
pub fn percent_rounded(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole);
    let rounded = (200 * part + whole) / (2 * whole);
    u8::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(id: u64) -> Video {
        Video::new(VideoId::new(id), format!("Video {id}"), 60, Vec::new()).unwrap()
    }

    fn course(videos: Vec<Video>) -> Course {
        Course::new(CourseId::new(1), "Phishing 101", "Basics", None, videos).unwrap()
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent_rounded(1, 2), 50);
        assert_eq!(percent_rounded(1, 3), 33);
        assert_eq!(percent_rounded(2, 3), 67);
        assert_eq!(percent_rounded(1, 8), 13);
        assert_eq!(percent_rounded(3, 3), 100);
        assert_eq!(percent_rounded(0, 0), 0);
    }

    #[test]
    fn derived_fields_follow_video_flags() {
        let c = course(vec![video(1), video(2).with_completed(true)]);
        assert_eq!(c.progress(), 50);
        assert!(!c.is_completed());
        assert!(!c.certificate_available());
    }

    #[test]
    fn completing_last_video_completes_course() {
        let c = course(vec![video(1), video(2).with_completed(true)]);
        let next = c.with_video_completed(VideoId::new(1)).unwrap();
        assert_eq!(next.progress(), 100);
        assert!(next.is_completed());
        assert!(next.certificate_available());
        // the original is untouched
        assert_eq!(c.progress(), 50);
        assert!(!c.video(VideoId::new(1)).unwrap().is_completed());
    }

    #[test]
    fn completing_unknown_video_fails() {
        let c = course(vec![video(1)]);
        let err = c.with_video_completed(VideoId::new(9)).unwrap_err();
        assert_eq!(
            err,
            CourseError::UnknownVideo {
                course: CourseId::new(1),
                video: VideoId::new(9)
            }
        );
    }

    #[test]
    fn empty_course_is_never_complete() {
        let c = course(Vec::new());
        assert_eq!(c.progress(), 0);
        assert!(!c.is_completed());
        assert!(!c.certificate_available());
    }

    #[test]
    fn duplicate_video_ids_are_rejected() {
        let err = Course::new(CourseId::new(1), "T", "", None, vec![video(1), video(1)]).unwrap_err();
        assert!(matches!(err, CourseError::DuplicateVideo { .. }));
    }

    #[test]
    fn status_reflects_progress_and_due_date() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let past = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        let fresh = course(vec![video(1), video(2)]);
        assert_eq!(fresh.status(today), CourseStatus::NotStarted);

        let started = fresh.with_video_completed(VideoId::new(1)).unwrap();
        assert_eq!(started.status(today), CourseStatus::InProgress);

        let late = Course::new(CourseId::new(2), "Late", "", Some(past), vec![video(1)]).unwrap();
        assert_eq!(late.status(today), CourseStatus::Overdue);

        let done = late.with_video_completed(VideoId::new(1)).unwrap();
        assert_eq!(done.status(today), CourseStatus::Completed);
    }
}
