//! Certificate eligibility and the download stub.

use thiserror::Error;

use crate::model::{Course, CourseId};
use crate::notice::Notice;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CertificateError {
    #[error("course {0} is not complete; no certificate is available yet")]
    NotEligible(CourseId),
}

/// True when the course has at least one video and every video is completed.
#[must_use]
pub fn all_videos_completed(course: &Course) -> bool {
    !course.videos().is_empty() && course.videos().iter().all(|v| v.is_completed())
}

/// Eligibility is derived from the video flags on every call, never cached.
#[must_use]
pub fn certificate_available(course: &Course) -> bool {
    all_videos_completed(course)
}

/// Request a certificate download for `course`.
///
/// No artifact is produced; an eligible course yields the notice to show.
///
/// # Errors
///
/// Returns `CertificateError::NotEligible` when some video is still open.
pub fn request_certificate(course: &Course) -> Result<Notice, CertificateError> {
    if !certificate_available(course) {
        return Err(CertificateError::NotEligible(course.id()));
    }
    Ok(Notice::success(
        "Certificate download started",
        format!("Your certificate for \"{}\" is being prepared.", course.title()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Video, VideoId};
    use crate::notice::NoticeKind;

    fn course(flags: &[bool]) -> Course {
        let videos = flags
            .iter()
            .enumerate()
            .map(|(i, done)| {
                Video::new(VideoId::new(i as u64 + 1), format!("v{i}"), 30, Vec::new())
                    .unwrap()
                    .with_completed(*done)
            })
            .collect();
        Course::new(CourseId::new(3), "Passwords", "", None, videos).unwrap()
    }

    #[test]
    fn eligible_only_when_every_video_done() {
        assert!(certificate_available(&course(&[true, true])));
        assert!(!certificate_available(&course(&[true, false])));
        assert!(!certificate_available(&course(&[])));
    }

    #[test]
    fn request_for_incomplete_course_is_refused() {
        let err = request_certificate(&course(&[false])).unwrap_err();
        assert_eq!(err, CertificateError::NotEligible(CourseId::new(3)));
    }

    #[test]
    fn request_for_complete_course_yields_success_notice() {
        let notice = request_certificate(&course(&[true])).unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert!(notice.message.contains("Passwords"));
    }
}
