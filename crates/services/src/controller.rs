use std::fmt;
use std::sync::Arc;

use training_core::Clock;
use training_core::Notice;
use training_core::certificate::request_certificate;
use training_core::model::{Course, CourseId, OptionId, QuestionId, VideoId};
use training_core::overview::TrainingOverview;
use training_core::progress::{Effect, Event, ProgressState, TransitionError};

use crate::error::CertificateRequestError;
use crate::notifier::Notifier;
use crate::sources::{CourseLoad, CourseLoader};

/// Owns the employee's course list and routes user actions through the
/// progress state machine.
///
/// Blocked actions are reported to the notifier and returned as errors; the
/// current state is kept unchanged in that case.
pub struct CourseProgressController {
    clock: Clock,
    notifier: Arc<dyn Notifier>,
    state: ProgressState,
}

impl CourseProgressController {
    #[must_use]
    pub fn new(clock: Clock, notifier: Arc<dyn Notifier>, courses: Vec<Course>) -> Self {
        Self {
            clock,
            notifier,
            state: ProgressState::new(courses),
        }
    }

    /// Fetch the course list through `loader` and build a controller over it.
    pub async fn load(clock: Clock, notifier: Arc<dyn Notifier>, loader: &CourseLoader) -> Self {
        let CourseLoad { courses, .. } = loader.load(notifier.as_ref()).await;
        Self::new(clock, notifier, courses)
    }

    #[must_use]
    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        self.state.courses()
    }

    #[must_use]
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.state.course(id)
    }

    #[must_use]
    pub fn overview(&self) -> TrainingOverview {
        TrainingOverview::from_courses(self.state.courses(), self.clock.today())
    }

    /// Make `video` of `course` the active video and reset quiz state.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if the course or video is unknown.
    pub fn select_video(&mut self, course: CourseId, video: VideoId) -> Result<(), TransitionError> {
        self.dispatch(Event::SelectVideo {
            course_id: course,
            video_id: video,
        })
    }

    /// Playback of the active video ended: start its quiz or complete it.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::NoActiveVideo` if nothing is selected.
    pub fn on_video_playback_finished(&mut self) -> Result<(), TransitionError> {
        self.dispatch(Event::PlaybackFinished)
    }

    /// Record (or replace) the answer for `question`.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` if no quiz is running or the ids do not match it.
    pub fn submit_answer(&mut self, question: QuestionId, option: OptionId) -> Result<(), TransitionError> {
        self.dispatch(Event::SubmitAnswer {
            question_id: question,
            option_id: option,
        })
    }

    /// Move to the next question, scoring the quiz after the last one.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::AnswerRequired` if the current question is unanswered.
    pub fn advance_question(&mut self) -> Result<(), TransitionError> {
        self.dispatch(Event::AdvanceQuestion)
    }

    /// Score the running quiz with the answers recorded so far.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::QuizNotInProgress` outside a quiz.
    pub fn score_quiz(&mut self) -> Result<(), TransitionError> {
        self.dispatch(Event::ScoreQuiz)
    }

    /// Clear answers and go back to the first question.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError::QuizNotInProgress` when there is no quiz to restart.
    pub fn restart_quiz(&mut self) -> Result<(), TransitionError> {
        self.dispatch(Event::RestartQuiz)
    }

    /// Ask for the certificate of `course`. Only emits a notice; no file is produced.
    ///
    /// # Errors
    ///
    /// Returns `CertificateRequestError::Transition` for an unknown course and
    /// `CertificateRequestError::Certificate` when the course is not complete.
    pub fn download_certificate(&self, course: CourseId) -> Result<(), CertificateRequestError> {
        let Some(found) = self.state.course(course) else {
            let err = TransitionError::UnknownCourse(course);
            self.notifier.notify(&err.notice());
            return Err(err.into());
        };

        match request_certificate(found) {
            Ok(notice) => {
                tracing::info!(course_id = %course, "certificate requested");
                self.notifier.notify(&notice);
                Ok(())
            }
            Err(err) => {
                self.notifier.notify(&Notice::warning(
                    "Certificate not available",
                    "Complete every video in the course to unlock the certificate.",
                ));
                Err(err.into())
            }
        }
    }

    fn dispatch(&mut self, event: Event) -> Result<(), TransitionError> {
        match self.state.apply(event) {
            Ok(transition) => {
                tracing::debug!(?event, phase = ?transition.state.phase(), "transition applied");
                for effect in &transition.effects {
                    self.dispatch_effect(effect);
                }
                self.state = transition.state;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(?event, error = %err, "transition rejected");
                self.notifier.notify(&err.notice());
                Err(err)
            }
        }
    }

    fn dispatch_effect(&self, effect: &Effect) {
        match effect {
            Effect::Notify(notice) => self.notifier.notify(notice),
            Effect::QuizScored { video_id, outcome } => {
                tracing::info!(
                    video_id = %video_id,
                    score = outcome.score,
                    passed = outcome.passed,
                    "quiz scored"
                );
            }
            Effect::VideoCompleted {
                course_id,
                video_id,
            } => {
                tracing::info!(course_id = %course_id, video_id = %video_id, "video completed");
            }
            Effect::CourseCompleted { course_id } => {
                tracing::info!(course_id = %course_id, "course completed");
            }
        }
    }
}

impl fmt::Debug for CourseProgressController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CourseProgressController")
            .field("clock", &self.clock)
            .field("courses_len", &self.state.courses().len())
            .field("active", &self.state.active())
            .field("phase", &self.state.phase())
            .finish_non_exhaustive()
    }
}
