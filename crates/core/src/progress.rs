//! Training-progress state machine.
//!
//! `ProgressState` holds the employee's course list plus the active
//! course/video pointer and quiz state. Every user action is an [`Event`];
//! [`ProgressState::apply`] is a pure function returning the next state and
//! the effects to dispatch, or a [`TransitionError`] that leaves the current
//! state untouched.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{Course, CourseError, CourseId, OptionId, Question, QuestionId, Video, VideoId};
use crate::notice::Notice;
use crate::quiz::{PASS_THRESHOLD, QuizAttempt, QuizOutcome, score_answers};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Rejected transitions. All are recoverable by the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TransitionError {
    #[error("unknown course {0}")]
    UnknownCourse(CourseId),

    #[error("course {course} has no video {video}")]
    UnknownVideo { course: CourseId, video: VideoId },

    #[error("no video is selected")]
    NoActiveVideo,

    #[error("no quiz is in progress")]
    QuizNotInProgress,

    #[error("question {0} does not belong to the current quiz")]
    UnknownQuestion(QuestionId),

    #[error("option {option} does not belong to question {question}")]
    UnknownOption { question: QuestionId, option: OptionId },

    #[error("question {0} has no answer yet")]
    AnswerRequired(QuestionId),

    #[error(transparent)]
    Course(#[from] CourseError),
}

impl TransitionError {
    /// Notice to show when the transition is blocked.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            TransitionError::AnswerRequired(_) => Notice::warning(
                "Please select an answer",
                "Choose an option before moving to the next question.",
            ),
            TransitionError::NoActiveVideo => {
                Notice::warning("No video selected", "Pick a video from a course first.")
            }
            other => Notice::error("Action not available", other.to_string()),
        }
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// The course/video pair the user is currently working on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveVideo {
    pub course_id: CourseId,
    pub video_id: VideoId,
}

/// Where the active video is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Watching,
    QuizInProgress,
    /// Scored below the pass mark; waiting for a restart.
    Scored(QuizOutcome),
    Completed,
}

/// User actions fed into the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    SelectVideo {
        course_id: CourseId,
        video_id: VideoId,
    },
    PlaybackFinished,
    SubmitAnswer {
        question_id: QuestionId,
        option_id: OptionId,
    },
    AdvanceQuestion,
    ScoreQuiz,
    RestartQuiz,
}

/// Side effects produced by a transition, dispatched by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notice),
    QuizScored {
        video_id: VideoId,
        outcome: QuizOutcome,
    },
    VideoCompleted {
        course_id: CourseId,
        video_id: VideoId,
    },
    CourseCompleted {
        course_id: CourseId,
    },
}

/// Next state plus the effects of getting there.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: ProgressState,
    pub effects: Vec<Effect>,
}

impl Transition {
    /// Notices among the effects, in emission order.
    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.effects.iter().filter_map(|effect| match effect {
            Effect::Notify(notice) => Some(notice),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressState {
    courses: Vec<Course>,
    active: Option<ActiveVideo>,
    phase: Phase,
    current_question: usize,
    selected_answers: BTreeMap<QuestionId, OptionId>,
    history: Vec<QuizAttempt>,
}

impl ProgressState {
    #[must_use]
    pub fn new(courses: Vec<Course>) -> Self {
        Self {
            courses,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id() == id)
    }

    #[must_use]
    pub fn active(&self) -> Option<ActiveVideo> {
        self.active
    }

    #[must_use]
    pub fn active_course(&self) -> Option<&Course> {
        self.active.and_then(|a| self.course(a.course_id))
    }

    #[must_use]
    pub fn active_video(&self) -> Option<&Video> {
        let active = self.active?;
        self.course(active.course_id)?.video(active.video_id)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn current_question_index(&self) -> usize {
        self.current_question
    }

    /// The question on screen while a quiz is in progress.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase != Phase::QuizInProgress {
            return None;
        }
        self.active_video()?.questions().get(self.current_question)
    }

    #[must_use]
    pub fn selected_answers(&self) -> &BTreeMap<QuestionId, OptionId> {
        &self.selected_answers
    }

    #[must_use]
    pub fn answer_for(&self, question: QuestionId) -> Option<OptionId> {
        self.selected_answers.get(&question).copied()
    }

    /// Every scored attempt, oldest first.
    #[must_use]
    pub fn history(&self) -> &[QuizAttempt] {
        &self.history
    }

    #[must_use]
    pub fn last_outcome(&self) -> Option<QuizOutcome> {
        self.history.last().map(|attempt| attempt.outcome)
    }

    /// Apply `event`, returning the next state without touching `self`.
    ///
    /// # Errors
    ///
    /// Returns `TransitionError` when the event is not valid in the current
    /// state. The caller keeps the current state in that case.
    pub fn apply(&self, event: Event) -> Result<Transition, TransitionError> {
        let mut next = self.clone();
        let mut effects = Vec::new();

        match event {
            Event::SelectVideo {
                course_id,
                video_id,
            } => next.select_video(course_id, video_id)?,
            Event::PlaybackFinished => next.playback_finished(&mut effects)?,
            Event::SubmitAnswer {
                question_id,
                option_id,
            } => next.submit_answer(question_id, option_id)?,
            Event::AdvanceQuestion => next.advance_question(&mut effects)?,
            Event::ScoreQuiz => next.score_quiz(&mut effects)?,
            Event::RestartQuiz => next.restart_quiz()?,
        }

        Ok(Transition {
            state: next,
            effects,
        })
    }

    fn select_video(&mut self, course_id: CourseId, video_id: VideoId) -> Result<(), TransitionError> {
        let course = self
            .course(course_id)
            .ok_or(TransitionError::UnknownCourse(course_id))?;
        if course.video(video_id).is_none() {
            return Err(TransitionError::UnknownVideo {
                course: course_id,
                video: video_id,
            });
        }

        self.active = Some(ActiveVideo {
            course_id,
            video_id,
        });
        self.phase = Phase::Watching;
        self.reset_quiz();
        Ok(())
    }

    fn playback_finished(&mut self, effects: &mut Vec<Effect>) -> Result<(), TransitionError> {
        let video = self.active_video().ok_or(TransitionError::NoActiveVideo)?;
        let question_count = video.questions().len();

        if question_count == 0 {
            return self.complete_active_video(effects);
        }

        let noun = if question_count == 1 { "question" } else { "questions" };
        effects.push(Effect::Notify(Notice::info(
            "Quiz time",
            format!("Answer {question_count} {noun} to complete \"{}\".", video.title()),
        )));
        self.reset_quiz();
        self.phase = Phase::QuizInProgress;
        Ok(())
    }

    fn submit_answer(&mut self, question_id: QuestionId, option_id: OptionId) -> Result<(), TransitionError> {
        self.ensure_quiz_in_progress()?;
        let video = self.active_video().ok_or(TransitionError::NoActiveVideo)?;
        let question = video
            .question(question_id)
            .ok_or(TransitionError::UnknownQuestion(question_id))?;
        if !question.has_option(option_id) {
            return Err(TransitionError::UnknownOption {
                question: question_id,
                option: option_id,
            });
        }

        self.selected_answers.insert(question_id, option_id);
        Ok(())
    }

    fn advance_question(&mut self, effects: &mut Vec<Effect>) -> Result<(), TransitionError> {
        self.ensure_quiz_in_progress()?;
        let video = self.active_video().ok_or(TransitionError::NoActiveVideo)?;
        let total = video.questions().len();
        let question_id = video
            .questions()
            .get(self.current_question)
            .map(Question::id)
            .ok_or(TransitionError::QuizNotInProgress)?;

        if !self.selected_answers.contains_key(&question_id) {
            return Err(TransitionError::AnswerRequired(question_id));
        }

        if self.current_question + 1 < total {
            self.current_question += 1;
            Ok(())
        } else {
            self.score_quiz(effects)
        }
    }

    fn score_quiz(&mut self, effects: &mut Vec<Effect>) -> Result<(), TransitionError> {
        self.ensure_quiz_in_progress()?;
        let video = self.active_video().ok_or(TransitionError::NoActiveVideo)?;
        let video_id = video.id();
        let outcome = score_answers(video.questions(), &self.selected_answers);

        self.history.push(QuizAttempt { video_id, outcome });
        effects.push(Effect::QuizScored { video_id, outcome });

        if outcome.passed {
            effects.push(Effect::Notify(Notice::success(
                "Quiz passed!",
                format!("You scored {}%. Video marked as completed.", outcome.score),
            )));
            self.complete_active_video(effects)
        } else {
            effects.push(Effect::Notify(Notice::warning(
                "Quiz failed",
                format!(
                    "You scored {}%. You need {PASS_THRESHOLD}% to pass. Please try again.",
                    outcome.score
                ),
            )));
            self.phase = Phase::Scored(outcome);
            Ok(())
        }
    }

    fn restart_quiz(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::QuizInProgress | Phase::Scored(_) => {
                self.reset_quiz();
                self.phase = Phase::QuizInProgress;
                Ok(())
            }
            _ => Err(TransitionError::QuizNotInProgress),
        }
    }

    fn complete_active_video(&mut self, effects: &mut Vec<Effect>) -> Result<(), TransitionError> {
        let active = self.active.ok_or(TransitionError::NoActiveVideo)?;
        let index = self
            .courses
            .iter()
            .position(|c| c.id() == active.course_id)
            .ok_or(TransitionError::UnknownCourse(active.course_id))?;

        let course = &self.courses[index];
        let was_completed = course.is_completed();
        let updated = course.with_video_completed(active.video_id)?;

        if let Some(video) = updated.video(active.video_id) {
            effects.push(Effect::Notify(Notice::success(
                "Video completed",
                format!("You've completed \"{}\".", video.title()),
            )));
        }
        effects.push(Effect::VideoCompleted {
            course_id: active.course_id,
            video_id: active.video_id,
        });

        if !was_completed && updated.is_completed() {
            effects.push(Effect::Notify(Notice::success(
                "Course completed",
                format!("Your certificate for \"{}\" is now available.", updated.title()),
            )));
            effects.push(Effect::CourseCompleted {
                course_id: active.course_id,
            });
        }

        self.courses[index] = updated;
        self.phase = Phase::Completed;
        Ok(())
    }

    fn ensure_quiz_in_progress(&self) -> Result<(), TransitionError> {
        if self.phase == Phase::QuizInProgress {
            Ok(())
        } else {
            Err(TransitionError::QuizNotInProgress)
        }
    }

    fn reset_quiz(&mut self) {
        self.current_question = 0;
        self.selected_answers.clear();
    }
}
