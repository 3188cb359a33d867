use std::collections::HashSet;

use thiserror::Error;
use url::Url;

use crate::model::ids::{QuestionId, VideoId};
use crate::model::question::Question;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VideoError {
    #[error("video {0} title cannot be empty")]
    EmptyTitle(VideoId),

    #[error("video {video} lists question {question} more than once")]
    DuplicateQuestion { video: VideoId, question: QuestionId },
}

/// A training video and the quiz that gates its completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    id: VideoId,
    title: String,
    duration_secs: u32,
    completed: bool,
    thumbnail: Option<Url>,
    questions: Vec<Question>,
}

impl Video {
    /// Creates a new, not yet completed video.
    ///
    /// # Errors
    ///
    /// Returns `VideoError` if the title is blank or question ids repeat.
    pub fn new(
        id: VideoId,
        title: impl Into<String>,
        duration_secs: u32,
        questions: Vec<Question>,
    ) -> Result<Self, VideoError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(VideoError::EmptyTitle(id));
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(VideoError::DuplicateQuestion {
                    video: id,
                    question: question.id(),
                });
            }
        }

        Ok(Self {
            id,
            title,
            duration_secs,
            completed: false,
            thumbnail: None,
            questions,
        })
    }

    #[must_use]
    pub fn with_thumbnail(mut self, thumbnail: Url) -> Self {
        self.thumbnail = Some(thumbnail);
        self
    }

    /// Rehydrate the completion flag from a fetched record.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    #[must_use]
    pub fn id(&self) -> VideoId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Duration formatted as `m:ss`.
    #[must_use]
    pub fn duration_label(&self) -> String {
        format!("{}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn thumbnail(&self) -> Option<&Url> {
        self.thumbnail.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn has_quiz(&self) -> bool {
        !self.questions.is_empty()
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    pub(crate) fn mark_completed(&mut self) {
        self.completed = true;
    }
}
