use std::collections::BTreeMap;

use crate::model::{OptionId, QuestionId, Question, VideoId, percent_rounded};

/// Minimum score (inclusive) needed to pass a quiz.
pub const PASS_THRESHOLD: u8 = 70;

/// Result of scoring one quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct: usize,
    pub total: usize,
    pub score: u8,
    pub passed: bool,
}

impl QuizOutcome {
    #[must_use]
    pub fn from_counts(correct: usize, total: usize) -> Self {
        let score = score_percent(correct, total);
        Self {
            correct,
            total,
            score,
            passed: score >= PASS_THRESHOLD,
        }
    }
}

/// A scored attempt kept in the session history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    pub video_id: VideoId,
    pub outcome: QuizOutcome,
}

/// `round(100 * correct / total)`; an empty quiz counts as a full score.
#[must_use]
pub fn score_percent(correct: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    percent_rounded(correct, total)
}

/// Score the selected answers against `questions`. Unanswered questions count as wrong.
#[must_use]
pub fn score_answers(
    questions: &[Question],
    answers: &BTreeMap<QuestionId, OptionId>,
) -> QuizOutcome {
    let correct = questions
        .iter()
        .filter(|q| answers.get(&q.id()).is_some_and(|choice| q.is_correct(*choice)))
        .count();
    QuizOutcome::from_counts(correct, questions.len())
}
