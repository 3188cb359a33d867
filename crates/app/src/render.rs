//! Plain-text rendering of courses, quiz state and the overview.

use std::fmt::Write as _;

use chrono::NaiveDate;
use training_core::model::Course;
use training_core::overview::TrainingOverview;
use training_core::progress::{Phase, ProgressState};
use training_core::quiz::PASS_THRESHOLD;

fn format_due(course: &Course) -> String {
    course
        .due_date()
        .map_or_else(|| "no due date".to_owned(), |d| format!("due {d}"))
}

pub fn course_list(courses: &[Course], today: NaiveDate) -> String {
    if courses.is_empty() {
        return "No courses assigned.\n".to_owned();
    }

    let mut out = String::new();
    for course in courses {
        let _ = writeln!(
            out,
            "[{}] {}  {:>3}%  {}  ({})",
            course.id(),
            course.title(),
            course.progress(),
            course.status(today).label(),
            format_due(course),
        );
        for video in course.videos() {
            let mark = if video.is_completed() { "x" } else { " " };
            let quiz = match video.questions().len() {
                0 => String::new(),
                1 => ", 1 question".to_owned(),
                n => format!(", {n} questions"),
            };
            let _ = writeln!(
                out,
                "    [{mark}] {} {} ({}{quiz})",
                video.id(),
                video.title(),
                video.duration_label(),
            );
        }
        if course.certificate_available() {
            let _ = writeln!(out, "    certificate available");
        } else if let Some(next) = course.next_video() {
            let _ = writeln!(out, "    next: `select {} {}`", course.id(), next.id());
        }
    }
    out
}

pub fn status(state: &ProgressState) -> String {
    let (Some(course), Some(video)) = (state.active_course(), state.active_video()) else {
        return "No video selected. Use `select <course> <video>`.\n".to_owned();
    };

    let mut out = format!("{} / {}\n", course.title(), video.title());
    match state.phase() {
        Phase::Idle => {}
        Phase::Watching if video.has_quiz() => {
            out.push_str("Watching. Type `finish` when the video ends; a quiz follows.\n");
        }
        Phase::Watching => out.push_str("Watching. Type `finish` when the video ends.\n"),
        Phase::Completed => out.push_str("Video completed.\n"),
        Phase::Scored(outcome) => {
            let _ = writeln!(
                out,
                "Scored {}% ({}/{}); {PASS_THRESHOLD}% needed. Type `restart` to try again.",
                outcome.score, outcome.correct, outcome.total
            );
        }
        Phase::QuizInProgress => {
            if let Some(question) = state.current_question() {
                let _ = writeln!(
                    out,
                    "Question {} of {} [{}]: {}",
                    state.current_question_index() + 1,
                    video.questions().len(),
                    question.id(),
                    question.text()
                );
                let chosen = state.answer_for(question.id());
                for option in question.options() {
                    let mark = if chosen == Some(option.id) { "*" } else { " " };
                    let _ = writeln!(out, "  {mark} {} {}", option.id, option.text);
                }
            }
        }
    }
    out
}

pub fn overview(overview: &TrainingOverview) -> String {
    format!(
        "assigned: {}\ncompleted: {}\nin progress: {}\nnot started: {}\noverdue: {}\ncertificates: {}\naverage progress: {}%\n",
        overview.total,
        overview.completed,
        overview.in_progress,
        overview.not_started,
        overview.overdue,
        overview.certificates_available,
        overview.average_progress,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use training_core::model::{AnswerOption, CourseId, OptionId, Question, QuestionId, Video, VideoId};
    use training_core::progress::Event;

    fn course() -> Course {
        let question = Question::new(
            QuestionId::new(5),
            "Report it?",
            vec![
                AnswerOption::correct(OptionId::new(51), "Yes"),
                AnswerOption::wrong(OptionId::new(52), "No"),
            ],
        )
        .unwrap();
        let videos = vec![
            Video::new(VideoId::new(1), "Intro", 75, Vec::new())
                .unwrap()
                .with_completed(true),
            Video::new(VideoId::new(2), "Reporting", 120, vec![question]).unwrap(),
        ];
        Course::new(
            CourseId::new(4),
            "Phishing",
            "",
            NaiveDate::from_ymd_opt(2024, 1, 31),
            videos,
        )
        .unwrap()
    }

    #[test]
    fn course_list_shows_progress_and_videos() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let text = course_list(&[course()], today);
        assert!(text.contains("[4] Phishing   50%  in progress  (due 2024-01-31)"));
        assert!(text.contains("[x] 1 Intro (1:15)"));
        assert!(text.contains("[ ] 2 Reporting (2:00, 1 question)"));
        assert!(text.contains("next: `select 4 2`"));
    }

    #[test]
    fn watching_a_video_with_questions_mentions_the_quiz() {
        let select = |video| {
            ProgressState::new(vec![course()])
                .apply(Event::SelectVideo {
                    course_id: CourseId::new(4),
                    video_id: VideoId::new(video),
                })
                .unwrap()
                .state
        };
        assert!(status(&select(2)).contains("a quiz follows"));
        assert!(!status(&select(1)).contains("a quiz follows"));
    }

    #[test]
    fn status_marks_the_chosen_option() {
        let state = ProgressState::new(vec![course()])
            .apply(Event::SelectVideo {
                course_id: CourseId::new(4),
                video_id: VideoId::new(2),
            })
            .unwrap()
            .state;
        let state = state.apply(Event::PlaybackFinished).unwrap().state;
        let state = state
            .apply(Event::SubmitAnswer {
                question_id: QuestionId::new(5),
                option_id: OptionId::new(52),
            })
            .unwrap()
            .state;

        let text = status(&state);
        assert!(text.contains("Question 1 of 1 [5]: Report it?"));
        assert!(text.contains("* 52 No"));
        assert!(text.contains("  51 Yes"));
    }

    #[test]
    fn status_without_selection_prompts_to_select() {
        let text = status(&ProgressState::new(vec![course()]));
        assert!(text.starts_with("No video selected"));
    }
}
