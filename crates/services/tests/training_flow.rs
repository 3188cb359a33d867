use std::sync::Arc;

use services::{CourseProgressController, RecordingNotifier};
use training_core::model::{
    AnswerOption, Course, CourseId, OptionId, Question, QuestionId, Video, VideoId,
};
use training_core::progress::{Phase, TransitionError};
use training_core::time::fixed_clock;
use training_core::NoticeKind;

const COURSE: CourseId = CourseId::new(10);

fn question(id: u64) -> Question {
    Question::new(
        QuestionId::new(id),
        format!("Question {id}"),
        vec![
            AnswerOption::correct(OptionId::new(id * 10 + 1), "right"),
            AnswerOption::wrong(OptionId::new(id * 10 + 2), "wrong"),
        ],
    )
    .unwrap()
}

fn controller(videos: Vec<Video>) -> (CourseProgressController, Arc<RecordingNotifier>) {
    let course = Course::new(COURSE, "Security Basics", "", None, videos).unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let controller = CourseProgressController::new(fixed_clock(), notifier.clone(), vec![course]);
    (controller, notifier)
}

fn video(id: u64, questions: Vec<Question>) -> Video {
    Video::new(VideoId::new(id), format!("Video {id}"), 90, questions).unwrap()
}

#[test]
fn single_video_without_quiz_earns_certificate() {
    let (mut ctl, notifier) = controller(vec![video(1, Vec::new())]);

    ctl.select_video(COURSE, VideoId::new(1)).unwrap();
    ctl.on_video_playback_finished().unwrap();

    let course = ctl.course(COURSE).unwrap();
    assert!(course.videos()[0].is_completed());
    assert_eq!(course.progress(), 100);
    assert!(course.certificate_available());

    ctl.download_certificate(COURSE).unwrap();
    let titles: Vec<_> = notifier.notices().into_iter().map(|n| n.title).collect();
    assert!(titles.contains(&"Video completed".to_string()));
    assert!(titles.contains(&"Course completed".to_string()));
    assert_eq!(titles.last().map(String::as_str), Some("Certificate download started"));
}

#[test]
fn two_correct_answers_complete_the_video() {
    let (mut ctl, notifier) = controller(vec![video(1, vec![question(1), question(2)])]);

    ctl.select_video(COURSE, VideoId::new(1)).unwrap();
    ctl.on_video_playback_finished().unwrap();
    assert_eq!(ctl.state().phase(), Phase::QuizInProgress);

    ctl.submit_answer(QuestionId::new(1), OptionId::new(11)).unwrap();
    ctl.advance_question().unwrap();
    ctl.submit_answer(QuestionId::new(2), OptionId::new(21)).unwrap();
    ctl.advance_question().unwrap();

    assert_eq!(ctl.state().last_outcome().unwrap().score, 100);
    assert!(ctl.course(COURSE).unwrap().videos()[0].is_completed());
    assert!(notifier
        .notices()
        .iter()
        .any(|n| n.title == "Quiz passed!" && n.kind == NoticeKind::Success));
}

#[test]
fn half_right_fails_and_restart_clears_answers() {
    let (mut ctl, notifier) = controller(vec![video(1, vec![question(1), question(2)])]);

    ctl.select_video(COURSE, VideoId::new(1)).unwrap();
    ctl.on_video_playback_finished().unwrap();
    ctl.submit_answer(QuestionId::new(1), OptionId::new(11)).unwrap();
    ctl.advance_question().unwrap();
    ctl.submit_answer(QuestionId::new(2), OptionId::new(22)).unwrap();
    ctl.advance_question().unwrap();

    assert_eq!(ctl.state().last_outcome().unwrap().score, 50);
    assert!(!ctl.course(COURSE).unwrap().videos()[0].is_completed());
    let failed = notifier
        .notices()
        .into_iter()
        .find(|n| n.title == "Quiz failed")
        .expect("failure notice");
    assert!(failed.message.contains("try again"));

    ctl.restart_quiz().unwrap();
    assert_eq!(ctl.state().current_question_index(), 0);
    assert!(ctl.state().selected_answers().is_empty());
    assert!(!ctl.course(COURSE).unwrap().videos()[0].is_completed());
}

#[test]
fn one_of_two_videos_done_is_half_progress() {
    let (mut ctl, _notifier) = controller(vec![video(1, Vec::new()), video(2, Vec::new())]);
    ctl.select_video(COURSE, VideoId::new(2)).unwrap();
    ctl.on_video_playback_finished().unwrap();

    let course = ctl.course(COURSE).unwrap();
    assert_eq!(course.progress(), 50);
    assert!(!course.is_completed());

    let err = ctl.download_certificate(COURSE).unwrap_err();
    assert!(matches!(err, services::CertificateRequestError::Certificate(_)));
}

#[test]
fn blocked_advance_warns_and_keeps_state() {
    let (mut ctl, notifier) = controller(vec![video(1, vec![question(1)])]);
    ctl.select_video(COURSE, VideoId::new(1)).unwrap();
    ctl.on_video_playback_finished().unwrap();
    notifier.take();

    let before = ctl.state().clone();
    let err = ctl.advance_question().unwrap_err();
    assert_eq!(err, TransitionError::AnswerRequired(QuestionId::new(1)));
    assert_eq!(ctl.state(), &before);

    let notices = notifier.take();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Warning);
    assert_eq!(notices[0].title, "Please select an answer");
}

#[test]
fn overview_uses_the_controller_clock() {
    let today = fixed_clock().today();
    let overdue = Course::new(
        CourseId::new(2),
        "Late course",
        "",
        today.pred_opt(),
        vec![video(1, Vec::new())],
    )
    .unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let ctl = CourseProgressController::new(fixed_clock(), notifier, vec![overdue]);

    let overview = ctl.overview();
    assert_eq!(overview.total, 1);
    assert_eq!(overview.overdue, 1);
}
