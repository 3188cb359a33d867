use async_trait::async_trait;
use chrono::NaiveDate;

use training_core::model::{
    AnswerOption, Course, CourseId, OptionId, Question, QuestionError, QuestionId,
    Video, VideoError, VideoId,
};

use super::CourseSource;
use crate::error::{CourseSourceError, RecordError};

/// Built-in demo courses, used when no remote source is configured or the
/// remote fetch fails.
#[derive(Clone, Copy, Debug, Default)]
pub struct SampleCourseSource;

#[async_trait]
impl CourseSource for SampleCourseSource {
    fn name(&self) -> &'static str {
        "sample"
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, CourseSourceError> {
        Ok(sample_courses()?)
    }
}

/// The three fixed sample courses.
///
/// # Errors
///
/// Returns `RecordError` only if the built-in data is malformed.
pub fn sample_courses() -> Result<Vec<Course>, RecordError> {
    Ok(vec![
        phishing_awareness()?,
        password_security()?,
        social_engineering()?,
    ])
}

fn question(
    id: u64,
    text: &str,
    options: &[(&str, bool)],
) -> Result<Question, QuestionError> {
    let options = options
        .iter()
        .zip(1_u64..)
        .map(|((label, correct), n)| AnswerOption::new(OptionId::new(id * 10 + n), *label, *correct))
        .collect();
    Question::new(QuestionId::new(id), text, options)
}

fn video(id: u64, title: &str, secs: u32, questions: Vec<Question>) -> Result<Video, VideoError> {
    Video::new(VideoId::new(id), title, secs, questions)
}

fn due(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn phishing_awareness() -> Result<Course, RecordError> {
    let videos = vec![
        video(
            101,
            "What is phishing?",
            330,
            vec![
                question(
                    1011,
                    "What is the main goal of a phishing email?",
                    &[
                        ("To trick you into revealing information or clicking a link", true),
                        ("To deliver the company newsletter", false),
                        ("To test your mail client", false),
                    ],
                )?,
                question(
                    1012,
                    "Which sender address deserves a closer look?",
                    &[
                        ("it-support@yourcompany.com", false),
                        ("it-support@yourcompany-helpdesk.co", true),
                    ],
                )?,
            ],
        )?
        .with_completed(true),
        video(
            102,
            "Spotting suspicious links",
            420,
            vec![question(
                1021,
                "What should you do before clicking a link in an email?",
                &[
                    ("Hover over it to check the real destination", true),
                    ("Click quickly before it expires", false),
                    ("Forward it to colleagues", false),
                ],
            )?],
        )?,
        video(103, "Reporting a phishing attempt", 240, Vec::new())?,
    ];
    Ok(Course::new(
        CourseId::new(1),
        "Phishing Awareness Fundamentals",
        "Learn to recognise and report phishing emails.",
        due(2025, 12, 31),
        videos,
    )?)
}

fn password_security() -> Result<Course, RecordError> {
    let videos = vec![
        video(
            201,
            "Building strong passphrases",
            360,
            vec![question(
                2011,
                "Which password is the strongest?",
                &[
                    ("Password123!", false),
                    ("correct-horse-battery-staple-lamp", true),
                    ("qwerty", false),
                ],
            )?],
        )?,
        video(
            202,
            "Multi-factor authentication",
            300,
            vec![
                question(
                    2021,
                    "What does MFA add to a login?",
                    &[
                        ("A second, independent proof of identity", true),
                        ("A longer password", false),
                    ],
                )?,
                question(
                    2022,
                    "Someone asks you to read out an MFA code on the phone. You should:",
                    &[
                        ("Read it out if they sound official", false),
                        ("Refuse and report the call", true),
                    ],
                )?,
            ],
        )?,
    ];
    Ok(Course::new(
        CourseId::new(2),
        "Password Security",
        "Create strong credentials and protect your accounts.",
        due(2026, 1, 31),
        videos,
    )?)
}

fn social_engineering() -> Result<Course, RecordError> {
    let videos = vec![
        video(301, "Pretexting and impersonation", 450, Vec::new())?.with_completed(true),
        video(
            302,
            "Tailgating and physical security",
            270,
            vec![question(
                3021,
                "A stranger without a badge follows you through a secure door. You should:",
                &[
                    ("Hold the door, it's polite", false),
                    ("Ask them to badge in or contact security", true),
                ],
            )?],
        )?
        .with_completed(true),
    ];
    Ok(Course::new(
        CourseId::new(3),
        "Social Engineering Defense",
        "Recognise manipulation tactics used by attackers.",
        due(2025, 11, 30),
        videos,
    )?)
}
