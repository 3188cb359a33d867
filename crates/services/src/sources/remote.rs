use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use url::Url;

use training_core::model::{
    AnswerOption, Course, CourseId, OptionId, Question, QuestionId, Video, VideoId,
};

use super::CourseSource;
use crate::error::{CourseSourceError, RecordError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteSourceConfig {
    pub base_url: Url,
    pub user_id: String,
    pub api_token: Option<String>,
}

/// Fetches assigned courses from the training REST API.
#[derive(Clone)]
pub struct RemoteCourseSource {
    client: Client,
    config: RemoteSourceConfig,
}

impl RemoteCourseSource {
    #[must_use]
    pub fn new(config: RemoteSourceConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// `{base_url}/users/{user_id}/courses`
    #[must_use]
    pub fn courses_url(&self) -> Url {
        let mut url = self.config.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["users", self.config.user_id.as_str(), "courses"]);
        }
        url
    }
}

#[async_trait]
impl CourseSource for RemoteCourseSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, CourseSourceError> {
        let response = self.courses_request().send().await?;
        check_status(response.status())?;

        let body = response.bytes().await?;
        decode_courses(&body)
    }
}

impl RemoteCourseSource {
    fn courses_request(&self) -> RequestBuilder {
        let url = self.courses_url();
        tracing::debug!(%url, "fetching assigned courses");

        let request = self.client.get(url);
        match &self.config.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn check_status(status: StatusCode) -> Result<(), CourseSourceError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(CourseSourceError::HttpStatus(status))
    }
}

/// Decode the JSON body of the course-list endpoint into validated courses.
///
/// # Errors
///
/// Returns `CourseSourceError::Decode` for malformed JSON and
/// `CourseSourceError::InvalidRecord` for records that fail validation.
pub fn decode_courses(body: &[u8]) -> Result<Vec<Course>, CourseSourceError> {
    let records: Vec<AssignedCourseDto> = serde_json::from_slice(body)?;
    let mut courses = Vec::with_capacity(records.len());
    for record in records {
        courses.push(record.into_course()?);
    }
    Ok(courses)
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssignedCourseDto {
    course: CourseDto,
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    due_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseDto {
    id: CourseId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    videos: Vec<VideoDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoDto {
    id: VideoId,
    title: String,
    #[serde(default)]
    duration_seconds: u32,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
    id: QuestionId,
    text: String,
    #[serde(default)]
    options: Vec<OptionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OptionDto {
    id: OptionId,
    text: String,
    #[serde(default)]
    is_correct: bool,
}

impl AssignedCourseDto {
    fn into_course(self) -> Result<Course, RecordError> {
        let videos = self
            .course
            .videos
            .into_iter()
            .map(VideoDto::into_video)
            .collect::<Result<Vec<_>, _>>()?;
        let course = Course::new(
            self.course.id,
            self.course.title,
            self.course.description,
            self.due_date,
            videos,
        )?;

        // Server aggregates are advisory; the video flags are authoritative.
        let progress_differs = self
            .progress
            .is_some_and(|reported| (reported - f64::from(course.progress())).abs() >= 0.5);
        if progress_differs || course.is_completed() != self.completed {
            tracing::debug!(
                course_id = %course.id(),
                reported_progress = ?self.progress,
                derived_progress = course.progress(),
                reported_completed = self.completed,
                "server progress disagrees with video flags"
            );
        }
        Ok(course)
    }
}

impl VideoDto {
    fn into_video(self) -> Result<Video, RecordError> {
        let questions = self
            .questions
            .into_iter()
            .map(QuestionDto::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        let mut video = Video::new(self.id, self.title, self.duration_seconds, questions)?
            .with_completed(self.completed);

        if let Some(raw) = self.thumbnail.filter(|t| !t.trim().is_empty()) {
            let url = Url::parse(&raw).map_err(|source| RecordError::Thumbnail { raw, source })?;
            video = video.with_thumbnail(url);
        }
        Ok(video)
    }
}

impl QuestionDto {
    fn into_question(self) -> Result<Question, RecordError> {
        let options = self
            .options
            .into_iter()
            .map(|o| AnswerOption::new(o.id, o.text, o.is_correct))
            .collect();
        Ok(Question::new(self.id, self.text, options)?)
    }
}
