use std::sync::Arc;

use async_trait::async_trait;
use services::{
    CourseLoader, CourseProgressController, CourseSource, CourseSourceError, RecordingNotifier,
    SampleCourseSource,
};
use training_core::model::{Course, CourseId, Video, VideoId};
use training_core::time::fixed_clock;
use training_core::NoticeKind;

struct FixedSource(Vec<Course>);

#[async_trait]
impl CourseSource for FixedSource {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, CourseSourceError> {
        Ok(self.0.clone())
    }
}

struct BrokenSource;

#[async_trait]
impl CourseSource for BrokenSource {
    fn name(&self) -> &'static str {
        "broken"
    }

    async fn fetch_courses(&self) -> Result<Vec<Course>, CourseSourceError> {
        let err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        Err(CourseSourceError::Decode(err))
    }
}

fn one_course() -> Vec<Course> {
    let video = Video::new(VideoId::new(1), "Intro", 60, Vec::new()).unwrap();
    vec![Course::new(CourseId::new(77), "Assigned", "", None, vec![video]).unwrap()]
}

#[tokio::test]
async fn primary_courses_are_used_when_available() {
    let notifier = RecordingNotifier::new();
    let loader = CourseLoader::new(Arc::new(FixedSource(one_course())))
        .with_fallback(Arc::new(SampleCourseSource));

    let load = loader.load(&notifier).await;
    assert_eq!(load.source, "fixed");
    assert!(!load.used_fallback);
    assert_eq!(load.courses[0].id(), CourseId::new(77));
    assert!(notifier.notices().is_empty());
}

#[tokio::test]
async fn failed_fetch_falls_back_to_sample_courses() {
    let notifier = RecordingNotifier::new();
    let loader =
        CourseLoader::new(Arc::new(BrokenSource)).with_fallback(Arc::new(SampleCourseSource));

    let load = loader.load(&notifier).await;
    assert!(load.used_fallback);
    assert_eq!(load.source, "sample");
    assert_eq!(load.courses.len(), 3);

    let notices = notifier.notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Info);
}

#[tokio::test]
async fn empty_result_falls_back_to_sample_courses() {
    let notifier = RecordingNotifier::new();
    let loader =
        CourseLoader::new(Arc::new(FixedSource(Vec::new()))).with_fallback(Arc::new(SampleCourseSource));

    let load = loader.load(&notifier).await;
    assert!(load.used_fallback);
    assert_eq!(load.courses.len(), 3);
    assert!(notifier.notices()[0].message.contains("no courses are assigned"));
}

#[tokio::test]
async fn failure_without_fallback_yields_empty_list_and_error_notice() {
    let notifier = RecordingNotifier::new();
    let loader = CourseLoader::new(Arc::new(BrokenSource));

    let load = loader.load(&notifier).await;
    assert!(load.courses.is_empty());
    assert_eq!(notifier.notices()[0].kind, NoticeKind::Error);
}

#[tokio::test]
async fn controller_loads_through_the_loader() {
    let notifier = Arc::new(RecordingNotifier::new());
    let ctl =
        CourseProgressController::load(fixed_clock(), notifier.clone(), &CourseLoader::sample()).await;
    assert_eq!(ctl.courses().len(), 3);
    assert!(ctl.state().active().is_none());
}
