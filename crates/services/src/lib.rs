#![forbid(unsafe_code)]

pub mod config;
pub mod controller;
pub mod error;
pub mod notifier;
pub mod sources;

pub use training_core::Clock;

pub use config::{SourceMode, TrainingConfig};
pub use controller::CourseProgressController;
pub use error::{CertificateRequestError, ConfigError, CourseSourceError, RecordError};
pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use sources::{
    CourseLoad, CourseLoader, CourseSource, RemoteCourseSource, RemoteSourceConfig,
    SampleCourseSource,
};
