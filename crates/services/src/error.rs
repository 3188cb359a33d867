//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use training_core::certificate::CertificateError;
use training_core::model::{CourseError, QuestionError, VideoError};
use training_core::progress::TransitionError;

/// Errors emitted by a `CourseSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CourseSourceError {
    #[error("course list request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("course list could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid course record: {0}")]
    InvalidRecord(#[from] RecordError),
}

/// A fetched record that does not form a valid course tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Video(#[from] VideoError),
    #[error(transparent)]
    Course(#[from] CourseError),
    #[error("invalid thumbnail url {raw:?}: {source}")]
    Thumbnail {
        raw: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors emitted while loading `TrainingConfig`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unknown course source {0:?}, expected \"remote\" or \"sample\"")]
    UnknownSource(String),
    #[error("invalid api url {raw:?}: {source}")]
    InvalidUrl {
        raw: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api url must use http or https, got {0:?}")]
    UnsupportedScheme(String),
    #[error("remote course source requires {0}")]
    MissingRemoteSetting(&'static str),
}

/// Why a certificate request was refused.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CertificateRequestError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error(transparent)]
    Certificate(#[from] CertificateError),
}
