//! Runtime configuration for course loading.
//!
//! Precedence, lowest first: defaults, TOML file, environment, explicit
//! overrides from the caller (CLI flags).

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;
use url::Url;

use crate::error::ConfigError;
use crate::sources::{CourseLoader, RemoteCourseSource, RemoteSourceConfig, SampleCourseSource};

pub const ENV_CONFIG_PATH: &str = "TRAINING_CONFIG";
pub const ENV_SOURCE: &str = "TRAINING_SOURCE";
pub const ENV_API_URL: &str = "TRAINING_API_URL";
pub const ENV_USER_ID: &str = "TRAINING_USER_ID";
pub const ENV_API_TOKEN: &str = "TRAINING_API_TOKEN";

/// Which `CourseSource` feeds the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SourceMode {
    /// REST API, falling back to the sample set on failure.
    Remote,
    #[default]
    Sample,
}

impl FromStr for SourceMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "sample" => Ok(Self::Sample),
            _ => Err(ConfigError::UnknownSource(s.to_owned())),
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceMode::Remote => f.write_str("remote"),
            SourceMode::Sample => f.write_str("sample"),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrainingConfig {
    pub source: SourceMode,
    pub api_url: Option<String>,
    pub user_id: Option<String>,
    pub api_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    source: Option<String>,
    api_url: Option<String>,
    user_id: Option<String>,
    api_token: Option<String>,
}

impl TrainingConfig {
    /// Defaults, then the file at `path` (or `TRAINING_CONFIG`), then the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed, or a value is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(ENV_CONFIG_PATH).map(PathBuf::from));

        let config = match path {
            Some(path) => Self::default().merge_file(&path)?,
            None => Self::default(),
        };
        config.merge_vars(|key| env::var(key).ok())
    }

    /// Overlay values from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read`/`Parse` for unreadable files and
    /// `ConfigError::UnknownSource` for a bad `source` value.
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.merge_toml(&raw).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    fn merge_toml(mut self, raw: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        if let Some(source) = file.source {
            self.source = source.parse()?;
        }
        self.api_url = file.api_url.or(self.api_url);
        self.user_id = file.user_id.or(self.user_id);
        self.api_token = file.api_token.or(self.api_token);
        Ok(self)
    }

    /// Overlay values from variables resolved by `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownSource` for a bad `TRAINING_SOURCE`.
    pub fn merge_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(source) = non_empty(ENV_SOURCE) {
            self.source = source.parse()?;
        }
        self.api_url = non_empty(ENV_API_URL).or(self.api_url);
        self.user_id = non_empty(ENV_USER_ID).or(self.user_id);
        self.api_token = non_empty(ENV_API_TOKEN).or(self.api_token);
        Ok(self)
    }

    /// Settings for the REST source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the url or user id is missing or invalid.
    pub fn remote_config(&self) -> Result<RemoteSourceConfig, ConfigError> {
        let raw = self
            .api_url
            .as_deref()
            .ok_or(ConfigError::MissingRemoteSetting("an api url"))?;
        let base_url = Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
            raw: raw.to_owned(),
            source,
        })?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(base_url.scheme().to_owned()));
        }
        let user_id = self
            .user_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConfigError::MissingRemoteSetting("a user id"))?;

        Ok(RemoteSourceConfig {
            base_url,
            user_id,
            api_token: self.api_token.clone(),
        })
    }

    /// Build the loader selected by `source`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if remote mode is selected without valid settings.
    pub fn course_loader(&self) -> Result<CourseLoader, ConfigError> {
        match self.source {
            SourceMode::Sample => Ok(CourseLoader::sample()),
            SourceMode::Remote => {
                let remote = RemoteCourseSource::new(self.remote_config()?);
                Ok(CourseLoader::new(Arc::new(remote)).with_fallback(Arc::new(SampleCourseSource)))
            }
        }
    }
}
