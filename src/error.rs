use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("No input provided for {what}")]
    EmptyInput { what: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Config file not found at '{}'. Run: twitter-run config --init", path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to read config file '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file format: {source}")]
    InvalidFormat {
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required field in config: {field}")]
    MissingField { field: String },

    #[error("Failed to open editor '{editor}': {source}")]
    EditorFailed {
        editor: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No cookies found at '{}'", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read cookies from '{}': {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write cookies to '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cookie file '{}' is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid or expired session (status 401)")]
    Unauthorized,

    #[error("Request forbidden (status 403): {body}")]
    Forbidden { body: String },

    #[error("Resource not found: {what}")]
    NotFound { what: String },

    #[error("Rate limited by Twitter API")]
    RateLimited,

    #[error("Twitter API returned an error: {message}")]
    Graphql { message: String },

    #[error("Login step '{subtask}' is not supported")]
    UnsupportedSubtask { subtask: String },

    #[error("Login failed: {reason}")]
    LoginFailed { reason: String },

    #[error("Unexpected response shape: {what}")]
    UnexpectedShape { what: String },

    #[error("Invalid API response (status {status}): {body}")]
    InvalidResponse { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    pub(crate) fn shape(what: impl Into<String>) -> Self {
        ApiError::UnexpectedShape { what: what.into() }
    }
}

impl AppError {
    pub(crate) fn empty_input(what: impl Into<String>) -> Self {
        AppError::EmptyInput { what: what.into() }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
