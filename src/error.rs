//! Error types for every layer of the shell.
//!
//! UI errors are logged where they are produced (see `ui::registry`), so a
//! caller that ignores a `Result` still leaves a trace in the log.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UiError {
    #[error("{kind}: id must contain at least one non-whitespace character")]
    InvalidId { kind: &'static str },

    #[error("{kind} '{id}' does not exist")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} '{id}' already exists")]
    Duplicate { kind: &'static str, id: String },

    #[error("{kind} '{id}': {what} {value} is out of range {range}")]
    OutOfRange {
        kind: &'static str,
        id: String,
        what: &'static str,
        value: String,
        range: &'static str,
    },

    #[error("{0}")]
    Resource(#[from] ResourceError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    #[error("texture {0} is not loaded")]
    MissingTexture(String),

    #[error("font {0} is not loaded")]
    MissingFont(String),

    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("failed to decode image {path}: {message}")]
    Image { path: PathBuf, message: String },

    #[error("failed to parse font descriptor {path}: {message}")]
    Font { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

/// Everything that can abort start-up; reported once by `main`.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("failed to build the first screen: {0}")]
    Ui(#[from] UiError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
}
