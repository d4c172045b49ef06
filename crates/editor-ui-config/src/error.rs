use editor_ui_core::ComponentError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading or applying a UI layout.
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    /// JSON parsing failed.
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("unsupported layout file format: {}", .0.display())]
    /// The file extension is not `.yaml`, `.yml` or `.json`.
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    /// Defining or rendering a component failed.
    Component(#[from] ComponentError),
}
