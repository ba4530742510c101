//! Error types for renderer construction and per-frame drawing.

/// Errors raised by the rendering pipeline.
///
/// Construction-time variants (`InvalidGeometry`, `InvalidOptions`,
/// `WorkspaceBoundary`) mean no renderer was produced. Per-frame variants
/// mean that one frame was not produced; the renderer stays usable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid renderer options: {0}")]
    InvalidOptions(String),

    #[error("workspace boundary unavailable: {0}")]
    WorkspaceBoundary(String),

    #[error("configuration has {actual} entries, expected {expected}")]
    InvalidConfiguration { expected: usize, actual: usize },

    #[error("non-finite value in {0}")]
    NonFiniteInput(&'static str),

    #[error("kinematics returned a non-finite {0} pose")]
    NonFinitePose(&'static str),
}

/// Result alias used throughout the crate.
pub type RenderResult<T> = Result<T, RenderError>;
