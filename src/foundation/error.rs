/// Convenience result type used across perfview.
pub type PerfResult<T> = Result<T, PerfError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Rendering entry points degrade instead of failing; these variants surface from configuration
/// loading, image decoding, and the low-level pixel helpers.
#[derive(thiserror::Error, Debug)]
pub enum PerfError {
    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Geometry that cannot be turned into a rasterizable pattern.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Errors while rasterizing or compositing pixel buffers.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PerfError {
    /// Build a [`PerfError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PerfError::Geometry`] value.
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`PerfError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PerfError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PerfError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
