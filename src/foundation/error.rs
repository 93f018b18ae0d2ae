/// Convenience result type used across warpmask.
pub type WarpmaskResult<T> = Result<T, WarpmaskError>;

/// Top-level error taxonomy.
///
/// Only boundary operations (image load/encode, rendering setup, config and history parsing)
/// produce errors. Geometry edits never fail: degenerate input is a no-op.
#[derive(thiserror::Error, Debug)]
pub enum WarpmaskError {
    /// Invalid user-provided data (sizes, configuration values).
    #[error("validation error: {0}")]
    Validation(String),

    /// Rejected at the image load boundary: wrong mime type, oversized payload or undecodable bytes.
    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    /// Errors while preparing or executing a render plan.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WarpmaskError {
    /// Build a [`WarpmaskError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`WarpmaskError::UnsupportedImage`] value.
    pub fn unsupported_image(msg: impl Into<String>) -> Self {
        Self::UnsupportedImage(msg.into())
    }

    /// Build a [`WarpmaskError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`WarpmaskError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Single user-facing message for this error.
    ///
    /// Hosts show this verbatim; the editor state has already been rolled back.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedImage(msg) => format!("This image cannot be used: {msg}"),
            Self::Validation(msg) => format!("Invalid input: {msg}"),
            Self::Render(_) | Self::Serde(_) | Self::Other(_) => {
                "The image could not be processed.".to_string()
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
