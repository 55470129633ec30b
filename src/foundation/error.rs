/// Convenience result type used across picshade.
pub type PicshadeResult<T> = Result<T, PicshadeError>;

/// Top-level error taxonomy for the fallible (non-shading) APIs.
///
/// Shading itself reports failure as an absent result; these errors cover decoding, recording,
/// configuration and frame output.
#[derive(thiserror::Error, Debug)]
pub enum PicshadeError {
    /// Invalid user-provided data (picture descriptions, options, frame sizes).
    #[error("validation error: {0}")]
    Validation(String),

    /// Malformed or truncated flattened data.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors when serializing or deserializing JSON documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Errors while shading or rasterizing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PicshadeError {
    /// Build a [`PicshadeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PicshadeError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PicshadeError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Build a [`PicshadeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
