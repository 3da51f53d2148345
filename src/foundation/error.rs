/// Convenience result type used across fcpxgen.
pub type FcpxResult<T> = Result<T, FcpxError>;

/// Top-level error taxonomy used by the document model, assembler and serializer.
#[derive(thiserror::Error, Debug)]
pub enum FcpxError {
    /// A field invariant was violated while constructing or mutating an entity.
    #[error("validation error: {0}")]
    Validation(String),

    /// A media file could not be classified as image or video.
    #[error("unsupported media: {0}")]
    UnsupportedMedia(String),

    /// The XML writer failed. The model is pre-validated, so this indicates a defect.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FcpxError {
    /// Build a [`FcpxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FcpxError::UnsupportedMedia`] value.
    pub fn unsupported_media(msg: impl Into<String>) -> Self {
        Self::UnsupportedMedia(msg.into())
    }

    /// Build a [`FcpxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
