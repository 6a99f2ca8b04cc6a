/// Convenience result type used across Storyreel.
pub type StoryreelResult<T> = Result<T, StoryreelError>;

/// Top-level error taxonomy used by the composition engine.
///
/// There are no retries anywhere in the engine: every failure is immediate
/// and total, and a failed render leaves no final output file.
#[derive(thiserror::Error, Debug)]
pub enum StoryreelError {
    /// A required story asset (page image, speech, music) is absent.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// Invalid caller-provided data: bad configuration, mismatched
    /// timestamp/caption lists, violated sequencing preconditions.
    #[error("validation error: {0}")]
    Validation(String),

    /// Media decode, encode, or mux failure from the underlying `ffmpeg`
    /// process, surfaced with its stderr.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoryreelError {
    /// Build a [`StoryreelError::MissingAsset`] value.
    pub fn missing_asset(msg: impl Into<String>) -> Self {
        Self::MissingAsset(msg.into())
    }

    /// Build a [`StoryreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StoryreelError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }
}
