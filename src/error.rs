use thiserror::Error;

/// Errors surfaced by measurement calls.
///
/// Input validation failures are detected before any layout work starts.
/// Failures inside the layout pass are collapsed into [`MeasureError::Unknown`]
/// at the adapter boundary; callers should treat that as "measurement
/// unavailable" rather than a partial result.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MeasureError {
    #[error("missing required text")]
    MissingText,
    #[error("missing required width")]
    MissingWidth,
    #[error("invalid size for `{0}`")]
    InvalidSizes(&'static str),
    #[error("invalid value type for `{0}`")]
    InvalidType(&'static str),
    #[error("missing required parameter `{0}`")]
    MissingParameter(&'static str),
    #[error("text layout failed: {0}")]
    Unknown(String),
}

impl MeasureError {
    /// Stable error code for callers that surface errors by name.
    pub fn code(&self) -> &'static str {
        match self {
            MeasureError::MissingText => "E_MISSING_TEXT",
            MeasureError::MissingWidth => "E_MISSING_WIDTH",
            MeasureError::InvalidSizes(_) => "E_INVALID_SIZES",
            MeasureError::InvalidType(_) => "E_INVALID_TYPE",
            MeasureError::MissingParameter(_) => "E_MISSING_PARAMETER",
            MeasureError::Unknown(_) => "E_UNKNOWN_ERROR",
        }
    }
}
