use thiserror::Error;
#[derive(Debug, Error)]
pub enum BlinkError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("signal too short for zero-phase filtering: {len} samples, need at least {required}")]
    SignalTooShort { len: usize, required: usize },
    #[error("malformed input for {field}: {value:?} is not a finite number")]
    MalformedInput { field: String, value: String },
    #[error("length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("unknown channel: {0}")]
    UnknownChannel(String),
    #[error("failed to render plot: {0}")]
    Plot(String),
}
pub type Result<T> = std::result::Result<T, BlinkError>;
impl BlinkError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        BlinkError::InvalidConfiguration(message.into())
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for BlinkError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        BlinkError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for BlinkError {
    fn from(value: image::ImageError) -> Self {
        BlinkError::Plot(value.to_string())
    }
}
