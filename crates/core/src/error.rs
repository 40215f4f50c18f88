use crate::record::Field;

/// Failure of a single prediction or explanation attempt.
///
/// Every variant is recoverable: the controller folds it into a display message and the
/// user may resubmit.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    /// The request could not be sent or the response could not be received.
    #[error("{0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
    #[error("Server error: {status} {body}")]
    Server { status: u16, body: String },
    #[error("{0}")]
    MalformedResponse(String),
    #[error("{field} is not a finite number")]
    NonFiniteField { field: Field },
}

impl PredictError {
    /// The string shown to the user for this failure.
    ///
    /// Falls back to a fixed message when the underlying error renders as empty text.
    pub fn display_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            crate::constants::FALLBACK_ERROR_MESSAGE.to_owned()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PredictError::MalformedResponse(err.to_string())
        } else {
            PredictError::Transport(Box::new(err))
        }
    }
}

pub type PredictResult<T> = std::result::Result<T, PredictError>;

/// Errors raised outside of a submission: bad field names and bad configuration.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid assignment (expected field=value): {0}")]
    InvalidAssignment(String),
}

pub type FormResult<T> = std::result::Result<T, FormError>;
