use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("frame too short: need {needed} bytes, got {got}")]
    ShortFrame { needed: usize, got: usize },
    #[error("field {field} out of range: {reason}")]
    InvalidField { field: &'static str, reason: String },
}
