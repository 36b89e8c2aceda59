#![forbid(unsafe_code)]

//! Errors surfaced by the textbox facade.
//!
//! Layout and painting never fail: measurement problems degrade to zero
//! advances and stale map lookups read as "no style". Only importing state
//! from outside can go wrong.

use tate_core::ColorParseError;
use thiserror::Error;

/// Errors from state import and export.
#[derive(Debug, Error)]
pub enum TextboxError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid textbox state: {message}")]
    InvalidState { message: String },

    #[error("invalid color: {0}")]
    Color(#[from] ColorParseError),
}

impl TextboxError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}

/// Result alias for the facade.
pub type Result<T> = std::result::Result<T, TextboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_state_formats_its_message() {
        let err = TextboxError::invalid_state("type is \"textbox\"");
        assert_eq!(err.to_string(), "invalid textbox state: type is \"textbox\"");
    }

    #[test]
    fn json_errors_convert() {
        let err: TextboxError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, TextboxError::Json(_)));
        assert!(err.to_string().starts_with("JSON error"));
    }

    #[test]
    fn color_errors_convert() {
        let err: TextboxError = "#zz".parse::<tate_core::Rgba>().unwrap_err().into();
        assert!(matches!(err, TextboxError::Color(_)));
    }
}
