//! Error types for the deskscript CLI.
//!
//! Uses thiserror for derive macros and provides operator-actionable messages.

use crate::exit_codes;
use crate::session::SessionError;
use thiserror::Error;

/// Main error type for deskscript operations.
#[derive(Error, Debug)]
pub enum DeskError {
    /// Invalid arguments, invalid subtask input, or a session precondition failed.
    #[error("{0}")]
    UserError(String),

    /// The configuration file or compose profile could not be used.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// A file or directory operation failed.
    #[error("I/O error: {0}")]
    IoError(String),

    /// The operator prompt could not be read (closed terminal, EOF).
    #[error("Prompt failed: {0}")]
    PromptError(String),
}

impl DeskError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeskError::UserError(_) => exit_codes::USER_ERROR,
            DeskError::ConfigError(_) => exit_codes::CONFIG_ERROR,
            DeskError::IoError(_) => exit_codes::IO_FAILURE,
            DeskError::PromptError(_) => exit_codes::IO_FAILURE,
        }
    }
}

impl From<SessionError> for DeskError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Prompt(inner) => inner,
            other => DeskError::UserError(other.to_string()),
        }
    }
}

/// Result type alias for deskscript operations.
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = DeskError::UserError("bad argument".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn config_error_has_correct_exit_code() {
        let err = DeskError::ConfigError("bad yaml".to_string());
        assert_eq!(err.exit_code(), exit_codes::CONFIG_ERROR);
    }

    #[test]
    fn io_and_prompt_errors_share_exit_code() {
        let io = DeskError::IoError("disk full".to_string());
        let prompt = DeskError::PromptError("eof".to_string());
        assert_eq!(io.exit_code(), exit_codes::IO_FAILURE);
        assert_eq!(prompt.exit_code(), exit_codes::IO_FAILURE);
    }

    #[test]
    fn session_errors_become_user_errors() {
        let err: DeskError = SessionError::CredentialsMissing.into();
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        assert!(err.to_string().contains("credentials"));
    }

    #[test]
    fn session_prompt_errors_keep_their_kind() {
        let err: DeskError =
            SessionError::Prompt(DeskError::PromptError("stdin closed".to_string())).into();
        assert_eq!(err.exit_code(), exit_codes::IO_FAILURE);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = DeskError::ConfigError("first_task_index must be greater than 0".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: first_task_index must be greater than 0"
        );
    }
}
