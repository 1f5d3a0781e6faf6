//! CLI error types for structured error handling.
//!
//! Core errors arrive wrapped in `anyhow::Error`; [`exit_code_for`] looks
//! through the chain for a [`VaultError`] or [`CliError`] and picks the exit
//! code from it.

use std::fmt;

use credvault_core::{ErrorKind, VaultError};

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, vault, credential)
    NotFound { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for a core error kind.
pub fn exit_code_for_kind(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::NotFound => exit_codes::NOT_FOUND,
        ErrorKind::Validation => exit_codes::INVALID_INPUT,
        ErrorKind::Unauthenticated | ErrorKind::Unauthorized => exit_codes::AUTH_FAILED,
        ErrorKind::Conflict => exit_codes::CONFLICT,
        // Undecryptable tokens never leave the store as themselves; if one
        // does, treat it like a missing record.
        ErrorKind::Authentication | ErrorKind::Format => exit_codes::NOT_FOUND,
        ErrorKind::Internal => exit_codes::GENERAL,
    }
}

/// Exit code for any error returned by a command handler.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return cli_err.exit_code();
        }
        if let Some(vault_err) = cause.downcast_ref::<VaultError>() {
            return exit_code_for_kind(vault_err.kind());
        }
    }
    exit_codes::GENERAL
}

/// A hint to print under an error, if one applies.
pub fn hint_for(err: &anyhow::Error) -> Option<&'static str> {
    let kind = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<VaultError>())
        .map(VaultError::kind)?;

    match kind {
        ErrorKind::Unauthorized => Some("Hint: Run `credvault register` first."),
        ErrorKind::Unauthenticated => {
            Some("Hint: Pass --user or set CREDVAULT_USER to the logged-in user.")
        }
        ErrorKind::NotFound => Some("Hint: Run `credvault list` to see credential IDs."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_errors_map_to_exit_codes() {
        let cases = [
            (VaultError::NotFound("credential 1".into()), exit_codes::NOT_FOUND),
            (VaultError::Validation("empty".into()), exit_codes::INVALID_INPUT),
            (VaultError::Unauthenticated, exit_codes::AUTH_FAILED),
            (VaultError::Unauthorized, exit_codes::AUTH_FAILED),
            (VaultError::Conflict("dup".into()), exit_codes::CONFLICT),
            (VaultError::Authentication, exit_codes::NOT_FOUND),
            (VaultError::Storage("disk".into()), exit_codes::GENERAL),
        ];

        for (err, expected) in cases {
            let wrapped = anyhow::Error::new(err);
            assert_eq!(exit_code_for(&wrapped), expected, "{}", wrapped);
        }
    }

    #[test]
    fn test_context_does_not_hide_vault_error() {
        let err = anyhow::Error::new(VaultError::Conflict("dup".into())).context("Register failed");
        assert_eq!(exit_code_for(&err), exit_codes::CONFLICT);
    }

    #[test]
    fn test_cli_errors_map_to_exit_codes() {
        let err = anyhow::Error::new(CliError::invalid_input("bad"));
        assert_eq!(exit_code_for(&err), exit_codes::INVALID_INPUT);

        let err = anyhow::Error::new(CliError::not_found("No vault", "Hint: init"));
        assert_eq!(exit_code_for(&err), exit_codes::NOT_FOUND);
    }

    #[test]
    fn test_plain_errors_are_general() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), exit_codes::GENERAL);
        assert_eq!(hint_for(&err), None);
    }

    #[test]
    fn test_hint_for_unregistered_user() {
        let err = anyhow::Error::new(VaultError::Unauthorized);
        assert!(hint_for(&err).unwrap().contains("register"));
    }
}
