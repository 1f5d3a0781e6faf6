//! Input helper functions for the CLI.

use std::io::{self, IsTerminal, Read};

use credvault_core::storage::RecordId;
use dialoguer::{Confirm, Password};
use secrecy::SecretString;

use crate::errors::CliError;

/// Read a secret from the `--secret` flag, a hidden prompt, or stdin.
///
/// Secrets are kept verbatim; only the line ending that terminates piped
/// input is removed.
pub fn read_secret(flag: Option<String>, no_input: bool) -> anyhow::Result<SecretString> {
    if let Some(value) = flag {
        if value.is_empty() {
            return Err(CliError::invalid_input("--secret cannot be empty").into());
        }
        return Ok(SecretString::from(value));
    }

    if io::stdin().is_terminal() {
        if no_input {
            return Err(
                CliError::invalid_input("--no-input requires --secret or a secret on stdin").into(),
            );
        }
        let value = Password::new()
            .with_prompt("Secret")
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to read secret: {}", e))?;
        return Ok(SecretString::from(value));
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
    let value = strip_line_ending(buffer);
    if value.is_empty() {
        return Err(CliError::invalid_input("No secret provided on stdin").into());
    }
    Ok(SecretString::from(value))
}

/// Remove one trailing `\n` or `\r\n`.
pub fn strip_line_ending(mut value: String) -> String {
    if value.ends_with('\n') {
        value.pop();
        if value.ends_with('\r') {
            value.pop();
        }
    }
    value
}

/// Validate a numeric credential ID from the command line.
pub fn parse_record_id(id: i64) -> anyhow::Result<RecordId> {
    if id <= 0 {
        return Err(CliError::invalid_input(format!("Invalid credential ID: {}", id)).into());
    }
    Ok(RecordId::new(id))
}

/// Ask for confirmation on a TTY; without one, require `--yes`.
pub fn confirm(prompt: &str, assume_yes: bool) -> anyhow::Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::invalid_input("Refusing without a TTY; pass --yes to confirm").into());
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read confirmation: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending("p@ss\n".to_string()), "p@ss");
        assert_eq!(strip_line_ending("p@ss\r\n".to_string()), "p@ss");
        assert_eq!(strip_line_ending(" p@ss \n\n".to_string()), " p@ss \n");
        assert_eq!(strip_line_ending("p@ss".to_string()), "p@ss");
    }

    #[test]
    fn test_flag_secret_is_verbatim() {
        let secret = read_secret(Some("  spaced  ".to_string()), true).unwrap();
        assert_eq!(secret.expose_secret(), "  spaced  ");
    }

    #[test]
    fn test_empty_flag_secret_rejected() {
        assert!(read_secret(Some(String::new()), true).is_err());
    }

    #[test]
    fn test_parse_record_id() {
        assert_eq!(parse_record_id(7).unwrap(), RecordId::new(7));
        assert!(parse_record_id(0).is_err());
        assert!(parse_record_id(-3).is_err());
    }
}
