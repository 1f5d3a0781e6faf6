//! Identity of the caller, as established by the local login session.

use credvault_core::storage::PrincipalId;
use credvault_core::{Authenticator, Result, VaultError};

/// Takes the principal from `--user` / `CREDVAULT_USER`.
#[derive(Debug, Clone)]
pub struct EnvAuthenticator {
    user: Option<String>,
}

impl EnvAuthenticator {
    pub fn new(user: Option<String>) -> Self {
        Self { user }
    }
}

impl Authenticator for EnvAuthenticator {
    fn authenticated_principal(&self) -> Result<PrincipalId> {
        match self.user.as_deref().map(str::trim) {
            Some(user) if !user.is_empty() => {
                PrincipalId::new(user).map_err(|_| VaultError::Unauthenticated)
            }
            _ => Err(VaultError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_user_authenticates() {
        let auth = EnvAuthenticator::new(Some(" alice ".to_string()));
        assert_eq!(auth.authenticated_principal().unwrap().as_str(), "alice");
    }

    #[test]
    fn test_missing_or_blank_user_is_unauthenticated() {
        for user in [None, Some(String::new()), Some("   ".to_string())] {
            let auth = EnvAuthenticator::new(user);
            assert!(matches!(
                auth.authenticated_principal(),
                Err(VaultError::Unauthenticated)
            ));
        }
    }

    #[test]
    fn test_overlong_user_is_unauthenticated() {
        let auth = EnvAuthenticator::new(Some("u".repeat(500)));
        assert!(matches!(
            auth.authenticated_principal(),
            Err(VaultError::Unauthenticated)
        ));
    }
}
