use std::fmt;

use thiserror::Error;

/// Required prefix of a live API key.
pub const CREDENTIAL_PREFIX: &str = "sk_live_";

/// Exact length of a live API key.
pub const CREDENTIAL_LENGTH: usize = 72;

/// Bearer token authorizing calls to the remote snippet source.
///
/// `Debug` and `Display` never print the token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    inner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("Please enter an API key")]
    Empty,

    #[error("Invalid API key format. Should start with sk_live_")]
    InvalidPrefix,

    #[error("Invalid API key format. Should be 72 characters long, got {0}")]
    InvalidLength(usize),
}

impl Credential {
    /// Wrap a stored token as-is.
    ///
    /// Stored values were validated when they were entered, so they are
    /// trusted here. Use [`Credential::parse`] for user input.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Validate user input before it is saved.
    pub fn parse(raw: &str) -> Result<Self, CredentialError> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(CredentialError::Empty);
        }
        if !value.starts_with(CREDENTIAL_PREFIX) {
            return Err(CredentialError::InvalidPrefix);
        }
        let len = value.chars().count();
        if len != CREDENTIAL_LENGTH {
            return Err(CredentialError::InvalidLength(len));
        }
        Ok(Self::new(value))
    }

    /// Borrow the raw token. Only transport code should call this.
    pub fn expose(&self) -> &str {
        &self.inner
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_key() -> String {
        format!("{}{}", CREDENTIAL_PREFIX, "x".repeat(CREDENTIAL_LENGTH - CREDENTIAL_PREFIX.len()))
    }

    #[test]
    fn test_parse_accepts_valid_key_and_trims() {
        let key = valid_key();
        let credential = Credential::parse(&format!("  {}  ", key)).unwrap();
        assert_eq!(credential.expose(), key);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Credential::parse("   "), Err(CredentialError::Empty));
        assert_eq!(
            Credential::parse("pk_test_123"),
            Err(CredentialError::InvalidPrefix)
        );
        assert_eq!(
            Credential::parse("sk_live_short"),
            Err(CredentialError::InvalidLength(13))
        );
    }

    #[test]
    fn test_debug_and_display_are_redacted() {
        let credential = Credential::new(valid_key());
        assert!(!format!("{:?}", credential).contains("sk_live_"));
        assert_eq!(credential.to_string(), "[REDACTED]");
    }
}
