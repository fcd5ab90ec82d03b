//! Configuration validation.

use super::model::Config;

/// Validation error for a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Sender address is empty.
    EmptyAddress,
    /// Sender address format is invalid.
    InvalidAddress,
    /// Public key path is empty.
    EmptyPublicKey,
    /// Private key path is empty.
    EmptyPrivateKey,
    /// Outbox path is empty.
    EmptyOutbox,
    /// Mailbox path is empty.
    EmptyMailbox,
    /// Receive limit is zero.
    InvalidMaxMessages,
}

impl ValidationError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::EmptyAddress => "Sender address is required",
            Self::InvalidAddress => "Invalid sender address format",
            Self::EmptyPublicKey => "Public key path is required",
            Self::EmptyPrivateKey => "Private key path is required",
            Self::EmptyOutbox => "Outbox directory is required",
            Self::EmptyMailbox => "Mailbox directory is required",
            Self::InvalidMaxMessages => "max_messages must be at least 1",
        }
    }

    /// Get the config key this error relates to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyAddress | Self::InvalidAddress => "identity.address",
            Self::EmptyPublicKey => "keys.public_key",
            Self::EmptyPrivateKey => "keys.private_key",
            Self::EmptyOutbox => "spool.outbox",
            Self::EmptyMailbox => "spool.mailbox",
            Self::InvalidMaxMessages => "receive.max_messages",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Result of validating a configuration.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// Validate a configuration.
///
/// Returns `Ok(())` if valid, or every problem found at once.
///
/// # Errors
///
/// Returns a vector of `ValidationError` if any fields are invalid.
pub fn validate_config(config: &Config) -> ValidationResult {
    let mut errors = Vec::new();

    if config.identity.address.trim().is_empty() {
        errors.push(ValidationError::EmptyAddress);
    } else if !is_valid_email(&config.identity.address) {
        errors.push(ValidationError::InvalidAddress);
    }

    if config.keys.public_key.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyPublicKey);
    }
    if config.keys.private_key.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyPrivateKey);
    }

    if config.spool.outbox.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyOutbox);
    }
    if config.spool.mailbox.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyMailbox);
    }

    if config.receive.max_messages == 0 {
        errors.push(ValidationError::InvalidMaxMessages);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Basic address check: one `@`, non-empty local part, dotted domain
/// without empty labels, no whitespace or header line breaks.
fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.contains(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.identity.address = "alice@example.com".to_string();
        config
    }

    #[test]
    fn test_valid_email() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@example.com"));
        assert!(is_valid_email("user@sub.example.com"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("user"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("us er@example.com"));
    }

    #[test]
    fn test_validate_default_config() {
        let errors = validate_config(&Config::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyAddress]);
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let mut config = valid_config();
        config.identity.address = "not-an-address".to_string();
        config.keys.private_key = std::path::PathBuf::new();
        config.spool.mailbox = std::path::PathBuf::new();
        config.receive.max_messages = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidAddress,
                ValidationError::EmptyPrivateKey,
                ValidationError::EmptyMailbox,
                ValidationError::InvalidMaxMessages,
            ]
        );
        assert_eq!(errors[0].field(), "identity.address");
    }

    #[test]
    fn test_validate_complete_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }
}
