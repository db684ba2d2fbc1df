use thiserror::Error;

/// Top-level error type for the Confab system.
///
/// Each variant wraps a subsystem-specific error. Subsystem crates define
/// their own error types and implement `From<SubsystemError> for ConfabError`
/// so that the `?` operator works seamlessly across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfabError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Classifier error: {0}")]
    Classifier(String),

    #[error("Responder error: {0}")]
    Responder(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for ConfabError {
    fn from(err: toml::de::Error) -> Self {
        ConfabError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfabError {
    fn from(err: toml::ser::Error) -> Self {
        ConfabError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for ConfabError {
    fn from(err: serde_json::Error) -> Self {
        ConfabError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Confab operations.
pub type Result<T> = std::result::Result<T, ConfabError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfabError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let confab_err: ConfabError = io_err.into();
        assert!(matches!(confab_err, ConfabError::Io(_)));
        assert!(confab_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_error_display_all_variants() {
        let cases: Vec<(ConfabError, &str)> = vec![
            (
                ConfabError::Config("bad key".to_string()),
                "Configuration error: bad key",
            ),
            (
                ConfabError::Classifier("endpoint down".to_string()),
                "Classifier error: endpoint down",
            ),
            (
                ConfabError::Responder("no knowledge base".to_string()),
                "Responder error: no knowledge base",
            ),
            (
                ConfabError::Storage("disk full".to_string()),
                "Storage error: disk full",
            ),
            (
                ConfabError::Crypto("bad nonce".to_string()),
                "Crypto error: bad nonce",
            ),
            (
                ConfabError::Session("lock poisoned".to_string()),
                "Session error: lock poisoned",
            ),
            (
                ConfabError::Serialization("invalid json".to_string()),
                "Serialization error: invalid json",
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_error_from_toml_de() {
        let bad_toml = "invalid = [[[";
        let err: std::result::Result<toml::Value, _> = toml::from_str(bad_toml);
        assert!(err.is_err());
        let confab_err: ConfabError = err.unwrap_err().into();
        assert!(matches!(confab_err, ConfabError::Config(_)));
    }

    #[test]
    fn test_error_from_serde_json() {
        let bad_json = "{ invalid json }";
        let err: std::result::Result<serde_json::Value, _> = serde_json::from_str(bad_json);
        assert!(err.is_err());
        let confab_err: ConfabError = err.unwrap_err().into();
        assert!(matches!(confab_err, ConfabError::Serialization(_)));
    }

    #[test]
    fn test_result_type_with_question_mark() {
        fn inner() -> Result<String> {
            let io_result: std::result::Result<i32, std::io::Error> = Ok(42);
            let _value = io_result?;
            Ok("success".to_string())
        }

        assert_eq!(inner().unwrap(), "success");
    }

    #[test]
    fn test_error_debug_impl() {
        let err = ConfabError::Classifier("test debug".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Classifier"));
        assert!(debug_str.contains("test debug"));
    }
}
