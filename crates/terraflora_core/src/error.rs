//! Error types for terraflora_core.
//!
//! Generation and stepping never fail; errors only arise while loading
//! configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    /// A configuration value failed validation
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// TOML syntax or type errors
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// File system errors
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// Wraps an error with the operation that produced it
    #[error("{context}: {source}")]
    Context {
        context: String,
        source: Box<CoreError>,
    },
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    #[must_use]
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    #[must_use]
    pub fn with_context<S: Into<String>>(self, context: S) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::config("width too large");
        assert_eq!(err.to_string(), "Invalid configuration: width too large");
    }

    #[test]
    fn test_error_context() {
        let err = CoreError::config("bad").with_context("loading terraflora.toml");
        assert!(err.to_string().starts_with("loading terraflora.toml"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: CoreError = io_err.into();
        assert!(matches!(err, CoreError::Io(_)));
    }
}
