//! Error types for module authors

use thiserror::Error;

/// Errors that modules can return from lifecycle calls
#[derive(Error, Debug)]
pub enum ModuleError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Activation failed or was refused
    #[error("Activation failed: {0}")]
    Activation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Custom error with message
    #[error("{0}")]
    Custom(String),
}

impl ModuleError {
    /// Create a custom error with a message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an activation error
    pub fn activation(message: impl Into<String>) -> Self {
        Self::Activation(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = ModuleError::Config("missing key".to_string());
        assert_eq!(config_err.to_string(), "Configuration error: missing key");

        let activation_err = ModuleError::Activation("no display".to_string());
        assert_eq!(activation_err.to_string(), "Activation failed: no display");

        let custom_err = ModuleError::Custom("something happened".to_string());
        assert_eq!(custom_err.to_string(), "something happened");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let module_err: ModuleError = io_err.into();

        assert!(matches!(module_err, ModuleError::Io(_)));
        assert!(module_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_helper_constructors() {
        assert!(matches!(ModuleError::custom("x"), ModuleError::Custom(_)));
        assert!(matches!(ModuleError::config("x"), ModuleError::Config(_)));
        assert!(matches!(
            ModuleError::activation("x"),
            ModuleError::Activation(_)
        ));
    }
}
