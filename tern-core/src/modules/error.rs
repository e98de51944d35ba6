//! Module host error types

use thiserror::Error;

/// Errors from loading shared-object modules or parsing module settings.
///
/// None of these are fatal to the host: the loader logs and skips the
/// offending file, and the manager reports failures as booleans.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Failed to open or resolve symbols in a shared object
    #[error("Failed to load module library: {0}")]
    Library(#[from] libloading::Error),

    /// API version mismatch between the host and the module
    #[error("API version mismatch: host expects {expected}, module has {found}")]
    ApiVersionMismatch {
        /// Version the host was built against
        expected: u32,
        /// Version the module reported
        found: u32,
    },

    /// A module with the same name is already registered
    #[error("Module '{0}' is already registered")]
    DuplicateName(String),

    /// Settings file failed to parse
    #[error("Settings error: {0}")]
    Settings(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
