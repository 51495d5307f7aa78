//! # Error Types
//!
//! The shared error taxonomy. Configuration problems are fatal at
//! construction time; authentication failures are expected and recoverable.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the authentication and authorization layer.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Credential validation rejected the attempt.
    #[error("Authentication failed for '{name}'")]
    AuthenticationFailed { name: String },

    /// The challenge message lacks the name/password parts.
    #[error("Message is missing name/password credential parts")]
    MissingCredentials,

    /// The message carries no resolvable session reference.
    #[error("Message carries no resolvable session reference")]
    MissingSession,

    /// Unexpected failure inside the credential provider.
    #[error("Credential provider failure: {0}")]
    Provider(String),
}

/// Fatal configuration errors. The enclosing service must fail startup
/// rather than run without authentication.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The credential file could not be found or read.
    #[error("Credential file not found: {}", .0.display())]
    CredentialFileMissing(PathBuf),

    /// A credential file entry could not be parsed.
    #[error("Credential file entry malformed at line {line}")]
    CredentialFileMalformed { line: usize },
}
