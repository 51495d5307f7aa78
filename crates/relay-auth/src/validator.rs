//! # Credential Validation Port
//!
//! Typed request/response exchange between the adapter and an external
//! credential store. The validator call may block on I/O; callers must not
//! hold any shared lock across it.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use shared_types::{AuthError, ConfigError};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// A structured credential challenge.
#[derive(Debug, Clone)]
pub struct CredentialRequest {
    /// Principal name presented by the client.
    pub name: String,
    /// Password presented by the client.
    pub password: String,
}

/// Outcome of a credential validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOutcome {
    /// The credentials were accepted for `principal`.
    Accepted { principal: String },
    /// The credentials were rejected.
    Rejected,
}

/// Port to an external credential store.
///
/// Implementations might check a property file, query a directory server,
/// or call out to an identity provider. Rejection is an `Ok` outcome;
/// `Err` is reserved for provider failures (I/O, protocol errors).
#[async_trait]
pub trait CredentialValidator: Send + Sync {
    /// Validate a name/password pair.
    async fn validate(&self, request: CredentialRequest) -> Result<CredentialOutcome, AuthError>;
}

/// Property-file backed validator.
///
/// The file holds one `name=sha256-hex-digest` entry per line; `#` starts a
/// comment. The file is read once at construction, which fails fast when
/// the file is missing or an entry is malformed - the enclosing service
/// must not start without a usable credential store.
pub struct PropertyFileValidator {
    /// Map of principal name to SHA-256 password digest.
    digests: HashMap<String, [u8; 32]>,
}

impl PropertyFileValidator {
    /// Load credentials from `path`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::CredentialFileMissing`] when the file cannot be read
    /// - [`ConfigError::CredentialFileMalformed`] when an entry cannot be
    ///   parsed as `name=sha256-hex-digest`
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::CredentialFileMissing(path.to_path_buf()))?;

        let mut digests = HashMap::new();
        for (idx, raw) in contents.lines().enumerate() {
            let line = idx + 1;
            let entry = raw.trim();
            if entry.is_empty() || entry.starts_with('#') {
                continue;
            }

            let Some((name, digest_hex)) = entry.split_once('=') else {
                return Err(ConfigError::CredentialFileMalformed { line });
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::CredentialFileMalformed { line });
            }

            let bytes = hex::decode(digest_hex.trim())
                .map_err(|_| ConfigError::CredentialFileMalformed { line })?;
            let digest: [u8; 32] = bytes
                .try_into()
                .map_err(|_| ConfigError::CredentialFileMalformed { line })?;

            digests.insert(name.to_owned(), digest);
        }

        debug!(entries = digests.len(), "Credential file loaded");
        Ok(Self { digests })
    }

    /// Hex SHA-256 digest of a password, in the file's entry format.
    #[must_use]
    pub fn digest_hex(password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    /// Number of principals known to this validator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.digests.len()
    }

    /// True if no principals are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }
}

#[async_trait]
impl CredentialValidator for PropertyFileValidator {
    async fn validate(&self, request: CredentialRequest) -> Result<CredentialOutcome, AuthError> {
        let Some(expected) = self.digests.get(&request.name) else {
            return Ok(CredentialOutcome::Rejected);
        };

        let presented: [u8; 32] = Sha256::digest(request.password.as_bytes()).into();
        if &presented == expected {
            Ok(CredentialOutcome::Accepted {
                principal: request.name,
            })
        } else {
            Ok(CredentialOutcome::Rejected)
        }
    }
}

/// Fixed-table validator for wiring examples and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticValidator {
    accepted: HashMap<String, String>,
}

impl StaticValidator {
    /// Create an empty validator that rejects everyone.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `name`/`password`.
    #[must_use]
    pub fn with_user(mut self, name: impl Into<String>, password: impl Into<String>) -> Self {
        self.accepted.insert(name.into(), password.into());
        self
    }
}

#[async_trait]
impl CredentialValidator for StaticValidator {
    async fn validate(&self, request: CredentialRequest) -> Result<CredentialOutcome, AuthError> {
        match self.accepted.get(&request.name) {
            Some(password) if *password == request.password => Ok(CredentialOutcome::Accepted {
                principal: request.name,
            }),
            _ => Ok(CredentialOutcome::Rejected),
        }
    }
}
