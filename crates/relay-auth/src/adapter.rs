//! # Authorization Adapter
//!
//! Authenticates principals, tracks per-session authorization state, and
//! enforces per-subject security rules.
//!
//! ## Concurrency
//!
//! The rule registry is read on every dispatch and written only at
//! configuration time, so it sits behind a read-mostly `RwLock`. Session
//! state is mutated under each session's own lock; the credential
//! validator is awaited with no shared lock held, so a hung credential
//! store blocks only the requesting call.

use crate::rules::RequiredRoles;
use crate::validator::{CredentialOutcome, CredentialRequest, CredentialValidator};
use relay_bus::MessageSender;
use shared_types::{
    AuthError, Command, Message, PartKey, Session, SessionStore, LOGIN_CLIENT_SUBJECT,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};

/// Role-based authorization adapter.
///
/// Decides whether a subject requires authorization and whether a given
/// message satisfies it; owns the authentication lifecycle (challenge,
/// session token, logout).
pub struct RoleBasedAdapter {
    /// Per-subject security rules. Read-mostly; written at configuration
    /// time only.
    rules: RwLock<HashMap<String, RequiredRoles>>,

    /// Live sessions, holding token and role state.
    sessions: Arc<SessionStore>,

    /// External credential store.
    validator: Arc<dyn CredentialValidator>,

    /// Outbound channel for authentication outcome replies.
    replies: Arc<dyn MessageSender>,

    /// Optional message of the day attached to successful logins.
    motd: Option<String>,
}

impl RoleBasedAdapter {
    /// Create an adapter over the given session store, credential
    /// validator, and reply channel.
    pub fn new(
        sessions: Arc<SessionStore>,
        validator: Arc<dyn CredentialValidator>,
        replies: Arc<dyn MessageSender>,
    ) -> Self {
        Self {
            rules: RwLock::new(HashMap::new()),
            sessions,
            validator,
            replies,
            motd: None,
        }
    }

    /// Attach a message of the day to successful login replies.
    #[must_use]
    pub fn with_motd(mut self, motd: impl Into<String>) -> Self {
        self.motd = Some(motd.into());
        self
    }

    /// Send a challenge to the credential store.
    ///
    /// Extracts the name/password parts, validates them, and emits the
    /// outcome to the `LoginClient` reply subject. On success the session
    /// is marked authenticated; on rejection a `FailedAuth` reply is sent
    /// AND [`AuthError::AuthenticationFailed`] is returned - both always
    /// happen. Unexpected provider failures are logged, answered with a
    /// `FailedAuth` reply, and leave the session anonymous.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingCredentials`] - no name/password parts
    /// - [`AuthError::MissingSession`] - no resolvable session to attach
    ///   the token to
    /// - [`AuthError::AuthenticationFailed`] - credentials rejected
    /// - [`AuthError::Provider`] - unexpected credential store failure
    pub async fn challenge(&self, message: &Message) -> Result<(), AuthError> {
        let name = message
            .get_str(&PartKey::Name)
            .ok_or(AuthError::MissingCredentials)?
            .to_owned();
        let password = message
            .get_str(&PartKey::Password)
            .ok_or(AuthError::MissingCredentials)?
            .to_owned();
        let session = self.resolve(message).ok_or(AuthError::MissingSession)?;

        let request = CredentialRequest {
            name: name.clone(),
            password,
        };

        // The validator may block on I/O; no shared lock is held across
        // this await.
        match self.validator.validate(request).await {
            Ok(CredentialOutcome::Accepted { principal }) => {
                session.authenticate();

                let mut reply =
                    Message::conversation(LOGIN_CLIENT_SUBJECT, Command::SuccessfulAuth, message)
                        .with_str(PartKey::Name, principal.clone());
                // MOTD is best-effort; a missing one never fails the flow.
                if let Some(motd) = &self.motd {
                    reply = reply.with_str(PartKey::MessageText, motd.clone());
                }
                self.replies.send(reply).await;

                info!(name = %principal, "Authentication succeeded");
                Ok(())
            }
            Ok(CredentialOutcome::Rejected) => {
                warn!(name = %name, "Authentication rejected");
                self.send_failed_auth(message, &name).await;
                Err(AuthError::AuthenticationFailed { name })
            }
            Err(err) => {
                // Session stays anonymous; the client still gets a reply.
                error!(name = %name, error = %err, "Unexpected failure during challenge");
                self.send_failed_auth(message, &name).await;
                Err(err)
            }
        }
    }

    /// True iff the message's session holds the authentication token.
    ///
    /// A message with no session reference is never authenticated.
    #[must_use]
    pub fn is_authenticated(&self, message: &Message) -> bool {
        self.resolve(message)
            .is_some_and(|session| session.is_authenticated())
    }

    /// True iff a rule is registered for the message's subject and the
    /// session's role set does not satisfy it.
    ///
    /// Subjects with no registered rule never require authorization.
    #[must_use]
    pub fn requires_authorization(&self, message: &Message) -> bool {
        let Ok(rules) = self.rules.read() else {
            // Poisoned registry: fail closed.
            return true;
        };
        let Some(rule) = rules.get(message.subject()) else {
            return false;
        };

        let granted = self
            .resolve(message)
            .map(|session| session.roles())
            .unwrap_or_default();
        !rule.satisfied_by(&granted)
    }

    /// Register or overwrite the security rule for a subject.
    ///
    /// Idempotent; last write wins.
    pub fn add_security_rule(&self, subject: impl Into<String>, rule: RequiredRoles) {
        if let Ok(mut rules) = self.rules.write() {
            rules.insert(subject.into(), rule);
        }
    }

    /// Converge the session's role set to its token: an authenticated
    /// session always carries the `Authenticated` role. Idempotent.
    pub fn process(&self, message: &Message) {
        if let Some(session) = self.resolve(message) {
            session.converge_roles();
        }
    }

    /// End the message's session if it is authenticated: the token is
    /// cleared and the `Authenticated` role revoked in one step.
    ///
    /// Returns whether a session was actually ended. Idempotent - an
    /// anonymous or absent session returns `false` with no effect.
    pub fn end_session(&self, message: &Message) -> bool {
        self.resolve(message)
            .is_some_and(|session| session.deauthenticate())
    }

    async fn send_failed_auth(&self, incoming: &Message, name: &str) {
        let reply = Message::conversation(LOGIN_CLIENT_SUBJECT, Command::FailedAuth, incoming)
            .with_str(PartKey::Name, name);
        self.replies.send(reply).await;
    }

    fn resolve(&self, message: &Message) -> Option<Arc<Session>> {
        message.session_id().and_then(|id| self.sessions.get(id))
    }
}
