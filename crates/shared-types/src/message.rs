//! # Message Envelope
//!
//! The addressable, typed envelope routed by the bus. A message is a
//! destination subject plus an ordered mapping of named parts. The subject
//! is fixed at construction; parts may be added and read while the message
//! moves through the dispatch pipeline.

use crate::session::SessionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Well-known part keys of the message protocol.
///
/// Application payloads use [`PartKey::Custom`]; everything else is reserved
/// for the core protocol.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum PartKey {
    /// Protocol command carried by the message.
    Command,
    /// Principal name in a credential exchange or outcome notification.
    Name,
    /// Password in a credential exchange.
    Password,
    /// Opaque reference to the client session.
    SessionId,
    /// Human-readable text, e.g. the login message of the day.
    MessageText,
    /// Subject a reply should be sent to.
    ReplyTo,
    /// Application-defined part.
    Custom(String),
}

impl PartKey {
    /// The protocol name of this key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Command => "Command",
            Self::Name => "Name",
            Self::Password => "Password",
            Self::SessionId => "SessionId",
            Self::MessageText => "MessageText",
            Self::ReplyTo => "ReplyTo",
            Self::Custom(name) => name,
        }
    }
}

impl From<PartKey> for String {
    fn from(key: PartKey) -> Self {
        key.as_str().to_owned()
    }
}

impl From<String> for PartKey {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Command" => Self::Command,
            "Name" => Self::Name,
            "Password" => Self::Password,
            "SessionId" => Self::SessionId,
            "MessageText" => Self::MessageText,
            "ReplyTo" => Self::ReplyTo,
            _ => Self::Custom(name),
        }
    }
}

/// Protocol commands carried in the `Command` part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Client requests authentication (name/password challenge).
    AuthRequest,
    /// Client requests the current session be ended.
    EndSession,
    /// Authentication succeeded; sent to the reply subject.
    SuccessfulAuth,
    /// Authentication failed or was denied; sent to the reply subject.
    FailedAuth,
}

impl Command {
    /// The protocol name of this command.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AuthRequest => "AuthRequest",
            Self::EndSession => "EndSession",
            Self::SuccessfulAuth => "SuccessfulAuth",
            Self::FailedAuth => "FailedAuth",
        }
    }

    /// Parse a protocol command name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "AuthRequest" => Some(Self::AuthRequest),
            "EndSession" => Some(Self::EndSession),
            "SuccessfulAuth" => Some(Self::SuccessfulAuth),
            "FailedAuth" => Some(Self::FailedAuth),
            _ => None,
        }
    }
}

/// The addressable envelope for all bus traffic.
///
/// The subject identifies the logical channel and is immutable after
/// construction. Parts are keyed by [`PartKey`] with deterministic
/// iteration order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Destination subject. Fixed at construction.
    subject: String,

    /// Named parts carried by the envelope.
    parts: BTreeMap<PartKey, Value>,
}

impl Message {
    /// Create an empty message addressed to `subject`.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            parts: BTreeMap::new(),
        }
    }

    /// Build a reply in the conversation of `incoming`: a fresh envelope
    /// addressed to `subject`, carrying `command` and the incoming message's
    /// session reference so the reply reaches the originating client.
    #[must_use]
    pub fn conversation(subject: impl Into<String>, command: Command, incoming: &Self) -> Self {
        let mut reply = Self::new(subject).with_command(command);
        if let Some(session_id) = incoming.session_id() {
            reply = reply.with_session(session_id);
        }
        reply
    }

    /// The destination subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Add a part, consuming and returning the message (builder style).
    #[must_use]
    pub fn with_part(mut self, key: PartKey, value: Value) -> Self {
        self.parts.insert(key, value);
        self
    }

    /// Add a string part (builder style).
    #[must_use]
    pub fn with_str(self, key: PartKey, value: impl Into<String>) -> Self {
        self.with_part(key, Value::String(value.into()))
    }

    /// Set the `Command` part (builder style).
    #[must_use]
    pub fn with_command(self, command: Command) -> Self {
        self.with_str(PartKey::Command, command.as_str())
    }

    /// Set the `SessionId` part (builder style).
    #[must_use]
    pub fn with_session(self, session_id: SessionId) -> Self {
        self.with_str(PartKey::SessionId, session_id.to_string())
    }

    /// Add or overwrite a part in place. Parts stay mutable during
    /// processing; only the subject is fixed.
    pub fn set(&mut self, key: PartKey, value: Value) {
        self.parts.insert(key, value);
    }

    /// Read a part.
    #[must_use]
    pub fn get(&self, key: &PartKey) -> Option<&Value> {
        self.parts.get(key)
    }

    /// Read a part as a string slice.
    #[must_use]
    pub fn get_str(&self, key: &PartKey) -> Option<&str> {
        self.parts.get(key).and_then(Value::as_str)
    }

    /// The protocol command, if the `Command` part is present and valid.
    #[must_use]
    pub fn command(&self) -> Option<Command> {
        self.get_str(&PartKey::Command).and_then(Command::parse)
    }

    /// The session reference, if the `SessionId` part is present and valid.
    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.get_str(&PartKey::SessionId)
            .and_then(|raw| raw.parse().ok())
    }

    /// True if the part is present.
    #[must_use]
    pub fn has_part(&self, key: &PartKey) -> bool {
        self.parts.contains_key(key)
    }

    /// Number of parts carried by the envelope.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}
