//! # Security Rules
//!
//! A security rule names the roles a session must hold for its messages to
//! be delivered to a subject. Rules are registered once at configuration
//! time and read on every dispatch.

use shared_types::RoleToken;
use std::collections::HashSet;

/// The authorization predicate attached to a subject.
///
/// Satisfied when every required role is present in the session's granted
/// role set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredRoles {
    roles: HashSet<RoleToken>,
}

impl RequiredRoles {
    /// Create a rule requiring the given roles.
    #[must_use]
    pub fn new<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = RoleToken>,
    {
        Self {
            roles: roles.into_iter().collect(),
        }
    }

    /// Create a rule requiring only a logged-in session.
    #[must_use]
    pub fn authenticated() -> Self {
        Self::new([RoleToken::authenticated()])
    }

    /// Check the rule against a granted role set.
    #[must_use]
    pub fn satisfied_by(&self, granted: &HashSet<RoleToken>) -> bool {
        self.roles.is_subset(granted)
    }

    /// The roles this rule requires.
    #[must_use]
    pub fn roles(&self) -> &HashSet<RoleToken> {
        &self.roles
    }
}
