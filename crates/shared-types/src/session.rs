//! # Session Model
//!
//! Per-client session state: the authentication token and the set of roles
//! granted to the session (its auth descriptor). The two are kept in sync by
//! construction - every mutation that touches the token adjusts the role set
//! inside the same critical section.
//!
//! ## Locking
//!
//! The store holds sessions behind a read-mostly `RwLock`; each session
//! guards its own state with a private `Mutex`. Callers resolve the
//! `Arc<Session>` under the read lock and mutate under the per-session lock,
//! so requests for different sessions never contend.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use uuid::Uuid;

/// Role granted to a session when authentication succeeds.
pub const AUTHENTICATED_ROLE: &str = "Authenticated";

/// Opaque identifier of one client session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh session identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(raw)?))
    }
}

/// A role granted to a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleToken(String);

impl RoleToken {
    /// Create a role token.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The role granted on successful authentication.
    #[must_use]
    pub fn authenticated() -> Self {
        Self(AUTHENTICATED_ROLE.to_owned())
    }

    /// The role name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mutable per-session state guarded by the session lock.
#[derive(Debug, Default)]
struct SessionState {
    /// The authentication token. Present iff the session is authenticated.
    authenticated: bool,
    /// Roles granted to this session (the auth descriptor).
    roles: HashSet<RoleToken>,
}

/// One client session.
///
/// All state transitions are single critical sections, so the invariant
/// "token present iff `Authenticated` role present" cannot be observed
/// broken from outside.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    state: Mutex<SessionState>,
}

/// Recover the guard from a poisoned lock; session state stays usable.
fn lock(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl Session {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// This session's identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// True iff the authentication token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        lock(&self.state).authenticated
    }

    /// Set the authentication token and grant the `Authenticated` role.
    pub fn authenticate(&self) {
        let mut state = lock(&self.state);
        state.authenticated = true;
        state.roles.insert(RoleToken::authenticated());
    }

    /// Clear the token and revoke the `Authenticated` role.
    ///
    /// Returns `true` if the session was authenticated. Idempotent - a
    /// second call returns `false` and changes nothing.
    pub fn deauthenticate(&self) -> bool {
        let mut state = lock(&self.state);
        if !state.authenticated {
            return false;
        }
        state.authenticated = false;
        state.roles.remove(&RoleToken::authenticated());
        true
    }

    /// Converge the role set to the token: an authenticated session always
    /// carries the `Authenticated` role. No-op on anonymous sessions.
    pub fn converge_roles(&self) {
        let mut state = lock(&self.state);
        if state.authenticated {
            state.roles.insert(RoleToken::authenticated());
        }
    }

    /// Grant a role to this session.
    pub fn grant_role(&self, role: RoleToken) {
        lock(&self.state).roles.insert(role);
    }

    /// Revoke a role from this session.
    pub fn revoke_role(&self, role: &RoleToken) -> bool {
        lock(&self.state).roles.remove(role)
    }

    /// True iff the session holds `role`.
    #[must_use]
    pub fn has_role(&self, role: &RoleToken) -> bool {
        lock(&self.state).roles.contains(role)
    }

    /// Snapshot of the roles currently granted.
    #[must_use]
    pub fn roles(&self) -> HashSet<RoleToken> {
        lock(&self.state).roles.clone()
    }
}

/// Key-value store of live sessions.
///
/// Read-mostly: lookups take the read lock only long enough to clone the
/// `Arc`; creation and removal take the write lock.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store wrapped in `Arc` for shared ownership.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Create a fresh session and register it.
    pub fn create(&self) -> Arc<Session> {
        let session = Arc::new(Session::new(SessionId::generate()));
        let Ok(mut sessions) = self.sessions.write() else {
            return session;
        };
        sessions.insert(session.id(), Arc::clone(&session));
        session
    }

    /// Look up a live session.
    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.read().ok()?.get(&id).cloned()
    }

    /// Drop a session from the store. The descriptor dies with it.
    pub fn remove(&self, id: SessionId) -> bool {
        self.sessions
            .write()
            .map(|mut sessions| sessions.remove(&id).is_some())
            .unwrap_or(false)
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    /// True if no sessions are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
