//! Bearer session registry

use std::sync::{RwLock, RwLockWriteGuard};

use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;

use super::credentials::generate_token;
use crate::error::{Result, TriageError};
use crate::models::user::{Principal, Session};

/// Issued sessions keyed by token
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<FxHashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a registry whose sessions live for `ttl`
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(FxHashMap::default()),
            ttl,
        }
    }

    fn write_sessions(&self) -> Result<RwLockWriteGuard<'_, FxHashMap<String, Session>>> {
        self.sessions
            .write()
            .map_err(|_| TriageError::persistence("Session lock poisoned"))
    }

    /// Issue a new session for `principal`
    ///
    /// Sessions that expired by `now` are dropped at the same time.
    pub fn issue(&self, principal: Principal, now: DateTime<Utc>) -> Result<Session> {
        let session = Session {
            token: generate_token(),
            expires_at: now + self.ttl,
            principal,
        };

        let mut sessions = self.write_sessions()?;
        let purged = purge_expired(&mut sessions, now);
        if purged > 0 {
            log::debug!("Dropped {purged} expired sessions");
        }
        sessions.insert(session.token.clone(), session.clone());
        Ok(session)
    }

    /// Principal behind `token`, if the session exists and has not expired
    pub fn resolve(&self, token: &str, now: DateTime<Utc>) -> Result<Principal> {
        let session = self
            .sessions
            .read()
            .map_err(|_| TriageError::persistence("Session lock poisoned"))?
            .get(token)
            .cloned()
            .ok_or(TriageError::Unauthenticated)?;

        if session.expires_at <= now {
            self.revoke(token)?;
            return Err(TriageError::Unauthenticated);
        }
        Ok(session.principal)
    }

    /// Revoke `token`; returns whether a session was removed
    pub fn revoke(&self, token: &str) -> Result<bool> {
        Ok(self.write_sessions()?.remove(token).is_some())
    }
}

/// Drop every session expired by `now`, returning how many were removed
fn purge_expired(sessions: &mut FxHashMap<String, Session>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| session.expires_at > now);
    before - sessions.len()
}
