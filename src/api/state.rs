//! Shared application state for the HTTP API

use std::sync::Arc;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use chrono::Utc;

use crate::config::AppConfig;
use crate::error::{Result, TriageError};
use crate::identity::{IdentityProvider, InMemoryIdentityProvider, PasswordHashing, SessionStore};
use crate::models::user::{Principal, Session};
use crate::service::PatientService;
use crate::store::{InMemoryRecordStore, RecordStore};

/// Shared application state
///
/// Cloned for each request; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    patients: PatientService,
    identity: Arc<dyn IdentityProvider>,
    sessions: SessionStore,
}

impl AppState {
    /// Assemble state from explicit collaborators
    #[must_use]
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                patients: PatientService::new(store),
                identity,
                sessions: SessionStore::new(config.session_ttl()),
            }),
        }
    }

    /// Build the in-memory collaborators described by `config`
    ///
    /// The record store loads from and persists to `config.data_file` when it
    /// is set.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn RecordStore> = match &config.data_file {
            Some(path) => Arc::new(InMemoryRecordStore::with_snapshot(path)?),
            None => Arc::new(InMemoryRecordStore::new()),
        };
        let identity = Arc::new(InMemoryIdentityProvider::from_config(
            &config,
            PasswordHashing::default(),
        )?);
        Ok(Self::new(config, store, identity))
    }

    #[must_use]
    pub fn patients(&self) -> &PatientService {
        &self.inner.patients
    }

    #[must_use]
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.inner.identity.as_ref()
    }

    /// Start a session for an authenticated principal
    pub fn start_session(&self, principal: Principal) -> Result<Session> {
        self.inner.sessions.issue(principal, Utc::now())
    }

    /// Principal behind the request's bearer token
    pub fn principal(&self, headers: &HeaderMap) -> Result<Principal> {
        let token = bearer_token(headers).ok_or(TriageError::Unauthenticated)?;
        self.inner.sessions.resolve(token, Utc::now())
    }

    /// Revoke the request's bearer token
    pub fn end_session(&self, headers: &HeaderMap) -> Result<()> {
        let token = bearer_token(headers).ok_or(TriageError::Unauthenticated)?;
        self.inner.sessions.revoke(token)?;
        Ok(())
    }
}

/// Token of an `Authorization: Bearer <token>` header
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}
