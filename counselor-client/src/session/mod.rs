//! Process-wide authentication state.
//!
//! The in-memory copy is the source of truth; a JSON file under the
//! platform config directory is the recovery copy so a session survives
//! process restarts. Only the API client's login/refresh/logout paths
//! mutate the store; everything else reads snapshots.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use client_core::ApiError;

/// Authentication state snapshot. Field names double as the durable file
/// keys (`access_token`, `refresh_token`, `user_name`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    #[serde(default, rename = "user_name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.display_name.is_none()
    }
}

/// Why the session last changed. Broadcast over a watch channel so the
/// embedding layer decides what to do about invalidation; the transport
/// layer never navigates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// No credentials held: initial state, or after an explicit logout.
    LoggedOut,
    /// Tokens stored after login, registration, or a successful refresh.
    Authenticated,
    /// Credentials were cleared because refresh failed or no refresh token
    /// was available. The user must re-authenticate.
    Invalidated,
}

struct Inner {
    session: RwLock<Session>,
    path: Option<PathBuf>,
    events: watch::Sender<SessionEvent>,
}

/// Shared handle to the single session instance.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Store without durable backing. Used by tests and short-lived tools.
    pub fn in_memory() -> Self {
        Self::with_state(Session::default(), None)
    }

    /// Open (or create) the store backed by the given file, recovering any
    /// previously persisted session.
    pub fn open(path: PathBuf) -> Result<Self, ApiError> {
        let session = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Session::default(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self::with_state(session, Some(path)))
    }

    /// Open the store at the platform-default location
    /// (`<config dir>/counselor-client/session.json`).
    pub fn open_default() -> Result<Self, ApiError> {
        let dirs = directories::ProjectDirs::from("", "", "counselor-client").ok_or_else(|| {
            ApiError::Internal(anyhow::anyhow!("no config directory available"))
        })?;
        Self::open(dirs.config_dir().join("session.json"))
    }

    fn with_state(session: Session, path: Option<PathBuf>) -> Self {
        let initial = if session.is_authenticated() {
            SessionEvent::Authenticated
        } else {
            SessionEvent::LoggedOut
        };
        let (events, _) = watch::channel(initial);
        Self {
            inner: Arc::new(Inner {
                session: RwLock::new(session),
                path,
                events,
            }),
        }
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    pub fn display_name(&self) -> Option<String> {
        self.read().display_name.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated()
    }

    /// Observe session lifecycle changes (most importantly
    /// [`SessionEvent::Invalidated`]).
    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Atomically replace both tokens. Called on login and on refresh.
    pub fn store_tokens(&self, access: &str, refresh: &str) -> Result<(), ApiError> {
        let session = {
            let mut session = self.write();
            session.access_token = Some(access.to_string());
            session.refresh_token = Some(refresh.to_string());
            session.clone()
        };
        self.persist(&session)?;
        self.inner.events.send_replace(SessionEvent::Authenticated);
        tracing::debug!("session tokens updated");
        Ok(())
    }

    /// Remember who is signed in. Empty names are ignored.
    pub fn store_display_name(&self, name: &str) -> Result<(), ApiError> {
        if name.is_empty() {
            return Ok(());
        }
        let session = {
            let mut session = self.write();
            session.display_name = Some(name.to_string());
            session.clone()
        };
        self.persist(&session)
    }

    /// Drop all credentials (explicit logout).
    pub fn clear(&self) -> Result<(), ApiError> {
        self.wipe()?;
        self.inner.events.send_replace(SessionEvent::LoggedOut);
        tracing::info!("session cleared");
        Ok(())
    }

    /// Drop all credentials because recovery failed; subscribers are told
    /// to send the user back through login.
    pub(crate) fn invalidate(&self) -> Result<(), ApiError> {
        self.wipe()?;
        self.inner.events.send_replace(SessionEvent::Invalidated);
        tracing::warn!("session invalidated, re-authentication required");
        Ok(())
    }

    fn wipe(&self) -> Result<(), ApiError> {
        *self.write() = Session::default();
        if let Some(path) = &self.inner.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn persist(&self, session: &Session) -> Result<(), ApiError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };
        if session.is_empty() {
            return Ok(());
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_vec_pretty(session)?)?;
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Session> {
        self.inner.session.read().expect("session lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Session> {
        self.inner.session.write().expect("session lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(path.clone()).unwrap();
        store.store_tokens("A1", "R1").unwrap();
        store.store_display_name("Ada").unwrap();

        let reopened = SessionStore::open(path).unwrap();
        assert_eq!(reopened.access_token().as_deref(), Some("A1"));
        assert_eq!(reopened.refresh_token().as_deref(), Some("R1"));
        assert_eq!(reopened.display_name().as_deref(), Some("Ada"));
    }

    #[test]
    fn test_durable_file_uses_original_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(path.clone()).unwrap();
        store.store_tokens("A1", "R1").unwrap();
        store.store_display_name("Ada").unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["access_token"], "A1");
        assert_eq!(raw["refresh_token"], "R1");
        assert_eq!(raw["user_name"], "Ada");
    }

    #[test]
    fn test_clear_removes_file_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(path.clone()).unwrap();
        store.store_tokens("A1", "R1").unwrap();
        store.store_display_name("Ada").unwrap();
        store.clear().unwrap();

        assert!(!path.exists());
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn test_invalidate_notifies_subscribers() {
        let store = SessionStore::in_memory();
        let events = store.subscribe();

        store.store_tokens("A1", "R1").unwrap();
        assert_eq!(*events.borrow(), SessionEvent::Authenticated);

        store.invalidate().unwrap();
        assert_eq!(*events.borrow(), SessionEvent::Invalidated);
    }

    #[test]
    fn test_empty_display_name_is_ignored() {
        let store = SessionStore::in_memory();
        store.store_display_name("").unwrap();
        assert_eq!(store.display_name(), None);
    }
}
