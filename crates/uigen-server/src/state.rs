//! Registry of open project sessions.
//!
//! Sessions share no state. Each one expires after a period without tool
//! calls; expired sessions are cleaned up lazily on each registry
//! operation.

use crate::error::{Result, SessionError};
use crate::session::ProjectSession;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug)]
struct Entry {
    session: Arc<ProjectSession>,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Maps session ids to open projects.
///
/// # Examples
///
/// ```
/// use uigen_core::PreviewConfig;
/// use uigen_files::VirtualFileSystem;
/// use uigen_server::{ProjectSession, SessionRegistry};
///
/// # async fn example() -> uigen_server::error::Result<()> {
/// let registry = SessionRegistry::new();
/// let session = ProjectSession::new(VirtualFileSystem::new(), PreviewConfig::default())?;
///
/// let (id, _expires_at) = registry.insert(session).await;
/// assert!(registry.get(id).await.is_ok());
///
/// assert!(registry.remove(id).await);
/// assert!(registry.get(id).await.is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Entry>>>,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    /// Default idle timeout: 60 minutes.
    pub const DEFAULT_IDLE_MINUTES: i64 = 60;

    /// Creates an empty registry with the default idle timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::with_idle_timeout(Duration::minutes(Self::DEFAULT_IDLE_MINUTES))
    }

    /// Creates an empty registry whose sessions expire after `idle_timeout`.
    #[must_use]
    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// Stores a session and returns its id and expiry.
    pub async fn insert(&self, session: ProjectSession) -> (Uuid, DateTime<Utc>) {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let expires_at = now + self.idle_timeout;

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| !entry.is_expired(now));
        sessions.insert(
            id,
            Entry {
                session: Arc::new(session),
                expires_at,
            },
        );
        debug!(%id, live = sessions.len(), "session opened");
        (id, expires_at)
    }

    /// Looks up a session and extends its expiry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the id is unknown or the session expired.
    pub async fn get(&self, id: Uuid) -> Result<Arc<ProjectSession>> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| !entry.is_expired(now));

        let entry = sessions.get_mut(&id).ok_or(SessionError::NotFound { id })?;
        entry.expires_at = now + self.idle_timeout;
        Ok(Arc::clone(&entry.session))
    }

    /// Closes a session. Returns `false` if it was not open.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            debug!(%id, "session closed");
        }
        removed
    }

    /// Number of sessions that have not expired.
    pub async fn len(&self) -> usize {
        let now = Utc::now();
        let sessions = self.sessions.read().await;
        sessions.values().filter(|entry| !entry.is_expired(now)).count()
    }

    /// Returns `true` if no live session exists.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every expired session, returning how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| !entry.is_expired(now));
        before - sessions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uigen_core::PreviewConfig;
    use uigen_files::VirtualFileSystem;

    fn project() -> ProjectSession {
        ProjectSession::new(VirtualFileSystem::new(), PreviewConfig::default()).unwrap()
    }

    async fn expire(registry: &SessionRegistry, id: Uuid) {
        let mut sessions = registry.sessions.write().await;
        sessions.get_mut(&id).unwrap().expires_at = Utc::now() - Duration::hours(1);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let registry = SessionRegistry::new();
        let (id, expires_at) = registry.insert(project()).await;
        assert!(expires_at > Utc::now());
        assert!(registry.get(id).await.is_ok());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let registry = SessionRegistry::new();
        let err = registry.get(Uuid::new_v4()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_sessions_are_independent() {
        let registry = SessionRegistry::new();
        let (a, _) = registry.insert(project()).await;
        let (b, _) = registry.insert(project()).await;
        assert_ne!(a, b);

        let a = registry.get(a).await.unwrap();
        let b = registry.get(b).await.unwrap();
        a.with_files(|_| ()).await;
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_expired_session_not_found() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.insert(project()).await;
        expire(&registry, id).await;

        assert!(registry.get(id).await.is_err());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_extends_expiry() {
        let registry = SessionRegistry::with_idle_timeout(Duration::minutes(5));
        let (id, first) = registry.insert(project()).await;
        registry.get(id).await.unwrap();

        let sessions = registry.sessions.read().await;
        assert!(sessions[&id].expires_at >= first);
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let registry = SessionRegistry::new();
        registry.insert(project()).await;
        let (stale, _) = registry.insert(project()).await;
        expire(&registry, stale).await;

        assert_eq!(registry.len().await, 1);
        assert_eq!(registry.cleanup_expired().await, 1);
    }

    #[tokio::test]
    async fn test_lazy_cleanup_on_insert() {
        let registry = SessionRegistry::new();
        let (stale, _) = registry.insert(project()).await;
        expire(&registry, stale).await;

        registry.insert(project()).await;
        assert_eq!(registry.sessions.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = SessionRegistry::new();
        let (id, _) = registry.insert(project()).await;
        assert!(registry.remove(id).await);
        assert!(!registry.remove(id).await);
    }

    #[tokio::test]
    async fn test_concurrent_inserts() {
        let registry = Arc::new(SessionRegistry::new());
        let mut handles = vec![];

        for _ in 0..10 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move { registry.insert(project()).await }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 10);
    }
}
