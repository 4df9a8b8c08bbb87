//! Admin login sessions.
//!
//! A [`SessionStore`] lives in the HTTP state and is handed to whoever needs it.
//! Sessions are created on login, removed on logout, and expire after a period
//! of inactivity. Every successful lookup pushes the expiry forward.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::{sync::RwLock, task::JoinHandle};
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Authenticated admin as seen by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque identifier carried in the session cookie
    pub id: Uuid,
    /// Login name of the admin
    pub username: String,
    /// Role recorded at login
    pub role: String,
}

#[derive(Debug)]
struct Entry {
    session: Session,
    last_seen: Instant,
}

/// In-memory session registry with sliding expiry.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// Creates an empty store whose sessions expire after `idle_timeout` of inactivity.
    #[must_use]
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Starts a new session for `username`.
    pub async fn create(&self, username: &str, role: &str) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            username: username.to_string(),
            role: role.to_string(),
        };
        self.sessions.write().await.insert(
            session.id,
            Entry {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        info!("Session started for '{username}'");
        session
    }

    /// Looks up a live session and refreshes its inactivity timer.
    ///
    /// An expired session is dropped and reported as absent.
    pub async fn touch(&self, id: Uuid) -> Option<Session> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        if entry.last_seen.elapsed() >= self.idle_timeout {
            debug!("Session for '{}' expired", entry.session.username);
            sessions.remove(&id);
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// Ends a session. Unknown ids are ignored.
    pub async fn invalidate(&self, id: Uuid) {
        if let Some(entry) = self.sessions.write().await.remove(&id) {
            info!("Session ended for '{}'", entry.session.username);
        }
    }

    /// Drops every expired session and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen.elapsed() < self.idle_timeout);
        let removed = before - sessions.len();
        trace!("Purged {removed} expired sessions");
        removed
    }

    /// Number of sessions currently held, expired or not.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// True when no sessions are held.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Inactivity window after which sessions expire.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }
}

/// Periodically drops expired sessions so abandoned logins do not pile up.
pub fn spawn_reaper(store: Arc<SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = store.purge_expired().await;
            if removed > 0 {
                debug!("Reaped {removed} expired sessions");
            }
        }
    })
}
