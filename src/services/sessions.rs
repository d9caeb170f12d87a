use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::models::Session;

/// In-memory registry of live conversations, keyed by the caller's session id.
///
/// Each session sits behind its own lock so that turns for the same id run
/// one at a time while different sessions proceed concurrently.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for `id`, creating it when unknown. The flag is true
    /// when a new session was created.
    pub async fn get_or_create(&self, id: &str) -> (Arc<Mutex<Session>>, bool) {
        if let Some(session) = self.sessions.read().await.get(id) {
            return (Arc::clone(session), false);
        }

        let mut sessions = self.sessions.write().await;
        // Another request may have created it between the two locks.
        if let Some(session) = sessions.get(id) {
            return (Arc::clone(session), false);
        }
        let session = Arc::new(Mutex::new(Session::new(id)));
        sessions.insert(id.to_string(), Arc::clone(&session));
        (session, true)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drops sessions idle for longer than `max_idle`. Sessions a turn has
    /// already fetched or locked are kept. Returns the number removed.
    pub async fn evict_idle(&self, now: DateTime<Utc>, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            if Arc::strong_count(session) > 1 {
                return true;
            }
            match session.try_lock() {
                Ok(session) => now - session.last_activity <= max_idle,
                Err(_) => true,
            }
        });
        before - sessions.len()
    }
}
