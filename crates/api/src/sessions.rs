//! In-process registry of [`BookingSession`]s keyed by the session id
//! carried in the access token.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use fascicoli_core::session::BookingSession;
use tokio::sync::Mutex;
use uuid::Uuid;

struct Entry {
    session: BookingSession,
    last_seen: Instant,
}

pub struct SessionRegistry {
    /// Sessions idle for longer than this are dropped on the next login.
    idle_ttl: Duration,
    entries: Mutex<HashMap<Uuid, Entry>>,
}

impl SessionRegistry {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            idle_ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a fresh session and prune idle ones.
    pub async fn open(&self) -> Uuid {
        let id = Uuid::new_v4();
        let mut entries = self.entries.lock().await;
        let ttl = self.idle_ttl;
        entries.retain(|_, e| e.last_seen.elapsed() < ttl);
        entries.insert(
            id,
            Entry {
                session: BookingSession::default(),
                last_seen: Instant::now(),
            },
        );
        tracing::debug!(session_id = %id, active = entries.len(), "Session opened");
        id
    }

    /// Run `f` against the session, creating an empty one if the id is
    /// unknown (e.g. after a restart with a still-valid token).
    pub async fn with_session<F, R>(&self, id: Uuid, f: F) -> R
    where
        F: FnOnce(&mut BookingSession) -> R,
    {
        let mut entries = self.entries.lock().await;
        let entry = entries.entry(id).or_insert_with(|| Entry {
            session: BookingSession::default(),
            last_seen: Instant::now(),
        });
        entry.last_seen = Instant::now();
        f(&mut entry.session)
    }

    pub async fn snapshot(&self, id: Uuid) -> BookingSession {
        self.with_session(id, |s| s.clone()).await
    }

    pub async fn active_count(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use fascicoli_core::session::RequesterDraft;

    use super::*;

    #[tokio::test]
    async fn sessions_are_isolated() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let a = registry.open().await;
        let b = registry.open().await;

        registry
            .with_session(a, |s| {
                s.update_draft(RequesterDraft {
                    first_name: Some("Mario".into()),
                    ..RequesterDraft::default()
                })
            })
            .await;

        assert_eq!(
            registry.snapshot(a).await.draft.first_name.as_deref(),
            Some("Mario")
        );
        assert_eq!(registry.snapshot(b).await, BookingSession::default());
    }

    #[tokio::test]
    async fn idle_sessions_are_pruned_on_open() {
        let registry = SessionRegistry::new(Duration::ZERO);
        registry.open().await;
        registry.open().await;
        assert_eq!(registry.active_count().await, 1);
    }

    #[tokio::test]
    async fn unknown_id_gets_an_empty_session() {
        let registry = SessionRegistry::new(Duration::from_secs(60));
        let session = registry.snapshot(Uuid::new_v4()).await;
        assert_eq!(session, BookingSession::default());
        assert_eq!(registry.active_count().await, 1);
    }
}
