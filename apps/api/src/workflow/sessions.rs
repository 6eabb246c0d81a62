use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};
use uuid::Uuid;

use crate::sow_client::SowService;
use crate::workflow::controller::WorkflowController;

struct Entry {
    controller: Arc<WorkflowController>,
    last_seen: Instant,
}

/// In-memory registry of live wizard sessions. Nothing is persisted.
///
/// Every lookup refreshes a session's idle clock; sessions idle past the
/// configured TTL are dropped by [`SessionStore::evict_idle`].
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, Entry>>,
    service: Arc<dyn SowService>,
}

impl SessionStore {
    pub fn new(service: Arc<dyn SowService>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            service,
        }
    }

    pub async fn create(&self) -> Arc<WorkflowController> {
        let controller = Arc::new(WorkflowController::new(self.service.clone()));
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            controller.id(),
            Entry {
                controller: controller.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(session = %controller.id(), live = sessions.len(), "session created");
        controller
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<WorkflowController>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.controller.clone())
    }

    /// Drops a session. A request still in flight finishes against the
    /// detached controller and its result is never observed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(&id).is_some();
        if removed {
            info!(session = %id, live = sessions.len(), "session closed");
        }
        removed
    }

    /// Drops every session not looked up within `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = now.duration_since(entry.last_seen) <= ttl;
            if !keep {
                debug!(session = %id, "evicting idle session");
            }
            keep
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, live = sessions.len(), "idle sessions evicted");
        }
        evicted
    }

    /// Runs [`SessionStore::evict_idle`] every `every` for the life of the process.
    pub fn spawn_sweeper(self: Arc<Self>, ttl: Duration, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.evict_idle(ttl).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::models::extraction::{ExtractedRecord, UploadedFile};
    use crate::models::form::ProjectForm;
    use crate::models::recommendation::RecommendationSet;
    use crate::sow_client::CollaboratorError;

    struct Unreachable;

    #[async_trait]
    impl SowService for Unreachable {
        async fn extract_sow(&self, _: &UploadedFile) -> Result<ExtractedRecord, CollaboratorError> {
            unreachable!("sessions tests never extract")
        }

        async fn recommend_employees(
            &self,
            _: &ProjectForm,
        ) -> Result<RecommendationSet, CollaboratorError> {
            unreachable!("sessions tests never submit")
        }
    }

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new(Arc::new(Unreachable));
        let a = store.create().await;
        let b = store.create().await;
        assert_ne!(a.id(), b.id());

        let found = store.get(a.id()).await.expect("session a");
        assert!(Arc::ptr_eq(&found, &a));

        assert!(store.remove(a.id()).await);
        assert!(!store.remove(a.id()).await);
        assert!(store.get(a.id()).await.is_none());
        assert!(store.get(b.id()).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sessions_are_evicted_and_active_ones_kept() {
        let store = SessionStore::new(Arc::new(Unreachable));
        let idle = store.create().await;
        let active = store.create().await;

        time::advance(Duration::from_secs(30)).await;
        assert!(store.get(active.id()).await.is_some());
        time::advance(Duration::from_secs(40)).await;

        assert_eq!(store.evict_idle(Duration::from_secs(60)).await, 1);
        assert!(store.get(idle.id()).await.is_none());
        assert!(store.get(active.id()).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_drops_abandoned_sessions() {
        let store = Arc::new(SessionStore::new(Arc::new(Unreachable)));
        let abandoned = store.create().await;
        let sweeper = store
            .clone()
            .spawn_sweeper(Duration::from_secs(60), Duration::from_secs(10));

        time::sleep(Duration::from_secs(90)).await;

        assert!(store.get(abandoned.id()).await.is_none());
        sweeper.abort();
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_state() {
        let store = SessionStore::new(Arc::new(Unreachable));
        let a = store.create().await;
        let b = store.create().await;

        let pdf = UploadedFile::new("a.pdf", "application/pdf", bytes::Bytes::new());
        a.select_file(pdf).await.unwrap();

        assert!(a.snapshot().await.file.is_some());
        assert!(b.snapshot().await.file.is_none());
    }
}
