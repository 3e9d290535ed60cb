use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use super::editor::EditorSession;
use crate::models::user::CurrentUser;

/// Live editing sessions, keyed by session id. Sessions live in memory only.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, Arc<EditorSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, user: Option<CurrentUser>) -> Arc<EditorSession> {
        let session = Arc::new(EditorSession::new(user));
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::clone(&session));
        info!(session = %session.id, resume = %session.resume_id, "Editing session started");
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<EditorSession>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Ends a session; its document is discarded.
    pub async fn end(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session = %id, "Editing session ended");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_get_end() {
        let registry = SessionRegistry::new();
        let session = registry.create(None).await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.get(session.id).await.is_some());

        assert!(registry.end(session.id).await);
        assert!(!registry.end(session.id).await);
        assert!(registry.get(session.id).await.is_none());
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new();
        let a = registry.create(None).await;
        let b = registry.create(None).await;
        a.rename("Backend Resume").await;
        assert_eq!(b.resume_name().await, "Software Engineer Resume");
        assert_ne!(a.resume_id, b.resume_id);
    }
}
