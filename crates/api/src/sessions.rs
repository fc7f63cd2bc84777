//! Registry of in-progress survey sessions.
//!
//! Each HTTP client works through its own [`SurveySession`]: one form
//! state machine plus one submission orchestrator (whose in-flight flag
//! makes a double-tapped submit a no-op for that session). The response
//! and guard stores behind the orchestrator are shared across sessions so
//! duplicate detection spans the whole service.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use civica_core::duplicate::DuplicateGuard;
use civica_core::form::machine::FormStateMachine;
use civica_core::submit::SubmissionOrchestrator;
use civica_core::types::Timestamp;
use civica_store::{MemoryGuardStore, MemoryResponseStore, MemoryStepStore};

/// The form engine and orchestrator for one respondent.
pub struct SurveySession {
    pub machine: Mutex<FormStateMachine<MemoryStepStore>>,
    pub orchestrator: SubmissionOrchestrator<Arc<MemoryResponseStore>, Arc<MemoryGuardStore>>,
    pub created_at: Timestamp,
}

/// Manages all active survey sessions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
pub struct SessionManager {
    sessions: RwLock<HashMap<Uuid, Arc<SurveySession>>>,
}

impl SessionManager {
    /// Create a new, empty session registry.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create and register a fresh session.
    pub async fn create(
        &self,
        responses: Arc<MemoryResponseStore>,
        guard_store: Arc<MemoryGuardStore>,
        duplicate_window_minutes: i64,
    ) -> (Uuid, Arc<SurveySession>) {
        let session = Arc::new(SurveySession {
            machine: Mutex::new(FormStateMachine::new(MemoryStepStore::new())),
            orchestrator: SubmissionOrchestrator::new(
                responses,
                DuplicateGuard::with_window(guard_store, duplicate_window_minutes),
            ),
            created_at: chrono::Utc::now(),
        });
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, Arc::clone(&session));
        (id, session)
    }

    /// Look up a session by its ID.
    pub async fn get(&self, id: Uuid) -> Option<Arc<SurveySession>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Remove a session, returning whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Number of registered sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
