use std::sync::Arc;

use civica_core::questions::QuestionFeed;
use civica_store::{MemoryGuardStore, MemoryResponseStore};

use crate::config::ServerConfig;
use crate::sessions::SessionManager;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Active survey sessions.
    pub sessions: Arc<SessionManager>,
    /// Persisted survey responses (shared across sessions).
    pub responses: Arc<MemoryResponseStore>,
    /// Duplicate-guard records (shared across sessions).
    pub guard_store: Arc<MemoryGuardStore>,
    /// The live question list.
    pub questions: Arc<QuestionFeed>,
}

impl AppState {
    /// Build fresh state from configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionManager::new()),
            responses: Arc::new(MemoryResponseStore::new()),
            guard_store: Arc::new(MemoryGuardStore::new()),
            questions: Arc::new(QuestionFeed::default()),
        }
    }
}
