//! Process-local storage backings.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use civica_core::document::SurveyDocument;
use civica_core::duplicate::{GuardStore, IdentityKey};
use civica_core::error::CoreError;
use civica_core::fields::StepSnapshot;
use civica_core::form::machine::StepStore;
use civica_core::form::steps::SurveyStep;
use civica_core::submit::{ResponseStore, SavedResponse};
use civica_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Step snapshots
// ---------------------------------------------------------------------------

/// Per-step snapshot storage for one survey session.
///
/// Writes are last-write-wins per step with no merge, matching the
/// durable-storage contract of the form state machine.
#[derive(Debug, Default)]
pub struct MemoryStepStore {
    slots: HashMap<u8, StepSnapshot>,
}

impl MemoryStepStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StepStore for MemoryStepStore {
    fn load(&self, step: SurveyStep) -> Option<StepSnapshot> {
        self.slots.get(&step.to_number()).cloned()
    }

    fn save(&mut self, step: SurveyStep, snapshot: &StepSnapshot) {
        self.slots.insert(step.to_number(), snapshot.clone());
    }

    fn remove(&mut self, step: SurveyStep) {
        self.slots.remove(&step.to_number());
    }
}

// ---------------------------------------------------------------------------
// Duplicate-guard records
// ---------------------------------------------------------------------------

/// Default retention for guard records. Comfortably longer than any
/// sensible duplicate window; entries past it are dead weight.
const DEFAULT_GUARD_TTL_MINUTES: i64 = 60;

/// Identity-keyed submission timestamps with TTL eviction.
///
/// Each `record` call prunes entries older than the TTL, so the map stays
/// bounded by recent submitter count instead of growing forever.
pub struct MemoryGuardStore {
    entries: Mutex<HashMap<IdentityKey, Timestamp>>,
    ttl: Duration,
}

impl MemoryGuardStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::minutes(DEFAULT_GUARD_TTL_MINUTES))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Number of live records (diagnostic aid).
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl Default for MemoryGuardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GuardStore for MemoryGuardStore {
    async fn last_submission(&self, key: &IdentityKey) -> Result<Option<Timestamp>, CoreError> {
        Ok(self.entries.lock().await.get(key).copied())
    }

    async fn record(&self, key: &IdentityKey, at: Timestamp) -> Result<(), CoreError> {
        let mut entries = self.entries.lock().await;
        let cutoff = Utc::now() - self.ttl;
        entries.retain(|_, recorded| *recorded > cutoff);
        entries.insert(key.clone(), at);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Persisted responses
// ---------------------------------------------------------------------------

/// One persisted survey response.
#[derive(Debug, Clone)]
pub struct StoredResponse {
    pub id: String,
    pub submitted_at: Timestamp,
    pub document: SurveyDocument,
}

/// In-memory persistence backend.
///
/// Assigns the stable response id and the server-side submission
/// timestamp, per the persistence-collaborator contract.
#[derive(Default)]
pub struct MemoryResponseStore {
    responses: RwLock<Vec<StoredResponse>>,
}

impl MemoryResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.responses.read().await.len()
    }

    pub async fn find(&self, id: &str) -> Option<StoredResponse> {
        self.responses
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub async fn all(&self) -> Vec<StoredResponse> {
        self.responses.read().await.clone()
    }
}

#[async_trait]
impl ResponseStore for MemoryResponseStore {
    async fn save(&self, document: &SurveyDocument) -> Result<SavedResponse, CoreError> {
        let stored = StoredResponse {
            id: Uuid::new_v4().to_string(),
            submitted_at: Utc::now(),
            document: document.clone(),
        };
        let receipt = SavedResponse {
            id: stored.id.clone(),
            submitted_at: stored.submitted_at,
        };
        self.responses.write().await.push(stored);
        tracing::debug!(response_id = %receipt.id, "Survey response stored");
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civica_core::fields::FieldId;

    fn snapshot(value: &str) -> StepSnapshot {
        let mut s = StepSnapshot::new();
        s.insert(FieldId::ClientType, value.to_string());
        s
    }

    // -- MemoryStepStore -----------------------------------------------------

    #[test]
    fn step_store_overwrites_rather_than_merges() {
        let mut store = MemoryStepStore::new();
        let mut first = snapshot("citizen");
        first.insert(FieldId::Sex, "Female".to_string());
        store.save(SurveyStep::ClientInfo, &first);

        // The second save omits the sex field entirely; it must not
        // survive from the first write.
        store.save(SurveyStep::ClientInfo, &snapshot("business"));

        let loaded = store.load(SurveyStep::ClientInfo).unwrap();
        assert_eq!(loaded.get(&FieldId::ClientType).unwrap(), "business");
        assert!(loaded.get(&FieldId::Sex).is_none());
    }

    #[test]
    fn step_store_remove_clears_the_slot() {
        let mut store = MemoryStepStore::new();
        store.save(SurveyStep::Feedback, &snapshot("citizen"));
        store.remove(SurveyStep::Feedback);
        assert!(store.load(SurveyStep::Feedback).is_none());
    }

    // -- MemoryGuardStore ----------------------------------------------------

    #[tokio::test]
    async fn guard_store_roundtrips_timestamps() {
        let store = MemoryGuardStore::new();
        let key = IdentityKey::new("citizen", "user@example.com");
        let at = Utc::now();

        store.record(&key, at).await.unwrap();

        assert_eq!(store.last_submission(&key).await.unwrap(), Some(at));
        let other = IdentityKey::new("citizen", "other@example.com");
        assert_eq!(store.last_submission(&other).await.unwrap(), None);
    }

    #[tokio::test]
    async fn guard_store_evicts_expired_entries_on_record() {
        let store = MemoryGuardStore::with_ttl(Duration::minutes(30));
        let stale = IdentityKey::new("citizen", "old@example.com");
        let fresh = IdentityKey::new("citizen", "new@example.com");

        store
            .entries
            .lock()
            .await
            .insert(stale.clone(), Utc::now() - Duration::hours(2));
        store.record(&fresh, Utc::now()).await.unwrap();

        assert_eq!(store.last_submission(&stale).await.unwrap(), None);
        assert!(store.last_submission(&fresh).await.unwrap().is_some());
        assert_eq!(store.len().await, 1);
    }

    // -- MemoryResponseStore -------------------------------------------------

    fn sample_document() -> SurveyDocument {
        use civica_core::document::{CharterAnswers, FeedbackAnswers, ServiceQualityAnswers};

        SurveyDocument {
            client_type: "citizen".to_string(),
            date: "2024-05-10".to_string(),
            age: 35,
            service_availed: "Business permit".to_string(),
            region_of_residence: "Region IV-A".to_string(),
            sex: "Female".to_string(),
            citizens_charter: CharterAnswers {
                cc1: "1".to_string(),
                cc2: "Easy to see".to_string(),
                cc3: "Helped very much".to_string(),
            },
            service_quality: ServiceQualityAnswers {
                sqd0: "5".to_string(),
                sqd1: "5".to_string(),
                sqd2: "4".to_string(),
                sqd3: "5".to_string(),
                sqd4: "4".to_string(),
                sqd5: "5".to_string(),
                sqd6: "5".to_string(),
                sqd7: "5".to_string(),
                sqd8: "5".to_string(),
            },
            feedback: FeedbackAnswers {
                suggestions: "Faster queues please".to_string(),
                email: "user@example.com".to_string(),
            },
            completion_status: "completed".to_string(),
            privacy_accepted: true,
            ip_address: "unknown".to_string(),
            user_agent: "test-agent".to_string(),
            survey_version: "1.0".to_string(),
        }
    }

    #[tokio::test]
    async fn response_store_assigns_ids_and_timestamps() {
        let store = MemoryResponseStore::new();
        let doc = sample_document();

        let before = Utc::now();
        let receipt = store.save(&doc).await.unwrap();

        assert!(!receipt.id.is_empty());
        assert!(receipt.submitted_at >= before);
        assert_eq!(store.len().await, 1);

        let found = store.find(&receipt.id).await.unwrap();
        assert_eq!(found.document, doc);
    }
}
