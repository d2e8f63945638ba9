use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::allocation::domain::{NgoId, NgoMetrics};
use crate::allocation::engine::AllocationScoringEngine;
use crate::allocation::repository::{
    AuditError, AuditSink, RepositoryError, ScoreRecord, ScoreRepository, WeightChangeEvent,
};
use crate::allocation::service::AllocationService;
use crate::allocation::weights::ScoringWeights;

pub(super) fn engine() -> AllocationScoringEngine {
    AllocationScoringEngine::with_default_weights()
}

/// Aggregates for an established NGO with a clean track record.
pub(super) fn established_metrics() -> NgoMetrics {
    NgoMetrics {
        avg_rating: Some(4.5),
        total_ratings: Some(10),
        volunteers_engaged: Some(50),
        impact_metrics_submitted: Some(3),
        total_drives: Some(4),
        on_time_reports: Some(4),
        profile_fields: Some(8),
        total_profile_fields: Some(8),
    }
}

pub(super) fn ngo(id: &str) -> NgoId {
    NgoId::from(id)
}

pub(super) fn build_service() -> (
    AllocationService<MemoryScoreStore, MemoryAudit>,
    Arc<MemoryScoreStore>,
    Arc<MemoryAudit>,
) {
    let repository = Arc::new(MemoryScoreStore::default());
    let audit = Arc::new(MemoryAudit::default());
    let service = AllocationService::new(
        repository.clone(),
        audit.clone(),
        ScoringWeights::default(),
    )
    .expect("default weights are valid");
    (service, repository, audit)
}

#[derive(Default, Clone)]
pub(super) struct MemoryScoreStore {
    pub(super) records: Arc<Mutex<HashMap<NgoId, ScoreRecord>>>,
}

impl MemoryScoreStore {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("store mutex poisoned").len()
    }
}

impl ScoreRepository for MemoryScoreStore {
    fn upsert(&self, record: ScoreRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.insert(record.ngo_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, ngo_id: &NgoId) -> Result<Option<ScoreRecord>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(ngo_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    events: Arc<Mutex<Vec<WeightChangeEvent>>>,
}

impl MemoryAudit {
    pub(super) fn events(&self) -> Vec<WeightChangeEvent> {
        self.events.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditSink for MemoryAudit {
    fn record(&self, event: WeightChangeEvent) -> Result<(), AuditError> {
        self.events
            .lock()
            .expect("audit mutex poisoned")
            .push(event);
        Ok(())
    }
}

pub(super) struct UnavailableScoreStore;

impl ScoreRepository for UnavailableScoreStore {
    fn upsert(&self, _record: ScoreRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _ngo_id: &NgoId) -> Result<Option<ScoreRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}
