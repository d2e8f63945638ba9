use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{NgoId, ScoreComponents};
use super::weights::ScoringWeights;

/// Persisted outcome of scoring one NGO. The components ride along for
/// dashboard breakdowns; only the composite feeds fund allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub ngo_id: NgoId,
    pub components: ScoreComponents,
    pub composite: f64,
    pub scored_at: DateTime<Utc>,
}

/// Storage abstraction so the service module can be exercised in isolation.
/// The production implementation writes to the marketplace's relational store.
pub trait ScoreRepository: Send + Sync {
    fn upsert(&self, record: ScoreRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, ngo_id: &NgoId) -> Result<Option<ScoreRecord>, RepositoryError>;
}

/// Error enumeration for score store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("score record not found")]
    NotFound,
    #[error("score store unavailable: {0}")]
    Unavailable(String),
}

/// Event content delivered to the audit collaborator whenever the weight
/// split changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightChangeEvent {
    pub actor: String,
    pub reason: String,
    pub weights: ScoringWeights,
    pub changed_at: DateTime<Utc>,
}

/// Outbound audit hook. Injected by the caller; the engine itself never
/// performs I/O.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: WeightChangeEvent) -> Result<(), AuditError>;
}

/// Audit dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit transport unavailable: {0}")]
    Transport(String),
}

/// Default sink that emits weight changes through the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: WeightChangeEvent) -> Result<(), AuditError> {
        tracing::info!(
            actor = %event.actor,
            reason = %event.reason,
            weights = ?event.weights,
            changed_at = %event.changed_at,
            "scoring weights updated"
        );
        Ok(())
    }
}
