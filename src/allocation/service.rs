use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::anomaly::{detect_anomalies, AnomalyFlag, AnomalySignals};
use super::domain::{FundShare, NgoId, NgoMetrics};
use super::engine::AllocationScoringEngine;
use super::fund::{calculate_fund_allocation, AllocationError};
use super::repository::{
    AuditError, AuditSink, RepositoryError, ScoreRecord, ScoreRepository, WeightChangeEvent,
};
use super::weights::{ScoringWeights, WeightError};

/// Service composing the scoring engine with the injected score store and
/// audit collaborators.
pub struct AllocationService<R, A> {
    repository: Arc<R>,
    audit: Arc<A>,
    engine: Arc<AllocationScoringEngine>,
}

/// Outcome of one allocation run over a batch of NGO metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRound {
    pub total_fund: f64,
    pub scores: Vec<ScoreRecord>,
    pub shares: Vec<FundShare>,
}

impl<R, A> AllocationService<R, A>
where
    R: ScoreRepository + 'static,
    A: AuditSink + 'static,
{
    pub fn new(repository: Arc<R>, audit: Arc<A>, weights: ScoringWeights) -> Result<Self, WeightError> {
        let engine = Arc::new(AllocationScoringEngine::new(weights)?);
        Ok(Self {
            repository,
            audit,
            engine,
        })
    }

    pub fn engine(&self) -> &AllocationScoringEngine {
        &self.engine
    }

    /// Score one NGO and persist the outcome.
    pub fn score_ngo(
        &self,
        ngo_id: &NgoId,
        metrics: &NgoMetrics,
    ) -> Result<ScoreRecord, AllocationServiceError> {
        let record = self.build_record(ngo_id, metrics);
        self.repository.upsert(record.clone())?;
        Ok(record)
    }

    /// Score a batch of NGOs, distribute the fund over their composites, and
    /// persist every score. Validation happens before anything is written:
    /// a rejected batch leaves the store untouched.
    pub fn run_allocation(
        &self,
        batch: &[(NgoId, NgoMetrics)],
        total_fund: f64,
    ) -> Result<AllocationRound, AllocationServiceError> {
        let scores: Vec<ScoreRecord> = batch
            .iter()
            .map(|(ngo_id, metrics)| self.build_record(ngo_id, metrics))
            .collect();

        let composites: Vec<(NgoId, f64)> = scores
            .iter()
            .map(|record| (record.ngo_id.clone(), record.composite))
            .collect();
        let shares = calculate_fund_allocation(&composites, total_fund)?;

        for record in &scores {
            self.repository.upsert(record.clone())?;
        }

        Ok(AllocationRound {
            total_fund,
            scores,
            shares,
        })
    }

    /// Validate and apply a new weight split, then notify the audit sink.
    /// The active weights survive unchanged when validation fails.
    pub fn update_weights(
        &self,
        next: ScoringWeights,
        actor: &str,
        reason: &str,
    ) -> Result<ScoringWeights, AllocationServiceError> {
        let applied = self.engine.update_weights(next)?;
        self.audit.record(WeightChangeEvent {
            actor: actor.to_string(),
            reason: reason.to_string(),
            weights: applied,
            changed_at: Utc::now(),
        })?;
        Ok(applied)
    }

    /// Advisory anomaly review; orthogonal to scoring and never blocks it.
    pub fn review_signals(&self, signals: &AnomalySignals) -> Vec<AnomalyFlag> {
        detect_anomalies(signals)
    }

    fn build_record(&self, ngo_id: &NgoId, metrics: &NgoMetrics) -> ScoreRecord {
        let components = self.engine.score_components(metrics);
        let composite = self.engine.composite_score(&components);
        ScoreRecord {
            ngo_id: ngo_id.clone(),
            components,
            composite,
            scored_at: Utc::now(),
        }
    }
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error(transparent)]
    Weights(#[from] WeightError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}
