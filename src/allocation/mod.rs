//! NGO allocation scoring, CSR fund distribution, and anomaly review.
//!
//! The scoring engine turns raw per-NGO aggregates into five component
//! scores and a weighted composite; the fund utility apportions a CSR pool
//! over those composites; anomaly detection maps behavioral signals to
//! manual-review flags. All three are pure. The service layer adds the two
//! injected side effects the platform needs: persisting scores and auditing
//! weight changes.

pub mod anomaly;
pub mod domain;
pub mod engine;
pub mod fund;
pub mod ingest;
pub mod repository;
pub mod service;
pub mod weights;

#[cfg(test)]
mod tests;

pub use anomaly::{detect_anomalies, AnomalyFlag, AnomalyKind, AnomalySignals, Severity};
pub use domain::{FundShare, NgoId, NgoMetrics, ScoreComponents};
pub use engine::AllocationScoringEngine;
pub use fund::{calculate_fund_allocation, AllocationError};
pub use ingest::{parse_metrics, parse_metrics_file, IngestError};
pub use repository::{
    AuditError, AuditSink, RepositoryError, ScoreRecord, ScoreRepository, TracingAuditSink,
    WeightChangeEvent,
};
pub use service::{AllocationRound, AllocationService, AllocationServiceError};
pub use weights::{ScoringWeights, WeightError, WEIGHT_SUM_TOLERANCE};
