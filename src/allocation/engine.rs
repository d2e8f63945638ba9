use std::sync::RwLock;

use super::domain::{NgoMetrics, ScoreComponents};
use super::weights::{ScoringWeights, WeightError};

/// Ratings below this sample size are damped toward zero so a handful of
/// five-star reviews cannot outrank an established track record.
const RATING_RELIABILITY_THRESHOLD: f64 = 5.0;

/// Volunteer count at which the engagement curve plateaus.
const ENGAGEMENT_PLATEAU: f64 = 500.0;
const ENGAGEMENT_LOG_SCALE: f64 = 43.4;
const ENGAGEMENT_LOG_OFFSET: f64 = 0.1;

/// Converts raw NGO aggregates into component and composite allocation
/// scores under the currently active weight split.
///
/// The engine is safe to share across threads: weights are swapped wholesale
/// under a write lock, so concurrent scorers always observe a full split.
pub struct AllocationScoringEngine {
    weights: RwLock<ScoringWeights>,
}

impl AllocationScoringEngine {
    pub fn new(weights: ScoringWeights) -> Result<Self, WeightError> {
        Ok(Self {
            weights: RwLock::new(weights.validated()?),
        })
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: RwLock::new(ScoringWeights::default()),
        }
    }

    /// Snapshot of the active weights. Returned by value, so callers cannot
    /// reach back into engine state.
    pub fn weights(&self) -> ScoringWeights {
        // ScoringWeights is Copy, so a panicked writer cannot have left a
        // torn value behind; recovering from poisoning is safe here.
        *self
            .weights
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Validate and atomically swap in a new weight split. The active
    /// weights are untouched when validation fails.
    pub fn update_weights(&self, next: ScoringWeights) -> Result<ScoringWeights, WeightError> {
        let next = next.validated()?;
        let mut guard = self
            .weights
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = next;
        Ok(next)
    }

    /// Compute the five component scores for one NGO. Missing aggregates
    /// resolve to documented fallbacks, never errors.
    pub fn score_components(&self, metrics: &NgoMetrics) -> ScoreComponents {
        ScoreComponents {
            rating: rating_score(metrics.avg_rating, metrics.total_ratings),
            engagement: engagement_score(metrics.volunteers_engaged),
            impact: completion_score(
                metrics.impact_metrics_submitted,
                metrics.total_drives,
                0.0,
            ),
            reporting: completion_score(metrics.on_time_reports, metrics.total_drives, 100.0),
            profile: completion_score(
                metrics.profile_fields,
                metrics.total_profile_fields,
                100.0,
            ),
        }
    }

    /// Weighted composite of the five components, rounded to two decimals.
    pub fn composite_score(&self, components: &ScoreComponents) -> f64 {
        let weights = self.weights();
        let composite = components.rating * weights.rating / 100.0
            + components.engagement * weights.engagement / 100.0
            + components.impact * weights.impact / 100.0
            + components.reporting * weights.reporting / 100.0
            + components.profile * weights.profile / 100.0;

        (composite * 100.0).round() / 100.0
    }
}

/// Five-star average scaled to 0-100, damped by the review sample size.
fn rating_score(avg_rating: Option<f64>, total_ratings: Option<u32>) -> f64 {
    let (avg, count) = match (avg_rating, total_ratings) {
        (Some(avg), Some(count)) if avg > 0.0 && count > 0 => (avg, f64::from(count)),
        _ => return 0.0,
    };

    let reliability = (count / RATING_RELIABILITY_THRESHOLD).min(1.0);
    let base = (avg / 5.0) * 100.0;
    (base * reliability).round()
}

/// Logarithmic engagement curve: returns diminish sharply toward the
/// 500-volunteer plateau so very large NGOs do not dominate the pool.
/// The offset keeps `ln` defined at zero engagement; at the cap the curve
/// lands just above 100 and is deliberately left unclamped.
fn engagement_score(volunteers_engaged: Option<u32>) -> f64 {
    let engaged = match volunteers_engaged {
        Some(v) if v > 0 => f64::from(v),
        _ => return 0.0,
    };

    let normalized = (engaged / ENGAGEMENT_PLATEAU).min(1.0);
    ((normalized + ENGAGEMENT_LOG_OFFSET).ln() * ENGAGEMENT_LOG_SCALE + 100.0).round()
}

/// Completion ratio scaled to 0-100 with the ratio clamped at 1, so counts
/// recorded above their total can never contribute more than 100.
/// `vacuous` is the score for a zero/missing denominator: 0 where no drives
/// means nothing earned, 100 where no denominator means nothing owed.
fn completion_score(done: Option<u32>, total: Option<u32>, vacuous: f64) -> f64 {
    let total = match total {
        Some(t) if t > 0 => f64::from(t),
        _ => return vacuous,
    };
    let done = match done {
        Some(d) if d > 0 => f64::from(d),
        _ => return 0.0,
    };

    ((done / total).min(1.0) * 100.0).round()
}
