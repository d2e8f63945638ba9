use serde::{Deserialize, Serialize};

/// Allowed drift when checking that the five weights sum to 100.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Percentage split across the five scoring components. A closed record:
/// values are only ever replaced wholesale through [`ScoringWeights::validated`],
/// never adjusted field by field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub rating: f64,
    pub engagement: f64,
    pub impact: f64,
    pub reporting: f64,
    pub profile: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating: 30.0,
            engagement: 20.0,
            impact: 20.0,
            reporting: 15.0,
            profile: 15.0,
        }
    }
}

impl ScoringWeights {
    /// Consume the record and return it only if it forms a valid split:
    /// every weight non-negative and the total at 100 within tolerance.
    pub fn validated(self) -> Result<Self, WeightError> {
        for (field, value) in self.fields() {
            if value < 0.0 {
                return Err(WeightError::Negative { field, value });
            }
        }

        let sum = self.sum();
        if (sum - 100.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightError::Sum { sum });
        }

        Ok(self)
    }

    pub fn sum(&self) -> f64 {
        self.rating + self.engagement + self.impact + self.reporting + self.profile
    }

    fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("rating", self.rating),
            ("engagement", self.engagement),
            ("impact", self.impact),
            ("reporting", self.reporting),
            ("profile", self.profile),
        ]
    }
}

/// Rejection raised when a weight split cannot be applied.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("weight '{field}' must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("scoring weights must sum to 100 (within 0.01), got {sum}")]
    Sum { sum: f64 },
}
