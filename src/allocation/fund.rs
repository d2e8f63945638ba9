use std::collections::HashSet;

use super::domain::{FundShare, NgoId};

/// Rejection raised when an allocation batch is malformed. Raised before any
/// share is computed; a failed run distributes nothing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    #[error("total fund must be non-negative, got {0}")]
    NegativeFund(f64),
    #[error("score for NGO '{ngo_id}' must be non-negative, got {score}")]
    NegativeScore { ngo_id: NgoId, score: f64 },
    #[error("NGO '{0}' appears more than once in the allocation batch")]
    DuplicateNgo(NgoId),
}

/// Apportion `total_fund` across NGOs in proportion to their composite
/// scores. When every score is zero the pool is split equally instead, which
/// also guards the division for an all-zero batch.
///
/// Conservation holds up to floating-point rounding: allocations sum to
/// `total_fund` and percentages to 100.
pub fn calculate_fund_allocation(
    scores: &[(NgoId, f64)],
    total_fund: f64,
) -> Result<Vec<FundShare>, AllocationError> {
    if total_fund < 0.0 {
        return Err(AllocationError::NegativeFund(total_fund));
    }

    let mut seen = HashSet::new();
    for (ngo_id, score) in scores {
        if *score < 0.0 {
            return Err(AllocationError::NegativeScore {
                ngo_id: ngo_id.clone(),
                score: *score,
            });
        }
        if !seen.insert(ngo_id) {
            return Err(AllocationError::DuplicateNgo(ngo_id.clone()));
        }
    }

    if scores.is_empty() {
        return Ok(Vec::new());
    }

    let total_score: f64 = scores.iter().map(|(_, score)| score).sum();

    if total_score == 0.0 {
        let count = scores.len() as f64;
        return Ok(scores
            .iter()
            .map(|(ngo_id, _)| FundShare {
                ngo_id: ngo_id.clone(),
                allocation: total_fund / count,
                percentage: 100.0 / count,
            })
            .collect());
    }

    Ok(scores
        .iter()
        .map(|(ngo_id, score)| FundShare {
            ngo_id: ngo_id.clone(),
            allocation: (score / total_score) * total_fund,
            percentage: (score / total_score) * 100.0,
        })
        .collect())
}
