use super::common::*;
use crate::allocation::engine::AllocationScoringEngine;
use crate::allocation::weights::{ScoringWeights, WeightError};

#[test]
fn default_weights_form_a_valid_split() {
    let weights = ScoringWeights::default();
    assert!(approx_eq(weights.sum(), 100.0));
    assert!(weights.validated().is_ok());
}

#[test]
fn rejects_sums_away_from_100() {
    for (rating, expected_sum) in [(29.0, 99.0), (31.0, 101.0), (80.0, 150.0)] {
        let weights = ScoringWeights {
            rating,
            ..ScoringWeights::default()
        };
        match weights.validated() {
            Err(WeightError::Sum { sum }) => assert!(approx_eq(sum, expected_sum)),
            other => panic!("expected sum rejection, got {other:?}"),
        }
    }
}

#[test]
fn accepts_drift_within_tolerance() {
    let weights = ScoringWeights {
        rating: 30.005,
        ..ScoringWeights::default()
    };
    assert!(weights.validated().is_ok());

    let weights = ScoringWeights {
        rating: 30.02,
        ..ScoringWeights::default()
    };
    assert!(matches!(
        weights.validated(),
        Err(WeightError::Sum { .. })
    ));
}

#[test]
fn rejects_negative_weight_even_when_sum_balances() {
    let weights = ScoringWeights {
        rating: -10.0,
        engagement: 60.0,
        ..ScoringWeights::default()
    };
    assert!(matches!(
        weights.validated(),
        Err(WeightError::Negative {
            field: "rating",
            ..
        })
    ));
}

#[test]
fn engine_returns_the_weights_it_was_built_with() {
    let weights = ScoringWeights {
        rating: 25.0,
        engagement: 25.0,
        impact: 20.0,
        reporting: 15.0,
        profile: 15.0,
    };
    let engine = AllocationScoringEngine::new(weights).expect("valid split");
    assert_eq!(engine.weights(), weights);
}

#[test]
fn engine_construction_fails_on_invalid_split() {
    let weights = ScoringWeights {
        rating: 50.0,
        ..ScoringWeights::default()
    };
    assert!(AllocationScoringEngine::new(weights).is_err());
}

#[test]
fn failed_update_leaves_active_weights_untouched() {
    let engine = engine();
    let before = engine.weights();

    let bad = ScoringWeights {
        engagement: 99.0,
        ..ScoringWeights::default()
    };
    assert!(engine.update_weights(bad).is_err());
    assert_eq!(engine.weights(), before);
}

#[test]
fn successful_update_swaps_the_whole_split() {
    let engine = engine();
    let next = ScoringWeights {
        rating: 20.0,
        engagement: 20.0,
        impact: 20.0,
        reporting: 20.0,
        profile: 20.0,
    };

    let applied = engine.update_weights(next).expect("valid split");
    assert_eq!(applied, next);
    assert_eq!(engine.weights(), next);
}
