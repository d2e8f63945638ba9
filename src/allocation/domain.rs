use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an NGO profile as assigned by the marketplace store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NgoId(pub String);

impl fmt::Display for NgoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NgoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Raw operational aggregates for one NGO, as produced by the upstream
/// aggregation job. Every field is optional: new NGOs and NGOs with no
/// completed drives are the common case, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NgoMetrics {
    pub avg_rating: Option<f64>,
    pub total_ratings: Option<u32>,
    pub volunteers_engaged: Option<u32>,
    pub impact_metrics_submitted: Option<u32>,
    pub total_drives: Option<u32>,
    pub on_time_reports: Option<u32>,
    pub profile_fields: Option<u32>,
    pub total_profile_fields: Option<u32>,
}

/// The five normalized component scores computed from [`NgoMetrics`].
///
/// Each component is scaled to the 0-100 range, except `engagement`, whose
/// logarithmic curve tops out slightly above 100 at the volunteer cap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponents {
    pub rating: f64,
    pub engagement: f64,
    pub impact: f64,
    pub reporting: f64,
    pub profile: f64,
}

/// One NGO's share of a distributed CSR fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundShare {
    pub ngo_id: NgoId,
    pub allocation: f64,
    pub percentage: f64,
}
