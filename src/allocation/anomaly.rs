use serde::{Deserialize, Serialize};

/// Behavioral signals computed upstream from the NGO's recent activity.
/// Signals are independent; any subset may fire at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalySignals {
    #[serde(default)]
    pub sudden_rating_spikes: bool,
    #[serde(default)]
    pub high_cancellation_rate: bool,
    #[serde(default)]
    pub suspicious_metrics: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyKind {
    RatingSpike,
    HighCancellations,
    SuspiciousMetrics,
}

impl AnomalyKind {
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyKind::RatingSpike => "rating_spike",
            AnomalyKind::HighCancellations => "high_cancellations",
            AnomalyKind::SuspiciousMetrics => "suspicious_metrics",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

/// A single item for the manual-review queue. Advisory only: flags never
/// block scoring or allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnomalyFlag {
    pub kind: AnomalyKind,
    pub severity: Severity,
    pub description: String,
}

/// Map the boolean signals to review flags, in a fixed order so reports are
/// stable across runs.
pub fn detect_anomalies(signals: &AnomalySignals) -> Vec<AnomalyFlag> {
    let mut flags = Vec::new();

    if signals.sudden_rating_spikes {
        flags.push(AnomalyFlag {
            kind: AnomalyKind::RatingSpike,
            severity: Severity::Medium,
            description: "Unusual spike in ratings detected - requires manual review".to_string(),
        });
    }

    if signals.high_cancellation_rate {
        flags.push(AnomalyFlag {
            kind: AnomalyKind::HighCancellations,
            severity: Severity::High,
            description: "High volunteer no-show rate may indicate coordination issues"
                .to_string(),
        });
    }

    if signals.suspicious_metrics {
        flags.push(AnomalyFlag {
            kind: AnomalyKind::SuspiciousMetrics,
            severity: Severity::High,
            description: "Reported impact metrics appear inconsistent - verification required"
                .to_string(),
        });
    }

    flags
}
