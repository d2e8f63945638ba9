use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::domain::{NgoId, NgoMetrics};

/// One row of the aggregation job's CSV export. Empty cells mean the
/// aggregate was unavailable for that NGO.
#[derive(Debug, Deserialize)]
struct MetricsRow {
    ngo_id: String,
    avg_rating: Option<f64>,
    total_ratings: Option<u32>,
    volunteers_engaged: Option<u32>,
    impact_metrics_submitted: Option<u32>,
    total_drives: Option<u32>,
    on_time_reports: Option<u32>,
    profile_fields: Option<u32>,
    total_profile_fields: Option<u32>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to open metrics export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to read metrics export: {0}")]
    Csv(#[from] csv::Error),
    #[error("metrics row {row} has an empty NGO id")]
    MissingNgoId { row: usize },
}

/// Parse a metrics export into scoring input, preserving row order.
pub fn parse_metrics<R: Read>(reader: R) -> Result<Vec<(NgoId, NgoMetrics)>, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut batch = Vec::new();

    for (index, result) in csv_reader.deserialize::<MetricsRow>().enumerate() {
        let row = result?;
        if row.ngo_id.is_empty() {
            // +2: one for the header, one for zero-based enumeration.
            return Err(IngestError::MissingNgoId { row: index + 2 });
        }

        batch.push((
            NgoId(row.ngo_id),
            NgoMetrics {
                avg_rating: row.avg_rating,
                total_ratings: row.total_ratings,
                volunteers_engaged: row.volunteers_engaged,
                impact_metrics_submitted: row.impact_metrics_submitted,
                total_drives: row.total_drives,
                on_time_reports: row.on_time_reports,
                profile_fields: row.profile_fields,
                total_profile_fields: row.total_profile_fields,
            },
        ));
    }

    Ok(batch)
}

pub fn parse_metrics_file<P: AsRef<Path>>(path: P) -> Result<Vec<(NgoId, NgoMetrics)>, IngestError> {
    let file = File::open(path)?;
    parse_metrics(file)
}
