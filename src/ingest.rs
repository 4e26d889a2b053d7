//! Record ingestion: tabular parsing and synthetic generation.
//!
//! Parsing is deliberately forgiving at the cell level: a malformed
//! value is coerced to the column default so dirty exploratory data
//! never blocks the workflow. Only structural parser failures (such as
//! malformed quoting) abort an ingestion.

use crate::config::DemoConfig;
use crate::store::DatasetStore;
use crate::types::error::IngestError;
use crate::types::record::StudentRecord;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Expected header columns, matched by name so column order is free.
const COL_STUDY_HOURS: &str = "studyHours";
const COL_PREVIOUS_SCORE: &str = "previousScore";
const COL_ATTENDANCE: &str = "attendance";
const COL_DIFFICULTY: &str = "difficulty";
const COL_INTERNET_ACCESS: &str = "internetAccess";

/// Parses raw delimited text into records and generates synthetic demo
/// data. Accepts already-read content only; file acquisition lives with
/// the caller.
pub struct RecordIngestor {
    demo_delay: Duration,
    seed: Option<u64>,
}

impl RecordIngestor {
    /// Build an ingestor from the demo configuration section.
    pub fn new(demo: &DemoConfig) -> Self {
        Self {
            demo_delay: demo.load_delay(),
            seed: demo.seed,
        }
    }

    /// Build an ingestor with explicit settings (tests use zero delay).
    pub fn with_settings(demo_delay: Duration, seed: Option<u64>) -> Self {
        Self { demo_delay, seed }
    }

    /// Parse delimited text with a mandatory header row.
    ///
    /// Each data row becomes one record with `id` equal to its 0-based
    /// index (blank lines excluded). Missing or non-numeric cells coerce
    /// to `0` (`studyHours`, `previousScore`, `attendance`) or `3`
    /// (`difficulty`); `internetAccess` is true only for the literal
    /// `"true"` or `"1"`.
    pub fn parse_csv(&self, content: &str) -> Result<Vec<StudentRecord>, IngestError> {
        // Strict field counts: a row that does not match the header is a
        // structural failure, matching the upstream tabular parser.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| IngestError::ParseFailure(e.to_string()))?
            .clone();
        let column = |name: &str| headers.iter().position(|h| h == name);

        let study_hours_col = column(COL_STUDY_HOURS);
        let previous_score_col = column(COL_PREVIOUS_SCORE);
        let attendance_col = column(COL_ATTENDANCE);
        let difficulty_col = column(COL_DIFFICULTY);
        let internet_col = column(COL_INTERNET_ACCESS);

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row.map_err(|e| IngestError::ParseFailure(e.to_string()))?;
            let cell = |col: Option<usize>| col.and_then(|i| row.get(i));

            records.push(StudentRecord::new(
                index as u64,
                numeric_or(cell(study_hours_col), 0.0),
                numeric_or(cell(previous_score_col), 0.0),
                numeric_or(cell(attendance_col), 0.0),
                numeric_or(cell(difficulty_col), 3.0),
                matches!(cell(internet_col), Some("true") | Some("1")),
            ));
        }

        Ok(records)
    }

    /// Generate `count` synthetic records for demo purposes.
    ///
    /// Unlike file ingestion, demo records carry a pre-populated random
    /// predicted score so charts have something to show immediately.
    pub fn generate(&self, count: usize) -> Vec<StudentRecord> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        (0..count)
            .map(|i| StudentRecord {
                id: i as u64,
                study_hours: rng.gen_range(1.0..11.0),
                previous_score: f64::from(rng.gen_range(0u32..=100)),
                attendance: rng.gen_range(0.0..100.0),
                difficulty: rng.gen_range(1.0..6.0),
                internet_access: rng.gen_bool(0.8),
                predicted_score: Some(rng.gen_range(0..=100)),
            })
            .collect()
    }

    /// Parse `content` and replace the store's collection with the result.
    ///
    /// The store's loading flag reads true for the duration; on failure
    /// the error message is recorded on the store and the previous
    /// collection is left in place.
    pub async fn load_csv(
        &self,
        store: &DatasetStore,
        content: &str,
    ) -> Result<usize, IngestError> {
        store.set_loading(true);
        store.clear_error().await;

        let result = self.parse_csv(content);
        let outcome = match result {
            Ok(records) => {
                let count = records.len();
                store.replace(records).await;
                info!(records = count, "Tabular data ingested");
                Ok(count)
            }
            Err(e) => {
                warn!(error = %e, "Ingestion failed");
                store.set_error(e.to_string()).await;
                Err(e)
            }
        };

        store.set_loading(false);
        outcome
    }

    /// Generate demo data (after the simulated load latency) and replace
    /// the store's collection with it.
    pub async fn load_demo(&self, store: &DatasetStore, count: usize) -> usize {
        store.set_loading(true);
        store.clear_error().await;

        sleep(self.demo_delay).await;
        let records = self.generate(count);
        let count = records.len();
        store.replace(records).await;
        info!(records = count, "Demo data generated");

        store.set_loading(false);
        count
    }
}

/// Coerce a cell to a finite number, falling back to the column default.
fn numeric_or(cell: Option<&str>, default: f64) -> f64 {
    cell.and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}
