//! Student Performance Prediction Pipeline - Demo Entry Point
//!
//! Loads a dataset (CSV path argument or synthetic demo data), trains
//! the scoring model, batch-predicts every record, and prints one ad-hoc
//! prediction report.

use anyhow::{Context, Result};
use std::sync::Arc;
use student_performance_pipeline::{
    config::AppConfig, ingest::RecordIngestor, model::ModelHandle,
    orchestrator::TrainingOrchestrator, service::PredictionService, store::DatasetStore,
    types::record::ModelFeatures,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("student_performance_pipeline=info".parse()?),
        )
        .init();

    info!("Starting student performance prediction pipeline");

    // Load configuration, falling back to defaults when no file is present
    let config = match AppConfig::load() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            warn!(error = %e, "Using default configuration");
            AppConfig::default()
        }
    };

    // Initialize pipeline components
    let store = Arc::new(DatasetStore::new());
    let model = Arc::new(match config.demo.seed {
        Some(seed) => ModelHandle::with_seed(seed),
        None => ModelHandle::new(),
    });
    let ingestor = RecordIngestor::new(&config.demo);
    let orchestrator = TrainingOrchestrator::new(model.clone(), config.pipeline.train_delay());
    let service = PredictionService::new(model.clone(), store.clone(), &config);

    // Ingest: CSV path argument, or synthetic demo data
    match std::env::args().nth(1) {
        Some(path) => {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {path}"))?;
            let count = ingestor
                .load_csv(&store, &content)
                .await
                .context("Failed to ingest tabular data")?;
            info!(path = %path, records = count, "Dataset loaded from file");
        }
        None => {
            let count = ingestor.load_demo(&store, config.demo.record_count).await;
            info!(records = count, "Synthetic demo dataset generated");
        }
    }

    // Train
    let records = store.records().await;
    let report = orchestrator
        .train_model(&records)
        .await
        .context("Training failed")?;
    info!(
        run_id = %report.run_id,
        accuracy = format!("{:.1}%", report.accuracy * 100.0),
        "Model trained"
    );
    info!(
        study_hours = format!("{:.3}", report.importance.study_hours),
        previous_score = format!("{:.3}", report.importance.previous_score),
        attendance = format!("{:.3}", report.importance.attendance),
        difficulty = format!("{:.3}", report.importance.difficulty),
        internet_access = format!("{:.3}", report.importance.internet_access),
        "Feature importance"
    );

    // Batch-predict the whole dataset
    let predictions = service
        .predict_batch()
        .await
        .context("Batch prediction failed")?;
    let mean = predictions.values().map(|&s| f64::from(s)).sum::<f64>()
        / predictions.len().max(1) as f64;
    info!(
        records = predictions.len(),
        mean_score = format!("{mean:.1}"),
        "Batch prediction complete"
    );

    // One ad-hoc prediction with a full report
    let sample = ModelFeatures {
        study_hours: 2.0,
        previous_score: 55.0,
        attendance: 68.0,
        difficulty: 4.0,
        internet_access: false,
    };
    let report = service
        .predict_one_report(&sample)
        .await
        .context("Single prediction failed")?;
    info!(
        predicted_score = report.predicted_score,
        at_risk = report.risk.at_risk,
        factors = ?report.risk.factors,
        "Sample prediction"
    );
    for recommendation in &report.recommendations {
        info!("  - {recommendation}");
    }

    info!("Pipeline run complete");
    Ok(())
}
