//! Offline training entry point
//!
//! Writes `scaler.json` and `model.json` into `MODEL_DIR` (default `ml`).
//! Set `DATASET_EXPORT_DIR` to also dump the labelled rows as JSONL.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use sleeprisk_core::dataset::{export_dataset, DatasetWriter};
use sleeprisk_core::features::FEATURE_LAYOUT;
use sleeprisk_core::model::save_artifacts;
use sleeprisk_core::registry::DISORDERS;
use sleeprisk_core::training::{train, TrainingConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let model_dir = PathBuf::from(env::var("MODEL_DIR").unwrap_or_else(|_| "ml".to_string()));
    let config = TrainingConfig::from_env().context("invalid training configuration")?;

    log::info!("Training sleep disorder classifier: {:?}", config);
    let outcome = train(&config).context("training failed")?;
    outcome.report.log();

    let model_id = save_artifacts(&model_dir, &outcome.scaler, &outcome.forest)
        .with_context(|| format!("failed to write artifacts to {}", model_dir.display()))?;

    if let Ok(export_dir) = env::var("DATASET_EXPORT_DIR") {
        let writer = DatasetWriter::from_path(&export_dir)
            .with_context(|| format!("failed to open dataset directory {}", export_dir))?;
        let rows = export_dataset(&writer, &outcome.dataset).context("dataset export failed")?;
        let stats = writer.stats().context("failed to read dataset directory")?;
        log::info!(
            "Exported {} rows to {} ({} files, {:.2} MB, current {})",
            rows,
            export_dir,
            stats.total_files,
            stats.total_size_mb,
            stats.current_file.as_deref().unwrap_or("-")
        );
    }

    log::info!("Model {} ready in {}", model_id, model_dir.display());
    log::info!("Feature order: {:?}", FEATURE_LAYOUT);
    for record in DISORDERS.iter() {
        log::info!("  {} = {} ({})", record.index.unwrap_or_default(), record.name, record.severity);
    }

    Ok(())
}
