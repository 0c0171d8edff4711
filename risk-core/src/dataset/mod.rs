//! Dataset Module - synthetic training data
//!
//! Draws raw feature rows, labels them with the label rule, and optionally
//! exports the labelled rows as JSONL for inspection or external training.

pub mod record;
pub mod synth;
pub mod writer;

#[cfg(test)]
mod tests;

pub use record::DatasetRecord;
pub use synth::{class_distribution, generate, LabeledDataset, SyntheticSampler};
pub use writer::{DatasetStats, DatasetWriter};

use crate::labeling;

/// Write every row of `dataset` through `writer`, returning the row count
pub fn export_dataset(writer: &DatasetWriter, dataset: &LabeledDataset) -> std::io::Result<usize> {
    let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;

    let records: Vec<DatasetRecord> = (0..dataset.len())
        .map(|i| {
            let row = dataset.row(i);
            let outcome = labeling::explain(&row);
            DatasetRecord::new(timestamp, &row, outcome.score, outcome.disorder)
        })
        .collect();

    writer.append_all(&records)?;
    log::info!(
        "Dataset exported: {} records to {}",
        records.len(),
        writer.base_dir().display()
    );
    Ok(records.len())
}
