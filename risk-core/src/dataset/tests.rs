use std::fs;

use tempfile::tempdir;

use super::*;
use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::labeling;
use crate::registry::{Disorder, CLASS_COUNT};

#[test]
fn test_generate_is_deterministic() {
    let a = generate(200, 42);
    let b = generate(200, 42);
    assert_eq!(a.features, b.features);
    assert_eq!(a.labels, b.labels);

    let c = generate(200, 43);
    assert_ne!(a.features, c.features);
}

#[test]
fn test_generated_rows_stay_in_range() {
    let dataset = generate(500, 7);
    assert_eq!(dataset.features.dim(), (500, FEATURE_COUNT));

    for row in dataset.features.rows() {
        assert!((3.0..10.0).contains(&row[0]));
        assert!((1.0..=10.0).contains(&row[1]) && row[1].fract() == 0.0);
        assert!((20.0..=79.0).contains(&row[2]));
        assert!((80.0..160.0).contains(&row[3]));
        assert!((50.0..=149.0).contains(&row[4]));
        assert!(row[5] == 0.0 || row[5] == 1.0);
        assert!((18.0..40.0).contains(&row[6]));
        assert!(row[7] == 0.0 || row[7] == 1.0);
        assert!((0.0..=15.0).contains(&row[8]));
    }
}

#[test]
fn test_matrix_rows_match_sampler_draws() {
    let dataset = generate(30, 11);
    let mut sampler = SyntheticSampler::new(11);
    for i in 0..dataset.len() {
        assert_eq!(dataset.row(i), sampler.sample());
    }

    let empty = generate(0, 11);
    assert!(empty.is_empty());
    assert_eq!(empty.features.dim(), (0, FEATURE_COUNT));
}

#[test]
fn test_labels_follow_label_rule() {
    let dataset = generate(100, 1);
    for i in 0..dataset.len() {
        assert_eq!(dataset.labels[i], labeling::label(&dataset.row(i)).index());
    }
    assert_eq!(dataset.class_distribution().iter().sum::<usize>(), 100);
    assert!(dataset.labels.iter().all(|&l| l < CLASS_COUNT));
}

#[test]
fn test_select_rows() {
    let dataset = generate(10, 3);
    let subset = dataset.select(&[2, 5]);
    assert_eq!(subset.len(), 2);
    assert_eq!(subset.features.row(1), dataset.features.row(5));
    assert_eq!(subset.labels[0], dataset.labels[2]);
}

#[test]
fn test_dataset_append_and_read() {
    let dir = tempdir().unwrap();
    let writer = DatasetWriter::from_path(dir.path()).unwrap();

    let row = FeatureVector::from_values([3.5, 9.0, 45.0, 115.0, 95.0, 1.0, 32.0, 1.0, 12.0]);
    let record = DatasetRecord::new(1234567890, &row, 6.0, Disorder::SleepApnea);
    writer.append_all(std::slice::from_ref(&record)).unwrap();

    let files = writer.list_files().unwrap();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_str().unwrap();
    assert!(name.starts_with("dataset-") && name.ends_with(".jsonl"));

    let content = fs::read_to_string(&files[0]).unwrap();
    let deserialized: DatasetRecord = serde_json::from_str(content.trim()).unwrap();
    assert_eq!(deserialized, record);
    assert_eq!(deserialized.label, 3);
    assert_eq!(deserialized.disorder, "Sleep Apnea");
}

#[test]
fn test_small_appends_share_one_file() {
    let dir = tempdir().unwrap();
    let writer = DatasetWriter::from_path(dir.path()).unwrap();
    let dataset = generate(25, 5);

    assert_eq!(export_dataset(&writer, &dataset).unwrap(), 25);
    assert_eq!(export_dataset(&writer, &dataset).unwrap(), 25);

    let stats = writer.stats().unwrap();
    assert_eq!(stats.total_files, 1);
    assert!(stats.current_file.is_some());

    let content = fs::read_to_string(&writer.list_files().unwrap()[0]).unwrap();
    assert_eq!(content.lines().count(), 50);
}
