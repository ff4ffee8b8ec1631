use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use corpus_prep::csv_processor::load_texts;
use corpus_prep::utils::{Columns, ExtractConfig, PartitionConfig};
use corpus_prep::{load_dataset, run_extract, run_partition, ClassCounts, CorpusPrepError, Label};

fn write_rows(path: &Path, rows: impl IntoIterator<Item = (String, &'static str)>) {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path).unwrap());
    writeln!(file, "text,generated").unwrap();
    for (text, label) in rows {
        writeln!(file, "{text},{label}").unwrap();
    }
}

fn partition_config(dir: &Path, limit: usize, train: &[(&str, PathBuf)]) -> PartitionConfig {
    PartitionConfig {
        parent_file: dir.join("parent.csv"),
        train_files: train
            .iter()
            .map(|(name, path)| (name.to_string(), path.clone()))
            .collect(),
        output_file: dir.join("test_set_clean.csv"),
        columns: Columns::default(),
        limit_per_class: limit,
        seed: 42,
    }
}

#[test]
fn extractor_fills_quota_and_reports_shortfall() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("source.csv");
    let ai = (0..12_000).map(|i| (format!("machine text {i}"), "1.0"));
    let human = (0..3_000).map(|i| (format!("human text {i}"), "0.0"));
    write_rows(&source, ai.chain(human));

    let config = ExtractConfig {
        input_file: source,
        output_file: dir.path().join("balanced.csv"),
        samples_per_class: 10_000,
        chunk_size: 2_500,
        ..ExtractConfig::default()
    };
    let report = run_extract(&config).unwrap();

    assert!(!report.stopped_early);
    assert_eq!(report.chunks_read, 6);
    assert_eq!(report.written, ClassCounts { ai: 10_000, human: 3_000 });
    assert_eq!(report.shortfalls.len(), 1);
    assert_eq!(report.shortfalls[0].label, Label::Human);
    assert_eq!(report.shortfalls[0].available, 3_000);

    let written = load_dataset(&config.output_file, &Columns::default()).unwrap();
    assert_eq!(ClassCounts::of(&written.records), report.written);
}

#[test]
fn partition_scenario_excludes_training_text() {
    let dir = tempfile::tempdir().unwrap();
    write_rows(
        &dir.path().join("parent.csv"),
        [
            ("a".to_string(), "True"),
            ("b".to_string(), "False"),
            ("c".to_string(), "True"),
        ],
    );
    let train = dir.path().join("train.csv");
    write_rows(&train, [("a".to_string(), "True")]);

    let config = partition_config(dir.path(), 10, &[("small", train)]);
    let report = run_partition(&config).unwrap();
    assert_eq!(report.parent_rows, 3);
    assert_eq!(report.overlap_removed, 1);

    let mut texts = load_texts(&config.output_file, "text").unwrap();
    texts.sort();
    assert_eq!(texts, vec!["b", "c"]);
}

#[test]
fn partition_is_disjoint_capped_and_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let parent = (0..400).map(|i| (format!("doc {i}"), if i % 3 == 0 { "human" } else { "ai" }));
    write_rows(&dir.path().join("parent.csv"), parent);

    let small = dir.path().join("small.csv");
    let large = dir.path().join("large.csv");
    write_rows(&small, (0..50).map(|i| (format!("doc {i}"), "ai")));
    write_rows(&large, (25..200).step_by(2).map(|i| (format!("doc {i}"), "human")));

    let config = partition_config(
        dir.path(),
        40,
        &[("small", small.clone()), ("large", large.clone())],
    );
    let report = run_partition(&config).unwrap();
    assert_eq!(report.written, ClassCounts { ai: 40, human: 40 });
    assert_eq!(report.training_sets.len(), 2);

    let first_run = std::fs::read(&config.output_file).unwrap();
    run_partition(&config).unwrap();
    assert_eq!(std::fs::read(&config.output_file).unwrap(), first_run);

    let training: HashSet<String> = load_texts(&small, "text")
        .unwrap()
        .into_iter()
        .chain(load_texts(&large, "text").unwrap())
        .collect();
    let test = load_texts(&config.output_file, "text").unwrap();
    assert!(test.iter().all(|text| !training.contains(text)));
}

#[test]
fn partition_aborts_without_output_when_a_class_vanishes() {
    let dir = tempfile::tempdir().unwrap();
    write_rows(
        &dir.path().join("parent.csv"),
        [
            ("a".to_string(), "1"),
            ("b".to_string(), "0"),
            ("c".to_string(), "1"),
        ],
    );
    let train = dir.path().join("train.csv");
    write_rows(&train, [("a".to_string(), "1"), ("c".to_string(), "0")]);

    let config = partition_config(dir.path(), 10, &[("medium", train)]);
    let err = run_partition(&config).unwrap_err();

    assert!(matches!(err, CorpusPrepError::MissingClass { label: Label::Ai }));
    assert!(err.to_string().contains("Missing class"));
    assert!(!config.output_file.exists());
}

#[test]
fn partition_with_zero_cap_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    write_rows(
        &dir.path().join("parent.csv"),
        [("a".to_string(), "1"), ("b".to_string(), "0")],
    );
    let train = dir.path().join("train.csv");
    write_rows(&train, [("unrelated".to_string(), "1")]);

    let config = partition_config(dir.path(), 0, &[("small", train)]);
    let err = run_partition(&config).unwrap_err();

    assert!(matches!(err, CorpusPrepError::EmptyTestSet));
    assert!(!config.output_file.exists());
}
