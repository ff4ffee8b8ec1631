//! Import of a labelled dataset from the Hugging Face Hub.
//!
//! Every split is downloaded and concatenated in shard order, then written in
//! the same `text,generated` format the other procedures produce.

pub mod shards;

pub use shards::{read_shard, select_shards, ShardFormat, ShardRows};

use crate::csv_processor::write_dataset;
use crate::dataset::{ClassCounts, Record};
use crate::utils::{CorpusPrepError, HubConfig, Result};
use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct HubImportReport {
    pub shards: Vec<String>,
    pub rows_read: usize,
    pub rows_dropped: usize,
    pub written: ClassCounts,
}

/// Downloads the dataset's data shards into the local hub cache.
pub fn fetch_shards(dataset: &str) -> Result<Vec<(String, PathBuf)>> {
    let api = ApiBuilder::new()
        .with_progress(true)
        .build()
        .map_err(|e| CorpusPrepError::HubError(format!("failed building hf-hub client: {e}")))?;
    let repo = api.repo(Repo::new(dataset.to_string(), RepoType::Dataset));

    info!(dataset = %dataset, "Reading remote file list");
    let info = repo.info().map_err(|e| {
        CorpusPrepError::HubError(format!("failed reading repository info for {dataset}: {e}"))
    })?;

    let names = select_shards(info.siblings.into_iter().map(|s| s.rfilename));
    if names.is_empty() {
        return Err(CorpusPrepError::HubError(format!(
            "dataset {dataset} has no parquet or csv files"
        )));
    }

    let mut local = Vec::with_capacity(names.len());
    for name in names {
        let path = repo.get(&name).map_err(|e| {
            CorpusPrepError::HubError(format!("failed downloading '{name}' from hf-hub: {e}"))
        })?;
        local.push((name, path));
    }
    Ok(local)
}

/// Concatenates already-downloaded shards.
pub fn import_shards(
    shards: &[(String, PathBuf)],
    config: &HubConfig,
) -> Result<(Vec<Record>, HubImportReport)> {
    let mut report = HubImportReport::default();
    let mut records = Vec::new();

    for (name, path) in shards {
        let Some(format) = ShardFormat::from_path(name) else {
            continue;
        };
        let rows = read_shard(path, format, config)?;
        info!(shard = %name, rows = rows.records.len(), "Read shard");

        report.shards.push(name.clone());
        report.rows_read += rows.rows_read;
        report.rows_dropped += rows.rows_dropped;
        records.extend(rows.records);
    }

    if report.rows_dropped > 0 {
        warn!(
            dropped = report.rows_dropped,
            "Dropped rows without text or with unrecognized labels"
        );
    }

    if records.is_empty() {
        let names: Vec<&str> = shards.iter().map(|(name, _)| name.as_str()).collect();
        return Err(CorpusPrepError::NoRecords(names.join(", ")));
    }

    report.written = ClassCounts::of(&records);
    Ok((records, report))
}

pub fn run_hub_import(config: &HubConfig) -> Result<HubImportReport> {
    let shards = fetch_shards(&config.dataset)?;
    let (records, report) = import_shards(&shards, config)?;

    write_dataset(&config.output_file, &records)?;
    info!(
        rows = records.len(),
        ai = report.written.ai,
        human = report.written.human,
        output = %config.output_file.display(),
        "All data saved"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_shards_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let train = dir.path().join("train.csv");
        let test = dir.path().join("test.csv");
        std::fs::write(&train, "text,label\na,1\nb,0\n").unwrap();
        std::fs::write(&test, "text,generated,label\nc,0,1\n").unwrap();

        let shards = vec![
            ("data/test.csv".to_string(), test),
            ("data/train.csv".to_string(), train),
            ("README.md".to_string(), dir.path().join("README.md")),
        ];
        let (records, report) = import_shards(&shards, &HubConfig::default()).unwrap();

        let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["c", "a", "b"]);
        // `generated` wins over `label` when both are present.
        assert!(!records[0].generated());
        assert_eq!(report.shards.len(), 2);
        assert_eq!(report.written, ClassCounts { ai: 1, human: 2 });
    }

    #[test]
    fn shards_without_usable_rows_fail_the_import() {
        let dir = tempfile::tempdir().unwrap();
        let shard = dir.path().join("train.csv");
        std::fs::write(&shard, "title,text
T1,a
T2,b
").unwrap();

        let shards = vec![("data/train.csv".to_string(), shard)];
        let err = import_shards(&shards, &HubConfig::default()).unwrap_err();
        assert!(matches!(err, CorpusPrepError::NoRecords(ref names) if names == "data/train.csv"));
    }
}
