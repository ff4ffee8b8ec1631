//! Held-out test set construction.
//!
//! Labels are normalized before overlap filtering. Text comparison is exact:
//! no case folding, no whitespace trimming.

use crate::csv_processor::{load_dataset, load_texts, write_dataset};
use crate::dataset::{
    dedup_by_text, sample_up_to, shuffle, split_by_class, ClassCounts, Label, Record, Shortfall,
};
use crate::utils::{CorpusPrepError, PartitionConfig, Result};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct PartitionReport {
    pub parent_rows: usize,
    pub parent_unlabelled: usize,
    pub parent_duplicates: usize,
    pub parent_unique: usize,
    /// Unique rows per training set, after de-duplication.
    pub training_sets: BTreeMap<String, usize>,
    pub training_texts: usize,
    pub overlap_removed: usize,
    pub available: ClassCounts,
    pub written: ClassCounts,
    pub shortfalls: Vec<Shortfall>,
}

/// Distinct texts across every training subset.
pub fn training_text_set<'a, I>(subsets: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    subsets.into_iter().flatten().cloned().collect()
}

/// Pure partitioning step: everything after loading and before writing.
pub fn build_test_set(
    mut parent: Vec<Record>,
    training_texts: &HashSet<String>,
    limit_per_class: usize,
    seed: u64,
    report: &mut PartitionReport,
) -> Result<Vec<Record>> {
    report.parent_duplicates = dedup_by_text(&mut parent);
    report.parent_unique = parent.len();
    report.training_texts = training_texts.len();

    parent.retain(|record| !training_texts.contains(&record.text));
    report.overlap_removed = report.parent_unique - parent.len();
    report.available = ClassCounts::of(&parent);

    info!(
        removed = report.overlap_removed,
        remaining = parent.len(),
        ai = report.available.ai,
        human = report.available.human,
        "Removed training overlaps from parent dataset"
    );

    for label in Label::ALL {
        if report.available.get(label) == 0 {
            return Err(CorpusPrepError::MissingClass { label });
        }
    }

    let (ai, human) = split_by_class(parent);
    let capacity = ai.len().min(limit_per_class) + human.len().min(limit_per_class);
    let mut test = Vec::with_capacity(capacity);
    for (label, rows) in [(Label::Human, human), (Label::Ai, ai)] {
        if rows.len() < limit_per_class {
            warn!(
                class = %label,
                available = rows.len(),
                requested = limit_per_class,
                "Fewer rows than the per-class limit, taking all of them"
            );
            report.shortfalls.push(Shortfall {
                label,
                available: rows.len(),
                requested: limit_per_class,
            });
        }
        test.extend(sample_up_to(rows, limit_per_class, seed));
    }

    shuffle(&mut test, seed);

    if test.is_empty() {
        return Err(CorpusPrepError::EmptyTestSet);
    }

    report.written = ClassCounts::of(&test);
    Ok(test)
}

fn load_training_sets(
    train_files: &BTreeMap<String, std::path::PathBuf>,
    text_column: &str,
    report: &mut PartitionReport,
) -> Result<Vec<Vec<String>>> {
    let mut subsets = Vec::with_capacity(train_files.len());
    for (name, path) in train_files {
        let mut texts = load_texts(path, text_column)?;
        let mut seen = HashSet::with_capacity(texts.len());
        texts.retain(|text| seen.insert(text.clone()));

        info!(set = %name, path = %path.display(), rows = texts.len(), "Loaded training set");
        report.training_sets.insert(name.clone(), texts.len());
        subsets.push(texts);
    }
    Ok(subsets)
}

pub fn run_partition(config: &PartitionConfig) -> Result<PartitionReport> {
    info!(parent = %config.parent_file.display(), "Loading datasets");
    let mut report = PartitionReport::default();

    let parent = load_dataset(&config.parent_file, &config.columns)?;
    report.parent_rows = parent.rows_read;
    report.parent_unlabelled = parent.rows_dropped;

    let subsets = load_training_sets(&config.train_files, &config.columns.text, &mut report)?;
    let training_texts = training_text_set(&subsets);
    drop(subsets);

    let test = build_test_set(
        parent.records,
        &training_texts,
        config.limit_per_class,
        config.seed,
        &mut report,
    )?;

    write_dataset(&config.output_file, &test)?;
    log_summary(&report, &config.output_file);
    Ok(report)
}

fn log_summary(report: &PartitionReport, output: &Path) {
    info!(
        original_parent_size = report.parent_rows,
        removed_overlap = report.overlap_removed,
        final_size = report.written.total(),
        human = report.written.human,
        ai = report.written.ai,
        output = %output.display(),
        "Saved new test set"
    );
}
