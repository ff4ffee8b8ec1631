//! Balanced subset extraction from a large labelled CSV.
//!
//! The source is read in chunks of `chunk_size` rows. Each class feeds a
//! seeded reservoir of `samples_per_class` slots, so memory stays bounded even
//! when one class dominates the file. Reading stops once both classes have
//! offered at least the quota or the input runs out, and the union of the two
//! reservoirs is shuffled.

use crate::csv_processor::{write_dataset, ColumnMap, CsvStreamReader};
use crate::dataset::{shuffle, ClassCounts, Label, Record, Reservoir, Shortfall};
use crate::utils::{display_path, CorpusPrepError, ExtractConfig, Result};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractReport {
    pub rows_scanned: usize,
    pub rows_dropped: usize,
    pub chunks_read: usize,
    pub chunks_skipped: usize,
    pub stopped_early: bool,
    /// Labelled rows seen per class.
    pub collected: ClassCounts,
    /// Rows held in memory per class at the end of the scan, never above the quota.
    pub buffered: ClassCounts,
    pub written: ClassCounts,
    pub shortfalls: Vec<Shortfall>,
}

#[derive(Debug)]
struct ClassBuffers {
    ai: Reservoir<Record>,
    human: Reservoir<Record>,
}

impl ClassBuffers {
    fn new(quota: usize, seed: u64) -> Self {
        Self {
            ai: Reservoir::new(quota, seed),
            human: Reservoir::new(quota, seed.wrapping_add(1)),
        }
    }

    fn push(&mut self, record: Record) {
        match record.label {
            Label::Ai => self.ai.offer(record),
            Label::Human => self.human.offer(record),
        }
    }

    fn seen(&self) -> ClassCounts {
        ClassCounts {
            ai: self.ai.seen(),
            human: self.human.seen(),
        }
    }

    fn held(&self) -> ClassCounts {
        ClassCounts {
            ai: self.ai.len(),
            human: self.human.len(),
        }
    }

    fn into_parts(self) -> [(Label, Vec<Record>); 2] {
        [
            (Label::Ai, self.ai.into_vec()),
            (Label::Human, self.human.into_vec()),
        ]
    }
}

/// Collect, sample and shuffle; does not touch the output file.
pub fn extract_balanced(config: &ExtractConfig) -> Result<(Vec<Record>, ExtractReport)> {
    let quota = config.samples_per_class;
    let reader = CsvStreamReader::new(&config.input_file);
    let headers = reader.read_headers()?;
    let map = ColumnMap::resolve(&headers, &config.columns, reader.path())?;

    if map.label.is_none() {
        warn!(
            column = %config.columns.label,
            path = %config.input_file.display(),
            "Label column not found, every chunk will be skipped"
        );
    }

    let mut report = ExtractReport::default();
    let mut buffers = ClassBuffers::new(quota, config.seed);

    for chunk in reader.chunks(config.chunk_size)? {
        let chunk = chunk?;
        report.chunks_read += 1;
        report.rows_scanned += chunk.row_count();
        report.rows_dropped += chunk.rows_failed;

        if map.label.is_none() {
            report.chunks_skipped += 1;
            report.rows_dropped += chunk.rows.len();
            continue;
        }

        for row in &chunk.rows {
            match map.parse(row) {
                Some(record) => buffers.push(record),
                None => report.rows_dropped += 1,
            }
        }

        let counts = buffers.seen();
        info!(
            chunk = chunk.index,
            ai = counts.ai,
            human = counts.human,
            "Progress: collected per class"
        );

        if counts.both_at_least(quota) {
            info!("Enough samples collected, stopping early");
            report.stopped_early = true;
            break;
        }
    }

    report.collected = buffers.seen();
    report.buffered = buffers.held();
    if report.rows_dropped > 0 {
        warn!(
            dropped = report.rows_dropped,
            "Dropped undecodable rows or rows with missing or unrecognized labels"
        );
    }

    if report.collected.total() == 0 {
        return Err(CorpusPrepError::NoRecords(display_path(&config.input_file)));
    }

    let mut output = Vec::with_capacity(report.buffered.total());
    for (label, kept) in buffers.into_parts() {
        let available = report.collected.get(label);
        if available == 0 {
            warn!(
                class = %label,
                "No samples found for class, output will contain only the other class"
            );
        } else if available < quota {
            warn!(
                class = %label,
                available,
                requested = quota,
                "Not enough samples, using all of them"
            );
        }
        if available < quota {
            report.shortfalls.push(Shortfall {
                label,
                available,
                requested: quota,
            });
        }
        output.extend(kept);
    }

    shuffle(&mut output, config.seed);
    report.written = ClassCounts::of(&output);
    Ok((output, report))
}

pub fn run_extract(config: &ExtractConfig) -> Result<ExtractReport> {
    info!(
        input = %config.input_file.display(),
        per_class = config.samples_per_class,
        chunk_size = config.chunk_size,
        "Extracting balanced subset"
    );

    let (records, report) = extract_balanced(config)?;
    write_dataset(&config.output_file, &records)?;

    info!(
        ai = report.written.ai,
        human = report.written.human,
        rows_scanned = report.rows_scanned,
        output = %config.output_file.display(),
        "Balanced subset saved"
    );
    Ok(report)
}
