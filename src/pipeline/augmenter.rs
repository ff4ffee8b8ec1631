use crate::csv_processor::{load_dataset, write_dataset};
use crate::dataset::{shuffle, Record};
use crate::translation::{round_trip, ParaphraseOutcome, Translator};
use crate::utils::{AugmentConfig, Result};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct AugmentReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub final_rows: usize,
}

/// One paraphrase attempt per row; originals are always kept. Failed rows are
/// logged and skipped.
pub async fn augment_records<T: Translator>(
    records: Vec<Record>,
    translator: &T,
    config: &AugmentConfig,
) -> (Vec<Record>, AugmentReport) {
    let mut report = AugmentReport {
        attempted: records.len(),
        ..AugmentReport::default()
    };
    let mut output = Vec::with_capacity(records.len() * 2);

    info!(
        rows = records.len(),
        source = %config.source_lang,
        pivot = %config.pivot_lang,
        "Starting augmentation"
    );

    for (idx, record) in records.into_iter().enumerate() {
        match round_trip(translator, &record.text, &config.source_lang, &config.pivot_lang).await {
            ParaphraseOutcome::Paraphrased(text) => {
                output.push(record.with_text(text));
                report.succeeded += 1;
            }
            ParaphraseOutcome::Failed(reason) => {
                warn!(index = idx, reason = %reason, "Augmentation failed");
                report.failed += 1;
            }
        }
        output.push(record);

        if config.progress_every > 0 && (idx + 1) % config.progress_every == 0 {
            info!(
                done = idx + 1,
                total = report.attempted,
                failed = report.failed,
                "Augmenting"
            );
        }
    }

    shuffle(&mut output, config.seed);
    report.final_rows = output.len();
    (output, report)
}

pub async fn run_augment<T: Translator>(
    config: &AugmentConfig,
    translator: &T,
) -> Result<AugmentReport> {
    let loaded = load_dataset(&config.input_file, &config.columns)?;
    let (output, report) = augment_records(loaded.records, translator, config).await;

    write_dataset(&config.output_file, &output)?;

    info!(
        final_rows = report.final_rows,
        succeeded = report.succeeded,
        attempted = report.attempted,
        failed = report.failed,
        output = %config.output_file.display(),
        "Augmentation complete"
    );
    Ok(report)
}
