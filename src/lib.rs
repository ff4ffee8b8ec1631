pub mod csv_processor;
pub mod dataset;
pub mod hub;
pub mod pipeline;
pub mod translation;
pub mod utils;

pub use csv_processor::{load_dataset, write_dataset, CsvChunk, CsvStreamReader, CsvStreamWriter};
pub use dataset::{ClassCounts, Label, Record, Shortfall};
pub use hub::{run_hub_import, HubImportReport};
pub use pipeline::{
    run_augment, run_extract, run_partition, AugmentReport, ExtractReport, PartitionReport,
};
pub use translation::{ParaphraseOutcome, TranslationClient, Translator};
pub use utils::{AppConfig, CorpusPrepError, Result};
