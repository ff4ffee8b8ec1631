pub mod augmenter;
pub mod extractor;
pub mod partitioner;

pub use augmenter::{augment_records, run_augment, AugmentReport};
pub use extractor::{extract_balanced, run_extract, ExtractReport};
pub use partitioner::{build_test_set, run_partition, training_text_set, PartitionReport};
