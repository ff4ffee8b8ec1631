pub mod labels;
pub mod record;
pub mod sampling;

pub use labels::normalize_label;
pub use record::{ClassCounts, Label, Record, Shortfall};
pub use sampling::{dedup_by_text, sample_up_to, shuffle, split_by_class, Reservoir};
