pub mod chunker;
pub mod reader;
pub mod writer;

pub use chunker::{CsvChunk, CsvChunks};
pub use reader::{load_dataset, load_texts, ColumnMap, CsvStreamReader, LoadedDataset};
pub use writer::{write_dataset, CsvStreamWriter, OUTPUT_HEADERS};
