use crate::utils::Result;
use csv::StringRecord;
use std::fs::File;

#[derive(Debug, Clone)]
pub struct CsvChunk {
    pub index: usize,
    pub start_row: usize,
    pub rows: Vec<StringRecord>,
    /// Rows in this chunk the CSV decoder rejected (bad UTF-8, broken quoting).
    pub rows_failed: usize,
}

impl CsvChunk {
    /// Decoded and rejected rows alike.
    pub fn row_count(&self) -> usize {
        self.rows.len() + self.rows_failed
    }

    pub fn end_row(&self) -> usize {
        self.start_row + self.row_count()
    }
}

/// Pulls rows from a CSV reader in fixed-size batches so peak memory is bounded
/// by the chunk size rather than the file size. A row that fails to decode is
/// counted and skipped; only an IO error ends the stream early.
pub struct CsvChunks {
    records: csv::StringRecordsIntoIter<File>,
    chunk_size: usize,
    next_index: usize,
    next_row: usize,
    finished: bool,
}

impl CsvChunks {
    pub(crate) fn new(reader: csv::Reader<File>, chunk_size: usize) -> Self {
        Self {
            records: reader.into_records(),
            chunk_size: chunk_size.max(1),
            next_index: 0,
            next_row: 0,
            finished: false,
        }
    }
}

impl Iterator for CsvChunks {
    type Item = Result<CsvChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let mut rows = Vec::with_capacity(self.chunk_size);
        let mut rows_failed = 0;
        while rows.len() + rows_failed < self.chunk_size {
            match self.records.next() {
                Some(Ok(record)) => rows.push(record),
                Some(Err(e)) if e.is_io_error() => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
                Some(Err(e)) => {
                    tracing::warn!(
                        row = self.next_row + rows.len() + rows_failed,
                        error = %e,
                        "Skipping undecodable row"
                    );
                    rows_failed += 1;
                }
                None => {
                    self.finished = true;
                    break;
                }
            }
        }

        if rows.is_empty() && rows_failed == 0 {
            return None;
        }

        let chunk = CsvChunk {
            index: self.next_index,
            start_row: self.next_row,
            rows,
            rows_failed,
        };
        self.next_index += 1;
        self.next_row = chunk.end_row();
        Some(Ok(chunk))
    }
}
