use crate::dataset::Record;
use crate::utils::{CorpusPrepError, Result};
use csv::Writer;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const OUTPUT_HEADERS: [&str; 2] = ["text", "generated"];

pub struct CsvStreamWriter {
    path: PathBuf,
    writer: Option<Writer<File>>,
    rows_written: usize,
}

impl CsvStreamWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            rows_written: 0,
        }
    }

    pub fn initialize(&mut self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        let mut writer = Writer::from_writer(file);
        writer.write_record(OUTPUT_HEADERS)?;
        self.writer = Some(writer);
        Ok(())
    }

    pub fn write_record(&mut self, record: &Record) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            CorpusPrepError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                "Writer not initialized",
            ))
        })?;

        writer.write_record([record.text.as_str(), record.label.as_literal()])?;
        self.rows_written += 1;
        Ok(())
    }

    pub fn write_records(&mut self, records: &[Record]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<usize> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(self.rows_written)
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }
}

/// Write a whole dataset in the two-column output format.
pub fn write_dataset(path: &Path, records: &[Record]) -> Result<usize> {
    let mut writer = CsvStreamWriter::new(path);
    writer.initialize()?;
    writer.write_records(records)?;
    writer.finish()
}
