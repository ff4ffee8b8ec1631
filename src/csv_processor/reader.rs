use crate::csv_processor::chunker::CsvChunks;
use crate::dataset::{normalize_label, Record};
use crate::utils::{display_path, Columns, CorpusPrepError, Result};
use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};

pub struct CsvStreamReader {
    path: PathBuf,
}

impl CsvStreamReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn open(&self) -> Result<csv::Reader<File>> {
        if !self.path.exists() {
            return Err(CorpusPrepError::FileNotFound(display_path(&self.path)));
        }
        let file = File::open(&self.path)?;
        Ok(csv::ReaderBuilder::new().flexible(true).from_reader(file))
    }

    pub fn read_headers(&self) -> Result<StringRecord> {
        let mut reader = self.open()?;
        Ok(reader.headers()?.clone())
    }

    /// Sequential chunks of at most `chunk_size` raw rows.
    pub fn chunks(&self, chunk_size: usize) -> Result<CsvChunks> {
        Ok(CsvChunks::new(self.open()?, chunk_size))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Positions of the text and label columns within a header.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap {
    pub text: usize,
    pub label: Option<usize>,
}

impl ColumnMap {
    /// The text column is mandatory; the label column may be absent so callers
    /// can decide how to report it.
    pub fn resolve(headers: &StringRecord, columns: &Columns, path: &Path) -> Result<Self> {
        let text = position(headers, &columns.text).ok_or_else(|| {
            CorpusPrepError::MissingColumn {
                column: columns.text.clone(),
                path: display_path(path),
            }
        })?;
        Ok(Self {
            text,
            label: position(headers, &columns.label),
        })
    }

    /// `None` when the row has no text or an unmapped label.
    pub fn parse(&self, row: &StringRecord) -> Option<Record> {
        let text = row.get(self.text)?;
        let label = normalize_label(row.get(self.label?)?)?;
        Some(Record {
            text: text.to_string(),
            label,
        })
    }
}

pub fn position(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

#[derive(Debug, Default)]
pub struct LoadedDataset {
    pub records: Vec<Record>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Load a labelled dataset wholesale. Rows with unmapped labels are dropped.
pub fn load_dataset(path: &Path, columns: &Columns) -> Result<LoadedDataset> {
    let reader = CsvStreamReader::new(path);
    let headers = reader.read_headers()?;
    let map = ColumnMap::resolve(&headers, columns, path)?;
    if map.label.is_none() {
        return Err(CorpusPrepError::MissingColumn {
            column: columns.label.clone(),
            path: display_path(path),
        });
    }

    let mut loaded = LoadedDataset::default();
    for row in reader.open()?.records() {
        loaded.rows_read += 1;
        match decoded(row)?.and_then(|row| map.parse(&row)) {
            Some(record) => loaded.records.push(record),
            None => loaded.rows_dropped += 1,
        }
    }

    if loaded.rows_dropped > 0 {
        tracing::warn!(
            path = %path.display(),
            dropped = loaded.rows_dropped,
            "Dropped undecodable rows or rows with missing or unrecognized labels"
        );
    }

    Ok(loaded)
}

/// Load only the text column; labels are irrelevant to membership tests.
pub fn load_texts(path: &Path, text_column: &str) -> Result<Vec<String>> {
    let reader = CsvStreamReader::new(path);
    let headers = reader.read_headers()?;
    let idx = position(&headers, text_column).ok_or_else(|| CorpusPrepError::MissingColumn {
        column: text_column.to_string(),
        path: display_path(path),
    })?;

    let mut texts = Vec::new();
    for row in reader.open()?.records() {
        if let Some(text) = decoded(row)?.as_ref().and_then(|row| row.get(idx)) {
            texts.push(text.to_string());
        }
    }
    Ok(texts)
}

/// `None` for a row the decoder rejected; IO failures still abort.
fn decoded(row: csv::Result<StringRecord>) -> Result<Option<StringRecord>> {
    match row {
        Ok(row) => Ok(Some(row)),
        Err(e) if e.is_io_error() => Err(e.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping undecodable row");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Label;
    use std::io::Write;

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_normalizes_and_drops_unknown_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "in.csv",
            "text,generated,title\n\"hello, world\",1.0,t\nbye,human,t\nodd,maybe,t\nshort\n",
        );

        let loaded = load_dataset(&path, &Columns::default()).unwrap();
        assert_eq!(loaded.rows_read, 4);
        assert_eq!(loaded.rows_dropped, 2);
        assert_eq!(loaded.records[0].text, "hello, world");
        assert_eq!(loaded.records[0].label, Label::Ai);
        assert_eq!(loaded.records[1].label, Label::Human);
    }

    #[test]
    fn undecodable_rows_are_dropped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.csv");
        let mut body = b"text,generated\nok,1\n".to_vec();
        body.extend_from_slice(b"bad \xff,0\nfine,0\n");
        std::fs::write(&path, body).unwrap();

        let loaded = load_dataset(&path, &Columns::default()).unwrap();
        assert_eq!(loaded.rows_read, 3);
        assert_eq!(loaded.rows_dropped, 1);
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(load_texts(&path, "text").unwrap(), vec!["ok", "fine"]);
    }

    #[test]
    fn missing_text_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "in.csv", "body,generated\nx,1\n");
        let err = load_dataset(&path, &Columns::default()).unwrap_err();
        assert!(matches!(
            err,
            CorpusPrepError::MissingColumn { ref column, .. } if column == "text"
        ));
    }

    #[test]
    fn missing_file_is_reported_by_path() {
        let err = load_texts(Path::new("/nonexistent/train.csv"), "text").unwrap_err();
        assert!(matches!(err, CorpusPrepError::FileNotFound(_)));
    }

    #[test]
    fn texts_ignore_labels() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "train.csv", "generated,text\nnonsense,a\n,b\n");
        assert_eq!(load_texts(&path, "text").unwrap(), vec!["a", "b"]);
    }
}
