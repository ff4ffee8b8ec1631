use crate::csv_processor::reader::position;
use crate::csv_processor::CsvStreamReader;
use crate::dataset::{normalize_label, Record};
use crate::utils::{HubConfig, Result};
use parquet::file::reader::{FileReader, SerializedFileReader};
use serde_json::Value;
use std::fs::File;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardFormat {
    Parquet,
    Csv,
}

impl ShardFormat {
    pub fn from_path(path: &str) -> Option<Self> {
        let ext = Path::new(path)
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase());
        match ext.as_deref() {
            Some("parquet") => Some(ShardFormat::Parquet),
            Some("csv") => Some(ShardFormat::Csv),
            _ => None,
        }
    }
}

/// Data files of a dataset repository, in a stable order.
pub fn select_shards<I, S>(files: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut shards: Vec<String> = files
        .into_iter()
        .map(Into::into)
        .filter(|name| ShardFormat::from_path(name).is_some())
        .collect();
    shards.sort();
    shards
}

#[derive(Debug, Default)]
pub struct ShardRows {
    pub records: Vec<Record>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

impl ShardRows {
    fn accept(&mut self, text: Option<String>, label: Option<String>) {
        self.rows_read += 1;
        let label = label.as_deref().and_then(normalize_label);
        match (text, label) {
            (Some(text), Some(label)) => self.records.push(Record { text, label }),
            _ => self.rows_dropped += 1,
        }
    }
}

pub fn read_shard(path: &Path, format: ShardFormat, config: &HubConfig) -> Result<ShardRows> {
    match format {
        ShardFormat::Parquet => read_parquet_shard(path, config),
        ShardFormat::Csv => read_csv_shard(path, config),
    }
}

fn read_parquet_shard(path: &Path, config: &HubConfig) -> Result<ShardRows> {
    let reader = SerializedFileReader::new(File::open(path)?)?;
    let mut rows = ShardRows::default();

    for row in reader.get_row_iter(None)? {
        let value = row?.to_json_value();
        let text = value.get(&config.text_column).and_then(value_to_text);
        let label = pick_label(&value, &config.label_columns);
        rows.accept(text, label);
    }
    Ok(rows)
}

fn read_csv_shard(path: &Path, config: &HubConfig) -> Result<ShardRows> {
    let reader = CsvStreamReader::new(path);
    let headers = reader.read_headers()?;
    let text_idx = position(&headers, &config.text_column);
    let label_idx = config
        .label_columns
        .iter()
        .find_map(|col| position(&headers, col));

    let mut rows = ShardRows::default();
    for chunk in reader.chunks(10_000)? {
        let chunk = chunk?;
        rows.rows_read += chunk.rows_failed;
        rows.rows_dropped += chunk.rows_failed;
        for row in chunk.rows {
            let text = text_idx.and_then(|i| row.get(i)).map(str::to_string);
            let label = label_idx.and_then(|i| row.get(i)).map(str::to_string);
            rows.accept(text, label);
        }
    }
    Ok(rows)
}

/// First label column holding a usable scalar. A null `generated` falls
/// through to `label`.
fn pick_label(value: &Value, label_columns: &[String]) -> Option<String> {
    label_columns
        .iter()
        .find_map(|col| value.get(col).and_then(value_to_text))
}

pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Label;
    use serde_json::json;

    #[test]
    fn only_data_files_are_shards() {
        let shards = select_shards([
            "README.md",
            "data/train-00001.parquet",
            "data/test-00000.parquet",
            ".gitattributes",
            "extra/raw.CSV",
        ]);
        assert_eq!(
            shards,
            vec![
                "data/test-00000.parquet",
                "data/train-00001.parquet",
                "extra/raw.CSV"
            ]
        );
    }

    #[test]
    fn scalar_values_become_text() {
        assert_eq!(value_to_text(&json!(1)).as_deref(), Some("1"));
        assert_eq!(value_to_text(&json!(false)).as_deref(), Some("false"));
        assert_eq!(value_to_text(&json!("essay")).as_deref(), Some("essay"));
        assert_eq!(value_to_text(&json!(null)), None);
    }

    #[test]
    fn null_label_column_falls_back_to_the_next() {
        let columns = HubConfig::default().label_columns;
        let row = json!({"text": "essay", "generated": null, "label": 1});
        assert_eq!(pick_label(&row, &columns).as_deref(), Some("1"));

        let row = json!({"text": "essay", "generated": 0, "label": 1});
        assert_eq!(pick_label(&row, &columns).as_deref(), Some("0"));

        assert_eq!(pick_label(&json!({"text": "essay"}), &columns), None);
    }

    #[test]
    fn csv_shard_counts_undecodable_rows_as_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        let mut body = b"text,label\nfirst,1\n".to_vec();
        body.extend_from_slice(b"\xfe\xff,0\nsecond,0\n");
        std::fs::write(&path, body).unwrap();

        let rows = read_shard(&path, ShardFormat::Csv, &HubConfig::default()).unwrap();
        assert_eq!(rows.rows_read, 3);
        assert_eq!(rows.rows_dropped, 1);
        assert_eq!(rows.records.len(), 2);
    }

    #[test]
    fn csv_shard_drops_title_and_maps_label() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        std::fs::write(&path, "title,text,label\nT1,first,1\nT2,second,0\nT3,third,7\n").unwrap();

        let rows = read_shard(&path, ShardFormat::Csv, &HubConfig::default()).unwrap();
        assert_eq!(rows.rows_read, 3);
        assert_eq!(rows.rows_dropped, 1);
        assert_eq!(rows.records[0], Record::new("first", true));
        assert_eq!(rows.records[1].label, Label::Human);
    }
}
