use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const TRANSLATION_API_KEY_ENV: &str = "TRANSLATION_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub extract: ExtractConfig,
    pub partition: PartitionConfig,
    pub augment: AugmentConfig,
    pub hub: HubConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Column names shared by every reader.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Columns {
    pub text: String,
    pub label: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            text: "text".to_string(),
            label: "generated".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    #[serde(flatten)]
    pub columns: Columns,
    pub samples_per_class: usize,
    pub chunk_size: usize,
    pub seed: u64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("AI_Human.csv"),
            output_file: PathBuf::from("balanced_subset.csv"),
            columns: Columns::default(),
            samples_per_class: 10_000,
            chunk_size: 50_000,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    pub parent_file: PathBuf,
    /// Named training subsets whose texts must never reach the test set.
    pub train_files: BTreeMap<String, PathBuf>,
    pub output_file: PathBuf,
    #[serde(flatten)]
    pub columns: Columns,
    pub limit_per_class: usize,
    pub seed: u64,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        let train_files = [
            ("small", "subset_sm.csv"),
            ("medium", "subset_med.csv"),
            ("large", "subset_lg.csv"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), PathBuf::from(path)))
        .collect();

        Self {
            parent_file: PathBuf::from("AI_Human.csv"),
            train_files,
            output_file: PathBuf::from("test_set_clean.csv"),
            columns: Columns::default(),
            limit_per_class: 10_000,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    #[serde(flatten)]
    pub columns: Columns,
    pub source_lang: String,
    pub pivot_lang: String,
    pub seed: u64,
    pub progress_every: usize,
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("subset_sm.csv"),
            output_file: PathBuf::from("subset_sm_rtt.csv"),
            columns: Columns::default(),
            source_lang: "en".to_string(),
            pivot_lang: "es".to_string(),
            seed: 42,
            progress_every: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub dataset: String,
    pub output_file: PathBuf,
    pub text_column: String,
    /// Tried in order; the first one present in a shard supplies the label.
    pub label_columns: Vec<String>,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            dataset: "Ateeqq/AI-and-Human-Generated-Text".to_string(),
            output_file: PathBuf::from("test_set.csv"),
            text_column: "text".to_string(),
            label_columns: vec!["generated".to_string(), "label".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub max_tokens: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-3-5-haiku-20241022".to_string(),
            api_key: None,
            timeout_seconds: 60,
            max_tokens: 4096,
        }
    }
}

impl ApiConfig {
    /// Key from the config file, else from `TRANSLATION_API_KEY`.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.is_empty())
            .or_else(|| std::env::var(TRANSLATION_API_KEY_ENV).ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> crate::utils::errors::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::utils::errors::CorpusPrepError::ConfigError(e.to_string()))?;
        toml::from_str(&content)
            .map_err(|e| crate::utils::errors::CorpusPrepError::ConfigError(e.to_string()))
    }

    /// Missing file means defaults. A file that exists but does not parse is
    /// reported on stderr, since logging is configured from this very value.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(p) if p.exists() => Self::load_from_file(p).unwrap_or_else(|e| {
                eprintln!("ignoring {}: {}", p.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_reference_run() {
        let config = AppConfig::default();
        assert_eq!(config.extract.samples_per_class, 10_000);
        assert_eq!(config.extract.chunk_size, 50_000);
        assert_eq!(config.partition.train_files.len(), 3);
        assert_eq!(config.augment.pivot_lang, "es");
        assert_eq!(config.partition.columns.label, "generated");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [extract]
            samples_per_class = 500
            label = "is_ai"

            [partition.train_files]
            only = "train.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.extract.samples_per_class, 500);
        assert_eq!(config.extract.columns.label, "is_ai");
        assert_eq!(config.extract.columns.text, "text");
        assert_eq!(config.extract.seed, 42);
        assert_eq!(
            config.partition.train_files.get("only"),
            Some(&PathBuf::from("train.csv"))
        );
        assert_eq!(config.partition.train_files.len(), 1);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load_or_default(Some(Path::new("/nonexistent/corpus.toml")));
        assert_eq!(config.hub.dataset, "Ateeqq/AI-and-Human-Generated-Text");
    }

    #[test]
    fn config_key_wins_over_environment() {
        let api = ApiConfig {
            api_key: Some("from-file".to_string()),
            ..ApiConfig::default()
        };
        assert_eq!(api.resolve_api_key().as_deref(), Some("from-file"));
    }
}
