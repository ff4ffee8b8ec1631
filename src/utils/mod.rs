pub mod config;
pub mod errors;

pub use config::{
    ApiConfig, AppConfig, AugmentConfig, Columns, ExtractConfig, HubConfig, LoggingConfig,
    PartitionConfig,
};
pub use errors::{CorpusPrepError, Result};

pub fn display_path(path: &std::path::Path) -> String {
    path.display().to_string()
}
