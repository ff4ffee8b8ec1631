use clap::{Parser, Subcommand};
use corpus_prep::utils::LoggingConfig;
use corpus_prep::{
    run_augment, run_extract, run_hub_import, run_partition, AppConfig, TranslationClient,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser)]
#[command(author, version, about = "Prepare balanced human/AI text classification datasets")]
struct Cli {
    /// TOML file with run parameters; defaults apply when it is missing
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the random seed of the selected procedure
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a class-balanced subset from a large labelled CSV
    Extract,
    /// Build a test set with no text overlap against the training subsets
    Partition,
    /// Add one round-trip translation paraphrase per row
    Augment,
    /// Download a dataset from the Hugging Face Hub into text,generated CSV
    ImportHub,
}

fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("corpus_prep={}", logging.level).parse()?);

    let fmt_layer = if logging.format == "json" {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(Some(cli.config.as_path()));
    init_tracing(&config.logging)?;

    if let Some(seed) = cli.seed {
        config.extract.seed = seed;
        config.partition.seed = seed;
        config.augment.seed = seed;
    }

    match cli.command {
        Commands::Extract => {
            let report = run_extract(&config.extract)?;
            for shortfall in &report.shortfalls {
                tracing::warn!(output = %config.extract.output_file.display(), "{}", shortfall);
            }
        }
        Commands::Partition => {
            run_partition(&config.partition)?;
        }
        Commands::Augment => {
            let client = TranslationClient::new(&config.api)?;
            run_augment(&config.augment, &client).await?;
        }
        Commands::ImportHub => {
            let hub = config.hub.clone();
            tokio::task::spawn_blocking(move || run_hub_import(&hub)).await??;
        }
    }

    Ok(())
}
