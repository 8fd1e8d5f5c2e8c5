use anyhow::Context;
use clap::Parser;
use nm_collect::{create_provider, Fetcher, IngestPipeline, QueryExpansion};
use nm_inference::Models;
use nm_report::{create_renderer, Reporter};
use std::io;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod shell;

use config::{Cli, MonitorConfig};
use shell::{Prompter, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = MonitorConfig::validate(cli).context("Invalid configuration")?;

    let store = nm_storage::create_store(config.storage, &config.db_path)
        .await
        .with_context(|| format!("Failed to open article store at {}", config.db_path.display()))?;

    let models = Models::from_config(&config.inference)?;
    info!("🧠 Models ready (translator: {}, sentiment: {})", models.translator.name(), models.sentiment.name());

    let provider = create_provider(&config.provider)?;
    info!("🦗 Search provider ready ({})", provider.name());

    let session = Session {
        fetcher: Fetcher::new(provider, config.fetch.clone()),
        pipeline: IngestPipeline::new(
            store.clone(),
            models.translator.clone(),
            models.sentiment.clone(),
            models.keywords.clone(),
            config.ingest.clone(),
        ),
        reporter: Reporter::new(store, models.keywords),
        renderer: create_renderer(config.chart_format, config.chart_dir.clone()),
        expansion: QueryExpansion::default(),
        max_results: config.max_results,
        window: config.window,
    };

    let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
    session.run(&mut prompter).await?;
    Ok(())
}
