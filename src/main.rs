use anyhow::Context;
use code_rank::{Batch, Config, Summarizer};
use std::io::Read;
use tracing_subscriber::EnvFilter;

fn read_batch() -> anyhow::Result<Batch> {
    let raw = match std::env::args().nth(1) {
        Some(path) if path != "-" => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read batch from {path}"))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read batch from stdin")?;
            buf
        }
    };

    serde_json::from_str(&raw).context("Batch is not valid JSON")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_ansi(false)
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded: {:?}", config);

    let batch = read_batch()?;
    tracing::info!("Read {} documents", batch.documents.len());

    let summarizer = Summarizer::new(config);
    let results = summarizer.run_batch(batch);

    code_rank::report::write_report(&results, &summarizer.config().output)?;

    Ok(())
}
