use anyhow::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_harvester::{utils, BatchRunner, Cli, Config, SourceChain};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --log-level
    let level = cli.log_level.as_filter();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("transcript_harvester={},warn", level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref())?;
    config.display();

    // Missing yt-dlp only disables the last fallback
    for dep in utils::check_dependencies(&config.ytdlp.path).await {
        tracing::warn!("Missing dependency: {}", dep);
    }

    let chain = SourceChain::from_config(&config)?;
    tracing::debug!("Transcript sources: {}", chain.source_names().join(" -> "));

    let show_progress = !cli.quiet && console::Term::stderr().is_term();
    let runner = BatchRunner::new(chain).with_progress(show_progress);

    let summary = runner.run(&cli.input, &cli.output).await?;

    println!(
        "{} {} transcripts, {} failures in {} (output: {})",
        style("Done:").green().bold(),
        style(summary.transcripts).green(),
        if summary.failures > 0 {
            style(summary.failures).red()
        } else {
            style(summary.failures).dim()
        },
        utils::format_duration(summary.elapsed.as_secs_f64()),
        cli.output.display()
    );

    Ok(())
}
