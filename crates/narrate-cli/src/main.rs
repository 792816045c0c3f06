//! CLI entry point.
//!
//! Parses arguments, loads `.env`, initialises tracing, then dispatches to a
//! handler. Only narrating commands bootstrap the pipeline.

use std::io;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use narrate_cli::handlers::question::QuestionSource;
use narrate_cli::{Cli, CliConfig, CliError, Commands, SessionEnd, bootstrap, handlers};

const DEFAULT_FILTER: &str = "narrate=info,narrate_cli=info,narrate_voice=info";
const VERBOSE_FILTER: &str = "narrate=debug,narrate_cli=debug,narrate_voice=debug";

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn quit_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let config = CliConfig::from_cli(&cli);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();

    let end = match cli.command {
        Commands::Voices => {
            handlers::voices::execute(&mut stdout)?;
            return Ok(());
        }
        Commands::Question { file, text, option } => {
            let question = QuestionSource::from_args(file, text, option)?.load()?;
            let ctx = bootstrap(&config)?;
            handlers::question::execute(ctx, &question, stdin, &mut stdout, quit_signal()).await?
        }
        Commands::Start { survey_type } => {
            let ctx = bootstrap(&config)?;
            handlers::start::execute(ctx, survey_type.into(), stdin, &mut stdout, quit_signal())
                .await?
        }
    };

    tracing::debug!(?end, "Session ended");
    if end == SessionEnd::DriverGone {
        anyhow::bail!("Narration stopped unexpectedly");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before parsing so env-backed flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = dispatch(cli).await {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            eprintln!("Error: {cli_err}");
            std::process::exit(cli_err.exit_code());
        }
        return Err(err);
    }
    Ok(())
}
