//! Main CLI parser and top-level argument handling.

use clap::Parser;

use crate::commands::Commands;

/// Read survey screens aloud.
///
/// Global options override the stored audio settings for this invocation.
#[derive(Debug, Parser)]
#[command(name = "narrate")]
#[command(about = "Narrate survey screens with synthesized speech")]
#[command(version)]
pub struct Cli {
    /// API key for the speech synthesis service
    #[arg(long, env = "GEMINI_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Prebuilt voice (see `narrate voices`)
    #[arg(long, env = "NARRATE_VOICE", global = true)]
    pub voice: Option<String>,

    /// Playback rate, 0.5 to 2.0
    #[arg(long, env = "NARRATE_RATE", global = true)]
    pub rate: Option<f32>,

    /// Output volume, 0.0 to 1.0
    #[arg(long, env = "NARRATE_VOLUME", global = true)]
    pub volume: Option<f32>,

    /// Run the full pipeline without touching the audio device
    #[arg(long, global = true)]
    pub silent: bool,

    /// Override the speech service base URL
    #[arg(long, env = "NARRATE_API_BASE", global = true, hide = true)]
    pub api_base: Option<String>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}
