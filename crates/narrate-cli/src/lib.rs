//! `narrate` command-line adapter.
//!
//! [`parser`] and [`commands`] define the command line, [`bootstrap`] wires
//! the narration pipeline, and [`handlers`] run a session for each command.

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::{Commands, SurveyTypeArg};
pub use error::CliError;
pub use handlers::session::SessionEnd;
pub use parser::Cli;
