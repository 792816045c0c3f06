//! Command handlers.
//!
//! Handlers follow one pattern:
//! - Parse/validate CLI-specific input
//! - Build the screen to narrate
//! - Hand it to [`session::run`] against the bootstrapped context

pub mod question;
pub mod session;
pub mod start;
pub mod voices;
