//! Voices command handler.

use std::io::Write;

use anyhow::Result;
use narrate_core::TTS_VOICES;

use crate::presentation::format_voice_table;

/// Print the voice catalog.
pub fn execute(out: &mut impl Write) -> Result<()> {
    write!(out, "{}", format_voice_table(TTS_VOICES))?;
    Ok(())
}
