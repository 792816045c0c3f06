//! Interactive narration session.
//!
//! Loads one screen into the driver, prints highlight changes and driver
//! events, and maps input lines to driver commands and settings changes.
//! The session ends on `q`, on the quit signal, or once narration is idle
//! (or muted) and the input is closed (piped input).

use std::future::Future;
use std::io::Write;

use anyhow::Result;
use narrate_core::settings::{MAX_RATE, MIN_RATE};
use narrate_core::{AudioSettingsUpdate, ScreenContent, SettingsStore, find_voice};
use narrate_voice::NarrationEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::bootstrap::CliContext;
use crate::presentation::{KEY_HELP, describe_event, describe_highlight};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user pressed `q`.
    Quit,
    /// Input closed and nothing was left to read.
    Finished,
    /// The quit signal fired (Ctrl-C).
    Interrupted,
    /// The driver went away on its own.
    DriverGone,
}

/// Playback rate change per `+` / `-`.
pub const RATE_STEP: f32 = 0.25;

/// A recognized input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Toggle,
    Stop,
    Restart,
    Mute,
    Voice(String),
    Faster,
    Slower,
    Quit,
}

impl Key {
    /// Parse an input line. The first non-blank character selects the key;
    /// `v` takes the rest of the line as a voice name.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let first = line.chars().next()?;
        match first.to_ascii_lowercase() {
            'p' => Some(Self::Toggle),
            's' => Some(Self::Stop),
            'r' => Some(Self::Restart),
            'm' => Some(Self::Mute),
            'v' => {
                let name = line[first.len_utf8()..].trim();
                (!name.is_empty()).then(|| Self::Voice(name.to_string()))
            }
            '+' => Some(Self::Faster),
            '-' => Some(Self::Slower),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

fn step_rate(settings: &SettingsStore, delta: f32) -> Result<f32> {
    let rate = (settings.current().rate + delta).clamp(MIN_RATE, MAX_RATE);
    let applied = settings.update(&AudioSettingsUpdate {
        rate: Some(rate),
        ..Default::default()
    })?;
    Ok(applied.rate)
}

/// Narrate `content` until the session ends, then shut the driver down.
pub async fn run<R, W, Q>(
    ctx: CliContext,
    content: ScreenContent,
    input: R,
    out: &mut W,
    quit: Q,
) -> Result<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    Q: Future<Output = ()>,
{
    let CliContext {
        handle,
        mut events,
        settings,
    } = ctx;

    let mut state_rx = handle.subscribe();
    state_rx.borrow_and_update();

    handle.load(content.clone())?;
    writeln!(out, "{KEY_HELP}")?;

    let mut lines = input.lines();
    let mut input_open = true;
    let mut state_open = true;
    // Nothing is being read and nothing will be until the user asks.
    let mut idle = false;
    let mut highlighted: Option<String> = None;
    tokio::pin!(quit);

    let end = loop {
        tokio::select! {
            () = &mut quit => break SessionEnd::Interrupted,

            changed = state_rx.changed(), if state_open => {
                if changed.is_err() {
                    state_open = false;
                    continue;
                }
                let state = state_rx.borrow_and_update().clone();
                if state.currently_reading_id != highlighted {
                    highlighted.clone_from(&state.currently_reading_id);
                    if let Some(line) = describe_highlight(&state, &content) {
                        writeln!(out, "{line}")?;
                    }
                }
            }

            event = events.recv() => {
                let Some(event) = event else {
                    break SessionEnd::DriverGone;
                };
                tracing::debug!(?event, "Narration event");
                if let Some(line) = describe_event(&event) {
                    writeln!(out, "{line}")?;
                }
                match event {
                    NarrationEvent::QueueLoaded { ids } if ids.is_empty() => idle = true,
                    NarrationEvent::QueueDrained | NarrationEvent::Stopped => idle = true,
                    NarrationEvent::UnitStarted { .. } => idle = false,
                    _ => {}
                }
                let muted = !settings.current().tts_enabled;
                if (idle || muted) && !input_open {
                    break SessionEnd::Finished;
                }
            }

            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    input_open = false;
                    if idle || !settings.current().tts_enabled {
                        break SessionEnd::Finished;
                    }
                    continue;
                };
                match Key::parse(&line) {
                    Some(Key::Quit) => break SessionEnd::Quit,
                    Some(Key::Toggle) => handle.toggle()?,
                    Some(Key::Stop) => handle.stop()?,
                    Some(Key::Restart) => {
                        idle = false;
                        handle.restart()?;
                    }
                    Some(Key::Mute) => {
                        let enabled = settings.toggle_tts();
                        // Unmuting rebuilds and autoplays the screen.
                        idle = !enabled;
                        writeln!(out, "Narration {}", if enabled { "on" } else { "off" })?;
                    }
                    Some(Key::Voice(name)) => match find_voice(&name) {
                        Some(voice) => {
                            settings.update(&AudioSettingsUpdate {
                                voice: Some(voice.name.to_string()),
                                ..Default::default()
                            })?;
                            writeln!(out, "Voice: {}", voice.name)?;
                        }
                        None => writeln!(out, "!! unknown voice '{name}'")?,
                    },
                    Some(Key::Faster) => {
                        writeln!(out, "Rate: {:.2}x", step_rate(&settings, RATE_STEP)?)?;
                    }
                    Some(Key::Slower) => {
                        writeln!(out, "Rate: {:.2}x", step_rate(&settings, -RATE_STEP)?)?;
                    }
                    None if line.trim().is_empty() => {}
                    None => writeln!(out, "{KEY_HELP}")?,
                }
            }
        }
    };

    handle.shutdown().await;
    Ok(end)
}
