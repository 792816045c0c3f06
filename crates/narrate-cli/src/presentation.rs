//! Terminal formatting for voices, highlights and driver events.

use narrate_core::{DEFAULT_VOICE, PlaybackState, ScreenContent, VoiceGender, VoiceInfo};
use narrate_voice::NarrationEvent;

/// Key help shown when a session starts and after unknown input.
pub const KEY_HELP: &str = "Keys: [p] pause/resume  [s] stop  [r] restart  [m] mute  \
                            [v NAME] voice  [+/-] rate  [q] quit (then Enter)";

const MAX_TEXT_WIDTH: usize = 72;

/// Truncates a string to a maximum number of characters, adding "..." if needed.
///
/// # Examples
///
/// ```rust
/// use narrate_cli::presentation::truncate_text;
///
/// assert_eq!(truncate_text("Hello", 10), "Hello");
/// assert_eq!(truncate_text("Hello World", 8), "Hello...");
/// ```
#[must_use]
pub fn truncate_text(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

const fn gender_label(gender: VoiceGender) -> &'static str {
    match gender {
        VoiceGender::Female => "female",
        VoiceGender::Male => "male",
    }
}

/// Render the voice catalog as a table, marking the default.
#[must_use]
pub fn format_voice_table(voices: &[VoiceInfo]) -> String {
    let mut table = format!("{:<10} {:<8}\n{}\n", "VOICE", "GENDER", "-".repeat(26));
    for voice in voices {
        let marker = if voice.name == DEFAULT_VOICE {
            " (default)"
        } else {
            ""
        };
        table.push_str(&format!(
            "{:<10} {:<8}{marker}\n",
            voice.name,
            gender_label(voice.gender)
        ));
    }
    table
}

/// Line announcing the element now highlighted, if any.
#[must_use]
pub fn describe_highlight(state: &PlaybackState, content: &ScreenContent) -> Option<String> {
    let id = state.currently_reading_id.as_deref()?;
    let text = content.text_of(id).unwrap_or_default();
    Some(format!(
        ">> [{id}] {}",
        truncate_text(text, MAX_TEXT_WIDTH)
    ))
}

/// Status line for a driver event. Unit start/finish are covered by
/// highlight changes and yield nothing.
#[must_use]
pub fn describe_event(event: &NarrationEvent) -> Option<String> {
    match event {
        NarrationEvent::QueueLoaded { ids } if ids.is_empty() => {
            Some("Nothing to read on this screen.".to_string())
        }
        NarrationEvent::QueueLoaded { ids } => Some(format!("Queued {} item(s).", ids.len())),
        NarrationEvent::UnitSkipped { id, error } => Some(format!("!! skipped [{id}]: {error}")),
        NarrationEvent::Paused => Some("|| paused".to_string()),
        NarrationEvent::Resumed => Some("|> resumed".to_string()),
        NarrationEvent::QueueDrained => Some("Done.".to_string()),
        NarrationEvent::Stopped => Some("[] stopped".to_string()),
        NarrationEvent::UnitStarted { .. } | NarrationEvent::UnitFinished { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrate_core::TTS_VOICES;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate_text("héllo wörld", 8), "héllo...");
        assert_eq!(truncate_text("short", 5), "short");
    }

    #[test]
    fn test_voice_table_marks_default() {
        let table = format_voice_table(TTS_VOICES);
        let kore = table.lines().find(|l| l.starts_with("Kore")).unwrap();
        assert!(kore.contains("female"));
        assert!(kore.ends_with("(default)"));
        assert_eq!(table.lines().count(), TTS_VOICES.len() + 2);
    }

    #[test]
    fn test_highlight_uses_screen_text() {
        let content = ScreenContent::new().question("q", "What do you enjoy?");
        let state = PlaybackState {
            currently_reading_id: Some("q".into()),
            ..Default::default()
        };
        assert_eq!(
            describe_highlight(&state, &content).as_deref(),
            Some(">> [q] What do you enjoy?")
        );
        assert!(describe_highlight(&PlaybackState::default(), &content).is_none());
    }

    #[test]
    fn test_events_without_status_line() {
        assert!(describe_event(&NarrationEvent::UnitStarted { id: "a".into() }).is_none());
        assert_eq!(
            describe_event(&NarrationEvent::QueueLoaded { ids: vec![] }).as_deref(),
            Some("Nothing to read on this screen.")
        );
    }
}
