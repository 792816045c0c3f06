//! Playback state published to the UI.

use serde::{Deserialize, Serialize};

/// Driver phase. The unit it applies to is
/// [`PlaybackState::currently_reading_id`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    /// Nothing loaded, or the queue ran dry.
    #[default]
    Idle,
    /// Waiting for synthesis and decode of the head unit.
    Fetching,
    /// The head unit's clip is playing.
    Playing,
    /// The output line is suspended mid-clip.
    Paused,
    /// Torn down by an explicit stop.
    Stopped,
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
        };
        f.write_str(label)
    }
}

/// Control shown on the play/pause button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Affordance {
    Spinner,
    Pause,
    Play,
}

/// Snapshot of what the narration driver is doing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub phase: PlaybackPhase,

    /// Id of the element being read; drives the highlight.
    pub currently_reading_id: Option<String>,

    /// Whether the user intends narration to be running.
    pub is_playing: bool,

    /// Whether the head unit's audio is being fetched.
    pub is_fetching: bool,

    /// Units left in the queue, the current one included.
    pub queued: usize,
}

impl PlaybackState {
    /// Whether the element `id` should be highlighted.
    #[must_use]
    pub fn is_highlighted(&self, id: &str) -> bool {
        self.currently_reading_id.as_deref() == Some(id)
    }

    #[must_use]
    pub const fn affordance(&self) -> Affordance {
        if self.is_fetching {
            Affordance::Spinner
        } else if self.is_playing {
            Affordance::Pause
        } else {
            Affordance::Play
        }
    }
}
