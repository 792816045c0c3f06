//! Sequential narration driver.
//!
//! The driver is a single tokio task that owns the whole playback session.
//! Commands from the [`NarrationHandle`], fetch results, clip completions and
//! settings changes are processed one at a time, so no playback state is ever
//! shared between tasks. Background work (fetching, pre-fetching, waiting for
//! a clip to end) reports back through an internal channel.
//!
//! ```text
//!   Idle ──advance──▶ Fetching ──clip ready──▶ Playing ──finished──▶ advance
//!                        │                      │  ▲
//!                   fetch failed            pause  resume
//!                        │                      ▼  │
//!                   skip + advance             Paused
//!
//!   stop / load / voice change / TTS off: tear down from any state
//! ```
//!
//! Late messages are neutralized rather than raced against: fetch results
//! carry the session generation they were started in, and a clip's
//! completion is only honoured while its handle is still in the active set.
//! Teardown empties the active set *before* halting the clips.

use std::collections::HashMap;
use std::sync::Arc;

use narrate_core::{
    AudioClip, AudioDecoder, AudioSettings, HandleId, NarrationError, NarrationQueue,
    NarrationUnit, OutputDevice, OutputLine, PlaybackParams, PlaybackPhase, PlaybackState,
    ScreenContent, SettingsStore, SpeechSynthesizer, build_queue,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::cache::ClipCache;
use crate::config::DriverConfig;

// ── Events emitted by the driver ───────────────────────────────────

/// Events emitted by the narration driver to the UI / application layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrationEvent {
    /// A screen's queue was built.
    QueueLoaded { ids: Vec<String> },

    /// A unit's clip started playing.
    UnitStarted { id: String },

    /// A unit's clip played to the end.
    UnitFinished { id: String },

    /// A unit could not be fetched or played and was dropped.
    UnitSkipped { id: String, error: String },

    /// The output line was suspended.
    Paused,

    /// The output line was resumed.
    Resumed,

    /// The last unit of the queue is done.
    QueueDrained,

    /// Narration was stopped explicitly.
    Stopped,
}

// ── Dependencies ───────────────────────────────────────────────────

/// The collaborators a driver works with.
#[derive(Clone)]
pub struct DriverDeps {
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub decoder: Arc<dyn AudioDecoder>,
    pub device: Arc<dyn OutputDevice>,
    pub settings: SettingsStore,
}

// ── Messages ───────────────────────────────────────────────────────

#[derive(Debug)]
enum Command {
    Load(ScreenContent),
    Play,
    Pause,
    Resume,
    Toggle,
    Stop,
    Restart,
    Shutdown,
}

enum Internal {
    Fetched {
        generation: u64,
        unit: NarrationUnit,
        result: Result<Arc<AudioClip>, NarrationError>,
    },
    Finished {
        handle: HandleId,
    },
}

enum Wake {
    Command(Option<Command>),
    Internal(Internal),
    Settings(bool),
}

// ── Handle ─────────────────────────────────────────────────────────

/// Control surface of a running driver.
///
/// Dropping the handle without calling [`shutdown`](Self::shutdown) also
/// stops the driver, once its command channel closes.
pub struct NarrationHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    state_rx: watch::Receiver<PlaybackState>,
    task: JoinHandle<()>,
}

impl NarrationHandle {
    fn send(&self, cmd: Command) -> Result<(), NarrationError> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| NarrationError::DriverStopped)
    }

    /// Tear down the current screen and narrate `content` instead.
    pub fn load(&self, content: ScreenContent) -> Result<(), NarrationError> {
        self.send(Command::Load(content))
    }

    /// Start or resume narration. Replays the screen when the queue is exhausted.
    pub fn play(&self) -> Result<(), NarrationError> {
        self.send(Command::Play)
    }

    pub fn pause(&self) -> Result<(), NarrationError> {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> Result<(), NarrationError> {
        self.send(Command::Resume)
    }

    /// Pause when playing, play otherwise.
    pub fn toggle(&self) -> Result<(), NarrationError> {
        self.send(Command::Toggle)
    }

    pub fn stop(&self) -> Result<(), NarrationError> {
        self.send(Command::Stop)
    }

    /// Read the current screen again from its first unit.
    pub fn restart(&self) -> Result<(), NarrationError> {
        self.send(Command::Restart)
    }

    /// Latest published playback state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state_rx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.state_rx.clone()
    }

    /// Stop narration and wait for the driver task to exit.
    pub async fn shutdown(self) {
        let _ = self.cmd_tx.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Narration driver task ended abnormally");
        }
    }
}

// ── Driver ─────────────────────────────────────────────────────────

/// Owns one narration session at a time.
pub struct NarrationDriver {
    config: DriverConfig,
    cache: ClipCache,
    device: Arc<dyn OutputDevice>,
    settings: SettingsStore,
    settings_rx: watch::Receiver<AudioSettings>,
    applied: AudioSettings,

    internal_tx: mpsc::UnboundedSender<Internal>,
    internal_rx: mpsc::UnboundedReceiver<Internal>,
    event_tx: mpsc::UnboundedSender<NarrationEvent>,
    state_tx: watch::Sender<PlaybackState>,

    /// Opened on first use and reused for every clip.
    line: Option<Box<dyn OutputLine>>,
    screen: Option<ScreenContent>,
    queue: NarrationQueue,
    /// Guards the advance cycle: a unit is being fetched or played.
    is_speaking: bool,
    is_playing: bool,
    is_fetching: bool,
    currently_reading: Option<String>,
    active: HashMap<HandleId, String>,
    /// Bumped on every teardown; fetch results from older generations are dropped.
    generation: u64,
    stopped: bool,
}

impl NarrationDriver {
    /// Create a driver and the receiver for its events.
    pub fn new(
        config: DriverConfig,
        deps: DriverDeps,
    ) -> (Self, mpsc::UnboundedReceiver<NarrationEvent>) {
        let DriverDeps {
            synthesizer,
            decoder,
            device,
            settings,
        } = deps;

        let applied = settings.current();
        let cache = ClipCache::new(
            synthesizer,
            decoder,
            applied.voice.clone(),
            config.sample_rate,
            config.channels,
        );

        let (internal_tx, internal_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, _state_rx) = watch::channel(PlaybackState::default());

        let driver = Self {
            config,
            cache,
            device,
            settings_rx: settings.subscribe(),
            settings,
            applied,
            internal_tx,
            internal_rx,
            event_tx,
            state_tx,
            line: None,
            screen: None,
            queue: NarrationQueue::new(),
            is_speaking: false,
            is_playing: false,
            is_fetching: false,
            currently_reading: None,
            active: HashMap::new(),
            generation: 0,
            stopped: false,
        };

        (driver, event_rx)
    }

    /// Run the driver on the current tokio runtime.
    #[must_use]
    pub fn spawn(self) -> NarrationHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let state_rx = self.state_tx.subscribe();
        let task = tokio::spawn(self.run(cmd_rx));

        NarrationHandle {
            cmd_tx,
            state_rx,
            task,
        }
    }

    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<Command>) {
        tracing::debug!(autoplay = self.config.autoplay, "Narration driver started");
        let mut settings_live = true;

        loop {
            // Pending settings changes are applied before pending commands.
            let wake = tokio::select! {
                biased;
                changed = self.settings_rx.changed(), if settings_live => Wake::Settings(changed.is_ok()),
                cmd = cmd_rx.recv() => Wake::Command(cmd),
                Some(msg) = self.internal_rx.recv() => Wake::Internal(msg),
            };

            match wake {
                Wake::Command(None | Some(Command::Shutdown)) => break,
                Wake::Command(Some(cmd)) => self.handle_command(cmd),
                Wake::Internal(msg) => self.handle_internal(msg),
                Wake::Settings(true) => self.on_settings_changed(),
                Wake::Settings(false) => settings_live = false,
            }

            self.publish();
        }

        self.teardown();
        self.publish();
        tracing::debug!("Narration driver stopped");
    }

    // ── Commands ───────────────────────────────────────────────────

    fn handle_command(&mut self, cmd: Command) {
        tracing::trace!(?cmd, "Narration command");
        match cmd {
            Command::Load(content) => self.load(content),
            Command::Play | Command::Resume => self.play(),
            Command::Pause => self.pause(),
            Command::Toggle => {
                if self.is_playing {
                    self.pause();
                } else {
                    self.play();
                }
            }
            Command::Stop => self.stop(),
            Command::Restart => {
                self.teardown();
                self.play();
            }
            Command::Shutdown => {}
        }
    }

    fn load(&mut self, content: ScreenContent) {
        self.teardown();
        self.cache.clear();
        self.stopped = false;
        self.screen = Some(content);
        self.rebuild_and_autoplay();
    }

    /// Build the queue for the current screen and start reading if configured.
    fn rebuild_and_autoplay(&mut self) {
        if !self.applied.tts_enabled {
            tracing::debug!("Narration disabled, not building a queue");
            return;
        }
        self.rebuild_queue();
        if self.config.autoplay && !self.queue.is_empty() {
            self.play();
        }
    }

    /// Build a fresh queue for the current screen. Audio is scoped to one
    /// queue, so the cache starts a new generation with it.
    fn rebuild_queue(&mut self) {
        let Some(screen) = &self.screen else {
            return;
        };
        self.cache.clear();
        self.queue = build_queue(screen);
        let ids: Vec<String> = self.queue.iter().map(|unit| unit.id.clone()).collect();
        tracing::debug!(units = ids.len(), "Narration queue built");
        self.emit(NarrationEvent::QueueLoaded { ids });
    }

    fn play(&mut self) {
        if !self.applied.tts_enabled {
            tracing::debug!("Narration disabled, ignoring play");
            return;
        }
        self.stopped = false;

        if self.queue.is_empty() && !self.is_speaking {
            self.rebuild_queue();
        }
        if self.queue.is_empty() {
            return;
        }

        self.is_playing = true;
        if let Some(line) = self.line.as_mut() {
            if line.is_suspended() {
                line.resume();
                self.emit(NarrationEvent::Resumed);
            }
        }
        self.advance();
    }

    fn pause(&mut self) {
        if !self.is_playing {
            return;
        }
        self.is_playing = false;
        if let Some(line) = self.line.as_mut() {
            line.suspend();
        }
        self.emit(NarrationEvent::Paused);
    }

    fn stop(&mut self) {
        self.teardown();
        self.stopped = true;
        self.emit(NarrationEvent::Stopped);
    }

    /// Neutralize and halt every clip, drop the queue and reset the session.
    ///
    /// The screen survives, so a later `play` can rebuild and replay it.
    fn teardown(&mut self) {
        self.generation += 1;

        let handles: Vec<HandleId> = self.active.drain().map(|(id, _)| id).collect();
        if let Some(line) = self.line.as_mut() {
            for handle in handles {
                line.stop(handle);
            }
            if line.is_suspended() {
                line.resume();
            }
        }

        self.queue.clear();
        self.is_speaking = false;
        self.is_fetching = false;
        self.is_playing = false;
        self.currently_reading = None;
    }

    // ── Advance cycle ──────────────────────────────────────────────

    fn advance(&mut self) {
        if self.is_speaking || !self.applied.tts_enabled {
            return;
        }
        let Some(head) = self.queue.head().cloned() else {
            return;
        };

        self.is_speaking = true;
        self.currently_reading = Some(head.id.clone());

        if let Some(next) = self.queue.peek_next() {
            self.cache.prefetch(next.clone());
        }

        if let Some(clip) = self.cache.get(&head.id) {
            tracing::debug!(unit_id = %head.id, "Narration audio cached");
            self.start_clip(head, clip);
            return;
        }

        tracing::debug!(unit_id = %head.id, "Fetching narration unit");
        self.is_fetching = true;
        let cache = self.cache.clone();
        let tx = self.internal_tx.clone();
        let generation = self.generation;
        tokio::spawn(async move {
            let result = cache.ensure(&head).await;
            let _ = tx.send(Internal::Fetched {
                generation,
                unit: head,
                result,
            });
        });
    }

    fn start_clip(&mut self, unit: NarrationUnit, clip: Arc<AudioClip>) {
        self.is_fetching = false;

        let current = self.settings.current();
        let params = PlaybackParams {
            rate: current.rate,
            volume: current.volume,
        };

        let handle = match self.output_line().and_then(|line| line.play(clip, params)) {
            Ok(handle) => handle,
            Err(e) => {
                self.unit_failed(&unit, &e);
                return;
            }
        };

        let id = handle.id;
        self.active.insert(id, unit.id.clone());

        let tx = self.internal_tx.clone();
        let finished = handle.finished;
        tokio::spawn(async move {
            let _ = finished.await;
            let _ = tx.send(Internal::Finished { handle: id });
        });

        tracing::debug!(
            unit_id = %unit.id,
            handle = %id,
            rate = params.rate,
            "Narration unit playing"
        );
        self.emit(NarrationEvent::UnitStarted { id: unit.id });
    }

    fn output_line(&mut self) -> Result<&mut Box<dyn OutputLine>, NarrationError> {
        if self.line.is_none() {
            let mut line = self.device.open()?;
            if !self.is_playing {
                line.suspend();
            }
            self.line = Some(line);
        }
        self.line
            .as_mut()
            .ok_or_else(|| NarrationError::OutputStream("output line unavailable".to_string()))
    }

    fn unit_failed(&mut self, unit: &NarrationUnit, error: &NarrationError) {
        if !error.is_skippable() {
            tracing::error!(unit_id = %unit.id, error = %error, "Narration output failed, stopping");
            self.stop();
            return;
        }

        tracing::warn!(unit_id = %unit.id, error = %error, "Skipping narration unit");
        self.emit(NarrationEvent::UnitSkipped {
            id: unit.id.clone(),
            error: error.to_string(),
        });
        self.queue.pop_if_head(&unit.id);
        self.is_speaking = false;
        self.is_fetching = false;
        self.continue_or_drain();
    }

    fn continue_or_drain(&mut self) {
        if self.queue.is_empty() {
            self.currently_reading = None;
            self.is_playing = false;
            tracing::debug!("Narration queue drained");
            self.emit(NarrationEvent::QueueDrained);
        } else {
            self.advance();
        }
    }

    // ── Background results ─────────────────────────────────────────

    fn handle_internal(&mut self, msg: Internal) {
        match msg {
            Internal::Fetched {
                generation,
                unit,
                result,
            } => {
                let is_head = self.queue.head().is_some_and(|head| head.id == unit.id);
                if generation != self.generation || !self.is_speaking || !is_head {
                    tracing::debug!(unit_id = %unit.id, "Ignoring stale fetch result");
                    return;
                }
                match result {
                    Ok(clip) => self.start_clip(unit, clip),
                    Err(e) => self.unit_failed(&unit, &e),
                }
            }
            Internal::Finished { handle } => {
                let Some(unit_id) = self.active.remove(&handle) else {
                    tracing::trace!(handle = %handle, "Ignoring completion of neutralized clip");
                    return;
                };
                tracing::debug!(unit_id = %unit_id, "Narration unit finished");
                self.queue.pop_if_head(&unit_id);
                self.is_speaking = false;
                self.emit(NarrationEvent::UnitFinished { id: unit_id });
                self.continue_or_drain();
            }
        }
    }

    fn on_settings_changed(&mut self) {
        let next = self.settings_rx.borrow_and_update().clone();
        let rebuild = self.applied.requires_rebuild(&next);
        self.applied = next;

        if !rebuild {
            tracing::debug!(
                rate = self.applied.rate,
                volume = self.applied.volume,
                "Playback settings changed, applying from next unit"
            );
            return;
        }

        tracing::info!(
            voice = %self.applied.voice,
            tts_enabled = self.applied.tts_enabled,
            "Narration settings changed, rebuilding"
        );
        self.teardown();
        self.cache.reset(self.applied.voice.clone());
        self.rebuild_and_autoplay();
    }

    // ── Publishing ─────────────────────────────────────────────────

    fn phase(&self) -> PlaybackPhase {
        if self.is_fetching {
            PlaybackPhase::Fetching
        } else if self.is_speaking {
            if self.line.as_ref().is_some_and(|line| line.is_suspended()) {
                PlaybackPhase::Paused
            } else {
                PlaybackPhase::Playing
            }
        } else if self.stopped {
            PlaybackPhase::Stopped
        } else {
            PlaybackPhase::Idle
        }
    }

    fn publish(&self) {
        let next = PlaybackState {
            phase: self.phase(),
            currently_reading_id: self.currently_reading.clone(),
            is_playing: self.is_playing,
            is_fetching: self.is_fetching,
            queued: self.queue.len(),
        };

        self.state_tx.send_if_modified(|state| {
            if *state == next {
                false
            } else {
                tracing::trace!(phase = %next.phase, reading = ?next.currently_reading_id, "Playback state");
                *state = next;
                true
            }
        });
    }

    /// Emit an event (best-effort: if the receiver is dropped, log and move on).
    fn emit(&self, event: NarrationEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("Narration event receiver dropped");
        }
    }
}
