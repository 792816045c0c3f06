//! Speaker output via `rodio`, confined to a dedicated audio thread.
//!
//! `rodio::OutputStream` is `!Send` on some platforms, so the stream and every
//! `Sink` live on one OS thread and the [`SpeakerLine`] proxies each operation
//! through an `mpsc` channel. The thread polls its sinks between commands and
//! fires a clip's completion as soon as its sink drains.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use narrate_core::{
    AudioClip, HandleId, NarrationError, OutputDevice, OutputHandle, OutputLine, PlaybackParams,
};
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use tokio::sync::oneshot;

/// How often the audio thread checks sinks for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

// ── Commands ───────────────────────────────────────────────────────

enum SpeakerCommand {
    Play {
        id: HandleId,
        clip: Arc<AudioClip>,
        params: PlaybackParams,
        done: oneshot::Sender<()>,
        reply: mpsc::Sender<Result<(), NarrationError>>,
    },
    Stop(HandleId),
    Suspend,
    Resume,
    Shutdown,
}

// ── Device ─────────────────────────────────────────────────────────

/// Opens a [`SpeakerLine`] on the default output device.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpeakerDevice;

impl OutputDevice for SpeakerDevice {
    fn open(&self) -> Result<Box<dyn OutputLine>, NarrationError> {
        Ok(Box::new(SpeakerLine::spawn()?))
    }
}

// ── Line (Send proxy) ──────────────────────────────────────────────

/// `Send` handle to the speaker thread.
pub struct SpeakerLine {
    cmd_tx: mpsc::Sender<SpeakerCommand>,
    thread: Option<thread::JoinHandle<()>>,
    next_id: u64,
    suspended: bool,
}

impl SpeakerLine {
    /// Spawn the audio thread and open the default output stream on it.
    pub fn spawn() -> Result<Self, NarrationError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<SpeakerCommand>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), NarrationError>>();

        let thread = thread::Builder::new()
            .name("narrate-audio".into())
            .spawn(move || run(&cmd_rx, &init_tx))
            .map_err(|e| NarrationError::OutputStream(format!("failed to spawn audio thread: {e}")))?;

        init_rx
            .recv()
            .map_err(|_| NarrationError::AudioThreadDied)??;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
            next_id: 0,
            suspended: false,
        })
    }

    fn send(&self, cmd: SpeakerCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::warn!("Audio thread is gone, dropping command");
        }
    }
}

impl OutputLine for SpeakerLine {
    fn play(
        &mut self,
        clip: Arc<AudioClip>,
        params: PlaybackParams,
    ) -> Result<OutputHandle, NarrationError> {
        self.next_id += 1;
        let id = HandleId(self.next_id);
        let (done_tx, done_rx) = oneshot::channel();
        let (reply_tx, reply_rx) = mpsc::channel();

        self.cmd_tx
            .send(SpeakerCommand::Play {
                id,
                clip,
                params,
                done: done_tx,
                reply: reply_tx,
            })
            .map_err(|_| NarrationError::AudioThreadDied)?;
        reply_rx
            .recv()
            .map_err(|_| NarrationError::AudioThreadDied)??;

        Ok(OutputHandle {
            id,
            finished: done_rx,
        })
    }

    fn stop(&mut self, id: HandleId) {
        self.send(SpeakerCommand::Stop(id));
    }

    fn suspend(&mut self) {
        self.suspended = true;
        self.send(SpeakerCommand::Suspend);
    }

    fn resume(&mut self) {
        self.suspended = false;
        self.send(SpeakerCommand::Resume);
    }

    fn is_suspended(&self) -> bool {
        self.suspended
    }
}

impl Drop for SpeakerLine {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(SpeakerCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

// ── Audio thread ───────────────────────────────────────────────────

/// Body of the audio thread. Owns the output stream and all sinks.
fn run(cmd_rx: &mpsc::Receiver<SpeakerCommand>, init_tx: &mpsc::Sender<Result<(), NarrationError>>) {
    let (_stream, stream_handle) = match OutputStream::try_default() {
        Ok(pair) => pair,
        Err(e) => {
            let _ = init_tx.send(Err(NarrationError::OutputStream(e.to_string())));
            return;
        }
    };

    if init_tx.send(Ok(())).is_err() {
        return;
    }
    tracing::info!("Speaker output initialized on default device");

    let mut sinks: HashMap<HandleId, (Sink, oneshot::Sender<()>)> = HashMap::new();
    let mut paused = false;

    loop {
        match cmd_rx.recv_timeout(POLL_INTERVAL) {
            Ok(SpeakerCommand::Play {
                id,
                clip,
                params,
                done,
                reply,
            }) => match Sink::try_new(&stream_handle) {
                Ok(sink) => {
                    if paused {
                        sink.pause();
                    }
                    sink.set_speed(params.rate);
                    sink.set_volume(params.volume);
                    sink.append(SamplesBuffer::new(
                        clip.channels,
                        clip.sample_rate,
                        clip.samples.clone(),
                    ));
                    sinks.insert(id, (sink, done));
                    tracing::debug!(handle = %id, "Speaker clip started");
                    let _ = reply.send(Ok(()));
                }
                Err(e) => {
                    let _ = reply.send(Err(NarrationError::OutputStream(e.to_string())));
                }
            },
            Ok(SpeakerCommand::Stop(id)) => {
                if let Some((sink, done)) = sinks.remove(&id) {
                    sink.stop();
                    let _ = done.send(());
                    tracing::debug!(handle = %id, "Speaker clip stopped");
                }
            }
            Ok(SpeakerCommand::Suspend) => {
                paused = true;
                for (sink, _) in sinks.values() {
                    sink.pause();
                }
            }
            Ok(SpeakerCommand::Resume) => {
                paused = false;
                for (sink, _) in sinks.values() {
                    sink.play();
                }
            }
            Ok(SpeakerCommand::Shutdown) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            Err(mpsc::RecvTimeoutError::Timeout) => {}
        }

        let drained: Vec<HandleId> = sinks
            .iter()
            .filter(|(_, (sink, _))| sink.empty())
            .map(|(id, _)| *id)
            .collect();
        for id in drained {
            if let Some((_, done)) = sinks.remove(&id) {
                let _ = done.send(());
                tracing::debug!(handle = %id, "Speaker clip finished");
            }
        }
    }

    for (_, (sink, _)) in sinks.drain() {
        sink.stop();
    }
    tracing::debug!("Audio thread shutting down");
}
