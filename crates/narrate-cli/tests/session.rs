//! Integration tests for the interactive session loop.
//!
//! Sessions run the real driver, decoder and simulated output line against a
//! synthesizer that returns short silent PCM, with scripted stdin.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use narrate_cli::handlers::{question, session, start};
use narrate_cli::{CliContext, SessionEnd};
use narrate_core::{
    GeneratedQuestion, NarrationError, QuestionCategory, QuestionType, ScreenContent,
    SettingsStore, SpeechSynthesizer, SurveyType,
};
use narrate_voice::{DriverConfig, DriverDeps, PcmDecoder, SimulatedDevice};
use tokio::io::BufReader;

const WAIT: Duration = Duration::from_secs(5);

/// 50 ms of silence at 24 kHz mono, 16-bit little endian.
const SILENCE: [u8; 2400] = [0; 2400];

#[derive(Default)]
struct SilentSynth {
    failing: Mutex<HashSet<String>>,
    voices: Mutex<Vec<String>>,
}

impl SilentSynth {
    fn failing(text: &str) -> Self {
        let synth = Self::default();
        synth.failing.lock().unwrap().insert(text.to_string());
        synth
    }
}

#[async_trait]
impl SpeechSynthesizer for SilentSynth {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, NarrationError> {
        self.voices.lock().unwrap().push(voice.to_string());
        if self.failing.lock().unwrap().contains(text) {
            return Err(NarrationError::Synthesis("quota exceeded".into()));
        }
        Ok(SILENCE.to_vec())
    }
}

fn context(synth: SilentSynth) -> CliContext {
    context_with(Arc::new(synth))
}

fn context_with(synth: Arc<SilentSynth>) -> CliContext {
    CliContext::start(
        DriverConfig::default(),
        DriverDeps {
            synthesizer: synth,
            decoder: Arc::new(PcmDecoder),
            device: Arc::new(SimulatedDevice),
            settings: SettingsStore::default(),
        },
    )
}

fn choice_question() -> GeneratedQuestion {
    GeneratedQuestion {
        category: QuestionCategory::Preferences,
        question_text: "Where would you like to work?".into(),
        question_type: QuestionType::MultipleChoice,
        options: Some(vec!["Outdoors".into(), "From home".into()]),
    }
}

async fn run_with_input(
    ctx: CliContext,
    content: ScreenContent,
    input: &'static [u8],
) -> (SessionEnd, String) {
    let mut out = Vec::new();
    let end = tokio::time::timeout(
        WAIT,
        session::run(ctx, content, input, &mut out, std::future::pending()),
    )
    .await
    .expect("session did not end")
    .unwrap();
    (end, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn piped_session_reads_everything_then_finishes() {
    let mut out = Vec::new();
    let end = tokio::time::timeout(
        WAIT,
        question::execute(
            context(SilentSynth::default()),
            &choice_question(),
            &b""[..],
            &mut out,
            std::future::pending(),
        ),
    )
    .await
    .expect("session did not end")
    .unwrap();

    let out = String::from_utf8(out).unwrap();
    assert_eq!(end, SessionEnd::Finished);
    assert!(out.starts_with("Preferences question"));
    assert!(out.contains("Queued 4 item(s)."));
    assert!(out.contains(">> [question-text] Where would you like to work?"));
    assert!(out.trim_end().ends_with("Done."));
}

#[tokio::test]
async fn failed_unit_is_reported_and_session_still_finishes() {
    let (end, out) = run_with_input(
        context(SilentSynth::failing("Outdoors")),
        narrate_core::question_screen(&choice_question()),
        b"",
    )
    .await;

    assert_eq!(end, SessionEnd::Finished);
    assert!(out.contains("!! skipped [option-0]"));
    assert!(out.contains("quota exceeded"));
    assert!(out.contains("Done."));
}

#[tokio::test]
async fn stop_key_ends_piped_session_without_draining() {
    let (end, out) = run_with_input(
        context(SilentSynth::default()),
        narrate_core::start_screen(SurveyType::EducationSpin),
        b"s\n",
    )
    .await;

    assert_eq!(end, SessionEnd::Finished);
    assert!(out.contains("[] stopped"));
    assert!(!out.contains("Done."));
}

#[tokio::test]
async fn quit_key_ends_session() {
    let (end, _out) = run_with_input(
        context(SilentSynth::default()),
        narrate_core::start_screen(SurveyType::CareerSpin),
        b"q\n",
    )
    .await;

    assert_eq!(end, SessionEnd::Quit);
}

#[tokio::test]
async fn unknown_key_prints_help() {
    let (_end, out) = run_with_input(
        context(SilentSynth::default()),
        ScreenContent::new().question("q", "Ready?"),
        b"x\nq\n",
    )
    .await;

    assert!(out.matches("Keys:").count() >= 2);
}

#[tokio::test]
async fn empty_screen_finishes_immediately() {
    let (end, out) = run_with_input(context(SilentSynth::default()), ScreenContent::new(), b"")
        .await;

    assert_eq!(end, SessionEnd::Finished);
    assert!(out.contains("Nothing to read on this screen."));
}

#[tokio::test]
async fn quit_signal_interrupts_open_session() {
    // The writer half stays alive, so input never closes.
    let (_writer, reader) = tokio::io::duplex(64);
    let mut out = Vec::new();
    let end = tokio::time::timeout(
        WAIT,
        start::execute(
            context(SilentSynth::default()),
            SurveyType::IndependentSpin,
            BufReader::new(reader),
            &mut out,
            async {},
        ),
    )
    .await
    .expect("session did not end")
    .unwrap();

    assert_eq!(end, SessionEnd::Interrupted);
}

#[tokio::test]
async fn mute_key_turns_narration_off() {
    let ctx = context(SilentSynth::default());
    let settings = ctx.settings.clone();
    let (end, out) = run_with_input(
        ctx,
        narrate_core::question_screen(&choice_question()),
        b"m\n",
    )
    .await;

    assert_eq!(end, SessionEnd::Finished);
    assert!(out.contains("Narration off"));
    assert!(!settings.current().tts_enabled);
    assert!(!out.contains("Done."));
}

#[tokio::test]
async fn voice_key_switches_voice_for_later_fetches() {
    let synth = Arc::new(SilentSynth::default());
    let ctx = context_with(Arc::clone(&synth));
    let settings = ctx.settings.clone();
    let (end, out) = run_with_input(
        ctx,
        narrate_core::question_screen(&choice_question()),
        b"v nobody\nv puck\n",
    )
    .await;

    assert_eq!(end, SessionEnd::Finished);
    assert!(out.contains("!! unknown voice 'nobody'"));
    assert!(out.contains("Voice: Puck"));
    assert!(out.contains("Done."));
    assert_eq!(settings.current().voice, "Puck");
    let voices = synth.voices.lock().unwrap().clone();
    assert_eq!(voices.last().map(String::as_str), Some("Puck"));
}

#[tokio::test]
async fn rate_keys_step_and_report_rate() {
    let ctx = context(SilentSynth::default());
    let settings = ctx.settings.clone();
    let (end, out) = run_with_input(
        ctx,
        ScreenContent::new().question("q", "Ready?"),
        b"+\n+\n-\n",
    )
    .await;

    assert_eq!(end, SessionEnd::Finished);
    assert!(out.contains("Rate: 1.25x"));
    assert!(out.contains("Rate: 1.50x"));
    assert!((settings.current().rate - 1.25).abs() < f32::EPSILON);
}

#[tokio::test]
async fn restart_key_reads_screen_again() {
    let (end, out) = run_with_input(
        context(SilentSynth::default()),
        narrate_core::question_screen(&choice_question()),
        b"r\n",
    )
    .await;

    assert_eq!(end, SessionEnd::Finished);
    assert_eq!(out.matches("Queued 4 item(s).").count(), 2);
    assert!(!out.contains("[] stopped"));
    assert!(out.trim_end().ends_with("Done."));
}
