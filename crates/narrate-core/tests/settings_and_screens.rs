//! Integration tests for the public narrate-core surface.

use narrate_core::{
    AudioSettings, AudioSettingsUpdate, GeneratedQuestion, SettingsStore, SurveyType, build_queue,
    question_screen, start_screen,
};
use tokio_test::{assert_pending, assert_ready, task};

#[test]
fn subscriber_wakes_only_on_real_change() {
    let store = SettingsStore::default();
    let mut rx = store.subscribe();

    let mut changed = task::spawn(rx.changed());
    assert_pending!(changed.poll());

    store.update(&AudioSettingsUpdate::default()).unwrap();
    assert!(!changed.is_woken());

    store
        .update(&AudioSettingsUpdate {
            rate: Some(1.25),
            ..Default::default()
        })
        .unwrap();
    assert!(changed.is_woken());
    assert_ready!(changed.poll()).unwrap();
}

#[test]
fn store_rejects_invalid_initial_settings() {
    let invalid = AudioSettings {
        rate: 3.0,
        ..Default::default()
    };
    assert!(SettingsStore::new(invalid).is_err());
}

#[test]
fn cloned_store_shares_settings() {
    let store = SettingsStore::default();
    let other = store.clone();
    other.toggle_tts();
    assert!(!store.current().tts_enabled);
}

#[test]
fn question_from_model_json_builds_expected_queue() {
    let question: GeneratedQuestion = serde_json::from_str(
        r#"{
            "category": "Preferences",
            "question_text": "Where would you like to work?",
            "type": "multiple_choice",
            "options": ["Outdoors", "In an office", "   ", "From home"]
        }"#,
    )
    .unwrap();

    let queue = build_queue(&question_screen(&question));
    // The blank option is not narrated but keeps its index-based id slot.
    assert_eq!(
        queue.ids(),
        vec!["question-text", "answers-cue", "option-0", "option-1", "option-3"]
    );
}

#[test]
fn start_screen_lists_every_survey_type() {
    let content = start_screen(SurveyType::CareerSpin);
    for survey_type in SurveyType::ALL {
        let id = format!("survey-type-{}", survey_type.as_str());
        let text = content.text_of(&id).unwrap();
        assert!(text.starts_with(survey_type.label()));
    }
}

#[test]
fn rebuilding_start_screen_is_idempotent() {
    let first = build_queue(&start_screen(SurveyType::EducationSpin));
    let second = build_queue(&start_screen(SurveyType::EducationSpin));
    assert_eq!(first, second);
}
