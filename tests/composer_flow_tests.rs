//! Full-session composition flows over fixture catalogs.
//!
//! These tests drive `ComposerSession` the way a UI shell would - load
//! catalogs, walk the gated steps, submit - with the directories and the
//! generation backend replaced by in-process fixtures.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio_test::assert_ok;

use chorus_composer::config::pricing::ModelBranch;
use chorus_composer::config::ServiceConfig;
use chorus_composer::core::catalog::{
    GenerationModel, ModelDirectory, VoiceDirectory, VoiceEntry, VoiceInventory,
};
use chorus_composer::core::composer::{ComposerSession, CompositionMode, SpeakerSlot, Step};
use chorus_composer::core::emotion::{Emotion, EmotionValues, ExpressionMode};
use chorus_composer::core::generation::{
    GenerationBackend, GenerationRequest, ProgressHandle, SubmissionAck,
    spawn_simulated_progress,
};
use chorus_composer::errors::{ComposerError, ComposerResult};

// =============================================================================
// Fixtures
// =============================================================================

struct FixtureVoices;

#[async_trait]
impl VoiceDirectory for FixtureVoices {
    async fn fetch_voices(&self) -> ComposerResult<VoiceInventory> {
        Ok(VoiceInventory {
            built_in: vec![
                VoiceEntry {
                    id: "v-ava".into(),
                    label: "Ava".into(),
                    preview_url: Some("https://cdn.example/ava.mp3".into()),
                },
                VoiceEntry {
                    id: "v-ben".into(),
                    label: "Ben".into(),
                    preview_url: None,
                },
            ],
            user_created: vec![VoiceEntry {
                id: "v-mine".into(),
                label: "My Clone".into(),
                preview_url: None,
            }],
        })
    }
}

struct FixtureModels {
    branches: Vec<ModelBranch>,
}

impl FixtureModels {
    fn single() -> Self {
        Self {
            branches: vec![ModelBranch::new("standard", 250, 10).with_max_chars(5000)],
        }
    }
}

#[async_trait]
impl ModelDirectory for FixtureModels {
    async fn fetch_models(&self) -> ComposerResult<Vec<GenerationModel>> {
        Ok(vec![GenerationModel {
            id: "chorus-v2".into(),
            label: "Chorus v2".into(),
            branches: self.branches.clone(),
        }])
    }
}

struct FailingDirectory;

#[async_trait]
impl VoiceDirectory for FailingDirectory {
    async fn fetch_voices(&self) -> ComposerResult<VoiceInventory> {
        Err(ComposerError::Catalog("directory offline".into()))
    }
}

#[async_trait]
impl ModelDirectory for FailingDirectory {
    async fn fetch_models(&self) -> ComposerResult<Vec<GenerationModel>> {
        Err(ComposerError::Catalog("directory offline".into()))
    }
}

/// Backend that records what it was asked to submit.
#[derive(Clone, Default)]
struct RecordingBackend {
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    fail: bool,
}

impl RecordingBackend {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn last_request(&self) -> GenerationRequest {
        self.requests.lock().last().cloned().expect("a request was submitted")
    }
}

#[async_trait]
impl GenerationBackend for RecordingBackend {
    async fn submit(&self, request: &GenerationRequest) -> ComposerResult<SubmissionAck> {
        self.requests.lock().push(request.clone());
        if self.fail {
            return Err(ComposerError::Service {
                status: 503,
                message: "queue full".into(),
            });
        }
        Ok(SubmissionAck {
            request_id: "gen-001".into(),
            status: Some("queued".into()),
        })
    }
}

fn test_config() -> ServiceConfig {
    let _ = tracing_subscriber::fmt::try_init();
    ServiceConfig::for_base_url("http://127.0.0.1:1")
        .with_reset_delay(Duration::from_millis(5))
}

async fn ready_basic_session() -> ComposerSession {
    let mut session = ComposerSession::new(test_config(), CompositionMode::Basic);
    session
        .load_catalogs(&FixtureVoices, &FixtureModels::single())
        .await;

    session.set_title("Morning briefing");
    assert!(session.advance());
    session.assign_voice(SpeakerSlot::new(1), "v-ava").unwrap();
    assert!(session.advance());
    assert!(session.advance()); // auto expression mode
    session.set_text("Good morning, here is today's summary.");
    assert!(session.advance());
    assert_eq!(session.current_step(), Step::Review);
    session
}

async fn ready_enhanced_session() -> ComposerSession {
    let mut session = ComposerSession::new(test_config(), CompositionMode::Enhanced);
    session
        .load_catalogs(&FixtureVoices, &FixtureModels::single())
        .await;

    session.set_title("Two hander");
    assert!(session.advance());

    session.add_speaker().unwrap();
    session.assign_voice(SpeakerSlot::new(1), "v-ava").unwrap();
    session.assign_voice(SpeakerSlot::new(2), "v-ben").unwrap();
    assert!(session.advance());
    assert!(session.advance());

    let a = session.add_turn(SpeakerSlot::new(1)).unwrap();
    let b = session.add_turn(SpeakerSlot::new(2)).unwrap();
    session.update_turn_text(a, "hi").unwrap();
    session.update_turn_text(b, "yo").unwrap();
    assert!(session.advance());
    assert_eq!(session.current_step(), Step::Review);
    session
}

// =============================================================================
// Catalog Loading
// =============================================================================

#[tokio::test]
async fn catalog_load_populates_and_auto_selects() {
    let mut session = ComposerSession::new(test_config(), CompositionMode::Basic);
    session
        .load_catalogs(&FixtureVoices, &FixtureModels::single())
        .await;

    assert_eq!(session.voice_catalog().len(), 3);
    assert_eq!(session.voice_catalog().user_created().count(), 1);
    let selection = session.selection().expect("single branch auto-selected");
    assert_eq!(selection.branch_id, "standard");
}

#[tokio::test]
async fn catalog_load_soft_fails_to_empty() {
    let mut session = ComposerSession::new(test_config(), CompositionMode::Basic);
    session.load_catalogs(&FailingDirectory, &FailingDirectory).await;

    assert!(session.voice_catalog().is_empty());
    assert!(session.model_catalog().is_empty());

    // Degraded catalogs: no model selection required, step 1 just needs a
    // title.
    session.set_title("Still works");
    assert!(session.is_step_complete(Step::BasicInfo));
}

// =============================================================================
// Basic Flow
// =============================================================================

#[tokio::test]
async fn basic_flow_submits_and_resets_after_delay() {
    let mut session = ready_basic_session().await;
    let backend = RecordingBackend::default();

    let ack = tokio_test::assert_ok!(session.submit(&backend).await);
    assert_eq!(ack.request_id, "gen-001");

    // The configured delay has elapsed inside submit(); state is pristine
    // again, catalogs and auto-selection survive.
    assert_eq!(session.current_step(), Step::BasicInfo);
    assert!(session.title().is_empty());
    assert!(session.text().is_empty());
    assert!(session.selection().is_some());
    assert_eq!(session.voice_catalog().len(), 3);

    let request = backend.last_request();
    let GenerationRequest::Basic(body) = request else {
        panic!("expected a basic request");
    };
    assert_eq!(body.title, "Morning briefing");
    assert_eq!(body.voice_model_id, "v-ava");
    assert_eq!(body.model_id, "chorus-v2");
    assert!(body.emotions.is_empty());
}

#[tokio::test]
async fn failed_submission_preserves_state_for_retry() {
    let mut session = ready_basic_session().await;
    let failing = RecordingBackend::failing();

    let err = session.submit(&failing).await.unwrap_err();
    assert!(matches!(err, ComposerError::Service { status: 503, .. }));

    // Nothing was reset; a retry against a healthy backend succeeds
    // without re-authoring.
    assert_eq!(session.current_step(), Step::Review);
    assert_eq!(session.title(), "Morning briefing");

    let backend = RecordingBackend::default();
    session.submit(&backend).await.unwrap();
    assert_eq!(session.current_step(), Step::BasicInfo);
}

#[tokio::test]
async fn custom_emotions_reach_the_basic_payload() {
    let mut session = ready_basic_session().await;
    session.retreat();
    session.retreat(); // back on the emotion step
    session.set_emotion_mode(ExpressionMode::Custom);
    session.set_emotion_value(Emotion::Happy, 50);
    session.set_emotion_value(Emotion::Calm, 20);
    assert!(session.advance());
    assert!(session.advance());

    let backend = RecordingBackend::default();
    session.submit(&backend).await.unwrap();

    let GenerationRequest::Basic(body) = backend.last_request() else {
        panic!("expected a basic request");
    };
    assert_eq!(body.emotions[&Emotion::Happy], 50);
    assert_eq!(body.emotions[&Emotion::Calm], 20);
}

// =============================================================================
// Enhanced Flow
// =============================================================================

#[tokio::test]
async fn enhanced_flow_produces_speaker_blocks_with_one_based_orders() {
    let mut session = ready_enhanced_session().await;
    let backend = RecordingBackend::default();
    session.submit(&backend).await.unwrap();

    let GenerationRequest::Enhanced(body) = backend.last_request() else {
        panic!("expected an enhanced request");
    };
    assert_eq!(body.dialogue_script.len(), 2);

    let speaker1 = &body.dialogue_script["Speaker_1"];
    assert_eq!(speaker1.voice_model_id, "v-ava");
    assert_eq!(speaker1.lines[0].text, "hi");
    assert_eq!(speaker1.lines[0].order, 1);

    let speaker2 = &body.dialogue_script["Speaker_2"];
    assert_eq!(speaker2.voice_model_id, "v-ben");
    assert_eq!(speaker2.lines[0].order, 2);
}

#[tokio::test]
async fn reorder_before_submit_swaps_voices_not_lines() {
    let mut session = ready_enhanced_session().await;

    // Drag speaker 2 into the first position, then commit.
    session.retreat(); // review -> script
    session
        .begin_reorder(vec![SpeakerSlot::new(2), SpeakerSlot::new(1)])
        .unwrap();
    session.apply_reorder();
    assert!(session.advance());

    let backend = RecordingBackend::default();
    session.submit(&backend).await.unwrap();

    let GenerationRequest::Enhanced(body) = backend.last_request() else {
        panic!("expected an enhanced request");
    };

    // Slot 1 now speaks with Ben's voice, but its line is still "hi": the
    // turn followed its slot, not the voice.
    assert_eq!(body.dialogue_script["Speaker_1"].voice_model_id, "v-ben");
    assert_eq!(body.dialogue_script["Speaker_1"].lines[0].text, "hi");
    assert_eq!(body.dialogue_script["Speaker_2"].voice_model_id, "v-ava");
    assert_eq!(body.dialogue_script["Speaker_2"].lines[0].text, "yo");
}

#[tokio::test]
async fn drafted_turn_emotions_ride_along_in_auto_mode() {
    let mut session = ready_enhanced_session().await;
    let first_turn = session.turns()[0].id;

    let mut drafted = EmotionValues::new();
    drafted.insert(Emotion::Excited, 70);
    session.set_turn_emotions(first_turn, drafted).unwrap();

    let backend = RecordingBackend::default();
    session.submit(&backend).await.unwrap();
    let GenerationRequest::Enhanced(body) = backend.last_request() else {
        panic!("expected an enhanced request");
    };
    assert_eq!(
        body.dialogue_script["Speaker_1"].lines[0].emotions[&Emotion::Excited],
        70
    );
}

// =============================================================================
// Progress Integration
// =============================================================================

#[tokio::test]
async fn submit_tracked_snaps_progress_to_100_on_both_outcomes() {
    let mut session = ready_basic_session().await;
    let progress = ProgressHandle::new();
    let ticker = spawn_simulated_progress(progress.clone(), Duration::from_millis(1));

    let failing = RecordingBackend::failing();
    let _ = session.submit_tracked(&failing, &progress).await;
    assert_eq!(progress.percent(), 100);
    assert!(progress.is_finished());
    ticker.await.unwrap();

    // Retry with a healthy backend and a fresh indicator.
    let progress = ProgressHandle::new();
    let backend = RecordingBackend::default();
    session.submit_tracked(&backend, &progress).await.unwrap();
    assert_eq!(progress.percent(), 100);
}
